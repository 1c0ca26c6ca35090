/// Gate descriptors and their amplitude rules.
///
/// A [`Gate`] names the qubits it acts on and, for rotations, an angle.
/// Application never builds a matrix: each gate is a handful of per-index
/// rules (which source feeds a destination, and with what scalar) that
/// [`kernel::accumulate`](super::kernel) sweeps over the scratch buffer.
///
/// Basis index bit `q` holds qubit `q`. For destination `j` and target `t`:
///
/// ```text
/// gate        pass   source            scalar
/// X           swap   j ^ t             1
/// Y           swap   j ^ t             +i if bit(j,t) else −i
/// Z           stay   j                 −1 if bit(j,t) else 1
/// H           stay   j                 −1/√2 if bit(j,t) else 1/√2
///             swap   j ^ t             1/√2
/// Rx(θ)       stay   j                 cos(θ/2)
///             swap   j ^ t             −i·sin(θ/2)
/// Ry(θ)       stay   j                 cos(θ/2)
///             swap   j ^ t             sin(θ/2) if bit(j,t) else −sin(θ/2)
/// Rz(θ)       stay   j                 e^{+iθ/2} if bit(j,t) else e^{−iθ/2}
/// MCNOT       perm   j ^ t if controls set in j, else j      1
/// MCPHASE     stay   j                 −1 if controls and t set in j, else 1
/// ```
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

use super::kernel::{self, Backend};
use super::state::{qubit_bit, Amplitude, ONE};
use crate::error::IndexError;

const I: Amplitude = Amplitude::new(0.0, 1.0);
const NEG_I: Amplitude = Amplitude::new(0.0, -1.0);
const NEG_ONE: Amplitude = Amplitude::new(-1.0, 0.0);
const H_COEF: Amplitude = Amplitude::new(FRAC_1_SQRT_2, 0.0);
const NEG_H_COEF: Amplitude = Amplitude::new(-FRAC_1_SQRT_2, 0.0);

/// A gate to apply to the register.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    PauliX { target: usize },
    PauliY { target: usize },
    PauliZ { target: usize },
    Hadamard { target: usize },
    Rx { target: usize, theta: f64 },
    Ry { target: usize, theta: f64 },
    Rz { target: usize, theta: f64 },
    /// Flip `target` when every control is |1⟩. Zero controls is plain X.
    Mcnot { controls: Vec<usize>, target: usize },
    /// Negate the amplitude when every control and `target` are |1⟩.
    Mcphase { controls: Vec<usize>, target: usize },
}

impl Gate {
    pub fn cnot(control: usize, target: usize) -> Self {
        Self::Mcnot {
            controls: vec![control],
            target,
        }
    }

    pub fn toffoli(control0: usize, control1: usize, target: usize) -> Self {
        Self::Mcnot {
            controls: vec![control0, control1],
            target,
        }
    }

    pub fn cz(control: usize, target: usize) -> Self {
        Self::Mcphase {
            controls: vec![control],
            target,
        }
    }

    pub fn target(&self) -> usize {
        match self {
            Self::PauliX { target }
            | Self::PauliY { target }
            | Self::PauliZ { target }
            | Self::Hadamard { target }
            | Self::Rx { target, .. }
            | Self::Ry { target, .. }
            | Self::Rz { target, .. }
            | Self::Mcnot { target, .. }
            | Self::Mcphase { target, .. } => *target,
        }
    }

    pub fn controls(&self) -> &[usize] {
        match self {
            Self::Mcnot { controls, .. } | Self::Mcphase { controls, .. } => controls,
            _ => &[],
        }
    }

    /// Short mnemonic, e.g. `"H"`, `"CNOT"`, `"MCPHASE"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PauliX { .. } => "X",
            Self::PauliY { .. } => "Y",
            Self::PauliZ { .. } => "Z",
            Self::Hadamard { .. } => "H",
            Self::Rx { .. } => "RX",
            Self::Ry { .. } => "RY",
            Self::Rz { .. } => "RZ",
            Self::Mcnot { controls, .. } => match controls.len() {
                1 => "CNOT",
                2 => "TOFFOLI",
                _ => "MCNOT",
            },
            Self::Mcphase { controls, .. } => match controls.len() {
                1 => "CZ",
                _ => "MCPHASE",
            },
        }
    }

    /// Rotation angle, if this gate has one.
    pub fn theta(&self) -> Option<f64> {
        match self {
            Self::Rx { theta, .. } | Self::Ry { theta, .. } | Self::Rz { theta, .. } => {
                Some(*theta)
            }
            _ => None,
        }
    }

    /// Check every qubit index against a register of `num_qubits`.
    ///
    /// Controls must be in range, distinct, and different from the target.
    /// Rotation angles must be finite.
    pub fn validate(&self, num_qubits: usize) -> Result<(), IndexError> {
        if let Some(theta) = self.theta() {
            if !theta.is_finite() {
                return Err(IndexError::NonFiniteAngle {
                    gate: self.name(),
                    theta,
                });
            }
        }
        let target = self.target();
        if target >= num_qubits {
            return Err(IndexError::OutOfRange {
                qubit: target,
                num_qubits,
            });
        }
        let controls = self.controls();
        for (k, &c) in controls.iter().enumerate() {
            if c >= num_qubits {
                return Err(IndexError::OutOfRange {
                    qubit: c,
                    num_qubits,
                });
            }
            if c == target {
                return Err(IndexError::ControlIsTarget { qubit: c });
            }
            if controls[..k].contains(&c) {
                return Err(IndexError::DuplicateControl { qubit: c });
            }
        }
        Ok(())
    }

    /// Sweep this gate from `current` into `scratch`.
    ///
    /// `scratch` must be zeroed and the gate already validated.
    pub(crate) fn run(&self, current: &[Amplitude], scratch: &mut [Amplitude], backend: Backend) {
        let t = 1usize << self.target();
        let target = self.target();
        let set = |j: usize| qubit_bit(j, target);

        match self {
            Self::PauliX { .. } => {
                kernel::accumulate(current, scratch, backend, |j| (j ^ t, ONE));
            }
            Self::PauliY { .. } => {
                kernel::accumulate(current, scratch, backend, |j| {
                    (j ^ t, if set(j) { I } else { NEG_I })
                });
            }
            Self::PauliZ { .. } => {
                kernel::accumulate(current, scratch, backend, |j| {
                    (j, if set(j) { NEG_ONE } else { ONE })
                });
            }
            Self::Hadamard { .. } => {
                kernel::accumulate(current, scratch, backend, |j| {
                    (j, if set(j) { NEG_H_COEF } else { H_COEF })
                });
                kernel::accumulate(current, scratch, backend, |j| (j ^ t, H_COEF));
            }
            Self::Rx { theta, .. } => {
                let (sin, cos) = (theta / 2.0).sin_cos();
                let stay = Amplitude::new(cos, 0.0);
                let swap = Amplitude::new(0.0, -sin);
                kernel::accumulate(current, scratch, backend, |j| (j, stay));
                kernel::accumulate(current, scratch, backend, |j| (j ^ t, swap));
            }
            Self::Ry { theta, .. } => {
                let (sin, cos) = (theta / 2.0).sin_cos();
                let stay = Amplitude::new(cos, 0.0);
                let up = Amplitude::new(sin, 0.0);
                let down = Amplitude::new(-sin, 0.0);
                kernel::accumulate(current, scratch, backend, |j| (j, stay));
                kernel::accumulate(current, scratch, backend, |j| {
                    (j ^ t, if set(j) { up } else { down })
                });
            }
            Self::Rz { theta, .. } => {
                let (sin, cos) = (theta / 2.0).sin_cos();
                let one = Amplitude::new(cos, sin);
                let zero = Amplitude::new(cos, -sin);
                kernel::accumulate(current, scratch, backend, |j| {
                    (j, if set(j) { one } else { zero })
                });
            }
            Self::Mcnot { controls, .. } => {
                let mask = ControlMask::new(controls);
                kernel::accumulate(current, scratch, backend, |j| {
                    (if mask.all_set(j) { j ^ t } else { j }, ONE)
                });
            }
            Self::Mcphase { controls, .. } => {
                let mask = ControlMask::new(controls).with(target);
                kernel::accumulate(current, scratch, backend, |j| {
                    (j, if mask.all_set(j) { NEG_ONE } else { ONE })
                });
            }
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        for c in self.controls() {
            write!(f, " {c}")?;
        }
        write!(f, " {}", self.target())?;
        match self.theta() {
            Some(theta) => write!(f, " {theta:.6}"),
            None => Ok(()),
        }
    }
}

/// Set of control qubits packed as a bit mask.
///
/// The single predicate behind every controlled gate: an empty set is
/// always satisfied. A qubit past the width of `usize` can never be |1⟩
/// in a basis index, so a mask holding one is never satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlMask(Option<usize>);

impl Default for ControlMask {
    fn default() -> Self {
        Self(Some(0))
    }
}

impl ControlMask {
    pub fn new(controls: &[usize]) -> Self {
        controls
            .iter()
            .fold(Self::default(), |mask, &c| mask.with(c))
    }

    /// Add one more required qubit.
    pub fn with(self, qubit: usize) -> Self {
        let bit = u32::try_from(qubit)
            .ok()
            .and_then(|shift| 1usize.checked_shl(shift));
        Self(self.0.zip(bit).map(|(mask, bit)| mask | bit))
    }

    #[inline(always)]
    pub fn all_set(&self, index: usize) -> bool {
        match self.0 {
            Some(mask) => index & mask == mask,
            None => false,
        }
    }
}

/// True when every qubit in `controls` is |1⟩ in basis state `index`.
pub fn controls_set(index: usize, controls: &[usize]) -> bool {
    ControlMask::new(controls).all_set(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::ZERO;
    use std::f64::consts::PI;

    fn run(gate: &Gate, current: &[Amplitude]) -> Vec<Amplitude> {
        let mut scratch = vec![ZERO; current.len()];
        gate.run(current, &mut scratch, Backend::Sequential);
        scratch
    }

    fn basis(dim: usize, index: usize) -> Vec<Amplitude> {
        let mut v = vec![ZERO; dim];
        v[index] = ONE;
        v
    }

    fn nearly_eq(a: Amplitude, b: Amplitude) -> bool {
        (a - b).norm() < 1e-12
    }

    #[test]
    fn test_controls_set() {
        assert!(controls_set(0b111, &[0, 1, 2]));
        assert!(!controls_set(0b101, &[0, 1]));
        assert!(controls_set(0b000, &[]));
        assert!(controls_set(0b100, &[2]));
    }

    #[test]
    fn test_controls_past_word_width_never_set() {
        assert!(!controls_set(0, &[64]));
        assert!(!controls_set(usize::MAX, &[0, usize::BITS as usize]));
        assert!(!controls_set(usize::MAX, &[usize::MAX]));
        assert!(!ControlMask::new(&[1]).with(200).all_set(usize::MAX));
        assert!(ControlMask::new(&[63]).all_set(1 << 63));
    }

    #[test]
    fn test_validate_rejects_non_finite_angle() {
        for theta in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = Gate::Rx { target: 0, theta }.validate(1).unwrap_err();
            assert!(matches!(err, IndexError::NonFiniteAngle { gate: "RX", .. }));
        }
        assert!(matches!(
            Gate::Rz { target: 0, theta: f64::NAN }.validate(1),
            Err(IndexError::NonFiniteAngle { gate: "RZ", .. })
        ));
        assert!(Gate::Ry { target: 0, theta: -1e300 }.validate(1).is_ok());
    }

    #[test]
    fn test_validate_out_of_range() {
        assert_eq!(
            Gate::Hadamard { target: 3 }.validate(3),
            Err(IndexError::OutOfRange { qubit: 3, num_qubits: 3 })
        );
        assert_eq!(
            Gate::cnot(4, 0).validate(3),
            Err(IndexError::OutOfRange { qubit: 4, num_qubits: 3 })
        );
        assert!(Gate::toffoli(0, 1, 2).validate(3).is_ok());
    }

    #[test]
    fn test_validate_overlap() {
        assert_eq!(
            Gate::cz(1, 1).validate(2),
            Err(IndexError::ControlIsTarget { qubit: 1 })
        );
        assert_eq!(
            Gate::Mcnot { controls: vec![0, 2, 0], target: 1 }.validate(3),
            Err(IndexError::DuplicateControl { qubit: 0 })
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(Gate::cnot(0, 1).name(), "CNOT");
        assert_eq!(Gate::toffoli(0, 1, 2).name(), "TOFFOLI");
        assert_eq!(Gate::Mcnot { controls: vec![], target: 0 }.name(), "MCNOT");
        assert_eq!(Gate::cz(0, 1).name(), "CZ");
        assert_eq!(Gate::Rx { target: 0, theta: 0.5 }.to_string(), "RX 0 0.500000");
        assert_eq!(Gate::toffoli(0, 1, 2).to_string(), "TOFFOLI 0 1 2");
    }

    #[test]
    fn test_pauli_y_phases() {
        let out = run(&Gate::PauliY { target: 0 }, &basis(2, 0));
        assert!(nearly_eq(out[1], I));
        let out = run(&Gate::PauliY { target: 0 }, &basis(2, 1));
        assert!(nearly_eq(out[0], NEG_I));
    }

    #[test]
    fn test_hadamard_on_one() {
        let out = run(&Gate::Hadamard { target: 0 }, &basis(2, 1));
        assert!(nearly_eq(out[0], H_COEF));
        assert!(nearly_eq(out[1], NEG_H_COEF));
    }

    #[test]
    fn test_ry_rotates_toward_one() {
        let out = run(&Gate::Ry { target: 0, theta: PI }, &basis(2, 0));
        assert!(nearly_eq(out[0], ZERO));
        assert!(nearly_eq(out[1], ONE));
        let out = run(&Gate::Ry { target: 0, theta: PI }, &basis(2, 1));
        assert!(nearly_eq(out[0], NEG_ONE));
    }

    #[test]
    fn test_rz_phases() {
        let theta = 0.7;
        let out = run(&Gate::Rz { target: 1, theta }, &basis(4, 2));
        assert!(nearly_eq(out[2], Amplitude::from_polar(1.0, theta / 2.0)));
        let out = run(&Gate::Rz { target: 1, theta }, &basis(4, 1));
        assert!(nearly_eq(out[1], Amplitude::from_polar(1.0, -theta / 2.0)));
    }

    #[test]
    fn test_mcphase_needs_target_set() {
        let gate = Gate::cz(0, 1);
        assert!(nearly_eq(run(&gate, &basis(4, 1))[1], ONE));
        assert!(nearly_eq(run(&gate, &basis(4, 3))[3], NEG_ONE));
    }
}
