/// Double-buffered state-vector simulator.
///
/// `Simulator` owns two equally sized amplitude buffers. At any moment one
/// of them is *current* (the latest state) and the other is *scratch*
/// (all zeros). A gate reads the current buffer, accumulates into the
/// scratch buffer, zeroes the old current buffer and swaps the roles, so
/// no gate ever writes the buffer it reads from.
use std::fmt;

use tracing::{debug, trace, warn};

use super::bit_index::basis_label;
use super::gates::Gate;
use super::kernel::{self, Backend};
use super::measurement::Outcome;
use super::state::{Amplitude, StateVector};
use crate::config::SimulatorConfig;
use crate::error::{ConstructionError, IndexError};

/// Identifies one of the two buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Even,
    Odd,
}

impl Slot {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Self::Even => Self::Odd,
            Self::Odd => Self::Even,
        }
    }
}

/// Gate methods validate their qubit indices before touching any buffer
/// and return `&mut Self`, so calls chain with `?`:
///
/// ```rust
/// use twinstate::core::Simulator;
///
/// # fn main() -> Result<(), twinstate::Error> {
/// let mut sim = Simulator::new(2)?;
/// sim.hadamard(0)?.cnot(0, 1)?;
///
/// let outcome = sim.max_amplitude();
/// assert_eq!(outcome.basis_state, 0);
/// assert!((outcome.probability - 0.5).abs() < 1e-12);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Simulator {
    even: StateVector,
    odd: StateVector,
    /// Buffer holding the latest state. Flips once per applied gate.
    current: Slot,
    config: SimulatorConfig,
    gate_count: u64,
}

impl Simulator {
    /// Create a simulator for `num_qubits` qubits, initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Result<Self, ConstructionError> {
        Self::with_config(num_qubits, None, SimulatorConfig::default())
    }

    /// Create a simulator whose initial state is `amplitudes`.
    ///
    /// The vector must hold exactly 2^num_qubits entries and be normalized.
    /// It is copied as is; no renormalization happens.
    pub fn with_amplitudes(
        num_qubits: usize,
        amplitudes: Vec<Amplitude>,
    ) -> Result<Self, ConstructionError> {
        Self::with_config(num_qubits, Some(amplitudes), SimulatorConfig::default())
    }

    /// Fully specified constructor.
    pub fn with_config(
        num_qubits: usize,
        initial: Option<Vec<Amplitude>>,
        config: SimulatorConfig,
    ) -> Result<Self, ConstructionError> {
        config.validate()?;
        if num_qubits == 0 {
            return Err(ConstructionError::NoQubits);
        }
        if num_qubits > config.max_qubits {
            return Err(ConstructionError::TooManyQubits {
                requested: num_qubits,
                max: config.max_qubits,
            });
        }

        let dim = 1usize << num_qubits;
        let even = match initial {
            None => StateVector::ground(num_qubits)?,
            Some(amplitudes) => {
                if amplitudes.len() != dim {
                    return Err(ConstructionError::LengthMismatch {
                        expected: dim,
                        actual: amplitudes.len(),
                    });
                }
                let total: f64 = amplitudes.iter().map(|a| a.norm_sqr()).sum();
                // written so that NaN fails the check
                if !((total - 1.0).abs() <= config.norm_tolerance) {
                    return Err(ConstructionError::NotNormalized { norm: total.sqrt() });
                }
                StateVector::from_amplitudes(num_qubits, amplitudes)
            }
        };

        debug!(
            num_qubits,
            dim,
            parallel = config.use_parallel(num_qubits),
            "simulator created"
        );

        Ok(Self {
            even,
            odd: StateVector::zeroed(num_qubits)?,
            current: Slot::Even,
            config,
            gate_count: 0,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn num_qubits(&self) -> usize {
        self.even.num_qubits()
    }

    /// Dimension of the state space: 2^n
    pub fn dim(&self) -> usize {
        self.even.dim()
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Gates applied since construction or the last [`reset`](Self::reset).
    pub fn gate_count(&self) -> u64 {
        self.gate_count
    }

    /// Which buffer currently holds the latest state.
    pub fn current_slot(&self) -> Slot {
        self.current
    }

    /// Read-only view of either buffer.
    pub fn buffer(&self, slot: Slot) -> &[Amplitude] {
        match slot {
            Slot::Even => self.even.amplitudes(),
            Slot::Odd => self.odd.amplitudes(),
        }
    }

    /// Amplitudes of the latest state.
    pub fn amplitudes(&self) -> &[Amplitude] {
        self.buffer(self.current)
    }

    /// The inactive buffer. All zeros between gate calls.
    pub fn scratch(&self) -> &[Amplitude] {
        self.buffer(self.current.other())
    }

    /// The latest state as a [`StateVector`].
    pub fn state(&self) -> &StateVector {
        match self.current {
            Slot::Even => &self.even,
            Slot::Odd => &self.odd,
        }
    }

    // ── Single-Qubit Gates ────────────────────────────────────────────────

    pub fn pauli_x(&mut self, target: usize) -> Result<&mut Self, IndexError> {
        self.apply(&Gate::PauliX { target })
    }

    pub fn pauli_y(&mut self, target: usize) -> Result<&mut Self, IndexError> {
        self.apply(&Gate::PauliY { target })
    }

    pub fn pauli_z(&mut self, target: usize) -> Result<&mut Self, IndexError> {
        self.apply(&Gate::PauliZ { target })
    }

    pub fn hadamard(&mut self, target: usize) -> Result<&mut Self, IndexError> {
        self.apply(&Gate::Hadamard { target })
    }

    pub fn rx(&mut self, target: usize, theta: f64) -> Result<&mut Self, IndexError> {
        self.apply(&Gate::Rx { target, theta })
    }

    pub fn ry(&mut self, target: usize, theta: f64) -> Result<&mut Self, IndexError> {
        self.apply(&Gate::Ry { target, theta })
    }

    pub fn rz(&mut self, target: usize, theta: f64) -> Result<&mut Self, IndexError> {
        self.apply(&Gate::Rz { target, theta })
    }

    // ── Controlled Gates ──────────────────────────────────────────────────

    pub fn cnot(&mut self, control: usize, target: usize) -> Result<&mut Self, IndexError> {
        self.apply(&Gate::cnot(control, target))
    }

    pub fn toffoli(
        &mut self,
        control0: usize,
        control1: usize,
        target: usize,
    ) -> Result<&mut Self, IndexError> {
        self.apply(&Gate::toffoli(control0, control1, target))
    }

    /// Flip `target` when every qubit in `controls` is |1⟩.
    pub fn mcnot(&mut self, controls: &[usize], target: usize) -> Result<&mut Self, IndexError> {
        self.apply(&Gate::Mcnot {
            controls: controls.to_vec(),
            target,
        })
    }

    pub fn cz(&mut self, control: usize, target: usize) -> Result<&mut Self, IndexError> {
        self.apply(&Gate::cz(control, target))
    }

    /// Negate basis states where every control and `target` are |1⟩.
    pub fn mcphase(&mut self, controls: &[usize], target: usize) -> Result<&mut Self, IndexError> {
        self.apply(&Gate::Mcphase {
            controls: controls.to_vec(),
            target,
        })
    }

    // ── Gate Application ──────────────────────────────────────────────────

    /// Apply `gate` to the register.
    ///
    /// On error nothing changes: buffers, slot and gate count are untouched.
    pub fn apply(&mut self, gate: &Gate) -> Result<&mut Self, IndexError> {
        if let Err(err) = gate.validate(self.num_qubits()) {
            warn!(gate = %gate, %err, "gate rejected");
            return Err(err);
        }

        let backend = Backend::select(self.config.use_parallel(self.num_qubits()));
        let (current, scratch) = match self.current {
            Slot::Even => (&mut self.even, &mut self.odd),
            Slot::Odd => (&mut self.odd, &mut self.even),
        };
        gate.run(current.amplitudes(), scratch.amplitudes_mut(), backend);
        // the old current buffer is the next gate's destination
        kernel::clear(current.amplitudes_mut(), backend);

        self.current = self.current.other();
        self.gate_count += 1;
        trace!(gate = %gate, %backend, slot = ?self.current, "gate applied");
        Ok(self)
    }

    /// Apply each gate in order, stopping at the first invalid one.
    ///
    /// Gates before the failing one stay applied.
    pub fn apply_all<'a, I>(&mut self, gates: I) -> Result<&mut Self, IndexError>
    where
        I: IntoIterator<Item = &'a Gate>,
    {
        for gate in gates {
            self.apply(gate)?;
        }
        Ok(self)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Most probable basis state of the current buffer.
    ///
    /// Scans by increasing index and only replaces the best candidate on a
    /// strictly greater probability, so ties resolve to the lowest index.
    pub fn max_amplitude(&self) -> Outcome {
        let mut best = Outcome::new(0, 0.0, self.num_qubits());
        for (i, amp) in self.amplitudes().iter().enumerate() {
            let p = amp.norm_sqr();
            if p > best.probability {
                best = Outcome::new(i, p, self.num_qubits());
            }
        }
        best
    }

    /// Probability of every basis state, without any collapse.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes().iter().map(|a| a.norm_sqr()).collect()
    }

    pub fn probability(&self, index: usize) -> f64 {
        self.state().probability(index)
    }

    /// Σ|α|² of the current buffer (≈ 1 for a valid state).
    pub fn total_probability(&self) -> f64 {
        self.state().total_probability()
    }

    /// Probability of `qubit` reading |1⟩.
    pub fn qubit_probability_one(&self, qubit: usize) -> Result<f64, IndexError> {
        if qubit >= self.num_qubits() {
            return Err(IndexError::OutOfRange {
                qubit,
                num_qubits: self.num_qubits(),
            });
        }
        Ok(self.state().marginal_probability_one(qubit))
    }

    // ── State Control ─────────────────────────────────────────────────────

    /// Return to |0...0⟩ with a zeroed scratch buffer and gate count 0.
    pub fn reset(&mut self) {
        let (current, scratch) = match self.current {
            Slot::Even => (&mut self.even, &mut self.odd),
            Slot::Odd => (&mut self.odd, &mut self.even),
        };
        current.reset();
        scratch.clear();
        self.gate_count = 0;
        debug!(num_qubits = self.num_qubits(), "simulator reset");
    }
}

/// Lists every basis state with both buffers (even, odd) and its label.
impl fmt::Display for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Simulator ({} qubits, dim={}, current={:?}):",
            self.num_qubits(),
            self.dim(),
            self.current
        )?;
        writeln!(f, "  even                        odd                         state")?;
        let rows = self.even.amplitudes().iter().zip(self.odd.amplitudes());
        for (i, (even, odd)) in rows.enumerate() {
            writeln!(
                f,
                "  {:<26}  {:<26}  |{}⟩",
                fmt_amplitude(even),
                fmt_amplitude(odd),
                basis_label(i, self.num_qubits())
            )?;
        }
        Ok(())
    }
}

fn fmt_amplitude(a: &Amplitude) -> String {
    if a.im >= 0.0 {
        format!("{:.6} + {:.6}i", a.re, a.im)
    } else {
        format!("{:.6} - {:.6}i", a.re, a.im.abs())
    }
}
