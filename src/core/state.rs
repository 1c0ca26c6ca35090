/// One amplitude buffer of the simulator.
///
/// An n-qubit register has 2^n basis states and the buffer holds one
/// complex amplitude per basis state. The length is fixed at construction.
/// A normalized buffer satisfies Σ|αᵢ|² = 1; the simulator keeps two of
/// these and only the current one is expected to be normalized.
use num_complex::Complex64;

use crate::error::ConstructionError;

/// Complex amplitude of a basis state.
pub type Amplitude = Complex64;

pub(crate) const ZERO: Amplitude = Complex64::new(0.0, 0.0);
pub(crate) const ONE: Amplitude = Complex64::new(1.0, 0.0);

#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    num_qubits: usize,
    amplitudes: Vec<Amplitude>,
}

impl StateVector {
    /// All-zero buffer for `num_qubits` qubits.
    ///
    /// Fails instead of aborting when 2^num_qubits amplitudes cannot be
    /// addressed or allocated.
    pub fn zeroed(num_qubits: usize) -> Result<Self, ConstructionError> {
        let dim = u32::try_from(num_qubits)
            .ok()
            .and_then(|shift| 1usize.checked_shl(shift))
            .ok_or(ConstructionError::AllocationFailed { dim: usize::MAX })?;
        let mut amplitudes = Vec::new();
        amplitudes
            .try_reserve_exact(dim)
            .map_err(|_| ConstructionError::AllocationFailed { dim })?;
        amplitudes.resize(dim, ZERO);
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Buffer initialized to |0...0⟩.
    pub fn ground(num_qubits: usize) -> Result<Self, ConstructionError> {
        let mut sv = Self::zeroed(num_qubits)?;
        sv.amplitudes[0] = ONE;
        Ok(sv)
    }

    /// Wrap caller-supplied amplitudes. Length must already be 2^num_qubits.
    pub(crate) fn from_amplitudes(num_qubits: usize, amplitudes: Vec<Amplitude>) -> Self {
        debug_assert_eq!(amplitudes.len(), 1 << num_qubits);
        Self {
            num_qubits,
            amplitudes,
        }
    }

    #[inline(always)]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Dimension of the state space: 2^n
    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    #[inline(always)]
    pub fn amplitudes(&self) -> &[Amplitude] {
        &self.amplitudes
    }

    #[inline(always)]
    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Amplitude] {
        &mut self.amplitudes
    }

    /// Probability of basis state `index`: |αᵢ|². Zero for indices past the end.
    #[inline]
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes.get(index).map_or(0.0, |a| a.norm_sqr())
    }

    /// Σ|αᵢ|² over the buffer.
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Probability of measuring `qubit` as |1⟩, marginalized over the rest.
    pub fn marginal_probability_one(&self, qubit: usize) -> f64 {
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| qubit_bit(*i, qubit))
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Zero every amplitude.
    pub(crate) fn clear(&mut self) {
        self.amplitudes.fill(ZERO);
    }

    /// Reset to |0...0⟩
    pub(crate) fn reset(&mut self) {
        self.clear();
        self.amplitudes[0] = ONE;
    }
}

/// Value of `qubit` in basis state `index`. Qubit 0 is the least-significant bit.
#[inline(always)]
pub fn qubit_bit(index: usize, qubit: usize) -> bool {
    (index >> qubit) & 1 == 1
}
