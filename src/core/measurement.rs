use std::fmt;

use super::bit_index::basis_label;

/// Most likely basis state of a register and its probability.
///
/// Produced by [`Simulator::max_amplitude`](super::Simulator::max_amplitude);
/// reading it never changes the simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    /// Basis state index; bit k is qubit k.
    pub basis_state: usize,
    /// |amplitude|² of that basis state.
    pub probability: f64,
    num_qubits: usize,
}

impl Outcome {
    pub(crate) fn new(basis_state: usize, probability: f64, num_qubits: usize) -> Self {
        Self {
            basis_state,
            probability,
            num_qubits,
        }
    }

    /// Bit string of the outcome with qubit 0 leftmost.
    pub fn label(&self) -> String {
        basis_label(self.basis_state, self.num_qubits)
    }

    /// Classical value of `qubit` in this outcome.
    pub fn qubit(&self, qubit: usize) -> bool {
        (self.basis_state >> qubit) & 1 == 1
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|{}⟩  probability: {:.6}", self.label(), self.probability)
    }
}
