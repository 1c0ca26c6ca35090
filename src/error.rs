//! Error types for the twinstate simulator.
//!
//! Construction failures and gate index failures are kept apart so that
//! gate calls can return the narrower [`IndexError`]. Both convert into the
//! crate-level [`Error`] for callers that mix the two with `?`.

use thiserror::Error;

/// Result type alias for operations that may fail with either error kind.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a [`Simulator`](crate::core::Simulator).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstructionError {
    /// A register needs at least one qubit.
    #[error("qubit count must be at least 1")]
    NoQubits,

    /// Requested width exceeds the configured maximum.
    #[error("{requested} qubits requested, but at most {max} are supported")]
    TooManyQubits { requested: usize, max: usize },

    /// Initial amplitude vector does not have 2^n entries.
    #[error("initial state has {actual} amplitudes, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Initial amplitude vector is not normalized (Σ|a|² ≠ 1).
    #[error("initial state is not normalized (norm = {norm:.6})")]
    NotNormalized { norm: f64 },

    /// The two amplitude buffers could not be allocated.
    #[error("cannot allocate two buffers of {dim} amplitudes")]
    AllocationFailed { dim: usize },

    /// Configuration rejected by [`SimulatorConfig::validate`](crate::config::SimulatorConfig::validate).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised by gate calls with bad qubit indices or angles.
///
/// A gate that fails validation leaves the simulator untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    #[error("qubit {qubit} out of range for a {num_qubits}-qubit register")]
    OutOfRange { qubit: usize, num_qubits: usize },

    #[error("qubit {qubit} is used as both control and target")]
    ControlIsTarget { qubit: usize },

    #[error("control qubit {qubit} listed more than once")]
    DuplicateControl { qubit: usize },

    /// Rotation angle is NaN or infinite.
    #[error("{gate} angle must be finite, got {theta}")]
    NonFiniteAngle { gate: &'static str, theta: f64 },
}

/// Crate-level error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Index(#[from] IndexError),
}
