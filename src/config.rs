//! Simulator configuration

use crate::error::ConstructionError;

/// log2 of the size of one amplitude in bytes (`Complex64`).
const AMPLITUDE_BYTES_LOG2: u32 = 4;

/// Largest register width any configuration may allow.
///
/// Two buffers of 2^34 amplitudes take 512 GiB. On narrow targets the
/// limit drops so that one buffer's byte size still fits in `isize`.
pub const HARD_QUBIT_LIMIT: usize = {
    let addressable = (usize::BITS - 1 - AMPLITUDE_BYTES_LOG2) as usize;
    if addressable < 34 {
        addressable
    } else {
        34
    }
};

/// Default maximum register width (two buffers of 2^30 amplitudes ≈ 32 GiB).
pub const DEFAULT_MAX_QUBITS: usize = if HARD_QUBIT_LIMIT < 30 {
    HARD_QUBIT_LIMIT
} else {
    30
};

/// Construction-time settings for a [`Simulator`](crate::core::Simulator).
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Widest register accepted at construction.
    ///
    /// Default: 30
    pub max_qubits: usize,

    /// Allow gate passes to run on the rayon thread pool.
    ///
    /// Default: true
    pub parallel: bool,

    /// Minimum number of qubits before passes are parallelized.
    ///
    /// Smaller registers run single-threaded to avoid scheduling overhead.
    ///
    /// Default: 14
    pub parallel_threshold: usize,

    /// Allowed deviation of Σ|a|² from 1 for a caller-supplied initial state.
    ///
    /// Default: 1e-9
    pub norm_tolerance: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            parallel: true,
            parallel_threshold: 14,
            norm_tolerance: 1e-9,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that never leaves the calling thread.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Default::default()
        }
    }

    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn with_parallel_threshold(mut self, qubits: usize) -> Self {
        self.parallel_threshold = qubits;
        self
    }

    pub fn with_norm_tolerance(mut self, tolerance: f64) -> Self {
        self.norm_tolerance = tolerance;
        self
    }

    /// True when a register of `num_qubits` should use the parallel kernels.
    #[inline]
    pub fn use_parallel(&self, num_qubits: usize) -> bool {
        self.parallel && num_qubits >= self.parallel_threshold
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConstructionError> {
        if self.max_qubits == 0 {
            return Err(ConstructionError::InvalidConfig(
                "max_qubits must be at least 1".to_string(),
            ));
        }
        if self.max_qubits > HARD_QUBIT_LIMIT {
            return Err(ConstructionError::InvalidConfig(format!(
                "max_qubits must be <= {HARD_QUBIT_LIMIT}, got {}",
                self.max_qubits
            )));
        }
        if !self.norm_tolerance.is_finite() || self.norm_tolerance < 0.0 {
            return Err(ConstructionError::InvalidConfig(format!(
                "norm_tolerance must be a non-negative finite number, got {}",
                self.norm_tolerance
            )));
        }
        Ok(())
    }
}
