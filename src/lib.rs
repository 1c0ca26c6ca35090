//! # twinstate
//!
//! Dense state-vector simulator for small quantum registers.
//!
//! The register is held as two amplitude buffers of length 2^n. Every gate
//! reads one and accumulates into the other, then the roles swap, so gates
//! that move amplitude between basis states never overwrite their own input.
//! Measurement is deterministic: [`Simulator::max_amplitude`] reports the
//! most probable basis state without collapsing anything.
//!
//! ## Quick Start
//!
//! ```rust
//! use twinstate::core::Simulator;
//!
//! # fn main() -> twinstate::Result<()> {
//! // Create a 2-qubit simulator
//! let mut sim = Simulator::new(2)?;
//!
//! // Build a Bell state: (|00⟩ + |11⟩) / √2
//! sim.hadamard(0)?.cnot(0, 1)?;
//!
//! // Inspect probabilities
//! let probs = sim.probabilities();
//! println!("P(|00⟩) = {:.4}", probs[0]);
//! println!("P(|11⟩) = {:.4}", probs[3]);
//!
//! // Most likely outcome; ties go to the lowest index
//! println!("{}", sim.max_amplitude());
//! # Ok(())
//! # }
//! ```
//!
//! Basis index bit `k` is qubit `k`. Labels printed by this crate put
//! qubit 0 first, see [`core::BitIndex`].

pub mod config;
pub mod core;
pub mod error;

pub use config::SimulatorConfig;
pub use error::{ConstructionError, Error, IndexError, Result};
