pub mod bit_index;
pub mod gates;
pub mod kernel;
pub mod measurement;
pub mod simulator;
pub mod state;

// Convenience re-exports for library users
pub use bit_index::BitIndex;
pub use gates::{controls_set, ControlMask, Gate};
pub use kernel::Backend;
pub use measurement::Outcome;
pub use simulator::{Simulator, Slot};
pub use state::{Amplitude, StateVector};
