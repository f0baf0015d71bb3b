//! Concurrency primitives shared by the journal: the spin lock guarding the
//! buffer and the cooperative shutdown signal driving the drain loop.

pub mod shutdown;
pub mod spin;

pub use shutdown::ShutdownSignal;
pub use spin::{SpinGuard, SpinMutex};
