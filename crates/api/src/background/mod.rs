//! Background maintenance tasks.

pub mod sweep;

pub use sweep::start_sweep;
