//! Domain layer: money types, the settlement calculator and the processor port.

pub mod money;
pub mod order;
pub mod ports;
pub mod settlement;
