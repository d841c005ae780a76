//! Application layer orchestrating payment requests.
//!
//! This module defines the `CheckoutService`, the entry point for every request
//! the client application makes. It validates input, runs the settlement
//! calculator and hands the results to a `PaymentProcessor` implementation.

pub mod checkout;
pub mod dto;
