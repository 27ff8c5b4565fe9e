//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates port interfaces to implement the caller-side payment
//! workflow. Each use case is a self-contained business operation.
//!
//! Use cases:
//! - `DepositDesk`: open a deposit (wallet + quote), later verify it

pub mod deposit;

pub use deposit::{DepositDesk, DepositError, DepositQuote, PaymentCheck};
