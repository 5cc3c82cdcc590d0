// Application layer: owns the session's ledger and its backing store. Domain
// code stays pure and never logs.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
