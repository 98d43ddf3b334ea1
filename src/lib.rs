//! Creditline: customer credit limits and installment loans.
//!
//! Originates loans against a customer's revolving credit limit, schedules
//! equal-amount installments and allocates payments across them in due-date
//! order.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::customers;
pub use modules::loans;
