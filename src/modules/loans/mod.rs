pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Loan, LoanInstallment};
pub use repositories::{
    InMemoryInstallmentStore, InMemoryLoanStore, InstallmentStore, LoanStore,
    MySqlInstallmentRepository, MySqlLoanRepository,
};
pub use services::{InstallmentScheduler, LoanService, PaymentAllocator, PaymentResult};
