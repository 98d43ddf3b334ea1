mod installment_repository;
mod loan_repository;
mod memory;

pub use installment_repository::{InstallmentStore, MySqlInstallmentRepository};
pub use loan_repository::{LoanStore, MySqlLoanRepository};
pub use memory::{InMemoryInstallmentStore, InMemoryLoanStore};
