mod installment;
mod loan;

pub use installment::LoanInstallment;
pub use loan::Loan;
