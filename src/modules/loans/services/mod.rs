mod installment_scheduler;
mod loan_service;
mod payment_allocator;

pub use installment_scheduler::InstallmentScheduler;
pub use loan_service::{LoanService, PaymentResult};
pub use payment_allocator::{Allocation, AllocationInterrupted, PaymentAllocator};
