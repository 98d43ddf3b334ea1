mod customer_repository;
mod memory;

pub use customer_repository::{CustomerStore, MySqlCustomerRepository};
pub use memory::InMemoryCustomerStore;
