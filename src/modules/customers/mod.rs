pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::Customer;
pub use repositories::{CustomerStore, InMemoryCustomerStore, MySqlCustomerRepository};
pub use services::CustomerService;
