mod loan_controller;

pub use loan_controller::configure;
