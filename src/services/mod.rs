pub mod availability;
pub mod booking;
pub mod catalog;
pub mod cleanup;
pub mod pricing;
pub mod scheduler;
