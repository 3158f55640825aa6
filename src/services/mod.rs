pub mod errors;

pub use errors::{ServiceError, ServiceResult};

pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod delivery_assignments;
pub mod delivery_persons;
pub mod orders;
pub mod payments;
pub mod products;
pub mod seed;

