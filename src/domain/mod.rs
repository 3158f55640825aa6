pub mod approval;
pub mod auth;
pub mod bill;
pub mod customer;
pub mod customer_payment;
pub mod delivery_assignment;
pub mod delivery_person;
pub mod employee;
pub mod money;
pub mod order;
pub mod product;
