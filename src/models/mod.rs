pub mod customer;
pub mod filter;
pub mod inventory;
pub mod order;
pub mod statistics;
pub mod user;
