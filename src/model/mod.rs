pub mod cart;
pub mod inventory;
pub mod order;
pub mod product;
pub mod purchase;
pub mod report;
pub mod user;
