pub mod event;
pub mod health;
pub mod participant;
pub mod user;
pub mod wishlist;
