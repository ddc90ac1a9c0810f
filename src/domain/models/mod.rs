pub mod user;
pub mod wishlist;
pub mod event;
pub mod participant;
pub mod matching;
pub mod notification;
