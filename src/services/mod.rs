pub mod auth;
pub mod hotels;
pub mod payments;
pub mod recommendations;
pub mod reservations;
pub mod users;
