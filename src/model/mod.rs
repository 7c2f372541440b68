//! Backend records and display rows of the cockpit screens.

pub mod order;
pub mod user;

pub use order::*;
pub use user::*;
