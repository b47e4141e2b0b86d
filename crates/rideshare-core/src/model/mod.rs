//! Entity types shared by the guard, the validators and the store.
//!
//! Field names match the wire format. Numeric ids are assigned by the store;
//! an id of zero (or below) in a candidate means "not supplied".

pub mod car;
pub mod feedback;
pub mod passenger;
pub mod ride;
pub mod user;

pub use car::{Car, CarCategory, CarMake, CarModel};
pub use feedback::Feedback;
pub use passenger::Passenger;
pub use ride::Ride;
pub use user::User;

/// Store-assigned numeric identifier.
pub type Id = i64;

/// `true` if `id` looks like a real, store-assigned identifier.
pub fn is_present(id: Id) -> bool { id > 0 }
