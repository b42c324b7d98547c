//! Shared data types

mod transactional;

pub use transactional::{NewProperty, NewUser, PropertyRow, ReservationRow, UserRow};
