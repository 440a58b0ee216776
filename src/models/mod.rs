//! Domain models for Yardgate

pub mod driver;
pub mod enums;
pub mod gate;
pub mod slot;
pub mod staff;
