//! The administrative procedures run by the scripts

pub mod deploy;
pub mod facilitator;
pub mod upgrade;
pub mod wiring;
