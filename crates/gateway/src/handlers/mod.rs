//! API handlers module

pub mod health;
pub mod leads;
pub mod universities;
