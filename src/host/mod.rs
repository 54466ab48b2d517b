//! Host integration: capability traits, an in-memory host and the conversion driver.

pub mod capability;
pub mod convert;
pub mod memory;
