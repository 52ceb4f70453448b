//! Configuration types
//!
//! Board-agnostic leveling configuration, storable as postcard binary data.

pub mod leveling;

pub use leveling::*;
