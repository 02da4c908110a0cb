//! # Configuration Module
//!
//! This module centralizes the layout constants shared by the builder and the
//! reader. Constants that depend on each other are co-located and their
//! relationships are enforced through compile-time assertions.
//!
//! Runtime knobs (initial capacity, forced defaults, byte order) live on
//! [`crate::builder::BuilderOptions`]; everything here is part of the wire
//! format and must not change between writer and reader.
//!
//! ## Module Organization
//!
//! - [`constants`]: All numeric configuration values with dependency documentation

pub mod constants;
pub use constants::*;
