//! Utilities Module - shared infrastructure
//!
//! - `route`: dotted route parsing and get/set over a YAML tree

pub mod route;
