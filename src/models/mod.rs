// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod catalog;
pub mod place;
pub mod review;

pub use catalog::ANY;
pub use place::*;
pub use review::*;
