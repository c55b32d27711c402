//! Virtual filesystem helpers shared across host abstractions.

pub mod path;
