//! Loader configuration

pub mod coercion;

pub use coercion::*;
