//! Object construction: the code that turns recognised values into header
//! objects on the caller's arena.

pub mod actions;
mod construct;
pub mod materialize;
pub mod uri;

pub use construct::construct;
