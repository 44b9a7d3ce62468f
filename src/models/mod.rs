//! Data models for the blogs API.

mod blog;

pub use blog::*;
