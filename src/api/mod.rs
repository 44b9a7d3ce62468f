//! REST API module.
//!
//! Routes keep the paths and response shapes of the original Qatoto Blogs API.

mod blogs;
mod docs;

pub use blogs::*;
pub use docs::*;
