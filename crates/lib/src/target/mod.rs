//! Target descriptors.
//!
//! A target is a top-level build output (a game executable, the editor, a
//! dedicated server, ...). It names the root modules it needs; everything
//! else is pulled in through their dependencies.

mod types;

pub use types::*;
