//! Module descriptors and the descriptor store.
//!
//! A module is a named, independently compilable unit. Its descriptor lists
//! what it depends on (publicly or privately), which include paths and
//! compile definitions it carries, and which engine versions it was written
//! against. Descriptors are registered into a [`ModuleStore`] once and never
//! mutated afterwards.

mod store;
mod types;

pub use store::{ModuleRef, ModuleStore};
pub use types::*;
