//! Word counting behind a loadable module boundary.
//!
//! A [`ModuleLoader`] produces a [`CountModule`]; the [`WordCountBinding`]
//! wraps that pair so a view never blocks or fails on counting. If the
//! module cannot be loaded or the call fails, the displayed count is 0.

pub mod binding;
pub mod error;
pub mod module;

pub use binding::{ActiveCounter, BuiltinLoader, ModuleLoader, WordCountBinding};
pub use error::WordCountError;
pub use module::{count_words, CountModule, WhitespaceModule};
