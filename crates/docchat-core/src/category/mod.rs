//! Category domain module.
//!
//! Categories are user-defined folders grouping uploaded documents and
//! scoping the documents a category chat answers from.

mod model;

pub use model::{Category, Document};
