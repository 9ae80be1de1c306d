//! Hashed collection types used throughout hudkit.
//!
//! Re-exports the AHash-backed maps and sets so that downstream crates do not
//! have to name the hasher themselves.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
