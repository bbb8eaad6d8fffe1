//! Reading and writing XML trees.
pub mod base;
