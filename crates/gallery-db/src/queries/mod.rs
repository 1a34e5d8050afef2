//! Query modules, one per level of the tree.
//!
//! Every function takes an open connection (normally a transaction from
//! [`crate::tx`]) and addresses its target by descending from the root, so
//! a missing ancestor surfaces as `NotFound` for that ancestor.

pub mod albums;
pub mod galleries;
pub mod images;
