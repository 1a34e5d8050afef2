//! Gallery-Common: shared types, identifiers, and errors.
//!
//! This crate is the foundational dependency for the other gallery crates:
//!
//! - **Typed IDs**: `u64` newtypes for galleries, albums, and images
//! - **Domain Types**: the entity kinds and the thumbnail interpolation set
//! - **Error Handling**: a unified error type and result alias
//!
//! # Examples
//!
//! ```
//! use gallery_common::{Entity, Error, GalleryId, Result};
//!
//! let id: GalleryId = "7".parse().unwrap();
//! assert_eq!(id.get(), 7);
//!
//! fn lookup(id: GalleryId) -> Result<()> {
//!     Err(Error::not_found(Entity::Gallery, id))
//! }
//! assert_eq!(lookup(id).unwrap_err().http_status(), 404);
//! ```

pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
