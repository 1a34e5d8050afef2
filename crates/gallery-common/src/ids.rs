//! Typed ID wrappers providing compile-time safety for entity identifiers.
//!
//! Each ID type is a newtype over the `u64` sequence value assigned by the
//! parent collection, preventing accidental misuse (e.g., passing an
//! `ImageId` where an `AlbumId` is expected).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Generate a newtype ID wrapper over `u64`.
///
/// The macro produces a struct with:
/// - `new(u64)` and `get()` for wrapping and unwrapping the sequence value
/// - `Debug`, `Clone`, `Copy`, ordering, `Hash`, `Serialize`, `Deserialize`
/// - `Display` and `FromStr` using the decimal form
/// - `From<u64>` and `Into<u64>` conversions
macro_rules! typed_id {
    ($($(#[doc = $doc:expr])* $name:ident),+ $(,)?) => {
        $(
            $(#[doc = $doc])*
            #[derive(
                Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name(u64);

            impl $name {
                /// Wrap a raw sequence value.
                #[must_use]
                pub const fn new(id: u64) -> Self {
                    Self(id)
                }

                /// Return the raw sequence value.
                #[must_use]
                pub const fn get(self) -> u64 {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl FromStr for $name {
                type Err = ParseIntError;

                fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                    s.parse::<u64>().map(Self)
                }
            }

            impl From<u64> for $name {
                fn from(id: u64) -> Self {
                    Self(id)
                }
            }

            impl From<$name> for u64 {
                fn from(id: $name) -> Self {
                    id.0
                }
            }
        )+
    };
}

typed_id! {
    /// Identifier of a gallery, assigned from the root sequence.
    GalleryId,
    /// Identifier of an album, assigned from its gallery's sequence.
    AlbumId,
    /// Identifier of an image, assigned from its album's sequence.
    ImageId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse() {
        let id = GalleryId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!("42".parse::<GalleryId>().unwrap(), id);
    }

    #[test]
    fn parse_rejects_non_numeric() {
        assert!("abc".parse::<AlbumId>().is_err());
        assert!("-1".parse::<ImageId>().is_err());
    }

    #[test]
    fn u64_conversions() {
        let id: ImageId = 9u64.into();
        let raw: u64 = id.into();
        assert_eq!(raw, 9);
        assert_eq!(id.get(), 9);
    }

    #[test]
    fn ordering_is_numeric() {
        assert!(ImageId::new(2) < ImageId::new(10));
    }

    #[test]
    fn serde_transparent() {
        let json = serde_json::to_string(&AlbumId::new(5)).unwrap();
        assert_eq!(json, "5");
        let back: AlbumId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AlbumId::new(5));
    }
}
