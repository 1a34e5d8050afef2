//! Entity structs returned by the query modules.

use chrono::{DateTime, Utc};
use gallery_common::{AlbumId, GalleryId, ImageId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Gallery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gallery {
    pub id: GalleryId,
    pub title: String,
}

// ---------------------------------------------------------------------------
// Album
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    /// Smallest image id in the album, `0` when the album is empty.
    /// Derived on every read, never stored.
    pub cover: u64,
}

impl Album {
    /// The cover image, if the album has any images.
    pub fn cover_image(&self) -> Option<ImageId> {
        (self.cover != 0).then_some(ImageId::new(self.cover))
    }
}

// ---------------------------------------------------------------------------
// Image
// ---------------------------------------------------------------------------

/// Image metadata. Listings never carry the stored bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Encoded blobs for a new image, written in a single transaction.
#[derive(Debug, Clone, Copy)]
pub struct NewImage<'a> {
    pub full: &'a [u8],
    pub thumbnail: &'a [u8],
    pub created_at: DateTime<Utc>,
}

/// Which stored rendition of an image to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageVariant {
    /// The full-resolution re-encode.
    Full,
    /// The bounded thumbnail.
    Thumbnail,
}

/// Stored JPEG bytes with the image's creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub data: Vec<u8>,
    pub created_at: Option<DateTime<Utc>>,
}
