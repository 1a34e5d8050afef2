//! Bucket names and path descent for the gallery tree.
//!
//! ```text
//! <root>
//! └── galleries                      sequence → gallery ids
//!     └── <gallery id>               title
//!         └── albums                 sequence → album ids
//!             └── <album id>         title
//!                 └── images         sequence → image ids
//!                     └── <image id> description, full, thumbnail, created_at
//! ```
//!
//! Child collections live under reserved bucket names, so field keys never
//! collide with child identifiers. Descent reports the outermost missing
//! level as `NotFound`.

use gallery_common::{AlbumId, Entity, Error, GalleryId, ImageId, Result};
use rusqlite::Connection;

use crate::bucket::Bucket;
use crate::keys::encode_id;

pub const GALLERIES: &[u8] = b"galleries";
pub const ALBUMS: &[u8] = b"albums";
pub const IMAGES: &[u8] = b"images";

pub const TITLE: &[u8] = b"title";
pub const DESCRIPTION: &[u8] = b"description";
pub const FULL: &[u8] = b"full";
pub const THUMBNAIL: &[u8] = b"thumbnail";
pub const CREATED_AT: &[u8] = b"created_at";

/// Ensure the top-level galleries bucket exists. Idempotent.
pub fn ensure_tree(conn: &Connection) -> Result<()> {
    Bucket::root(conn).create_bucket_if_not_exists(GALLERIES)?;
    Ok(())
}

/// The top-level galleries collection.
pub fn galleries(conn: &Connection) -> Result<Bucket<'_>> {
    reserved(&Bucket::root(conn), GALLERIES)
}

pub fn gallery(conn: &Connection, gallery: GalleryId) -> Result<Bucket<'_>> {
    galleries(conn)?
        .bucket(&encode_id(gallery))?
        .ok_or_else(|| Error::not_found(Entity::Gallery, gallery))
}

pub fn albums(conn: &Connection, gallery_id: GalleryId) -> Result<Bucket<'_>> {
    reserved(&gallery(conn, gallery_id)?, ALBUMS)
}

pub fn album(conn: &Connection, gallery: GalleryId, album: AlbumId) -> Result<Bucket<'_>> {
    albums(conn, gallery)?
        .bucket(&encode_id(album))?
        .ok_or_else(|| Error::not_found(Entity::Album, album))
}

pub fn images(conn: &Connection, gallery: GalleryId, album_id: AlbumId) -> Result<Bucket<'_>> {
    reserved(&album(conn, gallery, album_id)?, IMAGES)
}

pub fn image(
    conn: &Connection,
    gallery: GalleryId,
    album: AlbumId,
    image: ImageId,
) -> Result<Bucket<'_>> {
    images(conn, gallery, album)?
        .bucket(&encode_id(image))?
        .ok_or_else(|| Error::not_found(Entity::Image, image))
}

/// Read a UTF-8 field; an absent field reads as the empty string.
pub fn text(bucket: &Bucket<'_>, key: &[u8]) -> Result<String> {
    match bucket.get(key)? {
        Some(bytes) => String::from_utf8(bytes).map_err(|e| {
            Error::Internal(format!(
                "field {} is not valid UTF-8: {e}",
                String::from_utf8_lossy(key)
            ))
        }),
        None => Ok(String::new()),
    }
}

/// A reserved child collection. Its absence means the tree is corrupt.
pub(crate) fn reserved<'c>(parent: &Bucket<'c>, name: &[u8]) -> Result<Bucket<'c>> {
    parent.bucket(name)?.ok_or_else(|| {
        Error::Internal(format!(
            "missing reserved bucket '{}'",
            String::from_utf8_lossy(name)
        ))
    })
}
