//! Album CRUD operations, scoped under a gallery.

use gallery_common::{AlbumId, Entity, Error, GalleryId, Result};
use rusqlite::Connection;

use crate::bucket::Bucket;
use crate::keys::{decode_id, encode_id};
use crate::layout::{self, IMAGES, TITLE};
use crate::models::Album;

/// List the albums of a gallery in ascending id order, with derived covers.
pub fn list_albums(conn: &Connection, gallery: GalleryId) -> Result<Vec<Album>> {
    layout::albums(conn, gallery)?
        .buckets()?
        .into_iter()
        .map(|(key, bucket)| read_album(AlbumId::new(decode_id(&key)?), &bucket))
        .collect()
}

/// Get a single album.
pub fn get_album(conn: &Connection, gallery: GalleryId, album: AlbumId) -> Result<Album> {
    read_album(album, &layout::album(conn, gallery, album)?)
}

/// Create an album with its (empty) image collection.
pub fn create_album(conn: &Connection, gallery: GalleryId, title: &str) -> Result<AlbumId> {
    let albums = layout::albums(conn, gallery)?;
    let id = AlbumId::new(albums.next_sequence()?);

    let album = albums.create_bucket(&encode_id(id))?;
    album.create_bucket(IMAGES)?;
    album.put(TITLE, title.as_bytes())?;

    Ok(id)
}

/// Replace an album's title.
pub fn set_album_title(
    conn: &Connection,
    gallery: GalleryId,
    album: AlbumId,
    title: &str,
) -> Result<()> {
    layout::album(conn, gallery, album)?.put(TITLE, title.as_bytes())
}

/// Delete an album and every image beneath it.
pub fn delete_album(conn: &Connection, gallery: GalleryId, album: AlbumId) -> Result<()> {
    if layout::albums(conn, gallery)?.delete_bucket(&encode_id(album))? {
        Ok(())
    } else {
        Err(Error::not_found(Entity::Album, album))
    }
}

fn read_album(id: AlbumId, bucket: &Bucket<'_>) -> Result<Album> {
    Ok(Album {
        id,
        title: layout::text(bucket, TITLE)?,
        cover: cover(bucket)?,
    })
}

/// First image id in ascending order, `0` when the album is empty.
fn cover(album: &Bucket<'_>) -> Result<u64> {
    match layout::reserved(album, IMAGES)?.first_bucket_name()? {
        Some(key) => decode_id(&key),
        None => Ok(0),
    }
}
