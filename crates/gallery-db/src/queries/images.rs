//! Image operations, scoped under an album.

use gallery_common::{AlbumId, Entity, Error, GalleryId, ImageId, Result};
use rusqlite::Connection;

use crate::bucket::Bucket;
use crate::keys::{decode_id, decode_timestamp, encode_id, encode_timestamp};
use crate::layout::{self, CREATED_AT, DESCRIPTION, FULL, THUMBNAIL};
use crate::models::{Image, ImageBlob, ImageVariant, NewImage};

/// List image metadata of an album in ascending id order.
pub fn list_images(conn: &Connection, gallery: GalleryId, album: AlbumId) -> Result<Vec<Image>> {
    layout::images(conn, gallery, album)?
        .buckets()?
        .into_iter()
        .map(|(key, bucket)| {
            Ok(Image {
                id: ImageId::new(decode_id(&key)?),
                description: layout::text(&bucket, DESCRIPTION)?,
                created_at: created_at(&bucket)?,
            })
        })
        .collect()
}

/// Store a new image: both renditions, an empty description, and the
/// creation time are written under one freshly sequenced id.
pub fn add_image(
    conn: &Connection,
    gallery: GalleryId,
    album: AlbumId,
    image: &NewImage<'_>,
) -> Result<ImageId> {
    let images = layout::images(conn, gallery, album)?;
    let id = ImageId::new(images.next_sequence()?);

    let bucket = images.create_bucket(&encode_id(id))?;
    bucket.put(THUMBNAIL, image.thumbnail)?;
    bucket.put(FULL, image.full)?;
    bucket.put(DESCRIPTION, b"")?;
    bucket.put(CREATED_AT, &encode_timestamp(image.created_at)?)?;

    Ok(id)
}

/// Get the metadata of a single image.
pub fn get_image(
    conn: &Connection,
    gallery: GalleryId,
    album: AlbumId,
    image: ImageId,
) -> Result<Image> {
    let bucket = layout::image(conn, gallery, album, image)?;
    Ok(Image {
        id: image,
        description: layout::text(&bucket, DESCRIPTION)?,
        created_at: created_at(&bucket)?,
    })
}

/// Replace an image's description.
pub fn set_image_description(
    conn: &Connection,
    gallery: GalleryId,
    album: AlbumId,
    image: ImageId,
    description: &str,
) -> Result<()> {
    layout::image(conn, gallery, album, image)?.put(DESCRIPTION, description.as_bytes())
}

/// Delete an image and both of its renditions.
pub fn delete_image(
    conn: &Connection,
    gallery: GalleryId,
    album: AlbumId,
    image: ImageId,
) -> Result<()> {
    if layout::images(conn, gallery, album)?.delete_bucket(&encode_id(image))? {
        Ok(())
    } else {
        Err(Error::not_found(Entity::Image, image))
    }
}

/// Fetch the stored JPEG bytes of one rendition.
pub fn get_image_blob(
    conn: &Connection,
    gallery: GalleryId,
    album: AlbumId,
    image: ImageId,
    variant: ImageVariant,
) -> Result<ImageBlob> {
    let bucket = layout::image(conn, gallery, album, image)?;
    let key = match variant {
        ImageVariant::Full => FULL,
        ImageVariant::Thumbnail => THUMBNAIL,
    };

    let data = bucket.get(key)?.ok_or_else(|| {
        Error::Internal(format!(
            "image {image} is missing its {} rendition",
            String::from_utf8_lossy(key)
        ))
    })?;

    Ok(ImageBlob {
        data,
        created_at: created_at(&bucket)?,
    })
}

fn created_at(bucket: &Bucket<'_>) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
    bucket
        .get(CREATED_AT)?
        .map(|raw| decode_timestamp(&raw))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::albums::{create_album, delete_album, get_album};
    use crate::queries::galleries::create_gallery;
    use crate::queries::test_support;
    use chrono::{TimeZone, Utc};

    fn new_image() -> NewImage<'static> {
        NewImage {
            full: b"full-bytes",
            thumbnail: b"thumb-bytes",
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    fn setup() -> (Connection, GalleryId, AlbumId) {
        let conn = test_support::conn();
        let g = create_gallery(&conn, "g").unwrap();
        let a = create_album(&conn, g, "a").unwrap();
        (conn, g, a)
    }

    #[test]
    fn add_list_get() {
        let (conn, g, a) = setup();
        let id = add_image(&conn, g, a, &new_image()).unwrap();
        assert_eq!(id, ImageId::new(1));

        let listed = list_images(&conn, g, a).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].description, "");
        assert_eq!(listed[0].created_at, Some(new_image().created_at));
        assert_eq!(get_image(&conn, g, a, id).unwrap(), listed[0]);
    }

    #[test]
    fn blobs_by_variant() {
        let (conn, g, a) = setup();
        let id = add_image(&conn, g, a, &new_image()).unwrap();

        let full = get_image_blob(&conn, g, a, id, ImageVariant::Full).unwrap();
        let thumb = get_image_blob(&conn, g, a, id, ImageVariant::Thumbnail).unwrap();
        assert_eq!(full.data, b"full-bytes");
        assert_eq!(thumb.data, b"thumb-bytes");
        assert_eq!(full.created_at, Some(new_image().created_at));
    }

    #[test]
    fn set_description() {
        let (conn, g, a) = setup();
        let id = add_image(&conn, g, a, &new_image()).unwrap();
        set_image_description(&conn, g, a, id, "sunset").unwrap();
        assert_eq!(get_image(&conn, g, a, id).unwrap().description, "sunset");
    }

    #[test]
    fn cover_tracks_smallest_existing_id() {
        let (conn, g, a) = setup();
        let ids: Vec<ImageId> = (0..12)
            .map(|_| add_image(&conn, g, a, &new_image()).unwrap())
            .collect();
        assert_eq!(get_album(&conn, g, a).unwrap().cover, 1);

        for id in &ids[..9] {
            delete_image(&conn, g, a, *id).unwrap();
        }
        // 10, 11, 12 remain; byte order must agree with numeric order.
        assert_eq!(get_album(&conn, g, a).unwrap().cover, 10);

        for id in &ids[9..] {
            delete_image(&conn, g, a, *id).unwrap();
        }
        assert_eq!(get_album(&conn, g, a).unwrap().cover, 0);
    }

    #[test]
    fn not_found_resolution_is_outermost_first() {
        let (conn, g, a) = setup();
        let i = ImageId::new(1);

        let err = get_image(&conn, GalleryId::new(99), AlbumId::new(99), i).unwrap_err();
        assert!(err.is_not_found(Entity::Gallery));

        let err = get_image(&conn, g, AlbumId::new(99), i).unwrap_err();
        assert!(err.is_not_found(Entity::Album));

        let err = get_image_blob(&conn, g, a, i, ImageVariant::Thumbnail).unwrap_err();
        assert!(err.is_not_found(Entity::Image));

        assert!(delete_image(&conn, g, a, i).unwrap_err().is_not_found(Entity::Image));
        assert!(set_image_description(&conn, g, a, i, "x")
            .unwrap_err()
            .is_not_found(Entity::Image));
    }

    #[test]
    fn album_delete_removes_image_entries() {
        let (conn, g, a) = setup();
        add_image(&conn, g, a, &new_image()).unwrap();
        delete_album(&conn, g, a).unwrap();

        let entries: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM entries WHERE key IN (?1, ?2)",
                [FULL, THUMBNAIL],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(entries, 0);
        assert!(list_images(&conn, g, a).unwrap_err().is_not_found(Entity::Album));
    }
}
