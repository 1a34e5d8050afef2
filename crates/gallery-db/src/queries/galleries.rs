//! Gallery CRUD operations.

use gallery_common::{Entity, Error, GalleryId, Result};
use rusqlite::Connection;

use crate::keys::{decode_id, encode_id};
use crate::layout::{self, ALBUMS, TITLE};
use crate::models::Gallery;

/// List all galleries in ascending id order.
pub fn list_galleries(conn: &Connection) -> Result<Vec<Gallery>> {
    layout::galleries(conn)?
        .buckets()?
        .into_iter()
        .map(|(key, bucket)| {
            Ok(Gallery {
                id: GalleryId::new(decode_id(&key)?),
                title: layout::text(&bucket, TITLE)?,
            })
        })
        .collect()
}

/// Get a single gallery.
pub fn get_gallery(conn: &Connection, id: GalleryId) -> Result<Gallery> {
    let bucket = layout::gallery(conn, id)?;
    Ok(Gallery {
        id,
        title: layout::text(&bucket, TITLE)?,
    })
}

/// Create a gallery with its (empty) album collection.
pub fn create_gallery(conn: &Connection, title: &str) -> Result<GalleryId> {
    let root = layout::galleries(conn)?;
    let id = GalleryId::new(root.next_sequence()?);

    let gallery = root.create_bucket(&encode_id(id))?;
    gallery.create_bucket(ALBUMS)?;
    gallery.put(TITLE, title.as_bytes())?;

    Ok(id)
}

/// Replace a gallery's title.
pub fn set_gallery_title(conn: &Connection, id: GalleryId, title: &str) -> Result<()> {
    layout::gallery(conn, id)?.put(TITLE, title.as_bytes())
}

/// Delete a gallery and every album and image beneath it.
pub fn delete_gallery(conn: &Connection, id: GalleryId) -> Result<()> {
    if layout::galleries(conn)?.delete_bucket(&encode_id(id))? {
        Ok(())
    } else {
        Err(Error::not_found(Entity::Gallery, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support;

    #[test]
    fn create_get_list() {
        let conn = test_support::conn();
        assert!(list_galleries(&conn).unwrap().is_empty());

        let id = create_gallery(&conn, "hello").unwrap();
        assert_eq!(id, GalleryId::new(1));

        let gallery = get_gallery(&conn, id).unwrap();
        assert_eq!(gallery.title, "hello");
        assert_eq!(list_galleries(&conn).unwrap(), vec![gallery]);
    }

    #[test]
    fn set_title() {
        let conn = test_support::conn();
        let id = create_gallery(&conn, "hello").unwrap();
        set_gallery_title(&conn, id, "world").unwrap();
        assert_eq!(get_gallery(&conn, id).unwrap().title, "world");
    }

    #[test]
    fn missing_gallery_is_not_found() {
        let conn = test_support::conn();
        let id = GalleryId::new(7);
        assert!(get_gallery(&conn, id).unwrap_err().is_not_found(Entity::Gallery));
        assert!(set_gallery_title(&conn, id, "x")
            .unwrap_err()
            .is_not_found(Entity::Gallery));
        assert!(delete_gallery(&conn, id)
            .unwrap_err()
            .is_not_found(Entity::Gallery));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let conn = test_support::conn();
        let first = create_gallery(&conn, "a").unwrap();
        let second = create_gallery(&conn, "b").unwrap();
        delete_gallery(&conn, second).unwrap();
        delete_gallery(&conn, first).unwrap();

        let third = create_gallery(&conn, "c").unwrap();
        assert_eq!(third, GalleryId::new(3));
    }

    #[test]
    fn list_orders_by_numeric_id() {
        let conn = test_support::conn();
        for i in 1..=12 {
            create_gallery(&conn, &format!("g{i}")).unwrap();
        }
        let ids: Vec<u64> = list_galleries(&conn)
            .unwrap()
            .iter()
            .map(|g| g.id.get())
            .collect();
        assert_eq!(ids, (1..=12).collect::<Vec<_>>());
    }
}
