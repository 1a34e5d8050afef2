//! The gallery store: one transaction per operation over the bucket tree.
//!
//! [`GalleryStore`] is a cheap handle (a pool plus ingest settings) that is
//! cloned into every caller. Reads run in snapshot transactions, writes in
//! serialized ones; image uploads are decoded and resized before the write
//! transaction opens so the write lock is held only for the inserts.

use std::path::Path;

use chrono::Utc;
use gallery_common::{AlbumId, Error, GalleryId, ImageId, Result};
use gallery_db::models::{Album, Gallery, Image, ImageBlob, ImageVariant, NewImage};
use gallery_db::pool::{init_memory_pool, init_pool, DbPool};
use gallery_db::queries;
use gallery_db::tx;

use crate::images::{self, IngestOptions};

#[derive(Clone)]
pub struct GalleryStore {
    pool: DbPool,
    ingest: IngestOptions,
}

impl std::fmt::Debug for GalleryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryStore")
            .field("pool_size", &self.pool.max_size())
            .field("ingest", &self.ingest)
            .finish()
    }
}

impl GalleryStore {
    /// Open (creating if needed) the store file at `path`.
    pub fn open(path: impl AsRef<Path>, ingest: IngestOptions) -> Result<Self> {
        let path = path.as_ref();
        let pool = init_pool(&path.to_string_lossy())?;
        tracing::info!("Opened gallery store at {}", path.display());
        Ok(Self::from_pool(pool, ingest))
    }

    /// Open a private in-memory store.
    pub fn open_in_memory(ingest: IngestOptions) -> Result<Self> {
        Ok(Self::from_pool(init_memory_pool()?, ingest))
    }

    pub fn from_pool(pool: DbPool, ingest: IngestOptions) -> Self {
        Self { pool, ingest }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn ingest_options(&self) -> &IngestOptions {
        &self.ingest
    }

    // ------------------------------------------------------------------
    // Galleries
    // ------------------------------------------------------------------

    pub fn list_galleries(&self) -> Result<Vec<Gallery>> {
        tx::read(&self.pool, queries::galleries::list_galleries)
    }

    pub fn get_gallery(&self, gallery: GalleryId) -> Result<Gallery> {
        tx::read(&self.pool, |conn| queries::galleries::get_gallery(conn, gallery))
    }

    pub fn create_gallery(&self, title: &str) -> Result<GalleryId> {
        let id = tx::write(&self.pool, |conn| {
            queries::galleries::create_gallery(conn, title)
        })?;
        tracing::info!(gallery = %id, "Created gallery");
        Ok(id)
    }

    pub fn set_gallery_title(&self, gallery: GalleryId, title: &str) -> Result<()> {
        tx::write(&self.pool, |conn| {
            queries::galleries::set_gallery_title(conn, gallery, title)
        })
    }

    /// Delete a gallery with all of its albums and images.
    pub fn delete_gallery(&self, gallery: GalleryId) -> Result<()> {
        tx::write(&self.pool, |conn| {
            queries::galleries::delete_gallery(conn, gallery)
        })?;
        tracing::info!(gallery = %gallery, "Deleted gallery");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Albums
    // ------------------------------------------------------------------

    pub fn list_albums(&self, gallery: GalleryId) -> Result<Vec<Album>> {
        tx::read(&self.pool, |conn| queries::albums::list_albums(conn, gallery))
    }

    pub fn get_album(&self, gallery: GalleryId, album: AlbumId) -> Result<Album> {
        tx::read(&self.pool, |conn| {
            queries::albums::get_album(conn, gallery, album)
        })
    }

    pub fn create_album(&self, gallery: GalleryId, title: &str) -> Result<AlbumId> {
        let id = tx::write(&self.pool, |conn| {
            queries::albums::create_album(conn, gallery, title)
        })?;
        tracing::info!(gallery = %gallery, album = %id, "Created album");
        Ok(id)
    }

    pub fn set_album_title(&self, gallery: GalleryId, album: AlbumId, title: &str) -> Result<()> {
        tx::write(&self.pool, |conn| {
            queries::albums::set_album_title(conn, gallery, album, title)
        })
    }

    /// Delete an album with all of its images.
    pub fn delete_album(&self, gallery: GalleryId, album: AlbumId) -> Result<()> {
        tx::write(&self.pool, |conn| {
            queries::albums::delete_album(conn, gallery, album)
        })?;
        tracing::info!(gallery = %gallery, album = %album, "Deleted album");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Images
    // ------------------------------------------------------------------

    /// Image metadata of an album; never includes the stored bytes.
    pub fn list_images(&self, gallery: GalleryId, album: AlbumId) -> Result<Vec<Image>> {
        tx::read(&self.pool, |conn| {
            queries::images::list_images(conn, gallery, album)
        })
    }

    /// Decode, thumbnail, and store an uploaded image.
    ///
    /// Nothing is written when decoding fails. The parent gallery and album
    /// are checked again inside the write transaction, so a concurrent
    /// delete during the (slow) ingest step yields `NotFound` rather than an
    /// orphan.
    pub fn add_image(&self, gallery: GalleryId, album: AlbumId, raw: &[u8]) -> Result<ImageId> {
        let ingested = images::ingest(raw, &self.ingest).map_err(|e| {
            tracing::warn!(gallery = %gallery, album = %album, "Rejected upload: {}", e);
            e
        })?;

        let new_image = NewImage {
            full: &ingested.full,
            thumbnail: &ingested.thumbnail,
            created_at: Utc::now(),
        };

        let id = tx::write(&self.pool, |conn| {
            queries::images::add_image(conn, gallery, album, &new_image)
        })?;

        tracing::info!(
            gallery = %gallery,
            album = %album,
            image = %id,
            width = ingested.width,
            height = ingested.height,
            bytes = ingested.full.len() + ingested.thumbnail.len(),
            "Added image"
        );
        Ok(id)
    }

    /// Metadata of a single image.
    pub fn get_image_info(
        &self,
        gallery: GalleryId,
        album: AlbumId,
        image: ImageId,
    ) -> Result<Image> {
        tx::read(&self.pool, |conn| {
            queries::images::get_image(conn, gallery, album, image)
        })
    }

    /// The full-resolution JPEG.
    pub fn get_image(
        &self,
        gallery: GalleryId,
        album: AlbumId,
        image: ImageId,
    ) -> Result<ImageBlob> {
        self.get_blob(gallery, album, image, ImageVariant::Full)
    }

    /// The bounded thumbnail JPEG.
    pub fn get_thumbnail(
        &self,
        gallery: GalleryId,
        album: AlbumId,
        image: ImageId,
    ) -> Result<ImageBlob> {
        self.get_blob(gallery, album, image, ImageVariant::Thumbnail)
    }

    pub fn get_blob(
        &self,
        gallery: GalleryId,
        album: AlbumId,
        image: ImageId,
        variant: ImageVariant,
    ) -> Result<ImageBlob> {
        tx::read(&self.pool, |conn| {
            queries::images::get_image_blob(conn, gallery, album, image, variant)
        })
    }

    pub fn set_image_description(
        &self,
        gallery: GalleryId,
        album: AlbumId,
        image: ImageId,
        description: &str,
    ) -> Result<()> {
        tx::write(&self.pool, |conn| {
            queries::images::set_image_description(conn, gallery, album, image, description)
        })
    }

    pub fn delete_image(&self, gallery: GalleryId, album: AlbumId, image: ImageId) -> Result<()> {
        tx::write(&self.pool, |conn| {
            queries::images::delete_image(conn, gallery, album, image)
        })
        .map_err(|e| {
            if !matches!(e, Error::NotFound { .. }) {
                tracing::error!(gallery = %gallery, album = %album, image = %image, "Delete failed: {}", e);
            }
            e
        })?;
        tracing::info!(gallery = %gallery, album = %album, image = %image, "Deleted image");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_common::Entity;

    #[test]
    fn in_memory_store_round_trip() {
        let store = GalleryStore::open_in_memory(IngestOptions::default()).unwrap();
        let g = store.create_gallery("hello").unwrap();
        let a = store.create_album(g, "A").unwrap();
        assert_eq!(store.list_albums(g).unwrap().len(), 1);

        store.delete_gallery(g).unwrap();
        assert!(store
            .list_albums(g)
            .unwrap_err()
            .is_not_found(Entity::Gallery));
        assert!(store.get_album(g, a).is_err());
    }

    #[test]
    fn clones_share_the_pool() {
        let store = GalleryStore::open_in_memory(IngestOptions::default()).unwrap();
        let clone = store.clone();
        let g = clone.create_gallery("shared").unwrap();
        assert_eq!(store.get_gallery(g).unwrap().title, "shared");
    }

    #[test]
    fn in_memory_store_serializes_concurrent_callers() {
        let store = GalleryStore::open_in_memory(IngestOptions::default()).unwrap();
        let g = store.create_gallery("g").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for k in 0..50 {
                        store.create_album(g, &format!("{n}-{k}"))?;
                        store.list_albums(g)?;
                    }
                    Ok::<_, Error>(())
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        assert_eq!(store.list_albums(g).unwrap().len(), 400);
    }

    #[test]
    fn rejected_upload_writes_nothing() {
        let store = GalleryStore::open_in_memory(IngestOptions::default()).unwrap();
        let g = store.create_gallery("g").unwrap();
        let a = store.create_album(g, "a").unwrap();

        assert!(matches!(
            store.add_image(g, a, b"nope"),
            Err(Error::Decode(_))
        ));
        assert!(store.list_images(g, a).unwrap().is_empty());
    }
}
