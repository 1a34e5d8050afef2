//! Gallery, album, and image routes, mounted under `/api/gallery`.
//!
//! Store calls are blocking (SQLite I/O and, for uploads, image decoding),
//! so every handler hands its work to the blocking thread pool.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use gallery_common::{AlbumId, Entity, Error, GalleryId, ImageId};
use gallery_db::models::{Album, Gallery, Image, ImageBlob};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::AppError;
use super::AppContext;
use crate::store::GalleryStore;

/// Create the gallery routes.
pub fn gallery_routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(list_galleries).post(create_gallery))
        .route(
            "/:gid",
            get(get_gallery).post(set_gallery_title).delete(delete_gallery),
        )
        .route("/:gid/albums", get(list_albums).post(create_album))
        .route(
            "/:gid/album/:aid",
            get(get_album).post(set_album_title).delete(delete_album),
        )
        .route("/:gid/album/:aid/images", get(list_images).post(upload_image))
        .route(
            "/:gid/album/:aid/image/:iid",
            get(get_image).post(set_image_description).delete(delete_image),
        )
        .route("/:gid/album/:aid/image/:iid/thumbnail", get(get_thumbnail))
}

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TitleRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct DescriptionRequest {
    pub description: String,
}

/// Returned by creates, setters, and deletes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdResponse {
    pub id: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImageQuery {
    /// Any non-empty value selects the thumbnail.
    #[serde(default)]
    pub thumb: Option<String>,
}

type ApiResult<T> = Result<T, AppError>;

// ============================================================================
// Helpers
// ============================================================================

fn parse_id<T: FromStr>(raw: &str, entity: Entity) -> Result<T, Error> {
    raw.parse()
        .map_err(|_| Error::Validation(format!("invalid {entity} id: {raw:?}")))
}

fn gallery_path(gid: &str) -> Result<GalleryId, Error> {
    parse_id(gid, Entity::Gallery)
}

fn album_path(gid: &str, aid: &str) -> Result<(GalleryId, AlbumId), Error> {
    Ok((gallery_path(gid)?, parse_id(aid, Entity::Album)?))
}

fn image_path(gid: &str, aid: &str, iid: &str) -> Result<(GalleryId, AlbumId, ImageId), Error> {
    let (g, a) = album_path(gid, aid)?;
    Ok((g, a, parse_id(iid, Entity::Image)?))
}

/// Run a store call on the blocking pool.
async fn blocking<T, F>(store: &GalleryStore, f: F) -> ApiResult<T>
where
    F: FnOnce(GalleryStore) -> gallery_common::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || f(store))
        .await
        .map_err(|e| Error::Internal(format!("store task failed: {e}")))?
        .map_err(AppError::from)
}

fn jpeg_response(blob: ImageBlob) -> Response {
    let mut response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static("image/jpeg"))],
        blob.data,
    )
        .into_response();

    if let Some(created_at) = blob.created_at {
        let http_date = created_at.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        if let Ok(value) = HeaderValue::from_str(&http_date) {
            response.headers_mut().insert(header::LAST_MODIFIED, value);
        }
    }

    response
}

// ============================================================================
// Galleries
// ============================================================================

async fn list_galleries(State(ctx): State<AppContext>) -> ApiResult<Json<Vec<Gallery>>> {
    blocking(&ctx.store, |store| store.list_galleries())
        .await
        .map(Json)
}

async fn create_gallery(
    State(ctx): State<AppContext>,
    Json(body): Json<TitleRequest>,
) -> ApiResult<(StatusCode, Json<IdResponse>)> {
    let id = blocking(&ctx.store, move |store| store.create_gallery(&body.title)).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id: id.get() })))
}

async fn get_gallery(
    State(ctx): State<AppContext>,
    Path(gid): Path<String>,
) -> ApiResult<Json<Gallery>> {
    let gallery = gallery_path(&gid)?;
    blocking(&ctx.store, move |store| store.get_gallery(gallery))
        .await
        .map(Json)
}

async fn set_gallery_title(
    State(ctx): State<AppContext>,
    Path(gid): Path<String>,
    Json(body): Json<TitleRequest>,
) -> ApiResult<Json<IdResponse>> {
    let gallery = gallery_path(&gid)?;
    blocking(&ctx.store, move |store| {
        store.set_gallery_title(gallery, &body.title)
    })
    .await?;
    Ok(Json(IdResponse { id: gallery.get() }))
}

async fn delete_gallery(
    State(ctx): State<AppContext>,
    Path(gid): Path<String>,
) -> ApiResult<Json<IdResponse>> {
    let gallery = gallery_path(&gid)?;
    blocking(&ctx.store, move |store| store.delete_gallery(gallery)).await?;
    Ok(Json(IdResponse { id: gallery.get() }))
}

// ============================================================================
// Albums
// ============================================================================

async fn list_albums(
    State(ctx): State<AppContext>,
    Path(gid): Path<String>,
) -> ApiResult<Json<Vec<Album>>> {
    let gallery = gallery_path(&gid)?;
    blocking(&ctx.store, move |store| store.list_albums(gallery))
        .await
        .map(Json)
}

async fn create_album(
    State(ctx): State<AppContext>,
    Path(gid): Path<String>,
    Json(body): Json<TitleRequest>,
) -> ApiResult<(StatusCode, Json<IdResponse>)> {
    let gallery = gallery_path(&gid)?;
    let id = blocking(&ctx.store, move |store| {
        store.create_album(gallery, &body.title)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id: id.get() })))
}

async fn get_album(
    State(ctx): State<AppContext>,
    Path((gid, aid)): Path<(String, String)>,
) -> ApiResult<Json<Album>> {
    let (gallery, album) = album_path(&gid, &aid)?;
    blocking(&ctx.store, move |store| store.get_album(gallery, album))
        .await
        .map(Json)
}

async fn set_album_title(
    State(ctx): State<AppContext>,
    Path((gid, aid)): Path<(String, String)>,
    Json(body): Json<TitleRequest>,
) -> ApiResult<Json<IdResponse>> {
    let (gallery, album) = album_path(&gid, &aid)?;
    blocking(&ctx.store, move |store| {
        store.set_album_title(gallery, album, &body.title)
    })
    .await?;
    Ok(Json(IdResponse { id: album.get() }))
}

async fn delete_album(
    State(ctx): State<AppContext>,
    Path((gid, aid)): Path<(String, String)>,
) -> ApiResult<Json<IdResponse>> {
    let (gallery, album) = album_path(&gid, &aid)?;
    blocking(&ctx.store, move |store| store.delete_album(gallery, album)).await?;
    Ok(Json(IdResponse { id: album.get() }))
}

// ============================================================================
// Images
// ============================================================================

async fn list_images(
    State(ctx): State<AppContext>,
    Path((gid, aid)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Image>>> {
    let (gallery, album) = album_path(&gid, &aid)?;
    blocking(&ctx.store, move |store| store.list_images(gallery, album))
        .await
        .map(Json)
}

/// The request body is the raw image file.
async fn upload_image(
    State(ctx): State<AppContext>,
    Path((gid, aid)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<IdResponse>)> {
    let (gallery, album) = album_path(&gid, &aid)?;
    let id = blocking(&ctx.store, move |store| {
        store.add_image(gallery, album, &body)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id: id.get() })))
}

async fn get_image(
    State(ctx): State<AppContext>,
    Path((gid, aid, iid)): Path<(String, String, String)>,
    Query(query): Query<ImageQuery>,
) -> ApiResult<Response> {
    let (gallery, album, image) = image_path(&gid, &aid, &iid)?;
    let thumb = query.thumb.is_some_and(|v| !v.is_empty());

    let blob = blocking(&ctx.store, move |store| {
        if thumb {
            store.get_thumbnail(gallery, album, image)
        } else {
            store.get_image(gallery, album, image)
        }
    })
    .await?;
    Ok(jpeg_response(blob))
}

async fn get_thumbnail(
    State(ctx): State<AppContext>,
    Path((gid, aid, iid)): Path<(String, String, String)>,
) -> ApiResult<Response> {
    let (gallery, album, image) = image_path(&gid, &aid, &iid)?;
    let blob = blocking(&ctx.store, move |store| {
        store.get_thumbnail(gallery, album, image)
    })
    .await?;
    Ok(jpeg_response(blob))
}

async fn set_image_description(
    State(ctx): State<AppContext>,
    Path((gid, aid, iid)): Path<(String, String, String)>,
    Json(body): Json<DescriptionRequest>,
) -> ApiResult<Json<IdResponse>> {
    let (gallery, album, image) = image_path(&gid, &aid, &iid)?;
    blocking(&ctx.store, move |store| {
        store.set_image_description(gallery, album, image, &body.description)
    })
    .await?;
    Ok(Json(IdResponse { id: image.get() }))
}

async fn delete_image(
    State(ctx): State<AppContext>,
    Path((gid, aid, iid)): Path<(String, String, String)>,
) -> ApiResult<Json<IdResponse>> {
    let (gallery, album, image) = image_path(&gid, &aid, &iid)?;
    blocking(&ctx.store, move |store| {
        store.delete_image(gallery, album, image)
    })
    .await?;
    Ok(Json(IdResponse { id: image.get() }))
}
