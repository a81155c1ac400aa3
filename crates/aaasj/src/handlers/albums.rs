//! Shared album handlers.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use aaasj_auth::{AdminUser, OptionalUser};
use aaasj_core::albums::{
    visible_albums, AlbumAction, AlbumError, CreateAlbumRequest, SharedAlbum, UpdateAlbumRequest,
};
use aaasj_core::storage::RepositoryError;

use crate::{
    handlers::{parse_json, AppError, RequestError},
    photos::scrape_album,
    state::AppState,
};

const ALBUM_NOT_FOUND: &str = "Album not found";

#[derive(Debug, Serialize)]
pub struct AlbumListResponse {
    pub albums: Vec<SharedAlbum>,
}

#[derive(Debug, Serialize)]
pub struct AlbumResponse {
    pub album: SharedAlbum,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAlbumQuery {
    pub id: Option<String>,
}

/// GET /api/photos/albums - members see every album, visitors the public ones.
pub async fn list_albums(
    OptionalUser(user): OptionalUser,
    State(state): State<AppState>,
) -> Result<Json<AlbumListResponse>, AppError> {
    let albums = state.album_repo.list_albums().await?;
    Ok(Json(AlbumListResponse {
        albums: visible_albums(albums, user.is_some()),
    }))
}

/// POST /api/photos/albums
pub async fn create_album(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AlbumResponse>, AppError> {
    let request: CreateAlbumRequest = parse_json(&body)?;
    let fetch_photos = request.fetch_photos;
    let mut album = request.into_album(Utc::now().timestamp_millis().to_string())?;

    if fetch_photos {
        album.photos = scrape_album(state.album_fetcher.as_ref(), &album.share_url).await;
    }

    state.album_repo.create_album(&album).await?;
    tracing::info!(
        album_id = %album.id,
        title = %album.title,
        photos = album.photos.len(),
        by = %admin.email,
        "Album created"
    );

    Ok(Json(AlbumResponse { album }))
}

/// PUT /api/photos/albums - re-scrapes an album or removes one photo.
pub async fn update_album(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AlbumResponse>, AppError> {
    let request: UpdateAlbumRequest = parse_json(&body)?;
    let album_id = request.album_id()?;

    let mut album = state
        .album_repo
        .get_album(album_id)
        .await?
        .ok_or(RequestError::NotFound(ALBUM_NOT_FOUND))?;

    match request.action()? {
        AlbumAction::FetchPhotos => {
            album.photos = scrape_album(state.album_fetcher.as_ref(), &album.share_url).await;
            tracing::info!(
                album_id = %album.id,
                photos = album.photos.len(),
                by = %admin.email,
                "Album photos refreshed"
            );
        }
        AlbumAction::RemovePhoto(photo_id) => {
            if album.remove_photo(&photo_id) {
                tracing::info!(album_id = %album.id, photo_id = %photo_id, by = %admin.email, "Photo removed");
            }
        }
    }

    state.album_repo.update_album(&album).await?;
    Ok(Json(AlbumResponse { album }))
}

/// DELETE /api/photos/albums?id=
pub async fn delete_album(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<DeleteAlbumQuery>,
) -> Result<StatusCode, AppError> {
    let id = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or(AlbumError::MissingIdParam)?;

    match state.album_repo.delete_album(&id).await {
        Ok(()) => {
            tracing::info!(album_id = %id, by = %admin.email, "Album deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(RepositoryError::NotFound { .. }) => Err(RequestError::NotFound(ALBUM_NOT_FOUND).into()),
        Err(e) => Err(e.into()),
    }
}
