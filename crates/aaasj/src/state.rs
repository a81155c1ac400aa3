//! Application state.
//!
//! Shared resources handed to every request handler: the repositories, the
//! outbound clients, the rate limiter and the auth state.

use std::sync::{Arc, Mutex};

use aaasj_auth::{AuthConfig, AuthState, SessionStore};
use aaasj_core::albums::SharedAlbum;
use aaasj_core::events::EventItem;
use aaasj_core::security::FixedWindowLimiter;
use aaasj_core::storage::{AlbumRepository, EventRepository};

use crate::config::Config;
use crate::mail::{Mailer, ResendMailer};
use crate::photos::{AlbumPageFetcher, GooglePhotosLibrary, HttpAlbumFetcher, PhotosLibraryClient};
use crate::storage::JsonFileStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub event_repo: Arc<dyn EventRepository>,
    pub album_repo: Arc<dyn AlbumRepository>,
    pub album_fetcher: Arc<dyn AlbumPageFetcher>,
    pub photos_library: Arc<dyn PhotosLibraryClient>,
    /// `None` when `RESEND_API_KEY` is not set.
    pub mailer: Option<Arc<dyn Mailer>>,
    pub rate_limiter: Arc<Mutex<FixedWindowLimiter>>,
    pub auth: AuthState,
    pub config: Arc<Config>,
}

impl AppState {
    /// Builds the production state: JSON stores under the data directory,
    /// reqwest-backed clients and Google sign-in when configured.
    pub async fn from_config(config: Config, auth_config: AuthConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().build()?;

        let mailer = config
            .resend_api_key
            .as_deref()
            .map(|key| Arc::new(ResendMailer::new(http.clone(), key)) as Arc<dyn Mailer>);
        if mailer.is_none() {
            tracing::warn!("RESEND_API_KEY not set, scholarship applications will only be logged");
        }

        let auth = AuthState::new(Arc::new(SessionStore::new()), auth_config).await?;

        tracing::info!(
            data_dir = %config.data_dir.display(),
            static_dir = %config.static_dir.display(),
            "Using JSON file storage"
        );

        Ok(Self {
            event_repo: Arc::new(JsonFileStore::<EventItem>::new(config.events_file())),
            album_repo: Arc::new(JsonFileStore::<SharedAlbum>::new(config.albums_file())),
            album_fetcher: Arc::new(HttpAlbumFetcher::new()?),
            photos_library: Arc::new(GooglePhotosLibrary::new(http)),
            mailer,
            rate_limiter: Arc::new(Mutex::new(FixedWindowLimiter::new(
                config.rate_limit_max_requests,
                config.rate_limit_window(),
            ))),
            auth,
            config: Arc::new(config),
        })
    }

    pub fn with_album_fetcher(mut self, fetcher: Arc<dyn AlbumPageFetcher>) -> Self {
        self.album_fetcher = fetcher;
        self
    }

    pub fn with_photos_library(mut self, library: Arc<dyn PhotosLibraryClient>) -> Self {
        self.photos_library = library;
        self
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }
}

impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}
