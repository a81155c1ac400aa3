//! Outbound Google Photos clients: shared album pages and the Library API.

mod fetcher;
mod library;

pub use fetcher::{scrape_album, AlbumPageFetcher, HttpAlbumFetcher};
pub use library::{
    collect_albums, AlbumCollection, GooglePhotosLibrary, LibraryError, PhotosLibraryClient,
};

#[cfg(test)]
pub use fetcher::StaticPageFetcher;
#[cfg(test)]
pub use library::FakeLibrary;
