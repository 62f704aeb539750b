//! Profile-image handling for rosterdeck.
//!
//! Two pieces:
//! - [`ImageStore`]: an ephemeral directory holding downloaded images for the
//!   duration of one run, deleted wholesale at teardown.
//! - [`ImageFetcher`]: downloads the best available avatar rendition for one
//!   user into the store. Every failure degrades to "no image"; a missing
//!   photo must never block the rest of the run.

mod acquire;
mod store;

pub use acquire::{upgrade_image_url, ImageFetcher};
pub use store::ImageStore;

/// Errors that can occur while acquiring an image.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("no image URL available")]
    NoCandidate,

    #[error("image download failed: {0}")]
    Download(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for image acquisition.
pub type AssetResult<T> = std::result::Result<T, AssetError>;
