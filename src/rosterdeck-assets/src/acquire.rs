//! Best-effort avatar download.

use std::path::PathBuf;
use std::time::Duration;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::store::ImageStore;
use crate::{AssetError, AssetResult};

/// Token substituted for a URL's trailing numeric size suffix.
const HIGH_RES_SUFFIX: &str = "512";

/// Downloads profile images into an [`ImageStore`].
#[derive(Clone)]
pub struct ImageFetcher {
    client: reqwest::Client,
}

impl ImageFetcher {
    /// Create a fetcher with its own HTTP client.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    /// Fetch the best available avatar for one user into the store.
    ///
    /// Picks the first non-empty URL candidate, requests the 512px rendition,
    /// and streams the body to `<store>/<user_id>.jpg`. Any failure (no
    /// candidate, network error, bad status, write error) yields `None` so
    /// the caller's slide is still produced, just without a photo.
    pub async fn acquire(
        &self,
        store: &ImageStore,
        user_id: &str,
        candidates: &[&str],
    ) -> Option<PathBuf> {
        match self.try_acquire(store, user_id, candidates).await {
            Ok(path) => {
                debug!("Downloaded profile image for {}", user_id);
                Some(path)
            }
            Err(AssetError::NoCandidate) => {
                debug!("No profile image URL for user {}", user_id);
                None
            }
            Err(err) => {
                warn!("Error downloading profile image for {}: {}", user_id, err);
                None
            }
        }
    }

    async fn try_acquire(
        &self,
        store: &ImageStore,
        user_id: &str,
        candidates: &[&str],
    ) -> AssetResult<PathBuf> {
        let url = candidates
            .iter()
            .copied()
            .find(|u| !u.is_empty())
            .ok_or(AssetError::NoCandidate)?;
        let url = upgrade_image_url(url);
        let dest = store.image_path(user_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AssetError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AssetError::Download(format!("HTTP {}", response.status())));
        }

        let mut file = tokio::fs::File::create(&dest).await?;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| AssetError::Download(e.to_string()))?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(dest)
    }
}

impl Default for ImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Request a higher-resolution rendition by swapping a trailing numeric
/// suffix for `512`. URLs without a trailing numeric suffix pass through
/// unchanged; the result is not validated against the remote.
pub fn upgrade_image_url(url: &str) -> String {
    let trimmed = url.trim_end_matches(|c: char| c.is_ascii_digit());
    if trimmed.len() == url.len() {
        url.to_string()
    } else {
        format!("{trimmed}{HIGH_RES_SUFFIX}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_upgrade_replaces_trailing_digits() {
        assert_eq!(
            upgrade_image_url("https://a.example/ada_192"),
            "https://a.example/ada_512"
        );
        assert_eq!(
            upgrade_image_url("https://a.example/ada_72"),
            "https://a.example/ada_512"
        );
    }

    #[test]
    fn test_upgrade_without_suffix_is_noop() {
        assert_eq!(
            upgrade_image_url("https://a.example/ada_original.jpg"),
            "https://a.example/ada_original.jpg"
        );
        assert_eq!(upgrade_image_url(""), "");
    }

    #[tokio::test]
    async fn test_acquire_streams_to_store() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/avatars/U1_512"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg bytes".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let store = ImageStore::create(dir.path().join("images")).expect("store");
        let fetcher = ImageFetcher::new();

        // The 192px candidate is upgraded to the 512px rendition.
        let url = format!("{}/avatars/U1_192", server.uri());
        let path = fetcher
            .acquire(&store, "U1", &[url.as_str()])
            .await
            .expect("image path");

        assert_eq!(std::fs::read(&path).expect("read"), b"jpeg bytes");
        assert_eq!(path, store.image_path("U1"));
    }

    #[tokio::test]
    async fn test_acquire_prefers_first_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/avatars/original"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"full res".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let store = ImageStore::create(dir.path().join("images")).expect("store");
        let fetcher = ImageFetcher::new();

        let original = format!("{}/avatars/original", server.uri());
        let fallback = format!("{}/avatars/fallback_192", server.uri());
        let path = fetcher
            .acquire(&store, "U1", &["", original.as_str(), fallback.as_str()])
            .await
            .expect("image path");

        assert_eq!(std::fs::read(&path).expect("read"), b"full res");
    }

    #[tokio::test]
    async fn test_acquire_failure_yields_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/avatars/U1_512"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let store = ImageStore::create(dir.path().join("images")).expect("store");
        let fetcher = ImageFetcher::new();

        let url = format!("{}/avatars/U1_512", server.uri());
        assert!(fetcher.acquire(&store, "U1", &[url.as_str()]).await.is_none());
    }

    #[tokio::test]
    async fn test_acquire_without_candidates_yields_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ImageStore::create(dir.path().join("images")).expect("store");
        let fetcher = ImageFetcher::new();

        assert!(fetcher.acquire(&store, "U1", &[]).await.is_none());
        assert!(fetcher.acquire(&store, "U1", &["", ""]).await.is_none());
    }
}
