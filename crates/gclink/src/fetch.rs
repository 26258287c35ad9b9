//! Byte fetching for artifacts that live outside the coordinator.
//!
//! Replays are not sent over the GC link. The coordinator only tells us
//! where they are (see [`MatchInfo::replay_url`]); downloading them is an
//! HTTP concern this crate leaves to a [`ByteFetcher`] you provide.

use std::future::Future;

use gclink_protocol::{Codec, MatchInfo, ReplayKind};
use gclink_session::CredentialProvider;
use gclink_transport::GcTransport;
use tracing::info;

use crate::{GcClient, GcError};

/// Errors a [`ByteFetcher`] can report.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("GET {url} returned {status}")]
    Status { url: String, status: u16 },

    /// The request did not complete.
    #[error("GET {url} failed: {reason}")]
    Failed { url: String, reason: String },
}

/// Downloads the bytes at a URL.
pub trait ByteFetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Locates replays through the coordinator and downloads them.
pub struct ReplayDownloader<F> {
    fetcher: F,
}

impl<F: ByteFetcher> ReplayDownloader<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Looks `match_id` up and downloads its replay artifact.
    ///
    /// The bytes are returned as served (bzip2-compressed).
    ///
    /// # Errors
    /// `MatchUnavailable` if the coordinator has no such match, plus
    /// whatever [`GcClient::match_details`] or the fetch itself returns.
    pub async fn download<T, A, C>(
        &self,
        client: &GcClient<T, A, C>,
        match_id: u64,
        kind: ReplayKind,
    ) -> Result<Vec<u8>, GcError>
    where
        T: GcTransport,
        A: CredentialProvider,
        C: Codec,
    {
        let info = client
            .match_details(match_id)
            .await?
            .match_info
            .ok_or(GcError::MatchUnavailable(match_id))?;
        self.fetch_replay(&info, kind).await
    }

    /// Downloads a replay artifact of an already known match.
    pub async fn fetch_replay(&self, info: &MatchInfo, kind: ReplayKind) -> Result<Vec<u8>, GcError> {
        let url = info.replay_url(kind);
        info!(match_id = info.match_id, %url, "downloading replay");
        Ok(self.fetcher.fetch(&url).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Records requested URLs and serves fixed bytes.
    #[derive(Default)]
    struct RecordingFetcher {
        urls: Mutex<Vec<String>>,
    }

    impl ByteFetcher for RecordingFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.urls.lock().push(url.to_owned());
            if url.ends_with(".meta.bz2") {
                Ok(b"BZh".to_vec())
            } else {
                Err(FetchError::Status {
                    url: url.to_owned(),
                    status: 404,
                })
            }
        }
    }

    fn sample_match() -> MatchInfo {
        MatchInfo {
            match_id: 3111014659,
            cluster: 123,
            replay_salt: 456,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_replay_requests_replay_url() {
        let downloader = ReplayDownloader::new(RecordingFetcher::default());
        let bytes = downloader
            .fetch_replay(&sample_match(), ReplayKind::Meta)
            .await
            .unwrap();
        assert_eq!(bytes, b"BZh");
        assert_eq!(
            downloader.fetcher.urls.lock().as_slice(),
            ["http://replay123.valve.net/570/3111014659_456.meta.bz2"]
        );
    }

    #[tokio::test]
    async fn test_fetch_replay_surfaces_fetch_error() {
        let downloader = ReplayDownloader::new(RecordingFetcher::default());
        let err = downloader
            .fetch_replay(&sample_match(), ReplayKind::Demo)
            .await
            .unwrap_err();
        assert!(matches!(err, GcError::Fetch(FetchError::Status { status: 404, .. })));
    }
}
