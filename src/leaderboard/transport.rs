//! HTTP seam for the leaderboard and auth services
//!
//! Both services speak JSON over POST, so one method covers them. The browser
//! implementation is `platform::http::FetchTransport`.

use crate::error::RemoteError;

/// One JSON POST round trip
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// POST `body` to `url` and return the response body on 2xx
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: String,
    ) -> Result<String, RemoteError>;
}

