//! Detail fetching.

use tokio_util::sync::CancellationToken;

use crate::error::{FolioError, Result};
use crate::record::Detail;
use crate::remote::{ContentApi, Routes, cancellable};

/// Fetch and validate one record's detail.
///
/// Returns `FolioError::Cancelled` when the token fires before or during
/// the request, and also when a response arrives after the token fired.
pub async fn fetch_detail<A: ContentApi>(
    api: &A,
    routes: &Routes,
    url: &str,
    token: &CancellationToken,
) -> Result<Detail> {
    let url = routes.detail_url(url)?;
    let body = cancellable(token, api.get_json(&url)).await?;
    if token.is_cancelled() {
        return Err(FolioError::Cancelled);
    }
    Detail::from_value(routes.kind(), &body)
}
