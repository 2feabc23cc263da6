use std::sync::Arc;

use crate::core::evaluate_probe;
use crate::data::ProbeResult;
use crate::effects::http::HttpClient;
use crate::error::{Error, Result};

/// Asks the server, once, whether the resource can be fetched in chunks.
pub struct CapabilityProber<C: HttpClient> {
    client: Arc<C>,
}

impl<C: HttpClient> CapabilityProber<C> {
    pub fn new(client: Arc<C>) -> Self { Self { client } }

    /// Single HEAD request, no retry. Transport failures surface as
    /// [`Error::Network`], capability gaps as their dedicated variants.
    pub async fn probe(&self, url: &str) -> Result<ProbeResult> {
        let head = self
            .client
            .head(url)
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let result = evaluate_probe(&head);
        match &result {
            Ok(probe) => tracing::info!(url, total_length = probe.total_length, "probe succeeded"),
            Err(err) => tracing::warn!(url, status = head.status, error = %err, "probe rejected"),
        }
        result
    }
}
