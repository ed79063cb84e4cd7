// SPDX-FileCopyrightText: 2026 Medibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared HTTP plumbing for the hosted model and vector index clients.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use medibot_core::MedibotError;

/// Builds a client that sends `header: value` on every request.
///
/// Uses reqwest's default timeout; the collaborators decide how long a
/// request may take.
pub(crate) fn client_with_header(
    header: &'static str,
    value: &str,
) -> Result<reqwest::Client, MedibotError> {
    let mut headers = HeaderMap::new();
    let mut value = HeaderValue::from_str(value)
        .map_err(|e| MedibotError::Config(format!("invalid {header} header value: {e}")))?;
    value.set_sensitive(true);
    headers.insert(HeaderName::from_static(header), value);

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| MedibotError::Provider {
            message: format!("failed to build HTTP client: {e}"),
            source: Some(Box::new(e)),
        })
}

/// Joins a base URL and a path without doubling the slash.
pub(crate) fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// POSTs `body` as JSON and decodes a JSON response.
///
/// `what` names the collaborator in error messages.
pub(crate) async fn post_json<T, B>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
    what: &str,
) -> Result<T, MedibotError>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| MedibotError::Provider {
            message: format!("{what} request failed: {e}"),
            source: Some(Box::new(e)),
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(MedibotError::Provider {
            message: format!("{what} returned HTTP {}: {body}", status.as_u16()),
            source: None,
        });
    }

    response.json::<T>().await.map_err(|e| MedibotError::Provider {
        message: format!("{what} returned an unreadable body: {e}"),
        source: Some(Box::new(e)),
    })
}
