mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use std::time::Duration;

use anyhow::Result;
use reqwest::header::{ACCEPT, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::debug;

const AGENT: &str = concat!("spat-dashboard/", env!("CARGO_PKG_VERSION"));

/// Raw outcome of one upstream GET.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub ok: bool,
    pub text: String,
    /// Parsed body, `None` if the body was not JSON.
    pub json: Option<Value>,
}

impl UpstreamResponse {
    /// Builds a response from a body, parsing it as JSON when possible.
    pub fn from_body(status: u16, text: String) -> Self {
        let json = serde_json::from_str(&text).ok();
        Self {
            status,
            ok: (200..300).contains(&status),
            text,
            json,
        }
    }

    /// First `max_chars` characters of the body.
    pub fn preview(&self, max_chars: usize) -> String {
        self.text.chars().take(max_chars).collect()
    }
}

/// Query parameters of the SPaT gateway endpoints.
#[derive(Debug, Clone)]
pub struct UpstreamQuery<'a> {
    pub itst_id: Option<&'a str>,
    pub page_no: u32,
    pub num_of_rows: u32,
}

impl Default for UpstreamQuery<'_> {
    fn default() -> Self {
        Self {
            itst_id: None,
            page_no: 1,
            num_of_rows: 10,
        }
    }
}

/// Builds an endpoint URL with the gateway's paging parameters. The API key
/// is not part of it; [`auth::UrlParam`] appends that at send time.
pub fn build_upstream_url(base: &str, query: &UpstreamQuery<'_>) -> Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(base)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("type", "json")
            .append_pair("pageNo", &query.page_no.to_string())
            .append_pair("numOfRows", &query.num_of_rows.to_string());
        if let Some(itst_id) = query.itst_id {
            pairs.append_pair("itstId", itst_id);
        }
    }
    Ok(url)
}

/// GETs `url` and returns the status and body. A body that is not JSON is
/// not an error; transport failures and timeouts are.
pub async fn fetch_json<C: HttpClient>(
    client: &C,
    url: reqwest::Url,
    timeout: Duration,
) -> Result<UpstreamResponse> {
    debug!(url = %url, timeout_ms = timeout.as_millis() as u64, "Fetching upstream");

    let mut req = reqwest::Request::new(reqwest::Method::GET, url);
    *req.timeout_mut() = Some(timeout);
    let headers = req.headers_mut();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(AGENT));

    let resp = client.execute(req).await?;
    let status = resp.status().as_u16();
    let text = resp.text().await?;
    debug!(status, body_len = text.len(), "Upstream responded");

    let out = UpstreamResponse::from_body(status, text);
    if !out.ok || out.json.is_none() {
        debug!(body = %out.preview(200), "Upstream body preview");
    }
    Ok(out)
}

/// True when `err` wraps a reqwest timeout.
pub fn is_timeout(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|e| e.downcast_ref::<reqwest::Error>())
        .any(reqwest::Error::is_timeout)
}
