use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::fetch::auth::UrlParam;
use crate::fetch::{BasicClient, HttpClient, UpstreamQuery, UpstreamResponse, build_upstream_url, fetch_json};
use crate::services::signal_api::{SignalApi, SignalFeed};

pub const DEFAULT_TIMING_ENDPOINT: &str =
    "https://t-data.seoul.go.kr/apig/apiman-gateway/tapi/v2xSignalPhaseTimingInformation/1.0";
pub const DEFAULT_PHASE_ENDPOINT: &str =
    "https://t-data.seoul.go.kr/apig/apiman-gateway/tapi/v2xSignalPhaseInformation/1.0";

/// Client for the Seoul t-data V2X SPaT endpoints.
pub struct TDataClient<C> {
    http: C,
    timing_endpoint: String,
    phase_endpoint: String,
    num_of_rows: u32,
}

impl TDataClient<UrlParam<BasicClient>> {
    /// Client for the public gateway, authenticating with `api_key`.
    pub fn new(api_key: String) -> Result<Self> {
        Ok(Self::with_client(UrlParam::apikey(BasicClient::new()?, api_key)))
    }
}

impl<C: HttpClient> TDataClient<C> {
    pub fn with_client(http: C) -> Self {
        Self {
            http,
            timing_endpoint: DEFAULT_TIMING_ENDPOINT.to_string(),
            phase_endpoint: DEFAULT_PHASE_ENDPOINT.to_string(),
            num_of_rows: UpstreamQuery::default().num_of_rows,
        }
    }

    pub fn with_endpoints(mut self, timing: impl Into<String>, phase: impl Into<String>) -> Self {
        self.timing_endpoint = timing.into();
        self.phase_endpoint = phase.into();
        self
    }

    pub fn with_num_of_rows(mut self, num_of_rows: u32) -> Self {
        self.num_of_rows = num_of_rows;
        self
    }

    fn endpoint(&self, feed: SignalFeed) -> &str {
        match feed {
            SignalFeed::Timing => &self.timing_endpoint,
            SignalFeed::Phase => &self.phase_endpoint,
        }
    }
}

#[async_trait]
impl<C: HttpClient> SignalApi for TDataClient<C> {
    async fn fetch(
        &self,
        feed: SignalFeed,
        itst_id: &str,
        timeout: Duration,
    ) -> Result<UpstreamResponse> {
        let url = build_upstream_url(
            self.endpoint(feed),
            &UpstreamQuery {
                itst_id: Some(itst_id),
                num_of_rows: self.num_of_rows,
                ..Default::default()
            },
        )?;

        let resp = fetch_json(&self.http, url, timeout).await?;
        if resp.ok {
            debug!(feed = feed.as_str(), status = resp.status, "Upstream feed fetched");
        } else {
            warn!(feed = feed.as_str(), status = resp.status, "Upstream feed returned error status");
        }
        Ok(resp)
    }
}
