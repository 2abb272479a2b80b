use std::time::Duration;

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use super::{AppState, error::ApiError};
use crate::fetch::UpstreamResponse;
use crate::meta::ItstMeta;
use crate::nearby::{NearbyItem, clamp_k, nearest};
use crate::payload::find_first_array;
use crate::services::signal_api::SignalFeed;
use crate::signals::{SignalSnapshot, reconcile};
use crate::signals::utility::now_kst_string;

pub const DEFAULT_TIMEOUT_MS: u64 = 25_000;
pub const MIN_TIMEOUT_MS: u64 = 2_000;

const REMAINING_TIME_NOTE: &str = "잔여시간(*RmdrCs)은 '현재 켜진 신호' 기준입니다. '다음 보행 시작까지 남은 시간'은 직접 제공되지 않으며, 관측 기반 추정이 필요합니다.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatParams {
    pub itst_id: Option<String>,
    pub timeout_ms: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedStatus {
    pub status: u16,
}

#[derive(Debug, Serialize)]
pub struct UpstreamStatus {
    pub timing: FeedStatus,
    pub phase: FeedStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatResponse {
    pub itst_id: String,
    #[serde(flatten)]
    pub meta: ItstMeta,
    #[serde(flatten)]
    pub snapshot: SignalSnapshot,
    pub fetched_at_kst: String,
    pub upstream: UpstreamStatus,
    pub note: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub k: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub items: Vec<NearbyItem>,
}

fn parse_finite(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Request timeout from the `timeoutMs` query value: at least 2 s, 25 s
/// when absent or unparseable.
pub fn request_timeout(raw: Option<&str>) -> Duration {
    let ms = parse_finite(raw)
        .map(|ms| ms.max(MIN_TIMEOUT_MS as f64) as u64)
        .unwrap_or(DEFAULT_TIMEOUT_MS);
    Duration::from_millis(ms)
}

fn records_of(resp: &UpstreamResponse, feed: SignalFeed) -> Result<&Value, ApiError> {
    resp.json.as_ref().ok_or_else(|| ApiError::NonJson {
        feed,
        upstream_status: resp.status,
        body_preview: resp.preview(super::error::BODY_PREVIEW_CHARS),
    })
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Fetches both SPaT feeds for one intersection and returns the reconciled view.
#[tracing::instrument(skip(state), fields(itst_id = params.itst_id.as_deref().unwrap_or("")))]
pub async fn get_spat(
    State(state): State<AppState>,
    Query(params): Query<SpatParams>,
) -> Result<Json<SpatResponse>, ApiError> {
    let itst_id = params.itst_id.as_deref().map(str::trim).unwrap_or_default();
    if itst_id.is_empty() {
        return Err(ApiError::BadRequest("missing itstId".to_string()));
    }
    let api = state.signals.as_ref().ok_or(ApiError::MissingApiKey)?;
    let timeout = request_timeout(params.timeout_ms.as_deref());

    let (timing, phase) = tokio::try_join!(
        api.fetch(SignalFeed::Timing, itst_id, timeout),
        api.fetch(SignalFeed::Phase, itst_id, timeout),
    )
    .map_err(ApiError::from_fetch)?;

    let timing_json = records_of(&timing, SignalFeed::Timing)?;
    let phase_json = records_of(&phase, SignalFeed::Phase)?;

    let (Some(timing_records), Some(phase_records)) =
        (find_first_array(timing_json), find_first_array(phase_json))
    else {
        return Err(ApiError::UnexpectedShape {
            timing_status: timing.status,
            phase_status: phase.status,
        });
    };

    let snapshot = reconcile(
        timing_records,
        phase_records,
        itst_id,
        Utc::now().timestamp_millis(),
    );
    let meta = state.meta.get(itst_id).cloned().unwrap_or_default();

    info!(
        items = snapshot.items.len(),
        age_sec = ?snapshot.age_sec,
        is_stale = snapshot.is_stale,
        "SPaT reconciled"
    );

    Ok(Json(SpatResponse {
        itst_id: itst_id.to_string(),
        meta,
        snapshot,
        fetched_at_kst: now_kst_string(false),
        upstream: UpstreamStatus {
            timing: FeedStatus {
                status: timing.status,
            },
            phase: FeedStatus {
                status: phase.status,
            },
        },
        note: REMAINING_TIME_NOTE,
    }))
}

/// Lists the intersections closest to a coordinate.
#[tracing::instrument(skip(state))]
pub async fn get_nearby(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let (Some(lat), Some(lon)) = (
        parse_finite(params.lat.as_deref()),
        parse_finite(params.lon.as_deref()),
    ) else {
        return Err(ApiError::BadRequest("invalid lat/lon".to_string()));
    };
    let k = clamp_k(parse_finite(params.k.as_deref()).map(|k| k.max(0.0) as usize));

    let items = nearest(&state.meta, lat, lon, k);
    Ok(Json(NearbyResponse { items }))
}
