//! Nearest-intersection lookup by linear scan.

use serde::Serialize;

use crate::meta::IntersectionMeta;
use crate::signals::utility::haversine_meters;

pub const DEFAULT_K: usize = 5;
pub const MAX_K: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyItem {
    pub itst_id: String,
    pub itst_nm: String,
    pub lat: f64,
    pub lon: f64,
    pub distance_m: f64,
}

/// Clamps a requested result count into `1..=MAX_K`.
pub fn clamp_k(k: Option<usize>) -> usize {
    k.unwrap_or(DEFAULT_K).clamp(1, MAX_K)
}

/// Returns up to `k` intersections closest to `(lat, lon)`, nearest first.
/// Intersections without both coordinates are skipped.
pub fn nearest(meta: &IntersectionMeta, lat: f64, lon: f64, k: usize) -> Vec<NearbyItem> {
    let mut items: Vec<NearbyItem> = meta
        .iter()
        .filter_map(|(id, m)| {
            let (item_lat, item_lon) = (m.lat?, m.lon?);
            Some(NearbyItem {
                itst_id: id.to_string(),
                itst_nm: m.itst_nm.clone().unwrap_or_else(|| "-".to_string()),
                lat: item_lat,
                lon: item_lon,
                distance_m: haversine_meters(lat, lon, item_lat, item_lon),
            })
        })
        .collect();

    items.sort_by(|a, b| {
        a.distance_m
            .total_cmp(&b.distance_m)
            .then_with(|| a.itst_id.cmp(&b.itst_id))
    });
    items.truncate(k);
    items
}
