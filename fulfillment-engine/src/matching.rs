//! Vendor discovery
//!
//! Scans the vendor catalog around a requester location and annotates each
//! candidate with the geospatial estimates callers need to render a listing.
//! Pure read path; nothing here mutates state.

use crate::core::config::DEFAULT_MATCH_RADIUS_KM;
use crate::core::{EngineConfig, EngineError, EngineResult};
use crate::geo;
use crate::storage::EngineStore;
use chrono::Utc;
use serde::Serialize;
use shared::{GeoPoint, Vendor};
use std::cmp::Ordering;

/// One candidate vendor with location-derived estimates
#[derive(Debug, Clone, Serialize)]
pub struct VendorMatch {
    #[serde(flatten)]
    pub vendor: Vendor,
    pub distance_km: f64,
    pub is_deliverable: bool,
    pub estimated_fee: f64,
    /// `[low, high]` minutes until delivery
    pub estimated_eta_window: (u32, u32),
    pub is_open_now: bool,
}

/// Read-side vendor matcher
#[derive(Clone)]
pub struct VendorMatcher {
    store: EngineStore,
    default_radius_km: f64,
}

impl VendorMatcher {
    pub fn new(store: EngineStore) -> Self {
        Self {
            store,
            default_radius_km: DEFAULT_MATCH_RADIUS_KM,
        }
    }

    pub fn from_config(store: EngineStore, config: &EngineConfig) -> Self {
        Self {
            store,
            default_radius_km: config.default_match_radius_km,
        }
    }

    /// `match_vendors` with the configured fallback radius
    pub fn match_vendors_nearby(&self, point: GeoPoint) -> EngineResult<Vec<VendorMatch>> {
        self.match_vendors(point, self.default_radius_km)
    }

    /// Active vendors within `max_radius_km` of `point`, nearest first
    ///
    /// Inactive vendors never appear. Vendors inside the search radius but
    /// outside their own delivery radius are still returned with
    /// `is_deliverable: false` so takeaway remains visible.
    pub fn match_vendors(
        &self,
        point: GeoPoint,
        max_radius_km: f64,
    ) -> EngineResult<Vec<VendorMatch>> {
        if !point.is_valid() {
            return Err(EngineError::Validation(
                "search location has invalid coordinates".to_string(),
            ));
        }
        if !max_radius_km.is_finite() || max_radius_km <= 0.0 {
            return Err(EngineError::Validation(
                "search radius must be a positive number".to_string(),
            ));
        }

        let now = Utc::now();
        let mut matches: Vec<VendorMatch> = self
            .store
            .all_vendors()?
            .into_iter()
            .filter(|vendor| vendor.is_active)
            .filter_map(|vendor| {
                let distance = geo::distance_km(vendor.location, point);
                if distance > max_radius_km {
                    return None;
                }
                let is_open_now = vendor.is_open_at(now);
                let is_deliverable = geo::is_deliverable(&vendor, point);
                let estimated_fee = geo::delivery_fee(distance, &vendor.delivery_settings);
                let estimated_eta_window = geo::estimated_delivery_time(distance);
                Some(VendorMatch {
                    vendor,
                    distance_km: distance,
                    is_deliverable,
                    estimated_fee,
                    estimated_eta_window,
                    is_open_now,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(Ordering::Equal)
        });

        tracing::debug!(
            lat = point.lat,
            lng = point.lng,
            radius_km = max_radius_km,
            matched = matches.len(),
            "Vendor match"
        );
        Ok(matches)
    }
}
