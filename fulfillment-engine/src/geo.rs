//! Geospatial matcher: distance, deliverability, fee, ETA
//!
//! Pure computation, no I/O. All functions are total over finite inputs;
//! callers reject non-finite or out-of-range coordinates first
//! (`GeoPoint::is_valid`).

use shared::{DeliverySettings, GeoPoint, Vendor};

/// Mean Earth radius, km
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance band carrying no per-km surcharge
const FREE_DISTANCE_KM: f64 = 5.0;

/// Surcharge per whole km beyond the free band
const PER_KM_CHARGE: f64 = 10.0;

/// Preparation time included in every estimate, minutes
const BASE_PREP_MINUTES: u32 = 30;

/// Travel minutes per km
const MINUTES_PER_KM: u32 = 5;

/// Width of the returned ETA window, minutes
const ETA_WINDOW_MINUTES: u32 = 10;

/// Great-circle distance between two points (haversine), km
///
/// Symmetric, and zero for identical points.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Whether the vendor delivers to `point`
pub fn is_deliverable(vendor: &Vendor, point: GeoPoint) -> bool {
    vendor.service_types.delivery
        && distance_km(vendor.location, point) <= vendor.delivery_settings.radius_km
}

/// Delivery fee for a trip of `distance_km`
///
/// Base charge plus a per-km surcharge for every whole km beyond the 5 km
/// free band, excess rounded up. The `free_delivery_above_amount` waiver is
/// deliberately not applied here; that is a downstream pricing concern.
pub fn delivery_fee(distance_km: f64, settings: &DeliverySettings) -> f64 {
    let excess = (distance_km - FREE_DISTANCE_KM).max(0.0);
    settings.base_delivery_charge + excess.ceil() * PER_KM_CHARGE
}

/// Estimated delivery window `[low, low + 10]`, minutes
pub fn estimated_delivery_time(distance_km: f64) -> (u32, u32) {
    let travel = distance_km.max(0.0).round() as u32 * MINUTES_PER_KM;
    let low = BASE_PREP_MINUTES + travel;
    (low, low + ETA_WINDOW_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{DayHours, ServiceTypes, Weekday};
    use std::collections::BTreeMap;

    fn vendor_at(lat: f64, lng: f64, radius_km: f64, delivery: bool) -> Vendor {
        let mut operating_hours = BTreeMap::new();
        operating_hours.insert(Weekday::Monday, DayHours::new("09:00", "17:00"));
        Vendor {
            id: "vendor-1".to_string(),
            name: "Test Vendor".to_string(),
            phone: None,
            location: GeoPoint::new(lat, lng),
            service_types: ServiceTypes {
                delivery,
                takeaway: true,
            },
            delivery_settings: DeliverySettings {
                radius_km,
                min_delivery_amount: 0.0,
                free_delivery_above_amount: 500.0,
                base_delivery_charge: 40.0,
            },
            operating_hours,
            is_active: true,
            created_at: 0,
        }
    }

    /// A point `km` kilometers due north of (0,0): 1 degree lat ≈ 111.19 km
    fn point_north_km(km: f64) -> GeoPoint {
        GeoPoint::new(km / (EARTH_RADIUS_KM * std::f64::consts::PI / 180.0), 0.0)
    }

    #[test]
    fn test_distance_zero_for_identical_points() {
        let p = GeoPoint::new(41.39, 2.17);
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = GeoPoint::new(41.39, 2.17);
        let b = GeoPoint::new(40.42, -3.70);
        let d1 = distance_km(a, b);
        let d2 = distance_km(b, a);
        assert!((d1 - d2).abs() < 1e-9);
        // Barcelona–Madrid is roughly 505 km
        assert!((d1 - 505.0).abs() < 10.0);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let d = distance_km(a, b);
        assert!((d - 111.19).abs() < 0.1);
    }

    #[test]
    fn test_deliverable_within_radius() {
        // Vendor at (0,0), radius 5 km; requester at 3 km
        let vendor = vendor_at(0.0, 0.0, 5.0, true);
        assert!(is_deliverable(&vendor, point_north_km(3.0)));
    }

    #[test]
    fn test_not_deliverable_beyond_radius() {
        // Requester at 7.2 km > 5 km radius
        let vendor = vendor_at(0.0, 0.0, 5.0, true);
        assert!(!is_deliverable(&vendor, point_north_km(7.2)));
    }

    #[test]
    fn test_not_deliverable_without_delivery_service() {
        let vendor = vendor_at(0.0, 0.0, 5.0, false);
        assert!(!is_deliverable(&vendor, point_north_km(1.0)));
    }

    #[test]
    fn test_fee_within_free_band_is_base_charge() {
        let settings = vendor_at(0.0, 0.0, 5.0, true).delivery_settings;
        assert_eq!(delivery_fee(3.0, &settings), 40.0);
        assert_eq!(delivery_fee(5.0, &settings), 40.0);
        assert_eq!(delivery_fee(0.0, &settings), 40.0);
    }

    #[test]
    fn test_fee_excess_rounds_up_per_km() {
        let settings = vendor_at(0.0, 0.0, 5.0, true).delivery_settings;
        // 5.1 km → 1 chargeable km
        assert_eq!(delivery_fee(5.1, &settings), 50.0);
        // 7.0 km → 2 chargeable km
        assert_eq!(delivery_fee(7.0, &settings), 60.0);
        // 7.2 km → 3 chargeable km
        assert_eq!(delivery_fee(7.2, &settings), 70.0);
    }

    #[test]
    fn test_fee_non_decreasing_in_distance() {
        let settings = vendor_at(0.0, 0.0, 5.0, true).delivery_settings;
        let mut previous = 0.0;
        for step in 0..100 {
            let fee = delivery_fee(step as f64 * 0.25, &settings);
            assert!(fee >= previous);
            previous = fee;
        }
    }

    #[test]
    fn test_waiver_field_does_not_change_fee() {
        let mut settings = vendor_at(0.0, 0.0, 5.0, true).delivery_settings;
        let fee_before = delivery_fee(8.0, &settings);
        settings.free_delivery_above_amount = 1.0;
        assert_eq!(delivery_fee(8.0, &settings), fee_before);
    }

    #[test]
    fn test_eta_window() {
        let (low, high) = estimated_delivery_time(0.0);
        assert_eq!((low, high), (30, 40));

        let (low, high) = estimated_delivery_time(4.0);
        assert_eq!((low, high), (50, 60));
        assert_eq!(high - low, ETA_WINDOW_MINUTES);
    }
}
