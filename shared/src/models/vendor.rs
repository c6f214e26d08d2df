//! Vendor Model
//!
//! Vendors are read-only for the fulfillment engine: placement and matching
//! consult the record, catalog management (out of scope) edits it.

use chrono::{DateTime, Datelike, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components finite and within WGS84 bounds
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Which order types the vendor serves
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ServiceTypes {
    pub delivery: bool,
    pub takeaway: bool,
}

/// Vendor delivery policy
///
/// `free_delivery_above_amount` is stored but not applied by the fee
/// formula; whether the waiver should zero the fee above an order-value
/// threshold is left to downstream pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliverySettings {
    pub radius_km: f64,
    pub min_delivery_amount: f64,
    pub free_delivery_above_amount: f64,
    pub base_delivery_charge: f64,
}

/// Day of week key for the operating-hours table
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

/// Opening window for one weekday, "HH:MM" local-to-UTC strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayHours {
    pub open: String,
    pub close: String,
    pub is_open: bool,
}

impl DayHours {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
            is_open: true,
        }
    }

    pub fn closed() -> Self {
        Self {
            open: "00:00".to_string(),
            close: "00:00".to_string(),
            is_open: false,
        }
    }

    /// Whether `time` falls inside this window
    ///
    /// Unparseable open/close strings are treated as closed.
    pub fn contains(&self, time: NaiveTime) -> bool {
        if !self.is_open {
            return false;
        }
        let (Ok(open), Ok(close)) = (
            NaiveTime::parse_from_str(&self.open, "%H:%M"),
            NaiveTime::parse_from_str(&self.close, "%H:%M"),
        ) else {
            return false;
        };
        if open <= close {
            open <= time && time < close
        } else {
            // Overnight window, e.g. 18:00-02:00
            time >= open || time < close
        }
    }
}

/// Vendor entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub location: GeoPoint,
    pub service_types: ServiceTypes,
    pub delivery_settings: DeliverySettings,
    /// Operating-hours table keyed by weekday; a missing day means closed
    pub operating_hours: BTreeMap<Weekday, DayHours>,
    pub is_active: bool,
    pub created_at: i64,
}

impl Vendor {
    /// Whether the vendor is open at the given instant (hours read as UTC)
    pub fn is_open_at(&self, when: DateTime<Utc>) -> bool {
        let day = Weekday::from(when.weekday());
        match self.operating_hours.get(&day) {
            Some(hours) => hours.contains(when.time()),
            None => false,
        }
    }

    pub fn supports(&self, order_type: super::OrderType) -> bool {
        match order_type {
            super::OrderType::Delivery => self.service_types.delivery,
            super::OrderType::Takeaway => self.service_types.takeaway,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn vendor_open(day: Weekday, hours: DayHours) -> Vendor {
        let mut operating_hours = BTreeMap::new();
        operating_hours.insert(day, hours);
        Vendor {
            id: "vendor-1".to_string(),
            name: "Test Vendor".to_string(),
            phone: None,
            location: GeoPoint::new(0.0, 0.0),
            service_types: ServiceTypes {
                delivery: true,
                takeaway: true,
            },
            delivery_settings: DeliverySettings {
                radius_km: 5.0,
                min_delivery_amount: 0.0,
                free_delivery_above_amount: 0.0,
                base_delivery_charge: 40.0,
            },
            operating_hours,
            is_active: true,
            created_at: 0,
        }
    }

    #[test]
    fn test_open_within_hours() {
        let vendor = vendor_open(Weekday::Monday, DayHours::new("09:00", "17:00"));
        // Monday 2026-08-24 12:00 UTC
        let noon = Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap();
        assert!(vendor.is_open_at(noon));

        let early = Utc.with_ymd_and_hms(2026, 8, 24, 8, 59, 0).unwrap();
        assert!(!vendor.is_open_at(early));
    }

    #[test]
    fn test_closed_day_and_missing_day() {
        let vendor = vendor_open(Weekday::Monday, DayHours::closed());
        let monday = Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap();
        assert!(!vendor.is_open_at(monday));

        // Tuesday has no entry at all
        let tuesday = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();
        assert!(!vendor.is_open_at(tuesday));
    }

    #[test]
    fn test_overnight_window() {
        let vendor = vendor_open(Weekday::Friday, DayHours::new("18:00", "02:00"));
        // Friday 2026-08-28
        let evening = Utc.with_ymd_and_hms(2026, 8, 28, 23, 0, 0).unwrap();
        assert!(vendor.is_open_at(evening));
        let afternoon = Utc.with_ymd_and_hms(2026, 8, 28, 15, 0, 0).unwrap();
        assert!(!vendor.is_open_at(afternoon));
    }

    #[test]
    fn test_geo_point_validity() {
        assert!(GeoPoint::new(41.4, 2.2).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 2.2).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -181.0).is_valid());
    }
}
