use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::assignment::Department;
use super::ledger::UpdateLedger;

/// Identifier wrapper for submitted reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub String);

static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

impl ReportId {
    /// Next identifier from the process-wide sequence.
    pub fn generate() -> Self {
        let id = REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("rpt-{id:06}"))
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed issue taxonomy citizens pick from at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Infrastructure,
    Sanitation,
    Safety,
    Environment,
    Traffic,
    Emergency,
}

impl Category {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Infrastructure,
            Self::Sanitation,
            Self::Safety,
            Self::Environment,
            Self::Traffic,
            Self::Emergency,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Infrastructure => "Infrastructure",
            Self::Sanitation => "Sanitation",
            Self::Safety => "Public Safety",
            Self::Environment => "Environment",
            Self::Traffic => "Traffic & Transport",
            Self::Emergency => "Emergency",
        }
    }
}

/// Lifecycle states, in the order a report normally moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Submitted,
    Assigned,
    InProgress,
    Resolved,
}

impl Status {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Submitted,
            Self::Assigned,
            Self::InProgress,
            Self::Resolved,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Assigned => "assigned",
            Self::InProgress => "in progress",
            Self::Resolved => "resolved",
        }
    }

    /// Completion percentage shown on progress bars.
    pub const fn progress_pct(self) -> u8 {
        match self {
            Self::Submitted => 25,
            Self::Assigned => 50,
            Self::InProgress => 75,
            Self::Resolved => 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const fn ordered() -> [Self; 3] {
        [Self::Low, Self::Medium, Self::High]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Priority is a pure function of category, fixed at creation and
    /// never recomputed.
    pub const fn from_category(category: Category) -> Self {
        match category {
            Category::Emergency => Self::High,
            Category::Infrastructure => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// Geographic coordinate captured at submission time; immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Fallback coordinate (city hall) used when acquisition is degraded.
pub const DEFAULT_LOCATION: GeoPoint = GeoPoint {
    lat: 40.7128,
    lng: -74.0060,
};

/// Whether the coordinate came from the caller or the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Device,
    Fallback,
}

pub const WARD_COUNT: u8 = 10;

/// Administrative zone identifier in `1..=WARD_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WardId(pub u8);

impl fmt::Display for WardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deterministic ward lookup from a coordinate: quantize into a grid and
/// fold the cell into the ward range. Stands in for a real zone shapefile
/// lookup, but the same coordinate always lands in the same ward.
pub fn ward_for(point: &GeoPoint) -> WardId {
    let lat_cell = (point.lat * 100.0).floor() as i64;
    let lng_cell = (point.lng * 100.0).floor() as i64;
    let cell = lat_cell
        .wrapping_mul(31)
        .wrapping_add(lng_cell)
        .rem_euclid(i64::from(WARD_COUNT));
    WardId(cell as u8 + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Citizen,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Citizen => "Citizen",
            Self::Admin => "Administrator",
        }
    }
}

/// Authenticated caller identity. Authentication itself is delegated to an
/// external identity provider; the service trusts the resolved identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// A single citizen-submitted civic issue record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub status: Status,
    pub priority: Priority,
    pub location: GeoPoint,
    pub location_source: LocationSource,
    pub ward: WardId,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Department>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_completion: Option<String>,
    /// Opaque encoded payloads (data-URI style); presence only, never
    /// inspected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_note: Option<String>,
    pub updates: UpdateLedger,
}

/// Submission payload accepted from citizens. A missing location falls back
/// to [`DEFAULT_LOCATION`] with the source marked degraded.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewReport {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub voice_note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_follows_category() {
        assert_eq!(Priority::from_category(Category::Emergency), Priority::High);
        assert_eq!(
            Priority::from_category(Category::Infrastructure),
            Priority::Medium
        );
        for category in [
            Category::Sanitation,
            Category::Safety,
            Category::Environment,
            Category::Traffic,
        ] {
            assert_eq!(Priority::from_category(category), Priority::Low);
        }
    }

    #[test]
    fn ward_lookup_is_deterministic_and_in_range() {
        let point = GeoPoint {
            lat: 12.9,
            lng: 77.6,
        };
        let first = ward_for(&point);
        let second = ward_for(&point);
        assert_eq!(first, second);
        assert!((1..=WARD_COUNT).contains(&first.0));

        let fallback = ward_for(&DEFAULT_LOCATION);
        assert!((1..=WARD_COUNT).contains(&fallback.0));
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&Status::InProgress).expect("serialize");
        assert_eq!(json, "\"in-progress\"");
        let parsed: Status = serde_json::from_str("\"in-progress\"").expect("parse");
        assert_eq!(parsed, Status::InProgress);
    }

    #[test]
    fn report_ids_are_unique_and_prefixed() {
        let first = ReportId::generate();
        let second = ReportId::generate();
        assert_ne!(first, second);
        assert!(first.0.starts_with("rpt-"));
    }
}
