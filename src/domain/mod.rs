/// Domain models for the application
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Country whose satellites count as domestic in the foreign/domestic split.
pub const DOMESTIC_COUNTRY: &str = "India";

/// Launch archive document: metadata plus the full launch list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchDocument {
    pub metadata: ArchiveMetadata,
    #[serde(default)]
    pub launches: Vec<LaunchRecord>,
}

/// Archive metadata block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveMetadata {
    pub last_updated: String,
}

/// One orbital launch from the archive.
///
/// `date_time` is the composite `"YYYY-MM-DD | HH:MM"` stamp and is kept raw;
/// parsing happens at aggregation time so an unparseable stamp degrades to a
/// skipped record instead of a failed document load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRecord {
    pub launch_no: u32,
    pub date_time: String,
    pub rocket: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_no: Option<String>,
    pub launch_outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_site: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub payload: Payload,
}

impl LaunchRecord {
    /// Parsed outcome label; `None` for labels outside the known set.
    pub fn outcome(&self) -> Option<LaunchOutcome> {
        LaunchOutcome::parse(&self.launch_outcome)
    }
}

/// Payload block of a launch: optional declared total mass and the
/// polymorphic satellite entry list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satellites: Option<Vec<SatelliteEntry>>,
}

/// One entry in a payload's satellite list.
///
/// The archive uses four shapes for this object: a plain satellite, a
/// constellation block, a nested group, and a quantity batch. All fields are
/// optional at the wire level; `shape()` resolves which shape applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constellation: Option<Constellation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satellites: Option<Vec<SatelliteEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass_per_unit: Option<f64>,
}

/// Constellation block: uniform units described once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constellation {
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass_per_unit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_constellation_mass: Option<f64>,
}

/// Resolved shape of a satellite entry, in precedence order.
#[derive(Debug)]
pub enum EntryShape<'a> {
    Constellation(&'a Constellation),
    Nested(&'a [SatelliteEntry]),
    Batch { quantity: u32, mass_per_unit: f64 },
    Single,
}

impl SatelliteEntry {
    /// Resolve which shape this entry takes.
    ///
    /// Precedence: constellation block, then nested group, then quantity
    /// batch (both `quantity` and `massPerUnit` present), then plain
    /// satellite. Presence decides, not value.
    pub fn shape(&self) -> EntryShape<'_> {
        if let Some(constellation) = &self.constellation {
            return EntryShape::Constellation(constellation);
        }
        if let Some(nested) = &self.satellites {
            return EntryShape::Nested(nested);
        }
        if let (Some(quantity), Some(mass_per_unit)) = (self.quantity, self.mass_per_unit) {
            return EntryShape::Batch {
                quantity,
                mass_per_unit,
            };
        }
        EntryShape::Single
    }
}

/// One physical satellite after payload expansion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatSatellite {
    pub name: Option<String>,
    pub country: Option<String>,
    pub mass: Option<f64>,
}

/// Parsed launch outcome label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    Success,
    Failure,
    PartialSuccess,
    PartialFailure,
    Scheduled,
}

impl LaunchOutcome {
    /// Case-insensitive exact match on the trimmed label.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "success" => Some(Self::Success),
            "failure" => Some(Self::Failure),
            "partial success" => Some(Self::PartialSuccess),
            "partial failure" => Some(Self::PartialFailure),
            "scheduled" => Some(Self::Scheduled),
            _ => None,
        }
    }
}

/// Satellite catalog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatelliteDocument {
    #[serde(default)]
    pub indian_satellite_launches: Vec<SatelliteLaunchRecord>,
}

/// One satellite from the catalog. The orbital fields arrive as either
/// numbers or annotated strings ("619 km"), so they stay raw `Value`s and are
/// normalized on the way out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatelliteLaunchRecord {
    pub launch_number: u32,
    pub name: String,
    pub launch_date: String,
    pub launch_vehicle: String,
    pub launch_site: String,
    pub mission: String,
    pub mission_outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_mass: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periapsis: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apoapsis: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decay_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission_details: Option<String>,
}

/// Full derived statistics for one snapshot of the archive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStatistics {
    pub totals: Totals,
    pub country_stats: Vec<CountryStats>,
    pub yearly_stats: Vec<YearlyStats>,
    pub vehicle_stats: Vec<VehicleStats>,
    pub site_stats: Vec<SiteStats>,
    pub orbit_stats: Vec<OrbitStats>,
    pub skipped_records: u32,
}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub total_launches: u32,
    pub successful_launches: u32,
    pub success_rate: f64,
    pub current_streak: u32,
    pub foreign_satellites: u32,
    pub partner_countries: u32,
    pub total_payload_mass_kg: f64,
    pub unique_orbits: u32,
    pub launch_sites: u32,
    pub years_active: u32,
    pub peak_year: Option<PeakYear>,
}

/// Year with the most foreign satellites.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakYear {
    pub year: i32,
    pub satellites: u32,
}

/// Per-country row of the foreign-satellite breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryStats {
    pub country: String,
    pub total_satellites: u32,
    pub total_mass_kg: f64,
    pub first_launch: u32,
    pub last_launch: u32,
    pub years: u32,
}

/// Per-year row: launches plus foreign-satellite activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyStats {
    pub year: i32,
    pub launches: u32,
    pub satellites: u32,
    pub countries: u32,
    pub total_mass_kg: f64,
}

/// Per-vehicle row with outcome split and lifted mass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleStats {
    pub vehicle: String,
    pub launches: u32,
    pub success: u32,
    pub partial: u32,
    pub failure: u32,
    pub total_mass_kg: f64,
}

/// Per-site row; launches without a site group under "Unknown".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteStats {
    pub site: String,
    pub total: u32,
    pub success: u32,
    pub vehicles: u32,
}

/// Per-orbit row, keyed by the normalized (uppercased) orbit label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitStats {
    pub orbit: String,
    pub launches: u32,
}

/// Everything derived from one successful fetch of both documents.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub last_updated: String,
    pub launches: Vec<LaunchRecord>,
    pub satellites: Vec<SatelliteLaunchRecord>,
    pub stats: AggregateStatistics,
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}
