/// Business logic services layer
use crate::clients::{LaunchArchiveClient, SatelliteCatalogClient};
use crate::domain::{
    AggregateStatistics, DashboardSnapshot, LaunchRecord, SatelliteLaunchRecord,
};
use crate::errors::{ApiError, ApiResult};
use crate::stats;
use crate::store::SnapshotStore;
use crate::utils;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::info;

/// Outcome of one snapshot refresh.
#[derive(Debug, Serialize)]
pub struct RefreshReport {
    pub launches: usize,
    pub satellites: usize,
    pub skipped_records: u32,
    pub last_updated: String,
}

/// Snapshot synchronization service
pub struct SyncService {
    launch_client: LaunchArchiveClient,
    catalog_client: SatelliteCatalogClient,
    store: SnapshotStore,
}

impl SyncService {
    pub fn new(
        launch_client: LaunchArchiveClient,
        catalog_client: SatelliteCatalogClient,
        store: SnapshotStore,
    ) -> Self {
        Self {
            launch_client,
            catalog_client,
            store,
        }
    }

    /// Fetch both documents, derive statistics, and swap the snapshot in.
    ///
    /// Both fetches run concurrently and both must succeed; on any failure
    /// the previous snapshot (or the empty state) is left untouched.
    pub async fn refresh(&self) -> ApiResult<RefreshReport> {
        info!(
            "refreshing snapshot from {} and {}",
            self.launch_client.url(),
            self.catalog_client.url()
        );

        let (launch_doc, satellite_doc) =
            tokio::join!(self.launch_client.fetch(), self.catalog_client.fetch());
        let launch_doc = launch_doc?;
        let satellite_doc = satellite_doc?;

        let stats = stats::aggregate(&launch_doc.launches);
        let report = RefreshReport {
            launches: launch_doc.launches.len(),
            satellites: satellite_doc.indian_satellite_launches.len(),
            skipped_records: stats.skipped_records,
            last_updated: launch_doc.metadata.last_updated.clone(),
        };

        self.store.replace(DashboardSnapshot {
            fetched_at: Utc::now(),
            last_updated: launch_doc.metadata.last_updated,
            launches: launch_doc.launches,
            satellites: satellite_doc.indian_satellite_launches,
            stats,
        });

        info!(
            "snapshot replaced: {} launches, {} catalog satellites, {} skipped",
            report.launches, report.satellites, report.skipped_records
        );
        Ok(report)
    }
}

/// Dashboard summary: archive freshness plus the derived statistics.
#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub last_updated: String,
    pub fetched_at: DateTime<Utc>,
    pub stats: AggregateStatistics,
}

/// Timeline filters; absent fields match everything.
#[derive(Debug, Default, Deserialize)]
pub struct LaunchFilter {
    pub year: Option<i32>,
    pub orbit: Option<String>,
    pub outcome: Option<String>,
    pub vehicle: Option<String>,
    pub country: Option<String>,
    pub q: Option<String>,
}

impl LaunchFilter {
    fn matches(&self, launch: &LaunchRecord) -> bool {
        if let Some(year) = self.year {
            if utils::launch_year(&launch.date_time) != Some(year) {
                return false;
            }
        }
        if let Some(orbit) = &self.orbit {
            if !launch
                .orbit
                .as_deref()
                .is_some_and(|o| o.eq_ignore_ascii_case(orbit))
            {
                return false;
            }
        }
        if let Some(outcome) = &self.outcome {
            if !launch.launch_outcome.eq_ignore_ascii_case(outcome) {
                return false;
            }
        }
        if let Some(vehicle) = &self.vehicle {
            if !launch.rocket.eq_ignore_ascii_case(vehicle) {
                return false;
            }
        }
        if let Some(country) = &self.country {
            // Expanded view, so constellation and nested members count too.
            let carried = stats::flatten(&launch.payload)
                .iter()
                .any(|sat| {
                    sat.country
                        .as_deref()
                        .is_some_and(|c| c.eq_ignore_ascii_case(country))
                });
            if !carried {
                return false;
            }
        }
        if let Some(q) = &self.q {
            let needle = q.to_lowercase();
            let hit = contains_ci(&launch.rocket, &needle)
                || launch
                    .flight_no
                    .as_deref()
                    .is_some_and(|f| contains_ci(f, &needle))
                || launch
                    .mission_description
                    .as_deref()
                    .is_some_and(|m| contains_ci(m, &needle));
            if !hit {
                return false;
            }
        }
        true
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Distinct values available to the timeline filters.
#[derive(Debug, Serialize)]
pub struct LaunchFilterOptions {
    pub years: Vec<i32>,
    pub orbits: Vec<String>,
    pub outcomes: Vec<String>,
    pub vehicles: Vec<String>,
    pub countries: Vec<String>,
}

/// Launch statistics service
pub struct StatsService {
    store: SnapshotStore,
}

impl StatsService {
    pub fn new(store: SnapshotStore) -> Self {
        Self { store }
    }

    fn snapshot(&self) -> ApiResult<Arc<DashboardSnapshot>> {
        self.store.current().ok_or(ApiError::DataUnavailable)
    }

    /// Get the dashboard summary
    pub fn summary(&self) -> ApiResult<SummaryView> {
        let snap = self.snapshot()?;
        Ok(SummaryView {
            last_updated: snap.last_updated.clone(),
            fetched_at: snap.fetched_at,
            stats: snap.stats.clone(),
        })
    }

    /// Get one statistics breakdown, keyed by route segment
    pub fn breakdown(&self, kind: &str) -> ApiResult<Value> {
        let snap = self.snapshot()?;
        let stats = &snap.stats;
        let data = match kind {
            "countries" => serde_json::json!({ "countries": stats.country_stats }),
            "yearly" => serde_json::json!({ "yearly": stats.yearly_stats }),
            "vehicles" => serde_json::json!({ "vehicles": stats.vehicle_stats }),
            "sites" => serde_json::json!({ "sites": stats.site_stats }),
            "orbits" => serde_json::json!({ "orbits": stats.orbit_stats }),
            _ => {
                return Err(ApiError::NotFound(format!(
                    "unknown stats breakdown: {kind}"
                )))
            }
        };
        Ok(data)
    }

    /// List launches matching the filter, newest first
    pub fn launches(&self, filter: &LaunchFilter) -> ApiResult<Vec<LaunchRecord>> {
        let snap = self.snapshot()?;
        let mut hits: Vec<LaunchRecord> = snap
            .launches
            .iter()
            .filter(|launch| filter.matches(launch))
            .cloned()
            .collect();
        // Unparseable dates sort to the end.
        hits.sort_by_cached_key(|launch| {
            (
                Reverse(utils::parse_launch_date(&launch.date_time)),
                Reverse(launch.launch_no),
            )
        });
        Ok(hits)
    }

    /// Most recent launches in archive order, newest first
    pub fn recent(&self, limit: usize) -> ApiResult<Vec<LaunchRecord>> {
        let snap = self.snapshot()?;
        Ok(snap.launches.iter().rev().take(limit).cloned().collect())
    }

    /// Distinct filter values across the archive
    pub fn filter_options(&self) -> ApiResult<LaunchFilterOptions> {
        let snap = self.snapshot()?;

        let mut years: BTreeSet<i32> = BTreeSet::new();
        let mut orbits: BTreeSet<String> = BTreeSet::new();
        let mut outcomes: BTreeSet<String> = BTreeSet::new();
        let mut vehicles: BTreeSet<String> = BTreeSet::new();
        let mut countries: BTreeSet<String> = BTreeSet::new();

        for launch in &snap.launches {
            if let Some(year) = utils::launch_year(&launch.date_time) {
                years.insert(year);
            }
            if let Some(orbit) = launch.orbit.as_deref().map(str::trim) {
                if !orbit.is_empty() {
                    orbits.insert(orbit.to_string());
                }
            }
            outcomes.insert(launch.launch_outcome.clone());
            vehicles.insert(launch.rocket.clone());
            for sat in stats::flatten(&launch.payload) {
                if let Some(country) = sat.country {
                    countries.insert(country);
                }
            }
        }

        Ok(LaunchFilterOptions {
            years: years.into_iter().collect(),
            orbits: orbits.into_iter().collect(),
            outcomes: outcomes.into_iter().collect(),
            vehicles: vehicles.into_iter().collect(),
            countries: countries.into_iter().collect(),
        })
    }
}

/// Catalog filters; absent fields match everything.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogFilter {
    pub year: Option<i32>,
    pub mission: Option<String>,
    pub status: Option<String>,
    pub vehicle: Option<String>,
    pub site: Option<String>,
    pub q: Option<String>,
}

impl CatalogFilter {
    fn matches(&self, record: &SatelliteLaunchRecord) -> bool {
        if let Some(year) = self.year {
            if utils::launch_year(&record.launch_date) != Some(year) {
                return false;
            }
        }
        if let Some(mission) = &self.mission {
            if !record.mission.eq_ignore_ascii_case(mission) {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if !record.mission_outcome.eq_ignore_ascii_case(status) {
                return false;
            }
        }
        if let Some(vehicle) = &self.vehicle {
            if !record.launch_vehicle.eq_ignore_ascii_case(vehicle) {
                return false;
            }
        }
        if let Some(site) = &self.site {
            if !record.launch_site.eq_ignore_ascii_case(site) {
                return false;
            }
        }
        if let Some(q) = &self.q {
            let needle = q.to_lowercase();
            let hit = contains_ci(&record.name, &needle)
                || contains_ci(&record.mission, &needle)
                || contains_ci(&record.launch_vehicle, &needle);
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Catalog record plus its normalized mass.
#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub record: SatelliteLaunchRecord,
    pub launch_mass_kg: Option<f64>,
}

/// Distinct values available to the catalog filters.
#[derive(Debug, Serialize)]
pub struct CatalogFilterOptions {
    pub years: Vec<i32>,
    pub missions: Vec<String>,
    pub statuses: Vec<String>,
    pub vehicles: Vec<String>,
    pub sites: Vec<String>,
}

/// Per-mission-type satellite counts.
#[derive(Debug, Serialize)]
pub struct MissionTypeCount {
    pub mission: String,
    pub satellites: u32,
}

/// Satellite catalog service
pub struct CatalogService {
    store: SnapshotStore,
}

impl CatalogService {
    pub fn new(store: SnapshotStore) -> Self {
        Self { store }
    }

    fn snapshot(&self) -> ApiResult<Arc<DashboardSnapshot>> {
        self.store.current().ok_or(ApiError::DataUnavailable)
    }

    /// List catalog satellites matching the filter, newest first
    pub fn satellites(&self, filter: &CatalogFilter) -> ApiResult<Vec<CatalogEntry>> {
        let snap = self.snapshot()?;
        let mut hits: Vec<CatalogEntry> = snap
            .satellites
            .iter()
            .filter(|record| filter.matches(record))
            .map(|record| CatalogEntry {
                launch_mass_kg: record.launch_mass.as_ref().and_then(mass_kg),
                record: record.clone(),
            })
            .collect();
        hits.sort_by_cached_key(|entry| {
            (
                Reverse(utils::parse_launch_date(&entry.record.launch_date)),
                Reverse(entry.record.launch_number),
            )
        });
        Ok(hits)
    }

    /// Distinct filter values across the catalog
    pub fn filter_options(&self) -> ApiResult<CatalogFilterOptions> {
        let snap = self.snapshot()?;

        let mut years: BTreeSet<i32> = BTreeSet::new();
        let mut missions: BTreeSet<String> = BTreeSet::new();
        let mut statuses: BTreeSet<String> = BTreeSet::new();
        let mut vehicles: BTreeSet<String> = BTreeSet::new();
        let mut sites: BTreeSet<String> = BTreeSet::new();

        for record in &snap.satellites {
            if let Some(year) = utils::launch_year(&record.launch_date) {
                years.insert(year);
            }
            missions.insert(record.mission.clone());
            statuses.insert(record.mission_outcome.clone());
            vehicles.insert(record.launch_vehicle.clone());
            sites.insert(record.launch_site.clone());
        }

        Ok(CatalogFilterOptions {
            // Catalog dropdowns list years newest first.
            years: years.into_iter().rev().collect(),
            missions: missions.into_iter().collect(),
            statuses: statuses.into_iter().collect(),
            vehicles: vehicles.into_iter().collect(),
            sites: sites.into_iter().collect(),
        })
    }

    /// Satellite counts per mission type, composite labels split on commas
    pub fn mission_types(&self) -> ApiResult<Vec<MissionTypeCount>> {
        let snap = self.snapshot()?;

        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        for record in &snap.satellites {
            for part in record.mission.split(',') {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                *counts.entry(part.to_string()).or_insert(0) += 1;
            }
        }

        let mut out: Vec<MissionTypeCount> = counts
            .into_iter()
            .map(|(mission, satellites)| MissionTypeCount {
                mission,
                satellites,
            })
            .collect();
        out.sort_by(|a, b| {
            b.satellites
                .cmp(&a.satellites)
                .then_with(|| a.mission.cmp(&b.mission))
        });
        Ok(out)
    }
}

/// Normalize a loose mass value ("1,117 kg", 1117, "1117") to kilograms.
fn mass_kg(value: &Value) -> Option<f64> {
    if let Some(kg) = utils::num(value) {
        return Some(kg);
    }
    let text = value.as_str()?.replace(',', "");
    let token = text.split_whitespace().next()?;
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Payload, SatelliteEntry};

    fn entry(name: &str, country: &str) -> SatelliteEntry {
        SatelliteEntry {
            name: Some(name.to_string()),
            country: Some(country.to_string()),
            mass: None,
            mass_unit: None,
            constellation: None,
            satellites: None,
            quantity: None,
            mass_per_unit: None,
        }
    }

    fn launch(launch_no: u32, date_time: &str, rocket: &str, outcome: &str) -> LaunchRecord {
        LaunchRecord {
            launch_no,
            date_time: date_time.to_string(),
            rocket: rocket.to_string(),
            configuration: None,
            flight_no: Some(format!("C{launch_no}")),
            launch_outcome: outcome.to_string(),
            orbit: Some("SSO".to_string()),
            launch_site: Some("First Launch Pad".to_string()),
            user: None,
            mission_description: None,
            notes: None,
            payload: Payload::default(),
        }
    }

    fn catalog_record(
        launch_number: u32,
        name: &str,
        launch_date: &str,
        mission: &str,
        mission_outcome: &str,
    ) -> SatelliteLaunchRecord {
        SatelliteLaunchRecord {
            launch_number,
            name: name.to_string(),
            launch_date: launch_date.to_string(),
            launch_vehicle: "PSLV-XL".to_string(),
            launch_site: "SDSC SHAR".to_string(),
            mission: mission.to_string(),
            mission_outcome: mission_outcome.to_string(),
            launch_mass: None,
            power: None,
            periapsis: None,
            apoapsis: None,
            period: None,
            inclination: None,
            decay_date: None,
            mission_details: None,
        }
    }

    fn store_with(
        launches: Vec<LaunchRecord>,
        satellites: Vec<SatelliteLaunchRecord>,
    ) -> SnapshotStore {
        let stats = stats::aggregate(&launches);
        let store = SnapshotStore::new();
        store.replace(DashboardSnapshot {
            fetched_at: Utc::now(),
            last_updated: "2025-08-01".to_string(),
            launches,
            satellites,
            stats,
        });
        store
    }

    #[test]
    fn summary_requires_a_loaded_snapshot() {
        let service = StatsService::new(SnapshotStore::new());
        assert!(matches!(service.summary(), Err(ApiError::DataUnavailable)));
    }

    #[test]
    fn summary_carries_archive_freshness() {
        let service = StatsService::new(store_with(
            vec![launch(1, "2024-01-01 | 09:10", "PSLV-XL", "Success")],
            Vec::new(),
        ));
        let view = service.summary().unwrap();
        assert_eq!(view.last_updated, "2025-08-01");
        assert_eq!(view.stats.totals.total_launches, 1);
    }

    #[test]
    fn breakdown_rejects_unknown_kind() {
        let service = StatsService::new(store_with(Vec::new(), Vec::new()));
        assert!(matches!(
            service.breakdown("velocity"),
            Err(ApiError::NotFound(_))
        ));
        let countries = service.breakdown("countries").unwrap();
        assert!(countries.get("countries").is_some());
    }

    #[test]
    fn launch_filters_combine() {
        let service = StatsService::new(store_with(
            vec![
                launch(1, "2023-03-26 | 03:00", "LVM3", "Success"),
                launch(2, "2023-07-30 | 01:01", "PSLV-CA", "Success"),
                launch(3, "2024-01-01 | 03:40", "PSLV-DL", "Success"),
            ],
            Vec::new(),
        ));

        let filter = LaunchFilter {
            year: Some(2023),
            vehicle: Some("lvm3".to_string()),
            ..LaunchFilter::default()
        };
        let hits = service.launches(&filter).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].launch_no, 1);
    }

    #[test]
    fn country_filter_sees_expanded_members() {
        let mut carrier = launch(7, "2017-02-15 | 09:28", "PSLV-XL", "Success");
        carrier.payload.satellites = Some(vec![SatelliteEntry {
            satellites: Some(vec![entry("Al-Farabi", "Kazakhstan")]),
            ..entry("Group", "India")
        }]);

        let service = StatsService::new(store_with(
            vec![launch(6, "2016-09-26 | 03:42", "PSLV-G", "Success"), carrier],
            Vec::new(),
        ));

        let filter = LaunchFilter {
            country: Some("kazakhstan".to_string()),
            ..LaunchFilter::default()
        };
        let hits = service.launches(&filter).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].launch_no, 7);
    }

    #[test]
    fn search_matches_flight_number_case_insensitively() {
        let service = StatsService::new(store_with(
            vec![
                launch(1, "2023-03-26 | 03:00", "LVM3", "Success"),
                launch(2, "2023-07-30 | 01:01", "PSLV-CA", "Success"),
            ],
            Vec::new(),
        ));

        let filter = LaunchFilter {
            q: Some("c2".to_string()),
            ..LaunchFilter::default()
        };
        let hits = service.launches(&filter).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].launch_no, 2);
    }

    #[test]
    fn launches_sort_newest_first_with_unparseable_last() {
        let service = StatsService::new(store_with(
            vec![
                launch(1, "2022-02-14 | 00:29", "PSLV-XL", "Success"),
                launch(2, "TBD", "PSLV-XL", "Scheduled"),
                launch(3, "2023-04-22 | 12:50", "PSLV-C55", "Success"),
            ],
            Vec::new(),
        ));

        let order: Vec<u32> = service
            .launches(&LaunchFilter::default())
            .unwrap()
            .iter()
            .map(|l| l.launch_no)
            .collect();
        assert_eq!(order, [3, 1, 2]);
    }

    #[test]
    fn recent_returns_the_archive_tail_newest_first() {
        let service = StatsService::new(store_with(
            vec![
                launch(1, "2023-03-26 | 03:00", "LVM3", "Success"),
                launch(2, "2023-07-30 | 01:01", "PSLV-CA", "Success"),
                launch(3, "2024-01-01 | 03:40", "PSLV-DL", "Success"),
            ],
            Vec::new(),
        ));

        let order: Vec<u32> = service
            .recent(2)
            .unwrap()
            .iter()
            .map(|l| l.launch_no)
            .collect();
        assert_eq!(order, [3, 2]);
    }

    #[test]
    fn launch_filter_options_collect_distinct_values() {
        let mut with_sats = launch(2, "2024-02-17 | 17:05", "GSLV", "Success");
        with_sats.payload.satellites = Some(vec![entry("INSAT-3DS", "India")]);
        let service = StatsService::new(store_with(
            vec![launch(1, "2023-03-26 | 03:00", "LVM3", "Failure"), with_sats],
            Vec::new(),
        ));

        let options = service.filter_options().unwrap();
        assert_eq!(options.years, [2023, 2024]);
        assert_eq!(options.vehicles, ["GSLV", "LVM3"]);
        assert_eq!(options.outcomes, ["Failure", "Success"]);
        assert_eq!(options.countries, ["India"]);
    }

    #[test]
    fn catalog_filters_and_sorts_newest_first() {
        let service = CatalogService::new(store_with(
            Vec::new(),
            vec![
                catalog_record(1, "Aryabhata", "1975-04-19", "Experimental", "Success"),
                catalog_record(3, "Oceansat-3", "2022-11-26", "Earth Observation", "Operational"),
                catalog_record(2, "RISAT-2B", "2019-05-22", "Earth Observation", "Operational"),
            ],
        ));

        let filter = CatalogFilter {
            status: Some("operational".to_string()),
            ..CatalogFilter::default()
        };
        let names: Vec<String> = service
            .satellites(&filter)
            .unwrap()
            .into_iter()
            .map(|entry| entry.record.name)
            .collect();
        assert_eq!(names, ["Oceansat-3", "RISAT-2B"]);
    }

    #[test]
    fn catalog_normalizes_loose_mass_values() {
        let mut annotated = catalog_record(1, "INSAT-1A", "1982-04-10", "Communication", "Success");
        annotated.launch_mass = Some(Value::from("1,152 kg"));
        let mut numeric = catalog_record(2, "IRS-1A", "1988-03-17", "Earth Observation", "Success");
        numeric.launch_mass = Some(Value::from(975.0));
        let mut unknown = catalog_record(3, "Rohini", "1980-07-18", "Experimental", "Success");
        unknown.launch_mass = Some(Value::from("TBD"));

        let service = CatalogService::new(store_with(Vec::new(), vec![annotated, numeric, unknown]));
        let entries = service.satellites(&CatalogFilter::default()).unwrap();

        let by_name = |name: &str| {
            entries
                .iter()
                .find(|entry| entry.record.name == name)
                .unwrap()
                .launch_mass_kg
        };
        assert_eq!(by_name("INSAT-1A"), Some(1152.0));
        assert_eq!(by_name("IRS-1A"), Some(975.0));
        assert_eq!(by_name("Rohini"), None);
    }

    #[test]
    fn catalog_filter_options_years_descend() {
        let service = CatalogService::new(store_with(
            Vec::new(),
            vec![
                catalog_record(1, "Aryabhata", "1975-04-19", "Experimental", "Success"),
                catalog_record(2, "Oceansat-3", "2022-11-26", "Earth Observation", "Operational"),
            ],
        ));

        let options = service.filter_options().unwrap();
        assert_eq!(options.years, [2022, 1975]);
        assert_eq!(options.missions, ["Earth Observation", "Experimental"]);
    }

    #[test]
    fn mission_types_split_composite_labels() {
        let service = CatalogService::new(store_with(
            Vec::new(),
            vec![
                catalog_record(1, "A", "2020-01-01", "Earth Observation, Technology", "Success"),
                catalog_record(2, "B", "2021-01-01", "Earth Observation", "Success"),
                catalog_record(3, "C", "2022-01-01", "Navigation", "Success"),
            ],
        ));

        let counts = service.mission_types().unwrap();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[0].mission, "Earth Observation");
        assert_eq!(counts[0].satellites, 2);
        assert_eq!(counts[1].mission, "Navigation");
        assert_eq!(counts[2].mission, "Technology");
    }
}
