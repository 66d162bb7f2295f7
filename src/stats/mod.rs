/// Launch statistics aggregation core
use crate::domain::{
    AggregateStatistics, CountryStats, EntryShape, FlatSatellite, LaunchOutcome, LaunchRecord,
    OrbitStats, Payload, PeakYear, SatelliteEntry, SiteStats, Totals, VehicleStats, YearlyStats,
    DOMESTIC_COUNTRY,
};
use crate::utils;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Country rows kept in the per-country breakdown.
const TOP_COUNTRIES: usize = 10;

/// Expand a payload into one entry per physical satellite.
///
/// Constellations and quantity batches expand to `quantity` units named
/// `{base}-1` through `{base}-N`, nested groups recurse, plain entries pass
/// through. An absent satellite list expands to nothing.
pub fn flatten(payload: &Payload) -> Vec<FlatSatellite> {
    let mut out = Vec::new();
    if let Some(entries) = &payload.satellites {
        flatten_entries(entries, &mut out);
    }
    out
}

fn flatten_entries(entries: &[SatelliteEntry], out: &mut Vec<FlatSatellite>) {
    for entry in entries {
        match entry.shape() {
            EntryShape::Constellation(c) => expand_units(entry, c.quantity, c.mass_per_unit, out),
            EntryShape::Nested(nested) => flatten_entries(nested, out),
            EntryShape::Batch {
                quantity,
                mass_per_unit,
            } => expand_units(entry, quantity, Some(mass_per_unit), out),
            EntryShape::Single => out.push(FlatSatellite {
                name: entry.name.clone(),
                country: entry.country.clone(),
                mass: entry.mass,
            }),
        }
    }
}

fn expand_units(
    entry: &SatelliteEntry,
    quantity: u32,
    mass_per_unit: Option<f64>,
    out: &mut Vec<FlatSatellite>,
) {
    for index in 1..=quantity {
        out.push(FlatSatellite {
            name: entry.name.as_ref().map(|base| format!("{base}-{index}")),
            country: entry.country.clone(),
            mass: mass_per_unit,
        });
    }
}

/// Count satellites on one side of the domestic/foreign split without
/// materializing the expansion. Entries without a country are never domestic,
/// so domestic plus foreign always equals the full expansion.
pub fn count_satellites(entries: &[SatelliteEntry], match_domestic: bool) -> u32 {
    entries
        .iter()
        .map(|entry| match entry.shape() {
            EntryShape::Nested(nested) => count_satellites(nested, match_domestic),
            EntryShape::Constellation(c) if matches_side(entry, match_domestic) => c.quantity,
            EntryShape::Batch { quantity, .. } if matches_side(entry, match_domestic) => quantity,
            EntryShape::Single if matches_side(entry, match_domestic) => 1,
            _ => 0,
        })
        .sum()
}

fn matches_side(entry: &SatelliteEntry, match_domestic: bool) -> bool {
    let domestic = entry.country.as_deref() == Some(DOMESTIC_COUNTRY);
    domestic == match_domestic
}

/// Mass lifted by one launch in kilograms.
///
/// The declared payload total wins when present; otherwise the expanded
/// satellite masses are summed, with a constellation falling back to its
/// declared aggregate when the per-unit mass is missing.
pub fn launch_mass_kg(launch: &LaunchRecord) -> f64 {
    if let Some(total) = launch.payload.total_mass {
        return total;
    }
    entries_mass_kg(launch.payload.satellites.as_deref().unwrap_or_default())
}

fn entries_mass_kg(entries: &[SatelliteEntry]) -> f64 {
    entries
        .iter()
        .map(|entry| match entry.shape() {
            EntryShape::Constellation(c) => match c.mass_per_unit {
                Some(per_unit) => per_unit * f64::from(c.quantity),
                None => c.total_constellation_mass.unwrap_or(0.0),
            },
            EntryShape::Nested(nested) => entries_mass_kg(nested),
            EntryShape::Batch {
                quantity,
                mass_per_unit,
            } => mass_per_unit * f64::from(quantity),
            EntryShape::Single => entry.mass.unwrap_or(0.0),
        })
        .sum()
}

#[derive(Default)]
struct CountryAcc {
    satellites: u32,
    mass_kg: f64,
    first_launch: u32,
    last_launch: u32,
    years: BTreeSet<i32>,
}

#[derive(Default)]
struct YearAcc {
    launches: u32,
    satellites: u32,
    countries: BTreeSet<String>,
    mass_kg: f64,
}

#[derive(Default)]
struct VehicleAcc {
    launches: u32,
    success: u32,
    partial: u32,
    failure: u32,
    mass_kg: f64,
}

#[derive(Default)]
struct SiteAcc {
    total: u32,
    success: u32,
    vehicles: BTreeSet<String>,
}

/// Derive the full dashboard statistics from a launch collection.
///
/// A launch whose `dateTime` has no parseable calendar date is skipped from
/// every figure and tallied in `skipped_records`, with one warning per
/// record. All grouping runs over ordered maps, so equal inputs always
/// produce equal outputs.
pub fn aggregate(launches: &[LaunchRecord]) -> AggregateStatistics {
    let mut skipped_records: u32 = 0;
    let mut dated: Vec<(&LaunchRecord, i32)> = Vec::with_capacity(launches.len());
    for launch in launches {
        match utils::launch_year(&launch.date_time) {
            Some(year) => dated.push((launch, year)),
            None => {
                warn!(
                    "skipping launch #{} with unparseable dateTime {:?}",
                    launch.launch_no, launch.date_time
                );
                skipped_records += 1;
            }
        }
    }

    let total_launches = dated.len() as u32;
    let successful_launches = dated
        .iter()
        .filter(|(launch, _)| launch.outcome() == Some(LaunchOutcome::Success))
        .count() as u32;
    let success_rate = if total_launches == 0 {
        0.0
    } else {
        f64::from(successful_launches) * 100.0 / f64::from(total_launches)
    };
    let current_streak = dated
        .iter()
        .rev()
        .take_while(|(launch, _)| launch.outcome() == Some(LaunchOutcome::Success))
        .count() as u32;

    let mut foreign_satellites: u32 = 0;
    let mut total_payload_mass_kg: f64 = 0.0;
    let mut country_accs: BTreeMap<String, CountryAcc> = BTreeMap::new();
    let mut year_accs: BTreeMap<i32, YearAcc> = BTreeMap::new();
    let mut vehicle_accs: BTreeMap<String, VehicleAcc> = BTreeMap::new();
    let mut site_accs: BTreeMap<String, SiteAcc> = BTreeMap::new();
    let mut orbit_counts: BTreeMap<String, u32> = BTreeMap::new();

    for (launch, year) in &dated {
        let entries = launch.payload.satellites.as_deref().unwrap_or_default();
        foreign_satellites += count_satellites(entries, false);

        let mass_kg = launch_mass_kg(launch);
        total_payload_mass_kg += mass_kg;

        let year_acc = year_accs.entry(*year).or_default();
        year_acc.launches += 1;

        for sat in flatten(&launch.payload) {
            let Some(country) = sat.country else { continue };
            if country == DOMESTIC_COUNTRY {
                continue;
            }
            let sat_mass = sat.mass.unwrap_or(0.0);

            year_acc.satellites += 1;
            year_acc.mass_kg += sat_mass;
            year_acc.countries.insert(country.clone());

            let country_acc = country_accs.entry(country).or_insert_with(|| CountryAcc {
                first_launch: launch.launch_no,
                last_launch: launch.launch_no,
                ..CountryAcc::default()
            });
            country_acc.satellites += 1;
            country_acc.mass_kg += sat_mass;
            country_acc.first_launch = country_acc.first_launch.min(launch.launch_no);
            country_acc.last_launch = country_acc.last_launch.max(launch.launch_no);
            country_acc.years.insert(*year);
        }

        let outcome = launch.outcome();
        let vehicle_acc = vehicle_accs.entry(launch.rocket.clone()).or_default();
        vehicle_acc.launches += 1;
        vehicle_acc.mass_kg += mass_kg;
        match outcome {
            Some(LaunchOutcome::Success) => vehicle_acc.success += 1,
            Some(LaunchOutcome::PartialSuccess | LaunchOutcome::PartialFailure) => {
                vehicle_acc.partial += 1
            }
            Some(LaunchOutcome::Failure) => vehicle_acc.failure += 1,
            Some(LaunchOutcome::Scheduled) | None => {}
        }

        let site = launch
            .launch_site
            .as_deref()
            .map(str::trim)
            .filter(|site| !site.is_empty())
            .unwrap_or("Unknown")
            .to_string();
        let site_acc = site_accs.entry(site).or_default();
        site_acc.total += 1;
        if outcome == Some(LaunchOutcome::Success) {
            site_acc.success += 1;
        }
        site_acc.vehicles.insert(launch.rocket.clone());

        if let Some(orbit) = launch
            .orbit
            .as_deref()
            .map(str::trim)
            .filter(|orbit| !orbit.is_empty())
        {
            *orbit_counts.entry(orbit.to_uppercase()).or_insert(0) += 1;
        }
    }

    let mut country_stats: Vec<CountryStats> = country_accs
        .into_iter()
        .map(|(country, acc)| CountryStats {
            country,
            total_satellites: acc.satellites,
            total_mass_kg: acc.mass_kg,
            first_launch: acc.first_launch,
            last_launch: acc.last_launch,
            years: acc.years.len() as u32,
        })
        .collect();
    // Partner count covers every foreign country, not just the top rows.
    let partner_countries = country_stats.len() as u32;
    country_stats.sort_by(|a, b| {
        b.total_satellites
            .cmp(&a.total_satellites)
            .then_with(|| a.country.cmp(&b.country))
    });
    country_stats.truncate(TOP_COUNTRIES);

    let yearly_stats: Vec<YearlyStats> = year_accs
        .iter()
        .map(|(year, acc)| YearlyStats {
            year: *year,
            launches: acc.launches,
            satellites: acc.satellites,
            countries: acc.countries.len() as u32,
            total_mass_kg: acc.mass_kg,
        })
        .collect();

    // Ascending scan keeps the earliest year on satellite-count ties.
    let mut peak_year: Option<PeakYear> = None;
    for row in &yearly_stats {
        if peak_year
            .as_ref()
            .map_or(true, |peak| row.satellites > peak.satellites)
        {
            peak_year = Some(PeakYear {
                year: row.year,
                satellites: row.satellites,
            });
        }
    }

    let vehicle_stats: Vec<VehicleStats> = vehicle_accs
        .into_iter()
        .map(|(vehicle, acc)| VehicleStats {
            vehicle,
            launches: acc.launches,
            success: acc.success,
            partial: acc.partial,
            failure: acc.failure,
            total_mass_kg: acc.mass_kg,
        })
        .collect();

    let site_stats: Vec<SiteStats> = site_accs
        .into_iter()
        .map(|(site, acc)| SiteStats {
            site,
            total: acc.total,
            success: acc.success,
            vehicles: acc.vehicles.len() as u32,
        })
        .collect();

    let mut orbit_stats: Vec<OrbitStats> = orbit_counts
        .into_iter()
        .map(|(orbit, launches)| OrbitStats { orbit, launches })
        .collect();
    orbit_stats.sort_by(|a, b| {
        b.launches
            .cmp(&a.launches)
            .then_with(|| a.orbit.cmp(&b.orbit))
    });

    let unique_orbits = orbit_stats.len() as u32;
    let launch_sites = site_stats.len() as u32;
    let years_active = match (year_accs.keys().next(), year_accs.keys().next_back()) {
        (Some(first), Some(last)) => (last - first + 1) as u32,
        _ => 0,
    };

    AggregateStatistics {
        totals: Totals {
            total_launches,
            successful_launches,
            success_rate,
            current_streak,
            foreign_satellites,
            partner_countries,
            total_payload_mass_kg,
            unique_orbits,
            launch_sites,
            years_active,
            peak_year,
        },
        country_stats,
        yearly_stats,
        vehicle_stats,
        site_stats,
        orbit_stats,
        skipped_records,
    }
}
