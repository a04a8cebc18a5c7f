//! Descriptor CSVs: continents, countries, regions, and update history.
//!
//! All of these are `;`-separated files with one header line.  Their rows
//! pass through to the database mostly untouched; ingestion validates field
//! counts, field lengths against [`DbFieldLength`], and the
//! country/continent cross-references of `regions.csv`.

use std::fs::File;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use hwy_core::{DbFieldLength, ErrorList};
use hwy_model::{ListUpdate, SystemUpdate, UpdateRecord};

use crate::IngestResult;

/// One row of `continents.csv`.
#[derive(Clone, Debug)]
pub struct Continent {
    pub code: String,
    pub name: String,
}

/// One row of `countries.csv`.
#[derive(Clone, Debug)]
pub struct Country {
    pub code: String,
    pub name: String,
}

/// One row of `regions.csv`.
#[derive(Clone, Debug)]
pub struct Region {
    pub code: String,
    pub name: String,
    pub country: String,
    pub continent: String,
    pub region_type: String,
}

/// The geographic descriptor tables.
pub struct Descriptors {
    pub continents: Vec<Continent>,
    pub countries: Vec<Country>,
    pub regions: Vec<Region>,
    region_index: FxHashMap<String, usize>,
}

impl Descriptors {
    pub fn region(&self, code: &str) -> Option<&Region> {
        self.region_index.get(code).map(|&i| &self.regions[i])
    }

    pub fn has_region(&self, code: &str) -> bool {
        self.region_index.contains_key(code)
    }

    pub fn has_country(&self, code: &str) -> bool {
        self.countries.iter().any(|c| c.code == code)
    }
}

/// A `;`-separated reader over raw text fields: no quoting, tolerant of
/// varying field counts (counts are validated per row), one header line.
pub(crate) fn semi_reader(path: &Path) -> std::io::Result<csv::Reader<File>> {
    let file = File::open(path)?;
    Ok(csv::ReaderBuilder::new()
        .delimiter(b';')
        .quoting(false)
        .flexible(true)
        .has_headers(true)
        .from_reader(file))
}

fn check_len(el: &ErrorList, value: &str, limit: usize, what: &str, file: &str, line: &str) {
    if value.len() > limit {
        el.add(format!("{what} > {limit} bytes in {file} line {line}"));
    }
}

fn record_line(record: &csv::StringRecord) -> String {
    record.iter().collect::<Vec<_>>().join(";")
}

/// Read `continents.csv`, `countries.csv`, and `regions.csv` from the
/// highway data path.
pub fn read_descriptors(hwy_path: &Path, el: &ErrorList) -> IngestResult<Descriptors> {
    let mut continents = Vec::new();
    match semi_reader(&hwy_path.join("continents.csv")) {
        Err(e) => el.add(e.to_string()),
        Ok(mut rdr) => {
            for record in rdr.records() {
                let record = record?;
                let line = record_line(&record);
                if record.len() != 2 {
                    el.add(format!(
                        "Could not parse continents.csv line: [{line}], expected 2 fields, found {}",
                        record.len()
                    ));
                    continue;
                }
                check_len(el, &record[0], DbFieldLength::CONTINENT_CODE, "Continent code", "continents.csv", &line);
                check_len(el, &record[1], DbFieldLength::CONTINENT_NAME, "Continent name", "continents.csv", &line);
                continents.push(Continent { code: record[0].to_string(), name: record[1].to_string() });
            }
        }
    }

    let mut countries = Vec::new();
    match semi_reader(&hwy_path.join("countries.csv")) {
        Err(e) => el.add(e.to_string()),
        Ok(mut rdr) => {
            for record in rdr.records() {
                let record = record?;
                let line = record_line(&record);
                if record.len() != 2 {
                    el.add(format!(
                        "Could not parse countries.csv line: [{line}], expected 2 fields, found {}",
                        record.len()
                    ));
                    continue;
                }
                check_len(el, &record[0], DbFieldLength::COUNTRY_CODE, "Country code", "countries.csv", &line);
                check_len(el, &record[1], DbFieldLength::COUNTRY_NAME, "Country name", "countries.csv", &line);
                countries.push(Country { code: record[0].to_string(), name: record[1].to_string() });
            }
        }
    }

    let mut regions = Vec::new();
    let mut region_index = FxHashMap::default();
    match semi_reader(&hwy_path.join("regions.csv")) {
        Err(e) => el.add(e.to_string()),
        Ok(mut rdr) => {
            for record in rdr.records() {
                let record = record?;
                let line = record_line(&record);
                if record.len() != 5 {
                    el.add(format!(
                        "Could not parse regions.csv line: [{line}], expected 5 fields, found {}",
                        record.len()
                    ));
                    continue;
                }
                check_len(el, &record[0], DbFieldLength::REGION_CODE, "Region code", "regions.csv", &line);
                check_len(el, &record[1], DbFieldLength::REGION_NAME, "Region name", "regions.csv", &line);
                if !countries.iter().any(|c| c.code == &record[2]) {
                    el.add(format!("Could not find country matching regions.csv line: {line}"));
                }
                if !continents.iter().any(|c| c.code == &record[3]) {
                    el.add(format!("Could not find continent matching regions.csv line: {line}"));
                }
                check_len(el, &record[4], DbFieldLength::REGION_TYPE, "Region type", "regions.csv", &line);
                region_index.insert(record[0].to_string(), regions.len());
                regions.push(Region {
                    code: record[0].to_string(),
                    name: record[1].to_string(),
                    country: record[2].to_string(),
                    continent: record[3].to_string(),
                    region_type: record[4].to_string(),
                });
            }
        }
    }

    Ok(Descriptors { continents, countries, regions, region_index })
}

// ── Update history ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct UpdateRow {
    date: String,
    region: String,
    route: String,
    root: String,
    description: String,
}

/// Read `updates.csv`: pass-through rows with length validation.
pub fn read_updates(hwy_path: &Path, el: &ErrorList) -> IngestResult<Vec<UpdateRecord>> {
    let mut updates = Vec::new();
    let mut rdr = match semi_reader(&hwy_path.join("updates.csv")) {
        Err(e) => {
            el.add(e.to_string());
            return Ok(updates);
        }
        Ok(rdr) => rdr,
    };
    for record in rdr.records() {
        let record = record?;
        let line = record_line(&record);
        let row: UpdateRow = match record.deserialize(None) {
            Err(_) => {
                el.add(format!(
                    "Could not parse updates.csv line: [{line}], expected 5 fields, found {}",
                    record.len()
                ));
                continue;
            }
            Ok(row) => row,
        };
        check_len(el, &row.date, DbFieldLength::DATE, "date", "updates.csv", &line);
        check_len(el, &row.region, DbFieldLength::COUNTRY_REGION, "region", "updates.csv", &line);
        check_len(el, &row.route, DbFieldLength::ROUTE_LONG_NAME, "route", "updates.csv", &line);
        check_len(el, &row.root, DbFieldLength::ROOT, "root", "updates.csv", &line);
        check_len(el, &row.description, DbFieldLength::UPDATE_TEXT, "description", "updates.csv", &line);
        updates.push(UpdateRecord {
            date: row.date,
            region: row.region,
            route: row.route,
            root: row.root,
            description: row.description,
        });
    }
    Ok(updates)
}

#[derive(Deserialize)]
struct SystemUpdateRow {
    date: String,
    region: String,
    system_name: String,
    description: String,
    status_change: String,
}

/// Read `systemupdates.csv`: pass-through rows with length validation.
pub fn read_system_updates(hwy_path: &Path, el: &ErrorList) -> IngestResult<Vec<SystemUpdate>> {
    let mut updates = Vec::new();
    let mut rdr = match semi_reader(&hwy_path.join("systemupdates.csv")) {
        Err(e) => {
            el.add(e.to_string());
            return Ok(updates);
        }
        Ok(rdr) => rdr,
    };
    for record in rdr.records() {
        let record = record?;
        let line = record_line(&record);
        let row: SystemUpdateRow = match record.deserialize(None) {
            Err(_) => {
                el.add(format!(
                    "Could not parse systemupdates.csv line: [{line}], expected 5 fields, found {}",
                    record.len()
                ));
                continue;
            }
            Ok(row) => row,
        };
        check_len(el, &row.date, DbFieldLength::DATE, "date", "systemupdates.csv", &line);
        check_len(el, &row.region, DbFieldLength::COUNTRY_REGION, "region", "systemupdates.csv", &line);
        check_len(el, &row.system_name, DbFieldLength::SYSTEM_NAME, "systemName", "systemupdates.csv", &line);
        check_len(el, &row.description, DbFieldLength::SYSTEM_FULL_NAME, "description", "systemupdates.csv", &line);
        check_len(el, &row.status_change, DbFieldLength::STATUS_CHANGE, "statusChange", "systemupdates.csv", &line);
        updates.push(SystemUpdate {
            date: row.date,
            region: row.region,
            system_name: row.system_name,
            description: row.description,
            status_change: row.status_change,
        });
    }
    Ok(updates)
}

/// Read `nmpfps.log`: known intentional near-miss pair lines, matched
/// verbatim against the generated near-miss log lines.
pub fn read_nmp_fps(hwy_path: &Path) -> std::collections::BTreeSet<String> {
    let mut fps = std::collections::BTreeSet::new();
    let Ok(contents) = std::fs::read_to_string(hwy_path.join("nmpfps.log")) else {
        return fps;
    };
    for line in contents.lines() {
        let line = line.trim_end_matches([' ', '\n']);
        if !line.is_empty() {
            fps.insert(line.to_string());
        }
    }
    fps
}

/// Read `listupdates.txt`: per-traveler commit timestamps, four
/// space-separated fields per line (`<user>.list date time zone`).
/// The file is optional.
pub fn read_list_updates(path: &Path) -> FxHashMap<String, ListUpdate> {
    let mut updates = FxHashMap::default();
    let Ok(contents) = std::fs::read_to_string(path) else {
        return updates;
    };
    for line in contents.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            log::warn!(
                "Could not parse listupdates.txt line: [{line}], expected 4 fields, found {}",
                fields.len()
            );
            continue;
        }
        updates.insert(
            fields[0].to_string(),
            ListUpdate {
                date: fields[1].to_string(),
                time: fields[2].to_string(),
                zone: fields[3].to_string(),
            },
        );
    }
    updates
}
