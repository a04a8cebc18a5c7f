//! Subgraph generation directives from the `graphs/` CSVs.
//!
//! Four small `;`-separated files steer subgraph emission: area graphs
//! (place + radius), single-system graphs, multi-system groups, and
//! multi-region groups.  Country and continent groupings are derived from
//! the region descriptors instead and need no file here.

use std::path::Path;

use serde::Deserialize;

use hwy_core::{DbFieldLength, ErrorList};

use crate::descriptors::semi_reader;
use crate::IngestResult;

/// One row of `areagraphs.csv`: a named place with a radius in miles.
#[derive(Clone, Debug)]
pub struct AreaGraph {
    pub descr: String,
    pub title: String,
    pub lat: f64,
    pub lng: f64,
    pub radius: u32,
}

/// One row of `multisystem.csv` or `multiregion.csv`.
#[derive(Clone, Debug)]
pub struct GroupGraph {
    pub descr: String,
    pub title: String,
    /// System names or region codes, per file.
    pub members: Vec<String>,
}

#[derive(Deserialize)]
struct AreaRow {
    descr: String,
    title: String,
    lat: String,
    lng: String,
    radius: String,
}

/// Read `graphs/areagraphs.csv`.
pub fn read_area_graphs(hwy_path: &Path, el: &ErrorList) -> IngestResult<Vec<AreaGraph>> {
    let mut areas = Vec::new();
    let mut rdr = match semi_reader(&hwy_path.join("graphs/areagraphs.csv")) {
        Err(e) => {
            el.add(e.to_string());
            return Ok(areas);
        }
        Ok(rdr) => rdr,
    };
    for record in rdr.records() {
        let record = record?;
        let line = record.iter().collect::<Vec<_>>().join(";");
        let row: AreaRow = match record.deserialize(None) {
            Err(_) => {
                el.add(format!(
                    "Could not parse areagraphs.csv line: [{line}], expected 5 fields, found {}",
                    record.len()
                ));
                continue;
            }
            Ok(row) => row,
        };
        // filename and description carry the radius, so the limits shrink
        if row.descr.len() + row.radius.len() > DbFieldLength::GRAPH_DESCR - 13 {
            el.add(format!(
                "description + radius is too long by {} byte(s) in areagraphs.csv line: {line}",
                row.descr.len() + row.radius.len() + 13 - DbFieldLength::GRAPH_DESCR
            ));
        }
        if row.title.len() + row.radius.len() > DbFieldLength::GRAPH_FILENAME - 19 {
            el.add(format!(
                "title + radius = filename too long by {} byte(s) in areagraphs.csv line: {line}",
                row.title.len() + row.radius.len() + 19 - DbFieldLength::GRAPH_FILENAME
            ));
        }
        let lat = row.lat.parse::<f64>().unwrap_or_else(|_| {
            el.add(format!("invalid lat in areagraphs.csv line: {line}"));
            0.0
        });
        let lng = row.lng.parse::<f64>().unwrap_or_else(|_| {
            el.add(format!("invalid lng in areagraphs.csv line: {line}"));
            0.0
        });
        let radius = match row.radius.parse::<u32>() {
            Ok(r) if r > 0 => r,
            _ => {
                el.add(format!("invalid radius in areagraphs.csv line: {line}"));
                1
            }
        };
        areas.push(AreaGraph { descr: row.descr, title: row.title, lat, lng, radius });
    }
    Ok(areas)
}

/// Read `graphs/systemgraphs.csv`: one system name per line.
pub fn read_system_graphs(hwy_path: &Path, el: &ErrorList) -> IngestResult<Vec<String>> {
    let mut systems = Vec::new();
    let mut rdr = match semi_reader(&hwy_path.join("graphs/systemgraphs.csv")) {
        Err(e) => {
            el.add(e.to_string());
            return Ok(systems);
        }
        Ok(rdr) => rdr,
    };
    for record in rdr.records() {
        let record = record?;
        if let Some(name) = record.get(0) {
            let name = name.trim();
            if !name.is_empty() {
                systems.push(name.to_string());
            }
        }
    }
    Ok(systems)
}

#[derive(Deserialize)]
struct GroupRow {
    descr: String,
    title: String,
    members: String,
}

fn read_group_graphs(path: &Path, file: &str, el: &ErrorList) -> IngestResult<Vec<GroupGraph>> {
    let mut groups = Vec::new();
    let mut rdr = match semi_reader(path) {
        Err(e) => {
            el.add(e.to_string());
            return Ok(groups);
        }
        Ok(rdr) => rdr,
    };
    for record in rdr.records() {
        let record = record?;
        let line = record.iter().collect::<Vec<_>>().join(";");
        let row: GroupRow = match record.deserialize(None) {
            Err(_) => {
                el.add(format!(
                    "Could not parse {file} line: [{line}], expected 3 fields, found {}",
                    record.len()
                ));
                continue;
            }
            Ok(row) => row,
        };
        if row.descr.len() > DbFieldLength::GRAPH_DESCR {
            el.add(format!(
                "description > {} bytes in {file} line: {line}",
                DbFieldLength::GRAPH_DESCR
            ));
        }
        if row.title.len() > DbFieldLength::GRAPH_FILENAME - 14 {
            el.add(format!(
                "title > {} bytes in {file} line: {line}",
                DbFieldLength::GRAPH_FILENAME - 14
            ));
        }
        groups.push(GroupGraph {
            descr: row.descr,
            title: row.title,
            members: row.members.split(',').map(str::to_string).collect(),
        });
    }
    Ok(groups)
}

/// Read `graphs/multisystem.csv`.
pub fn read_multisystem_graphs(hwy_path: &Path, el: &ErrorList) -> IngestResult<Vec<GroupGraph>> {
    read_group_graphs(&hwy_path.join("graphs/multisystem.csv"), "multisystem.csv", el)
}

/// Read `graphs/multiregion.csv`.
pub fn read_multiregion_graphs(hwy_path: &Path, el: &ErrorList) -> IngestResult<Vec<GroupGraph>> {
    read_group_graphs(&hwy_path.join("graphs/multiregion.csv"), "multiregion.csv", el)
}
