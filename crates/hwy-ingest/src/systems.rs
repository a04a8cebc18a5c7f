//! Highway-system and route CSV ingestion.
//!
//! `systems.csv` names every system; each system then contributes
//! `<sys>.csv` (its chopped routes, 8 fields) and `<sys>_con.csv` (its
//! connected routes, 5 fields).  All route name lookups later in the
//! pipeline go through the [`RouteRegistry`] built here.

use std::path::Path;
use std::str::FromStr;

use hwy_core::{ConRouteId, DbFieldLength, ErrorList, RouteId, SystemId};
use hwy_model::{ConnectedRoute, HighwayData, HighwaySystem, Route, RouteRegistry, SystemLevel};

use crate::descriptors::{Descriptors, semi_reader};
use crate::IngestResult;

fn record_line(record: &csv::StringRecord) -> String {
    record.iter().collect::<Vec<_>>().join(";")
}

/// Read `systems.csv` and every per-system route CSV.
///
/// Populates `data.systems`, `data.routes`, `data.con_routes`, and the
/// registry.  `systems_path` is the directory holding the CSVs
/// (`<hwy_path>/hwy_data/_systems`).
pub fn read_systems(
    data: &mut HighwayData,
    registry: &mut RouteRegistry,
    descriptors: &Descriptors,
    systems_file: &Path,
    systems_path: &Path,
    el: &ErrorList,
) -> IngestResult<()> {
    let mut rdr = match semi_reader(systems_file) {
        Err(e) => {
            el.add(e.to_string());
            return Ok(());
        }
        Ok(rdr) => rdr,
    };
    for record in rdr.records() {
        let record = record?;
        let line = record_line(&record);
        if line.starts_with('#') {
            log::info!("Ignored comment in {}: {line}", systems_file.display());
            continue;
        }
        if record.len() != 6 {
            el.add(format!(
                "Could not parse {} line: [{line}], expected 6 fields, found {}",
                systems_file.display(),
                record.len()
            ));
            continue;
        }
        if record[0].len() > DbFieldLength::SYSTEM_NAME {
            el.add(format!(
                "System code > {} bytes in {} line {line}",
                DbFieldLength::SYSTEM_NAME,
                systems_file.display()
            ));
        }
        if !descriptors.has_country(&record[1]) {
            el.add(format!(
                "Could not find country matching {} line: {line}",
                systems_file.display()
            ));
        }
        if record[2].len() > DbFieldLength::SYSTEM_FULL_NAME {
            el.add(format!(
                "System name > {} bytes in {} line {line}",
                DbFieldLength::SYSTEM_FULL_NAME,
                systems_file.display()
            ));
        }
        if record[3].len() > DbFieldLength::COLOR {
            el.add(format!(
                "Color > {} bytes in {} line {line}",
                DbFieldLength::COLOR,
                systems_file.display()
            ));
        }
        let tier = match record[4].parse::<u32>() {
            Ok(t) if t >= 1 => t,
            _ => {
                el.add(format!("Invalid tier in {} line {line}", systems_file.display()));
                1
            }
        };
        let level = match SystemLevel::from_str(&record[5]) {
            Ok(level) => level,
            Err(()) => {
                el.add(format!(
                    "Unrecognized level in {} line: {line}",
                    systems_file.display()
                ));
                SystemLevel::Devel
            }
        };

        log::info!("Reading system {}", &record[0]);
        let system = HighwaySystem::new(
            record[0].to_string(),
            record[1].to_string(),
            record[2].to_string(),
            record[3].to_string(),
            tier,
            level,
        );
        let sys_id = SystemId(data.systems.len() as u16);
        data.systems.push(system);
        read_system_routes(data, registry, descriptors, sys_id, systems_path, el)?;
        read_connected_routes(data, registry, sys_id, systems_path, el)?;
    }
    Ok(())
}

/// Read one system's `<sys>.csv` of chopped routes.
fn read_system_routes(
    data: &mut HighwayData,
    registry: &mut RouteRegistry,
    descriptors: &Descriptors,
    sys_id: SystemId,
    systems_path: &Path,
    el: &ErrorList,
) -> IngestResult<()> {
    let sysname = data.system(sys_id).name.clone();
    let csv_name = format!("{sysname}.csv");
    let mut rdr = match semi_reader(&systems_path.join(&csv_name)) {
        Err(e) => {
            el.add(e.to_string());
            return Ok(());
        }
        Ok(rdr) => rdr,
    };
    for record in rdr.records() {
        let record = record?;
        let line = record_line(&record);
        if record.len() != 8 {
            el.add(format!(
                "Could not parse {csv_name} line: [{line}], expected 8 fields, found {}",
                record.len()
            ));
            continue;
        }
        if record[0] != *sysname {
            el.add(format!(
                "System mismatch parsing {csv_name} line [{line}], expected {sysname}"
            ));
        }
        let region = record[1].to_string();
        if !descriptors.has_region(&region) {
            el.add(format!("Unrecognized region in {csv_name} line: {line}"));
        }
        if record[2].len() > DbFieldLength::ROUTE {
            el.add(format!(
                "Route > {} bytes in {csv_name} line: {line}",
                DbFieldLength::ROUTE
            ));
        }
        if record[3].len() > DbFieldLength::BANNER {
            el.add(format!(
                "Banner > {} bytes in {csv_name} line: {line}",
                DbFieldLength::BANNER
            ));
        }
        if record[4].len() > DbFieldLength::ABBREV {
            el.add(format!(
                "Abbrev > {} bytes in {csv_name} line: {line}",
                DbFieldLength::ABBREV
            ));
        }
        if record[5].len() > DbFieldLength::CITY {
            el.add(format!(
                "City > {} bytes in {csv_name} line: {line}",
                DbFieldLength::CITY
            ));
        }
        let root = record[6].to_lowercase();
        if root.is_empty() {
            el.add(format!("Unable to find root in {csv_name} line: [{line}]"));
            continue;
        }
        if root.len() > DbFieldLength::ROOT {
            el.add(format!(
                "Root > {} bytes in {csv_name} line: {line}",
                DbFieldLength::ROOT
            ));
        }
        let alt_route_names: Vec<String> = if record[7].is_empty() {
            Vec::new()
        } else {
            record[7].to_uppercase().split(',').map(str::to_string).collect()
        };

        let route = Route {
            system: sys_id,
            region,
            route: record[2].to_string(),
            banner: record[3].to_string(),
            abbrev: record[4].to_string(),
            city: record[5].to_string(),
            root: root.clone(),
            alt_route_names,
            root_order: -1,
            ..Default::default()
        };
        let route_id = RouteId(data.routes.len() as u32);

        // Global uniqueness of roots and list names.
        if let Some(&other) = registry.root_hash.get(&root) {
            el.add(format!(
                "Duplicate root in {csv_name}: {root} already in {}.csv",
                data.route_system(other).name
            ));
        } else {
            registry.root_hash.insert(root.clone(), route_id);
        }
        let list_name = route.readable_name().to_uppercase();
        if let Some(other) = registry
            .alt_list_hash
            .get(&list_name)
            .or_else(|| registry.pri_list_hash.get(&list_name))
        {
            el.add(format!(
                "Duplicate main list name in {root}: '{}' already points to {}",
                route.readable_name(),
                data.route(*other).root
            ));
        } else {
            registry.pri_list_hash.insert(list_name, route_id);
        }
        for alt in &route.alt_route_names {
            let alt_name = format!("{} {alt}", route.region.to_uppercase());
            if let Some(other) = registry
                .pri_list_hash
                .get(&alt_name)
                .or_else(|| registry.alt_list_hash.get(&alt_name))
            {
                el.add(format!(
                    "Duplicate alt route name in {root}: '{} {alt}' already points to {}",
                    route.region,
                    data.route(*other).root
                ));
            } else {
                registry.alt_list_hash.insert(alt_name.clone(), route_id);
            }
            data.systems[sys_id.index()].unused_alt_route_names.insert(alt_name);
        }

        data.routes.push(route);
        data.systems[sys_id.index()].routes.push(route_id);
    }
    Ok(())
}

/// Read one system's `<sys>_con.csv` of connected routes.
fn read_connected_routes(
    data: &mut HighwayData,
    registry: &mut RouteRegistry,
    sys_id: SystemId,
    systems_path: &Path,
    el: &ErrorList,
) -> IngestResult<()> {
    let sysname = data.system(sys_id).name.clone();
    let csv_name = format!("{sysname}_con.csv");
    let mut rdr = match semi_reader(&systems_path.join(&csv_name)) {
        Err(e) => {
            el.add(e.to_string());
            return Ok(());
        }
        Ok(rdr) => rdr,
    };
    for record in rdr.records() {
        let record = record?;
        let line = record_line(&record);
        if record.len() != 5 {
            el.add(format!(
                "Could not parse {csv_name} line: [{line}], expected 5 fields, found {}",
                record.len()
            ));
            continue;
        }
        if record[0] != *sysname {
            el.add(format!(
                "System mismatch parsing {csv_name} line [{line}], expected {sysname}"
            ));
        }
        if record[1].len() > DbFieldLength::ROUTE {
            el.add(format!(
                "route > {} bytes in {csv_name} line: {line}",
                DbFieldLength::ROUTE
            ));
        }
        if record[2].len() > DbFieldLength::BANNER {
            el.add(format!(
                "banner > {} bytes in {csv_name} line: {line}",
                DbFieldLength::BANNER
            ));
        }
        if record[3].len() > DbFieldLength::CITY {
            el.add(format!(
                "groupname > {} bytes in {csv_name} line: {line}",
                DbFieldLength::CITY
            ));
        }

        let con_id = ConRouteId(data.con_routes.len() as u32);
        let mut con = ConnectedRoute {
            system: sys_id,
            route: record[1].to_string(),
            banner: record[2].to_string(),
            group_name: record[3].to_string(),
            roots: Vec::new(),
            mileage: 0.0,
        };
        let mut order = 0;
        for root in record[4].to_lowercase().split(',') {
            let Some(&route_id) = registry.root_hash.get(root) else {
                el.add(format!(
                    "Could not find Route matching ConnectedRoute root {root} in system {sysname}."
                ));
                continue;
            };
            con.roots.push(route_id);
            let route = &mut data.routes[route_id.index()];
            if let Some(existing) = route.con_route {
                el.add(format!(
                    "Duplicate root in {csv_name}: {} already in {}_con.csv",
                    route.root,
                    data.systems[data.con_routes[existing.index()].system.index()].name
                ));
            }
            if route.system != sys_id {
                el.add(format!(
                    "System mismatch: chopped route {} from {}.csv in connected route in {csv_name}",
                    route.root,
                    data.systems[route.system.index()].name
                ));
            }
            let route = &mut data.routes[route_id.index()];
            route.con_route = Some(con_id);
            route.root_order = order;
            order += 1;
        }
        if con.roots.is_empty() {
            el.add(format!("No roots in {csv_name} line: {line}"));
        }
        data.con_routes.push(con);
        data.systems[sys_id.index()].con_routes.push(con_id);
    }
    Ok(())
}
