//! The textual SQL dump.
//!
//! One `.sql` file that drops and recreates every table in
//! foreign-key-safe order, then loads the full data set with multi-row
//! inserts.  String values escape single quotes by doubling; big tables
//! batch their inserts to keep statement sizes bounded.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use hwy_core::{DatacheckEntry, DbFieldLength as L};
use hwy_graph::GraphListEntry;
use hwy_ingest::Descriptors;
use hwy_model::{HighwayData, SystemUpdate, TravelerList, UpdateRecord};
use hwy_travel::RegionStats;

use crate::users::ClinchedTables;
use crate::OutputResult;

const INSERT_BATCH: usize = 10_000;

fn esc(s: &str) -> String {
    s.replace('\'', "''")
}

/// Write a multi-row `INSERT INTO <table> VALUES` with batching, skipping
/// the statement entirely when there are no rows.
fn write_insert(out: &mut impl Write, table: &str, rows: &[String]) -> std::io::Result<()> {
    for batch in rows.chunks(INSERT_BATCH) {
        writeln!(out, "INSERT INTO {table} VALUES")?;
        for (i, row) in batch.iter().enumerate() {
            if i > 0 {
                write!(out, ",")?;
            }
            writeln!(out, "({row})")?;
        }
        writeln!(out, ";")?;
    }
    Ok(())
}

/// A per-category description for the `graphTypes` table.
pub struct GraphType {
    pub category: &'static str,
    pub descr: &'static str,
    pub long_descr: &'static str,
}

/// Write the complete database dump.
#[allow(clippy::too_many_arguments)]
pub fn write_sql_dump(
    path: &Path,
    data: &HighwayData,
    descriptors: &Descriptors,
    updates: &[UpdateRecord],
    system_updates: &[SystemUpdate],
    travelers: &[TravelerList],
    stats: &RegionStats,
    clinched_tables: &ClinchedTables,
    datachecks: &[DatacheckEntry],
    graph_list: &[GraphListEntry],
    graph_types: &[GraphType],
) -> OutputResult<()> {
    log::info!("Writing database file {}", path.display());
    let mut out = BufWriter::new(File::create(path)?);

    // drop in reverse dependency order
    for table in [
        "datacheckErrors",
        "clinchedConnectedRoutes",
        "clinchedRoutes",
        "clinchedOverallMileageByRegion",
        "clinchedSystemMileageByRegion",
        "overallMileageByRegion",
        "systemMileageByRegion",
        "clinched",
        "segments",
        "waypoints",
        "connectedRouteRoots",
        "connectedRoutes",
        "routes",
        "systems",
        "updates",
        "systemUpdates",
        "regions",
        "countries",
        "continents",
    ] {
        writeln!(out, "DROP TABLE IF EXISTS {table};")?;
    }

    // ── Geography ─────────────────────────────────────────────────────────

    writeln!(
        out,
        "CREATE TABLE continents (code VARCHAR({}), name VARCHAR({}), PRIMARY KEY(code));",
        L::CONTINENT_CODE,
        L::CONTINENT_NAME
    )?;
    let rows: Vec<String> = descriptors
        .continents
        .iter()
        .map(|c| format!("'{}','{}'", c.code, esc(&c.name)))
        .collect();
    write_insert(&mut out, "continents", &rows)?;

    writeln!(
        out,
        "CREATE TABLE countries (code VARCHAR({}), name VARCHAR({}), PRIMARY KEY(code));",
        L::COUNTRY_CODE,
        L::COUNTRY_NAME
    )?;
    let rows: Vec<String> = descriptors
        .countries
        .iter()
        .map(|c| format!("'{}','{}'", c.code, esc(&c.name)))
        .collect();
    write_insert(&mut out, "countries", &rows)?;

    writeln!(
        out,
        "CREATE TABLE regions (code VARCHAR({}), name VARCHAR({}), country VARCHAR({}), continent VARCHAR({}), regiontype VARCHAR({}), \
         PRIMARY KEY(code), FOREIGN KEY (country) REFERENCES countries(code), FOREIGN KEY (continent) REFERENCES continents(code));",
        L::REGION_CODE,
        L::REGION_NAME,
        L::COUNTRY_CODE,
        L::CONTINENT_CODE,
        L::REGION_TYPE
    )?;
    let rows: Vec<String> = descriptors
        .regions
        .iter()
        .map(|r| {
            format!(
                "'{}','{}','{}','{}','{}'",
                r.code,
                esc(&r.name),
                r.country,
                r.continent,
                r.region_type
            )
        })
        .collect();
    write_insert(&mut out, "regions", &rows)?;

    // ── Update history ────────────────────────────────────────────────────

    writeln!(
        out,
        "CREATE TABLE updates (date VARCHAR({}), region VARCHAR({}), route VARCHAR({}), root VARCHAR({}), description VARCHAR({}));",
        L::DATE,
        L::COUNTRY_REGION,
        L::ROUTE_LONG_NAME,
        L::ROOT,
        L::UPDATE_TEXT
    )?;
    let rows: Vec<String> = updates
        .iter()
        .map(|u| {
            format!(
                "'{}','{}','{}','{}','{}'",
                u.date,
                esc(&u.region),
                esc(&u.route),
                u.root,
                esc(&u.description)
            )
        })
        .collect();
    write_insert(&mut out, "updates", &rows)?;

    writeln!(
        out,
        "CREATE TABLE systemUpdates (date VARCHAR({}), region VARCHAR({}), systemName VARCHAR({}), description VARCHAR({}), statusChange VARCHAR({}));",
        L::DATE,
        L::COUNTRY_REGION,
        L::SYSTEM_NAME,
        L::SYSTEM_FULL_NAME,
        L::STATUS_CHANGE
    )?;
    let rows: Vec<String> = system_updates
        .iter()
        .map(|u| {
            format!(
                "'{}','{}','{}','{}','{}'",
                u.date,
                esc(&u.region),
                u.system_name,
                esc(&u.description),
                u.status_change
            )
        })
        .collect();
    write_insert(&mut out, "systemUpdates", &rows)?;

    // ── Systems and routes ────────────────────────────────────────────────

    writeln!(
        out,
        "CREATE TABLE systems (systemName VARCHAR({}), countryCode CHAR({}), fullName VARCHAR({}), color VARCHAR({}), \
         level VARCHAR({}), tier INTEGER, csvOrder INTEGER, PRIMARY KEY(systemName));",
        L::SYSTEM_NAME,
        L::COUNTRY_CODE,
        L::SYSTEM_FULL_NAME,
        L::COLOR,
        L::LEVEL
    )?;
    let rows: Vec<String> = data
        .systems
        .iter()
        .enumerate()
        .map(|(i, h)| {
            format!(
                "'{}','{}','{}','{}','{}','{}','{i}'",
                h.name,
                h.country,
                esc(&h.fullname),
                h.color,
                h.level,
                h.tier
            )
        })
        .collect();
    write_insert(&mut out, "systems", &rows)?;

    writeln!(
        out,
        "CREATE TABLE routes (systemName VARCHAR({}), region VARCHAR({}), route VARCHAR({}), banner VARCHAR({}), abbrev VARCHAR({}), \
         city VARCHAR({}), root VARCHAR({}), mileage FLOAT, rootOrder INTEGER, csvOrder INTEGER, \
         PRIMARY KEY(root), FOREIGN KEY (systemName) REFERENCES systems(systemName));",
        L::SYSTEM_NAME,
        L::REGION_CODE,
        L::ROUTE,
        L::BANNER,
        L::ABBREV,
        L::CITY,
        L::ROOT
    )?;
    let mut rows = Vec::new();
    for system in &data.systems {
        for &r in &system.routes {
            let route = data.route(r);
            rows.push(format!(
                "'{}','{}','{}','{}','{}','{}','{}','{}','{}','{}'",
                system.name,
                route.region,
                route.route,
                route.banner,
                route.abbrev,
                esc(&route.city),
                route.root,
                route.mileage,
                route.root_order,
                rows.len()
            ));
        }
    }
    write_insert(&mut out, "routes", &rows)?;

    writeln!(
        out,
        "CREATE TABLE connectedRoutes (systemName VARCHAR({}), route VARCHAR({}), banner VARCHAR({}), groupName VARCHAR({}), \
         firstRoot VARCHAR({}), mileage FLOAT, csvOrder INTEGER, PRIMARY KEY(firstRoot), FOREIGN KEY (firstRoot) REFERENCES routes(root));",
        L::SYSTEM_NAME,
        L::ROUTE,
        L::BANNER,
        L::CITY,
        L::ROOT
    )?;
    let mut rows = Vec::new();
    for system in &data.systems {
        for &cr in &system.con_routes {
            let con = data.con_route(cr);
            let first_root = con.roots.first().map(|&r| data.route(r).root.as_str()).unwrap_or("");
            rows.push(format!(
                "'{}','{}','{}','{}','{}','{}','{}'",
                system.name,
                con.route,
                con.banner,
                esc(&con.group_name),
                first_root,
                con.mileage,
                rows.len()
            ));
        }
    }
    write_insert(&mut out, "connectedRoutes", &rows)?;

    writeln!(
        out,
        "CREATE TABLE connectedRouteRoots (firstRoot VARCHAR({}), root VARCHAR({}), FOREIGN KEY (firstRoot) REFERENCES connectedRoutes(firstRoot));",
        L::ROOT,
        L::ROOT
    )?;
    let mut rows = Vec::new();
    for con in &data.con_routes {
        for &r in con.roots.iter().skip(1) {
            rows.push(format!(
                "'{}','{}'",
                data.route(con.roots[0]).root,
                data.route(r).root
            ));
        }
    }
    write_insert(&mut out, "connectedRouteRoots", &rows)?;

    // ── Waypoints, segments, clinches ─────────────────────────────────────

    writeln!(
        out,
        "CREATE TABLE waypoints (pointId INTEGER, pointName VARCHAR({}), latitude DOUBLE, longitude DOUBLE, root VARCHAR({}), \
         PRIMARY KEY(pointId), FOREIGN KEY (root) REFERENCES routes(root));",
        L::LABEL,
        L::ROOT
    )?;
    let mut point_num = vec![0usize; data.waypoints.len()];
    let mut next_point = 0usize;
    for system in &data.systems {
        for &r in &system.routes {
            let route = data.route(r);
            let rows: Vec<String> = route
                .points
                .iter()
                .map(|&w| {
                    let wp = data.waypoint(w);
                    point_num[w.index()] = next_point;
                    let row = format!(
                        "'{next_point}','{}','{}','{}','{}'",
                        esc(&wp.label),
                        wp.point.lat,
                        wp.point.lng,
                        route.root
                    );
                    next_point += 1;
                    row
                })
                .collect();
            write_insert(&mut out, "waypoints", &rows)?;
        }
    }
    writeln!(out, "CREATE INDEX `latitude` ON waypoints(`latitude`);")?;
    writeln!(out, "CREATE INDEX `longitude` ON waypoints(`longitude`);")?;

    writeln!(
        out,
        "CREATE TABLE segments (segmentId INTEGER, waypoint1 INTEGER, waypoint2 INTEGER, root VARCHAR({}), \
         PRIMARY KEY (segmentId), FOREIGN KEY (waypoint1) REFERENCES waypoints(pointId), \
         FOREIGN KEY (waypoint2) REFERENCES waypoints(pointId), FOREIGN KEY (root) REFERENCES routes(root));",
        L::ROOT
    )?;
    let mut clinched_rows = Vec::new();
    let mut segment_num = 0usize;
    for system in &data.systems {
        for &r in &system.routes {
            let route = data.route(r);
            let rows: Vec<String> = route
                .segments
                .iter()
                .map(|&s| {
                    let seg = data.segment(s);
                    let row = format!(
                        "'{segment_num}','{}','{}','{}'",
                        point_num[seg.waypoint1.index()],
                        point_num[seg.waypoint2.index()],
                        route.root
                    );
                    for &t in &seg.clinched_by {
                        clinched_rows
                            .push(format!("'{segment_num}','{}'", travelers[t.index()].name));
                    }
                    segment_num += 1;
                    row
                })
                .collect();
            write_insert(&mut out, "segments", &rows)?;
        }
    }

    writeln!(
        out,
        "CREATE TABLE clinched (segmentId INTEGER, traveler VARCHAR({}), FOREIGN KEY (segmentId) REFERENCES segments(segmentId));",
        L::TRAVELER
    )?;
    write_insert(&mut out, "clinched", &clinched_rows)?;

    // ── Mileage tables ────────────────────────────────────────────────────

    writeln!(
        out,
        "CREATE TABLE overallMileageByRegion (region VARCHAR({}), activeMileage FLOAT, activePreviewMileage FLOAT);",
        L::REGION_CODE
    )?;
    let rows: Vec<String> = stats
        .active_preview_mileage_by_region
        .iter()
        .map(|(region, &preview)| {
            let active = stats.active_only_mileage_by_region.get(region).copied().unwrap_or(0.0);
            format!("'{region}','{active}','{preview}'")
        })
        .collect();
    write_insert(&mut out, "overallMileageByRegion", &rows)?;

    writeln!(
        out,
        "CREATE TABLE systemMileageByRegion (systemName VARCHAR({}), region VARCHAR({}), mileage FLOAT, \
         FOREIGN KEY (systemName) REFERENCES systems(systemName));",
        L::SYSTEM_NAME,
        L::REGION_CODE
    )?;
    let mut rows = Vec::new();
    for system in &data.systems {
        if system.active_or_preview() {
            for (region, miles) in &system.mileage_by_region {
                rows.push(format!("'{}','{region}','{miles}'", system.name));
            }
        }
    }
    write_insert(&mut out, "systemMileageByRegion", &rows)?;

    writeln!(
        out,
        "CREATE TABLE clinchedOverallMileageByRegion (region VARCHAR({}), traveler VARCHAR({}), activeMileage FLOAT, activePreviewMileage FLOAT);",
        L::REGION_CODE,
        L::TRAVELER
    )?;
    let mut rows = Vec::new();
    for t in travelers {
        for (region, &preview) in &t.active_preview_mileage_by_region {
            let active = t.active_only_mileage_by_region.get(region).copied().unwrap_or(0.0);
            rows.push(format!("'{region}','{}','{active}','{preview}'", t.name));
        }
    }
    write_insert(&mut out, "clinchedOverallMileageByRegion", &rows)?;

    writeln!(
        out,
        "CREATE TABLE clinchedSystemMileageByRegion (systemName VARCHAR({}), region VARCHAR({}), traveler VARCHAR({}), mileage FLOAT, \
         FOREIGN KEY (systemName) REFERENCES systems(systemName));",
        L::SYSTEM_NAME,
        L::REGION_CODE,
        L::TRAVELER
    )?;
    let rows: Vec<String> = clinched_tables
        .system_mileage_by_region
        .iter()
        .map(|(system, region, traveler, miles)| format!("'{system}','{region}','{traveler}','{miles}'"))
        .collect();
    write_insert(&mut out, "clinchedSystemMileageByRegion", &rows)?;

    writeln!(
        out,
        "CREATE TABLE clinchedConnectedRoutes (route VARCHAR({}), traveler VARCHAR({}), mileage FLOAT, clinched BOOLEAN, \
         FOREIGN KEY (route) REFERENCES connectedRoutes(firstRoot));",
        L::ROOT,
        L::TRAVELER
    )?;
    let rows: Vec<String> = clinched_tables
        .connected_routes
        .iter()
        .map(|(root, traveler, miles, clinched)| {
            format!("'{root}','{traveler}','{miles}','{}'", u8::from(*clinched))
        })
        .collect();
    write_insert(&mut out, "clinchedConnectedRoutes", &rows)?;

    writeln!(
        out,
        "CREATE TABLE clinchedRoutes (route VARCHAR({}), traveler VARCHAR({}), mileage FLOAT, clinched BOOLEAN, \
         FOREIGN KEY (route) REFERENCES routes(root));",
        L::ROOT,
        L::TRAVELER
    )?;
    let rows: Vec<String> = clinched_tables
        .routes
        .iter()
        .map(|(root, traveler, miles, clinched)| {
            format!("'{root}','{traveler}','{miles}','{}'", u8::from(*clinched))
        })
        .collect();
    write_insert(&mut out, "clinchedRoutes", &rows)?;

    // ── Datacheck errors ──────────────────────────────────────────────────

    writeln!(
        out,
        "CREATE TABLE datacheckErrors (route VARCHAR({}), label1 VARCHAR({l}), label2 VARCHAR({l}), label3 VARCHAR({l}), \
         code VARCHAR({}), value VARCHAR({}), falsePositive BOOLEAN, FOREIGN KEY (route) REFERENCES routes(root));",
        L::ROOT,
        L::DC_ERR_CODE,
        L::DC_ERR_VALUE,
        l = L::LABEL
    )?;
    let rows: Vec<String> = datachecks
        .iter()
        .map(|d| {
            let label = |i: usize| d.labels.get(i).map(String::as_str).unwrap_or("");
            format!(
                "'{}','{}','{}','{}','{}','{}','{}'",
                d.root,
                esc(label(0)),
                esc(label(1)),
                esc(label(2)),
                d.code,
                esc(&d.info),
                u8::from(d.fp)
            )
        })
        .collect();
    write_insert(&mut out, "datacheckErrors", &rows)?;

    // ── Graph catalogue ───────────────────────────────────────────────────

    if !graph_list.is_empty() {
        writeln!(out, "DROP TABLE IF EXISTS graphs;")?;
        writeln!(out, "DROP TABLE IF EXISTS graphTypes;")?;
        writeln!(
            out,
            "CREATE TABLE graphTypes (category VARCHAR({}), descr VARCHAR({}), longDescr TEXT, PRIMARY KEY(category));",
            L::GRAPH_CATEGORY,
            L::GRAPH_DESCR
        )?;
        let rows: Vec<String> = graph_types
            .iter()
            .map(|g| format!("'{}','{}','{}'", g.category, g.descr, esc(g.long_descr)))
            .collect();
        write_insert(&mut out, "graphTypes", &rows)?;

        writeln!(
            out,
            "CREATE TABLE graphs (filename VARCHAR({}), descr VARCHAR({}), vertices INTEGER, edges INTEGER, travelers INTEGER, \
             format VARCHAR({}), category VARCHAR({}), FOREIGN KEY (category) REFERENCES graphTypes(category));",
            L::GRAPH_FILENAME,
            L::GRAPH_DESCR,
            L::GRAPH_FORMAT,
            L::GRAPH_CATEGORY
        )?;
        let rows: Vec<String> = graph_list
            .iter()
            .map(|g| {
                format!(
                    "'{}','{}','{}','{}','{}','{}','{}'",
                    g.filename,
                    esc(&g.descr),
                    g.vertices,
                    g.edges,
                    g.travelers,
                    g.format,
                    g.category
                )
            })
            .collect();
        write_insert(&mut out, "graphs", &rows)?;
    }

    Ok(())
}
