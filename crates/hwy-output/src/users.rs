//! Per-traveler stats log entries and `users/<name>.log` files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use hwy_model::{HighwayData, TravelerList, UpdateRecord};
use hwy_travel::RegionStats;

use crate::logs::log_header;
use crate::OutputResult;

/// `"<clinched> of <total> mi (<pct>%)"`.
pub fn format_clinched_mi(clinched: f64, total: f64) -> String {
    let percentage = if total != 0.0 {
        format!("({:.2}%)", 100.0 * clinched / total)
    } else {
        "-.--%".to_string()
    };
    format!("{clinched:.2} of {total:.2} mi {percentage}")
}

/// Clinched-stats rows destined for the SQL dump, collected while the
/// per-traveler log entries are generated.
#[derive(Default)]
pub struct ClinchedTables {
    /// (system, region, traveler, miles)
    pub system_mileage_by_region: Vec<(String, String, String, f64)>,
    /// (first root, traveler, miles, clinched)
    pub connected_routes: Vec<(String, String, f64, bool)>,
    /// (root, traveler, miles, clinched)
    pub routes: Vec<(String, String, f64, bool)>,
}

/// Append each traveler's clinched-statistics section to their log and
/// collect the clinched table rows for the database.
pub fn build_traveler_stats(
    data: &HighwayData,
    travelers: &mut [TravelerList],
    stats: &RegionStats,
    updates: &[UpdateRecord],
) -> ClinchedTables {
    log::info!("Creating per-traveler stats log entries");
    let mut tables = ClinchedTables::default();
    let active_systems = data.systems.iter().filter(|h| h.active()).count();
    let preview_systems = data.systems.iter().filter(|h| h.preview()).count();

    for (i, t) in travelers.iter_mut().enumerate() {
        let tid = hwy_core::TravelerId(i as u32);
        t.log_entries.push("Clinched Highway Statistics".to_string());
        t.log_entries.push(format!(
            "Overall in active systems: {}",
            format_clinched_mi(t.active_only_miles(), stats.active_only_miles())
        ));
        t.log_entries.push(format!(
            "Overall in active+preview systems: {}",
            format_clinched_mi(t.active_preview_miles(), stats.active_preview_miles())
        ));

        t.log_entries
            .push("Overall by region: (each line reports active only then active+preview)".to_string());
        for (region, &preview_miles) in &t.active_preview_mileage_by_region {
            let active_miles = t.active_only_mileage_by_region.get(region).copied().unwrap_or(0.0);
            let total_active =
                stats.active_only_mileage_by_region.get(region).copied().unwrap_or(0.0);
            t.log_entries.push(format!(
                "{region}: {}, {}",
                format_clinched_mi(active_miles, total_active),
                format_clinched_mi(
                    preview_miles,
                    stats.active_preview_mileage_by_region.get(region).copied().unwrap_or(0.0)
                )
            ));
        }

        let mut active_traveled = 0;
        let mut active_clinched = 0;
        let mut preview_traveled = 0;
        let mut preview_clinched = 0;

        for system in &data.systems {
            if !system.active_or_preview() {
                continue;
            }
            let t_system_overall = t.system_miles(&system.name);
            if t_system_overall <= 0.0 {
                continue;
            }
            if system.active() {
                active_traveled += 1;
            } else {
                preview_traveled += 1;
            }
            if t_system_overall == system.total_mileage() {
                if system.active() {
                    active_clinched += 1;
                } else {
                    preview_clinched += 1;
                }
            }

            t.log_entries.push(format!(
                "System {} ({}) overall: {}",
                system.name,
                system.level,
                format_clinched_mi(t_system_overall, system.total_mileage())
            ));
            if system.mileage_by_region.len() > 1 {
                t.log_entries.push(format!("System {} by region:", system.name));
            }
            for (region, &system_region_miles) in &system.mileage_by_region {
                let mine = t
                    .system_region_mileages
                    .get(&system.name)
                    .and_then(|by_region| by_region.get(region))
                    .copied()
                    .unwrap_or(0.0);
                if mine > 0.0 {
                    tables.system_mileage_by_region.push((
                        system.name.clone(),
                        region.clone(),
                        t.name.clone(),
                        mine,
                    ));
                }
                if system.mileage_by_region.len() > 1 {
                    t.log_entries.push(format!(
                        "  {region}: {}",
                        format_clinched_mi(mine, system_region_miles)
                    ));
                }
            }

            let mut con_routes_traveled = 0;
            let mut con_routes_clinched = 0;
            t.log_entries
                .push(format!("System {} by route (traveled routes only):", system.name));
            for &cr in &system.con_routes {
                let con = data.con_route(cr);
                let mut con_clinched_miles = 0.0;
                let mut member_lines = String::new();
                for &r in &con.roots {
                    let route = data.route(r);
                    let miles = data.route_miles_clinched_by(r, tid);
                    if miles > 0.0 {
                        tables.routes.push((
                            route.root.clone(),
                            t.name.clone(),
                            miles,
                            miles >= route.mileage,
                        ));
                        con_clinched_miles += miles;
                        member_lines.push_str(&format!(
                            "  {}: {}\n",
                            route.readable_name(),
                            format_clinched_mi(miles, route.mileage)
                        ));
                    }
                }
                if con_clinched_miles > 0.0 {
                    con_routes_traveled += 1;
                    let clinched = con_clinched_miles == con.mileage;
                    if clinched {
                        con_routes_clinched += 1;
                    }
                    tables.connected_routes.push((
                        data.route(con.roots[0]).root.clone(),
                        t.name.clone(),
                        con_clinched_miles,
                        clinched,
                    ));
                    t.log_entries.push(format!(
                        "{}: {}",
                        con.readable_name(),
                        format_clinched_mi(con_clinched_miles, con.mileage)
                    ));
                    if con.roots.len() == 1 {
                        t.log_entries
                            .push(format!(" ({} only)", data.route(con.roots[0]).readable_name()));
                    } else {
                        t.log_entries.push(member_lines);
                    }
                }
            }
            t.log_entries.push(format!(
                "System {} connected routes traveled: {} of {} ({:.1}%), clinched: {} of {} ({:.1}%).",
                system.name,
                con_routes_traveled,
                system.con_routes.len(),
                percent(con_routes_traveled, system.con_routes.len()),
                con_routes_clinched,
                system.con_routes.len(),
                percent(con_routes_clinched, system.con_routes.len()),
            ));
        }

        t.log_entries.push(format!(
            "\nTraveled {active_traveled} of {active_systems} ({:.1}%), Clinched {active_clinched} of {active_systems} ({:.1}%) active systems",
            percent(active_traveled, active_systems),
            percent(active_clinched, active_systems),
        ));
        t.log_entries.push(format!(
            "Traveled {preview_traveled} of {preview_systems} ({:.1}%), Clinched {preview_clinched} of {preview_systems} ({:.1}%) preview systems",
            percent(preview_traveled, preview_systems),
            percent(preview_clinched, preview_systems),
        ));

        // most recent updates for the routes this list referenced
        t.log_entries.push("\nMost recent updates for listed routes:".to_string());
        let mut updated: Vec<&UpdateRecord> = t
            .routes
            .iter()
            .filter_map(|&r| data.route(r).last_update)
            .map(|i| &updates[i])
            .collect();
        updated.sort_by(|a, b| format!("{}{}", a.date, a.root).cmp(&format!("{}{}", b.date, b.root)));
        for update in updated {
            t.log_entries.push(format!(
                "{} | {} | {} | {} | {}",
                update.date, update.region, update.route, update.root, update.description
            ));
        }
    }
    tables
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 { 0.0 } else { 100.0 * part as f64 / whole as f64 }
}

/// Write `users/<name>.log` for every traveler.
pub fn write_user_logs(travelers: &[TravelerList], log_path: &Path) -> OutputResult<()> {
    log::info!("Writing traveler list logs");
    let users = log_path.join("users");
    std::fs::create_dir_all(&users)?;
    for t in travelers {
        let mut out = BufWriter::new(File::create(users.join(format!("{}.log", t.name)))?);
        log_header(&mut out)?;
        for line in &t.log_entries {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}
