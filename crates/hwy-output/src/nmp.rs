//! Near-miss point outputs.
//!
//! `nearmisspoints.log` lists every waypoint with near-miss neighbors,
//! tagged against the maintainer's `nmpfps.log` false-positive lines and
//! annotated when the offsets look like intentional tiny displacements.
//! `tm-master.nmp` carries the same pairs in a plottable two-line form.
//! When a merge path is configured, the `.wpt` tree is rewritten with
//! near-miss coordinates merged.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use hwy_core::WaypointId;
use hwy_model::HighwayData;

use crate::logs::write_plain_log;
use crate::OutputResult;

/// Offset below which a near-miss pair looks like an intentional nudge.
const LOOKS_INTENTIONAL_DEG: f64 = 0.0000015;

/// Write `nearmisspoints.log`, `tm-master.nmp`, and `nmpfpsunmatched.log`.
///
/// Near-miss lists of points whose entries are all matched as false
/// positives or intentional are cleared, so a later merged-wpt rewrite
/// leaves them alone.  `point_order` is the sorted quadtree traversal.
pub fn write_nmp_logs(
    data: &mut HighwayData,
    point_order: &[WaypointId],
    mut nmp_fps: BTreeSet<String>,
    log_path: &Path,
) -> OutputResult<()> {
    log::info!("Near-miss point log and tm-master.nmp file");
    let mut log_lines = Vec::new();
    let mut nmp_file = BufWriter::new(File::create(log_path.join("tm-master.nmp"))?);

    for &w in point_order {
        if data.waypoint(w).near_miss.is_empty() {
            continue;
        }
        // sort for consistent ordering so FP matching is stable
        let mut near_miss = data.waypoints[w.index()].near_miss.clone();
        near_miss.sort_by_key(|&o| {
            let op = data.waypoint(o);
            format!("{}@{}", data.route(op.route).root, op.label)
        });
        data.waypoints[w.index()].near_miss = near_miss.clone();

        let mut nmp_line = format!("{} NMP", data.waypoint_str(w));
        for &o in &near_miss {
            nmp_line.push(' ');
            nmp_line.push_str(&data.waypoint_str(o));
        }

        // check the line (with possible tags) against the FP list
        let mut fp = nmp_fps.remove(&nmp_line);
        if !fp {
            for tag in [" [LOOKS INTENTIONAL]", " [SOME LOOK INTENTIONAL]"] {
                if nmp_fps.remove(&format!("{nmp_line}{tag}")) {
                    fp = true;
                    break;
                }
            }
        }

        // plottable pair lines, each pair written once
        let wp = data.waypoint(w);
        let w_label = format!("{}@{}", data.route(wp.route).root, wp.label);
        let mut li_count = 0;
        for &o in &near_miss {
            let op = data.waypoint(o);
            let li = (wp.point.lat - op.point.lat).abs() < LOOKS_INTENTIONAL_DEG
                && (wp.point.lng - op.point.lng).abs() < LOOKS_INTENTIONAL_DEG;
            if li {
                li_count += 1;
            }
            let o_label = format!("{}@{}", data.route(op.route).root, op.label);
            if w_label < o_label {
                for (label, point) in [(&w_label, wp.point), (&o_label, op.point)] {
                    write!(nmp_file, "{label} {} {}", point.lat, point.lng)?;
                    if fp || li {
                        write!(nmp_file, " ")?;
                        if fp {
                            write!(nmp_file, "FP")?;
                        }
                        if li {
                            write!(nmp_file, "LI")?;
                        }
                    }
                    writeln!(nmp_file)?;
                }
            }
        }

        let mut log_line = nmp_line;
        if li_count > 0 {
            if li_count == near_miss.len() {
                log_line.push_str(" [LOOKS INTENTIONAL]");
            } else {
                log_line.push_str(" [SOME LOOK INTENTIONAL]");
            }
            data.waypoints[w.index()].near_miss.clear();
        }
        if fp {
            log_line.push_str(" [MARKED FP]");
            data.waypoints[w.index()].near_miss.clear();
        }
        log_lines.push(log_line);
    }
    drop(nmp_file);

    log_lines.sort();
    let mut log_file = BufWriter::new(File::create(log_path.join("nearmisspoints.log"))?);
    for line in &log_lines {
        writeln!(log_file, "{line}")?;
    }
    drop(log_file);

    let unmatched: Vec<String> = nmp_fps.into_iter().collect();
    write_plain_log(&log_path.join("nmpfpsunmatched.log"), &unmatched)?;
    Ok(())
}

/// Rewrite the `.wpt` tree under `merge_path` with near-miss coordinates
/// merged: surviving near-miss points take the northernmost latitude and
/// easternmost longitude of their cluster, marked by an `https` URL.
pub fn write_nmp_merged(data: &HighwayData, merge_path: &Path) -> OutputResult<()> {
    log::info!("Writing near-miss point merged wpt files");
    for system in &data.systems {
        for &r in &system.routes {
            let route = data.route(r);
            let dir = merge_path.join(&route.region).join(&system.name);
            std::fs::create_dir_all(&dir)?;
            let mut out = BufWriter::new(File::create(dir.join(format!("{}.wpt", route.root)))?);
            for &w in &route.points {
                let wp = data.waypoint(w);
                write!(out, "{} ", wp.label)?;
                for alt in &wp.alt_labels {
                    write!(out, "{alt} ")?;
                }
                if wp.near_miss.is_empty() {
                    writeln!(
                        out,
                        "http://www.openstreetmap.org/?lat={:.6}&lon={:.6}",
                        wp.point.lat, wp.point.lng
                    )?;
                } else {
                    let mut lat = wp.point.lat;
                    let mut lng = wp.point.lng;
                    for &o in &wp.near_miss {
                        let op = data.waypoint(o);
                        lat = lat.max(op.point.lat);
                        lng = lng.max(op.point.lng);
                    }
                    writeln!(
                        out,
                        "https://www.openstreetmap.org/?lat={lat:.6}&lon={lng:.6}"
                    )?;
                }
            }
        }
    }
    Ok(())
}
