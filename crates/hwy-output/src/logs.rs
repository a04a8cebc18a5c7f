//! Maintenance log files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use hwy_core::{DatacheckEntry, FpEntry};
use hwy_model::HighwayData;
use hwy_travel::RegionStats;

use crate::OutputResult;

/// Standard first line of most log files.
pub fn log_header(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Log file created at: {}", chrono::Local::now())
}

fn create(path: &Path) -> std::io::Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

/// Write one line per entry, no header (`unprocessedwpts.log`,
/// `waypointsimplification.log`, `nmpfpsunmatched.log`).
pub fn write_plain_log(path: &Path, lines: &[String]) -> OutputResult<()> {
    let mut out = create(path)?;
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Write a header plus one line per entry (`concurrencies.log` and
/// friends).
pub fn write_headed_log(path: &Path, lines: &[String]) -> OutputResult<()> {
    let mut out = create(path)?;
    log_header(&mut out)?;
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// `pointsinuse.log`, `unusedaltlabels.log`, `listnamesinuse.log`, and
/// `unusedaltroutenames.log`: which labels and list names travel lists
/// actually referenced, and which alternates nobody uses anymore.
pub fn write_inuse_logs(data: &HighwayData, log_path: &Path) -> OutputResult<()> {
    let mut piu = create(&log_path.join("pointsinuse.log"))?;
    let mut lniu = create(&log_path.join("listnamesinuse.log"))?;
    let mut uarn = create(&log_path.join("unusedaltroutenames.log"))?;
    log_header(&mut piu)?;
    log_header(&mut lniu)?;
    log_header(&mut uarn)?;

    let mut unused_alt_labels: Vec<String> = Vec::new();
    let mut total_unused_alt_labels = 0;
    let mut total_unused_alt_route_names = 0;

    for system in &data.systems {
        for &r in &system.routes {
            let route = data.route(r);
            if !route.labels_in_use.is_empty() {
                write!(piu, "{}({}):", route.root, route.points.len())?;
                for label in &route.labels_in_use {
                    write!(piu, " {label}")?;
                }
                writeln!(piu)?;
            }
            if !route.unused_alt_labels.is_empty() {
                total_unused_alt_labels += route.unused_alt_labels.len();
                let mut entry = format!("{}({}):", route.root, route.unused_alt_labels.len());
                for label in &route.unused_alt_labels {
                    entry.push(' ');
                    entry.push_str(label);
                }
                unused_alt_labels.push(entry);
            }
        }
        if !system.listnames_in_use.is_empty() {
            write!(lniu, "{}({}):", system.name, system.routes.len())?;
            for name in &system.listnames_in_use {
                write!(lniu, " \"{name}\"")?;
            }
            writeln!(lniu)?;
        }
        if !system.unused_alt_route_names.is_empty() {
            total_unused_alt_route_names += system.unused_alt_route_names.len();
            write!(uarn, "{}({}):", system.name, system.unused_alt_route_names.len())?;
            for name in &system.unused_alt_route_names {
                write!(uarn, " \"{name}\"")?;
            }
            writeln!(uarn)?;
        }
    }
    writeln!(uarn, "Total: {total_unused_alt_route_names}")?;

    unused_alt_labels.sort();
    let mut ual = create(&log_path.join("unusedaltlabels.log"))?;
    log_header(&mut ual)?;
    for entry in unused_alt_labels {
        writeln!(ual, "{entry}")?;
    }
    writeln!(ual, "Total: {total_unused_alt_labels}")?;
    Ok(())
}

/// `highwaydatastats.log`: overall, per-region, per-system, and per-route
/// mileage totals.
pub fn write_highway_data_stats(
    data: &HighwayData,
    stats: &RegionStats,
    log_path: &Path,
) -> OutputResult<()> {
    let mut out = create(&log_path.join("highwaydatastats.log"))?;
    writeln!(out, "Highway mileage as of {}", chrono::Local::now())?;
    writeln!(out, "Active routes (active): {:.2} mi", stats.active_only_miles())?;
    writeln!(out, "Clinchable routes (active, preview): {:.2} mi", stats.active_preview_miles())?;
    writeln!(out, "All routes (active, preview, devel): {:.2} mi", stats.overall_miles())?;
    writeln!(out, "Breakdown by region:")?;
    for (region, &overall) in &stats.overall_mileage_by_region {
        let active = stats.active_only_mileage_by_region.get(region).copied().unwrap_or(0.0);
        let preview = stats.active_preview_mileage_by_region.get(region).copied().unwrap_or(0.0);
        writeln!(
            out,
            "{region}: {active:.2} (active), {preview:.2} (active, preview) {overall:.2} (active, preview, devel)"
        )?;
    }

    for system in &data.systems {
        writeln!(
            out,
            "System {} ({}) total: {:.2} mi",
            system.name,
            system.level,
            system.total_mileage()
        )?;
        if system.mileage_by_region.len() > 1 {
            writeln!(out, "System {} by region:", system.name)?;
            for (region, miles) in &system.mileage_by_region {
                writeln!(out, "{region}: {miles:.2} mi")?;
            }
        }
        writeln!(out, "System {} by route:", system.name)?;
        for &cr in &system.con_routes {
            let con = data.con_route(cr);
            let mut member_lines = String::new();
            for &r in &con.roots {
                let route = data.route(r);
                member_lines
                    .push_str(&format!("  {}: {:.2} mi\n", route.readable_name(), route.mileage));
            }
            write!(out, "{}: {:.2} mi", con.readable_name(), con.mileage)?;
            if con.roots.len() == 1 {
                writeln!(out, " ({} only)", data.route(con.roots[0]).readable_name())?;
            } else {
                writeln!(out)?;
                write!(out, "{member_lines}")?;
            }
        }
    }
    Ok(())
}

/// `datacheck.log`: surviving (non-false-positive) errors, ready to paste
/// into the FP file.
pub fn write_datacheck_log(entries: &[DatacheckEntry], log_path: &Path) -> OutputResult<()> {
    let mut out = create(&log_path.join("datacheck.log"))?;
    log_header(&mut out)?;
    writeln!(out, "Datacheck errors that have been flagged as false positives are not included.")?;
    writeln!(out, "These entries should be in a format ready to paste into datacheckfps.csv.")?;
    writeln!(out, "Root;Waypoint1;Waypoint2;Waypoint3;Error;Info")?;
    if entries.is_empty() {
        writeln!(out, "No datacheck errors found.")?;
    }
    for entry in entries {
        if !entry.fp {
            writeln!(out, "{entry}")?;
        }
    }
    Ok(())
}

/// `nearmatchfps.log`: FP entries that matched an error in everything but
/// the info field, with ready-made corrections.
pub fn write_nearmatch_fps_log(lines: &[String], log_path: &Path) -> OutputResult<()> {
    let mut out = create(&log_path.join("nearmatchfps.log"))?;
    log_header(&mut out)?;
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// `unmatchedfps.log`: FP entries that suppressed nothing.
pub fn write_unmatched_fps_log(unmatched: &[FpEntry], log_path: &Path) -> OutputResult<()> {
    let mut out = create(&log_path.join("unmatchedfps.log"))?;
    log_header(&mut out)?;
    if unmatched.is_empty() {
        writeln!(out, "No unmatched FP entries.")?;
    } else {
        for fp in unmatched {
            writeln!(out, "{fp}")?;
        }
    }
    Ok(())
}
