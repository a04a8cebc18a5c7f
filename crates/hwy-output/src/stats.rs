//! Per-traveler regional mileage CSVs.
//!
//! Three file families, all travelers × sorted regions with a trailing
//! `TOTAL` row: `allbyregionactiveonly.csv`, `allbyregionactivepreview.csv`,
//! and one `<sys>-all.csv` per system.

use std::collections::BTreeMap;
use std::path::Path;

use hwy_model::{HighwayData, TravelerList};
use hwy_travel::RegionStats;

use crate::OutputResult;

fn write_region_csv(
    path: &Path,
    regions: &[&String],
    rows: &[(&str, &BTreeMap<String, f64>)],
    totals: &BTreeMap<String, f64>,
) -> OutputResult<()> {
    let mut out = csv::Writer::from_path(path)?;
    let mut header = vec!["Traveler".to_string(), "Total".to_string()];
    header.extend(regions.iter().map(|r| (*r).clone()));
    out.write_record(&header)?;

    for (name, by_region) in rows {
        let mut record = vec![name.to_string(), format!("{:.2}", by_region.values().sum::<f64>())];
        for &region in regions {
            record.push(match by_region.get(region) {
                Some(miles) => format!("{miles:.2}"),
                None => "0".to_string(),
            });
        }
        out.write_record(&record)?;
    }

    let mut total_row = vec!["TOTAL".to_string(), format!("{:.2}", totals.values().sum::<f64>())];
    for &region in regions {
        total_row.push(format!("{:.2}", totals.get(region).copied().unwrap_or(0.0)));
    }
    out.write_record(&total_row)?;
    out.flush()?;
    Ok(())
}

/// Write the three stats CSV families into `csv_path`.
pub fn write_stats_csvs(
    data: &HighwayData,
    travelers: &[TravelerList],
    stats: &RegionStats,
    csv_path: &Path,
) -> OutputResult<()> {
    log::info!("Writing stats csv files");

    let regions: Vec<&String> = stats.active_only_mileage_by_region.keys().collect();
    let rows: Vec<(&str, &BTreeMap<String, f64>)> = travelers
        .iter()
        .map(|t| (t.name.as_str(), &t.active_only_mileage_by_region))
        .collect();
    write_region_csv(
        &csv_path.join("allbyregionactiveonly.csv"),
        &regions,
        &rows,
        &stats.active_only_mileage_by_region,
    )?;

    let regions: Vec<&String> = stats.active_preview_mileage_by_region.keys().collect();
    let rows: Vec<(&str, &BTreeMap<String, f64>)> = travelers
        .iter()
        .map(|t| (t.name.as_str(), &t.active_preview_mileage_by_region))
        .collect();
    write_region_csv(
        &csv_path.join("allbyregionactivepreview.csv"),
        &regions,
        &rows,
        &stats.active_preview_mileage_by_region,
    )?;

    for system in &data.systems {
        let regions: Vec<&String> = system.mileage_by_region.keys().collect();
        // only travelers with mileage in this system get a row
        let rows: Vec<(&str, &BTreeMap<String, f64>)> = travelers
            .iter()
            .filter_map(|t| {
                t.system_region_mileages
                    .get(&system.name)
                    .map(|by_region| (t.name.as_str(), by_region))
            })
            .collect();
        write_region_csv(
            &csv_path.join(format!("{}-all.csv", system.name)),
            &regions,
            &rows,
            &system.mileage_by_region,
        )?;
    }
    Ok(())
}
