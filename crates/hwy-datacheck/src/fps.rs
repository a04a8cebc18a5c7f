//! False-positive list handling.
//!
//! Maintainers suppress known-benign datacheck hits via
//! `datacheckfps.csv` (`root;label1;label2;label3;code;info`).  An entry
//! matching an emission in every field suppresses exactly one emission; a
//! match in everything but `info` is surfaced as a near-match with a
//! ready-to-paste correction; entries whose code is in the always-error
//! set are rejected at load time.

use std::path::Path;

use hwy_core::{DatacheckCode, DatacheckEntry, ErrorList, FpEntry};

use crate::DatacheckResult;

/// Read `datacheckfps.csv`, rejecting entries that try to suppress an
/// always-error code.
pub fn read_datacheck_fps(hwy_path: &Path, el: &ErrorList) -> DatacheckResult<Vec<FpEntry>> {
    let path = hwy_path.join("datacheckfps.csv");
    let file = match std::fs::File::open(&path) {
        Err(e) => {
            el.add(format!("{}: {e}", path.display()));
            return Ok(Vec::new());
        }
        Ok(file) => file,
    };
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .quoting(false)
        .flexible(true)
        .has_headers(true)
        .from_reader(file);

    let mut fps = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.iter().collect::<Vec<_>>().join(";");
        if record.len() != 6 {
            el.add(format!(
                "Could not parse datacheckfps.csv line: [{line}], expected 6 fields, found {}",
                record.len()
            ));
            continue;
        }
        if is_always_error(&record[4]) {
            log::warn!("datacheckfps.csv line not allowed (always error): {line}");
            continue;
        }
        fps.push(FpEntry {
            root: record[0].to_string(),
            labels: [record[1].to_string(), record[2].to_string(), record[3].to_string()],
            code: record[4].to_string(),
            info: record[5].to_string(),
        });
    }
    Ok(fps)
}

/// An unknown code is allowed through; it will simply never match and ends
/// up in the unmatched-FP log.
fn is_always_error(code: &str) -> bool {
    code.parse::<DatacheckCode>()
        .map(DatacheckCode::always_error)
        .unwrap_or(false)
}

/// Outcome of the false-positive marking pass.
pub struct FpMatchReport {
    /// `FP_ENTRY:`/`CHANGETO:` pairs for entries matching in everything
    /// but `info`.
    pub near_match_lines: Vec<String>,
    /// FP entries that matched nothing, ready for `unmatchedfps.log`.
    pub unmatched: Vec<FpEntry>,
    /// Number of emissions suppressed.
    pub matched: usize,
}

/// Mark datacheck entries that the false-positive list suppresses.
///
/// Each FP entry suppresses at most one emission (it is consumed by its
/// first exact match).  `entries` should already be sorted for stable
/// near-match output.
pub fn mark_false_positives(entries: &mut [DatacheckEntry], mut fps: Vec<FpEntry>) -> FpMatchReport {
    log::info!("Marking datacheck false positives");
    let mut near_match_lines = Vec::new();
    let mut matched = 0;

    for entry in entries.iter_mut() {
        let mut hit = None;
        for (i, fp) in fps.iter().enumerate() {
            if !entry.match_except_info(fp) {
                continue;
            }
            if entry.info == fp.info {
                hit = Some(i);
                break;
            }
            near_match_lines.push(format!("FP_ENTRY: {fp}"));
            near_match_lines.push(format!(
                "CHANGETO: {};{};{};{};{};{}",
                fp.root, fp.labels[0], fp.labels[1], fp.labels[2], fp.code, entry.info
            ));
        }
        if let Some(i) = hit {
            entry.fp = true;
            matched += 1;
            fps.remove(i);
        }
    }

    FpMatchReport { near_match_lines, unmatched: fps, matched }
}
