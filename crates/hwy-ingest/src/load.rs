//! Parallel `.wpt` ingestion.
//!
//! Routes are independent, so highway systems are distributed over the
//! Rayon worker pool.  The only shared mutable state is the
//! [`WaypointIndex`] — quadtree plus waypoint arena plus colocation groups —
//! behind one coarse mutex.  The mutex is held across the (near-miss query,
//! insert) pair for each waypoint so every query sees exactly the structure
//! the paired insert modifies.  Everything else a worker touches is local to
//! the route being read; results merge into the store sequentially, in
//! system/route order, so segment ids and datacheck order are deterministic.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rayon::prelude::*;
use rustc_hash::FxHashSet;

use hwy_core::{DatacheckEntry, ErrorList, GroupId, RouteId, SegmentId, SystemId, WaypointId};
use hwy_model::{HighwayData, HighwaySegment, Waypoint};
use hwy_spatial::WaypointQuadtree;

use crate::wpt::parse_wpt_line;
use crate::IngestResult;

/// Near-miss tolerance in degrees, applied to both axes.
pub const NEAR_MISS_TOLERANCE: f64 = 0.0005;

// ── Waypoint index ────────────────────────────────────────────────────────────

/// The shared spatial state of the ingestion phase: the quadtree, the
/// waypoint arena, and the colocation groups, which must change together
/// under one lock.
pub struct WaypointIndex {
    pub quadtree: WaypointQuadtree,
    pub waypoints: Vec<Waypoint>,
    pub coloc_groups: Vec<Vec<WaypointId>>,
}

impl WaypointIndex {
    pub fn new() -> Self {
        Self {
            quadtree: WaypointQuadtree::whole_world(),
            waypoints: Vec::new(),
            coloc_groups: Vec::new(),
        }
    }

    /// Register one waypoint: near-miss query against the pre-insert
    /// structure (lists updated symmetrically), then quadtree insertion
    /// with colocation-group wiring.
    pub fn insert(&mut self, mut w: Waypoint) -> WaypointId {
        let id = WaypointId(self.waypoints.len() as u32);

        let nmps = self.quadtree.near_miss_waypoints(w.point, NEAR_MISS_TOLERANCE);
        for &other in &nmps {
            self.waypoints[other.index()].near_miss.push(id);
        }
        w.near_miss = nmps;

        if let Some(other) = self.quadtree.insert(id, w.point) {
            match self.waypoints[other.index()].colocated {
                Some(group) => {
                    self.coloc_groups[group.index()].push(id);
                    w.colocated = Some(group);
                }
                None => {
                    let group = GroupId(self.coloc_groups.len() as u32);
                    self.coloc_groups.push(vec![other, id]);
                    self.waypoints[other.index()].colocated = Some(group);
                    w.colocated = Some(group);
                }
            }
        }

        self.waypoints.push(w);
        id
    }
}

impl Default for WaypointIndex {
    fn default() -> Self {
        Self::new()
    }
}

// ── Ingestion ─────────────────────────────────────────────────────────────────

/// What the parallel phase hands back to the driver.
pub struct IngestReport {
    /// Fully populated, sorted quadtree over every waypoint.
    pub quadtree: WaypointQuadtree,
    /// Datacheck entries from wpt parsing, in system/route/line order.
    pub datachecks: Vec<DatacheckEntry>,
    /// `.wpt` files present in the data tree but referenced by no route,
    /// rendered relative to the data directory and sorted.
    pub unprocessed_wpts: Vec<String>,
}

struct RouteRead {
    route: RouteId,
    points: Vec<WaypointId>,
    datachecks: Vec<DatacheckEntry>,
}

/// Read every route's `.wpt` file under `data_path` (the `hwy_data`
/// directory), populating waypoints, colocation groups, and segments.
///
/// On return the quadtree and all colocation groups are sorted by
/// `(root, label)`, making traversal order deterministic.
pub fn read_all_wpt_files(
    data: &mut HighwayData,
    data_path: &Path,
    el: &ErrorList,
) -> IngestResult<IngestReport> {
    // Sweep the tree for .wpt files so never-referenced ones can be
    // reported afterwards.
    let mut all_wpt_files = FxHashSet::default();
    collect_wpt_files(data_path, &mut all_wpt_files)?;
    log::info!("{} .wpt files found", all_wpt_files.len());

    let index = Mutex::new(WaypointIndex::new());
    let system_ids: Vec<SystemId> = (0..data.systems.len()).map(|i| SystemId(i as u16)).collect();

    // Parallel phase: parse and insert, collecting per-route results.
    let per_system: Vec<Vec<RouteRead>> = system_ids
        .par_iter()
        .map(|&sys| {
            let system = data.system(sys);
            log::info!("Reading waypoints for system {}", system.name);
            system
                .routes
                .iter()
                .map(|&route_id| read_route_wpt(data, route_id, data_path, &index, el))
                .collect()
        })
        .collect();

    let index = index.into_inner().unwrap();
    data.waypoints = index.waypoints;
    data.coloc_groups = index.coloc_groups;
    let mut quadtree = index.quadtree;

    // Sequential merge: point lists, segments, datachecks, file accounting.
    let mut datachecks = Vec::new();
    for read in per_system.into_iter().flatten() {
        let root = &data.routes[read.route.index()].root;
        let region = &data.routes[read.route.index()].region;
        let sysname = &data.system(data.routes[read.route.index()].system).name;
        all_wpt_files.remove(&data_path.join(region).join(sysname).join(format!("{root}.wpt")));

        datachecks.extend(read.datachecks);
        for pair in read.points.windows(2) {
            let (w1, w2) = (pair[0], pair[1]);
            let length = data.waypoints[w1.index()]
                .point
                .distance_mi(data.waypoints[w2.index()].point);
            let seg = SegmentId(data.segments.len() as u32);
            data.segments.push(HighwaySegment::new(w1, w2, read.route, length));
            data.routes[read.route.index()].segments.push(seg);
        }
        data.routes[read.route.index()].points = read.points;
    }

    // Deterministic traversal order for everything downstream.
    let keys: Vec<String> = data
        .waypoints
        .iter()
        .map(|w| format!("{}@{}", data.route(w.route).root, w.label))
        .collect();
    quadtree.sort_points(&|w: WaypointId| keys[w.index()].clone());
    for group in &mut data.coloc_groups {
        group.sort_by(|a, b| keys[a.index()].cmp(&keys[b.index()]));
    }

    let mut unprocessed_wpts: Vec<String> = all_wpt_files
        .iter()
        .map(|p| {
            p.strip_prefix(data_path)
                .unwrap_or(p)
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    unprocessed_wpts.sort();

    Ok(IngestReport { quadtree, datachecks, unprocessed_wpts })
}

/// Read one route's `.wpt` file, inserting each surviving waypoint into the
/// shared index under its mutex.
fn read_route_wpt(
    data: &HighwayData,
    route_id: RouteId,
    data_path: &Path,
    index: &Mutex<WaypointIndex>,
    el: &ErrorList,
) -> RouteRead {
    let route = data.route(route_id);
    let path = data_path
        .join(&route.region)
        .join(&data.system(route.system).name)
        .join(format!("{}.wpt", route.root));

    let mut read = RouteRead { route: route_id, points: Vec::new(), datachecks: Vec::new() };
    let contents = match std::fs::read_to_string(&path) {
        Err(e) => {
            el.add(format!("{}: {e}", path.display()));
            return read;
        }
        Ok(contents) => contents,
    };

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (parsed, mut checks) = parse_wpt_line(line, &route.root);
        read.datachecks.append(&mut checks);
        let Some(parsed) = parsed else { continue };
        let w = Waypoint::new(parsed.label, parsed.alt_labels, parsed.point, route_id);
        let id = index.lock().unwrap().insert(w);
        read.points.push(id);
    }

    if read.points.len() < 2 {
        el.add(format!(
            "Route contains fewer than 2 points: {} ({} total points)",
            route.root,
            read.points.len()
        ));
    }
    read
}

/// Recursively gather `.wpt` paths, skipping `_boundaries` directories.
fn collect_wpt_files(dir: &Path, out: &mut FxHashSet<PathBuf>) -> IngestResult<()> {
    if dir.to_string_lossy().contains("_boundaries") {
        return Ok(());
    }
    let entries = match std::fs::read_dir(dir) {
        Err(_) => return Ok(()), // missing data dir surfaces via route reads
        Ok(entries) => entries,
    };
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_wpt_files(&path, out)?;
        } else if path.extension().is_some_and(|e| e == "wpt") {
            out.insert(path);
        }
    }
    Ok(())
}
