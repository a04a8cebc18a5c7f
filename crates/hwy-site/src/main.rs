//! Site-update driver.
//!
//! Reads the highway data corpus and every user's travel list, then writes
//! the database dump, the master and filtered graph files, the stats CSVs,
//! and the maintenance logs.  Phases run in a fixed order; only `.wpt`
//! ingestion is parallel.  Structural problems accumulate in the shared
//! error list, and a non-empty list aborts the run with exit status 1
//! before any database output is written.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use hwy_core::ErrorList;
use hwy_graph::HighwayGraph;
use hwy_model::{HighwayData, ListUpdate, RouteRegistry, TravelerList};
use hwy_output::GraphType;
use rustc_hash::FxHashMap;

mod subgraphs;

/// Create SQL, stats, graphs, and log files from highway and user data.
#[derive(Parser)]
#[command(name = "hwy-site", version)]
struct Args {
    /// Path to the root of the highway data directory structure.
    #[arg(short = 'w', long, default_value = "../../../HighwayData")]
    highwaydatapath: PathBuf,

    /// File of highway systems to include.
    #[arg(short = 's', long, default_value = "systems.csv")]
    systemsfile: String,

    /// Path to the user list file data.
    #[arg(short = 'u', long, default_value = "../../../UserData/list_files")]
    userlistfilepath: PathBuf,

    /// Database name for the .sql file name.
    #[arg(short = 'd', long, default_value = "HighwayData")]
    databasename: String,

    /// Path to write log files, which gets a "users" subdirectory.
    #[arg(short = 'l', long, default_value = ".")]
    logfilepath: PathBuf,

    /// Path to write csv statistics files.
    #[arg(short = 'c', long, default_value = ".")]
    csvstatfilepath: PathBuf,

    /// Path to write graph format data files.
    #[arg(short = 'g', long, default_value = ".")]
    graphfilepath: PathBuf,

    /// Turn off generation of graph files.
    #[arg(short = 'k', long)]
    skipgraphs: bool,

    /// Path to write data with NMPs merged (generated only if specified).
    #[arg(short = 'n', long, default_value = "")]
    nmpmergepath: String,

    /// For development: restrict the dataset to these users.
    #[arg(short = 'U', long, num_args = 1..)]
    userlist: Option<Vec<String>>,

    /// Number of threads to use for concurrent tasks.
    #[arg(short = 't', long, default_value_t = 4)]
    numthreads: usize,

    /// Run only the subset of the process needed to verify highway data
    /// changes.
    #[arg(short = 'e', long)]
    errorcheck: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            log::error!("{e:#}");
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<i32> {
    let started = Instant::now();
    let el = ErrorList::new();
    rayon::ThreadPoolBuilder::new()
        .num_threads(args.numthreads)
        .build_global()
        .context("building worker pool")?;

    let hwy_path = &args.highwaydatapath;
    let data_path = hwy_path.join("hwy_data");
    let log_path = &args.logfilepath;

    // ── Descriptors, systems, routes ──────────────────────────────────────
    log::info!("Reading region, country, and continent descriptions");
    let descriptors = hwy_ingest::descriptors::read_descriptors(hwy_path, &el)?;

    let mut data = HighwayData::new();
    let mut registry = RouteRegistry::new();
    hwy_ingest::systems::read_systems(
        &mut data,
        &mut registry,
        &descriptors,
        &hwy_path.join(&args.systemsfile),
        &data_path.join("_systems"),
        &el,
    )?;

    // ── Parallel wpt ingestion ────────────────────────────────────────────
    log::info!("Reading waypoints for all routes");
    let report = hwy_ingest::read_all_wpt_files(&mut data, &data_path, &el)?;
    let quadtree = report.quadtree;
    let mut datachecks = report.datachecks;
    hwy_output::logs::write_plain_log(
        &log_path.join("unprocessedwpts.log"),
        &report.unprocessed_wpts,
    )?;
    if !report.unprocessed_wpts.is_empty() {
        log::warn!(
            "{} .wpt files not processed, see unprocessedwpts.log",
            report.unprocessed_wpts.len()
        );
    }

    // ── Near-miss point outputs ───────────────────────────────────────────
    let point_order = quadtree.point_list();
    let nmp_fps = hwy_ingest::descriptors::read_nmp_fps(hwy_path);
    hwy_output::nmp::write_nmp_logs(&mut data, &point_order, nmp_fps, log_path)?;
    if !args.nmpmergepath.is_empty() && !args.errorcheck {
        hwy_output::nmp::write_nmp_merged(&data, &PathBuf::from(&args.nmpmergepath))?;
    }

    // ── Connectivity and labels ───────────────────────────────────────────
    log::info!("Processing waypoint labels and checking for unconnected chopped routes");
    datachecks.extend(hwy_ingest::labels::check_connectivity_and_build_labels(&mut data, &el));

    let updates = hwy_ingest::descriptors::read_updates(hwy_path, &el)?;
    hwy_ingest::labels::attach_updates(&mut data, &registry, &updates);
    let system_updates = hwy_ingest::descriptors::read_system_updates(hwy_path, &el)?;

    // ── Traveler lists ────────────────────────────────────────────────────
    let list_updates = hwy_ingest::descriptors::read_list_updates(&PathBuf::from("listupdates.txt"));
    let mut travelers = read_travelers(&args, &mut data, &registry, &updates, &list_updates, &el)?;
    log::info!("Processed {} traveler list files", travelers.len());

    hwy_output::logs::write_inuse_logs(&data, log_path)?;

    // ── Concurrencies ─────────────────────────────────────────────────────
    let mut concurrency_log = hwy_travel::concurrency::detect_concurrencies(&mut data);
    log::info!("Augmenting travelers for detected concurrent segments");
    concurrency_log
        .extend(hwy_travel::concurrency::augment_clinched_concurrencies(&mut data, &travelers));
    hwy_output::logs::write_headed_log(&log_path.join("concurrencies.log"), &concurrency_log)?;

    // ── Mileage ───────────────────────────────────────────────────────────
    let stats = hwy_travel::mileage::compute_mileage(&mut data, &mut travelers);
    hwy_output::logs::write_highway_data_stats(&data, &stats, log_path)?;
    let clinched_tables =
        hwy_output::users::build_traveler_stats(&data, &mut travelers, &stats, &updates);
    hwy_output::users::write_user_logs(&travelers, log_path)?;
    hwy_output::stats::write_stats_csvs(&data, &travelers, &stats, &args.csvstatfilepath)?;

    // ── Graphs ────────────────────────────────────────────────────────────
    // Built even when emission is skipped: the hidden-vertex datachecks
    // come from construction.
    log::info!("Setting up for graphs of highway data");
    let mut build = HighwayGraph::build(&data, &quadtree);
    hwy_output::logs::write_plain_log(
        &log_path.join("waypointsimplification.log"),
        &build.naming_log,
    )?;
    datachecks.append(&mut build.datachecks);

    let mut graph_list = Vec::new();
    let mut graph_types: Vec<GraphType> = Vec::new();
    if args.skipgraphs || args.errorcheck {
        log::info!("SKIPPING generation of graphs");
    } else {
        build.graph.write_master_graphs(&data, &travelers, &args.graphfilepath, &mut graph_list)?;
        graph_types.push(GraphType {
            category: "master",
            descr: "All Highway Data",
            long_descr: "These graphs contain all routes currently plotted in the project.",
        });
        subgraphs::write_all(
            &args,
            &data,
            &descriptors,
            &quadtree,
            &build.graph,
            &travelers,
            &stats,
            &el,
            &mut graph_list,
            &mut graph_types,
        )?;
    }

    // ── Datacheck ─────────────────────────────────────────────────────────
    let fps = hwy_datacheck::read_datacheck_fps(hwy_path, &el)?;
    datachecks.extend(hwy_datacheck::run_datachecks(&data));
    datachecks.sort_by_key(|d| d.sort_key());
    let fp_report = hwy_datacheck::mark_false_positives(&mut datachecks, fps);
    log::info!(
        "Found {} datacheck errors and matched {} FP entries",
        datachecks.len(),
        fp_report.matched
    );
    hwy_output::logs::write_nearmatch_fps_log(&fp_report.near_match_lines, log_path)?;
    hwy_output::logs::write_unmatched_fps_log(&fp_report.unmatched, log_path)?;
    hwy_output::logs::write_datacheck_log(&datachecks, log_path)?;

    // ── Fatal-error inspection ────────────────────────────────────────────
    if !el.is_empty() {
        let errors = el.into_vec();
        log::error!("ABORTING due to {} errors:", errors.len());
        for (i, e) in errors.iter().enumerate() {
            log::error!("{}: {e}", i + 1);
        }
        return Ok(1);
    }

    // ── Database ──────────────────────────────────────────────────────────
    if args.errorcheck {
        log::info!("SKIPPING database file");
    } else {
        hwy_output::sql::write_sql_dump(
            &PathBuf::from(format!("{}.sql", args.databasename)),
            &data,
            &descriptors,
            &updates,
            &system_updates,
            &travelers,
            &stats,
            &clinched_tables,
            &datachecks,
            &graph_list,
            &graph_types,
        )?;
    }

    summarize(&data, &quadtree);
    if args.errorcheck {
        log::info!("!!! DATA CHECK SUCCESSFUL !!!");
    }
    log::info!("Total run time: {:.1}s", started.elapsed().as_secs_f64());
    Ok(0)
}

/// Load travel lists in sorted traveler-name order so that `TravelerId`
/// assignment (and therefore every traveler-indexed output) is name-ordered.
fn read_travelers(
    args: &Args,
    data: &mut HighwayData,
    registry: &RouteRegistry,
    updates: &[hwy_model::UpdateRecord],
    list_updates: &FxHashMap<String, ListUpdate>,
    el: &ErrorList,
) -> Result<Vec<TravelerList>> {
    let mut file_names: Vec<String> = match &args.userlist {
        Some(users) => users.iter().map(|u| format!("{u}.list")).collect(),
        None => std::fs::read_dir(&args.userlistfilepath)
            .with_context(|| format!("reading {}", args.userlistfilepath.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".list"))
            .collect(),
    };
    file_names.sort();

    log::info!("Processing traveler list files");
    let mut travelers = Vec::with_capacity(file_names.len());
    for name in file_names {
        let id = hwy_core::TravelerId(travelers.len() as u32);
        let update = list_updates.get(&name).cloned();
        match hwy_travel::list::load_travel_list(
            &args.userlistfilepath.join(&name),
            data,
            registry,
            updates,
            id,
            update,
            el,
        ) {
            Ok(t) => travelers.push(t),
            Err(e) => el.add(format!("{name}: {e}")),
        }
    }
    Ok(travelers)
}

/// End-of-run corpus statistics.
fn summarize(data: &HighwayData, quadtree: &hwy_spatial::WaypointQuadtree) {
    log::info!("Processed {} highway systems.", data.systems.len());
    let routes = data.routes.len();
    let points = data.waypoints.len();
    let segments = data.segments.len();
    log::info!("Processed {routes} routes with a total of {points} points and {segments} segments.");
    if points != quadtree.size() {
        log::warn!("MISMATCH: quadtree contains {} waypoints!", quadtree.size());
    }
    log::info!("WaypointQuadtree contains {} total nodes.", quadtree.total_nodes());

    // colocation census
    let max_colocated = data.coloc_groups.iter().map(Vec::len).max().unwrap_or(1);
    log::info!("Largest colocate count = {max_colocated}");
    let mut counts = vec![0usize; max_colocated + 1];
    let colocated_points: usize = data.coloc_groups.iter().map(Vec::len).sum();
    counts[1] = data.waypoints.len() - colocated_points;
    for group in &data.coloc_groups {
        counts[group.len()] += 1;
    }
    let unique_locations: usize = counts.iter().sum();
    for (size, &count) in counts.iter().enumerate().skip(1) {
        if count > 0 {
            log::info!("{count:6} are each occupied by {size:2} waypoints.");
        }
    }
    log::info!("Unique locations: {unique_locations}");
}
