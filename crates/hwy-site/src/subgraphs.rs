//! Subgraph emission: one call per directive source.
//!
//! Area graphs come from `graphs/areagraphs.csv`; regional graphs cover
//! every region with clinchable mileage; system, multi-system, and
//! multi-region graphs come from their directive files; country and
//! continent graphs are derived from the region descriptors (countries
//! need at least two regions with mileage, continents at least one).

use anyhow::Result;

use hwy_core::{ErrorList, SystemId};
use hwy_graph::{GraphListEntry, HighwayGraph, PlaceRadius, SubgraphFilter};
use hwy_ingest::Descriptors;
use hwy_model::{HighwayData, TravelerList};
use hwy_output::GraphType;
use hwy_spatial::WaypointQuadtree;
use hwy_travel::RegionStats;

use crate::Args;

#[allow(clippy::too_many_arguments)]
pub fn write_all(
    args: &Args,
    data: &HighwayData,
    descriptors: &Descriptors,
    quadtree: &WaypointQuadtree,
    graph: &HighwayGraph,
    travelers: &[TravelerList],
    stats: &RegionStats,
    el: &ErrorList,
    graph_list: &mut Vec<GraphListEntry>,
    graph_types: &mut Vec<GraphType>,
) -> Result<()> {
    let hwy_path = &args.highwaydatapath;
    let graph_path = &args.graphfilepath;
    let has_mileage =
        |region: &str| stats.active_preview_mileage_by_region.contains_key(region);

    // ── Area graphs ───────────────────────────────────────────────────────
    log::info!("Creating area data graphs");
    for area in hwy_ingest::graph_directives::read_area_graphs(hwy_path, el)? {
        let filter = SubgraphFilter {
            placeradius: Some(PlaceRadius::new(
                area.descr.clone(),
                area.title.clone(),
                area.lat,
                area.lng,
                area.radius as f64,
            )),
            ..Default::default()
        };
        graph.write_subgraphs(
            data,
            quadtree,
            travelers,
            graph_path,
            &format!("{}{}-area", area.title, area.radius),
            &format!("{} ({} mi radius)", area.descr, area.radius),
            "area",
            &filter,
            graph_list,
        )?;
    }
    graph_types.push(GraphType {
        category: "area",
        descr: "Routes Within a Given Radius of a Place",
        long_descr: "These graphs contain all routes currently plotted within the given distance radius of the given place.",
    });

    // ── Regional graphs ───────────────────────────────────────────────────
    log::info!("Creating regional data graphs");
    for region in &descriptors.regions {
        if !has_mileage(&region.code) {
            continue;
        }
        let filter = SubgraphFilter {
            regions: Some(vec![region.code.clone()]),
            ..Default::default()
        };
        graph.write_subgraphs(
            data,
            quadtree,
            travelers,
            graph_path,
            &format!("{}-region", region.code),
            &format!("{} ({})", region.name, region.region_type),
            "region",
            &filter,
            graph_list,
        )?;
    }
    graph_types.push(GraphType {
        category: "region",
        descr: "Routes Within a Single Region",
        long_descr: "These graphs contain all routes currently plotted within the given region.",
    });

    // ── Single-system graphs ──────────────────────────────────────────────
    log::info!("Creating system data graphs");
    let mut wrote_system_graph = false;
    for name in hwy_ingest::graph_directives::read_system_graphs(hwy_path, el)? {
        let Some(sys_idx) = data.systems.iter().position(|h| h.name == name) else {
            continue;
        };
        let system = &data.systems[sys_idx];
        let filter = SubgraphFilter {
            systems: Some(vec![SystemId(sys_idx as u16)]),
            ..Default::default()
        };
        graph.write_subgraphs(
            data,
            quadtree,
            travelers,
            graph_path,
            &format!("{}-system", system.name),
            &format!("{} ({})", system.name, system.fullname),
            "system",
            &filter,
            graph_list,
        )?;
        wrote_system_graph = true;
    }
    if wrote_system_graph {
        graph_types.push(GraphType {
            category: "system",
            descr: "Routes Within a Single Highway System",
            long_descr: "These graphs contain the routes within a single highway system and are not restricted by region.",
        });
    }

    // ── Multi-system graphs ───────────────────────────────────────────────
    log::info!("Creating multisystem graphs");
    for group in hwy_ingest::graph_directives::read_multisystem_graphs(hwy_path, el)? {
        let systems: Vec<SystemId> = data
            .systems
            .iter()
            .enumerate()
            .filter(|(_, h)| group.members.contains(&h.name))
            .map(|(i, _)| SystemId(i as u16))
            .collect();
        let filter = SubgraphFilter { systems: Some(systems), ..Default::default() };
        graph.write_subgraphs(
            data,
            quadtree,
            travelers,
            graph_path,
            &group.title,
            &group.descr,
            "multisystem",
            &filter,
            graph_list,
        )?;
    }
    graph_types.push(GraphType {
        category: "multisystem",
        descr: "Routes Within Multiple Highway Systems",
        long_descr: "These graphs contain the routes within a set of highway systems.",
    });

    // ── Multi-region graphs ───────────────────────────────────────────────
    log::info!("Creating multiregion graphs");
    for group in hwy_ingest::graph_directives::read_multiregion_graphs(hwy_path, el)? {
        let regions: Vec<String> = group
            .members
            .iter()
            .filter(|r| descriptors.has_region(r) && has_mileage(r))
            .cloned()
            .collect();
        let filter = SubgraphFilter { regions: Some(regions), ..Default::default() };
        graph.write_subgraphs(
            data,
            quadtree,
            travelers,
            graph_path,
            &group.title,
            &group.descr,
            "multiregion",
            &filter,
            graph_list,
        )?;
    }
    graph_types.push(GraphType {
        category: "multiregion",
        descr: "Routes Within Multiple Regions",
        long_descr: "These graphs contain the routes within a set of regions.",
    });

    // ── Country graphs ────────────────────────────────────────────────────
    log::info!("Creating country graphs");
    for country in &descriptors.countries {
        let regions: Vec<String> = descriptors
            .regions
            .iter()
            .filter(|r| r.country == country.code && has_mileage(&r.code))
            .map(|r| r.code.clone())
            .collect();
        // single-region countries are already covered by their regional graph
        if regions.len() < 2 {
            continue;
        }
        let filter = SubgraphFilter { regions: Some(regions), ..Default::default() };
        graph.write_subgraphs(
            data,
            quadtree,
            travelers,
            graph_path,
            &format!("{}-country", country.code),
            &format!("{} All Routes in Country", country.name),
            "country",
            &filter,
            graph_list,
        )?;
    }
    graph_types.push(GraphType {
        category: "country",
        descr: "Routes Within a Single Multi-Region Country",
        long_descr: "These graphs contain the routes within a single country that is composed of multiple regions that contain plotted routes. Countries consisting of a single region are represented by their regional graph.",
    });

    // ── Continent graphs ──────────────────────────────────────────────────
    log::info!("Creating continent graphs");
    for continent in &descriptors.continents {
        let regions: Vec<String> = descriptors
            .regions
            .iter()
            .filter(|r| r.continent == continent.code && has_mileage(&r.code))
            .map(|r| r.code.clone())
            .collect();
        if regions.is_empty() {
            continue;
        }
        let filter = SubgraphFilter { regions: Some(regions), ..Default::default() };
        graph.write_subgraphs(
            data,
            quadtree,
            travelers,
            graph_path,
            &format!("{}-continent", continent.code),
            &format!("{} All Routes on Continent", continent.name),
            "continent",
            &filter,
            graph_list,
        )?;
    }
    graph_types.push(GraphType {
        category: "continent",
        descr: "Routes Within a Continent",
        long_descr: "These graphs contain the routes on a continent.",
    });

    Ok(())
}
