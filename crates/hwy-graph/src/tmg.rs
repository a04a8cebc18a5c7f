//! `.tmg` file emission.
//!
//! Format, shared by all three kinds:
//!
//! ```text
//! TMG <version> <kind>
//! <V> <E> [<T>]                 (traveler count, traveled kind only)
//! <V lines>   name lat lng
//! <E lines>   u v label [clinched-hex] [lat lng ...intermediates]
//! <one line, traveled only: space-separated traveler names in index order>
//! ```

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rustc_hash::FxHashMap;

use hwy_core::{EdgeId, SystemId, TravelerId};
use hwy_model::{HighwayData, TravelerList};
use hwy_spatial::WaypointQuadtree;

use crate::graph::HighwayGraph;
use crate::subgraph::{GraphListEntry, SubgraphFilter};
use crate::vertex::Visibility;
use crate::GraphResult;

/// Per-format vertex numbers assigned while writing a file set.
struct VertexNumbers {
    simple: Vec<usize>,
    collapsed: Vec<usize>,
    traveled: Vec<usize>,
}

impl VertexNumbers {
    fn unassigned(count: usize) -> Self {
        Self {
            simple: vec![usize::MAX; count],
            collapsed: vec![usize::MAX; count],
            traveled: vec![usize::MAX; count],
        }
    }
}

/// Hexadecimal clinched-traveler code for one segment: character `i`
/// carries travelers `4i..4i+4`, low bit first.
pub fn clinchedby_code(
    clinched_by: &BTreeSet<TravelerId>,
    numbering: &FxHashMap<TravelerId, usize>,
) -> String {
    if numbering.is_empty() {
        return "0".to_string();
    }
    let mut nibbles = vec![0u8; numbering.len().div_ceil(4)];
    for t in clinched_by {
        if let Some(&num) = numbering.get(t) {
            nibbles[num / 4] += 1 << (num % 4);
        }
    }
    nibbles
        .iter()
        .map(|&n| char::from_digit(n as u32, 16).unwrap().to_ascii_uppercase())
        .collect()
}

impl HighwayGraph {
    /// Write the three master graph files (`tm-master-simple.tmg`,
    /// `-collapsed`, `-traveled`) covering the whole corpus.
    pub fn write_master_graphs(
        &mut self,
        data: &HighwayData,
        travelers: &[TravelerList],
        path: &Path,
        graph_list: &mut Vec<GraphListEntry>,
    ) -> GraphResult<()> {
        log::info!("Writing master graph files");
        let mut simple = BufWriter::new(File::create(path.join("tm-master-simple.tmg"))?);
        let mut collapsed = BufWriter::new(File::create(path.join("tm-master-collapsed.tmg"))?);
        let mut traveled = BufWriter::new(File::create(path.join("tm-master-traveled.tmg"))?);

        let (sv, cv, tv) = self.vertex_counts();
        let (se, ce, te) = self.edge_counts();

        writeln!(simple, "TMG 1.0 simple")?;
        writeln!(collapsed, "TMG 1.0 collapsed")?;
        writeln!(traveled, "TMG 2.0 traveled")?;
        writeln!(simple, "{sv} {se}")?;
        writeln!(collapsed, "{cv} {ce}")?;
        writeln!(traveled, "{tv} {te} {}", travelers.len())?;

        // vertices, assigning per-format numbers as they are written
        let mut numbers = VertexNumbers::unassigned(self.vertices.len());
        let mut counts = (0usize, 0usize, 0usize);
        for (i, v) in self.vertices.iter().enumerate() {
            let line = format!("{} {} {}", v.unique_name, v.point.lat, v.point.lng);
            writeln!(simple, "{line}")?;
            numbers.simple[i] = counts.0;
            counts.0 += 1;
            if v.visibility >= Visibility::TraveledOnly {
                writeln!(traveled, "{line}")?;
                numbers.traveled[i] = counts.2;
                counts.2 += 1;
                if v.visibility == Visibility::Visible {
                    writeln!(collapsed, "{line}")?;
                    numbers.collapsed[i] = counts.1;
                    counts.1 += 1;
                }
            }
        }

        // every traveler participates in the master traveled graph
        let traveler_numbering: FxHashMap<TravelerId, usize> =
            (0..travelers.len()).map(|i| (TravelerId(i as u32), i)).collect();

        // edges: walk incidence lists, writing each edge once
        for v_idx in 0..self.vertices.len() {
            for pos in 0..self.vertices[v_idx].incident_s.len() {
                let e = self.vertices[v_idx].incident_s[pos];
                if !self.edges[e.index()].s_written {
                    self.edges[e.index()].s_written = true;
                    writeln!(simple, "{}", self.simple_line(e, &numbers, None))?;
                }
            }
            if self.vertices[v_idx].visibility >= Visibility::TraveledOnly {
                for pos in 0..self.vertices[v_idx].incident_t.len() {
                    let e = self.vertices[v_idx].incident_t[pos];
                    if !self.edges[e.index()].t_written {
                        self.edges[e.index()].t_written = true;
                        writeln!(
                            traveled,
                            "{}",
                            self.traveled_line(data, e, &numbers, &traveler_numbering, None)
                        )?;
                    }
                }
                if self.vertices[v_idx].visibility == Visibility::Visible {
                    for pos in 0..self.vertices[v_idx].incident_c.len() {
                        let e = self.vertices[v_idx].incident_c[pos];
                        if !self.edges[e.index()].c_written {
                            self.edges[e.index()].c_written = true;
                            writeln!(collapsed, "{}", self.collapsed_line(e, &numbers, None))?;
                        }
                    }
                }
            }
        }

        let names: Vec<&str> = travelers.iter().map(|t| t.name.as_str()).collect();
        writeln!(traveled, "{} ", names.join(" "))?;

        graph_list.push(GraphListEntry {
            filename: "tm-master-simple.tmg".into(),
            descr: "All Highway Data".into(),
            vertices: sv,
            edges: se,
            travelers: 0,
            format: "simple",
            category: "master",
        });
        graph_list.push(GraphListEntry {
            filename: "tm-master-collapsed.tmg".into(),
            descr: "All Highway Data".into(),
            vertices: cv,
            edges: ce,
            travelers: 0,
            format: "collapsed",
            category: "master",
        });
        graph_list.push(GraphListEntry {
            filename: "tm-master-traveled.tmg".into(),
            descr: "All Highway Data".into(),
            vertices: tv,
            edges: te,
            travelers: travelers.len(),
            format: "traveled",
            category: "master",
        });
        log::info!("   Simple graph has {sv} vertices, {se} edges");
        log::info!("Collapsed graph has {cv} vertices, {ce} edges");
        log::info!(" Traveled graph has {tv} vertices, {te} edges");
        Ok(())
    }

    /// Write the three files of one filtered subgraph
    /// (`<root>-simple.tmg`, `-collapsed`, `-traveled`).
    #[allow(clippy::too_many_arguments)]
    pub fn write_subgraphs(
        &self,
        data: &HighwayData,
        quadtree: &WaypointQuadtree,
        travelers: &[TravelerList],
        path: &Path,
        root: &str,
        descr: &str,
        category: &'static str,
        filter: &SubgraphFilter,
        graph_list: &mut Vec<GraphListEntry>,
    ) -> GraphResult<()> {
        let m = self.matching_vertices_and_edges(data, quadtree, filter);
        log::info!(
            "{root}: ({},{}) ({},{}) ({},{})",
            m.vertices.len(),
            m.simple_edges.len(),
            m.collapsed_vertex_count,
            m.collapsed_edges.len(),
            m.traveled_vertex_count,
            m.traveled_edges.len()
        );

        let mut simple = BufWriter::new(File::create(path.join(format!("{root}-simple.tmg")))?);
        let mut collapsed =
            BufWriter::new(File::create(path.join(format!("{root}-collapsed.tmg")))?);
        let mut traveled = BufWriter::new(File::create(path.join(format!("{root}-traveled.tmg")))?);

        writeln!(simple, "TMG 1.0 simple")?;
        writeln!(collapsed, "TMG 1.0 collapsed")?;
        writeln!(traveled, "TMG 2.0 traveled")?;
        writeln!(simple, "{} {}", m.vertices.len(), m.simple_edges.len())?;
        writeln!(collapsed, "{} {}", m.collapsed_vertex_count, m.collapsed_edges.len())?;
        writeln!(
            traveled,
            "{} {} {}",
            m.traveled_vertex_count,
            m.traveled_edges.len(),
            m.travelers.len()
        )?;

        let mut numbers = VertexNumbers::unassigned(self.vertices.len());
        let mut counts = (0usize, 0usize, 0usize);
        for &v in &m.vertices {
            let vertex = self.vertex(v);
            let line = format!("{} {} {}", vertex.unique_name, vertex.point.lat, vertex.point.lng);
            writeln!(simple, "{line}")?;
            numbers.simple[v.index()] = counts.0;
            counts.0 += 1;
            if vertex.visibility >= Visibility::TraveledOnly {
                writeln!(traveled, "{line}")?;
                numbers.traveled[v.index()] = counts.2;
                counts.2 += 1;
                if vertex.visibility == Visibility::Visible {
                    writeln!(collapsed, "{line}")?;
                    numbers.collapsed[v.index()] = counts.1;
                    counts.1 += 1;
                }
            }
        }

        let traveler_numbering: FxHashMap<TravelerId, usize> = m
            .travelers
            .iter()
            .enumerate()
            .map(|(i, &t)| (t, i))
            .collect();
        let systems = filter.systems.as_deref();

        for &e in &m.simple_edges {
            writeln!(simple, "{}", self.simple_line(e, &numbers, systems))?;
        }
        for &e in &m.collapsed_edges {
            writeln!(collapsed, "{}", self.collapsed_line(e, &numbers, systems))?;
        }
        for &e in &m.traveled_edges {
            writeln!(
                traveled,
                "{}",
                self.traveled_line(data, e, &numbers, &traveler_numbering, systems)
            )?;
        }

        let names: Vec<&str> = m
            .travelers
            .iter()
            .map(|&t| travelers[t.index()].name.as_str())
            .collect();
        writeln!(traveled, "{} ", names.join(" "))?;

        for (suffix, format, vertices, edges, trav) in [
            ("-simple.tmg", "simple", m.vertices.len(), m.simple_edges.len(), 0),
            ("-collapsed.tmg", "collapsed", m.collapsed_vertex_count, m.collapsed_edges.len(), 0),
            (
                "-traveled.tmg",
                "traveled",
                m.traveled_vertex_count,
                m.traveled_edges.len(),
                m.travelers.len(),
            ),
        ] {
            graph_list.push(GraphListEntry {
                filename: format!("{root}{suffix}"),
                descr: descr.to_string(),
                vertices,
                edges,
                travelers: trav,
                format,
                category,
            });
        }
        Ok(())
    }

    // ── Edge line renderers ──────────────────────────────────────────────

    fn simple_line(&self, e: EdgeId, numbers: &VertexNumbers, systems: Option<&[SystemId]>) -> String {
        let edge = self.edge(e);
        format!(
            "{} {} {}",
            numbers.simple[edge.vertex1.index()],
            numbers.simple[edge.vertex2.index()],
            edge.label(systems)
        )
    }

    fn collapsed_line(&self, e: EdgeId, numbers: &VertexNumbers, systems: Option<&[SystemId]>) -> String {
        let edge = self.edge(e);
        let mut line = format!(
            "{} {} {}",
            numbers.collapsed[edge.vertex1.index()],
            numbers.collapsed[edge.vertex2.index()],
            edge.label(systems)
        );
        for &ip in &edge.intermediate_points {
            let p = self.vertex(ip).point;
            line.push_str(&format!(" {} {}", p.lat, p.lng));
        }
        line
    }

    fn traveled_line(
        &self,
        data: &HighwayData,
        e: EdgeId,
        numbers: &VertexNumbers,
        traveler_numbering: &FxHashMap<TravelerId, usize>,
        systems: Option<&[SystemId]>,
    ) -> String {
        let edge = self.edge(e);
        let mut line = format!(
            "{} {} {} {}",
            numbers.traveled[edge.vertex1.index()],
            numbers.traveled[edge.vertex2.index()],
            edge.label(systems),
            clinchedby_code(&data.segment(edge.segment).clinched_by, traveler_numbering)
        );
        for &ip in &edge.intermediate_points {
            let p = self.vertex(ip).point;
            line.push_str(&format!(" {} {}", p.lat, p.lng));
        }
        line
    }
}
