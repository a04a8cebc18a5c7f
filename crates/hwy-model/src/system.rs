//! Highway systems and their visibility levels.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use hwy_core::{ConRouteId, RouteId};

/// Visibility tier of a highway system.
///
/// Devel systems are hidden from graphs and user stats; preview and active
/// are clinchable; only active counts toward active-only stats.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SystemLevel {
    Active,
    Preview,
    Devel,
}

impl SystemLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SystemLevel::Active => "active",
            SystemLevel::Preview => "preview",
            SystemLevel::Devel => "devel",
        }
    }
}

impl FromStr for SystemLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SystemLevel::Active),
            "preview" => Ok(SystemLevel::Preview),
            "devel" => Ok(SystemLevel::Devel),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SystemLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A collection of routes sharing a display identity.
#[derive(Clone, Debug)]
pub struct HighwaySystem {
    pub name: String,
    pub country: String,
    pub fullname: String,
    pub color: String,
    pub tier: u32,
    pub level: SystemLevel,
    pub routes: Vec<RouteId>,
    pub con_routes: Vec<ConRouteId>,
    /// Concurrency-adjusted mileage per region, filled by the aggregator.
    pub mileage_by_region: BTreeMap<String, f64>,
    /// `REGION NAME` list keys referenced by at least one travel list.
    pub listnames_in_use: BTreeSet<String>,
    /// Alternate route-name keys no travel list has referenced yet.
    pub unused_alt_route_names: BTreeSet<String>,
}

impl HighwaySystem {
    pub fn new(name: String, country: String, fullname: String, color: String, tier: u32, level: SystemLevel) -> Self {
        Self {
            name,
            country,
            fullname,
            color,
            tier,
            level,
            routes: Vec::new(),
            con_routes: Vec::new(),
            mileage_by_region: BTreeMap::new(),
            listnames_in_use: BTreeSet::new(),
            unused_alt_route_names: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn active(&self) -> bool {
        self.level == SystemLevel::Active
    }

    #[inline]
    pub fn preview(&self) -> bool {
        self.level == SystemLevel::Preview
    }

    #[inline]
    pub fn active_or_preview(&self) -> bool {
        matches!(self.level, SystemLevel::Active | SystemLevel::Preview)
    }

    #[inline]
    pub fn devel(&self) -> bool {
        self.level == SystemLevel::Devel
    }

    /// Total concurrency-adjusted system mileage across all regions.
    pub fn total_mileage(&self) -> f64 {
        self.mileage_by_region.values().sum()
    }
}
