//! Connected routes: logical end-to-end routes built from chopped pieces.

use hwy_core::{RouteId, SystemId};

/// An end-to-end route composed of one or more chopped routes in order.
///
/// For `i > 0`, the connection endpoint of member `i-1` must coincide with
/// the begin endpoint of member `i`; the connectivity check repairs
/// direction mismatches by setting `is_reversed` on members where possible
/// and emits a datacheck otherwise.
#[derive(Clone, Debug)]
pub struct ConnectedRoute {
    pub system: SystemId,
    pub route: String,
    pub banner: String,
    /// Optional display grouping, e.g. a corridor name.
    pub group_name: String,
    pub roots: Vec<RouteId>,
    /// Sum of member-route mileages, computed after the per-route pass.
    pub mileage: f64,
}

impl ConnectedRoute {
    pub fn readable_name(&self) -> String {
        let mut name = format!("{}{}", self.route, self.banner);
        if !self.group_name.is_empty() {
            name.push_str(" (");
            name.push_str(&self.group_name);
            name.push(')');
        }
        name
    }
}
