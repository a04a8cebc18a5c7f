//! Update-history rows passed through to the database.

/// One row of `updates.csv`: the most recent route changes.
#[derive(Clone, Debug)]
pub struct UpdateRecord {
    pub date: String,
    pub region: String,
    pub route: String,
    pub root: String,
    pub description: String,
}

/// One row of `systemupdates.csv`: system-level status changes.
#[derive(Clone, Debug)]
pub struct SystemUpdate {
    pub date: String,
    pub region: String,
    pub system_name: String,
    pub description: String,
    pub status_change: String,
}
