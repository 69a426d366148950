//! Study-field role table
//!
//! Static mapping from a lower-cased field keyword to the guild role id.
//! Read-only after construction; a member may hold at most one id from this
//! table's value set at a time.

/// Keyword → role id table
#[derive(Debug, Clone)]
pub struct RoleTable {
    entries: Vec<(&'static str, &'static str)>,
}

impl RoleTable {
    /// The study-field roles the bot manages
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: vec![
                ("comsci", "759478263193665596"),
                ("secres", "759478760159838219"),
                ("sofeng", "759479401229320223"),
                ("gameng", "759479206320406598"),
            ],
        }
    }

    /// Resolve a keyword (case-insensitive) to its role id
    #[must_use]
    pub fn resolve(&self, keyword: &str) -> Option<&'static str> {
        let keyword = keyword.to_lowercase();
        self.entries
            .iter()
            .find(|(name, _)| *name == keyword)
            .map(|(_, id)| *id)
    }

    /// True if `role_id` belongs to the table's value set
    #[must_use]
    pub fn is_field_role(&self, role_id: &str) -> bool {
        self.entries.iter().any(|(_, id)| *id == role_id)
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::new()
    }
}
