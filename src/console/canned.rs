/// Predefined statements offered for a selected table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannedQuery {
    ShowAll,
    Count,
    Describe,
}

impl CannedQuery {
    pub const ALL: [CannedQuery; 3] = [CannedQuery::ShowAll, CannedQuery::Count, CannedQuery::Describe];

    pub fn label(&self) -> &'static str {
        match self {
            CannedQuery::ShowAll => "Show All Records",
            CannedQuery::Count => "Count Records",
            CannedQuery::Describe => "Describe Structure",
        }
    }

    pub fn sql(&self, table: &str) -> String {
        let table = quote_identifier(table);
        match self {
            CannedQuery::ShowAll => format!("SELECT * FROM {} LIMIT 10;", table),
            CannedQuery::Count => format!("SELECT COUNT(*) as total FROM {};", table),
            CannedQuery::Describe => format!("DESCRIBE {};", table),
        }
    }
}

/// MySQL identifier quoting: wrap in backticks, double embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
