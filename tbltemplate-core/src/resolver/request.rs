//! Parsing of the comma-separated table and column lists given on the
//! command line.

use crate::models::ColumnInfo;

/// Wildcard marker accepted in table-list entries.
pub const WILDCARD: char = '*';

/// One entry of a table list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEntry {
    /// Exact table name, kept only if the table exists
    Literal(String),
    /// Entry containing [`WILDCARD`], with its translated `ILIKE` pattern
    Pattern { raw: String, like: String },
}

impl TableEntry {
    /// Classifies a single, already trimmed entry.
    pub fn parse(entry: &str) -> Self {
        if entry.contains(WILDCARD) {
            Self::Pattern {
                raw: entry.to_string(),
                like: to_like_pattern(entry),
            }
        } else {
            Self::Literal(entry.to_string())
        }
    }

    /// The entry as the user wrote it.
    pub fn raw(&self) -> &str {
        match self {
            Self::Literal(name) => name,
            Self::Pattern { raw, .. } => raw,
        }
    }
}

/// Splits a table list on commas, trimming each entry and skipping blanks.
///
/// # Example
/// ```rust
/// use tbltemplate_core::resolver::{TableEntry, parse_table_list};
///
/// let entries = parse_table_list(" x_*, orders ,,");
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[1], TableEntry::Literal("orders".to_string()));
/// ```
pub fn parse_table_list(raw: &str) -> Vec<TableEntry> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(TableEntry::parse)
        .collect()
}

/// Translates a wildcard entry into an `ILIKE` pattern.
///
/// `LIKE` metacharacters already present in the entry are escaped so that
/// only the wildcard marker matches more than itself: `x_*` becomes `x\_%`.
pub fn to_like_pattern(entry: &str) -> String {
    let mut pattern = String::with_capacity(entry.len() + 4);
    for c in entry.chars() {
        match c {
            WILDCARD => pattern.push('%'),
            '%' | '_' | '\\' => {
                pattern.push('\\');
                pattern.push(c);
            }
            other => pattern.push(other),
        }
    }
    pattern
}

/// Columns left out of every header row.
///
/// Names match exactly. The raw list is trimmed as a whole and split on
/// commas; individual tokens keep their surrounding whitespace, so
/// `"id, created_at"` excludes `id` and ` created_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnExclusions {
    names: Vec<String>,
    serial: bool,
}

impl ColumnExclusions {
    /// No exclusions.
    pub fn none() -> Self {
        Self::default()
    }

    /// Parses a comma-separated exclusion list.
    pub fn parse(raw: &str) -> Self {
        Self {
            names: raw.trim().split(',').map(str::to_string).collect(),
            serial: false,
        }
    }

    /// Builds exclusions from an optional raw list.
    pub fn from_option(raw: Option<&str>) -> Self {
        raw.map_or_else(Self::none, Self::parse)
    }

    /// Additionally drop sequence-backed and identity columns.
    pub fn with_serial(mut self, serial: bool) -> Self {
        self.serial = serial;
        self
    }

    /// Excluded names, as parsed.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether `column` is left out.
    pub fn excludes(&self, column: &ColumnInfo) -> bool {
        (self.serial && column.is_serial) || self.names.iter().any(|n| *n == column.name)
    }

    /// Keeps the names of the columns not excluded, in their given order.
    pub fn apply(&self, columns: Vec<ColumnInfo>) -> Vec<String> {
        columns
            .into_iter()
            .filter(|column| !self.excludes(column))
            .map(|column| column.name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_entry_kinds() {
        assert_eq!(
            TableEntry::parse("orders"),
            TableEntry::Literal("orders".to_string())
        );
        assert_eq!(
            TableEntry::parse("x_*"),
            TableEntry::Pattern {
                raw: "x_*".to_string(),
                like: "x\\_%".to_string()
            }
        );
    }

    #[test]
    fn test_like_pattern_translation() {
        assert_eq!(to_like_pattern("*lab*"), "%lab%");
        assert_eq!(to_like_pattern("e_*"), "e\\_%");
        assert_eq!(to_like_pattern("*_log"), "%\\_log");
        assert_eq!(to_like_pattern("100%*"), "100\\%%");
        assert_eq!(to_like_pattern("a\\b*"), "a\\\\b%");
    }

    #[test]
    fn test_parse_table_list_trims_entries() {
        let entries = parse_table_list("x_* ,  orders,\tlab*");
        let raws: Vec<&str> = entries.iter().map(TableEntry::raw).collect();
        assert_eq!(raws, vec!["x_*", "orders", "lab*"]);
    }

    #[test]
    fn test_parse_table_list_blank() {
        assert!(parse_table_list("").is_empty());
        assert!(parse_table_list(" , ,").is_empty());
    }

    #[test]
    fn test_exclusions_keep_token_whitespace() {
        let exclusions = ColumnExclusions::parse("  id, created_at ");
        assert_eq!(exclusions.names(), ["id", " created_at"]);

        assert!(exclusions.excludes(&ColumnInfo::new("id")));
        assert!(!exclusions.excludes(&ColumnInfo::new("created_at")));
    }

    #[test]
    fn test_exclusions_apply_preserves_order() {
        let columns = vec![
            ColumnInfo::new("id"),
            ColumnInfo::new("name"),
            ColumnInfo::new("created_at"),
            ColumnInfo::new("total"),
        ];
        let kept = ColumnExclusions::parse("id,created_at").apply(columns);
        assert_eq!(kept, vec!["name".to_string(), "total".to_string()]);
    }

    #[test]
    fn test_serial_exclusion() {
        let columns = vec![
            ColumnInfo::serial("id"),
            ColumnInfo::new("name"),
            ColumnInfo::serial("seq_no"),
        ];

        let kept = ColumnExclusions::none().with_serial(true).apply(columns.clone());
        assert_eq!(kept, vec!["name".to_string()]);

        let kept = ColumnExclusions::none().apply(columns);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(ColumnExclusions::from_option(None), ColumnExclusions::none());
        assert_eq!(
            ColumnExclusions::from_option(Some("a,b")).names(),
            ["a", "b"]
        );
    }

    proptest! {
        #[test]
        fn prop_entries_without_wildcard_are_literal(name in "[A-Za-z0-9_%]{1,24}") {
            prop_assert_eq!(TableEntry::parse(&name), TableEntry::Literal(name.clone()));
        }

        #[test]
        fn prop_like_pattern_has_one_run_per_wildcard(entry in "[a-z_%*]{0,24}") {
            let like = to_like_pattern(&entry);
            let wildcards = entry.matches(WILDCARD).count();
            let escaped_percents = entry.matches('%').count();
            prop_assert_eq!(like.matches('%').count(), wildcards + escaped_percents);
            prop_assert!(!like.contains(WILDCARD));
        }

        #[test]
        fn prop_exclusion_keeps_everything_else(
            columns in proptest::collection::btree_set("[a-z]{1,8}", 0..12),
            excluded in proptest::collection::btree_set("[a-z]{1,8}", 0..6),
        ) {
            let infos: Vec<ColumnInfo> = columns.iter().map(ColumnInfo::new).collect();
            let raw = excluded.iter().cloned().collect::<Vec<_>>().join(",");
            let kept = ColumnExclusions::parse(&raw).apply(infos);

            let expected: Vec<String> = columns
                .iter()
                .filter(|c| !excluded.contains(*c))
                .cloned()
                .collect();
            prop_assert_eq!(kept, expected);
        }
    }
}
