//! Query context: the filter/sort/pagination criteria applied to queries
//!
//! The context is an explicit object owned by the orchestrating caller (the
//! location service) and passed into each engine call; there is no hidden
//! process-wide query state. `set`-style mutation happens on the owner's
//! side: filter patches merge field by field, sort replaces wholesale.

use crate::query::error::{QueryError, QueryResult};
use crate::store::types::MAX_RATE;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

/// Default records per page when pagination is switched on
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Which record field a query sorts on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// By rating
    Rate,
    /// By display name, case-insensitive lexicographic
    Name,
    /// By creation time
    CreatedAt,
}

/// Sort direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortDir {
    Asc,
    Desc,
}

/// A full sort criterion: exactly one key, one direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortBy {
    pub key: SortKey,
    pub dir: SortDir,
}

impl SortBy {
    pub fn new(key: SortKey, dir: SortDir) -> Self {
        Self { key, dir }
    }
}

/// Filter criteria applied to every query
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterBy {
    /// Case-insensitive pattern matched against name or address;
    /// empty means no text filter
    pub txt: String,
    /// Minimum rating to keep; 0 means no rating filter
    pub min_rate: u8,
}

/// A partial filter update: only the provided fields are merged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterPatch {
    pub txt: Option<String>,
    pub min_rate: Option<u8>,
}

/// The full query context
///
/// Defaults match the manager's startup behavior: sort by rating
/// descending, no filter, pagination off.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub filter_by: FilterBy,
    pub sort_by: Option<SortBy>,
    /// Zero-based page index; None disables pagination entirely
    pub page: Option<usize>,
    pub page_size: usize,
}

impl Default for QueryContext {
    fn default() -> Self {
        Self {
            filter_by: FilterBy::default(),
            sort_by: Some(SortBy::new(SortKey::Rate, SortDir::Desc)),
            page: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryContext {
    /// Merge a partial filter update, validating each provided field.
    /// Returns the resulting filter.
    pub fn apply_filter_patch(&mut self, patch: FilterPatch) -> QueryResult<FilterBy> {
        // Validate everything before mutating anything
        if let Some(txt) = &patch.txt {
            compile_pattern(txt)?;
        }
        if let Some(min_rate) = patch.min_rate {
            if min_rate > MAX_RATE {
                return Err(QueryError::InvalidInput(format!(
                    "min_rate must be at most {MAX_RATE}, got {min_rate}"
                )));
            }
        }

        if let Some(txt) = patch.txt {
            self.filter_by.txt = txt;
        }
        if let Some(min_rate) = patch.min_rate {
            self.filter_by.min_rate = min_rate;
        }
        Ok(self.filter_by.clone())
    }

    /// Replace the sort criterion wholesale (None restores store order)
    pub fn set_sort_by(&mut self, sort_by: Option<SortBy>) {
        self.sort_by = sort_by;
    }
}

/// Compile a filter text into a case-insensitive regex
pub fn compile_pattern(txt: &str) -> QueryResult<regex::Regex> {
    RegexBuilder::new(txt)
        .case_insensitive(true)
        .build()
        .map_err(|e| QueryError::InvalidInput(format!("bad filter pattern '{txt}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_sort_rate_desc() {
        let ctx = QueryContext::default();
        assert_eq!(ctx.sort_by, Some(SortBy::new(SortKey::Rate, SortDir::Desc)));
        assert_eq!(ctx.filter_by, FilterBy::default());
        assert_eq!(ctx.page, None);
        assert_eq!(ctx.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_filter_patch_merges_partially() {
        let mut ctx = QueryContext::default();

        ctx.apply_filter_patch(FilterPatch {
            txt: Some("dahab".into()),
            min_rate: None,
        })
        .unwrap();
        assert_eq!(ctx.filter_by.txt, "dahab");
        assert_eq!(ctx.filter_by.min_rate, 0);

        let filter = ctx
            .apply_filter_patch(FilterPatch {
                txt: None,
                min_rate: Some(3),
            })
            .unwrap();
        assert_eq!(filter.txt, "dahab");
        assert_eq!(filter.min_rate, 3);
    }

    #[test]
    fn test_filter_patch_rejects_bad_input() {
        let mut ctx = QueryContext::default();

        let bad_rate = ctx.apply_filter_patch(FilterPatch {
            txt: None,
            min_rate: Some(9),
        });
        assert!(matches!(bad_rate, Err(QueryError::InvalidInput(_))));

        let bad_pattern = ctx.apply_filter_patch(FilterPatch {
            txt: Some("[unclosed".into()),
            min_rate: None,
        });
        assert!(matches!(bad_pattern, Err(QueryError::InvalidInput(_))));

        // Rejected patches leave the context untouched
        assert_eq!(ctx.filter_by, FilterBy::default());
    }

    #[test]
    fn test_sort_replaces_wholesale() {
        let mut ctx = QueryContext::default();
        ctx.set_sort_by(Some(SortBy::new(SortKey::Name, SortDir::Asc)));
        assert_eq!(ctx.sort_by, Some(SortBy::new(SortKey::Name, SortDir::Asc)));

        ctx.set_sort_by(None);
        assert_eq!(ctx.sort_by, None);
    }
}
