use crate::record::{Table, UniversityRecord, ALL};
use serde::{Deserialize, Serialize};

/// The three optional filter dimensions.
///
/// Dropdown criteria treat `"All"` and the empty string as "no constraint";
/// the search text is unconstrained only when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Criteria {
    pub country: Option<String>,
    pub field: Option<String>,
    pub search: Option<String>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Country to match, if constrained
    pub fn country_constraint(&self) -> Option<&str> {
        dropdown_constraint(self.country.as_deref())
    }

    /// Field tag substring to match, if constrained
    pub fn field_constraint(&self) -> Option<&str> {
        dropdown_constraint(self.field.as_deref())
    }

    /// Name-or-city substring to match, if constrained
    pub fn search_constraint(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_unconstrained(&self) -> bool {
        self.country_constraint().is_none()
            && self.field_constraint().is_none()
            && self.search_constraint().is_none()
    }

    /// All supplied criteria must hold; the search text may hit name or city.
    pub fn matches(&self, record: &UniversityRecord) -> bool {
        if let Some(country) = self.country_constraint() {
            if record.country.to_lowercase() != country.to_lowercase() {
                return false;
            }
        }

        if let Some(field) = self.field_constraint() {
            if !contains_ignore_case(&record.fields, field) {
                return false;
            }
        }

        if let Some(search) = self.search_constraint() {
            if !contains_ignore_case(&record.name, search)
                && !contains_ignore_case(&record.city, search)
            {
                return false;
            }
        }

        true
    }
}

/// Rows satisfying `criteria`, in table order.
pub fn filter<'a>(table: &'a Table, criteria: &Criteria) -> Vec<&'a UniversityRecord> {
    table
        .records()
        .iter()
        .filter(|record| criteria.matches(record))
        .collect()
}

fn dropdown_constraint(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != ALL)
}

// Empty haystacks never match: the needle is always non-empty here.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
