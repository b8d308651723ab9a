use serde::Serialize;
use std::collections::BTreeSet;

/// Column labels every loaded table is normalized to, in order.
pub const COLUMNS: [&str; 5] = ["name", "country", "city", "website", "fields"];

/// Dropdown sentinel meaning "no constraint".
pub const ALL: &str = "All";

/// Separator between topic tags in the `fields` column
pub const FIELD_SEPARATOR: char = '|';

/// One university, exactly the five normalized columns.
///
/// A missing cell is kept as an empty string: it renders blank and can never
/// match a non-empty criterion.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UniversityRecord {
    pub name: String,
    pub country: String,
    pub city: String,
    pub website: String,
    pub fields: String,
}

impl UniversityRecord {
    pub fn new(name: &str, country: &str, city: &str, website: &str, fields: &str) -> Self {
        Self {
            name: name.to_string(),
            country: country.to_string(),
            city: city.to_string(),
            website: website.to_string(),
            fields: fields.to_string(),
        }
    }

    /// Build a record from the first five cells of a row; absent cells stay blank.
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Self {
        let cell = |i: usize| cells.get(i).map(|c| c.as_ref().to_string()).unwrap_or_default();
        Self {
            name: cell(0),
            country: cell(1),
            city: cell(2),
            website: cell(3),
            fields: cell(4),
        }
    }

    /// Individual topic tags, empty ones skipped.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.fields
            .split(FIELD_SEPARATOR)
            .filter(|tag| !tag.is_empty())
    }

    /// "city, country" as shown on a card
    pub fn location(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

/// Read-only store of records, built once at startup and passed explicitly
/// to the filter and render functions.
#[derive(Debug, Clone, Default)]
pub struct Table {
    records: Vec<UniversityRecord>,
}

impl Table {
    pub fn new(records: Vec<UniversityRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[UniversityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `"All"` followed by every distinct non-empty country, sorted.
    pub fn country_options(&self) -> Vec<String> {
        let distinct: BTreeSet<&str> = self
            .records
            .iter()
            .map(|r| r.country.as_str())
            .filter(|c| !c.is_empty())
            .collect();

        with_sentinel(distinct)
    }

    /// `"All"` followed by every distinct tag found in the `fields` column, sorted.
    pub fn field_options(&self) -> Vec<String> {
        let distinct: BTreeSet<&str> = self.records.iter().flat_map(|r| r.tags()).collect();

        with_sentinel(distinct)
    }
}

fn with_sentinel(values: BTreeSet<&str>) -> Vec<String> {
    std::iter::once(ALL)
        .chain(values)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(vec![
            UniversityRecord::new("MIT", "USA", "Cambridge", "https://mit.edu", "Computer Science|Physics"),
            UniversityRecord::new("Oxford", "UK", "Oxford", "https://ox.ac.uk", "Law|Physics"),
            UniversityRecord::new("Unknown", "", "", "", ""),
        ])
    }

    #[test]
    fn test_country_options_sorted_with_sentinel() {
        assert_eq!(sample().country_options(), vec!["All", "UK", "USA"]);
    }

    #[test]
    fn test_field_options_split_on_pipe() {
        assert_eq!(
            sample().field_options(),
            vec!["All", "Computer Science", "Law", "Physics"]
        );
    }

    #[test]
    fn test_from_cells_pads_missing() {
        let record = UniversityRecord::from_cells(&["ETH", "Switzerland"]);
        assert_eq!(record.name, "ETH");
        assert_eq!(record.country, "Switzerland");
        assert_eq!(record.city, "");
        assert_eq!(record.fields, "");
    }

    #[test]
    fn test_location_format() {
        let table = sample();
        let record = &table.records()[0];
        assert_eq!(record.location(), "Cambridge, USA");
    }
}
