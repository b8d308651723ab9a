use crate::filter::{filter, Criteria};
use crate::record::{Table, UniversityRecord};
use serde::Serialize;

/// Shown instead of an empty list.
pub const NO_RESULTS: &str = "No results found. Try adjusting your filters or search term.";

/// One display unit per matching row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub name: String,
    /// "city, country"
    pub location: String,
    pub country: String,
    pub fields: String,
    pub website: String,
}

impl From<&UniversityRecord> for Card {
    fn from(record: &UniversityRecord) -> Self {
        Self {
            name: record.name.clone(),
            location: record.location(),
            country: record.country.clone(),
            fields: record.fields.clone(),
            website: record.website.clone(),
        }
    }
}

/// What a front end draws for one set of criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Cards(Vec<Card>),
    NoResults,
}

impl Rendered {
    pub fn cards(&self) -> &[Card] {
        match self {
            Rendered::Cards(cards) => cards,
            Rendered::NoResults => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.cards().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Rendered::NoResults)
    }
}

/// Filter the table and turn every surviving row into a card.
///
/// Re-run on every criteria change; no state is kept between calls.
pub fn render(table: &Table, criteria: &Criteria) -> Rendered {
    let cards: Vec<Card> = filter(table, criteria).into_iter().map(Card::from).collect();

    if cards.is_empty() {
        Rendered::NoResults
    } else {
        Rendered::Cards(cards)
    }
}
