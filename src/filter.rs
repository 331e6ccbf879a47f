//! Free-text narrowing of a collection for display

use crate::model::{Family, House, Need, Neighborhood, Person};

/// A record type with one designated free-text search field
pub trait Matchable {
    /// The field value the view's search box matches against
    fn match_field(&self) -> &str;
}

impl Matchable for Person {
    fn match_field(&self) -> &str {
        &self.name
    }
}

impl Matchable for Family {
    fn match_field(&self) -> &str {
        &self.phone_number
    }
}

impl Matchable for House {
    fn match_field(&self) -> &str {
        &self.address
    }
}

impl Matchable for Neighborhood {
    fn match_field(&self) -> &str {
        &self.name
    }
}

impl Matchable for Need {
    fn match_field(&self) -> &str {
        &self.need_description
    }
}

/// Case-insensitive substring filter over a collection.
///
/// Preserves the collection's order and never mutates it; an empty query
/// passes everything through.
pub fn filter_records<'a, T: Matchable>(records: &'a [T], query: &str) -> Vec<&'a T> {
    if query.is_empty() {
        return records.iter().collect();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| record.match_field().to_lowercase().contains(&needle))
        .collect()
}
