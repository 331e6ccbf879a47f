//! In-memory mirror of the registry's five collections

use crate::index::RegistryIndex;
use crate::model::{Family, House, Need, Neighborhood, Person, RecordId};

/// In-memory snapshot of the five registry collections.
///
/// One store is owned per view, constructed empty at view mount and filled by
/// the mutation coordinator. Each collection is only ever replaced wholesale
/// with the latest server state; there is no incremental update path.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    persons: Vec<Person>,
    houses: Vec<House>,
    families: Vec<Family>,
    neighborhoods: Vec<Neighborhood>,
    needs: Vec<Need>,
    loaded: bool,
}

impl EntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any collection has been loaded since construction or the last
    /// [`clear`](Self::clear)
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Drop all collections, returning the store to its unloaded state
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// A derived-join view over the current snapshot.
    ///
    /// The index borrows the store, so results cannot outlive the snapshot
    /// they were computed from.
    pub fn index(&self) -> RegistryIndex<'_> {
        RegistryIndex::new(self)
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn houses(&self) -> &[House] {
        &self.houses
    }

    pub fn families(&self) -> &[Family] {
        &self.families
    }

    pub fn neighborhoods(&self) -> &[Neighborhood] {
        &self.neighborhoods
    }

    pub fn needs(&self) -> &[Need] {
        &self.needs
    }

    /// Look up a person by id
    pub fn person(&self, id: RecordId) -> Option<&Person> {
        self.persons.iter().find(|p| p.person_id == id)
    }

    /// Look up a house by id
    pub fn house(&self, id: RecordId) -> Option<&House> {
        self.houses.iter().find(|h| h.house_id == id)
    }

    /// Look up a family by id
    pub fn family(&self, id: RecordId) -> Option<&Family> {
        self.families.iter().find(|f| f.family_id == id)
    }

    /// Look up a neighborhood by id
    pub fn neighborhood(&self, id: RecordId) -> Option<&Neighborhood> {
        self.neighborhoods.iter().find(|n| n.neighborhood_id == id)
    }

    /// Look up a need by id
    pub fn need(&self, id: RecordId) -> Option<&Need> {
        self.needs.iter().find(|n| n.need_id == id)
    }

    pub(crate) fn replace_persons(&mut self, persons: Vec<Person>) {
        self.persons = persons;
        self.loaded = true;
    }

    pub(crate) fn replace_houses(&mut self, houses: Vec<House>) {
        self.houses = houses;
        self.loaded = true;
    }

    pub(crate) fn replace_families(&mut self, families: Vec<Family>) {
        self.families = families;
        self.loaded = true;
    }

    pub(crate) fn replace_neighborhoods(&mut self, neighborhoods: Vec<Neighborhood>) {
        self.neighborhoods = neighborhoods;
        self.loaded = true;
    }

    pub(crate) fn replace_needs(&mut self, needs: Vec<Need>) {
        self.needs = needs;
        self.loaded = true;
    }
}
