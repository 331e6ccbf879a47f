//! Derived relationships between the registry collections

use crate::model::{Family, House, Need, Person, RecordId};
use crate::store::EntityStore;

/// Read-only join view over one [`EntityStore`] snapshot.
///
/// Every method is a pure linear scan over the current collections; nothing
/// is cached, so results always reflect the snapshot the index was taken
/// from. Obtain one via [`EntityStore::index`].
pub struct RegistryIndex<'a> {
    store: &'a EntityStore,
}

impl<'a> RegistryIndex<'a> {
    pub(crate) fn new(store: &'a EntityStore) -> Self {
        Self { store }
    }

    /// All persons belonging to the given family, in store order
    pub fn members_of(&self, family_id: RecordId) -> Vec<&'a Person> {
        self.store
            .persons()
            .iter()
            .filter(|p| p.family_id == Some(family_id))
            .collect()
    }

    /// Persons living in the given house without belonging to any family.
    ///
    /// A person with a family is counted through the family's house instead,
    /// never here.
    pub fn direct_residents_of(&self, house_id: RecordId) -> Vec<&'a Person> {
        self.store
            .persons()
            .iter()
            .filter(|p| p.house_id == Some(house_id) && p.family_id.is_none())
            .collect()
    }

    /// Families housed in the given house.
    ///
    /// A house id that no longer resolves yields nothing; families whose
    /// house was deleted out from under them keep the stale id but are not
    /// joined through it.
    pub fn families_of(&self, house_id: RecordId) -> Vec<&'a Family> {
        if self.store.house(house_id).is_none() {
            return Vec::new();
        }
        self.store
            .families()
            .iter()
            .filter(|f| f.house_id == Some(house_id))
            .collect()
    }

    /// All houses located in the given neighborhood
    pub fn houses_of(&self, neighborhood_id: RecordId) -> Vec<&'a House> {
        self.store
            .houses()
            .iter()
            .filter(|h| h.neighborhood_id == Some(neighborhood_id))
            .collect()
    }

    /// Needs whose beneficiary is the given person
    pub fn needs_of_person(&self, person_id: RecordId) -> Vec<&'a Need> {
        self.store
            .needs()
            .iter()
            .filter(|n| n.beneficiary.person_id() == Some(person_id))
            .collect()
    }

    /// Needs whose beneficiary is the given family
    pub fn needs_of_family(&self, family_id: RecordId) -> Vec<&'a Need> {
        self.store
            .needs()
            .iter()
            .filter(|n| n.beneficiary.family_id() == Some(family_id))
            .collect()
    }

    /// Needs whose beneficiary is the given house
    pub fn needs_of_house(&self, house_id: RecordId) -> Vec<&'a Need> {
        self.store
            .needs()
            .iter()
            .filter(|n| n.beneficiary.house_id() == Some(house_id))
            .collect()
    }

    /// Persons eligible to head a family.
    ///
    /// Excludes everyone currently heading a family, except the head of the
    /// family given as `excluding` — an edited family keeps its own head in
    /// the candidate list.
    pub fn eligible_family_heads(&self, excluding: Option<RecordId>) -> Vec<&'a Person> {
        self.store
            .persons()
            .iter()
            .filter(|person| {
                !self.store.families().iter().any(|family| {
                    family.head_of_family == Some(person.person_id)
                        && Some(family.family_id) != excluding
                })
            })
            .collect()
    }

    /// Display name of a person, `None` when the id dangles
    pub fn person_name(&self, person_id: RecordId) -> Option<&'a str> {
        self.store.person(person_id).map(|p| p.name.as_str())
    }

    /// The house a family lives in, `None` when unset or dangling
    pub fn family_house(&self, family_id: RecordId) -> Option<&'a House> {
        let family = self.store.family(family_id)?;
        self.store.house(family.house_id?)
    }

    /// Display label of a house ("number - address"), `None` when dangling
    pub fn house_label(&self, house_id: RecordId) -> Option<String> {
        self.store
            .house(house_id)
            .map(|h| format!("{} - {}", h.house_number, h.address))
    }
}
