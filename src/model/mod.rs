//! Record types stored in the registry
//!
//! Five linked collections make up the registry: persons, houses, families,
//! neighborhoods and needs. Every record type has a companion draft type
//! carrying the same fields minus the server-assigned id; drafts are the body
//! of create and update calls and the buffer behind edit forms.
//!
//! Wire field names are PascalCase, matching the JSON contract of the remote
//! service (`PersonId`, `AgeCategory`, `IsHeadOfFamily`, ...).

mod beneficiary;

pub use beneficiary::Beneficiary;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::Error;

/// Opaque server-assigned record identifier, unique within its entity type
pub type RecordId = i64;

/// A record living in one of the registry's collections
pub trait Record: Clone + DeserializeOwned {
    /// Path segment of the record's collection on the remote service
    const COLLECTION: &'static str;

    /// Draft shape sent as the body of create and update calls
    type Draft: Serialize + Clone + Default;

    /// The server-assigned identifier
    fn id(&self) -> RecordId;

    /// A draft initialized from the record's current field values
    fn draft(&self) -> Self::Draft;
}

/// A neighborhood grouping houses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Neighborhood {
    pub neighborhood_id: RecordId,
    pub name: String,
}

/// Draft for creating or updating a neighborhood
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NeighborhoodDraft {
    pub name: String,
}

impl Record for Neighborhood {
    const COLLECTION: &'static str = "neighborhoods";
    type Draft = NeighborhoodDraft;

    fn id(&self) -> RecordId {
        self.neighborhood_id
    }

    fn draft(&self) -> NeighborhoodDraft {
        NeighborhoodDraft {
            name: self.name.clone(),
        }
    }
}

/// A house, optionally located in a neighborhood
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct House {
    pub house_id: RecordId,
    pub house_number: i64,
    pub address: String,
    #[serde(default)]
    pub neighborhood_id: Option<RecordId>,
}

/// Draft for creating or updating a house
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HouseDraft {
    pub house_number: i64,
    pub address: String,
    #[serde(default)]
    pub neighborhood_id: Option<RecordId>,
}

impl Record for House {
    const COLLECTION: &'static str = "houses";
    type Draft = HouseDraft;

    fn id(&self) -> RecordId {
        self.house_id
    }

    fn draft(&self) -> HouseDraft {
        HouseDraft {
            house_number: self.house_number,
            address: self.address.clone(),
            neighborhood_id: self.neighborhood_id,
        }
    }
}

/// A family, optionally headed by a person and housed in a house
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Family {
    pub family_id: RecordId,
    #[serde(default)]
    pub head_of_family: Option<RecordId>,
    pub family_size: u32,
    pub phone_number: String,
    pub notes: String,
    #[serde(default)]
    pub house_id: Option<RecordId>,
}

/// Draft for creating or updating a family
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FamilyDraft {
    #[serde(default)]
    pub head_of_family: Option<RecordId>,
    pub family_size: u32,
    pub phone_number: String,
    pub notes: String,
    #[serde(default)]
    pub house_id: Option<RecordId>,
}

impl Record for Family {
    const COLLECTION: &'static str = "families";
    type Draft = FamilyDraft;

    fn id(&self) -> RecordId {
        self.family_id
    }

    fn draft(&self) -> FamilyDraft {
        FamilyDraft {
            head_of_family: self.head_of_family,
            family_size: self.family_size,
            phone_number: self.phone_number.clone(),
            notes: self.notes.clone(),
            house_id: self.house_id,
        }
    }
}

/// A person, belonging to at most one family.
///
/// `house_id` marks a direct resident only while `family_id` is empty; a
/// family member lives wherever the family's house is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Person {
    pub person_id: RecordId,
    pub name: String,
    pub age_category: String,
    pub is_head_of_family: bool,
    #[serde(default)]
    pub family_id: Option<RecordId>,
    #[serde(default)]
    pub house_id: Option<RecordId>,
    pub notes: String,
}

/// Draft for creating or updating a person
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersonDraft {
    pub name: String,
    pub age_category: String,
    pub is_head_of_family: bool,
    #[serde(default)]
    pub family_id: Option<RecordId>,
    #[serde(default)]
    pub house_id: Option<RecordId>,
    pub notes: String,
}

impl Record for Person {
    const COLLECTION: &'static str = "persons";
    type Draft = PersonDraft;

    fn id(&self) -> RecordId {
        self.person_id
    }

    fn draft(&self) -> PersonDraft {
        PersonDraft {
            name: self.name.clone(),
            age_category: self.age_category.clone(),
            is_head_of_family: self.is_head_of_family,
            family_id: self.family_id,
            house_id: self.house_id,
            notes: self.notes.clone(),
        }
    }
}

/// A need, optionally secured on a date and assigned to one beneficiary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNeed", into = "RawNeed")]
pub struct Need {
    pub need_id: RecordId,
    pub need_description: String,
    pub date_secured: Option<NaiveDate>,
    pub beneficiary: Beneficiary,
}

/// Draft for creating or updating a need
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNeedDraft", into = "RawNeedDraft")]
pub struct NeedDraft {
    pub need_description: String,
    pub date_secured: Option<NaiveDate>,
    pub beneficiary: Beneficiary,
}

impl Record for Need {
    const COLLECTION: &'static str = "needs";
    type Draft = NeedDraft;

    fn id(&self) -> RecordId {
        self.need_id
    }

    fn draft(&self) -> NeedDraft {
        NeedDraft {
            need_description: self.need_description.clone(),
            date_secured: self.date_secured,
            beneficiary: self.beneficiary,
        }
    }
}

/// Wire shape of a need: beneficiary as three nullable id columns
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawNeed {
    need_id: RecordId,
    need_description: String,
    #[serde(default)]
    date_secured: Option<String>,
    #[serde(default)]
    person_id: Option<RecordId>,
    #[serde(default)]
    family_id: Option<RecordId>,
    #[serde(default)]
    house_id: Option<RecordId>,
}

impl TryFrom<RawNeed> for Need {
    type Error = Error;

    fn try_from(raw: RawNeed) -> Result<Self, Error> {
        Ok(Need {
            need_id: raw.need_id,
            need_description: raw.need_description,
            date_secured: parse_wire_date(raw.date_secured.as_deref())?,
            beneficiary: Beneficiary::from_ids(raw.person_id, raw.family_id, raw.house_id)?,
        })
    }
}

impl From<Need> for RawNeed {
    fn from(need: Need) -> Self {
        let (person_id, family_id, house_id) = need.beneficiary.as_ids();
        RawNeed {
            need_id: need.need_id,
            need_description: need.need_description,
            date_secured: format_wire_date(need.date_secured),
            person_id,
            family_id,
            house_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawNeedDraft {
    need_description: String,
    #[serde(default)]
    date_secured: Option<String>,
    #[serde(default)]
    person_id: Option<RecordId>,
    #[serde(default)]
    family_id: Option<RecordId>,
    #[serde(default)]
    house_id: Option<RecordId>,
}

impl TryFrom<RawNeedDraft> for NeedDraft {
    type Error = Error;

    fn try_from(raw: RawNeedDraft) -> Result<Self, Error> {
        Ok(NeedDraft {
            need_description: raw.need_description,
            date_secured: parse_wire_date(raw.date_secured.as_deref())?,
            beneficiary: Beneficiary::from_ids(raw.person_id, raw.family_id, raw.house_id)?,
        })
    }
}

impl From<NeedDraft> for RawNeedDraft {
    fn from(draft: NeedDraft) -> Self {
        let (person_id, family_id, house_id) = draft.beneficiary.as_ids();
        RawNeedDraft {
            need_description: draft.need_description,
            date_secured: format_wire_date(draft.date_secured),
            person_id,
            family_id,
            house_id,
        }
    }
}

/// Parse a `DateSecured` wire value.
///
/// The admin forms submit an empty string for an unset date, so both `null`
/// and `""` read as `None`.
fn parse_wire_date(value: Option<&str>) -> Result<Option<NaiveDate>, Error> {
    match value {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| Error::general(format!("invalid DateSecured value {:?}: {}", text, e))),
    }
}

fn format_wire_date(value: Option<NaiveDate>) -> Option<String> {
    value.map(|date| date.format("%Y-%m-%d").to_string())
}
