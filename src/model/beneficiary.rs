//! The beneficiary reference carried by a need

use crate::error::Error;
use crate::model::RecordId;

/// The single entity a need is associated with, or none.
///
/// On the wire a need carries three nullable id columns (`PersonId`,
/// `FamilyId`, `HouseId`); in memory exactly one case holds. Construction
/// through [`Beneficiary::from_ids`] rejects records with more than one
/// column populated, so a value of this type cannot represent an ambiguous
/// beneficiary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Beneficiary {
    /// The need belongs to a single person
    Person(RecordId),
    /// The need belongs to a family
    Family(RecordId),
    /// The need belongs to a house
    House(RecordId),
    /// The need is not assigned to anyone yet
    #[default]
    Unassigned,
}

impl Beneficiary {
    /// Build a beneficiary from the three nullable wire columns.
    ///
    /// Fails with [`Error::ConstraintViolation`] when more than one column is
    /// populated.
    pub fn from_ids(
        person_id: Option<RecordId>,
        family_id: Option<RecordId>,
        house_id: Option<RecordId>,
    ) -> Result<Self, Error> {
        let populated =
            person_id.is_some() as u8 + family_id.is_some() as u8 + house_id.is_some() as u8;
        if populated > 1 {
            return Err(Error::constraint(
                "a need may reference at most one of person, family and house",
            ));
        }

        Ok(if let Some(id) = person_id {
            Beneficiary::Person(id)
        } else if let Some(id) = family_id {
            Beneficiary::Family(id)
        } else if let Some(id) = house_id {
            Beneficiary::House(id)
        } else {
            Beneficiary::Unassigned
        })
    }

    /// The wire representation: the three nullable id columns
    pub fn as_ids(&self) -> (Option<RecordId>, Option<RecordId>, Option<RecordId>) {
        match *self {
            Beneficiary::Person(id) => (Some(id), None, None),
            Beneficiary::Family(id) => (None, Some(id), None),
            Beneficiary::House(id) => (None, None, Some(id)),
            Beneficiary::Unassigned => (None, None, None),
        }
    }

    /// The referenced person id, if the beneficiary is a person
    pub fn person_id(&self) -> Option<RecordId> {
        match *self {
            Beneficiary::Person(id) => Some(id),
            _ => None,
        }
    }

    /// The referenced family id, if the beneficiary is a family
    pub fn family_id(&self) -> Option<RecordId> {
        match *self {
            Beneficiary::Family(id) => Some(id),
            _ => None,
        }
    }

    /// The referenced house id, if the beneficiary is a house
    pub fn house_id(&self) -> Option<RecordId> {
        match *self {
            Beneficiary::House(id) => Some(id),
            _ => None,
        }
    }

    /// Whether the need is unassigned
    pub fn is_unassigned(&self) -> bool {
        matches!(self, Beneficiary::Unassigned)
    }
}
