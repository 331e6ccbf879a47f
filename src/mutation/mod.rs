//! Validated mutations against the registry
//!
//! Every create, update and delete flows through the [`MutationCoordinator`]:
//! drafts are validated against the current store, dispatched to the remote
//! service, and followed by a full resynchronization of all five collections
//! so derived joins pick up downstream effects of the write.

use log::debug;

use crate::error::Error;
use crate::model::{
    Beneficiary, Family, FamilyDraft, House, HouseDraft, Need, NeedDraft, Neighborhood,
    NeighborhoodDraft, Person, PersonDraft, RecordId,
};
use crate::remote::RemoteApi;
use crate::store::EntityStore;

/// Coordinates reads and writes for one view.
///
/// Owns the view's [`EntityStore`] and the connection to the remote service.
/// Mutations take `&mut self`, so at most one is in flight per view at a
/// time. A failed operation, local or remote, leaves the store untouched.
///
/// Deletes never cascade: records referencing a deleted id keep it, and the
/// dangling reference simply stops resolving.
pub struct MutationCoordinator {
    remote: RemoteApi,
    store: EntityStore,
}

impl MutationCoordinator {
    /// Create a coordinator with an empty store
    pub fn new(remote: RemoteApi) -> Self {
        Self {
            remote,
            store: EntityStore::new(),
        }
    }

    /// The view's current store snapshot
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Load all five collections from the remote service.
    ///
    /// Called once at view mount; the same full reload runs internally after
    /// every successful mutation.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        self.resynchronize().await
    }

    /// Reload every collection, replacing the store wholesale.
    ///
    /// All five lists are fetched before any collection is swapped in, so a
    /// failed fetch leaves the previous snapshot intact.
    async fn resynchronize(&mut self) -> Result<(), Error> {
        debug!("resynchronizing all collections");
        let persons: Vec<Person> = self.remote.list().await?;
        let houses: Vec<House> = self.remote.list().await?;
        let families: Vec<Family> = self.remote.list().await?;
        let neighborhoods: Vec<Neighborhood> = self.remote.list().await?;
        let needs: Vec<Need> = self.remote.list().await?;

        self.store.replace_persons(persons);
        self.store.replace_houses(houses);
        self.store.replace_families(families);
        self.store.replace_neighborhoods(neighborhoods);
        self.store.replace_needs(needs);
        Ok(())
    }

    // Persons

    pub async fn create_person(&mut self, draft: &PersonDraft) -> Result<Person, Error> {
        self.validate_person(draft)?;
        let created = self.remote.create::<Person>(draft).await?;
        self.resynchronize().await?;
        Ok(created)
    }

    pub async fn update_person(&mut self, id: RecordId, draft: &PersonDraft) -> Result<(), Error> {
        self.validate_person(draft)?;
        self.remote.update::<Person>(id, draft).await?;
        self.resynchronize().await
    }

    pub async fn delete_person(&mut self, id: RecordId) -> Result<(), Error> {
        self.remote.delete::<Person>(id).await?;
        self.resynchronize().await
    }

    // Houses

    pub async fn create_house(&mut self, draft: &HouseDraft) -> Result<House, Error> {
        self.validate_house(draft)?;
        let created = self.remote.create::<House>(draft).await?;
        self.resynchronize().await?;
        Ok(created)
    }

    pub async fn update_house(&mut self, id: RecordId, draft: &HouseDraft) -> Result<(), Error> {
        self.validate_house(draft)?;
        self.remote.update::<House>(id, draft).await?;
        self.resynchronize().await
    }

    pub async fn delete_house(&mut self, id: RecordId) -> Result<(), Error> {
        self.remote.delete::<House>(id).await?;
        self.resynchronize().await
    }

    // Families

    pub async fn create_family(&mut self, draft: &FamilyDraft) -> Result<Family, Error> {
        self.validate_family(draft, None)?;
        let created = self.remote.create::<Family>(draft).await?;
        self.resynchronize().await?;
        Ok(created)
    }

    /// Update a family. The family's current head stays valid for its own
    /// update even though it is excluded from every other family's candidate
    /// pool.
    pub async fn update_family(&mut self, id: RecordId, draft: &FamilyDraft) -> Result<(), Error> {
        self.validate_family(draft, Some(id))?;
        self.remote.update::<Family>(id, draft).await?;
        self.resynchronize().await
    }

    pub async fn delete_family(&mut self, id: RecordId) -> Result<(), Error> {
        self.remote.delete::<Family>(id).await?;
        self.resynchronize().await
    }

    // Neighborhoods

    pub async fn create_neighborhood(
        &mut self,
        draft: &NeighborhoodDraft,
    ) -> Result<Neighborhood, Error> {
        let created = self.remote.create::<Neighborhood>(draft).await?;
        self.resynchronize().await?;
        Ok(created)
    }

    pub async fn update_neighborhood(
        &mut self,
        id: RecordId,
        draft: &NeighborhoodDraft,
    ) -> Result<(), Error> {
        self.remote.update::<Neighborhood>(id, draft).await?;
        self.resynchronize().await
    }

    pub async fn delete_neighborhood(&mut self, id: RecordId) -> Result<(), Error> {
        self.remote.delete::<Neighborhood>(id).await?;
        self.resynchronize().await
    }

    // Needs

    /// Create a need. Beneficiary exclusivity is already guaranteed by the
    /// draft's [`Beneficiary`] type; only the referenced id is checked here.
    pub async fn create_need(&mut self, draft: &NeedDraft) -> Result<Need, Error> {
        self.validate_need(draft)?;
        let created = self.remote.create::<Need>(draft).await?;
        self.resynchronize().await?;
        Ok(created)
    }

    pub async fn update_need(&mut self, id: RecordId, draft: &NeedDraft) -> Result<(), Error> {
        self.validate_need(draft)?;
        self.remote.update::<Need>(id, draft).await?;
        self.resynchronize().await
    }

    pub async fn delete_need(&mut self, id: RecordId) -> Result<(), Error> {
        self.remote.delete::<Need>(id).await?;
        self.resynchronize().await
    }

    // Validation against the current store snapshot. Local failures are
    // returned before any remote call is issued.

    fn validate_person(&self, draft: &PersonDraft) -> Result<(), Error> {
        if let Some(family_id) = draft.family_id {
            if self.store.family(family_id).is_none() {
                return Err(Error::invalid_reference(format!(
                    "person references missing family {}",
                    family_id
                )));
            }
        }
        if let Some(house_id) = draft.house_id {
            if self.store.house(house_id).is_none() {
                return Err(Error::invalid_reference(format!(
                    "person references missing house {}",
                    house_id
                )));
            }
        }
        Ok(())
    }

    fn validate_house(&self, draft: &HouseDraft) -> Result<(), Error> {
        if let Some(neighborhood_id) = draft.neighborhood_id {
            if self.store.neighborhood(neighborhood_id).is_none() {
                return Err(Error::invalid_reference(format!(
                    "house references missing neighborhood {}",
                    neighborhood_id
                )));
            }
        }
        Ok(())
    }

    fn validate_family(&self, draft: &FamilyDraft, editing: Option<RecordId>) -> Result<(), Error> {
        if let Some(house_id) = draft.house_id {
            if self.store.house(house_id).is_none() {
                return Err(Error::invalid_reference(format!(
                    "family references missing house {}",
                    house_id
                )));
            }
        }
        if let Some(head) = draft.head_of_family {
            if self.store.person(head).is_none() {
                return Err(Error::invalid_reference(format!(
                    "family references missing person {} as head",
                    head
                )));
            }
            let already_heads_another = self.store.families().iter().any(|family| {
                family.head_of_family == Some(head) && Some(family.family_id) != editing
            });
            if already_heads_another {
                return Err(Error::constraint(format!(
                    "person {} already heads another family",
                    head
                )));
            }
        }
        Ok(())
    }

    fn validate_need(&self, draft: &NeedDraft) -> Result<(), Error> {
        match draft.beneficiary {
            Beneficiary::Person(id) if self.store.person(id).is_none() => Err(
                Error::invalid_reference(format!("need references missing person {}", id)),
            ),
            Beneficiary::Family(id) if self.store.family(id).is_none() => Err(
                Error::invalid_reference(format!("need references missing family {}", id)),
            ),
            Beneficiary::House(id) if self.store.house(id).is_none() => Err(
                Error::invalid_reference(format!("need references missing house {}", id)),
            ),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn coordinator_for(server: &MockServer) -> MutationCoordinator {
        MutationCoordinator::new(RemoteApi::new(&server.uri(), Client::new(), None))
    }

    async fn mount_list(server: &MockServer, collection: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/{}", collection)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    async fn mount_empty_lists(server: &MockServer) {
        for collection in ["persons", "houses", "families", "neighborhoods", "needs"] {
            mount_list(server, collection, json!([])).await;
        }
    }

    fn person_json(id: i64, name: &str, family_id: Value) -> Value {
        json!({
            "PersonId": id,
            "Name": name,
            "AgeCategory": "adult",
            "IsHeadOfFamily": false,
            "FamilyId": family_id,
            "HouseId": null,
            "Notes": ""
        })
    }

    fn family_json(id: i64, head: Value, house_id: Value) -> Value {
        json!({
            "FamilyId": id,
            "HeadOfFamily": head,
            "FamilySize": 2,
            "PhoneNumber": "0590-1",
            "Notes": "",
            "HouseId": house_id
        })
    }

    #[tokio::test]
    async fn unresolved_reference_fails_before_any_remote_call() {
        let server = MockServer::start().await;
        mount_empty_lists(&server).await;

        let mut coordinator = coordinator_for(&server);
        coordinator.refresh().await.unwrap();

        let draft = PersonDraft {
            name: "Amal".to_string(),
            family_id: Some(42),
            ..PersonDraft::default()
        };
        let result = coordinator.create_person(&draft).await;

        assert!(matches!(result, Err(Error::InvalidReference(_))));
        assert!(coordinator.store().persons().is_empty());

        // Validation failed locally; the service only ever saw the list calls.
        let requests = server.received_requests().await.unwrap();
        assert!(requests.iter().all(|r| r.method.to_string() == "GET"));
    }

    #[tokio::test]
    async fn duplicate_family_head_is_a_constraint_violation() {
        let server = MockServer::start().await;
        mount_list(
            &server,
            "persons",
            json!([person_json(1, "Amal", Value::Null)]),
        )
        .await;
        mount_list(&server, "families", json!([family_json(1, json!(1), Value::Null)])).await;
        for collection in ["houses", "neighborhoods", "needs"] {
            mount_list(&server, collection, json!([])).await;
        }

        let mut coordinator = coordinator_for(&server);
        coordinator.refresh().await.unwrap();

        let draft = FamilyDraft {
            head_of_family: Some(1),
            ..FamilyDraft::default()
        };
        let result = coordinator.create_family(&draft).await;
        assert!(matches!(result, Err(Error::ConstraintViolation(_))));
        assert_eq!(coordinator.store().families().len(), 1);
    }

    #[tokio::test]
    async fn updating_a_family_keeps_its_own_head_valid() {
        let server = MockServer::start().await;
        mount_list(
            &server,
            "persons",
            json!([person_json(1, "Amal", Value::Null)]),
        )
        .await;
        mount_list(&server, "families", json!([family_json(1, json!(1), Value::Null)])).await;
        for collection in ["houses", "neighborhoods", "needs"] {
            mount_list(&server, collection, json!([])).await;
        }
        Mock::given(method("PUT"))
            .and(path("/families/1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut coordinator = coordinator_for(&server);
        coordinator.refresh().await.unwrap();

        let draft = FamilyDraft {
            head_of_family: Some(1),
            family_size: 4,
            ..FamilyDraft::default()
        };
        coordinator.update_family(1, &draft).await.unwrap();
    }

    #[tokio::test]
    async fn successful_create_resynchronizes_every_collection() {
        let server = MockServer::start().await;

        // First load: nothing anywhere.
        Mock::given(method("GET"))
            .and(path("/persons"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/neighborhoods"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        for collection in ["houses", "families", "needs"] {
            mount_list(&server, collection, json!([])).await;
        }

        let mut coordinator = coordinator_for(&server);
        coordinator.refresh().await.unwrap();
        assert!(coordinator.store().is_loaded());

        // The write lands, and the follow-up lists see the new state: the
        // created person plus a neighborhood another client added meanwhile.
        Mock::given(method("POST"))
            .and(path("/persons"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(person_json(10, "Amal", Value::Null)),
            )
            .mount(&server)
            .await;
        mount_list(&server, "persons", json!([person_json(10, "Amal", Value::Null)])).await;
        mount_list(
            &server,
            "neighborhoods",
            json!([{ "NeighborhoodId": 3, "Name": "north" }]),
        )
        .await;

        let draft = PersonDraft {
            name: "Amal".to_string(),
            age_category: "adult".to_string(),
            ..PersonDraft::default()
        };
        let created = coordinator.create_person(&draft).await.unwrap();

        assert_eq!(created.person_id, 10);
        assert_eq!(coordinator.store().persons().len(), 1);
        // Resynchronization covers collections the write never touched.
        assert_eq!(coordinator.store().neighborhoods().len(), 1);
    }

    #[tokio::test]
    async fn remote_rejection_leaves_the_store_unchanged() {
        let server = MockServer::start().await;
        mount_empty_lists(&server).await;
        Mock::given(method("POST"))
            .and(path("/neighborhoods"))
            .respond_with(ResponseTemplate::new(500).set_body_string("out of disk"))
            .mount(&server)
            .await;

        let mut coordinator = coordinator_for(&server);
        coordinator.refresh().await.unwrap();

        let draft = NeighborhoodDraft {
            name: "north".to_string(),
        };
        let result = coordinator.create_neighborhood(&draft).await;

        assert!(matches!(result, Err(Error::RemoteRejected { .. })));
        assert!(coordinator.store().neighborhoods().is_empty());
    }

    #[tokio::test]
    async fn deleting_a_referenced_house_leaves_the_family_dangling() {
        let server = MockServer::start().await;
        let house = json!({ "HouseId": 1, "HouseNumber": 5, "Address": "old town", "NeighborhoodId": null });
        let dangling_family = family_json(1, Value::Null, json!(1));

        Mock::given(method("GET"))
            .and(path("/houses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([house])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mount_list(&server, "families", json!([dangling_family])).await;
        for collection in ["persons", "neighborhoods", "needs"] {
            mount_list(&server, collection, json!([])).await;
        }

        let mut coordinator = coordinator_for(&server);
        coordinator.refresh().await.unwrap();
        assert_eq!(coordinator.store().index().families_of(1).len(), 1);

        Mock::given(method("DELETE"))
            .and(path("/houses/1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        mount_list(&server, "houses", json!([])).await;

        coordinator.delete_house(1).await.unwrap();

        // The family record survives, still naming the dead house id, but the
        // join no longer finds it.
        let family = coordinator.store().family(1).unwrap();
        assert_eq!(family.house_id, Some(1));
        assert!(coordinator.store().house(1).is_none());
        assert!(coordinator.store().index().families_of(1).is_empty());
    }
}
