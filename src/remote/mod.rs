//! Operations against the remote registry service
//!
//! The service exposes one resource collection per entity type (`persons`,
//! `houses`, `families`, `neighborhoods`, `needs`) and is the sole source of
//! identifier assignment. The client issues four calls per collection: list,
//! create, update (full-record replace) and delete.

use log::debug;
use reqwest::Client;
use std::time::Duration;

use crate::error::Error;
use crate::fetch::Fetch;
use crate::model::{Record, RecordId};

/// Client for the remote registry service
#[derive(Debug, Clone)]
pub struct RemoteApi {
    /// Base URL of the service
    url: String,

    /// HTTP client
    client: Client,

    /// Per-request timeout
    timeout: Option<Duration>,
}

impl RemoteApi {
    /// Create a new RemoteApi
    pub(crate) fn new(url: &str, client: Client, timeout: Option<Duration>) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            timeout,
        }
    }

    /// URL of a collection
    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.url, collection)
    }

    /// URL of a single record within a collection
    fn record_url(&self, collection: &str, id: RecordId) -> String {
        format!("{}/{}/{}", self.url, collection, id)
    }

    /// Fetch the full ordered contents of a collection
    pub async fn list<T: Record>(&self) -> Result<Vec<T>, Error> {
        debug!("listing {}", T::COLLECTION);
        Fetch::get(&self.client, &self.collection_url(T::COLLECTION))
            .timeout(self.timeout)
            .execute()
            .await
    }

    /// Create a record from a draft; the service assigns the id
    pub async fn create<T: Record>(&self, draft: &T::Draft) -> Result<T, Error> {
        debug!("creating a record in {}", T::COLLECTION);
        Fetch::post(&self.client, &self.collection_url(T::COLLECTION))
            .timeout(self.timeout)
            .json(draft)?
            .execute()
            .await
    }

    /// Replace an existing record with the draft's field values
    pub async fn update<T: Record>(&self, id: RecordId, draft: &T::Draft) -> Result<(), Error> {
        debug!("updating {} record {}", T::COLLECTION, id);
        Fetch::put(&self.client, &self.record_url(T::COLLECTION, id))
            .timeout(self.timeout)
            .json(draft)?
            .execute_ack()
            .await
    }

    /// Delete a record by id
    pub async fn delete<T: Record>(&self, id: RecordId) -> Result<(), Error> {
        debug!("deleting {} record {}", T::COLLECTION, id);
        Fetch::delete(&self.client, &self.record_url(T::COLLECTION, id))
            .timeout(self.timeout)
            .execute_ack()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Neighborhood, NeighborhoodDraft};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn list_parses_the_collection() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/neighborhoods"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "NeighborhoodId": 1, "Name": "north" },
                { "NeighborhoodId": 2, "Name": "south" }
            ])))
            .mount(&mock_server)
            .await;

        let remote = RemoteApi::new(&mock_server.uri(), Client::new(), None);
        let neighborhoods: Vec<Neighborhood> = remote.list().await.unwrap();

        assert_eq!(neighborhoods.len(), 2);
        assert_eq!(neighborhoods[0].name, "north");
    }

    #[tokio::test]
    async fn create_posts_the_draft_and_returns_the_assigned_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/neighborhoods"))
            .and(body_json(json!({ "Name": "east" })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({ "NeighborhoodId": 7, "Name": "east" })),
            )
            .mount(&mock_server)
            .await;

        let remote = RemoteApi::new(&mock_server.uri(), Client::new(), None);
        let draft = NeighborhoodDraft {
            name: "east".to_string(),
        };
        let created: Neighborhood = remote.create(&draft).await.unwrap();

        assert_eq!(created.neighborhood_id, 7);
    }

    #[tokio::test]
    async fn update_puts_the_full_record_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/neighborhoods/7"))
            .and(body_json(json!({ "Name": "east side" })))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let remote = RemoteApi::new(&mock_server.uri(), Client::new(), None);
        let draft = NeighborhoodDraft {
            name: "east side".to_string(),
        };
        remote.update::<Neighborhood>(7, &draft).await.unwrap();
    }

    #[tokio::test]
    async fn error_statuses_surface_as_remote_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/neighborhoods/7"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let remote = RemoteApi::new(&mock_server.uri(), Client::new(), None);
        let result = remote.delete::<Neighborhood>(7).await;

        match result {
            Err(Error::RemoteRejected { status, body }) => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected RemoteRejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_service_surfaces_as_remote_unavailable() {
        // Nothing listens on this port.
        let remote = RemoteApi::new("http://127.0.0.1:9", Client::new(), None);
        let result = remote.list::<Neighborhood>().await;

        assert!(matches!(result, Err(Error::RemoteUnavailable(_))));
    }
}
