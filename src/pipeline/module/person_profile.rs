use std::sync::Arc;
use log::error;
use crate::error::errors::Error;
use crate::pipeline::client::face_api_client::{FaceApiClient, PersonProfile};

#[derive(Clone)]
pub struct PersonProfileLookup {
    client: Arc<dyn FaceApiClient>,
    large_person_group_id: String,
}

impl PersonProfileLookup {
    pub fn new(client: Arc<dyn FaceApiClient>, large_person_group_id: &str) -> Self {
        PersonProfileLookup {
            client,
            large_person_group_id: large_person_group_id.to_string(),
        }
    }

    /// A person deleted from the group after identification surfaces as an upstream error.
    pub async fn resolve(&self, person_id: &str) -> Result<PersonProfile, Error> {
        self.client
            .get_person(&self.large_person_group_id, person_id)
            .await
            .map_err(|e| {
                error!("person lookup for {person_id} failed: {e}");
                Error::from(e)
            })
    }
}
