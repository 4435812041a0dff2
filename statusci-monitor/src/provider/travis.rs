//! Travis CI adapter

use async_trait::async_trait;
use statusci_core::domain::job::Classified;

use super::{FetchRequest, HttpClients, ProviderAdapter};
use crate::error::ResolveError;

pub struct TravisAdapter {
    clients: HttpClients,
}

impl TravisAdapter {
    pub fn new(clients: HttpClients) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl ProviderAdapter for TravisAdapter {
    fn target_url(&self, base_url: &str, id: &str) -> String {
        self.clients
            .for_base_url(base_url)
            .repository_url(id)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| base_url.to_string())
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<Classified, ResolveError> {
        let client = self.clients.for_request(request);
        let repository = client.read_repository(&request.id).await?;
        Ok(repository.classify())
    }
}
