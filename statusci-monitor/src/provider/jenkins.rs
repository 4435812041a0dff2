//! Jenkins adapter
//!
//! Two round-trips: the job first, then its last build. A folder or
//! multi-branch project stops after the first call.

use async_trait::async_trait;
use statusci_core::domain::job::Classified;
use tracing::debug;

use super::{FetchRequest, HttpClients, ProviderAdapter};
use crate::error::ResolveError;

pub struct JenkinsAdapter {
    clients: HttpClients,
}

impl JenkinsAdapter {
    pub fn new(clients: HttpClients) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl ProviderAdapter for JenkinsAdapter {
    fn target_url(&self, base_url: &str, id: &str) -> String {
        self.clients
            .for_base_url(base_url)
            .job_url(id)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| base_url.to_string())
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<Classified, ResolveError> {
        let client = self.clients.for_request(request);
        let job = client.read_job(&request.id).await?;

        match job.classify() {
            Classified::Single(single) => {
                let Some(build_ref) = single.last_build_ref.clone() else {
                    debug!("Job '{}' has no builds yet", request.id);
                    return Ok(Classified::Single(single));
                };

                let build = client.read_build(&build_ref).await.map_err(|e| {
                    ResolveError::from(e).with_origin(single.display_name.clone(), single.url.clone())
                })?;

                Ok(Classified::Single(single.with_last_build(build.into())))
            }
            other => Ok(other),
        }
    }
}
