//! Travis CI API endpoints

use reqwest::Url;
use statusci_core::dto::travis::RepositoryResponse;

use crate::ProviderClient;
use crate::error::{ClientError, Result};

impl ProviderClient {
    // =============================================================================
    // Travis Repositories
    // =============================================================================

    /// URL of a repository resource (`<base>/<owner>/<repo>.json`)
    pub fn repository_url(&self, slug: &str) -> Result<Url> {
        let mut segments: Vec<&str> = slug.split('/').filter(|s| !s.is_empty()).collect();
        let Some(last) = segments.pop() else {
            return Err(ClientError::InvalidUrl(format!("empty repository slug for {}", self.base_url)));
        };
        let file = format!("{}.json", last);
        segments.push(&file);

        self.url_with_segments(segments)
    }

    /// Read a repository with its last build summary
    ///
    /// # Arguments
    /// * `slug` - Repository slug, e.g. `owner/repo`
    pub async fn read_repository(&self, slug: &str) -> Result<RepositoryResponse> {
        let url = self.repository_url(slug)?;
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_repository_url() {
        let client = ProviderClient::new("https://api.travis-ci.org/repos");
        let url = client.repository_url("acme/widgets").unwrap();
        assert_eq!(url.as_str(), "https://api.travis-ci.org/repos/acme/widgets.json");
    }

    #[test]
    fn test_empty_slug() {
        let client = ProviderClient::new("https://api.travis-ci.org/repos");
        assert!(matches!(client.repository_url("/"), Err(ClientError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_read_repository() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/acme/widgets.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "slug": "acme/widgets",
                "last_build_result": 0
            })))
            .mount(&server)
            .await;

        let client = ProviderClient::new(server.uri());
        let repo = client.read_repository("acme/widgets").await.unwrap();
        assert_eq!(repo.slug.as_deref(), Some("acme/widgets"));
        assert_eq!(repo.last_build_result, Some(0));
    }
}
