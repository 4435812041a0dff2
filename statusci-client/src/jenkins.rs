//! Jenkins API endpoints

use reqwest::Url;
use statusci_core::domain::job::BuildRef;
use statusci_core::dto::jenkins::{BuildResponse, JobResponse};

use crate::ProviderClient;
use crate::error::{ClientError, Result};

impl ProviderClient {
    // =============================================================================
    // Jenkins Jobs
    // =============================================================================

    /// URL of a job resource
    ///
    /// Folder paths are written as `/`-separated ids: `team/core` resolves to
    /// `<base>/job/team/job/core`.
    pub fn job_url(&self, job_id: &str) -> Result<Url> {
        let segments = job_id
            .split('/')
            .filter(|segment| !segment.is_empty())
            .flat_map(|segment| ["job", segment]);
        self.url_with_segments(segments)
    }

    /// Read a job
    ///
    /// # Arguments
    /// * `job_id` - The job id, folders separated by `/`
    ///
    /// # Returns
    /// The raw job response; classify it to tell jobs and folders apart
    pub async fn read_job(&self, job_id: &str) -> Result<JobResponse> {
        let mut url = self.job_url(job_id)?;
        append_api_json(&mut url, &self.base_url)?;

        self.get_json(url).await
    }

    /// Read a build referenced by a job
    ///
    /// # Arguments
    /// * `build_ref` - Build reference as returned in `lastBuild`
    pub async fn read_build(&self, build_ref: &BuildRef) -> Result<BuildResponse> {
        let mut url = Url::parse(&build_ref.url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", build_ref.url, e)))?;
        append_api_json(&mut url, &build_ref.url)?;

        self.get_json(url).await
    }
}

fn append_api_json(url: &mut Url, original: &str) -> Result<()> {
    let mut path = url
        .path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl(original.to_string()))?;
    path.pop_if_empty().push("api").push("json");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use statusci_core::config::Credentials;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_job_url_for_folders() {
        let client = ProviderClient::new("https://ci.example.com/jenkins/");
        let url = client.job_url("team/core").unwrap();
        assert_eq!(url.as_str(), "https://ci.example.com/jenkins/job/team/job/core");
    }

    #[test]
    fn test_job_url_encodes_segments() {
        let client = ProviderClient::new("https://ci.example.com");
        let url = client.job_url("my job").unwrap();
        assert_eq!(url.as_str(), "https://ci.example.com/job/my%20job");
    }

    #[tokio::test]
    async fn test_read_job_with_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/job/core/api/json"))
            .and(header("authorization", "Basic Ym90OnNlY3JldA=="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "core",
                "color": "blue",
                "builds": [{"number": 1, "url": format!("{}/job/core/1/", server.uri())}],
                "lastBuild": {"number": 1, "url": format!("{}/job/core/1/", server.uri())}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ProviderClient::new(server.uri())
            .with_credentials(Credentials::from_parts(Some("bot"), Some("secret")));
        let job = client.read_job("core").await.unwrap();

        assert_eq!(job.color.as_deref(), Some("blue"));
        assert_eq!(job.builds.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_read_build() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/job/core/7/api/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "number": 7,
                "building": true,
                "timestamp": 1000,
                "estimatedDuration": 5000
            })))
            .mount(&server)
            .await;

        let client = ProviderClient::new(server.uri());
        let build = client
            .read_build(&BuildRef {
                number: Some(7),
                url: format!("{}/job/core/7/", server.uri()),
            })
            .await
            .unwrap();

        assert!(build.building);
        assert_eq!(build.estimated_duration, Some(5000));
    }

    #[tokio::test]
    async fn test_not_found_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = ProviderClient::new(server.uri());
        let err = client.read_job("missing").await.unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("/job/missing/api/json"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let client = ProviderClient::new(server.uri());
        let err = client.read_job("core").await.unwrap_err();

        assert!(err.is_parse_error());
    }
}
