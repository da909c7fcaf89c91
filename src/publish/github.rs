use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use std::time::Duration;

use super::{PublishedReport, ReportArtifact, UploadError, Uploader};

const API_BASE: &str = "https://api.github.com";
const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const USER_AGENT: &str = concat!("planlens/", env!("CARGO_PKG_VERSION"));

/// Status and body of an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client trait for testing
pub trait HttpClient {
    fn get(&self, url: &str, token: &str) -> Result<HttpResponse, UploadError>;
    fn put(&self, url: &str, token: &str, body: &str) -> Result<HttpResponse, UploadError>;
}

/// Real HTTP client using reqwest
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self, UploadError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| UploadError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder) -> Result<HttpResponse, UploadError> {
        let response = request
            .header("Accept", "application/vnd.github+json")
            .send()
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, token: &str) -> Result<HttpResponse, UploadError> {
        self.send(self.client.get(url).bearer_auth(token))
    }

    fn put(&self, url: &str, token: &str, body: &str) -> Result<HttpResponse, UploadError> {
        self.send(
            self.client
                .put(url)
                .bearer_auth(token)
                .header("Content-Type", "application/json")
                .body(body.to_string()),
        )
    }
}

/// Publishes reports to a GitHub Pages branch through the contents API
pub struct GitHubPagesUploader<H: HttpClient> {
    owner: String,
    repo: String,
    token: String,
    branch: String,
    api_base: String,
    max_attempts: u32,
    http_client: H,
    sleep: Box<dyn Fn(Duration)>,
}

impl GitHubPagesUploader<ReqwestClient> {
    /// Create an uploader with the default HTTP client
    pub fn new(repository: &str, token: Option<&str>, branch: &str) -> Result<Self, UploadError> {
        Self::with_client(repository, token, branch, ReqwestClient::new()?)
    }
}

impl<H: HttpClient> GitHubPagesUploader<H> {
    /// Create an uploader with a custom HTTP client (for testing)
    pub fn with_client(
        repository: &str,
        token: Option<&str>,
        branch: &str,
        client: H,
    ) -> Result<Self, UploadError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(UploadError::MissingToken)?;

        let (owner, repo) = repository
            .split_once('/')
            .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty() && !repo.contains('/'))
            .ok_or_else(|| UploadError::InvalidRepository(repository.to_string()))?;

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: token.to_string(),
            branch: branch.to_string(),
            api_base: API_BASE.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            http_client: client,
            sleep: Box::new(std::thread::sleep),
        })
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Replace the backoff sleep
    pub fn with_sleep(mut self, sleep: impl Fn(Duration) + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// Public Pages URL of a file in the repository
    fn pages_url(&self, path: &str) -> String {
        format!("https://{}.github.io/{}/{}", self.owner, self.repo, path)
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, self.owner, self.repo, path
        )
    }

    /// Upload one file, retrying conflicts, server errors and transport failures
    fn upload_file(&self, path: &str, content: &[u8], message: &str) -> Result<(), UploadError> {
        let mut delay = INITIAL_BACKOFF;

        for attempt in 1..=self.max_attempts {
            match self.try_upload(path, content, message) {
                Ok(()) => {
                    log::debug!("Uploaded {} on attempt {}", path, attempt);
                    return Ok(());
                }
                Err(err) if is_retryable(&err) => {
                    log::warn!(
                        "Upload of {} failed (attempt {}/{}): {}",
                        path,
                        attempt,
                        self.max_attempts,
                        err
                    );
                    if attempt < self.max_attempts {
                        (self.sleep)(delay);
                        delay *= 2;
                    }
                }
                Err(err) => return Err(err),
            }
        }

        Err(UploadError::RetriesExhausted {
            attempts: self.max_attempts,
        })
    }

    fn try_upload(&self, path: &str, content: &[u8], message: &str) -> Result<(), UploadError> {
        let url = self.contents_url(path);
        let sha = self.existing_sha(&url)?;

        let mut body = json!({
            "message": message,
            "content": STANDARD.encode(content),
            "branch": self.branch,
        });
        if let Some(sha) = sha {
            body["sha"] = Value::String(sha);
        }

        let response = self
            .http_client
            .put(&url, &self.token, &body.to_string())?;

        if response.is_success() {
            Ok(())
        } else {
            Err(UploadError::Http {
                status: response.status,
                body: response.body,
            })
        }
    }

    /// Blob sha of the file currently on the branch, if any
    fn existing_sha(&self, url: &str) -> Result<Option<String>, UploadError> {
        let response = self
            .http_client
            .get(&format!("{}?ref={}", url, self.branch), &self.token)?;

        match response.status {
            404 => Ok(None),
            status if (200..300).contains(&status) => Ok(serde_json::from_str::<Value>(&response.body)
                .ok()
                .and_then(|v| v.get("sha").and_then(Value::as_str).map(String::from))),
            status => Err(UploadError::Http {
                status,
                body: response.body,
            }),
        }
    }
}

impl<H: HttpClient> Uploader for GitHubPagesUploader<H> {
    fn publish(&self, artifact: &ReportArtifact) -> Result<PublishedReport, UploadError> {
        let directory = artifact.directory();
        let report_path = format!("{}/report.html", directory);
        let plan_path = format!("{}/plan.json", directory);
        let message = format!("Publish plan report for {}", directory);

        self.upload_file(&report_path, artifact.html.as_bytes(), &message)?;
        self.upload_file(&plan_path, &artifact.raw_plan, &message)?;

        Ok(PublishedReport {
            url: self.pages_url(&report_path),
        })
    }
}

fn is_retryable(err: &UploadError) -> bool {
    match err {
        UploadError::Transport(_) => true,
        UploadError::Http { status, .. } => *status == 409 || (500..600).contains(status),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Request {
        Get(String),
        Put(String, Value),
    }

    /// Answers GETs with 404 and PUTs from a queue (201 when empty)
    #[derive(Default)]
    struct MockHttpClient {
        get_responses: RefCell<VecDeque<Result<HttpResponse, UploadError>>>,
        put_responses: RefCell<VecDeque<Result<HttpResponse, UploadError>>>,
        requests: Rc<RefCell<Vec<Request>>>,
    }

    impl MockHttpClient {
        fn with_get(self, response: Result<HttpResponse, UploadError>) -> Self {
            self.get_responses.borrow_mut().push_back(response);
            self
        }

        fn with_put(self, response: Result<HttpResponse, UploadError>) -> Self {
            self.put_responses.borrow_mut().push_back(response);
            self
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str, token: &str) -> Result<HttpResponse, UploadError> {
            assert_eq!(token, "secret");
            self.requests.borrow_mut().push(Request::Get(url.to_string()));
            self.get_responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(HttpResponse::new(404, "")))
        }

        fn put(&self, url: &str, token: &str, body: &str) -> Result<HttpResponse, UploadError> {
            assert_eq!(token, "secret");
            let body: Value = serde_json::from_str(body).unwrap();
            self.requests.borrow_mut().push(Request::Put(url.to_string(), body));
            self.put_responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(HttpResponse::new(201, "{}")))
        }
    }

    fn artifact() -> ReportArtifact {
        ReportArtifact::new("Build 42", "<html></html>".to_string(), b"{}".to_vec())
            .with_folder(Some("plans".to_string()))
    }

    fn uploader(
        client: MockHttpClient,
    ) -> (GitHubPagesUploader<MockHttpClient>, Rc<RefCell<Vec<Duration>>>) {
        let sleeps = Rc::new(RefCell::new(Vec::new()));
        let recorded = Rc::clone(&sleeps);
        let uploader = GitHubPagesUploader::with_client("acme/infra", Some("secret"), "gh-pages", client)
            .unwrap()
            .with_sleep(move |d| recorded.borrow_mut().push(d));
        (uploader, sleeps)
    }

    #[test]
    fn test_publish_uploads_report_and_plan() {
        let client = MockHttpClient::default();
        let requests = Rc::clone(&client.requests);
        let (uploader, sleeps) = uploader(client);

        let published = uploader.publish(&artifact()).unwrap();

        assert_eq!(
            published.url,
            "https://acme.github.io/infra/plans/build-42/report.html"
        );
        assert!(sleeps.borrow().is_empty());

        let requests = requests.borrow();
        assert_eq!(requests.len(), 4);
        assert_eq!(
            requests[0],
            Request::Get(
                "https://api.github.com/repos/acme/infra/contents/plans/build-42/report.html?ref=gh-pages"
                    .to_string()
            )
        );
        match &requests[1] {
            Request::Put(url, body) => {
                assert!(url.ends_with("/contents/plans/build-42/report.html"));
                assert_eq!(body["branch"], "gh-pages");
                assert_eq!(body["content"], STANDARD.encode("<html></html>"));
                assert!(body.get("sha").is_none());
            }
            other => panic!("unexpected request {:?}", other),
        }
        match &requests[3] {
            Request::Put(url, body) => {
                assert!(url.ends_with("/contents/plans/build-42/plan.json"));
                assert_eq!(body["content"], STANDARD.encode("{}"));
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_existing_file_sha_is_sent() {
        let client = MockHttpClient::default().with_get(Ok(HttpResponse::new(200, r#"{"sha": "abc123"}"#)));
        let requests = Rc::clone(&client.requests);
        let (uploader, _) = uploader(client);

        uploader.publish(&artifact()).unwrap();

        match &requests.borrow()[1] {
            Request::Put(_, body) => assert_eq!(body["sha"], "abc123"),
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_no_folder_publishes_at_root() {
        let (uploader, _) = uploader(MockHttpClient::default());
        let artifact = ReportArtifact::new("main", String::new(), Vec::new());

        let published = uploader.publish(&artifact).unwrap();
        assert_eq!(published.url, "https://acme.github.io/infra/main/report.html");
    }

    #[test]
    fn test_conflict_is_retried_with_backoff() {
        let client = MockHttpClient::default()
            .with_put(Ok(HttpResponse::new(409, "conflict")))
            .with_put(Err(UploadError::Transport("reset".to_string())))
            .with_put(Ok(HttpResponse::new(502, "bad gateway")));
        let (uploader, sleeps) = uploader(client);

        uploader.publish(&artifact()).unwrap();

        assert_eq!(
            *sleeps.borrow(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
    }

    #[test]
    fn test_retries_exhausted() {
        let mut client = MockHttpClient::default();
        for _ in 0..3 {
            client = client.with_put(Ok(HttpResponse::new(503, "unavailable")));
        }
        let (uploader, sleeps) = uploader(client);
        let uploader = uploader.with_max_attempts(3);

        let err = uploader.publish(&artifact()).unwrap_err();

        assert_eq!(err, UploadError::RetriesExhausted { attempts: 3 });
        assert_eq!(sleeps.borrow().len(), 2);
    }

    #[test]
    fn test_client_error_fails_immediately() {
        let client = MockHttpClient::default().with_put(Ok(HttpResponse::new(422, "invalid")));
        let requests = Rc::clone(&client.requests);
        let (uploader, sleeps) = uploader(client);

        let err = uploader.publish(&artifact()).unwrap_err();

        assert_eq!(
            err,
            UploadError::Http {
                status: 422,
                body: "invalid".to_string()
            }
        );
        assert!(sleeps.borrow().is_empty());
        assert_eq!(requests.borrow().len(), 2);
    }

    #[test]
    fn test_lookup_error_is_not_retried() {
        let client = MockHttpClient::default().with_get(Ok(HttpResponse::new(401, "bad credentials")));
        let (uploader, _) = uploader(client);

        let err = uploader.publish(&artifact()).unwrap_err();
        assert!(matches!(err, UploadError::Http { status: 401, .. }));
    }

    #[test]
    fn test_missing_token_and_invalid_repository() {
        let missing = GitHubPagesUploader::with_client("acme/infra", None, "gh-pages", MockHttpClient::default());
        assert!(matches!(missing, Err(UploadError::MissingToken)));

        let blank = GitHubPagesUploader::with_client("acme/infra", Some("  "), "gh-pages", MockHttpClient::default());
        assert!(matches!(blank, Err(UploadError::MissingToken)));

        for repo in ["acme", "/infra", "acme/", "a/b/c"] {
            let result = GitHubPagesUploader::with_client(repo, Some("secret"), "gh-pages", MockHttpClient::default());
            assert!(matches!(result, Err(UploadError::InvalidRepository(_))), "{}", repo);
        }
    }
}
