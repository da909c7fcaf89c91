//! Report publishing
//!
//! An `Uploader` takes a rendered report and the raw plan it was built from
//! and makes them available at a public URL.

mod github;

use std::fmt;

pub use github::{GitHubPagesUploader, HttpClient, HttpResponse, ReqwestClient};

/// Errors raised while publishing a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// No access token was supplied
    MissingToken,
    /// Repository is not in `owner/repo` form
    InvalidRepository(String),
    /// The API answered with a status that is not retried
    Http { status: u16, body: String },
    /// The request never got an answer
    Transport(String),
    /// Every attempt hit a retryable failure
    RetriesExhausted { attempts: u32 },
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::MissingToken => write!(f, "No GitHub token provided"),
            UploadError::InvalidRepository(repo) => {
                write!(f, "Invalid repository '{}', expected owner/repo", repo)
            }
            UploadError::Http { status, body } => {
                write!(f, "GitHub API request failed with status {}: {}", status, body)
            }
            UploadError::Transport(msg) => write!(f, "Request failed: {}", msg),
            UploadError::RetriesExhausted { attempts } => {
                write!(f, "Upload failed after {} attempts", attempts)
            }
        }
    }
}

impl std::error::Error for UploadError {}

/// The payloads of one published build
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    pub build_name: String,
    pub folder: Option<String>,
    pub html: String,
    pub raw_plan: Vec<u8>,
}

impl ReportArtifact {
    pub fn new(build_name: &str, html: String, raw_plan: Vec<u8>) -> Self {
        Self {
            build_name: build_name.to_string(),
            folder: None,
            html,
            raw_plan,
        }
    }

    pub fn with_folder(mut self, folder: Option<String>) -> Self {
        self.folder = folder.filter(|f| !f.trim_matches('/').is_empty());
        self
    }

    /// Directory holding the build, e.g. "reports/build-42"
    pub fn directory(&self) -> String {
        let build = sanitize_build_name(&self.build_name);
        match &self.folder {
            Some(folder) => format!("{}/{}", folder.trim_matches('/'), build),
            None => build,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedReport {
    pub url: String,
}

pub trait Uploader {
    fn publish(&self, artifact: &ReportArtifact) -> Result<PublishedReport, UploadError>;
}

/// Turn a free-form build name into a URL path segment
pub fn sanitize_build_name(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());

    for c in name.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
            c.to_ascii_lowercase()
        } else {
            '-'
        };
        if c == '-' && sanitized.ends_with('-') {
            continue;
        }
        sanitized.push(c);
    }

    let trimmed = sanitized.trim_matches('-');
    if trimmed.is_empty() {
        "build".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_build_name() {
        assert_eq!(sanitize_build_name("Build #42"), "build-42");
        assert_eq!(sanitize_build_name("feature/new_thing"), "feature-new-thing");
        assert_eq!(sanitize_build_name("--v1.2.3--"), "v1.2.3");
        assert_eq!(sanitize_build_name("a   b"), "a-b");
        assert_eq!(sanitize_build_name("///"), "build");
    }

    #[test]
    fn test_artifact_directory() {
        let artifact = ReportArtifact::new("PR 7", String::new(), Vec::new());
        assert_eq!(artifact.directory(), "pr-7");

        let artifact = artifact.with_folder(Some("/reports/".to_string()));
        assert_eq!(artifact.directory(), "reports/pr-7");

        let artifact = ReportArtifact::new("x", String::new(), Vec::new())
            .with_folder(Some(String::new()));
        assert!(artifact.folder.is_none());
    }

    #[test]
    fn test_upload_error_display() {
        assert_eq!(
            UploadError::Http {
                status: 422,
                body: "bad".to_string()
            }
            .to_string(),
            "GitHub API request failed with status 422: bad"
        );
        assert_eq!(
            UploadError::RetriesExhausted { attempts: 5 }.to_string(),
            "Upload failed after 5 attempts"
        );
    }
}
