use crate::analysis::{PlanAnalysis, PlanAnalyzer};
use crate::config::ReportConfig;
use crate::context::Context as AppContext;
use crate::plan::{PlanParser, TerraformPlan};
use crate::publish::{GitHubPagesUploader, ReportArtifact, Uploader};
use crate::render::{HtmlRenderer, ReportOptions};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Where and how to publish a rendered report
#[derive(Debug, Clone)]
pub struct PublishTarget {
    /// GitHub repository in `owner/repo` form
    pub repository: String,
    pub token: Option<String>,
    pub branch: String,
    pub folder: Option<String>,
    /// Defaults to the report name
    pub build_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub plan_path: String,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub config_path: Option<String>,
    /// `--build-url`
    pub build_url: Option<String>,
    /// Value of the `BUILD_URL` environment variable
    pub env_build_url: Option<String>,
    pub output_dir: String,
    pub publish: Option<PublishTarget>,
}

impl ReportRequest {
    pub fn new(plan_path: &str) -> Self {
        Self {
            plan_path: plan_path.to_string(),
            name: None,
            display_name: None,
            config_path: None,
            build_url: None,
            env_build_url: None,
            output_dir: ".".to_string(),
            publish: None,
        }
    }

    /// Report name: `--name`, else the plan file stem
    fn report_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            Path::new(&self.plan_path)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("plan")
                .to_string()
        })
    }

    fn output_path(&self) -> PathBuf {
        Path::new(&self.output_dir).join(format!("{}.html", self.report_name()))
    }
}

/// Handles the 'report' command - renders the HTML plan report
pub struct ReportCommand;

impl ReportCommand {
    /// Execute the report command
    pub fn execute(ctx: &AppContext, request: &ReportRequest) -> Result<()> {
        let content = ctx
            .fs
            .read_to_string(Path::new(&request.plan_path))
            .with_context(|| format!("Failed to read plan file {}", request.plan_path))?;

        let plan = load_plan(ctx, &request.plan_path, &content)?;

        let config = match &request.config_path {
            Some(path) => ReportConfig::load(&*ctx.fs, Path::new(path))
                .with_context(|| format!("Failed to load report config {}", path))?,
            None => ReportConfig::default(),
        }
        .with_build_url_overrides(request.env_build_url.clone(), request.build_url.clone());

        let name = request.report_name();
        let options = ReportOptions::new(&name)
            .with_display_name(request.display_name.clone())
            .with_config(config);

        let analysis = PlanAnalyzer::new().analyze(plan);
        let html = HtmlRenderer::new()?.render_plan(&analysis, &options)?;

        let output_path = request.output_path();
        ctx.fs.write(&output_path, &html)?;

        print_summary(ctx, &analysis);
        ctx.output
            .success(&format!("Report written to {}", output_path.display()));

        if let Some(target) = &request.publish {
            let uploader = GitHubPagesUploader::new(
                &target.repository,
                target.token.as_deref(),
                &target.branch,
            )
            .context("Failed to configure GitHub Pages upload")?;

            let build_name = target.build_name.clone().unwrap_or_else(|| name.clone());
            let artifact = ReportArtifact::new(&build_name, html, content.into_bytes())
                .with_folder(target.folder.clone());

            Self::publish(ctx, &uploader, &artifact)?;
        }

        Ok(())
    }

    /// Publish the artifact and report where it landed
    pub fn publish(ctx: &AppContext, uploader: &dyn Uploader, artifact: &ReportArtifact) -> Result<()> {
        ctx.output.dimmed("Publishing report...");

        let published = uploader
            .publish(artifact)
            .context("Failed to publish report")?;

        ctx.output.success("Report published");
        ctx.output.key_value("URL", &published.url);
        Ok(())
    }
}

/// Parse a plan document, surfacing skipped records as warnings
pub(crate) fn load_plan(ctx: &AppContext, path: &str, content: &str) -> Result<TerraformPlan> {
    let plan = PlanParser::new()
        .parse_str(content)
        .with_context(|| format!("Failed to parse plan {}", path))?;

    for warning in &plan.warnings {
        let address = warning.address.as_deref().unwrap_or("<no address>");
        ctx.output.warning(&format!(
            "Skipped resource change #{} ({}): {}",
            warning.index, address, warning.reason
        ));
    }

    Ok(plan)
}

fn print_summary(ctx: &AppContext, analysis: &PlanAnalysis) {
    let summary = &analysis.plan.summary;

    ctx.output.section("Plan Summary");
    ctx.output
        .key_value("Terraform version", &analysis.plan.terraform_version);
    ctx.output.key_value("To create", &summary.create.to_string());
    ctx.output.key_value("To update", &summary.update.to_string());
    ctx.output.key_value("To delete", &summary.delete.to_string());
    ctx.output
        .key_value("Unchanged", &summary.unchanged.to_string());

    if !analysis.has_changes() {
        ctx.output.info("No changes. Infrastructure matches the configuration.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::{PublishedReport, UploadError};
    use crate::traits::{FileSystem, MockFileSystem, MockOutput, OutputMessage};
    use serde_json::json;
    use std::cell::RefCell;
    use std::sync::Arc;

    fn plan_json() -> String {
        json!({
            "format_version": "1.2",
            "terraform_version": "1.7.5",
            "resource_changes": [
                {
                    "address": "aws_instance.web",
                    "change": {
                        "actions": ["update"],
                        "before": {"instance_type": "t2.micro"},
                        "after": {"instance_type": "t3.micro"}
                    }
                },
                {"address": "aws_s3_bucket.logs", "change": "broken"}
            ]
        })
        .to_string()
    }

    fn setup() -> (AppContext, Arc<MockFileSystem>, Arc<MockOutput>) {
        let fs = Arc::new(MockFileSystem::new());
        let output = Arc::new(MockOutput::new());
        let ctx = AppContext::test_with(fs.clone(), output.clone());
        (ctx, fs, output)
    }

    #[test]
    fn test_report_written_to_output_dir() {
        let (ctx, fs, output) = setup();
        fs.write(Path::new("/work/prod.json"), &plan_json()).unwrap();

        let mut request = ReportRequest::new("/work/prod.json");
        request.output_dir = "/out".to_string();

        ReportCommand::execute(&ctx, &request).unwrap();

        let html = fs.get_file_contents(Path::new("/out/prod.html")).unwrap();
        assert!(html.contains("aws_instance.web"));
        assert!(output.contains_message(&OutputMessage::KeyValue(
            "To update".to_string(),
            "1".to_string()
        )));
        assert!(output.contains_message(&OutputMessage::Success(
            "Report written to /out/prod.html".to_string()
        )));
    }

    #[test]
    fn test_skipped_resources_are_warned() {
        let (ctx, fs, output) = setup();
        fs.write(Path::new("/work/prod.json"), &plan_json()).unwrap();

        ReportCommand::execute(&ctx, &ReportRequest::new("/work/prod.json")).unwrap();

        let warnings = output.get_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("aws_s3_bucket.logs"));
    }

    #[test]
    fn test_named_report_uses_build_url_and_config() {
        let (ctx, fs, _) = setup();
        fs.write(Path::new("/work/plan.json"), &plan_json()).unwrap();
        fs.write(
            Path::new("/work/report.yaml"),
            "build_url: https://ci.example.com/file\ndisplay:\n  expand_all: true\n",
        )
        .unwrap();

        let mut request = ReportRequest::new("/work/plan.json");
        request.name = Some("staging".to_string());
        request.display_name = Some("Staging Network".to_string());
        request.config_path = Some("/work/report.yaml".to_string());
        request.env_build_url = Some("https://ci.example.com/env".to_string());
        request.output_dir = "/out".to_string();

        ReportCommand::execute(&ctx, &request).unwrap();

        let html = fs.get_file_contents(Path::new("/out/staging.html")).unwrap();
        assert!(html.contains("Staging Network"));
        assert!(html.contains("https://ci.example.com/env"));
        assert!(!html.contains("https://ci.example.com/file"));
    }

    #[test]
    fn test_missing_plan_file() {
        let (ctx, _, _) = setup();
        let err = ReportCommand::execute(&ctx, &ReportRequest::new("/nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read plan file /nope.json"));
    }

    #[test]
    fn test_unsupported_plan_format() {
        let (ctx, fs, _) = setup();
        fs.write(Path::new("/work/plan.json"), r#"{"format_version": "0.1"}"#)
            .unwrap();

        let err = ReportCommand::execute(&ctx, &ReportRequest::new("/work/plan.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to parse plan"));
    }

    struct RecordingUploader {
        published: RefCell<Vec<String>>,
        fail: bool,
    }

    impl Uploader for RecordingUploader {
        fn publish(&self, artifact: &ReportArtifact) -> std::result::Result<PublishedReport, UploadError> {
            if self.fail {
                return Err(UploadError::RetriesExhausted { attempts: 5 });
            }
            self.published.borrow_mut().push(artifact.directory());
            Ok(PublishedReport {
                url: format!("https://acme.github.io/infra/{}/report.html", artifact.directory()),
            })
        }
    }

    #[test]
    fn test_publish_reports_url() {
        let (ctx, _, output) = setup();
        let uploader = RecordingUploader {
            published: RefCell::new(Vec::new()),
            fail: false,
        };
        let artifact = ReportArtifact::new("Build 7", "<html>".to_string(), Vec::new());

        ReportCommand::publish(&ctx, &uploader, &artifact).unwrap();

        assert_eq!(*uploader.published.borrow(), vec!["build-7".to_string()]);
        assert!(output.contains_message(&OutputMessage::KeyValue(
            "URL".to_string(),
            "https://acme.github.io/infra/build-7/report.html".to_string()
        )));
    }

    #[test]
    fn test_publish_failure_is_an_error() {
        let (ctx, _, _) = setup();
        let uploader = RecordingUploader {
            published: RefCell::new(Vec::new()),
            fail: true,
        };
        let artifact = ReportArtifact::new("b", String::new(), Vec::new());

        let err = ReportCommand::publish(&ctx, &uploader, &artifact).unwrap_err();
        assert!(format!("{:#}", err).contains("Upload failed after 5 attempts"));
    }
}
