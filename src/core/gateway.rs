use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::patch::build_patch_document;
use crate::error::GatewayError;
use crate::models::{Config, PatchDocument, ProjectRef, WorkItemDraft, WorkItemRecord, WorkItemType};

const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

/// Oldest API version whose work item endpoints we target
const MIN_API_MAJOR: u32 = 5;

/// Capability the create command runs against.
///
/// Implemented by [`AzureDevOpsClient`] for real requests and by scripted
/// fakes in tests.
#[async_trait]
pub trait WorkItemGateway: Send + Sync {
    /// Project every derived URL belongs to
    fn project(&self) -> &ProjectRef;

    /// Build the patch document for a draft
    fn build_document(&self, draft: &WorkItemDraft) -> PatchDocument {
        build_patch_document(self.project(), draft)
    }

    /// Create a work item. One network round trip, no retries.
    ///
    /// Failures are returned raw; callers classify them.
    async fn create(
        &self,
        work_item_type: WorkItemType,
        document: PatchDocument,
        cancel: &CancellationToken,
    ) -> Result<WorkItemRecord, GatewayError>;

    /// Web URL for a created work item
    fn work_item_url(&self, id: u64) -> String {
        self.project().edit_url(id)
    }
}

/// Azure DevOps REST client for work item creation
pub struct AzureDevOpsClient {
    client: Client,
    project: ProjectRef,
    pat: String,
    api_version: String,
    timeout_seconds: u64,
}

/// Error envelope returned by the service on failure
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    type_key: Option<String>,
}

impl AzureDevOpsClient {
    /// Create a new client with the given configuration
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            project: config.project_ref(),
            pat: config.pat.clone(),
            api_version: config.api_version.clone(),
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Create endpoint for a work item type:
    /// `{base}/{org}/{project}/_apis/wit/workitems/${type}?api-version={version}`
    pub fn create_endpoint(&self, work_item_type: WorkItemType) -> Result<Url, GatewayError> {
        let location = &self.project.base_url;
        let service_location = |reason: String| GatewayError::ServiceLocation {
            location: location.clone(),
            reason,
        };

        let mut url = Url::parse(location).map_err(|e| service_location(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| service_location("URL cannot be used as a base".to_string()))?
            .pop_if_empty()
            .push(&self.project.organization)
            .push(&self.project.project)
            .extend(["_apis", "wit", "workitems"])
            .push(&format!("${}", work_item_type.name()));
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);

        Ok(url)
    }

    fn check_arguments(&self, document: &PatchDocument) -> Result<(), GatewayError> {
        if self.project.organization.is_empty() {
            return Err(GatewayError::MissingArgument { name: "organization" });
        }
        if self.project.project.is_empty() {
            return Err(GatewayError::MissingArgument { name: "project" });
        }
        if document.is_empty() {
            return Err(GatewayError::MissingArgument { name: "document" });
        }
        validate_api_version(&self.api_version)
    }

    fn transport_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::TimedOut(self.timeout_seconds)
        } else {
            GatewayError::Transport(err)
        }
    }
}

#[async_trait]
impl WorkItemGateway for AzureDevOpsClient {
    fn project(&self) -> &ProjectRef {
        &self.project
    }

    async fn create(
        &self,
        work_item_type: WorkItemType,
        document: PatchDocument,
        cancel: &CancellationToken,
    ) -> Result<WorkItemRecord, GatewayError> {
        self.check_arguments(&document)?;
        let url = self.create_endpoint(work_item_type)?;

        debug!("Sending create request: {}", url);
        debug!(
            "Work item type: {}, operations: {}",
            work_item_type,
            document.len()
        );

        let request = self
            .client
            .post(url)
            .basic_auth("", Some(&self.pat))
            .header(CONTENT_TYPE, JSON_PATCH_CONTENT_TYPE)
            .json(&document);

        let round_trip = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<(StatusCode, String), reqwest::Error>((status, body))
        };

        let (status, body) = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Create request cancelled");
                return Err(GatewayError::Cancelled);
            }
            result = round_trip => result.map_err(|e| self.transport_error(e))?,
        };

        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        let record: WorkItemRecord = serde_json::from_str(&body)?;
        info!("Created work item {:?}", record.id);
        Ok(record)
    }
}

fn api_error(status: StatusCode, body: &str) -> GatewayError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
    let type_key = parsed.as_ref().and_then(|b| b.type_key.clone());
    let message = parsed
        .and_then(|b| b.message)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "no error message returned".to_string());

    GatewayError::Api {
        status: status.as_u16(),
        message,
        type_key,
    }
}

/// Accepts `MAJOR.MINOR` with an optional `-preview` or `-preview.N` suffix
pub fn validate_api_version(version: &str) -> Result<(), GatewayError> {
    let invalid = || GatewayError::InvalidVersionString(version.to_string());

    let (number, suffix) = match version.split_once('-') {
        Some((number, suffix)) => (number, Some(suffix)),
        None => (version, None),
    };

    if let Some(suffix) = suffix {
        let valid_suffix = match suffix.strip_prefix("preview") {
            Some("") => true,
            Some(rest) => rest
                .strip_prefix('.')
                .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit())),
            None => false,
        };
        if !valid_suffix {
            return Err(invalid());
        }
    }

    let (major, minor) = number.split_once('.').ok_or_else(invalid)?;
    let is_number = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !is_number(major) || !is_number(minor) {
        return Err(invalid());
    }

    let major: u32 = major.parse().map_err(|_| invalid())?;
    if major < MIN_API_MAJOR {
        return Err(GatewayError::UnsupportedApiVersion(version.to_string()));
    }

    Ok(())
}
