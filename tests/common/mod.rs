//! Common test utilities

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

use adowork::core::{present, FailureHandler, Presentation, WorkItemGateway};
use adowork::models::{PatchDocument, ProjectRef, WorkItemRecord, WorkItemType};
use adowork::{AppError, GatewayError};

type Responder = Box<dyn Fn() -> Result<WorkItemRecord, GatewayError> + Send + Sync>;

/// Scripted gateway that records every create call
pub struct FakeGateway {
    project: ProjectRef,
    respond: Responder,
    calls: Mutex<Vec<(WorkItemType, PatchDocument)>>,
}

impl FakeGateway {
    pub fn new(respond: impl Fn() -> Result<WorkItemRecord, GatewayError> + Send + Sync + 'static) -> Self {
        Self {
            project: test_project(),
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Gateway whose create call succeeds with the given id
    pub fn returning_id(id: u64) -> Self {
        Self::new(move || {
            Ok(WorkItemRecord {
                id: Some(id),
                url: Some(format!(
                    "https://dev.azure.com/contoso/web/_apis/wit/workItems/{}",
                    id
                )),
            })
        })
    }

    /// Gateway whose create call fails with an API status
    pub fn failing_with_status(status: u16) -> Self {
        Self::new(move || {
            Err(GatewayError::Api {
                status,
                message: "scripted failure".to_string(),
                type_key: None,
            })
        })
    }

    pub fn calls(&self) -> Vec<(WorkItemType, PatchDocument)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkItemGateway for FakeGateway {
    fn project(&self) -> &ProjectRef {
        &self.project
    }

    async fn create(
        &self,
        work_item_type: WorkItemType,
        document: PatchDocument,
        cancel: &CancellationToken,
    ) -> Result<WorkItemRecord, GatewayError> {
        self.calls.lock().unwrap().push((work_item_type, document));
        if cancel.is_cancelled() {
            return Err(GatewayError::Cancelled);
        }
        (self.respond)()
    }
}

/// Failure handler that records presentations instead of printing
#[derive(Default)]
pub struct RecordingHandler {
    presentations: Mutex<Vec<Presentation>>,
}

impl RecordingHandler {
    pub fn presentations(&self) -> Vec<Presentation> {
        self.presentations.lock().unwrap().clone()
    }
}

impl FailureHandler for RecordingHandler {
    fn handle(&self, error: &AppError) -> i32 {
        let presentation = present(error, false);
        let code = presentation.exit_code;
        self.presentations.lock().unwrap().push(presentation);
        code
    }
}

pub fn test_project() -> ProjectRef {
    ProjectRef::new("https://dev.azure.com", "contoso", "web")
}
