use reqwest::Url;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Work item types accepted by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkItemType {
    Task,
    Bug,
    UserStory,
    Feature,
    Epic,
    Issue,
}

impl WorkItemType {
    pub const ALL: [WorkItemType; 6] = [
        WorkItemType::Task,
        WorkItemType::Bug,
        WorkItemType::UserStory,
        WorkItemType::Feature,
        WorkItemType::Epic,
        WorkItemType::Issue,
    ];

    /// Name of the type as the service knows it
    pub fn name(&self) -> &'static str {
        match self {
            WorkItemType::Task => "Task",
            WorkItemType::Bug => "Bug",
            WorkItemType::UserStory => "User Story",
            WorkItemType::Feature => "Feature",
            WorkItemType::Epic => "Epic",
            WorkItemType::Issue => "Issue",
        }
    }

    pub fn lowercase_name(&self) -> &'static str {
        match self {
            WorkItemType::Task => "task",
            WorkItemType::Bug => "bug",
            WorkItemType::UserStory => "user story",
            WorkItemType::Feature => "feature",
            WorkItemType::Epic => "epic",
            WorkItemType::Issue => "issue",
        }
    }
}

impl FromStr for WorkItemType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.lowercase_name() == normalized)
            .ok_or_else(|| AppError::InvalidWorkItemType(s.to_string()))
    }
}

impl fmt::Display for WorkItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// User input describing the work item to create
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkItemDraft {
    pub title: String,
    pub description: String,
    pub assigned_to: String,
    /// Existing work item to link as parent
    pub parent_id: Option<u64>,
}

/// Organization/project coordinates every derived URL is computed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub base_url: String,
    pub organization: String,
    pub project: String,
}

impl ProjectRef {
    pub fn new(
        base_url: impl Into<String>,
        organization: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            organization: organization.into(),
            project: project.into(),
        }
    }

    /// REST resource URL of a work item, used for relation links
    pub fn work_item_api_url(&self, id: u64) -> String {
        self.project_url(&["_apis", "wit", "workItems", &id.to_string()])
    }

    /// Web UI URL for editing a work item
    pub fn edit_url(&self, id: u64) -> String {
        self.project_url(&["_workitems", "edit", &id.to_string()])
    }

    /// `{base}/{org}/{project}/{tail..}` with every segment percent-encoded.
    /// A base that does not parse is joined verbatim; the create call
    /// reports it as an unresolvable location.
    fn project_url(&self, tail: &[&str]) -> String {
        if let Ok(mut url) = Url::parse(&self.base_url) {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments
                    .pop_if_empty()
                    .push(&self.organization)
                    .push(&self.project)
                    .extend(tail);
            }
            if !url.cannot_be_a_base() {
                return url.into();
            }
        }
        format!(
            "{}/{}/{}/{}",
            self.base_url,
            self.organization,
            self.project,
            tail.join("/")
        )
    }
}

/// Work item as returned by the create endpoint. Only the fields we read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkItemRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A successfully created work item, ready to report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedWorkItem {
    pub id: u64,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_item_type_case_insensitive() {
        assert_eq!("Task".parse::<WorkItemType>().unwrap(), WorkItemType::Task);
        assert_eq!("BUG".parse::<WorkItemType>().unwrap(), WorkItemType::Bug);
        assert_eq!(
            "User Story".parse::<WorkItemType>().unwrap(),
            WorkItemType::UserStory
        );
        assert_eq!("epic".parse::<WorkItemType>().unwrap(), WorkItemType::Epic);
    }

    #[test]
    fn test_work_item_type_rejects_near_misses() {
        for input in ["Tasks", "userstory", "user_story", "", " task", "invalid-type"] {
            match input.parse::<WorkItemType>() {
                Err(AppError::InvalidWorkItemType(s)) => assert_eq!(s, input),
                other => panic!("Expected InvalidWorkItemType for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_invalid_type_message() {
        let err = "Story".parse::<WorkItemType>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid work item type: 'Story'. Please use a common type like 'Task', 'Bug', or 'User Story'."
        );
    }

    #[test]
    fn test_work_item_type_display() {
        assert_eq!(format!("{}", WorkItemType::UserStory), "User Story");
        assert_eq!(format!("{}", WorkItemType::Issue), "Issue");
    }

    #[test]
    fn test_project_urls() {
        let project = ProjectRef::new("https://dev.azure.com", "contoso", "web");
        assert_eq!(
            project.work_item_api_url(42),
            "https://dev.azure.com/contoso/web/_apis/wit/workItems/42"
        );
        assert_eq!(
            project.edit_url(123),
            "https://dev.azure.com/contoso/web/_workitems/edit/123"
        );
    }

    #[test]
    fn test_project_urls_encode_names() {
        let project = ProjectRef::new("https://ado.example.com/tfs", "contoso", "My Project");
        assert_eq!(
            project.work_item_api_url(7),
            "https://ado.example.com/tfs/contoso/My%20Project/_apis/wit/workItems/7"
        );
        assert_eq!(
            project.edit_url(7),
            "https://ado.example.com/tfs/contoso/My%20Project/_workitems/edit/7"
        );
    }

    #[test]
    fn test_record_deserialization_without_id() {
        let record: WorkItemRecord = serde_json::from_str(r#"{"rev":1,"fields":{}}"#).unwrap();
        assert!(record.id.is_none());
        assert!(record.url.is_none());
    }

    #[test]
    fn test_record_deserialization_ignores_unknown_fields() {
        let json = r#"{"id":77,"rev":1,"url":"https://dev.azure.com/o/p/_apis/wit/workItems/77","fields":{"System.Title":"x"}}"#;
        let record: WorkItemRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, Some(77));
        assert_eq!(
            record.url.as_deref(),
            Some("https://dev.azure.com/o/p/_apis/wit/workItems/77")
        );
    }
}
