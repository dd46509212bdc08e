use serde::{Deserialize, Serialize};

/// Link type that makes the referenced work item the parent of the new one
pub const PARENT_LINK_TYPE: &str = "System.LinkTypes.Hierarchy-Reverse";

/// JSON patch operation kind. Work item creation only ever adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
}

/// Target of a patch operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchPath {
    #[serde(rename = "/fields/System.Title")]
    Title,
    #[serde(rename = "/fields/System.Description")]
    Description,
    #[serde(rename = "/fields/System.AssignedTo")]
    AssignedTo,
    /// Appends to the relations collection
    #[serde(rename = "/relations/-")]
    Relations,
}

/// Link from the new work item to an existing one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub rel: String,
    pub url: String,
}

impl Relation {
    /// Parent link pointing at the given work item resource URL
    pub fn parent(url: impl Into<String>) -> Self {
        Self {
            rel: PARENT_LINK_TYPE.to_string(),
            url: url.into(),
        }
    }
}

/// Value carried by a patch operation: a plain field value or a relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchValue {
    Text(String),
    Relation(Relation),
}

/// One step of a work item JSON patch document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: PatchPath,
    pub value: PatchValue,
}

impl PatchOperation {
    pub fn set_field(path: PatchPath, value: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Add,
            path,
            value: PatchValue::Text(value.into()),
        }
    }

    pub fn add_relation(relation: Relation) -> Self {
        Self {
            op: PatchOp::Add,
            path: PatchPath::Relations,
            value: PatchValue::Relation(relation),
        }
    }
}

/// Ordered sequence of patch operations sent as the request body
pub type PatchDocument = Vec<PatchOperation>;
