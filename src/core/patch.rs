use crate::models::{PatchDocument, PatchOperation, PatchPath, ProjectRef, Relation, WorkItemDraft};

/// Build the JSON patch document for creating a work item.
///
/// Operations are always emitted in the order Title, Description, AssignedTo,
/// parent Relation. Optional fields are skipped when empty. The title is
/// expected to be validated by the caller.
pub fn build_patch_document(project: &ProjectRef, draft: &WorkItemDraft) -> PatchDocument {
    let mut document = vec![PatchOperation::set_field(PatchPath::Title, &draft.title)];

    if !draft.description.is_empty() {
        document.push(PatchOperation::set_field(
            PatchPath::Description,
            &draft.description,
        ));
    }

    if !draft.assigned_to.is_empty() {
        document.push(PatchOperation::set_field(
            PatchPath::AssignedTo,
            &draft.assigned_to,
        ));
    }

    if let Some(parent_id) = draft.parent_id {
        document.push(PatchOperation::add_relation(Relation::parent(
            project.work_item_api_url(parent_id),
        )));
    }

    document
}

/// Render a patch document as indented JSON for dry-run output
pub fn render_patch_document(document: &PatchDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}
