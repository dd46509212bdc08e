use std::io::Write;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::{render_patch_document, FailureHandler, WorkItemGateway};
use crate::error::{AppError, Result};
use crate::models::{CreatedWorkItem, PatchDocument, WorkItemDraft, WorkItemType};

pub const DRY_RUN_HEADER: &str = "--- Dry Run: Work Item Payload ---";
pub const DRY_RUN_FOOTER: &str = "------------------------------------";

/// Create options, as given on the command line
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Work item type, matched case-insensitively
    pub work_item_type: String,
    pub title: String,
    pub description: String,
    pub assigned_to: String,
    /// Parent work item id (None or 0 = no parent)
    pub parent: Option<u64>,
    /// Print the patch document instead of sending it
    pub dry_run: bool,
}

/// Result of a successful create command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Document that would have been sent
    DryRun(PatchDocument),
    Created(CreatedWorkItem),
}

/// Create a work item.
///
/// Validates input, builds the patch document, then either prints it
/// (dry run) or submits it and prints the work item URL to `out` without a
/// trailing newline. Errors are returned, never printed here.
pub async fn create_work_item<G, W>(
    gateway: &G,
    options: CreateOptions,
    cancel: &CancellationToken,
    out: &mut W,
) -> Result<CreateOutcome>
where
    G: WorkItemGateway + ?Sized,
    W: Write,
{
    let work_item_type: WorkItemType = options.work_item_type.parse()?;
    if options.title.trim().is_empty() {
        return Err(AppError::EmptyTitle);
    }

    let draft = WorkItemDraft {
        title: options.title,
        description: options.description,
        assigned_to: options.assigned_to,
        parent_id: options.parent.filter(|id| *id != 0),
    };
    let document = gateway.build_document(&draft);
    debug!("Built patch document with {} operations", document.len());

    if options.dry_run {
        let json = render_patch_document(&document).map_err(AppError::Render)?;
        writeln!(out, "{}\n{}\n{}", DRY_RUN_HEADER, json, DRY_RUN_FOOTER).map_err(AppError::Output)?;
        out.flush().map_err(AppError::Output)?;
        return Ok(CreateOutcome::DryRun(document));
    }

    info!("Creating {} work item", work_item_type);
    let record = gateway.create(work_item_type, document, cancel).await?;
    let id = record.id.ok_or(AppError::MissingId)?;

    let url = gateway.work_item_url(id);
    write!(out, "{}", url).map_err(AppError::Output)?;
    out.flush().map_err(AppError::Output)?;

    Ok(CreateOutcome::Created(CreatedWorkItem { id, url }))
}

/// Single error boundary: map a command result to a process exit code
pub fn finish<T, H>(result: Result<T>, handler: &H) -> i32
where
    H: FailureHandler + ?Sized,
{
    match result {
        Ok(_) => 0,
        Err(e) => handler.handle(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct CountingHandler {
        seen: RefCell<Vec<String>>,
    }

    impl FailureHandler for CountingHandler {
        fn handle(&self, error: &AppError) -> i32 {
            self.seen.borrow_mut().push(error.to_string());
            1
        }
    }

    #[test]
    fn test_finish_success_is_zero() {
        let handler = CountingHandler { seen: RefCell::new(Vec::new()) };
        assert_eq!(finish(Ok(()), &handler), 0);
        assert!(handler.seen.borrow().is_empty());
    }

    #[test]
    fn test_finish_routes_error_to_handler() {
        let handler = CountingHandler { seen: RefCell::new(Vec::new()) };
        assert_eq!(finish::<(), _>(Err(AppError::EmptyTitle), &handler), 1);
        assert_eq!(
            *handler.seen.borrow(),
            vec!["Work item title must not be empty".to_string()]
        );
    }

    #[test]
    fn test_default_options_have_no_parent() {
        let options = CreateOptions::default();
        assert!(options.parent.is_none());
        assert!(!options.dry_run);
    }
}
