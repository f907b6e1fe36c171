//! The `process` transaction: many cursor requests against one source text.

use serde::Serialize;

use crate::conflict::first_overlap;
use crate::edit::{Edit, EditBatch, apply_edits};
use crate::error::TuckError;
use crate::locate::{locate_ancestors, select_wrappable};
use crate::plan::plan_wrap;
use crate::position::{Position, Span};
use crate::syntax::{SyntaxTree, parse_python};
use crate::text::LineIndex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Processed {
    pub text: String,
    /// Affected span of each request, in request order.
    pub spans: Vec<Span>,
}

/// Wraps the construct at every position. Either all requests apply or none
/// do; requests whose affected spans touch are rejected.
pub fn process(
    positions: &[Position],
    source: &str,
    source_name: &str,
) -> Result<Processed, TuckError> {
    if positions.is_empty() {
        return Ok(Processed {
            text: source.to_string(),
            spans: Vec::new(),
        });
    }

    let tree = parse_python(source, source_name)?;
    let index = LineIndex::new(source);

    let batches = positions
        .iter()
        .map(|position| resolve_request(&tree, &index, *position))
        .collect::<Result<Vec<_>, _>>()?;

    let spans: Vec<(Position, Position)> = batches
        .iter()
        .map(|batch| (batch.span.start, batch.span.end))
        .collect();
    if let Some((first, second)) = first_overlap(&spans) {
        tracing::debug!(
            first = %batches[first].span,
            second = %batches[second].span,
            "batch.overlap"
        );
        return Err(TuckError::EditsOverlap {
            first: batches[first].span,
            second: batches[second].span,
        });
    }

    let mut ordered: Vec<&EditBatch> = batches.iter().collect();
    ordered.sort_by_key(|batch| batch.span.start);
    let edits: Vec<Edit> = ordered
        .into_iter()
        .flat_map(|batch| batch.edits.iter().cloned())
        .collect();

    let text = apply_edits(source, &edits)?;
    tracing::debug!(
        source_name,
        requests = batches.len(),
        edits = edits.len(),
        "batch.applied"
    );

    Ok(Processed {
        text,
        spans: batches.into_iter().map(|batch| batch.span).collect(),
    })
}

/// Runs locate, select and plan for a single cursor.
pub fn resolve_request(
    tree: &SyntaxTree,
    index: &LineIndex<'_>,
    position: Position,
) -> Result<EditBatch, TuckError> {
    let path = locate_ancestors(tree, position)?;
    let selection = select_wrappable(tree, &path, position)?;
    let plan = plan_wrap(tree, index, selection)?;
    let batch = EditBatch::from_plan(&plan, index.line_ending());

    tracing::trace!(
        %position,
        span = %batch.span,
        edits = batch.edits.len(),
        "batch.request.resolved"
    );
    Ok(batch)
}
