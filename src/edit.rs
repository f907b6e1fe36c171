use crate::error::TuckError;
use crate::plan::{Closing, INDENT_SIZE, Join, WrapPlan};
use crate::position::{Position, Span};
use crate::text::LineIndex;

/// Text inserted immediately before the character at `position`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub position: Position,
    pub text: String,
    /// Drop spaces and tabs left dangling in front of the insertion.
    pub trim: bool,
    /// Source text from `position` up to this position is replaced.
    pub until: Option<Position>,
}

impl Edit {
    pub fn wrap(position: Position, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            trim: true,
            until: None,
        }
    }

    pub fn insert(position: Position, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            trim: false,
            until: None,
        }
    }

    pub fn join(join: Join) -> Self {
        Self {
            position: join.from,
            text: " ".to_string(),
            trim: false,
            until: Some(join.to),
        }
    }
}

/// Edits produced for one cursor request, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBatch {
    pub span: Span,
    pub edits: Vec<Edit>,
}

impl EditBatch {
    pub fn from_plan(plan: &WrapPlan, line_ending: &str) -> Self {
        let inner = format!("{line_ending}{}", plan.inner_indent());
        let outer = format!("{line_ending}{}", plan.outer_indent());
        let mut edits = Vec::new();

        if let Some(position) = plan.opening {
            edits.push(Edit::insert(position, "("));
        }
        edits.extend(
            plan.breaks
                .iter()
                .map(|position| Edit::wrap(*position, inner.clone())),
        );
        edits.extend(plan.joins.iter().map(|join| Edit::join(*join)));
        if let Some(position) = plan.trailing_separator {
            edits.push(Edit::wrap(position, ","));
        }
        match plan.closing {
            Some(Closing::Break(position)) => edits.push(Edit::wrap(position, outer)),
            Some(Closing::Parenthesis(position)) => {
                edits.push(Edit::wrap(position, format!("{outer})")));
            }
            None => {}
        }
        if let Some(position) = plan.appended_parenthesis {
            edits.push(Edit::insert(position, ")"));
        }
        let shift = " ".repeat(INDENT_SIZE);
        edits.extend(
            plan.reindent_lines
                .iter()
                .map(|line| Edit::insert(Position::new(*line, 1), shift.clone())),
        );

        Self {
            span: plan.span,
            edits,
        }
    }
}

/// Applies `edits` in one forward pass over `source`. Edits at the same
/// position keep their relative order.
pub fn apply_edits(source: &str, edits: &[Edit]) -> Result<String, TuckError> {
    let index = LineIndex::new(source);
    let resolve = |position: Position| {
        index.offset_of(position).ok_or_else(|| {
            TuckError::internal(format!(
                "Edit position {position} is outside the source text"
            ))
        })
    };

    let mut resolved = edits
        .iter()
        .map(|edit| {
            let offset = resolve(edit.position)?;
            let end = match edit.until {
                Some(until) => resolve(until)?.max(offset),
                None => offset,
            };
            Ok((offset, end, edit))
        })
        .collect::<Result<Vec<_>, TuckError>>()?;
    resolved.sort_by_key(|(offset, _, _)| *offset);

    let inserted: usize = edits.iter().map(|edit| edit.text.len()).sum();
    let mut output = String::with_capacity(source.len() + inserted);
    let mut copied = 0;

    for (offset, end, edit) in resolved {
        if offset < copied {
            return Err(TuckError::internal(format!(
                "Edit at {} falls inside text already replaced",
                edit.position
            )));
        }

        let segment = &source[copied..offset];
        if edit.trim {
            output.push_str(segment.trim_end_matches([' ', '\t']));
        } else {
            output.push_str(segment);
        }
        output.push_str(&edit.text);
        copied = end;
    }
    output.push_str(&source[copied..]);

    Ok(output)
}
