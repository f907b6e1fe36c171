//! Per-construct layout rules producing a [`WrapPlan`].

use std::collections::BTreeSet;

use crate::error::TuckError;
use crate::locate::Selection;
use crate::position::{Position, Span};
use crate::syntax::{
    CallArguments, Comprehension, Delimited, Delimiters, NodeId, NodeKind, SignatureTail,
    SyntaxTree,
};
use crate::text::LineIndex;

mod boolean;

pub use boolean::{tier_operands, tier_operators};

/// Spaces added per nesting level.
pub const INDENT_SIZE: usize = 4;

/// Where the closing side of a wrapped construct goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closing {
    /// Move an existing closing token (bracket or colon) onto its own line.
    Break(Position),
    /// Add `)` on its own line, inserted before `Position`.
    Parenthesis(Position),
}

/// Whitespace from `from` up to, not including, `to` collapses into a single
/// space. Pulls an operator that starts its own line back behind the
/// previous operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Join {
    pub from: Position,
    pub to: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapPlan {
    /// Region the plan may touch; used for conflict checks between requests.
    pub span: Span,
    pub anchor_column: usize,
    /// `(` inserted before this position when the construct needs explicit
    /// parentheses.
    pub opening: Option<Position>,
    /// Positions that must start a new line at the inner indent.
    pub breaks: Vec<Position>,
    pub joins: Vec<Join>,
    /// `,` inserted before this position.
    pub trailing_separator: Option<Position>,
    pub closing: Option<Closing>,
    /// `)` appended without a line break (parenthesized lambdas).
    pub appended_parenthesis: Option<Position>,
    /// Continuation lines shifted right by [`INDENT_SIZE`] because the element
    /// they belong to moved onto a deeper line.
    pub reindent_lines: Vec<usize>,
}

impl WrapPlan {
    fn empty(span: Span, anchor_column: usize) -> Self {
        Self {
            span,
            anchor_column,
            opening: None,
            breaks: Vec::new(),
            joins: Vec::new(),
            trailing_separator: None,
            closing: None,
            appended_parenthesis: None,
            reindent_lines: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.opening.is_none()
            && self.breaks.is_empty()
            && self.joins.is_empty()
            && self.trailing_separator.is_none()
            && self.closing.is_none()
            && self.appended_parenthesis.is_none()
            && self.reindent_lines.is_empty()
    }

    pub fn outer_indent(&self) -> String {
        " ".repeat(self.anchor_column.saturating_sub(1))
    }

    pub fn inner_indent(&self) -> String {
        " ".repeat(self.anchor_column.saturating_sub(1) + INDENT_SIZE)
    }
}

/// Layout inputs shared by every construct: the items that each get their own
/// line, and how the construct is closed.
struct Layout {
    items: Vec<Span>,
    /// Operator tokens between consecutive items, for boolean chains.
    operators: Vec<Span>,
    opening: Option<Position>,
    trailing_separator: bool,
    closing: ClosingRule,
    appended_parenthesis: Option<Position>,
}

enum ClosingRule {
    Existing(Position),
    Added(Position),
}

pub fn plan_wrap(
    tree: &SyntaxTree,
    index: &LineIndex<'_>,
    selection: Selection,
) -> Result<WrapPlan, TuckError> {
    let node = selection.node;
    let span = tree
        .span(node)
        .ok_or_else(|| TuckError::internal("selected node has no source span"))?;

    let mut planner = Planner {
        tree,
        index,
        string_lines: tree.string_interior_lines().into_iter().collect(),
        plan: WrapPlan::empty(span, selection.anchor_column),
    };

    let Some(layout) = planner.layout(node)? else {
        return Ok(planner.plan);
    };
    planner.apply(layout);

    Ok(planner.plan)
}

struct Planner<'a, 'src> {
    tree: &'a SyntaxTree,
    index: &'a LineIndex<'src>,
    string_lines: BTreeSet<usize>,
    plan: WrapPlan,
}

impl Planner<'_, '_> {
    /// `None` when the construct has nothing to lay out, e.g. `[]`.
    fn layout(&mut self, node: NodeId) -> Result<Option<Layout>, TuckError> {
        let tree = self.tree;
        let layout = match tree.kind(node) {
            NodeKind::Mapping(delimited)
            | NodeKind::Sequence(delimited)
            | NodeKind::ClassSignature(delimited) => self.delimited(delimited, true)?,
            NodeKind::BareTuple(tuple) => {
                if tuple.elements.is_empty() {
                    return Ok(None);
                }
                let items = self.spans_of(&tuple.elements)?;
                let mut layout = self.add_parentheses(items);
                layout.trailing_separator = !tuple.trailing_comma;
                layout.closing = ClosingRule::Added(self.plan.span.end.next_column());
                Some(layout)
            }
            NodeKind::MappingComprehension(comprehension)
            | NodeKind::SequenceComprehension(comprehension)
            | NodeKind::GeneratorExpression(comprehension) => self.comprehension(comprehension)?,
            NodeKind::Call(call) => match &call.arguments {
                CallArguments::List(arguments) => self.delimited(arguments, true)?,
                CallArguments::Generator(generator) => match tree.kind(*generator) {
                    NodeKind::GeneratorExpression(comprehension) => {
                        self.comprehension(comprehension)?
                    }
                    _ => return Err(unsupported(tree, *generator)),
                },
            },
            NodeKind::FunctionSignature(signature) => self.delimited(
                &signature.parameters,
                signature.tail == SignatureTail::Ordinary,
            )?,
            NodeKind::LambdaSignature(lambda) => {
                if lambda.parameters.is_empty() {
                    return Ok(None);
                }
                let items = self.spans_of(&lambda.parameters)?;
                let node_span = self.span_of(node)?;
                let parenthesized = tree.enclosing_parentheses(node).is_some();

                Some(Layout {
                    items,
                    operators: Vec::new(),
                    opening: (!parenthesized).then_some(node_span.start),
                    trailing_separator: lambda.tail == SignatureTail::Ordinary
                        && !lambda.trailing_comma,
                    closing: ClosingRule::Existing(lambda.colon),
                    appended_parenthesis: (!parenthesized).then(|| node_span.end.next_column()),
                })
            }
            NodeKind::BooleanChain(chain) => {
                let items = self.spans_of(&chain.operands)?;
                let mut layout = self.with_parentheses(node, items)?;
                layout.operators = chain.operators.clone();
                Some(layout)
            }
            NodeKind::ConditionalExpression(conditional) => {
                let body = self.span_of(conditional.body)?;
                let test = self.span_of(conditional.test)?;
                let alternative = self.span_of(conditional.alternative)?;
                let items = vec![
                    body,
                    Span::new(conditional.if_keyword, test.end),
                    Span::new(conditional.else_keyword, alternative.end),
                ];
                Some(self.with_parentheses(node, items)?)
            }
            NodeKind::ConditionalStatement(statement) => {
                self.plan.span = Span::new(self.plan.span.start, statement.colon);
                self.condition(statement.test)?
            }
            NodeKind::Module
            | NodeKind::Parenthesized(_)
            | NodeKind::StringLiteral
            | NodeKind::Other => return Err(unsupported(tree, node)),
        };

        Ok(layout)
    }

    fn delimited(
        &self,
        delimited: &Delimited,
        wants_separator: bool,
    ) -> Result<Option<Layout>, TuckError> {
        if delimited.elements.is_empty() {
            return Ok(None);
        }

        Ok(Some(Layout {
            items: self.spans_of(&delimited.elements)?,
            operators: Vec::new(),
            opening: None,
            trailing_separator: wants_separator && !delimited.trailing_comma,
            closing: ClosingRule::Existing(delimited.delimiters.close),
            appended_parenthesis: None,
        }))
    }

    fn comprehension(&self, comprehension: &Comprehension) -> Result<Option<Layout>, TuckError> {
        let mut items = vec![self.span_of(comprehension.body)?];
        items.extend(self.spans_of(&comprehension.clauses)?);

        Ok(Some(Layout {
            items,
            operators: Vec::new(),
            opening: None,
            trailing_separator: false,
            closing: ClosingRule::Existing(comprehension.delimiters.close),
            appended_parenthesis: None,
        }))
    }

    /// The test of an `if`/`elif`/`while` header, wrapped in parentheses and
    /// broken at its top-level boolean operators.
    fn condition(&self, test: NodeId) -> Result<Option<Layout>, TuckError> {
        let (inner, parentheses) = match self.tree.kind(test) {
            NodeKind::Parenthesized(delimiters) => match self.tree.children(test) {
                [inner] => (*inner, Some(*delimiters)),
                _ => (test, None),
            },
            _ => (test, None),
        };

        let items = self.spans_of(&tier_operands(self.tree, inner))?;
        let mut layout = match parentheses {
            Some(delimiters) => Self::reuse_parentheses(items, delimiters),
            None => self.add_parentheses(items),
        };
        layout.operators = tier_operators(self.tree, inner);

        Ok(Some(layout))
    }

    /// Reused parentheses widen the affected span to cover them.
    fn with_parentheses(&mut self, node: NodeId, items: Vec<Span>) -> Result<Layout, TuckError> {
        Ok(match self.tree.enclosing_parentheses(node) {
            Some(delimiters) => {
                self.plan.span = Span::new(delimiters.open, delimiters.close);
                Self::reuse_parentheses(items, delimiters)
            }
            None => self.add_parentheses(items),
        })
    }

    fn reuse_parentheses(items: Vec<Span>, delimiters: Delimiters) -> Layout {
        Layout {
            items,
            operators: Vec::new(),
            opening: None,
            trailing_separator: false,
            closing: ClosingRule::Existing(delimiters.close),
            appended_parenthesis: None,
        }
    }

    fn add_parentheses(&self, items: Vec<Span>) -> Layout {
        let opening = items.first().map(|first| first.start);
        let closing = items
            .last()
            .map_or(self.plan.span.end, |last| last.end)
            .next_column();

        Layout {
            items,
            operators: Vec::new(),
            opening,
            trailing_separator: false,
            closing: ClosingRule::Added(closing),
            appended_parenthesis: None,
        }
    }

    fn apply(&mut self, layout: Layout) {
        let mut reindent = BTreeSet::new();

        for item in &layout.items {
            // An item that already starts its own line keeps its layout.
            if layout.opening != Some(item.start) && self.index.starts_line(item.start) {
                continue;
            }

            self.plan.breaks.push(item.start);
            for line in item.start.line + 1..=item.end.line {
                if !self.string_lines.contains(&line) && !self.index.is_blank_line(line) {
                    reindent.insert(line);
                }
            }
        }

        for (operator, previous) in layout.operators.iter().zip(&layout.items) {
            if let Some(join) = self.join_before(operator.start, previous.end) {
                self.plan.joins.push(join);
            }
        }

        if layout.trailing_separator
            && let Some(last) = layout.items.last()
        {
            self.plan.trailing_separator = Some(last.end.next_column());
        }

        self.plan.opening = layout.opening;
        self.plan.closing = match layout.closing {
            ClosingRule::Existing(position) if self.index.starts_line(position) => None,
            ClosingRule::Existing(position) => Some(Closing::Break(position)),
            ClosingRule::Added(position) => Some(Closing::Parenthesis(position)),
        };
        self.plan.appended_parenthesis = layout.appended_parenthesis;
        self.plan.reindent_lines = reindent.into_iter().collect();
    }

    /// An operator opening a later line, separated from the previous operand
    /// by nothing but whitespace, moves up to end that operand's line.
    fn join_before(&self, operator: Position, previous_end: Position) -> Option<Join> {
        if operator.line <= previous_end.line || !self.index.starts_line(operator) {
            return None;
        }

        let from = previous_end.next_column();
        let gap = self.index.slice(from, operator)?;
        gap.chars()
            .all(|character| character.is_whitespace() || character == '\\')
            .then_some(Join { from, to: operator })
    }

    fn span_of(&self, node: NodeId) -> Result<Span, TuckError> {
        self.tree.span(node).ok_or_else(|| {
            TuckError::internal(format!(
                "'{}' node has no source span",
                self.tree.node(node).grammar_kind
            ))
        })
    }

    fn spans_of(&self, nodes: &[NodeId]) -> Result<Vec<Span>, TuckError> {
        nodes.iter().map(|node| self.span_of(*node)).collect()
    }
}

fn unsupported(tree: &SyntaxTree, node: NodeId) -> TuckError {
    TuckError::internal(format!(
        "Unable to plan wrapping for '{}' node",
        tree.node(node).grammar_kind
    ))
}
