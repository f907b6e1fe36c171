use crate::error::TuckError;
use crate::position::Position;
use crate::syntax::{NodeId, NodeKind, SyntaxTree};

/// Nodes whose spans contain a position, ordered outermost to innermost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorPath {
    nodes: Vec<NodeId>,
}

impl AncestorPath {
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn kind_names(&self, tree: &SyntaxTree) -> Vec<String> {
        self.nodes
            .iter()
            .map(|id| tree.node(*id).grammar_kind.to_string())
            .collect()
    }
}

/// The node a request resolved to, plus the column its indentation is
/// measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub node: NodeId,
    pub anchor_column: usize,
}

pub fn locate_ancestors(tree: &SyntaxTree, position: Position) -> Result<AncestorPath, TuckError> {
    let mut nodes = Vec::new();
    let root = tree.root();

    match tree.span(root) {
        None => collect_containing(tree, root, position, &mut nodes),
        Some(span) if span.contains(position) => {
            nodes.push(root);
            collect_containing(tree, root, position, &mut nodes);
        }
        Some(_) => {}
    }

    if nodes.is_empty() {
        return Err(TuckError::NoNodeFound { position });
    }

    Ok(AncestorPath { nodes })
}

fn collect_containing(
    tree: &SyntaxTree,
    parent: NodeId,
    position: Position,
    nodes: &mut Vec<NodeId>,
) {
    for &child in tree.children(parent) {
        match tree.span(child) {
            None => {
                let before = nodes.len();
                collect_containing(tree, child, position, nodes);
                if nodes.len() > before {
                    return;
                }
            }
            Some(span) if span.end < position || span.start > position => {}
            Some(_) => {
                nodes.push(child);
                collect_containing(tree, child, position, nodes);
                return;
            }
        }
    }
}

pub fn select_wrappable(
    tree: &SyntaxTree,
    path: &AncestorPath,
    position: Position,
) -> Result<Selection, TuckError> {
    let node = path
        .nodes()
        .iter()
        .rev()
        .copied()
        .find(|id| is_wrappable_at(tree.kind(*id), position))
        .ok_or_else(|| TuckError::NoSupportedNodeFound {
            position,
            path: path.kind_names(tree),
        })?;

    let anchor_column = indentation_anchor(tree, path, node);
    tracing::debug!(
        %position,
        kind = tree.node(node).grammar_kind,
        anchor_column,
        "locate.select"
    );

    Ok(Selection {
        node,
        anchor_column,
    })
}

/// Whether a node of this kind can be expanded for a cursor at `position`.
pub fn is_wrappable_at(kind: &NodeKind, position: Position) -> bool {
    match kind {
        NodeKind::Mapping(_)
        | NodeKind::MappingComprehension(_)
        | NodeKind::Sequence(_)
        | NodeKind::BareTuple(_)
        | NodeKind::SequenceComprehension(_)
        | NodeKind::GeneratorExpression(_)
        | NodeKind::FunctionSignature(_)
        | NodeKind::ClassSignature(_)
        | NodeKind::BooleanChain(_)
        | NodeKind::ConditionalExpression(_) => true,
        NodeKind::Call(call) => position >= call.name_start,
        NodeKind::LambdaSignature(lambda) => position <= lambda.colon,
        NodeKind::ConditionalStatement(statement) => position <= statement.colon,
        NodeKind::Module | NodeKind::Parenthesized(_) | NodeKind::StringLiteral | NodeKind::Other => {
            false
        }
    }
}

/// Start column of the outermost path node beginning on the same line as
/// `selected`, so a literal after `foo = ` indents relative to the statement.
pub fn indentation_anchor(tree: &SyntaxTree, path: &AncestorPath, selected: NodeId) -> usize {
    let Some(selected_span) = tree.span(selected) else {
        return 1;
    };

    path.nodes()
        .iter()
        .filter_map(|id| tree.span(*id))
        .find(|span| span.start.line == selected_span.start.line)
        .map_or(selected_span.start.column, |span| span.start.column)
}
