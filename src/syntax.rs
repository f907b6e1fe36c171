//! Arena-allocated syntax tree the wrapping engine works on.
//!
//! Nodes are addressed by [`NodeId`]; every construct the planner understands
//! is a variant of the closed [`NodeKind`] union carrying the child references
//! and token positions needed to lay it out.

use crate::position::{Position, Span};

mod lower;

pub use lower::parse_python;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub open: Position,
    pub close: Position,
}

/// A bracketed, comma separated list of elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimited {
    pub delimiters: Delimiters,
    pub elements: Vec<NodeId>,
    pub trailing_comma: bool,
}

/// A tuple written without brackets: `return a, b` or `x = 1, 2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BareTuple {
    pub elements: Vec<NodeId>,
    pub trailing_comma: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comprehension {
    pub delimiters: Delimiters,
    pub body: NodeId,
    /// `for` and `if` clauses in source order, nested ones included.
    pub clauses: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArguments {
    List(Delimited),
    /// `f(x for x in y)`: the generator owns the call's parentheses.
    Generator(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Start of the called name; cursors before it sit on the receiver chain.
    pub name_start: Position,
    pub arguments: CallArguments,
}

/// How a parameter list ends, which decides whether a trailing comma is legal
/// or wanted after the last parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureTail {
    Ordinary,
    /// Last parameter is a `**kwargs` form.
    VariadicKeyword,
    /// Every parameter follows a leading bare `*`.
    KeywordOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub parameters: Delimited,
    pub tail: SignatureTail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lambda {
    pub parameters: Vec<NodeId>,
    pub trailing_comma: bool,
    pub tail: SignatureTail,
    pub colon: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOperator {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanChain {
    pub operator: BooleanOperator,
    /// Operands of one precedence tier; nested same-operator runs are flattened.
    pub operands: Vec<NodeId>,
    /// Operator tokens in source order; `operators[i]` sits between
    /// `operands[i]` and `operands[i + 1]`.
    pub operators: Vec<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalExpression {
    pub body: NodeId,
    pub test: NodeId,
    pub alternative: NodeId,
    pub if_keyword: Position,
    pub else_keyword: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalStatement {
    pub test: NodeId,
    pub colon: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    Mapping(Delimited),
    MappingComprehension(Comprehension),
    Sequence(Delimited),
    BareTuple(BareTuple),
    SequenceComprehension(Comprehension),
    GeneratorExpression(Comprehension),
    Call(Call),
    FunctionSignature(Signature),
    LambdaSignature(Lambda),
    ClassSignature(Delimited),
    BooleanChain(BooleanChain),
    ConditionalExpression(ConditionalExpression),
    ConditionalStatement(ConditionalStatement),
    Parenthesized(Delimiters),
    StringLiteral,
    Other,
}

#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Grammar name of the node, e.g. `dictionary` or `if_statement`.
    pub grammar_kind: &'static str,
    /// `None` for nodes without a source location (the module root).
    pub span: Option<Span>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    root: NodeId,
}

impl SyntaxTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.nodes[id.0].span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Every node id in pre-order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parentheses that enclose `id` and nothing else, if any. The
    /// parentheses of a call whose only argument is `id` count too.
    pub fn enclosing_parentheses(&self, id: NodeId) -> Option<Delimiters> {
        let parent = self.parent(id)?;
        if let NodeKind::Parenthesized(delimiters) = self.kind(parent) {
            return Some(*delimiters);
        }

        match self.kind(self.parent(parent)?) {
            NodeKind::Call(Call {
                arguments: CallArguments::List(arguments),
                ..
            }) if arguments.elements == [id] => Some(arguments.delimiters),
            _ => None,
        }
    }

    /// Lines strictly inside multi-line string literals; their text must never
    /// be re-indented.
    pub fn string_interior_lines(&self) -> Vec<usize> {
        let mut lines = Vec::new();
        for node in &self.nodes {
            if let (NodeKind::StringLiteral, Some(span)) = (&node.kind, node.span) {
                lines.extend(span.start.line + 1..=span.end.line);
            }
        }
        lines.sort_unstable();
        lines.dedup();
        lines
    }

    fn push(&mut self, node: SyntaxNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }
}
