use std::borrow::Cow;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tree_sitter::{Node, Parser};

use crate::error::TuckError;
use crate::position::{Position, Span};
use crate::text::LineIndex;

use super::{
    BareTuple, BooleanChain, BooleanOperator, Call, CallArguments, Comprehension, ConditionalExpression,
    ConditionalStatement, Delimited, Delimiters, Lambda, NodeId, NodeKind, Signature,
    SignatureTail, SyntaxNode, SyntaxTree,
};

const SKIPPED_KINDS: &[&str] = &["comment", "line_continuation"];

/// Parses Python source and lowers the concrete tree into a [`SyntaxTree`].
pub fn parse_python(source: &str, source_name: &str) -> Result<SyntaxTree, TuckError> {
    let parse_source = normalize_bare_cr_for_parser(source.as_bytes());
    debug_assert_eq!(parse_source.len(), source.len());

    let tree = parse_tree_from_source(parse_source.as_ref(), source_name)?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(TuckError::ParseFailure {
            source_name: source_name.to_string(),
            message: describe_first_error(root, &LineIndex::new(source)),
        });
    }

    let index = LineIndex::new(source);
    let mut lowerer = Lowerer {
        index: &index,
        tree: SyntaxTree {
            nodes: Vec::new(),
            root: NodeId(0),
        },
        ids: HashMap::new(),
    };
    let root_id = lowerer.lower(root, None)?;
    lowerer.tree.root = root_id;

    tracing::trace!(
        source_name,
        nodes = lowerer.tree.len(),
        "syntax.lower.complete"
    );
    Ok(lowerer.tree)
}

fn load_python_language() -> tree_sitter::Language {
    tree_sitter_python::LANGUAGE.into()
}

fn parse_tree_from_source(
    source: &[u8],
    source_name: &str,
) -> Result<tree_sitter::Tree, TuckError> {
    let language = catch_unwind(AssertUnwindSafe(load_python_language)).map_err(|payload| {
        TuckError::LanguageSetup {
            message: format!(
                "panic while loading bundled tree-sitter language: {}",
                panic_payload_to_string(payload)
            ),
        }
    })?;

    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|error| TuckError::LanguageSetup {
            message: error.to_string(),
        })?;

    parser
        .parse(source, None)
        .ok_or_else(|| TuckError::ParseFailure {
            source_name: source_name.to_string(),
            message: "Tree-sitter returned no syntax tree".to_string(),
        })
}

fn describe_first_error(node: Node<'_>, index: &LineIndex<'_>) -> String {
    if node.is_error() || node.is_missing() {
        let position = index.position_at(node.start_byte());
        return if node.is_missing() {
            format!("Syntax error at {position}: missing '{}'", node.kind())
        } else {
            format!("Syntax error at {position}")
        };
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            return describe_first_error(child, index);
        }
    }

    "Syntax errors detected in Python source".to_string()
}

fn panic_payload_to_string(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }

    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }

    "unknown panic payload".to_string()
}

/// Tree-sitter treats a lone `\r` differently from Python; map it to `\n`
/// without changing byte offsets.
fn normalize_bare_cr_for_parser(source: &[u8]) -> Cow<'_, [u8]> {
    let is_bare_cr = |index: usize| source[index] == b'\r' && source.get(index + 1) != Some(&b'\n');

    if !(0..source.len()).any(is_bare_cr) {
        return Cow::Borrowed(source);
    }

    let mut normalized = source.to_vec();
    for index in 0..source.len() {
        if is_bare_cr(index) {
            normalized[index] = b'\n';
        }
    }

    Cow::Owned(normalized)
}

struct Lowerer<'a, 'src> {
    index: &'a LineIndex<'src>,
    tree: SyntaxTree,
    ids: HashMap<usize, NodeId>,
}

impl Lowerer<'_, '_> {
    fn lower(&mut self, node: Node<'_>, parent: Option<NodeId>) -> Result<NodeId, TuckError> {
        let span = (node.kind() != "module").then(|| self.span_of(node));
        let id = self.tree.push(SyntaxNode {
            kind: NodeKind::Other,
            grammar_kind: node.kind(),
            span,
            parent,
            children: Vec::new(),
        });
        self.ids.insert(node.id(), id);

        let children = self
            .structural_children(node)
            .into_iter()
            .map(|child| self.lower(child, Some(id)))
            .collect::<Result<Vec<_>, _>>()?;
        self.tree.nodes[id.0].children = children;
        self.tree.nodes[id.0].kind = self.kind_of(node)?;

        Ok(id)
    }

    /// Children as the engine sees them: named, no comments, and boolean
    /// operators of the same tier flattened into one operand list.
    fn structural_children<'tree>(&self, node: Node<'tree>) -> Vec<Node<'tree>> {
        if node.kind() == "boolean_operator"
            && let Some(operator) = boolean_operator_of(node)
        {
            let mut operands = Vec::new();
            collect_boolean_operands(node, operator, &mut operands, &mut Vec::new());
            return operands;
        }

        named_children(node)
    }

    fn kind_of(&self, node: Node<'_>) -> Result<NodeKind, TuckError> {
        let kind = match node.kind() {
            "module" => NodeKind::Module,
            "dictionary" => NodeKind::Mapping(self.delimited(node)?),
            "dictionary_comprehension" => {
                NodeKind::MappingComprehension(self.comprehension(node)?)
            }
            "list" | "tuple" | "set" => NodeKind::Sequence(self.delimited(node)?),
            "expression_list" if !is_assignment_target(node) => self.bare_tuple(node)?,
            "list_comprehension" | "set_comprehension" => {
                NodeKind::SequenceComprehension(self.comprehension(node)?)
            }
            "generator_expression" => NodeKind::GeneratorExpression(self.comprehension(node)?),
            "call" => self.call(node)?,
            "parameters" => {
                let parameters = self.delimited(node)?;
                let tail = signature_tail(&named_children(node));
                NodeKind::FunctionSignature(Signature { parameters, tail })
            }
            "lambda" => self.lambda(node)?,
            "argument_list"
                if node
                    .parent()
                    .is_some_and(|parent| parent.kind() == "class_definition") =>
            {
                NodeKind::ClassSignature(self.delimited(node)?)
            }
            "boolean_operator" => self.boolean_chain(node)?,
            "conditional_expression" => self.conditional_expression(node)?,
            "if_statement" | "elif_clause" | "while_statement" => {
                self.conditional_statement(node)?
            }
            "parenthesized_expression" => NodeKind::Parenthesized(self.delimiters(node)),
            "string" => NodeKind::StringLiteral,
            _ => NodeKind::Other,
        };

        Ok(kind)
    }

    fn call(&self, node: Node<'_>) -> Result<NodeKind, TuckError> {
        let (Some(function), Some(arguments)) = (
            node.child_by_field_name("function"),
            node.child_by_field_name("arguments"),
        ) else {
            return Ok(NodeKind::Other);
        };

        let name = match function.kind() {
            "attribute" => function.child_by_field_name("attribute").unwrap_or(arguments),
            "identifier" => function,
            _ => arguments,
        };

        let arguments = if arguments.kind() == "generator_expression" {
            CallArguments::Generator(self.id_of(arguments)?)
        } else {
            CallArguments::List(self.delimited(arguments)?)
        };

        Ok(NodeKind::Call(Call {
            name_start: self.start_of(name),
            arguments,
        }))
    }

    fn lambda(&self, node: Node<'_>) -> Result<NodeKind, TuckError> {
        let Some(colon) = first_token(node, ":") else {
            return Ok(NodeKind::Other);
        };

        let (parameters, trailing_comma, tail) = match node.child_by_field_name("parameters") {
            Some(list) => {
                let elements = named_children(list);
                let trailing_comma = has_trailing_comma(list, &elements);
                let tail = signature_tail(&elements);
                (self.ids_of(&elements)?, trailing_comma, tail)
            }
            None => (Vec::new(), false, SignatureTail::Ordinary),
        };

        Ok(NodeKind::LambdaSignature(Lambda {
            parameters,
            trailing_comma,
            tail,
            colon: self.start_of(colon),
        }))
    }

    fn boolean_chain(&self, node: Node<'_>) -> Result<NodeKind, TuckError> {
        let Some(operator) = boolean_operator_of(node) else {
            return Ok(NodeKind::Other);
        };

        let mut operands = Vec::new();
        let mut operators = Vec::new();
        collect_boolean_operands(node, operator, &mut operands, &mut operators);

        Ok(NodeKind::BooleanChain(BooleanChain {
            operator,
            operands: self.ids_of(&operands)?,
            operators: operators.iter().map(|token| self.span_of(*token)).collect(),
        }))
    }

    fn conditional_expression(&self, node: Node<'_>) -> Result<NodeKind, TuckError> {
        let parts = named_children(node);
        let ([body, test, alternative], Some(if_keyword), Some(else_keyword)) = (
            parts.as_slice(),
            first_token(node, "if"),
            first_token(node, "else"),
        ) else {
            return Ok(NodeKind::Other);
        };

        Ok(NodeKind::ConditionalExpression(ConditionalExpression {
            body: self.id_of(*body)?,
            test: self.id_of(*test)?,
            alternative: self.id_of(*alternative)?,
            if_keyword: self.start_of(if_keyword),
            else_keyword: self.start_of(else_keyword),
        }))
    }

    fn conditional_statement(&self, node: Node<'_>) -> Result<NodeKind, TuckError> {
        let (Some(test), Some(colon)) = (
            node.child_by_field_name("condition"),
            first_token(node, ":"),
        ) else {
            return Ok(NodeKind::Other);
        };

        Ok(NodeKind::ConditionalStatement(ConditionalStatement {
            test: self.id_of(test)?,
            colon: self.start_of(colon),
        }))
    }

    fn delimited(&self, node: Node<'_>) -> Result<Delimited, TuckError> {
        let elements = named_children(node);

        Ok(Delimited {
            delimiters: self.delimiters(node),
            trailing_comma: has_trailing_comma(node, &elements),
            elements: self.ids_of(&elements)?,
        })
    }

    fn bare_tuple(&self, node: Node<'_>) -> Result<NodeKind, TuckError> {
        let elements = named_children(node);

        Ok(NodeKind::BareTuple(BareTuple {
            trailing_comma: has_trailing_comma(node, &elements),
            elements: self.ids_of(&elements)?,
        }))
    }

    fn comprehension(&self, node: Node<'_>) -> Result<Comprehension, TuckError> {
        let children = named_children(node);
        let Some(body) = node
            .child_by_field_name("body")
            .or_else(|| children.first().copied())
        else {
            return Err(TuckError::internal(format!(
                "'{}' node has no body expression",
                node.kind()
            )));
        };
        let clauses = children
            .iter()
            .filter(|child| matches!(child.kind(), "for_in_clause" | "if_clause"))
            .map(|child| self.id_of(*child))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Comprehension {
            delimiters: self.delimiters(node),
            body: self.id_of(body)?,
            clauses,
        })
    }

    /// Bracketed nodes start on their opening and end on their closing token.
    fn delimiters(&self, node: Node<'_>) -> Delimiters {
        let span = self.span_of(node);
        Delimiters {
            open: span.start,
            close: span.end,
        }
    }

    fn span_of(&self, node: Node<'_>) -> Span {
        Span::new(
            self.index.position_at(node.start_byte()),
            self.index
                .last_position_before(node.start_byte(), node.end_byte()),
        )
    }

    fn start_of(&self, node: Node<'_>) -> Position {
        self.index.position_at(node.start_byte())
    }

    /// Arena id of an already lowered child.
    fn id_of(&self, node: Node<'_>) -> Result<NodeId, TuckError> {
        self.ids.get(&node.id()).copied().ok_or_else(|| {
            TuckError::internal(format!(
                "'{}' node at {} was referenced before it was lowered",
                node.kind(),
                self.start_of(node)
            ))
        })
    }

    fn ids_of(&self, nodes: &[Node<'_>]) -> Result<Vec<NodeId>, TuckError> {
        nodes.iter().map(|node| self.id_of(*node)).collect()
    }
}

fn named_children<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !SKIPPED_KINDS.contains(&child.kind()))
        .collect()
}

fn first_token<'tree>(node: Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .find(|child| !child.is_named() && child.kind() == kind)
}

fn has_trailing_comma(node: Node<'_>, elements: &[Node<'_>]) -> bool {
    let Some(last) = elements.last() else {
        return false;
    };

    let mut cursor = node.walk();
    node.children(&mut cursor)
        .any(|child| child.kind() == "," && child.start_byte() >= last.end_byte())
}

fn boolean_operator_of(node: Node<'_>) -> Option<BooleanOperator> {
    match node.child_by_field_name("operator")?.kind() {
        "and" => Some(BooleanOperator::And),
        "or" => Some(BooleanOperator::Or),
        _ => None,
    }
}

/// Operands and operator tokens of a same-operator run, in source order.
fn collect_boolean_operands<'tree>(
    node: Node<'tree>,
    operator: BooleanOperator,
    operands: &mut Vec<Node<'tree>>,
    operators: &mut Vec<Node<'tree>>,
) {
    for field in ["left", "operator", "right"] {
        let Some(side) = node.child_by_field_name(field) else {
            continue;
        };

        if field == "operator" {
            operators.push(side);
        } else if side.kind() == "boolean_operator" && boolean_operator_of(side) == Some(operator)
        {
            collect_boolean_operands(side, operator, operands, operators);
        } else {
            operands.push(side);
        }
    }
}

/// `a, b = ...` and `for a, b in ...` bind names; only value positions are
/// tuples that can take parentheses.
fn is_assignment_target(node: Node<'_>) -> bool {
    node.parent()
        .and_then(|parent| parent.child_by_field_name("left"))
        .is_some_and(|left| left == node)
}

fn signature_tail(parameters: &[Node<'_>]) -> SignatureTail {
    let Some(last) = parameters.last() else {
        return SignatureTail::Ordinary;
    };

    let is_variadic_keyword = last.kind() == "dictionary_splat_pattern"
        || (last.kind() == "typed_parameter"
            && last
                .named_child(0)
                .is_some_and(|inner| inner.kind() == "dictionary_splat_pattern"));
    if is_variadic_keyword {
        return SignatureTail::VariadicKeyword;
    }

    if parameters
        .first()
        .is_some_and(|first| first.kind() == "keyword_separator")
    {
        return SignatureTail::KeywordOnly;
    }

    SignatureTail::Ordinary
}
