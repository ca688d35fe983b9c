//! Expression tree
//!
//! Every node carries the [`Location`] of its first token, relative to the start of the
//! statement text it was parsed from.

use crate::mathlingua::ast::Location;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Name(NameExpression),
    /// `x...`
    VariadicName(NameExpression),
    Command(CommandExpression),
    /// `f(x, y)` where every argument is a plain or variadic name
    Function(Function),
    FunctionCall(FunctionCall),
    Tuple(Tuple),
    Set(Set),
    /// A single parenthesized expression, or the contents of `[: :]`
    Grouped(Grouped),
    Operation(Operation),
    Prefix(Prefix),
    Relation(Relation),
    Assignment(Assignment),
    Text(TextExpression),
    /// Stands in for anything that failed to parse
    Empty(Location),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NameExpression {
    pub name: String,
    pub location: Location,
}

/// `\a.b[square]_{sub}^{sup}{curly}:name{..}(paren)`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandExpression {
    pub names: Vec<String>,
    pub square: Option<Vec<Expression>>,
    pub sub: Option<Vec<Expression>>,
    pub sup: Option<Vec<Expression>>,
    pub curly: Option<Vec<Expression>>,
    pub named: Vec<NamedGroup>,
    pub paren: Option<Vec<Expression>>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedGroup {
    pub name: String,
    pub params: Vec<Expression>,
}

impl CommandExpression {
    /// `\` followed by the dotted names and a `:name` for every named group
    pub fn signature(&self) -> String {
        let mut form = format!("\\{}", self.names.join("."));
        for named in &self.named {
            form.push(':');
            form.push_str(&named.name);
        }
        form
    }

    /// Every argument in declaration order: square, sub, sup, curly, named, paren
    pub fn arguments(&self) -> Vec<&Expression> {
        let mut args: Vec<&Expression> = Vec::new();
        for group in [&self.square, &self.sub, &self.sup, &self.curly]
            .into_iter()
            .flatten()
        {
            args.extend(group.iter());
        }
        for named in &self.named {
            args.extend(named.params.iter());
        }
        if let Some(paren) = &self.paren {
            args.extend(paren.iter());
        }
        args
    }

    /// Kinds of bracket groups present, in declaration order
    pub fn shape(&self) -> Vec<String> {
        let mut shape = Vec::new();
        for (present, label) in [
            (self.square.is_some(), "[]"),
            (self.sub.is_some(), "_{}"),
            (self.sup.is_some(), "^{}"),
            (self.curly.is_some(), "{}"),
        ] {
            if present {
                shape.push(label.to_string());
            }
        }
        for named in &self.named {
            shape.push(format!(":{}{{}}", named.name));
        }
        if self.paren.is_some() {
            shape.push("()".to_string());
        }
        shape
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Expression>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    /// Written as `\name(...)`
    pub command: bool,
    pub sub_params: Option<Vec<Expression>>,
    pub params: Option<Vec<Expression>>,
    pub location: Location,
}

impl FunctionCall {
    pub fn arguments(&self) -> Vec<&Expression> {
        self.sub_params
            .iter()
            .chain(self.params.iter())
            .flatten()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    pub items: Vec<Expression>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    pub items: Vec<Expression>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grouped {
    pub inner: Box<Expression>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    Symbol { text: String, location: Location },
    /// `\op/` used infix
    Command(CommandExpression),
}

impl Operator {
    pub fn text(&self) -> String {
        match self {
            Operator::Symbol { text, .. } => text.clone(),
            Operator::Command(command) => format!("{}/", command.signature()),
        }
    }

    pub fn location(&self) -> Location {
        match self {
            Operator::Symbol { location, .. } => *location,
            Operator::Command(command) => command.location,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub operator: Operator,
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prefix {
    pub operator: Operator,
    pub operand: Box<Expression>,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Is,
    In,
    NotIn,
    Equals,
    NotEquals,
    As,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RelationKind::Is => "is",
            RelationKind::In => "in",
            RelationKind::NotIn => "not in",
            RelationKind::Equals => "=",
            RelationKind::NotEquals => "!=",
            RelationKind::As => "as",
        };
        write!(f, "{text}")
    }
}

/// `lhs, ... <kind> rhs, ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub kind: RelationKind,
    pub lhs: Vec<Expression>,
    pub rhs: Vec<Expression>,
    pub location: Location,
}

/// `lhs := rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
    pub location: Location,
}

/// A `"..."` literal; `text` excludes the quotes
#[derive(Debug, Clone, PartialEq)]
pub struct TextExpression {
    pub text: String,
    pub location: Location,
}

impl Default for Expression {
    fn default() -> Self {
        Expression::Empty(Location::default())
    }
}

impl Expression {
    pub fn location(&self) -> Location {
        match self {
            Expression::Name(name) | Expression::VariadicName(name) => name.location,
            Expression::Command(command) => command.location,
            Expression::Function(function) => function.location,
            Expression::FunctionCall(call) => call.location,
            Expression::Tuple(tuple) => tuple.location,
            Expression::Set(set) => set.location,
            Expression::Grouped(grouped) => grouped.location,
            Expression::Operation(operation) => operation.location,
            Expression::Prefix(prefix) => prefix.location,
            Expression::Relation(relation) => relation.location,
            Expression::Assignment(assignment) => assignment.location,
            Expression::Text(text) => text.location,
            Expression::Empty(location) => *location,
        }
    }

    /// The signature this expression names when used as a definition reference:
    /// `\a.b:c` for commands, `\f` for `\f(...)`, `\op/` or the symbol for operations.
    pub fn signature(&self) -> Option<String> {
        match self {
            Expression::Command(command) => Some(command.signature()),
            Expression::FunctionCall(call) if call.command => Some(format!("\\{}", call.name)),
            Expression::Operation(operation) => Some(operation.operator.text()),
            Expression::Prefix(prefix) => Some(prefix.operator.text()),
            Expression::Grouped(grouped) => grouped.inner.signature(),
            _ => None,
        }
    }

    /// Names bound by this expression when it is used as a pattern (`f(x)`, `(a, b)`, `x`)
    pub fn bound_names(&self) -> Vec<String> {
        match self {
            Expression::Name(name) | Expression::VariadicName(name) => vec![name.name.clone()],
            Expression::Function(function) => std::iter::once(function.name.clone())
                .chain(function.params.iter().flat_map(Expression::bound_names))
                .collect(),
            Expression::FunctionCall(call) if !call.command => vec![call.name.clone()],
            Expression::Tuple(tuple) => tuple.items.iter().flat_map(Expression::bound_names).collect(),
            Expression::Grouped(grouped) => grouped.inner.bound_names(),
            _ => vec![],
        }
    }

    /// Immediate children, in source order
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Name(_)
            | Expression::VariadicName(_)
            | Expression::Text(_)
            | Expression::Empty(_) => vec![],
            Expression::Command(command) => command.arguments(),
            Expression::Function(function) => function.params.iter().collect(),
            Expression::FunctionCall(call) => call.arguments(),
            Expression::Tuple(tuple) => tuple.items.iter().collect(),
            Expression::Set(set) => set.items.iter().collect(),
            Expression::Grouped(grouped) => vec![grouped.inner.as_ref()],
            Expression::Operation(operation) => {
                let mut children = Vec::new();
                if let Operator::Command(command) = &operation.operator {
                    children.extend(command.arguments());
                }
                children.push(operation.lhs.as_ref());
                children.push(operation.rhs.as_ref());
                children
            }
            Expression::Prefix(prefix) => vec![prefix.operand.as_ref()],
            Expression::Relation(relation) => {
                relation.lhs.iter().chain(relation.rhs.iter()).collect()
            }
            Expression::Assignment(assignment) => {
                vec![assignment.lhs.as_ref(), assignment.rhs.as_ref()]
            }
        }
    }

    /// Pre-order traversal
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expression)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Every signature referenced anywhere in this expression, in source order
    pub fn signatures_within(&self) -> Vec<String> {
        let mut signatures = Vec::new();
        self.walk(&mut |expression| {
            if matches!(expression, Expression::Grouped(_)) {
                return;
            }
            if let Some(signature) = expression.signature() {
                signatures.push(signature);
            }
        });
        signatures
    }

    /// Replace free names according to `replacements`
    pub fn substitute(&self, replacements: &HashMap<String, Expression>) -> Expression {
        let sub_all = |items: &[Expression]| -> Vec<Expression> {
            items.iter().map(|e| e.substitute(replacements)).collect()
        };
        let sub_opt = |items: &Option<Vec<Expression>>| items.as_deref().map(sub_all);

        match self {
            Expression::Name(name) => replacements
                .get(&name.name)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            Expression::VariadicName(_) | Expression::Text(_) | Expression::Empty(_) => {
                self.clone()
            }
            Expression::Command(command) => Expression::Command(command.substitute(replacements)),
            Expression::Function(function) => {
                let name = match replacements.get(&function.name) {
                    Some(Expression::Name(renamed)) => renamed.name.clone(),
                    _ => function.name.clone(),
                };
                Expression::Function(Function {
                    name,
                    params: sub_all(&function.params),
                    location: function.location,
                })
            }
            Expression::FunctionCall(call) => {
                let name = match replacements.get(&call.name) {
                    Some(Expression::Name(renamed)) if !call.command => renamed.name.clone(),
                    _ => call.name.clone(),
                };
                Expression::FunctionCall(FunctionCall {
                    name,
                    command: call.command,
                    sub_params: sub_opt(&call.sub_params),
                    params: sub_opt(&call.params),
                    location: call.location,
                })
            }
            Expression::Tuple(tuple) => Expression::Tuple(Tuple {
                items: sub_all(&tuple.items),
                location: tuple.location,
            }),
            Expression::Set(set) => Expression::Set(Set {
                items: sub_all(&set.items),
                location: set.location,
            }),
            Expression::Grouped(grouped) => Expression::Grouped(Grouped {
                inner: Box::new(grouped.inner.substitute(replacements)),
                location: grouped.location,
            }),
            Expression::Operation(operation) => Expression::Operation(Operation {
                operator: operation.operator.substitute(replacements),
                lhs: Box::new(operation.lhs.substitute(replacements)),
                rhs: Box::new(operation.rhs.substitute(replacements)),
                location: operation.location,
            }),
            Expression::Prefix(prefix) => Expression::Prefix(Prefix {
                operator: prefix.operator.substitute(replacements),
                operand: Box::new(prefix.operand.substitute(replacements)),
                location: prefix.location,
            }),
            Expression::Relation(relation) => Expression::Relation(Relation {
                kind: relation.kind,
                lhs: sub_all(&relation.lhs),
                rhs: sub_all(&relation.rhs),
                location: relation.location,
            }),
            Expression::Assignment(assignment) => Expression::Assignment(Assignment {
                lhs: Box::new(assignment.lhs.substitute(replacements)),
                rhs: Box::new(assignment.rhs.substitute(replacements)),
                location: assignment.location,
            }),
        }
    }

    /// Visit every location in the tree
    pub fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        match self {
            Expression::Name(name) | Expression::VariadicName(name) => f(&mut name.location),
            Expression::Command(command) => command.visit_locations(f),
            Expression::Function(function) => {
                f(&mut function.location);
                visit_all(&mut function.params, f);
            }
            Expression::FunctionCall(call) => {
                f(&mut call.location);
                for group in [&mut call.sub_params, &mut call.params].into_iter().flatten() {
                    visit_all(group, f);
                }
            }
            Expression::Tuple(tuple) => {
                f(&mut tuple.location);
                visit_all(&mut tuple.items, f);
            }
            Expression::Set(set) => {
                f(&mut set.location);
                visit_all(&mut set.items, f);
            }
            Expression::Grouped(grouped) => {
                f(&mut grouped.location);
                grouped.inner.visit_locations(f);
            }
            Expression::Operation(operation) => {
                f(&mut operation.location);
                operation.operator.visit_locations(f);
                operation.lhs.visit_locations(f);
                operation.rhs.visit_locations(f);
            }
            Expression::Prefix(prefix) => {
                f(&mut prefix.location);
                prefix.operator.visit_locations(f);
                prefix.operand.visit_locations(f);
            }
            Expression::Relation(relation) => {
                f(&mut relation.location);
                visit_all(&mut relation.lhs, f);
                visit_all(&mut relation.rhs, f);
            }
            Expression::Assignment(assignment) => {
                f(&mut assignment.location);
                assignment.lhs.visit_locations(f);
                assignment.rhs.visit_locations(f);
            }
            Expression::Text(text) => f(&mut text.location),
            Expression::Empty(location) => f(location),
        }
    }

    /// True for nodes that need parentheses when spliced into another expression
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            Expression::Operation(_)
                | Expression::Prefix(_)
                | Expression::Relation(_)
                | Expression::Assignment(_)
        )
    }
}

fn visit_all(items: &mut [Expression], f: &mut dyn FnMut(&mut Location)) {
    for item in items {
        item.visit_locations(f);
    }
}

impl CommandExpression {
    fn substitute(&self, replacements: &HashMap<String, Expression>) -> CommandExpression {
        let sub_opt = |items: &Option<Vec<Expression>>| {
            items
                .as_ref()
                .map(|items| items.iter().map(|e| e.substitute(replacements)).collect())
        };
        CommandExpression {
            names: self.names.clone(),
            square: sub_opt(&self.square),
            sub: sub_opt(&self.sub),
            sup: sub_opt(&self.sup),
            curly: sub_opt(&self.curly),
            named: self
                .named
                .iter()
                .map(|named| NamedGroup {
                    name: named.name.clone(),
                    params: named.params.iter().map(|e| e.substitute(replacements)).collect(),
                })
                .collect(),
            paren: sub_opt(&self.paren),
            location: self.location,
        }
    }

    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        f(&mut self.location);
        for group in [
            &mut self.square,
            &mut self.sub,
            &mut self.sup,
            &mut self.curly,
            &mut self.paren,
        ]
        .into_iter()
        .flatten()
        {
            visit_all(group, f);
        }
        for named in &mut self.named {
            visit_all(&mut named.params, f);
        }
    }
}

impl Operator {
    fn substitute(&self, replacements: &HashMap<String, Expression>) -> Operator {
        match self {
            Operator::Symbol { .. } => self.clone(),
            Operator::Command(command) => Operator::Command(command.substitute(replacements)),
        }
    }

    fn visit_locations(&mut self, f: &mut dyn FnMut(&mut Location)) {
        match self {
            Operator::Symbol { location, .. } => f(location),
            Operator::Command(command) => command.visit_locations(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(text: &str) -> Expression {
        Expression::Name(NameExpression {
            name: text.to_string(),
            location: Location::default(),
        })
    }

    fn command(names: &[&str]) -> CommandExpression {
        CommandExpression {
            names: names.iter().map(|n| n.to_string()).collect(),
            ..CommandExpression::default()
        }
    }

    #[test]
    fn test_command_signature_includes_named_groups() {
        let mut cmd = command(&["integral", "of"]);
        cmd.named.push(NamedGroup {
            name: "from".to_string(),
            params: vec![name("a")],
        });
        assert_eq!(cmd.signature(), "\\integral.of:from");
    }

    #[test]
    fn test_signatures_within_visits_nested_arguments() {
        let mut outer = command(&["f"]);
        outer.curly = Some(vec![Expression::Command(command(&["g"]))]);
        let relation = Expression::Relation(Relation {
            kind: RelationKind::Is,
            lhs: vec![name("x")],
            rhs: vec![Expression::Command(outer)],
            location: Location::default(),
        });
        assert_eq!(relation.signatures_within(), vec!["\\f", "\\g"]);
    }

    #[test]
    fn test_substitute_replaces_names() {
        let relation = Expression::Relation(Relation {
            kind: RelationKind::Is,
            lhs: vec![name("x")],
            rhs: vec![name("y")],
            location: Location::default(),
        });
        let mut replacements = HashMap::new();
        replacements.insert("x".to_string(), name("a"));
        match relation.substitute(&replacements) {
            Expression::Relation(relation) => assert_eq!(relation.lhs, vec![name("a")]),
            other => panic!("expected a relation, found {other:?}"),
        }
    }
}
