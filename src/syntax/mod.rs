//! PHP syntax tree consumed by the analyzer.
//!
//! The tree is produced by an external parser and fed in either as built
//! values or as a serde (JSON) dump. Each node carries its source line and
//! any comments the parser attached to it. Dynamic constructs the analyzer
//! cannot resolve by name (variable variables, computed member names,
//! dynamic callees) are represented with `None` names and skipped by the
//! name-matching rules.

use serde::{Deserialize, Serialize};

/// Comment style, as classified by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
    /// `/** ... */`
    Doc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub kind: CommentKind,
    pub text: String,
    pub line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Trait,
}

impl TypeKind {
    /// Label used in diagnostics ("Rename Class 'X' ...").
    pub fn label(self) -> &'static str {
        match self {
            TypeKind::Class => "Class",
            TypeKind::Interface => "Interface",
            TypeKind::Trait => "Trait",
        }
    }
}

/// Modifiers on a class-like declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAttribs {
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub is_readonly: bool,
}

/// A declared parameter. Promoted parameters also declare an object
/// property and are exempt from the unused-parameter rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(default)]
    pub type_hint: Option<String>,
    #[serde(default)]
    pub promoted: bool,
    #[serde(default)]
    pub by_ref: bool,
    #[serde(default)]
    pub variadic: bool,
    #[serde(default)]
    pub default: Option<Node>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: None,
            promoted: false,
            by_ref: false,
            variadic: false,
            default: None,
        }
    }

    pub fn typed(name: impl Into<String>, type_hint: impl Into<String>) -> Self {
        Self {
            type_hint: Some(type_hint.into()),
            ..Self::new(name)
        }
    }

    pub fn promoted(mut self) -> Self {
        self.promoted = true;
        self
    }
}

/// A closure `use (...)` capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosureUse {
    pub name: String,
    #[serde(default)]
    pub by_ref: bool,
}

impl ClosureUse {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            by_ref: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatchClause {
    pub types: Vec<String>,
    #[serde(default)]
    pub var: Option<String>,
    pub body: Vec<Node>,
    pub line: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElseIf {
    pub cond: Node,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayItem {
    #[serde(default)]
    pub key: Option<Node>,
    pub value: Node,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeKind {
    Include,
    IncludeOnce,
    Require,
    RequireOnce,
}

impl IncludeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            IncludeKind::Include => "include",
            IncludeKind::IncludeOnce => "include_once",
            IncludeKind::Require => "require",
            IncludeKind::RequireOnce => "require_once",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitKind {
    Exit,
    Die,
}

impl ExitKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ExitKind::Exit => "exit",
            ExitKind::Die => "die",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    And,
    Or,
    Eq,
    NotEq,
    Identical,
    NotIdentical,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Concat,
    Coalesce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Not,
    Neg,
}

/// One element of the parsed tree: a kind, a source line, and attached
/// comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub line: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeKind {
    /// Root of one source unit.
    Program { stmts: Vec<Node> },

    // Declarations that open scopes.
    Namespace {
        name: Option<String>,
        body: Vec<Node>,
    },
    TypeDecl {
        kind: TypeKind,
        name: Option<String>,
        attribs: TypeAttribs,
        members: Vec<Node>,
    },
    Function {
        name: String,
        params: Vec<Param>,
        return_type: Option<String>,
        body: Vec<Node>,
    },
    Method {
        name: String,
        visibility: Visibility,
        is_static: bool,
        is_abstract: bool,
        is_final: bool,
        params: Vec<Param>,
        return_type: Option<String>,
        /// `None` for abstract and interface methods.
        body: Option<Vec<Node>>,
    },
    Closure {
        params: Vec<Param>,
        uses: Vec<ClosureUse>,
        body: Vec<Node>,
    },

    // Member and constant declarations.
    Property {
        name: String,
        visibility: Visibility,
        is_static: bool,
        default: Option<Box<Node>>,
    },
    ClassConst {
        name: String,
        visibility: Visibility,
        value: Box<Node>,
    },
    Const {
        name: String,
        value: Box<Node>,
    },

    // Statements.
    If {
        cond: Box<Node>,
        then: Vec<Node>,
        elseifs: Vec<ElseIf>,
        else_body: Option<Vec<Node>>,
    },
    While {
        cond: Box<Node>,
        body: Vec<Node>,
    },
    DoWhile {
        cond: Box<Node>,
        body: Vec<Node>,
    },
    For {
        init: Vec<Node>,
        cond: Option<Box<Node>>,
        step: Vec<Node>,
        body: Vec<Node>,
    },
    Foreach {
        expr: Box<Node>,
        key_var: Option<Box<Node>>,
        value_var: Box<Node>,
        body: Vec<Node>,
    },
    TryCatch {
        body: Vec<Node>,
        catches: Vec<CatchClause>,
        finally: Option<Vec<Node>>,
    },
    Return { expr: Option<Box<Node>> },
    Echo { exprs: Vec<Node> },
    Global { names: Vec<String> },
    Goto { label: String },
    Include {
        kind: IncludeKind,
        expr: Box<Node>,
    },
    Exit {
        kind: ExitKind,
        expr: Option<Box<Node>>,
    },

    // Expressions.
    Assign {
        target: Box<Node>,
        value: Box<Node>,
    },
    Variable {
        /// `None` for variable variables (`$$x`).
        name: Option<String>,
    },
    PropertyFetch {
        target: Box<Node>,
        /// `None` for computed names (`$obj->{$expr}`).
        name: Option<String>,
    },
    StaticPropertyFetch {
        class: Option<String>,
        name: Option<String>,
    },
    MethodCall {
        target: Box<Node>,
        name: Option<String>,
        args: Vec<Node>,
    },
    StaticCall {
        class: Option<String>,
        name: Option<String>,
        args: Vec<Node>,
    },
    FuncCall {
        /// `None` for dynamic callees (`$fn(...)`).
        name: Option<String>,
        args: Vec<Node>,
    },
    New {
        class_name: Option<String>,
        /// The embedded declaration for `new class { ... }`.
        anon_class: Option<Box<Node>>,
        args: Vec<Node>,
    },
    ArrayLit { items: Vec<ArrayItem> },
    ArrayDimFetch {
        array: Box<Node>,
        index: Option<Box<Node>>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Node>,
    },
    ErrorSuppress { expr: Box<Node> },
    Eval { expr: Box<Node> },

    // Literals.
    Int { value: i64 },
    Float { value: f64 },
    Str { value: String },
    Bool { value: bool },
    Null,
}

impl Node {
    pub fn new(kind: NodeKind, line: u32) -> Self {
        Self {
            kind,
            line,
            comments: Vec::new(),
        }
    }

    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }

    pub fn with_doc(self, text: impl Into<String>, line: u32) -> Self {
        self.with_comment(Comment {
            kind: CommentKind::Doc,
            text: text.into(),
            line,
        })
    }

    /// True for nodes whose whole purpose is naming a constant; literal
    /// collection is suspended inside them.
    pub fn is_const_definition(&self) -> bool {
        matches!(self.kind, NodeKind::Const { .. } | NodeKind::ClassConst { .. })
    }

    pub fn is_function_like(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Function { .. } | NodeKind::Method { .. } | NodeKind::Closure { .. }
        )
    }

    pub fn is_type_decl(&self) -> bool {
        matches!(self.kind, NodeKind::TypeDecl { .. })
    }

    /// Decodes a tree from an external parser's JSON dump.
    pub fn from_json(json: &str) -> crate::error::Result<Node> {
        Ok(serde_json::from_str(json)?)
    }

    /// Child nodes in source order. Parameter defaults and array keys are
    /// part of the tree and included.
    pub fn children(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        self.push_children(&mut out);
        out
    }

    fn push_children<'a>(&'a self, out: &mut Vec<&'a Node>) {
        fn params<'a>(list: &'a [Param], out: &mut Vec<&'a Node>) {
            for param in list {
                if let Some(default) = &param.default {
                    out.push(default);
                }
            }
        }

        match &self.kind {
            NodeKind::Program { stmts } | NodeKind::Echo { exprs: stmts } => {
                out.extend(stmts.iter());
            }
            NodeKind::Namespace { body, .. } => out.extend(body.iter()),
            NodeKind::TypeDecl { members, .. } => out.extend(members.iter()),
            NodeKind::Function { params: p, body, .. } => {
                params(p, out);
                out.extend(body.iter());
            }
            NodeKind::Method { params: p, body, .. } => {
                params(p, out);
                if let Some(body) = body {
                    out.extend(body.iter());
                }
            }
            NodeKind::Closure { params: p, body, .. } => {
                params(p, out);
                out.extend(body.iter());
            }
            NodeKind::Property { default, .. } => {
                if let Some(default) = default {
                    out.push(default);
                }
            }
            NodeKind::ClassConst { value, .. } | NodeKind::Const { value, .. } => {
                out.push(value);
            }
            NodeKind::If {
                cond,
                then,
                elseifs,
                else_body,
            } => {
                out.push(cond);
                out.extend(then.iter());
                for arm in elseifs {
                    out.push(&arm.cond);
                    out.extend(arm.body.iter());
                }
                if let Some(body) = else_body {
                    out.extend(body.iter());
                }
            }
            NodeKind::While { cond, body } | NodeKind::DoWhile { cond, body } => {
                out.push(cond);
                out.extend(body.iter());
            }
            NodeKind::For {
                init,
                cond,
                step,
                body,
            } => {
                out.extend(init.iter());
                if let Some(cond) = cond {
                    out.push(cond);
                }
                out.extend(step.iter());
                out.extend(body.iter());
            }
            NodeKind::Foreach {
                expr,
                key_var,
                value_var,
                body,
            } => {
                out.push(expr);
                if let Some(key) = key_var {
                    out.push(key);
                }
                out.push(value_var);
                out.extend(body.iter());
            }
            NodeKind::TryCatch {
                body,
                catches,
                finally,
            } => {
                out.extend(body.iter());
                for clause in catches {
                    out.extend(clause.body.iter());
                }
                if let Some(body) = finally {
                    out.extend(body.iter());
                }
            }
            NodeKind::Return { expr } | NodeKind::Exit { expr, .. } => {
                if let Some(expr) = expr {
                    out.push(expr);
                }
            }
            NodeKind::Include { expr, .. }
            | NodeKind::ErrorSuppress { expr }
            | NodeKind::Eval { expr }
            | NodeKind::Unary { expr, .. } => out.push(expr),
            NodeKind::Assign { target, value } => {
                out.push(target);
                out.push(value);
            }
            NodeKind::PropertyFetch { target, .. } => out.push(target),
            NodeKind::MethodCall { target, args, .. } => {
                out.push(target);
                out.extend(args.iter());
            }
            NodeKind::StaticCall { args, .. } | NodeKind::FuncCall { args, .. } => {
                out.extend(args.iter());
            }
            NodeKind::New {
                anon_class, args, ..
            } => {
                if let Some(decl) = anon_class {
                    out.push(decl);
                }
                out.extend(args.iter());
            }
            NodeKind::ArrayLit { items } => {
                for item in items {
                    if let Some(key) = &item.key {
                        out.push(key);
                    }
                    out.push(&item.value);
                }
            }
            NodeKind::ArrayDimFetch { array, index } => {
                out.push(array);
                if let Some(index) = index {
                    out.push(index);
                }
            }
            NodeKind::Binary { lhs, rhs, .. } => {
                out.push(lhs);
                out.push(rhs);
            }
            NodeKind::Global { .. }
            | NodeKind::Goto { .. }
            | NodeKind::Variable { .. }
            | NodeKind::StaticPropertyFetch { .. }
            | NodeKind::Int { .. }
            | NodeKind::Float { .. }
            | NodeKind::Str { .. }
            | NodeKind::Bool { .. }
            | NodeKind::Null => {}
        }
    }
}

// Builder shorthands used by tests and parser adapters.
impl Node {
    pub fn program(stmts: Vec<Node>) -> Node {
        Node::new(NodeKind::Program { stmts }, 1)
    }

    pub fn int(value: i64, line: u32) -> Node {
        Node::new(NodeKind::Int { value }, line)
    }

    pub fn float(value: f64, line: u32) -> Node {
        Node::new(NodeKind::Float { value }, line)
    }

    pub fn string(value: impl Into<String>, line: u32) -> Node {
        Node::new(
            NodeKind::Str {
                value: value.into(),
            },
            line,
        )
    }

    pub fn var(name: impl Into<String>, line: u32) -> Node {
        Node::new(
            NodeKind::Variable {
                name: Some(name.into()),
            },
            line,
        )
    }

    pub fn assign(target: Node, value: Node, line: u32) -> Node {
        Node::new(
            NodeKind::Assign {
                target: Box::new(target),
                value: Box::new(value),
            },
            line,
        )
    }

    pub fn call(name: impl Into<String>, args: Vec<Node>, line: u32) -> Node {
        Node::new(
            NodeKind::FuncCall {
                name: Some(name.into()),
                args,
            },
            line,
        )
    }

    pub fn this(line: u32) -> Node {
        Node::var("this", line)
    }

    pub fn prop_fetch(target: Node, name: impl Into<String>, line: u32) -> Node {
        Node::new(
            NodeKind::PropertyFetch {
                target: Box::new(target),
                name: Some(name.into()),
            },
            line,
        )
    }

    pub fn method_call(
        target: Node,
        name: impl Into<String>,
        args: Vec<Node>,
        line: u32,
    ) -> Node {
        Node::new(
            NodeKind::MethodCall {
                target: Box::new(target),
                name: Some(name.into()),
                args,
            },
            line,
        )
    }

    pub fn func(name: impl Into<String>, params: Vec<Param>, body: Vec<Node>, line: u32) -> Node {
        Node::new(
            NodeKind::Function {
                name: name.into(),
                params,
                return_type: None,
                body,
            },
            line,
        )
    }

    pub fn method(
        name: impl Into<String>,
        visibility: Visibility,
        params: Vec<Param>,
        body: Vec<Node>,
        line: u32,
    ) -> Node {
        Node::new(
            NodeKind::Method {
                name: name.into(),
                visibility,
                is_static: false,
                is_abstract: false,
                is_final: false,
                params,
                return_type: None,
                body: Some(body),
            },
            line,
        )
    }

    pub fn property(name: impl Into<String>, visibility: Visibility, line: u32) -> Node {
        Node::new(
            NodeKind::Property {
                name: name.into(),
                visibility,
                is_static: false,
                default: None,
            },
            line,
        )
    }

    pub fn class(name: impl Into<String>, members: Vec<Node>, line: u32) -> Node {
        Node::new(
            NodeKind::TypeDecl {
                kind: TypeKind::Class,
                name: Some(name.into()),
                attribs: TypeAttribs::default(),
                members,
            },
            line,
        )
    }

    pub fn closure(params: Vec<Param>, uses: Vec<ClosureUse>, body: Vec<Node>, line: u32) -> Node {
        Node::new(NodeKind::Closure { params, uses, body }, line)
    }
}
