//! Rust AST IR for code generation.
//!
//! This module defines the Rust syntax subset the tool wrappers need:
//! - RsType: type expressions (`String`, `Option<String>`, `&str`)
//! - RsExpr: expressions (calls, `format!`, `match`, closures)
//! - RsStmt: statements (`let`, `if let`, comments)
//! - RsFn / RsStruct / RsImpl / RsModule: items

/// Rust type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsType {
    /// Plain path: `String`, `reqwest::RequestBuilder`
    Path(String),
    /// Generic application: `Option<String>`, `Result<Value, String>`
    Generic { name: String, args: Vec<RsType> },
    /// Shared reference: `&str`
    Ref(Box<RsType>),
}

impl RsType {
    pub fn path(name: impl Into<String>) -> Self {
        RsType::Path(name.into())
    }

    pub fn generic(name: impl Into<String>, args: Vec<RsType>) -> Self {
        RsType::Generic {
            name: name.into(),
            args,
        }
    }

    pub fn reference(inner: RsType) -> Self {
        RsType::Ref(Box::new(inner))
    }
}

/// Piece of a `format!` template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatPart {
    /// Literal text, escaped on emission (braces doubled)
    Literal(String),
    /// A `{}` slot filled by the expression
    Arg(RsExpr),
}

/// Rust expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsExpr {
    /// Identifier or path: `url`, `BASE_URL`, `Self::new`
    Ident(String),
    /// String literal: "GET"
    Str(String),
    /// Field access: `args.id`
    Field { base: Box<RsExpr>, name: String },
    /// Free function call: `dispatch(request)`
    Call { callee: String, args: Vec<RsExpr> },
    /// Method call: `self.client.get(&url)`
    MethodCall {
        receiver: Box<RsExpr>,
        method: String,
        args: Vec<RsExpr>,
    },
    /// `format!("...", args)`
    Format(Vec<FormatPart>),
    /// Borrow: `&url`
    Ref(Box<RsExpr>),
    /// Negation: `!value.is_empty()`
    Not(Box<RsExpr>),
    /// `.await` postfix
    Await(Box<RsExpr>),
    /// Closure: `|value| !value.is_empty()`
    Closure {
        params: Vec<String>,
        body: Box<RsExpr>,
    },
    /// Single-line conditional expression: `if c { a } else { b }`
    If {
        cond: Box<RsExpr>,
        then: Box<RsExpr>,
        otherwise: Box<RsExpr>,
    },
    /// Match expression with `pattern => expr` arms
    Match {
        scrutinee: Box<RsExpr>,
        arms: Vec<(String, RsExpr)>,
    },
}

impl RsExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        RsExpr::Ident(name.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        RsExpr::Str(value.into())
    }

    pub fn field(self, name: impl Into<String>) -> Self {
        RsExpr::Field {
            base: Box::new(self),
            name: name.into(),
        }
    }

    pub fn call(callee: impl Into<String>, args: Vec<RsExpr>) -> Self {
        RsExpr::Call {
            callee: callee.into(),
            args,
        }
    }

    pub fn method(self, method: impl Into<String>, args: Vec<RsExpr>) -> Self {
        RsExpr::MethodCall {
            receiver: Box::new(self),
            method: method.into(),
            args,
        }
    }

    pub fn referenced(self) -> Self {
        RsExpr::Ref(Box::new(self))
    }

    pub fn negated(self) -> Self {
        RsExpr::Not(Box::new(self))
    }

    pub fn awaited(self) -> Self {
        RsExpr::Await(Box::new(self))
    }
}

/// Rust statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsStmt {
    /// `let [mut] name[: ty] = value;`
    Let {
        name: String,
        mutable: bool,
        ty: Option<RsType>,
        value: RsExpr,
    },
    /// Expression statement: `expr;`
    Expr(RsExpr),
    /// Trailing expression without semicolon
    Tail(RsExpr),
    /// `if let pattern = value { body }`
    IfLet {
        pattern: String,
        value: RsExpr,
        body: Vec<RsStmt>,
    },
    /// Line comment
    Comment(String),
    /// Raw code, indented line by line
    Raw(String),
}

/// Struct field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsField {
    pub name: String,
    pub ty: RsType,
    /// Doc comment lines (an empty line emits a bare `///`)
    pub docs: Vec<String>,
    /// Attributes without `#[...]`: `serde(default)`
    pub attrs: Vec<String>,
    pub is_pub: bool,
}

/// Struct definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsStruct {
    pub name: String,
    pub docs: Vec<String>,
    pub derives: Vec<String>,
    pub fields: Vec<RsField>,
    pub is_pub: bool,
}

/// Function parameter: `Parameters(args): Parameters<GetUserArgs>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsParam {
    pub pattern: String,
    pub ty: RsType,
}

/// Function or method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsFn {
    pub name: String,
    pub docs: Vec<String>,
    pub attrs: Vec<String>,
    pub is_pub: bool,
    pub is_async: bool,
    /// `&self`, `&mut self`, or none for free functions
    pub receiver: Option<String>,
    pub params: Vec<RsParam>,
    pub ret: Option<RsType>,
    pub body: Vec<RsStmt>,
}

/// `impl [Trait for] Target { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsImpl {
    pub attrs: Vec<String>,
    pub trait_name: Option<String>,
    pub target: String,
    pub fns: Vec<RsFn>,
}

/// `const NAME: ty = value;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsConst {
    pub name: String,
    pub ty: RsType,
    pub value: RsExpr,
}

/// `use path::item;` or `use path::{a, b};`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsUse {
    pub path: String,
    pub items: Vec<String>,
}

/// Module-level item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsItem {
    Const(RsConst),
    Struct(RsStruct),
    Impl(RsImpl),
    Fn(RsFn),
}

/// A generated `pub mod` with its file header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsModule {
    /// Line comments emitted above the module
    pub header: Vec<String>,
    pub name: String,
    pub uses: Vec<RsUse>,
    pub items: Vec<RsItem>,
}
