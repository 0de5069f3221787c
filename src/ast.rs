use indexmap::IndexMap;
use serde::Deserialize;
use std::rc::Rc;

/// Expr is one of the two node families in the Abstract Syntax Tree (AST).
/// The parser ships nodes as `kind`-tagged mappings, so the enum deserializes
/// with the kind string selecting the variant. Every node carries the source
/// line it came from; diagnostics are keyed to it. Nodes built by hand (in
/// tests, or by an embedding host) may omit `line`, which then defaults to 0.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Expr {
    Null {
        #[serde(default)]
        line: u32,
    },
    Boolean {
        value: bool,
        #[serde(default)]
        line: u32,
    },
    /// Integer and float literals arrive as decimal strings and are parsed
    /// into the numeric domain at evaluation time.
    Integer {
        value: String,
        #[serde(default)]
        line: u32,
    },
    Float {
        value: String,
        #[serde(default)]
        line: u32,
    },
    String {
        value: String,
        #[serde(default)]
        line: u32,
    },
    Variable {
        name: String,
        #[serde(default)]
        line: u32,
    },
    /// The l-value spelling of a bare name. The parser only emits it in
    /// assignment-target position; it resolves exactly like `Variable`.
    Identifier {
        name: String,
        #[serde(default)]
        line: u32,
    },
    /// A collection literal. Keys are already plain strings; values are
    /// evaluated in declaration order, which the collection preserves.
    Collection {
        value: IndexMap<String, Expr>,
        #[serde(default)]
        line: u32,
    },
    /// A function literal. The body is shared, not copied, when the closure
    /// value capturing it is built.
    Closure {
        params: Vec<String>,
        body: Rc<Vec<Stmt>>,
        #[serde(default)]
        line: u32,
    },
    /// Dotted member access: `c.a`.
    Attribute {
        collection: Box<Expr>,
        attribute: String,
        #[serde(default)]
        line: u32,
    },
    /// Bracketed member access: `c[k]`. Also does string indexing.
    Subscriptor {
        collection: Box<Expr>,
        expr: Box<Expr>,
        #[serde(default)]
        line: u32,
    },
    Unop {
        op: String,
        expr: Box<Expr>,
        #[serde(default)]
        line: u32,
    },
    Binop {
        op: String,
        e1: Box<Expr>,
        e2: Box<Expr>,
        #[serde(default)]
        line: u32,
    },
    Call {
        fun: Box<Expr>,
        args: Vec<Expr>,
        #[serde(default)]
        line: u32,
    },
    Ternary {
        test: Box<Expr>,
        #[serde(rename = "trueExpr")]
        true_expr: Box<Expr>,
        #[serde(rename = "falseExpr")]
        false_expr: Box<Expr>,
        #[serde(default)]
        line: u32,
    },
    /// Never produced by deserialization; hand-built ASTs use it to exercise
    /// the unknown-expression diagnostic.
    #[serde(skip)]
    Unknown { kind: String, line: u32 },
}

impl Expr {
    pub fn line(&self) -> u32 {
        match self {
            Expr::Null { line }
            | Expr::Boolean { line, .. }
            | Expr::Integer { line, .. }
            | Expr::Float { line, .. }
            | Expr::String { line, .. }
            | Expr::Variable { line, .. }
            | Expr::Identifier { line, .. }
            | Expr::Collection { line, .. }
            | Expr::Closure { line, .. }
            | Expr::Attribute { line, .. }
            | Expr::Subscriptor { line, .. }
            | Expr::Unop { line, .. }
            | Expr::Binop { line, .. }
            | Expr::Call { line, .. }
            | Expr::Ternary { line, .. }
            | Expr::Unknown { line, .. } => *line,
        }
    }

    /// The wire-format kind string, as it appears in diagnostics.
    pub fn kind_name(&self) -> &str {
        match self {
            Expr::Null { .. } => "null",
            Expr::Boolean { .. } => "boolean",
            Expr::Integer { .. } => "integer",
            Expr::Float { .. } => "float",
            Expr::String { .. } => "string",
            Expr::Variable { .. } => "variable",
            Expr::Identifier { .. } => "identifier",
            Expr::Collection { .. } => "collection",
            Expr::Closure { .. } => "closure",
            Expr::Attribute { .. } => "attribute",
            Expr::Subscriptor { .. } => "subscriptor",
            Expr::Unop { .. } => "unop",
            Expr::Binop { .. } => "binop",
            Expr::Call { .. } => "call",
            Expr::Ternary { .. } => "ternary",
            Expr::Unknown { kind, .. } => kind,
        }
    }
}

/// Stmt nodes sit above expression nodes in the tree. A program is a list of
/// them, and every block (function body, loop body, if arm) is again a list.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Stmt {
    /// An expression evaluated for its effect; the value is discarded.
    Static {
        expr: Expr,
        #[serde(default)]
        line: u32,
    },
    /// `a = b = c = expr`: one evaluation of `expr`, assigned to every
    /// target left to right.
    Assignment {
        #[serde(rename = "assignArr")]
        targets: Vec<Expr>,
        expr: Expr,
        #[serde(default)]
        line: u32,
    },
    /// The if/else-if chain plus the else block (possibly empty).
    If {
        #[serde(rename = "truePartArr")]
        arms: Vec<IfArm>,
        #[serde(rename = "falsePart")]
        else_part: Vec<Stmt>,
        #[serde(default)]
        line: u32,
    },
    While {
        test: Expr,
        body: Vec<Stmt>,
        #[serde(default)]
        line: u32,
    },
    For {
        inits: Vec<Stmt>,
        test: Expr,
        updates: Vec<Stmt>,
        body: Vec<Stmt>,
        #[serde(default)]
        line: u32,
    },
    Delete {
        expr: Expr,
        #[serde(default)]
        line: u32,
    },
    Return {
        expr: Expr,
        #[serde(default)]
        line: u32,
    },
    Break {
        #[serde(default)]
        line: u32,
    },
    Continue {
        #[serde(default)]
        line: u32,
    },
    /// Never produced by deserialization; hand-built ASTs use it to exercise
    /// the unknown-statement diagnostic.
    #[serde(skip)]
    Unknown { kind: String, line: u32 },
}

/// One `(test, body)` arm of an if chain.
#[derive(Clone, Debug, Deserialize)]
pub struct IfArm {
    pub test: Expr,
    #[serde(rename = "part")]
    pub body: Vec<Stmt>,
}
