use crate::ast::Stmt;
use crate::environment::SharedEnvironment;
use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

/// A collection is the language's sole aggregate type: a mutable mapping
/// from string key to value, insertion-order preserved. The map sits behind
/// its own shared cell so every alias of the collection observes mutations
/// made through any other alias.
pub type SharedCollection = Rc<RefCell<IndexMap<String, Value>>>;

/// Value is the runtime representation of everything a program can compute.
/// Integers are arbitrary precision; floats are IEEE-754 doubles and may be
/// infinite or NaN.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(BigInt),
    Float(f64),
    String(String),
    Collection(SharedCollection),
    Closure(Rc<Closure>),
}

/// The runtime representation of a closure expression. We take the function
/// syntax node and convert it to a value that holds on to the surrounding
/// environment where the function was declared — the environment active at
/// declaration time, not call time. Each call later hangs a fresh frame off
/// that captured environment, so the closure keeps its lexical scope alive
/// for as long as the closure itself lives.
#[derive(Debug)]
pub struct Closure {
    pub params: Vec<String>,
    pub body: Rc<Vec<Stmt>>,
    pub env: SharedEnvironment,
}

/// A value in the numeric domain, after booleans have been folded in as
/// integers 0/1. Arithmetic promotes `Int` to `Float` whenever either
/// operand is a float.
pub enum Number {
    Int(BigInt),
    Float(f64),
}

impl Number {
    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Int(i) => big_to_f64(i),
            Number::Float(f) => *f,
        }
    }
}

fn big_to_f64(i: &BigInt) -> f64 {
    i.to_f64().unwrap_or(if i.is_negative() {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    })
}

impl Value {
    /// The user-observable kind tag, as returned by `type(...)` and quoted
    /// in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Collection(_) => "collection",
            Value::Closure(_) => "closure",
        }
    }

    /// All values are partitioned into truthy and falsy. Zero of either
    /// numeric kind, `false`, the empty string, the empty collection, and
    /// `null` are falsy; everything else — closures included — is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Integer(i) => !i.is_zero(),
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Collection(map) => !map.borrow().is_empty(),
            Value::Closure(_) => true,
        }
    }

    /// Booleans count as numbers with value 1/0; this is deliberate and
    /// user-observable (`true + 1 == 2`).
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Boolean(b) => Some(Number::Int(BigInt::from(*b as u8))),
            Value::Integer(i) => Some(Number::Int(i.clone())),
            Value::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    /// The integer-like subset: operands of bitwise operators and string
    /// indices.
    pub fn as_integer(&self) -> Option<BigInt> {
        match self {
            Value::Boolean(b) => Some(BigInt::from(*b as u8)),
            Value::Integer(i) => Some(i.clone()),
            _ => None,
        }
    }

    /// Any scalar whose string form can key a collection. Collections and
    /// closures never qualify, and neither does null.
    pub fn is_subscriptable_key(&self) -> bool {
        matches!(
            self,
            Value::Boolean(_) | Value::Integer(_) | Value::Float(_) | Value::String(_)
        )
    }

    /// Equality is always defined. Numbers compare by value across the
    /// integer/float/boolean domains, strings by contents, collections by
    /// deep structural equality, closures by identity; any other pairing of
    /// kinds is unequal.
    pub fn is_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Collection(a), Value::Collection(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, va)| b.get(key).is_some_and(|vb| va.is_equal(vb)))
            }
            _ => match (self.as_number(), other.as_number()) {
                (Some(Number::Int(a)), Some(Number::Int(b))) => a == b,
                (Some(a), Some(b)) => a.to_f64() == b.to_f64(),
                _ => false,
            },
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(BigInt::from(i))
    }
}

impl From<BigInt> for Value {
    fn from(i: BigInt) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// Canonical float text: finite floats always carry a decimal point so the
/// kind stays visible (`1.0`, not `1`), and non-finite values render as
/// `inf` / `-inf` / `nan`. The underlying formatting is shortest-round-trip,
/// so `float(str(f))` gives back `f` for any finite `f`.
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        let text = if f > 0.0 { "inf" } else { "-inf" };
        return text.to_string();
    }
    let text = f.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

/// String values render quoted inside a collection and bare at top level,
/// the same split `str(...)` and `print(...)` expose.
fn entry_text(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        other => other.to_string(),
    }
}

/// The canonical string form of every value: what `str(...)` returns and
/// `print(...)` appends to the output sink.
impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::String(s) => f.write_str(s),
            Value::Collection(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "'{key}': {}", entry_text(value))?;
                }
                f.write_str("}")
            }
            Value::Closure(closure) => write!(f, "<closure at {:p}>", Rc::as_ptr(closure)),
        }
    }
}
