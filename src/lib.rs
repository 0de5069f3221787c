//! The evaluation core of a tree-walking interpreter for a small
//! dynamically-typed scripting language. The crate consumes a pre-built
//! program AST (a list of statement nodes, usually deserialized from the
//! parser's JSON), walks it, and hands back the run's output fragments —
//! or the single diagnostic line that aborted it.

pub mod ast;
pub mod builtins;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod value;

pub use interpreter::{interp_program, Flags, Interpreter, ProgramResult, ResultKind, Signal};
pub use value::Value;
