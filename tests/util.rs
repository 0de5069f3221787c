#![allow(dead_code)]
use rill::ast::{Expr, Stmt};
use rill::environment::{Environment, SharedEnvironment};
use rill::error::RuntimeError;
use rill::{interp_program, Flags, Interpreter, ProgramResult, ResultKind, Signal, Value};
use serde_json::Value as Json;

/// Deserializes a single `kind`-tagged expression node, the same way the
/// binary ingests parser output.
pub fn expr(node: Json) -> Expr {
    serde_json::from_value(node).expect("valid expression node")
}

pub fn stmt(node: Json) -> Stmt {
    serde_json::from_value(node).expect("valid statement node")
}

pub fn program(nodes: Json) -> Vec<Stmt> {
    serde_json::from_value(nodes).expect("valid program")
}

pub fn root() -> SharedEnvironment {
    Environment::root()
}

pub fn define(env: &SharedEnvironment, name: &str, value: Value) {
    env.borrow_mut().define(name.to_string(), value);
}

pub fn get(env: &SharedEnvironment, name: &str) -> Value {
    env.borrow().get(name).expect("defined variable")
}

/// Evaluates one expression against the given environment with a throwaway
/// interpreter.
pub fn eval_in(env: &SharedEnvironment, node: Json) -> Result<Value, RuntimeError> {
    Interpreter::new().evaluate(env, &expr(node))
}

/// Evaluates one expression against an empty root environment.
pub fn eval(node: Json) -> Result<Value, RuntimeError> {
    eval_in(&root(), node)
}

/// Executes one statement against the given environment.
pub fn exec_in(
    env: &SharedEnvironment,
    node: Json,
    flags: Flags,
) -> Result<Option<Signal>, RuntimeError> {
    Interpreter::new().execute(env, &stmt(node), flags)
}

pub const TOP_LEVEL: Flags = Flags {
    in_func: false,
    in_loop: false,
};

pub const IN_FUNC: Flags = Flags {
    in_func: true,
    in_loop: false,
};

pub fn run(nodes: Json) -> ProgramResult {
    interp_program(&program(nodes))
}

/// Runs a program and returns its output, asserting the run succeeded.
pub fn run_ok(nodes: Json) -> Vec<String> {
    let result = run(nodes);
    assert_eq!(
        result.kind,
        ResultKind::Ok,
        "program failed: {:?}",
        result.output
    );
    result.output
}

/// Runs a program and returns the diagnostic line, asserting the run failed.
pub fn run_err(nodes: Json) -> String {
    let result = run(nodes);
    assert_eq!(
        result.kind,
        ResultKind::Error,
        "program succeeded: {:?}",
        result.output
    );
    assert_eq!(result.output.len(), 1, "error output is the diagnostic only");
    result.output.into_iter().next().unwrap()
}

pub fn int(i: i64) -> Value {
    Value::from(i)
}

pub fn float(f: f64) -> Value {
    Value::from(f)
}

pub fn string(s: &str) -> Value {
    Value::from(s)
}

/// Deep user-level recursion needs more than a test thread's default stack;
/// run such programs on a thread with room to spare.
pub fn with_big_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(f)
        .expect("spawn test thread")
        .join()
        .expect("join test thread")
}
