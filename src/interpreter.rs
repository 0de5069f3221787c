use crate::ast::{Expr, Stmt};
use crate::builtins;
use crate::environment::{Environment, SharedEnvironment};
use crate::error::{fail, Result};
use crate::value::{Closure, Number, Value};
use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::{Pow, Signed, ToPrimitive, Zero};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Hard ceiling on concurrently active user-closure calls. The counter is
/// the observable recursion bound, not the host stack: hitting it is an
/// ordinary call-site diagnostic, never a crash.
const MAX_CALL_DEPTH: usize = 1_000;

/// Flags carried into every statement: whether it sits lexically inside a
/// function body and inside a loop body. `return` / `break` / `continue`
/// are rejected with a diagnostic when their flag is off.
#[derive(Clone, Copy, Debug, Default)]
pub struct Flags {
    pub in_func: bool,
    pub in_loop: bool,
}

/// The non-value result of a statement. Signals bubble up through enclosing
/// blocks until the right construct consumes them: a loop eats `Break` and
/// `Continue`, a function call eats `Return`. They are deliberately not
/// values and not errors — just a third leg of statement evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    Return(Value),
    Break,
    Continue,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Ok,
    Error,
}

/// What a program run hands back to the host: a kind tag and the ordered
/// output fragments. On an error the output holds exactly one entry, the
/// diagnostic line; joining the fragments is the host's business.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ProgramResult {
    pub kind: ResultKind,
    pub output: Vec<String>,
}

/// Interpreter takes in the AST produced by the parser and recursively
/// traverses it, building up values as it goes. It does a post-order
/// traversal: each node evaluates its children before doing its own work.
///
/// The two node families are handled by separate methods: statements run in
/// `execute`, expressions are evaluated in `evaluate`. The struct itself
/// only carries what must be shared across the whole run — the output sink
/// `print` appends to and the active user-call depth.
#[derive(Default)]
pub struct Interpreter {
    output: Vec<String>,
    depth: usize,
}

/// Evaluates a program AST against a fresh root environment and packages
/// the outcome. Any diagnostic aborts the run and replaces whatever output
/// had accumulated, so an error result carries the single diagnostic line.
pub fn interp_program(program: &[Stmt]) -> ProgramResult {
    let mut interpreter = Interpreter::new();
    let root = Environment::root();
    match interpreter.execute_block(&root, program, Flags::default()) {
        Ok(_) => ProgramResult {
            kind: ResultKind::Ok,
            output: interpreter.into_output(),
        },
        Err(error) => ProgramResult {
            kind: ResultKind::Error,
            output: vec![error.to_string()],
        },
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn into_output(self) -> Vec<String> {
        self.output
    }

    pub(crate) fn push_output(&mut self, fragment: String) {
        self.output.push(fragment);
    }

    /// Runs statements in order, stopping at the first signal and handing
    /// it to the caller.
    pub fn execute_block(
        &mut self,
        env: &SharedEnvironment,
        statements: &[Stmt],
        flags: Flags,
    ) -> Result<Option<Signal>> {
        for statement in statements {
            if let Some(signal) = self.execute(env, statement, flags)? {
                return Ok(Some(signal));
            }
        }
        Ok(None)
    }

    /// The statement analogue of `evaluate`. Statements produce no values;
    /// they produce either nothing or a control-flow signal.
    pub fn execute(
        &mut self,
        env: &SharedEnvironment,
        statement: &Stmt,
        flags: Flags,
    ) -> Result<Option<Signal>> {
        match statement {
            Stmt::Static { expr, .. } => {
                self.evaluate(env, expr)?;
                Ok(None)
            }
            Stmt::Assignment { targets, expr, .. } => {
                // The right-hand side is evaluated exactly once, then the
                // same value lands on every target left to right.
                let value = self.evaluate(env, expr)?;
                for target in targets {
                    self.assign(env, target, value.clone())?;
                }
                Ok(None)
            }
            Stmt::If {
                arms, else_part, ..
            } => {
                // One child frame serves whichever arm runs. Tests are
                // evaluated in the outer environment; bodies run in the
                // child, so their new bindings vanish with it.
                let scope = Environment::nested(env);
                for arm in arms {
                    if self.evaluate(env, &arm.test)?.is_truthy() {
                        return self.execute_block(&scope, &arm.body, flags);
                    }
                }
                self.execute_block(&scope, else_part, flags)
            }
            Stmt::While { test, body, .. } => {
                let scope = Environment::nested(env);
                let loop_flags = Flags {
                    in_func: flags.in_func,
                    in_loop: true,
                };
                while self.evaluate(env, test)?.is_truthy() {
                    match self.execute_block(&scope, body, loop_flags)? {
                        Some(Signal::Return(value)) => return Ok(Some(Signal::Return(value))),
                        Some(Signal::Break) => break,
                        Some(Signal::Continue) | None => {}
                    }
                }
                Ok(None)
            }
            Stmt::For {
                inits,
                test,
                updates,
                body,
                ..
            } => {
                // Unlike while, the test and the init/update statements all
                // live in the loop's child frame.
                let scope = Environment::nested(env);
                for init in inits {
                    self.execute(&scope, init, Flags::default())?;
                }
                let loop_flags = Flags {
                    in_func: flags.in_func,
                    in_loop: true,
                };
                while self.evaluate(&scope, test)?.is_truthy() {
                    match self.execute_block(&scope, body, loop_flags)? {
                        Some(Signal::Return(value)) => return Ok(Some(Signal::Return(value))),
                        // Break skips the updates too.
                        Some(Signal::Break) => break,
                        Some(Signal::Continue) | None => {
                            for update in updates {
                                self.execute(&scope, update, Flags::default())?;
                            }
                        }
                    }
                }
                Ok(None)
            }
            Stmt::Delete { expr, .. } => {
                let Some(key) = self.determine_attribute(env, expr)? else {
                    return fail(
                        expr.line(),
                        format!("cannot delete <{}>.", expr.kind_name()),
                    );
                };
                let (Expr::Attribute {
                    collection, line, ..
                }
                | Expr::Subscriptor {
                    collection, line, ..
                }) = expr
                else {
                    unreachable!("determine_attribute only accepts member accesses");
                };
                let map = match self.evaluate(env, collection)? {
                    Value::Collection(map) => map,
                    other => {
                        return fail(
                            *line,
                            format!(
                                "invalid collection type for attribute deletion '{key}': <{}>.",
                                other.kind()
                            ),
                        )
                    }
                };
                // shift_remove keeps the remaining keys in insertion order.
                if map.borrow_mut().shift_remove(&key).is_none() {
                    return fail(*line, format!("unknown attribute reference: '{key}'."));
                }
                Ok(None)
            }
            Stmt::Return { expr, .. } => {
                if !flags.in_func {
                    return fail(expr.line(), "return outside of function.");
                }
                let value = self.evaluate(env, expr)?;
                Ok(Some(Signal::Return(value)))
            }
            Stmt::Break { line } => {
                if !flags.in_loop {
                    return fail(*line, "break outside of loop.");
                }
                Ok(Some(Signal::Break))
            }
            Stmt::Continue { line } => {
                if !flags.in_loop {
                    return fail(*line, "continue outside of loop.");
                }
                Ok(Some(Signal::Continue))
            }
            Stmt::Unknown { kind, line } => {
                fail(*line, format!("unknown statement: <{kind}>."))
            }
        }
    }

    /// Evaluates an Expr tree node and produces a value. For each kind of
    /// node there is a corresponding chunk of code that knows how to turn
    /// that subtree into a `Value`.
    pub fn evaluate(&mut self, env: &SharedEnvironment, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Null { .. } => Ok(Value::Null),
            Expr::Boolean { value, .. } => Ok(Value::Boolean(*value)),
            Expr::String { value, .. } => Ok(Value::String(value.clone())),
            Expr::Integer { value, line } => match value.trim().parse::<BigInt>() {
                Ok(i) => Ok(Value::Integer(i)),
                Err(_) => fail(*line, format!("invalid integer literal: '{value}'.")),
            },
            Expr::Float { value, line } => match value.trim().parse::<f64>() {
                Ok(f) => Ok(Value::Float(f)),
                Err(_) => fail(*line, format!("invalid float literal: '{value}'.")),
            },
            Expr::Variable { name, line } | Expr::Identifier { name, line } => {
                self.lookup_variable(env, name, *line)
            }
            Expr::Collection { value, .. } => {
                let mut map = IndexMap::new();
                for (key, entry) in value {
                    map.insert(key.clone(), self.evaluate(env, entry)?);
                }
                Ok(Value::Collection(Rc::new(RefCell::new(map))))
            }
            Expr::Closure { params, body, .. } => Ok(Value::Closure(Rc::new(Closure {
                params: params.clone(),
                body: Rc::clone(body),
                env: Rc::clone(env),
            }))),
            Expr::Attribute {
                collection,
                attribute,
                line,
            } => {
                let map = match self.evaluate(env, collection)? {
                    Value::Collection(map) => map,
                    other => {
                        return fail(
                            *line,
                            format!(
                                "invalid collection type for attribute '{attribute}': <{}>.",
                                other.kind()
                            ),
                        )
                    }
                };
                // A missing attribute is not an error on read; it is null.
                let result = map.borrow().get(attribute).cloned().unwrap_or(Value::Null);
                Ok(result)
            }
            Expr::Subscriptor {
                collection,
                expr,
                line,
            } => self.eval_subscriptor(env, collection, expr, *line),
            Expr::Unop { op, expr, line } => self.eval_unop(env, op, expr, *line),
            Expr::Binop { op, e1, e2, line } => self.eval_binop(env, op, e1, e2, *line),
            Expr::Call { fun, args, line } => self.eval_call(env, fun, args, *line),
            Expr::Ternary {
                test,
                true_expr,
                false_expr,
                ..
            } => {
                // Only the selected arm is evaluated.
                if self.evaluate(env, test)?.is_truthy() {
                    self.evaluate(env, true_expr)
                } else {
                    self.evaluate(env, false_expr)
                }
            }
            Expr::Unknown { kind, line } => fail(*line, format!("unknown expression: <{kind}>.")),
        }
    }

    /// Walks the scope chain for the name. An unbound name that matches a
    /// built-in function still means something — it evaluates to an opaque
    /// descriptive string — and only then is it a reference error.
    fn lookup_variable(&self, env: &SharedEnvironment, name: &str, line: u32) -> Result<Value> {
        let resolved = env.borrow().get(name);
        if let Some(value) = resolved {
            return Ok(value);
        }
        if builtins::lookup(name).is_some() {
            return Ok(Value::String(format!("<built-in function {name}>")));
        }
        fail(line, format!("Variable '{name}' is not defined."))
    }

    fn eval_subscriptor(
        &mut self,
        env: &SharedEnvironment,
        collection: &Expr,
        key_expr: &Expr,
        line: u32,
    ) -> Result<Value> {
        let target = self.evaluate(env, collection)?;
        let key = self.evaluate(env, key_expr)?;
        match &target {
            Value::Collection(map) => {
                if !key.is_subscriptable_key() {
                    return fail(
                        line,
                        format!("invalid key type for attribute '{key}': <{}>.", key.kind()),
                    );
                }
                Ok(map
                    .borrow()
                    .get(&key.to_string())
                    .cloned()
                    .unwrap_or(Value::Null))
            }
            // String indexing with an integer-like key; negative indices
            // count from the end.
            Value::String(s) => match key.as_integer() {
                Some(index) => {
                    let length = s.chars().count() as i64;
                    let position = match index.to_i64() {
                        Some(i) if -length <= i && i < length => {
                            if i < 0 {
                                i + length
                            } else {
                                i
                            }
                        }
                        _ => {
                            return fail(
                                line,
                                format!("invalid string index for '{s}': {index}."),
                            )
                        }
                    };
                    let c = s.chars().nth(position as usize).expect("index in range");
                    Ok(Value::String(c.to_string()))
                }
                None => fail(
                    line,
                    format!(
                        "invalid collection type for attribute '{key}': <{}>.",
                        target.kind()
                    ),
                ),
            },
            _ => fail(
                line,
                format!(
                    "invalid collection type for attribute '{key}': <{}>.",
                    target.kind()
                ),
            ),
        }
    }

    fn eval_unop(
        &mut self,
        env: &SharedEnvironment,
        op: &str,
        operand: &Expr,
        line: u32,
    ) -> Result<Value> {
        match op {
            "!" => Ok(Value::Boolean(!self.evaluate(env, operand)?.is_truthy())),
            "~" => {
                let value = self.evaluate(env, operand)?;
                match value.as_integer() {
                    Some(i) => Ok(Value::Integer(-(i + 1i32))),
                    None => fail(
                        line,
                        format!("invalid operand type for '~': <{}>.", value.kind()),
                    ),
                }
            }
            "+" | "-" => {
                let value = self.evaluate(env, operand)?;
                let factor: i64 = if op == "-" { -1 } else { 1 };
                match value.as_number() {
                    Some(Number::Int(i)) => Ok(Value::Integer(i * factor)),
                    Some(Number::Float(f)) => Ok(Value::Float(f * factor as f64)),
                    None => fail(
                        line,
                        format!("invalid operand type for '{op}': <{}>.", value.kind()),
                    ),
                }
            }
            "++" | "--" => self.prefix(env, op, operand, line),
            _ => fail(line, format!("unknown operator {op}.")),
        }
    }

    /// Prefix increment/decrement: evaluate the operand, step it by one
    /// preserving its numeric tag, and write the result back through the
    /// l-value protocol. Only prefix forms exist in the language.
    fn prefix(
        &mut self,
        env: &SharedEnvironment,
        op: &str,
        operand: &Expr,
        line: u32,
    ) -> Result<Value> {
        let value = self.evaluate(env, operand)?;
        let step: i64 = if op == "++" { 1 } else { -1 };
        let stepped = match value.as_number() {
            Some(Number::Int(i)) => Value::Integer(i + step),
            Some(Number::Float(f)) => Value::Float(f + step as f64),
            None => {
                return fail(
                    line,
                    format!("invalid operand type for '{op}': <{}>.", value.kind()),
                )
            }
        };
        match self.assign(env, operand, stepped)? {
            Some(result) => Ok(result),
            None => fail(
                line,
                format!("invalid prefix syntax for {op}: <{}>.", value.kind()),
            ),
        }
    }

    fn eval_binop(
        &mut self,
        env: &SharedEnvironment,
        op: &str,
        e1: &Expr,
        e2: &Expr,
        line: u32,
    ) -> Result<Value> {
        match op {
            // The logic operators short-circuit, and they return the raw
            // deciding operand with its own truthiness — never a coerced
            // boolean. `0 || {}` is the empty collection, not false.
            "&&" => {
                let left = self.evaluate(env, e1)?;
                if !left.is_truthy() {
                    Ok(left)
                } else {
                    self.evaluate(env, e2)
                }
            }
            "||" => {
                let left = self.evaluate(env, e1)?;
                if left.is_truthy() {
                    Ok(left)
                } else {
                    self.evaluate(env, e2)
                }
            }
            "+" => {
                let left = self.evaluate(env, e1)?;
                let right = self.evaluate(env, e2)?;
                if let (Value::String(a), Value::String(b)) = (&left, &right) {
                    return Ok(Value::String(format!("{a}{b}")));
                }
                let (a, b) = number_pair(line, op, &left, &right)?;
                arithmetic(line, op, a, b)
            }
            "-" | "*" | "%" => {
                let left = self.evaluate(env, e1)?;
                let right = self.evaluate(env, e2)?;
                let (a, b) = number_pair(line, op, &left, &right)?;
                arithmetic(line, op, a, b)
            }
            "**" => {
                let left = self.evaluate(env, e1)?;
                let right = self.evaluate(env, e2)?;
                let (a, b) = number_pair(line, op, &left, &right)?;
                raise(line, op, a, b)
            }
            // Division always lands in the float domain.
            "/" => {
                let left = self.evaluate(env, e1)?;
                let right = self.evaluate(env, e2)?;
                let (a, b) = number_pair(line, op, &left, &right)?;
                Ok(Value::Float(a.to_f64() / b.to_f64()))
            }
            "<<" | ">>" | "&" | "|" | "^" => {
                let left = self.evaluate(env, e1)?;
                let right = self.evaluate(env, e2)?;
                let (a, b) = integer_pair(line, op, &left, &right)?;
                bitwise(line, op, a, b)
            }
            "==" => {
                let left = self.evaluate(env, e1)?;
                let right = self.evaluate(env, e2)?;
                Ok(Value::Boolean(left.is_equal(&right)))
            }
            "!=" => {
                let left = self.evaluate(env, e1)?;
                let right = self.evaluate(env, e2)?;
                Ok(Value::Boolean(!left.is_equal(&right)))
            }
            "<" | ">" | "<=" | ">=" => {
                let left = self.evaluate(env, e1)?;
                let right = self.evaluate(env, e2)?;
                comparison(line, op, &left, &right)
            }
            _ => fail(line, format!("unknown operator {op}.")),
        }
    }

    /// Resolves the callee and invokes it. A bare name resolves through the
    /// scope chain first — user definitions shadow built-ins — and only an
    /// unbound name falls back to the built-in table. Anything else in
    /// function position is evaluated and must come out a closure.
    fn eval_call(
        &mut self,
        env: &SharedEnvironment,
        fun: &Expr,
        args: &[Expr],
        line: u32,
    ) -> Result<Value> {
        let (callee, name) = match fun {
            Expr::Variable { name, .. } => {
                let resolved = env.borrow().get(name);
                match resolved {
                    Some(value) => (value, Some(name.clone())),
                    None => {
                        if let Some(builtin) = builtins::lookup(name) {
                            return builtin(self, env, args, line);
                        }
                        return fail(line, format!("function {name}(...) is not defined."));
                    }
                }
            }
            _ => (self.evaluate(env, fun)?, None),
        };
        let closure = match callee {
            Value::Closure(closure) => closure,
            other => {
                return fail(
                    line,
                    format!("invalid type for function call: <{}>.", other.kind()),
                )
            }
        };
        let name =
            name.unwrap_or_else(|| format!("(anonymous) func@{:p}", Rc::as_ptr(&closure)));
        self.call_closure(env, &closure, &name, args, line)
    }

    /// The user-closure call protocol. Arguments are evaluated in the
    /// caller's environment, left to right, and bound into a fresh frame
    /// whose parent is the closure's captured environment — we teleport
    /// from the call site into the function's own lexical world.
    fn call_closure(
        &mut self,
        caller_env: &SharedEnvironment,
        closure: &Rc<Closure>,
        name: &str,
        args: &[Expr],
        line: u32,
    ) -> Result<Value> {
        if args.len() != closure.params.len() {
            return fail(
                line,
                format!(
                    "invalid argument count for {name}(...): Expected {}.",
                    closure.params.len()
                ),
            );
        }
        if self.depth >= MAX_CALL_DEPTH {
            return fail(
                line,
                format!("maximum recursion depth exceeded for {name}(...)."),
            );
        }
        let frame = Environment::nested(&closure.env);
        for (param, arg) in closure.params.iter().zip(args) {
            let value = self.evaluate(caller_env, arg)?;
            frame.borrow_mut().define(param.clone(), value);
        }
        self.depth += 1;
        let outcome = self.execute_block(
            &frame,
            &closure.body,
            Flags {
                in_func: true,
                in_loop: false,
            },
        );
        self.depth -= 1;
        match outcome? {
            Some(Signal::Return(value)) => Ok(value),
            // A loop signal cannot legally reach the top of a function
            // body; refuse to let one leak out as a value.
            Some(Signal::Break) | Some(Signal::Continue) => fail(
                line,
                format!("break or continue escaping {name}(...)."),
            ),
            None => Ok(Value::Null),
        }
    }

    /// The l-value protocol. A bare name writes through the scope chain,
    /// declaring in the current frame only when no frame has it; a member
    /// access writes into the addressed collection. Returns None when the
    /// target expression is not an assignable shape at all.
    pub fn assign(
        &mut self,
        env: &SharedEnvironment,
        target: &Expr,
        value: Value,
    ) -> Result<Option<Value>> {
        match target {
            Expr::Identifier { name, .. } | Expr::Variable { name, .. } => {
                let assigned = env.borrow_mut().assign(name, value.clone());
                if !assigned {
                    env.borrow_mut().define(name.clone(), value.clone());
                }
                Ok(Some(value))
            }
            Expr::Attribute {
                collection, line, ..
            }
            | Expr::Subscriptor {
                collection, line, ..
            } => {
                let key = match self.determine_attribute(env, target)? {
                    Some(key) => key,
                    None => unreachable!("member accesses always determine a key"),
                };
                let map = match self.evaluate(env, collection)? {
                    Value::Collection(map) => map,
                    other => {
                        return fail(
                            *line,
                            format!(
                                "invalid collection type for attribute '{key}': <{}>.",
                                other.kind()
                            ),
                        )
                    }
                };
                map.borrow_mut().insert(key, value.clone());
                Ok(Some(value))
            }
            _ => Ok(None),
        }
    }

    /// The key under which an attribute/subscriptor target addresses its
    /// collection: the literal attribute name, or the stringified
    /// subscript key. None for every other target shape.
    fn determine_attribute(
        &mut self,
        env: &SharedEnvironment,
        target: &Expr,
    ) -> Result<Option<String>> {
        match target {
            Expr::Attribute { attribute, .. } => Ok(Some(attribute.clone())),
            Expr::Subscriptor { expr, line, .. } => {
                let key = self.evaluate(env, expr)?;
                if !key.is_subscriptable_key() {
                    return fail(
                        *line,
                        format!("invalid key type for attribute assignment: <{}>.", key.kind()),
                    );
                }
                Ok(Some(key.to_string()))
            }
            _ => Ok(None),
        }
    }
}

fn number_pair(line: u32, op: &str, left: &Value, right: &Value) -> Result<(Number, Number)> {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => fail(
            line,
            format!(
                "operator '{op}' not supported between types <{}> and <{}>.",
                left.kind(),
                right.kind()
            ),
        ),
    }
}

fn integer_pair(line: u32, op: &str, left: &Value, right: &Value) -> Result<(BigInt, BigInt)> {
    match (left.as_integer(), right.as_integer()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => fail(
            line,
            format!(
                "operator '{op}' not supported between types <{}> and <{}>.",
                left.kind(),
                right.kind()
            ),
        ),
    }
}

/// `+ - * %` after string concatenation has been peeled off. Two integers
/// stay in the integer domain; any float operand promotes the whole
/// operation to floats.
fn arithmetic(line: u32, op: &str, lhs: Number, rhs: Number) -> Result<Value> {
    if let (Number::Int(a), Number::Int(b)) = (&lhs, &rhs) {
        return match op {
            "+" => Ok(Value::Integer(a + b)),
            "-" => Ok(Value::Integer(a - b)),
            "*" => Ok(Value::Integer(a * b)),
            "%" => {
                if b.is_zero() {
                    fail(line, "modulo by zero.")
                } else {
                    Ok(Value::Integer(a % b))
                }
            }
            _ => unreachable!("arithmetic called with '{op}'"),
        };
    }
    let (a, b) = (lhs.to_f64(), rhs.to_f64());
    Ok(Value::Float(match op {
        "+" => a + b,
        "-" => a - b,
        "*" => a * b,
        "%" => a % b,
        _ => unreachable!("arithmetic called with '{op}'"),
    }))
}

/// Exponentiation, shared by the `**` operator and the `pow` built-in.
/// Integer base and non-negative integer exponent stay integers; a float
/// anywhere, or a negative exponent, promotes to floats.
pub(crate) fn raise(line: u32, op: &str, base: Number, exponent: Number) -> Result<Value> {
    if let (Number::Int(a), Number::Int(b)) = (&base, &exponent) {
        if !b.is_negative() {
            return match b.to_u32() {
                Some(e) => Ok(Value::Integer(Pow::pow(a, e))),
                None => fail(line, format!("exponent too large for '{op}': {b}.")),
            };
        }
    }
    Ok(Value::Float(base.to_f64().powf(exponent.to_f64())))
}

fn bitwise(line: u32, op: &str, a: BigInt, b: BigInt) -> Result<Value> {
    match op {
        "&" => Ok(Value::Integer(a & b)),
        "|" => Ok(Value::Integer(a | b)),
        "^" => Ok(Value::Integer(a ^ b)),
        "<<" | ">>" => {
            let count = if b.is_negative() { None } else { b.to_u32() };
            let Some(count) = count else {
                return fail(line, format!("invalid shift count for '{op}': {b}."));
            };
            Ok(Value::Integer(if op == "<<" { a << count } else { a >> count }))
        }
        _ => unreachable!("bitwise called with '{op}'"),
    }
}

/// `== !=` live on `Value::is_equal`; the ordered comparisons need both
/// operands numeric or both strings. NaN never orders, so every ordered
/// comparison against it is false.
fn comparison(line: u32, op: &str, left: &Value, right: &Value) -> Result<Value> {
    use std::cmp::Ordering;
    let ordering = if let (Value::String(a), Value::String(b)) = (left, right) {
        Some(a.cmp(b))
    } else {
        let (a, b) = number_pair(line, op, left, right)?;
        match (&a, &b) {
            (Number::Int(x), Number::Int(y)) => Some(x.cmp(y)),
            _ => a.to_f64().partial_cmp(&b.to_f64()),
        }
    };
    let result = match ordering {
        None => false,
        Some(ordering) => match op {
            "<" => ordering == Ordering::Less,
            ">" => ordering == Ordering::Greater,
            "<=" => ordering != Ordering::Greater,
            ">=" => ordering != Ordering::Less,
            _ => unreachable!("comparison called with '{op}'"),
        },
    };
    Ok(Value::Boolean(result))
}
