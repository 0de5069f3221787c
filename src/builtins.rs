use crate::ast::Expr;
use crate::environment::SharedEnvironment;
use crate::error::{fail, Result};
use crate::interpreter::{raise, Interpreter};
use crate::value::{Number, Value};
use num_bigint::BigInt;
use num_traits::{FromPrimitive, Signed};

/// A built-in receives the raw argument expressions, not evaluated values:
/// each one enforces its own arity before evaluating anything, and `print`
/// owns the order in which its arguments hit the output sink.
pub type Builtin = fn(&mut Interpreter, &SharedEnvironment, &[Expr], u32) -> Result<Value>;

/// Name-to-handler dispatch. Scope lookups take precedence: a user binding
/// with one of these names shadows the built-in, and the table is only
/// consulted when the name resolves to nothing.
pub fn lookup(name: &str) -> Option<Builtin> {
    Some(match name {
        "type" => type_of,
        "ord" => ord,
        "abs" => abs,
        "len" => len,
        "bool" => bool_of,
        "int" => int_of,
        "float" => float_of,
        "str" => str_of,
        "pow" => pow,
        "print" => print,
        _ => return None,
    })
}

fn expect_arity(name: &str, args: &[Expr], expected: usize, line: u32) -> Result<()> {
    if args.len() != expected {
        return fail(
            line,
            format!("invalid argument count for {name}(...): {}.", args.len()),
        );
    }
    Ok(())
}

fn type_of(
    interp: &mut Interpreter,
    env: &SharedEnvironment,
    args: &[Expr],
    line: u32,
) -> Result<Value> {
    expect_arity("type", args, 1, line)?;
    let value = interp.evaluate(env, &args[0])?;
    Ok(Value::from(value.kind()))
}

fn ord(
    interp: &mut Interpreter,
    env: &SharedEnvironment,
    args: &[Expr],
    line: u32,
) -> Result<Value> {
    expect_arity("ord", args, 1, line)?;
    let value = interp.evaluate(env, &args[0])?;
    let Value::String(s) = &value else {
        return fail(
            line,
            format!("expected a character for ord(...), received <{}>.", value.kind()),
        );
    };
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Value::from(c as i64)),
        _ => fail(
            line,
            format!(
                "expected a character for ord(...), received a string of length {}.",
                s.chars().count()
            ),
        ),
    }
}

fn abs(
    interp: &mut Interpreter,
    env: &SharedEnvironment,
    args: &[Expr],
    line: u32,
) -> Result<Value> {
    expect_arity("abs", args, 1, line)?;
    let value = interp.evaluate(env, &args[0])?;
    // Integer-vs-float tag is preserved; a boolean comes out as an integer.
    match value.as_number() {
        Some(Number::Int(i)) => Ok(Value::Integer(i.abs())),
        Some(Number::Float(f)) => Ok(Value::Float(f.abs())),
        None => fail(
            line,
            format!("invalid argument type for abs(...): <{}>.", value.kind()),
        ),
    }
}

fn len(
    interp: &mut Interpreter,
    env: &SharedEnvironment,
    args: &[Expr],
    line: u32,
) -> Result<Value> {
    expect_arity("len", args, 1, line)?;
    let value = interp.evaluate(env, &args[0])?;
    match &value {
        Value::String(s) => Ok(Value::from(s.chars().count() as i64)),
        Value::Collection(map) => Ok(Value::from(map.borrow().len() as i64)),
        _ => fail(
            line,
            format!(
                "expected a string or collection for len(...), received <{}>.",
                value.kind()
            ),
        ),
    }
}

fn bool_of(
    interp: &mut Interpreter,
    env: &SharedEnvironment,
    args: &[Expr],
    line: u32,
) -> Result<Value> {
    expect_arity("bool", args, 1, line)?;
    let value = interp.evaluate(env, &args[0])?;
    Ok(Value::Boolean(value.is_truthy()))
}

fn int_of(
    interp: &mut Interpreter,
    env: &SharedEnvironment,
    args: &[Expr],
    line: u32,
) -> Result<Value> {
    expect_arity("int", args, 1, line)?;
    let value = interp.evaluate(env, &args[0])?;
    if let Value::String(s) = &value {
        return match s.trim().parse::<BigInt>() {
            Ok(i) => Ok(Value::Integer(i)),
            Err(_) => fail(
                line,
                format!("invalid literal for int(...) with base 10: '{s}'."),
            ),
        };
    }
    match value.as_number() {
        Some(Number::Int(i)) => Ok(Value::Integer(i)),
        Some(Number::Float(f)) if f.is_nan() => {
            fail(line, "cannot convert float NaN to integer.")
        }
        Some(Number::Float(f)) if f.is_infinite() => {
            fail(line, "cannot convert float infinity to integer.")
        }
        // Truncation toward zero, like the rest of the numeric tower.
        Some(Number::Float(f)) => Ok(Value::Integer(
            BigInt::from_f64(f.trunc()).expect("finite float converts"),
        )),
        None => fail(
            line,
            format!("invalid argument type for int(...): <{}>.", value.kind()),
        ),
    }
}

fn float_of(
    interp: &mut Interpreter,
    env: &SharedEnvironment,
    args: &[Expr],
    line: u32,
) -> Result<Value> {
    expect_arity("float", args, 1, line)?;
    let value = interp.evaluate(env, &args[0])?;
    if let Value::String(s) = &value {
        return match s.trim().parse::<f64>() {
            Ok(f) => Ok(Value::Float(f)),
            Err(_) => fail(
                line,
                format!("could not convert string for float(...): '{s}'."),
            ),
        };
    }
    match value.as_number() {
        Some(number) => Ok(Value::Float(number.to_f64())),
        None => fail(
            line,
            format!("invalid argument type for float(...): <{}>.", value.kind()),
        ),
    }
}

fn str_of(
    interp: &mut Interpreter,
    env: &SharedEnvironment,
    args: &[Expr],
    line: u32,
) -> Result<Value> {
    expect_arity("str", args, 1, line)?;
    let value = interp.evaluate(env, &args[0])?;
    Ok(Value::String(value.to_string()))
}

fn pow(
    interp: &mut Interpreter,
    env: &SharedEnvironment,
    args: &[Expr],
    line: u32,
) -> Result<Value> {
    expect_arity("pow", args, 2, line)?;
    let base = interp.evaluate(env, &args[0])?;
    let exponent = interp.evaluate(env, &args[1])?;
    match (base.as_number(), exponent.as_number()) {
        (Some(base), Some(exponent)) => raise(line, "pow", base, exponent),
        (None, _) => fail(
            line,
            format!("invalid argument type for pow(...): <{}>.", base.kind()),
        ),
        _ => fail(
            line,
            format!("invalid argument type for pow(...): <{}>.", exponent.kind()),
        ),
    }
}

/// Appends each argument's canonical string form to the output sink, a
/// space after each one, and a closing newline marker. A zero-argument call
/// emits just the newline.
fn print(
    interp: &mut Interpreter,
    env: &SharedEnvironment,
    args: &[Expr],
    _line: u32,
) -> Result<Value> {
    for arg in args {
        let value = interp.evaluate(env, arg)?;
        interp.push_output(value.to_string());
        interp.push_output(" ".to_string());
    }
    interp.push_output("\n".to_string());
    Ok(Value::Null)
}
