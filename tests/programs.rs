mod util;

use rill::ResultKind;
use serde_json::json;
use util::*;

fn print_of(args: serde_json::Value) -> serde_json::Value {
    json!({"kind": "static", "expr": {"kind": "call",
        "fun": {"kind": "variable", "name": "print"}, "args": args}})
}

#[test]
fn recursive_function_counts_to_999() {
    // foo(a) { if (a < 999) return foo(a + 1); return a; } print(foo(0));
    let output = with_big_stack(|| {
        run_ok(json!([
            {"kind": "assignment",
                "assignArr": [{"kind": "identifier", "name": "foo"}],
                "expr": {"kind": "closure", "params": ["a"], "body": [
                    {"kind": "if",
                        "truePartArr": [{
                            "test": {"kind": "binop", "op": "<",
                                "e1": {"kind": "variable", "name": "a"},
                                "e2": {"kind": "integer", "value": "999"}},
                            "part": [{"kind": "return", "expr": {"kind": "call",
                                "fun": {"kind": "variable", "name": "foo"},
                                "args": [{"kind": "binop", "op": "+",
                                    "e1": {"kind": "variable", "name": "a"},
                                    "e2": {"kind": "integer", "value": "1"}}]}}]
                        }],
                        "falsePart": [{"kind": "return",
                            "expr": {"kind": "variable", "name": "a"}}]}
                ]}},
            print_of(json!([{"kind": "call",
                "fun": {"kind": "variable", "name": "foo"},
                "args": [{"kind": "integer", "value": "0"}]}]))
        ]))
    });
    assert_eq!(output, ["999", " ", "\n"]);
}

#[test]
fn unbounded_recursion_hits_the_depth_ceiling() {
    let error = with_big_stack(|| {
        run_err(json!([
            {"kind": "assignment",
                "assignArr": [{"kind": "identifier", "name": "f"}],
                "expr": {"kind": "closure", "params": [], "body": [
                    {"kind": "return", "expr": {"kind": "call", "line": 1,
                        "fun": {"kind": "variable", "name": "f"}, "args": []}}
                ]}},
            {"kind": "static", "expr": {"kind": "call", "line": 2,
                "fun": {"kind": "variable", "name": "f"}, "args": []}}
        ]))
    });
    assert_eq!(error, "Line 1: maximum recursion depth exceeded for f(...).");
}

#[test]
fn closures_capture_their_lexical_environment() {
    // outer(a) { return fn() { return ++a; }; } g = outer(10);
    let output = run_ok(json!([
        {"kind": "assignment",
            "assignArr": [{"kind": "identifier", "name": "outer"}],
            "expr": {"kind": "closure", "params": ["a"], "body": [
                {"kind": "return", "expr": {"kind": "closure", "params": [], "body": [
                    {"kind": "return", "expr": {"kind": "unop", "op": "++",
                        "expr": {"kind": "variable", "name": "a"}}}
                ]}}
            ]}},
        {"kind": "assignment",
            "assignArr": [{"kind": "identifier", "name": "g"}],
            "expr": {"kind": "call",
                "fun": {"kind": "variable", "name": "outer"},
                "args": [{"kind": "integer", "value": "10"}]}},
        print_of(json!([{"kind": "call",
            "fun": {"kind": "variable", "name": "g"}, "args": []}])),
        print_of(json!([{"kind": "call",
            "fun": {"kind": "variable", "name": "g"}, "args": []}]))
    ]));
    assert_eq!(output, ["11", " ", "\n", "12", " ", "\n"]);
}

#[test]
fn string_indexing_prints_single_characters() {
    let index = |i: &str| {
        json!({"kind": "subscriptor",
            "collection": {"kind": "string", "value": "str"},
            "expr": {"kind": "integer", "value": i}})
    };
    assert_eq!(
        run_ok(json!([print_of(json!([index("1")]))])),
        ["t", " ", "\n"]
    );
    assert_eq!(
        run_ok(json!([print_of(json!([index("-1")]))])),
        ["r", " ", "\n"]
    );

    let error = run_err(json!([{"kind": "static",
        "expr": {"kind": "subscriptor", "line": 1,
            "collection": {"kind": "string", "value": "str"},
            "expr": {"kind": "integer", "value": "3"}}}]));
    assert_eq!(error, "Line 1: invalid string index for 'str': 3.");
}

#[test]
fn mixed_arithmetic_follows_the_promotion_table() {
    let output = run_ok(json!([
        print_of(json!([{"kind": "binop", "op": "+",
            "e1": {"kind": "integer", "value": "1"},
            "e2": {"kind": "float", "value": "1.1"}}])),
        print_of(json!([{"kind": "binop", "op": "+",
            "e1": {"kind": "string", "value": "full"},
            "e2": {"kind": "string", "value": "str"}}]))
    ]));
    assert_eq!(output, ["2.1", " ", "\n", "fullstr", " ", "\n"]);

    let error = run_err(json!([{"kind": "static",
        "expr": {"kind": "binop", "op": "+", "line": 3,
            "e1": {"kind": "integer", "value": "1"},
            "e2": {"kind": "string", "value": "x"}}}]));
    assert_eq!(
        error,
        "Line 3: operator '+' not supported between types <integer> and <string>."
    );
}

#[test]
fn for_with_break_stops_after_one_step() {
    // x pre-exists, so the loop's init writes through to it and the final
    // value is observable after the loop frame is gone.
    let output = run_ok(json!([
        {"kind": "assignment",
            "assignArr": [{"kind": "identifier", "name": "x"}],
            "expr": {"kind": "integer", "value": "100"}},
        {"kind": "for",
            "inits": [{"kind": "assignment",
                "assignArr": [{"kind": "identifier", "name": "x"}],
                "expr": {"kind": "integer", "value": "0"}}],
            "test": {"kind": "boolean", "value": true},
            "updates": [{"kind": "static", "expr": {"kind": "unop", "op": "++",
                "expr": {"kind": "variable", "name": "x"}}}],
            "body": [
                {"kind": "static", "expr": {"kind": "unop", "op": "++",
                    "expr": {"kind": "variable", "name": "x"}}},
                {"kind": "break"}
            ]},
        print_of(json!([{"kind": "variable", "name": "x"}]))
    ]));
    assert_eq!(output, ["1", " ", "\n"]);
}

#[test]
fn deleting_the_same_attribute_twice_fails() {
    let delete = json!({"kind": "delete", "expr": {"kind": "attribute", "line": 2,
        "collection": {"kind": "variable", "name": "c"}, "attribute": "a"}});
    let setup = json!({"kind": "assignment",
        "assignArr": [{"kind": "identifier", "name": "c"}],
        "expr": {"kind": "collection", "value": {
            "a": {"kind": "integer", "value": "1"}
        }}});

    let result = run(json!([setup.clone(), delete.clone()]));
    assert_eq!(result.kind, ResultKind::Ok);

    let error = run_err(json!([setup, delete.clone(), delete]));
    assert_eq!(error, "Line 2: unknown attribute reference: 'a'.");
}

#[test]
fn collections_alias_through_every_name() {
    let output = run_ok(json!([
        {"kind": "assignment",
            "assignArr": [{"kind": "identifier", "name": "c"}],
            "expr": {"kind": "collection", "value": {
                "n": {"kind": "integer", "value": "1"}
            }}},
        {"kind": "assignment",
            "assignArr": [{"kind": "identifier", "name": "d"}],
            "expr": {"kind": "variable", "name": "c"}},
        {"kind": "assignment",
            "assignArr": [{"kind": "attribute",
                "collection": {"kind": "variable", "name": "d"}, "attribute": "n"}],
            "expr": {"kind": "integer", "value": "2"}},
        print_of(json!([{"kind": "attribute",
            "collection": {"kind": "variable", "name": "c"}, "attribute": "n"}]))
    ]));
    assert_eq!(output, ["2", " ", "\n"]);
}

#[test]
fn truthiness_matches_test_position() {
    let samples = [
        json!({"kind": "integer", "value": "7"}),
        json!({"kind": "integer", "value": "0"}),
        json!({"kind": "string", "value": ""}),
        json!({"kind": "string", "value": "x"}),
        json!({"kind": "null"}),
        json!({"kind": "collection", "value": {}}),
    ];
    for node in samples {
        let branch = eval(json!({"kind": "ternary", "test": node.clone(),
            "trueExpr": {"kind": "boolean", "value": true},
            "falseExpr": {"kind": "boolean", "value": false}}))
        .unwrap();
        let coerced = eval(json!({"kind": "call",
            "fun": {"kind": "variable", "name": "bool"}, "args": [node]}))
        .unwrap();
        assert_eq!(branch, coerced);
    }
}

#[test]
fn an_error_discards_partial_output() {
    let result = run(json!([
        print_of(json!([{"kind": "string", "value": "before"}])),
        {"kind": "static", "expr": {"kind": "variable", "name": "missing", "line": 2}}
    ]));
    assert_eq!(result.kind, ResultKind::Error);
    assert_eq!(result.output, ["Line 2: Variable 'missing' is not defined."]);
}

#[test]
fn top_level_return_is_rejected() {
    let error = run_err(json!([
        {"kind": "return", "expr": {"kind": "integer", "value": "1", "line": 1}}
    ]));
    assert_eq!(error, "Line 1: return outside of function.");
}

#[test]
fn results_serialize_for_the_host() {
    let ok = run(json!([print_of(json!([]))]));
    assert_eq!(
        serde_json::to_value(&ok).unwrap(),
        json!({"kind": "ok", "output": ["\n"]})
    );

    let error = run(json!([{"kind": "static",
        "expr": {"kind": "variable", "name": "x", "line": 1}}]));
    assert_eq!(
        serde_json::to_value(&error).unwrap(),
        json!({"kind": "error", "output": ["Line 1: Variable 'x' is not defined."]})
    );
}

#[test]
fn while_loops_drive_output_in_order() {
    // i = 0; while (i < 3) { print(i); ++i; }
    let output = run_ok(json!([
        {"kind": "assignment",
            "assignArr": [{"kind": "identifier", "name": "i"}],
            "expr": {"kind": "integer", "value": "0"}},
        {"kind": "while",
            "test": {"kind": "binop", "op": "<",
                "e1": {"kind": "variable", "name": "i"},
                "e2": {"kind": "integer", "value": "3"}},
            "body": [
                print_of(json!([{"kind": "variable", "name": "i"}])),
                {"kind": "static", "expr": {"kind": "unop", "op": "++",
                    "expr": {"kind": "variable", "name": "i"}}}
            ]}
    ]));
    assert_eq!(output, ["0", " ", "\n", "1", " ", "\n", "2", " ", "\n"]);
}

#[test]
fn function_environments_are_fresh_per_call() {
    // counter(n) { n = n + 1; return n; } — calls do not leak state into
    // each other; each frame starts from the bound argument.
    let output = run_ok(json!([
        {"kind": "assignment",
            "assignArr": [{"kind": "identifier", "name": "bump"}],
            "expr": {"kind": "closure", "params": ["n"], "body": [
                {"kind": "assignment",
                    "assignArr": [{"kind": "identifier", "name": "n"}],
                    "expr": {"kind": "binop", "op": "+",
                        "e1": {"kind": "variable", "name": "n"},
                        "e2": {"kind": "integer", "value": "1"}}},
                {"kind": "return", "expr": {"kind": "variable", "name": "n"}}
            ]}},
        print_of(json!([{"kind": "call",
            "fun": {"kind": "variable", "name": "bump"},
            "args": [{"kind": "integer", "value": "5"}]}])),
        print_of(json!([{"kind": "call",
            "fun": {"kind": "variable", "name": "bump"},
            "args": [{"kind": "integer", "value": "5"}]}]))
    ]));
    assert_eq!(output, ["6", " ", "\n", "6", " ", "\n"]);
}
