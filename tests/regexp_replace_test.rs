// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! REGEXP_REPLACE Tests
//!
//! Tests substitution with positions, occurrences, flags and NULL handling.
//! Arguments are supplied as columns so every row goes through the same
//! function node, the way a query evaluates them.

use std::sync::Arc;

use stoolap_regexp::core::{DataType, Error, Row, Value};
use stoolap_regexp::executor::ExecutionContext;
use stoolap_regexp::expression::{close_tree, ColumnRef, Expr, ExprRef, Literal};
use stoolap_regexp::functions::{global_registry, RegexpReplaceFunction, ScalarFunction};

const NULL: Value = Value::Null(DataType::Null);

/// REGEXP_REPLACE over `arity` text columns
fn replace_over_columns(arity: usize) -> ExprRef {
    let names = [
        "str",
        "pattern",
        "replace_str",
        "position",
        "occurrence",
        "flags",
    ];
    let args = names[..arity]
        .iter()
        .enumerate()
        .map(|(i, name)| Arc::new(ColumnRef::new(i, *name, DataType::Text)) as ExprRef)
        .collect();
    global_registry()
        .create("REGEXP_REPLACE", args)
        .expect("Failed to create REGEXP_REPLACE")
}

fn row(values: Vec<Value>) -> Row {
    Row::from_values(values)
}

fn text(s: &str) -> Value {
    Value::text(s)
}

/// Evaluate each case against one node; `None` expects an error
fn check(arity: usize, cases: Vec<(&str, Vec<Value>, Option<Value>)>) {
    let expr = replace_over_columns(arity);
    let ctx = ExecutionContext::new();
    for (name, values, expected) in cases {
        let result = expr.eval(&ctx, &row(values));
        match expected {
            Some(expected) => assert_eq!(result, Ok(expected), "case: {}", name),
            None => assert!(result.is_err(), "case: {} expected error, got {:?}", name, result),
        }
    }
    close_tree(expr.as_ref()).unwrap();
}

#[test]
fn test_replace_basic() {
    check(
        3,
        vec![
            ("nil str", vec![NULL, text("[a-z]"), text("X")], Some(NULL)),
            ("nil pattern", vec![text("abc def ghi"), NULL, text("X")], Some(NULL)),
            (
                "nil replace_str",
                vec![text("abc def ghi"), text("[a-z]"), NULL],
                Some(NULL),
            ),
            ("empty str", vec![text(""), text("[a-z]"), text("a")], Some(text(""))),
            ("empty pattern", vec![text("abc def ghi"), text(""), NULL], None),
            (
                "empty replace_str",
                vec![text("abc def ghi"), text("[a-z]"), text("")],
                Some(text("  ")),
            ),
            (
                "valid case",
                vec![text("abc def ghi"), text("[a-z]"), text("X")],
                Some(text("XXX XXX XXX")),
            ),
        ],
    );
}

#[test]
fn test_replace_with_position() {
    let base = |position: Value| vec![text("abc def ghi"), text("[a-z]"), text("X"), position];
    check(
        4,
        vec![
            ("nil position", base(NULL), Some(NULL)),
            ("negative position", base(Value::integer(-1)), None),
            ("zero position", base(Value::integer(0)), None),
            ("too large position", base(Value::integer(1000)), None),
            ("string position", base(text("1")), Some(text("XXX XXX XXX"))),
            ("first", base(Value::integer(1)), Some(text("XXX XXX XXX"))),
            ("second", base(Value::integer(2)), Some(text("aXX XXX XXX"))),
            ("fifth", base(Value::integer(5)), Some(text("abc XXX XXX"))),
            ("last", base(Value::integer(11)), Some(text("abc def ghX"))),
        ],
    );
}

#[test]
fn test_replace_position_errors() {
    let expr = replace_over_columns(4);
    let ctx = ExecutionContext::new();

    let err = expr
        .eval(&ctx, &row(vec![text("abc"), text("a"), text("X"), Value::integer(0)]))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    // One past the end is already out of range
    let err = expr
        .eval(&ctx, &row(vec![text("abc"), text("a"), text("X"), Value::integer(4)]))
        .unwrap_err();
    assert_eq!(
        err,
        Error::out_of_range("index out of bounds for regular expression search")
    );

    close_tree(expr.as_ref()).unwrap();
}

#[test]
fn test_replace_with_occurrence() {
    let base = |position: i64, occurrence: Value| {
        vec![
            text("abc def ghi"),
            text("[a-z]"),
            text("X"),
            Value::integer(position),
            occurrence,
        ]
    };
    check(
        5,
        vec![
            ("nil occurrence", base(1, NULL), Some(NULL)),
            ("string occurrence", base(1, text("0")), Some(text("XXX XXX XXX"))),
            ("negative occurrence", base(1, Value::integer(-1)), Some(text("Xbc def ghi"))),
            ("zero occurrence", base(1, Value::integer(0)), Some(text("XXX XXX XXX"))),
            ("one occurrence", base(1, Value::integer(1)), Some(text("Xbc def ghi"))),
            ("fourth occurrence", base(1, Value::integer(4)), Some(text("abc Xef ghi"))),
            ("too large occurrence", base(1, Value::integer(1000)), Some(text("abc def ghi"))),
            ("position and occurrence", base(5, Value::integer(4)), Some(text("abc def Xhi"))),
        ],
    );
}

#[test]
fn test_replace_negative_occurrence_means_first() {
    let expr = replace_over_columns(5);
    let ctx = ExecutionContext::new();
    let eval = |occurrence: i64| {
        expr.eval(
            &ctx,
            &row(vec![
                text("abc abc"),
                text("abc"),
                text("X"),
                Value::integer(1),
                Value::integer(occurrence),
            ]),
        )
    };
    assert_eq!(eval(-5), eval(1));
    assert_eq!(eval(1), Ok(text("X abc")));
    close_tree(expr.as_ref()).unwrap();
}

#[test]
fn test_replace_with_flags() {
    let base = |input: &str, pattern: &str, flags: Value| {
        vec![
            text(input),
            text(pattern),
            text("X"),
            Value::integer(1),
            Value::integer(0),
            flags,
        ]
    };
    check(
        6,
        vec![
            ("nil flags", base("abc def ghi", "[a-z]", NULL), Some(NULL)),
            ("bad flags", base("abc def ghi", "[a-z]", text("a")), None),
            (
                "case-sensitive flags",
                base("abc DEF ghi", "[a-z]", text("c")),
                Some(text("XXX DEF XXX")),
            ),
            (
                "case-insensitive flags",
                base("abc DEF ghi", "[a-z]", text("i")),
                Some(text("XXX XXX XXX")),
            ),
            (
                "repeated flags",
                base("abc DEF ghi", "[a-z]", text("iiiiiicccc")),
                Some(text("XXX DEF XXX")),
            ),
            (
                "multiline flags",
                base("abc\r\ndef\r\nghi", "^[a-z].*$", text("m")),
                Some(text("X\r\nX\r\nX")),
            ),
            (
                "insensitive and multiline flags",
                base("abc\r\nDEF\r\nghi", "^[a-z].*$", text("im")),
                Some(text("X\r\nX\r\nX")),
            ),
            (
                "sensitive and multiline flags",
                base("abc\r\nDEF\r\nghi", "^[a-z].*$", text("cm")),
                Some(text("X\r\nDEF\r\nX")),
            ),
            (
                "all flags",
                base("abc\r\nDEF\r\nghi", "^[a-z].*$", text("icm")),
                Some(text("X\r\nDEF\r\nX")),
            ),
            (
                "unix lines",
                base("ab\rc\nde", "^[a-z].*$", text("mu")),
                Some(text("X\nX")),
            ),
            (
                "dot matches newline",
                base("ab\ncd", "b.c", text("n")),
                Some(text("aXd")),
            ),
        ],
    );
}

#[test]
fn test_replace_multibyte_positions() {
    check(
        4,
        vec![
            (
                "position counts characters",
                vec![text("ñañaña"), text("ñ"), text("n"), Value::integer(2)],
                Some(text("ñanana")),
            ),
            (
                "last character",
                vec![text("日本語"), text("語"), text("go"), Value::integer(3)],
                Some(text("日本go")),
            ),
            (
                "past the last character",
                vec![text("日本語"), text("語"), text("go"), Value::integer(4)],
                None,
            ),
            (
                "four byte characters",
                vec![text("a😀b😀c"), text("😀"), text("-"), Value::integer(3)],
                Some(text("a😀b-c")),
            ),
        ],
    );
}

#[test]
fn test_replace_is_literal_and_handles_empty_matches() {
    check(
        3,
        vec![
            (
                "group reference stays literal",
                vec![text("john smith"), text("(\\w+) (\\w+)"), text("$2 $1")],
                Some(text("$2 $1")),
            ),
            (
                "empty matches",
                vec![text("abc"), text("x*"), text("-")],
                Some(text("-a-b-c-")),
            ),
        ],
    );
}

#[test]
fn test_replace_constant_call() {
    let args: Vec<ExprRef> = vec![
        Arc::new(Literal::new("abc def ghi")),
        Arc::new(Literal::new("[a-z]")),
        Arc::new(Literal::new("X")),
        Arc::new(Literal::new(1i64)),
        Arc::new(Literal::new(1i64)),
    ];
    let f = RegexpReplaceFunction::create(args).unwrap();
    let ctx = ExecutionContext::new();

    for _ in 0..3 {
        assert_eq!(f.eval(&ctx, &Row::new()).unwrap(), text("Xbc def ghi"));
    }
    assert_eq!(f.cached_result(), Some(text("Xbc def ghi")));
    assert_eq!(f.compile_count(), 1);
    assert_eq!(f.name(), "REGEXP_REPLACE");

    f.close().unwrap();
}
