//! Binding typed targets: coercion, requiredness, constraints and hooks.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use argbind::{
    Fields, ParameterKind, ParseError, Parser, Target, TokenizeMode, describe_target,
};
use argbind_core::{
    FieldError, OptionSpec, Pattern, PositionalListSpec, PositionalSpec, Requiredness, Schema,
    Separators, ValidationError, Value, ValueType,
};

#[derive(Debug, Default, PartialEq)]
struct Basic {
    row: i32,
    name: Option<String>,
    positional: f64,
    force: bool,
}

impl Fields for Basic {
    fn assign(&mut self, field: &str, value: Value) -> Result<(), FieldError> {
        match field {
            "row" => self.row = value.try_into()?,
            "name" => self.name = Some(value.try_into()?),
            "positional" => self.positional = value.try_into()?,
            "force" => self.force = value.try_into()?,
            other => return Err(FieldError::Unknown(other.to_string())),
        }
        Ok(())
    }

    fn current(&self, field: &str) -> Option<Value> {
        match field {
            "row" => Some(Value::Int(self.row)),
            "name" => self.name.clone().map(Value::from),
            "positional" => Some(Value::Double(self.positional)),
            "force" => Some(Value::Bool(self.force)),
            _ => None,
        }
    }
}

impl Target for Basic {
    fn schema() -> Result<Schema, ValidationError> {
        Schema::new("basic")
            .with_option(
                OptionSpec::new("row", ["r", "row"], ValueType::Int).with_description("Row number"),
            )
            .with_option(
                OptionSpec::new("name", ["n", "name"], ValueType::String)
                    .with_required(Requiredness::No),
            )
            .with_option(OptionSpec::flag("force", ["f", "for-sure"]))
            .with_positional(PositionalSpec::new(
                "positional",
                0,
                "positional",
                ValueType::Double,
            ))
            .build()
    }
}

#[test]
fn test_basic_binding() {
    let basic: Basic = Parser::new()
        .parse(&["-r", "5", "--name", "bob", "1.5", "--for-sure"])
        .unwrap();

    assert_eq!(
        basic,
        Basic {
            row: 5,
            name: Some("bob".to_string()),
            positional: 1.5,
            force: true,
        }
    );
}

#[test]
fn test_blank_argument_binds_nothing() {
    let basic: Basic = Parser::new().parse(&[""]).unwrap();
    assert_eq!(basic, Basic::default());
}

#[test]
fn test_format_error_names_first_option_name() {
    let err = Parser::new().parse::<Basic, _>(&["--row", "abc"]).unwrap_err();

    assert_eq!(
        err,
        ParseError::ParameterFormat {
            name: "-r".to_string(),
            value: "abc".to_string(),
            expected: ValueType::Int,
        }
    );
    assert_eq!(
        err.to_string(),
        "Formatting error for parameter -r. Unable to cast value \"abc\" to type int"
    );
    assert_eq!(err.parameter(), Some("-r"));
}

#[test]
fn test_combined_flags_do_not_consume_values() {
    let basic: Basic = Parser::new().parse(&["-fr", "5"]).unwrap();

    assert!(basic.force);
    assert_eq!(basic.row, 0);
    assert_eq!(basic.positional, 5.0);
}

#[test]
fn test_parse_into_is_idempotent() {
    let parser = Parser::new();
    let args = ["-n", "x", "--row", "-3", "2.25"];

    let mut once = Basic::default();
    parser.parse_into(&mut once, &args).unwrap();
    let mut twice = Basic::default();
    parser.parse_into(&mut twice, &args).unwrap();
    parser.parse_into(&mut twice, &args).unwrap();

    assert_eq!(once, twice);
    assert_eq!(once.row, -3);
}

#[test]
fn test_parse_into_keeps_unmatched_fields_and_resets_flags() {
    let mut basic = Basic {
        row: 9,
        name: Some("kept".to_string()),
        positional: 0.0,
        force: true,
    };
    Parser::new().parse_into(&mut basic, &["1"]).unwrap();

    assert_eq!(basic.row, 9);
    assert_eq!(basic.name.as_deref(), Some("kept"));
    assert_eq!(basic.positional, 1.0);
    assert!(!basic.force);
}

#[test]
fn test_parse_line_name_and_positional() {
    let basic: Basic = Parser::new().parse_line("--name John&Doe 0.34").unwrap();
    assert_eq!(basic.name.as_deref(), Some("John&Doe"));
    assert_eq!(basic.positional, 0.34);
}

#[test]
fn test_parse_line_with_quotes() {
    let basic: Basic = Parser::new()
        .parse_line(r#"--name "John& 'Doe ' " ' 7 ' --row 2"#)
        .unwrap();

    assert_eq!(basic.name.as_deref(), Some("John& 'Doe ' "));
    assert_eq!(basic.positional, 7.0);
    assert_eq!(basic.row, 2);
}

#[test]
fn test_parse_command_line_drops_program_path() {
    let basic: Basic = Parser::new()
        .parse_command_line(r#""C:\Program Files\tool.exe" -r 4 "-2.5""#)
        .unwrap();

    assert_eq!(basic.row, 4);
    assert_eq!(basic.positional, -2.5);
}

#[test]
fn test_separators_follow_config() {
    let parser = Parser::new().with_separators(Separators::EQUALS | Separators::COLON);

    let basic: Basic = parser.parse(&["--row=8", "-n:ann"]).unwrap();
    assert_eq!(basic.row, 8);
    assert_eq!(basic.name.as_deref(), Some("ann"));

    // space disabled: the value is left as a positional
    let spaced: Basic = parser.parse(&["--row", "3"]).unwrap();
    assert_eq!(spaced.row, 0);
    assert_eq!(spaced.positional, 3.0);
}

#[test]
fn test_argv_mode_parse_line_keeps_first_token() {
    let parser = Parser::new().with_tokenize_mode(TokenizeMode::Argv);

    let basic: Basic = parser.parse_line(r#"7 --name "a b""#).unwrap();
    assert_eq!(basic.positional, 7.0);
    assert_eq!(basic.name.as_deref(), Some("a b"));

    let err = parser.parse_line::<Basic>(r#"prog --name "a b""#).unwrap_err();
    assert!(matches!(err, ParseError::ParameterFormat { ref value, .. } if value == "prog"));
}

#[derive(Debug, Default)]
struct Pair {
    first: Option<String>,
    second: Option<String>,
}

impl Fields for Pair {
    fn assign(&mut self, field: &str, value: Value) -> Result<(), FieldError> {
        match field {
            "first" => self.first = Some(value.try_into()?),
            "second" => self.second = Some(value.try_into()?),
            other => return Err(FieldError::Unknown(other.to_string())),
        }
        Ok(())
    }

    fn current(&self, field: &str) -> Option<Value> {
        match field {
            "first" => self.first.clone().map(Value::from),
            "second" => self.second.clone().map(Value::from),
            _ => None,
        }
    }
}

impl Target for Pair {
    fn schema() -> Result<Schema, ValidationError> {
        Schema::new("pair")
            .with_option(OptionSpec::new("first", ["first", "1"], ValueType::String))
            .with_option(OptionSpec::new("second", ["second"], ValueType::String))
            .build()
    }
}

#[test]
fn test_missing_required_reports_first_declared() {
    let err = Parser::new().parse::<Pair, &str>(&[]).unwrap_err();
    assert_eq!(
        err,
        ParseError::MissingRequiredParameter {
            name: "--first".to_string()
        }
    );
    assert_eq!(err.to_string(), "Parameter missing: --first");
}

#[test]
fn test_any_alias_satisfies_requiredness() {
    let pair: Pair = Parser::new().parse(&["-1", "a", "--second", "b"]).unwrap();
    assert_eq!(pair.first.as_deref(), Some("a"));
    assert_eq!(pair.second.as_deref(), Some("b"));
}

#[test]
fn test_failed_binding_keeps_earlier_fields() {
    let mut pair = Pair {
        first: Some("old".to_string()),
        second: None,
    };

    let err = Parser::new()
        .parse_into(&mut pair, &["--first", "new"])
        .unwrap_err();

    assert_eq!(
        err,
        ParseError::MissingRequiredParameter {
            name: "--second".to_string()
        }
    );
    assert_eq!(pair.first.as_deref(), Some("new"));
    assert_eq!(pair.second, None);
}

#[derive(Debug, Default)]
struct Constrained {
    ids: Vec<i32>,
    code: String,
    label: String,
    rest: Vec<String>,
    head: String,
    third: String,
}

impl Fields for Constrained {
    fn assign(&mut self, field: &str, value: Value) -> Result<(), FieldError> {
        match field {
            "ids" => self.ids = value.try_into()?,
            "code" => self.code = value.try_into()?,
            "label" => self.label = value.try_into()?,
            "rest" => self.rest = value.try_into()?,
            "head" => self.head = value.try_into()?,
            "third" => self.third = value.try_into()?,
            other => return Err(FieldError::Unknown(other.to_string())),
        }
        Ok(())
    }

    fn current(&self, field: &str) -> Option<Value> {
        match field {
            "ids" => Some(Value::from(self.ids.clone())),
            "code" => Some(Value::from(self.code.clone())),
            "label" => Some(Value::from(self.label.clone())),
            "head" => Some(Value::from(self.head.clone())),
            "third" => Some(Value::from(self.third.clone())),
            _ => None,
        }
    }
}

impl Target for Constrained {
    fn schema() -> Result<Schema, ValidationError> {
        Schema::new("constrained")
            .with_option(
                OptionSpec::new("ids", ["ids"], ValueType::array_of(ValueType::Int))
                    .with_pattern(Pattern::new(r"^\d+$")?),
            )
            .with_option(OptionSpec::new("code", ["code"], ValueType::String).with_validator("even"))
            .with_option(
                OptionSpec::new("label", ["label"], ValueType::String).with_formatter("upper"),
            )
            .with_positional(PositionalSpec::new("head", 0, "head", ValueType::String))
            .with_positional(PositionalSpec::new("third", 2, "third", ValueType::String))
            .with_positional_list(PositionalListSpec::new("rest"))
            .build()
    }
}

fn hooked_parser() -> Parser {
    Parser::new()
        .with_validator("even", |_: &str, value: &str| {
            value.parse::<u32>().is_ok_and(|n| n % 2 == 0)
        })
        .with_formatter("upper", |_: &str, value: &str| {
            Value::Str(value.to_uppercase())
        })
}

#[test]
fn test_array_values_are_coerced_element_wise() {
    let bound: Constrained = hooked_parser().parse(&["--ids", "1,2,30"]).unwrap();
    assert_eq!(bound.ids, vec![1, 2, 30]);
}

#[test]
fn test_pattern_applies_per_array_element() {
    let err = hooked_parser()
        .parse::<Constrained, _>(&["--ids", "1,x2,3"])
        .unwrap_err();

    assert_eq!(
        err,
        ParseError::ParameterMatch {
            name: "--ids".to_string(),
            value: "x2".to_string(),
            pattern: r"^\d+$".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        r#"Parameter --ids: value "x2" did not match the regular expression "^\d+$""#
    );
}

#[test]
fn test_validator_rejects_value() {
    let parser = hooked_parser();
    assert_eq!(
        parser.parse::<Constrained, _>(&["--code", "4"]).unwrap().code,
        "4"
    );

    let err = parser.parse::<Constrained, _>(&["--code", "3"]).unwrap_err();
    assert!(matches!(
        err,
        ParseError::ParameterValidation { ref name, ref value, .. } if name == "--code" && value == "3"
    ));
}

#[test]
fn test_unregistered_hooks_are_type_errors() {
    let parser = Parser::new();

    let err = parser.parse::<Constrained, _>(&["--code", "2"]).unwrap_err();
    assert_eq!(
        err,
        ParseError::ValidatorType {
            name: "--code".to_string(),
            id: "even".to_string(),
        }
    );

    let err = parser.parse::<Constrained, _>(&["--label", "x"]).unwrap_err();
    assert!(matches!(err, ParseError::FormatterType { .. }));
}

#[test]
fn test_formatter_replaces_coercion() {
    let bound: Constrained = hooked_parser().parse(&["--label", "shout"]).unwrap();
    assert_eq!(bound.label, "SHOUT");
}

/// One int field carrying a pattern, a validator and a formatter.
#[derive(Debug, Default)]
struct Staged {
    level: i32,
}

impl Fields for Staged {
    fn assign(&mut self, field: &str, value: Value) -> Result<(), FieldError> {
        match field {
            "level" => self.level = value.try_into()?,
            other => return Err(FieldError::Unknown(other.to_string())),
        }
        Ok(())
    }

    fn current(&self, field: &str) -> Option<Value> {
        match field {
            "level" => Some(Value::Int(self.level)),
            _ => None,
        }
    }
}

impl Target for Staged {
    fn schema() -> Result<Schema, ValidationError> {
        Schema::new("staged")
            .with_option(
                OptionSpec::new("level", ["level"], ValueType::Int)
                    .with_pattern(Pattern::new("^[a-z]+$")?)
                    .with_validator("not-bad")
                    .with_formatter("length"),
            )
            .build()
    }
}

#[test]
fn test_resolution_runs_pattern_then_validator_then_formatter() {
    let validated = Arc::new(AtomicUsize::new(0));
    let formatted = Arc::new(AtomicUsize::new(0));
    let parser = {
        let validated = Arc::clone(&validated);
        let formatted = Arc::clone(&formatted);
        Parser::new()
            .with_validator("not-bad", move |_: &str, value: &str| {
                validated.fetch_add(1, Ordering::SeqCst);
                value != "bad"
            })
            .with_formatter("length", move |_: &str, value: &str| {
                formatted.fetch_add(1, Ordering::SeqCst);
                Value::Int(value.len() as i32)
            })
    };

    let err = parser.parse::<Staged, _>(&["--level", "A1"]).unwrap_err();
    assert!(matches!(err, ParseError::ParameterMatch { .. }));
    assert_eq!(validated.load(Ordering::SeqCst), 0);
    assert_eq!(formatted.load(Ordering::SeqCst), 0);

    let err = parser.parse::<Staged, _>(&["--level", "bad"]).unwrap_err();
    assert!(matches!(err, ParseError::ParameterValidation { ref value, .. } if value == "bad"));
    assert_eq!(validated.load(Ordering::SeqCst), 1);
    assert_eq!(formatted.load(Ordering::SeqCst), 0);

    // "abc" is no int; the formatter's value is used instead of coercion
    let staged: Staged = parser.parse(&["--level", "abc"]).unwrap();
    assert_eq!(staged.level, 3);
    assert_eq!(validated.load(Ordering::SeqCst), 2);
    assert_eq!(formatted.load(Ordering::SeqCst), 1);
}

#[test]
fn test_formatter_output_rejected_by_field() {
    let parser = Parser::new().with_formatter("upper", |_: &str, _: &str| Value::Int(1));

    let err = parser.parse::<Constrained, _>(&["--label", "x"]).unwrap_err();
    assert!(matches!(
        err,
        ParseError::FieldRejected { ref field, source: FieldError::Mismatch(_) } if field == "label"
    ));
}

#[test]
fn test_positional_list_gets_unclaimed_values() {
    let bound: Constrained = hooked_parser().parse(&["a", "b", "c", "d", "e"]).unwrap();

    assert_eq!(bound.head, "a");
    assert_eq!(bound.third, "c");
    assert_eq!(bound.rest, vec!["b", "d", "e"]);
}

#[test]
fn test_describe_target_reports_effective_requiredness() {
    let summaries = describe_target::<Basic>().unwrap();

    let positional = &summaries[0];
    assert_eq!(positional.kind, ParameterKind::Positional);
    assert!(!positional.required);
    assert_eq!(positional.default.as_deref(), Some("0"));

    let row = summaries.iter().find(|s| s.field == "row").unwrap();
    assert_eq!(row.names, vec!["-r", "--row"]);
    assert_eq!(row.value_type.as_deref(), Some("int"));
    assert_eq!(row.description.as_deref(), Some("Row number"));

    let force = summaries.iter().find(|s| s.field == "force").unwrap();
    assert_eq!(force.kind, ParameterKind::Flag);
    assert_eq!(force.value_type, None);
}

#[test]
fn test_describe_pair_marks_required() {
    let summaries = describe_target::<Pair>().unwrap();
    assert!(summaries.iter().all(|s| s.required));
    assert!(summaries.iter().all(|s| s.default.is_none()));
}
