//! Nested command dispatch through `Target::dispatch`.

use std::cell::Cell;

use argbind::{CommandField, Fields, Invocation, ParseError, Parser, Subcommand, Target};
use argbind_core::{
    CommandSpec, FieldError, OptionSpec, PositionalSpec, Requiredness, Schema, ValidationError,
    Value, ValueType,
};

#[derive(Debug, Default)]
struct Git {
    verbose: bool,
    push: Option<Push>,
    pushes_seen: Cell<usize>,
}

#[derive(Debug, Default)]
struct Push {
    remote: Option<String>,
    branch: Option<String>,
    force: bool,
    executed: Cell<usize>,
    parent_verbose: Cell<bool>,
}

impl Fields for Git {
    fn assign(&mut self, field: &str, value: Value) -> Result<(), FieldError> {
        match field {
            "verbose" => self.verbose = value.try_into()?,
            other => return Err(FieldError::Unknown(other.to_string())),
        }
        Ok(())
    }

    fn current(&self, field: &str) -> Option<Value> {
        match field {
            "verbose" => Some(Value::Bool(self.verbose)),
            _ => None,
        }
    }
}

impl Target for Git {
    fn schema() -> Result<Schema, ValidationError> {
        Schema::new("git")
            .with_option(OptionSpec::flag("verbose", ["v", "verbose"]))
            .with_command(CommandSpec::new("push", ["push", "p"]))
            .with_command(CommandSpec::new("fetch", ["fetch"]))
            .build()
    }

    fn dispatch(&mut self, invocation: Invocation<'_>) -> argbind::Result<()> {
        match invocation.field() {
            "push" => invocation.bind::<Self, Push>(self),
            _ => Err(invocation.unhandled()),
        }
    }
}

impl CommandField<Push> for Git {
    fn store_command(&mut self, command: Push) {
        self.push = Some(command);
    }

    fn command(&self) -> Option<&Push> {
        self.push.as_ref()
    }

    fn on_command(&self, _command: &Push) {
        self.pushes_seen.set(self.pushes_seen.get() + 1);
    }
}

impl Fields for Push {
    fn assign(&mut self, field: &str, value: Value) -> Result<(), FieldError> {
        match field {
            "remote" => self.remote = Some(value.try_into()?),
            "branch" => self.branch = Some(value.try_into()?),
            "force" => self.force = value.try_into()?,
            other => return Err(FieldError::Unknown(other.to_string())),
        }
        Ok(())
    }

    fn current(&self, field: &str) -> Option<Value> {
        match field {
            "remote" => self.remote.clone().map(Value::from),
            "branch" => self.branch.clone().map(Value::from),
            "force" => Some(Value::Bool(self.force)),
            _ => None,
        }
    }
}

impl Target for Push {
    fn schema() -> Result<Schema, ValidationError> {
        Schema::new("push")
            .with_option(OptionSpec::flag("force", ["f", "force"]))
            .with_positional(PositionalSpec::new("remote", 0, "remote", ValueType::String))
            .with_positional(
                PositionalSpec::new("branch", 1, "branch", ValueType::String)
                    .with_required(Requiredness::No),
            )
            .build()
    }
}

impl Subcommand<Git> for Push {
    fn execute(&self, parent: &Git) {
        self.executed.set(self.executed.get() + 1);
        self.parent_verbose.set(parent.verbose);
    }
}

#[test]
fn test_push_origin_master() {
    let git: Git = Parser::new()
        .parse(&["-v", "push", "origin", "master"])
        .unwrap();

    assert!(git.verbose);
    let push = git.push.as_ref().unwrap();
    assert_eq!(push.remote.as_deref(), Some("origin"));
    assert_eq!(push.branch.as_deref(), Some("master"));
    assert!(!push.force);

    assert_eq!(push.executed.get(), 1);
    assert!(push.parent_verbose.get());
    assert_eq!(git.pushes_seen.get(), 1);
}

#[test]
fn test_tokens_after_command_belong_to_it() {
    let git: Git = Parser::new().parse(&["p", "-f", "origin", "-v"]).unwrap();

    assert!(!git.verbose);
    let push = git.push.as_ref().unwrap();
    assert!(push.force);
    assert_eq!(push.remote.as_deref(), Some("origin"));
    assert_eq!(push.branch, None);
}

#[test]
fn test_missing_command() {
    let err = Parser::new().parse::<Git, _>(&["-v"]).unwrap_err();
    assert_eq!(
        err,
        ParseError::CommandMissing {
            expected: vec!["push".to_string(), "p".to_string(), "fetch".to_string()],
        }
    );
}

#[test]
fn test_nested_errors_propagate() {
    let err = Parser::new().parse::<Git, _>(&["push"]).unwrap_err();
    assert_eq!(
        err,
        ParseError::MissingRequiredParameter {
            name: "remote".to_string()
        }
    );
}

#[test]
fn test_unrouted_command_is_an_error() {
    let err = Parser::new().parse::<Git, _>(&["fetch"]).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnhandledCommand {
            field: "fetch".to_string(),
            alias: "fetch".to_string(),
        }
    );
}

#[test]
fn test_option_value_may_shadow_command_name() {
    // `push` is consumed as the value of a non-boolean option
    let parser = Parser::new();
    let schema = Schema::new("tool")
        .with_option(OptionSpec::new("mode", ["mode"], ValueType::String))
        .with_command(CommandSpec::new("push", ["push"]))
        .build()
        .unwrap();

    let raw = parser.classify(&schema, &["--mode", "push", "push"]);
    assert_eq!(raw.value("mode"), Some("push"));
    assert_eq!(raw.command.map(|c| c.index), Some(2));
}

/// Parent whose command slot never keeps what it is given.
#[derive(Debug, Default)]
struct Forgetful {
    handled: Cell<usize>,
}

impl Fields for Forgetful {
    fn assign(&mut self, field: &str, _value: Value) -> Result<(), FieldError> {
        Err(FieldError::Unknown(field.to_string()))
    }

    fn current(&self, _field: &str) -> Option<Value> {
        None
    }
}

impl Target for Forgetful {
    fn schema() -> Result<Schema, ValidationError> {
        Schema::new("forgetful")
            .with_command(CommandSpec::new("push", ["push"]))
            .build()
    }

    fn dispatch(&mut self, invocation: Invocation<'_>) -> argbind::Result<()> {
        invocation.bind::<Self, Push>(self)
    }
}

impl CommandField<Push> for Forgetful {
    fn store_command(&mut self, _command: Push) {}

    fn command(&self) -> Option<&Push> {
        None
    }

    fn on_command(&self, _command: &Push) {
        self.handled.set(self.handled.get() + 1);
    }
}

impl Subcommand<Forgetful> for Push {}

#[test]
fn test_unstored_command_is_an_error() {
    let err = Parser::new()
        .parse::<Forgetful, _>(&["push", "origin"])
        .unwrap_err();
    assert_eq!(
        err,
        ParseError::CommandNotStored {
            field: "push".to_string()
        }
    );
}
