//! Subcommand dispatch.
//!
//! When classification stops at a command token, the parser hands the
//! parent target an [`Invocation`] describing which command field was hit
//! and which tokens follow it. The parent routes it by field key, usually
//! with [`Invocation::bind`], which parses the nested target from the
//! remaining tokens, stores it, and runs the two command handlers.

use argbind_core::CommandSpec;
use tracing::debug;

use crate::Parser;
use crate::error::{ParseError, Result};
use crate::target::Target;

/// Handler run on a nested command after it has been bound.
pub trait Subcommand<P>: Target {
    /// Runs with the parent target that owns this command.
    fn execute(&self, _parent: &P) {}
}

/// A parent's storage slot for one nested command type.
///
/// `command` must return what `store_command` was last given;
/// [`Invocation::bind`] fails with [`ParseError::CommandNotStored`] otherwise.
pub trait CommandField<N> {
    fn store_command(&mut self, command: N);

    fn command(&self) -> Option<&N>;

    /// Runs on the parent after the nested command ran.
    fn on_command(&self, _command: &N) {}
}

/// A command found on the command line, not yet bound.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    parser: &'a Parser,
    spec: &'a CommandSpec,
    alias: &'a str,
    args: &'a [String],
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(
        parser: &'a Parser,
        spec: &'a CommandSpec,
        alias: &'a str,
        args: &'a [String],
    ) -> Self {
        Self {
            parser,
            spec,
            alias,
            args,
        }
    }

    /// Field key of the matched command.
    pub fn field(&self) -> &'a str {
        &self.spec.field
    }

    /// The alias as it appeared on the command line.
    pub fn alias(&self) -> &'a str {
        self.alias
    }

    /// Tokens after the command token.
    pub fn args(&self) -> &'a [String] {
        self.args
    }

    pub fn spec(&self) -> &'a CommandSpec {
        self.spec
    }

    /// Parses the remaining tokens into a fresh `N`.
    pub fn parse<N: Target>(&self) -> Result<N> {
        self.parser.parse(self.args)
    }

    /// Parses the nested command, stores it in `parent`, then runs the
    /// command's [`Subcommand::execute`] followed by the parent's
    /// [`CommandField::on_command`].
    pub fn bind<P, N>(&self, parent: &mut P) -> Result<()>
    where
        P: CommandField<N>,
        N: Subcommand<P>,
    {
        debug!(
            field = self.field(),
            alias = self.alias,
            remaining = self.args.len(),
            "Binding subcommand"
        );
        let nested: N = self.parse()?;
        parent.store_command(nested);

        let parent: &P = parent;
        let Some(command) = parent.command() else {
            return Err(ParseError::CommandNotStored {
                field: self.spec.field.clone(),
            });
        };
        command.execute(parent);
        parent.on_command(command);
        Ok(())
    }

    /// The error for a command the target does not route.
    pub fn unhandled(&self) -> ParseError {
        ParseError::UnhandledCommand {
            field: self.spec.field.clone(),
            alias: self.alias.to_string(),
        }
    }
}
