//! Command definitions.

use std::fmt;
use std::sync::Arc;

use crate::args::{ArgDefinition, ArgSchema};
use crate::arity::ExpectedArgs;
use crate::error::ConfigError;
use crate::flags::{FlagDefinition, FlagSchema, SEPARATOR};
use crate::resolve::Invocation;

/// Error type returned by command handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by command handlers.
pub type HandlerResult = std::result::Result<(), HandlerError>;

/// A command handler.
pub type Handler = Arc<dyn Fn(&Invocation<'_>) -> HandlerResult + Send + Sync>;

/// One named command: its schemas, help texts, and handler.
///
/// Built with chained calls and then added to a
/// [`CommandTree`](crate::CommandTree), which checks names against siblings.
///
/// # Examples
///
/// ```
/// use command_shell_core::{Command, ExpectedArgs, FlagDefinition};
///
/// let cmd = Command::new("daemon", "run the daemon")
///     .alias("run")
///     .group("Admin Commands")
///     .with_flag(FlagDefinition::new(Some('t'), "timeout", 5u32, "timeout"))
///     .unwrap()
///     .expected_args(ExpectedArgs::NoArgs)
///     .run(|_| Ok(()));
///
/// assert!(cmd.matches("run"));
/// assert!(cmd.has_handler());
/// assert_eq!(cmd.flags().len(), 1);
/// ```
#[derive(Clone)]
pub struct Command {
    name: String,
    aliases: Vec<String>,
    help: String,
    long_help: Option<String>,
    usage: Option<String>,
    group: Option<String>,
    flags: FlagSchema,
    args: ArgSchema,
    expected_args: Option<ExpectedArgs>,
    allow_raw_args: bool,
    handler: Option<Handler>,
}

impl Command {
    pub fn new(name: &str, help: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            help: help.to_string(),
            long_help: None,
            usage: None,
            group: None,
            flags: FlagSchema::new(),
            args: ArgSchema::new(),
            expected_args: None,
            allow_raw_args: false,
            handler: None,
        }
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn long_help(mut self, text: &str) -> Self {
        self.long_help = Some(text.to_string());
        self
    }

    /// Overrides the generated usage line in help output.
    pub fn usage(mut self, usage: &str) -> Self {
        self.usage = Some(usage.to_string());
        self
    }

    /// Help section this command is listed under.
    pub fn group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn with_flag(mut self, flag: FlagDefinition) -> Result<Self, ConfigError> {
        self.flags.register(flag)?;
        Ok(self)
    }

    pub fn with_arg(mut self, arg: ArgDefinition) -> Result<Self, ConfigError> {
        self.args.register(arg)?;
        Ok(self)
    }

    pub fn flags_mut(&mut self) -> &mut FlagSchema {
        &mut self.flags
    }

    pub fn args_mut(&mut self) -> &mut ArgSchema {
        &mut self.args
    }

    /// Validator for tokens left after positional parsing. Accepted tokens
    /// are passed to the handler as raw args.
    pub fn expected_args(mut self, expected: ExpectedArgs) -> Self {
        self.expected_args = Some(expected);
        self
    }

    /// Passes leftover tokens to the handler instead of failing.
    pub fn allow_raw_args(mut self) -> Self {
        self.allow_raw_args = true;
        self
    }

    pub fn run<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn long_help_text(&self) -> Option<&str> {
        self.long_help.as_deref()
    }

    pub fn usage_text(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    pub fn group_name(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn flags(&self) -> &FlagSchema {
        &self.flags
    }

    pub fn args(&self) -> &ArgSchema {
        &self.args
    }

    pub fn expected(&self) -> Option<&ExpectedArgs> {
        self.expected_args.as_ref()
    }

    pub fn allows_raw_args(&self) -> bool {
        self.allow_raw_args
    }

    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Exact match against the name or any alias.
    pub fn matches(&self, token: &str) -> bool {
        self.names().any(|name| name == token)
    }

    /// The name followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Checks name, aliases, and help text.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.help.trim().is_empty() {
            return Err(ConfigError::EmptyCommandHelp(self.name.clone()));
        }
        let mut seen: Vec<&str> = Vec::new();
        for name in self.names() {
            validate_name(name)?;
            if seen.contains(&name) {
                return Err(ConfigError::DuplicateCommand(name.to_string()));
            }
            seen.push(name);
        }
        Ok(())
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("help", &self.help)
            .field("group", &self.group)
            .field("flags", &self.flags)
            .field("args", &self.args)
            .field("expected_args", &self.expected_args)
            .field("allow_raw_args", &self.allow_raw_args)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

fn validate_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::EmptyCommandName);
    }
    if name.starts_with(SEPARATOR) || name.contains(char::is_whitespace) {
        return Err(ConfigError::InvalidCommandName(name.to_string()));
    }
    Ok(())
}
