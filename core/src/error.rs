//! Error types for registration and dispatch.
//!
//! Two classes of failure exist:
//!
//! - [`ConfigError`] is returned while a command tree is being built (bad flag
//!   names, argument ordering violations, duplicate commands). These are meant
//!   to stop the program before it accepts any input.
//! - [`Error`] is returned from a single resolve/dispatch call. An interactive
//!   loop reports it and keeps reading lines.

use thiserror::Error;

use crate::command::HandlerError;
use crate::value::{ScalarKind, ValueKind};

/// Errors raised while registering flags, arguments, or commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Short flag is the reserved separator or whitespace.
    #[error("invalid short flag '{0}': must be a single non-separator character")]
    InvalidShortFlag(char),
    /// Long flag name is empty.
    #[error("empty long flag (short: {0:?})")]
    EmptyLongFlag(Option<char>),
    /// Long flag starts with `-` or contains `=` or whitespace.
    #[error("invalid long flag '{0}': must not start with '-' or contain '=' or whitespace")]
    InvalidLongFlag(String),
    /// Flag registered without help text.
    #[error("empty flag help message for flag '{0}'")]
    EmptyFlagHelp(String),
    /// Two flags in one schema share a short form.
    #[error("flag shortcut '-{0}' registered twice")]
    DuplicateShortFlag(char),
    /// Two flags in one schema share a long form.
    #[error("flag '--{0}' registered twice")]
    DuplicateFlag(String),
    /// Default value does not match the declared kind.
    #[error("default value for '{name}' is {found}, expected {expected}")]
    DefaultKindMismatch {
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },
    /// Argument registered with an empty name.
    #[error("empty argument name")]
    EmptyArgName,
    /// Argument registered without help text.
    #[error("missing help message for argument '{0}'")]
    EmptyArgHelp(String),
    /// Two arguments in one schema share a name.
    #[error("argument '{0}' registered twice")]
    DuplicateArg(String),
    /// Something was registered after a list argument.
    #[error("argument '{name}' registered after list argument '{list}'")]
    ArgAfterList { name: String, list: String },
    /// A mandatory argument followed an optional one.
    #[error("mandatory argument '{name}' registered after optional argument '{optional}'")]
    MandatoryAfterOptional { name: String, optional: String },
    /// Length bounds given for a scalar argument.
    #[error("length bounds set on non-list argument '{0}'")]
    BoundsOnScalar(String),
    /// `min` is greater than `max`.
    #[error("invalid length bounds for argument '{name}': min {min} > max {max}")]
    InvalidBounds { name: String, min: usize, max: usize },
    /// Command name or alias is empty.
    #[error("empty command name")]
    EmptyCommandName,
    /// Command name or alias starts with `-` or contains whitespace.
    #[error("invalid command name '{0}': must not start with '-' or contain whitespace")]
    InvalidCommandName(String),
    /// Command registered without help text.
    #[error("empty help message for command '{0}'")]
    EmptyCommandHelp(String),
    /// Name or alias collides with a sibling (or with the command itself).
    #[error("command name or alias '{0}' registered twice")]
    DuplicateCommand(String),
    /// Node handle does not belong to this tree.
    #[error("unknown command node #{0}")]
    UnknownNode(usize),
}

/// A token could not be decoded into the requested kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} value '{token}': {reason}")]
pub struct ValueError {
    /// The offending token.
    pub token: String,
    /// Kind the token was decoded as.
    pub kind: ScalarKind,
    /// Human-readable cause.
    pub reason: String,
}

/// Failure of an expected-args validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArityError {
    #[error("accepts no arg(s), received {received}")]
    NoneAllowed { received: usize },
    #[error("accepts {expected} arg(s), received {received}")]
    Exact { expected: usize, received: usize },
    #[error("requires at least {min} arg(s), only received {received}")]
    TooFew { min: usize, received: usize },
    #[error("accepts at most {max} arg(s), received {received}")]
    TooMany { max: usize, received: usize },
    #[error("accepts between {min} and {max} arg(s), received {received}")]
    OutOfRange {
        min: usize,
        max: usize,
        received: usize,
    },
    #[error("{0}")]
    Custom(String),
}

/// Errors returned from resolving and dispatching one input line.
#[derive(Debug, Error)]
pub enum Error {
    /// Flag-shaped token that matches no registered flag.
    #[error("invalid flag: {0}")]
    UnknownFlag(String),
    /// Value-requiring flag was the last token.
    #[error("missing value for flag --{0}")]
    MissingFlagValue(String),
    /// A flag or argument value failed to decode.
    #[error("invalid value for '{name}': {source}")]
    InvalidValue {
        name: String,
        #[source]
        source: ValueError,
    },
    /// Mandatory positional argument not supplied.
    #[error("missing argument '{0}'")]
    MissingArgument(String),
    /// List argument received fewer values than its minimum.
    #[error("argument '{name}' requires at least {min} value(s), received {received}")]
    TooFewValues {
        name: String,
        min: usize,
        received: usize,
    },
    /// List argument received more values than its maximum.
    #[error("argument '{name}' accepts at most {max} value(s), received {received}")]
    TooManyValues {
        name: String,
        max: usize,
        received: usize,
    },
    /// First token matches no subcommand and the current node cannot run.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// Empty input and the root has nothing to run.
    #[error("no command given")]
    NoCommand,
    /// A command group was named without one of its subcommands.
    #[error("command '{0}' requires a subcommand")]
    MissingSubcommand(String),
    /// Leaf command registered without a handler.
    #[error("command '{0}' has nothing to run")]
    NoHandler(String),
    /// Tokens left after argument parsing on a command that takes none.
    #[error("invalid usage of command '{command}' (unconsumed input '{}')", .input.join(" "))]
    UnconsumedInput { command: String, input: Vec<String> },
    /// Expected-args validator rejected the leftover tokens.
    #[error("command '{command}' {source}")]
    Arity {
        command: String,
        #[source]
        source: ArityError,
    },
    /// The command handler itself failed.
    #[error("{command}: {source}")]
    Handler {
        command: String,
        #[source]
        source: HandlerError,
    },
    /// Typed lookup of a name that was never registered.
    #[error("'{0}' is not registered")]
    NotRegistered(String),
    /// Typed lookup with the wrong Rust type.
    #[error("'{name}' holds a {found} value, not {expected}")]
    KindMismatch {
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },
}

impl Error {
    pub(crate) fn invalid_value(name: &str, source: ValueError) -> Self {
        Self::InvalidValue {
            name: name.to_string(),
            source,
        }
    }
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
