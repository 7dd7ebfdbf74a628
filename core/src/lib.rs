//! Flag/argument parsing and command-tree dispatch for interactive shells.
//!
//! This crate is the engine behind a prompt-driven command line:
//!
//! - [`FlagSchema`]: named flags (`-v`, `--verbose`, `--timeout=5s`) with
//!   typed defaults.
//! - [`ArgSchema`]: positional arguments with mandatory/optional ordering
//!   and a trailing list argument.
//! - [`Command`] and [`CommandTree`]: named, aliasable commands arranged in
//!   an arena-backed tree.
//! - [`CommandTree::dispatch`]: resolves a token list to a command, parses
//!   its effective flags and arguments into [`ResultMap`]s, and runs the
//!   handler.
//!
//! Registration problems are reported as [`ConfigError`] while the tree is
//! built. Problems with one input line are reported as [`Error`].
//!
//! The crate performs no I/O. Reading lines, splitting them into tokens, and
//! printing errors is up to the embedding application.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use command_shell_core::*;
//!
//! let mut root = Command::new("app", "demo application");
//! root.flags_mut().add(Some('v'), "verbose", false, "enable verbose mode").unwrap();
//! let mut tree = CommandTree::new(root).unwrap();
//!
//! let daemon = Command::new("daemon", "run the daemon")
//!     .alias("run")
//!     .with_flag(FlagDefinition::new(Some('t'), "timeout", Duration::from_secs(1), "timeout"))
//!     .unwrap()
//!     .with_arg(ArgDefinition::new::<bool>("production", "production mode", Some(false)))
//!     .unwrap()
//!     .run(|inv| {
//!         assert!(inv.flags().get::<bool>("verbose")?);
//!         assert_eq!(inv.flags().get::<Duration>("timeout")?, Duration::from_secs(5));
//!         assert!(inv.args().get::<bool>("production")?);
//!         Ok(())
//!     });
//! tree.add(tree.root(), daemon).unwrap();
//!
//! let line: Vec<String> = ["run", "-v", "--timeout=5s", "true"].map(String::from).to_vec();
//! tree.dispatch(&line).unwrap();
//! ```

mod args;
mod arity;
mod command;
mod describe;
mod error;
mod flags;
mod merge;
mod resolve;
mod results;
mod tree;
pub mod value;

pub use args::{ArgDefinition, ArgSchema};
pub use arity::{ArityFn, ExpectedArgs};
pub use command::{Command, Handler, HandlerError, HandlerResult};
pub use describe::CommandDescription;
pub use error::{ArityError, ConfigError, Error, Result, ValueError};
pub use flags::{END_OF_FLAGS, FlagDefinition, FlagSchema, SEPARATOR};
pub use merge::merge_flags;
pub use resolve::{Invocation, Resolution};
pub use results::{ResultEntry, ResultMap};
pub use tree::{CommandTree, NodeId};
pub use value::{
    IntegerSyntax, Scalar, ScalarKind, Typed, Value, ValueKind, decode, decode_list,
    decode_list_with, decode_with, format_duration, parse_duration,
};
