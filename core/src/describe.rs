//! Serializable snapshot of a command tree.
//!
//! Used for exporting the tree as JSON or YAML and for rendering reference
//! documentation.

use serde::Serialize;

use crate::args::ArgDefinition;
use crate::flags::FlagDefinition;
use crate::tree::{CommandTree, NodeId};

/// One command with its schemas and nested subcommands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandDescription {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    pub help: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_help: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub runnable: bool,
    pub allow_raw_args: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagDefinition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgDefinition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<CommandDescription>,
}

impl CommandTree {
    /// Describes the whole tree starting at the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_shell_core::{Command, CommandTree};
    ///
    /// let mut tree = CommandTree::new(Command::new("app", "demo")).unwrap();
    /// tree.add(tree.root(), Command::new("ping", "check liveness").alias("p")).unwrap();
    ///
    /// let desc = tree.describe();
    /// assert_eq!(desc.name, "app");
    /// assert_eq!(desc.subcommands[0].aliases, ["p"]);
    /// ```
    pub fn describe(&self) -> CommandDescription {
        self.describe_node(self.root())
    }

    /// Describes the subtree rooted at `id`.
    pub fn describe_node(&self, id: NodeId) -> CommandDescription {
        let command = self.command(id);
        CommandDescription {
            name: command.name().to_string(),
            aliases: command.aliases().to_vec(),
            help: command.help().to_string(),
            long_help: command.long_help_text().map(str::to_string),
            usage: command.usage_text().map(str::to_string),
            group: command.group_name().map(str::to_string),
            runnable: command.has_handler(),
            allow_raw_args: command.allows_raw_args(),
            flags: command.flags().iter().cloned().collect(),
            args: command.args().iter().cloned().collect(),
            subcommands: self
                .children(id)
                .iter()
                .map(|&child| self.describe_node(child))
                .collect(),
        }
    }
}
