//! Arena-backed command tree.
//!
//! Nodes live in one `Vec` and refer to their children by [`NodeId`].
//! Resolution walks top-down only, so no parent links are stored.

use crate::command::Command;
use crate::error::ConfigError;

/// Stable handle to a node in a [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Node {
    command: Command,
    children: Vec<NodeId>,
}

/// A root command and its nested subcommands.
///
/// The tree is built once at startup. Every `add` call validates the new
/// command against its siblings, so a successfully built tree has unique,
/// well-formed names at every level.
///
/// # Examples
///
/// ```
/// use command_shell_core::{Command, CommandTree};
///
/// let mut tree = CommandTree::new(Command::new("app", "demo app")).unwrap();
/// let admin = tree.add(tree.root(), Command::new("admin", "admin tools")).unwrap();
/// tree.add(admin, Command::new("root", "become root").run(|_| Ok(()))).unwrap();
///
/// let found = tree.find_child(admin, "root").unwrap();
/// assert_eq!(tree.command(found).name(), "root");
/// assert!(tree.add(admin, Command::new("root", "again")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CommandTree {
    nodes: Vec<Node>,
}

impl CommandTree {
    /// Creates a tree around the root command. The root's name is the
    /// application name and is never matched against input.
    pub fn new(root: Command) -> Result<Self, ConfigError> {
        root.validate()?;
        Ok(Self {
            nodes: vec![Node {
                command: root,
                children: Vec::new(),
            }],
        })
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Adds `command` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Fails if `parent` is not in this tree, the command's names are
    /// invalid, or any name or alias is already used by a sibling.
    pub fn add(&mut self, parent: NodeId, command: Command) -> Result<NodeId, ConfigError> {
        if parent.0 >= self.nodes.len() {
            return Err(ConfigError::UnknownNode(parent.0));
        }
        command.validate()?;

        for &sibling in &self.nodes[parent.0].children {
            let existing = &self.nodes[sibling.0].command;
            if let Some(clash) = command.names().find(|name| existing.matches(name)) {
                return Err(ConfigError::DuplicateCommand(clash.to_string()));
            }
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            command,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Returns the command stored at `id`.
    ///
    /// Handles only come from this tree, so `id` is always in range.
    pub fn command(&self, id: NodeId) -> &Command {
        &self.nodes[id.0].command
    }

    /// Mutable access for late registration before dispatch starts.
    pub fn command_mut(&mut self, id: NodeId) -> &mut Command {
        &mut self.nodes[id.0].command
    }

    pub fn get(&self, id: NodeId) -> Option<&Command> {
        self.nodes.get(id.0).map(|node| &node.command)
    }

    /// Children in registration order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        !self.nodes[id.0].children.is_empty()
    }

    /// Child whose name or alias equals `token` exactly.
    pub fn find_child(&self, id: NodeId, token: &str) -> Option<NodeId> {
        self.nodes[id.0]
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child.0].command.matches(token))
    }

    /// Names along a resolved path, skipping the root.
    pub fn path_names(&self, path: &[NodeId]) -> Vec<&str> {
        path.iter()
            .filter(|&&id| id != self.root())
            .map(|&id| self.command(id).name())
            .collect()
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
