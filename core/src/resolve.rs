//! Command resolution and dispatch.
//!
//! Dispatching a line runs these steps:
//!
//! 1. Walk down the tree while the next token names a child (exact name or
//!    alias match). Command names are always tried before anything else.
//! 2. Merge the flag schemas along the matched path, nearest first.
//! 3. Parse flags, then apply base flags, then parse positional arguments.
//! 4. Check the leftover tokens against the command's expected-args
//!    validator or raw-args setting.
//! 5. Call the handler.

use tracing::debug;

use crate::command::Command;
use crate::error::{Error, Result};
use crate::flags::FlagSchema;
use crate::merge::merge_flags;
use crate::results::ResultMap;
use crate::tree::{CommandTree, NodeId};
use crate::value::ValueKind;

/// Outcome of walking the tree for one token list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    /// The matched command.
    pub node: NodeId,
    /// Root first, `node` last.
    pub path: Vec<NodeId>,
    /// Tokens after the last command name.
    pub remaining: &'a [String],
}

/// A fully parsed command line, ready to run.
#[derive(Debug)]
pub struct Invocation<'t> {
    tree: &'t CommandTree,
    node: NodeId,
    path: Vec<NodeId>,
    flags: ResultMap,
    args: ResultMap,
    raw_args: Vec<String>,
}

impl<'t> Invocation<'t> {
    pub fn tree(&self) -> &'t CommandTree {
        self.tree
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn command(&self) -> &'t Command {
        self.tree.command(self.node)
    }

    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// Effective flag results, ancestors' flags included.
    pub fn flags(&self) -> &ResultMap {
        &self.flags
    }

    pub fn args(&self) -> &ResultMap {
        &self.args
    }

    /// Leftover tokens accepted by the expected-args validator or the
    /// raw-args setting.
    pub fn raw_args(&self) -> &[String] {
        &self.raw_args
    }

    /// Space-separated command names, e.g. `admin root`.
    pub fn command_path(&self) -> String {
        command_path(self.tree, &self.path)
    }

    /// Runs the command handler.
    ///
    /// # Errors
    ///
    /// [`Error::NoHandler`] if the command has none, [`Error::Handler`] if
    /// the handler fails.
    pub fn run(&self) -> Result<()> {
        let handler = self
            .command()
            .handler()
            .ok_or_else(|| Error::NoHandler(self.command_path()))?;
        debug!(command = %self.command_path(), "running handler");
        handler(self).map_err(|source| Error::Handler {
            command: self.command_path(),
            source,
        })
    }
}

impl CommandTree {
    /// Finds the command named by the leading tokens.
    ///
    /// # Errors
    ///
    /// Fails when the walk ends on a command without a handler:
    /// [`Error::NoCommand`] for empty input at the root,
    /// [`Error::UnknownCommand`] when the next token names no child,
    /// [`Error::MissingSubcommand`] for a command group given alone, and
    /// [`Error::NoHandler`] for a leaf without a handler.
    pub fn resolve<'a>(&self, tokens: &'a [String]) -> Result<Resolution<'a>> {
        let mut node = self.root();
        let mut path = vec![node];
        let mut rest = tokens;

        while let Some((token, tail)) = rest.split_first() {
            let Some(child) = self.find_child(node, token) else {
                break;
            };
            node = child;
            path.push(child);
            rest = tail;
        }

        debug!(
            command = %command_path(self, &path),
            remaining = ?rest,
            "resolved command"
        );

        if self.command(node).has_handler() {
            return Ok(Resolution {
                node,
                path,
                remaining: rest,
            });
        }

        Err(match rest.first() {
            None if node == self.root() => Error::NoCommand,
            Some(token) if node == self.root() || self.has_children(node) => {
                Error::UnknownCommand(token.clone())
            }
            None if self.has_children(node) => {
                Error::MissingSubcommand(command_path(self, &path))
            }
            _ => Error::NoHandler(command_path(self, &path)),
        })
    }

    /// Flags visible to the last command of `path`: its own plus every
    /// ancestor's, nearer definitions shadowing farther ones.
    pub fn effective_flags(&self, path: &[NodeId]) -> FlagSchema {
        merge_flags(path.iter().rev().map(|&id| self.command(id).flags()))
    }

    /// Resolves and parses a token list without running the handler.
    ///
    /// `base` holds flag results parsed once at startup against the root's
    /// flags. Its explicit entries replace defaulted entries of this parse,
    /// except for names a command below the root redefines.
    pub fn parse(&self, tokens: &[String], base: Option<&ResultMap>) -> Result<Invocation<'_>> {
        let Resolution {
            node,
            path,
            remaining,
        } = self.resolve(tokens)?;
        let command = self.command(node);

        let schema = self.effective_flags(&path);
        let mut flags = ResultMap::new();
        let rest = schema.parse(remaining, &mut flags)?;
        if let Some(base) = base {
            flags.apply_base(&self.inherited_base(&path, &schema, base));
        }

        let mut args = ResultMap::new();
        let rest = command.args().parse(rest, &mut args)?;

        if let Some(expected) = command.expected() {
            expected.validate(rest).map_err(|source| Error::Arity {
                command: command_path(self, &path),
                source,
            })?;
        } else if !rest.is_empty() && !command.allows_raw_args() {
            return Err(Error::UnconsumedInput {
                command: command_path(self, &path),
                input: rest.to_vec(),
            });
        }

        Ok(Invocation {
            tree: self,
            node,
            path,
            flags,
            args,
            raw_args: rest.to_vec(),
        })
    }

    /// Base entries still owned by the root along `path`: no command below
    /// the root redefines the name, and the effective definition has the
    /// base value's kind.
    fn inherited_base(
        &self,
        path: &[NodeId],
        schema: &FlagSchema,
        base: &ResultMap,
    ) -> ResultMap {
        let mut inherited = ResultMap::new();
        for (name, entry) in base.iter() {
            let shadowed = path
                .iter()
                .skip(1)
                .any(|&id| self.command(id).flags().get(name).is_some());
            let same_kind = schema
                .get(name)
                .is_some_and(|flag| ValueKind::Scalar(flag.kind) == entry.value.kind());
            if !shadowed && same_kind {
                inherited.insert(name, entry.value.clone(), entry.is_default);
            }
        }
        inherited
    }

    /// Parses `tokens` and runs the matched handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::{Arc, Mutex};
    /// use command_shell_core::{Command, CommandTree};
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let sink = Arc::clone(&seen);
    ///
    /// let mut tree = CommandTree::new(Command::new("app", "demo")).unwrap();
    /// let mut greet = Command::new("greet", "say hello").alias("hi").run(move |inv| {
    ///     let name = inv.args().get::<String>("name")?;
    ///     sink.lock().unwrap().push(name);
    ///     Ok(())
    /// });
    /// greet.args_mut().add("name", "who to greet", Some("world".to_string())).unwrap();
    /// tree.add(tree.root(), greet).unwrap();
    ///
    /// tree.dispatch(&["hi".to_string(), "rust".to_string()]).unwrap();
    /// tree.dispatch(&["greet".to_string()]).unwrap();
    /// assert_eq!(*seen.lock().unwrap(), ["rust", "world"]);
    /// ```
    pub fn dispatch(&self, tokens: &[String]) -> Result<()> {
        self.parse(tokens, None)?.run()
    }

    /// Like [`dispatch`](Self::dispatch), with startup base flags applied.
    pub fn dispatch_with(&self, tokens: &[String], base: &ResultMap) -> Result<()> {
        self.parse(tokens, Some(base))?.run()
    }
}

/// Names along `path` joined by spaces; the root's own name for the root.
fn command_path(tree: &CommandTree, path: &[NodeId]) -> String {
    let names = tree.path_names(path);
    if names.is_empty() {
        tree.command(tree.root()).name().to_string()
    } else {
        names.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arity::ExpectedArgs;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample_tree() -> CommandTree {
        let mut root = Command::new("app", "test app");
        root.flags_mut()
            .add(Some('v'), "verbose", false, "verbose")
            .unwrap();
        let mut tree = CommandTree::new(root).unwrap();
        let top = tree.root();

        let admin = tree
            .add(top, Command::new("admin", "admin tools"))
            .unwrap();
        tree.add(admin, Command::new("root", "become root").run(|_| Ok(())))
            .unwrap();
        tree.add(admin, Command::new("stub", "no handler")).unwrap();

        tree.add(
            top,
            Command::new("echo", "echo")
                .expected_args(ExpectedArgs::Max(2))
                .run(|_| Ok(())),
        )
        .unwrap();
        tree.add(top, Command::new("raw", "raw").allow_raw_args().run(|_| Ok(())))
            .unwrap();
        tree.add(top, Command::new("strict", "strict").run(|_| Ok(())))
            .unwrap();
        tree
    }

    #[test]
    fn test_resolve_nested_path() {
        let tree = sample_tree();
        let input = tokens(&["admin", "root", "-v"]);
        let resolution = tree.resolve(&input).unwrap();
        assert_eq!(tree.command(resolution.node).name(), "root");
        assert_eq!(tree.path_names(&resolution.path), ["admin", "root"]);
        assert_eq!(resolution.remaining, ["-v"]);
    }

    #[test]
    fn test_resolve_failures() {
        let tree = sample_tree();
        assert!(matches!(tree.resolve(&[]), Err(Error::NoCommand)));
        assert!(matches!(
            tree.resolve(&tokens(&["xyz"])),
            Err(Error::UnknownCommand(ref t)) if t == "xyz"
        ));
        assert!(matches!(
            tree.resolve(&tokens(&["admin"])),
            Err(Error::MissingSubcommand(ref c)) if c == "admin"
        ));
        assert!(matches!(
            tree.resolve(&tokens(&["admin", "nope"])),
            Err(Error::UnknownCommand(ref t)) if t == "nope"
        ));
        assert!(matches!(
            tree.resolve(&tokens(&["admin", "stub"])),
            Err(Error::NoHandler(ref c)) if c == "admin stub"
        ));
    }

    #[test]
    fn test_leftover_handling() {
        let tree = sample_tree();

        let inv = tree.parse(&tokens(&["echo", "a", "b"]), None).unwrap();
        assert_eq!(inv.raw_args(), ["a", "b"]);
        let err = tree
            .parse(&tokens(&["echo", "a", "b", "c"]), None)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "command 'echo' accepts at most 2 arg(s), received 3"
        );

        let inv = tree.parse(&tokens(&["raw", "x", "y"]), None).unwrap();
        assert_eq!(inv.raw_args(), ["x", "y"]);

        let err = tree.parse(&tokens(&["strict", "x"]), None).unwrap_err();
        assert!(matches!(err, Error::UnconsumedInput { ref input, .. } if input == &["x"]));
        assert!(tree.parse(&tokens(&["strict"]), None).is_ok());
    }

    #[test]
    fn test_parse_inherits_root_flags() {
        let tree = sample_tree();
        let inv = tree
            .parse(&tokens(&["admin", "root", "--verbose"]), None)
            .unwrap();
        assert!(inv.flags().get::<bool>("verbose").unwrap());
        assert_eq!(inv.command_path(), "admin root");
    }

    #[test]
    fn test_base_flags_fill_defaults_only() {
        let tree = sample_tree();
        let mut base = ResultMap::new();
        tree.effective_flags(&[tree.root()])
            .parse(&tokens(&["-v"]), &mut base)
            .unwrap();

        let inv = tree.parse(&tokens(&["strict"]), Some(&base)).unwrap();
        assert!(inv.flags().get::<bool>("verbose").unwrap());
        assert!(!inv.flags().is_default("verbose"));

        let inv = tree
            .parse(&tokens(&["strict", "--verbose=false"]), Some(&base))
            .unwrap();
        assert!(!inv.flags().get::<bool>("verbose").unwrap());
    }

    #[test]
    fn test_base_flags_skip_shadowed_names() {
        let mut tree = sample_tree();
        let mut level = Command::new("level", "own verbose").run(|_| Ok(()));
        level
            .flags_mut()
            .add(None, "verbose", 0u8, "verbosity level")
            .unwrap();
        let level = tree.add(tree.root(), level).unwrap();

        let mut base = ResultMap::new();
        tree.effective_flags(&[tree.root()])
            .parse(&tokens(&["-v"]), &mut base)
            .unwrap();

        let inv = tree.parse(&tokens(&["level"]), Some(&base)).unwrap();
        assert_eq!(inv.node(), level);
        assert_eq!(inv.flags().get::<u8>("verbose").unwrap(), 0);
        assert!(inv.flags().is_default("verbose"));

        let inv = tree
            .parse(&tokens(&["level", "--verbose", "2"]), Some(&base))
            .unwrap();
        assert_eq!(inv.flags().get::<u8>("verbose").unwrap(), 2);

        let inv = tree.parse(&tokens(&["strict"]), Some(&base)).unwrap();
        assert!(inv.flags().get::<bool>("verbose").unwrap());
    }

    #[test]
    fn test_handler_error_is_wrapped() {
        let mut tree = CommandTree::new(Command::new("app", "app")).unwrap();
        tree.add(
            tree.root(),
            Command::new("fail", "always fails").run(|_| Err("boom".into())),
        )
        .unwrap();

        let err = tree.dispatch(&tokens(&["fail"])).unwrap_err();
        assert_eq!(err.to_string(), "fail: boom");
        assert!(matches!(err, Error::Handler { ref command, .. } if command == "fail"));
    }
}
