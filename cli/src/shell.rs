//! Interactive read-eval loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use command_shell_core::{CommandTree, ResultMap};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use tracing::{debug, warn};

use crate::config::ShellConfig;
use crate::error::Result;
use crate::tokenize::tokenize;

/// A command tree plus the state shared across input lines.
pub struct Shell {
    tree: CommandTree,
    config: ShellConfig,
    /// Flag results parsed from process arguments, applied to every line.
    base: ResultMap,
    exit: Arc<AtomicBool>,
}

impl Shell {
    pub fn new(tree: CommandTree, config: ShellConfig, exit: Arc<AtomicBool>) -> Self {
        Self {
            tree,
            config,
            base: ResultMap::new(),
            exit,
        }
    }

    /// Parses leading root flags from process arguments and keeps them as
    /// base flags. Returns the remaining tokens.
    pub fn set_base_flags<'a>(&mut self, tokens: &'a [String]) -> Result<&'a [String]> {
        let mut base = ResultMap::new();
        let rest = self
            .tree
            .effective_flags(&[self.tree.root()])
            .parse(tokens, &mut base)?;
        let explicit: Vec<&str> = base
            .iter()
            .filter(|(_, entry)| !entry.is_default)
            .map(|(name, _)| name)
            .collect();
        debug!(?explicit, "parsed base flags");
        self.base = base;
        Ok(rest)
    }

    /// Runs one already-tokenized command.
    pub fn run_tokens(&self, tokens: &[String]) -> Result<()> {
        self.tree.dispatch_with(tokens, &self.base)?;
        Ok(())
    }

    /// Tokenizes and runs one input line. Blank lines are ignored.
    pub fn run_line(&self, line: &str) -> Result<()> {
        let tokens = tokenize(line)?;
        if tokens.is_empty() {
            return Ok(());
        }
        debug!(?tokens, "dispatching line");
        self.run_tokens(&tokens)
    }

    /// Reads lines until `exit`, Ctrl-D, or an editor failure.
    ///
    /// Errors from a single line are printed and the loop continues.
    pub fn repl(&self) -> Result<()> {
        let editor_config = Config::builder()
            .max_history_size(self.config.history_limit)?
            .auto_add_history(false)
            .build();
        let mut editor: Editor<(), DefaultHistory> = Editor::with_config(editor_config)?;

        if let Some(path) = &self.config.history_file
            && path.exists()
            && let Err(err) = editor.load_history(path)
        {
            warn!(path = %path.display(), %err, "failed to load history");
        }

        let prompt = self.config.prompt();
        while !self.exit.load(Ordering::SeqCst) {
            match editor.readline(&prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    editor.add_history_entry(line.as_str())?;
                    if let Err(err) = self.run_line(&line) {
                        eprintln!("error: {err}");
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        if let Some(path) = &self.config.history_file {
            editor.save_history(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;

    fn shell() -> Shell {
        let tree = demo::build_tree("foo", "demo").unwrap();
        Shell::new(tree, ShellConfig::default(), Arc::new(AtomicBool::new(false)))
    }

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_base_flags_stop_at_command() {
        let mut shell = shell();
        let input = tokens(&["-v", "--directory", "/srv", "daemon", "true"]);
        let rest = shell.set_base_flags(&input).unwrap();
        assert_eq!(rest, ["daemon", "true"]);
        assert!(shell.base.get::<bool>("verbose").unwrap());
        assert_eq!(shell.base.get::<String>("directory").unwrap(), "/srv");
    }

    #[test]
    fn test_base_flags_reject_unknown() {
        let mut shell = shell();
        assert!(shell.set_base_flags(&tokens(&["--nope"])).is_err());
    }

    #[test]
    fn test_run_line() {
        let shell = shell();
        assert!(shell.run_line("   ").is_ok());
        assert!(shell.run_line("echo 'a b' c").is_ok());
        assert!(shell.run_line("echo \"open").is_err());
        assert!(shell.run_line("nope").is_err());
    }
}
