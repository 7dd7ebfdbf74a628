//! Built-in shell commands: `help`, `exit`, `clear`.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use command_shell_core::{Command, CommandTree, ConfigError, ExpectedArgs};

use crate::help::{self, HelpOptions};

const GROUP: &str = "Builtins";

/// Adds the built-in commands to the root of `tree`.
///
/// `exit` sets `exit_flag`; the read loop stops once it is set.
pub fn register(
    tree: &mut CommandTree,
    options: HelpOptions,
    exit_flag: Arc<AtomicBool>,
) -> Result<(), ConfigError> {
    let root = tree.root();

    tree.add(
        root,
        Command::new("help", "display help")
            .group(GROUP)
            .usage("help [command...]")
            .expected_args(ExpectedArgs::Arbitrary)
            .run(move |inv| {
                let tree = inv.tree();
                let text = if inv.raw_args().is_empty() {
                    help::render_app_help(tree, &options)
                } else {
                    let path = help::lookup(tree, inv.raw_args())?;
                    help::render_command_help(tree, &path)
                };
                print!("{text}");
                Ok(())
            }),
    )?;

    tree.add(
        root,
        Command::new("exit", "exit the shell")
            .alias("quit")
            .group(GROUP)
            .expected_args(ExpectedArgs::NoArgs)
            .run(move |_| {
                exit_flag.store(true, Ordering::SeqCst);
                Ok(())
            }),
    )?;

    tree.add(
        root,
        Command::new("clear", "clear the screen")
            .group(GROUP)
            .expected_args(ExpectedArgs::NoArgs)
            .run(|_| {
                let mut stdout = std::io::stdout();
                stdout.write_all(b"\x1b[2J\x1b[1;1H")?;
                stdout.flush()?;
                Ok(())
            }),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (CommandTree, Arc<AtomicBool>) {
        let mut tree = CommandTree::new(Command::new("app", "app")).unwrap();
        let flag = Arc::new(AtomicBool::new(false));
        let options = HelpOptions {
            description: String::new(),
            groups: true,
        };
        register(&mut tree, options, Arc::clone(&flag)).unwrap();
        (tree, flag)
    }

    #[test]
    fn test_exit_and_quit_set_flag() {
        let (tree, flag) = setup();
        tree.dispatch(&["quit".to_string()]).unwrap();
        assert!(flag.load(Ordering::SeqCst));

        assert!(tree.dispatch(&["exit".to_string(), "now".to_string()]).is_err());
    }

    #[test]
    fn test_help_unknown_command() {
        let (tree, _) = setup();
        let err = tree
            .dispatch(&["help".to_string(), "nope".to_string()])
            .unwrap_err();
        assert_eq!(err.to_string(), "help: unknown command: nope");
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let (mut tree, flag) = setup();
        let options = HelpOptions {
            description: String::new(),
            groups: false,
        };
        assert_eq!(
            register(&mut tree, options, flag).unwrap_err(),
            ConfigError::DuplicateCommand("help".into())
        );
    }
}
