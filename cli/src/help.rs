//! Help text rendering.

use std::collections::BTreeMap;
use std::fmt::Write;

use command_shell_core::{ArgDefinition, CommandTree, Error, FlagDefinition, NodeId};

/// Settings for the application-level help page.
#[derive(Debug, Clone)]
pub struct HelpOptions {
    pub description: String,
    /// Group commands under their help group.
    pub groups: bool,
}

const DEFAULT_GROUP: &str = "Commands";

/// Walks `names` down from the root, for `help admin root`.
pub fn lookup(tree: &CommandTree, names: &[String]) -> Result<Vec<NodeId>, Error> {
    let mut path = vec![tree.root()];
    let mut node = tree.root();
    for name in names {
        node = tree
            .find_child(node, name)
            .ok_or_else(|| Error::UnknownCommand(name.clone()))?;
        path.push(node);
    }
    Ok(path)
}

/// Help page listing every top-level command and the root flags.
pub fn render_app_help(tree: &CommandTree, options: &HelpOptions) -> String {
    let mut out = String::new();
    let root = tree.root();

    if !options.description.is_empty() {
        let _ = writeln!(out, "{}\n", options.description);
    }

    write_commands(&mut out, tree, root, options.groups);

    let flags = tree.command(root).flags().sorted();
    if !flags.is_empty() {
        section(&mut out, "Flags");
        write_flags(&mut out, &flags);
    }
    out
}

/// Help page for the last command of `path`.
pub fn render_command_help(tree: &CommandTree, path: &[NodeId]) -> String {
    let Some(&node) = path.last() else {
        return String::new();
    };
    let command = tree.command(node);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}\n",
        command.long_help_text().unwrap_or(command.help())
    );

    section(&mut out, "Usage");
    let _ = writeln!(out, "  {}\n", usage_line(tree, path));

    if !command.aliases().is_empty() {
        section(&mut out, "Aliases");
        let _ = writeln!(out, "  {}\n", command.aliases().join(", "));
    }

    let args: Vec<&ArgDefinition> = command.args().iter().collect();
    if !args.is_empty() {
        section(&mut out, "Args");
        write_args(&mut out, &args);
    }

    let own = command.flags().sorted();
    if !own.is_empty() {
        section(&mut out, "Flags");
        write_flags(&mut out, &own);
    }

    let effective = tree.effective_flags(path);
    let inherited: Vec<&FlagDefinition> = effective
        .sorted()
        .into_iter()
        .filter(|flag| command.flags().get(&flag.long).is_none())
        .collect();
    if !inherited.is_empty() {
        section(&mut out, "Inherited Flags");
        write_flags(&mut out, &inherited);
    }

    if tree.has_children(node) {
        write_commands(&mut out, tree, node, false);
    }

    out
}

fn usage_line(tree: &CommandTree, path: &[NodeId]) -> String {
    let Some(&node) = path.last() else {
        return String::new();
    };
    let command = tree.command(node);
    if let Some(usage) = command.usage_text() {
        return usage.to_string();
    }

    let mut parts: Vec<String> = tree
        .path_names(path)
        .into_iter()
        .map(str::to_string)
        .collect();
    if !tree.effective_flags(path).is_empty() {
        parts.push("[flags]".to_string());
    }
    for arg in command.args().iter() {
        let name = if arg.is_list() {
            format!("{}...", arg.name)
        } else {
            arg.name.clone()
        };
        parts.push(if arg.is_optional() {
            format!("[{name}]")
        } else {
            format!("<{name}>")
        });
    }
    if command.allows_raw_args() || command.expected().is_some() {
        parts.push("[args...]".to_string());
    }
    if tree.has_children(node) {
        parts.push("<command>".to_string());
    }
    parts.join(" ")
}

fn write_commands(out: &mut String, tree: &CommandTree, node: NodeId, groups: bool) {
    let mut sections: BTreeMap<&str, Vec<(&str, &str)>> = BTreeMap::new();
    for &child in tree.children(node) {
        let command = tree.command(child);
        let group = if groups {
            command.group_name().unwrap_or(DEFAULT_GROUP)
        } else {
            DEFAULT_GROUP
        };
        sections
            .entry(group)
            .or_default()
            .push((command.name(), command.help()));
    }

    let default = sections.remove(DEFAULT_GROUP);
    let ordered = default
        .map(|rows| (DEFAULT_GROUP, rows))
        .into_iter()
        .chain(sections);

    for (title, mut rows) in ordered {
        rows.sort_by(|a, b| a.0.cmp(b.0));
        section(out, title);
        let rows: Vec<(String, String)> = rows
            .into_iter()
            .map(|(name, help)| (name.to_string(), help.to_string()))
            .collect();
        write_table(out, &rows);
    }
}

fn write_flags(out: &mut String, flags: &[&FlagDefinition]) {
    let rows: Vec<(String, String)> = flags
        .iter()
        .map(|flag| {
            let short = flag
                .short
                .map(|c| format!("-{c}, "))
                .unwrap_or_else(|| "    ".to_string());
            let left = if flag.allows_omitted_value {
                format!("{short}--{}", flag.long)
            } else {
                format!("{short}--{} {}", flag.long, flag.kind)
            };
            let right = if flag.shows_default() {
                format!("{} (default: {})", flag.help, flag.default)
            } else {
                flag.help.clone()
            };
            (left, right)
        })
        .collect();
    write_table(out, &rows);
}

fn write_args(out: &mut String, args: &[&ArgDefinition]) {
    let rows: Vec<(String, String)> = args
        .iter()
        .map(|arg| {
            let left = format!("{} {}", arg.name, arg.kind);
            let right = match &arg.default {
                Some(default) if arg.shows_default() => {
                    format!("{} (default: {default})", arg.help)
                }
                _ => arg.help.clone(),
            };
            (left, right)
        })
        .collect();
    write_table(out, &rows);
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}:");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count() + 1));
}

fn write_table(out: &mut String, rows: &[(String, String)]) {
    let width = rows
        .iter()
        .map(|(left, _)| left.chars().count())
        .max()
        .unwrap_or(0);
    for (left, right) in rows {
        let _ = writeln!(out, "  {left:<width$}  {right}");
    }
    out.push('\n');
}
