//! Command tree export.

use std::fmt::Write;

use command_shell_core::CommandDescription;

use crate::error::Result;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
}

/// Formats a tree description in the requested format.
pub fn format_description(desc: &CommandDescription, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(desc)?,
        OutputFormat::Yaml => serde_yaml::to_string(desc)?,
        OutputFormat::Markdown => description_to_markdown(desc),
    })
}

fn description_to_markdown(desc: &CommandDescription) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", desc.name);
    let _ = writeln!(out, "{}\n", desc.help);
    write_command_body(&mut out, desc);

    for sub in &desc.subcommands {
        write_command(&mut out, sub, &[], 2);
    }
    out
}

fn write_command(out: &mut String, desc: &CommandDescription, parents: &[&str], level: usize) {
    let mut path: Vec<&str> = parents.to_vec();
    path.push(&desc.name);

    let _ = writeln!(out, "{} {}\n", "#".repeat(level.min(6)), path.join(" "));
    let _ = writeln!(out, "{}\n", desc.long_help.as_deref().unwrap_or(&desc.help));
    if !desc.aliases.is_empty() {
        let aliases: Vec<String> = desc.aliases.iter().map(|a| format!("`{a}`")).collect();
        let _ = writeln!(out, "**Aliases:** {}\n", aliases.join(", "));
    }
    if let Some(group) = &desc.group {
        let _ = writeln!(out, "**Group:** {group}\n");
    }
    write_command_body(out, desc);

    for sub in &desc.subcommands {
        write_command(out, sub, &path, level + 1);
    }
}

fn write_command_body(out: &mut String, desc: &CommandDescription) {
    if !desc.flags.is_empty() {
        out.push_str("| Flag | Type | Default | Description |\n");
        out.push_str("|------|------|---------|-------------|\n");
        for flag in &desc.flags {
            let name = match flag.short {
                Some(short) => format!("-{short}, --{}", flag.long),
                None => format!("--{}", flag.long),
            };
            let _ = writeln!(
                out,
                "| `{name}` | {} | `{}` | {} |",
                flag.kind, flag.default, flag.help
            );
        }
        out.push('\n');
    }

    if !desc.args.is_empty() {
        out.push_str("| Argument | Type | Required | Default | Description |\n");
        out.push_str("|----------|------|----------|---------|-------------|\n");
        for arg in &desc.args {
            let default = arg
                .default
                .as_ref()
                .map(|value| format!("`{value}`"))
                .unwrap_or_default();
            let required = if arg.is_optional() { "no" } else { "yes" };
            let _ = writeln!(
                out,
                "| `{}` | {} | {required} | {default} | {} |",
                arg.name, arg.kind, arg.help
            );
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use command_shell_core::{ArgDefinition, Command, CommandTree};

    use super::*;

    fn tree() -> CommandTree {
        let mut root = Command::new("app", "demo app");
        root.flags_mut()
            .add(Some('v'), "verbose", false, "verbose mode")
            .unwrap();
        let mut tree = CommandTree::new(root).unwrap();
        let admin = tree
            .add(tree.root(), Command::new("admin", "admin tools").alias("a"))
            .unwrap();
        tree.add(
            admin,
            Command::new("root", "root the machine")
                .with_arg(ArgDefinition::new("level", "level", Some(3isize)))
                .unwrap()
                .run(|_| Ok(())),
        )
        .unwrap();
        tree
    }

    #[test]
    fn test_json_output() {
        let out = format_description(&tree().describe(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["subcommands"][0]["subcommands"][0]["name"], "root");
    }

    #[test]
    fn test_yaml_output() {
        let out = format_description(&tree().describe(), OutputFormat::Yaml).unwrap();
        assert!(out.contains("name: app"));
        assert!(out.contains("long: verbose"));
    }

    #[test]
    fn test_markdown_output() {
        let out = format_description(&tree().describe(), OutputFormat::Markdown).unwrap();
        assert!(out.starts_with("# app\n"));
        assert!(out.contains("## admin"));
        assert!(out.contains("**Aliases:** `a`"));
        assert!(out.contains("### admin root"));
        assert!(out.contains("| `-v, --verbose` | bool | `false` | verbose mode |"));
        assert!(out.contains("| `level` | int | no | `3` | level |"));
    }
}
