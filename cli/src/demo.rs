//! Demo command set.
//!
//! A small daemon-management app that exercises every flag and argument kind.

use std::time::Duration;

use command_shell_core::{
    ArgDefinition, Command, CommandTree, ConfigError, ExpectedArgs, HandlerResult, Invocation,
    format_duration,
};

/// Builds the demo tree: root flags plus `daemon`, `admin root`, `args`,
/// `flags`, and `echo`.
pub fn build_tree(name: &str, help: &str) -> Result<CommandTree, ConfigError> {
    let mut root = Command::new(name, help);
    root.flags_mut()
        .string(
            Some('d'),
            "directory",
            "DEFAULT",
            "set an alternative root directory path",
        )?
        .add(Some('v'), "verbose", false, "enable verbose mode")?;

    let mut tree = CommandTree::new(root)?;
    let top = tree.root();

    tree.add(top, daemon()?)?;

    let admin = tree.add(
        top,
        Command::new("admin", "admin tools")
            .long_help("super administration tools")
            .group("Admin"),
    )?;
    tree.add(
        admin,
        Command::new("root", "root the machine").run(|inv| {
            println!("{}", inv.flags().get::<String>("directory")?);
            Err("failed".into())
        }),
    )?;

    tree.add(top, args()?)?;
    tree.add(top, flags()?)?;
    tree.add(
        top,
        Command::new("echo", "print up to three raw arguments")
            .expected_args(ExpectedArgs::Max(3))
            .run(|inv| {
                println!("{}", inv.raw_args().join(" "));
                Ok(())
            }),
    )?;

    Ok(tree)
}

fn daemon() -> Result<Command, ConfigError> {
    let mut cmd = Command::new("daemon", "run the daemon")
        .alias("run")
        .run(run_daemon);
    cmd.flags_mut()
        .add(Some('t'), "timeout", Duration::from_secs(1), "timeout duration")?;
    cmd.args_mut()
        .add::<bool>(
            "production",
            "whether to start the daemon in production or development mode",
            None,
        )?
        .add("opt-level", "the optimization mode", Some(3isize))?
        .add_list::<String>(
            "services",
            "additional services that should be started",
            Some(Vec::new()),
        )?;
    Ok(cmd)
}

fn run_daemon(inv: &Invocation<'_>) -> HandlerResult {
    let flags = inv.flags();
    let args = inv.args();
    println!("timeout: {}", format_duration(flags.get::<Duration>("timeout")?));
    println!("directory: {}", flags.get::<String>("directory")?);
    println!("verbose: {}", flags.get::<bool>("verbose")?);
    println!("production: {}", args.get::<bool>("production")?);
    println!("opt-level: {}", args.get::<isize>("opt-level")?);
    println!("services: {}", args.get::<Vec<String>>("services")?.join(","));
    Ok(())
}

fn args() -> Result<Command, ConfigError> {
    let mut cmd = Command::new("args", "test args").run(|inv| {
        for arg in inv.command().args().iter() {
            let value = inv.args().value(&arg.name).map(ToString::to_string);
            println!("{:<4}{}", arg.name, value.unwrap_or_default());
        }
        Ok(())
    });
    cmd.args_mut()
        .add::<String>("s", "test string", None)?
        .add("d", "test duration", Some(Duration::from_secs(1)))?
        .add("i", "test int", Some(5isize))?
        .add("i64", "test int64", Some(-88i64))?
        .add("u", "test uint", Some(66usize))?
        .add("u64", "test uint64", Some(8888u64))?
        .add("f64", "test float64", Some(5.889f64))?
        .register(
            ArgDefinition::list(
                "sl",
                "test string list",
                Some(vec![
                    "first".to_string(),
                    "second".to_string(),
                    "third".to_string(),
                ]),
            )
            .with_max(3),
        )?;
    Ok(cmd)
}

fn flags() -> Result<Command, ConfigError> {
    let mut cmd = Command::new("flags", "test flags").run(|inv| {
        for flag in inv.command().flags().iter() {
            let value = inv.flags().value(&flag.long).map(ToString::to_string);
            println!("{:<10}{}", flag.long, value.unwrap_or_default());
        }
        Ok(())
    });
    cmd.flags_mut()
        .add(Some('b'), "bool", false, "test bool")?
        .add(Some('i'), "int", 1isize, "test int")?
        .add(None, "int8", -8i8, "test int8")?
        .add(None, "int16", -16i16, "test int16")?
        .add(None, "int32", -32i32, "test int32")?
        .add(None, "int64", -64i64, "test int64")?
        .add(Some('u'), "uint", 3usize, "test uint")?
        .add(None, "uint8", 8u8, "test uint8")?
        .add(None, "uint16", 16u16, "test uint16")?
        .add(None, "uint32", 32u32, "test uint32")?
        .add(None, "uint64", 64u64, "test uint64")?
        .add(None, "float32", 5.55f32, "test float32")?
        .add(Some('f'), "float64", 5.55f64, "test float64")?
        .add(Some('d'), "duration", Duration::from_secs(1), "duration test")?;
    Ok(cmd)
}
