//! Effective-flag merging across a command path.
//!
//! A command sees its own flags plus every ancestor's. When two levels define
//! the same long name the nearer definition wins, so a child can redefine a
//! parent flag with a different default. An ancestor flag whose short form is
//! already taken keeps only its long form.
//!
//! # Example
//!
//! ```
//! use command_shell_core::{FlagSchema, merge_flags};
//!
//! let mut root = FlagSchema::new();
//! root.add(Some('v'), "verbose", false, "verbose mode").unwrap();
//!
//! let mut child = FlagSchema::new();
//! child.add(Some('b'), "bool", false, "a bool").unwrap();
//!
//! let merged = merge_flags([&child, &root]);
//! assert_eq!(merged.len(), 2);
//! assert!(merged.find("-v").is_some());
//! ```

use crate::flags::FlagSchema;

/// Merges flag schemas ordered nearest-first (the command's own schema
/// first, the root's last).
pub fn merge_flags<'a, I>(schemas: I) -> FlagSchema
where
    I: IntoIterator<Item = &'a FlagSchema>,
{
    let mut merged = FlagSchema::new();

    for schema in schemas {
        for flag in schema.iter() {
            if merged.get(&flag.long).is_some() {
                continue;
            }
            let mut flag = flag.clone();
            if let Some(short) = flag.short
                && merged.iter().any(|existing| existing.short == Some(short))
            {
                flag.short = None;
            }
            merged.push_unchecked(flag);
        }
    }

    merged
}
