//! Flag definitions and the flag-token parser.
//!
//! A flag token starts with `-`. Three spellings are accepted:
//!
//! 1. `--flag` (value-optional flags only),
//! 2. `--flag value` or `-f value`,
//! 3. `--flag=value` or `-f=value`.
//!
//! A bare `--` ends flag parsing and is consumed.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use command_shell_core::{FlagSchema, ResultMap};
//!
//! let mut flags = FlagSchema::new();
//! flags
//!     .add(Some('v'), "verbose", false, "enable verbose mode").unwrap()
//!     .add(Some('t'), "timeout", Duration::from_secs(1), "timeout duration").unwrap();
//!
//! let tokens: Vec<String> = ["-v", "--timeout=2s", "rest"].map(String::from).to_vec();
//! let mut results = ResultMap::new();
//! let rest = flags.parse(&tokens, &mut results).unwrap();
//!
//! assert_eq!(rest, ["rest"]);
//! assert!(results.get::<bool>("verbose").unwrap());
//! assert_eq!(results.get::<Duration>("timeout").unwrap(), Duration::from_secs(2));
//! ```

use serde::Serialize;
use tracing::trace;

use crate::error::{ConfigError, Error, Result};
use crate::results::ResultMap;
use crate::value::{self, Scalar, ScalarKind, Value, ValueKind};

/// Character every flag token starts with.
pub const SEPARATOR: char = '-';

/// Token that ends flag parsing.
pub const END_OF_FLAGS: &str = "--";

/// Schema for one flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagDefinition {
    /// Short form without the dash (e.g. `'v'` for `-v`).
    pub short: Option<char>,
    /// Long form without the dashes (e.g. `"verbose"` for `--verbose`).
    pub long: String,
    pub help: String,
    pub kind: ScalarKind,
    pub default: Value,
    /// Whether the value token may be left out. Only bool flags allow it.
    pub allows_omitted_value: bool,
}

impl FlagDefinition {
    /// Creates a flag whose kind is taken from the type of `default`.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_shell_core::{FlagDefinition, ScalarKind};
    ///
    /// let flag = FlagDefinition::new(Some('i'), "int", 1i32, "test int");
    /// assert_eq!(flag.kind, ScalarKind::Int32);
    /// assert!(!flag.allows_omitted_value);
    ///
    /// let flag = FlagDefinition::new(None, "bool", false, "test bool");
    /// assert!(flag.allows_omitted_value);
    /// ```
    pub fn new<T: Scalar>(short: Option<char>, long: &str, default: T, help: &str) -> Self {
        Self {
            short,
            long: long.to_string(),
            help: help.to_string(),
            kind: T::SCALAR,
            default: default.into_value(),
            allows_omitted_value: T::SCALAR == ScalarKind::Bool,
        }
    }

    /// Checks if this flag matches a flag token such as `-v` or `--verbose`.
    pub fn matches(&self, token: &str) -> bool {
        if let Some(long) = token.strip_prefix(END_OF_FLAGS) {
            return long == self.long;
        }
        let Some(short) = self.short else {
            return false;
        };
        let mut chars = token.chars();
        chars.next() == Some(SEPARATOR) && chars.next() == Some(short) && chars.next().is_none()
    }

    /// Default values are shown in help for every kind except bool.
    pub fn shows_default(&self) -> bool {
        self.kind != ScalarKind::Bool
    }

    /// Decodes the raw value segment. `None` means the value was omitted.
    fn decode(&self, raw: Option<&str>) -> Result<Value> {
        let raw = match raw {
            None => return Ok(Value::Bool(true)),
            Some("") if self.allows_omitted_value => return Ok(Value::Bool(true)),
            Some(raw) => raw,
        };
        let raw = if self.kind == ScalarKind::String {
            trim_quotes(raw)
        } else {
            raw
        };
        value::decode(raw, self.kind).map_err(|err| Error::invalid_value(&self.long, err))
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if let Some(short) = self.short
            && (short == SEPARATOR || short == '=' || short.is_whitespace())
        {
            return Err(ConfigError::InvalidShortFlag(short));
        }
        if self.long.is_empty() {
            return Err(ConfigError::EmptyLongFlag(self.short));
        }
        if self.long.starts_with(SEPARATOR)
            || self.long.contains('=')
            || self.long.contains(char::is_whitespace)
        {
            return Err(ConfigError::InvalidLongFlag(self.long.clone()));
        }
        if self.help.trim().is_empty() {
            return Err(ConfigError::EmptyFlagHelp(self.long.clone()));
        }
        let expected = ValueKind::Scalar(self.kind);
        if self.default.kind() != expected {
            return Err(ConfigError::DefaultKindMismatch {
                name: self.long.clone(),
                expected,
                found: self.default.kind(),
            });
        }
        Ok(())
    }
}

/// Ordered collection of flag definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FlagSchema {
    list: Vec<FlagDefinition>,
}

impl FlagSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a flag definition.
    ///
    /// # Errors
    ///
    /// Fails if the short form is the separator, the long form is empty or
    /// starts with the separator, the help text is empty, the default does
    /// not match the kind, or either form is already registered.
    pub fn register(
        &mut self,
        mut flag: FlagDefinition,
    ) -> std::result::Result<&mut Self, ConfigError> {
        flag.validate()?;

        for existing in &self.list {
            if let (Some(a), Some(b)) = (existing.short, flag.short)
                && a == b
            {
                return Err(ConfigError::DuplicateShortFlag(a));
            }
            if existing.long == flag.long {
                return Err(ConfigError::DuplicateFlag(flag.long));
            }
        }

        flag.allows_omitted_value = flag.kind == ScalarKind::Bool;
        self.list.push(flag);
        Ok(self)
    }

    /// Registers a flag typed by its default value.
    pub fn add<T: Scalar>(
        &mut self,
        short: Option<char>,
        long: &str,
        default: T,
        help: &str,
    ) -> std::result::Result<&mut Self, ConfigError> {
        self.register(FlagDefinition::new(short, long, default, help))
    }

    /// Registers a string flag.
    pub fn string(
        &mut self,
        short: Option<char>,
        long: &str,
        default: &str,
        help: &str,
    ) -> std::result::Result<&mut Self, ConfigError> {
        self.add(short, long, default.to_string(), help)
    }

    /// Finds the definition matching a flag token (`-v` / `--verbose`).
    pub fn find(&self, token: &str) -> Option<&FlagDefinition> {
        self.list.iter().find(|flag| flag.matches(token))
    }

    /// Finds a definition by long name.
    pub fn get(&self, long: &str) -> Option<&FlagDefinition> {
        self.list.iter().find(|flag| flag.long == long)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlagDefinition> {
        self.list.iter()
    }

    /// Definitions ordered by long name, for help output.
    pub fn sorted(&self) -> Vec<&FlagDefinition> {
        let mut flags: Vec<&FlagDefinition> = self.list.iter().collect();
        flags.sort_by(|a, b| a.long.cmp(&b.long));
        flags
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Appends a definition without validation. Used when merging schemas
    /// whose entries were validated on registration.
    pub(crate) fn push_unchecked(&mut self, flag: FlagDefinition) {
        self.list.push(flag);
    }

    /// Parses the leading flag tokens of `tokens` into `results`.
    ///
    /// Stops at the first token that does not start with `-`, or after a
    /// bare `--`. Every registered flag that was not given receives its
    /// default with `is_default` set. Returns the unconsumed tail.
    ///
    /// A value-optional flag only takes the next token as its value when
    /// that token does not itself start with `-`, so `--bool --other`
    /// leaves `--other` for the next iteration.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownFlag`], [`Error::MissingFlagValue`] or
    /// [`Error::InvalidValue`].
    pub fn parse<'a>(&self, tokens: &'a [String], results: &mut ResultMap) -> Result<&'a [String]> {
        let mut rest = tokens;

        while let Some((token, tail)) = rest.split_first() {
            if !token.starts_with(SEPARATOR) {
                break;
            }
            rest = tail;
            if token == END_OF_FLAGS {
                break;
            }

            let (name, explicit) = match token.find('=') {
                Some(pos) => (&token[..pos], Some(&token[pos + 1..])),
                None => (token.as_str(), None),
            };

            let flag = self
                .find(name)
                .ok_or_else(|| Error::UnknownFlag(name.to_string()))?;

            let raw = match explicit {
                Some(value) => Some(value),
                None if !flag.allows_omitted_value => {
                    let (next, tail) = rest
                        .split_first()
                        .ok_or_else(|| Error::MissingFlagValue(flag.long.clone()))?;
                    rest = tail;
                    Some(next.as_str())
                }
                None => match rest.split_first() {
                    Some((next, tail)) if !next.starts_with(SEPARATOR) => {
                        rest = tail;
                        Some(next.as_str())
                    }
                    _ => None,
                },
            };

            let value = flag.decode(raw)?;
            trace!(flag = %flag.long, %value, "parsed flag");
            results.insert(flag.long.clone(), value, false);
        }

        for flag in &self.list {
            if !results.contains(&flag.long) {
                results.insert(flag.long.clone(), flag.default.clone(), true);
            }
        }

        Ok(rest)
    }
}

/// Removes one pair of surrounding double quotes.
fn trim_quotes(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
}
