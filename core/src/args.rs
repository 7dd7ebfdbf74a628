//! Positional argument definitions and parser.
//!
//! Arguments are consumed in registration order after flag parsing stops.
//! Two ordering rules are checked on registration, looking only at the
//! previously registered argument:
//!
//! - a list argument swallows the rest of the line, so nothing may follow it;
//! - once an optional argument is registered, every later one is optional.
//!
//! Integer arguments are plain decimal: `017` is seventeen. Base prefixes
//! are a flag-value feature only.

use serde::Serialize;
use tracing::trace;

use crate::error::{ConfigError, Error, Result};
use crate::results::ResultMap;
use crate::value::{self, IntegerSyntax, Scalar, Typed, Value, ValueKind};

/// Schema for one positional argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgDefinition {
    pub name: String,
    pub help: String,
    pub kind: ValueKind,
    /// Default filled in when no token is left. `None` makes the argument
    /// mandatory.
    pub default: Option<Value>,
    /// Minimum element count for list arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    /// Maximum element count for list arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

impl ArgDefinition {
    /// Creates a scalar argument. A `Some` default makes it optional.
    pub fn new<T: Scalar>(name: &str, help: &str, default: Option<T>) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            kind: T::kind(),
            default: default.map(Typed::into_value),
            min: None,
            max: None,
        }
    }

    /// Creates a list argument consuming every remaining token.
    pub fn list<T: Scalar>(name: &str, help: &str, default: Option<Vec<T>>) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            kind: ValueKind::List(T::SCALAR),
            default: default.map(|items| {
                Value::List(T::SCALAR, items.into_iter().map(Typed::into_value).collect())
            }),
            min: None,
            max: None,
        }
    }

    /// Requires at least `min` elements when the list is given.
    pub fn with_min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    /// Accepts at most `max` elements.
    pub fn with_max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    pub fn is_list(&self) -> bool {
        self.kind.is_list()
    }

    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    /// Bool defaults are not shown in help.
    pub fn shows_default(&self) -> bool {
        self.kind.element() != value::ScalarKind::Bool
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyArgName);
        }
        if self.help.trim().is_empty() {
            return Err(ConfigError::EmptyArgHelp(self.name.clone()));
        }
        if let Some(default) = &self.default
            && default.kind() != self.kind
        {
            return Err(ConfigError::DefaultKindMismatch {
                name: self.name.clone(),
                expected: self.kind,
                found: default.kind(),
            });
        }
        if !self.is_list() && (self.min.is_some() || self.max.is_some()) {
            return Err(ConfigError::BoundsOnScalar(self.name.clone()));
        }
        if let (Some(min), Some(max)) = (self.min, self.max)
            && min > max
        {
            return Err(ConfigError::InvalidBounds {
                name: self.name.clone(),
                min,
                max,
            });
        }
        Ok(())
    }

    fn check_len(&self, received: usize) -> Result<()> {
        if let Some(min) = self.min
            && received < min
        {
            return Err(Error::TooFewValues {
                name: self.name.clone(),
                min,
                received,
            });
        }
        if let Some(max) = self.max
            && received > max
        {
            return Err(Error::TooManyValues {
                name: self.name.clone(),
                max,
                received,
            });
        }
        Ok(())
    }
}

/// Ordered collection of positional arguments.
///
/// # Examples
///
/// ```
/// use command_shell_core::{ArgSchema, ResultMap};
///
/// let mut args = ArgSchema::new();
/// args.add::<isize>("n", "a number", None).unwrap()
///     .add("s", "a string", Some("x".to_string())).unwrap();
///
/// let mut results = ResultMap::new();
/// args.parse(&["5".to_string()], &mut results).unwrap();
/// assert_eq!(results.get::<isize>("n").unwrap(), 5);
/// assert_eq!(results.get::<String>("s").unwrap(), "x");
/// assert!(results.is_default("s"));
///
/// assert!(args.parse(&[], &mut ResultMap::new()).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ArgSchema {
    list: Vec<ArgDefinition>,
}

impl ArgSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an argument definition.
    ///
    /// # Errors
    ///
    /// Fails on an empty name or help text, a duplicate name, a default of
    /// the wrong kind, bounds on a scalar, an argument after a list, or a
    /// mandatory argument after an optional one.
    pub fn register(&mut self, arg: ArgDefinition) -> std::result::Result<&mut Self, ConfigError> {
        arg.validate()?;

        if self.list.iter().any(|existing| existing.name == arg.name) {
            return Err(ConfigError::DuplicateArg(arg.name));
        }

        if let Some(last) = self.list.last() {
            if last.is_list() {
                return Err(ConfigError::ArgAfterList {
                    name: arg.name,
                    list: last.name.clone(),
                });
            }
            if last.is_optional() && !arg.is_optional() {
                return Err(ConfigError::MandatoryAfterOptional {
                    name: arg.name,
                    optional: last.name.clone(),
                });
            }
        }

        self.list.push(arg);
        Ok(self)
    }

    /// Registers a scalar argument; `None` makes it mandatory.
    pub fn add<T: Scalar>(
        &mut self,
        name: &str,
        help: &str,
        default: Option<T>,
    ) -> std::result::Result<&mut Self, ConfigError> {
        self.register(ArgDefinition::new(name, help, default))
    }

    /// Registers a list argument; `None` makes it mandatory.
    pub fn add_list<T: Scalar>(
        &mut self,
        name: &str,
        help: &str,
        default: Option<Vec<T>>,
    ) -> std::result::Result<&mut Self, ConfigError> {
        self.register(ArgDefinition::list(name, help, default))
    }

    pub fn get(&self, name: &str) -> Option<&ArgDefinition> {
        self.list.iter().find(|arg| arg.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArgDefinition> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Parses positional tokens into `results` and returns the leftover.
    ///
    /// A scalar argument takes one token, a list argument takes all of them.
    /// When tokens run out, optional arguments get their default with
    /// `is_default` set.
    ///
    /// # Errors
    ///
    /// [`Error::MissingArgument`], [`Error::InvalidValue`],
    /// [`Error::TooFewValues`] or [`Error::TooManyValues`].
    pub fn parse<'a>(&self, tokens: &'a [String], results: &mut ResultMap) -> Result<&'a [String]> {
        let mut rest = tokens;

        for arg in &self.list {
            if rest.is_empty() {
                let default = arg
                    .default
                    .clone()
                    .ok_or_else(|| Error::MissingArgument(arg.name.clone()))?;
                results.insert(arg.name.clone(), default, true);
                continue;
            }

            let value = match arg.kind {
                ValueKind::List(kind) => {
                    arg.check_len(rest.len())?;
                    let value = value::decode_list_with(rest, kind, IntegerSyntax::Decimal)
                        .map_err(|err| Error::invalid_value(&arg.name, err))?;
                    rest = &[];
                    value
                }
                ValueKind::Scalar(kind) => {
                    let value = value::decode_with(&rest[0], kind, IntegerSyntax::Decimal)
                        .map_err(|err| Error::invalid_value(&arg.name, err))?;
                    rest = &rest[1..];
                    value
                }
            };
            trace!(arg = %arg.name, %value, "parsed argument");
            results.insert(arg.name.clone(), value, false);
        }

        Ok(rest)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::value::ScalarKind;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_list_must_be_last() {
        let mut args = ArgSchema::new();
        args.add::<String>("first", "first", None)
            .unwrap()
            .add_list::<String>("rest", "rest", None)
            .unwrap();

        let err = args.add::<String>("after", "after", None).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ArgAfterList {
                name: "after".into(),
                list: "rest".into()
            }
        );
        let err = args
            .add("after", "after", Some(String::new()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ArgAfterList { .. }));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_optional_is_monotonic() {
        let mut args = ArgSchema::new();
        args.add::<isize>("a", "a", None)
            .unwrap()
            .add("b", "b", Some(1isize))
            .unwrap();

        let err = args.add::<isize>("c", "c", None).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MandatoryAfterOptional {
                name: "c".into(),
                optional: "b".into()
            }
        );
        assert!(args.add("c", "c", Some(2isize)).is_ok());
    }

    #[test]
    fn test_register_rejects_bad_definitions() {
        let mut args = ArgSchema::new();
        assert_eq!(
            args.add::<bool>("", "help", None).unwrap_err(),
            ConfigError::EmptyArgName
        );
        assert_eq!(
            args.add::<bool>("x", " ", None).unwrap_err(),
            ConfigError::EmptyArgHelp("x".into())
        );
        args.add::<bool>("x", "help", None).unwrap();
        assert_eq!(
            args.add::<bool>("x", "help", None).unwrap_err(),
            ConfigError::DuplicateArg("x".into())
        );
        assert_eq!(
            args.register(ArgDefinition::new::<u8>("y", "help", None).with_min(1))
                .unwrap_err(),
            ConfigError::BoundsOnScalar("y".into())
        );
        assert!(matches!(
            args.register(
                ArgDefinition::list::<u8>("z", "help", None)
                    .with_min(3)
                    .with_max(2)
            ),
            Err(ConfigError::InvalidBounds { min: 3, max: 2, .. })
        ));
    }

    #[test]
    fn test_mandatory_and_optional() {
        let mut args = ArgSchema::new();
        args.add::<isize>("n", "n", None)
            .unwrap()
            .add("s", "s", Some("x".to_string()))
            .unwrap();

        let mut results = ResultMap::new();
        let input = tokens(&["5"]);
        let rest = args.parse(&input, &mut results).unwrap();
        assert!(rest.is_empty());
        assert_eq!(results.get::<isize>("n").unwrap(), 5);
        assert!(!results.is_default("n"));
        assert_eq!(results.get::<String>("s").unwrap(), "x");
        assert!(results.is_default("s"));

        let err = args.parse(&[], &mut ResultMap::new()).unwrap_err();
        assert!(matches!(err, Error::MissingArgument(ref name) if name == "n"));
    }

    #[test]
    fn test_scalar_leaves_leftover() {
        let mut args = ArgSchema::new();
        args.add::<String>("name", "name", None).unwrap();

        let mut results = ResultMap::new();
        let input = tokens(&["a", "b", "c"]);
        let rest = args
            .parse(&input, &mut results)
            .unwrap();
        assert_eq!(rest, ["b", "c"]);
    }

    #[test]
    fn test_integers_are_decimal() {
        let mut args = ArgSchema::new();
        args.add::<isize>("n", "number", None)
            .unwrap()
            .add_list::<u32>("rest", "more numbers", Some(vec![]))
            .unwrap();

        let mut results = ResultMap::new();
        args.parse(&tokens(&["017", "08", "010"]), &mut results)
            .unwrap();
        assert_eq!(results.get::<isize>("n").unwrap(), 17);
        assert_eq!(results.get::<Vec<u32>>("rest").unwrap(), vec![8, 10]);

        let mut results = ResultMap::new();
        args.parse(&tokens(&["08"]), &mut results).unwrap();
        assert_eq!(results.get::<isize>("n").unwrap(), 8);

        let err = args
            .parse(&tokens(&["0x10"]), &mut ResultMap::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidValue { ref name, .. } if name == "n"));
    }

    #[test]
    fn test_list_consumes_everything() {
        let mut args = ArgSchema::new();
        args.add::<bool>("production", "production", None)
            .unwrap()
            .add_list::<Duration>("timeouts", "timeouts", Some(vec![]))
            .unwrap();

        let mut results = ResultMap::new();
        let input = tokens(&["true", "1s", "2m", "3h"]);
        let rest = args
            .parse(&input, &mut results)
            .unwrap();
        assert!(rest.is_empty());
        assert_eq!(
            results.get::<Vec<Duration>>("timeouts").unwrap(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(120),
                Duration::from_secs(3 * 3600)
            ]
        );

        let mut results = ResultMap::new();
        args.parse(&tokens(&["false"]), &mut results).unwrap();
        assert!(results.is_default("timeouts"));
        assert!(results.get::<Vec<Duration>>("timeouts").unwrap().is_empty());
    }

    #[test]
    fn test_list_fails_as_a_whole() {
        let mut args = ArgSchema::new();
        args.add_list::<u8>("bytes", "bytes", None).unwrap();

        let mut results = ResultMap::new();
        let err = args
            .parse(&tokens(&["1", "2", "256"]), &mut results)
            .unwrap_err();
        match err {
            Error::InvalidValue { name, source } => {
                assert_eq!(name, "bytes");
                assert_eq!(source.token, "256");
                assert_eq!(source.kind, ScalarKind::Uint8);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!results.contains("bytes"));
    }

    #[test]
    fn test_list_bounds() {
        let mut args = ArgSchema::new();
        args.register(
            ArgDefinition::list::<String>("services", "services", Some(vec![]))
                .with_min(2)
                .with_max(3),
        )
        .unwrap();

        let err = args
            .parse(&tokens(&["a"]), &mut ResultMap::new())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TooFewValues {
                min: 2,
                received: 1,
                ..
            }
        ));

        let err = args
            .parse(&tokens(&["a", "b", "c", "d"]), &mut ResultMap::new())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TooManyValues {
                max: 3,
                received: 4,
                ..
            }
        ));

        // Bounds only apply to given values, not to the default.
        let mut results = ResultMap::new();
        args.parse(&[], &mut results).unwrap();
        assert!(results.is_default("services"));
    }
}
