//! Expected-argument validators for leftover tokens.

use std::fmt;
use std::sync::Arc;

use crate::error::ArityError;

/// Custom validator signature. The error string is shown to the user.
pub type ArityFn = dyn Fn(&[String]) -> std::result::Result<(), String> + Send + Sync;

/// Arity check applied to the tokens left after positional parsing.
///
/// # Examples
///
/// ```
/// use command_shell_core::ExpectedArgs;
///
/// let args: Vec<String> = vec!["a".into(), "b".into()];
/// assert!(ExpectedArgs::Max(2).validate(&args).is_ok());
/// assert!(ExpectedArgs::Exact(1).validate(&args).is_err());
/// assert!(ExpectedArgs::Range(1, 3).validate(&args).is_ok());
/// ```
#[derive(Clone)]
pub enum ExpectedArgs {
    /// Fails on any leftover token.
    NoArgs,
    /// Accepts anything.
    Arbitrary,
    Exact(usize),
    Min(usize),
    Max(usize),
    /// Inclusive bounds.
    Range(usize, usize),
    Custom(Arc<ArityFn>),
}

impl ExpectedArgs {
    /// Wraps a closure as a custom validator.
    pub fn custom<F>(validator: F) -> Self
    where
        F: Fn(&[String]) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(validator))
    }

    pub fn validate(&self, args: &[String]) -> Result<(), ArityError> {
        let received = args.len();
        match *self {
            Self::NoArgs if received > 0 => Err(ArityError::NoneAllowed { received }),
            Self::Exact(expected) if received != expected => {
                Err(ArityError::Exact { expected, received })
            }
            Self::Min(min) if received < min => Err(ArityError::TooFew { min, received }),
            Self::Max(max) if received > max => Err(ArityError::TooMany { max, received }),
            Self::Range(min, max) if received < min || received > max => {
                Err(ArityError::OutOfRange { min, max, received })
            }
            Self::Custom(ref validator) => validator(args).map_err(ArityError::Custom),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for ExpectedArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoArgs => f.write_str("NoArgs"),
            Self::Arbitrary => f.write_str("Arbitrary"),
            Self::Exact(n) => f.debug_tuple("Exact").field(n).finish(),
            Self::Min(n) => f.debug_tuple("Min").field(n).finish(),
            Self::Max(n) => f.debug_tuple("Max").field(n).finish(),
            Self::Range(min, max) => f.debug_tuple("Range").field(min).field(max).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(n: usize) -> Vec<String> {
        (0..n).map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_builtin_validators() {
        assert!(ExpectedArgs::NoArgs.validate(&args(0)).is_ok());
        assert_eq!(
            ExpectedArgs::NoArgs.validate(&args(1)),
            Err(ArityError::NoneAllowed { received: 1 })
        );
        assert!(ExpectedArgs::Arbitrary.validate(&args(10)).is_ok());
        assert_eq!(
            ExpectedArgs::Exact(2).validate(&args(3)),
            Err(ArityError::Exact {
                expected: 2,
                received: 3
            })
        );
        assert_eq!(
            ExpectedArgs::Min(2).validate(&args(1)),
            Err(ArityError::TooFew {
                min: 2,
                received: 1
            })
        );
        assert!(ExpectedArgs::Min(2).validate(&args(5)).is_ok());
        assert!(ExpectedArgs::Max(2).validate(&args(0)).is_ok());
        assert!(ExpectedArgs::Range(1, 2).validate(&args(0)).is_err());
        assert!(ExpectedArgs::Range(1, 2).validate(&args(2)).is_ok());
        assert!(ExpectedArgs::Range(1, 2).validate(&args(3)).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = ExpectedArgs::Max(1).validate(&args(3)).unwrap_err();
        assert_eq!(err.to_string(), "accepts at most 1 arg(s), received 3");
    }

    #[test]
    fn test_custom_validator() {
        let only_digits = ExpectedArgs::custom(|args| {
            match args.iter().find(|a| !a.chars().all(|c| c.is_ascii_digit())) {
                Some(bad) => Err(format!("'{bad}' is not a number")),
                None => Ok(()),
            }
        });
        assert!(only_digits.validate(&args(4)).is_ok());
        let err = only_digits
            .validate(&["1".to_string(), "x".to_string()])
            .unwrap_err();
        assert_eq!(err, ArityError::Custom("'x' is not a number".into()));
        assert_eq!(format!("{only_digits:?}"), "Custom(..)");
    }
}
