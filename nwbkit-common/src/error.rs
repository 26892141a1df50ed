//! Error severity classification shared across nwbkit crates
//!
//! Each crate defines its own `thiserror` enum; this module only provides the
//! common vocabulary for how bad a failure is, so callers can decide whether
//! an error should abort startup or be reported back to whoever supplied the
//! construction arguments.

use std::fmt;

/// Severity levels for error classification
///
/// - **Warning**: the operation completed but something looked off.
/// - **Error**: the operation failed; the process can keep going. Every
///   construction-time failure (bad arguments, broken cross-field rule) lands
///   here.
/// - **Critical**: the process should not continue. Type registration
///   failures are critical because a broken schema makes every later
///   construction of that type meaningless.
///
/// ```rust
/// use nwbkit_common::ErrorSeverity;
///
/// assert!(ErrorSeverity::Critical > ErrorSeverity::Error);
/// assert_eq!(ErrorSeverity::Warning.to_string(), "warning");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Potential issue but the operation proceeded
    Warning,

    /// Operation failed but the system can continue
    Error,

    /// System cannot continue, requires immediate attention
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorSeverity::Warning => "warning",
            ErrorSeverity::Error => "error",
            ErrorSeverity::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Trait for error types that have severity levels
///
/// All nwbkit error types implement this so that callers embedding the
/// registry can route failures consistently.
///
/// ```rust
/// use nwbkit_common::{ErrorSeverity, Severity};
///
/// #[derive(Debug)]
/// enum LoadError {
///     BrokenSchema,
///     BadArgument,
/// }
///
/// impl Severity for LoadError {
///     fn severity(&self) -> ErrorSeverity {
///         match self {
///             LoadError::BrokenSchema => ErrorSeverity::Critical,
///             LoadError::BadArgument => ErrorSeverity::Error,
///         }
///     }
/// }
///
/// assert!(LoadError::BrokenSchema.is_critical());
/// assert!(!LoadError::BadArgument.is_critical());
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;

    /// Shorthand for `severity() == ErrorSeverity::Critical`
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity_ordering() {
        assert!(ErrorSeverity::Warning < ErrorSeverity::Error);
        assert!(ErrorSeverity::Error < ErrorSeverity::Critical);
    }

    #[test]
    fn test_error_severity_display() {
        assert_eq!(ErrorSeverity::Warning.to_string(), "warning");
        assert_eq!(ErrorSeverity::Error.to_string(), "error");
        assert_eq!(ErrorSeverity::Critical.to_string(), "critical");
    }

    #[test]
    fn test_severity_trait_implementation() {
        #[derive(Debug)]
        enum TestError {
            CriticalFailure,
            NotFound,
            Deprecated,
        }

        impl Severity for TestError {
            fn severity(&self) -> ErrorSeverity {
                match self {
                    TestError::CriticalFailure => ErrorSeverity::Critical,
                    TestError::NotFound => ErrorSeverity::Error,
                    TestError::Deprecated => ErrorSeverity::Warning,
                }
            }
        }

        assert_eq!(TestError::CriticalFailure.severity(), ErrorSeverity::Critical);
        assert_eq!(TestError::NotFound.severity(), ErrorSeverity::Error);
        assert_eq!(TestError::Deprecated.severity(), ErrorSeverity::Warning);
        assert!(TestError::CriticalFailure.is_critical());
        assert!(!TestError::Deprecated.is_critical());
    }
}
