//! Error types for the container.

use std::fmt;

/// Container errors.
///
/// Every variant is a configuration or programming error: the container
/// never retries internally, never logs, and never swallows a failure.
/// Each variant carries the offending type name so a misconfigured graph
/// can be diagnosed from the error alone.
///
/// # Examples
///
/// ```rust
/// use oxifac::{ContainerBuilder, DiError};
///
/// # let rt = tokio::runtime::Runtime::new().unwrap();
/// # rt.block_on(async {
/// let container = ContainerBuilder::new().build().unwrap();
/// match container.resolve::<String>().await {
///     Err(DiError::NotRegistered(name)) => {
///         assert_eq!(name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// # });
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// No registration and no ad-hoc instance for the requested type
    NotRegistered(&'static str),
    /// Duplicate non-overwriting registration, or `add_instance` colliding
    /// with an existing registration or cache entry
    AlreadyRegistered(&'static str),
    /// Type downcast failed
    TypeMismatch(&'static str),
    /// Dependency chain revisited a type still under construction
    /// (includes the full path)
    Circular(Vec<&'static str>),
    /// `initialize()` failed; the instance was not cached
    Initialize(&'static str, String),
    /// One or more `dispose()` hooks failed during scope teardown;
    /// every failure is collected, none aborts the drain
    DisposeFailed(Vec<(&'static str, String)>),
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotRegistered(name) => write!(f, "Not registered: {}", name),
            DiError::AlreadyRegistered(name) => write!(f, "Already registered: {}", name),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::Circular(path) => {
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
            DiError::Initialize(name, msg) => {
                write!(f, "Initialization of {} failed: {}", name, msg)
            }
            DiError::DisposeFailed(failures) => {
                write!(f, "Disposal failed for {} resource(s):", failures.len())?;
                for (name, msg) in failures {
                    write!(f, " [{}: {}]", name, msg)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for container operations.
pub type DiResult<T> = Result<T, DiError>;

/// Result type for [`AsyncResource`](crate::AsyncResource) hooks.
///
/// Lifecycle hooks fail with arbitrary domain errors, not container
/// errors; the container wraps them into [`DiError::Initialize`] or
/// collects them into [`DiError::DisposeFailed`].
pub type ResourceResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
