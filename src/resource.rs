//! The async resource lifecycle protocol.

use crate::error::ResourceResult;

/// Optional in-flight failure context handed to [`AsyncResource::dispose`].
pub type DisposeContext<'a> = Option<&'a (dyn std::error::Error + Send + Sync + 'static)>;

/// Two-method lifecycle contract for constructed instances.
///
/// A registered class opts into the protocol with
/// [`as_resource`](crate::ClassRegistration::as_resource). The container
/// then calls `initialize` exactly once, right after construction and
/// before the instance is handed to its requester, and tracks the
/// instance in the constructing scope's disposal order. `dispose` runs
/// exactly once, when that scope is disposed, in reverse creation order.
///
/// A failed `initialize` keeps the instance out of the cache and
/// propagates to the resolving caller as
/// [`DiError::Initialize`](crate::DiError::Initialize); cleaning up any
/// sub-resources acquired before the failure is the instance's own
/// responsibility. Plain value types simply don't implement the trait
/// and skip both hooks.
///
/// # Examples
///
/// ```
/// use oxifac::{AsyncResource, DisposeContext, ResourceResult};
/// use async_trait::async_trait;
///
/// struct Connection {
///     url: String,
/// }
///
/// #[async_trait]
/// impl AsyncResource for Connection {
///     async fn initialize(&self) -> ResourceResult {
///         // open sockets, run handshakes...
///         Ok(())
///     }
///
///     async fn dispose(&self, error: DisposeContext<'_>) -> ResourceResult {
///         if error.is_some() {
///             // the surrounding block failed; roll back instead of commit
///         }
///         Ok(())
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait AsyncResource: Send + Sync + 'static {
    /// Runs once, after construction, before the instance is usable.
    async fn initialize(&self) -> ResourceResult;

    /// Runs once, at scope disposal. `error` carries the in-flight
    /// failure of a [`using`](crate::Container::using) block, if any,
    /// so cleanup can branch on success vs failure.
    async fn dispose(&self, error: DisposeContext<'_>) -> ResourceResult;
}
