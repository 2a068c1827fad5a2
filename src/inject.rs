//! Constructor dependency declaration.

use crate::container::Container;
use crate::error::DiResult;

/// Declares how a type is constructed from its dependencies.
///
/// This is the statically-checked stand-in for constructor-parameter
/// introspection: a type's dependency list is the set of
/// [`resolve`](Container::resolve) calls in its `construct` body, in
/// declared order. Dependencies always resolve relative to the scope
/// doing the constructing, so a `PerScope` dependency of a root-owned
/// singleton is itself resolved at the root.
///
/// A dependency that should be produced lazily, on demand, is obtained
/// with [`Container::factory`] instead of `resolve`; see
/// [`Factory`](crate::Factory).
///
/// # Examples
///
/// ```
/// use oxifac::{Container, DiResult, Injectable};
/// use async_trait::async_trait;
/// use std::sync::Arc;
///
/// struct Database {
///     url: String,
/// }
///
/// struct UserService {
///     db: Arc<Database>,
/// }
///
/// #[async_trait]
/// impl Injectable for UserService {
///     async fn construct(scope: &Container) -> DiResult<Self> {
///         Ok(UserService {
///             db: scope.resolve::<Database>().await?,
///         })
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Resolves this type's dependencies in `scope` and constructs it.
    async fn construct(scope: &Container) -> DiResult<Self>;
}
