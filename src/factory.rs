use std::marker::PhantomData;
use std::sync::Arc;

use crate::container::Container;
use crate::error::DiResult;

/// Deferred handle producing `T` from a captured scope.
///
/// Obtained from [`Container::factory`]; holding one constructs
/// nothing. Each [`create`](Factory::create) call is an ordinary
/// resolve against the captured scope, so `T`'s lifetime tag decides
/// whether repeated calls share an instance
/// ([`SingleInstance`](crate::Lifetime::SingleInstance) /
/// [`PerScope`](crate::Lifetime::PerScope)) or mint a fresh one
/// ([`AlwaysNew`](crate::Lifetime::AlwaysNew)).
///
/// Useful inside [`Injectable::construct`](crate::Injectable::construct)
/// to break a hard construction-order edge: depend on `Factory<T>`
/// instead of `T` and call `create` later, outside the construction of
/// the dependent.
pub struct Factory<T: Send + Sync + 'static> {
    scope: Container,
    _produces: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> Factory<T> {
    pub(crate) fn new(scope: Container) -> Self {
        Self {
            scope,
            _produces: PhantomData,
        }
    }

    /// Resolves `T` from the captured scope.
    pub async fn create(&self) -> DiResult<Arc<T>> {
        self.scope.resolve::<T>().await
    }
}

impl<T: Send + Sync + 'static> Clone for Factory<T> {
    fn clone(&self) -> Self {
        Self {
            scope: self.scope.clone(),
            _produces: PhantomData,
        }
    }
}
