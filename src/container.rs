//! The container: scope hierarchy and the resolution engine.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::error::{DiError, DiResult};
use crate::factory::Factory;
use crate::internal::path::with_path_guard;
use crate::internal::BoxFuture;
use crate::key::{key_of, key_of_trait, Key};
use crate::lifetime::Lifetime;
use crate::registration::{AnyArc, Constructed, Registration, Registry, Source};
use crate::resource::{AsyncResource, DisposeContext};

/// A resolution scope.
///
/// The root container is produced by
/// [`ContainerBuilder::build`](crate::ContainerBuilder::build); nested
/// scopes by [`create_nested`](Container::create_nested). Every scope in
/// one hierarchy shares the same frozen registration map but owns its
/// cache and its disposal list. Cloning a `Container` is cheap and
/// yields another handle to the same scope.
///
/// # Lifetime routing
///
/// - **SingleInstance** requests from a nested scope delegate to the
///   root; the result is re-cached locally for O(1) repeats, but
///   disposal stays owned by the constructing scope.
/// - **PerScope** requests construct and cache in the requesting scope.
/// - **AlwaysNew** requests construct fresh every time, never caching.
///
/// # Concurrency
///
/// Resolution may be invoked from many tasks against the same scope.
/// First-time creation of a cacheable type is serialized by a
/// per-(scope, type) gate; once the winner commits, the gate entry is
/// replaced by the cached value and later readers skip locking
/// entirely. Unrelated types construct in parallel. `initialize()` is a
/// suspension point and no lock is held across it except the winner's
/// own gate.
///
/// # Examples
///
/// ```
/// use oxifac::{Container, ContainerBuilder, DiResult, Injectable};
/// use async_trait::async_trait;
/// use std::sync::Arc;
///
/// struct Config {
///     port: u16,
/// }
///
/// struct Server {
///     config: Arc<Config>,
/// }
///
/// #[async_trait]
/// impl Injectable for Server {
///     async fn construct(scope: &Container) -> DiResult<Self> {
///         Ok(Server {
///             config: scope.resolve::<Config>().await?,
///         })
///     }
/// }
///
/// # let rt = tokio::runtime::Runtime::new().unwrap();
/// # rt.block_on(async {
/// let mut builder = ContainerBuilder::new();
/// builder.register_instance(Config { port: 8080 });
/// builder.register_class::<Server>().single_instance();
///
/// let container = builder.build()?;
/// let server = container.resolve::<Server>().await?;
/// assert_eq!(server.config.port, 8080);
/// # Ok::<_, oxifac::DiError>(())
/// # }).unwrap();
/// ```
pub struct Container {
    inner: Arc<ScopeInner>,
}

struct ScopeInner {
    registrations: Arc<Registry>,
    /// None at the root; used only for SingleInstance delegation.
    parent: Option<Container>,
    cache: Mutex<HashMap<Key, Slot>>,
    /// Resources constructed by this scope, in creation order.
    disposal: Mutex<Vec<(&'static str, Arc<dyn AsyncResource>)>>,
}

/// Cache slot: either the committed instance or the creation gate the
/// current winner holds while constructing. A committed slot is never
/// replaced or evicted for the scope's lifetime.
enum Slot {
    Ready(AnyArc),
    Building(Arc<AsyncMutex<()>>),
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Container {
    pub(crate) fn root(registrations: Arc<Registry>) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                registrations,
                parent: None,
                cache: Mutex::new(HashMap::new()),
                disposal: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Creates a nested scope sharing this hierarchy's registration map,
    /// with an empty cache and an empty disposal list.
    ///
    /// Parent and child are independent for PerScope and AlwaysNew
    /// instances and share exactly the SingleInstance set. Each scope is
    /// disposed explicitly and independently; disposing one never
    /// cascades into the other.
    pub fn create_nested(&self) -> Container {
        Container {
            inner: Arc::new(ScopeInner {
                registrations: self.inner.registrations.clone(),
                parent: Some(self.clone()),
                cache: Mutex::new(HashMap::new()),
                disposal: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Resolves a concrete type registered as itself (or added ad hoc).
    ///
    /// # Examples
    ///
    /// ```
    /// use oxifac::ContainerBuilder;
    ///
    /// # let rt = tokio::runtime::Runtime::new().unwrap();
    /// # rt.block_on(async {
    /// let mut builder = ContainerBuilder::new();
    /// builder.register_instance("configuration".to_string());
    ///
    /// let container = builder.build().unwrap();
    /// let config = container.resolve::<String>().await.unwrap();
    /// assert_eq!(&*config, "configuration");
    /// # });
    /// ```
    pub async fn resolve<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        let key = key_of::<T>();
        let any = self.resolve_any(key).await?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves an interface registered with
    /// [`as_interface`](crate::ClassRegistration::as_interface).
    pub async fn resolve_trait<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>>
    where
        Arc<T>: 'static,
    {
        let key = key_of_trait::<T>();
        let any = self.resolve_any(key).await?;
        // Trait objects are stored as Arc<Arc<dyn Trait>>
        any.downcast::<Arc<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Returns a deferred factory producing `T` from this scope on
    /// demand. Binding the factory never constructs anything; each
    /// [`create`](Factory::create) call resolves `T` here at call time,
    /// subject to `T`'s own lifetime tag.
    pub fn factory<T: Send + Sync + 'static>(&self) -> Factory<T> {
        Factory::new(self.clone())
    }

    /// Injects a pre-built instance directly into this scope's cache,
    /// without a prior registration. Useful for request-scoped values
    /// created outside the graph.
    ///
    /// Fails with [`DiError::AlreadyRegistered`] if the type already has
    /// a registration or a cache entry in this scope.
    pub fn add_instance<T: Send + Sync + 'static>(&self, value: T) -> DiResult<()> {
        self.add_instance_any(key_of::<T>(), Arc::new(value))
    }

    /// Interface-keyed variant of [`add_instance`](Container::add_instance).
    pub fn add_instance_trait<T: ?Sized + Send + Sync + 'static>(
        &self,
        value: Arc<T>,
    ) -> DiResult<()> {
        self.add_instance_any(key_of_trait::<T>(), Arc::new(value))
    }

    fn add_instance_any(&self, key: Key, value: AnyArc) -> DiResult<()> {
        if self.inner.registrations.contains_key(&key) {
            return Err(DiError::AlreadyRegistered(key.display_name()));
        }
        let mut cache = self.inner.cache.lock().unwrap();
        if cache.contains_key(&key) {
            return Err(DiError::AlreadyRegistered(key.display_name()));
        }
        cache.insert(key, Slot::Ready(value));
        Ok(())
    }

    /// Disposes every resource this scope constructed, in exactly the
    /// reverse of construction order: a dependency is never disposed
    /// before its dependents.
    ///
    /// `error` is the optional in-flight failure context forwarded to
    /// each [`AsyncResource::dispose`] hook. A hook failure never stops
    /// the drain; all failures are collected into
    /// [`DiError::DisposeFailed`]. Disposal is scope-local: children and
    /// parents are disposed independently, children first if the caller
    /// needs cross-scope ordering.
    pub async fn dispose(&self, error: DisposeContext<'_>) -> DiResult<()> {
        let mut items = {
            let mut disposal = self.inner.disposal.lock().unwrap();
            std::mem::take(&mut *disposal)
        };
        let mut failures = Vec::new();
        while let Some((name, resource)) = items.pop() {
            if let Err(e) = resource.dispose(error).await {
                failures.push((name, e.to_string()));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(DiError::DisposeFailed(failures))
        }
    }

    /// Runs `f` with this scope, then disposes it on every exit path.
    ///
    /// On failure the block's error is forwarded to the dispose hooks as
    /// their context and returned to the caller; a teardown failure
    /// after a successful block surfaces as `E::from(DisposeFailed)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use oxifac::{ContainerBuilder, DiError};
    ///
    /// # let rt = tokio::runtime::Runtime::new().unwrap();
    /// # rt.block_on(async {
    /// let container = ContainerBuilder::new().build().unwrap();
    /// let nested = container.create_nested();
    /// let result = nested
    ///     .using(|scope| async move {
    ///         let _ = scope; // resolve, do work...
    ///         Ok::<_, DiError>(42)
    ///     })
    ///     .await
    ///     .unwrap();
    /// assert_eq!(result, 42);
    /// # });
    /// ```
    pub async fn using<F, Fut, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(Container) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: From<DiError> + std::error::Error + Send + Sync + 'static,
    {
        let result = f(self.clone()).await;
        match result {
            Ok(value) => match self.dispose(None).await {
                Ok(()) => Ok(value),
                Err(teardown) => Err(E::from(teardown)),
            },
            Err(e) => {
                // The block already failed; teardown errors were handed
                // their context and the original failure wins.
                let _ = self.dispose(Some(&e)).await;
                Err(e)
            }
        }
    }

    // ----- Resolution engine -----

    pub(crate) async fn resolve_any(&self, key: Key) -> DiResult<AnyArc> {
        let name = key.display_name();
        with_path_guard(name, self.resolve_local(&key)).await
    }

    /// Resolution within the cycle guard. Delegation calls this directly
    /// on the parent so the same key is not re-pushed onto the path.
    fn resolve_local<'a>(&'a self, key: &'a Key) -> BoxFuture<'a, DiResult<AnyArc>> {
        Box::pin(async move {
            if let Some(Slot::Ready(value)) = self.inner.cache.lock().unwrap().get(key) {
                return Ok(value.clone());
            }

            let reg = self
                .inner
                .registrations
                .get(key)
                .ok_or(DiError::NotRegistered(key.display_name()))?;

            // AlwaysNew never touches the cache or the gates.
            if matches!(reg.source, Source::Ctor(_)) && reg.lifetime == Lifetime::AlwaysNew {
                return self.construct(key, reg).await;
            }

            // Decided under the cache lock; awaited only after the
            // guard is released, so the future stays Send.
            enum Claim {
                Won(OwnedMutexGuard<()>),
                Wait(Arc<AsyncMutex<()>>),
            }

            loop {
                let claim = {
                    let mut cache = self.inner.cache.lock().unwrap();
                    match cache.get(key) {
                        Some(Slot::Ready(value)) => return Ok(value.clone()),
                        Some(Slot::Building(gate)) => Claim::Wait(gate.clone()),
                        None => {
                            let gate = Arc::new(AsyncMutex::new(()));
                            let guard = gate
                                .clone()
                                .try_lock_owned()
                                .expect("fresh gate is uncontended");
                            cache.insert(key.clone(), Slot::Building(gate));
                            Claim::Won(guard)
                        }
                    }
                };
                match claim {
                    Claim::Won(guard) => {
                        return self.build_and_commit(key, reg, guard).await;
                    }
                    // Another caller won the race for this key; wait for
                    // its commit (or failure), then re-check the cache.
                    Claim::Wait(gate) => {
                        let _released = gate.lock_owned().await;
                    }
                }
            }
        })
    }

    /// Winner path: produce the value, then atomically replace the gate
    /// entry with the committed result. On failure the slot is removed
    /// so the next caller retries construction.
    async fn build_and_commit(
        &self,
        key: &Key,
        reg: &Registration,
        guard: OwnedMutexGuard<()>,
    ) -> DiResult<AnyArc> {
        let result = match &reg.source {
            // Pre-built instance: cached verbatim, no construction.
            Source::Instance(value) => Ok(value.clone()),
            Source::Ctor(_) => match &self.inner.parent {
                // Satisfiable by a broader scope: delegate upward. The
                // ancestor that constructs owns the disposal; this scope
                // only re-caches the shared reference.
                Some(parent) if Lifetime::PerScope.delegable_to(reg.lifetime) => {
                    parent.resolve_local(key).await
                }
                _ => self.construct(key, reg).await,
            },
        };

        let mut cache = self.inner.cache.lock().unwrap();
        let outcome = match result {
            Ok(value) => {
                cache.insert(key.clone(), Slot::Ready(value.clone()));
                Ok(value)
            }
            Err(e) => {
                cache.remove(key);
                Err(e)
            }
        };
        drop(cache);
        drop(guard);
        outcome
    }

    /// Constructs in this scope: run the registered constructor (its
    /// dependency resolves happen against `self`), initialize the
    /// lifecycle handle if present, and take disposal ownership.
    async fn construct(&self, key: &Key, reg: &Registration) -> DiResult<AnyArc> {
        let ctor = match &reg.source {
            Source::Ctor(ctor) => ctor.clone(),
            Source::Instance(value) => return Ok(value.clone()),
        };
        let Constructed { value, resource } = ctor(self).await?;
        if let Some(resource) = resource {
            resource
                .initialize()
                .await
                .map_err(|e| DiError::Initialize(key.display_name(), e.to_string()))?;
            self.inner
                .disposal
                .lock()
                .unwrap()
                .push((key.display_name(), resource));
        }
        Ok(value)
    }
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        if let Ok(disposal) = self.disposal.get_mut() {
            if !disposal.is_empty() {
                eprintln!(
                    "[oxifac] scope dropped with {} undisposed resource(s); call dispose().await before dropping",
                    disposal.len()
                );
            }
        }
    }
}
