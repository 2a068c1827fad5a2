//! Registration surface: the builder and its drop-committing proxies.

use std::collections::HashMap;
use std::sync::Arc;

use crate::container::Container;
use crate::error::{DiError, DiResult};
use crate::inject::Injectable;
use crate::key::{key_of, key_of_trait, Key};
use crate::lifetime::Lifetime;
use crate::registration::{AnyArc, Constructed, Ctor, Registration, Registry};
use crate::resource::AsyncResource;

/// Collects registrations and freezes them into a root [`Container`].
///
/// `register_class` and `register_instance` return proxies that commit
/// when dropped, so a registration is a single chained statement:
///
/// ```
/// use oxifac::{Container, ContainerBuilder, DiResult, Injectable};
/// use async_trait::async_trait;
///
/// struct Clock;
///
/// #[async_trait]
/// impl Injectable for Clock {
///     async fn construct(_scope: &Container) -> DiResult<Self> {
///         Ok(Clock)
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.register_class::<Clock>().single_instance();
/// let container = builder.build().unwrap();
/// ```
///
/// Duplicate keys are detected at [`build`](ContainerBuilder::build):
/// registering the same key twice fails unless the later registration
/// carries [`overwrite`](ClassRegistration::overwrite).
#[derive(Default)]
pub struct ContainerBuilder {
    pending: Vec<PendingRegistration>,
}

struct PendingRegistration {
    key: Key,
    registration: Registration,
    overwrite: bool,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constructible class. The returned proxy defaults to
    /// `T` as its own key with the [`Lifetime::PerScope`] tag; chain
    /// calls to change either, then let it drop to commit.
    pub fn register_class<T: Injectable>(&mut self) -> ClassRegistration<'_, T> {
        ClassRegistration {
            builder: self,
            key: key_of::<T>(),
            lifetime: Lifetime::default(),
            wrap: Some(Box::new(|value: Arc<T>| value as AnyArc)),
            resource_hook: None,
            overwrite: false,
        }
    }

    /// Registers a pre-built value. Shared as-is by every scope in the
    /// hierarchy; never initialized, never disposed.
    pub fn register_instance<T: Send + Sync + 'static>(
        &mut self,
        value: T,
    ) -> InstanceRegistration<'_, T> {
        let value = Arc::new(value);
        InstanceRegistration {
            builder: self,
            value: value.clone(),
            pending: Some((key_of::<T>(), value as AnyArc)),
            overwrite: false,
        }
    }

    fn push(&mut self, key: Key, registration: Registration, overwrite: bool) {
        self.pending.push(PendingRegistration {
            key,
            registration,
            overwrite,
        });
    }

    /// Freezes the pending registrations into an immutable map and
    /// returns the root container.
    ///
    /// Fails with [`DiError::AlreadyRegistered`] on the first duplicate
    /// key whose later registration did not ask to overwrite.
    pub fn build(self) -> DiResult<Container> {
        let mut map = HashMap::with_capacity(self.pending.len());
        for entry in self.pending {
            if map.contains_key(&entry.key) && !entry.overwrite {
                return Err(DiError::AlreadyRegistered(entry.key.display_name()));
            }
            map.insert(entry.key, entry.registration);
        }
        Ok(Container::root(Arc::new(Registry::new(map))))
    }
}

/// Drop-committing proxy for a class registration.
///
/// Defaults: keyed by the concrete type, [`Lifetime::PerScope`], no
/// lifecycle participation.
pub struct ClassRegistration<'b, T: Injectable> {
    builder: &'b mut ContainerBuilder,
    key: Key,
    lifetime: Lifetime,
    wrap: Option<Box<dyn Fn(Arc<T>) -> AnyArc + Send + Sync>>,
    resource_hook: Option<fn(Arc<T>) -> Arc<dyn AsyncResource>>,
    overwrite: bool,
}

impl<T: Injectable> ClassRegistration<'_, T> {
    /// Keys the registration by an interface instead of the concrete
    /// type. `coerce` is the unsize conversion, written at the call
    /// site as `|c| c` (an incompatible pair fails to compile):
    ///
    /// ```
    /// # use oxifac::{Container, ContainerBuilder, DiResult, Injectable};
    /// # use async_trait::async_trait;
    /// # use std::sync::Arc;
    /// trait Greeter: Send + Sync {
    ///     fn greet(&self) -> String;
    /// }
    ///
    /// struct English;
    ///
    /// impl Greeter for English {
    ///     fn greet(&self) -> String {
    ///         "hello".into()
    ///     }
    /// }
    ///
    /// # #[async_trait]
    /// # impl Injectable for English {
    /// #     async fn construct(_scope: &Container) -> DiResult<Self> {
    /// #         Ok(English)
    /// #     }
    /// # }
    /// let mut builder = ContainerBuilder::new();
    /// builder
    ///     .register_class::<English>()
    ///     .as_interface::<dyn Greeter>(|c| c);
    /// ```
    pub fn as_interface<I: ?Sized + Send + Sync + 'static>(
        mut self,
        coerce: fn(Arc<T>) -> Arc<I>,
    ) -> Self {
        self.key = key_of_trait::<I>();
        self.wrap = Some(Box::new(move |value: Arc<T>| {
            Arc::new(coerce(value)) as AnyArc
        }));
        self
    }

    /// Keys the registration back by the concrete type, undoing an
    /// earlier `as_interface` on the same chain.
    pub fn as_self(mut self) -> Self {
        self.key = key_of::<T>();
        self.wrap = Some(Box::new(|value: Arc<T>| value as AnyArc));
        self
    }

    /// One shared instance for the whole hierarchy.
    pub fn single_instance(mut self) -> Self {
        self.lifetime = Lifetime::SingleInstance;
        self
    }

    /// One instance per scope (the default).
    pub fn per_scope(mut self) -> Self {
        self.lifetime = Lifetime::PerScope;
        self
    }

    /// A fresh instance on every resolve.
    pub fn always_new(mut self) -> Self {
        self.lifetime = Lifetime::AlwaysNew;
        self
    }

    /// Replaces an earlier registration for the same key instead of
    /// failing the build.
    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }
}

impl<T: Injectable + AsyncResource> ClassRegistration<'_, T> {
    /// Opts the class into the lifecycle protocol: `initialize()` runs
    /// before the first hand-off and `dispose()` runs when the owning
    /// scope is disposed.
    pub fn as_resource(mut self) -> Self {
        self.resource_hook = Some(|value: Arc<T>| value as Arc<dyn AsyncResource>);
        self
    }
}

impl<T: Injectable> Drop for ClassRegistration<'_, T> {
    fn drop(&mut self) {
        let wrap = match self.wrap.take() {
            Some(wrap) => wrap,
            None => return,
        };
        let wrap: Arc<dyn Fn(Arc<T>) -> AnyArc + Send + Sync> = Arc::from(wrap);
        let resource_hook = self.resource_hook;
        let ctor: Ctor = Arc::new(move |scope: &Container| {
            let wrap = wrap.clone();
            Box::pin(async move {
                let value = Arc::new(T::construct(scope).await?);
                let resource = resource_hook.map(|hook| hook(value.clone()));
                Ok(Constructed {
                    value: wrap(value),
                    resource,
                })
            })
        });
        self.builder.push(
            self.key.clone(),
            Registration::class(self.lifetime, ctor),
            self.overwrite,
        );
    }
}

/// Drop-committing proxy for an instance registration.
///
/// Instances have no constructor and no lifecycle, so the chain offers
/// only keying and the overwrite flag; lifetime tags do not apply (the
/// value is shared by every scope regardless).
pub struct InstanceRegistration<'b, T: Send + Sync + 'static> {
    builder: &'b mut ContainerBuilder,
    value: Arc<T>,
    pending: Option<(Key, AnyArc)>,
    overwrite: bool,
}

impl<T: Send + Sync + 'static> InstanceRegistration<'_, T> {
    /// Keys the instance by an interface instead of the concrete type.
    pub fn as_interface<I: ?Sized + Send + Sync + 'static>(
        mut self,
        coerce: fn(Arc<T>) -> Arc<I>,
    ) -> Self {
        let coerced: Arc<I> = coerce(self.value.clone());
        self.pending = Some((key_of_trait::<I>(), Arc::new(coerced) as AnyArc));
        self
    }

    /// Keys the instance back by the concrete type.
    pub fn as_self(mut self) -> Self {
        self.pending = Some((key_of::<T>(), self.value.clone() as AnyArc));
        self
    }

    /// Replaces an earlier registration for the same key instead of
    /// failing the build.
    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }
}

impl<T: Send + Sync + 'static> Drop for InstanceRegistration<'_, T> {
    fn drop(&mut self) {
        if let Some((key, value)) = self.pending.take() {
            self.builder
                .push(key, Registration::instance(value), self.overwrite);
        }
    }
}
