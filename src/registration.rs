//! Frozen registration descriptors and the shared registration map.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::container::Container;
use crate::error::DiResult;
use crate::internal::BoxFuture;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::resource::AsyncResource;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// Output of a constructor closure: the type-erased value plus the
/// lifecycle handle when the registration opted into the resource
/// protocol. The container initializes the handle before committing the
/// value to the cache and owns its disposal in the constructing scope.
pub(crate) struct Constructed {
    pub(crate) value: AnyArc,
    pub(crate) resource: Option<Arc<dyn AsyncResource>>,
}

pub(crate) type Ctor =
    Arc<dyn for<'a> Fn(&'a Container) -> BoxFuture<'a, DiResult<Constructed>> + Send + Sync>;

/// Where a registration's instances come from.
pub(crate) enum Source {
    /// Construct on demand via the registered constructor
    Ctor(Ctor),
    /// Pre-built value, immune to lifetime tagging; cached verbatim by
    /// every scope that reaches it
    Instance(AnyArc),
}

/// Immutable-after-build registration descriptor.
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) source: Source,
}

impl Registration {
    pub(crate) fn class(lifetime: Lifetime, ctor: Ctor) -> Self {
        Self {
            lifetime,
            source: Source::Ctor(ctor),
        }
    }

    pub(crate) fn instance(value: AnyArc) -> Self {
        Self {
            // Tag is irrelevant for instances; resolution short-circuits
            // on the source kind before consulting it.
            lifetime: Lifetime::default(),
            source: Source::Instance(value),
        }
    }
}

/// The frozen registration map, shared by every scope in one hierarchy.
/// Immutable post-build, so lookups need no locking.
pub(crate) struct Registry {
    map: HashMap<Key, Registration>,
}

impl Registry {
    pub(crate) fn new(map: HashMap<Key, Registration>) -> Self {
        Self { map }
    }

    #[inline(always)]
    pub(crate) fn get(&self, key: &Key) -> Option<&Registration> {
        self.map.get(key)
    }

    #[inline(always)]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.map.contains_key(key)
    }
}
