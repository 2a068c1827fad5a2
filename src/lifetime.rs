//! Lifetime tags and their partial order.

/// Lifetime tags controlling instance caching and scope routing.
///
/// # Tag characteristics
///
/// - **SingleInstance**: one instance for the whole scope hierarchy,
///   cached at the root and shared by every nested scope.
/// - **PerScope** (the default): one instance per scope; different scopes
///   get different instances.
/// - **AlwaysNew**: never cached; every resolve constructs a fresh
///   instance and a fresh sub-graph.
///
/// A pre-built instance registration has no construction lifetime and
/// ignores tagging entirely; it resolves in O(1) from any scope.
///
/// # Examples
///
/// ```rust
/// use oxifac::Lifetime;
///
/// // Only SingleInstance requests may be satisfied by a broader scope.
/// assert!(Lifetime::PerScope.delegable_to(Lifetime::SingleInstance));
/// assert!(!Lifetime::PerScope.delegable_to(Lifetime::AlwaysNew));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lifetime {
    /// Root-cached, shared by the entire scope hierarchy
    SingleInstance,
    /// Cached in the scope that resolved it
    #[default]
    PerScope,
    /// Never cached; fresh instance on every resolve
    AlwaysNew,
}

impl Lifetime {
    /// Strict partial order over tags: `self < other` when a request made
    /// with this tag's breadth may be satisfied by delegating to a scope
    /// broad enough for `other`.
    ///
    /// `AlwaysNew < PerScope < SingleInstance` and
    /// `AlwaysNew < SingleInstance`; everything else is unordered. This
    /// decides routing only, never construction order.
    pub fn delegable_to(self, other: Lifetime) -> bool {
        matches!(
            (self, other),
            (Lifetime::AlwaysNew, Lifetime::SingleInstance)
                | (Lifetime::AlwaysNew, Lifetime::PerScope)
                | (Lifetime::PerScope, Lifetime::SingleInstance)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_order_is_strict() {
        for tag in [Lifetime::SingleInstance, Lifetime::PerScope, Lifetime::AlwaysNew] {
            assert!(!tag.delegable_to(tag));
        }
    }

    #[test]
    fn partial_order_pairs() {
        assert!(Lifetime::AlwaysNew.delegable_to(Lifetime::SingleInstance));
        assert!(Lifetime::AlwaysNew.delegable_to(Lifetime::PerScope));
        assert!(Lifetime::PerScope.delegable_to(Lifetime::SingleInstance));

        assert!(!Lifetime::SingleInstance.delegable_to(Lifetime::PerScope));
        assert!(!Lifetime::SingleInstance.delegable_to(Lifetime::AlwaysNew));
        assert!(!Lifetime::PerScope.delegable_to(Lifetime::AlwaysNew));
    }

    #[test]
    fn default_is_per_scope() {
        assert_eq!(Lifetime::default(), Lifetime::PerScope);
    }
}
