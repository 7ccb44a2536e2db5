//! Scope validation, resolution and expansion.

pub mod catalog;
pub mod expander;

pub use catalog::{ScopeCatalog, ScopeKind};
pub use expander::{Expansion, ScopeExpander, value_to_string};

/// Decides whether a scope id names an existing instance of a scope.
pub trait ScopeValidator: Send + Sync {
    fn validate(&self, scope: &str, scope_id: &str) -> bool;
}

/// Maps a scope id (e.g. a website code) to the id the store is keyed by.
pub trait ScopeResolver: Send + Sync {
    fn resolve(&self, scope_id: &str, scope: &str) -> anyhow::Result<String>;

    /// Name the store is keyed by for `scope`, folding any aliases.
    fn canonical_scope<'s>(&self, scope: &'s str) -> &'s str {
        scope
    }
}
