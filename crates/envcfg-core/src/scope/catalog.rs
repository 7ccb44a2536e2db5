//! Known websites and stores, used to validate and resolve scope ids.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ScopeResolver, ScopeValidator};
use crate::types::{DEFAULT_SCOPE, DEFAULT_SCOPE_ID};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Default,
    Websites,
    Stores,
}

impl ScopeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeKind::Default => DEFAULT_SCOPE,
            ScopeKind::Websites => "websites",
            ScopeKind::Stores => "stores",
        }
    }
}

impl FromStr for ScopeKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(ScopeKind::Default),
            "websites" | "website" => Ok(ScopeKind::Websites),
            "stores" | "store" => Ok(ScopeKind::Stores),
            other => anyhow::bail!("Unknown scope: {}", other),
        }
    }
}

/// Website and store codes mapped to their numeric ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeCatalog {
    #[serde(default)]
    pub websites: BTreeMap<String, u32>,
    #[serde(default)]
    pub stores: BTreeMap<String, u32>,
}

impl ScopeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_website(mut self, code: impl Into<String>, id: u32) -> Self {
        self.websites.insert(code.into(), id);
        self
    }

    pub fn with_store(mut self, code: impl Into<String>, id: u32) -> Self {
        self.stores.insert(code.into(), id);
        self
    }

    fn codes(&self, kind: ScopeKind) -> Option<&BTreeMap<String, u32>> {
        match kind {
            ScopeKind::Default => None,
            ScopeKind::Websites => Some(&self.websites),
            ScopeKind::Stores => Some(&self.stores),
        }
    }

    /// Numeric id for a code or an id, if the catalog knows it.
    fn lookup(&self, kind: ScopeKind, scope_id: &str) -> Option<u32> {
        let codes = self.codes(kind)?;
        if let Some(id) = codes.get(scope_id) {
            return Some(*id);
        }
        let id = scope_id.parse::<u32>().ok()?;
        codes.values().any(|known| *known == id).then_some(id)
    }

    /// Check that no two codes of one scope share an id.
    pub fn ensure_unique_ids(&self) -> anyhow::Result<()> {
        for kind in [ScopeKind::Websites, ScopeKind::Stores] {
            let Some(codes) = self.codes(kind) else {
                continue;
            };
            let mut seen: BTreeMap<u32, &str> = BTreeMap::new();
            for (code, id) in codes {
                if let Some(previous) = seen.insert(*id, code) {
                    anyhow::bail!(
                        "Duplicate {} id {}: '{}' and '{}'",
                        kind.as_str(),
                        id,
                        previous,
                        code
                    );
                }
            }
        }
        Ok(())
    }
}

impl ScopeValidator for ScopeCatalog {
    fn validate(&self, scope: &str, scope_id: &str) -> bool {
        match scope.parse::<ScopeKind>() {
            Ok(ScopeKind::Default) => scope_id == DEFAULT_SCOPE_ID,
            Ok(kind) => self.lookup(kind, scope_id).is_some(),
            Err(_) => false,
        }
    }
}

impl ScopeResolver for ScopeCatalog {
    fn resolve(&self, scope_id: &str, scope: &str) -> anyhow::Result<String> {
        match scope.parse::<ScopeKind>()? {
            ScopeKind::Default => Ok(DEFAULT_SCOPE_ID.to_string()),
            kind => self
                .lookup(kind, scope_id)
                .map(|id| id.to_string())
                .ok_or_else(|| {
                    anyhow::anyhow!("Unknown {} scope id: {}", kind.as_str(), scope_id)
                }),
        }
    }

    fn canonical_scope<'s>(&self, scope: &'s str) -> &'s str {
        scope.parse::<ScopeKind>().map_or(scope, |kind| kind.as_str())
    }
}
