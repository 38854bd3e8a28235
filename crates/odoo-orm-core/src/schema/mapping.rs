use indexmap::IndexMap;

/// Server version a mapping applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    /// Applies to every server version without an exact entry.
    Any,

    Exact(String),
}

/// Per-version renaming of local field names to remote field names.
///
/// Lookup tries the exact server version, then the wildcard, then leaves the
/// name unchanged. Each field falls through independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMapping {
    pub versions: IndexMap<Version, IndexMap<String, String>>,
}

/// Remote to local renaming, precomputed from a [`FieldMapping`].
#[derive(Debug, Clone, Default)]
pub struct Inverse {
    versions: IndexMap<Version, IndexMap<String, String>>,
}

impl FieldMapping {
    pub fn insert(
        &mut self,
        version: impl Into<Version>,
        local: impl Into<String>,
        remote: impl Into<String>,
    ) {
        self.versions
            .entry(version.into())
            .or_default()
            .insert(local.into(), remote.into());
    }

    /// Layers `other` over `self`; entries of `other` win.
    pub fn merge(&mut self, other: &FieldMapping) {
        for (version, fields) in &other.versions {
            let entry = self.versions.entry(version.clone()).or_default();
            for (local, remote) in fields {
                entry.insert(local.clone(), remote.clone());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.versions.values().all(IndexMap::is_empty)
    }

    pub fn to_remote<'a>(&'a self, version: &str, local: &'a str) -> &'a str {
        lookup(
            self.versions.get(&Version::exact(version)),
            self.versions.get(&Version::Any),
            local,
        )
    }

    pub fn invert(&self) -> Inverse {
        let versions = self
            .versions
            .iter()
            .map(|(version, fields)| {
                let inverted = fields
                    .iter()
                    .map(|(local, remote)| (remote.clone(), local.clone()))
                    .collect();
                (version.clone(), inverted)
            })
            .collect();

        Inverse { versions }
    }
}

impl Inverse {
    pub fn to_local<'a>(&'a self, version: &str, remote: &'a str) -> &'a str {
        lookup(
            self.versions.get(&Version::exact(version)),
            self.versions.get(&Version::Any),
            remote,
        )
    }
}

fn lookup<'a>(
    exact: Option<&'a IndexMap<String, String>>,
    any: Option<&'a IndexMap<String, String>>,
    name: &'a str,
) -> &'a str {
    exact
        .and_then(|table| table.get(name))
        .or_else(|| any.and_then(|table| table.get(name)))
        .map(String::as_str)
        .unwrap_or(name)
}

impl Version {
    pub fn exact(version: impl Into<String>) -> Self {
        Self::Exact(version.into())
    }
}

impl From<&str> for Version {
    fn from(value: &str) -> Self {
        match value {
            "*" => Self::Any,
            version => Self::exact(version),
        }
    }
}
