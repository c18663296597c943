//! `ModuleEntry`: an immutable file-within-a-module (§3).

use std::fmt;
use std::sync::Arc;

/// A slash-separated path, always relative to the module root (e.g.
/// `"lib/arm64-v8a/libfoo.so"`, `"assets/images#countries_latam/a.png"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryPath(String);

impl EntryPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Replace this path's string content, used by suffix stripping.
    pub fn with_str(new_path: String) -> Self {
        Self(new_path)
    }
}

impl fmt::Display for EntryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque, lazily-resolved byte source. The actual bytes are read by the
/// packaging layer; the core never inspects them beyond what `ModuleEntry`
/// exposes (path, size hint, force-uncompressed flag).
pub trait EntryContent: fmt::Debug + Send + Sync {
    fn read(&self) -> std::io::Result<Vec<u8>>;
    fn len(&self) -> u64;
}

#[derive(Debug)]
struct InMemoryContent(Vec<u8>);

impl EntryContent for InMemoryContent {
    fn read(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.0.clone())
    }

    fn len(&self) -> u64 {
        self.0.len() as u64
    }
}

/// A cheap-to-clone handle to an entry's bytes. Two handles are equal iff
/// they refer to the very same underlying source — the core never needs to
/// compare file contents, only identity, so this never reads bytes.
#[derive(Debug, Clone)]
pub struct ContentHandle(Arc<dyn EntryContent>);

impl ContentHandle {
    pub fn from_source(source: Arc<dyn EntryContent>) -> Self {
        Self(source)
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Arc::new(InMemoryContent(bytes.into())))
    }

    pub fn read(&self) -> std::io::Result<Vec<u8>> {
        self.0.read()
    }

    pub fn len(&self) -> u64 {
        self.0.len()
    }
}

impl PartialEq for ContentHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ContentHandle {}

/// A module's name, non-empty except for the base module in contexts where
/// an empty split-id denotes "master of the base module" (§4.4 step 8).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleName(pub String);

impl ModuleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An immutable file within a module.
#[derive(Debug, Clone)]
pub struct ModuleEntry {
    pub path: EntryPath,
    pub content: ContentHandle,
    pub force_uncompressed: bool,
    pub module_name: ModuleName,
}

impl ModuleEntry {
    pub fn new(path: impl Into<String>, content: ContentHandle, module_name: ModuleName) -> Self {
        Self {
            path: EntryPath::new(path),
            content,
            force_uncompressed: false,
            module_name,
        }
    }

    pub fn force_uncompressed(mut self, value: bool) -> Self {
        self.force_uncompressed = value;
        self
    }

    /// Return a copy of this entry with a rewritten path, preserving
    /// content identity and `force_uncompressed`. Used by suffix stripping
    /// and by the sharder when re-rooting an entry into a fused module.
    pub fn with_path(&self, new_path: impl Into<String>) -> Self {
        Self {
            path: EntryPath::new(new_path),
            content: self.content.clone(),
            force_uncompressed: self.force_uncompressed,
            module_name: self.module_name.clone(),
        }
    }
}

impl PartialEq for ModuleEntry {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.content == other.content
    }
}

impl Eq for ModuleEntry {}

impl std::hash::Hash for ModuleEntry {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}
