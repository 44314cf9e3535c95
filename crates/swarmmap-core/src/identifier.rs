//! Identifier management using string interning for efficient string storage and comparison
//!
//! Cluster entities arrive with long opaque identifiers (Docker object ids, task
//! names) that are compared and hashed over and over while a layout is built.
//! This module provides the [`Id`] type, which interns each string once and
//! afterwards behaves like a cheap `Copy` handle.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner. The interner
/// only caches symbols; it never affects the outcome of a layout.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Efficient identifier type using string interning
///
/// # Examples
///
/// ```
/// use swarmmap_core::identifier::Id;
///
/// let host = Id::new("node-7f3a");
/// let gwbridge = Id::new("docker_gwbridge-node-7f3a");
///
/// assert_eq!(host, "node-7f3a");
/// assert!(gwbridge.contains(host));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns `true` if the identifier is the empty string.
    ///
    /// Empty identifiers carry no identity and are rejected by the layout engine.
    pub fn is_empty(&self) -> bool {
        self == ""
    }

    /// Returns `true` if `other` occurs as a substring of this identifier.
    ///
    /// An empty `other` never matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use swarmmap_core::identifier::Id;
    ///
    /// let network = Id::new("gwbridge_worker-2");
    /// assert!(network.contains(Id::new("worker-2")));
    /// assert!(!network.contains(Id::new("worker-3")));
    /// ```
    pub fn contains(&self, other: Id) -> bool {
        let interner = interner();
        let haystack = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        let needle = interner
            .resolve(other.0)
            .expect("Symbol should exist in interner");
        !needle.is_empty() && haystack.contains(needle)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{}", str_value)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice
    ///
    /// This is a convenience implementation that calls `Id::new`.
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for Id {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
