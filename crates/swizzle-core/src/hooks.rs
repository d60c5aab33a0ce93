//! Hook metadata, dedup registry, and install outcomes

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::object::{ClassId, Imp};
use crate::selector::Selector;

/// Dedup token for one logical hook installation.
///
/// Defaults to the selector name when the caller supplies none. A key
/// identifies the installation, not the class that ends up holding it:
/// the registry pairs it with the destination class at install time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HookKey(Arc<str>);

impl HookKey {
    /// Create a key from an arbitrary token
    pub fn new(token: &str) -> Self {
        Self(Arc::from(token))
    }

    /// The token this key carries
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HookKey {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<&Selector> for HookKey {
    fn from(selector: &Selector) -> Self {
        Self::new(selector.name())
    }
}

impl fmt::Display for HookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata handed to an implementation factory.
///
/// Built once per actual install, immediately before the factory runs,
/// and typically captured by the replacement closure the factory returns.
/// It lives as long as that closure is reachable, which is what keeps the
/// captured original implementation alive for chained calls.
#[derive(Clone)]
pub struct HookInfo {
    selector: Selector,
    original: Option<Imp>,
}

impl HookInfo {
    pub(crate) fn new(selector: Selector, original: Option<Imp>) -> Self {
        Self { selector, original }
    }

    /// The selector being replaced
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The implementation that was bound before this install.
    ///
    /// `None` when the hook was force-implemented onto a class whose chain
    /// never defined the selector — there is nothing to chain to. A
    /// replacement that calls through must forward the same receiver and
    /// selector it was invoked with and match the original's argument
    /// expectations; the engine cannot verify either.
    pub fn original(&self) -> Option<&Imp> {
        self.original.as_ref()
    }

    /// Whether an original implementation was captured
    pub fn original_exists(&self) -> bool {
        self.original.is_some()
    }
}

impl fmt::Debug for HookInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookInfo")
            .field("selector", &self.selector)
            .field("original_exists", &self.original_exists())
            .finish()
    }
}

/// Process-lifetime record of performed installs.
///
/// Monotonic: entries are only ever added, there is no unhook. One mark
/// per (class, key) is the invariant the installer relies on to keep
/// repeated installs from re-running factories or re-binding tables.
#[derive(Debug, Default)]
pub struct HookRegistry {
    installed: FxHashSet<(ClassId, HookKey)>,
}

impl HookRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether an install has been recorded for (class, key)
    pub fn is_installed(&self, class: ClassId, key: &HookKey) -> bool {
        self.installed.contains(&(class, key.clone()))
    }

    /// Record an install. Returns false if it was already recorded.
    pub fn mark_installed(&mut self, class: ClassId, key: HookKey) -> bool {
        self.installed.insert((class, key))
    }

    /// Number of recorded installs
    pub fn len(&self) -> usize {
        self.installed.len()
    }

    /// Check if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.installed.is_empty()
    }
}

/// Terminal result of a hook install
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// The factory ran and its replacement was bound on `destination`
    Installed {
        /// The class actually mutated — may be an ancestor of the class
        /// the install named
        destination: ClassId,
    },
    /// An earlier install already claimed this (class, key); the factory
    /// was not re-run and the table was left untouched. Success.
    AlreadyInstalled {
        /// The class the earlier install mutated
        destination: ClassId,
    },
    /// No class in the chain defines the selector and force-implement was
    /// off; the runtime was left untouched. The only failure outcome.
    MethodNotFound,
}

impl HookOutcome {
    /// Whether the install reported success
    pub fn succeeded(&self) -> bool {
        !matches!(self, HookOutcome::MethodNotFound)
    }

    /// The mutated class, when one exists
    pub fn destination(&self) -> Option<ClassId> {
        match self {
            HookOutcome::Installed { destination }
            | HookOutcome::AlreadyInstalled { destination } => Some(*destination),
            HookOutcome::MethodNotFound => None,
        }
    }
}
