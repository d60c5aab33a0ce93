//! Method selectors

use std::fmt;
use std::sync::Arc;

/// Stable token naming a method.
///
/// Selectors compare and hash by name only; the call signature behind a
/// name is a caller contract, not part of the token. Cloning shares the
/// underlying allocation, so the same token can sit in a method table and
/// be captured by a replacement closure at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector(Arc<str>);

impl Selector {
    /// Create a selector from a method name
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// The method name this selector stands for
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
