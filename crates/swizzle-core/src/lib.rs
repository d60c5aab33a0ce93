//! Swizzle method-interception engine
//!
//! Live replacement of method implementations in a class-based runtime:
//! - Class model with single inheritance and per-class own-method tables
//! - Ancestor-chain resolution of the class that actually defines a selector
//! - Hook installer: swap the binding where it is defined, or force a
//!   brand-new one onto the requested class
//! - Monotonic hook registry guaranteeing at-most-one install per (class, key)
//! - Metaclass adapter so class-level methods hook through the same path
//!
//! Replacing a method on a class that merely inherits it mutates the
//! defining ancestor, which also affects every other descendant that does
//! not override the selector. That redirection is the point of the engine,
//! not an accident; see [`Runtime::hook_instance_method`].

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod builder;
pub mod hooks;
pub mod object;
pub mod registry;
pub mod runtime;
pub mod selector;
pub mod value;

pub use builder::{ClassSpec, HookRequest};
pub use hooks::{HookInfo, HookKey, HookOutcome, HookRegistry};
pub use object::{imp, Class, ClassId, Imp, MethodTable, Object, Receiver};
pub use registry::ClassRegistry;
pub use runtime::Runtime;
pub use selector::Selector;
pub use value::Value;

/// Runtime errors
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Class ID not present in the registry
    #[error("Unknown class id: {0}")]
    UnknownClass(ClassId),

    /// A class with this name is already registered
    #[error("Duplicate class name: {0}")]
    DuplicateClass(String),

    /// The class already defines this selector directly
    #[error("Method {selector} already defined on {class}")]
    DuplicateMethod {
        /// Class name
        class: String,
        /// Selector that was being defined
        selector: Selector,
    },

    /// Metaclass requested for a class that has none (it is a metaclass)
    #[error("Class {class} has no metaclass")]
    NoMetaclass {
        /// Class name
        class: String,
    },

    /// No class in the receiver's ancestor chain defines the selector
    #[error("No method {selector} on {class} or its ancestors")]
    NoSuchMethod {
        /// Class name the dispatch started from
        class: String,
        /// Selector that failed to resolve
        selector: Selector,
    },
}

/// Runtime result
pub type RuntimeResult<T> = Result<T, RuntimeError>;
