//! Runtime: shared dispatch state and the interception entry points
//!
//! The `Runtime` owns the class registry (every method table in the
//! process) and the hook registry. All mutation of dispatch metadata goes
//! through the hook entry points, which run as a single critical section
//! under the class write lock; ordinary dispatch only ever takes the read
//! lock long enough to clone an implementation out of a table.

use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};

use crate::hooks::{HookInfo, HookKey, HookOutcome, HookRegistry};
use crate::object::{ClassId, Imp, Object, Receiver};
use crate::registry::ClassRegistry;
use crate::selector::Selector;
use crate::value::Value;
use crate::{RuntimeError, RuntimeResult};

/// Process-wide default runtime
static GLOBAL: Lazy<Runtime> = Lazy::new(Runtime::new);

/// A class runtime with hookable dynamic dispatch
pub struct Runtime {
    classes: RwLock<ClassRegistry>,
    hooks: Mutex<HookRegistry>,
}

impl Runtime {
    /// Create an empty runtime
    pub fn new() -> Self {
        Self {
            classes: RwLock::new(ClassRegistry::new()),
            hooks: Mutex::new(HookRegistry::new()),
        }
    }

    /// The process-wide default runtime.
    ///
    /// Convenience for callers that want one shared class space; every
    /// operation is equally available on an owned `Runtime`.
    pub fn global() -> &'static Runtime {
        &GLOBAL
    }

    // ------------------------------------------------------------------
    // Class and instance construction
    // ------------------------------------------------------------------

    /// Define a new class (and its metaclass)
    pub fn define_class(
        &self,
        name: &str,
        parent: Option<ClassId>,
        field_count: usize,
    ) -> RuntimeResult<ClassId> {
        self.classes.write().define_class(name, parent, field_count)
    }

    /// Bind an instance method directly on a class.
    ///
    /// Fails if the class already defines the selector: after the initial
    /// definition, rebinding goes through the hook path only.
    pub fn define_method(
        &self,
        class: ClassId,
        selector: &Selector,
        imp: Imp,
    ) -> RuntimeResult<()> {
        let mut classes = self.classes.write();
        let c = classes
            .get_class_mut(class)
            .ok_or(RuntimeError::UnknownClass(class))?;
        if c.defines(selector) {
            return Err(RuntimeError::DuplicateMethod {
                class: c.name.clone(),
                selector: selector.clone(),
            });
        }
        c.methods.set(selector.clone(), imp);
        Ok(())
    }

    /// Bind a class-level method (defined on the metaclass)
    pub fn define_class_method(
        &self,
        class: ClassId,
        selector: &Selector,
        imp: Imp,
    ) -> RuntimeResult<()> {
        let meta = self.classes.read().metaclass_of(class)?;
        self.define_method(meta, selector, imp)
    }

    /// Create an instance of a class
    pub fn instantiate(&self, class: ClassId) -> RuntimeResult<Object> {
        let classes = self.classes.read();
        let c = classes
            .get_class(class)
            .ok_or(RuntimeError::UnknownClass(class))?;
        Ok(Object::new(class, c.field_count))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Look up a class ID by name
    pub fn class_named(&self, name: &str) -> Option<ClassId> {
        self.classes.read().class_named(name)
    }

    /// The metaclass of a class
    pub fn metaclass_of(&self, class: ClassId) -> RuntimeResult<ClassId> {
        self.classes.read().metaclass_of(class)
    }

    /// Nearest class in `class`'s ancestor chain that defines `selector`
    pub fn resolve_owner(
        &self,
        class: ClassId,
        selector: &Selector,
    ) -> RuntimeResult<Option<ClassId>> {
        self.classes.read().resolve_owner(class, selector)
    }

    /// Check whether an install has been recorded for (class, key)
    pub fn is_hook_installed(&self, class: ClassId, key: &HookKey) -> bool {
        self.hooks.lock().is_installed(class, key)
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Invoke `selector` on a receiver through dynamic dispatch.
    ///
    /// Resolution starts at the instance's class, or at the metaclass for
    /// a class receiver. The resolved implementation is invoked outside
    /// the registry locks, so it may itself dispatch further calls.
    pub fn send(
        &self,
        receiver: &Receiver<'_>,
        selector: &Selector,
        args: &[Value],
    ) -> RuntimeResult<Value> {
        let classes = self.classes.read();
        let start = match receiver {
            Receiver::Instance(obj) => obj.class_id,
            Receiver::Class(id) => classes.metaclass_of(*id)?,
        };
        let resolved = classes
            .resolve_owner(start, selector)?
            .and_then(|owner| classes.get_class(owner))
            .and_then(|class| class.own_method(selector))
            .cloned();
        match resolved {
            Some(imp) => {
                drop(classes);
                Ok(imp(receiver, selector, args))
            }
            None => {
                let class = classes
                    .get_class(start)
                    .ok_or(RuntimeError::UnknownClass(start))?;
                Err(RuntimeError::NoSuchMethod {
                    class: class.name.clone(),
                    selector: selector.clone(),
                })
            }
        }
    }

    // ------------------------------------------------------------------
    // Hook installation
    // ------------------------------------------------------------------

    /// Replace (or force-create) the implementation of an instance method.
    ///
    /// The selector is resolved to the nearest class in `class`'s ancestor
    /// chain that defines it; that class — not necessarily `class` — is
    /// the one mutated. Hooking a non-overriding subclass therefore
    /// changes the defining ancestor, and with it every other descendant
    /// that does not override the selector. This redirection is
    /// intentional: the swap happens where the binding actually lives,
    /// the only place a table mutation can take effect.
    ///
    /// When nothing in the chain defines the selector, `force_implement`
    /// decides between adding a fresh implementation on `class` itself
    /// and giving up with [`HookOutcome::MethodNotFound`].
    ///
    /// At most one install happens per `(destination, key)`; a repeated
    /// install reports success without running `factory` again. `key`
    /// defaults to the selector name.
    ///
    /// The whole sequence — resolution, dedup check, factory call, table
    /// mutation, registry mark — runs in one critical section, so
    /// `factory` must not call back into this runtime. The replacement it
    /// returns runs outside all locks and may dispatch freely.
    pub fn hook_instance_method<F>(
        &self,
        selector: &Selector,
        class: ClassId,
        force_implement: bool,
        key: Option<HookKey>,
        factory: F,
    ) -> RuntimeResult<HookOutcome>
    where
        F: FnOnce(&HookInfo) -> Imp,
    {
        let key = key.unwrap_or_else(|| HookKey::from(selector));

        let mut classes = self.classes.write();

        // Pick the destination and capture the original binding.
        let (destination, original) = match classes.resolve_owner(class, selector)? {
            Some(owner) => {
                let original = classes
                    .get_class(owner)
                    .and_then(|c| c.own_method(selector))
                    .cloned();
                (owner, original)
            }
            None if force_implement => (class, None),
            None => return Ok(HookOutcome::MethodNotFound),
        };

        // Idempotency gate: a recorded (destination, key) wins over
        // everything else — no factory call, no re-binding.
        let mut hooks = self.hooks.lock();
        if hooks.is_installed(destination, &key) {
            return Ok(HookOutcome::AlreadyInstalled { destination });
        }

        // Build the replacement and commit it.
        let info = HookInfo::new(selector.clone(), original);
        let replacement = factory(&info);
        let dest = classes
            .get_class_mut(destination)
            .ok_or(RuntimeError::UnknownClass(destination))?;
        dest.methods.set(selector.clone(), replacement);
        hooks.mark_installed(destination, key);

        Ok(HookOutcome::Installed { destination })
    }

    /// Replace (or force-create) the implementation of a class-level
    /// method.
    ///
    /// Equivalent to hooking the instance method on the metaclass with
    /// the default key; the metaclass chain mirrors the instance chain,
    /// so ancestor redirection applies to class methods unchanged.
    pub fn hook_class_method<F>(
        &self,
        selector: &Selector,
        class: ClassId,
        force_implement: bool,
        factory: F,
    ) -> RuntimeResult<HookOutcome>
    where
        F: FnOnce(&HookInfo) -> Imp,
    {
        let meta = self.classes.read().metaclass_of(class)?;
        self.hook_instance_method(selector, meta, force_implement, None, factory)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
