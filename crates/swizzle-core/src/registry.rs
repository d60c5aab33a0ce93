//! Class registry and ancestor resolution

use rustc_hash::FxHashMap;

use crate::object::{Class, ClassId};
use crate::selector::Selector;
use crate::{RuntimeError, RuntimeResult};

/// All classes known to a runtime, indexed by ID.
///
/// IDs are assigned on definition and stay valid for the life of the
/// registry; classes are never removed. The hook registry relies on that
/// stability to key installs by class ID.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    /// Classes indexed by ID
    classes: Vec<Class>,
    /// Class name to ID mapping (plain classes only, not metaclasses)
    name_to_id: FxHashMap<String, ClassId>,
}

impl ClassRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a class and its metaclass.
    ///
    /// The metaclass chain mirrors the instance chain: the metaclass of a
    /// child inherits from the metaclass of its parent, so class-level
    /// methods resolve through the same single-inheritance walk as
    /// instance methods.
    pub fn define_class(
        &mut self,
        name: &str,
        parent: Option<ClassId>,
        field_count: usize,
    ) -> RuntimeResult<ClassId> {
        if self.name_to_id.contains_key(name) {
            return Err(RuntimeError::DuplicateClass(name.to_string()));
        }
        let parent_meta = match parent {
            Some(pid) => {
                let p = self
                    .get_class(pid)
                    .ok_or(RuntimeError::UnknownClass(pid))?;
                p.metaclass_id
            }
            None => None,
        };

        let meta_id = self.classes.len();
        let meta_name = format!("{name}.meta");
        let meta = match parent_meta {
            Some(pm) => Class::with_parent(meta_id, meta_name, 0, pm),
            None => Class::new(meta_id, meta_name, 0),
        };
        self.classes.push(meta);

        let id = self.classes.len();
        let mut class = match parent {
            Some(pid) => Class::with_parent(id, name.to_string(), field_count, pid),
            None => Class::new(id, name.to_string(), field_count),
        };
        class.metaclass_id = Some(meta_id);
        self.classes.push(class);
        self.name_to_id.insert(name.to_string(), id);

        Ok(id)
    }

    /// Get class by ID
    pub fn get_class(&self, id: ClassId) -> Option<&Class> {
        self.classes.get(id)
    }

    /// Get mutable class by ID
    pub fn get_class_mut(&mut self, id: ClassId) -> Option<&mut Class> {
        self.classes.get_mut(id)
    }

    /// Get class ID by name
    pub fn class_named(&self, name: &str) -> Option<ClassId> {
        self.name_to_id.get(name).copied()
    }

    /// The metaclass of a class
    pub fn metaclass_of(&self, id: ClassId) -> RuntimeResult<ClassId> {
        let class = self.get_class(id).ok_or(RuntimeError::UnknownClass(id))?;
        class.metaclass_id.ok_or_else(|| RuntimeError::NoMetaclass {
            class: class.name.clone(),
        })
    }

    /// Nearest class in the ancestor chain that itself defines `selector`.
    ///
    /// Walks `start, parent(start), …` and returns the first class whose
    /// own table binds the selector, or `None` when no class in the chain
    /// does. Side-effect free; cost is bounded by the chain depth.
    pub fn resolve_owner(
        &self,
        start: ClassId,
        selector: &Selector,
    ) -> RuntimeResult<Option<ClassId>> {
        let mut cursor = Some(start);
        while let Some(id) = cursor {
            let class = self.get_class(id).ok_or(RuntimeError::UnknownClass(id))?;
            if class.defines(selector) {
                return Ok(Some(id));
            }
            cursor = class.parent_id;
        }
        Ok(None)
    }

    /// Number of registered classes (metaclasses included)
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate over all classes with their IDs
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &Class)> {
        self.classes.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::imp;
    use crate::value::Value;

    #[test]
    fn test_define_root_class() {
        let mut registry = ClassRegistry::new();
        let id = registry.define_class("Point", None, 2).unwrap();

        let class = registry.get_class(id).unwrap();
        assert_eq!(class.name, "Point");
        assert_eq!(class.parent_id, None);
        assert_eq!(class.field_count, 2);
        assert_eq!(registry.class_named("Point"), Some(id));
    }

    #[test]
    fn test_define_child_class() {
        let mut registry = ClassRegistry::new();
        let parent = registry.define_class("Shape", None, 0).unwrap();
        let child = registry.define_class("Circle", Some(parent), 1).unwrap();

        assert_eq!(registry.get_class(child).unwrap().parent_id, Some(parent));
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let mut registry = ClassRegistry::new();
        registry.define_class("Point", None, 0).unwrap();
        let err = registry.define_class("Point", None, 0).unwrap_err();
        assert!(matches!(err, RuntimeError::DuplicateClass(_)));
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut registry = ClassRegistry::new();
        let err = registry.define_class("Orphan", Some(99), 0).unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownClass(99)));
    }

    #[test]
    fn test_metaclass_chain_mirrors_instance_chain() {
        let mut registry = ClassRegistry::new();
        let a = registry.define_class("A", None, 0).unwrap();
        let b = registry.define_class("B", Some(a), 0).unwrap();

        let meta_a = registry.metaclass_of(a).unwrap();
        let meta_b = registry.metaclass_of(b).unwrap();
        assert_ne!(meta_a, meta_b);
        assert_eq!(registry.get_class(meta_b).unwrap().parent_id, Some(meta_a));
        assert_eq!(registry.get_class(meta_a).unwrap().parent_id, None);
    }

    #[test]
    fn test_metaclass_of_metaclass_rejected() {
        let mut registry = ClassRegistry::new();
        let a = registry.define_class("A", None, 0).unwrap();
        let meta = registry.metaclass_of(a).unwrap();
        assert!(matches!(
            registry.metaclass_of(meta),
            Err(RuntimeError::NoMetaclass { .. })
        ));
    }

    #[test]
    fn test_resolve_owner_walks_chain() {
        let mut registry = ClassRegistry::new();
        let a = registry.define_class("A", None, 0).unwrap();
        let b = registry.define_class("B", Some(a), 0).unwrap();
        let c = registry.define_class("C", Some(b), 0).unwrap();

        let sel = Selector::new("foo");
        registry
            .get_class_mut(a)
            .unwrap()
            .methods
            .set(sel.clone(), imp(|_, _, _| Value::null()));

        // defined on A only: every descendant resolves to A
        assert_eq!(registry.resolve_owner(c, &sel).unwrap(), Some(a));
        assert_eq!(registry.resolve_owner(b, &sel).unwrap(), Some(a));
        assert_eq!(registry.resolve_owner(a, &sel).unwrap(), Some(a));

        // an override on B shadows A for B and C but not for A itself
        registry
            .get_class_mut(b)
            .unwrap()
            .methods
            .set(sel.clone(), imp(|_, _, _| Value::null()));
        assert_eq!(registry.resolve_owner(c, &sel).unwrap(), Some(b));
        assert_eq!(registry.resolve_owner(a, &sel).unwrap(), Some(a));
    }

    #[test]
    fn test_resolve_owner_not_found() {
        let mut registry = ClassRegistry::new();
        let a = registry.define_class("A", None, 0).unwrap();
        let sel = Selector::new("missing");
        assert_eq!(registry.resolve_owner(a, &sel).unwrap(), None);
    }

    #[test]
    fn test_resolve_owner_unknown_start() {
        let registry = ClassRegistry::new();
        let sel = Selector::new("foo");
        assert!(matches!(
            registry.resolve_owner(5, &sel),
            Err(RuntimeError::UnknownClass(5))
        ));
    }
}
