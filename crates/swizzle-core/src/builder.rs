//! Fluent construction layer
//!
//! Thin declarative wrappers over the runtime's core operations: class
//! definition (`ClassSpec`) and hook installation (`HookRequest`). Pure
//! layering — no runtime behavior of its own.

use crate::hooks::{HookInfo, HookKey, HookOutcome};
use crate::object::{ClassId, Imp};
use crate::runtime::Runtime;
use crate::selector::Selector;
use crate::RuntimeResult;

/// Declarative class definition
#[derive(Clone)]
pub struct ClassSpec {
    name: String,
    parent: Option<ClassId>,
    field_count: usize,
    methods: Vec<(Selector, Imp)>,
    class_methods: Vec<(Selector, Imp)>,
}

impl ClassSpec {
    /// Start a class definition
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            field_count: 0,
            methods: Vec::new(),
            class_methods: Vec::new(),
        }
    }

    /// Set the parent class
    pub fn parent(mut self, parent: ClassId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the number of instance fields
    pub fn fields(mut self, count: usize) -> Self {
        self.field_count = count;
        self
    }

    /// Bind an instance method
    pub fn method(mut self, selector: &str, imp: Imp) -> Self {
        self.methods.push((Selector::new(selector), imp));
        self
    }

    /// Bind a class-level method
    pub fn class_method(mut self, selector: &str, imp: Imp) -> Self {
        self.class_methods.push((Selector::new(selector), imp));
        self
    }

    /// Register the class and its methods on a runtime
    pub fn register(self, runtime: &Runtime) -> RuntimeResult<ClassId> {
        let id = runtime.define_class(&self.name, self.parent, self.field_count)?;
        for (selector, imp) in self.methods {
            runtime.define_method(id, &selector, imp)?;
        }
        for (selector, imp) in self.class_methods {
            runtime.define_class_method(id, &selector, imp)?;
        }
        Ok(id)
    }
}

/// Declarative hook installation
#[derive(Clone)]
pub struct HookRequest {
    selector: Selector,
    class: ClassId,
    class_level: bool,
    force_implement: bool,
    key: Option<HookKey>,
}

impl HookRequest {
    /// Hook an instance method on `class`
    pub fn instance_method(selector: &str, class: ClassId) -> Self {
        Self {
            selector: Selector::new(selector),
            class,
            class_level: false,
            force_implement: false,
            key: None,
        }
    }

    /// Hook a class-level method on `class`
    pub fn class_method(selector: &str, class: ClassId) -> Self {
        Self {
            selector: Selector::new(selector),
            class,
            class_level: true,
            force_implement: false,
            key: None,
        }
    }

    /// Add a brand-new implementation when nothing in the chain defines
    /// the selector, instead of failing
    pub fn force_implement(mut self) -> Self {
        self.force_implement = true;
        self
    }

    /// Use an explicit dedup key instead of the selector name
    pub fn key(mut self, key: &str) -> Self {
        self.key = Some(HookKey::new(key));
        self
    }

    /// Perform the install against a runtime
    pub fn install<F>(self, runtime: &Runtime, factory: F) -> RuntimeResult<HookOutcome>
    where
        F: FnOnce(&HookInfo) -> Imp,
    {
        let class = if self.class_level {
            runtime.metaclass_of(self.class)?
        } else {
            self.class
        };
        runtime.hook_instance_method(&self.selector, class, self.force_implement, self.key, factory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{imp, Receiver};
    use crate::value::Value;

    #[test]
    fn test_class_spec_register() {
        let rt = Runtime::new();
        let shape = ClassSpec::new("Shape")
            .method("kind", imp(|_, _, _| Value::str("shape")))
            .register(&rt)
            .unwrap();
        let circle = ClassSpec::new("Circle")
            .parent(shape)
            .fields(1)
            .method("area", imp(|_, _, _| Value::f64(3.14)))
            .class_method("tag", imp(|_, _, _| Value::str("circle class")))
            .register(&rt)
            .unwrap();

        let obj = rt.instantiate(circle).unwrap();
        assert_eq!(obj.field_count(), 1);

        let receiver = Receiver::Instance(&obj);
        assert_eq!(
            rt.send(&receiver, &Selector::new("kind"), &[]).unwrap(),
            Value::str("shape")
        );
        assert_eq!(
            rt.send(&receiver, &Selector::new("area"), &[]).unwrap(),
            Value::f64(3.14)
        );
        assert_eq!(
            rt.send(&Receiver::Class(circle), &Selector::new("tag"), &[])
                .unwrap(),
            Value::str("circle class")
        );
    }

    #[test]
    fn test_hook_request_instance_method() {
        let rt = Runtime::new();
        let class = ClassSpec::new("Counter")
            .method("value", imp(|_, _, _| Value::i32(1)))
            .register(&rt)
            .unwrap();

        let outcome = HookRequest::instance_method("value", class)
            .install(&rt, |_| imp(|_, _, _| Value::i32(2)))
            .unwrap();
        assert_eq!(outcome.destination(), Some(class));

        let obj = rt.instantiate(class).unwrap();
        assert_eq!(
            rt.send(&Receiver::Instance(&obj), &Selector::new("value"), &[])
                .unwrap(),
            Value::i32(2)
        );
    }

    #[test]
    fn test_hook_request_force_implement_and_key() {
        let rt = Runtime::new();
        let class = ClassSpec::new("Blank").register(&rt).unwrap();

        let outcome = HookRequest::instance_method("extra", class)
            .force_implement()
            .key("extra-hook")
            .install(&rt, |info| {
                assert!(!info.original_exists());
                imp(|_, _, _| Value::str("added"))
            })
            .unwrap();
        assert_eq!(outcome.destination(), Some(class));
        assert!(rt.is_hook_installed(class, &HookKey::new("extra-hook")));
    }

    #[test]
    fn test_hook_request_class_method() {
        let rt = Runtime::new();
        let class = ClassSpec::new("Widget")
            .class_method("tag", imp(|_, _, _| Value::str("v1")))
            .register(&rt)
            .unwrap();

        let meta = rt.metaclass_of(class).unwrap();
        let outcome = HookRequest::class_method("tag", class)
            .install(&rt, |_| imp(|_, _, _| Value::str("v2")))
            .unwrap();
        assert_eq!(outcome.destination(), Some(meta));

        assert_eq!(
            rt.send(&Receiver::Class(class), &Selector::new("tag"), &[])
                .unwrap(),
            Value::str("v2")
        );
    }
}
