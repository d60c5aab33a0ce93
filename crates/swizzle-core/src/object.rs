//! Object model and class system

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::selector::Selector;
use crate::value::Value;

/// Class ID (index into the runtime class registry)
pub type ClassId = usize;

/// Receiver of a method call
#[derive(Debug, Clone, Copy)]
pub enum Receiver<'a> {
    /// An object instance (instance-level call)
    Instance(&'a Object),
    /// A class (type-level call, dispatched through its metaclass)
    Class(ClassId),
}

impl Receiver<'_> {
    /// The class the receiver belongs to: the instance's class, or the
    /// class itself for a type-level receiver.
    pub fn class_id(&self) -> ClassId {
        match self {
            Receiver::Instance(obj) => obj.class_id,
            Receiver::Class(id) => *id,
        }
    }
}

/// A method implementation.
///
/// Implementations follow a fixed calling convention: receiver first, then
/// the selector the call was made with, then the declared arguments.
/// Swapping one out of a method table never destroys it — a `HookInfo`
/// that captured it keeps it alive for chained calls.
pub type Imp = Arc<dyn Fn(&Receiver<'_>, &Selector, &[Value]) -> Value + Send + Sync>;

/// Wrap a closure as an [`Imp`]
pub fn imp<F>(f: F) -> Imp
where
    F: Fn(&Receiver<'_>, &Selector, &[Value]) -> Value + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Global counter for generating unique object IDs
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique object ID
fn generate_object_id() -> u64 {
    NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Object instance
#[derive(Debug, Clone)]
pub struct Object {
    /// Unique object ID (assigned on creation)
    pub object_id: u64,
    /// Class ID (index into the runtime class registry)
    pub class_id: ClassId,
    /// Field values
    pub fields: Vec<Value>,
}

impl Object {
    /// Create a new object with null fields
    pub fn new(class_id: ClassId, field_count: usize) -> Self {
        Self {
            object_id: generate_object_id(),
            class_id,
            fields: vec![Value::null(); field_count],
        }
    }

    /// Get a field value by index
    pub fn get_field(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    /// Set a field value by index
    pub fn set_field(&mut self, index: usize, value: Value) -> Result<(), String> {
        if index < self.fields.len() {
            self.fields[index] = value;
            Ok(())
        } else {
            Err(format!(
                "Field index {} out of bounds (object has {} fields)",
                index,
                self.fields.len()
            ))
        }
    }

    /// Get number of fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Class definition
///
/// A class owns the methods defined directly on it. Methods visible
/// through inheritance are never copied down; visibility is computed by
/// walking the parent chain at resolution time.
#[derive(Debug, Clone)]
pub struct Class {
    /// Class ID (unique identifier)
    pub id: ClassId,
    /// Class name
    pub name: String,
    /// Parent class ID (None for root classes)
    pub parent_id: Option<ClassId>,
    /// Metaclass ID (None for metaclasses themselves)
    pub metaclass_id: Option<ClassId>,
    /// Number of instance fields
    pub field_count: usize,
    /// Own method table
    pub methods: MethodTable,
}

impl Class {
    /// Create a new root class
    pub fn new(id: ClassId, name: String, field_count: usize) -> Self {
        Self {
            id,
            name,
            parent_id: None,
            metaclass_id: None,
            field_count,
            methods: MethodTable::new(),
        }
    }

    /// Create a new class with parent
    pub fn with_parent(id: ClassId, name: String, field_count: usize, parent_id: ClassId) -> Self {
        Self {
            id,
            name,
            parent_id: Some(parent_id),
            metaclass_id: None,
            field_count,
            methods: MethodTable::new(),
        }
    }

    /// Look up the implementation this class itself binds for a selector
    pub fn own_method(&self, selector: &Selector) -> Option<&Imp> {
        self.methods.get(selector)
    }

    /// Check whether this class itself defines a selector
    pub fn defines(&self, selector: &Selector) -> bool {
        self.methods.contains(selector)
    }
}

/// Own-method table: selector → implementation bound directly on one class
#[derive(Clone, Default)]
pub struct MethodTable {
    map: FxHashMap<Selector, Imp>,
}

impl MethodTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the implementation bound to a selector
    pub fn get(&self, selector: &Selector) -> Option<&Imp> {
        self.map.get(selector)
    }

    /// Check whether a selector is bound
    pub fn contains(&self, selector: &Selector) -> bool {
        self.map.contains_key(selector)
    }

    /// Bind a selector, returning the implementation it replaced (if any)
    pub fn set(&mut self, selector: Selector, imp: Imp) -> Option<Imp> {
        self.map.insert(selector, imp)
    }

    /// Number of bound selectors
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over the bound selectors
    pub fn selectors(&self) -> impl Iterator<Item = &Selector> {
        self.map.keys()
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("count", &self.map.len())
            .finish()
    }
}
