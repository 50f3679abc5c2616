use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;

use crate::{Complex, Datetime, HostError, HostObject};

/// Module plus qualified name of a type or named object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    pub module: String,
    pub qualname: String,
}

impl TypeName {
    pub fn new(module: impl Into<String>, qualname: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            qualname: qualname.into(),
        }
    }

    pub fn builtin(qualname: impl Into<String>) -> Self {
        Self::new("builtins", qualname)
    }

    /// The bare name, i.e. the last segment of the qualified name.
    pub fn name(&self) -> &str {
        self.qualname.rsplit('.').next().unwrap_or(&self.qualname)
    }

    /// Dotted name, without the module for builtins and `__main__`.
    pub fn qualified(&self) -> String {
        if self.module.is_empty() || self.module == "builtins" || self.module == "__main__" {
            self.qualname.clone()
        } else {
            format!("{}.{}", self.module, self.qualname)
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

/// An arithmetic progression of integers, `range(start, stop, step)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl Range {
    pub fn new(start: i64, stop: i64, step: i64) -> Result<Self, HostError> {
        if step == 0 {
            return Err(HostError::InvalidValue(
                "range() arg 3 must not be zero".to_string(),
            ));
        }
        Ok(Self { start, stop, step })
    }

    pub fn len(&self) -> usize {
        let (start, stop, step) = (
            i128::from(self.start),
            i128::from(self.stop),
            i128::from(self.step),
        );
        let count = if step > 0 && start < stop {
            (stop - start - 1) / step + 1
        } else if step < 0 && start > stop {
            (start - stop - 1) / (-step) + 1
        } else {
            0
        };
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<i64> {
        if index >= self.len() {
            return None;
        }
        let offset = i64::try_from(index).ok()?.checked_mul(self.step)?;
        self.start.checked_add(offset)
    }
}

/// A function or bound method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub module: String,
    pub qualname: String,
    /// Parameter list as written, e.g. `(a, b=1)`.
    pub signature: String,
}

impl Function {
    pub fn new(
        module: impl Into<String>,
        qualname: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            qualname: qualname.into(),
            signature: signature.into(),
        }
    }

    pub fn name(&self) -> TypeName {
        TypeName::new(self.module.clone(), self.qualname.clone())
    }
}

/// A class object. Class attributes (methods, constants) are fixed at creation.
#[derive(Debug, Clone)]
pub struct Class {
    pub module: String,
    pub qualname: String,
    pub attributes: Vec<(String, Value)>,
}

impl Class {
    pub fn new(module: impl Into<String>, qualname: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            qualname: qualname.into(),
            attributes: Vec::new(),
        }
    }

    pub fn builtin(qualname: impl Into<String>) -> Self {
        Self::new("builtins", qualname)
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.push((name.into(), value));
        self
    }

    pub fn name(&self) -> TypeName {
        TypeName::new(self.module.clone(), self.qualname.clone())
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|(attribute, _)| attribute == name)
            .map(|(_, value)| value)
    }
}

/// A property descriptor, named after its getter.
#[derive(Debug, Clone)]
pub struct Property {
    pub getter: Function,
}

/// How an [`Object`] renders itself.
#[derive(Debug, Clone)]
pub enum ObjectRepr {
    /// `<module.Class object at 0x...>`.
    Default,
    /// A user-defined repr.
    Custom(String),
    /// A user-defined repr that raises with the given message.
    Broken(String),
}

/// An instance of a user class: an attribute bag.
#[derive(Debug)]
pub struct Object {
    pub class: Rc<Class>,
    pub attributes: RefCell<Vec<(String, Value)>>,
    pub repr: ObjectRepr,
}

impl Object {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            attributes: RefCell::new(Vec::new()),
            repr: ObjectRepr::Default,
        }
    }

    pub fn with_repr(mut self, repr: ObjectRepr) -> Self {
        self.repr = repr;
        self
    }

    pub fn set_attribute(&self, name: impl Into<String>, value: Value) {
        let name = name.into();
        let mut attributes = self.attributes.borrow_mut();
        match attributes.iter_mut().find(|(attribute, _)| *attribute == name) {
            Some(slot) => slot.1 = value,
            None => attributes.push((name, value)),
        }
    }

    /// Instance attribute, falling back to the class.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes
            .borrow()
            .iter()
            .find(|(attribute, _)| attribute == name)
            .map(|(_, value)| value.clone())
            .or_else(|| self.class.attribute(name).cloned())
    }

    /// Instance and class attribute names, sorted and deduplicated.
    pub fn dir(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .attributes
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .chain(self.class.attributes.iter().map(|(name, _)| name.clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

/// A runtime value of the host language.
#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Complex(Complex),
    Str(Rc<str>),
    Bytes(Rc<[u8]>),
    ByteArray(Rc<RefCell<Vec<u8>>>),
    MemoryView(Rc<[u8]>),
    List(Rc<RefCell<Vec<Value>>>),
    Tuple(Rc<[Value]>),
    Set(Rc<RefCell<Vec<Value>>>),
    FrozenSet(Rc<[Value]>),
    Range(Range),
    /// Insertion-ordered key/value pairs.
    Dict(Rc<RefCell<Vec<(Value, Value)>>>),
    Datetime(Datetime),
    Function(Rc<Function>),
    Class(Rc<Class>),
    Property(Rc<Property>),
    Object(Rc<Object>),
    Host(Rc<dyn HostObject>),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr() {
            Ok(repr) => write!(f, "Value({repr})"),
            Err(_) => write!(f, "Value(<{}>)", self.type_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(Rc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(Rc::from(value))
    }
}

impl Value {
    // ============================================================================
    // Construction
    // ============================================================================

    pub fn str(value: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(value.as_ref()))
    }

    pub fn bytes(value: impl AsRef<[u8]>) -> Self {
        Value::Bytes(Rc::from(value.as_ref()))
    }

    pub fn bytearray(value: impl Into<Vec<u8>>) -> Self {
        Value::ByteArray(Rc::new(RefCell::new(value.into())))
    }

    pub fn memoryview(value: impl AsRef<[u8]>) -> Self {
        Value::MemoryView(Rc::from(value.as_ref()))
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    /// A mutable set; equal items are kept once, in first-seen order.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(Rc::new(RefCell::new(dedup(items))))
    }

    pub fn frozenset(items: impl IntoIterator<Item = Value>) -> Self {
        Value::FrozenSet(dedup(items).into())
    }

    pub fn range(start: i64, stop: i64, step: i64) -> Result<Self, HostError> {
        Range::new(start, stop, step).map(Value::Range)
    }

    /// A dict; later pairs overwrite earlier ones with an equal key.
    pub fn dict(pairs: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let dict = Value::Dict(Rc::new(RefCell::new(Vec::new())));
        for (key, value) in pairs {
            // A fresh dict cannot fail to accept an item.
            let _ = dict.set_item(key, value);
        }
        dict
    }

    pub fn function(function: Function) -> Self {
        Value::Function(Rc::new(function))
    }

    pub fn class(class: Class) -> Self {
        Value::Class(Rc::new(class))
    }

    pub fn property(getter: Function) -> Self {
        Value::Property(Rc::new(Property { getter }))
    }

    pub fn object(object: Object) -> Self {
        Value::Object(Rc::new(object))
    }

    pub fn host(object: impl HostObject + 'static) -> Self {
        Value::Host(Rc::new(object))
    }

    // ============================================================================
    // Mutation
    // ============================================================================

    /// `list.append(item)`.
    pub fn append(&self, item: Value) -> Result<(), HostError> {
        match self {
            Value::List(items) => {
                items.borrow_mut().push(item);
                Ok(())
            }
            _ => Err(HostError::missing_attribute(self.type_name().qualified(), "append")),
        }
    }

    /// `self[key] = value` for dicts.
    pub fn set_item(&self, key: Value, value: Value) -> Result<(), HostError> {
        let Value::Dict(pairs) = self else {
            return Err(HostError::NotSubscriptable {
                type_name: self.type_name().qualified(),
            });
        };
        let position = pairs
            .borrow()
            .iter()
            .position(|(existing, _)| existing.try_eq(&key).unwrap_or(false));
        let mut pairs = pairs.borrow_mut();
        match position {
            Some(index) => pairs[index].1 = value,
            None => pairs.push((key, value)),
        }
        Ok(())
    }

    // ============================================================================
    // Introspection
    // ============================================================================

    /// Identity (`is`). Reference variants compare storage addresses; `None` is
    /// a singleton and booleans are interned. Other immediates have no identity.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => Rc::ptr_eq(a, b),
            (Value::Bytes(a), Value::Bytes(b)) => Rc::ptr_eq(a, b),
            (Value::ByteArray(a), Value::ByteArray(b)) => Rc::ptr_eq(a, b),
            (Value::MemoryView(a), Value::MemoryView(b)) => Rc::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Tuple(a), Value::Tuple(b)) => Rc::ptr_eq(a, b),
            (Value::Set(a), Value::Set(b)) => Rc::ptr_eq(a, b),
            (Value::FrozenSet(a), Value::FrozenSet(b)) => Rc::ptr_eq(a, b),
            (Value::Dict(a), Value::Dict(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Property(a), Value::Property(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Host(a), Value::Host(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            _ => false,
        }
    }

    /// Address used in `<... at 0x...>` reprs; zero for immediates.
    pub fn address(&self) -> usize {
        match self {
            Value::Str(v) => Rc::as_ptr(v) as *const u8 as usize,
            Value::Bytes(v) | Value::MemoryView(v) => Rc::as_ptr(v) as *const u8 as usize,
            Value::ByteArray(v) => Rc::as_ptr(v) as usize,
            Value::List(v) | Value::Set(v) => Rc::as_ptr(v) as usize,
            Value::Tuple(v) | Value::FrozenSet(v) => Rc::as_ptr(v) as *const u8 as usize,
            Value::Dict(v) => Rc::as_ptr(v) as usize,
            Value::Function(v) => Rc::as_ptr(v) as usize,
            Value::Class(v) => Rc::as_ptr(v) as usize,
            Value::Property(v) => Rc::as_ptr(v) as usize,
            Value::Object(v) => Rc::as_ptr(v) as usize,
            Value::Host(v) => Rc::as_ptr(v) as *const u8 as usize,
            _ => 0,
        }
    }

    /// The type of this value.
    pub fn type_name(&self) -> TypeName {
        match self {
            Value::None => TypeName::builtin("NoneType"),
            Value::Bool(_) => TypeName::builtin("bool"),
            Value::Int(_) => TypeName::builtin("int"),
            Value::Float(_) => TypeName::builtin("float"),
            Value::Complex(_) => TypeName::builtin("complex"),
            Value::Str(_) => TypeName::builtin("str"),
            Value::Bytes(_) => TypeName::builtin("bytes"),
            Value::ByteArray(_) => TypeName::builtin("bytearray"),
            Value::MemoryView(_) => TypeName::builtin("memoryview"),
            Value::List(_) => TypeName::builtin("list"),
            Value::Tuple(_) => TypeName::builtin("tuple"),
            Value::Set(_) => TypeName::builtin("set"),
            Value::FrozenSet(_) => TypeName::builtin("frozenset"),
            Value::Range(_) => TypeName::builtin("range"),
            Value::Dict(_) => TypeName::builtin("dict"),
            Value::Datetime(_) => TypeName::new("datetime", "datetime"),
            Value::Function(_) => TypeName::builtin("function"),
            Value::Class(_) => TypeName::builtin("type"),
            Value::Property(_) => TypeName::builtin("property"),
            Value::Object(object) => object.class.name(),
            Value::Host(object) => object.type_name(),
        }
    }

    /// `len(value)` for sized values.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::Bytes(b) | Value::MemoryView(b) => Some(b.len()),
            Value::ByteArray(b) => Some(b.borrow().len()),
            Value::List(items) | Value::Set(items) => Some(items.borrow().len()),
            Value::Tuple(items) | Value::FrozenSet(items) => Some(items.len()),
            Value::Range(range) => Some(range.len()),
            Value::Dict(pairs) => Some(pairs.borrow().len()),
            Value::Host(object) => object.length(),
            _ => None,
        }
    }

    /// Shallow size estimate in bytes: the value slot plus directly owned storage.
    pub fn shallow_size(&self) -> usize {
        let slot = size_of::<Value>();
        let owned = match self {
            Value::Str(s) => s.len(),
            Value::Bytes(b) | Value::MemoryView(b) => b.len(),
            Value::ByteArray(b) => b.borrow().capacity(),
            Value::List(items) | Value::Set(items) => items.borrow().capacity() * slot,
            Value::Tuple(items) | Value::FrozenSet(items) => items.len() * slot,
            Value::Dict(pairs) => pairs.borrow().capacity() * 2 * slot,
            Value::Function(_) => size_of::<Function>(),
            Value::Class(_) => size_of::<Class>(),
            Value::Property(_) => size_of::<Property>(),
            Value::Object(object) => {
                size_of::<Object>() + object.attributes.borrow().len() * size_of::<(String, Value)>()
            }
            Value::Host(object) => object.size_hint(),
            _ => 0,
        };
        slot + owned
    }

    pub fn as_host(&self) -> Option<&dyn HostObject> {
        match self {
            Value::Host(object) => Some(object.as_ref()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

fn dedup(items: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut unique: Vec<Value> = Vec::new();
    for item in items {
        if !unique
            .iter()
            .any(|existing| existing.try_eq(&item).unwrap_or(false))
        {
            unique.push(item);
        }
    }
    unique
}
