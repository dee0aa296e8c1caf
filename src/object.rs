use crate::equal::same_value;
use crate::realm::Realm;
use crate::types::{JsError, JsValue};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Data property attributes. Accessor properties are not modeled; every
/// property carries a value.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub value: JsValue,
    pub writable: bool,
    pub enumerable: bool,
    pub configurable: bool,
}

impl PropertyDescriptor {
    pub fn data(value: JsValue, writable: bool, enumerable: bool, configurable: bool) -> Self {
        Self {
            value,
            writable,
            enumerable,
            configurable,
        }
    }

    pub fn data_default(value: JsValue) -> Self {
        Self::data(value, true, true, true)
    }

    /// Writable and configurable but hidden from enumeration, the shape of
    /// every standard method on a prototype record.
    pub fn builtin(value: JsValue) -> Self {
        Self::data(value, true, false, true)
    }
}

pub type NativeFn = dyn Fn(&Realm, &JsValue, &[JsValue]) -> Result<JsValue, JsError>;

#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    pub arity: usize,
    pub func: Rc<NativeFn>,
}

impl NativeFunction {
    pub fn new(
        name: impl Into<String>,
        arity: usize,
        f: impl Fn(&Realm, &JsValue, &[JsValue]) -> Result<JsValue, JsError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            func: Rc::new(f),
        }
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({:?}, {})", self.name, self.arity)
    }
}

pub struct JsObjectData {
    pub properties: FxHashMap<String, PropertyDescriptor>,
    pub property_order: Vec<String>,
    pub prototype: Option<JsObject>,
    pub callable: Option<NativeFunction>,
    pub array_elements: Option<Vec<JsValue>>,
    pub class_name: String,
    pub extensible: bool,
}

impl JsObjectData {
    pub fn new() -> Self {
        Self {
            properties: FxHashMap::default(),
            property_order: Vec::new(),
            prototype: None,
            callable: None,
            array_elements: None,
            class_name: "Object".to_string(),
            extensible: true,
        }
    }
}

impl Default for JsObjectData {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to a record. Identity is reference identity; cloning the
/// handle never clones the record.
#[derive(Clone)]
pub struct JsObject(Rc<RefCell<JsObjectData>>);

impl JsObject {
    pub fn from_data(data: JsObjectData) -> Self {
        Self(Rc::new(RefCell::new(data)))
    }

    pub fn ptr_eq(&self, other: &JsObject) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn borrow(&self) -> Ref<'_, JsObjectData> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, JsObjectData> {
        self.0.borrow_mut()
    }

    pub fn prototype(&self) -> Option<JsObject> {
        self.0.borrow().prototype.clone()
    }

    pub fn set_prototype(&self, proto: Option<JsObject>) {
        self.0.borrow_mut().prototype = proto;
    }

    pub fn class_name(&self) -> String {
        self.0.borrow().class_name.clone()
    }

    pub fn is_callable(&self) -> bool {
        self.0.borrow().callable.is_some()
    }

    pub fn is_array(&self) -> bool {
        self.0.borrow().array_elements.is_some()
    }

    /// Prototype-chain property lookup; `Undefined` when the name is absent
    /// everywhere on the chain.
    pub fn get(&self, key: &str) -> JsValue {
        let data = self.0.borrow();
        if let Some(desc) = data.properties.get(key) {
            return desc.value.clone();
        }
        if let Some(ref elems) = data.array_elements
            && let Ok(idx) = key.parse::<usize>()
            && idx < elems.len()
        {
            return elems[idx].clone();
        }
        if let Some(proto) = &data.prototype {
            return proto.get(key);
        }
        JsValue::Undefined
    }

    pub fn get_own(&self, key: &str) -> Option<JsValue> {
        let data = self.0.borrow();
        if let Some(desc) = data.properties.get(key) {
            return Some(desc.value.clone());
        }
        if let Some(ref elems) = data.array_elements
            && let Ok(idx) = key.parse::<usize>()
            && idx < elems.len()
        {
            return Some(elems[idx].clone());
        }
        None
    }

    pub fn get_own_property(&self, key: &str) -> Option<PropertyDescriptor> {
        let data = self.0.borrow();
        if let Some(desc) = data.properties.get(key) {
            return Some(desc.clone());
        }
        if let Some(ref elems) = data.array_elements
            && let Ok(idx) = key.parse::<usize>()
            && idx < elems.len()
        {
            return Some(PropertyDescriptor::data_default(elems[idx].clone()));
        }
        None
    }

    pub fn has_own_property(&self, key: &str) -> bool {
        let data = self.0.borrow();
        if data.properties.contains_key(key) {
            return true;
        }
        if let Some(ref elems) = data.array_elements
            && let Ok(idx) = key.parse::<usize>()
        {
            return idx < elems.len();
        }
        false
    }

    /// Own or inherited, anywhere on the prototype chain.
    pub fn has_property(&self, key: &str) -> bool {
        if self.has_own_property(key) {
            return true;
        }
        if let Some(proto) = self.prototype() {
            return proto.has_property(key);
        }
        false
    }

    pub fn define_own_property(&self, key: String, desc: PropertyDescriptor) -> bool {
        let mut data = self.0.borrow_mut();
        if let Some(current) = data.properties.get(&key) {
            if !current.configurable {
                if desc.configurable {
                    return false;
                }
                if desc.enumerable != current.enumerable {
                    return false;
                }
                if !current.writable && (desc.writable || !same_value(&current.value, &desc.value))
                {
                    return false;
                }
            }
        } else if !data.extensible {
            return false;
        }
        if !data.properties.contains_key(&key) {
            data.property_order.push(key.clone());
        }
        data.properties.insert(key, desc);
        true
    }

    /// Assignment semantics: writes through an existing writable descriptor,
    /// silently ignores non-writable ones, creates a default data property
    /// otherwise.
    pub fn set(&self, key: &str, value: JsValue) {
        let mut data = self.0.borrow_mut();
        if let Some(ref mut elems) = data.array_elements
            && let Ok(idx) = key.parse::<usize>()
            && idx < elems.len()
        {
            elems[idx] = value;
            return;
        }
        if let Some(desc) = data.properties.get_mut(key) {
            if desc.writable {
                desc.value = value;
            }
            return;
        }
        if !data.properties.contains_key(key) {
            data.property_order.push(key.to_string());
        }
        data.properties
            .insert(key.to_string(), PropertyDescriptor::data_default(value));
    }

    pub fn insert_value(&self, key: String, value: JsValue) {
        let mut data = self.0.borrow_mut();
        if !data.properties.contains_key(&key) {
            data.property_order.push(key.clone());
        }
        data.properties
            .insert(key, PropertyDescriptor::data_default(value));
    }

    pub fn insert_builtin(&self, key: String, value: JsValue) {
        let mut data = self.0.borrow_mut();
        if !data.properties.contains_key(&key) {
            data.property_order.push(key.clone());
        }
        data.properties
            .insert(key, PropertyDescriptor::builtin(value));
    }

    /// Own enumerable names in insertion order; array indices come first.
    /// This is the standard enumeration primitive; non-enumerable
    /// properties are never reported.
    pub fn own_enumerable_keys(&self) -> Vec<String> {
        let data = self.0.borrow();
        let mut keys = Vec::new();
        if let Some(ref elems) = data.array_elements {
            for i in 0..elems.len() {
                keys.push(i.to_string());
            }
        }
        for k in &data.property_order {
            if let Some(desc) = data.properties.get(k)
                && desc.enumerable
            {
                keys.push(k.clone());
            }
        }
        keys
    }

    /// Enumerable names, own before inherited, first occurrence winning.
    pub fn enumerable_keys_with_proto(&self) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut keys = Vec::new();
        for k in self.own_enumerable_keys() {
            if seen.insert(k.clone()) {
                keys.push(k);
            }
        }
        if let Some(proto) = self.prototype() {
            for k in proto.enumerable_keys_with_proto() {
                if seen.insert(k.clone()) {
                    keys.push(k);
                }
            }
        }
        keys
    }
}

impl fmt::Debug for JsObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        match &data.callable {
            Some(func) => write!(f, "JsObject(function {})", func.name),
            None => write!(f, "JsObject({})", data.class_name),
        }
    }
}
