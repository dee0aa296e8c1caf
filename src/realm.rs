use crate::object::{JsObject, JsObjectData, NativeFunction, PropertyDescriptor};
use crate::types::{JsError, JsValue};

/// Intrinsic records shared by every object created through it. Holds the
/// well-known base record that prototype resolution falls back to.
pub struct Realm {
    object_prototype: JsObject,
    function_prototype: JsObject,
    array_prototype: JsObject,
    object_constructor: JsObject,
}

fn bare_function(function_prototype: &JsObject, func: NativeFunction) -> JsObject {
    let name = func.name.clone();
    let arity = func.arity;
    let mut data = JsObjectData::new();
    data.prototype = Some(function_prototype.clone());
    data.class_name = "Function".to_string();
    data.callable = Some(func);
    let obj = JsObject::from_data(data);
    obj.define_own_property(
        "length".to_string(),
        PropertyDescriptor::data(JsValue::Number(arity as f64), false, false, true),
    );
    obj.define_own_property(
        "name".to_string(),
        PropertyDescriptor::data(JsValue::string(&name), false, false, true),
    );
    obj
}

fn property_key(arg: Option<&JsValue>) -> String {
    match arg {
        Some(v) => v.to_string(),
        None => "undefined".to_string(),
    }
}

impl Realm {
    pub fn new() -> Self {
        let object_prototype = JsObject::from_data(JsObjectData::new());

        let mut func_proto_data = JsObjectData::new();
        func_proto_data.prototype = Some(object_prototype.clone());
        let function_prototype = JsObject::from_data(func_proto_data);

        let mut array_proto_data = JsObjectData::new();
        array_proto_data.prototype = Some(object_prototype.clone());
        let array_prototype = JsObject::from_data(array_proto_data);

        // No primitive wrapper objects; non-object arguments box to a fresh
        // plain record.
        let object_constructor = bare_function(
            &function_prototype,
            NativeFunction::new("Object", 1, |realm, _this, args| {
                match args.first() {
                    Some(JsValue::Object(o)) => Ok(JsValue::Object(o.clone())),
                    _ => Ok(JsValue::Object(realm.create_object())),
                }
            }),
        );
        object_constructor.define_own_property(
            "prototype".to_string(),
            PropertyDescriptor::data(JsValue::Object(object_prototype.clone()), true, false, false),
        );
        object_prototype.insert_builtin(
            "constructor".to_string(),
            JsValue::Object(object_constructor.clone()),
        );

        let realm = Realm {
            object_prototype,
            function_prototype,
            array_prototype,
            object_constructor,
        };
        realm.setup_object_prototype();
        realm
    }

    pub fn object_prototype(&self) -> &JsObject {
        &self.object_prototype
    }

    pub fn function_prototype(&self) -> &JsObject {
        &self.function_prototype
    }

    pub fn array_prototype(&self) -> &JsObject {
        &self.array_prototype
    }

    pub fn object_constructor(&self) -> &JsObject {
        &self.object_constructor
    }

    /// A plain record chained to the base record.
    pub fn create_object(&self) -> JsObject {
        self.create_object_with_proto(Some(self.object_prototype.clone()))
    }

    pub fn create_object_with_proto(&self, proto: Option<JsObject>) -> JsObject {
        let mut data = JsObjectData::new();
        data.prototype = proto;
        JsObject::from_data(data)
    }

    pub fn create_array(&self, elements: Vec<JsValue>) -> JsObject {
        let mut data = JsObjectData::new();
        data.prototype = Some(self.array_prototype.clone());
        data.array_elements = Some(elements);
        data.class_name = "Array".to_string();
        JsObject::from_data(data)
    }

    /// A function object: `length` and `name` installed, and an own
    /// `prototype` record whose `constructor` refers back to the function.
    pub fn create_function(
        &self,
        name: &str,
        arity: usize,
        f: impl Fn(&Realm, &JsValue, &[JsValue]) -> Result<JsValue, JsError> + 'static,
    ) -> JsObject {
        let func_obj = bare_function(&self.function_prototype, NativeFunction::new(name, arity, f));
        let proto = self.create_object();
        proto.insert_builtin(
            "constructor".to_string(),
            JsValue::Object(func_obj.clone()),
        );
        func_obj.define_own_property(
            "prototype".to_string(),
            PropertyDescriptor::data(JsValue::Object(proto), true, false, false),
        );
        func_obj
    }

    pub fn call(
        &self,
        callee: &JsValue,
        this: &JsValue,
        args: &[JsValue],
    ) -> Result<JsValue, JsError> {
        let func = match callee {
            JsValue::Object(obj) => obj.borrow().callable.clone(),
            _ => None,
        };
        match func {
            Some(f) => (f.func)(self, this, args),
            None => Err(JsError::Type(format!("{callee} is not a function"))),
        }
    }

    /// Constructor invocation: the instance's prototype is the callee's own
    /// `prototype` record when present, else the base record. An
    /// object-valued return overrides the instance.
    pub fn construct(&self, callee: &JsValue, args: &[JsValue]) -> Result<JsValue, JsError> {
        let JsValue::Object(ctor) = callee else {
            return Err(JsError::Type(format!("{callee} is not a constructor")));
        };
        if !ctor.is_callable() {
            return Err(JsError::Type(format!("{callee} is not a constructor")));
        }
        let proto = match ctor.get_own("prototype") {
            Some(JsValue::Object(p)) => p,
            _ => self.object_prototype.clone(),
        };
        let instance = self.create_object_with_proto(Some(proto));
        let this_val = JsValue::Object(instance);
        let result = self.call(callee, &this_val, args)?;
        if result.is_object() {
            return Ok(result);
        }
        Ok(this_val)
    }

    fn setup_object_prototype(&self) {
        // §20.1.3.6 Object.prototype.toString
        let to_string_fn = self.create_function("toString", 0, |_realm, this, _args| {
            let tag = match this {
                JsValue::Undefined => "Undefined".to_string(),
                JsValue::Null => "Null".to_string(),
                JsValue::Boolean(_) => "Boolean".to_string(),
                JsValue::Number(_) => "Number".to_string(),
                JsValue::String(_) => "String".to_string(),
                JsValue::BigInt(_) => "BigInt".to_string(),
                JsValue::Object(o) => {
                    if o.is_callable() {
                        "Function".to_string()
                    } else {
                        o.class_name()
                    }
                }
            };
            Ok(JsValue::string(&format!("[object {tag}]")))
        });
        self.object_prototype
            .insert_builtin("toString".to_string(), JsValue::Object(to_string_fn));

        // Object.prototype.toLocaleString delegates to toString
        let to_locale_fn = self.create_function("toLocaleString", 0, |realm, this, _args| {
            let to_string = match this {
                JsValue::Object(o) => o.get("toString"),
                _ => realm.object_prototype().get("toString"),
            };
            if to_string.is_callable() {
                return realm.call(&to_string, this, &[]);
            }
            Err(JsError::Type("toString is not a function".to_string()))
        });
        self.object_prototype
            .insert_builtin("toLocaleString".to_string(), JsValue::Object(to_locale_fn));

        // Object.prototype.valueOf
        let value_of_fn = self.create_function("valueOf", 0, |_realm, this, _args| {
            if this.is_nullish() {
                return Err(JsError::Type(
                    "cannot convert undefined or null to object".to_string(),
                ));
            }
            Ok(this.clone())
        });
        self.object_prototype
            .insert_builtin("valueOf".to_string(), JsValue::Object(value_of_fn));

        // §20.1.3.2 Object.prototype.hasOwnProperty
        let has_own_fn = self.create_function("hasOwnProperty", 1, |_realm, this, args| {
            let key = property_key(args.first());
            if this.is_nullish() {
                return Err(JsError::Type(
                    "cannot convert undefined or null to object".to_string(),
                ));
            }
            if let JsValue::Object(o) = this {
                return Ok(JsValue::Boolean(o.has_own_property(&key)));
            }
            Ok(JsValue::Boolean(false))
        });
        self.object_prototype
            .insert_builtin("hasOwnProperty".to_string(), JsValue::Object(has_own_fn));

        // §20.1.3.4 Object.prototype.propertyIsEnumerable
        let pie_fn = self.create_function("propertyIsEnumerable", 1, |_realm, this, args| {
            let key = property_key(args.first());
            if this.is_nullish() {
                return Err(JsError::Type(
                    "cannot convert undefined or null to object".to_string(),
                ));
            }
            if let JsValue::Object(o) = this {
                let enumerable = o.get_own_property(&key).is_some_and(|d| d.enumerable);
                return Ok(JsValue::Boolean(enumerable));
            }
            Ok(JsValue::Boolean(false))
        });
        self.object_prototype.insert_builtin(
            "propertyIsEnumerable".to_string(),
            JsValue::Object(pie_fn),
        );

        // Object.prototype.isPrototypeOf
        let ipof_fn = self.create_function("isPrototypeOf", 1, |_realm, this, args| {
            let Some(JsValue::Object(target)) = args.first() else {
                return Ok(JsValue::Boolean(false));
            };
            if this.is_nullish() {
                return Err(JsError::Type(
                    "cannot convert undefined or null to object".to_string(),
                ));
            }
            let JsValue::Object(this_obj) = this else {
                return Ok(JsValue::Boolean(false));
            };
            let mut current = target.prototype();
            while let Some(p) = current {
                if p.ptr_eq(this_obj) {
                    return Ok(JsValue::Boolean(true));
                }
                current = p.prototype();
            }
            Ok(JsValue::Boolean(false))
        });
        self.object_prototype
            .insert_builtin("isPrototypeOf".to_string(), JsValue::Object(ipof_fn));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::NON_ENUMERABLE_PROPS;

    #[test]
    fn base_record_methods_are_hidden() {
        let realm = Realm::new();
        let proto = realm.object_prototype();
        for name in NON_ENUMERABLE_PROPS {
            assert!(proto.has_own_property(name), "missing {name}");
        }
        assert!(proto.has_own_property("constructor"));
        // None of them are enumerable
        assert!(proto.own_enumerable_keys().is_empty());
    }

    #[test]
    fn plain_objects_chain_to_base_record() {
        let realm = Realm::new();
        let obj = realm.create_object();
        let proto = obj.prototype().unwrap();
        assert!(proto.ptr_eq(realm.object_prototype()));
        assert!(obj.has_property("toString"));
        assert!(!obj.has_own_property("toString"));
    }

    #[test]
    fn to_string_native() {
        let realm = Realm::new();
        let obj = realm.create_object();
        let f = obj.get("toString");
        let result = realm.call(&f, &JsValue::Object(obj), &[]).unwrap();
        assert!(matches!(result, JsValue::String(s) if s.to_rust_string() == "[object Object]"));

        let arr = realm.create_array(vec![]);
        let result = realm
            .call(&arr.get("toString"), &JsValue::Object(arr.clone()), &[])
            .unwrap();
        assert!(matches!(result, JsValue::String(s) if s.to_rust_string() == "[object Array]"));
    }

    #[test]
    fn has_own_property_native() {
        let realm = Realm::new();
        let obj = realm.create_object();
        obj.insert_value("name".to_string(), JsValue::string("wxj"));
        let f = obj.get("hasOwnProperty");
        let this = JsValue::Object(obj);
        let yes = realm.call(&f, &this, &[JsValue::string("name")]).unwrap();
        assert!(matches!(yes, JsValue::Boolean(true)));
        // Inherited names are not own
        let no = realm
            .call(&f, &this, &[JsValue::string("toString")])
            .unwrap();
        assert!(matches!(no, JsValue::Boolean(false)));
        assert!(realm.call(&f, &JsValue::Null, &[]).is_err());
    }

    #[test]
    fn property_is_enumerable_native() {
        let realm = Realm::new();
        let obj = realm.create_object();
        obj.insert_value("plain".to_string(), JsValue::Number(1.0));
        obj.insert_builtin("hidden".to_string(), JsValue::Number(2.0));
        let f = obj.get("propertyIsEnumerable");
        let this = JsValue::Object(obj);
        assert!(matches!(
            realm.call(&f, &this, &[JsValue::string("plain")]).unwrap(),
            JsValue::Boolean(true)
        ));
        assert!(matches!(
            realm.call(&f, &this, &[JsValue::string("hidden")]).unwrap(),
            JsValue::Boolean(false)
        ));
    }

    #[test]
    fn is_prototype_of_native() {
        let realm = Realm::new();
        let obj = realm.create_object();
        let proto_val = JsValue::Object(realm.object_prototype().clone());
        let f = realm.object_prototype().get("isPrototypeOf");
        let yes = realm
            .call(&f, &proto_val, &[JsValue::Object(obj.clone())])
            .unwrap();
        assert!(matches!(yes, JsValue::Boolean(true)));
        let unrelated = realm.create_object();
        let no = realm
            .call(
                &f,
                &JsValue::Object(unrelated),
                &[JsValue::Object(obj)],
            )
            .unwrap();
        assert!(matches!(no, JsValue::Boolean(false)));
    }

    #[test]
    fn construct_links_instance_to_prototype_record() {
        let realm = Realm::new();
        let person = realm.create_function("Person", 0, |_realm, this, _args| {
            if let JsValue::Object(o) = this {
                o.insert_value("species".to_string(), JsValue::string("human"));
            }
            Ok(JsValue::Undefined)
        });
        let instance = realm
            .construct(&JsValue::Object(person.clone()), &[])
            .unwrap();
        let JsValue::Object(inst) = instance else {
            panic!("constructor did not produce an object");
        };
        let Some(JsValue::Object(proto)) = person.get_own("prototype") else {
            panic!("function has no prototype record");
        };
        assert!(inst.prototype().unwrap().ptr_eq(&proto));
        assert!(matches!(inst.get("species"), JsValue::String(s) if s.to_rust_string() == "human"));
        // The prototype record points back at the constructor
        assert!(matches!(
            proto.get("constructor"),
            JsValue::Object(c) if c.ptr_eq(&person)
        ));
    }

    #[test]
    fn construct_object_return_overrides_instance() {
        let realm = Realm::new();
        let factory = realm.create_function("Factory", 0, |realm, _this, _args| {
            let replacement = realm.create_object();
            replacement.insert_value("replaced".to_string(), JsValue::Boolean(true));
            Ok(JsValue::Object(replacement))
        });
        let result = realm.construct(&JsValue::Object(factory), &[]).unwrap();
        let JsValue::Object(obj) = result else {
            panic!("expected object");
        };
        assert!(obj.has_own_property("replaced"));
    }

    #[test]
    fn call_non_callable_is_a_type_error() {
        let realm = Realm::new();
        let obj = realm.create_object();
        let err = realm
            .call(&JsValue::Object(obj), &JsValue::Undefined, &[])
            .unwrap_err();
        assert!(matches!(err, JsError::Type(_)));
        let err = realm.construct(&JsValue::Number(3.0), &[]).unwrap_err();
        assert!(matches!(err, JsError::Type(_)));
    }

    #[test]
    fn function_metadata() {
        let realm = Realm::new();
        let f = realm.create_function("frob", 2, |_realm, _this, _args| Ok(JsValue::Undefined));
        assert!(matches!(f.get_own("length"), Some(JsValue::Number(n)) if n == 2.0));
        assert!(
            matches!(f.get_own("name"), Some(JsValue::String(s)) if s.to_rust_string() == "frob")
        );
        // length and name stay out of enumeration
        assert!(f.own_enumerable_keys().is_empty());
    }

    #[test]
    fn base_record_constructor_is_the_object_function() {
        let realm = Realm::new();
        let ctor = realm.object_prototype().get("constructor");
        assert!(matches!(
            &ctor,
            JsValue::Object(c) if c.ptr_eq(realm.object_constructor())
        ));
        // Boxing a primitive through it yields a plain record
        let boxed = realm
            .call(&ctor, &JsValue::Undefined, &[JsValue::Number(1.0)])
            .unwrap();
        assert!(matches!(&boxed, JsValue::Object(o) if !o.is_callable()));
    }
}
