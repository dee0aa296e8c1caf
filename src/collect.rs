use crate::equal::strict_equality;
use crate::object::JsObject;
use crate::realm::Realm;
use crate::types::{JsError, JsValue};

/// Property names that generic enumeration has historically failed to report
/// on at least one platform, in declaration order. Enumeration primitives
/// skip non-enumerable own properties, so own overrides of these standard
/// method names stay invisible without compensation. Fixed at process start,
/// never mutated.
pub const NON_ENUMERABLE_PROPS: [&str; 6] = [
    "valueOf",
    "isPrototypeOf",
    "toString",
    "propertyIsEnumerable",
    "hasOwnProperty",
    "toLocaleString",
];

/// The record to compare candidate properties against: the `prototype` record
/// of the object's constructor when the constructor is callable and exposes
/// one, else the realm's base record.
pub fn resolve_prototype(realm: &Realm, obj: &JsObject) -> JsObject {
    if let JsValue::Object(ctor) = obj.get("constructor")
        && ctor.is_callable()
        && let JsValue::Object(proto) = ctor.get("prototype")
    {
        return proto;
    }
    realm.object_prototype().clone()
}

fn contains(keys: &[String], name: &str) -> bool {
    keys.iter().any(|k| k == name)
}

/// Append own-in-effect properties that enumeration missed. `keys` is only
/// ever appended to; existing entries are never removed, reordered, or
/// rewritten, and no name is appended twice.
pub fn collect_non_enum_props(
    realm: &Realm,
    target: &JsValue,
    keys: &mut Vec<String>,
) -> Result<(), JsError> {
    let JsValue::Object(obj) = target else {
        return Err(JsError::InvalidArgument(format!(
            "cannot collect properties of {target}"
        )));
    };
    collect_from(realm, obj, keys);
    Ok(())
}

fn collect_from(realm: &Realm, obj: &JsObject, keys: &mut Vec<String>) {
    let proto = resolve_prototype(realm, obj);

    // `constructor` is a special case.
    let prop = "constructor";
    if obj.has_own_property(prop) && !contains(keys, prop) {
        keys.push(prop.to_string());
    }

    for prop in NON_ENUMERABLE_PROPS.iter().rev() {
        if obj.has_property(prop)
            && !strict_equality(&obj.get(prop), &proto.get(prop))
            && !contains(keys, prop)
        {
            keys.push((*prop).to_string());
        }
    }
}

/// Own enumerable names in insertion order, with the compensation pass
/// applied. Non-objects have no keys.
pub fn keys(realm: &Realm, target: &JsValue) -> Vec<String> {
    let JsValue::Object(obj) = target else {
        return Vec::new();
    };
    let mut names = obj.own_enumerable_keys();
    collect_from(realm, obj, &mut names);
    names
}

/// Enumerable names own and inherited, first occurrence winning, with the
/// compensation pass applied.
pub fn all_keys(realm: &Realm, target: &JsValue) -> Vec<String> {
    let JsValue::Object(obj) = target else {
        return Vec::new();
    };
    let mut names = obj.enumerable_keys_with_proto();
    collect_from(realm, obj, &mut names);
    names
}
