use crate::collect::keys;
use crate::object::JsObject;
use crate::realm::Realm;
use crate::types::{JsValue, number_ops};

pub fn strict_equality(left: &JsValue, right: &JsValue) -> bool {
    match (left, right) {
        (JsValue::Undefined, JsValue::Undefined) => true,
        (JsValue::Null, JsValue::Null) => true,
        (JsValue::Boolean(a), JsValue::Boolean(b)) => a == b,
        (JsValue::Number(a), JsValue::Number(b)) => number_ops::equal(*a, *b),
        (JsValue::String(a), JsValue::String(b)) => a == b,
        (JsValue::BigInt(a), JsValue::BigInt(b)) => a == b,
        (JsValue::Object(a), JsValue::Object(b)) => a.ptr_eq(b),
        _ => false,
    }
}

pub fn same_value(left: &JsValue, right: &JsValue) -> bool {
    match (left, right) {
        (JsValue::Number(a), JsValue::Number(b)) => number_ops::same_value(*a, *b),
        _ => strict_equality(left, right),
    }
}

/// Deep structural equality. Numbers compare as SameValue (NaN equals NaN,
/// +0 differs from -0), records by their collected key sets, arrays
/// element-wise. Cyclic structures compare by traversal position.
pub fn is_equal(realm: &Realm, a: &JsValue, b: &JsValue) -> bool {
    deep_eq(realm, a, b, &mut Vec::new(), &mut Vec::new())
}

fn deep_eq(
    realm: &Realm,
    a: &JsValue,
    b: &JsValue,
    a_stack: &mut Vec<JsObject>,
    b_stack: &mut Vec<JsObject>,
) -> bool {
    match (a, b) {
        (JsValue::Number(x), JsValue::Number(y)) => number_ops::same_value(*x, *y),
        (JsValue::Object(x), JsValue::Object(y)) => object_eq(realm, x, y, a_stack, b_stack),
        _ => strict_equality(a, b),
    }
}

fn object_eq(
    realm: &Realm,
    a: &JsObject,
    b: &JsObject,
    a_stack: &mut Vec<JsObject>,
    b_stack: &mut Vec<JsObject>,
) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    // Distinct callables only ever compare by identity
    if a.is_callable() || b.is_callable() {
        return false;
    }
    if a.is_array() != b.is_array() {
        return false;
    }
    // A cyclic structure equals another when the cycles close at the same
    // traversal position on both sides.
    if let Some(i) = a_stack.iter().position(|o| o.ptr_eq(a)) {
        return b_stack[i].ptr_eq(b);
    }
    a_stack.push(a.clone());
    b_stack.push(b.clone());
    let result = if a.is_array() {
        let a_elems = a.borrow().array_elements.clone().unwrap_or_default();
        let b_elems = b.borrow().array_elements.clone().unwrap_or_default();
        a_elems.len() == b_elems.len()
            && a_elems
                .iter()
                .zip(&b_elems)
                .all(|(x, y)| deep_eq(realm, x, y, a_stack, b_stack))
    } else {
        record_eq(realm, a, b, a_stack, b_stack)
    };
    a_stack.pop();
    b_stack.pop();
    result
}

fn record_eq(
    realm: &Realm,
    a: &JsObject,
    b: &JsObject,
    a_stack: &mut Vec<JsObject>,
    b_stack: &mut Vec<JsObject>,
) -> bool {
    // Records built by different constructors are not equivalent
    if a.has_property("constructor") && b.has_property("constructor") {
        let a_ctor = a.get("constructor");
        let b_ctor = b.get("constructor");
        if let (JsValue::Object(ac), JsValue::Object(bc)) = (&a_ctor, &b_ctor)
            && ac.is_callable()
            && bc.is_callable()
            && !ac.ptr_eq(bc)
        {
            return false;
        }
    }
    let a_keys = keys(realm, &JsValue::Object(a.clone()));
    let b_keys = keys(realm, &JsValue::Object(b.clone()));
    if a_keys.len() != b_keys.len() {
        return false;
    }
    a_keys.iter().all(|k| {
        b.has_own_property(k) && deep_eq(realm, &a.get(k), &b.get(k), a_stack, b_stack)
    })
}
