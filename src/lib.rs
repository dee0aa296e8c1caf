//! JavaScript-style records with prototype chains, and the enumeration
//! utilities built on top of them: quirk-compensating property collection
//! (some platforms hide own overrides of standard method names from
//! enumeration), key listing, and deep structural equality.

pub mod collect;
pub mod equal;
pub mod object;
pub mod realm;
pub mod types;

pub use collect::{NON_ENUMERABLE_PROPS, all_keys, collect_non_enum_props, keys, resolve_prototype};
pub use equal::{is_equal, same_value, strict_equality};
pub use object::{JsObject, JsObjectData, NativeFunction, PropertyDescriptor};
pub use realm::Realm;
pub use types::{JsBigInt, JsError, JsString, JsValue};
