// Resource decoding
//
// Converts raw JSON payloads into typed records. Each resource statically
// enumerates its known keys; strict mode rejects anything outside that
// set, recursing into nested records. List payloads arrive either as a
// bare array or wrapped in a `{"results": [...]}` envelope.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;

/// Policy for fields the schema does not know about.
///
/// [`Deny`](UnknownFields::Deny) is the default: an unrecognized key is a
/// forward-compatibility tripwire, not something to coerce silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFields {
    /// Fail decoding with the offending field path.
    #[default]
    Deny,
    /// Ignore unrecognized fields.
    Allow,
}

/// A typed record decodable from an API payload.
///
/// `FIELDS` lists the external key names (remote casing, e.g. `isRatKill`).
/// Records with nested resources override [`unknown_field`](Resource::unknown_field)
/// to recurse.
pub trait Resource: DeserializeOwned {
    const NAME: &'static str;
    const FIELDS: &'static [&'static str];

    /// Dotted path of the first unknown field, if any.
    fn unknown_field(value: &Value) -> Option<String> {
        top_level_unknown(value, Self::FIELDS)
    }
}

/// Decode one record, honoring the unknown-field policy.
pub fn decode<T: Resource>(policy: UnknownFields, value: &Value) -> Result<T, Error> {
    if policy == UnknownFields::Deny {
        if let Some(path) = T::unknown_field(value) {
            return Err(Error::UnknownField {
                resource: T::NAME,
                path,
            });
        }
    }

    T::deserialize(value).map_err(|e| Error::Decode {
        resource: T::NAME,
        message: e.to_string(),
    })
}

/// Decode a list payload: a bare array or a `{"results": [...]}` envelope.
///
/// Any other shape fails with [`Error::UnexpectedResponse`].
pub fn decode_list<T: Resource>(policy: UnknownFields, body: &Value) -> Result<Vec<T>, Error> {
    unwrap_results(body)?
        .iter()
        .map(|item| decode(policy, item))
        .collect()
}

fn unwrap_results(body: &Value) -> Result<&Vec<Value>, Error> {
    if let Some(list) = body.as_array() {
        return Ok(list);
    }
    if let Some(results) = body.get("results").and_then(Value::as_array) {
        return Ok(results);
    }
    Err(Error::UnexpectedResponse {
        message: "expected a JSON array or a `results` envelope".into(),
    })
}

/// First key of `value` not present in `fields`. Non-objects have no
/// unknown keys -- a wrong top-level type is a decode error instead.
pub(crate) fn top_level_unknown(value: &Value, fields: &[&str]) -> Option<String> {
    let object = value.as_object()?;
    object
        .keys()
        .find(|key| !fields.contains(&key.as_str()))
        .cloned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::resources::MobileApp;

    fn mobile_app_json() -> Value {
        json!({
            "url": "https://www.victorsmartkill.com/mobileapps/1/",
            "min_android_version": 100,
            "ideal_android_version": 120,
            "min_ios_version": "2.0.0",
            "ideal_ios_version": "2.4.1",
            "commercial_min_android_version": 100,
            "commercial_ideal_android_version": 120,
            "commercial_min_ios_version": "2.0.0",
            "commercial_ideal_ios_version": "2.4.1",
        })
    }

    #[test]
    fn decodes_bare_list() {
        let body = json!([mobile_app_json()]);
        let apps: Vec<MobileApp> = decode_list(UnknownFields::Deny, &body).unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].min_ios_version, "2.0.0");
    }

    #[test]
    fn decodes_results_envelope_identically() {
        let bare = json!([mobile_app_json()]);
        let wrapped = json!({ "results": [mobile_app_json()] });

        let from_bare: Vec<MobileApp> = decode_list(UnknownFields::Deny, &bare).unwrap();
        let from_wrapped: Vec<MobileApp> = decode_list(UnknownFields::Deny, &wrapped).unwrap();

        assert_eq!(from_bare, from_wrapped);
    }

    #[test]
    fn empty_results_envelope_is_an_empty_list() {
        let body = json!({ "results": [] });
        let apps: Vec<MobileApp> = decode_list(UnknownFields::Deny, &body).unwrap();
        assert!(apps.is_empty());
    }

    #[test]
    fn rejects_other_shapes() {
        let body = json!({ "items": [] });
        let result: Result<Vec<MobileApp>, _> = decode_list(UnknownFields::Deny, &body);
        assert!(matches!(result, Err(Error::UnexpectedResponse { .. })));
    }

    #[test]
    fn strict_mode_rejects_unknown_fields() {
        let mut payload = mobile_app_json();
        payload["brand_new_field"] = json!(true);

        let result: Result<MobileApp, _> = decode(UnknownFields::Deny, &payload);
        match result {
            Err(Error::UnknownField { path, .. }) => assert_eq!(path, "brand_new_field"),
            other => panic!("expected UnknownField error, got: {other:?}"),
        }
    }

    #[test]
    fn permissive_mode_ignores_unknown_fields() {
        let mut payload = mobile_app_json();
        payload["brand_new_field"] = json!(true);

        let app: MobileApp = decode(UnknownFields::Allow, &payload).unwrap();
        assert_eq!(app.ideal_android_version, 120);
    }

    #[test]
    fn missing_required_field_is_a_decode_error() {
        let mut payload = mobile_app_json();
        payload.as_object_mut().unwrap().remove("min_android_version");

        let result: Result<MobileApp, _> = decode(UnknownFields::Deny, &payload);
        match result {
            Err(Error::Decode { message, .. }) => {
                assert!(message.contains("min_android_version"), "got: {message}");
            }
            other => panic!("expected Decode error, got: {other:?}"),
        }
    }
}
