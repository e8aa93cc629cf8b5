// ── Appliance mapper ──
//
// Raw upstream record (JSON object) -> `ApplianceRecord`. Values pass
// through verbatim apart from type coercion; only `kind` is derived.

use serde_json::{Map, Value};

use crate::error::MalformedRecord;
use crate::model::{ApplianceKind, ApplianceRecord};

const FIELD_STATE: &str = "status_toggle";
const FIELD_TYPE: &str = "appliance_type";
const FIELD_CHANNEL: &str = "lrm_channel";
const FIELD_TIME_REMAINING: &str = "time_remaining";
const FIELD_IDENTITY: &str = "appliance_desc_key";

/// Map one raw appliance record.
///
/// All five consumed fields must be present. Unknown fields are ignored.
pub fn map_record(raw: &Value) -> Result<ApplianceRecord, MalformedRecord> {
    let Value::Object(obj) = raw else {
        return Err(MalformedRecord::NotAnObject);
    };

    Ok(ApplianceRecord {
        state: text_field(obj, FIELD_STATE)?,
        kind: kind_of(required(obj, FIELD_TYPE)?),
        channel: text_field(obj, FIELD_CHANNEL)?,
        time_remaining: minutes_field(obj, FIELD_TIME_REMAINING)?,
        identity_key: text_field(obj, FIELD_IDENTITY)?,
    })
}

/// Appliance kind from the raw `appliance_type` value. Never fails:
/// anything but the exact strings `"W"` and `"D"` is unknown.
pub fn kind_of(value: &Value) -> ApplianceKind {
    value
        .as_str()
        .map_or(ApplianceKind::Unknown, ApplianceKind::from_code)
}

fn required<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, MalformedRecord> {
    obj.get(field)
        .ok_or(MalformedRecord::MissingField { field })
}

/// Strings pass through; numbers are rendered as upstream sent them.
fn text_field(obj: &Map<String, Value>, field: &'static str) -> Result<String, MalformedRecord> {
    match required(obj, field)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(MalformedRecord::InvalidField {
            field,
            reason: format!("expected a string, got {}", json_type(other)),
        }),
    }
}

/// Non-negative whole minutes, as a JSON integer or a numeric string.
fn minutes_field(obj: &Map<String, Value>, field: &'static str) -> Result<u32, MalformedRecord> {
    let invalid = |reason: String| MalformedRecord::InvalidField { field, reason };

    match required(obj, field)? {
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| invalid(format!("expected non-negative whole minutes, got {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| invalid(format!("expected non-negative whole minutes, got {s:?}"))),
        other => Err(invalid(format!(
            "expected a number, got {}",
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn raw() -> Value {
        json!({
            "lrm_serial_number": "L13176",
            "appliance_desc_key": "10000010515",
            "appliance_desc": "01",
            "lrm_channel": "1",
            "appliance_type": "D",
            "appliance_type_desc": "DRYER",
            "time_remaining": 60,
            "status_toggle": "available"
        })
    }

    #[test]
    fn maps_all_fields_verbatim() {
        let record = map_record(&raw()).unwrap();
        assert_eq!(
            record,
            ApplianceRecord {
                state: "available".into(),
                kind: ApplianceKind::Dryer,
                channel: "1".into(),
                time_remaining: 60,
                identity_key: "10000010515".into(),
            }
        );
    }

    #[test]
    fn state_is_opaque_pass_through() {
        let mut value = raw();
        value["status_toggle"] = json!("out_of_order_until_tuesday");
        assert_eq!(
            map_record(&value).unwrap().state,
            "out_of_order_until_tuesday"
        );
    }

    #[test]
    fn kind_is_exact_single_character_match() {
        assert_eq!(kind_of(&json!("W")), ApplianceKind::Washer);
        assert_eq!(kind_of(&json!("D")), ApplianceKind::Dryer);
        for code in ["w", "d", "X", "", "WD", "W ", "DRYER"] {
            assert_eq!(kind_of(&json!(code)), ApplianceKind::Unknown, "{code:?}");
        }
        assert_eq!(kind_of(&json!(null)), ApplianceKind::Unknown);
        assert_eq!(kind_of(&json!(7)), ApplianceKind::Unknown);
    }

    #[test]
    fn every_single_ascii_character_other_than_w_and_d_is_unknown() {
        for c in (0x20u8..0x7f).map(char::from) {
            let expected = match c {
                'W' => ApplianceKind::Washer,
                'D' => ApplianceKind::Dryer,
                _ => ApplianceKind::Unknown,
            };
            assert_eq!(kind_of(&json!(c.to_string())), expected, "{c:?}");
        }
    }

    #[test]
    fn missing_fields_are_named() {
        for field in [
            FIELD_STATE,
            FIELD_TYPE,
            FIELD_CHANNEL,
            FIELD_TIME_REMAINING,
            FIELD_IDENTITY,
        ] {
            let mut value = raw();
            value.as_object_mut().unwrap().remove(field);
            assert_eq!(
                map_record(&value).unwrap_err(),
                MalformedRecord::MissingField { field }
            );
        }
    }

    #[test]
    fn numeric_labels_are_coerced_to_text() {
        let mut value = raw();
        value["lrm_channel"] = json!(4);
        value["appliance_desc_key"] = json!(10_000_010_515_u64);
        let record = map_record(&value).unwrap();
        assert_eq!(record.channel, "4");
        assert_eq!(record.identity_key, "10000010515");
    }

    #[test]
    fn time_remaining_accepts_numeric_strings() {
        let mut value = raw();
        value["time_remaining"] = json!(" 17 ");
        assert_eq!(map_record(&value).unwrap().time_remaining, 17);
    }

    #[test]
    fn negative_time_remaining_is_rejected() {
        let mut value = raw();
        value["time_remaining"] = json!(-5);
        let err = map_record(&value).unwrap_err();
        assert_eq!(err.field(), Some(FIELD_TIME_REMAINING));
    }

    #[test]
    fn null_label_is_rejected() {
        let mut value = raw();
        value["status_toggle"] = Value::Null;
        assert!(matches!(
            map_record(&value),
            Err(MalformedRecord::InvalidField {
                field: "status_toggle",
                ..
            })
        ));
    }

    #[test]
    fn non_object_record_is_rejected() {
        assert_eq!(
            map_record(&json!(["W", "1"])).unwrap_err(),
            MalformedRecord::NotAnObject
        );
    }
}
