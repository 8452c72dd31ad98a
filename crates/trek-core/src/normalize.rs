//! Record normalization
//!
//! Maps raw upstream journey/purchase objects of unknown or partial shape
//! into canonical records. Every nested lookup tolerates absence at every
//! level: missing values normalize to `None`/`Metric::Missing`, never panic.
//! Non-objects normalize to an all-null record.
//!
//! Also home to envelope unwrapping: some upstream deployments double-encode
//! their payload as `{ "statusCode": ..., "body": "<json string>" }`.

use serde_json::Value;

use crate::models::{Journey, Metric, Operator, Price, Purchase, RecordId, Transaction};

/// Unwrap a double-encoded upstream body.
///
/// When the value is an object carrying a string `body` field, the inner
/// document is parsed and returned. If the inner parse fails the raw string
/// is passed through as opaque data rather than failing the call.
pub fn unwrap_envelope(value: Value) -> Value {
    let inner = match &value {
        Value::Object(map) => match map.get("body") {
            Some(Value::String(body)) => body.clone(),
            _ => return value,
        },
        _ => return value,
    };
    match serde_json::from_str(&inner) {
        Ok(parsed) => parsed,
        Err(_) => Value::String(inner),
    }
}

/// Normalize one raw journey object
pub fn normalize_journey(raw: &Value) -> Journey {
    Journey {
        id: record_id(raw.get("id")),
        account_id: string_at(raw, &["account_id"]),
        travel_date: string_at(raw, &["travel_date"]),
        mode: string_at(raw, &["mode", "id"]).unwrap_or_else(|| "unknown".to_string()),
        operator: operator_at(raw),
        distance_km: metric_at(raw, &["distance_km"]),
        co2_g: metric_at(raw, &["co2_g"]),
        polyline: string_at(raw, &["polyline"]),
        price: price_at(raw, &["price"]),
    }
}

/// Normalize one raw purchase object
pub fn normalize_purchase(raw: &Value) -> Purchase {
    Purchase {
        id: record_id(raw.get("id")),
        mode: string_at(raw, &["mode", "id"]).unwrap_or_else(|| "unknown".to_string()),
        operator: operator_at(raw),
        transaction: Transaction {
            date_time: string_at(raw, &["transaction", "date-time"]),
            price: price_at(raw, &["transaction", "price"]).unwrap_or_default(),
        },
        booking_date_time: string_at(raw, &["booking-date-time"]),
    }
}

/// Normalize a whole response body into journeys.
///
/// Bodies that are not arrays (e.g. opaque passthrough strings) yield no
/// records.
pub fn journeys_from_body(body: &Value) -> Vec<Journey> {
    match body {
        Value::Array(items) => items.iter().map(normalize_journey).collect(),
        _ => Vec::new(),
    }
}

/// Normalize a whole response body into purchases
pub fn purchases_from_body(body: &Value) -> Vec<Purchase> {
    match body {
        Value::Array(items) => items.iter().map(normalize_purchase).collect(),
        _ => Vec::new(),
    }
}

fn at<'a>(raw: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = raw;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

fn string_at(raw: &Value, path: &[&str]) -> Option<String> {
    match at(raw, path)? {
        Value::String(s) => Some(s.clone()),
        // Some providers ship numeric codes where strings are expected
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn metric_at(raw: &Value, path: &[&str]) -> Metric {
    match at(raw, path) {
        Some(value) => Metric::from_value(value),
        None => Metric::Missing,
    }
}

fn record_id(value: Option<&Value>) -> Option<RecordId> {
    match value? {
        Value::String(s) => Some(RecordId::Text(s.clone())),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(RecordId::Int(i)),
            None => Some(RecordId::Text(n.to_string())),
        },
        _ => None,
    }
}

fn operator_at(raw: &Value) -> Operator {
    Operator {
        id: string_at(raw, &["operator", "id"]),
        name: string_at(raw, &["operator", "name"]),
    }
}

fn price_at(raw: &Value, path: &[&str]) -> Option<Price> {
    let price = at(raw, path)?;
    if !price.is_object() {
        return None;
    }
    Some(Price {
        amount: metric_at(price, &["amount"]),
        currency: string_at(price, &["currency"]).unwrap_or_else(|| "GBP".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn journey_with_all_fields_absent_normalizes_to_nulls() {
        let journey = normalize_journey(&json!({}));
        assert_eq!(journey.id, None);
        assert_eq!(journey.travel_date, None);
        assert_eq!(journey.mode, "unknown");
        assert_eq!(journey.distance_km, Metric::Missing);
        assert_eq!(journey.co2_g, Metric::Missing);
        assert_eq!(journey.operator.display(), "Unknown");
    }

    #[test]
    fn non_object_normalizes_to_empty_record() {
        let journey = normalize_journey(&json!("not a record"));
        assert_eq!(journey.id, None);
        assert_eq!(journey.mode, "unknown");

        let purchase = normalize_purchase(&json!(42));
        assert_eq!(purchase.id, None);
        assert_eq!(purchase.transaction.price.amount, Metric::Missing);
    }

    #[test]
    fn journey_unknown_sentinel_is_kept_distinct_from_null() {
        let journey = normalize_journey(&json!({
            "distance_km": "unknown",
            "co2_g": null,
        }));
        assert_eq!(journey.distance_km, Metric::Unavailable);
        assert_eq!(journey.co2_g, Metric::Missing);
    }

    #[test]
    fn journey_numeric_string_distance_coerces() {
        let journey = normalize_journey(&json!({"distance_km": "12.4"}));
        assert_eq!(journey.distance_km, Metric::Known(12.4));

        let journey = normalize_journey(&json!({"distance_km": "approx 12"}));
        assert_eq!(journey.distance_km, Metric::Raw("approx 12".to_string()));
    }

    #[test]
    fn purchase_operator_falls_back_to_id_then_unknown() {
        let purchase = normalize_purchase(&json!({"operator": {"id": "op-9"}}));
        assert_eq!(purchase.operator.display(), "op-9");

        let purchase = normalize_purchase(&json!({"operator": {}}));
        assert_eq!(purchase.operator.display(), "Unknown");

        let purchase = normalize_purchase(&json!({}));
        assert_eq!(purchase.operator.display(), "Unknown");
    }

    #[test]
    fn purchase_currency_defaults_to_gbp() {
        let purchase = normalize_purchase(&json!({
            "transaction": {"date-time": "2023-12-01T09:30:00Z", "price": {"amount": 250}}
        }));
        assert_eq!(purchase.transaction.price.currency, "GBP");
        assert_eq!(purchase.transaction.price.amount, Metric::Known(250.0));
        assert_eq!(
            purchase.transaction.date_time.as_deref(),
            Some("2023-12-01T09:30:00Z")
        );
    }

    #[test]
    fn numeric_journey_id_survives_as_int() {
        let journey = normalize_journey(&json!({"id": 17}));
        assert_eq!(journey.id, Some(RecordId::Int(17)));

        let journey = normalize_journey(&json!({"id": "j-17"}));
        assert_eq!(journey.id, Some(RecordId::Text("j-17".to_string())));
    }

    #[test]
    fn envelope_with_string_body_unwraps_inner_document() {
        let unwrapped = unwrap_envelope(json!({
            "statusCode": 200,
            "body": "[{\"id\":1}]",
        }));
        assert_eq!(unwrapped, json!([{"id": 1}]));
    }

    #[test]
    fn envelope_with_malformed_inner_body_falls_back_to_raw_string() {
        let unwrapped = unwrap_envelope(json!({"body": "not { json"}));
        assert_eq!(unwrapped, json!("not { json"));
    }

    #[test]
    fn plain_bodies_pass_through_unchanged() {
        let body = json!([{"id": 1}]);
        assert_eq!(unwrap_envelope(body.clone()), body);

        // An object without a string `body` field is not an envelope
        let body = json!({"body": [1, 2]});
        assert_eq!(unwrap_envelope(body.clone()), body);
    }

    #[test]
    fn non_array_bodies_yield_no_records() {
        assert!(journeys_from_body(&json!("opaque")).is_empty());
        assert!(purchases_from_body(&json!({"error": "nope"})).is_empty());
        assert_eq!(journeys_from_body(&json!([{}, {}])).len(), 2);
    }
}
