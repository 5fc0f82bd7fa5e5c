//! Numeric columns arrive either as JSON numbers or as numeric strings
//! (`numeric` columns are serialized as text by PostgREST). These helpers
//! read both and treat anything else as absent.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Integer view of a numeric value, truncating fractions.
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

/// `#[serde(deserialize_with = "lenient_f64")]` for `Option<f64>` fields.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64))
}

/// `#[serde(deserialize_with = "lenient_i64")]` for `Option<i64>` fields.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_i64))
}

/// Sum of a lenient numeric column, absent values counting as zero.
pub fn sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().map(|v| v.unwrap_or(0.0)).sum()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient_f64")]
        amount: Option<f64>,
        #[serde(default, deserialize_with = "lenient_i64")]
        rating: Option<i64>,
    }

    #[test]
    fn reads_numbers_and_numeric_strings() {
        let row: Row = serde_json::from_value(json!({"amount": "12.50", "rating": "4"})).unwrap();
        assert_eq!(row.amount, Some(12.5));
        assert_eq!(row.rating, Some(4));

        let row: Row = serde_json::from_value(json!({"amount": 3, "rating": 4.7})).unwrap();
        assert_eq!(row.amount, Some(3.0));
        assert_eq!(row.rating, Some(4));
    }

    #[test]
    fn garbage_and_missing_are_none() {
        let row: Row = serde_json::from_value(json!({"amount": "n/a", "rating": null})).unwrap();
        assert_eq!(row.amount, None);
        assert_eq!(row.rating, None);

        let row: Row = serde_json::from_value(json!({})).unwrap();
        assert_eq!(row.amount, None);
        assert_eq!(row.rating, None);
    }

    #[test]
    fn sum_treats_missing_as_zero() {
        assert_eq!(sum(vec![Some(1.5), None, Some(2.0)]), 3.5);
        assert_eq!(round2(4.666), 4.67);
    }
}
