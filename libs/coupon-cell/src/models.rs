use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shared_models::numeric::value_as_f64;
use shared_models::record::RecordId;

pub const COUPON_TABLE: &str = "coupon";
pub const COUPON_USAGE_TABLE: &str = "coupon_usage";

// ==============================================================================
// COUPONS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: RecordId,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub is_used: Option<bool>,
    #[serde(default)]
    pub valid_until: Option<String>,
    #[serde(default)]
    pub for_user: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Coupon {
    pub fn used(&self) -> bool {
        self.is_used.unwrap_or(false)
    }

    /// Checks run in order: used, expired, then restricted to another user.
    pub fn check_redeemable(
        &self,
        user_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), CouponError> {
        if self.used() {
            return Err(CouponError::AlreadyUsed);
        }

        if is_expired(self.valid_until.as_deref(), now) {
            return Err(CouponError::Expired);
        }

        match self.for_user.as_deref() {
            Some(owner) if !owner.is_empty() && Some(owner) != user_id => {
                Err(CouponError::NotForUser)
            }
            _ => Ok(()),
        }
    }
}

/// Optional body of the validate and use endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CouponUserRequest {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

/// `valid_until` as an instant. Plain dates mean midnight UTC.
pub fn parse_valid_until(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// A coupon without a readable expiry is treated as expired.
pub fn is_expired(valid_until: Option<&str>, now: DateTime<Utc>) -> bool {
    match valid_until.and_then(parse_valid_until) {
        Some(until) => until <= now,
        None => true,
    }
}

/// `coupon_value`, when present and non-empty, must be a percentage.
pub fn validate_coupon_value(payload: &Map<String, Value>) -> Result<(), CouponError> {
    match payload.get("coupon_value") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(s)) if s.is_empty() => Ok(()),
        Some(value) => match value_as_f64(value) {
            Some(pct) if (0.0..=100.0).contains(&pct) => Ok(()),
            _ => Err(CouponError::InvalidValue),
        },
    }
}

// ==============================================================================
// STATISTICS
// ==============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CouponStatRow {
    #[serde(default)]
    pub is_used: Option<bool>,
    #[serde(default)]
    pub valid_until: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponStats {
    pub total_coupons: usize,
    pub active_coupons: usize,
    pub used_coupons: usize,
    pub expired_coupons: usize,
}

impl CouponStats {
    pub fn from_rows(rows: &[CouponStatRow], now: DateTime<Utc>) -> Self {
        let mut stats = Self {
            total_coupons: rows.len(),
            active_coupons: 0,
            used_coupons: 0,
            expired_coupons: 0,
        };

        for row in rows {
            if row.is_used.unwrap_or(false) {
                stats.used_coupons += 1;
            } else if is_expired(row.valid_until.as_deref(), now) {
                stats.expired_coupons += 1;
            } else {
                stats.active_coupons += 1;
            }
        }

        stats
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CouponError {
    #[error("Coupon not found")]
    NotFound,

    #[error("Coupon has already been used")]
    AlreadyUsed,

    #[error("Coupon has expired")]
    Expired,

    #[error("This coupon is not valid for this user")]
    NotForUser,

    #[error("Coupon value must be a percentage between 0 and 100")]
    InvalidValue,

    #[error("Coupon code already exists")]
    DuplicateCode,
}
