use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shared_models::record::RecordId;

pub const PAYMENT_PLANS_TABLE: &str = "payment_plans";
pub const SUBSCRIPTIONS_TABLE: &str = "patient_plan_subscriptions";

// PostgREST embeds used by the subscription reads.
pub const EMBED_ALL: &str =
    "*,patients(id,name,email,phone),payment_plans(id,plan_name,plan_name_ar,price,sessions,is_active)";
pub const EMBED_DETAIL: &str = "*,patients(id,name,email,phone,profile_img_url),payment_plans(id,plan_name,plan_name_ar,price,sessions,is_active)";
pub const EMBED_PLAN: &str = "*,payment_plans(id,plan_name,plan_name_ar,price,sessions)";
pub const EMBED_PATIENT: &str = "*,patients(id,name,email,phone)";

// ==============================================================================
// PAYMENT PLANS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub id: RecordId,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanStatRow {
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStats {
    pub total_plans: usize,
    pub active_plans: usize,
}

impl PlanStats {
    pub fn from_rows(rows: &[PlanStatRow]) -> Self {
        Self {
            total_plans: rows.len(),
            active_plans: rows.iter().filter(|p| p.is_active == Some(true)).count(),
        }
    }
}

// ==============================================================================
// SUBSCRIPTIONS
// ==============================================================================

/// A subscription row; embedded `patients` / `payment_plans` objects stay in
/// `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: RecordId,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub plan_id: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionStatRow {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStats {
    pub total_subscriptions: usize,
    pub active_subscriptions: usize,
    pub expired_subscriptions: usize,
}

impl SubscriptionStats {
    pub fn from_rows(rows: &[SubscriptionStatRow]) -> Self {
        Self {
            total_subscriptions: rows.len(),
            active_subscriptions: rows
                .iter()
                .filter(|s| matches!(s.status.as_deref(), Some("active" | "trialing")))
                .count(),
            expired_subscriptions: rows
                .iter()
                .filter(|s| s.status.as_deref() == Some("expired"))
                .count(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    #[error("Payment plan not found")]
    PlanNotFound,

    #[error("Subscription not found")]
    SubscriptionNotFound,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn active_plans_require_true() {
        let rows: Vec<PlanStatRow> =
            serde_json::from_value(json!([{"is_active": true}, {"is_active": false}, {"is_active": null}]))
                .unwrap();
        assert_eq!(
            PlanStats::from_rows(&rows),
            PlanStats {
                total_plans: 3,
                active_plans: 1
            }
        );
    }

    #[test]
    fn trialing_counts_as_active() {
        let rows: Vec<SubscriptionStatRow> = serde_json::from_value(json!([
            {"status": "active"},
            {"status": "trialing"},
            {"status": "expired"},
            {"status": "canceled"},
            {"status": null}
        ]))
        .unwrap();

        let stats = SubscriptionStats::from_rows(&rows);
        assert_eq!(stats.total_subscriptions, 5);
        assert_eq!(stats.active_subscriptions, 2);
        assert_eq!(stats.expired_subscriptions, 1);
    }

    #[test]
    fn embedded_objects_are_kept() {
        let sub: Subscription = serde_json::from_value(json!({
            "id": "s-1",
            "patient_id": "pat-1",
            "plan_id": 3,
            "status": "active",
            "patients": {"id": "pat-1", "name": "Patient One"},
            "payment_plans": {"id": 3, "plan_name": "Gold"}
        }))
        .unwrap();

        let rendered = serde_json::to_value(&sub).unwrap();
        assert_eq!(rendered["patients"]["name"], "Patient One");
        assert_eq!(rendered["payment_plans"]["plan_name"], "Gold");
        assert_eq!(rendered["plan_id"], 3);
    }
}
