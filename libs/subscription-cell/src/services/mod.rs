pub mod payment_plan;
pub mod subscription;

pub use payment_plan::PaymentPlanService;
pub use subscription::SubscriptionService;
