pub mod coupon;

pub use coupon::CouponService;
