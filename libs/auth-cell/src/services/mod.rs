pub mod admin_user;
pub mod password;
pub mod reset;

pub use admin_user::AdminUserService;
