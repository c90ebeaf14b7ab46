pub mod auth;
pub mod email_verification;
pub mod resources;
pub mod uploads;
pub mod users;

pub use self::auth::model::LoginRequest;
pub use self::users::model::User;
