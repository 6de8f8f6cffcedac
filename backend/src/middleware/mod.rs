pub mod auth;
pub mod timeout;

pub use auth::AuthenticatedUser;
pub use timeout::RequestTimeout;
