pub mod session_service;
#[cfg(feature = "web")]
pub mod api_client;

pub use session_service::*;
#[cfg(feature = "web")]
pub use api_client::ApiClient;
