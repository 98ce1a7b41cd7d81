pub mod auth;
pub mod api;

pub use auth::{AuthState, Identity, UserProfile};
pub use api::{
    AiChatRequest, AiChatResponse, ApiResponse, AuthStatusResponse, ContactRequest, LoginRequest, ResponseStatus, SessionUser,
    SignupRequest,
};
