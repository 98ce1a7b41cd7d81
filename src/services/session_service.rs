// ============================================================================
// SESSION SERVICE - Contrato con el backend de sesiones
// ============================================================================
// Todo el I/O de red pasa por este trait: los view models y el cache de auth
// reciben una implementación (ApiClient en el navegador, un fake en tests).
// ============================================================================

use crate::error::ServiceError;
use crate::models::{
    AiChatRequest, AiChatResponse, ApiResponse, AuthStatusResponse, ContactRequest, LoginRequest, SignupRequest,
};

// Los futures no son Send: todo corre en el event loop de la página.
#[allow(async_fn_in_trait)]
pub trait SessionService {
    /// `GET /api/auth-status/`
    async fn check_status(&self) -> Result<AuthStatusResponse, ServiceError>;

    /// `POST /api/login/`
    async fn login(&self, request: &LoginRequest) -> Result<ApiResponse, ServiceError>;

    /// `POST /api/signup/`
    async fn signup(&self, request: &SignupRequest) -> Result<ApiResponse, ServiceError>;

    /// `POST /api/logout/`
    async fn logout(&self) -> Result<ApiResponse, ServiceError>;

    /// `POST /api/contact/`
    async fn submit_contact(&self, request: &ContactRequest) -> Result<ApiResponse, ServiceError>;

    /// `POST /api/ai-chat/`
    async fn send_ai_message(&self, request: &AiChatRequest) -> Result<AiChatResponse, ServiceError>;
}
