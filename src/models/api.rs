// ============================================================================
// API MODELS - Payloads del Session Service
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::auth::{Identity, UserProfile};

/// Respuesta de `GET /api/auth-status/`
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

/// Usuario reportado por el backend: `email` + campos de perfil arbitrarios
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct SessionUser {
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionUser {
    /// El perfil cacheado es el objeto `user` completo, `email` incluido
    pub fn into_identity(self) -> Identity {
        let mut fields = self.extra;
        fields.insert("email".to_string(), Value::String(self.email.clone()));
        Identity {
            email: self.email,
            profile: UserProfile::new(fields),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Respuesta genérica `{ status, message?, user? }` de login, signup, logout y contacto
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct ApiResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct SignupRequest {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub newsletter: bool,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct AiChatRequest {
    pub message: String,
}

/// Respuesta de `POST /api/ai-chat/`: `response` en éxito, `message` en error
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct AiChatResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AiChatResponse {
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_response_keeps_profile_fields() {
        let response: AuthStatusResponse = serde_json::from_value(json!({
            "authenticated": true,
            "user": {"email": "b@x.com", "username": "b", "first_name": "Bea"}
        }))
        .unwrap();

        let identity = response.user.unwrap().into_identity();
        assert_eq!(identity.email, "b@x.com");
        assert_eq!(identity.profile.email(), Some("b@x.com"));
        assert_eq!(identity.profile.get("first_name"), Some(&json!("Bea")));
    }

    #[test]
    fn test_status_response_requires_authenticated_flag() {
        let parsed = serde_json::from_value::<AuthStatusResponse>(json!({"user": null}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_signup_request_uses_camel_case_name() {
        let body = serde_json::to_value(SignupRequest {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@x.com".to_string(),
            password: "secret".to_string(),
            newsletter: true,
        })
        .unwrap();
        assert_eq!(body["fullName"], json!("Ada Lovelace"));
    }

    #[test]
    fn test_api_response_status() {
        let ok: ApiResponse =
            serde_json::from_value(json!({"status": "success", "message": "Login successful!"})).unwrap();
        let err: ApiResponse = serde_json::from_value(json!({"status": "error"})).unwrap();
        assert!(ok.is_success());
        assert!(!err.is_success());
        assert_eq!(err.message, None);
    }

    #[test]
    fn test_ai_chat_response_shapes() {
        let reply: AiChatResponse =
            serde_json::from_value(json!({"status": "success", "response": "Stay tuned!"})).unwrap();
        assert!(reply.is_success());
        assert_eq!(reply.response.as_deref(), Some("Stay tuned!"));

        let err: AiChatResponse =
            serde_json::from_value(json!({"status": "error", "message": "Invalid request method"})).unwrap();
        assert!(!err.is_success());
        assert_eq!(err.response, None);
    }
}
