// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// Implementa SessionService sobre fetch. Todas las peticiones llevan JSON y
// las cookies de sesión (credentials: include). No tiene lógica de negocio.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use gloo_net::http::{Method, RequestBuilder};
use gloo_timers::callback::Timeout;
use serde::{de::DeserializeOwned, Serialize};
use web_sys::{window, AbortController, RequestCredentials};

use crate::config::{AppConfig, CONFIG};
use crate::error::ServiceError;
use crate::models::{
    AiChatRequest, AiChatResponse, ApiResponse, AuthStatusResponse, ContactRequest, LoginRequest, SignupRequest,
};
use crate::services::SessionService;
use crate::utils::{
    ENDPOINT_AI_CHAT, ENDPOINT_AUTH_STATUS, ENDPOINT_CONTACT, ENDPOINT_LOGIN, ENDPOINT_LOGOUT, ENDPOINT_SIGNUP,
};

/// Hosts estáticos sin backend Django detrás
const STATIC_HOSTS: &[&str] = &["github.io"];

/// Cliente API - SOLO comunicación HTTP (stateless)
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    status_timeout_ms: Option<u32>,
    enabled: bool,
}

impl ApiClient {
    pub fn new() -> Self {
        Self::from_config(&CONFIG)
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let hostname = window()
            .and_then(|w| w.location().hostname().ok())
            .unwrap_or_default();
        let enabled = !STATIC_HOSTS.iter().any(|host| hostname.contains(host));
        if !enabled {
            log::info!("ℹ️ [API] Host estático ({}), API deshabilitada", hostname);
        }

        Self {
            base_url: config.backend_url().trim_end_matches('/').to_string(),
            status_timeout_ms: config.status_check_timeout_ms(),
            enabled,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, timeout_ms: Option<u32>) -> Result<T, ServiceError> {
        self.fetch_json(Method::GET, path, None, timeout_ms).await
    }

    async fn post_json<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ServiceError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ServiceError::Parse(format!("Error serializando request: {}", e)))?;
        self.fetch_json(Method::POST, path, body, None).await
    }

    /// Una petición con tope opcional: al expirar se aborta el fetch y se
    /// devuelve `ServiceError::Timeout`.
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        timeout_ms: Option<u32>,
    ) -> Result<T, ServiceError> {
        if !self.enabled {
            return Err(ServiceError::Disabled);
        }

        let controller = AbortController::new()
            .map_err(|e| ServiceError::Network(format!("AbortController: {:?}", e)))?;
        let signal = controller.signal();

        let builder = RequestBuilder::new(&self.url(path))
            .method(method)
            .credentials(RequestCredentials::Include)
            .header("Content-Type", "application/json")
            .abort_signal(Some(&signal));
        let request = match body {
            Some(json) => builder.body(json),
            None => builder.build(),
        }
        .map_err(|e| ServiceError::Network(format!("Request build error: {}", e)))?;

        let timed_out = Rc::new(Cell::new(false));
        // El timer se cancela al soltar `_deadline`, al salir de la función
        let _deadline = timeout_ms.map(|ms| {
            let timed_out = Rc::clone(&timed_out);
            Timeout::new(ms, move || {
                timed_out.set(true);
                controller.abort();
            })
        });
        let expired = |ms: Option<u32>| ServiceError::Timeout(ms.unwrap_or_default());

        let response = request.send().await.map_err(|e| {
            if timed_out.get() {
                expired(timeout_ms)
            } else {
                ServiceError::Network(e.to_string())
            }
        })?;

        if !response.ok() {
            return Err(ServiceError::Http {
                status: response.status(),
            });
        }

        response.json::<T>().await.map_err(|e| {
            if timed_out.get() {
                expired(timeout_ms)
            } else {
                ServiceError::Parse(e.to_string())
            }
        })
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionService for ApiClient {
    async fn check_status(&self) -> Result<AuthStatusResponse, ServiceError> {
        log::info!("🔍 [API] Verificando sesión en backend...");
        self.get_json(ENDPOINT_AUTH_STATUS, self.status_timeout_ms).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<ApiResponse, ServiceError> {
        log::info!("🔐 [API] Login para: {}", request.username);
        self.post_json(ENDPOINT_LOGIN, Some(request)).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<ApiResponse, ServiceError> {
        log::info!("📝 [API] Signup para: {}", request.email);
        self.post_json(ENDPOINT_SIGNUP, Some(request)).await
    }

    async fn logout(&self) -> Result<ApiResponse, ServiceError> {
        log::info!("👋 [API] Logout");
        self.post_json::<(), _>(ENDPOINT_LOGOUT, None).await
    }

    async fn submit_contact(&self, request: &ContactRequest) -> Result<ApiResponse, ServiceError> {
        log::info!("✉️ [API] Enviando formulario de contacto");
        self.post_json(ENDPOINT_CONTACT, Some(request)).await
    }

    async fn send_ai_message(&self, request: &AiChatRequest) -> Result<AiChatResponse, ServiceError> {
        log::info!("🤖 [API] Enviando mensaje al asistente");
        self.post_json(ENDPOINT_AI_CHAT, Some(request)).await
    }
}
