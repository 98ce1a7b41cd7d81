// ============================================================================
// AUTH VIEWMODEL - Login, signup, logout y sincronización con el backend
// ============================================================================
// Lógica de negocio de auth. El cache es la única fuente de verdad local:
// las vistas leen de él, este view model es quien lo escribe.
// ============================================================================

use crate::error::AuthError;
use crate::models::{ApiResponse, AuthState, Identity, LoginRequest, SignupRequest, UserProfile};
use crate::services::SessionService;
use crate::state::AuthStateCache;
use crate::utils::KeyValueStorage;

pub const LOGIN_REJECTED_MESSAGE: &str = "Invalid username or password";
pub const SIGNUP_REJECTED_MESSAGE: &str = "There was an error creating your account. Please try again.";
pub const MISSING_EMAIL_MESSAGE: &str = "Please enter your email address.";
pub const AUTH_UNREACHABLE_MESSAGE: &str = "We couldn't reach the server. Please try again in a moment.";

/// Texto para el usuario: el mensaje del backend si lo hay, nunca el detalle
/// técnico de red
pub fn auth_error_message(error: &AuthError) -> String {
    match error {
        AuthError::MissingEmail => MISSING_EMAIL_MESSAGE.to_string(),
        AuthError::Rejected(message) => message.clone(),
        AuthError::Service(_) => AUTH_UNREACHABLE_MESSAGE.to_string(),
    }
}

/// Resultado de un logout. En todos los casos el cache local queda limpio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoutOutcome {
    Confirmed,
    /// El backend respondió `status: "error"`
    ServerFailed(String),
    /// No se pudo contactar al backend
    Unreachable,
}

pub struct AuthViewModel<S, T> {
    cache: AuthStateCache<S>,
    service: T,
}

impl<S, T> AuthViewModel<S, T>
where
    S: KeyValueStorage,
    T: SessionService,
{
    pub fn new(cache: AuthStateCache<S>, service: T) -> Self {
        Self { cache, service }
    }

    pub fn cache(&self) -> &AuthStateCache<S> {
        &self.cache
    }

    pub fn service(&self) -> &T {
        &self.service
    }

    /// Login con email + contraseña. Si el backend acepta, el cache se marca
    /// logueado sin esperar a otro auth-status.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthState, AuthError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::MissingEmail);
        }
        log::info!("🔐 [AUTH] Iniciando login para {}", email);

        let request = LoginRequest {
            username: email.to_string(),
            password: password.to_string(),
        };
        let response = self.service.login(&request).await.map_err(|e| {
            log::error!("❌ [AUTH] Error en login: {}", e);
            AuthError::from(e)
        })?;

        self.accept(response, email, LOGIN_REJECTED_MESSAGE)
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<AuthState, AuthError> {
        let email = request.email.trim().to_string();
        if email.is_empty() {
            return Err(AuthError::MissingEmail);
        }
        log::info!("📝 [AUTH] Creando cuenta para {}", email);

        let response = self.service.signup(&request).await.map_err(|e| {
            log::error!("❌ [AUTH] Error en signup: {}", e);
            AuthError::from(e)
        })?;

        self.accept(response, &email, SIGNUP_REJECTED_MESSAGE)
    }

    /// Logout en backend (best-effort) y limpieza local incondicional: la UI
    /// no puede quedarse "logueada" si el backend no está de acuerdo.
    pub async fn logout(&self) -> LogoutOutcome {
        let outcome = match self.service.logout().await {
            Ok(response) if response.is_success() => {
                log::info!("✅ [AUTH] Logout confirmado por el backend");
                LogoutOutcome::Confirmed
            }
            Ok(response) => {
                let message = response.message.unwrap_or_default();
                log::warn!("⚠️ [AUTH] El backend rechazó el logout: {}", message);
                LogoutOutcome::ServerFailed(message)
            }
            Err(e) => {
                log::warn!("⚠️ [AUTH] Logout sin backend: {}", e);
                LogoutOutcome::Unreachable
            }
        };

        self.cache.clear();
        outcome
    }

    /// Reconciliación de carga de página
    pub async fn sync_with_backend(&self) -> AuthState {
        self.cache.reconcile(&self.service).await
    }

    fn accept(&self, response: ApiResponse, email: &str, fallback: &str) -> Result<AuthState, AuthError> {
        if !response.is_success() {
            let message = response.message.unwrap_or_else(|| fallback.to_string());
            log::warn!("⚠️ [AUTH] Credenciales rechazadas: {}", message);
            return Err(AuthError::Rejected(message));
        }

        let identity = match response.user {
            Some(user) if !user.email.trim().is_empty() => user.into_identity(),
            _ => Identity {
                email: email.to_string(),
                profile: UserProfile::from_email(email),
            },
        };
        self.cache.set_logged_in(&identity.email, identity.profile);

        Ok(self.cache.read())
    }
}
