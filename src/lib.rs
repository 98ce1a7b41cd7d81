// ============================================================================
// DERIVITY AUTH - Estado de sesión del cliente web (RUST + WASM)
// ============================================================================
// - Models: estado de auth y payloads del backend
// - Services: SOLO comunicación con el Session Service
// - State: AuthStateCache (Rc<RefCell> + subscribers)
// - ViewModels: gating de navegación, login/logout, contacto
// - Views / DOM: cabecera de auth (DOM solo con la feature `web`)
// ============================================================================

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod viewmodels;
pub mod views;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod dom;

pub use error::{AuthError, ChatError, ContactError, ServiceError, StorageError};
pub use models::{AuthState, UserProfile};
pub use state::{AuthStateCache, ReconcileOutcome, SyncPhase};

#[cfg(feature = "web")]
mod entry {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;

    use crate::app::App;
    use crate::config::CONFIG;
    use crate::models::UserProfile;

    // Instancia única de la página
    thread_local! {
        static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let level = if CONFIG.is_logging_enabled() {
            log::Level::Info
        } else {
            log::Level::Warn
        };
        wasm_logger::init(wasm_logger::Config::new(level));
        log::info!("🚀 Derivity AI - auth del cliente ({})", CONFIG.environment);

        let app = App::new();
        app.start()?;

        APP.with(|cell| {
            *cell.borrow_mut() = Some(app);
        });

        Ok(())
    }

    /// Consulta de gating para scripts de la página:
    /// `true` si el cache local dice que hay sesión
    #[wasm_bindgen(js_name = isLoggedIn)]
    pub fn is_logged_in() -> bool {
        APP.with(|cell| {
            cell.borrow()
                .as_ref()
                .map(|app| app.cache().is_logged_in())
                .unwrap_or(false)
        })
    }

    /// Identidad cacheada como JSON (`{"email", "profile"}`), `undefined` sin sesión
    #[wasm_bindgen(js_name = authState)]
    pub fn auth_state() -> Option<String> {
        let state = APP.with(|cell| cell.borrow().as_ref().map(|app| app.cache().read()))?;
        let identity = state.identity()?;
        match serde_json::to_string(identity) {
            Ok(json) => Some(json),
            Err(e) => {
                log::error!("❌ [AUTH] Error serializando estado: {}", e);
                None
            }
        }
    }

    /// Login optimista desde scripts propios de la página. `profile` es el
    /// JSON del usuario; sin él se guarda solo el email.
    #[wasm_bindgen(js_name = setLoggedIn)]
    pub fn set_logged_in(email: String, profile: Option<String>) -> Result<(), JsValue> {
        let profile = match profile {
            Some(json) => serde_json::from_str::<UserProfile>(&json)
                .map_err(|e| JsValue::from_str(&format!("perfil inválido: {}", e)))?,
            None => UserProfile::from_email(email.trim()),
        };

        APP.with(|cell| match cell.borrow().as_ref() {
            Some(app) => {
                app.cache().set_logged_in(&email, profile);
                Ok(())
            }
            None => Err(JsValue::from_str("App no inicializada")),
        })
    }

    /// Fuerza una reconciliación con el backend; resuelve a `isLoggedIn()`
    #[wasm_bindgen(js_name = reconcile)]
    pub async fn reconcile() -> bool {
        // El préstamo de APP no puede cruzar el await
        let Some(auth) = APP.with(|cell| cell.borrow().as_ref().map(App::auth)) else {
            return false;
        };
        auth.sync_with_backend().await.is_logged_in()
    }

    /// Limpieza del estado de auth desde JavaScript
    #[wasm_bindgen(js_name = clearAuthState)]
    pub fn clear_auth_state() {
        APP.with(|cell| {
            if let Some(app) = cell.borrow().as_ref() {
                app.cache().clear();
            }
        });
    }
}
