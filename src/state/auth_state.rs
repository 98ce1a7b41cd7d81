// ============================================================================
// AUTH STATE CACHE - Espejo local del estado de sesión del backend
// ============================================================================
// - read(): síncrono, sin efectos, nunca falla
// - set_logged_in() / clear(): actualizan memoria y luego localStorage
// - reconcile(): un único auth-status; el backend manda si hay desacuerdo,
//   y si la red falla el cache se queda como estaba (sin reintentos)
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use crate::error::ServiceError;
use crate::models::{AuthState, AuthStatusResponse, Identity, UserProfile};
use crate::services::SessionService;
use crate::state::ReactiveState;
use crate::utils::{
    load_from_storage, save_to_storage, KeyValueStorage, LOGGED_IN_FLAG, STORAGE_KEY_IS_LOGGED_IN,
    STORAGE_KEY_LEGACY_AUTH_TOKEN, STORAGE_KEY_USER_DATA, STORAGE_KEY_USER_EMAIL,
};

/// Fase del cache dentro de una carga de página.
/// Antes de `AuthStateCache::load` no existe cache (fase "sin inicializar").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// Valor leído de localStorage, todavía sin contrastar
    Loaded,
    /// El backend confirmó (o corrigió) el valor cacheado
    Reconciled(ReconcileOutcome),
    /// No se pudo hablar con el backend; se mantiene el valor cacheado
    ReconcileSkipped,
}

/// Resultado de una reconciliación aplicada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// El backend coincide con el cache (como mucho se refresca el perfil)
    Matched,
    /// El cache se sobrescribió o se limpió con la respuesta del backend
    Corrected,
}

/// Decisión calculada entera antes de tocar el estado
#[derive(Debug, Clone, PartialEq)]
enum ReconcileDecision {
    Keep,
    RefreshProfile(UserProfile),
    Replace(Identity),
    Clear,
}

fn decide(current: &AuthState, response: AuthStatusResponse) -> Result<ReconcileDecision, ServiceError> {
    if !response.authenticated {
        return Ok(if current.is_logged_in() {
            ReconcileDecision::Clear
        } else {
            ReconcileDecision::Keep
        });
    }

    let user = response
        .user
        .ok_or_else(|| ServiceError::Parse("authenticated=true sin user".to_string()))?;
    if user.email.trim().is_empty() {
        return Err(ServiceError::Parse("user sin email".to_string()));
    }
    let identity = user.into_identity();

    if current.email() == Some(identity.email.as_str()) {
        Ok(ReconcileDecision::RefreshProfile(identity.profile))
    } else {
        Ok(ReconcileDecision::Replace(identity))
    }
}

/// Lee el triple persistido. Cualquier clave ausente o corrupta cuenta como
/// "deslogueado": nunca se reconstruye un estado a medias.
fn read_persisted<S: KeyValueStorage + ?Sized>(storage: &S) -> Option<Identity> {
    let flag = storage.get_item(STORAGE_KEY_IS_LOGGED_IN).ok()??;
    if flag != LOGGED_IN_FLAG {
        return None;
    }

    let email = storage
        .get_item(STORAGE_KEY_USER_EMAIL)
        .ok()
        .flatten()
        .filter(|email| !email.is_empty())?;
    let profile = load_from_storage::<_, UserProfile>(storage, STORAGE_KEY_USER_DATA)?;

    Some(Identity { email, profile })
}

fn has_any_persisted_key<S: KeyValueStorage + ?Sized>(storage: &S) -> bool {
    [STORAGE_KEY_IS_LOGGED_IN, STORAGE_KEY_USER_EMAIL, STORAGE_KEY_USER_DATA]
        .iter()
        .any(|key| matches!(storage.get_item(key), Ok(Some(_))))
}

/// Cache de autenticación de la página.
///
/// Los clones comparten estado, storage y subscribers: hay un único cache por
/// página y cada handler recibe un clone.
pub struct AuthStateCache<S> {
    storage: Rc<S>,
    /// Datos de sesión de la pestaña; se vacían enteros en cada `clear()`
    session: Option<Rc<dyn KeyValueStorage>>,
    state: ReactiveState<AuthState>,
    phase: Rc<Cell<SyncPhase>>,
}

impl<S> Clone for AuthStateCache<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Rc::clone(&self.storage),
            session: self.session.clone(),
            state: self.state.clone(),
            phase: Rc::clone(&self.phase),
        }
    }
}

impl<S: KeyValueStorage> AuthStateCache<S> {
    /// Carga el estado persistido (o el default deslogueado)
    pub fn load(storage: S) -> Self {
        let initial = match read_persisted(&storage) {
            Some(identity) => {
                log::info!("💾 [AUTH] Sesión cacheada encontrada: {}", identity.email);
                AuthState::from(identity)
            }
            None => {
                if has_any_persisted_key(&storage) {
                    log::warn!("⚠️ [AUTH] Estado persistido incompleto o corrupto, se descarta");
                    Self::remove_persisted(&storage);
                }
                AuthState::logged_out()
            }
        };

        Self {
            storage: Rc::new(storage),
            session: None,
            state: ReactiveState::new(initial),
            phase: Rc::new(Cell::new(SyncPhase::Loaded)),
        }
    }

    /// Storage de pestaña (sessionStorage) que `clear()` vacía por completo.
    /// Se configura antes de repartir clones del cache.
    pub fn with_session_storage<T: KeyValueStorage + 'static>(mut self, session: T) -> Self {
        self.session = Some(Rc::new(session));
        self
    }

    /// Estado actual, sin red y sin efectos
    pub fn read(&self) -> AuthState {
        self.state.get()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.with(AuthState::is_logged_in)
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase.get()
    }

    /// Avisar en cada cambio de estado (render del menú de usuario, etc.)
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&AuthState) + 'static,
    {
        self.state.subscribe(callback);
    }

    /// Marca el cache como logueado de forma optimista, justo después de un
    /// login/signup correcto. Si localStorage falla, el valor en memoria sigue
    /// siendo válido hasta el final de la página.
    ///
    /// El email se guarda sin espacios. Un email vacío se ignora: `load` no lo
    /// aceptaría en la siguiente carga.
    pub fn set_logged_in(&self, email: &str, profile: UserProfile) {
        let email = email.trim();
        if email.is_empty() {
            log::warn!("⚠️ [AUTH] set_logged_in sin email, se ignora");
            return;
        }

        self.state.set(AuthState::logged_in(email, profile.clone()));
        self.persist(email, &profile);
        log::info!("🔐 [AUTH] Usuario logueado: {}", email);
    }

    /// Vuelve al estado deslogueado y borra todas las claves persistidas.
    /// Idempotente.
    pub fn clear(&self) {
        self.state.set(AuthState::logged_out());
        Self::remove_persisted(self.storage.as_ref());
        if let Some(session) = &self.session {
            if let Err(e) = session.clear() {
                log::error!("❌ [AUTH] Error vaciando sessionStorage: {}", e);
            }
        }
        log::info!("👋 [AUTH] Estado de auth limpiado");
    }

    /// Contrasta el cache con el backend y aplica la corrección si hace falta.
    pub async fn reconcile<T>(&self, service: &T) -> AuthState
    where
        T: SessionService + ?Sized,
    {
        let applied = service
            .check_status()
            .await
            .and_then(|response| self.apply_status(response));

        match applied {
            Ok(outcome) => self.phase.set(SyncPhase::Reconciled(outcome)),
            Err(e) => {
                log::warn!("⚠️ [AUTH] No se pudo verificar la sesión, se mantiene el cache: {}", e);
                self.phase.set(SyncPhase::ReconcileSkipped);
            }
        }

        self.read()
    }

    // El estado se lee después del await: otro handler pudo cambiarlo mientras
    // la petición estaba en vuelo.
    fn apply_status(&self, response: AuthStatusResponse) -> Result<ReconcileOutcome, ServiceError> {
        let current = self.read();
        let decision = decide(&current, response)?;

        let outcome = match decision {
            ReconcileDecision::Keep => ReconcileOutcome::Matched,
            ReconcileDecision::RefreshProfile(profile) => {
                if current.profile() != Some(&profile) {
                    if let Some(email) = current.email() {
                        self.state.set(AuthState::logged_in(email, profile.clone()));
                        self.persist(email, &profile);
                        log::info!("🔄 [AUTH] Perfil refrescado desde el backend");
                    }
                }
                ReconcileOutcome::Matched
            }
            ReconcileDecision::Replace(identity) => {
                log::info!(
                    "🔄 [AUTH] El backend reporta otra sesión ({:?} -> {}), se corrige el cache",
                    current.email(),
                    identity.email
                );
                self.set_logged_in(&identity.email, identity.profile);
                ReconcileOutcome::Corrected
            }
            ReconcileDecision::Clear => {
                log::info!("🔄 [AUTH] El backend no reconoce la sesión, se limpia el cache");
                self.clear();
                ReconcileOutcome::Corrected
            }
        };

        Ok(outcome)
    }

    // El flag se escribe el último: si una escritura intermedia falla no queda
    // un "isLoggedIn" apuntando a datos a medias.
    fn persist(&self, email: &str, profile: &UserProfile) {
        let storage = self.storage.as_ref();
        let written = save_to_storage(storage, STORAGE_KEY_USER_DATA, profile)
            .and_then(|()| storage.set_item(STORAGE_KEY_USER_EMAIL, email))
            .and_then(|()| storage.set_item(STORAGE_KEY_IS_LOGGED_IN, LOGGED_IN_FLAG));

        if let Err(e) = written {
            log::error!("❌ [AUTH] Error guardando sesión en localStorage: {}", e);
            Self::remove_persisted(storage);
        }
    }

    // El flag se borra el primero, por la misma razón.
    fn remove_persisted(storage: &S) {
        let keys = [
            STORAGE_KEY_IS_LOGGED_IN,
            STORAGE_KEY_USER_EMAIL,
            STORAGE_KEY_USER_DATA,
            STORAGE_KEY_LEGACY_AUTH_TOKEN,
        ];
        for key in keys {
            if let Err(e) = storage.remove_item(key) {
                log::error!("❌ [AUTH] Error eliminando {} de localStorage: {}", key, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;
    use crate::services::fake::FakeSessionService;
    use crate::utils::MemoryStorage;

    fn profile(value: serde_json::Value) -> UserProfile {
        serde_json::from_value(value).unwrap()
    }

    fn logged_in_as(email: &str) -> (MemoryStorage, AuthStateCache<MemoryStorage>) {
        let storage = MemoryStorage::new();
        let cache = AuthStateCache::load(storage.clone());
        cache.set_logged_in(email, UserProfile::from_email(email));
        (storage, cache)
    }

    fn assert_no_persisted_keys(storage: &MemoryStorage) {
        for key in [STORAGE_KEY_IS_LOGGED_IN, STORAGE_KEY_USER_EMAIL, STORAGE_KEY_USER_DATA] {
            assert!(!storage.contains_key(key), "{} sigue en storage", key);
        }
    }

    #[test]
    fn test_empty_storage_reads_logged_out() {
        let cache = AuthStateCache::load(MemoryStorage::new());
        assert_eq!(cache.read(), AuthState::logged_out());
        assert_eq!(cache.phase(), SyncPhase::Loaded);
    }

    #[test]
    fn test_set_logged_in_then_read() {
        let storage = MemoryStorage::new();
        let cache = AuthStateCache::load(storage.clone());
        cache.set_logged_in("a@x.com", profile(json!({"email": "a@x.com"})));

        let state = cache.read();
        assert!(state.is_logged_in());
        assert_eq!(state.email(), Some("a@x.com"));
        assert_eq!(state.profile(), Some(&profile(json!({"email": "a@x.com"}))));

        assert_eq!(storage.get_item(STORAGE_KEY_IS_LOGGED_IN).unwrap().as_deref(), Some("true"));
        assert_eq!(storage.get_item(STORAGE_KEY_USER_EMAIL).unwrap().as_deref(), Some("a@x.com"));
        assert_eq!(
            load_from_storage::<_, serde_json::Value>(&storage, STORAGE_KEY_USER_DATA),
            Some(json!({"email": "a@x.com"}))
        );
    }

    #[test]
    fn test_set_logged_in_trims_email_and_survives_reload() {
        let storage = MemoryStorage::new();
        let cache = AuthStateCache::load(storage.clone());
        cache.set_logged_in("  a@x.com ", UserProfile::from_email("a@x.com"));

        assert_eq!(cache.read().email(), Some("a@x.com"));
        assert_eq!(AuthStateCache::load(storage).read(), cache.read());
    }

    #[test]
    fn test_clear_empties_session_storage() {
        let session = MemoryStorage::new();
        session.set_item("wizardStep", "3").unwrap();
        let cache = AuthStateCache::load(MemoryStorage::new()).with_session_storage(session.clone());
        cache.set_logged_in("a@x.com", UserProfile::from_email("a@x.com"));

        let handler_copy = cache.clone();
        handler_copy.clear();

        assert!(session.is_empty());
        assert!(!cache.is_logged_in());
    }

    #[test]
    fn test_set_logged_in_ignores_blank_email() {
        let storage = MemoryStorage::new();
        let cache = AuthStateCache::load(storage.clone());
        cache.set_logged_in("   ", UserProfile::from_email(""));

        assert!(!cache.is_logged_in());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_persisted_state_survives_reload() {
        let (storage, _) = logged_in_as("a@x.com");
        let reloaded = AuthStateCache::load(storage);
        assert_eq!(reloaded.read().email(), Some("a@x.com"));
    }

    #[test]
    fn test_clear_removes_every_key_from_any_state() {
        let (storage, cache) = logged_in_as("a@x.com");
        storage.set_item(STORAGE_KEY_LEGACY_AUTH_TOKEN, "tok").unwrap();

        cache.clear();
        assert!(!cache.read().is_logged_in());
        assert_no_persisted_keys(&storage);
        assert!(!storage.contains_key(STORAGE_KEY_LEGACY_AUTH_TOKEN));

        let fresh = AuthStateCache::load(MemoryStorage::new());
        fresh.clear();
        assert!(!fresh.read().is_logged_in());
    }

    #[test]
    fn test_clear_twice_equals_clear_once() {
        let (storage, cache) = logged_in_as("a@x.com");
        cache.clear();
        let once = (cache.read(), storage.len());
        cache.clear();
        assert_eq!((cache.read(), storage.len()), once);
    }

    #[test]
    fn test_corrupt_user_data_loads_logged_out_and_is_cleaned() {
        let storage = MemoryStorage::new();
        storage.set_item(STORAGE_KEY_IS_LOGGED_IN, "true").unwrap();
        storage.set_item(STORAGE_KEY_USER_EMAIL, "a@x.com").unwrap();
        storage.set_item(STORAGE_KEY_USER_DATA, "{oops").unwrap();

        let cache = AuthStateCache::load(storage.clone());
        assert!(!cache.read().is_logged_in());
        assert_no_persisted_keys(&storage);
    }

    #[test]
    fn test_flag_without_email_is_not_logged_in() {
        let storage = MemoryStorage::new();
        storage.set_item(STORAGE_KEY_IS_LOGGED_IN, "true").unwrap();
        storage.set_item(STORAGE_KEY_USER_DATA, r#"{"email":"a@x.com"}"#).unwrap();

        let cache = AuthStateCache::load(storage);
        assert_eq!(cache.read(), AuthState::logged_out());
    }

    #[test]
    fn test_flag_other_than_true_is_not_logged_in() {
        let storage = MemoryStorage::new();
        storage.set_item(STORAGE_KEY_IS_LOGGED_IN, "false").unwrap();
        storage.set_item(STORAGE_KEY_USER_EMAIL, "a@x.com").unwrap();
        storage.set_item(STORAGE_KEY_USER_DATA, r#"{"email":"a@x.com"}"#).unwrap();

        let cache = AuthStateCache::load(storage);
        assert!(!cache.is_logged_in());
    }

    #[test]
    fn test_storage_failure_keeps_memory_state() {
        let storage = MemoryStorage::new();
        let cache = AuthStateCache::load(storage.clone());
        storage.set_fail_writes(true);

        cache.set_logged_in("a@x.com", UserProfile::from_email("a@x.com"));
        assert_eq!(cache.read().email(), Some("a@x.com"));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_subscribers_notified_on_login_and_clear() {
        let cache = AuthStateCache::load(MemoryStorage::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in_callback = Rc::clone(&seen);
        cache.subscribe(move |state| seen_in_callback.borrow_mut().push(state.is_logged_in()));

        cache.set_logged_in("a@x.com", UserProfile::from_email("a@x.com"));
        cache.clear();
        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_reconcile_clears_when_backend_says_logged_out() {
        let (storage, cache) = logged_in_as("a@x.com");
        let service = FakeSessionService::new().with_status_json(json!({"authenticated": false}));

        let state = cache.reconcile(&service).await;
        assert!(!state.is_logged_in());
        assert_eq!(cache.phase(), SyncPhase::Reconciled(ReconcileOutcome::Corrected));
        assert_no_persisted_keys(&storage);
    }

    #[tokio::test]
    async fn test_reconcile_adopts_backend_session_when_logged_out() {
        let storage = MemoryStorage::new();
        let cache = AuthStateCache::load(storage.clone());
        let service = FakeSessionService::new()
            .with_status_json(json!({"authenticated": true, "user": {"email": "b@x.com"}}));

        cache.reconcile(&service).await;
        assert!(cache.is_logged_in());
        assert_eq!(cache.read().email(), Some("b@x.com"));
        assert_eq!(storage.get_item(STORAGE_KEY_USER_EMAIL).unwrap().as_deref(), Some("b@x.com"));
        assert_eq!(cache.phase(), SyncPhase::Reconciled(ReconcileOutcome::Corrected));
    }

    #[tokio::test]
    async fn test_reconcile_backend_identity_wins_on_mismatch() {
        let (_, cache) = logged_in_as("a@x.com");
        let service = FakeSessionService::new().with_status_json(json!({
            "authenticated": true,
            "user": {"email": "b@x.com", "first_name": "Bea"}
        }));

        let state = cache.reconcile(&service).await;
        assert_eq!(state.email(), Some("b@x.com"));
        assert_eq!(state.profile().and_then(|p| p.get("first_name")), Some(&json!("Bea")));
    }

    #[tokio::test]
    async fn test_reconcile_network_failure_changes_nothing() {
        let (storage, cache) = logged_in_as("a@x.com");
        let before = (cache.read(), storage.len());
        let service = FakeSessionService::new()
            .with_status(Err(ServiceError::Network("connection refused".to_string())));

        let state = cache.reconcile(&service).await;
        assert_eq!(state.email(), Some("a@x.com"));
        assert_eq!((cache.read(), storage.len()), before);
        assert_eq!(cache.phase(), SyncPhase::ReconcileSkipped);
    }

    #[tokio::test]
    async fn test_reconcile_timeout_counts_as_network_failure() {
        let cache = AuthStateCache::load(MemoryStorage::new());
        let service = FakeSessionService::new().with_status(Err(ServiceError::Timeout(5_000)));

        cache.reconcile(&service).await;
        assert!(!cache.is_logged_in());
        assert_eq!(cache.phase(), SyncPhase::ReconcileSkipped);
    }

    #[tokio::test]
    async fn test_reconcile_authenticated_without_user_is_malformed() {
        let cache = AuthStateCache::load(MemoryStorage::new());
        let service = FakeSessionService::new().with_status_json(json!({"authenticated": true}));

        cache.reconcile(&service).await;
        assert!(!cache.is_logged_in());
        assert_eq!(cache.phase(), SyncPhase::ReconcileSkipped);
    }

    #[tokio::test]
    async fn test_reconcile_user_with_blank_email_is_malformed() {
        let (_storage, cache) = logged_in_as("a@x.com");
        let service = FakeSessionService::new()
            .with_status_json(json!({"authenticated": true, "user": {"email": " "}}));

        cache.reconcile(&service).await;
        assert_eq!(cache.read().email(), Some("a@x.com"));
        assert_eq!(cache.phase(), SyncPhase::ReconcileSkipped);
    }

    #[tokio::test]
    async fn test_reconcile_same_user_refreshes_profile_only() {
        let (storage, cache) = logged_in_as("a@x.com");
        let service = FakeSessionService::new().with_status_json(json!({
            "authenticated": true,
            "user": {"email": "a@x.com", "last_name": "Lovelace"}
        }));

        let state = cache.reconcile(&service).await;
        assert_eq!(state.email(), Some("a@x.com"));
        assert_eq!(state.profile().and_then(|p| p.get("last_name")), Some(&json!("Lovelace")));
        assert_eq!(cache.phase(), SyncPhase::Reconciled(ReconcileOutcome::Matched));
        assert_eq!(
            load_from_storage::<_, serde_json::Value>(&storage, STORAGE_KEY_USER_DATA),
            Some(json!({"email": "a@x.com", "last_name": "Lovelace"}))
        );
    }

    #[tokio::test]
    async fn test_reconcile_both_logged_out_is_a_match() {
        let cache = AuthStateCache::load(MemoryStorage::new());
        let notified = Rc::new(Cell::new(false));
        let notified_in_callback = Rc::clone(&notified);
        cache.subscribe(move |_| notified_in_callback.set(true));
        let service = FakeSessionService::new().with_status_json(json!({"authenticated": false}));

        cache.reconcile(&service).await;
        assert_eq!(cache.phase(), SyncPhase::Reconciled(ReconcileOutcome::Matched));
        assert!(!notified.get());
    }

    #[test]
    fn test_decide_is_pure_over_current_state() {
        let current = AuthState::logged_in("a@x.com", UserProfile::from_email("a@x.com"));
        let response: AuthStatusResponse = serde_json::from_value(json!({
            "authenticated": true,
            "user": {"email": "a@x.com"}
        }))
        .unwrap();

        assert_eq!(
            decide(&current, response),
            Ok(ReconcileDecision::RefreshProfile(UserProfile::from_email("a@x.com")))
        );
        assert_eq!(current.email(), Some("a@x.com"));
    }
}
