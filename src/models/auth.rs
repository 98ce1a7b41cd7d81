use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Perfil de usuario tal como lo devuelve el backend.
/// Opaco para el cliente: solo se lee el campo `email`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(Map<String, Value>);

impl UserProfile {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Perfil mínimo cuando el backend no devuelve datos de usuario
    pub fn from_email(email: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("email".to_string(), Value::String(email.to_string()));
        Self(fields)
    }

    pub fn email(&self) -> Option<&str> {
        self.0.get("email").and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

/// Identidad cacheada de un usuario logueado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub profile: UserProfile,
}

/// Estado de autenticación visto por el cliente.
///
/// `email` y `profile` existen si y solo si el usuario está logueado: ambos
/// viven dentro de `Identity`, así que no hay forma de construir un estado
/// "deslogueado con email" ni al revés.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthState {
    identity: Option<Identity>,
}

impl AuthState {
    pub fn logged_out() -> Self {
        Self::default()
    }

    pub fn logged_in(email: impl Into<String>, profile: UserProfile) -> Self {
        Self {
            identity: Some(Identity {
                email: email.into(),
                profile,
            }),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn email(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.email.as_str())
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.identity.as_ref().map(|identity| &identity.profile)
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

impl From<Identity> for AuthState {
    fn from(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_is_logged_out() {
        let state = AuthState::default();
        assert!(!state.is_logged_in());
        assert_eq!(state.email(), None);
        assert_eq!(state.profile(), None);
    }

    #[test]
    fn test_profile_reads_email_field() {
        let profile: UserProfile =
            serde_json::from_value(json!({"email": "a@x.com", "first_name": "Ada"})).unwrap();
        assert_eq!(profile.email(), Some("a@x.com"));
        assert_eq!(profile.get("first_name"), Some(&json!("Ada")));
        assert_eq!(UserProfile::from_email("b@x.com").email(), Some("b@x.com"));
    }

    #[test]
    fn test_identity_json_shape() {
        let state = AuthState::logged_in("a@x.com", UserProfile::from_email("a@x.com"));
        assert_eq!(
            serde_json::to_value(state.identity()).unwrap(),
            json!({"email": "a@x.com", "profile": {"email": "a@x.com"}})
        );
        assert_eq!(AuthState::logged_out().identity(), None);
    }
}
