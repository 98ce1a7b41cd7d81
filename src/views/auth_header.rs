use crate::models::AuthState;

/// Qué muestra la cabecera según el estado de auth.
/// Botones de login/signup o menú de usuario, nunca ambos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaderView {
    pub show_auth_buttons: bool,
    pub user: Option<UserBadge>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserBadge {
    pub email: String,
    /// Inicial en mayúscula para el avatar
    pub initial: String,
}

impl UserBadge {
    pub fn for_email(email: &str) -> Self {
        let initial = email
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect::<String>())
            .unwrap_or_default();
        Self {
            email: email.to_string(),
            initial,
        }
    }
}

pub fn render_auth_header(state: &AuthState) -> AuthHeaderView {
    let user = state.email().map(UserBadge::for_email);
    AuthHeaderView {
        show_auth_buttons: user.is_none(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;

    #[test]
    fn test_logged_out_shows_auth_buttons() {
        let view = render_auth_header(&AuthState::logged_out());
        assert!(view.show_auth_buttons);
        assert_eq!(view.user, None);
    }

    #[test]
    fn test_logged_in_shows_badge() {
        let state = AuthState::logged_in("ada@x.com", UserProfile::from_email("ada@x.com"));
        let view = render_auth_header(&state);
        assert!(!view.show_auth_buttons);
        assert_eq!(
            view.user,
            Some(UserBadge {
                email: "ada@x.com".to_string(),
                initial: "A".to_string(),
            })
        );
    }

    #[test]
    fn test_initial_handles_non_ascii() {
        assert_eq!(UserBadge::for_email("ñandú@x.com").initial, "Ñ");
    }
}
