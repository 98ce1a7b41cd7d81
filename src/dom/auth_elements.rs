// ============================================================================
// AUTH ELEMENTS - Elementos de la cabecera que dependen del estado de auth
// ============================================================================
// Se buscan una sola vez al arrancar. Cualquiera puede faltar: no todas las
// páginas tienen menú de usuario.
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use super::element::{get_element_by_id, set_hidden, set_text_content};
use crate::views::AuthHeaderView;

pub struct AuthElements {
    pub auth_buttons: Option<Element>,
    pub user_menu: Option<Element>,
    pub user_email: Option<Element>,
    pub user_initial: Option<Element>,
}

impl AuthElements {
    pub fn lookup() -> Self {
        Self {
            auth_buttons: get_element_by_id("auth-buttons"),
            user_menu: get_element_by_id("user-menu"),
            user_email: get_element_by_id("user-email"),
            user_initial: get_element_by_id("user-initial"),
        }
    }

    pub fn apply(&self, view: &AuthHeaderView) -> Result<(), JsValue> {
        if let Some(buttons) = &self.auth_buttons {
            set_hidden(buttons, !view.show_auth_buttons)?;
        }
        if let Some(menu) = &self.user_menu {
            set_hidden(menu, view.user.is_none())?;
        }
        if let Some(badge) = &view.user {
            if let Some(email) = &self.user_email {
                set_text_content(email, &badge.email);
            }
            if let Some(initial) = &self.user_initial {
                set_text_content(initial, &badge.initial);
            }
        }
        Ok(())
    }
}
