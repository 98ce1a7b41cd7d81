// ============================================================================
// APP - Arranque de la página: cache de auth, view models y listeners
// ============================================================================

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlAnchorElement, HtmlButtonElement, HtmlFormElement};

use crate::config::CONFIG;
use crate::dom::{
    create_element, document, field_checked, field_value, get_element_by_id, listen, navigate_to, query_all,
    set_text_content, show_message, window, AuthElements,
};
use crate::models::SignupRequest;
use crate::services::ApiClient;
use crate::state::AuthStateCache;
use crate::utils::PageStorage;
use crate::viewmodels::{
    auth_error_message, chat_error_message, AuthViewModel, ChatViewModel, ContactForm, ContactViewModel,
    Destination, NavigationDecision, NavigationViewModel,
};
use crate::views::render_auth_header;

const LOGOUT_REDIRECT_DELAY_MS: u32 = 1_500;

pub type PageAuth = AuthViewModel<PageStorage, ApiClient>;

/// Aplicación de la página. Hay una sola por carga de página.
pub struct App {
    cache: AuthStateCache<PageStorage>,
    auth: Rc<PageAuth>,
    navigation: Rc<NavigationViewModel<PageStorage>>,
    contact: Rc<ContactViewModel<ApiClient>>,
    chat: Rc<ChatViewModel<ApiClient>>,
}

impl App {
    pub fn new() -> Self {
        let cache =
            AuthStateCache::load(PageStorage::open()).with_session_storage(PageStorage::open_session());
        let api = ApiClient::new();

        Self {
            auth: Rc::new(AuthViewModel::new(cache.clone(), api.clone())),
            navigation: Rc::new(NavigationViewModel::new(cache.clone(), CONFIG.routes.clone())),
            contact: Rc::new(ContactViewModel::new(api.clone())),
            chat: Rc::new(ChatViewModel::new(api)),
            cache,
        }
    }

    pub fn cache(&self) -> &AuthStateCache<PageStorage> {
        &self.cache
    }

    pub fn auth(&self) -> Rc<PageAuth> {
        Rc::clone(&self.auth)
    }

    /// Render inicial, listeners y reconciliación en segundo plano
    pub fn start(&self) -> Result<(), JsValue> {
        let elements = Rc::new(AuthElements::lookup());
        elements.apply(&render_auth_header(&self.cache.read()))?;
        {
            let elements = Rc::clone(&elements);
            self.cache.subscribe(move |state| {
                if let Err(e) = elements.apply(&render_auth_header(state)) {
                    log::error!("❌ [APP] Error actualizando cabecera: {:?}", e);
                }
            });
        }

        self.bind_gated_links()?;
        self.bind_logout_buttons()?;
        self.bind_login_form()?;
        self.bind_signup_form()?;
        self.bind_contact_form()?;
        self.bind_chat_form()?;

        let auth = Rc::clone(&self.auth);
        wasm_bindgen_futures::spawn_local(async move {
            let state = auth.sync_with_backend().await;
            log::info!("✅ [APP] Auth sincronizado (logueado: {})", state.is_logged_in());
        });

        Ok(())
    }

    fn bind_gated_links(&self) -> Result<(), JsValue> {
        let doc = document().ok_or_else(|| JsValue::from_str("No document"))?;
        let current_host = window()
            .and_then(|w| w.location().host().ok())
            .unwrap_or_default();

        for anchor in query_all::<HtmlAnchorElement>(&doc, "a[href]") {
            let Some(href) = anchor.get_attribute("href") else {
                continue;
            };
            let gated = Destination::from_href(&href)
                .map(|d| d.requires_login() || d.is_auth_entry())
                .unwrap_or(false);
            if !gated {
                continue;
            }

            let navigation = Rc::clone(&self.navigation);
            let current_host = current_host.clone();
            listen(&anchor, "click", move |event| {
                if let NavigationDecision::Redirect(target) = navigation.check_link(&href, &current_host) {
                    event.prevent_default();
                    navigate_to(&navigation.path_for(target));
                }
            })?;
        }

        Ok(())
    }

    fn bind_logout_buttons(&self) -> Result<(), JsValue> {
        let doc = document().ok_or_else(|| JsValue::from_str("No document"))?;

        for button in query_all::<Element>(&doc, "#logout-btn, #logoutBtn, [data-action=\"logout\"]") {
            let auth = Rc::clone(&self.auth);
            let navigation = Rc::clone(&self.navigation);
            listen(&button, "click", move |event| {
                event.prevent_default();
                let auth = Rc::clone(&auth);
                let home = navigation.path_for(Destination::Home);
                wasm_bindgen_futures::spawn_local(async move {
                    auth.logout().await;
                    let toast = show_logout_toast();
                    Timeout::new(LOGOUT_REDIRECT_DELAY_MS, move || {
                        if let Some(toast) = toast {
                            toast.remove();
                        }
                        navigate_to(&home);
                    })
                    .forget();
                });
            })?;
        }

        Ok(())
    }

    fn bind_login_form(&self) -> Result<(), JsValue> {
        let Some(form) = form_by_id("loginForm")? else {
            return Ok(());
        };

        let auth = Rc::clone(&self.auth);
        let dashboard = self.navigation.path_for(Destination::Dashboard);
        let target = form.clone();
        listen(&target, "submit", move |event| {
            event.prevent_default();

            let email = field_value(&form, "email");
            let password = field_value(&form, "password");
            let button = SubmitButton::disable(&form, "Signing in...");

            let auth = Rc::clone(&auth);
            let dashboard = dashboard.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match auth.login(&email, &password).await {
                    Ok(_) => navigate_to(&dashboard),
                    Err(e) => {
                        show_message(&auth_error_message(&e));
                        if let Some(button) = button {
                            button.restore();
                        }
                    }
                }
            });
        })?;

        Ok(())
    }

    fn bind_signup_form(&self) -> Result<(), JsValue> {
        let Some(form) = form_by_id("signupForm")? else {
            return Ok(());
        };

        let auth = Rc::clone(&self.auth);
        let dashboard = self.navigation.path_for(Destination::Dashboard);
        let target = form.clone();
        listen(&target, "submit", move |event| {
            event.prevent_default();

            let request = SignupRequest {
                full_name: field_value(&form, "fullName").trim().to_string(),
                email: field_value(&form, "email"),
                password: field_value(&form, "password"),
                newsletter: field_checked(&form, "newsletter"),
            };
            let button = SubmitButton::disable(&form, "Creating account...");

            let auth = Rc::clone(&auth);
            let dashboard = dashboard.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match auth.signup(request).await {
                    Ok(_) => navigate_to(&dashboard),
                    Err(e) => {
                        show_message(&auth_error_message(&e));
                        if let Some(button) = button {
                            button.restore();
                        }
                    }
                }
            });
        })?;

        Ok(())
    }

    fn bind_contact_form(&self) -> Result<(), JsValue> {
        let Some(form) = form_by_id("contactForm")? else {
            return Ok(());
        };

        let contact = Rc::clone(&self.contact);
        let target = form.clone();
        listen(&target, "submit", move |event| {
            event.prevent_default();

            let submitted = ContactForm::new(
                &field_value(&form, "name"),
                &field_value(&form, "email"),
                &field_value(&form, "message"),
            );
            let button = SubmitButton::disable(&form, "Sending...");

            let contact = Rc::clone(&contact);
            let form = form.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match contact.submit(&submitted).await {
                    Ok(outcome) => {
                        show_message(outcome.message());
                        if outcome.is_sent() {
                            form.reset();
                        }
                    }
                    Err(invalid) => show_message(&invalid.to_string()),
                }

                if let Some(button) = button {
                    button.restore();
                }
            });
        })?;

        Ok(())
    }

    fn bind_chat_form(&self) -> Result<(), JsValue> {
        let Some(form) = form_by_id("aiChatForm")? else {
            return Ok(());
        };
        let output = get_element_by_id("ai-chat-response");

        let chat = Rc::clone(&self.chat);
        let target = form.clone();
        listen(&target, "submit", move |event| {
            event.prevent_default();

            let message = field_value(&form, "message");
            let button = SubmitButton::disable(&form, "Sending...");

            let chat = Rc::clone(&chat);
            let form = form.clone();
            let output = output.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match chat.send(&message).await {
                    Ok(reply) => {
                        match &output {
                            Some(element) => set_text_content(element, &reply),
                            None => show_message(&reply),
                        }
                        form.reset();
                    }
                    Err(e) => show_message(&chat_error_message(&e)),
                }

                if let Some(button) = button {
                    button.restore();
                }
            });
        })?;

        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn form_by_id(id: &str) -> Result<Option<HtmlFormElement>, JsValue> {
    get_element_by_id(id)
        .map(|element| element.dyn_into::<HtmlFormElement>())
        .transpose()
        .map_err(JsValue::from)
}

/// Botón submit deshabilitado mientras la petición está en vuelo
struct SubmitButton {
    button: HtmlButtonElement,
    label: Option<String>,
}

impl SubmitButton {
    fn disable(form: &HtmlFormElement, busy_label: &str) -> Option<Self> {
        let button = form
            .query_selector("button[type=\"submit\"]")
            .ok()
            .flatten()
            .and_then(|b| b.dyn_into::<HtmlButtonElement>().ok())?;
        let label = button.text_content();
        button.set_text_content(Some(busy_label));
        button.set_disabled(true);
        Some(Self { button, label })
    }

    fn restore(self) {
        self.button.set_text_content(self.label.as_deref());
        self.button.set_disabled(false);
    }
}

fn show_logout_toast() -> Option<Element> {
    let body = document()?.body()?;
    let toast = match create_element("div") {
        Ok(toast) => toast,
        Err(e) => {
            log::error!("❌ [APP] Error creando aviso de logout: {:?}", e);
            return None;
        }
    };
    toast.set_class_name("fixed top-4 right-4 z-50 bg-green-500 text-white px-4 py-2 rounded-lg shadow-lg");
    toast.set_text_content(Some("Logged out successfully"));

    match body.append_child(&toast) {
        Ok(_) => Some(toast),
        Err(e) => {
            log::error!("❌ [APP] Error mostrando aviso de logout: {:?}", e);
            None
        }
    }
}
