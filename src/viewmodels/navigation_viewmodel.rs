// ============================================================================
// NAVIGATION VIEWMODEL - Gating de enlaces según el estado de auth cacheado
// ============================================================================
// Solo usa el valor síncrono del cache: no espera a reconcile(). Una página
// recién cargada puede dejar pasar con el estado persistido; la página destino
// reconcilia y revoca si hace falta.
// ============================================================================

use crate::config::RouteConfig;
use crate::state::AuthStateCache;
use crate::utils::KeyValueStorage;

/// Páginas de la web
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    Home,
    Features,
    About,
    Pricing,
    Contact,
    AiInterface,
    Login,
    Signup,
    Dashboard,
}

impl Destination {
    /// Interpreta un href por su path (`dashboard.html`, `/dashboard/`,
    /// `https://derivity.ai/dashboard.html`, `../login.html?next=x`).
    /// `None` para mailto/tel o páginas desconocidas. El host no se mira:
    /// eso lo decide `is_external_href`.
    pub fn from_href(href: &str) -> Option<Self> {
        let href = href.trim();
        if ["mailto:", "tel:", "javascript:"].iter().any(|scheme| href.starts_with(scheme)) {
            return None;
        }

        let (_, path) = split_href(href);
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let page = path.rsplit('/').find(|segment| !segment.is_empty()).unwrap_or_default();
        let slug = page.strip_suffix(".html").unwrap_or(page);

        match slug {
            "" | "index" => Some(Self::Home),
            "features" => Some(Self::Features),
            "about" => Some(Self::About),
            "pricing" => Some(Self::Pricing),
            "contact" => Some(Self::Contact),
            "ai-interface" => Some(Self::AiInterface),
            "login" => Some(Self::Login),
            "signup" => Some(Self::Signup),
            "dashboard" => Some(Self::Dashboard),
            _ => None,
        }
    }

    /// Destinos protegidos: solo con sesión
    pub fn requires_login(self) -> bool {
        matches!(self, Self::Dashboard)
    }

    /// Puntos de entrada de auth: con sesión no tiene sentido mostrarlos
    pub fn is_auth_entry(self) -> bool {
        matches!(self, Self::Login | Self::Signup)
    }

    fn slug(self) -> &'static str {
        match self {
            Self::Home => "index",
            Self::Features => "features",
            Self::About => "about",
            Self::Pricing => "pricing",
            Self::Contact => "contact",
            Self::AiInterface => "ai-interface",
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Dashboard => "dashboard",
        }
    }
}

/// Separa `(host, resto)` de un href absoluto (`https://host/...`) o relativo
/// al esquema (`//host/...`). Un href relativo no tiene host.
fn split_href(href: &str) -> (Option<&str>, &str) {
    let authority = match href.split_once("://") {
        Some((scheme, rest)) if !scheme.is_empty() && !scheme.contains(['/', '?', '#']) => Some(rest),
        _ => href.strip_prefix("//"),
    };

    match authority {
        Some(rest) => {
            let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
            (Some(&rest[..end]), &rest[end..])
        }
        None => (None, href),
    }
}

/// `true` si el href apunta a otro host distinto de `current_host` (con puerto)
pub fn is_external_href(href: &str, current_host: &str) -> bool {
    split_href(href.trim())
        .0
        .is_some_and(|host| !host.eq_ignore_ascii_case(current_host))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    /// Cancelar el click e ir a otro destino
    Redirect(Destination),
}

/// Regla de gating, independiente del cache
pub fn gate(destination: Destination, logged_in: bool) -> NavigationDecision {
    if destination.requires_login() && !logged_in {
        NavigationDecision::Redirect(Destination::Login)
    } else if destination.is_auth_entry() && logged_in {
        NavigationDecision::Redirect(Destination::Dashboard)
    } else {
        NavigationDecision::Allow
    }
}

pub struct NavigationViewModel<S> {
    cache: AuthStateCache<S>,
    routes: RouteConfig,
}

impl<S: KeyValueStorage> NavigationViewModel<S> {
    pub fn new(cache: AuthStateCache<S>, routes: RouteConfig) -> Self {
        Self { cache, routes }
    }

    pub fn check(&self, destination: Destination) -> NavigationDecision {
        let decision = gate(destination, self.cache.is_logged_in());
        if let NavigationDecision::Redirect(target) = decision {
            log::info!("🚧 [NAV] {:?} bloqueado, redirigiendo a {:?}", destination, target);
        }
        decision
    }

    /// Gating de un href. Los enlaces desconocidos nunca se bloquean.
    pub fn check_href(&self, href: &str) -> NavigationDecision {
        Destination::from_href(href)
            .map(|destination| self.check(destination))
            .unwrap_or(NavigationDecision::Allow)
    }

    /// Como `check_href`, pero los enlaces a otros hosts nunca se bloquean
    pub fn check_link(&self, href: &str, current_host: &str) -> NavigationDecision {
        if is_external_href(href, current_host) {
            NavigationDecision::Allow
        } else {
            self.check_href(href)
        }
    }

    /// Consulta booleana usada antes de seguir un enlace protegido
    pub fn can_access_protected(&self) -> bool {
        self.cache.is_logged_in()
    }

    pub fn path_for(&self, destination: Destination) -> String {
        match destination {
            Destination::Login => self.routes.login_path.clone(),
            Destination::Dashboard => self.routes.dashboard_path.clone(),
            Destination::Home => self.routes.home_path.clone(),
            other => format!("{}.html", other.slug()),
        }
    }
}
