use serde::{Deserialize, Serialize};

const DEFAULT_BACKEND_URL_DEVELOPMENT: &str = "http://localhost:8000";
const DEFAULT_BACKEND_URL_PRODUCTION: &str = "";
const DEFAULT_STATUS_CHECK_TIMEOUT_MS: u32 = 5_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url_development: String,
    /// Vacío = mismo origen que la página (rutas relativas)
    pub backend_url_production: String,
    pub environment: String,
    pub enable_logging: bool,
    /// Tope del auth-status en milisegundos. 0 desactiva el tope.
    pub status_check_timeout_ms: u32,
    pub routes: RouteConfig,
}

/// Rutas de la web usadas por el gating de navegación
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub login_path: String,
    pub dashboard_path: String,
    pub home_path: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            login_path: "login.html".to_string(),
            dashboard_path: "dashboard.html".to_string(),
            home_path: "index.html".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url_development: DEFAULT_BACKEND_URL_DEVELOPMENT.to_string(),
            backend_url_production: DEFAULT_BACKEND_URL_PRODUCTION.to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            status_check_timeout_ms: DEFAULT_STATUS_CHECK_TIMEOUT_MS,
            routes: RouteConfig::default(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match key {
            "BACKEND_URL_DEVELOPMENT" => option_env!("BACKEND_URL_DEVELOPMENT").or(option_env!("BACKEND_URL")),
            "BACKEND_URL_PRODUCTION" => option_env!("BACKEND_URL_PRODUCTION"),
            "ENVIRONMENT" => option_env!("ENVIRONMENT"),
            "ENABLE_LOGGING" => option_env!("ENABLE_LOGGING"),
            "STATUS_CHECK_TIMEOUT_MS" => option_env!("STATUS_CHECK_TIMEOUT_MS"),
            "LOGIN_PATH" => option_env!("LOGIN_PATH"),
            "DASHBOARD_PATH" => option_env!("DASHBOARD_PATH"),
            "HOME_PATH" => option_env!("HOME_PATH"),
            _ => None,
        })
    }

    /// Construye la configuración a partir de una función de lookup.
    /// Valores ausentes o mal formados caen al valor por defecto.
    pub fn from_lookup<'a, F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let defaults = Self::default();
        let string_or = |key: &str, default: String| {
            lookup(key).map(str::to_string).unwrap_or(default)
        };

        Self {
            backend_url_development: string_or("BACKEND_URL_DEVELOPMENT", defaults.backend_url_development),
            backend_url_production: string_or("BACKEND_URL_PRODUCTION", defaults.backend_url_production),
            environment: string_or("ENVIRONMENT", defaults.environment),
            enable_logging: lookup("ENABLE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enable_logging),
            status_check_timeout_ms: lookup("STATUS_CHECK_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.status_check_timeout_ms),
            routes: RouteConfig {
                login_path: string_or("LOGIN_PATH", defaults.routes.login_path),
                dashboard_path: string_or("DASHBOARD_PATH", defaults.routes.dashboard_path),
                home_path: string_or("HOME_PATH", defaults.routes.home_path),
            },
        }
    }

    /// Obtiene la URL del backend según el entorno actual
    pub fn backend_url(&self) -> &str {
        match self.environment.as_str() {
            "production" => &self.backend_url_production,
            _ => &self.backend_url_development,
        }
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }

    /// Tope del auth-status, `None` si está desactivado
    pub fn status_check_timeout_ms(&self) -> Option<u32> {
        (self.status_check_timeout_ms > 0).then_some(self.status_check_timeout_ms)
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_lookup_overrides_defaults() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("ENVIRONMENT", "production"),
            ("BACKEND_URL_PRODUCTION", "https://derivity.ai"),
            ("STATUS_CHECK_TIMEOUT_MS", "2500"),
            ("DASHBOARD_PATH", "/dashboard/"),
        ]);
        let config = AppConfig::from_lookup(|key| env.get(key).copied());

        assert_eq!(config.backend_url(), "https://derivity.ai");
        assert_eq!(config.status_check_timeout_ms(), Some(2500));
        assert_eq!(config.routes.dashboard_path, "/dashboard/");
        assert_eq!(config.routes.login_path, "login.html");
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let config = AppConfig::from_lookup(|key| match key {
            "ENABLE_LOGGING" => Some("sí"),
            "STATUS_CHECK_TIMEOUT_MS" => Some("cinco"),
            _ => None,
        });

        assert!(config.is_logging_enabled());
        assert_eq!(config.status_check_timeout_ms, DEFAULT_STATUS_CHECK_TIMEOUT_MS);
        assert_eq!(config.backend_url(), DEFAULT_BACKEND_URL_DEVELOPMENT);
    }

    #[test]
    fn test_zero_timeout_disables_cap() {
        let config = AppConfig {
            status_check_timeout_ms: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.status_check_timeout_ms(), None);
    }
}
