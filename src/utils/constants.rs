// Claves de localStorage. Las tres se escriben y se borran juntas, solo desde AuthStateCache.
pub const STORAGE_KEY_IS_LOGGED_IN: &str = "isLoggedIn";
pub const STORAGE_KEY_USER_EMAIL: &str = "userEmail";
pub const STORAGE_KEY_USER_DATA: &str = "userData";
/// Clave heredada de una versión con tokens; se borra en cada logout
pub const STORAGE_KEY_LEGACY_AUTH_TOKEN: &str = "authToken";

pub const LOGGED_IN_FLAG: &str = "true";

// Endpoints del Session Service
pub const ENDPOINT_AUTH_STATUS: &str = "/api/auth-status/";
pub const ENDPOINT_LOGIN: &str = "/api/login/";
pub const ENDPOINT_SIGNUP: &str = "/api/signup/";
pub const ENDPOINT_LOGOUT: &str = "/api/logout/";
pub const ENDPOINT_CONTACT: &str = "/api/contact/";
pub const ENDPOINT_AI_CHAT: &str = "/api/ai-chat/";
