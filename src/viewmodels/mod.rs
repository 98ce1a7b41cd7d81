// ============================================================================
// VIEWMODELS - Lógica de UI sin DOM
// ============================================================================

pub mod auth_viewmodel;
pub mod chat_viewmodel;
pub mod contact_viewmodel;
pub mod navigation_viewmodel;

pub use auth_viewmodel::*;
pub use chat_viewmodel::*;
pub use contact_viewmodel::*;
pub use navigation_viewmodel::*;
