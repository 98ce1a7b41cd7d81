// ============================================================================
// DOM MODULE - Helpers para manipulación DOM (solo navegador)
// ============================================================================

pub mod element;
pub mod events;
pub mod auth_elements;

pub use element::*;
pub use events::*;
pub use auth_elements::AuthElements;
