// ============================================================================
// ERRORES - Taxonomía de errores del cliente
// ============================================================================
// Ninguno de estos errores es fatal para la página: el peor caso es un
// estado de auth desactualizado o limpiado de forma pesimista.
// ============================================================================

use thiserror::Error;

/// Fallos de persistencia local (localStorage)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("localStorage no disponible")]
    Unavailable,
    #[error("error guardando clave '{0}'")]
    Write(String),
    #[error("error eliminando clave '{0}'")]
    Remove(String),
    #[error("error serializando datos: {0}")]
    Serialize(String),
}

/// Fallos hablando con el Session Service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("error de red: {0}")]
    Network(String),
    #[error("sin respuesta tras {0} ms")]
    Timeout(u32),
    #[error("HTTP {status}")]
    Http { status: u16 },
    #[error("respuesta mal formada: {0}")]
    Parse(String),
    #[error("API no disponible en este despliegue")]
    Disabled,
}

/// Fallos de login / signup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("el email es obligatorio")]
    MissingEmail,
    /// El servidor respondió con `status: "error"`
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Campo inválido del formulario de contacto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("el nombre es obligatorio")]
    MissingName,
    #[error("el email es obligatorio")]
    MissingEmail,
    #[error("el email no es válido")]
    InvalidEmail,
    #[error("el mensaje es obligatorio")]
    MissingMessage,
}

/// Fallos del chat con el asistente
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("el mensaje está vacío")]
    EmptyMessage,
    /// El servidor respondió con `status: "error"`
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
}
