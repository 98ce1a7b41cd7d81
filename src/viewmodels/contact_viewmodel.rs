// ============================================================================
// CONTACT VIEWMODEL - Validación y envío del formulario de contacto
// ============================================================================

use crate::error::{ContactError, ServiceError};
use crate::models::ContactRequest;
use crate::services::SessionService;

pub const CONTACT_SENT_MESSAGE: &str = "Thank you for your message! We'll get back to you soon.";
/// Despliegues estáticos sin backend: se confirma igualmente al usuario
pub const CONTACT_SENT_OFFLINE_MESSAGE: &str =
    "Thank you for reaching out! We'll get back to you within 24 hours.";
pub const CONTACT_FAILED_MESSAGE: &str = "There was an error sending your message. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            message: message.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<ContactRequest, ContactError> {
        if self.name.is_empty() {
            return Err(ContactError::MissingName);
        }
        if self.email.is_empty() {
            return Err(ContactError::MissingEmail);
        }
        if !is_plausible_email(&self.email) {
            return Err(ContactError::InvalidEmail);
        }
        if self.message.is_empty() {
            return Err(ContactError::MissingMessage);
        }

        Ok(ContactRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            message: self.message.clone(),
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Resultado mostrado en el modal tras enviar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    Sent(String),
    Failed(String),
}

impl ContactOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Sent(message) | Self::Failed(message) => message,
        }
    }
}

pub struct ContactViewModel<T> {
    service: T,
}

impl<T: SessionService> ContactViewModel<T> {
    pub fn new(service: T) -> Self {
        Self { service }
    }

    /// Valida y envía. Un formulario inválido no llega a hacer la petición.
    pub async fn submit(&self, form: &ContactForm) -> Result<ContactOutcome, ContactError> {
        let request = form.validate()?;

        let outcome = match self.service.submit_contact(&request).await {
            Ok(response) if response.is_success() => {
                log::info!("✅ [CONTACT] Mensaje enviado");
                ContactOutcome::Sent(response.message.unwrap_or_else(|| CONTACT_SENT_MESSAGE.to_string()))
            }
            Ok(response) => {
                log::warn!("⚠️ [CONTACT] El backend rechazó el mensaje: {:?}", response.message);
                ContactOutcome::Failed(response.message.unwrap_or_else(|| CONTACT_FAILED_MESSAGE.to_string()))
            }
            Err(ServiceError::Disabled) => {
                log::info!("ℹ️ [CONTACT] Sin backend, confirmación local");
                ContactOutcome::Sent(CONTACT_SENT_OFFLINE_MESSAGE.to_string())
            }
            Err(e) => {
                log::error!("❌ [CONTACT] Error enviando mensaje: {}", e);
                ContactOutcome::Failed(CONTACT_FAILED_MESSAGE.to_string())
            }
        };

        Ok(outcome)
    }
}
