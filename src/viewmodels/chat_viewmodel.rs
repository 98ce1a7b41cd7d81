// ============================================================================
// CHAT VIEWMODEL - Mensajes al asistente de la página ai-interface
// ============================================================================

use crate::error::{ChatError, ServiceError};
use crate::models::AiChatRequest;
use crate::services::SessionService;

/// Respuesta local cuando la página se sirve sin backend
pub const AI_CHAT_OFFLINE_REPLY: &str =
    "Thank you for your interest in Derivity AI! We're currently in development and will be launching soon. Stay tuned for updates!";
pub const AI_CHAT_FAILED_MESSAGE: &str = "There was an error processing your request";
pub const AI_CHAT_EMPTY_MESSAGE: &str = "Please type a message first.";

/// Texto para el usuario a partir de un fallo del chat
pub fn chat_error_message(error: &ChatError) -> String {
    match error {
        ChatError::EmptyMessage => AI_CHAT_EMPTY_MESSAGE.to_string(),
        ChatError::Rejected(message) => message.clone(),
        ChatError::Service(_) => AI_CHAT_FAILED_MESSAGE.to_string(),
    }
}

pub struct ChatViewModel<T> {
    service: T,
}

impl<T: SessionService> ChatViewModel<T> {
    pub fn new(service: T) -> Self {
        Self { service }
    }

    /// Envía un mensaje y devuelve el texto de respuesta del asistente
    pub async fn send(&self, message: &str) -> Result<String, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let request = AiChatRequest {
            message: message.to_string(),
        };
        match self.service.send_ai_message(&request).await {
            Ok(reply) if reply.is_success() => {
                log::info!("🤖 [CHAT] Respuesta recibida");
                Ok(reply.response.unwrap_or_default())
            }
            Ok(reply) => {
                let message = reply.message.unwrap_or_else(|| AI_CHAT_FAILED_MESSAGE.to_string());
                log::warn!("⚠️ [CHAT] El backend rechazó el mensaje: {}", message);
                Err(ChatError::Rejected(message))
            }
            Err(ServiceError::Disabled) => {
                log::info!("ℹ️ [CHAT] Sin backend, respuesta local");
                Ok(AI_CHAT_OFFLINE_REPLY.to_string())
            }
            Err(e) => {
                log::error!("❌ [CHAT] Error enviando mensaje: {}", e);
                Err(ChatError::from(e))
            }
        }
    }
}
