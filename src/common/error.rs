// src/common/error.rs

use thiserror::Error;

use crate::models::inventory::ItemId;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Toda ação da store converte as falhas para este tipo antes de gravar a
// mensagem no escopo correspondente.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Resposta não-2xx do backend. `message` já vem resolvida:
    // a mensagem do backend quando existe, senão "HTTP <status>".
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Falha de comunicação com o servidor: {0}")]
    Network(#[from] reqwest::Error),

    // Pré-condições checadas localmente (ex.: nenhum cômodo cadastrado)
    #[error("{0}")]
    Precondition(String),

    #[error("Item não encontrado: {0}")]
    ItemNotFound(ItemId),

    #[error("Erro de armazenamento local: {0}")]
    Storage(String),

    #[error("Erro de serialização: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Erro de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuração inválida: {0}")]
    Config(String),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// Constrói o erro HTTP a partir do status e do corpo (opcional) da resposta.
    pub fn http(status: u16, backend_message: Option<String>) -> Self {
        let message = backend_message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {status}"));
        AppError::Http { status, message }
    }

    /// Texto que a camada de apresentação mostra no toast.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ValidationError(errors) => {
                let mut messages: Vec<String> = errors
                    .field_errors()
                    .into_iter()
                    .flat_map(|(field, field_errors)| {
                        field_errors.iter().map(move |e| match &e.message {
                            Some(m) => m.to_string(),
                            None => format!("Campo '{field}' inválido."),
                        })
                    })
                    .collect();
                messages.sort();
                if messages.is_empty() {
                    "Um ou mais campos são inválidos.".to_string()
                } else {
                    messages.join(" ")
                }
            }
            other => other.to_string(),
        }
    }

    /// Status HTTP, quando o erro veio do backend.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            AppError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
