use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const JSON_MIME: &str = "application/json";

/// Resultado de uma requisição HTTP.
///
/// Quando `error` vem de uma falha de transporte, os demais campos ficam vazios.
/// Quando a API responde com status >= 400 e um campo `mensagem`, o texto é
/// promovido para `error` mas status e corpo continuam disponíveis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResult {
    pub url: String,
    pub error: Option<String>,
    pub status_code: Option<u16>,
    pub content_type: Option<String>,
    pub body: Option<String>,
}

impl HttpResult {
    pub fn new(
        url: impl Into<String>,
        error: Option<String>,
        status_code: Option<u16>,
        content_type: Option<String>,
        body: Option<String>,
    ) -> Self {
        Self {
            url: url.into(),
            error,
            status_code,
            content_type,
            body,
        }
    }

    /// Resultado contendo apenas um erro, sem nenhuma resposta do servidor.
    pub fn from_error(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(url, Some(error.into()), None, None, None)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map_or(false, |t| t.starts_with(JSON_MIME))
    }

    /// Sem erro e com status 2xx.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && matches!(self.status_code, Some(200..=299))
    }

    pub fn json_value(&self) -> Option<serde_json::Value> {
        self.json()
    }

    /// Decodifica o corpo quando a resposta é JSON. Retorna `None` caso contrário.
    pub fn json<T: DeserializeOwned>(&self) -> Option<T> {
        if !self.is_json() {
            return None;
        }
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

/// Conteúdo binário (fotos, assinaturas) obtido de um GET simples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryContent {
    pub mime_type: String,
    pub size: usize,
    pub content: Vec<u8>,
}

impl BinaryContent {
    pub fn new(mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            size: content.len(),
            content,
        }
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.content))
    }
}
