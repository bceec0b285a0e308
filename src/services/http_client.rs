use crate::error::Result;
use crate::models::http::{BinaryContent, HttpResult};
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{redirect, Client, Method};
use std::time::Duration;
use tracing::{debug, warn};

const JSON_MIME: &str = "application/json";

/// Parâmetros de transporte de um `HttpClient`.
///
/// A verificação de certificados fica ligada por padrão. `accept_invalid_certs`
/// existe só para testes de integração locais.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub follow_redirects: bool,
    pub max_redirects: usize,
    pub accept_invalid_certs: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(8),
            follow_redirects: true,
            max_redirects: 12,
            accept_invalid_certs: false,
        }
    }
}

/// Cliente HTTP compartilhado por todos os clientes de API.
///
/// Cada chamada faz uma única tentativa e nunca retorna erro: falhas de transporte
/// e erros reportados pela API ficam em `HttpResult::error`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    headers: Vec<(String, String)>,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, config: &HttpClientConfig) -> Result<Self> {
        let redirect_policy = if config.follow_redirects {
            redirect::Policy::limited(config.max_redirects)
        } else {
            redirect::Policy::none()
        };

        if config.accept_invalid_certs {
            warn!("TLS certificate verification is disabled for this HTTP client");
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(redirect_policy)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers: Vec::new(),
        })
    }

    /// Cabeçalho fixo enviado em todas as requisições deste cliente.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    pub async fn get(&self, endpoint: &str) -> HttpResult {
        self.send(Method::GET, endpoint, None).await
    }

    pub async fn post(&self, endpoint: &str, body: String) -> HttpResult {
        self.send(Method::POST, endpoint, Some(body)).await
    }

    pub async fn put(&self, endpoint: &str) -> HttpResult {
        self.send(Method::PUT, endpoint, None).await
    }

    /// Envia uma requisição para `base_url + endpoint`.
    ///
    /// O corpo só é anexado em POST, PUT e PATCH.
    pub async fn send(&self, method: Method, endpoint: &str, body: Option<String>) -> HttpResult {
        let url = self.url_for(endpoint);
        let has_body = method == Method::POST || method == Method::PUT || method == Method::PATCH;

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(CACHE_CONTROL, "no-cache");

        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        if has_body {
            request = request
                .header(CONTENT_TYPE, JSON_MIME)
                .body(body.unwrap_or_default());
        }

        debug!("{} {}", method, url);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} {} failed: {}", method, url, e);
                return HttpResult::from_error(url, e.to_string());
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("{} {} failed while reading body: {}", method, url, e);
                return HttpResult::from_error(url, e.to_string());
            }
        };

        let error = api_error_message(status, content_type.as_deref(), &body);
        if let Some(message) = &error {
            warn!("{} {} returned {}: {}", method, url, status, message);
        } else {
            debug!("{} {} returned {}", method, url, status);
        }

        HttpResult::new(url, error, Some(status), content_type, Some(body))
    }

    /// GET simples em uma URL absoluta, para imagens e outros binários.
    ///
    /// Retorna `None` para qualquer resposta diferente de 200.
    pub async fn fetch_binary(&self, url: &str) -> Option<BinaryContent> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("GET {} failed: {}", url, e);
                return None;
            }
        };

        if response.status().as_u16() != 200 {
            debug!("GET {} returned {}", url, response.status());
            return None;
        }

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        match response.bytes().await {
            Ok(bytes) => Some(BinaryContent::new(mime_type, bytes.to_vec())),
            Err(e) => {
                warn!("GET {} failed while reading body: {}", url, e);
                None
            }
        }
    }
}

/// Extrai o campo `mensagem` de uma resposta de erro JSON.
fn api_error_message(status: u16, content_type: Option<&str>, body: &str) -> Option<String> {
    if status < 400 || body.is_empty() {
        return None;
    }
    if !content_type.map_or(false, |t| t.starts_with(JSON_MIME)) {
        return None;
    }

    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("mensagem")
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpClient {
        HttpClient::new(server.uri(), &HttpClientConfig::default()).unwrap()
    }

    #[test]
    fn test_url_for_normalizes_endpoint() {
        let client = HttpClient::new("https://api.exemplo.com/v3/", &HttpClientConfig::default()).unwrap();
        assert_eq!(client.url_for("financeiro/x"), "https://api.exemplo.com/v3/financeiro/x");
        assert_eq!(client.url_for("/financeiro/x"), "https://api.exemplo.com/v3/financeiro/x");
    }

    #[test]
    fn test_api_error_message_rules() {
        let body = r#"{"mensagem":"saldo insuficiente"}"#;
        assert_eq!(
            api_error_message(422, Some("application/json"), body).as_deref(),
            Some("saldo insuficiente")
        );
        assert_eq!(api_error_message(200, Some("application/json"), body), None);
        assert_eq!(api_error_message(422, Some("text/plain"), body), None);
        assert_eq!(api_error_message(422, None, body), None);
        assert_eq!(api_error_message(500, Some("application/json"), r#"{"mensagem":""}"#), None);
        assert_eq!(api_error_message(500, Some("application/json"), "not json"), None);
    }

    #[tokio::test]
    async fn test_get_sends_cache_control() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/financeiro/consultar-cobrancas"))
            .and(query_param("cpf", "123"))
            .and(header("cache-control", "no-cache"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cobrancas": []})))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .get("financeiro/consultar-cobrancas?cpf=123")
            .await;

        assert!(result.is_success());
        assert_eq!(result.url, format!("{}/financeiro/consultar-cobrancas?cpf=123", server.uri()));
        assert_eq!(result.json_value(), Some(json!({"cobrancas": []})));
    }

    #[tokio::test]
    async fn test_post_sends_json_body_and_extra_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1/sales/"))
            .and(header("content-type", "application/json"))
            .and(header("MerchantId", "loja"))
            .and(body_json(json!({"a": 1})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"Payment": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).with_header("MerchantId", "loja");
        let result = client.post("/1/sales/", json!({"a": 1}).to_string()).await;

        assert_eq!(result.status_code, Some(201));
        assert_eq!(result.error, None);
    }

    #[tokio::test]
    async fn test_json_error_is_promoted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_raw(r#"{"mensagem":"saldo insuficiente"}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let result = client_for(&server).post("/financeiro/cartao/pagar", "{}".to_string()).await;

        assert_eq!(result.error.as_deref(), Some("saldo insuficiente"));
        assert_eq!(result.status_code, Some(422));
        assert_eq!(result.body.as_deref(), Some(r#"{"mensagem":"saldo insuficiente"}"#));
    }

    #[tokio::test]
    async fn test_error_status_without_message_keeps_error_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_raw("erro interno", "text/plain"))
            .mount(&server)
            .await;

        let result = client_for(&server).get("/x").await;

        assert_eq!(result.error, None);
        assert_eq!(result.status_code, Some(500));
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_transport_failure_sets_only_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ok": true}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = HttpClientConfig {
            timeout: Duration::from_millis(100),
            ..HttpClientConfig::default()
        };
        let client = HttpClient::new(server.uri(), &config).unwrap();
        let result = client.get("/lento").await;

        assert!(result.error.is_some());
        assert_eq!(result.status_code, None);
        assert_eq!(result.content_type, None);
        assert_eq!(result.body, None);
    }

    #[tokio::test]
    async fn test_connection_refused_sets_error() {
        let client = HttpClient::new("http://127.0.0.1:1", &HttpClientConfig::default()).unwrap();
        let result = client.get("/x").await;

        assert!(result.error.is_some());
        assert_eq!(result.status_code, None);
    }

    #[tokio::test]
    async fn test_fetch_binary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/foto.png"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![9u8, 8, 7], "image/png"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let image = client
            .fetch_binary(&format!("{}/foto.png", server.uri()))
            .await
            .unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.size, 3);
        assert_eq!(image.content, vec![9, 8, 7]);

        let missing = client.fetch_binary(&format!("{}/nada.png", server.uri())).await;
        assert!(missing.is_none());
    }
}
