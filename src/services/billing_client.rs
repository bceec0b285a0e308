use crate::app::config::Config;
use crate::error::Result;
use crate::models::billing::{ConsultaCobrancas, PagamentoCartao, ValoresCorrigidos};
use crate::models::http::HttpResult;
use crate::services::http_client::HttpClient;
use crate::services::regional_client::RegionalClient;
use chrono::{Local, NaiveDate};
use serde_json::json;
use tracing::{info, warn};
use url::form_urlencoded;

/// Opções da consulta de cobranças.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsultaOptions {
    /// Busca o valor corrigido dos débitos vencidos na API do regional.
    pub corrigido: bool,
    /// Usa a regra da resolução no cálculo da correção.
    pub resolucao: bool,
}

/// Cliente da API financeira central (`https://api.conselho.net.br/v3`).
#[derive(Debug, Clone)]
pub struct CentralBillingClient {
    http: HttpClient,
    config: Config,
}

impl CentralBillingClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config.cnet_api_url.clone(), &config.http_config())?,
            config: config.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Cobranças de uma ficha cadastral pelo CPF/CNPJ.
    pub async fn consultar_cobrancas(
        &self,
        regional: u32,
        cpf_cnpj: &str,
        options: ConsultaOptions,
    ) -> HttpResult {
        let today = Local::now().date_naive();
        self.consultar_cobrancas_at(regional, cpf_cnpj, options, today).await
    }

    /// Igual a `consultar_cobrancas`, com a data de referência para vencimento.
    pub async fn consultar_cobrancas_at(
        &self,
        regional: u32,
        cpf_cnpj: &str,
        options: ConsultaOptions,
        today: NaiveDate,
    ) -> HttpResult {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("regional", &regional.to_string())
            .append_pair("cpf", cpf_cnpj)
            .append_pair("corrigido", flag(options.corrigido))
            .append_pair("resolucao", flag(options.resolucao))
            .finish();

        let base = self
            .http
            .get(&format!("/financeiro/consultar-cobrancas?{}", query))
            .await;

        if !options.corrigido || !base.is_success() {
            return base;
        }

        self.apply_regional_corrections(regional, base, options.resolucao, today)
            .await
    }

    /// Segunda etapa da consulta corrigida: busca no regional o valor atualizado
    /// dos débitos vencidos e mescla no corpo da resposta.
    async fn apply_regional_corrections(
        &self,
        regional: u32,
        base: HttpResult,
        resolucao: bool,
        today: NaiveDate,
    ) -> HttpResult {
        let Some(mut consulta) = base.json::<ConsultaCobrancas>() else {
            warn!("Unexpected billing response from {}", base.url);
            return HttpResult {
                error: Some("Resposta inesperada da consulta de cobranças.".to_string()),
                ..base
            };
        };

        let ids = consulta.overdue_item_ids(today);
        if !ids.is_empty() {
            let regional_client = match RegionalClient::new(regional, &self.config) {
                Ok(client) => client,
                Err(e) => return HttpResult::from_error(base.url, e.to_string()),
            };

            info!("Fetching corrected values for {} overdue item(s) in region {}", ids.len(), regional);
            let correction = regional_client.valor_corrigido(&ids, resolucao).await;
            if !correction.is_success() {
                return with_status_error(correction);
            }

            let Some(valores) = correction.json::<ValoresCorrigidos>() else {
                warn!("Unexpected correction response from {}", correction.url);
                return HttpResult {
                    error: Some("Resposta inesperada do cálculo de valor corrigido.".to_string()),
                    ..correction
                };
            };
            consulta.apply_corrections(&valores.valores, today);
        } else {
            consulta.apply_corrections(&[], today);
        }

        match serde_json::to_string(&consulta) {
            Ok(body) => HttpResult {
                body: Some(body),
                ..base
            },
            Err(e) => HttpResult::from_error(base.url, e.to_string()),
        }
    }

    /// Paga cobranças selecionadas com cartão de crédito.
    pub async fn pagar_cartao(&self, pagamento: &PagamentoCartao) -> HttpResult {
        info!(
            "Card payment on region {} for charges {:?}, {} installment(s), card {}",
            pagamento.regional,
            pagamento.cobrancas,
            pagamento.parcelas,
            pagamento.card.masked_number()
        );
        self.http
            .post("/financeiro/cartao/pagar", pagamento.to_json(true).to_string())
            .await
    }

    /// Estorna uma transação de cartão. Com sucesso, a cobrança volta a ficar
    /// pendente de pagamento no servidor.
    pub async fn estornar_cartao(&self, regional: u32, tid: &str, autorizacao: &str) -> HttpResult {
        info!("Reversing card transaction {} on region {}", tid, regional);
        let body = json!({
            "regional": regional,
            "tid": tid,
            "autorizacao": autorizacao,
        });
        self.http.post("/financeiro/cartao/estornar", body.to_string()).await
    }

    /// Envia a segunda via do boleto por e-mail.
    ///
    /// `url_base_boleto` é o endereço usado pela API para renderizar o documento.
    pub async fn enviar_boleto(
        &self,
        regional: u32,
        cobranca_id: i64,
        email: &str,
        url_base_boleto: &str,
    ) -> HttpResult {
        let body = json!({
            "regional": regional,
            "cobranca": cobranca_id,
            "email": email,
            "url": url_base_boleto,
        });
        self.http.post("/financeiro/enviar-boleto", body.to_string()).await
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Garante que uma resposta sem sucesso tenha `error` preenchido.
fn with_status_error(result: HttpResult) -> HttpResult {
    if result.error.is_some() {
        return result;
    }
    let message = match result.status_code {
        Some(status) => format!("HTTP {}", status),
        None => "Falha na requisição".to_string(),
    };
    HttpResult {
        error: Some(message),
        ..result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::card::CardDetails;
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> Config {
        Config {
            cnet_api_url: server.uri(),
            regional_site_template: server.uri(),
            regional_photo_site_template: server.uri(),
            ..Config::default()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn base_response() -> Value {
        json!({
            "cobrancas": [
                {
                    "id": 1,
                    "itens": [
                        {"id": 10, "valor": 100, "vencimento": "2024-01-31", "pago": false},
                        {"id": 11, "valor": 200, "vencimento": "2024-02-29", "pago": false}
                    ]
                },
                {
                    "id": 2,
                    "itens": [
                        {"id": 12, "valor": 50, "vencimento": "2024-01-31", "pago": true}
                    ]
                }
            ]
        })
    }

    async fn mount_base(server: &MockServer, corrigido: &str) {
        Mock::given(method("GET"))
            .and(path("/financeiro/consultar-cobrancas"))
            .and(query_param("regional", "2"))
            .and(query_param("cpf", "12345678909"))
            .and(query_param("corrigido", corrigido))
            .respond_with(ResponseTemplate::new(200).set_body_json(base_response()))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_consulta_without_correction() {
        let server = MockServer::start().await;
        mount_base(&server, "0").await;

        let client = CentralBillingClient::new(&config_for(&server)).unwrap();
        let result = client
            .consultar_cobrancas_at(2, "12345678909", ConsultaOptions::default(), today())
            .await;

        assert!(result.is_success());
        assert_eq!(result.json_value(), Some(base_response()));
    }

    #[tokio::test]
    async fn test_consulta_with_correction_merges_values() {
        let server = MockServer::start().await;
        mount_base(&server, "1").await;
        Mock::given(method("POST"))
            .and(path("/api/debito_valor_corrigido.php"))
            .and(body_json(json!({"id": [10, 11], "resolucao": true})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"valores": [{"id": 10, "valor": 115.2}]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = CentralBillingClient::new(&config_for(&server)).unwrap();
        let options = ConsultaOptions {
            corrigido: true,
            resolucao: true,
        };
        let result = client
            .consultar_cobrancas_at(2, "12345678909", options, today())
            .await;

        assert!(result.is_success());
        let consulta: ConsultaCobrancas = result.json().unwrap();
        let primeira = &consulta.cobrancas[0];
        assert_eq!(primeira.itens[0].valor_corrigido, Some(dec!(115.2)));
        assert_eq!(primeira.itens[1].valor_corrigido, Some(dec!(200)));
        assert_eq!(primeira.valor_corrigido, Some(dec!(315.2)));

        let segunda = &consulta.cobrancas[1];
        assert_eq!(segunda.itens[0].valor_corrigido, None);
        assert_eq!(segunda.itens[0].valor, dec!(50));
    }

    #[tokio::test]
    async fn test_correction_failure_is_returned() {
        let server = MockServer::start().await;
        mount_base(&server, "1").await;
        Mock::given(method("POST"))
            .and(path("/api/debito_valor_corrigido.php"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = CentralBillingClient::new(&config_for(&server)).unwrap();
        let options = ConsultaOptions {
            corrigido: true,
            resolucao: false,
        };
        let result = client
            .consultar_cobrancas_at(2, "12345678909", options, today())
            .await;

        assert_eq!(result.error.as_deref(), Some("HTTP 503"));
        assert_eq!(result.status_code, Some(503));
    }

    #[tokio::test]
    async fn test_no_overdue_items_skips_second_call() {
        let server = MockServer::start().await;
        mount_base(&server, "1").await;
        Mock::given(method("POST"))
            .and(path("/api/debito_valor_corrigido.php"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = CentralBillingClient::new(&config_for(&server)).unwrap();
        let options = ConsultaOptions {
            corrigido: true,
            resolucao: false,
        };
        let before_all_due = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let result = client
            .consultar_cobrancas_at(2, "12345678909", options, before_all_due)
            .await;

        assert!(result.is_success());
        let consulta: ConsultaCobrancas = result.json().unwrap();
        assert_eq!(consulta.cobrancas[0].valor_corrigido, Some(dec!(300)));
    }

    #[tokio::test]
    async fn test_base_error_skips_correction() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404).set_body_raw(r#"{"mensagem":"Cadastro não encontrado"}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let client = CentralBillingClient::new(&config_for(&server)).unwrap();
        let options = ConsultaOptions {
            corrigido: true,
            resolucao: true,
        };
        let result = client.consultar_cobrancas_at(2, "1", options, today()).await;

        assert_eq!(result.error.as_deref(), Some("Cadastro não encontrado"));
        assert_eq!(result.status_code, Some(404));
    }

    #[tokio::test]
    async fn test_pagar_cartao() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/financeiro/cartao/pagar"))
            .and(body_json(json!({
                "regional": 2,
                "descricao": "CRECI",
                "cobrancas": [7],
                "parcelas": 2,
                "cartao": {"numero": "5555555555554444", "nome": "FULANA", "validade": "01/2031", "cvv": "999"},
                "valor": 310.0,
                "resolucao": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tid": "abc"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = CentralBillingClient::new(&config_for(&server)).unwrap();
        let card = CardDetails::new("5555555555554444", "FULANA", "01/2031", "999");
        let mut pagamento = PagamentoCartao::new(2, card, vec![7], dec!(310));
        pagamento.parcelas = 2;
        pagamento.resolucao = false;
        pagamento.descricao = Some(String::new());

        assert!(client.pagar_cartao(&pagamento).await.is_success());
    }

    #[tokio::test]
    async fn test_estornar_and_enviar_boleto() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/financeiro/cartao/estornar"))
            .and(body_json(json!({"regional": 4, "tid": "tid-1", "autorizacao": "auth-9"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/financeiro/enviar-boleto"))
            .and(body_json(json!({
                "regional": 4,
                "cobranca": 55,
                "email": "fulano@exemplo.com",
                "url": "https://boletos.exemplo.com"
            })))
            .respond_with(ResponseTemplate::new(422).set_body_raw(r#"{"mensagem":"E-mail inválido"}"#, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let client = CentralBillingClient::new(&config_for(&server)).unwrap();
        assert!(client.estornar_cartao(4, "tid-1", "auth-9").await.is_success());

        let result = client
            .enviar_boleto(4, 55, "fulano@exemplo.com", "https://boletos.exemplo.com")
            .await;
        assert_eq!(result.error.as_deref(), Some("E-mail inválido"));
    }
}
