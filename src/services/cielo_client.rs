use crate::app::config::Config;
use crate::error::{Result, ValidationError};
use crate::models::card::{CardDetails, CreditSale, SaleCreditCard, SaleCustomer, SalePayment, SaleRequest};
use crate::models::http::HttpResult;
use crate::services::card_brand;
use crate::services::http_client::{HttpClient, HttpClientConfig};
use crate::utils::installments;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::{info, warn};
use url::form_urlencoded;

pub const TRANSACTIONS_URL: &str = "https://api.cieloecommerce.cielo.com.br";
pub const QUERIES_URL: &str = "https://apiquery.cieloecommerce.cielo.com.br";
pub const SANDBOX_TRANSACTIONS_URL: &str = "https://apisandbox.cieloecommerce.cielo.com.br";
pub const SANDBOX_QUERIES_URL: &str = "https://apiquerysandbox.cieloecommerce.cielo.com.br";

const MAX_MERCHANT_ORDER_ID_LEN: usize = 50;
const MAX_DESCRIPTION_LEN: usize = 13;

/// Caracteres que não podem aparecer crus num segmento de caminho.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CieloCredentials {
    /// Identifica o recebedor. Tamanho 36.
    pub merchant_id: String,
    /// Chave de uso da API. Tamanho 40.
    pub merchant_key: String,
}

/// Cliente do gateway de pagamentos Cielo.
///
/// Transações são criadas e alteradas no host de transações; consultas usam o
/// host de consultas. Os dados do cartão são passados a cada chamada.
#[derive(Debug, Clone)]
pub struct CieloClient {
    transactions: HttpClient,
    queries: HttpClient,
}

impl CieloClient {
    pub fn new(credentials: &CieloCredentials, sandbox: bool, http_config: &HttpClientConfig) -> Result<Self> {
        let (transactions_url, queries_url) = if sandbox {
            (SANDBOX_TRANSACTIONS_URL, SANDBOX_QUERIES_URL)
        } else {
            (TRANSACTIONS_URL, QUERIES_URL)
        };
        Self::with_base_urls(credentials, transactions_url, queries_url, http_config)
    }

    pub fn with_base_urls(
        credentials: &CieloCredentials,
        transactions_url: &str,
        queries_url: &str,
        http_config: &HttpClientConfig,
    ) -> Result<Self> {
        let build = |base_url: &str| -> Result<HttpClient> {
            Ok(HttpClient::new(base_url, http_config)?
                .with_header("MerchantId", credentials.merchant_id.as_str())
                .with_header("MerchantKey", credentials.merchant_key.as_str()))
        };

        Ok(Self {
            transactions: build(transactions_url)?,
            queries: build(queries_url)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = CieloCredentials {
            merchant_id: config.cielo_merchant_id.clone(),
            merchant_key: config.cielo_merchant_key.clone(),
        };
        Self::new(&credentials, config.cielo_sandbox, &config.http_config())
    }

    pub fn transactions_url(&self) -> &str {
        self.transactions.base_url()
    }

    pub fn queries_url(&self) -> &str {
        self.queries.base_url()
    }

    /// Cria uma transação no cartão de crédito.
    ///
    /// Nenhuma requisição é feita se os dados forem inválidos.
    pub async fn criar_transacao_credito(
        &self,
        card: &CardDetails,
        sale: &CreditSale,
    ) -> std::result::Result<HttpResult, ValidationError> {
        let request = match build_sale_request(card, sale) {
            Ok(request) => request,
            Err(e) => {
                warn!("Credit sale {} rejected: {}", sale.merchant_order_id, e);
                return Err(e);
            }
        };

        info!(
            "Creating credit sale {} of {} cents in {} installment(s), card {}",
            sale.merchant_order_id,
            sale.amount_cents,
            sale.installments,
            card.masked_number()
        );

        let result = match serde_json::to_string(&request) {
            Ok(body) => self.transactions.post("/1/sales/", body).await,
            Err(e) => HttpResult::from_error(self.transactions.url_for("/1/sales/"), e.to_string()),
        };
        Ok(result)
    }

    pub async fn consultar_por_payment_id(&self, payment_id: &str) -> HttpResult {
        self.queries.get(&format!("/1/sales/{}", segment(payment_id))).await
    }

    /// Consulta pelo número de referência da transação na adquirente (TId).
    pub async fn consultar_por_tid(&self, tid: &str) -> HttpResult {
        self.queries.get(&format!("/1/sales/acquirerTid/{}", segment(tid))).await
    }

    /// Obtém o PaymentId a partir do identificador atribuído na criação.
    pub async fn consultar_por_merchant_order_id(&self, merchant_order_id: &str) -> HttpResult {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("merchantOrderId", merchant_order_id)
            .finish();
        self.queries.get(&format!("/1/sales?{}", query)).await
    }

    /// Cancelamento total pelo MerchantOrderId. Valor em centavos.
    pub async fn cancelar_por_merchant_order_id(&self, merchant_order_id: &str, amount_cents: i64) -> HttpResult {
        info!("Voiding order {} ({} cents)", merchant_order_id, amount_cents);
        self.transactions
            .put(&format!(
                "/1/sales/OrderId/{}/void?amount={}",
                segment(merchant_order_id),
                amount_cents
            ))
            .await
    }

    /// Cancelamento total pelo PaymentId. Valor em centavos.
    pub async fn cancelar_por_payment_id(&self, payment_id: &str, amount_cents: i64) -> HttpResult {
        info!("Voiding payment {} ({} cents)", payment_id, amount_cents);
        self.void_payment(payment_id, amount_cents).await
    }

    /// Cancela parte do valor autorizado. Pode ser repetido até zerar a transação.
    pub async fn cancelamento_parcial(&self, payment_id: &str, amount_cents: i64) -> HttpResult {
        info!("Partially voiding payment {} ({} cents)", payment_id, amount_cents);
        self.void_payment(payment_id, amount_cents).await
    }

    /// Captura posterior de uma transação apenas autorizada (prazo de 15 dias).
    pub async fn capturar(&self, payment_id: &str) -> HttpResult {
        info!("Capturing payment {}", payment_id);
        self.transactions
            .put(&format!("/1/sales/{}/capture", segment(payment_id)))
            .await
    }

    /// Valor de cada parcela, em centavos, da primeira à última.
    pub fn estimar_parcelas(total_cents: i64, count: usize) -> Result<Vec<i64>> {
        installments::split(total_cents, count)
    }

    async fn void_payment(&self, payment_id: &str, amount_cents: i64) -> HttpResult {
        self.transactions
            .put(&format!("/1/sales/{}/void?amount={}", segment(payment_id), amount_cents))
            .await
    }
}

/// Valida a venda e monta o payload do gateway.
///
/// As regras são verificadas em ordem e a primeira falha é retornada.
pub fn build_sale_request<'a>(
    card: &'a CardDetails,
    sale: &'a CreditSale,
) -> std::result::Result<SaleRequest<'a>, ValidationError> {
    // Limites do gateway contados em bytes.
    if sale.merchant_order_id.len() > MAX_MERCHANT_ORDER_ID_LEN {
        return Err(ValidationError::MerchantOrderIdTooLong);
    }
    if sale.description.len() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooLong);
    }
    let expiration_date = card.normalized_expiry()?;
    if sale.amount_cents <= 0 {
        return Err(ValidationError::NonPositiveAmount);
    }

    let brand = card_brand::classify(&card.number).ok_or(ValidationError::UnknownBrand)?;
    if !brand.is_accepted() {
        return Err(ValidationError::UnsupportedBrand(brand.to_string()));
    }

    Ok(SaleRequest {
        merchant_order_id: &sale.merchant_order_id,
        customer: SaleCustomer {
            name: &card.holder_name,
        },
        payment: SalePayment {
            payment_type: "CreditCard",
            capture: sale.auto_capture,
            amount: sale.amount_cents,
            installments: sale.installments,
            soft_descriptor: &sale.description,
            credit_card: SaleCreditCard {
                card_number: &card.number,
                holder: &card.holder_name,
                expiration_date,
                security_code: &card.cvv,
                brand: brand.name(),
            },
        },
    })
}
