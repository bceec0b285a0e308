use crate::app::config::Config;
use crate::error::{Error, Result};
use crate::lookup::regions;
use crate::models::billing::{BillingCorrection, CorrectionRequest, PagamentoCartao, ValoresCorrigidos};
use crate::models::http::{BinaryContent, HttpResult};
use crate::services::http_client::HttpClient;
use crate::utils::money::digits_only;
use tracing::{info, warn};

/// Cliente da API hospedada no site de cada regional
/// (`https://www.creci{uf}.conselho.net.br/api`).
#[derive(Debug, Clone)]
pub struct RegionalClient {
    regional: u32,
    http: HttpClient,
    site_url: String,
    photo_site_url: String,
}

impl RegionalClient {
    pub fn new(regional: u32, config: &Config) -> Result<Self> {
        let uf = regions::id_to_state_code(regional).ok_or(Error::UnknownRegion(regional))?;
        let site_url = config
            .regional_site_template
            .replace("{uf}", &uf)
            .trim_end_matches('/')
            .to_string();
        let photo_site_url = config
            .regional_photo_site_template
            .replace("{uf}", &uf)
            .trim_end_matches('/')
            .to_string();

        let http = HttpClient::new(format!("{}/api", site_url), &config.http_config())?;

        Ok(Self {
            regional,
            http,
            site_url,
            photo_site_url,
        })
    }

    pub fn regional(&self) -> u32 {
        self.regional
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Valor corrigido dos débitos informados (IDs da tabela `financeiro`).
    pub async fn valor_corrigido(&self, ids: &[i64], resolucao: bool) -> HttpResult {
        let body = CorrectionRequest { id: ids, resolucao };
        match serde_json::to_string(&body) {
            Ok(body) => self.http.post("/debito_valor_corrigido.php", body).await,
            Err(e) => HttpResult::from_error(self.http.url_for("/debito_valor_corrigido.php"), e.to_string()),
        }
    }

    /// Igual a `valor_corrigido`, mas já decodificado. `None` em qualquer falha.
    pub async fn debitos_corrigidos(&self, ids: &[i64], resolucao: bool) -> Option<Vec<BillingCorrection>> {
        let result = self.valor_corrigido(ids, resolucao).await;
        if !result.is_success() {
            warn!(
                "Correction lookup failed for region {}: {:?}",
                self.regional,
                result.error
            );
            return None;
        }
        result.json::<ValoresCorrigidos>().map(|v| v.valores)
    }

    /// Paga cobranças com cartão de crédito pela integração Cielo do regional.
    pub async fn pagamento_cartao_cielo(&self, pagamento: &PagamentoCartao) -> HttpResult {
        info!(
            "Card payment on region {} for {} charge(s), card {}",
            self.regional,
            pagamento.cobrancas.len(),
            pagamento.card.masked_number()
        );
        self.http
            .post("/pagamento_cartao_cielo.php", pagamento.to_json(false).to_string())
            .await
    }

    /// Gera uma nova emissão, com valor corrigido, para cobranças vencidas.
    pub async fn atualizar_cobrancas(&self, ids: &[i64]) -> HttpResult {
        match serde_json::to_string(ids) {
            Ok(body) => self.http.post("/atualizar_cobranca.php", body).await,
            Err(e) => HttpResult::from_error(self.http.url_for("/atualizar_cobranca.php"), e.to_string()),
        }
    }

    pub async fn foto_cadastro(&self, cpf: &str) -> Option<BinaryContent> {
        let url = format!(
            "{}/images/cadastro/fotos/api.php?cpf={}",
            self.photo_site_url,
            digits_only(cpf)
        );
        self.http.fetch_binary(&url).await
    }

    pub async fn assinatura_cadastro(&self, cpf: &str) -> Option<BinaryContent> {
        let url = format!(
            "{}/images/cadastro/assinaturas/api.php?cpf={}",
            self.site_url,
            digits_only(cpf)
        );
        self.http.fetch_binary(&url).await
    }

    /// Assinatura de um usuário do sistema. `generico` devolve uma imagem padrão
    /// quando o usuário não tiver assinatura.
    pub async fn assinatura_usuario(&self, user_id: i64, generico: bool) -> Option<BinaryContent> {
        let mut url = format!("{}/assinatura_usuario.php?id={}", self.http.base_url(), user_id);
        if generico {
            url.push_str("&generico=1");
        }
        self.http.fetch_binary(&url).await
    }
}
