use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::models::card::CardDetails;

pub const DEFAULT_DESCRIPTION: &str = "CRECI";

/// Resposta de `/financeiro/consultar-cobrancas`.
///
/// Campos desconhecidos são mantidos em `extra` para que o corpo devolvido ao
/// chamador, depois da correção, continue com tudo que a API enviou.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultaCobrancas {
    #[serde(default)]
    pub cobrancas: Vec<Cobranca>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cobranca {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor_corrigido: Option<Decimal>,
    #[serde(default)]
    pub itens: Vec<ItemCobranca>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Débito da tabela `financeiro` que compõe uma cobrança.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCobranca {
    pub id: i64,
    pub valor: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor_corrigido: Option<Decimal>,
    #[serde(default)]
    pub vencimento: Option<NaiveDate>,
    #[serde(default)]
    pub pago: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemCobranca {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.pago && self.vencimento.map_or(false, |due| due < today)
    }

    pub fn effective_value(&self) -> Decimal {
        self.valor_corrigido.unwrap_or(self.valor)
    }
}

impl Cobranca {
    pub fn corrected_total(&self) -> Decimal {
        self.itens.iter().map(ItemCobranca::effective_value).sum()
    }
}

impl ConsultaCobrancas {
    /// IDs dos débitos vencidos e não pagos, na ordem em que aparecem.
    pub fn overdue_item_ids(&self, today: NaiveDate) -> Vec<i64> {
        self.cobrancas
            .iter()
            .flat_map(|c| c.itens.iter())
            .filter(|item| item.is_overdue(today))
            .map(|item| item.id)
            .collect()
    }

    /// Aplica os valores corrigidos nos débitos vencidos.
    ///
    /// Débito sem correção retornada fica com o valor original. O total corrigido
    /// de cada cobrança passa a ser a soma dos seus débitos.
    pub fn apply_corrections(&mut self, corrections: &[BillingCorrection], today: NaiveDate) {
        let by_id: HashMap<i64, Decimal> = corrections.iter().map(|c| (c.id, c.valor)).collect();

        for cobranca in &mut self.cobrancas {
            for item in &mut cobranca.itens {
                if item.is_overdue(today) {
                    item.valor_corrigido = Some(by_id.get(&item.id).copied().unwrap_or(item.valor));
                }
            }
            cobranca.valor_corrigido = Some(cobranca.corrected_total());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingCorrection {
    pub id: i64,
    pub valor: Decimal,
}

/// Resposta de `/debito_valor_corrigido.php`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValoresCorrigidos {
    #[serde(default)]
    pub valores: Vec<BillingCorrection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrectionRequest<'a> {
    pub id: &'a [i64],
    pub resolucao: bool,
}

/// Cartão no formato das APIs do Conselho.
#[derive(Clone, Serialize)]
pub struct CartaoPayload<'a> {
    pub numero: &'a str,
    pub nome: &'a str,
    pub validade: &'a str,
    pub cvv: &'a str,
}

impl<'a> From<&'a CardDetails> for CartaoPayload<'a> {
    fn from(card: &'a CardDetails) -> Self {
        Self {
            numero: &card.number,
            nome: &card.holder_name,
            validade: &card.expiry,
            cvv: &card.cvv,
        }
    }
}

/// Pagamento de cobranças com cartão de crédito.
#[derive(Debug, Clone)]
pub struct PagamentoCartao {
    pub regional: u32,
    pub card: CardDetails,
    pub cobrancas: Vec<i64>,
    pub valor: Decimal,
    pub parcelas: u32,
    /// Nome na fatura, sem acentos e em caixa alta. Vazio usa `DEFAULT_DESCRIPTION`.
    pub descricao: Option<String>,
    /// O valor será conferido com a soma corrigida pela resolução.
    pub resolucao: bool,
}

impl PagamentoCartao {
    pub fn new(regional: u32, card: CardDetails, cobrancas: Vec<i64>, valor: Decimal) -> Self {
        Self {
            regional,
            card,
            cobrancas,
            valor,
            parcelas: 1,
            descricao: None,
            resolucao: true,
        }
    }

    pub fn description(&self) -> &str {
        self.descricao
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION)
    }

    /// Corpo JSON; o regional só vai no corpo da API central.
    pub fn to_json(&self, include_region: bool) -> Value {
        let mut body = serde_json::json!({
            "descricao": self.description(),
            "cobrancas": self.cobrancas,
            "parcelas": self.parcelas,
            "cartao": CartaoPayload::from(&self.card),
            "valor": self.valor,
            "resolucao": self.resolucao,
        });
        if include_region {
            body["regional"] = Value::from(self.regional);
        }
        body
    }
}
