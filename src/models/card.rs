use serde::Serialize;
use std::fmt;

use crate::error::ValidationError;

/// Dados do cartão de crédito usados em uma transação.
///
/// `number` deve conter apenas dígitos e `expiry` vir como `MM/YY` ou `MM/YYYY`.
#[derive(Clone, PartialEq, Eq)]
pub struct CardDetails {
    pub number: String,
    pub holder_name: String,
    pub expiry: String,
    pub cvv: String,
}

impl CardDetails {
    pub fn new(
        number: impl Into<String>,
        holder_name: impl Into<String>,
        expiry: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            holder_name: holder_name.into(),
            expiry: expiry.into(),
            cvv: cvv.into(),
        }
    }

    /// Validade no formato `MM/YYYY`; `MM/YY` ganha o prefixo "20" no ano.
    pub fn normalized_expiry(&self) -> Result<String, ValidationError> {
        match self.expiry.chars().count() {
            7 => Ok(self.expiry.clone()),
            5 if self.expiry.is_ascii() => {
                Ok(format!("{}20{}", &self.expiry[..3], &self.expiry[3..]))
            }
            _ => Err(ValidationError::InvalidExpiry),
        }
    }

    pub fn masked_number(&self) -> String {
        let digits = self.number.chars().count();
        let visible: String = self.number.chars().skip(digits.saturating_sub(4)).collect();
        format!("{}{}", "*".repeat(digits.saturating_sub(4)), visible)
    }
}

// Número completo e CVV nunca aparecem em logs.
impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &self.masked_number())
            .field("holder_name", &self.holder_name)
            .field("expiry", &self.expiry)
            .field("cvv", &"***")
            .finish()
    }
}

/// Venda no crédito a ser criada no gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditSale {
    /// Identificador atribuído por nós à transação. Até 50 caracteres.
    pub merchant_order_id: String,
    /// Complemento do nome da loja na fatura. Até 13 caracteres, sem especiais.
    pub description: String,
    /// Valor em centavos. Ex. 17 reais = 1700.
    pub amount_cents: i64,
    pub installments: u32,
    /// `false` deixa a transação apenas autorizada, para captura posterior.
    pub auto_capture: bool,
}

impl CreditSale {
    pub fn new(merchant_order_id: impl Into<String>, description: impl Into<String>, amount_cents: i64) -> Self {
        Self {
            merchant_order_id: merchant_order_id.into(),
            description: description.into(),
            amount_cents,
            installments: 1,
            auto_capture: true,
        }
    }
}

// Payload enviado ao gateway em POST /1/sales/
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SaleRequest<'a> {
    pub merchant_order_id: &'a str,
    pub customer: SaleCustomer<'a>,
    pub payment: SalePayment<'a>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SaleCustomer<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SalePayment<'a> {
    #[serde(rename = "Type")]
    pub payment_type: &'static str,
    pub capture: bool,
    pub amount: i64,
    pub installments: u32,
    pub soft_descriptor: &'a str,
    pub credit_card: SaleCreditCard<'a>,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SaleCreditCard<'a> {
    pub card_number: &'a str,
    pub holder: &'a str,
    pub expiration_date: String,
    pub security_code: &'a str,
    pub brand: &'static str,
}

impl fmt::Debug for SaleCreditCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaleCreditCard")
            .field("holder", &self.holder)
            .field("brand", &self.brand)
            .finish_non_exhaustive()
    }
}
