use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Erros locais da biblioteca.
///
/// Falhas remotas (rede, timeout, HTTP >= 400) não passam por aqui: elas viajam
/// dentro de `HttpResult::error` para o chamador decidir o que fazer.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unknown region id: {0}")]
    UnknownRegion(u32),

    #[error("Invalid installment split: total {total} in {count} installments")]
    InvalidInstallments { total: i64, count: usize },

    #[error("Invalid column name: {0}")]
    InvalidColumn(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Rejeições feitas antes de criar uma transação no gateway de cartão.
///
/// As mensagens são exibidas ao usuário final, por isso ficam em português.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("O identificador atribuído a transação está muito longo. O limite é de 50 digitos.")]
    MerchantOrderIdTooLong,

    #[error("A descrição está acima do comprimento permitido de 13 caracteres.")]
    DescriptionTooLong,

    #[error("A validade do cartão precisa ser informada no formato MM/AAAA.")]
    InvalidExpiry,

    #[error("Não é possível realizar uma transação com valor zero.")]
    NonPositiveAmount,

    #[error("A bandeira do cartão informado não é aceita no momento.")]
    UnknownBrand,

    #[error("A bandeira do cartão informado não é aceita no momento. ({0})")]
    UnsupportedBrand(String),
}
