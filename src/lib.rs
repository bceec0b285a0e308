//! Clientes das APIs do Conselho (central e regionais), do gateway Cielo e
//! utilitários de cobrança usados pelo sistema dos CRECIs.

pub mod app;
pub mod error;
pub mod lookup;
pub mod models;
pub mod repository;
pub mod services;
pub mod utils;

pub use app::config::Config;
pub use error::{Error, Result, ValidationError};
pub use models::http::{BinaryContent, HttpResult};
