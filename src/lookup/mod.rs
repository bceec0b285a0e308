//! Tabelas fixas do domínio: regionais e textos do cadastro.

pub mod labels;
pub mod regions;
