//! Repositório dos débitos (`financeiro`) e do seu detalhamento
//! (`financeiro_agrupamento`).
//!
//! O SQL é montado aqui a partir das colunas injetadas em [`TableColumns`];
//! a execução fica com um [`BillingStore`].

pub mod mysql;
pub mod sql;

use crate::error::Result;
use async_trait::async_trait;
use tracing::{info, warn};

pub use mysql::MySqlBillingStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Int(Option<i64>),
    Text(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

/// Comandos para clonar as linhas de detalhamento de um débito.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownClonePlan {
    /// Parâmetro: id do débito de origem.
    pub select_ids: String,
    /// Parâmetro: id da linha de origem.
    pub insert_row: String,
    /// Parâmetros: id do novo débito, id da nova linha.
    pub repoint_row: String,
}

/// Tudo o que precisa rodar, numa única transação, para clonar um débito.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClonePlan {
    pub source_id: i64,
    /// Parâmetro: `source_id`.
    pub insert_record: String,
    /// Parâmetro: id do novo débito.
    pub reset_created_at: Option<String>,
    pub breakdown: Option<BreakdownClonePlan>,
}

#[async_trait]
pub trait BillingStore: Send + Sync {
    /// Executa o plano numa transação. `None` quando a linha de origem não existe.
    async fn execute_clone(&self, plan: &ClonePlan) -> Result<Option<i64>>;

    /// Retorna o número de linhas afetadas.
    async fn execute(&self, statement: &Statement) -> Result<u64>;
}

/// Colunas das tabelas, informadas por quem monta o repositório.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableColumns {
    pub record: Vec<String>,
    pub breakdown: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneOptions {
    /// Mantém `DataCadastro`/`HoraCadastro` da origem.
    pub preserve_created_at: bool,
    pub clone_breakdown: bool,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            preserve_created_at: false,
            clone_breakdown: true,
        }
    }
}

pub struct BillingRecords<S> {
    store: S,
    columns: TableColumns,
}

impl<S: BillingStore> BillingRecords<S> {
    pub fn new(store: S, columns: TableColumns) -> Self {
        Self { store, columns }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clone_plan(&self, id: i64, options: CloneOptions) -> Result<ClonePlan> {
        let insert_record = sql::insert_copy(sql::RECORD_TABLE, &self.columns.record)?;
        let reset_created_at = if options.preserve_created_at {
            None
        } else {
            Some(sql::reset_created_at(sql::RECORD_TABLE)?)
        };
        let breakdown = if options.clone_breakdown {
            Some(BreakdownClonePlan {
                select_ids: sql::select_breakdown_ids(),
                insert_row: sql::insert_copy(sql::BREAKDOWN_TABLE, &self.columns.breakdown)?,
                repoint_row: sql::repoint_breakdown(!options.preserve_created_at),
            })
        } else {
            None
        };

        Ok(ClonePlan {
            source_id: id,
            insert_record,
            reset_created_at,
            breakdown,
        })
    }

    /// Cria uma cópia do débito e devolve o novo id.
    pub async fn clone_record(&self, id: i64, options: CloneOptions) -> Result<Option<i64>> {
        let plan = self.clone_plan(id, options)?;
        let new_id = self.store.execute_clone(&plan).await?;
        match new_id {
            Some(new_id) => info!("Billing record {} cloned as {}", id, new_id),
            None => warn!("Billing record {} not found, nothing cloned", id),
        }
        Ok(new_id)
    }

    pub fn soft_delete_statement(id: i64, actor_id: Option<i64>, note: Option<&str>) -> Statement {
        let note = note.filter(|n| !n.is_empty()).map(str::to_string);
        Statement {
            sql: sql::soft_delete(),
            params: vec![
                SqlParam::Int(actor_id),
                SqlParam::Text(note.clone()),
                SqlParam::Text(note.clone()),
                SqlParam::Text(note),
                SqlParam::Int(Some(id)),
            ],
        }
    }

    /// Marca o débito como excluído. `false` se o id não existir.
    pub async fn soft_delete(&self, id: i64, actor_id: Option<i64>, note: Option<&str>) -> Result<bool> {
        let statement = Self::soft_delete_statement(id, actor_id, note);
        let affected = self.store.execute(&statement).await?;
        info!("Billing record {} soft-deleted: {} row(s)", id, affected);
        Ok(affected > 0)
    }
}
