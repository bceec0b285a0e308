//! Comandos SQL usados pelo repositório de débitos.
//!
//! Todos usam parâmetros posicionais (`?`) e identificadores entre crases.

use crate::error::{Error, Result};

pub const RECORD_TABLE: &str = "financeiro";
pub const BREAKDOWN_TABLE: &str = "financeiro_agrupamento";
pub const DELETED_STATUS: i64 = 4;
pub const NOTE_SEPARATOR: &str = " | ";

const PRIMARY_KEY: &str = "id";

fn quote(identifier: &str) -> Result<String> {
    let valid = !identifier.is_empty()
        && identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(Error::InvalidColumn(identifier.to_string()));
    }
    Ok(format!("`{}`", identifier))
}

/// Lista de colunas copiáveis, sem a chave primária.
pub fn copy_columns(columns: &[String]) -> Result<String> {
    let quoted = columns
        .iter()
        .filter(|c| !c.eq_ignore_ascii_case(PRIMARY_KEY))
        .map(|c| quote(c))
        .collect::<Result<Vec<_>>>()?;

    if quoted.is_empty() {
        return Err(Error::InvalidColumn(String::new()));
    }
    Ok(quoted.join(", "))
}

/// Copia uma linha para uma nova. Parâmetro: id de origem.
pub fn insert_copy(table: &str, columns: &[String]) -> Result<String> {
    let table = quote(table)?;
    let columns = copy_columns(columns)?;
    Ok(format!(
        "INSERT INTO {table} ({columns}) SELECT {columns} FROM {table} WHERE `id` = ?"
    ))
}

/// Parâmetro: id da linha.
pub fn reset_created_at(table: &str) -> Result<String> {
    Ok(format!(
        "UPDATE {} SET `DataCadastro` = CURRENT_DATE, `HoraCadastro` = CURRENT_TIME WHERE `id` = ?",
        quote(table)?
    ))
}

/// Parâmetro: id do débito de origem.
pub fn select_breakdown_ids() -> String {
    format!(
        "SELECT CAST(`id` AS SIGNED) FROM `{}` WHERE `idFinanceiro` = ? ORDER BY `id`",
        BREAKDOWN_TABLE
    )
}

/// Aponta uma linha de agrupamento para o novo débito.
/// Parâmetros: id do novo débito, id da linha.
pub fn repoint_breakdown(reset_created_at: bool) -> String {
    let timestamps = if reset_created_at {
        ", `DataCadastro` = CURRENT_DATE, `HoraCadastro` = CURRENT_TIME"
    } else {
        ""
    };
    format!(
        "UPDATE `{}` SET `idFinanceiro` = ?{} WHERE `id` = ?",
        BREAKDOWN_TABLE, timestamps
    )
}

/// Exclusão lógica. Parâmetros: usuário, observação (três vezes), id.
pub fn soft_delete() -> String {
    format!(
        "UPDATE `{table}` SET `Status` = {status}, `idQuemDeletou` = ?, \
         `DataDelete` = CURRENT_DATE, `HoraDelete` = CURRENT_TIME, \
         `Observacoes` = CASE \
         WHEN ? IS NULL THEN `Observacoes` \
         WHEN `Observacoes` IS NULL OR LENGTH(`Observacoes`) = 0 THEN ? \
         ELSE CONCAT(`Observacoes`, '{separator}', ?) END \
         WHERE `id` = ?",
        table = RECORD_TABLE,
        status = DELETED_STATUS,
        separator = NOTE_SEPARATOR,
    )
}
