// Parcelamento de valores no cartão de crédito

use crate::error::{Error, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Tipos de receita que permitem parcelamento estendido.
const EXTENDED_REVENUE_TYPES: [i32; 3] = [22, 26, 30];

/// Divide `total_cents` em `count` parcelas inteiras.
///
/// Todas recebem `total / count`; o resto é distribuído centavo por centavo a
/// partir da primeira parcela.
pub fn split(total_cents: i64, count: usize) -> Result<Vec<i64>> {
    if total_cents < 0 || count == 0 {
        return Err(Error::InvalidInstallments {
            total: total_cents,
            count,
        });
    }

    let n = count as i64;
    let base = total_cents / n;
    let remainder = (total_cents % n) as usize;

    Ok((0..count)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect())
}

/// Limite de parcelas para pagar uma cobrança sozinha.
pub fn installment_limit(revenue_type: i32) -> u32 {
    if EXTENDED_REVENUE_TYPES.contains(&revenue_type) {
        5
    } else {
        3
    }
}

/// Limite de parcelas quando a cobrança é paga junto com outras.
pub fn installment_limit_combined(revenue_type: i32) -> u32 {
    if EXTENDED_REVENUE_TYPES.contains(&revenue_type) {
        12
    } else {
        3
    }
}

/// Maior número de parcelas que respeita um valor mínimo por parcela.
pub fn installment_limit_with_minimum(total: Decimal, min_installment: Decimal, max: u32) -> u32 {
    if min_installment <= Decimal::ZERO {
        return max;
    }
    let by_value = (total / min_installment).floor().to_u32().unwrap_or(0);
    by_value.min(max)
}
