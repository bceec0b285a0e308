pub mod installments;
pub mod money;
