pub mod billing;
pub mod card;
pub mod http;
