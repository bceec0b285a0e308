pub mod billing_client;
pub mod card_brand;
pub mod cielo_client;
pub mod http_client;
pub mod regional_client;

pub use billing_client::{CentralBillingClient, ConsultaOptions};
pub use card_brand::CardBrand;
pub use cielo_client::{CieloClient, CieloCredentials};
pub use http_client::{HttpClient, HttpClientConfig};
pub use regional_client::RegionalClient;
