//! Alpaca market data REST source (`data.alpaca.markets`).

pub mod params;
pub mod provider;
pub mod response;

use secrecy::SecretString;
use shared_utils::env::{MissingEnvVarError, get_secret_var};

pub use params::{AlpacaBarsParams, Feed};
pub use provider::AlpacaProvider;

/// API key pair shared by the Alpaca market data and trading APIs.
#[derive(Clone)]
pub struct AlpacaCredentials {
    pub key_id: SecretString,
    pub secret_key: SecretString,
}

impl AlpacaCredentials {
    /// Reads `APCA_API_KEY_ID` and `APCA_API_SECRET_KEY`.
    pub fn from_env() -> Result<Self, MissingEnvVarError> {
        Ok(Self {
            key_id: get_secret_var("APCA_API_KEY_ID")?,
            secret_key: get_secret_var("APCA_API_SECRET_KEY")?,
        })
    }
}
