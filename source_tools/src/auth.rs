use base64::{engine::general_purpose::STANDARD, Engine as _};
use order_integration_engine::db_types::AuthDescriptor;

/// The username paired with the secret for basic auth
pub const BASIC_AUTH_USERNAME: &str = "user";
pub const API_KEY_HEADER: &str = "X-API-Key";

/// The header that carries the integration's credential, if it has one.
pub fn auth_header(auth: &AuthDescriptor) -> Option<(&'static str, String)> {
    match auth {
        AuthDescriptor::None => None,
        AuthDescriptor::Basic(secret) => {
            let credentials = STANDARD.encode(format!("{BASIC_AUTH_USERNAME}:{}", secret.reveal()));
            Some(("Authorization", format!("Basic {credentials}")))
        },
        AuthDescriptor::Bearer(secret) => Some(("Authorization", format!("Bearer {}", secret.reveal()))),
        AuthDescriptor::ApiKey(secret) => Some((API_KEY_HEADER, secret.reveal().clone())),
    }
}
