//! Cross-origin access for browser clients.

use actix_cors::Cors;

/// CORS policy for the whole app. With no configured origins any origin is
/// accepted; otherwise only the listed ones.
pub fn cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::permissive();
    }

    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}
