//! Authentication wrappers for metrics endpoints that require an API key.

mod api_key;
mod url_param;

pub use api_key::ApiKey;
pub use url_param::UrlParam;
