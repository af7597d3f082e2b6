//! Google API endpoint derivation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Google APIs used by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiEndpoint {
    Bq,
    Compute,
    Secret,
    Storage,
    Tpu,
}

impl ApiEndpoint {
    /// Service host label under the universe domain.
    pub fn service(&self) -> &'static str {
        match self {
            ApiEndpoint::Bq => "bq",
            ApiEndpoint::Compute => "compute",
            ApiEndpoint::Secret => "secret_manager",
            ApiEndpoint::Storage => "storage",
            ApiEndpoint::Tpu => "tpu",
        }
    }

    /// `https://<service>.<universe_domain>/<version>/`
    pub fn url(&self, universe_domain: &str, version: &str) -> String {
        format!(
            "https://{}.{}/{}/",
            self.service(),
            universe_domain.trim_matches('.'),
            version.trim_matches('/')
        )
    }
}

impl fmt::Display for ApiEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.service())
    }
}
