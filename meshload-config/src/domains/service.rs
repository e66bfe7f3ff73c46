//! Service identity configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Identity of the emulated service node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service name, prefixed to every service identity tag in responses
    #[serde(default = "default_service_name")]
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
        }
    }
}

impl ServiceConfig {
    /// Identity tag reported for executions of `endpoint`
    pub fn identity_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.name, endpoint)
    }
}

impl Validatable for ServiceConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.name, "name", self.domain_name())?;

        if self.name.contains('/') {
            return Err(self.validation_error("name cannot contain '/'"));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "service"
    }
}

fn default_service_name() -> String {
    "meshload".to_string()
}
