use serde::{Deserialize, Serialize};

/// Routing target for every request built by a client instance.
///
/// The environment is bound when the client is constructed. Callers that need
/// both environments at once hold two client instances instead of flipping a
/// shared switch mid-flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Integration,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Integration => "integration",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub environment: Environment,
    /// Base URL for production traffic.
    #[serde(default = "default_production_url")]
    pub production_url: String,
    /// Base URL for the integration deployment.
    #[serde(default = "default_integration_url")]
    pub integration_url: String,
}

fn default_production_url() -> String {
    "https://api.cloudinsight.alertlogic.com".to_string()
}

fn default_integration_url() -> String {
    "https://api.product.dev.alertlogic.com".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            production_url: default_production_url(),
            integration_url: default_integration_url(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from `AIMS_`-prefixed environment variables
    /// (e.g. `AIMS_ENVIRONMENT=integration`). Unset values fall back to
    /// the defaults above.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("AIMS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize::<ClientConfig>()
    }

    pub fn base_url(&self, environment: Environment) -> &str {
        match environment {
            Environment::Production => &self.production_url,
            Environment::Integration => &self.integration_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_route_to_production() {
        let config = ClientConfig::default();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(
            config.base_url(Environment::Integration),
            config.integration_url
        );
    }
}
