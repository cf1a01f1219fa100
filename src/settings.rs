use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

/// Process settings, read from the environment at startup.
///
/// Recognised variables:
/// - `DATABASE_URL` — MongoDB connection string
/// - `DATABASE_NAME` — database to use
/// - `HOST` (default `0.0.0.0`)
/// - `PORT` (default `8000`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub database_name: Option<String>,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(config::Environment::default().try_parsing(true))
    }

    fn from_source(
        source: impl config::Source + Send + Sync + 'static,
    ) -> Result<Self, config::ConfigError> {
        let mut settings: Self = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;

        // An empty variable counts as unset.
        settings.database_url = settings.database_url.filter(|v| !v.is_empty());
        settings.database_name = settings.database_name.filter(|v| !v.is_empty());
        Ok(settings)
    }

    /// Both the connection string and the database name are present.
    pub fn database_configured(&self) -> bool {
        self.database_url.is_some() && self.database_name.is_some()
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: None,
            database_name: None,
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
