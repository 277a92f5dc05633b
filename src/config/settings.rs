use config::{Config, ConfigError, Environment, File, FileFormat, Map};
use serde::Deserialize;
use std::{env, fmt};

const DEFAULT_CONFIG_FILE: &str = "conf/config.toml";
const DEFAULT_SERVER_REQUEST_TIMEOUT: u64 = 60;
const DEFAULT_FACE_API_REQUEST_TIMEOUT: u64 = 10;
// detect, identify and person lookup run back to back
const FACE_API_CALLS_PER_REQUEST: u64 = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct App {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub http_port: u16,
    pub request_timeout: Option<u64>,
    pub body_limit_mb: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaceApi {
    pub endpoint: String,
    pub subscription_key: String,
    pub request_timeout: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tracer {
    pub uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Option<Logger>,
    pub face_api: FaceApi,
    pub tracer: Option<Tracer>,
    pub app: App,
}

impl Settings {
    /// Reads `.env`, `conf/config.toml` and the process environment.
    pub fn new() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::load(Some(DEFAULT_CONFIG_FILE), env::vars().collect())
    }

    pub fn load(config_file: Option<&str>, vars: Map<String, String>) -> Result<Self, ConfigError> {
        let run_mode = vars
            .get("RUN_MODE")
            .cloned()
            .unwrap_or_else(|| "development".into());

        let mut builder = Config::builder()
            .set_default("app.name", env!("CARGO_PKG_NAME"))?
            .set_default("server.http_port", 5000_i64)?
            .set_default("server.request_timeout", DEFAULT_SERVER_REQUEST_TIMEOUT as i64)?
            .set_default("server.body_limit_mb", 16_i64)?
            .set_default("face_api.request_timeout", DEFAULT_FACE_API_REQUEST_TIMEOUT as i64)?;

        if let Some(config_file) = config_file {
            builder = builder
                .add_source(File::with_name(config_file).format(FileFormat::Toml).required(false))
                .add_source(File::with_name(&format!("conf/{run_mode}")).required(false))
                .add_source(File::with_name("conf/local").required(false));
        }

        builder = builder.add_source(
            Environment::default()
                .separator("__")
                .source(Some(vars.clone())),
        );

        if let Some(key) = vars.get("AZURE_SUBSCRIPTION_KEY") {
            builder = builder.set_override("face_api.subscription_key", key.as_str())?;
        }
        if let Some(endpoint) = vars.get("AZURE_ENDPOINT") {
            builder = builder.set_override("face_api.endpoint", endpoint.as_str())?;
        }
        if let Some(port) = vars.get("PORT") {
            builder = builder.set_override("server.http_port", port.as_str())?;
        }

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.face_api.validate()?;
        settings.validate_timeouts()?;
        settings.face_api.endpoint = settings.face_api.endpoint.trim_end_matches('/').to_string();
        Ok(settings)
    }
}

impl Settings {
    /// The whole-request deadline must outlast every outbound call timing out in turn.
    fn validate_timeouts(&self) -> Result<(), ConfigError> {
        let server_timeout = self.server.request_timeout.unwrap_or(DEFAULT_SERVER_REQUEST_TIMEOUT);
        let call_timeout = self.face_api.request_timeout.unwrap_or(DEFAULT_FACE_API_REQUEST_TIMEOUT);
        let calls_budget = call_timeout.saturating_mul(FACE_API_CALLS_PER_REQUEST);

        if server_timeout <= calls_budget {
            return Err(ConfigError::Message(format!(
                "server.request_timeout ({server_timeout}s) must be greater than {FACE_API_CALLS_PER_REQUEST} x face_api.request_timeout ({calls_budget}s)"
            )));
        }
        Ok(())
    }
}

impl FaceApi {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Message("face_api.endpoint (AZURE_ENDPOINT) is empty".to_string()));
        }
        if self.subscription_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "face_api.subscription_key (AZURE_SUBSCRIPTION_KEY) is empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "http://localhost:{}", &self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_load_from_azure_variables() {
        let settings = Settings::load(None, vars(&[
            ("AZURE_SUBSCRIPTION_KEY", "secret"),
            ("AZURE_ENDPOINT", "https://face.example.com/"),
        ]))
        .unwrap();

        assert_eq!(settings.face_api.subscription_key, "secret");
        assert_eq!(settings.face_api.endpoint, "https://face.example.com");
        assert_eq!(settings.server.http_port, 5000);
        assert_eq!(settings.face_api.request_timeout, Some(10));
        assert!(settings.tracer.is_none());
    }

    #[test]
    fn test_port_override() {
        let settings = Settings::load(None, vars(&[
            ("AZURE_SUBSCRIPTION_KEY", "secret"),
            ("AZURE_ENDPOINT", "https://face.example.com"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(settings.server.http_port, 8080);
        assert_eq!(settings.server.to_string(), "http://localhost:8080");
    }

    #[test]
    fn test_nested_environment_keys() {
        let settings = Settings::load(None, vars(&[
            ("FACE_API__ENDPOINT", "https://face.example.com"),
            ("FACE_API__SUBSCRIPTION_KEY", "nested"),
            ("FACE_API__REQUEST_TIMEOUT", "3"),
            ("LOGGER__LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(settings.face_api.subscription_key, "nested");
        assert_eq!(settings.face_api.request_timeout, Some(3));
        assert_eq!(settings.logger.unwrap().level, "debug");
    }

    #[test]
    fn test_server_timeout_must_outlast_face_api_calls() {
        let azure = [
            ("AZURE_SUBSCRIPTION_KEY", "secret"),
            ("AZURE_ENDPOINT", "https://face.example.com"),
        ];

        let mut too_slow = azure.to_vec();
        too_slow.push(("FACE_API__REQUEST_TIMEOUT", "25"));
        assert!(Settings::load(None, vars(&too_slow)).is_err());

        let mut exact = azure.to_vec();
        exact.extend([("FACE_API__REQUEST_TIMEOUT", "10"), ("SERVER__REQUEST_TIMEOUT", "30")]);
        assert!(Settings::load(None, vars(&exact)).is_err());

        let mut enough = azure.to_vec();
        enough.extend([("FACE_API__REQUEST_TIMEOUT", "25"), ("SERVER__REQUEST_TIMEOUT", "90")]);
        let settings = Settings::load(None, vars(&enough)).unwrap();
        assert_eq!(settings.server.request_timeout, Some(90));
    }

    #[test]
    fn test_missing_subscription_key() {
        let result = Settings::load(None, vars(&[("AZURE_ENDPOINT", "https://face.example.com")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_subscription_key() {
        let result = Settings::load(None, vars(&[
            ("AZURE_SUBSCRIPTION_KEY", "  "),
            ("AZURE_ENDPOINT", "https://face.example.com"),
        ]));
        assert!(result.is_err());
    }
}
