use crate::error::{BadEnvVarSnafu, ParseIdleSecsSnafu, RosterResult};
use dotenvy::var;
use snafu::ResultExt;
use std::{env::VarError, sync::Arc, time::Duration};

const DEFAULT_API_BASE_URL: &str = "https://672e1dd5229a881691ef09f0.mockapi.io/api/students";
const DEFAULT_SERVER_IP: &str = "127.0.0.1:8080";
const DEFAULT_VIEW_IDLE_SECS: &str = "1800";

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    api_config: Arc<ApiConfig>,
    server_ip: Arc<str>,
    view_idle_timeout: Duration,
}

impl RuntimeConfiguration {
    pub fn new() -> RosterResult<Self> {
        Ok(Self {
            api_config: Arc::new(ApiConfig::new(var_or(
                "ROSTER_API_BASE_URL",
                DEFAULT_API_BASE_URL,
            )?)),
            server_ip: var_or("ROSTER_SERVER_IP", DEFAULT_SERVER_IP)?.into(),
            view_idle_timeout: Duration::from_secs(
                var_or("ROSTER_VIEW_IDLE_SECS", DEFAULT_VIEW_IDLE_SECS)?
                    .parse::<u64>()
                    .context(ParseIdleSecsSnafu)?,
            ),
        })
    }

    #[cfg(test)]
    pub fn for_api(base_url: impl Into<String>) -> Self {
        Self {
            api_config: Arc::new(ApiConfig::new(base_url)),
            server_ip: DEFAULT_SERVER_IP.into(),
            view_idle_timeout: Duration::from_secs(1800),
        }
    }

    pub fn api_config(&self) -> Arc<ApiConfig> {
        self.api_config.clone()
    }

    pub fn server_ip(&self) -> &str {
        &self.server_ip
    }

    ///how long a view can go without a request before it gets dropped
    pub const fn view_idle_timeout(&self) -> Duration {
        self.view_idle_timeout
    }
}

///unset is fine (we fall back), but garbage (eg. not unicode) isn't
fn var_or(name: &'static str, default: &str) -> RosterResult<String> {
    match var(name) {
        Ok(value) => Ok(value),
        Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(default.to_string()),
        Err(e) => Err(e).context(BadEnvVarSnafu { name }),
    }
}

#[derive(Debug)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    pub fn students_url(&self) -> String {
        format!("{}/students", self.base_url)
    }

    pub fn student_url(&self, id: impl std::fmt::Display) -> String {
        format!("{}/students/{id}", self.base_url)
    }
}
