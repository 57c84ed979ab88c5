//! Console configuration

use std::path::PathBuf;
use std::sync::Arc;

use cobra_client::{ClientConfig, ClientResult, NetworkHttpClient};

use crate::core::guard::{AccessGuard, DEFAULT_LOGIN_ROUTE, DEFAULT_ROUTE, Requirement};
use crate::core::session_cache::{FileStorage, MemoryStorage, SessionStorage};

const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Console configuration
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | COBRA_API_URL | http://localhost:8000/api | API 基础地址 |
/// | COBRA_TIMEOUT_SECS | 30 | 请求超时(秒) |
/// | COBRA_SESSION_DIR | (unset: in-memory) | 会话持久化目录 |
/// | COBRA_LOGIN_ROUTE | /login | 未登录跳转 |
/// | COBRA_DEFAULT_ROUTE | /dashboard | 无权限跳转 |
/// | COBRA_LOG_LEVEL | info | 日志级别 |
/// | COBRA_LOG_DIR | (unset: console only) | 日志目录 |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub api_url: String,
    pub timeout_secs: u64,
    /// `None` keeps the session in memory only, gone when the process exits
    pub session_dir: Option<PathBuf>,
    pub login_route: String,
    pub default_route: String,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_dir: None,
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            default_route: DEFAULT_ROUTE.to_string(),
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl ConsoleConfig {
    /// 从环境变量加载配置 (reads `.env` first if present)
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; unset or empty keys
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_url: var("COBRA_API_URL").unwrap_or(defaults.api_url),
            timeout_secs: var("COBRA_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.timeout_secs),
            session_dir: var("COBRA_SESSION_DIR").map(PathBuf::from),
            login_route: var("COBRA_LOGIN_ROUTE").unwrap_or(defaults.login_route),
            default_route: var("COBRA_DEFAULT_ROUTE").unwrap_or(defaults.default_route),
            log_level: var("COBRA_LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: var("COBRA_LOG_DIR").map(PathBuf::from),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    pub fn with_session_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.session_dir = Some(dir.into());
        self
    }

    pub fn with_routes(mut self, login_route: impl Into<String>, default_route: impl Into<String>) -> Self {
        self.login_route = login_route.into();
        self.default_route = default_route.into();
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_url.clone()).with_timeout(self.timeout_secs)
    }

    pub fn build_client(&self) -> ClientResult<NetworkHttpClient> {
        self.client_config().build_http_client()
    }

    /// File-backed when `session_dir` is set, in-memory otherwise
    pub fn session_storage(&self) -> Arc<dyn SessionStorage> {
        match &self.session_dir {
            Some(dir) => Arc::new(FileStorage::new(dir)),
            None => Arc::new(MemoryStorage::new()),
        }
    }

    /// Guard for `requirement` using the configured routes
    pub fn guard(&self, requirement: Requirement) -> AccessGuard {
        AccessGuard::new(requirement).with_routes(&self.login_route, &self.default_route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::from_lookup(|_| None);
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.client_config().timeout, 30);
    }

    #[test]
    fn test_env_overrides() {
        let config = ConsoleConfig::from_lookup(lookup(&[
            ("COBRA_API_URL", "https://cobra.example/api"),
            ("COBRA_TIMEOUT_SECS", "5"),
            ("COBRA_SESSION_DIR", "/tmp/cobra"),
            ("COBRA_LOGIN_ROUTE", "/signin"),
            ("COBRA_LOG_LEVEL", "debug"),
        ]));
        assert_eq!(config.api_url, "https://cobra.example/api");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.session_dir, Some(PathBuf::from("/tmp/cobra")));
        assert_eq!(config.login_route, "/signin");
        assert_eq!(config.default_route, "/dashboard");
        assert_eq!(config.log_level, "debug");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = ConsoleConfig::from_lookup(lookup(&[
            ("COBRA_TIMEOUT_SECS", "soon"),
            ("COBRA_API_URL", "  "),
        ]));
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.api_url, "http://localhost:8000/api");
    }

    #[test]
    fn test_session_storage_follows_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ConsoleConfig::default()
            .with_session_dir(dir.path())
            .session_storage();
        assert!(storage.load().unwrap().is_none());
    }
}
