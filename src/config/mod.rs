//! 配置模块

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Lichess bearer token 环境变量
pub const LICHESS_API_KEY_ENV: &str = "LICHESS_API_KEY";

/// MetalpriceAPI key 环境变量
pub const METALPRICE_API_KEY_ENV: &str = "METALPRICE_API_KEY";

/// 应用程序配置
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,

    /// 提供方配置
    pub providers: ProvidersConfig,

    /// 日志配置
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 服务器名称
    pub name: String,

    /// 服务器版本
    pub version: String,

    /// 服务器描述
    pub description: Option<String>,

    /// 主机地址
    pub host: String,

    /// 端口
    pub port: u16,

    /// 传输模式
    pub transport_mode: String,
}

/// 提供方配置
///
/// 凭证不写入配置文件，只从环境变量读取。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    /// Lichess 棋盘 API
    pub lichess: ProviderConfig,

    /// MetalpriceAPI 行情 API
    pub metalprice: ProviderConfig,
}

/// 单个提供方配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// 基础 URL
    pub base_url: String,
}

/// Credentials resolved from the environment at startup.
///
/// A missing credential is a startup-fatal condition, never a per-call
/// error; tools assume their credential exists once the process serves.
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    /// Lichess bearer token
    pub lichess_token: String,

    /// MetalpriceAPI key
    pub metalprice_key: String,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,

    /// 日志文件路径
    pub file_path: Option<String>,

    /// 是否启用控制台日志
    pub enable_console: bool,

    /// 是否启用文件日志
    pub enable_file: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "api-tools".to_string(),
            version: crate::VERSION.to_string(),
            description: Some("MCP 工具网关：Lichess 棋盘 + MetalpriceAPI 行情".to_string()),
            host: "127.0.0.1".to_string(),
            port: 8080,
            transport_mode: "stdio".to_string(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            lichess: ProviderConfig {
                base_url: "https://lichess.org".to_string(),
            },
            metalprice: ProviderConfig {
                base_url: "https://api.metalpriceapi.com/v1".to_string(),
            },
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: Some("./logs/api-tools.log".to_string()),
            enable_console: true,
            enable_file: false,
        }
    }
}

impl ProvidersConfig {
    /// 解析凭证（环境变量，缺失即启动失败）
    pub fn credentials(&self) -> Result<ProviderCredentials, crate::error::Error> {
        Ok(ProviderCredentials {
            lichess_token: require_env(LICHESS_API_KEY_ENV)?,
            metalprice_key: require_env(METALPRICE_API_KEY_ENV)?,
        })
    }
}

fn require_env(name: &'static str) -> Result<String, crate::error::Error> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(crate::error::Error::MissingCredential(name)),
    }
}

impl AppConfig {
    /// 从文件加载配置
    ///
    /// # Errors
    ///
    /// 如果文件不存在、无法读取或格式无效，返回错误
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, crate::error::Error> {
        let content = fs::read_to_string(path)
            .map_err(|e| crate::error::Error::Config(format!("读取配置文件失败: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| crate::error::Error::Config(format!("解析配置文件失败: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    ///
    /// # Errors
    ///
    /// 如果无法序列化配置、创建目录或写入文件，返回错误
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), crate::error::Error> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::Error::Config(format!("序列化配置失败: {e}")))?;

        // 确保目录存在
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .map_err(|e| crate::error::Error::Config(format!("创建目录失败: {e}")))?;
        }

        fs::write(path, content)
            .map_err(|e| crate::error::Error::Config(format!("写入配置文件失败: {e}")))?;

        Ok(())
    }

    /// 验证配置
    ///
    /// # Errors
    ///
    /// 如果配置无效（如空主机名、无效端口、无效提供方 URL 等），返回错误
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        if self.server.host.is_empty() {
            return Err(crate::error::Error::Config("服务器主机不能为空".to_string()));
        }

        if self.server.port == 0 {
            return Err(crate::error::Error::Config("服务器端口不能为0".to_string()));
        }

        let valid_modes = ["stdio", "http"];
        if !valid_modes.contains(&self.server.transport_mode.as_str()) {
            return Err(crate::error::Error::Config(format!(
                "无效的传输模式: {}，有效值: {:?}",
                self.server.transport_mode, valid_modes
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(crate::error::Error::Config(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        for (name, provider) in [
            ("lichess", &self.providers.lichess),
            ("metalprice", &self.providers.metalprice),
        ] {
            let url = url::Url::parse(&provider.base_url).map_err(|e| {
                crate::error::Error::Config(format!("提供方 {name} 的 base_url 无效: {e}"))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(crate::error::Error::Config(format!(
                    "提供方 {name} 的 base_url 必须是 http(s): {}",
                    provider.base_url
                )));
            }
        }

        Ok(())
    }

    /// 从环境变量加载配置
    ///
    /// # Errors
    ///
    /// 如果环境变量格式无效或配置验证失败，返回错误
    pub fn from_env() -> Result<Self, crate::error::Error> {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("API_TOOLS_NAME") {
            config.server.name = name;
        }

        if let Ok(host) = std::env::var("API_TOOLS_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("API_TOOLS_PORT") {
            config.server.port = port
                .parse()
                .map_err(|e| crate::error::Error::Config(format!("无效的端口: {e}")))?;
        }

        if let Ok(mode) = std::env::var("API_TOOLS_TRANSPORT_MODE") {
            config.server.transport_mode = mode;
        }

        if let Ok(level) = std::env::var("API_TOOLS_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(base) = std::env::var("API_TOOLS_LICHESS_BASE_URL") {
            config.providers.lichess.base_url = base;
        }

        if let Ok(base) = std::env::var("API_TOOLS_METALPRICE_BASE_URL") {
            config.providers.metalprice.base_url = base;
        }

        config.validate()?;
        Ok(config)
    }
}
