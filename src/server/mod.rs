//! 服务器模块
//!
//! 提供 MCP 服务器的实现，支持 Stdio 和 HTTP 传输。

pub mod handler;
pub mod transport;

use crate::config::{LoggingConfig, ProvidersConfig};
use crate::error::Result;
use crate::tools::ToolRegistry;
use rust_mcp_sdk::schema::{
    Implementation, InitializeResult, ProtocolVersion, ServerCapabilities, ServerCapabilitiesTools,
};
use std::sync::Arc;

/// 服务器配置
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct ServerConfig {
    /// 服务器名称
    pub name: String,

    /// 服务器版本
    pub version: String,

    /// 服务器描述
    pub description: Option<String>,

    /// 网站 URL
    pub website_url: Option<String>,

    /// 主机地址
    pub host: String,

    /// 端口
    pub port: u16,

    /// 传输模式
    pub transport_mode: String,

    /// 提供方配置
    pub providers: ProvidersConfig,

    /// 日志配置
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "api-tools".to_string(),
            version: crate::VERSION.to_string(),
            description: Some("MCP 工具网关：Lichess 棋盘 + MetalpriceAPI 行情".to_string()),
            website_url: Some("https://github.com/KingingWang/api-tools".to_string()),
            host: "127.0.0.1".to_string(),
            port: 8080,
            transport_mode: "stdio".to_string(),
            providers: ProvidersConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// MCP 服务器
#[derive(Clone)]
pub struct GatewayServer {
    config: ServerConfig,
    tool_registry: Arc<ToolRegistry>,
}

impl GatewayServer {
    /// 创建新的服务器实例
    ///
    /// 在此解析凭证并注册全部工具；凭证缺失即在这里失败。
    pub fn new(config: ServerConfig) -> Result<Self> {
        let tool_registry = Arc::new(crate::tools::create_default_registry(&config.providers)?);

        Ok(Self {
            config,
            tool_registry,
        })
    }

    /// 获取服务器配置
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// 获取工具注册器
    #[must_use]
    pub fn tool_registry(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    /// 获取服务器信息
    #[must_use]
    pub fn server_info(&self) -> InitializeResult {
        InitializeResult {
            server_info: Implementation {
                name: self.config.name.clone(),
                version: self.config.version.clone(),
                title: Some("API Tools MCP Server".to_string()),
                description: self.config.description.clone(),
                icons: vec![],
                website_url: self.config.website_url.clone(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ServerCapabilitiesTools { list_changed: None }),
                resources: None,
                prompts: None,
                experimental: None,
                completions: None,
                logging: None,
                tasks: None,
            },
            protocol_version: ProtocolVersion::V2025_11_25.into(),
            instructions: Some(
                "使用此服务器调用 Lichess 棋盘工具（board_status、connect_game、board_move）\
                 和 MetalpriceAPI 行情工具（list_symbols、live_rates、historical_rates、\
                 timeframe、ohlc）。"
                    .to_string(),
            ),
            meta: None,
        }
    }

    /// 运行 Stdio 服务器
    pub async fn run_stdio(&self) -> Result<()> {
        transport::run_stdio_server(self).await
    }

    /// 运行 HTTP 服务器
    pub async fn run_http(&self) -> Result<()> {
        transport::run_http_server(self).await
    }
}
