//! API Tools MCP 服务器主程序

use api_tools::server::transport;
use api_tools::GatewayServer;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "api-tools")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "将第三方 REST API 暴露为 MCP 工具的网关服务器", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件路径
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// 启用调试日志
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 启动服务器
    Serve {
        /// 传输模式 [stdio, http]
        #[arg(short, long)]
        mode: Option<String>,

        /// 监听主机
        #[arg(long)]
        host: Option<String>,

        /// 监听端口
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// 生成配置文件
    Config {
        /// 输出文件路径
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,

        /// 覆盖已存在的文件
        #[arg(short, long)]
        force: bool,
    },

    /// 调用单个工具（调试用）
    Test {
        /// 工具名称，例如 board_status、live_rates
        #[arg(short, long)]
        tool: String,

        /// JSON 形式的调用参数，例如 '{"gameId": "abc123"}'
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// 显示版本信息
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { mode, host, port } => {
            serve_command(&cli.config, cli.debug, mode, host, port).await?;
        }
        Commands::Config { output, force } => {
            config_command(&output, force)?;
        }
        Commands::Test { tool, args } => {
            test_command(&tool, &args).await?;
        }
        Commands::Version => {
            version_command();
        }
    }

    Ok(())
}

/// 启动服务器命令
async fn serve_command(
    config_path: &PathBuf,
    debug: bool,
    mode: Option<String>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    // 加载配置
    let config = load_config(config_path, host, port, mode)?;

    // 获取实际使用的传输模式（用于日志和启动）
    let transport_mode: transport::TransportMode = config.transport_mode.parse()?;

    // 初始化日志系统（debug 模式覆盖配置文件中的日志级别）
    if debug {
        let mut debug_config = config.logging.clone();
        debug_config.level = "debug".to_string();
        api_tools::init_logging_with_config(&debug_config)
            .map_err(|e| format!("初始化日志系统失败: {e}"))?;
    } else {
        api_tools::init_logging_with_config(&config.logging)
            .map_err(|e| format!("初始化日志系统失败: {e}"))?;
    }

    tracing::info!("启动 API Tools MCP 服务器 v{}", env!("CARGO_PKG_VERSION"));

    // 创建服务器（解析凭证、注册工具；凭证缺失在此失败）
    let server = GatewayServer::new(config).map_err(|e| format!("创建服务器失败: {e}"))?;

    transport::run_server_with_mode(&server, transport_mode)
        .await
        .map_err(|e| format!("服务器启动失败: {e}"))?;

    Ok(())
}

/// 加载配置
fn load_config(
    config_path: &PathBuf,
    host: Option<String>,
    port: Option<u16>,
    mode: Option<String>,
) -> Result<api_tools::ServerConfig, Box<dyn std::error::Error>> {
    let mut config = if config_path.exists() {
        api_tools::config::AppConfig::from_file(config_path)
            .map_err(|e| format!("加载配置文件失败: {e}"))?
    } else {
        api_tools::config::AppConfig::default()
    };

    // 仅当命令行参数显式提供时，才覆盖配置文件
    if let Some(h) = host {
        config.server.host = h;
    }
    if let Some(p) = port {
        config.server.port = p;
    }
    if let Some(m) = mode {
        config.server.transport_mode = m;
    }

    // 验证配置
    config.validate().map_err(|e| format!("配置验证失败: {e}"))?;

    // 将 config::AppConfig 转换为 server::ServerConfig
    let server_config = api_tools::ServerConfig {
        name: config.server.name,
        version: config.server.version,
        description: config.server.description,
        website_url: Some("https://github.com/KingingWang/api-tools".to_string()),
        host: config.server.host,
        port: config.server.port,
        transport_mode: config.server.transport_mode,
        providers: config.providers,
        logging: config.logging,
    };

    Ok(server_config)
}

/// 生成配置文件命令
fn config_command(output: &PathBuf, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if output.exists() && !force {
        return Err(format!("配置文件已存在: {}，使用 --force 覆盖", output.display()).into());
    }

    let config = api_tools::config::AppConfig::default();
    config
        .save_to_file(output)
        .map_err(|e| format!("保存配置文件失败: {e}"))?;

    println!("配置文件已生成: {}", output.display());
    println!("凭证通过环境变量 LICHESS_API_KEY 和 METALPRICE_API_KEY 提供。");

    Ok(())
}

/// 调用单个工具命令
async fn test_command(tool: &str, args: &str) -> Result<(), Box<dyn std::error::Error>> {
    let arguments: serde_json::Value =
        serde_json::from_str(args).map_err(|e| format!("参数不是有效的 JSON: {e}"))?;

    let providers = api_tools::config::ProvidersConfig::default();
    let registry = api_tools::tools::create_default_registry(&providers)
        .map_err(|e| format!("创建工具注册表失败: {e}"))?;

    match registry.invoke(tool, &arguments).await {
        Ok(payload) => {
            println!("{payload}");
        }
        Err(e) => {
            eprintln!("工具执行失败: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// 版本命令
fn version_command() {
    println!("API Tools MCP 服务器 v{}", env!("CARGO_PKG_VERSION"));
    println!("构建时间: {}", env!("BUILD_TIMESTAMP"));
    println!("Git 提交: {}", env!("GIT_COMMIT"));
    println!("Rust 版本: {}", env!("RUST_VERSION"));
}
