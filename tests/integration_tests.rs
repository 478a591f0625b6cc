//! 集成测试

use api_tools::config::{
    AppConfig, ProvidersConfig, LICHESS_API_KEY_ENV, METALPRICE_API_KEY_ENV,
};
use api_tools::error::{Error, ToolError};
use api_tools::tools::{create_default_registry, health, ToolRegistry};
use serde_json::json;

/// 在两个凭证都设置好的环境下构建注册表
fn registry_with_credentials() -> ToolRegistry {
    temp_env::with_vars(
        [
            (LICHESS_API_KEY_ENV, Some("lichess-token")),
            (METALPRICE_API_KEY_ENV, Some("metalprice-key")),
        ],
        || create_default_registry(&ProvidersConfig::default()).expect("创建注册表失败"),
    )
}

// ============================================================================
// 配置测试
// ============================================================================

/// 测试默认配置与验证
#[test]
fn test_config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.transport_mode, "stdio");
    assert_eq!(config.providers.lichess.base_url, "https://lichess.org");
    assert_eq!(
        config.providers.metalprice.base_url,
        "https://api.metalpriceapi.com/v1"
    );

    assert!(config.validate().is_ok());
}

/// 测试环境变量覆盖
#[test]
fn test_config_from_env() {
    let config = temp_env::with_vars(
        [
            ("API_TOOLS_HOST", Some("0.0.0.0")),
            ("API_TOOLS_PORT", Some("9090")),
            ("API_TOOLS_TRANSPORT_MODE", Some("http")),
        ],
        || AppConfig::from_env().expect("从环境变量加载配置失败"),
    );

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.transport_mode, "http");
}

/// 无效传输模式被拒绝
#[test]
fn test_config_rejects_invalid_transport_mode() {
    let mut config = AppConfig::default();
    config.server.transport_mode = "sse".to_string();

    assert!(config.validate().is_err());
}

/// 无效提供方 URL 被拒绝
#[test]
fn test_config_rejects_invalid_provider_url() {
    let mut config = AppConfig::default();
    config.providers.lichess.base_url = "not a url".to_string();
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.providers.metalprice.base_url = "ftp://example.com".to_string();
    assert!(config.validate().is_err());
}

/// 配置保存后可以重新加载
#[test]
fn test_config_save_and_reload() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let path = dir.path().join("config.toml");

    let mut config = AppConfig::default();
    config.server.port = 9999;
    config.save_to_file(&path).expect("保存配置失败");

    let reloaded = AppConfig::from_file(&path).expect("重新加载配置失败");
    assert_eq!(reloaded.server.port, 9999);
    assert_eq!(reloaded.server.host, config.server.host);
}

// ============================================================================
// 凭证测试
// ============================================================================

/// 缺少凭证是启动错误，并指明缺的环境变量
#[test]
fn test_missing_credential_is_startup_error() {
    let err = temp_env::with_vars(
        [
            (LICHESS_API_KEY_ENV, None::<&str>),
            (METALPRICE_API_KEY_ENV, Some("metalprice-key")),
        ],
        || ProvidersConfig::default().credentials().unwrap_err(),
    );

    match err {
        Error::MissingCredential(name) => assert_eq!(name, LICHESS_API_KEY_ENV),
        other => panic!("expected missing credential error, got {other}"),
    }
}

/// 空白凭证等同于缺失
#[test]
fn test_blank_credential_is_missing() {
    let err = temp_env::with_vars(
        [
            (LICHESS_API_KEY_ENV, Some("lichess-token")),
            (METALPRICE_API_KEY_ENV, Some("   ")),
        ],
        || ProvidersConfig::default().credentials().unwrap_err(),
    );

    assert!(matches!(err, Error::MissingCredential(METALPRICE_API_KEY_ENV)));
}

/// 两个凭证都存在时解析成功
#[test]
fn test_credentials_resolved() {
    let credentials = temp_env::with_vars(
        [
            (LICHESS_API_KEY_ENV, Some("lichess-token")),
            (METALPRICE_API_KEY_ENV, Some("metalprice-key")),
        ],
        || ProvidersConfig::default().credentials().expect("解析凭证失败"),
    );

    assert_eq!(credentials.lichess_token, "lichess-token");
    assert_eq!(credentials.metalprice_key, "metalprice-key");
}

// ============================================================================
// 注册表测试
// ============================================================================

/// 默认注册表包含全部工具，按名称排序
#[test]
fn test_registry_lists_all_tools() {
    let registry = registry_with_credentials();
    let tools = registry.get_tools();

    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "board_move",
            "board_status",
            "connect_game",
            "health_check",
            "historical_rates",
            "list_symbols",
            "live_rates",
            "ohlc",
            "timeframe",
        ]
    );
}

/// 调用未注册的工具返回 NotFound
#[tokio::test]
async fn test_registry_unknown_tool() {
    let registry = registry_with_credentials();

    let err = registry.invoke("no_such_tool", &json!({})).await.unwrap_err();
    assert_eq!(err, ToolError::NotFound("no_such_tool".to_string()));
}

/// 校验失败在触网前短路
#[tokio::test]
async fn test_registry_validation_short_circuits() {
    let registry = registry_with_credentials();

    let err = registry.invoke("board_move", &json!({})).await.unwrap_err();
    assert!(matches!(err, ToolError::Validation { parameter, .. } if parameter == "gameId"));
}

/// 注册表持有工具模式，缺省值可见
#[test]
fn test_registry_exposes_schema() {
    let registry = registry_with_credentials();

    let schema = registry.schema("live_rates").expect("live_rates 未注册");
    let base = schema.param_spec("base").expect("缺少 base 参数");
    assert!(!base.required);
    assert!(base.default.is_some());
}

/// 同名工具注册两次在启动时 panic
#[test]
#[should_panic(expected = "registered twice")]
fn test_duplicate_registration_panics() {
    let providers = ProvidersConfig::default();

    let _ = ToolRegistry::new()
        .register(health::health_check(&providers).expect("构建健康检查失败"))
        .register(health::health_check(&providers).expect("构建健康检查失败"));
}

// ============================================================================
// 服务器测试
// ============================================================================

/// 服务器创建与自描述信息
#[test]
fn test_server_creation() {
    let server = temp_env::with_vars(
        [
            (LICHESS_API_KEY_ENV, Some("lichess-token")),
            (METALPRICE_API_KEY_ENV, Some("metalprice-key")),
        ],
        || {
            api_tools::GatewayServer::new(api_tools::ServerConfig::default())
                .expect("创建服务器失败")
        },
    );

    let info = server.server_info();
    assert_eq!(info.server_info.name, "api-tools");
    assert!(!server.tool_registry().is_empty());
}

/// 缺少凭证时服务器创建失败
#[test]
fn test_server_creation_without_credentials_fails() {
    let result = temp_env::with_vars(
        [
            (LICHESS_API_KEY_ENV, None::<&str>),
            (METALPRICE_API_KEY_ENV, None::<&str>),
        ],
        || api_tools::GatewayServer::new(api_tools::ServerConfig::default()),
    );

    assert!(result.is_err());
}
