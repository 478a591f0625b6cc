//! 单元测试

use api_tools::error::ToolError;
use api_tools::gateway::{
    bind, interpret, Credential, ParamKind, ParamValue, ParameterSpec, ProviderResponse,
    RequestPlan, ResponseFormat, ToolSchema,
};
use reqwest::StatusCode;
use serde_json::json;
use url::Url;

fn move_schema() -> ToolSchema {
    ToolSchema::new("board_move", "Make a move on the board")
        .param(ParameterSpec::required(
            "gameId",
            ParamKind::String,
            "Id of the game",
        ))
        .param(ParameterSpec::required(
            "move",
            ParamKind::String,
            "The move to play, in UCI format",
        ))
        .param(ParameterSpec::optional(
            "offerDraw",
            ParamKind::Boolean,
            "Whether to offer a draw",
        ))
}

fn rates_schema() -> ToolSchema {
    ToolSchema::new("live_rates", "Get the latest rates")
        .param(
            ParameterSpec::optional("base", ParamKind::String, "Base currency")
                .with_default("USD"),
        )
        .param(ParameterSpec::optional(
            "currencies",
            ParamKind::String,
            "Currencies to limit the result to",
        ))
}

// ============================================================================
// 参数绑定测试
// ============================================================================

/// 缺少必填参数时报告该参数名
#[test]
fn test_bind_missing_required_names_parameter() {
    let err = bind(&move_schema(), &json!({ "move": "e2e4" })).unwrap_err();

    match err {
        ToolError::Validation { parameter, reason } => {
            assert_eq!(parameter, "gameId");
            assert!(reason.contains("missing required argument"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

/// 缺省值替换在重复调用间保持一致
#[test]
fn test_bind_applies_default_deterministically() {
    let schema = rates_schema();

    let first = bind(&schema, &json!({})).unwrap();
    let second = bind(&schema, &json!({})).unwrap();

    assert_eq!(first.get("base"), Some(&ParamValue::Str("USD".to_string())));
    assert_eq!(first, second);
}

/// 无缺省值的可选参数缺席时直接省略，且与显式空值可区分
#[test]
fn test_bind_optional_without_default_is_omitted() {
    let schema = rates_schema();

    let bound = bind(&schema, &json!({})).unwrap();
    assert!(!bound.contains("currencies"));

    let bound = bind(&schema, &json!({ "currencies": "" })).unwrap();
    assert_eq!(bound.get_str("currencies"), Some(""));
}

/// 类型不匹配被拒绝
#[test]
fn test_bind_rejects_wrong_type() {
    let err = bind(&move_schema(), &json!({ "gameId": 42, "move": "e2e4" })).unwrap_err();

    match err {
        ToolError::Validation { parameter, reason } => {
            assert_eq!(parameter, "gameId");
            assert!(reason.contains("expected string"));
            assert!(reason.contains("number"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

/// 枚举约束：集合内的值原样通过，集合外的值被拒绝
#[test]
fn test_bind_enum_membership() {
    let schema = ToolSchema::new("ohlc", "OHLC prices").param(
        ParameterSpec::optional("date_type", ParamKind::String, "Market calendar")
            .with_allowed(&["commodity", "forex"]),
    );

    let bound = bind(&schema, &json!({ "date_type": "forex" })).unwrap();
    assert_eq!(bound.get_str("date_type"), Some("forex"));

    let err = bind(&schema, &json!({ "date_type": "weekly" })).unwrap_err();
    match err {
        ToolError::Validation { parameter, .. } => assert_eq!(parameter, "date_type"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

/// 模式之外的参数名被忽略
#[test]
fn test_bind_ignores_unknown_arguments() {
    let bound = bind(
        &move_schema(),
        &json!({ "gameId": "abc123", "move": "e2e4", "traceId": "xyz" }),
    )
    .unwrap();

    assert!(!bound.contains("traceId"));
    assert_eq!(bound.len(), 2);
}

/// 显式 null 等同于缺席
#[test]
fn test_bind_null_counts_as_absent() {
    let err = bind(&move_schema(), &json!({ "gameId": null, "move": "e2e4" })).unwrap_err();

    assert!(matches!(err, ToolError::Validation { parameter, .. } if parameter == "gameId"));
}

/// 参数整体必须是 JSON 对象
#[test]
fn test_bind_rejects_non_object_arguments() {
    let err = bind(&move_schema(), &json!("gameId=abc")).unwrap_err();
    assert!(matches!(err, ToolError::Validation { .. }));
}

/// 布尔和数字参数的绑定
#[test]
fn test_bind_boolean_and_number() {
    let schema = ToolSchema::new("t", "test")
        .param(ParameterSpec::optional("flag", ParamKind::Boolean, "a flag"))
        .param(ParameterSpec::optional("limit", ParamKind::Number, "a limit"));

    let bound = bind(&schema, &json!({ "flag": true, "limit": 10 })).unwrap();
    assert_eq!(bound.get("flag"), Some(&ParamValue::Bool(true)));
    assert_eq!(bound.get("limit"), Some(&ParamValue::Num(10.0)));
}

// ============================================================================
// 模式不变量测试（启动期编程错误）
// ============================================================================

/// 重复参数名在构造时 panic
#[test]
#[should_panic(expected = "duplicate parameter")]
fn test_schema_duplicate_parameter_panics() {
    let _ = ToolSchema::new("t", "test")
        .param(ParameterSpec::required("x", ParamKind::String, "first"))
        .param(ParameterSpec::required("x", ParamKind::String, "second"));
}

/// 必填参数不允许缺省值
#[test]
#[should_panic(expected = "cannot have a default")]
fn test_schema_required_with_default_panics() {
    let _ = ToolSchema::new("t", "test").param(
        ParameterSpec::required("x", ParamKind::String, "required").with_default("boom"),
    );
}

/// 缺省值必须属于枚举集合
#[test]
#[should_panic(expected = "not an allowed value")]
fn test_schema_default_outside_allowed_panics() {
    let _ = ToolSchema::new("t", "test").param(
        ParameterSpec::optional("x", ParamKind::String, "enum")
            .with_default("daily")
            .with_allowed(&["commodity", "forex"]),
    );
}

/// 模式到 MCP 工具定义的转换
#[test]
fn test_schema_to_tool_definition() {
    let tool = rates_schema().to_tool();
    assert_eq!(tool.name, "live_rates");

    let value = serde_json::to_value(&tool).unwrap();
    assert_eq!(value["inputSchema"]["type"], "object");
    assert_eq!(value["inputSchema"]["properties"]["base"]["type"], "string");
    assert_eq!(
        value["inputSchema"]["properties"]["base"]["default"],
        "USD"
    );
    // 可选参数不出现在 required 里
    let required = value["inputSchema"]["required"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    assert!(required.is_empty());
}

// ============================================================================
// 请求构造测试
// ============================================================================

fn lichess_base() -> Url {
    Url::parse("https://lichess.org").unwrap()
}

fn pricing_base() -> Url {
    Url::parse("https://api.metalpriceapi.com/v1").unwrap()
}

/// 走子请求：路径替换、无查询串、bearer 头
#[test]
fn test_move_request_construction() {
    let plan = RequestPlan::post("/api/board/game/{gameId}/move/{move}")
        .query_param("offerDraw", "offeringDraw");
    let bound = bind(&move_schema(), &json!({ "gameId": "abc123", "move": "e2e4" })).unwrap();
    let credential = Credential::bearer("token123").unwrap();

    let request = plan.build(&lichess_base(), &bound, &credential).unwrap();

    assert_eq!(request.method().as_str(), "POST");
    assert_eq!(
        request.url().as_str(),
        "https://lichess.org/api/board/game/abc123/move/e2e4"
    );
    assert_eq!(request.url().query(), None);
    assert_eq!(
        request.headers().get("authorization").unwrap(),
        "Bearer token123"
    );
}

/// 提出和棋时追加 offeringDraw=true
#[test]
fn test_move_request_with_draw_offer() {
    let plan = RequestPlan::post("/api/board/game/{gameId}/move/{move}")
        .query_param("offerDraw", "offeringDraw");
    let bound = bind(
        &move_schema(),
        &json!({ "gameId": "abc123", "move": "e2e4", "offerDraw": true }),
    )
    .unwrap();
    let credential = Credential::bearer("token123").unwrap();

    let request = plan.build(&lichess_base(), &bound, &credential).unwrap();

    assert_eq!(request.url().query(), Some("offeringDraw=true"));
}

/// 行情请求：查询串按字典序、逗号被编码、凭证只在头里
#[test]
fn test_live_rates_request_construction() {
    let plan = RequestPlan::get("/latest")
        .query_param("base", "base")
        .query_param("currencies", "currencies");
    let bound = bind(
        &rates_schema(),
        &json!({ "base": "eur", "currencies": "XAU,XAG" }),
    )
    .unwrap();
    let credential = Credential::api_key("x-api-key", "secret-key").unwrap();

    let request = plan.build(&pricing_base(), &bound, &credential).unwrap();

    assert_eq!(
        request.url().as_str(),
        "https://api.metalpriceapi.com/v1/latest?base=eur&currencies=XAU%2CXAG"
    );
    assert_eq!(request.headers().get("x-api-key").unwrap(), "secret-key");
    assert!(request.headers().get("authorization").is_none());
    // 凭证绝不进入 URL
    assert!(!request.url().as_str().contains("secret-key"));
}

/// 查询值经百分号编码后可无损还原
#[test]
fn test_query_round_trip() {
    let schema = ToolSchema::new("t", "test").param(ParameterSpec::optional(
        "q",
        ParamKind::String,
        "query value",
    ));
    let plan = RequestPlan::get("/search").query_param("q", "q");
    let original = "a b&c=d,+%/汇";

    let bound = bind(&schema, &json!({ "q": original })).unwrap();
    let credential = Credential::bearer("t").unwrap();
    let request = plan.build(&lichess_base(), &bound, &credential).unwrap();

    let decoded: Vec<(String, String)> = request
        .url()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(decoded, vec![("q".to_string(), original.to_string())]);
}

/// 路径片段替换会编码特殊字符
#[test]
fn test_path_segment_encoding() {
    let schema = ToolSchema::new("t", "test").param(ParameterSpec::required(
        "gameId",
        ParamKind::String,
        "game id",
    ));
    let plan = RequestPlan::get("/api/board/game/stream/{gameId}");
    let bound = bind(&schema, &json!({ "gameId": "ab/cd" })).unwrap();
    let credential = Credential::bearer("t").unwrap();

    let request = plan.build(&lichess_base(), &bound, &credential).unwrap();

    assert_eq!(request.url().path(), "/api/board/game/stream/ab%2Fcd");
}

/// 绑定参数可以作为请求头发送
#[test]
fn test_header_param_binding() {
    let schema = ToolSchema::new("t", "test").param(ParameterSpec::optional(
        "unit",
        ParamKind::String,
        "weight unit",
    ));
    let plan = RequestPlan::get("/latest").header_param("unit", "x-unit");
    let bound = bind(&schema, &json!({ "unit": "toz" })).unwrap();
    let credential = Credential::bearer("t").unwrap();

    let request = plan.build(&lichess_base(), &bound, &credential).unwrap();

    assert_eq!(request.headers().get("x-unit").unwrap(), "toz");
    assert_eq!(request.url().query(), None);
}

/// 数字与布尔值的线上渲染
#[test]
fn test_wire_rendering() {
    assert_eq!(ParamValue::Num(10.0).render(), "10");
    assert_eq!(ParamValue::Num(2.5).render(), "2.5");
    assert_eq!(ParamValue::Bool(true).render(), "true");
    assert_eq!(ParamValue::Str("eur".to_string()).render(), "eur");
}

// ============================================================================
// 响应解释测试
// ============================================================================

fn enveloped(status: StatusCode, body: serde_json::Value) -> ProviderResponse {
    ProviderResponse {
        status,
        body: serde_json::to_vec(&body).unwrap(),
    }
}

/// 信封中的 104 映射为 Too Many Requests，与 HTTP 状态码无关
#[test]
fn test_interpret_envelope_error_code_104() {
    let body = json!({ "success": false, "error": { "statusCode": 104, "message": "ignored" } });

    for status in [StatusCode::OK, StatusCode::NOT_FOUND] {
        let err = interpret(ResponseFormat::Enveloped, &enveloped(status, body.clone()))
            .unwrap_err();
        assert_eq!(
            err,
            ToolError::Provider {
                code: 104,
                message: "Too Many Requests".to_string(),
            }
        );
    }
}

/// 未知错误码回退为携带原始码的通用消息
#[test]
fn test_interpret_envelope_unknown_code() {
    let body = json!({ "success": false, "error": { "statusCode": 999 } });
    let err = interpret(ResponseFormat::Enveloped, &enveloped(StatusCode::OK, body)).unwrap_err();

    match err {
        ToolError::Provider { code, message } => {
            assert_eq!(code, 999);
            assert!(message.contains("999"));
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

/// 成功信封返回格式化后的完整载荷
#[test]
fn test_interpret_envelope_success() {
    let body = json!({ "success": true, "base": "USD", "rates": { "XAU": 0.0005 } });
    let payload = interpret(ResponseFormat::Enveloped, &enveloped(StatusCode::OK, body)).unwrap();

    assert!(payload.contains("\"rates\""));
    assert!(payload.contains("XAU"));
}

/// 裸载荷原样透传，即使不是 JSON
#[test]
fn test_interpret_bare_payload_verbatim() {
    let response = ProviderResponse {
        status: StatusCode::OK,
        body: b"{\"type\":\"gameFull\"}\n{\"type\":\"gameState\"}\n".to_vec(),
    };

    let payload = interpret(ResponseFormat::Bare, &response).unwrap();
    assert_eq!(payload, "{\"type\":\"gameFull\"}\n{\"type\":\"gameState\"}\n");
}

/// 信封解析失败是 Decode 错误，不是成功空结果
#[test]
fn test_interpret_envelope_decode_failure() {
    let response = ProviderResponse {
        status: StatusCode::OK,
        body: b"<html>gateway timeout</html>".to_vec(),
    };

    let err = interpret(ResponseFormat::Enveloped, &response).unwrap_err();
    assert!(matches!(err, ToolError::Decode(_)));
}

/// success=false 但缺少 statusCode 的信封视为解码失败
#[test]
fn test_interpret_envelope_missing_status_code() {
    let body = json!({ "success": false, "error": {} });
    let err = interpret(ResponseFormat::Enveloped, &enveloped(StatusCode::OK, body)).unwrap_err();

    assert!(matches!(err, ToolError::Decode(_)));
}
