//! 健康检查工具

use crate::config::ProvidersConfig;
use crate::error::ToolError;
use crate::gateway::{BoundArguments, ParamKind, ParameterSpec, ToolSchema};
use crate::tools::ToolHandler;
use async_trait::async_trait;
use serde::Serialize;
use std::time::{Duration, Instant};

/// 健康检查结果
#[derive(Debug, Clone, Serialize)]
struct HealthStatus {
    status: String,
    timestamp: String,
    checks: Vec<HealthCheck>,
    uptime: Duration,
}

/// 单个健康检查
#[derive(Debug, Clone, Serialize)]
struct HealthCheck {
    name: String,
    status: String,
    duration_ms: u64,
    message: Option<String>,
    error: Option<String>,
}

/// Health-check tool: probes both providers for reachability.
///
/// Not backed by the HTTP gateway pipeline — probes carry no credential and
/// no response interpretation, they only measure whether the provider
/// answers at all.
pub struct HealthCheckTool {
    client: reqwest::Client,
    lichess_base: String,
    metalprice_base: String,
    start_time: Instant,
}

/// Build the `health_check` tool over the configured providers.
pub fn health_check(
    providers: &ProvidersConfig,
) -> crate::error::Result<(ToolSchema, HealthCheckTool)> {
    let schema = ToolSchema::new(
        "health_check",
        "Check the reachability of the configured providers (Lichess, MetalpriceAPI)",
    )
    .param(
        ParameterSpec::optional("check_type", ParamKind::String, "Which providers to probe")
            .with_default("all")
            .with_allowed(&["all", "lichess", "metalprice"]),
    )
    .param(
        ParameterSpec::optional(
            "verbose",
            ParamKind::Boolean,
            "Include healthy checks and per-check timings in the output",
        )
        .with_default(false),
    );

    let tool = HealthCheckTool {
        client: crate::utils::HttpClientBuilder::new().build()?,
        lichess_base: providers.lichess.base_url.clone(),
        metalprice_base: providers.metalprice.base_url.clone(),
        start_time: Instant::now(),
    };

    Ok((schema, tool))
}

impl HealthCheckTool {
    /// 探测单个提供方
    #[allow(clippy::cast_possible_truncation)]
    async fn probe(&self, name: &str, url: &str) -> HealthCheck {
        let start = Instant::now();

        match self
            .client
            .get(url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            // 只要提供方应答即视为可达，状态码记录在消息里
            Ok(response) => HealthCheck {
                name: name.to_string(),
                status: "healthy".to_string(),
                duration_ms: start.elapsed().as_millis() as u64,
                message: Some(format!("HTTP {}", response.status())),
                error: None,
            },
            Err(e) => HealthCheck {
                name: name.to_string(),
                status: "unhealthy".to_string(),
                duration_ms: start.elapsed().as_millis() as u64,
                message: None,
                error: Some(format!("请求失败: {e}")),
            },
        }
    }

    /// 执行健康检查
    async fn perform_checks(&self, check_type: &str) -> HealthStatus {
        let mut checks = Vec::new();

        if matches!(check_type, "all" | "lichess") {
            checks.push(self.probe("lichess", &self.lichess_base).await);
        }
        if matches!(check_type, "all" | "metalprice") {
            checks.push(self.probe("metalprice", &self.metalprice_base).await);
        }

        let overall = if checks.iter().all(|c| c.status == "healthy") {
            "healthy"
        } else {
            "unhealthy"
        };

        HealthStatus {
            status: overall.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            checks,
            uptime: self.start_time.elapsed(),
        }
    }
}

#[async_trait]
impl ToolHandler for HealthCheckTool {
    async fn call(&self, arguments: BoundArguments) -> Result<String, ToolError> {
        // 缺省值已由参数绑定填入
        let check_type = arguments.get_str("check_type").unwrap_or("all").to_string();
        let verbose = arguments
            .get("verbose")
            .and_then(crate::gateway::ParamValue::as_bool)
            .unwrap_or(false);

        let mut status = self.perform_checks(&check_type).await;

        if verbose {
            return serde_json::to_string_pretty(&status)
                .map_err(|e| ToolError::Decode(e.to_string()));
        }

        // 非详细模式下只列出有问题的检查
        status.checks.retain(|c| c.status != "healthy");

        let mut summary = format!(
            "状态: {}\n运行时间: {:.2?}\n时间戳: {}",
            status.status, status.uptime, status.timestamp
        );
        if !status.checks.is_empty() {
            use std::fmt::Write;
            summary.push_str("\n\n检查结果:");
            for check in &status.checks {
                let _ = write!(
                    summary,
                    "\n- {}: {} ({}ms)",
                    check.name, check.status, check.duration_ms
                );
                if let Some(ref err) = check.error {
                    let _ = write!(summary, " [错误: {err}]");
                }
            }
        }

        Ok(summary)
    }
}
