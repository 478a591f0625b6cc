//! MCP tools module
//!
//! Tool handlers, the generic HTTP-backed tool and the tool registry that
//! dispatches invocations by name.

pub mod health;
pub mod lichess;
pub mod metalprice;

use crate::config::ProvidersConfig;
use crate::error::ToolError;
use crate::gateway::{
    bind, interpret, BoundArguments, Credential, ProviderClient, RequestPlan, ResponseFormat,
    ToolSchema,
};
use async_trait::async_trait;
use rust_mcp_sdk::schema::Tool as McpTool;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Handler behind one registered tool, invoked with already-bound arguments.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool. Returns the success payload or a typed error;
    /// never panics on caller input.
    async fn call(&self, arguments: BoundArguments) -> Result<String, ToolError>;
}

/// The standard handler: one outbound HTTP request per invocation.
///
/// Composes the gateway pipeline — request construction from the per-tool
/// [`RequestPlan`], one bounded provider call, response interpretation.
pub struct HttpTool {
    client: ProviderClient,
    base: Url,
    credential: Credential,
    format: ResponseFormat,
    plan: RequestPlan,
    timeout: Duration,
}

impl HttpTool {
    /// Create a handler for one tool.
    #[must_use]
    pub fn new(
        client: ProviderClient,
        base: Url,
        credential: Credential,
        format: ResponseFormat,
        plan: RequestPlan,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            base,
            credential,
            format,
            plan,
            timeout,
        }
    }
}

#[async_trait]
impl ToolHandler for HttpTool {
    async fn call(&self, arguments: BoundArguments) -> Result<String, ToolError> {
        let request = self.plan.build(&self.base, &arguments, &self.credential)?;
        tracing::debug!(method = %request.method(), url = %request.url(), "dispatching provider request");

        let response = self.client.execute(request, self.timeout).await?;
        tracing::debug!(status = %response.status, bytes = response.body.len(), "provider responded");

        interpret(self.format, &response)
    }
}

struct RegisteredTool {
    schema: ToolSchema,
    definition: McpTool,
    handler: Box<dyn ToolHandler>,
}

/// Tool registry
///
/// Built once at startup, read-only for the lifetime of the process.
/// Invocations only read it, so concurrent calls need no locking.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, RegisteredTool>,
}

impl ToolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool.
    ///
    /// Registering two schemas under the same name is a startup-time
    /// configuration error and panics; it is never a condition tools handle
    /// at runtime.
    #[must_use]
    pub fn register<H: ToolHandler + 'static>(mut self, (schema, handler): (ToolSchema, H)) -> Self {
        let name = schema.name();
        let definition = schema.to_tool();
        let previous = self.tools.insert(
            name,
            RegisteredTool {
                schema,
                definition,
                handler: Box::new(handler),
            },
        );
        assert!(previous.is_none(), "tool `{name}` registered twice");
        self
    }

    /// All tool definitions, in stable name order.
    #[must_use]
    pub fn get_tools(&self) -> Vec<McpTool> {
        self.tools.values().map(|t| t.definition.clone()).collect()
    }

    /// Schema of one registered tool.
    #[must_use]
    pub fn schema(&self, name: &str) -> Option<&ToolSchema> {
        self.tools.get(name).map(|t| &t.schema)
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name: bind arguments against its schema, then run
    /// its handler. Short-circuits at the first failure; every failure comes
    /// back as a [`ToolError`] value.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: &serde_json::Value,
    ) -> Result<String, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        let bound = bind(&tool.schema, arguments)?;
        tool.handler.call(bound).await
    }
}

/// Create the default tool registry over both providers.
///
/// Resolves credentials from the environment; a missing credential is fatal
/// here, at startup, not during an invocation.
pub fn create_default_registry(providers: &ProvidersConfig) -> crate::error::Result<ToolRegistry> {
    let credentials = providers.credentials()?;
    let client = ProviderClient::new()?;

    let lichess = lichess::Lichess::new(
        client.clone(),
        &providers.lichess.base_url,
        &credentials.lichess_token,
    )?;
    let metalprice = metalprice::MetalPrice::new(
        client,
        &providers.metalprice.base_url,
        &credentials.metalprice_key,
    )?;

    Ok(ToolRegistry::new()
        .register(lichess.board_status())
        .register(lichess.connect_game())
        .register(lichess.board_move())
        .register(metalprice.list_symbols())
        .register(metalprice.live_rates())
        .register(metalprice.historical_rates())
        .register(metalprice.timeframe())
        .register(metalprice.ohlc())
        .register(health::health_check(providers)?))
}
