//! MCP 处理器实现

use crate::error::ToolError;
use crate::server::GatewayServer;
use crate::tools::ToolRegistry;
use async_trait::async_trait;
use rust_mcp_sdk::{
    mcp_server::ServerHandler,
    schema::{
        CallToolError, CallToolRequestParams, CallToolResult, GetPromptRequestParams,
        GetPromptResult, ListPromptsResult, ListResourcesResult, ListToolsResult,
        PaginatedRequestParams, ReadResourceRequestParams, ReadResourceResult, RpcError,
    },
    McpServer,
};
use std::sync::Arc;

/// MCP 服务器处理器
pub struct GatewayHandler {
    server: Arc<GatewayServer>,
}

impl GatewayHandler {
    /// 创建新的处理器
    #[must_use]
    pub fn new(server: Arc<GatewayServer>) -> Self {
        Self { server }
    }

    /// 获取工具注册器
    fn tool_registry(&self) -> &ToolRegistry {
        self.server.tool_registry()
    }
}

#[async_trait]
impl ServerHandler for GatewayHandler {
    /// 处理列出工具请求
    async fn handle_list_tools_request(
        &self,
        _request: Option<PaginatedRequestParams>,
        _runtime: std::sync::Arc<dyn McpServer>,
    ) -> std::result::Result<ListToolsResult, RpcError> {
        let tools = self.tool_registry().get_tools();

        Ok(ListToolsResult {
            tools,
            meta: None,
            next_cursor: None,
        })
    }

    /// 处理调用工具请求
    async fn handle_call_tool_request(
        &self,
        params: CallToolRequestParams,
        _runtime: std::sync::Arc<dyn McpServer>,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let arguments = params
            .arguments
            .map_or(serde_json::Value::Null, serde_json::Value::Object);

        match self.tool_registry().invoke(&params.name, &arguments).await {
            Ok(payload) => Ok(CallToolResult::text_content(vec![payload.into()])),
            Err(ToolError::NotFound(name)) => Err(CallToolError::unknown_tool(name)),
            Err(err @ ToolError::Validation { .. }) => Err(CallToolError::invalid_arguments(
                params.name.as_str(),
                Some(err.to_string()),
            )),
            Err(err) => Err(CallToolError::from_message(err.to_string())),
        }
    }

    /// 处理列出资源请求
    async fn handle_list_resources_request(
        &self,
        _request: Option<PaginatedRequestParams>,
        _runtime: std::sync::Arc<dyn McpServer>,
    ) -> std::result::Result<ListResourcesResult, RpcError> {
        // 当前不提供资源
        Ok(ListResourcesResult {
            resources: vec![],
            meta: None,
            next_cursor: None,
        })
    }

    /// 处理读取资源请求
    async fn handle_read_resource_request(
        &self,
        _params: ReadResourceRequestParams,
        _runtime: std::sync::Arc<dyn McpServer>,
    ) -> std::result::Result<ReadResourceResult, RpcError> {
        // 当前不提供资源
        Err(RpcError::invalid_request().with_message("资源未找到".to_string()))
    }

    /// 处理列出提示请求
    async fn handle_list_prompts_request(
        &self,
        _request: Option<PaginatedRequestParams>,
        _runtime: std::sync::Arc<dyn McpServer>,
    ) -> std::result::Result<ListPromptsResult, RpcError> {
        // 当前不提供提示
        Ok(ListPromptsResult {
            prompts: vec![],
            meta: None,
            next_cursor: None,
        })
    }

    /// 处理获取提示请求
    async fn handle_get_prompt_request(
        &self,
        _params: GetPromptRequestParams,
        _runtime: std::sync::Arc<dyn McpServer>,
    ) -> std::result::Result<GetPromptResult, RpcError> {
        // 当前不提供提示
        Err(RpcError::invalid_request().with_message("提示未找到".to_string()))
    }
}
