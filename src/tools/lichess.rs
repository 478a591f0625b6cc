//! Lichess board tools
//!
//! Tools over the Lichess board API. Lichess answers with bare payloads
//! (NDJSON for the game stream, `{"ok":true}` style bodies for moves), so
//! every tool here uses [`ResponseFormat::Bare`] and relays the body
//! verbatim.

use crate::gateway::{
    Credential, ParamKind, ParameterSpec, ProviderClient, RequestPlan, ResponseFormat, ToolSchema,
};
use crate::tools::HttpTool;
use std::time::Duration;
use url::Url;

/// 游戏状态查询超时（流式端点，读满即止）
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// 走子超时
const MOVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tool factory for the Lichess board provider.
pub struct Lichess {
    client: ProviderClient,
    base: Url,
    credential: Credential,
}

impl Lichess {
    /// Create the factory from the configured base URL and bearer token.
    pub fn new(client: ProviderClient, base_url: &str, token: &str) -> crate::error::Result<Self> {
        Ok(Self {
            client,
            base: Url::parse(base_url)?,
            credential: Credential::bearer(token)?,
        })
    }

    fn tool(&self, plan: RequestPlan, timeout: Duration) -> HttpTool {
        HttpTool::new(
            self.client.clone(),
            self.base.clone(),
            self.credential.clone(),
            ResponseFormat::Bare,
            plan,
            timeout,
        )
    }

    /// `board_status`: get the current state of a game.
    #[must_use]
    pub fn board_status(&self) -> (ToolSchema, HttpTool) {
        let schema = ToolSchema::new("board_status", "Get the status of a game by gameId").param(
            ParameterSpec::required(
                "gameId",
                ParamKind::String,
                "Id of the game to get the status of",
            ),
        );
        let plan = RequestPlan::get("/api/board/game/stream/{gameId}");
        (schema, self.tool(plan, STATUS_TIMEOUT))
    }

    /// `connect_game`: attach to a game stream.
    #[must_use]
    pub fn connect_game(&self) -> (ToolSchema, HttpTool) {
        let schema = ToolSchema::new("connect_game", "Connect to a game with gameId").param(
            ParameterSpec::required(
                "gameId",
                ParamKind::String,
                "GameId of the game to connect to",
            ),
        );
        let plan = RequestPlan::get("/api/board/game/stream/{gameId}");
        (schema, self.tool(plan, STATUS_TIMEOUT))
    }

    /// `board_move`: play a move, optionally offering a draw.
    #[must_use]
    pub fn board_move(&self) -> (ToolSchema, HttpTool) {
        let schema = ToolSchema::new("board_move", "Make a move on the board")
            .param(ParameterSpec::required(
                "gameId",
                ParamKind::String,
                "Id of the game to make a move on",
            ))
            .param(ParameterSpec::required(
                "move",
                ParamKind::String,
                "The move to play, in UCI format",
            ))
            .param(ParameterSpec::optional(
                "offerDraw",
                ParamKind::Boolean,
                "Whether to offer (or agree to) a draw",
            ));
        let plan = RequestPlan::post("/api/board/game/{gameId}/move/{move}")
            .query_param("offerDraw", "offeringDraw");
        (schema, self.tool(plan, MOVE_TIMEOUT))
    }
}
