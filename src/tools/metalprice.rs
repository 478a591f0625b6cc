//! MetalpriceAPI pricing tools
//!
//! Tools over the MetalpriceAPI metals/currency endpoints. The provider
//! wraps every response — success and failure, on HTTP 200 and 404 alike —
//! in a `{success, error: {statusCode, message}}` envelope, so every tool
//! here uses [`ResponseFormat::Enveloped`] and goes through the provider
//! code table.

use crate::gateway::{
    Credential, ParamKind, ParameterSpec, ProviderClient, RequestPlan, ResponseFormat, ToolSchema,
};
use crate::tools::HttpTool;
use std::time::Duration;
use url::Url;

/// 行情请求超时
const PRICING_TIMEOUT: Duration = Duration::from_secs(5);

/// Tool factory for the MetalpriceAPI provider.
pub struct MetalPrice {
    client: ProviderClient,
    base: Url,
    credential: Credential,
}

impl MetalPrice {
    /// Create the factory from the configured base URL and API key.
    pub fn new(client: ProviderClient, base_url: &str, api_key: &str) -> crate::error::Result<Self> {
        Ok(Self {
            client,
            base: Url::parse(base_url)?,
            credential: Credential::api_key("x-api-key", api_key)?,
        })
    }

    fn tool(&self, plan: RequestPlan) -> HttpTool {
        HttpTool::new(
            self.client.clone(),
            self.base.clone(),
            self.credential.clone(),
            ResponseFormat::Enveloped,
            plan.static_header("content-type", "application/json"),
            PRICING_TIMEOUT,
        )
    }

    /// `list_symbols`: all symbols the provider quotes.
    #[must_use]
    pub fn list_symbols(&self) -> (ToolSchema, HttpTool) {
        let schema = ToolSchema::new("list_symbols", "List all available symbols");
        (schema, self.tool(RequestPlan::get("/symbols")))
    }

    /// `live_rates`: latest rates for a base currency.
    #[must_use]
    pub fn live_rates(&self) -> (ToolSchema, HttpTool) {
        let schema = ToolSchema::new("live_rates", "Get the latest metal and currency rates")
            .param(
                ParameterSpec::optional(
                    "base",
                    ParamKind::String,
                    "Three-letter currency code of the preferred base currency",
                )
                .with_default("USD"),
            )
            .param(ParameterSpec::optional(
                "currencies",
                ParamKind::String,
                "Comma-separated list of currency codes to limit the result to",
            ))
            .param(ParameterSpec::optional(
                "unit",
                ParamKind::String,
                "Weight unit for metal rates, e.g. toz, gram, kilogram",
            ));
        let plan = RequestPlan::get("/latest")
            .query_param("base", "base")
            .query_param("currencies", "currencies")
            .query_param("unit", "unit");
        (schema, self.tool(plan))
    }

    /// `historical_rates`: rates on one past date.
    #[must_use]
    pub fn historical_rates(&self) -> (ToolSchema, HttpTool) {
        let schema = ToolSchema::new(
            "historical_rates",
            "Get historical rates for a specific date",
        )
        .param(ParameterSpec::required(
            "date",
            ParamKind::String,
            "Date in YYYY-MM-DD format",
        ))
        .param(
            ParameterSpec::optional(
                "base",
                ParamKind::String,
                "Three-letter currency code of the preferred base currency",
            )
            .with_default("USD"),
        )
        .param(ParameterSpec::optional(
            "currencies",
            ParamKind::String,
            "Comma-separated list of currency codes to limit the result to",
        ))
        .param(ParameterSpec::optional(
            "unit",
            ParamKind::String,
            "Weight unit for metal rates, e.g. toz, gram, kilogram",
        ));
        let plan = RequestPlan::get("/{date}")
            .query_param("base", "base")
            .query_param("currencies", "currencies")
            .query_param("unit", "unit");
        (schema, self.tool(plan))
    }

    /// `timeframe`: daily rates between two dates.
    #[must_use]
    pub fn timeframe(&self) -> (ToolSchema, HttpTool) {
        let schema = ToolSchema::new("timeframe", "Get daily rates for a timeframe between two dates")
            .param(ParameterSpec::required(
                "start_date",
                ParamKind::String,
                "First date of the timeframe, YYYY-MM-DD",
            ))
            .param(ParameterSpec::required(
                "end_date",
                ParamKind::String,
                "Last date of the timeframe, YYYY-MM-DD",
            ))
            .param(
                ParameterSpec::optional(
                    "base",
                    ParamKind::String,
                    "Three-letter currency code of the preferred base currency",
                )
                .with_default("USD"),
            )
            .param(ParameterSpec::optional(
                "currencies",
                ParamKind::String,
                "Comma-separated list of currency codes to limit the result to",
            ));
        let plan = RequestPlan::get("/timeframe")
            .query_param("start_date", "start_date")
            .query_param("end_date", "end_date")
            .query_param("base", "base")
            .query_param("currencies", "currencies");
        (schema, self.tool(plan))
    }

    /// `ohlc`: open/high/low/close prices for one currency.
    #[must_use]
    pub fn ohlc(&self) -> (ToolSchema, HttpTool) {
        let schema = ToolSchema::new("ohlc", "Get open, high, low and close prices for a currency")
            .param(ParameterSpec::required(
                "currency",
                ParamKind::String,
                "Currency code to get OHLC prices for",
            ))
            .param(
                ParameterSpec::optional(
                    "base",
                    ParamKind::String,
                    "Three-letter currency code of the preferred base currency",
                )
                .with_default("USD"),
            )
            .param(ParameterSpec::optional(
                "date",
                ParamKind::String,
                "Date in YYYY-MM-DD format, defaults to the latest trading day",
            ))
            .param(ParameterSpec::optional(
                "unit",
                ParamKind::String,
                "Weight unit for metal rates, e.g. toz, gram, kilogram",
            ))
            .param(
                ParameterSpec::optional(
                    "date_type",
                    ParamKind::String,
                    "Market calendar the date refers to",
                )
                .with_allowed(&["commodity", "forex"]),
            )
            .param(ParameterSpec::optional(
                "math",
                ParamKind::String,
                "Price calculation mode passed through to the provider",
            ));
        let plan = RequestPlan::get("/ohlc")
            .query_param("currency", "currency")
            .query_param("base", "base")
            .query_param("date", "date")
            .query_param("unit", "unit")
            .query_param("date_type", "date_type")
            .query_param("math", "math");
        (schema, self.tool(plan))
    }
}
