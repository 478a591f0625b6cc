//! Response interpretation and error normalization
//!
//! Providers report failure in different shapes: Lichess answers with a bare
//! payload, MetalpriceAPI wraps everything in a
//! `{success, error: {statusCode, message}}` envelope — including on HTTP
//! 200. [`interpret`] normalizes both into exactly one of success payload or
//! [`ToolError`]. The envelope is decoded regardless of HTTP status.

use crate::error::ToolError;
use crate::gateway::client::ProviderResponse;

/// How a provider encodes success and failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// No envelope: the raw body is the success payload, relayed verbatim.
    Bare,
    /// `{success: bool, error: {statusCode, ...}}` wrapper around the payload.
    Enveloped,
}

/// Decode one provider response into the tool's normalized result.
pub fn interpret(format: ResponseFormat, response: &ProviderResponse) -> Result<String, ToolError> {
    match format {
        ResponseFormat::Bare => Ok(String::from_utf8_lossy(&response.body).into_owned()),
        ResponseFormat::Enveloped => {
            let value: serde_json::Value = serde_json::from_slice(&response.body)
                .map_err(|e| ToolError::Decode(e.to_string()))?;

            if value.get("success").and_then(serde_json::Value::as_bool) == Some(false) {
                let code = value
                    .pointer("/error/statusCode")
                    .and_then(serde_json::Value::as_i64)
                    .ok_or_else(|| {
                        ToolError::Decode("error envelope carries no statusCode".to_string())
                    })?;
                return Err(provider_error(code));
            }

            serde_json::to_string_pretty(&value).map_err(|e| ToolError::Decode(e.to_string()))
        }
    }
}

/// Map a provider status code through the fixed code table.
#[must_use]
pub fn provider_error(code: i64) -> ToolError {
    let message = match code {
        404 => "User requested a non-existent API function",
        101 => "User did not supply an API Key",
        102 => "User did not supply an access key or supplied an invalid access key",
        103 => {
            "The user's account is not active. User will be prompted to get in touch with Customer Support"
        }
        104 => "Too Many Requests",
        105 => {
            "User has reached or exceeded his subscription plan's monthly API request allowance"
        }
        201 => "User entered an invalid Base Currency [ latest, historical, timeframe, change ]",
        202 => "User entered an invalid from Currency [ convert ]",
        203 => "User entered invalid to currency [ convert ]",
        204 => "User entered invalid amount [ convert ]",
        205 => "User entered invalid date [ historical, convert, timeframe, change ]",
        206 => "Invalid timeframe [ timeframe, change ]",
        207 => "Timeframe exceeded 365 days [ timeframe ]",
        300 => "The user's query did not return any results [ latest, historical, convert, timeframe, change ]",
        _ => {
            return ToolError::Provider {
                code,
                message: format!("Unrecognized provider status code {code}"),
            }
        }
    };

    ToolError::Provider {
        code,
        message: message.to_string(),
    }
}
