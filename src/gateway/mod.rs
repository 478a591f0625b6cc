//! Tool invocation gateway
//!
//! The generic machinery every tool goes through: a declarative parameter
//! schema ([`schema`]), argument validation and defaulting ([`bind`]),
//! outbound request construction ([`request`]), the bounded-timeout provider
//! client ([`client`]) and response interpretation ([`interpret`]).

pub mod bind;
pub mod client;
pub mod interpret;
pub mod request;
pub mod schema;

pub use bind::{bind, BoundArguments};
pub use client::{ProviderClient, ProviderResponse};
pub use interpret::{interpret, ResponseFormat};
pub use request::{Credential, OutboundRequest, RequestPlan};
pub use schema::{ParamKind, ParamValue, ParameterSpec, ToolSchema};
