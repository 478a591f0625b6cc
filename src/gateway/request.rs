//! Outbound request construction
//!
//! A [`RequestPlan`] fixes, per tool, the HTTP method, the URL path template
//! and which bound arguments become path segments, query parameters or
//! headers. [`RequestPlan::build`] resolves the plan against one set of
//! [`BoundArguments`] into a fully-formed [`OutboundRequest`], injecting the
//! provider [`Credential`] as a header. Building is deterministic: the same
//! bound arguments always produce the same request.

use crate::error::ToolError;
use crate::gateway::bind::BoundArguments;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use url::Url;

/// Provider credential, always injected as a request header and never as a
/// query parameter so it cannot leak into logs or URLs.
#[derive(Debug, Clone)]
pub struct Credential {
    name: HeaderName,
    value: HeaderValue,
}

impl Credential {
    /// `Authorization: Bearer <token>` credential.
    pub fn bearer(token: &str) -> crate::error::Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| crate::error::Error::Config(format!("无效的 bearer token: {e}")))?;
        value.set_sensitive(true);
        Ok(Self {
            name: AUTHORIZATION,
            value,
        })
    }

    /// Key header credential, e.g. `X-API-KEY: <key>`.
    pub fn api_key(header: &'static str, key: &str) -> crate::error::Result<Self> {
        let mut value = HeaderValue::from_str(key)
            .map_err(|e| crate::error::Error::Config(format!("无效的 API key: {e}")))?;
        value.set_sensitive(true);
        Ok(Self {
            name: HeaderName::from_static(header),
            value,
        })
    }
}

/// Per-tool request construction strategy.
#[derive(Debug, Clone)]
pub struct RequestPlan {
    method: Method,
    path: &'static str,
    query: Vec<(&'static str, &'static str)>,
    headers: Vec<(&'static str, &'static str)>,
    static_headers: Vec<(&'static str, &'static str)>,
}

impl RequestPlan {
    /// A GET plan for a path template such as `/api/board/game/stream/{gameId}`.
    ///
    /// `{name}` segments are substituted from the bound argument of that name
    /// at build time, percent-encoded as path segments.
    #[must_use]
    pub fn get(path: &'static str) -> Self {
        Self::new(Method::GET, path)
    }

    /// A POST plan for a path template.
    #[must_use]
    pub fn post(path: &'static str) -> Self {
        Self::new(Method::POST, path)
    }

    fn new(method: Method, path: &'static str) -> Self {
        Self {
            method,
            path,
            query: Vec::new(),
            headers: Vec::new(),
            static_headers: Vec::new(),
        }
    }

    /// Send the bound argument `arg` as query parameter `wire`.
    ///
    /// Absent optional arguments are simply left out of the query string.
    #[must_use]
    pub fn query_param(mut self, arg: &'static str, wire: &'static str) -> Self {
        self.query.push((arg, wire));
        self
    }

    /// Send the bound argument `arg` as request header `header`
    /// (lowercase name).
    #[must_use]
    pub fn header_param(mut self, arg: &'static str, header: &'static str) -> Self {
        self.headers.push((arg, header));
        self
    }

    /// Attach a fixed header (lowercase name) to every request built from
    /// this plan, e.g. `content-type`.
    #[must_use]
    pub fn static_header(mut self, header: &'static str, value: &'static str) -> Self {
        self.static_headers.push((header, value));
        self
    }

    /// Resolve this plan against one set of bound arguments.
    ///
    /// Query parameters are appended in the lexicographic iteration order of
    /// [`BoundArguments`] so the wire request never depends on map iteration
    /// nondeterminism, and values are percent-encoded so they round-trip
    /// through decoding unchanged. The credential header is attached last.
    pub fn build(
        &self,
        base: &Url,
        arguments: &BoundArguments,
        credential: &Credential,
    ) -> Result<OutboundRequest, ToolError> {
        let mut url = base.clone();

        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                ToolError::validation("base_url", "base URL cannot carry path segments")
            })?;
            segments.pop_if_empty();
            for segment in self.path.split('/').filter(|s| !s.is_empty()) {
                if let Some(name) = placeholder(segment) {
                    let value = arguments.get(name).ok_or_else(|| {
                        ToolError::validation(name, "argument is not bound for path substitution")
                    })?;
                    segments.push(&value.render());
                } else {
                    segments.push(segment);
                }
            }
        }

        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in arguments.iter() {
                if let Some(&(_, wire)) = self.query.iter().find(|(arg, _)| *arg == name) {
                    pairs.append_pair(wire, &value.render());
                }
            }
        }
        // 无查询参数时保持 URL 不带 `?`
        if url.query() == Some("") {
            url.set_query(None);
        }

        let mut headers = HeaderMap::new();
        for &(header, value) in &self.static_headers {
            headers.insert(HeaderName::from_static(header), HeaderValue::from_static(value));
        }
        for &(name, header) in &self.headers {
            if let Some(value) = arguments.get(name) {
                let value = HeaderValue::from_str(&value.render())
                    .map_err(|_| ToolError::validation(name, "value is not a valid header value"))?;
                headers.insert(HeaderName::from_static(header), value);
            }
        }
        headers.insert(credential.name.clone(), credential.value.clone());

        Ok(OutboundRequest {
            method: self.method.clone(),
            url,
            headers,
        })
    }
}

/// Extract the placeholder name of a `{name}` path segment.
fn placeholder(segment: &str) -> Option<&str> {
    segment.strip_prefix('{').and_then(|s| s.strip_suffix('}'))
}

/// A fully-formed outbound HTTP request.
///
/// Constructed fresh per invocation and consumed by the provider client;
/// never reused or mutated after dispatch.
#[derive(Debug)]
pub struct OutboundRequest {
    pub(crate) method: Method,
    pub(crate) url: Url,
    pub(crate) headers: HeaderMap,
}

impl OutboundRequest {
    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Fully-resolved URL including the query string.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Header set including the injected credential.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}
