//! Executes `HttpRequest`s built by `TodoClient`.
//!
//! `AppState` is generic over `Transport`, so the same state logic runs over
//! real HTTP (`UreqTransport`) or over scripted responses in tests.

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

pub trait Transport {
    /// Perform one round-trip. Non-2xx statuses are returned as data, not as
    /// errors; only delivery failures are `Err`.
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use super::Transport;
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport over `ureq`.
    ///
    /// Disables ureq's status-code-as-error behavior so 4xx/5xx responses
    /// reach `TodoClient::parse_*` for interpretation.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
            tracing::debug!(method = req.method.as_str(), path = %req.path, "sending request");
            let agent = &self.agent;
            let body = req.body.unwrap_or_default();
            let result = match req.method {
                HttpMethod::Get => agent.get(&req.path).call(),
                HttpMethod::Delete => agent.delete(&req.path).call(),
                HttpMethod::Post => agent
                    .post(&req.path)
                    .content_type("application/json")
                    .send(body.as_bytes()),
                HttpMethod::Put => agent
                    .put(&req.path)
                    .content_type("application/json")
                    .send(body.as_bytes()),
                HttpMethod::Patch => agent.patch(&req.path).send_empty(),
            };
            let mut response = result.map_err(|e| TransportError(e.to_string()))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|e| TransportError(e.to_string()))?;

            tracing::debug!(status, "received response");
            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
