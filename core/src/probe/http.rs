//! HTTP request probing

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONNECTION};
use reqwest::{Client, Method, Request, Url};
use schema::ProbeSpec;
use tokio::time::timeout;
use tracing::{debug, info};

use super::{Expectation, Probe, ProbeError, ProbeOptions, ProbeResponse};

/// HTTP probe that sends one request per execution and collects the response
///
/// Each execution builds a fresh client with connection pooling disabled, so
/// no connection is ever reused between probes. The request carries no body
/// regardless of method.
///
/// # Example
///
/// ```rust,no_run
/// use tripwire_core::probe::{HttpProbe, Probe, ProbeOptions};
/// use tripwire_core::ProbeSpec;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let spec = ProbeSpec {
///     code_range: "200-299".to_string(),
///     contains: "healthy".to_string(),
///     ..ProbeSpec::new("http://127.0.0.1:8080/health")
/// };
/// let probe = HttpProbe::new(spec, ProbeOptions::default())?;
///
/// match probe.check().await {
///     Ok(()) => println!("probe passed"),
///     Err(e) => println!("probe failed: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpProbe {
    spec: ProbeSpec,
    expect: Expectation,
    options: ProbeOptions,
}

impl HttpProbe {
    /// Create a new HTTP probe
    ///
    /// Fails with [`ProbeError::InvalidRange`] when the probe's range text is
    /// malformed; nothing is sent in that case.
    pub fn new(spec: ProbeSpec, options: ProbeOptions) -> Result<Self, ProbeError> {
        let expect = Expectation::from_spec(&spec)?;
        Ok(Self {
            spec,
            expect,
            options,
        })
    }

    /// Get the probe definition
    pub fn spec(&self) -> &ProbeSpec {
        &self.spec
    }

    fn client(&self) -> Result<Client, ProbeError> {
        Client::builder()
            .pool_max_idle_per_host(0)
            .danger_accept_invalid_certs(self.options.accept_invalid_certs)
            .build()
            .map_err(ProbeError::Request)
    }

    fn build_request(&self, client: &Client) -> Result<Request, ProbeError> {
        let url = Url::parse(&self.spec.url).map_err(|e| ProbeError::InvalidUrl {
            url: self.spec.url.clone(),
            reason: e.to_string(),
        })?;

        let method_text = self.spec.method_or_default();
        let method =
            Method::from_bytes(method_text.as_bytes()).map_err(|e| ProbeError::InvalidMethod {
                method: method_text.to_string(),
                reason: e.to_string(),
            })?;

        client
            .request(method, url)
            .headers(self.headers()?)
            .build()
            .map_err(ProbeError::Request)
    }

    /// Headers are appended, so names differing only by case keep every value
    fn headers(&self) -> Result<HeaderMap, ProbeError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.spec.headers {
            let invalid = |reason: String| ProbeError::InvalidHeader {
                name: name.clone(),
                reason,
            };
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
            let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
            headers.append(header_name, header_value);
        }
        if !headers.contains_key(CONNECTION) {
            headers.insert(CONNECTION, HeaderValue::from_static("close"));
        }
        Ok(headers)
    }

    fn trace(&self, request: &Request) {
        if self.options.verbose {
            info!(
                probe = %self.spec,
                code_range = %self.spec.code_range,
                contains = %self.spec.contains,
                raw_request = %dump_request(request),
                "Calling server"
            );
        } else {
            info!(
                probe = %self.spec,
                code_range = %self.spec.code_range,
                contains = %self.spec.contains,
                "Calling server"
            );
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn execute(&self) -> Result<ProbeResponse, ProbeError> {
        let client = self.client()?;
        let request = self.build_request(&client)?;
        self.trace(&request);

        let ceiling = self.options.response_header_timeout;
        let response = match timeout(ceiling, client.execute(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(error)) if error.is_timeout() => {
                debug!("HTTP probe to {} timed out: {}", self.spec.url, error);
                return Err(ProbeError::Timeout(ceiling));
            }
            Ok(Err(error)) => {
                debug!("HTTP probe to {} failed: {}", self.spec.url, error);
                return Err(ProbeError::Transport(error));
            }
            Err(_elapsed) => {
                debug!("HTTP probe to {} timed out after {:?}", self.spec.url, ceiling);
                return Err(ProbeError::Timeout(ceiling));
            }
        };

        let status = response.status().as_u16();
        info!(probe = %self.spec, status, "Got response status code");

        let body = match timeout(ceiling, response.bytes()).await {
            Ok(Ok(bytes)) => bytes.to_vec(),
            Ok(Err(source)) => return Err(ProbeError::BodyRead { status, source }),
            Err(_elapsed) => {
                debug!("HTTP probe body read timed out after {:?}", ceiling);
                return Err(ProbeError::Timeout(ceiling));
            }
        };

        if body.is_empty() {
            debug!("Empty body in the response, status: {}", status);
        }

        Ok(ProbeResponse { status, body })
    }

    fn expectation(&self) -> &Expectation {
        &self.expect
    }
}

/// Render a request the way it goes on the wire, minus the body
fn dump_request(request: &Request) -> String {
    let mut dump = format!("{} {} HTTP/1.1\r\n", request.method(), request.url());
    for (name, value) in request.headers() {
        dump.push_str(&format!(
            "{}: {}\r\n",
            name,
            String::from_utf8_lossy(value.as_bytes())
        ));
    }
    dump.push_str("\r\n");
    dump
}
