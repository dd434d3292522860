use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Method,
};
use serde_json::Value;
use url::Url;

use super::{
    errors::ClientError,
    response::{decode_body, RawResponse, ResourceHeaders},
};
use crate::errors::OperationError;

/// Bearer token presented on every request of one client.
#[derive(Clone, Eq, PartialEq)]
pub struct Credential(String);

impl Credential {
    /// # Errors
    ///
    /// `InvalidToken` when the token is blank or cannot be sent as a header.
    pub fn new(token: impl Into<String>) -> Result<Self, ClientError> {
        let token = token.into();
        if token.trim().is_empty() || HeaderValue::from_str(&token).is_err() {
            return Err(ClientError::InvalidToken);
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Form(Vec<(String, String)>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Relative to the base URL, or absolute.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn json(mut self, body: Option<Value>) -> Self {
        self.body = body.map(RequestBody::Json);
        self
    }

    #[must_use]
    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Some(RequestBody::Form(fields));
        self
    }
}

/// HTTP plumbing bound to one base URL with JSON default headers.
#[derive(Clone, Debug)]
pub struct Transport {
    base: Url,
    client: reqwest::Client,
}

impl Transport {
    /// # Errors
    ///
    /// Fails if provided `Url` cannot be a base. We rely on that
    /// invariant in [`Transport::url`].
    pub fn new(base: Url) -> Result<Self, ClientError> {
        if base.cannot_be_a_base() {
            return Err(ClientError::CannotBeBase(base));
        }

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(concat!("smapi-rs/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { base, client })
    }

    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// A `?query` suffix on a relative `path` becomes the URL query.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the URL cannot be a base or `path` is an
    /// unparsable absolute URL.
    pub fn url(&self, path: &str) -> Result<Url, ClientError> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }

        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };

        let mut url = self.base.clone();
        let url_clone = url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::CannotBeBase(url_clone))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        url.set_query(query.filter(|q| !q.is_empty()));
        Ok(url)
    }

    /// Issues `request`; any non-2xx outcome comes back as an
    /// [`OperationError`].
    ///
    /// # Errors
    ///
    /// `Operation` for non-2xx responses, `Reqwest` when no response was
    /// received at all.
    pub async fn send(
        &self,
        request: &ApiRequest,
        credential: Option<&Credential>,
    ) -> Result<RawResponse, ClientError> {
        let url = self.url(&request.path)?;
        log::debug!("{} {url} query={:?}", request.method, request.query);

        let mut builder = self.client.request(request.method.clone(), url.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(credential) = credential {
            builder = builder.header(header::AUTHORIZATION, credential.as_str());
        }
        builder = match &request.body {
            Some(RequestBody::Json(body)) => builder.json(body),
            Some(RequestBody::Form(fields)) => builder.form(fields),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = ResourceHeaders::from_header_map(response.headers());
        let bytes = response.bytes().await?;
        let body = decode_body(&bytes);

        log::debug!("{} {url} returned {status}", request.method);

        if !status.is_success() {
            log::debug!("Error payload: {body}");
            return Err(ClientError::from(OperationError::new(status, body)));
        }

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn transport(base: &str) -> Transport {
        Transport::new(Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn test_relative_path_joins_base() {
        let url = transport("https://api.amazonalexa.com")
            .url("/v1/skills/skill-1/status")
            .unwrap();
        assert_eq!(url.as_str(), "https://api.amazonalexa.com/v1/skills/skill-1/status");
    }

    #[test]
    fn test_base_with_path_prefix() {
        let url = transport("http://localhost:9000/mock/").url("v0/vendors").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/mock/v0/vendors");
    }

    #[test]
    fn test_relative_path_keeps_its_query() {
        let url = transport("https://api.amazonalexa.com")
            .url("/v1/skills?vendorId=M1&maxResults=5")
            .unwrap();
        assert_eq!(url.path(), "/v1/skills");
        assert_eq!(url.query(), Some("vendorId=M1&maxResults=5"));

        let url = transport("https://api.amazonalexa.com").url("/v1/vendors?").unwrap();
        assert_eq!(url.as_str(), "https://api.amazonalexa.com/v1/vendors");
    }

    #[test]
    fn test_absolute_path_is_used_verbatim() {
        let url = transport("https://api.amazonalexa.com")
            .url("https://api.amazon.com/auth/o2/token")
            .unwrap();
        assert_eq!(url.host_str(), Some("api.amazon.com"));
    }

    #[test]
    fn test_cannot_be_base() {
        let err = Transport::new(Url::parse("mailto:someone@example.com").unwrap()).unwrap_err();
        assert!(matches!(err, ClientError::CannotBeBase(_)));
    }

    #[test]
    fn test_credential_validation() {
        assert!(Credential::new("Atza|token").is_ok());
        assert!(matches!(Credential::new("   "), Err(ClientError::InvalidToken)));
        assert!(matches!(Credential::new("bad\ntoken"), Err(ClientError::InvalidToken)));
        assert_eq!(
            format!("{:?}", Credential::new("secret").unwrap()),
            "Credential(<redacted>)"
        );
    }
}
