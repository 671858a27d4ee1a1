use std::time::Duration;

use bkt_bitbucket_models::Page;
use reqwest::header::{ACCEPT, HeaderMap};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{BitbucketError, classify};

/// REST root of Bitbucket Cloud.
pub const DEFAULT_BASE_URL: &str = "https://api.bitbucket.org/2.0";

/// Deadline for ordinary requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Deadline for create and merge requests.
pub const LONG_TIMEOUT: Duration = Duration::from_secs(60);

/// Largest `pagelen` the paginated collections accept.
pub const MAX_PAGE_LEN: usize = 50;

/// A fully buffered response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    /// The body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Media type requested through the `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    Json,
    Text,
}

impl Accept {
    const fn mime(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/plain",
        }
    }
}

/// A single request against the REST surface.
///
/// `path` is relative to the client's base URL unless it is already an
/// absolute `http(s)://` URL, as `next` cursors and diff links are.
#[derive(Debug, Clone)]
pub struct ApiRequest<'a> {
    method: Method,
    path: &'a str,
    query: Vec<(&'a str, String)>,
    body: Option<serde_json::Value>,
    accept: Accept,
    timeout: Option<Duration>,
}

impl<'a> ApiRequest<'a> {
    #[must_use]
    pub const fn new(method: Method, path: &'a str) -> Self {
        Self {
            method,
            path,
            query: Vec::new(),
            body: None,
            accept: Accept::Json,
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: &[(&'a str, String)]) -> Self {
        self.query.extend_from_slice(query);
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// * [`BitbucketError::Encode`] if the body cannot be serialized.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, BitbucketError> {
        self.body = Some(serde_json::to_value(body).map_err(BitbucketError::Encode)?);
        Ok(self)
    }

    #[must_use]
    pub const fn with_accept(mut self, accept: Accept) -> Self {
        self.accept = accept;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Authenticated client for the Bitbucket Cloud REST API.
#[derive(Clone)]
pub struct BitbucketClient {
    http_client: reqwest::Client,
    token: String,
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for BitbucketClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitbucketClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl BitbucketClient {
    /// Create a client authenticating with a bearer token.
    ///
    /// # Errors
    ///
    /// * [`BitbucketError::Network`] if the HTTP transport cannot be built.
    pub fn new(token: impl Into<String>) -> Result<Self, BitbucketError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("bkt/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(BitbucketError::Network)?;

        Ok(Self {
            http_client,
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the default per-request deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{path}", self.base_url)
        }
    }

    /// Send a request and classify the outcome.
    ///
    /// # Errors
    ///
    /// * [`BitbucketError::Network`] on transport failure or timeout.
    /// * The status-derived variants for non-2xx responses.
    pub async fn send(&self, request: ApiRequest<'_>) -> Result<Response, BitbucketError> {
        let url = self.url_for(request.path);
        log::debug!("{} {url}", request.method);

        let mut builder = self
            .http_client
            .request(request.method.clone(), &url)
            .bearer_auth(&self.token)
            .header(ACCEPT, request.accept.mime())
            .timeout(request.timeout.unwrap_or(self.timeout));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(BitbucketError::Network)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(BitbucketError::Network)?
            .to_vec();

        log::trace!("{} {url} -> {status} ({} bytes)", request.method, body.len());

        classify(
            request.path,
            Response {
                status,
                headers,
                body,
            },
        )
    }

    /// `GET path?query`.
    ///
    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Response, BitbucketError> {
        self.send(ApiRequest::new(Method::GET, path).with_query(query))
            .await
    }

    /// `POST path` with an optional JSON body.
    ///
    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, BitbucketError> {
        let mut request = ApiRequest::new(Method::POST, path);
        if let Some(body) = body {
            request = request.with_json(body)?;
        }
        self.send(request).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, BitbucketError> {
        self.send(ApiRequest::new(Method::PUT, path).with_json(body)?)
            .await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn delete(&self, path: &str) -> Result<Response, BitbucketError> {
        self.send(ApiRequest::new(Method::DELETE, path)).await
    }

    /// Decode a JSON response body.
    ///
    /// # Errors
    ///
    /// * [`BitbucketError::Malformed`] if the body does not match `T`.
    pub fn parse<T: DeserializeOwned>(response: &Response) -> Result<T, BitbucketError> {
        serde_json::from_slice(&response.body).map_err(|e| BitbucketError::Malformed {
            message: e.to_string(),
        })
    }

    /// Collect up to `limit` items from a paginated collection.
    ///
    /// Follows `next` cursors in order and stops at the page that reaches the
    /// limit. Every request asks for at most the number of items still
    /// missing, capped at `MAX_PAGE_LEN`.
    ///
    /// # Errors
    ///
    /// Any error from fetching or decoding a page.
    pub async fn paginate<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        limit: usize,
    ) -> Result<Vec<T>, BitbucketError> {
        let mut items = Vec::new();
        if limit == 0 {
            return Ok(items);
        }

        let mut query = query.to_vec();
        query.push(("pagelen", limit.min(MAX_PAGE_LEN).to_string()));

        let mut page: Page<T> = Self::parse(&self.get(path, &query).await?)?;

        loop {
            let remaining = limit - items.len();
            items.extend(page.values.into_iter().take(remaining));

            if items.len() >= limit {
                break;
            }
            let Some(next) = page.next else {
                break;
            };

            let next = with_page_len(&next, (limit - items.len()).min(MAX_PAGE_LEN));
            log::trace!("Following page cursor {next} ({} items so far)", items.len());
            page = Self::parse(&self.get(&next, &[]).await?)?;
        }

        Ok(items)
    }
}

/// Replace the `pagelen` of a `next` cursor, keeping its other parameters.
fn with_page_len(cursor: &str, page_len: usize) -> String {
    let Ok(mut url) = reqwest::Url::parse(cursor) else {
        log::debug!("Following unparseable page cursor {cursor} verbatim");
        return cursor.to_string();
    };

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "pagelen")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("pagelen", &page_len.to_string());

    url.into()
}

/// Percent-encode a single path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Percent-encode a value that may contain `/`, keeping the slashes.
pub(crate) fn slashed_segments(value: &str) -> String {
    value.split('/').map(segment).collect::<Vec<_>>().join("/")
}

/// Quote a value for a `q=` filter expression.
pub(crate) fn filter_literal(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
