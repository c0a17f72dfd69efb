//! Helpers shared by the import converters.

use url::Url;

use courier_domain::{CONTENT_TYPE_JSON, HttpMethod, HttpRequest, KvParam};

/// Splits a URI at its first `?`.
///
/// Everything after the first `?` is read as a query string; each decoded
/// pair becomes an enabled parameter, in order.
pub fn split_uri(uri: &str) -> (String, Vec<KvParam>) {
    let Some((base, rest)) = uri.split_once('?') else {
        return (uri.to_string(), Vec::new());
    };
    let params = Url::parse(&format!("http://localhost/?{rest}"))
        .map(|url| {
            url.query_pairs()
                .map(|(k, v)| KvParam::new(k, v))
                .collect()
        })
        .unwrap_or_default();
    (base.to_string(), params)
}

/// Guesses the content type of an imported body.
///
/// A body starting with `{` and ending with `}` is JSON; anything else has
/// no content type.
pub fn sniff_content_type(body: &str) -> &'static str {
    if body.starts_with('{') && body.ends_with('}') {
        CONTENT_TYPE_JSON
    } else {
        ""
    }
}

/// Request fields read from a foreign export.
#[derive(Debug, Default)]
pub struct RequestParts {
    pub method: String,
    pub uri: String,
    pub body: String,
    pub query: Vec<KvParam>,
    pub headers: Vec<KvParam>,
}

impl RequestParts {
    /// Builds the request: query parameters from the URI follow the
    /// explicit ones, and the content type is sniffed from the body.
    ///
    /// Unknown methods fall back to GET.
    pub fn into_request(self) -> HttpRequest {
        let method = self.method.parse().unwrap_or_else(|_| {
            tracing::warn!(method = %self.method, "unknown method in import, using GET");
            HttpMethod::Get
        });
        let (uri, uri_query) = split_uri(&self.uri);
        let mut query = self.query;
        query.extend(uri_query);

        HttpRequest {
            method,
            uri,
            content_type: sniff_content_type(&self.body).to_string(),
            body: self.body,
            query,
            headers: self.headers,
            auth: Vec::new(),
        }
    }
}
