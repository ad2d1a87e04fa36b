use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::core::{
    body::{read_to_bytes, BytesBody},
    http::{HTTPRequest, HTTPResponse, Headers, HttpVersion},
    transport::RoundTripper,
    Error, Result,
};

/// Default underlying transport, backed by a [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl RoundTripper for ReqwestTransport {
    async fn round_trip(&self, mut request: HTTPRequest) -> Result<HTTPResponse> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|err| Error::InvalidRequest(format!("method {}: {err}", request.method)))?;
        let headers = to_header_map(&request.headers)?;

        let mut builder = self
            .client
            .request(method, request.url.clone())
            .headers(headers);
        if let Some(body) = request.body.take() {
            builder = builder.body(read_to_bytes(body)?);
        }

        let response = builder.send().await.map_err(Error::transport)?;

        let version = from_reqwest_version(response.version());
        let status = response.status();
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            headers
                .entry(name.as_str().to_owned())
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }
        let body = response.bytes().await.map_err(Error::transport)?;

        Ok(HTTPResponse {
            version,
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_owned(),
            headers,
            body: BytesBody::new(body).boxed(),
            request,
        })
    }
}

fn to_header_map(headers: &Headers) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, values) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| Error::InvalidRequest(format!("header name {name:?}: {err}")))?;
        for value in values {
            let value = HeaderValue::from_str(value)
                .map_err(|err| Error::InvalidRequest(format!("header {name}: {err}")))?;
            map.append(name.clone(), value);
        }
    }
    Ok(map)
}

fn from_reqwest_version(version: reqwest::Version) -> HttpVersion {
    if version == reqwest::Version::HTTP_09 {
        HttpVersion::Http09
    } else if version == reqwest::Version::HTTP_10 {
        HttpVersion::Http10
    } else if version == reqwest::Version::HTTP_2 {
        HttpVersion::H2
    } else if version == reqwest::Version::HTTP_3 {
        HttpVersion::H3
    } else {
        HttpVersion::Http11
    }
}
