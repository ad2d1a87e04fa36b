#![allow(dead_code)]

use std::io::{self, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use http_caching_transport::core::body::{read_to_bytes, Body, BoxBody, BytesBody};
use http_caching_transport::core::http::{HTTPRequest, HTTPResponse, HttpMethod};
use http_caching_transport::{Cache, Error, Result, RoundTripper};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn request(method: HttpMethod, path: &str) -> HTTPRequest {
    let url = url::Url::parse("https://api.example.com")
        .unwrap()
        .join(path)
        .unwrap();
    HTTPRequest::new(method, url)
}

pub fn read_string(body: &mut BoxBody) -> String {
    let mut out = String::new();
    body.read_to_string(&mut out).unwrap();
    out
}

/// Body which counts how often it was closed.
pub struct CountingBody {
    inner: BoxBody,
    closes: Arc<AtomicUsize>,
}

impl CountingBody {
    pub fn wrap(inner: BoxBody, closes: Arc<AtomicUsize>) -> BoxBody {
        Box::new(Self { inner, closes })
    }
}

impl Read for CountingBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Body for CountingBody {
    fn close(&mut self) -> io::Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close()
    }
}

pub enum ReadScript {
    Hit { status: u16, body: &'static str },
    Miss,
    Fail(&'static str),
}

pub enum SaveScript {
    Ok,
    /// Wrap the request body in a close counter, then fail.
    Fail(&'static str),
}

/// Cache double answering every call from a script.
pub struct ScriptedCache {
    read: ReadScript,
    save: SaveScript,
    pub reads: AtomicUsize,
    pub saves: AtomicUsize,
    pub request_body_closes: Arc<AtomicUsize>,
    pub saved_request_body: std::sync::Mutex<Option<String>>,
}

impl ScriptedCache {
    pub fn new(read: ReadScript, save: SaveScript) -> Self {
        Self {
            read,
            save,
            reads: AtomicUsize::new(0),
            saves: AtomicUsize::new(0),
            request_body_closes: Arc::new(AtomicUsize::new(0)),
            saved_request_body: std::sync::Mutex::new(None),
        }
    }

    pub fn missing() -> Self {
        Self::new(ReadScript::Miss, SaveScript::Ok)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl Cache for ScriptedCache {
    async fn read(&self, request: &HTTPRequest) -> Result<HTTPResponse> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        match self.read {
            ReadScript::Hit { status, body } => {
                let cached = HTTPRequest::new(request.method.clone(), request.url.clone());
                Ok(HTTPResponse::new(status, cached).with_body(BytesBody::new(body).boxed()))
            }
            ReadScript::Miss => Err(Error::CacheMiss),
            ReadScript::Fail(message) => Err(Error::cache(message)),
        }
    }

    async fn save(&self, response: &mut HTTPResponse) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);

        let sent = match response.request.body.take() {
            Some(body) => read_to_bytes(body)?,
            None => bytes::Bytes::new(),
        };
        *self.saved_request_body.lock().unwrap() =
            Some(String::from_utf8_lossy(&sent).into_owned());
        response.request.body = Some(CountingBody::wrap(
            BytesBody::new(sent).boxed(),
            self.request_body_closes.clone(),
        ));

        match self.save {
            SaveScript::Ok => Ok(()),
            SaveScript::Fail(message) => Err(Error::cache(message)),
        }
    }
}

/// Transport double which drains the request body and answers with a fixed status.
pub struct ScriptedTransport {
    status: u16,
    fail: Option<&'static str>,
    pub calls: AtomicUsize,
    pub response_body_closes: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            fail: None,
            calls: AtomicUsize::new(0),
            response_body_closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(message: &'static str) -> Self {
        Self {
            fail: Some(message),
            ..Self::status(0)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RoundTripper for ScriptedTransport {
    async fn round_trip(&self, mut request: HTTPRequest) -> Result<HTTPResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.fail {
            return Err(Error::transport(message));
        }

        // a real client leaves the one-shot body drained
        let sent = match request.body.as_mut() {
            Some(body) => {
                let mut buf = Vec::new();
                body.read_to_end(&mut buf)?;
                buf
            }
            None => Vec::new(),
        };

        let body = CountingBody::wrap(
            BytesBody::new(format!("echo:{}", String::from_utf8_lossy(&sent))).boxed(),
            self.response_body_closes.clone(),
        );
        Ok(HTTPResponse::new(self.status, request).with_body(body))
    }
}
