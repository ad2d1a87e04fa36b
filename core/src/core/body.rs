use std::{
    fmt,
    io::{self, Read},
    sync::Arc,
};

use bytes::{Buf, Bytes};

/// Readable body stream which must be released once it's no longer needed.
pub trait Body: Read + Send + Sync {
    /// Release resources held by the stream.
    ///
    /// Reading after close yields no more data.
    fn close(&mut self) -> io::Result<()>;
}

/// Owned, type-erased body stream.
pub type BoxBody = Box<dyn Body>;

/// Factory which opens a fresh, independently readable body on every call.
///
/// A request body stream can be read only once, while the same payload is
/// needed by the network call and for later inspection of the response.
pub type BodySource = Arc<dyn Fn() -> io::Result<BoxBody> + Send + Sync>;

/// In-memory body backed by [`Bytes`].
#[derive(Debug, Clone, Default)]
pub struct BytesBody {
    data: Bytes,
    closed: bool,
}

impl BytesBody {
    pub fn new<B: Into<Bytes>>(data: B) -> Self {
        Self {
            data: data.into(),
            closed: false,
        }
    }

    /// An empty body.
    pub const fn empty() -> Self {
        Self {
            data: Bytes::new(),
            closed: false,
        }
    }

    /// Box the body for use as a [`BoxBody`].
    pub fn boxed(self) -> BoxBody {
        Box::new(self)
    }

    /// Whether [`Body::close`] has been called.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Read for BytesBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.closed {
            return Ok(0);
        }
        let len = buf.len().min(self.data.remaining());
        self.data.copy_to_slice(&mut buf[..len]);
        Ok(len)
    }
}

impl Body for BytesBody {
    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        self.data.clear();
        Ok(())
    }
}

impl fmt::Debug for dyn Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Body")
    }
}

/// Body source replaying the same bytes on every call.
pub fn bytes_source<B: Into<Bytes>>(data: B) -> BodySource {
    let data = data.into();
    Arc::new(move || Ok(BytesBody::new(data.clone()).boxed()))
}

/// Drain a body into memory and close it.
///
/// The body is closed even if reading fails; the read error wins.
pub fn read_to_bytes(mut body: BoxBody) -> io::Result<Bytes> {
    let mut buf = Vec::new();
    let read = body.read_to_end(&mut buf);
    let closed = body.close();
    read?;
    closed?;
    Ok(Bytes::from(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingBody;

    impl Read for FailingBody {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    impl Body for FailingBody {
        fn close(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn bytes_body_reads_in_chunks() {
        let mut body = BytesBody::new("hello world");
        let mut chunk = [0u8; 5];
        assert_eq!(body.read(&mut chunk).unwrap(), 5);
        assert_eq!(&chunk, b"hello");

        let mut rest = String::new();
        body.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, " world");
    }

    #[test]
    fn closed_body_reads_nothing() {
        let mut body = BytesBody::new("data");
        body.close().unwrap();
        assert!(body.is_closed());

        let mut buf = Vec::new();
        assert_eq!(body.read_to_end(&mut buf).unwrap(), 0);
    }

    #[test]
    fn source_replays_independent_bodies() {
        let source = bytes_source("payload");
        let first = read_to_bytes(source().unwrap()).unwrap();
        let second = read_to_bytes(source().unwrap()).unwrap();
        assert_eq!(first, Bytes::from_static(b"payload"));
        assert_eq!(first, second);
    }

    #[test]
    fn read_error_is_returned() {
        let err = read_to_bytes(Box::new(FailingBody)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }
}
