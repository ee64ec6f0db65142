//! Response capture buffer.
//!
//! Stand-in for the real client connection handed to the downstream
//! handler's side of the exchange: in buffering mode nothing the handler
//! produced reaches the client until inspection releases it, in streaming
//! mode the response passes through untouched. The mode is fixed at
//! construction and never switches back from streaming.

use std::io::{self, Cursor};

use axum::body::Body;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use bytes::{BufMut, BytesMut};
use http_body_util::BodyExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Bytes flow straight to the client; nothing is captured.
    Streaming,
    /// Status, headers and body are held until released or discarded.
    Buffering,
}

/// Captures a handler's response until a policy decision releases it.
pub struct ResponseRecorder {
    mode: Mode,
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl ResponseRecorder {
    /// Create a recorder. `inspect_response_body` selects buffering mode;
    /// otherwise the recorder streams.
    pub fn new(inspect_response_body: bool) -> Self {
        let mode = if inspect_response_body {
            Mode::Buffering
        } else {
            Mode::Streaming
        };
        Self {
            mode,
            status: None,
            headers: HeaderMap::new(),
            body: BytesMut::new(),
        }
    }

    /// Capture the handler's response.
    ///
    /// In streaming mode the response is handed back untouched. In
    /// buffering mode the status, headers and every body frame are
    /// recorded and `None` is returned; the caller resolves delivery after
    /// inspection.
    pub async fn capture(&mut self, response: Response) -> Result<Option<Response>, axum::Error> {
        if self.mode == Mode::Streaming {
            return Ok(Some(response));
        }

        let (parts, mut body) = response.into_parts();
        self.write_header(parts.status, &parts.headers);
        while let Some(frame) = body.frame().await {
            if let Ok(data) = frame?.into_data() {
                self.write(&data);
            }
        }
        Ok(None)
    }

    /// Record the pending status and header set without emitting them.
    pub fn write_header(&mut self, status: StatusCode, headers: &HeaderMap) {
        debug_assert_eq!(self.mode, Mode::Buffering);
        self.status = Some(status);
        self.headers = headers.clone();
    }

    /// Append body bytes to the buffer.
    pub fn write(&mut self, chunk: &[u8]) {
        debug_assert_eq!(self.mode, Mode::Buffering);
        self.body.put_slice(chunk);
    }

    /// True iff content is held and not yet released to the client.
    pub fn buffered(&self) -> bool {
        self.mode == Mode::Buffering && (self.status.is_some() || !self.body.is_empty())
    }

    /// The recorded status, or `None` if the handler never set one.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// The recorded header set.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A fresh, independent read over the accumulated body. Each call
    /// restarts from the beginning.
    pub fn reader(&self) -> io::Result<impl io::Read + '_> {
        Ok(Cursor::new(&self.body[..]))
    }

    /// Release the buffered response: the recorded status is applied only
    /// if one was recorded (the transport default stands otherwise), and
    /// the body is handed off without another copy.
    pub fn release(self) -> Response {
        let mut response = Response::new(Body::from(self.body.freeze()));
        if let Some(status) = self.status {
            *response.status_mut() = status;
        }
        *response.headers_mut() = self.headers;
        response
    }
}
