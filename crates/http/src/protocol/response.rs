//! HTTP response head handling implementation.

/// The head of an HTTP response: status code plus raw header lines.
///
/// Header lines are stored as full `Name: Value` strings and written to the
/// wire verbatim; `Content-Length` is never stored here because the encoder
/// computes it from the body's declared size.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    status: u16,
    header_lines: Vec<String>,
}

impl ResponseHead {
    pub fn new(status: u16) -> Self {
        Self { status, header_lines: Vec::new() }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn push_header(&mut self, name: &str, value: &str) {
        self.header_lines.push(format!("{name}: {value}"));
    }

    pub fn header_lines(&self) -> &[String] {
        &self.header_lines
    }
}

/// A full response: head plus a body producer with known length.
pub struct Response<B> {
    head: ResponseHead,
    body: B,
}

impl<B> Response<B> {
    pub fn new(status: u16, body: B) -> Self {
        Self { head: ResponseHead::new(status), body }
    }

    /// Adds a raw header line, builder style.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.head.push_header(name, value);
        self
    }

    pub fn head(&self) -> &ResponseHead {
        &self.head
    }

    pub fn head_mut(&mut self) -> &mut ResponseHead {
        &mut self.head
    }

    pub fn into_parts(self) -> (ResponseHead, B) {
        (self.head, self.body)
    }
}

/// Reason phrase for the status codes this server emits.
///
/// The table is deliberately small; any code outside it renders as
/// `Unknown` rather than failing the response.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
