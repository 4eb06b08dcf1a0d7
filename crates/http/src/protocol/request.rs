//! HTTP request header handling implementation.
//!
//! Unlike typed header maps, the header lines of a request are kept verbatim
//! as raw byte lines. Field lookup works by case-sensitive prefix match over
//! those raw lines, which is the lookup contract the rest of the crate is
//! built on.

use bytes::Bytes;

/// The parsed head of an HTTP request.
///
/// All fields are slices of the frozen header block, so constructing a
/// `RequestHeader` does not copy the underlying bytes. `lines` holds the raw
/// header lines (CRLF stripped) in arrival order; the request line itself is
/// not part of it.
#[derive(Debug, Clone)]
pub struct RequestHeader {
    method: Bytes,
    target: Bytes,
    version: Bytes,
    lines: Vec<Bytes>,
}

impl RequestHeader {
    pub fn new(method: Bytes, target: Bytes, version: Bytes, lines: Vec<Bytes>) -> Self {
        Self { method, target, version, lines }
    }

    /// Attaches a body to this header, converting it into a full [`Request<B>`].
    pub fn body<B>(self, body: B) -> Request<B> {
        Request { head: self, body }
    }

    /// The request method token, byte-exact as it appeared on the wire.
    pub fn method(&self) -> &[u8] {
        &self.method
    }

    /// The request target.
    pub fn target(&self) -> &[u8] {
        &self.target
    }

    /// The version field. When the request line carried more than three
    /// tokens, the extra tokens are part of this field.
    pub fn version(&self) -> &[u8] {
        &self.version
    }

    /// The raw header lines in arrival order.
    pub fn lines(&self) -> &[Bytes] {
        &self.lines
    }

    /// Looks up a header field by case-sensitive prefix match.
    ///
    /// Scans the raw lines in order and returns the trimmed value of the
    /// first line that starts with exactly `name` and contains a colon;
    /// first match wins. A field name that is a prefix of another field's
    /// name will match that other field too; callers rely on this exact
    /// contract, so it is not tightened here.
    pub fn field_get(&self, name: &str) -> Option<&[u8]> {
        let name = name.as_bytes();
        for line in &self.lines {
            if !line.starts_with(name) {
                continue;
            }
            if let Some(colon) = line.iter().position(|b| *b == b':') {
                return Some(line[colon + 1..].trim_ascii());
            }
        }
        None
    }

    /// Whether this request's method permits a body (everything but GET and
    /// HEAD).
    pub fn body_allowed(&self) -> bool {
        !matches!(self.method.as_ref(), b"GET" | b"HEAD")
    }
}

/// A full request: parsed head plus its body producer.
pub struct Request<B> {
    head: RequestHeader,
    body: B,
}

impl<B> Request<B> {
    pub fn head(&self) -> &RequestHeader {
        &self.head
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    /// Splits the request into its head and body halves.
    pub fn into_parts(self) -> (RequestHeader, B) {
        (self.head, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_with_lines(lines: &[&str]) -> RequestHeader {
        RequestHeader::new(
            Bytes::from_static(b"GET"),
            Bytes::from_static(b"/"),
            Bytes::from_static(b"HTTP/1.1"),
            lines.iter().map(|l| Bytes::copy_from_slice(l.as_bytes())).collect(),
        )
    }

    #[test]
    fn field_get_returns_first_match_trimmed() {
        let header = header_with_lines(&[
            "Host: localhost:8080",
            "Content-Type: application/json",
            "Content-Length: 123",
            "Authorization: Bearer token123",
        ]);

        assert_eq!(header.field_get("Host"), Some(&b"localhost:8080"[..]));
        assert_eq!(header.field_get("Content-Type"), Some(&b"application/json"[..]));
        assert_eq!(header.field_get("Content-Length"), Some(&b"123"[..]));
        assert_eq!(header.field_get("X-Custom"), None);
    }

    #[test]
    fn field_get_is_case_sensitive() {
        let header = header_with_lines(&["Host: localhost:8080"]);

        assert_eq!(header.field_get("host"), None);
        assert_eq!(header.field_get("HOST"), None);
    }

    #[test]
    fn field_get_matches_by_prefix() {
        let header = header_with_lines(&["Content-Length-Hint: 7", "Content-Length: 9"]);

        // prefix lookup: the first line starting with the name wins
        assert_eq!(header.field_get("Content-Length"), Some(&b"7"[..]));
    }

    #[test]
    fn field_get_skips_lines_without_colon() {
        let header = header_with_lines(&["Content-Length", "Content-Length: 5"]);

        assert_eq!(header.field_get("Content-Length"), Some(&b"5"[..]));
    }

    #[test]
    fn body_allowed_by_method() {
        let get = header_with_lines(&[]);
        assert!(!get.body_allowed());

        let head = RequestHeader::new(
            Bytes::from_static(b"HEAD"),
            Bytes::from_static(b"/"),
            Bytes::from_static(b"HTTP/1.1"),
            Vec::new(),
        );
        assert!(!head.body_allowed());

        let post = RequestHeader::new(
            Bytes::from_static(b"POST"),
            Bytes::from_static(b"/echo"),
            Bytes::from_static(b"HTTP/1.1"),
            Vec::new(),
        );
        assert!(post.body_allowed());
    }
}
