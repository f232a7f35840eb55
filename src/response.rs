//! Outgoing HTTP response type: the response catalog.
//!
//! A handler produces exactly one [`Response`], and each constructor below is
//! one terminal way of answering a request. Pick one:
//!
//! | Constructor | Status | Content type |
//! |---|---|---|
//! | [`Response::text`] | 200 | `text/plain; charset=utf-8` |
//! | [`Response::html`] | 200 | `text/html; charset=utf-8` |
//! | [`Response::raw`]  | 200 | none — bytes as-is |
//! | [`Response::json`] | 200 | `application/json` |
//! | [`Response::jsonp`] | 200 | `text/javascript; charset=utf-8` |
//! | [`Response::redirect`] | 302 | `text/plain; charset=utf-8` |
//! | [`Response::status`] | any | none, empty body |
//! | [`Response::send_status`] | any | `text/plain; charset=utf-8`, reason phrase as body |
//!
//! File-backed responses (`inline` and `attachment` dispositions) live in
//! [`files`](crate::files); rendered views in [`views`](crate::views).
//!
//! # Builder (custom status or headers)
//!
//! ```rust
//! use vereda::{Response, Status};
//!
//! Response::builder()
//!     .status(Status::Created)
//!     .header("location", "/books/42")
//!     .json(&serde_json::json!({"id": 42}));
//! ```

use bytes::Bytes;
use http_body_util::Full;
use serde::Serialize;
use tracing::error;

use crate::status::Status;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const TEXT_HTML: &str = "text/html; charset=utf-8";

/// An outgoing HTTP response.
#[derive(Debug)]
pub struct Response {
    status: Status,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Response {
    /// `200 OK` — UTF-8 text body.
    pub fn text(body: impl Into<String>) -> Self {
        Self::with_content_type(TEXT_PLAIN, body.into().into_bytes())
    }

    /// `200 OK` — HTML body.
    pub fn html(body: impl Into<String>) -> Self {
        Self::with_content_type(TEXT_HTML, body.into().into_bytes())
    }

    /// `200 OK` — raw bytes, stream closed, no content type declared.
    ///
    /// The client sees exactly the bytes given and nothing else.
    pub fn raw(body: impl Into<Bytes>) -> Self {
        Self { status: Status::Ok, headers: Vec::new(), body: body.into() }
    }

    /// `200 OK` — `value` serialized as JSON.
    ///
    /// Serialization failure (a map with non-string keys, a failing
    /// `Serialize` impl) is logged and answered as a bare 500.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => Self::with_content_type("application/json", bytes),
            Err(e) => {
                error!("json serialization failed: {e}");
                Self::status(Status::InternalServerError)
            }
        }
    }

    /// `200 OK` — JSON wrapped in a callback invocation for script-tag
    /// consumption.
    ///
    /// `callback` is the client-supplied callback name, usually
    /// `req.query("callback")`. With no callback (or one that sanitizes to
    /// nothing) this degrades to plain [`Response::json`]. The callback name
    /// keeps only identifier characters (`[A-Za-z0-9_$.\[\]]`), and the JSON
    /// text escapes U+2028/U+2029 so the body stays valid JavaScript.
    pub fn jsonp<T: Serialize + ?Sized>(value: &T, callback: Option<&str>) -> Self {
        let Some(cb) = callback.map(sanitize_callback).filter(|cb| !cb.is_empty()) else {
            return Self::json(value);
        };
        match serde_json::to_string(value) {
            Ok(json) => {
                let json = json.replace('\u{2028}', "\\u2028").replace('\u{2029}', "\\u2029");
                let mut resp = Self::with_content_type(
                    "text/javascript; charset=utf-8",
                    format!("/**/ typeof {cb} === 'function' && {cb}({json});").into_bytes(),
                );
                resp.headers.push(("x-content-type-options".to_owned(), "nosniff".to_owned()));
                resp
            }
            Err(e) => {
                error!("jsonp serialization failed: {e}");
                Self::status(Status::InternalServerError)
            }
        }
    }

    /// `302 Found` — redirect to `location`.
    ///
    /// Carries a short text body naming the target for clients that do not
    /// follow redirects.
    pub fn redirect(location: &str) -> Self {
        Self {
            status: Status::Found,
            headers: vec![
                ("location".to_owned(), location.to_owned()),
                ("content-type".to_owned(), TEXT_PLAIN.to_owned()),
            ],
            body: Bytes::from(format!("Found. Redirecting to {location}")),
        }
    }

    /// Status only, empty body.
    pub fn status(code: Status) -> Self {
        Self { status: code, headers: Vec::new(), body: Bytes::new() }
    }

    /// Status with its canonical reason phrase as a text body.
    ///
    /// `send_status(Status::NotFound)` answers `404` with body `Not Found`.
    pub fn send_status(code: Status) -> Self {
        Self {
            status: code,
            headers: vec![("content-type".to_owned(), TEXT_PLAIN.to_owned())],
            body: Bytes::from_static(code.reason().as_bytes()),
        }
    }

    /// Builder for responses that need a custom status or extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: Vec::new(), status: Status::Ok }
    }

    fn with_content_type(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status: Status::Ok,
            headers: vec![("content-type".to_owned(), content_type.to_owned())],
            body: Bytes::from(body),
        }
    }

    pub fn status_code(&self) -> Status {
        self.status
    }

    /// First header with the given name (names are stored lowercase).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts into the hyper-facing response.
    ///
    /// A header value that does not fit the wire (stray control bytes and
    /// the like) downgrades the whole response to a logged bare 500 rather
    /// than a malformed reply.
    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut builder = http::Response::builder().status(self.status.code());
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder.body(Full::new(self.body)).unwrap_or_else(|e| {
            error!("failed to assemble response: {e}");
            http::Response::builder()
                .status(Status::InternalServerError.code())
                .body(Full::new(Bytes::new()))
                .expect("empty 500 response is always valid")
        })
    }
}

/// Keeps only the characters a JSONP callback name may contain.
fn sanitize_callback(cb: &str) -> String {
    cb.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '[' | ']'))
        .collect()
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `Status::Ok`. Terminated
/// by a typed body method, so the content type is always explicit.
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    status: Status,
}

impl ResponseBuilder {
    pub fn status(mut self, code: Status) -> Self {
        self.status = code;
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.to_owned()));
        self
    }

    /// Terminate with a JSON body.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Response {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.finish("application/json", bytes),
            Err(e) => {
                error!("json serialization failed: {e}");
                Response::status(Status::InternalServerError)
            }
        }
    }

    /// Terminate with a plain-text body.
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(TEXT_PLAIN, body.into().into_bytes())
    }

    /// Terminate with an HTML body.
    pub fn html(self, body: impl Into<String>) -> Response {
        self.finish(TEXT_HTML, body.into().into_bytes())
    }

    /// Terminate with an arbitrary content type. Use for XML, binary, SSE, etc.
    pub fn body(self, content_type: &str, body: impl Into<Bytes>) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.to_owned())];
        headers.extend(self.headers);
        Response { status: self.status, headers, body: body.into() }
    }

    /// Terminate with no body.
    pub fn no_body(self) -> Response {
        Response { status: self.status, headers: self.headers, body: Bytes::new() }
    }

    fn finish(self, content_type: &str, body: Vec<u8>) -> Response {
        let mut headers = vec![("content-type".to_owned(), content_type.to_owned())];
        headers.extend(self.headers);
        Response { status: self.status, headers, body: Bytes::from(body) }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implemented for the types a handler may return directly: `Response`
/// itself, string literals and `String` (text bodies), [`Status`]
/// (status-only), and `Result<Response, Error>` for handlers that touch the
/// filesystem or a view registry.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response {
        Response::text(self)
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        Response::text(self)
    }
}

/// Return a [`Status`] directly from a handler: `return Status::NotFound`.
impl IntoResponse for Status {
    fn into_response(self) -> Response {
        Response::status(self)
    }
}

/// An `Err` is an infrastructure failure, not an application outcome: it is
/// logged and answered as a bare 500.
impl IntoResponse for Result<Response, crate::Error> {
    fn into_response(self) -> Response {
        match self {
            Ok(resp) => resp,
            Err(e) => {
                error!("handler error: {e}");
                Response::status(Status::InternalServerError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_sets_content_type_and_body() {
        let r = Response::text("Hello, World!");
        assert_eq!(r.status_code(), Status::Ok);
        assert_eq!(r.header("content-type"), Some(TEXT_PLAIN));
        assert_eq!(r.body(), b"Hello, World!");
    }

    #[test]
    fn raw_has_no_content_type() {
        let r = Response::raw(&b"Hello, World!"[..]);
        assert_eq!(r.header("content-type"), None);
        assert_eq!(r.body(), b"Hello, World!");
    }

    #[test]
    fn json_serializes_value() {
        let r = Response::json(&json!({"message": "Hello, World!"}));
        assert_eq!(r.header("content-type"), Some("application/json"));
        assert_eq!(r.body(), br#"{"message":"Hello, World!"}"#);
    }

    #[test]
    fn jsonp_wraps_when_callback_present() {
        let r = Response::jsonp(&json!({"message": "Hello, World!"}), Some("cb"));
        assert_eq!(r.header("content-type"), Some("text/javascript; charset=utf-8"));
        assert_eq!(r.header("x-content-type-options"), Some("nosniff"));
        assert_eq!(
            r.body(),
            br#"/**/ typeof cb === 'function' && cb({"message":"Hello, World!"});"#
        );
    }

    #[test]
    fn jsonp_without_callback_is_plain_json() {
        let r = Response::jsonp(&json!({"message": "Hello, World!"}), None);
        assert_eq!(r.header("content-type"), Some("application/json"));
        assert_eq!(r.body(), br#"{"message":"Hello, World!"}"#);
    }

    #[test]
    fn jsonp_sanitizes_callback_name() {
        let r = Response::jsonp(&json!(1), Some("alert('x');//"));
        let body = std::str::from_utf8(r.body()).unwrap();
        assert!(body.starts_with("/**/ typeof alertx === 'function'"));
    }

    #[test]
    fn jsonp_callback_of_only_junk_degrades_to_json() {
        let r = Response::jsonp(&json!(1), Some("();<>"));
        assert_eq!(r.header("content-type"), Some("application/json"));
    }

    #[test]
    fn redirect_sets_location_and_302() {
        let r = Response::redirect("/json");
        assert_eq!(r.status_code(), Status::Found);
        assert_eq!(r.header("location"), Some("/json"));
        assert_eq!(r.body(), b"Found. Redirecting to /json");
    }

    #[test]
    fn send_status_puts_reason_in_body() {
        let r = Response::send_status(Status::NotFound);
        assert_eq!(r.status_code(), Status::NotFound);
        assert_eq!(r.body(), b"Not Found");
    }

    #[test]
    fn status_alone_has_empty_body() {
        let r = Response::status(Status::NoContent);
        assert_eq!(r.status_code(), Status::NoContent);
        assert!(r.body().is_empty());
        assert_eq!(r.header("content-type"), None);
    }

    #[test]
    fn builder_sets_status_and_headers() {
        let r = Response::builder()
            .status(Status::Created)
            .header("Location", "/books/42")
            .json(&json!({"id": 42}));
        assert_eq!(r.status_code(), Status::Created);
        assert_eq!(r.header("location"), Some("/books/42"));
        assert_eq!(r.header("content-type"), Some("application/json"));
    }

    #[test]
    fn into_http_carries_status_and_headers() {
        let r = Response::send_status(Status::NotFound).into_http();
        assert_eq!(r.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(
            r.headers().get("content-type").unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn err_result_becomes_500() {
        let out: Result<Response, crate::Error> =
            Err(crate::Error::MissingView("index".to_owned()));
        assert_eq!(out.into_response().status_code(), Status::InternalServerError);
    }
}
