//! Mutable HTTP response accumulator and its wire serializer.

use crate::http::types::{HeaderMap, StatusCode};
use serde::Serialize;
use std::time::SystemTime;

pub(crate) const SERVER_NAME: &str = concat!("corehttp/", env!("CARGO_PKG_VERSION"));

const JSON_UTF8: &str = "application/json; charset=utf-8";
const TEXT_UTF8: &str = "text/plain; charset=utf-8";

/// HTTP response under construction.
///
/// Created empty for every request, mutated in turn by middleware and the route
/// handler, then [rendered](Response::render) once by the connection handler.
/// Nothing is validated: the last writer wins for both the status and each
/// header, and an untouched response still renders (with status `0`).
///
/// # Examples
/// ```
/// use corehttp::{Response, StatusCode};
///
/// let mut resp = Response::new();
/// resp.set_status(StatusCode::CREATED)
///     .set_header("X-Request-Id", "42");
///
/// assert_eq!(resp.status(), StatusCode::CREATED);
/// assert_eq!(resp.header("X-Request-Id"), Some("42"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl Response {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[inline(always)]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    #[inline(always)]
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl Response {
    #[inline]
    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    /// Sets a header, replacing any previous value under the same name.
    #[inline]
    pub fn set_header<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    /// `303 See Other` pointing at `url`. The body is left as it was.
    ///
    /// # Examples
    /// ```
    /// use corehttp::{Response, StatusCode};
    ///
    /// let mut resp = Response::new();
    /// resp.redirect("/login");
    ///
    /// assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    /// assert_eq!(resp.header("Location"), Some("/login"));
    /// ```
    #[inline]
    pub fn redirect<U: Into<String>>(&mut self, url: U) -> &mut Self {
        self.set_status(StatusCode::SEE_OTHER)
            .set_header("Location", url)
    }

    /// Serializes `payload` as the body with status `200 OK`.
    ///
    /// Sets `Date`, `Server`, `Connection: close`,
    /// `Content-Type: application/json; charset=utf-8` and the exact
    /// `Content-Length` of the serialized text.
    ///
    /// # Examples
    /// ```
    /// use corehttp::{Response, StatusCode};
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Person {
    ///     name: &'static str,
    ///     age: u8,
    /// }
    ///
    /// let mut resp = Response::new();
    /// resp.json_body(&Person { name: "Jo", age: 1 });
    ///
    /// assert_eq!(resp.status(), StatusCode::OK);
    /// assert_eq!(resp.body(), r#"{"name":"Jo","age":1}"#);
    /// assert_eq!(resp.header("Content-Length"), Some("21"));
    /// ```
    ///
    /// # Panics
    /// Panics if `payload` cannot be serialized to JSON (for example a map with
    /// non-string keys). That is a caller bug, not a runtime condition; use
    /// [`try_json_body`](Response::try_json_body) to handle it instead.
    #[inline]
    #[track_caller]
    pub fn json_body<T: Serialize + ?Sized>(&mut self, payload: &T) -> &mut Self {
        if let Err(err) = self.try_json_body(payload) {
            panic!("JSON body payload is not serializable: {err}");
        }
        self
    }

    /// Fallible form of [`json_body`](Response::json_body). The response is
    /// left untouched on error.
    pub fn try_json_body<T: Serialize + ?Sized>(
        &mut self,
        payload: &T,
    ) -> Result<(), serde_json::Error> {
        let body = serde_json::to_string(payload)?;
        self.set_body(JSON_UTF8, body);
        Ok(())
    }

    /// Plain text body with status `200 OK` and the same header set as
    /// [`json_body`](Response::json_body), typed `text/plain; charset=utf-8`.
    ///
    /// # Examples
    /// ```
    /// use corehttp::{Response, StatusCode};
    ///
    /// let mut resp = Response::new();
    /// resp.text_body("Привет");
    ///
    /// assert_eq!(resp.status(), StatusCode::OK);
    /// assert_eq!(resp.header("Content-Type"), Some("text/plain; charset=utf-8"));
    /// assert_eq!(resp.header("Content-Length"), Some("12")); // bytes, not chars
    /// ```
    #[inline]
    pub fn text_body<B: Into<String>>(&mut self, payload: B) -> &mut Self {
        self.set_body(TEXT_UTF8, payload.into());
        self
    }

    /// `404 Not Found` with an empty body and no content headers.
    #[inline]
    pub fn not_found(&mut self) -> &mut Self {
        self.set_status(StatusCode::NOT_FOUND).set_common_headers();
        self.body.clear();
        self
    }

    fn set_body(&mut self, content_type: &str, body: String) {
        self.set_status(StatusCode::OK)
            .set_common_headers()
            .set_header("Content-Type", content_type)
            .set_header("Content-Length", body.len().to_string());
        self.body = body;
    }

    #[inline]
    fn set_common_headers(&mut self) -> &mut Self {
        self.set_header("Date", httpdate::fmt_http_date(SystemTime::now()))
            .set_header("Server", SERVER_NAME)
            .set_header("Connection", "close")
    }
}

impl Response {
    /// Serializes the response into wire bytes.
    ///
    /// ```text
    /// HTTP/1.1 <code> <reason>\r\n
    /// <name>: <value>\r\n       (once per header, in insertion order)
    /// \r\n
    /// <body>
    /// ```
    ///
    /// # Examples
    /// ```
    /// use corehttp::{Response, StatusCode};
    ///
    /// let mut resp = Response::new();
    /// resp.set_status(StatusCode::NO_CONTENT).set_header("X-A", "1");
    ///
    /// assert_eq!(resp.render(), b"HTTP/1.1 204 No Content\r\nX-A: 1\r\n\r\n");
    ///
    /// // Nothing set at all
    /// assert_eq!(Response::new().render(), b"HTTP/1.1 0 Unknown Status Code\r\n\r\n");
    /// ```
    pub fn render(&self) -> Vec<u8> {
        let headers_len: usize = self
            .headers
            .iter()
            .map(|(name, value)| name.len() + value.len() + 4)
            .sum();
        let mut buf = Vec::with_capacity(32 + headers_len + 2 + self.body.len());

        buf.extend_from_slice(format!("HTTP/1.1 {}\r\n", self.status).as_bytes());
        for (name, value) in self.headers.iter() {
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(value.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }
        buf.extend_from_slice(b"\r\n");
        buf.extend_from_slice(self.body.as_bytes());

        buf
    }
}
