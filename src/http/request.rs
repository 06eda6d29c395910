use crate::{
    errors::ParseError,
    http::{query::parse_pairs, types::HeaderMap},
    Method,
};
use memchr::memmem;
use std::collections::HashMap;

const HEADER_END: &[u8] = b"\r\n\r\n";
const CRLF: &str = "\r\n";
const HEADER_SEPARATOR: &str = ": ";

const CONTENT_TYPE: &str = "Content-Type";
const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

/// Parsed HTTP request.
///
/// Built once per connection by [`Request::parse`] and read-only afterwards.
///
/// # Input data requirements
///
/// #### Character encoding
///
/// The whole buffer, body included, must be `UTF-8`; otherwise parsing fails with
/// [`ParseError::InvalidEncoding`].
///
/// #### Layout
/// ```text
/// [METHOD] SP [TARGET] SP [VERSION] *(SP [ANY]) CRLF
/// *([NAME] ": " [VALUE] CRLF)
/// CRLF
/// [BODY]
/// ```
/// - `[METHOD]`: any letter case of a [`Method`] token.
/// - `[TARGET]`: `path?query`. An empty path becomes `/`. Paths are never
///   normalized otherwise: `/about` and `/about/` are different.
/// - `[VERSION]`: required but not validated.
/// - Header lines must contain the separator `": "` exactly once. Names are stored
///   as received, with no case folding or whitespace trimming.
///
/// #### Body
///
/// There is no `Content-Length` or chunked handling: everything after the first
/// blank line is the body, even when that is empty. It is decoded by the exact
/// value of the `Content-Type` header:
///
/// | `Content-Type`                      | Result                                 |
/// |-------------------------------------|----------------------------------------|
/// | `application/json`                  | flat string-to-string JSON object      |
/// | `application/x-www-form-urlencoded` | `key=value` pairs, malformed dropped   |
/// | anything else, or missing           | empty                                  |
///
/// # Known limitation
///
/// The parser trusts the whole slice it is given. Passing a fixed-size buffer
/// that still carries zero bytes past the end of the data read from the socket
/// makes those bytes part of the last header line or of the body. The connection
/// handler always passes exactly the bytes read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    method: Method,
    path: String,
    query_params: Option<HashMap<String, String>>,
    headers: HeaderMap,
    body: HashMap<String, String>,
}

impl Request {
    /// Parses a raw request buffer.
    ///
    /// # Examples
    /// ```
    /// use corehttp::{Method, Request};
    ///
    /// let req = Request::parse(b"GET /search?q=rust&page=2 HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();
    ///
    /// assert_eq!(req.method(), Method::Get);
    /// assert_eq!(req.path(), "/search");
    /// assert_eq!(req.query_param("q"), Some("rust"));
    /// assert_eq!(req.header("Host"), Some("x"));
    /// assert!(req.body().is_empty());
    /// ```
    /// Form body:
    /// ```
    /// use corehttp::Request;
    ///
    /// let raw = b"POST /login HTTP/1.1\r\n\
    ///     Content-Type: application/x-www-form-urlencoded\r\n\
    ///     \r\n\
    ///     user=jo&pass=secret";
    /// let req = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(req.body_value("user"), Some("jo"));
    /// assert_eq!(req.body_value("pass"), Some("secret"));
    /// ```
    pub fn parse(raw: &[u8]) -> Result<Self, ParseError> {
        if raw.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let text = simdutf8::basic::from_utf8(raw).map_err(|_| ParseError::InvalidEncoding)?;

        let (head, body) = match memmem::find(raw, HEADER_END) {
            Some(pos) => (&text[..pos], Some(&text[pos + HEADER_END.len()..])),
            None => (text, None),
        };
        if head.is_empty() {
            return Err(ParseError::MalformedRequest);
        }

        let mut lines = head.split(CRLF);
        let request_line = lines.next().ok_or(ParseError::MalformedRequest)?;

        let mut req = Request::default();
        req.parse_request_line(request_line)?;

        for line in lines.filter(|line| !line.is_empty()) {
            req.parse_header(line)?;
        }

        if let Some(body) = body {
            req.parse_body(body)?;
        }

        Ok(req)
    }

    fn parse_request_line(&mut self, line: &str) -> Result<(), ParseError> {
        let mut tokens = line.split_whitespace();

        let (method, target) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(method), Some(target), Some(_version)) => (method, target),
            _ => return Err(ParseError::MalformedRequestLine),
        };

        self.method = match Method::parse(method) {
            Method::Invalid => return Err(ParseError::UnknownMethod(method.to_owned())),
            method => method,
        };

        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };

        self.path = match path.is_empty() {
            true => "/".to_owned(),
            false => path.to_owned(),
        };
        self.query_params = query.map(parse_pairs);

        Ok(())
    }

    #[inline]
    fn parse_header(&mut self, line: &str) -> Result<(), ParseError> {
        let mut parts = line.split(HEADER_SEPARATOR);

        match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(value), None) => {
                self.headers.insert(name, value);
                Ok(())
            }
            _ => Err(ParseError::MalformedHeader(line.to_owned())),
        }
    }

    fn parse_body(&mut self, body: &str) -> Result<(), ParseError> {
        match self.headers.get(CONTENT_TYPE) {
            Some(JSON) => {
                self.body = serde_json::from_str(body)
                    .map_err(|err| ParseError::InvalidJsonBody(err.to_string()))?;
            }
            Some(FORM) => self.body = parse_pairs(body),
            _ => {}
        }

        Ok(())
    }
}

impl Request {
    #[inline(always)]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request path without the query string, at least `/`.
    #[inline(always)]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// `None` when the target had no `?`. A bare `?` yields an empty map.
    #[inline(always)]
    pub fn query_params(&self) -> Option<&HashMap<String, String>> {
        self.query_params.as_ref()
    }

    #[inline]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query_params.as_ref()?.get(key).map(String::as_str)
    }

    #[inline(always)]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Exact, case-sensitive header lookup.
    ///
    /// # Examples
    /// ```
    /// use corehttp::Request;
    ///
    /// let req = Request::parse(b"GET / HTTP/1.1\r\nX-Token: abc\r\n\r\n").unwrap();
    ///
    /// assert_eq!(req.header("X-Token"), Some("abc"));
    /// assert_eq!(req.header("x-token"), None);
    /// assert_eq!(req.headers().get_ignore_ascii_case("x-token"), Some("abc"));
    /// ```
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Decoded body. Empty when there was no body or its type is not decoded.
    #[inline(always)]
    pub fn body(&self) -> &HashMap<String, String> {
        &self.body
    }

    #[inline]
    pub fn body_value(&self, key: &str) -> Option<&str> {
        self.body.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parse_request_line() {
        #[rustfmt::skip]
        let cases = [
            ("GET / HTTP/1.1\r\n\r\n",              Method::Get,    "/"),
            ("get /about HTTP/1.1\r\n\r\n",         Method::Get,    "/about"),
            ("POST /a/b/ HTTP/1.0\r\n\r\n",         Method::Post,   "/a/b/"),
            ("Put /x HTTP/1.1\r\n\r\n",             Method::Put,    "/x"),
            ("DELETE /x HTTP/1.1\r\n\r\n",          Method::Delete, "/x"),
            ("patch /x HTTP/1.1\r\n\r\n",           Method::Patch,  "/x"),
            ("GET ?a=1 HTTP/1.1\r\n\r\n",           Method::Get,    "/"),
            ("GET  /spaces   HTTP/1.1 \r\n\r\n",    Method::Get,    "/spaces"),
            ("GET /extra HTTP/1.1 tokens\r\n\r\n",  Method::Get,    "/extra"),
            ("GET /no-blank-line HTTP/1.1",         Method::Get,    "/no-blank-line"),
            ("GET /v HTTP/9.9\r\n\r\n",             Method::Get,    "/v"),
        ];

        for (raw, method, path) in cases {
            let req = Request::parse(raw.as_bytes()).unwrap();

            assert_eq!(req.method(), method, "{raw:?}");
            assert_eq!(req.path(), path, "{raw:?}");
        }
    }

    #[test]
    fn parse_query() {
        #[rustfmt::skip]
        let cases: [(&str, Option<&[(&str, &str)]>); 6] = [
            ("GET /?a=1&b=2 HTTP/1.1\r\n\r\n",       Some(&[("a", "1"), ("b", "2")])),
            ("GET /p HTTP/1.1\r\n\r\n",              None),
            ("GET /p? HTTP/1.1\r\n\r\n",             Some(&[])),
            ("GET /p?a=1&a=2 HTTP/1.1\r\n\r\n",      Some(&[("a", "2")])),
            ("GET /p?flag&k=v HTTP/1.1\r\n\r\n",     Some(&[("k", "v")])),
            ("GET /p?x=1?y=2 HTTP/1.1\r\n\r\n",      Some(&[("x", "1?y=2")])),
        ];

        for (raw, expected) in cases {
            let req = Request::parse(raw.as_bytes()).unwrap();

            assert_eq!(req.query_params(), expected.map(map).as_ref(), "{raw:?}");
        }
    }

    #[test]
    fn query_root_path() {
        let req = Request::parse(b"GET /?a=1&b=2 HTTP/1.1\r\n\r\n").unwrap();

        assert_eq!(req.path(), "/");
        assert_eq!(req.query_param("a"), Some("1"));
        assert_eq!(req.query_param("b"), Some("2"));
        assert_eq!(req.query_param("c"), None);
    }

    #[test]
    fn parse_headers() {
        let raw = "GET / HTTP/1.1\r\n\
            Host: example.com\r\n\
            content-type: text/plain\r\n\
            X-Empty: \r\n\
            X-Dup: 1\r\n\
            X-Dup: 2\r\n\
            \r\n";
        let req = Request::parse(raw.as_bytes()).unwrap();

        assert_eq!(req.headers().len(), 4);
        assert_eq!(req.header("Host"), Some("example.com"));
        assert_eq!(req.header("host"), None);
        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(req.header("Content-Type"), None);
        assert_eq!(req.header("X-Empty"), Some(""));
        assert_eq!(req.header("X-Dup"), Some("2"));
        assert_eq!(
            req.headers().iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["Host", "content-type", "X-Empty", "X-Dup"]
        );
    }

    #[test]
    fn parse_invalid_request() {
        #[rustfmt::skip]
        let cases = [
            ("",                                        ParseError::EmptyInput),
            ("\r\n\r\n",                                ParseError::MalformedRequest),
            ("\r\n\r\nbody",                            ParseError::MalformedRequest),
            ("GET /\r\n\r\n",                           ParseError::MalformedRequestLine),
            ("GET\r\n\r\n",                             ParseError::MalformedRequestLine),
            ("   \r\n\r\n",                             ParseError::MalformedRequestLine),
            ("HEAD / HTTP/1.1\r\n\r\n",                 ParseError::UnknownMethod("HEAD".into())),
            ("Pyu / HTTP/1.1\r\n\r\n",                  ParseError::UnknownMethod("Pyu".into())),
            ("GET / HTTP/1.1\r\nHost x\r\n\r\n",        ParseError::MalformedHeader("Host x".into())),
            ("GET / HTTP/1.1\r\nHost:x\r\n\r\n",        ParseError::MalformedHeader("Host:x".into())),
            ("GET / HTTP/1.1\r\nA: b: c\r\n\r\n",       ParseError::MalformedHeader("A: b: c".into())),
        ];

        for (raw, expected) in cases {
            assert_eq!(Request::parse(raw.as_bytes()), Err(expected), "{raw:?}");
        }
    }

    #[test]
    fn invalid_encoding() {
        let raw = b"GET /\xff HTTP/1.1\r\n\r\n";

        assert_eq!(Request::parse(raw), Err(ParseError::InvalidEncoding));
    }

    #[test]
    fn form_body() {
        let raw = "POST /form HTTP/1.1\r\n\
            Content-Type: application/x-www-form-urlencoded\r\n\
            \r\n\
            a=1&b=2&c";
        let req = Request::parse(raw.as_bytes()).unwrap();

        assert_eq!(req.body(), &map(&[("a", "1"), ("b", "2")]));
    }

    #[test]
    fn json_body() {
        let raw = "POST /json HTTP/1.1\r\n\
            Content-Type: application/json\r\n\
            \r\n\
            {\"name\":\"Jo\",\"city\":\"Riga\"}";
        let req = Request::parse(raw.as_bytes()).unwrap();

        assert_eq!(req.body(), &map(&[("name", "Jo"), ("city", "Riga")]));
        assert_eq!(req.body_value("name"), Some("Jo"));
    }

    #[test]
    fn json_body_invalid() {
        // An empty body section is still decoded
        let cases = ["{\"name\":", "[1, 2]", "{\"age\":1}", "not json", ""];

        for body in cases {
            let raw = format!("POST /json HTTP/1.1\r\nContent-Type: application/json\r\n\r\n{body}");

            assert!(
                matches!(Request::parse(raw.as_bytes()), Err(ParseError::InvalidJsonBody(_))),
                "{body:?}"
            );
        }
    }

    #[test]
    fn body_not_decoded() {
        #[rustfmt::skip]
        let cases = [
            // Missing content type
            "POST / HTTP/1.1\r\n\r\na=1",
            // Other content type
            "POST / HTTP/1.1\r\nContent-Type: text/plain\r\n\r\na=1",
            // Exact match only
            "POST / HTTP/1.1\r\nContent-Type: application/json; charset=utf-8\r\n\r\n{\"a\":\"1\"}",
            "POST / HTTP/1.1\r\ncontent-type: application/x-www-form-urlencoded\r\n\r\na=1",
            // Empty form body decodes to no pairs
            "POST / HTTP/1.1\r\nContent-Type: application/x-www-form-urlencoded\r\n\r\n",
        ];

        for raw in cases {
            let req = Request::parse(raw.as_bytes()).unwrap();

            assert!(req.body().is_empty(), "{raw:?}");
        }
    }

    #[test]
    fn body_after_first_blank_line() {
        let raw = "POST / HTTP/1.1\r\n\
            Content-Type: application/x-www-form-urlencoded\r\n\
            \r\n\
            a=1\r\n\r\nb=2";
        let req = Request::parse(raw.as_bytes()).unwrap();

        assert_eq!(req.body_value("a"), Some("1\r\n\r\nb"));
    }

    #[test]
    fn trailing_zero_bytes_are_not_trimmed() {
        let mut raw = b"GET / HTTP/1.1\r\nHost: x".to_vec();
        raw.resize(64, 0);

        let req = Request::parse(&raw).unwrap();

        assert_ne!(req.header("Host"), Some("x"));
        assert!(req.header("Host").unwrap().starts_with('x'));
    }
}
