//! Per-connection limits and socket behavior
//!
//! # Memory Consumption
//!
//! Every accepted connection gets its own task and exactly one read buffer of
//! [`max_request_size`](ConnLimits::max_request_size)` + 1` bytes, allocated
//! when the task starts and freed when the connection closes. There is no cap on
//! the number of connection tasks, so peak memory grows linearly with the number
//! of concurrent clients:
//!
//! `Total` ≈ `concurrent connections` × (`max_request_size` + `response size` + `task overhead`)
//!
//! Under load this is the engine's main resource-exhaustion risk. Put an
//! admission-controlling proxy in front of the server if that matters to you.
//!
//! # Examples
//!
//! ```no_run
//! use corehttp::{limits::ConnLimits, Router, Server};
//! use std::time::Duration;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() {
//!     Server::builder()
//!         .listener(TcpListener::bind("127.0.0.1:8080").await.unwrap())
//!         .router(Router::new())
//!         .connection_limits(ConnLimits {
//!             max_request_size: 8 * 1024,
//!             socket_read_timeout: Some(Duration::from_secs(5)),
//!             ..ConnLimits::default()
//!         })
//!         .build()
//!         .launch()
//!         .await;
//! }
//! ```

use std::time::Duration;

/// Controls how a single connection is read, answered and closed.
///
/// # Connection lifecycle
/// ```text
/// [ accept ] ==> [ one read (<= max_request_size) ] ==> [ parse ]
///                                                          ||
///                       [ close ] <== [ write ] <== [ Router::resolve ]
/// ```
///
/// Exactly one request is served per connection; there is no keep-alive,
/// pipelining or reassembly of a request split across several TCP segments.
#[derive(Debug, Clone)]
pub struct ConnLimits {
    /// Largest request, in bytes, that a single read may deliver (default: `2048`).
    ///
    /// The buffer is one byte larger than this value. A read that fills the
    /// extra byte fails with
    /// [`ParseError::RequestTooLarge`](crate::ParseError::RequestTooLarge)
    /// instead of handing a truncated request to the parser.
    pub max_request_size: usize,

    /// Deadline for the single read (default: `None`).
    ///
    /// `None` waits forever, so a client that connects and never sends can
    /// hold its task and buffer indefinitely.
    pub socket_read_timeout: Option<Duration>,

    /// Deadline for writing the rendered response (default: `None`).
    pub socket_write_timeout: Option<Duration>,

    /// Answer unparseable requests with `400 Bad Request` (default: `false`).
    ///
    /// # Examples
    /// If `false`, the connection is closed without writing anything.
    ///
    /// If `true`, the server writes:
    /// ```text
    /// HTTP/1.1 400 Bad Request\r
    /// Date: Sun, 06 Nov 1994 08:49:37 GMT\r
    /// Server: corehttp/0.1.0\r
    /// Connection: close\r
    /// Content-Type: text/plain; charset=utf-8\r
    /// Content-Length: 11\r
    /// \r
    /// Bad Request
    /// ```
    pub reply_bad_request: bool,

    #[doc(hidden)]
    #[allow(dead_code)]
    pub _priv: (),
}

impl Default for ConnLimits {
    #[inline(always)]
    fn default() -> Self {
        Self {
            max_request_size: 2048,
            socket_read_timeout: None,
            socket_write_timeout: None,
            reply_bad_request: false,

            _priv: (),
        }
    }
}

impl ConnLimits {
    #[inline(always)]
    pub(crate) fn buffer_size(&self) -> usize {
        self.max_request_size.saturating_add(1)
    }
}
