use crate::{limits::ConnLimits, server::connection::serve, Router};
use std::{io, net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{debug, info_span, warn, Instrument};

/// An HTTP server that accepts connections and dispatches them to a [`Router`].
///
/// The accept loop runs on the task that awaits [`launch`](Server::launch) and
/// never waits for request processing: each accepted connection is served on
/// its own spawned task, one request per connection. The router is moved into
/// the server at [`build`](ServerBuilder::build) time and shared read-only
/// between all connection tasks.
///
/// There is no cap on concurrent connection tasks; see the
/// [`limits`](crate::limits) module for what that means for memory.
///
/// # Examples
///
/// ```no_run
/// use corehttp::{Router, Server};
/// use tokio::net::TcpListener;
///
/// #[tokio::main]
/// async fn main() {
///     let mut router = Router::new();
///     router.get("/", |_, resp| {
///         resp.text_body("Hello world!");
///     });
///
///     Server::builder()
///         .listener(TcpListener::bind("127.0.0.1:8080").await.unwrap())
///         .router(router)
///         .build()
///         .launch()
///         .await
/// }
/// ```
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
    conn_limits: Arc<ConnLimits>,
}

impl Server {
    /// Creates a new builder for configuring the server instance.
    #[inline]
    pub fn builder() -> ServerBuilder {
        ServerBuilder {
            listener: None,
            router: None,
            connection_limits: None,
        }
    }

    /// Address the listener is bound to.
    #[inline]
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Starts accepting connections. Never returns.
    ///
    /// Accept failures are logged at `WARN` and the loop keeps going. Failures
    /// while serving a connection are logged the same way and only end that
    /// connection.
    pub async fn launch(self) {
        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(value) => value,
                Err(err) => {
                    warn!(%err, "accept failed");
                    continue;
                }
            };

            let router = self.router.clone();
            let limits = self.conn_limits.clone();

            tokio::spawn(
                async move {
                    match serve(stream, &router, &limits).await {
                        Ok(()) => debug!("connection closed"),
                        Err(err) => warn!(%err, "connection failed"),
                    }
                }
                .instrument(info_span!("connection", peer = %addr)),
            );
        }
    }
}

/// Builder for configuring and creating [`Server`] instances.
pub struct ServerBuilder {
    listener: Option<TcpListener>,
    router: Option<Router>,
    connection_limits: Option<ConnLimits>,
}

impl ServerBuilder {
    /// Sets the TCP listener that the server will use to accept connections.
    ///
    /// **This is a required component.**
    #[inline(always)]
    pub fn listener(mut self, listener: TcpListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Sets the router every request is resolved against.
    ///
    /// **This is a required component.** Build one router for the whole
    /// application, [merging](Router::merge) route groups into it first.
    #[inline(always)]
    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Configures per-connection limits. Defaults to [`ConnLimits::default`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # #[tokio::main]
    /// # async fn main() {
    /// use corehttp::{limits::ConnLimits, Router, Server};
    /// use tokio::net::TcpListener;
    /// use std::time::Duration;
    ///
    /// let server = Server::builder()
    ///     .listener(TcpListener::bind("127.0.0.1:8080").await.unwrap())
    ///     .router(Router::new())
    ///     .connection_limits(ConnLimits {
    ///         // Your changes
    ///         socket_read_timeout: Some(Duration::from_secs(5)),
    ///         reply_bad_request: true,
    ///         ..ConnLimits::default() // Required line
    ///     })
    ///     .build();
    /// # }
    /// ```
    #[inline(always)]
    pub fn connection_limits(mut self, limits: ConnLimits) -> Self {
        self.connection_limits = Some(limits);
        self
    }

    /// Finalizes the builder and constructs a [`Server`] instance.
    ///
    /// # Panics
    ///
    /// Error messages:
    /// - ``The `listener` method must be called to create``
    /// - ``The `router` method must be called to create``
    ///
    /// Panics when:
    /// - The `listener` method was not called.
    /// - The `router` method was not called.
    #[inline]
    #[track_caller]
    pub fn build(self) -> Server {
        Server {
            listener: self
                .listener
                .expect("The `listener` method must be called to create"),
            router: Arc::new(
                self.router
                    .expect("The `router` method must be called to create"),
            ),
            conn_limits: Arc::new(self.connection_limits.unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpStream,
    };

    async fn start(limits: ConnLimits) -> SocketAddr {
        let mut router = Router::new();
        router.get("/", |_, resp| {
            resp.text_body("root");
        });

        let mut private = Router::new();
        private.get("/private", |_, resp| {
            resp.text_body("secret");
        });
        private.use_global_pre_middlewares([middleware::require_header("Authorisation")]);
        router.merge(&mut private);

        let server = Server::builder()
            .listener(TcpListener::bind("127.0.0.1:0").await.unwrap())
            .router(router)
            .connection_limits(limits)
            .build();
        let addr = server.local_addr().unwrap();

        tokio::spawn(server.launch());
        addr
    }

    async fn send(addr: SocketAddr, raw: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw.as_bytes()).await.unwrap();

        let mut received = String::new();
        stream.read_to_string(&mut received).await.unwrap();
        received
    }

    #[tokio::test]
    async fn serves_over_tcp() {
        let addr = start(ConnLimits::default()).await;

        #[rustfmt::skip]
        let cases = [
            ("GET / HTTP/1.1\r\nHost: x\r\n\r\n",                             "HTTP/1.1 200 OK\r\n",           "root"),
            ("GET /about HTTP/1.1\r\nHost: x\r\n\r\n",                        "HTTP/1.1 404 Not Found\r\n",    ""),
            ("GET /private HTTP/1.1\r\n\r\n",                                 "HTTP/1.1 401 Unauthorized\r\n", "Unauthorized"),
            ("GET /private HTTP/1.1\r\nAuthorisation: t\r\n\r\n",             "HTTP/1.1 200 OK\r\n",           "secret"),
        ];

        for (raw, status_line, body) in cases {
            let received = send(addr, raw).await;

            assert!(received.starts_with(status_line), "{raw:?}: {received:?}");
            assert!(received.ends_with(&format!("\r\n\r\n{body}")), "{raw:?}: {received:?}");
            assert!(received.contains("\r\nConnection: close\r\n"), "{raw:?}: {received:?}");
        }
    }

    #[tokio::test]
    async fn keeps_accepting_after_bad_request() {
        let addr = start(ConnLimits::default()).await;

        assert_eq!(send(addr, "BREW /pot HTTP/1.1\r\n\r\n").await, "");
        assert!(send(addr, "GET / HTTP/1.1\r\n\r\n")
            .await
            .starts_with("HTTP/1.1 200 OK\r\n"));
    }

    #[tokio::test]
    async fn concurrent_connections() {
        let addr = start(ConnLimits::default()).await;

        let clients: Vec<_> = (0..32)
            .map(|_| tokio::spawn(send(addr, "GET / HTTP/1.1\r\n\r\n")))
            .collect();

        for client in clients {
            let received = client.await.unwrap();
            assert!(received.ends_with("\r\n\r\nroot"), "{received:?}");
        }
    }

    #[tokio::test]
    async fn bad_request_reply_over_tcp() {
        let addr = start(ConnLimits {
            reply_bad_request: true,
            ..ConnLimits::default()
        })
        .await;

        let received = send(addr, "GET /\r\n\r\n").await;
        assert!(received.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{received:?}");
    }

    #[tokio::test]
    #[should_panic(expected = "The `router` method must be called to create")]
    async fn build_without_router() {
        Server::builder()
            .listener(TcpListener::bind("127.0.0.1:0").await.unwrap())
            .build();
    }
}
