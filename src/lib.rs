//! corehttp - Minimal HTTP/1.1 server engine with a two-phase middleware router
//!
//! Reads one request per TCP connection straight from the socket, parses it into
//! a [`Request`], runs it through a [`Router`] and writes back the rendered
//! [`Response`] before closing the connection.
//!
//! # Request lifecycle
//!
//! ```text
//! accept ==> read once ==> Request::parse ==> Router::resolve ==> Response::render ==> write ==> close
//! ```
//!
//! [`Router::resolve`] runs global pre-middleware, the matched route's
//! pre-middleware, its handler, its post-middleware and finally global
//! post-middleware. Any [`Middleware`] can stop the chain by returning
//! [`ControlFlow::Break`](std::ops::ControlFlow::Break).
//!
//! # Protocol Support
//!
//! - **HTTP/1.1** request line and headers, `GET`/`POST`/`PUT`/`PATCH`/`DELETE`
//! - Bodies: `application/json` (flat string map) and
//!   `application/x-www-form-urlencoded`
//! - **Not supported**: keep-alive, pipelining, chunked transfer-encoding, TLS,
//!   HTTP/2, streaming or bodies larger than
//!   [`max_request_size`](limits::ConnLimits::max_request_size)
//!
//! # Examples
//!
//! Quick start:
//! ```no_run
//! use corehttp::{Router, Server};
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut router = Router::new();
//!     router.get("/", |_, resp| {
//!         resp.text_body("Hello World!");
//!     });
//!
//!     Server::builder()
//!         .listener(TcpListener::bind("127.0.0.1:8080").await.unwrap())
//!         .router(router)
//!         .build()
//!         .launch()
//!         .await;
//! }
//! ```
//! Route groups and middleware:
//! ```no_run
//! use corehttp::{middleware, Router, Server, StatusCode};
//! use std::ops::ControlFlow;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut api = Router::new();
//!     api.post("/api/items", |req, resp| {
//!         match req.body_value("name") {
//!             Some(name) => resp.text_body(format!("created {name}")).set_status(StatusCode::CREATED),
//!             None => resp.text_body("name is required").set_status(StatusCode::BAD_REQUEST),
//!         };
//!     });
//!     api.use_global_pre_middlewares([middleware::require_header("Authorization")]);
//!
//!     let mut app = Router::new();
//!     app.get("/health", |_, resp| {
//!         resp.text_body("ok");
//!     })
//!     .use_post_middlewares([middleware::from_fn(|_, resp| {
//!         resp.set_header("Cache-Control", "no-store");
//!         ControlFlow::Continue(())
//!     })]);
//!     app.merge(&mut api);
//!     app.use_global_post_middlewares([middleware::logger()]);
//!
//!     Server::builder()
//!         .listener(TcpListener::bind("127.0.0.1:8080").await.unwrap())
//!         .router(app)
//!         .build()
//!         .launch()
//!         .await;
//! }
//! ```
//!
//! # Logging
//!
//! Events are emitted through [`tracing`]; no subscriber is installed by the
//! library.

pub(crate) mod http {
    pub mod query;
    pub(crate) mod request;
    pub(crate) mod response;
    pub(crate) mod types;
}
pub(crate) mod routing {
    pub mod middleware;
    pub(crate) mod router;
}
pub(crate) mod server {
    pub(crate) mod connection;
    pub(crate) mod server_impl;
}
pub(crate) mod errors;
pub mod limits;

pub use crate::{
    errors::{ParseError, ServeError},
    http::{
        query,
        request::Request,
        response::Response,
        types::{HeaderMap, Method, StatusCode},
    },
    routing::{
        middleware::{self, Middleware, SharedMiddleware},
        router::{Handler, Route, Router},
    },
    server::{
        connection::serve,
        server_impl::{Server, ServerBuilder},
    },
};
