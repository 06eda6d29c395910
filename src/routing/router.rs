//! Exact-match route table with global and per-route middleware chains.

use crate::{
    routing::middleware::{run_chain, SharedMiddleware},
    Method, Request, Response,
};
use std::{
    collections::{hash_map::Entry, HashMap},
    fmt,
    sync::Arc,
};
use tracing::debug;

/// Route handler. Side effects go through the [`Response`] only.
pub type Handler = Arc<dyn Fn(&Request, &mut Response) + Send + Sync>;

/// A handler plus its own pre- and post-middleware.
///
/// Returned by the [`Router`] registration methods so middleware can be chained
/// onto the route that was just added.
#[derive(Clone)]
pub struct Route {
    handler: Handler,
    pre: Vec<SharedMiddleware>,
    post: Vec<SharedMiddleware>,
}

impl Route {
    fn new(handler: Handler) -> Self {
        Self {
            handler,
            pre: Vec::new(),
            post: Vec::new(),
        }
    }

    /// Appends middleware run before the handler, in the given order.
    #[inline]
    pub fn use_pre_middlewares<I>(&mut self, middlewares: I) -> &mut Self
    where
        I: IntoIterator<Item = SharedMiddleware>,
    {
        self.pre.extend(middlewares);
        self
    }

    /// Appends middleware run after the handler, in the given order.
    #[inline]
    pub fn use_post_middlewares<I>(&mut self, middlewares: I) -> &mut Self
    where
        I: IntoIterator<Item = SharedMiddleware>,
    {
        self.post.extend(middlewares);
        self
    }

    #[inline(always)]
    pub fn pre_middleware_count(&self) -> usize {
        self.pre.len()
    }

    #[inline(always)]
    pub fn post_middleware_count(&self) -> usize {
        self.post.len()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pre_middlewares", &self.pre.len())
            .field("post_middlewares", &self.post.len())
            .finish_non_exhaustive()
    }
}

/// Route table keyed by `(method, exact path)`.
///
/// Paths are compared byte for byte: no patterns, no parameters and no
/// trailing-slash folding, so `/about` and `/about/` are two routes.
///
/// # Dispatch
///
/// [`resolve`](Router::resolve) runs, in order:
/// ```text
/// global pre ==> lookup ==> route pre ==> handler ==> route post ==> global post
///                  ||                                                    /\
///                  ++=========== no route: 404 Not Found ================++
/// ```
/// Every chain runs in registration order. A middleware returning
/// [`ControlFlow::Break`](std::ops::ControlFlow::Break) ends the whole
/// resolution on the spot, global post-middleware included.
///
/// The router is configured up front and then handed to the
/// [`Server`](crate::Server), which only ever reads it.
///
/// # Examples
/// ```
/// use corehttp::{middleware, Request, Response, Router, StatusCode};
///
/// let mut router = Router::new();
/// router.get("/about", |_, resp| {
///     resp.text_body("About page");
/// });
/// router.use_global_post_middlewares([middleware::logger()]);
///
/// let req = Request::parse(b"GET /about HTTP/1.1\r\n\r\n").unwrap();
/// let mut resp = Response::new();
/// router.resolve(&req, &mut resp);
///
/// assert_eq!(resp.status(), StatusCode::OK);
/// assert_eq!(resp.body(), "About page");
/// ```
#[derive(Default, Clone)]
pub struct Router {
    routes: HashMap<Method, HashMap<String, Route>>,
    global_pre: Vec<SharedMiddleware>,
    global_post: Vec<SharedMiddleware>,
}

impl Router {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `(method, path)`.
    ///
    /// An existing route under the same key is replaced, middleware included.
    pub fn add<P, F>(&mut self, method: Method, path: P, handler: F) -> &mut Route
    where
        P: Into<String>,
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.insert(method, path.into(), Route::new(Arc::new(handler)))
    }

    #[inline]
    pub fn get<P, F>(&mut self, path: P, handler: F) -> &mut Route
    where
        P: Into<String>,
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.add(Method::Get, path, handler)
    }

    #[inline]
    pub fn post<P, F>(&mut self, path: P, handler: F) -> &mut Route
    where
        P: Into<String>,
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.add(Method::Post, path, handler)
    }

    #[inline]
    pub fn put<P, F>(&mut self, path: P, handler: F) -> &mut Route
    where
        P: Into<String>,
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.add(Method::Put, path, handler)
    }

    #[inline]
    pub fn patch<P, F>(&mut self, path: P, handler: F) -> &mut Route
    where
        P: Into<String>,
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.add(Method::Patch, path, handler)
    }

    #[inline]
    pub fn delete<P, F>(&mut self, path: P, handler: F) -> &mut Route
    where
        P: Into<String>,
        F: Fn(&Request, &mut Response) + Send + Sync + 'static,
    {
        self.add(Method::Delete, path, handler)
    }

    /// Appends middleware run before every route of this router, and before
    /// the 404 fallback.
    #[inline]
    pub fn use_global_pre_middlewares<I>(&mut self, middlewares: I) -> &mut Self
    where
        I: IntoIterator<Item = SharedMiddleware>,
    {
        self.global_pre.extend(middlewares);
        self
    }

    /// Appends middleware run after every route of this router, and after
    /// the 404 fallback.
    #[inline]
    pub fn use_global_post_middlewares<I>(&mut self, middlewares: I) -> &mut Self
    where
        I: IntoIterator<Item = SharedMiddleware>,
    {
        self.global_post.extend(middlewares);
        self
    }

    /// Copies every route of `other` into this router.
    ///
    /// Before copying, `other`'s global pre- and post-middleware are appended to
    /// each of `other`'s own routes, after their per-route middleware. The
    /// copy is one-shot: later changes to either router do not propagate.
    ///
    /// Merging the same router again appends its global middleware a second
    /// time. Route presence is idempotent; middleware counts are not.
    ///
    /// # Examples
    /// ```
    /// use corehttp::{middleware, Method, Router};
    ///
    /// let mut admin = Router::new();
    /// admin.get("/admin", |_, resp| { resp.text_body("hi"); });
    /// admin.use_global_pre_middlewares([middleware::require_header("Authorization")]);
    ///
    /// let mut app = Router::new();
    /// app.merge(&mut admin);
    ///
    /// let route = app.route(Method::Get, "/admin").unwrap();
    /// assert_eq!(route.pre_middleware_count(), 1);
    /// ```
    pub fn merge(&mut self, other: &mut Router) -> &mut Self {
        for (method, routes) in other.routes.iter_mut() {
            for (path, route) in routes.iter_mut() {
                route
                    .use_pre_middlewares(other.global_pre.iter().cloned())
                    .use_post_middlewares(other.global_post.iter().cloned());

                self.insert(*method, path.clone(), route.clone());
            }
        }

        self
    }

    /// The route registered under `(method, path)`, if any.
    #[inline]
    pub fn route(&self, method: Method, path: &str) -> Option<&Route> {
        self.routes.get(&method)?.get(path)
    }

    /// Number of registered routes.
    #[inline]
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, method: Method, path: String, route: Route) -> &mut Route {
        match self.routes.entry(method).or_default().entry(path) {
            Entry::Occupied(mut entry) => {
                debug!(%method, path = %entry.key(), "replacing existing route");
                entry.insert(route);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(route),
        }
    }
}

impl Router {
    /// Dispatches `request`, writing the outcome into `response`.
    ///
    /// Never fails: an unknown route becomes `404 Not Found`, and a handler
    /// that sets nothing leaves the response as it was.
    pub fn resolve(&self, request: &Request, response: &mut Response) {
        if run_chain(&self.global_pre, request, response).is_break() {
            debug!(path = request.path(), "global pre-middleware stopped the request");
            return;
        }

        match self.route(request.method(), request.path()) {
            Some(route) => {
                if run_chain(&route.pre, request, response).is_break() {
                    debug!(path = request.path(), "route pre-middleware stopped the request");
                    return;
                }

                (route.handler)(request, response);

                if run_chain(&route.post, request, response).is_break() {
                    debug!(path = request.path(), "route post-middleware stopped the request");
                    return;
                }
            }
            None => {
                debug!(method = %request.method(), path = request.path(), "no route");
                response.not_found();
            }
        }

        if run_chain(&self.global_post, request, response).is_break() {
            debug!(path = request.path(), "global post-middleware stopped the request");
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("global_pre_middlewares", &self.global_pre.len())
            .field("global_post_middlewares", &self.global_post.len())
            .finish()
    }
}
