//! Request/response interceptors run around route handlers.

use crate::{Request, Response, StatusCode};
use std::{ops::ControlFlow, sync::Arc};
use tracing::{debug, info};

/// A step in a middleware chain.
///
/// Returning [`ControlFlow::Continue`] passes control to the next step.
/// Returning [`ControlFlow::Break`] short-circuits: nothing after this step
/// runs for the current request (not even global post-middleware), and the
/// response is sent exactly as this step left it.
///
/// Any `Fn(&Request, &mut Response) -> ControlFlow<()>` closure is a middleware.
///
/// # Examples
///
/// Closure
/// ```
/// use corehttp::{middleware, StatusCode};
/// use std::ops::ControlFlow;
///
/// let maintenance = middleware::from_fn(|_, resp| {
///     resp.text_body("Back soon").set_status(StatusCode::SERVICE_UNAVAILABLE);
///     ControlFlow::Break(())
/// });
/// ```
/// Type with its own state
/// ```
/// use corehttp::{Middleware, Request, Response};
/// use std::ops::ControlFlow;
///
/// struct PoweredBy(&'static str);
///
/// impl Middleware for PoweredBy {
///     fn handle(&self, _: &Request, resp: &mut Response) -> ControlFlow<()> {
///         resp.set_header("X-Powered-By", self.0);
///         ControlFlow::Continue(())
///     }
/// }
/// ```
pub trait Middleware
where
    Self: Send + Sync + 'static,
{
    fn handle(&self, request: &Request, response: &mut Response) -> ControlFlow<()>;
}

impl<F> Middleware for F
where
    F: Fn(&Request, &mut Response) -> ControlFlow<()> + Send + Sync + 'static,
{
    #[inline(always)]
    fn handle(&self, request: &Request, response: &mut Response) -> ControlFlow<()> {
        self(request, response)
    }
}

/// Middleware as stored by routes and routers. Cloning shares the same instance.
pub type SharedMiddleware = Arc<dyn Middleware>;

/// Wraps a closure into a [`SharedMiddleware`].
#[inline]
pub fn from_fn<F>(f: F) -> SharedMiddleware
where
    F: Fn(&Request, &mut Response) -> ControlFlow<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Runs `chain` in order, stopping at the first break.
pub(crate) fn run_chain(
    chain: &[SharedMiddleware],
    request: &Request,
    response: &mut Response,
) -> ControlFlow<()> {
    for middleware in chain {
        if middleware.handle(request, response).is_break() {
            return ControlFlow::Break(());
        }
    }

    ControlFlow::Continue(())
}

/// Logs method, path and the current status at `INFO`. Always continues.
///
/// Registered as global post-middleware it reports the final status of every
/// request that was not short-circuited earlier.
///
/// # Examples
/// ```
/// use corehttp::{middleware, Router};
///
/// let mut router = Router::new();
/// router.use_global_post_middlewares([middleware::logger()]);
/// ```
pub fn logger() -> SharedMiddleware {
    Arc::new(Logger)
}

struct Logger;

impl Middleware for Logger {
    fn handle(&self, request: &Request, response: &mut Response) -> ControlFlow<()> {
        let status = response.status();
        info!(
            method = %request.method(),
            path = request.path(),
            status = status.as_u16(),
            reason = status.reason(),
            "request served"
        );

        ControlFlow::Continue(())
    }
}

/// Rejects requests that lack a non-empty `name` header.
///
/// The header is looked up with exact case. A rejected request gets
/// `401 Unauthorized` with the text body `Unauthorized`, and the chain stops.
///
/// # Examples
/// ```
/// use corehttp::{middleware, Router};
///
/// let mut admin = Router::new();
/// admin
///     .get("/admin", |_, resp| { resp.text_body("secret"); })
///     .use_pre_middlewares([middleware::require_header("Authorization")]);
/// ```
pub fn require_header<N: Into<String>>(name: N) -> SharedMiddleware {
    Arc::new(RequireHeader { name: name.into() })
}

struct RequireHeader {
    name: String,
}

impl Middleware for RequireHeader {
    fn handle(&self, request: &Request, response: &mut Response) -> ControlFlow<()> {
        match request.header(&self.name) {
            Some(value) if !value.is_empty() => ControlFlow::Continue(()),
            _ => {
                debug!(
                    header = %self.name,
                    method = %request.method(),
                    path = request.path(),
                    "required header missing, rejecting request"
                );

                response
                    .text_body("Unauthorized")
                    .set_status(StatusCode::UNAUTHORIZED);
                ControlFlow::Break(())
            }
        }
    }
}
