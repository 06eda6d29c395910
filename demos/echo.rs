use corehttp::{limits::ConnLimits, middleware, Request, Response, Router, Server};
use serde_json::json;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

fn echo(req: &Request, resp: &mut Response) {
    resp.json_body(&json!({
        "method": req.method().as_str(),
        "path": req.path(),
        "query": req.query_params(),
        "body": req.body(),
    }));
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let mut router = Router::new();
    router.get("/echo", echo);
    router.post("/echo", echo);
    router.put("/echo", echo);
    router.patch("/echo", echo);
    router.delete("/echo", echo);
    router.use_global_post_middlewares([middleware::logger()]);

    Server::builder()
        .listener(TcpListener::bind("127.0.0.1:8080").await.unwrap())
        .router(router)
        .connection_limits(ConnLimits {
            max_request_size: 8 * 1024,
            reply_bad_request: true,
            ..ConnLimits::default()
        })
        .build()
        .launch()
        .await;
}
