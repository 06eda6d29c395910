use corehttp::{middleware, Request, Response, Router, Server};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct Person {
    name: &'static str,
    age: u8,
}

fn home(_: &Request, resp: &mut Response) {
    resp.json_body(&Person {
        name: "Jhon Doe",
        age: 18,
    });
}

fn home_routes() -> Router {
    let mut router = Router::new();
    for path in ["/home", "/home/1", "/home/2", "/home/3"] {
        router.get(path, home);
    }

    router.use_global_pre_middlewares([middleware::require_header("Authorisation")]);
    router
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut router = Router::new();
    router.get("/", home);
    router.get("/about", |_, resp| {
        resp.text_body("Welcome to about");
    });
    router.get("/contact", |_, resp| {
        resp.text_body("Welcome to contact");
    });
    router.get("/old-contact", |_, resp| {
        resp.redirect("/contact");
    });

    router.merge(&mut home_routes());
    router.use_global_post_middlewares([middleware::logger()]);

    let listener = TcpListener::bind("127.0.0.1:8000").await.unwrap();
    tracing::info!("listening on http://{}", listener.local_addr().unwrap());

    Server::builder()
        .listener(listener)
        .router(router)
        .build()
        .launch()
        .await;
}
