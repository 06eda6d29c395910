//! Connection-per-request load test.
//!
//! Every request opens a fresh TCP connection, so the server holds one task and
//! one read buffer per in-flight client. Nothing bounds that number: raising
//! `CLIENTS` raises peak memory linearly until the process or the OS gives out.
//! This is the main resource-exhaustion risk of the engine and the figure
//! printed at the end is an estimate of its buffer share.
//!
//! Usage: `bench_corehttp [CLIENTS] [REQUESTS_PER_CLIENT]`

use corehttp::{limits::ConnLimits, Router, Server};
use std::{
    env,
    net::SocketAddr,
    time::{Duration, Instant},
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};
use tracing_subscriber::EnvFilter;

const REQUEST: &[u8] = b"GET / HTTP/1.1\r\nHost: bench\r\n\r\n";

async fn client(addr: SocketAddr, requests: usize) -> (usize, usize) {
    let (mut ok, mut failed) = (0, 0);
    let mut received = Vec::with_capacity(256);

    for _ in 0..requests {
        received.clear();

        let result = async {
            let mut stream = TcpStream::connect(addr).await?;
            stream.write_all(REQUEST).await?;
            stream.read_to_end(&mut received).await
        }
        .await;

        match result {
            Ok(_) if received.starts_with(b"HTTP/1.1 200 OK\r\n") => ok += 1,
            _ => failed += 1,
        }
    }

    (ok, failed)
}

// Changing the basic settings is necessary due to their default conservatism.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "error".into()))
        .init();

    let mut args = env::args().skip(1);
    let clients: usize = args.next().and_then(|v| v.parse().ok()).unwrap_or(256);
    let requests: usize = args.next().and_then(|v| v.parse().ok()).unwrap_or(200);

    let limits = ConnLimits {
        socket_read_timeout: Some(Duration::from_secs(5)),
        socket_write_timeout: Some(Duration::from_secs(5)),
        ..ConnLimits::default()
    };
    let buffer_size = limits.max_request_size + 1;

    let mut router = Router::new();
    router.get("/", |_, resp| {
        resp.text_body("Hello, world!");
    });

    let server = Server::builder()
        .listener(TcpListener::bind("127.0.0.1:0").await.unwrap())
        .router(router)
        .connection_limits(limits)
        .build();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.launch());

    let start = Instant::now();
    let tasks: Vec<_> = (0..clients)
        .map(|_| tokio::spawn(client(addr, requests)))
        .collect();

    let (mut ok, mut failed) = (0, 0);
    for task in tasks {
        let (o, f) = task.await.unwrap();
        ok += o;
        failed += f;
    }
    let elapsed = start.elapsed();

    println!("clients:            {clients}");
    println!("requests:           {} ok, {failed} failed", ok);
    println!("elapsed:            {elapsed:.2?}");
    println!("throughput:         {:.0} req/s", ok as f64 / elapsed.as_secs_f64());
    println!();
    println!("warning: no admission control. Each in-flight connection holds its own task");
    println!(
        "         and a {buffer_size} byte read buffer; at {clients} concurrent clients the read"
    );
    println!(
        "         buffers alone peak near {} KiB, growing without bound with load.",
        clients * buffer_size / 1024
    );
}
