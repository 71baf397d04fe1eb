//! Minimal wend example — registration, middleware, and dispatch.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic

use std::str::FromStr;

use wend::{Method, Next, Router, handlers};

/// The host application's context. wend never looks inside it — handlers
/// thread it down the chain and back up.
#[derive(Default)]
struct Ctx {
    status: u16,
    body: String,
    user_id: Option<String>,
}

// Global middleware: runs ahead of every route handler registered after it.
async fn logger(cx: Ctx, next: Next<Ctx>) -> Ctx {
    let started = std::time::Instant::now();
    let cx = next.run(cx).await;
    tracing::info!(status = cx.status, elapsed = ?started.elapsed(), "handled");
    cx
}

async fn list_users(mut cx: Ctx, _next: Next<Ctx>) -> Ctx {
    cx.status = 200;
    cx.body = r#"[{"id":"1"},{"id":"2"}]"#.to_owned();
    cx
}

async fn get_user(mut cx: Ctx, _next: Next<Ctx>) -> Ctx {
    let id = cx.user_id.take().unwrap_or_default();
    cx.status = 200;
    cx.body = format!(r#"{{"id":"{id}"}}"#);
    cx
}

async fn create_user(mut cx: Ctx, _next: Next<Ctx>) -> Ctx {
    cx.status = 201;
    cx.body = r#"{"id":"99"}"#.to_owned();
    cx
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let mut router: Router<Ctx> = Router::new();
    router.middleware(logger);
    router.get("/users", handlers![list_users]).unwrap();
    router.get("/users/:id", handlers![get_user]).unwrap();
    router.post("/users", handlers![create_user]).unwrap();

    // A host would parse these from incoming requests.
    for (method, path) in [
        ("GET", "/users"),
        ("GET", "/users/42"),
        ("POST", "/users"),
        ("DELETE", "/users/42"),
        ("GET", "/nope"),
    ] {
        let method = Method::from_str(method).expect("demo methods are accepted");

        match router.lookup(method, path) {
            None => println!("{method} {path} -> 404"),
            Some(found) => match found.handler {
                None => {
                    let allow: Vec<&str> =
                        found.methods.iter().map(|m| m.as_str()).collect();
                    println!("{method} {path} -> 405 (allow: {})", allow.join(", "));
                }
                Some(chain) => {
                    let cx = Ctx {
                        user_id: found.params.get("id").cloned(),
                        ..Ctx::default()
                    };
                    let cx = chain.run(cx).await;
                    println!("{method} {path} -> {} {}", cx.status, cx.body);
                }
            },
        }
    }
}
