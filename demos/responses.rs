//! The response catalog — one route per way of answering a request.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example responses
//!
//! Try:
//!   curl http://localhost:3000/send
//!   curl http://localhost:3000/json
//!   curl 'http://localhost:3000/jsonp?callback=cb'
//!   curl -i http://localhost:3000/redirect
//!   curl http://localhost:3000/render
//!   curl -i http://localhost:3000/sendstatus
//!   curl -OJ http://localhost:3000/download
//!   curl http://localhost:3000/sendfile
//!   curl http://localhost:3000/end

use std::sync::Arc;

use serde::Serialize;
use vereda::{files, Error, Request, Response, Router, Server, Status, Views};

const SAMPLE_FILE: &str = "demos/files/hello.txt";

#[derive(Serialize)]
struct Greeting {
    message: &'static str,
}

const GREETING: Greeting = Greeting { message: "Hello, World!" };

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let views = Arc::new(Views::new().insert(
        "index",
        "<html><head><title>{{ title }}</title></head>\
         <body><h1>{{ title }}</h1><p>{{ message }}</p></body></html>",
    ));

    let app = Router::new()
        .get("/download", download)
        .get("/end", end)
        .get("/json", json)
        .get("/jsonp", jsonp)
        .get("/redirect", redirect)
        .get("/render", move |_req: Request| {
            let views = Arc::clone(&views);
            async move {
                views.render(
                    "index",
                    &serde_json::json!({"title": "Hey", "message": "Hello there!"}),
                )
            }
        })
        .get("/send", send)
        .get("/sendfile", send_file)
        .get("/sendstatus", send_status);

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

// GET /download — attachment disposition; the browser saves the file.
// A missing file on disk surfaces as a logged 500, not a friendly page.
async fn download(_req: Request) -> Result<Response, Error> {
    files::download(SAMPLE_FILE).await
}

// GET /end — raw bytes, no content type declared, stream closed.
async fn end(_req: Request) -> Response {
    Response::raw(&b"Hello, World!"[..])
}

// GET /json
async fn json(_req: Request) -> Response {
    Response::json(&GREETING)
}

// GET /jsonp?callback=cb — without the callback parameter this answers
// plain JSON.
async fn jsonp(req: Request) -> Response {
    Response::jsonp(&GREETING, req.query("callback").as_deref())
}

// GET /redirect — 302 over to /json.
async fn redirect(_req: Request) -> Response {
    Response::redirect("/json")
}

// GET /send
async fn send(_req: Request) -> Response {
    Response::text("Hello, World!")
}

// GET /sendfile — inline disposition; the browser shows the file.
async fn send_file(_req: Request) -> Result<Response, Error> {
    files::send(SAMPLE_FILE).await
}

// GET /sendstatus — 404 with its reason phrase as the body.
async fn send_status(_req: Request) -> Response {
    Response::send_status(Status::NotFound)
}
