//! Chained route handlers — the path written once, one handler per method.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example book_routes
//!
//! Try:
//!   curl http://localhost:3000/book
//!   curl -X POST http://localhost:3000/book
//!   curl -X PUT http://localhost:3000/book
//!   curl -X DELETE http://localhost:3000/book   # 405, allow: GET, POST, PUT

use vereda::{Request, Response, Router, Server};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .route("/book")
        .get(get_book)
        .post(add_book)
        .put(update_book);

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

async fn get_book(_req: Request) -> Response {
    Response::text("Get a random book")
}

async fn add_book(_req: Request) -> Response {
    Response::text("Add a book")
}

async fn update_book(_req: Request) -> Response {
    Response::text("Update the book")
}
