//! # vereda
//!
//! A small HTTP framework built around two ideas:
//!
//! - **A route dispatch table.** A (path, method) pair maps to exactly one
//!   handler, registered once at startup and immutable afterwards. Paths can
//!   bind several method handlers in one chain, so the path string is written
//!   exactly once.
//! - **A typed response catalog.** Each way of answering a request — text,
//!   raw bytes, JSON, JSONP, redirect, rendered view, file send, file
//!   download, bare status — is one constructor producing one [`Response`].
//!   A handler returns one of them; answering twice is not expressible.
//!
//! Everything a reverse proxy already does (TLS, rate limiting, body-size
//! limits, slow clients) is out of scope on purpose.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use vereda::{Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .route("/book")
//!         .get(get_book)
//!         .post(add_book)
//!         .put(update_book);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn get_book(_req: Request) -> Response {
//!     Response::text("Get a random book")
//! }
//!
//! async fn add_book(_req: Request) -> Response {
//!     Response::text("Add a book")
//! }
//!
//! async fn update_book(_req: Request) -> Response {
//!     Response::text("Update the book")
//! }
//! ```
//!
//! Unmatched requests are answered by the framework: 404 when no route knows
//! the path, 405 (with an `allow` header) when the path exists under other
//! methods.

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;
mod views;

pub mod files;

pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::{Route, Router};
pub use server::Server;
pub use status::Status;
pub use views::Views;
