//! Handler trait and type erasure.
//!
//! A handler is any `async fn(Request) -> impl IntoResponse`. The return type
//! is the contract: one invocation, one terminal [`Response`] — there is no
//! way to answer twice or not at all.
//!
//! The router stores handlers of different concrete types in one table, so
//! each is erased behind `Arc<dyn ErasedHandler>`:
//!
//! ```text
//! async fn get_book(req: Request) -> Response { … }
//!        ↓ router.get("/book", get_book)
//! Arc::new(FnHandler(get_book))        stored as BoxedHandler
//!        ↓ at request time
//! handler.call(req)                    one Arc clone + one vtable call,
//!        ↓                             then the boxed future is awaited
//! Box::pin(async { get_book(req).await.into_response() })
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future resolving to a [`Response`].
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it leaks through the
/// public [`Handler`] trait's method signature. Not useful outside the crate.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler, shared across concurrent requests via `Arc`.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid route handler.
///
/// Never implemented by hand — the blanket impl covers any
/// `async fn(Request) -> impl IntoResponse`. The trait is sealed so the
/// blanket impl is the only one there will ever be.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Bridges a concrete handler function into the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Method, Status};
    use bytes::Bytes;
    use http::HeaderMap;
    use std::collections::HashMap;

    fn request() -> Request {
        Request::new(
            Method::Get,
            "/".to_owned(),
            None,
            HeaderMap::new(),
            Bytes::new(),
            HashMap::new(),
        )
    }

    #[tokio::test]
    async fn async_fn_is_a_handler() {
        async fn hello(_req: Request) -> Response {
            Response::text("hi")
        }
        let boxed = hello.into_boxed_handler();
        let resp = boxed.call(request()).await;
        assert_eq!(resp.body(), b"hi");
    }

    #[tokio::test]
    async fn into_response_return_types_work() {
        async fn as_str(_req: Request) -> &'static str {
            "plain"
        }
        async fn as_status(_req: Request) -> Status {
            Status::NoContent
        }
        assert_eq!(as_str.into_boxed_handler().call(request()).await.body(), b"plain");
        assert_eq!(
            as_status.into_boxed_handler().call(request()).await.status_code(),
            Status::NoContent
        );
    }

    #[tokio::test]
    async fn closures_capturing_state_are_handlers() {
        let greeting = Arc::new("hola".to_owned());
        let handler = move |_req: Request| {
            let greeting = Arc::clone(&greeting);
            async move { Response::text(greeting.as_str()) }
        };
        let resp = handler.into_boxed_handler().call(request()).await;
        assert_eq!(resp.body(), b"hola");
    }
}
