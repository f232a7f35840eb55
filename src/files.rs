//! File-backed responses: inline sends and attachment downloads.
//!
//! Two actions, split by the `content-disposition` they declare:
//!
//! - [`send`] — `inline`: the browser shows the file (images, PDFs, HTML).
//! - [`download`] / [`download_as`] — `attachment`: the browser saves it,
//!   under the file's own name or one you choose.
//!
//! The content type is inferred from the file extension; unknown extensions
//! fall back to `application/octet-stream`. The whole file is read into the
//! response body, which is the right trade for the handler-sized files this
//! crate targets.
//!
//! A path that cannot be read returns `Err` — see [`Error`] for why that
//! deliberately surfaces as a 500 rather than a friendly page.
//!
//! ```rust,no_run
//! use vereda::{files, Error, Request, Response};
//!
//! async fn sample(_req: Request) -> Result<Response, Error> {
//!     files::download("demos/files/hello.txt").await
//! }
//! ```

use std::path::Path;

use tokio::fs;

use crate::error::Error;
use crate::response::Response;

/// Sends the file at `path` inline, content type inferred from the extension.
pub async fn send(path: impl AsRef<Path>) -> Result<Response, Error> {
    let path = path.as_ref();
    let content = fs::read(path).await?;
    Ok(Response::builder()
        .header("content-disposition", "inline")
        .body(content_type_for(path), content))
}

/// Sends the file at `path` as an attachment named after the file itself.
pub async fn download(path: impl AsRef<Path>) -> Result<Response, Error> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_owned());
    download_as(path, &name).await
}

/// Sends the file at `path` as an attachment saved under `name`.
pub async fn download_as(path: impl AsRef<Path>, name: &str) -> Result<Response, Error> {
    let path = path.as_ref();
    let content = fs::read(path).await?;
    let disposition = format!("attachment; filename=\"{}\"", sanitize_filename(name));
    Ok(Response::builder()
        .header("content-disposition", &disposition)
        .body(content_type_for(path), content))
}

/// Content type by file extension. The table carries what a handler plausibly
/// serves; everything else is an octet stream.
fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("mp3") => "audio/mpeg",
        Some("mp4") => "video/mp4",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz" | "gzip") => "application/gzip",
        Some("tar") => "application/x-tar",
        _ => "application/octet-stream",
    }
}

/// Keeps the filename safe inside a quoted header value.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;
    use std::io::Write;

    fn fixture(name: &str, contents: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn send_is_inline_with_inferred_type() {
        let (_dir, path) = fixture("hello.txt", b"Hello, World!");
        let resp = send(&path).await.unwrap();
        assert_eq!(resp.status_code(), Status::Ok);
        assert_eq!(resp.header("content-type"), Some("text/plain; charset=utf-8"));
        assert_eq!(resp.header("content-disposition"), Some("inline"));
        assert_eq!(resp.body(), b"Hello, World!");
    }

    #[tokio::test]
    async fn download_names_the_attachment() {
        let (_dir, path) = fixture("report.pdf", b"%PDF-1.4");
        let resp = download(&path).await.unwrap();
        assert_eq!(resp.header("content-type"), Some("application/pdf"));
        assert_eq!(
            resp.header("content-disposition"),
            Some("attachment; filename=\"report.pdf\"")
        );
    }

    #[tokio::test]
    async fn download_as_overrides_the_name() {
        let (_dir, path) = fixture("hello.txt", b"hi");
        let resp = download_as(&path, "greeting.txt").await.unwrap();
        assert_eq!(
            resp.header("content-disposition"),
            Some("attachment; filename=\"greeting.txt\"")
        );
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = send(dir.path().join("nope.txt")).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        assert_eq!(content_type_for(Path::new("blob.xyz")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn filename_quotes_are_neutralized() {
        assert_eq!(sanitize_filename("a\"b.txt"), "a_b.txt");
    }
}
