//! Named views for rendered HTML responses.
//!
//! A [`Views`] registry holds templates by name; a handler renders one with a
//! data context and gets back an HTML [`Response`]. Templates are plain text
//! with `{{ key }}` placeholders — the context is anything that serializes to
//! a JSON object, and each placeholder is replaced by the value under its
//! key. String values are HTML-escaped on the way in; missing keys render
//! empty.
//!
//! There is deliberately no template *language* here — no loops, no
//! conditionals, no partials. A view is a page skeleton with named holes.
//!
//! ```rust
//! use serde::Serialize;
//! use vereda::Views;
//!
//! #[derive(Serialize)]
//! struct Page<'a> { title: &'a str, message: &'a str }
//!
//! let views = Views::new()
//!     .insert("index", "<h1>{{ title }}</h1><p>{{ message }}</p>");
//!
//! let resp = views.render("index", &Page { title: "Hey", message: "Hello there!" }).unwrap();
//! assert_eq!(resp.body(), b"<h1>Hey</h1><p>Hello there!</p>");
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tokio::fs;

use crate::error::Error;
use crate::response::Response;

/// A registry of named templates.
pub struct Views {
    templates: HashMap<String, String>,
}

impl Views {
    pub fn new() -> Self {
        Self { templates: HashMap::new() }
    }

    /// Register `template` under `name`. Returns `self` for chaining;
    /// re-inserting a name replaces the previous template.
    pub fn insert(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(name.into(), template.into());
        self
    }

    /// Load every `*.html` file in `dir` as a template named after its stem
    /// (`views/index.html` registers as `"index"`). Non-HTML entries and
    /// subdirectories are skipped.
    pub async fn from_dir(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let mut views = Self::new();
        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("html") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let template = fs::read_to_string(&path).await?;
            views.templates.insert(name.to_owned(), template);
        }
        Ok(views)
    }

    /// Render the view registered under `name` with `context`, producing an
    /// HTML response.
    ///
    /// Unknown `name` is [`Error::MissingView`]; a context that cannot
    /// serialize to JSON is [`Error::RenderContext`].
    pub fn render<T: Serialize + ?Sized>(
        &self,
        name: &str,
        context: &T,
    ) -> Result<Response, Error> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| Error::MissingView(name.to_owned()))?;
        let context = serde_json::to_value(context).map_err(Error::RenderContext)?;
        Ok(Response::html(substitute(template, &context)))
    }
}

impl Default for Views {
    fn default() -> Self {
        Self::new()
    }
}

/// Replaces each `{{ key }}` with the context value under `key`. An unclosed
/// `{{` passes through literally.
fn substitute(template: &str, context: &Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                placeholder_text(&mut out, context.get(key));
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn placeholder_text(out: &mut String, value: Option<&Value>) {
    match value {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) => escape_html_into(out, s),
        Some(other) => out.push_str(&other.to_string()),
    }
}

fn escape_html_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_with_substitution() {
        let views = Views::new().insert("index", "<h1>{{ title }}</h1><p>{{ message }}</p>");
        let resp = views
            .render("index", &json!({"title": "Hey", "message": "Hello there!"}))
            .unwrap();
        assert_eq!(resp.header("content-type"), Some("text/html; charset=utf-8"));
        assert_eq!(resp.body(), b"<h1>Hey</h1><p>Hello there!</p>");
    }

    #[test]
    fn string_values_are_html_escaped() {
        let views = Views::new().insert("t", "{{ v }}");
        let resp = views.render("t", &json!({"v": "<script>\"&'"})).unwrap();
        assert_eq!(resp.body(), b"&lt;script&gt;&quot;&amp;&#39;");
    }

    #[test]
    fn numbers_and_bools_render_verbatim() {
        let views = Views::new().insert("t", "{{ n }}/{{ b }}");
        let resp = views.render("t", &json!({"n": 42, "b": true})).unwrap();
        assert_eq!(resp.body(), b"42/true");
    }

    #[test]
    fn missing_keys_render_empty() {
        let views = Views::new().insert("t", "[{{ nope }}]");
        let resp = views.render("t", &json!({})).unwrap();
        assert_eq!(resp.body(), b"[]");
    }

    #[test]
    fn unclosed_placeholder_is_literal() {
        let views = Views::new().insert("t", "a {{ b");
        let resp = views.render("t", &json!({})).unwrap();
        assert_eq!(resp.body(), b"a {{ b");
    }

    #[test]
    fn unknown_view_is_an_error() {
        let err = Views::new().render("ghost", &json!({})).unwrap_err();
        assert!(matches!(err, Error::MissingView(name) if name == "ghost"));
    }

    #[tokio::test]
    async fn from_dir_loads_html_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>{{ title }}</h1>").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let views = Views::from_dir(dir.path()).await.unwrap();
        let resp = views.render("index", &json!({"title": "Hey"})).unwrap();
        assert_eq!(resp.body(), b"<h1>Hey</h1>");
        assert!(views.render("notes", &json!({})).is_err());
    }
}
