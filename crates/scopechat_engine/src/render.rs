use pulldown_cmark::{html, Options, Parser};

/// Renders completed model messages; everything else goes through
/// [`escape_html`] as plain text.
pub trait Renderer: Send + Sync {
    fn to_html(&self, markdown: &str) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownHtmlRenderer;

impl Renderer for MarkdownHtmlRenderer {
    fn to_html(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        let parser = Parser::new_ext(markdown, options);
        let mut out = String::new();
        html::push_html(&mut out, parser);
        out
    }
}

/// Escapes text for literal inclusion in an HTML document.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
