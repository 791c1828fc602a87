//! Renders the view model into the transcript HTML page a browser displays.

use chrono::DateTime;
use scopechat_core::{AppViewModel, MessageView, RetrievalStatus, Sender};
use scopechat_engine::{escape_html, Renderer};

const PAGE_STYLE: &str = "\
body { font-family: sans-serif; max-width: 48rem; margin: 1rem auto; }
.message { margin: 0.75rem 0; padding: 0.5rem 0.75rem; border-radius: 0.5rem; }
.message.user { background: #e8f0fe; }
.message.model { background: #f1f3f4; }
.message.system { background: #fef7e0; font-style: italic; }
.message.loading { opacity: 0.6; }
.meta { font-size: 0.75rem; color: #5f6368; }
.citations { font-size: 0.8rem; color: #5f6368; }
.citations .failed { text-decoration: line-through; }
.suggestions li { margin: 0.25rem 0; }";

/// Builds the complete transcript page for the active group.
pub fn render_page(view: &AppViewModel, renderer: &dyn Renderer) -> String {
    let group_name = view
        .groups
        .iter()
        .find(|group| group.id == view.active_group_id)
        .map(|group| group.name.as_str())
        .unwrap_or("(no group)");

    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{}</title>\n", escape_html(group_name)));
    page.push_str(&format!("<style>\n{PAGE_STYLE}\n</style>\n</head>\n<body>\n"));
    page.push_str(&format!("<h1>{}</h1>\n", escape_html(group_name)));

    page.push_str("<section class=\"transcript\">\n");
    for message in &view.transcript {
        page.push_str(&render_message(message, renderer));
    }
    page.push_str("</section>\n");

    if !view.suggestions.is_empty() {
        page.push_str("<section class=\"suggestions\">\n<h2>Suggested questions</h2>\n<ol>\n");
        for suggestion in &view.suggestions {
            page.push_str(&format!("<li>{}</li>\n", escape_html(suggestion)));
        }
        page.push_str("</ol>\n</section>\n");
    }

    page.push_str("</body>\n</html>\n");
    page
}

/// Completed model messages render as markdown; everything else, including
/// the in-flight placeholder, is escaped plain text.
fn render_message(message: &MessageView, renderer: &dyn Renderer) -> String {
    let mut classes = format!("message {}", sender_class(message.sender));
    if message.is_loading {
        classes.push_str(" loading");
    }

    let body = if message.sender == Sender::Model && !message.is_loading {
        renderer.to_html(&message.text)
    } else {
        format!("<p>{}</p>", escape_html(&message.text))
    };

    let mut html = format!(
        "<div class=\"{classes}\">\n<div class=\"meta\">{}</div>\n{body}",
        format_timestamp(message.timestamp_ms)
    );

    if !message.citations.is_empty() {
        html.push_str("<ul class=\"citations\">\n");
        for citation in &message.citations {
            let class = match citation.status {
                RetrievalStatus::Success => "retrieved",
                RetrievalStatus::Error => "failed",
                RetrievalStatus::Unknown => "unknown",
            };
            html.push_str(&format!(
                "<li class=\"{class}\">{}</li>\n",
                escape_html(&citation.retrieved_url)
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</div>\n");
    html
}

fn sender_class(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "user",
        Sender::Model => "model",
        Sender::System => "system",
    }
}

fn format_timestamp(timestamp_ms: u64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms as i64)
        .map(|time| time.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopechat_core::{GroupView, UrlCitation};
    use scopechat_engine::MarkdownHtmlRenderer;

    fn view_with(transcript: Vec<MessageView>, suggestions: Vec<String>) -> AppViewModel {
        AppViewModel {
            active_group_id: "docs".to_string(),
            groups: vec![GroupView {
                id: "docs".to_string(),
                name: "Docs <&>".to_string(),
                urls: Vec::new(),
                at_capacity: false,
            }],
            transcript,
            suggestions,
            ..AppViewModel::default()
        }
    }

    fn message(sender: Sender, text: &str, is_loading: bool) -> MessageView {
        MessageView {
            id: 1,
            sender,
            text: text.to_string(),
            timestamp_ms: 1_700_000_000_000,
            is_loading,
            citations: Vec::new(),
        }
    }

    #[test]
    fn group_name_is_escaped_in_title_and_heading() {
        let page = render_page(&view_with(Vec::new(), Vec::new()), &MarkdownHtmlRenderer);
        assert!(page.contains("<title>Docs &lt;&amp;&gt;</title>"));
        assert!(page.contains("<h1>Docs &lt;&amp;&gt;</h1>"));
    }

    #[test]
    fn model_messages_render_markdown() {
        let page = render_page(
            &view_with(vec![message(Sender::Model, "**bold**", false)], Vec::new()),
            &MarkdownHtmlRenderer,
        );
        assert!(page.contains("<strong>bold</strong>"));
    }

    #[test]
    fn user_and_system_messages_are_plain_text() {
        let page = render_page(
            &view_with(
                vec![
                    message(Sender::User, "**not bold** <b>raw</b>", false),
                    message(Sender::System, "notice", false),
                ],
                Vec::new(),
            ),
            &MarkdownHtmlRenderer,
        );
        assert!(page.contains("**not bold** &lt;b&gt;raw&lt;/b&gt;"));
        assert!(page.contains("class=\"message system\""));
    }

    #[test]
    fn loading_placeholder_stays_plain_and_marked() {
        let page = render_page(
            &view_with(vec![message(Sender::Model, "Thinking…", true)], Vec::new()),
            &MarkdownHtmlRenderer,
        );
        assert!(page.contains("class=\"message model loading\""));
        assert!(page.contains("<p>Thinking…</p>"));
    }

    #[test]
    fn citations_are_listed_with_status_classes() {
        let mut resolved = message(Sender::Model, "answer", false);
        resolved.citations = vec![
            UrlCitation {
                retrieved_url: "https://a.example.com".to_string(),
                status: RetrievalStatus::Success,
            },
            UrlCitation {
                retrieved_url: "https://b.example.com".to_string(),
                status: RetrievalStatus::Error,
            },
        ];
        let page = render_page(&view_with(vec![resolved], Vec::new()), &MarkdownHtmlRenderer);
        assert!(page.contains("<li class=\"retrieved\">https://a.example.com</li>"));
        assert!(page.contains("<li class=\"failed\">https://b.example.com</li>"));
    }

    #[test]
    fn suggestions_section_appears_only_when_present() {
        let without = render_page(&view_with(Vec::new(), Vec::new()), &MarkdownHtmlRenderer);
        assert!(!without.contains("Suggested questions"));

        let with = render_page(
            &view_with(Vec::new(), vec!["What is a borrow?".to_string()]),
            &MarkdownHtmlRenderer,
        );
        assert!(with.contains("Suggested questions"));
        assert!(with.contains("<li>What is a borrow?</li>"));
    }
}
