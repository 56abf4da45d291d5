//! Plain-text and HTML rendering of the digest.

use crate::cli::TelegramFormat;
use crate::models::{Article, Digest, NO_DESCRIPTION, NO_TITLE};
use crate::utils::{display_date, ellipsize, escape_html, truncate_chars};
use chrono::NaiveDate;
use std::fmt::Write;

/// Maximum length of a Telegram message, in characters.
pub const TELEGRAM_MAX_CHARS: usize = 4000;

/// Appended to a Telegram message cut at [`TELEGRAM_MAX_CHARS`].
pub const TRUNCATION_NOTICE: &str = "\n\n... (message truncated)";

/// Introduces an AI-generated overview.
pub const FALLBACK_NOTICE: &str = "News API unavailable. Here's an AI-generated overview:";

/// Shown when neither articles nor an overview are available.
pub const NO_NEWS_NOTICE: &str =
    "No news articles were available today. Please check back tomorrow.";

/// Closing line of the email.
pub const EMAIL_FOOTER: &str = "This is an automated daily news digest.";

const TELEGRAM_PREFIX: &str = "📰 ";

const EMAIL_STYLE: &str = "  body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
  h2 { color: #2c3e50; }
  ol { padding-left: 20px; }
  li { margin-bottom: 15px; }
  a { color: #3498db; text-decoration: none; }
  a:hover { text-decoration: underline; }
  .description { color: #666; margin-top: 5px; }";

/// Output format selected per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Plain,
    TelegramHtml,
    EmailHtml,
}

impl OutputMode {
    /// Characters of description kept before the ellipsis.
    pub fn description_limit(self) -> usize {
        match self {
            OutputMode::Plain | OutputMode::TelegramHtml => 200,
            OutputMode::EmailHtml => 300,
        }
    }

    /// The `parse_mode` Telegram needs for this output, if any.
    pub fn telegram_parse_mode(self) -> Option<&'static str> {
        match self {
            OutputMode::TelegramHtml => Some("HTML"),
            OutputMode::Plain | OutputMode::EmailHtml => None,
        }
    }
}

impl From<TelegramFormat> for OutputMode {
    fn from(format: TelegramFormat) -> Self {
        match format {
            TelegramFormat::Html => OutputMode::TelegramHtml,
            TelegramFormat::Plain => OutputMode::Plain,
        }
    }
}

/// Subject and both bodies of the digest email.
#[derive(Debug, Clone)]
pub struct EmailBody {
    pub subject: String,
    pub plain: String,
    pub html: String,
}

/// Render `digest` for `mode`, headed by `date`.
pub fn render(digest: &Digest, mode: OutputMode, date: NaiveDate) -> String {
    let header = format!("Daily Europe News – {}", display_date(date));
    match mode {
        OutputMode::Plain => render_plain(digest, &header),
        OutputMode::TelegramHtml => render_telegram_html(digest, &header),
        OutputMode::EmailHtml => render_email_html(digest, &header),
    }
}

/// Render the Telegram message and apply the length cap.
///
/// The cap is applied to the final string, after escaping and markup. In
/// [`TelegramFormat::Html`] the cut can land inside a tag, which Telegram
/// rejects as unparsable; [`TelegramFormat::Plain`] has no such failure mode.
pub fn render_telegram(digest: &Digest, date: NaiveDate, format: TelegramFormat) -> String {
    let body = render(digest, OutputMode::from(format), date);
    cap_length(format!("{TELEGRAM_PREFIX}{body}"), TELEGRAM_MAX_CHARS)
}

/// Render subject, plain part and HTML part of the digest email.
pub fn render_email(digest: &Digest, date: NaiveDate) -> EmailBody {
    EmailBody {
        subject: build_email_subject(date),
        plain: render(digest, OutputMode::Plain, date),
        html: render(digest, OutputMode::EmailHtml, date),
    }
}

/// Subject line such as `Your daily Europe news – 2024-01-15`.
pub fn build_email_subject(date: NaiveDate) -> String {
    format!("Your daily Europe news – {}", display_date(date))
}

/// Cut `message` to `max` characters and append [`TRUNCATION_NOTICE`] when
/// it is longer.
pub fn cap_length(message: String, max: usize) -> String {
    match truncate_chars(&message, max) {
        (prefix, true) => format!("{prefix}{TRUNCATION_NOTICE}"),
        (_, false) => message,
    }
}

fn intro(count: usize) -> String {
    format!("Here are the top {count} European news stories:")
}

fn title_of(article: &Article) -> &str {
    let title = article.title.trim();
    if title.is_empty() { NO_TITLE } else { title }
}

fn description_of(article: &Article) -> &str {
    let description = article.description.trim();
    if description.is_empty() {
        NO_DESCRIPTION
    } else {
        description
    }
}

fn render_plain(digest: &Digest, header: &str) -> String {
    let mut lines: Vec<String> = vec![header.to_string(), String::new()];

    match digest {
        Digest::Articles(articles) => {
            lines.push(intro(articles.len()));
            lines.push(String::new());
            let limit = OutputMode::Plain.description_limit();
            for (i, article) in articles.iter().enumerate() {
                lines.push(format!("{}) {}", i + 1, title_of(article)));
                lines.push(format!("   {}", ellipsize(description_of(article), limit)));
                let url = article.url.trim();
                if !url.is_empty() {
                    lines.push(format!("   {url}"));
                }
                lines.push(String::new());
            }
        }
        Digest::Fallback(overview) => {
            lines.push(FALLBACK_NOTICE.to_string());
            lines.push(String::new());
            lines.push(overview.trim().to_string());
        }
        Digest::Empty => lines.push(NO_NEWS_NOTICE.to_string()),
    }

    lines.join("\n")
}

/// Title as a link when the article has a URL, bold otherwise.
fn linked_title(article: &Article, emphasis: &str) -> String {
    let title = escape_html(title_of(article));
    let url = article.url.trim();
    if url.is_empty() {
        format!("<{emphasis}>{title}</{emphasis}>")
    } else {
        format!("<a href=\"{}\">{title}</a>", escape_html(url))
    }
}

fn render_telegram_html(digest: &Digest, header: &str) -> String {
    let mut lines: Vec<String> = vec![format!("<b>{}</b>", escape_html(header)), String::new()];

    match digest {
        Digest::Articles(articles) => {
            lines.push(intro(articles.len()));
            lines.push(String::new());
            let limit = OutputMode::TelegramHtml.description_limit();
            for (i, article) in articles.iter().enumerate() {
                lines.push(format!("{}) {}", i + 1, linked_title(article, "b")));
                let description = ellipsize(description_of(article), limit);
                lines.push(format!("   <i>{}</i>", escape_html(&description)));
                lines.push(String::new());
            }
        }
        Digest::Fallback(overview) => {
            lines.push(format!("<i>{}</i>", escape_html(FALLBACK_NOTICE)));
            lines.push(String::new());
            lines.push(escape_html(overview.trim()).into_owned());
        }
        Digest::Empty => lines.push(NO_NEWS_NOTICE.to_string()),
    }

    lines.join("\n")
}

fn render_email_html(digest: &Digest, header: &str) -> String {
    let mut html = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(html, "<!DOCTYPE html>\n<html>\n<head>\n<meta charset='utf-8'>");
    let _ = writeln!(html, "<style>\n{EMAIL_STYLE}\n</style>\n</head>\n<body>");
    let _ = writeln!(html, "<h2>{}</h2>", escape_html(header));

    match digest {
        Digest::Articles(articles) => {
            let _ = writeln!(html, "<p>{}</p>\n<ol>", intro(articles.len()));
            let limit = OutputMode::EmailHtml.description_limit();
            for article in articles {
                let description = ellipsize(description_of(article), limit);
                let _ = writeln!(
                    html,
                    "<li>\n{}\n<p class=\"description\">{}</p>\n</li>",
                    linked_title(article, "strong"),
                    escape_html(&description)
                );
            }
            let _ = writeln!(html, "</ol>");
        }
        Digest::Fallback(overview) => {
            let _ = writeln!(html, "<p><em>{}</em></p>", escape_html(FALLBACK_NOTICE));
            let paragraphs = escape_html(overview.trim()).replace('\n', "<br>\n");
            let _ = writeln!(html, "<p>{paragraphs}</p>");
        }
        Digest::Empty => {
            let _ = writeln!(html, "<p>{NO_NEWS_NOTICE}</p>");
        }
    }

    let _ = write!(
        html,
        "<hr>\n<p style='color: #999; font-size: 0.9em;'>{EMAIL_FOOTER}</p>\n</body>\n</html>"
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn article(title: &str, description: &str, url: &str) -> Article {
        Article {
            title: title.to_string(),
            description: description.to_string(),
            url: url.to_string(),
            published_at: String::new(),
        }
    }

    fn sample() -> Digest {
        Digest::Articles(vec![
            article("EU leaders meet", "Summit in Brussels.", "https://news.example.eu/1"),
            article("Storm in the Alps", "Heavy snow expected.", ""),
        ])
    }

    #[test]
    fn test_plain_layout() {
        let out = render(&sample(), OutputMode::Plain, date());
        let expected = "Daily Europe News – 2024-01-15\n\
\n\
Here are the top 2 European news stories:\n\
\n\
1) EU leaders meet\n   Summit in Brussels.\n   https://news.example.eu/1\n\
\n\
2) Storm in the Alps\n   Heavy snow expected.\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_plain_truncates_description_at_200_chars() {
        let long = "é".repeat(250);
        let digest = Digest::Articles(vec![article("T", &long, "")]);
        let out = render(&digest, OutputMode::Plain, date());
        let expected = format!("   {}...", "é".repeat(200));
        assert!(out.lines().any(|l| l == expected));
    }

    #[test]
    fn test_empty_description_renders_placeholder() {
        let digest = Digest::Articles(vec![article("", "", "")]);
        for mode in [OutputMode::Plain, OutputMode::TelegramHtml, OutputMode::EmailHtml] {
            let out = render(&digest, mode, date());
            assert!(out.contains(NO_DESCRIPTION), "{mode:?}");
            assert!(out.contains(NO_TITLE), "{mode:?}");
        }
    }

    #[test]
    fn test_telegram_html_escapes_untrusted_text() {
        let digest = Digest::Articles(vec![article(
            "<script>alert(1)</script>",
            "Profits & \"losses\" <b>now</b>",
            "https://evil.example/?a=1&b=\"><script>",
        )]);
        let out = render(&digest, OutputMode::TelegramHtml, date());

        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(out.contains("Profits &amp; &quot;losses&quot; &lt;b&gt;now&lt;/b&gt;"));
        assert!(out.contains(
            "<a href=\"https://evil.example/?a=1&amp;b=&quot;&gt;&lt;script&gt;\">"
        ));
    }

    #[test]
    fn test_telegram_html_title_without_url_is_bold() {
        let out = render(&sample(), OutputMode::TelegramHtml, date());
        assert!(out.contains("1) <a href=\"https://news.example.eu/1\">EU leaders meet</a>"));
        assert!(out.contains("2) <b>Storm in the Alps</b>"));
        assert!(out.contains("   <i>Summit in Brussels.</i>"));
        assert!(out.starts_with("<b>Daily Europe News – 2024-01-15</b>"));
    }

    #[test]
    fn test_email_html_document() {
        let long = "x".repeat(350);
        let digest = Digest::Articles(vec![
            article("A & B", &long, "https://news.example.eu/1"),
            article("No link", "d", ""),
        ]);
        let out = render(&digest, OutputMode::EmailHtml, date());

        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<h2>Daily Europe News – 2024-01-15</h2>"));
        assert!(out.contains("<p>Here are the top 2 European news stories:</p>"));
        assert!(out.contains("<a href=\"https://news.example.eu/1\">A &amp; B</a>"));
        assert!(out.contains(&format!("<p class=\"description\">{}...</p>", "x".repeat(300))));
        assert!(out.contains("<strong>No link</strong>"));
        assert!(out.contains(EMAIL_FOOTER));
        assert!(out.ends_with("</html>"));
    }

    #[test]
    fn test_fallback_rendering() {
        let digest = Digest::Fallback("1. Markets <up> & away".to_string());

        let plain = render(&digest, OutputMode::Plain, date());
        assert!(plain.contains("AI-generated overview"));
        assert!(plain.contains("1. Markets <up> & away"));

        let tg = render(&digest, OutputMode::TelegramHtml, date());
        assert!(tg.contains("AI-generated overview"));
        assert!(tg.contains("1. Markets &lt;up&gt; &amp; away"));

        let email = render(&digest, OutputMode::EmailHtml, date());
        assert!(email.contains("1. Markets &lt;up&gt; &amp; away"));
        assert!(!email.contains(NO_NEWS_NOTICE));
    }

    #[test]
    fn test_empty_digest_renders_no_news_notice() {
        for mode in [OutputMode::Plain, OutputMode::TelegramHtml, OutputMode::EmailHtml] {
            let out = render(&Digest::Empty, mode, date());
            assert!(out.contains(NO_NEWS_NOTICE), "{mode:?}");
            assert!(!out.contains("AI-generated"), "{mode:?}");
        }
    }

    #[test]
    fn test_telegram_message_is_capped_after_rendering() {
        let articles = (0..60)
            .map(|i| article(&format!("Headline {i} & more"), &"d".repeat(250), "https://news.example.eu/x"))
            .collect();
        let digest = Digest::Articles(articles);

        for format in [TelegramFormat::Html, TelegramFormat::Plain] {
            let out = render_telegram(&digest, date(), format);
            assert!(out.ends_with(TRUNCATION_NOTICE));
            let body: String = out.chars().take(TELEGRAM_MAX_CHARS).collect();
            assert_eq!(
                out.chars().count(),
                TELEGRAM_MAX_CHARS + TRUNCATION_NOTICE.chars().count()
            );
            let full = format!("📰 {}", render(&digest, OutputMode::from(format), date()));
            assert!(full.starts_with(&body));
        }
    }

    #[test]
    fn test_default_format_caps_long_digest_without_markup() {
        use clap::Parser;
        let format = crate::cli::Cli::parse_from(["eu_news_digest"]).telegram_format;
        let articles = (0..15)
            .map(|i| {
                article(
                    &format!("European leaders and ministers meet on topic {i}"),
                    &"Long article body. ".repeat(30),
                    &format!("https://www.example-news.eu/2024/01/15/european-leaders-ministers-{i}"),
                )
            })
            .collect();

        let out = render_telegram(&Digest::Articles(articles), date(), format);

        assert!(out.ends_with(TRUNCATION_NOTICE));
        assert!(!out.contains("<a "));
        assert!(!out.contains("<b>"));
        assert!(!out.contains("<i>"));
    }

    #[test]
    fn test_short_telegram_message_is_untouched() {
        let out = render_telegram(&sample(), date(), TelegramFormat::Plain);
        assert!(out.starts_with("📰 Daily Europe News – 2024-01-15"));
        assert!(!out.contains(TRUNCATION_NOTICE));
    }

    #[test]
    fn test_cap_length_boundary() {
        let exact = "a".repeat(4000);
        assert_eq!(cap_length(exact.clone(), 4000), exact);
        let over = "a".repeat(4001);
        assert_eq!(cap_length(over, 4000), format!("{exact}{TRUNCATION_NOTICE}"));
    }

    #[test]
    fn test_email_subject_and_parts() {
        let body = render_email(&sample(), date());
        assert_eq!(body.subject, "Your daily Europe news – 2024-01-15");
        assert!(body.plain.starts_with("Daily Europe News – 2024-01-15"));
        assert!(body.html.contains("<ol>"));
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!(OutputMode::TelegramHtml.telegram_parse_mode(), Some("HTML"));
        assert_eq!(OutputMode::Plain.telegram_parse_mode(), None);
    }
}
