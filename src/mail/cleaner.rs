//! Turns HTML mail bodies into readable plain text.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use url::Url;

/// Displayed links longer than this are shortened.
const MAX_URL_CHARS: usize = 60;

const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "gclid",
    "fbclid",
    "ref",
    "trk",
];

/// Elements whose content is never part of the readable text.
const DROPPED_ELEMENTS: &[&str] = &[
    "style", "script", "head", "title", "noscript", "iframe", "object", "footer", "header",
];

/// Containers that can carry hidden preheaders or class-tagged footers.
const NOISE_CONTAINERS: &[&str] = &[
    "div", "span", "p", "table", "tbody", "tr", "td", "section", "center", "font", "a",
];

lazy_static! {
    static ref DROPPED_BLOCKS: Vec<Regex> = DROPPED_ELEMENTS
        .iter()
        .map(|tag| {
            Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>"))
                .expect("Failed to compile element regex")
        })
        .collect();
    static ref NOISE_BLOCKS: Vec<Regex> = NOISE_CONTAINERS
        .iter()
        .map(|tag| {
            Regex::new(&format!(
                r#"(?is)<{tag}\b[^>]*?\b(style\s*=\s*["'][^"']*display\s*:\s?none|class\s*=\s*["'][^"']*(footer|header|tracking|pixel))[^>]*>.*?</{tag}\s*>"#
            ))
            .expect("Failed to compile noise element regex")
        })
        .collect();
    static ref VOID_MEDIA: Regex =
        Regex::new(r"(?i)<(img|meta|link|embed)\b[^>]*>").expect("Failed to compile media regex");
    static ref LINK: Regex = Regex::new(r#"(?is)<a\b[^>]*?href\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a\s*>"#)
        .expect("Failed to compile link regex");
    static ref LINE_BREAK: Regex = Regex::new(r"(?i)<br\s*/?>|</(p|div|tr|li|h[1-6]|table|blockquote)\s*>")
        .expect("Failed to compile line break regex");
    static ref TAG: Regex = Regex::new(r"<[^>]+>").expect("Failed to compile tag regex");
    static ref MANY_BLANK_LINES: Regex =
        Regex::new(r"\n[ \t]*\n[ \t]*\n[\s]*").expect("Failed to compile blank line regex");
    static ref SPACES: Regex = Regex::new(r"[ \t]+").expect("Failed to compile spaces regex");
    static ref LEADING_LINE_SPACE: Regex = Regex::new(r"\n ").expect("Failed to compile line regex");
    static ref EXTRA_NEWLINES: Regex = Regex::new(r"\n{3,}").expect("Failed to compile newline regex");
    static ref NOISE: Vec<Regex> = [
        r"(?i)View this email in your browser[^\n]*(\n|$)",
        r"(?i)If you can't see this email[^\n]*(\n|$)",
        r"(?i)This is a system-generated email[^\n]*(\n|$)",
        r"(?i)Please do not reply to this email[^\n]*(\n|$)",
        r"(?i)Unsubscribe[^\n]*?preferences[^\n]*(\n|$)",
        r"(?i)© ?[0-9]{4}[^\n]*?All rights reserved[^\n]*(\n|$)",
        r"\[Image:[^\]]*\]",
        r"\[Image\]",
        r"(?i)\(image\)",
        r"Image: [^\n]*(\n|$)",
        r"Alt text: [^\n]*(\n|$)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Failed to compile noise regex"))
    .collect();
}

fn is_url_like(text: &str) -> bool {
    let lowered = text.to_lowercase();
    if ["http://", "https://", "www.", "ftp://"]
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
    {
        return true;
    }
    text.contains('.') && !text.contains(' ')
}

fn remove_tracking_params(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };
    if url.query().is_none() {
        return raw.to_string();
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| !TRACKING_PARAMS.contains(&name.as_ref()))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    url.to_string()
}

/// Shortens long URLs for display, dropping tracking parameters first.
pub fn truncate_url(url: &str) -> String {
    if url.chars().count() <= MAX_URL_CHARS {
        return url.to_string();
    }
    let cleaned = remove_tracking_params(url);
    if cleaned.chars().count() <= MAX_URL_CHARS {
        return cleaned;
    }
    let kept: String = cleaned.chars().take(MAX_URL_CHARS).collect();
    format!("{kept}...")
}

fn render_link(captures: &Captures) -> String {
    let href = captures[1].trim();
    let text = TAG.replace_all(&captures[2], "").trim().to_string();
    if href.is_empty() {
        return text;
    }
    let display = truncate_url(href);
    if !text.is_empty() && text != href && !is_url_like(&text) {
        format!("{text} ({display})")
    } else {
        format!("[Link: {display}]")
    }
}

fn unescape_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn post_process(text: &str) -> String {
    let text = unescape_entities(text).replace("\r\n", "\n");
    let text = SPACES.replace_all(&text, " ");
    let text = LEADING_LINE_SPACE.replace_all(&text, "\n");
    let mut text = MANY_BLANK_LINES.replace_all(&text, "\n\n").into_owned();

    for pattern in NOISE.iter() {
        text = pattern.replace_all(&text, "").into_owned();
    }

    EXTRA_NEWLINES
        .replace_all(&text, "\n\n")
        .trim()
        .to_string()
}

/// Extracts readable text from an HTML mail body.
///
/// Drops non-content elements and images, renders links inline as
/// `text (url)` or `[Link: url]`, strips remaining tags, unescapes common
/// entities, collapses whitespace and removes boilerplate lines such as
/// "view in browser" and unsubscribe footers. Plain-text input passes
/// through the same whitespace and boilerplate cleanup.
pub fn clean_email_body(html: &str) -> String {
    let mut text = html.to_string();
    for block in DROPPED_BLOCKS.iter().chain(NOISE_BLOCKS.iter()) {
        text = block.replace_all(&text, "").into_owned();
    }
    let text = VOID_MEDIA.replace_all(&text, "");
    let text = LINK.replace_all(&text, |captures: &Captures| render_link(captures));
    let text = LINE_BREAK.replace_all(&text, "\n");
    let text = TAG.replace_all(&text, "");
    post_process(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_non_content_elements() {
        let html = "<html><head><title>Hi</title><style>p{color:red}</style></head>\
                    <body><p>Hello <b>there</b></p><script>track()</script><p>Bye</p></body></html>";
        assert_eq!(clean_email_body(html), "Hello there\nBye");
    }

    #[test]
    fn renders_links_inline() {
        let html = r#"<p>Read the <a href="https://example.com/post">latest post</a> now</p>"#;
        assert_eq!(
            clean_email_body(html),
            "Read the latest post (https://example.com/post) now"
        );
        let bare = r#"<a href="https://example.com">example.com</a>"#;
        assert_eq!(clean_email_body(bare), "[Link: https://example.com]");
    }

    #[test]
    fn long_links_lose_tracking_params() {
        let url = "https://example.com/a/very/long/path/to/article?utm_source=mail&utm_medium=email&id=7";
        assert_eq!(truncate_url(url), "https://example.com/a/very/long/path/to/article?id=7");
        assert_eq!(truncate_url("https://short.io"), "https://short.io");
    }

    #[test]
    fn tracking_removal_keeps_fragment() {
        let url = "https://example.com/post?id=7&utm_source=newsletter&utm_medium=email&utm_campaign=x#comments";
        assert_eq!(truncate_url(url), "https://example.com/post?id=7#comments");
    }

    #[test]
    fn tracking_names_are_decoded_before_matching() {
        let url = "https://example.com/post?utm%5Fsource=newsletter&fbclid=abcdefghijklmnopqrstuvwxyz";
        assert_eq!(truncate_url(url), "https://example.com/post");
    }

    #[test]
    fn question_mark_in_fragment_is_not_a_query() {
        let url = "https://example.com/a/long/path/for/the/docs/page#section?utm_source=x";
        assert_eq!(truncate_url(url), format!("{}...", &url[..60]));
    }

    #[test]
    fn drops_hidden_elements() {
        let html = r#"<div style="display:none">Preheader text</div><span style="color: red; display: none">More hidden</span><p>Hello</p>"#;
        assert_eq!(clean_email_body(html), "Hello");
    }

    #[test]
    fn drops_footer_header_and_tracking_classes() {
        let html = r#"<div class="header-bar">Logo</div><p>Hello</p>
            <div class="footer">Footer junk</div>
            <table class="email-footer"><tr><td>Address</td></tr></table>
            <span class="tracking">t</span><div class='pixel-wrap'>p</div>"#;
        assert_eq!(clean_email_body(html), "Hello");
    }

    #[test]
    fn visible_elements_with_other_classes_are_kept() {
        let html = r#"<div class="content" style="display:block">Body text</div>"#;
        assert_eq!(clean_email_body(html), "Body text");
    }

    #[test]
    fn unescapes_entities() {
        assert_eq!(
            clean_email_body("Fish&nbsp;&amp;&nbsp;Chips &lt;3 &quot;yum&quot;"),
            "Fish & Chips <3 \"yum\""
        );
    }

    #[test]
    fn removes_boilerplate_lines() {
        let body = "View this email in your browser\nHello friend\n\
                    Unsubscribe or manage your preferences\n© 2024 Acme. All rights reserved.";
        assert_eq!(clean_email_body(body), "Hello friend");
    }

    #[test]
    fn drops_image_placeholders() {
        let html = r#"<p>Team photo <img src="x.png" alt="team"> [Image: team] (image)</p>"#;
        assert_eq!(clean_email_body(html), "Team photo");
    }

    #[test]
    fn collapses_whitespace() {
        let html = "<p>One</p>\n\n\n\n<p>Two    words</p>";
        assert_eq!(clean_email_body(html), "One\n\nTwo words");
    }

    #[test]
    fn empty_body_is_empty() {
        assert_eq!(clean_email_body(""), "");
    }
}
