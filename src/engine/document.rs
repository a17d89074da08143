use crate::model::artifacts::{ArtifactKind, GeneratedArtifacts};

/// Shown by the preview while nothing has been generated.
pub const PLACEHOLDER_PAGE: &str = "<!DOCTYPE html>
<html>
<head>
<meta charset=\"utf-8\">
<style>
body { font-family: sans-serif; color: #888; display: flex; align-items: center; justify-content: center; height: 100vh; margin: 0; }
</style>
</head>
<body>
<p>Your generated page will appear here.</p>
</body>
</html>
";

/// Merge the three artifacts into one self-contained document.
///
/// Returns an empty string while `html` is still the untouched placeholder.
/// Markup without a closed `<head>` gets one first (see [`ensure_head`]). CSS
/// goes into a `<style>` block right before `</head>` and JavaScript into a
/// `<script>` block right before `</body>`, each only when the markup has no
/// such block yet. Assembling an assembled document changes nothing.
pub fn assemble_document(artifacts: &GeneratedArtifacts) -> String {
    if artifacts.is_placeholder(ArtifactKind::Html) {
        return String::new();
    }

    let mut doc = ensure_head(&artifacts.html);

    if let Some(css) = injectable(artifacts, ArtifactKind::Css) {
        if !has_block(&doc, "style") {
            doc = insert_before(&doc, "</head>", &format!("<style>{css}</style>"));
        }
    }

    if let Some(js) = injectable(artifacts, ArtifactKind::Javascript) {
        if !has_block(&doc, "script") {
            doc = insert_before(&doc, "</body>", &format!("<script>{js}</script>"));
        }
    }

    doc
}

/// The document to show: the assembled one, or the placeholder page.
pub fn preview_document(artifacts: &GeneratedArtifacts) -> String {
    let doc = assemble_document(artifacts);
    if doc.is_empty() {
        PLACEHOLDER_PAGE.to_string()
    } else {
        doc
    }
}

/// Code worth injecting: not blank and not the untouched placeholder.
fn injectable(artifacts: &GeneratedArtifacts, kind: ArtifactKind) -> Option<&str> {
    let text = artifacts.get(kind);
    if text.trim().is_empty() || artifacts.is_placeholder(kind) {
        None
    } else {
        Some(text)
    }
}

/// Byte offset of the first `<name` tag at or after `from`. Longer names
/// such as `<header` for `head` do not match.
fn find_tag(lower: &str, name: &str, from: usize) -> Option<usize> {
    let pattern = format!("<{name}");
    let mut at = from;
    while let Some(rel) = lower[at..].find(&pattern) {
        let idx = at + rel;
        let end = idx + pattern.len();
        match lower.as_bytes().get(end) {
            None | Some(b'>') | Some(b'/') => return Some(idx),
            Some(b) if b.is_ascii_whitespace() => return Some(idx),
            _ => at = end,
        }
    }
    None
}

/// Whether the markup already has a `<name>` element. Text inside script
/// bodies (`innerHTML = '<style>'`) does not count.
fn has_block(doc: &str, name: &str) -> bool {
    let lower = doc.to_ascii_lowercase();
    if name == "script" {
        return find_tag(&lower, "script", 0).is_some();
    }

    let mut at = 0;
    loop {
        let script = find_tag(&lower, "script", at);
        let segment_end = script.unwrap_or(lower.len());
        if find_tag(&lower[..segment_end], name, at).is_some() {
            return true;
        }
        let Some(start) = script else {
            return false;
        };
        match lower[start..].find("</script") {
            Some(rel) => at = start + rel + "</script".len(),
            None => return false,
        }
    }
}

/// Give markup a closed `<head>`. An open head is closed where the body
/// starts; a missing one goes before `<body>` or wraps the whole fragment.
fn ensure_head(html: &str) -> String {
    let lower = html.to_ascii_lowercase();
    if lower.contains("</head>") {
        return html.to_string();
    }

    // ASCII lowercasing keeps byte offsets intact.
    let body = find_tag(&lower, "body", 0);
    match (find_tag(&lower, "head", 0), body) {
        (Some(_), Some(b)) => format!("{}</head>{}", &html[..b], &html[b..]),
        (Some(h), None) => {
            let end = lower[h..].find('>').map_or(lower.len(), |i| h + i + 1);
            format!("{}</head>{}", &html[..end], &html[end..])
        }
        (None, Some(b)) => format!("{}{}{}", &html[..b], EMPTY_HEAD, &html[b..]),
        (None, None) => format!("<!DOCTYPE html><html>{EMPTY_HEAD}<body>{html}</body></html>"),
    }
}

const EMPTY_HEAD: &str = "<head><meta charset=\"utf-8\"></head>";

/// Insert `block` before the last `closing` tag, or append it when the tag is missing.
fn insert_before(doc: &str, closing: &str, block: &str) -> String {
    match doc.to_ascii_lowercase().rfind(closing) {
        Some(idx) => format!("{}{}{}", &doc[..idx], block, &doc[idx..]),
        None => format!("{doc}{block}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<!DOCTYPE html><html><head><title>t</title></head><body><button>Hi</button></body></html>";

    #[test]
    fn test_injects_both_blocks_at_anchors() {
        let doc = assemble_document(&GeneratedArtifacts::new(PAGE, "button{color:red}", "console.log(1)"));
        assert_eq!(
            doc,
            "<!DOCTYPE html><html><head><title>t</title><style>button{color:red}</style></head>\
<body><button>Hi</button><script>console.log(1)</script></body></html>"
        );
    }

    #[test]
    fn test_reassembly_is_a_no_op() {
        let artifacts = GeneratedArtifacts::new(PAGE, "p{}", "run()");
        let once = assemble_document(&artifacts);
        let twice = assemble_document(&GeneratedArtifacts::new(once.clone(), "p{}", "run()"));
        assert_eq!(once, twice);
        assert_eq!(twice.matches("<style>").count(), 1);
        assert_eq!(twice.matches("<script>").count(), 1);
    }

    #[test]
    fn test_placeholder_html_yields_empty_document() {
        let mut artifacts = GeneratedArtifacts::placeholders();
        artifacts.css = "body{}".into();
        artifacts.javascript = "alert(1)".into();
        assert_eq!(assemble_document(&artifacts), "");
        assert_eq!(preview_document(&artifacts), PLACEHOLDER_PAGE);
    }

    #[test]
    fn test_existing_blocks_skip_injection_per_artifact() {
        let html = "<html><head><STYLE>h1{}</STYLE></head><body></body></html>";
        let doc = assemble_document(&GeneratedArtifacts::new(html, "p{}", "go()"));
        assert!(!doc.contains("p{}"));
        assert!(doc.contains("<script>go()</script></body>"));
    }

    #[test]
    fn test_empty_and_placeholder_artifacts_are_not_injected() {
        let mut artifacts = GeneratedArtifacts::placeholders();
        artifacts.html = PAGE.into();
        assert_eq!(assemble_document(&artifacts), PAGE);

        let doc = assemble_document(&GeneratedArtifacts::new(PAGE, "", "  "));
        assert_eq!(doc, PAGE);
    }

    #[test]
    fn test_fragment_is_wrapped_in_a_document() {
        let doc = assemble_document(&GeneratedArtifacts::new("<p>x</p>", "p{}", "go()"));
        assert_eq!(
            doc,
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><style>p{}</style></head>\
<body><p>x</p><script>go()</script></body></html>"
        );
        let again = assemble_document(&GeneratedArtifacts::new(doc.clone(), "p{}", "go()"));
        assert_eq!(doc, again);
    }

    #[test]
    fn test_head_is_added_before_existing_body() {
        let doc = assemble_document(&GeneratedArtifacts::new("<html><body>hi</body></html>", "a{}", ""));
        assert_eq!(
            doc,
            "<html><head><meta charset=\"utf-8\"><style>a{}</style></head><body>hi</body></html>"
        );
    }

    #[test]
    fn test_missing_body_close_appends_script() {
        let doc = assemble_document(&GeneratedArtifacts::new("<html><head></head><body>hi", "", "go()"));
        assert_eq!(doc, "<html><head></head><body>hi<script>go()</script>");
    }

    #[test]
    fn test_anchor_match_is_case_insensitive() {
        let html = "<HTML><HEAD></HEAD><BODY></BODY></HTML>";
        let doc = assemble_document(&GeneratedArtifacts::new(html, "a{}", "b()"));
        assert_eq!(doc, "<HTML><HEAD><style>a{}</style></HEAD><BODY><script>b()</script></BODY></HTML>");
    }

    #[test]
    fn test_unclosed_head_is_closed_not_duplicated() {
        let html = "<html><head><title>t</title><body><p>x</p></body></html>";
        let doc = assemble_document(&GeneratedArtifacts::new(html, "p{}", ""));
        assert_eq!(
            doc,
            "<html><head><title>t</title><style>p{}</style></head><body><p>x</p></body></html>"
        );
        assert_eq!(doc.matches("<head").count(), 1);

        let again = assemble_document(&GeneratedArtifacts::new(doc.clone(), "p{}", ""));
        assert_eq!(doc, again);
    }

    #[test]
    fn test_header_element_is_not_a_head() {
        let doc = assemble_document(&GeneratedArtifacts::new("<header>Top</header>", "h{}", ""));
        assert_eq!(
            doc,
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><style>h{}</style></head>\
<body><header>Top</header></body></html>"
        );
    }

    #[test]
    fn test_tag_text_inside_script_does_not_block_style() {
        let html = "<html><head></head><body><script>el.innerHTML='<style>'</script></body></html>";
        let doc = assemble_document(&GeneratedArtifacts::new(html, "p{}", "go()"));
        assert!(doc.contains("<head><style>p{}</style></head>"));
        assert!(!doc.contains("go()"));
    }
}
