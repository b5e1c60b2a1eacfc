//! Code-fence stripping for extraction result bodies
//!
//! The extraction pipeline occasionally writes its JSON wrapped in Markdown
//! fenced-code markup (` ```json ... ``` `). The poll loop strips the fence
//! before parsing so a fenced body parses the same as the bare payload.

/// Strip an optional leading ```` ```json ```` opener (tag match is
/// case-insensitive, the bare ```` ``` ```` opener also counts) and an
/// optional trailing ```` ``` ````, plus surrounding whitespace.
pub fn strip_code_fences(body: &str) -> &str {
    let mut s = body.trim();

    if let Some(rest) = s.strip_prefix("```") {
        // Tag runs to the end of the opener line; only a missing or `json`
        // tag is treated as fence markup.
        let (tag, after) = match rest.find('\n') {
            Some(idx) => (&rest[..idx], &rest[idx + 1..]),
            None => (rest, ""),
        };
        if tag.trim().is_empty() || tag.trim().eq_ignore_ascii_case("json") {
            s = after;
        }
    }

    let s = s.trim_end();
    let s = s.strip_suffix("```").unwrap_or(s);
    s.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_json_unchanged() {
        assert_eq!(strip_code_fences(r#"{"status":"ok"}"#), r#"{"status":"ok"}"#);
    }

    #[test]
    fn test_fenced_json() {
        let body = "```json\n{\"status\":\"ok\"}\n```";
        assert_eq!(strip_code_fences(body), r#"{"status":"ok"}"#);
    }

    #[test]
    fn test_fence_tag_case_insensitive() {
        let body = "```JSON\n{\"a\":1}\n```";
        assert_eq!(strip_code_fences(body), r#"{"a":1}"#);
    }

    #[test]
    fn test_untagged_fence() {
        let body = "```\n{\"a\":1}\n```";
        assert_eq!(strip_code_fences(body), r#"{"a":1}"#);
    }

    #[test]
    fn test_surrounding_whitespace() {
        let body = "  \n```json\n{\"a\":1}\n```  \n";
        assert_eq!(strip_code_fences(body), r#"{"a":1}"#);
    }

    #[test]
    fn test_fenced_parses_same_as_unfenced() {
        let bare = r#"{"recommendations":[{"course":"CS 101"}]}"#;
        let fenced = format!("```json\n{}\n```", bare);
        let a: serde_json::Value = serde_json::from_str(strip_code_fences(bare)).unwrap();
        let b: serde_json::Value = serde_json::from_str(strip_code_fences(&fenced)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_json_fence_tag_left_alone() {
        // A ```text fence is not extraction markup; leave it for the JSON
        // parser to reject (and the poll loop to treat as not-ready).
        let body = "```text\nhello\n```";
        assert_eq!(strip_code_fences(body), "```text\nhello");
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(strip_code_fences(""), "");
        assert_eq!(strip_code_fences("```json\n```"), "");
    }
}
