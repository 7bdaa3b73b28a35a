use regex::Regex;
use std::sync::OnceLock;

/// `<` through the next `>`, or through end of input when none follows
const TAG_PATTERN: &str = r"<[^>]*>?";

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(TAG_PATTERN).expect("tag pattern is a valid regex"))
}

/// Remove markup tags from `html`.
///
/// Each `<` starts a tag that runs to the next `>`; an unterminated tag
/// swallows the rest of the input. Entities and nesting are left alone.
pub fn strip_markup(html: &str) -> String {
    tag_regex().replace_all(html, "").into_owned()
}
