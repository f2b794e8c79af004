//! The approximate reduction engine.
//!
//! Synchronous, permissive, best-effort: runs on every request and trims the
//! page's CSS against its usage sets. Relevance is a pure OR over coarse
//! selector tokens — keeping an unused rule is acceptable, dropping a used
//! rule is not. Malformed stylesheets yield partial results, never errors.
//!
//! `@media` blocks are dropped unconditionally. Responsive rules are only
//! recovered by the precise background reduction.

use crate::patterns::{CSS_CLASS, CSS_ID, CSS_MEDIA, CSS_SEPARATOR, CSS_TAG};
use crate::types::{CssRule, UsageSets};
use std::collections::HashSet;

/// Trim `css` down to the rules plausibly used by `html`.
///
/// `css` is the concatenated contents of the page's local stylesheets.
/// Formatting and order of retained rules are preserved.
pub fn fast_cut(html: &str, css: &str) -> String {
    reduce(css, &UsageSets::from_html(html))
}

/// Trim stylesheet text against pre-built usage sets.
pub fn reduce(css: &str, usage: &UsageSets) -> String {
    let mut working = CSS_MEDIA.replace_all(css, "").into_owned();
    let rules = split_rules(&working);

    // Rule texts to keep, deduplicated by exact content. A rule text marked
    // relevant anywhere is never deleted, even if a textually identical
    // rule elsewhere looks irrelevant.
    let mut keep: HashSet<String> = HashSet::new();
    for rule in &rules {
        if selector_is_relevant(&rule.selector, usage) {
            keep.insert(rule.compile());
        }
    }

    // Delete each distinct irrelevant rule text once; the set doubles as
    // the already-deleted marker for duplicates.
    let mut handled = keep;
    for rule in &rules {
        let compiled = rule.compile();
        if handled.insert(compiled.clone()) {
            working = working.replace(&compiled, "");
        }
    }

    working
}

/// Split stylesheet text into (selector, body) pairs on alternating
/// top-level `{`/`}` delimiters. Unbalanced input yields partial results:
/// a trailing selector with no body is dropped.
fn split_rules(css: &str) -> Vec<CssRule> {
    let mut rules = Vec::new();
    let mut selector: Option<&str> = None;

    for piece in CSS_SEPARATOR.split(css) {
        match selector.take() {
            None => selector = Some(piece),
            Some(sel) => rules.push(CssRule {
                selector: sel.to_string(),
                body: piece.to_string(),
            }),
        }
    }

    rules
}

/// Decide whether a selector plausibly applies to the page.
///
/// Extracts candidate tags (leading or post-comma bare identifiers,
/// including `*`), classes (`.ident`) and ids (`#ident`) independently;
/// any single match across the three categories retains the rule.
fn selector_is_relevant(selector: &str, usage: &UsageSets) -> bool {
    for cap in CSS_TAG.captures_iter(selector) {
        let tag = &cap[1];
        if tag == "*" || usage.tags.contains(tag) {
            return true;
        }
    }

    for cap in CSS_CLASS.captures_iter(selector) {
        if usage.classes.contains(&cap[1]) {
            return true;
        }
    }

    for cap in CSS_ID.captures_iter(selector) {
        if usage.ids.contains(&cap[1]) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body class="a b"><div id="x">t</div></body></html>"#;

    #[test]
    fn test_end_to_end_example() {
        let css = ".a{color:red}.c{color:blue}#x{font-weight:bold}";
        let cut = fast_cut(PAGE, css);
        assert!(cut.contains(".a{color:red}"));
        assert!(cut.contains("#x{font-weight:bold}"));
        assert!(!cut.contains(".c{color:blue}"));
    }

    #[test]
    fn test_used_tag_selector_survives() {
        let css = "div{margin:0}.unused{padding:0}nav{display:none}";
        let cut = fast_cut(PAGE, css);
        assert!(cut.contains("div{margin:0}"));
        assert!(!cut.contains(".unused{padding:0}"));
        assert!(!cut.contains("nav{display:none}"));
    }

    #[test]
    fn test_universal_selector_survives() {
        let cut = fast_cut(PAGE, "*{box-sizing:border-box}");
        assert!(cut.contains("*{box-sizing:border-box}"));
    }

    #[test]
    fn test_comma_separated_tag_after_unused_one() {
        // Second position after a comma must still be recognized
        let cut = fast_cut(PAGE, "nav, div{margin:0}");
        assert!(cut.contains("nav, div{margin:0}"));
    }

    #[test]
    fn test_media_blocks_always_dropped() {
        let css = "@media screen and (max-width:600px){.a{color:red}}.a{color:green}";
        let cut = fast_cut(PAGE, css);
        assert!(!cut.contains("@media"));
        // The used inner rule is not rescued from the media block
        assert!(!cut.contains("max-width"));
        assert!(cut.contains(".a{color:green}"));
    }

    #[test]
    fn test_malformed_css_is_best_effort() {
        // Unbalanced braces must not panic; the dangling selector is dropped
        let cut = fast_cut(PAGE, ".a{color:red}.c{oops");
        assert!(cut.contains(".a{color:red}"));
    }

    #[test]
    fn test_duplicate_irrelevant_rules_all_removed() {
        let css = ".c{color:blue}.a{color:red}.c{color:blue}";
        let cut = fast_cut(PAGE, css);
        assert!(!cut.contains(".c{color:blue}"));
        assert!(cut.contains(".a{color:red}"));
    }

    #[test]
    fn test_relevant_rule_text_never_deleted() {
        // The same rule text appears twice; content-level dedup keeps both
        // occurrences once the text is marked relevant.
        let css = ".a{color:red}.a{color:red}";
        let cut = fast_cut(PAGE, css);
        assert!(cut.contains(".a{color:red}"));
    }

    #[test]
    fn test_descendant_selector_kept_by_any_token() {
        // Only one extracted token has to match
        let cut = fast_cut(PAGE, "div .nothere{color:red}");
        assert!(cut.contains("div .nothere{color:red}"));
    }

    #[test]
    fn test_formatting_of_retained_rules_preserved() {
        let css = ".a {\n  color: red;\n}\n.c {\n  color: blue;\n}\n";
        let cut = fast_cut(PAGE, css);
        assert!(cut.contains(".a {\n  color: red;\n}"));
        assert!(!cut.contains("color: blue"));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(fast_cut(PAGE, ""), "");
        // No usage sets at all: every rule is irrelevant
        let cut = fast_cut("", ".a{color:red}");
        assert!(!cut.contains(".a{color:red}"));
    }
}
