//! Filename sanitiser: turn an extracted title into a safe filename stem.
//!
//! Titles come straight out of PDF text and metadata, so they carry
//! characters Windows refuses in names, stray line breaks, and a couple of
//! well-known decoding artefacts. The rules run in a fixed order:
//!
//! 1. Replace each reserved character `< > : " / \ | ? *` with `" - "`
//! 2. Collapse whitespace runs (including newlines and tabs) to one space
//! 3. Decode `&#39;` to `'` and the mis-decoded `⠍` glyph to `-`
//! 4. Trim, and drop leading dots so the file is not hidden
//! 5. Cap at [`MAX_STEM_CHARS`], backing up to the last word boundary
//! 6. Fall back to [`DEFAULT_STEM`] when fewer than [`MIN_STEM_CHARS`] remain
//!
//! The result is idempotent: sanitising a sanitised stem changes nothing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest stem produced, in characters.
pub const MAX_STEM_CHARS: usize = 200;

/// Shorter stems are replaced by [`DEFAULT_STEM`].
pub const MIN_STEM_CHARS: usize = 3;

/// Placeholder stem ("untitled paper").
pub const DEFAULT_STEM: &str = "未命名论文";

/// Characters that are not allowed in file names on at least one platform.
pub const RESERVED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Sanitise `title` into a non-empty stem of at most [`MAX_STEM_CHARS`]
/// characters, free of [`RESERVED_CHARS`].
pub fn sanitize_filename(title: &str) -> String {
    let s = replace_reserved(title);
    let s = RE_WHITESPACE.replace_all(&s, " ");
    let s = s.replace("&#39;", "'").replace('⠍', "-");
    let s = s.trim_start_matches(|c: char| c == '.' || c.is_whitespace());
    let s = truncate_at_word(s.trim_end(), MAX_STEM_CHARS);

    if s.chars().count() < MIN_STEM_CHARS {
        DEFAULT_STEM.to_string()
    } else {
        s
    }
}

fn replace_reserved(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 16);
    for ch in input.chars() {
        if RESERVED_CHARS.contains(&ch) {
            out.push_str(" - ");
        } else {
            out.push(ch);
        }
    }
    out
}

/// Keep at most `max` characters; when cutting, drop the partial last word.
/// A prefix with no space at all is kept as a hard cut.
fn truncate_at_word(input: &str, max: usize) -> String {
    let Some((cut, _)) = input.char_indices().nth(max) else {
        return input.to_string();
    };
    let head = &input[..cut];
    match head.rfind(' ') {
        Some(space) => head[..space].to_string(),
        None => head.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_title(words: usize) -> String {
        (0..words)
            .map(|i| format!("word{i:03}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    const SAMPLES: &[&str] = &[
        "  A Study of Things  ",
        "Deep Learning: A Survey",
        "What/Why? <Really> \"Quoted\" a|b c*d e\\f",
        "Line one\nline two\t\ttabbed",
        "It&#39;s ⠍ complicated",
        "",
        "  ",
        "ab",
        "::",
        "标题：中文论文的题目",
        "x\u{00A0}\u{00A0}y nbsp",
        ".NET Internals",
        ". . .hidden?",
    ];

    #[test]
    fn trims_and_keeps_plain_titles() {
        assert_eq!(sanitize_filename("  A Study of Things  "), "A Study of Things");
    }

    #[test]
    fn reserved_characters_become_separators() {
        assert_eq!(
            sanitize_filename("Deep Learning: A Survey"),
            "Deep Learning - A Survey"
        );
        assert_eq!(sanitize_filename("TCP/IP Illustrated"), "TCP - IP Illustrated");
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(
            sanitize_filename("Line one\nline two\t\ttabbed"),
            "Line one line two tabbed"
        );
    }

    #[test]
    fn extraction_artefacts_are_normalised() {
        assert_eq!(sanitize_filename("It&#39;s ⠍ complicated"), "It's - complicated");
    }

    #[test]
    fn leading_dots_are_dropped() {
        assert_eq!(sanitize_filename(".NET Internals"), "NET Internals");
        assert_eq!(sanitize_filename(" ... . Dotted Start"), "Dotted Start");
        assert_eq!(sanitize_filename("Node.js in Action..."), "Node.js in Action...");
        assert_eq!(sanitize_filename("..."), DEFAULT_STEM);
    }

    #[test]
    fn output_never_names_a_hidden_file() {
        for s in SAMPLES {
            let out = sanitize_filename(s);
            assert!(
                crate::pipeline::scan::is_pdf_name(&format!("{out}.pdf")),
                "{s:?} -> {out:?} would be skipped by the scan"
            );
        }
    }

    #[test]
    fn short_or_empty_titles_get_placeholder() {
        assert_eq!(sanitize_filename(""), DEFAULT_STEM);
        assert_eq!(sanitize_filename("   \n "), DEFAULT_STEM);
        assert_eq!(sanitize_filename("ab"), DEFAULT_STEM);
        assert_eq!(sanitize_filename("abc"), "abc");
    }

    #[test]
    fn reserved_only_title_gets_placeholder() {
        // "::" becomes " -  - " → "- -" (3 chars) which is kept
        assert_eq!(sanitize_filename("::"), "- -");
        assert_eq!(sanitize_filename("?"), DEFAULT_STEM);
    }

    #[test]
    fn long_titles_cut_at_word_boundary() {
        let title = long_title(40); // 40 * 7 + 39 = 319 chars
        let out = sanitize_filename(&title);
        assert!(out.chars().count() <= MAX_STEM_CHARS);
        assert!(title.starts_with(&out));
        let next = title[out.len()..].chars().next();
        assert_eq!(next, Some(' '), "cut must land on a word boundary");
        assert!(!out.ends_with(' '));
    }

    #[test]
    fn long_title_without_spaces_is_hard_cut() {
        let title = "x".repeat(250);
        let out = sanitize_filename(&title);
        assert_eq!(out.chars().count(), MAX_STEM_CHARS);
    }

    #[test]
    fn multibyte_titles_are_measured_in_chars() {
        let title = "论".repeat(199);
        assert_eq!(sanitize_filename(&title), title);
    }

    #[test]
    fn output_never_contains_reserved_chars() {
        for s in SAMPLES {
            let out = sanitize_filename(s);
            assert!(
                !out.contains(&RESERVED_CHARS[..]),
                "{s:?} -> {out:?} kept a reserved char"
            );
        }
    }

    #[test]
    fn output_length_is_bounded() {
        let mut inputs: Vec<String> = SAMPLES.iter().map(|s| s.to_string()).collect();
        inputs.push(long_title(60));
        inputs.push("y".repeat(500));
        for s in &inputs {
            let n = sanitize_filename(s).chars().count();
            assert!((MIN_STEM_CHARS..=MAX_STEM_CHARS).contains(&n), "{s:?} -> {n} chars");
        }
    }

    #[test]
    fn sanitising_is_idempotent() {
        let mut inputs: Vec<String> = SAMPLES.iter().map(|s| s.to_string()).collect();
        inputs.push(long_title(60));
        inputs.push(format!("{}: {}", long_title(10), long_title(30)));
        for s in &inputs {
            let once = sanitize_filename(s);
            assert_eq!(sanitize_filename(&once), once, "input {s:?}");
        }
    }
}
