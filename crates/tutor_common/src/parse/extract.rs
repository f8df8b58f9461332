//! Field extractors
//!
//! Small transforms from a section's raw lines to its typed value. Each is
//! pure and total; an empty input yields an empty value.

/// Join lines with newlines, trimming leading and trailing blank lines but
/// keeping interior ones so multi-paragraph text survives intact.
pub fn free_text(lines: &[String]) -> String {
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map(|i| i + 1)
        .unwrap_or(start);
    lines[start..end].join("\n")
}

/// First non-blank line only, trimmed. Used for main-claim sections.
pub fn first_line(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Trimmed non-blank lines joined with single spaces.
pub fn space_joined(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// One item per line with a leading ordinal token stripped: a run of digits,
/// `.`, `)`, `-` and spaces. Lines that are nothing but marker are dropped.
pub fn ordered_list(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| {
            let cleaned = line
                .trim()
                .trim_start_matches(|c: char| {
                    c.is_ascii_digit() || matches!(c, '.' | ')' | '-' | ' ')
                })
                .trim();
            (!cleaned.is_empty()).then(|| cleaned.to_string())
        })
        .collect()
}

/// One item per line with leading bullet glyphs (`*`, `-`, `•`) stripped.
pub fn bulleted_list(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| {
            let cleaned = line
                .trim()
                .trim_start_matches(|c: char| matches!(c, '*' | '-' | '•' | ' '))
                .trim();
            (!cleaned.is_empty()).then(|| cleaned.to_string())
        })
        .collect()
}

/// Fence-captured lines joined verbatim; indentation is significant.
pub fn verbatim_code(lines: &[String]) -> String {
    lines.join("\n")
}

/// Keyword verdict over the whole response: true iff `keyword` appears
/// case-insensitively anywhere AND the section `label` text is present.
/// This reproduces the permissive cross-section heuristic of the prompt
/// grammar.
pub fn verdict(response: &str, label: &str, keyword: &str) -> bool {
    response.to_uppercase().contains(&keyword.to_uppercase()) && response.contains(label)
}

/// First of `levels` found as a substring of the response, else `fallback`.
/// Levels are checked in the given order, so list the strongest first.
pub fn assessment<'a>(response: &str, levels: &[&'a str], fallback: &'a str) -> &'a str {
    levels
        .iter()
        .find(|level| response.contains(*level))
        .copied()
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_free_text_trims_edges_keeps_paragraph_breaks() {
        let input = lines(&["", "first para", "", "second para", "", ""]);
        assert_eq!(free_text(&input), "first para\n\nsecond para");
        assert_eq!(free_text(&[]), "");
        assert_eq!(free_text(&lines(&["", "   "])), "");
    }

    #[test]
    fn test_first_line_takes_first_non_blank() {
        assert_eq!(first_line(&lines(&["", "  the claim  ", "ignored"])), "the claim");
        assert_eq!(first_line(&[]), "");
    }

    #[test]
    fn test_space_joined() {
        let input = lines(&["I tried to sort,", "", "  but it hangs."]);
        assert_eq!(space_joined(&input), "I tried to sort, but it hangs.");
    }

    #[test]
    fn test_ordered_list_strips_markers() {
        let input = lines(&["1. Why?", "2) Why?", "-  Why?", "10. Tenth"]);
        assert_eq!(ordered_list(&input), ["Why?", "Why?", "Why?", "Tenth"]);
    }

    #[test]
    fn test_ordered_list_drops_marker_only_lines() {
        assert!(ordered_list(&lines(&["3.", "  ) ", "-"])).is_empty());
    }

    #[test]
    fn test_bulleted_list_strips_glyphs() {
        let input = lines(&["- plain dash", "* star", "•Why?", "no marker"]);
        assert_eq!(
            bulleted_list(&input),
            ["plain dash", "star", "Why?", "no marker"]
        );
    }

    #[test]
    fn test_list_order_preserved() {
        let input = lines(&["3. c", "1. a", "2. b"]);
        assert_eq!(ordered_list(&input), ["c", "a", "b"]);
    }

    #[test]
    fn test_unicode_items_preserved() {
        let input = lines(&["1. Pourquoi la récursion? 🤔"]);
        assert_eq!(ordered_list(&input), ["Pourquoi la récursion? 🤔"]);
    }

    #[test]
    fn test_verdict_requires_label_and_keyword() {
        assert!(verdict("## Understanding Achieved\nYES\n", "Understanding Achieved", "YES"));
        assert!(verdict("## Understanding Achieved\nyes indeed", "Understanding Achieved", "YES"));
        assert!(!verdict("## Understanding Achieved\nNO\n", "Understanding Achieved", "YES"));
        // Keyword without the label does not count.
        assert!(!verdict("YES YES YES", "Understanding Achieved", "YES"));
    }

    #[test]
    fn test_assessment_picks_first_match_in_order() {
        let levels = ["EXCELLENT", "GOOD", "ACCEPTABLE", "NEEDS_WORK"];
        assert_eq!(assessment("solid, GOOD work", &levels, "ACCEPTABLE"), "GOOD");
        assert_eq!(assessment("nothing here", &levels, "ACCEPTABLE"), "ACCEPTABLE");
    }
}
