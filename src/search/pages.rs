//! Page-section handling for extracted book text.
//!
//! The extraction step writes each PDF page framed by a delimiter line and a
//! `PAGE <n>` header. Neither is a formal format, so the delimiter is
//! configurable and page numbers are best effort.

use once_cell::sync::Lazy;
use regex::Regex;

/// Delimiter written between pages by the extraction step.
pub const DEFAULT_PAGE_DELIMITER: &str =
    "================================================================================";

/// How many leading lines of a section may carry the page header.
const PAGE_HEADER_SCAN_LINES: usize = 5;

static PAGE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)page\D*(\d+)").expect("page number pattern is valid"));

/// Split a document into sections at every line equal to `delimiter`.
/// Sections that are blank are dropped.
pub fn split_sections(content: &str, delimiter: &str) -> Vec<String> {
    let delimiter = delimiter.trim();
    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim() == delimiter {
            push_section(&mut sections, &current);
            current.clear();
        } else {
            current.push(line);
        }
    }
    push_section(&mut sections, &current);

    sections
}

fn push_section(sections: &mut Vec<String>, lines: &[&str]) {
    let section = lines.join("\n");
    if !section.trim().is_empty() {
        sections.push(section);
    }
}

/// Best-effort page number from the first few lines of a section.
pub fn extract_page_number(section: &str) -> Option<u32> {
    section
        .lines()
        .take(PAGE_HEADER_SCAN_LINES)
        .filter_map(|line| PAGE_NUMBER_RE.captures(line))
        .find_map(|caps| caps.get(1).and_then(|m| m.as_str().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(pages: &[(u32, &str)]) -> String {
        let mut out = String::new();
        for (page, text) in pages {
            out.push_str(&format!(
                "\n{d}\nPAGE {p}\n{d}\n\n{t}\n\n",
                d = DEFAULT_PAGE_DELIMITER,
                p = page,
                t = text
            ));
        }
        out
    }

    #[test]
    fn test_split_sections_on_delimiter_lines() {
        let content = extracted(&[(1, "first page"), (2, "second page")]);
        let sections = split_sections(&content, DEFAULT_PAGE_DELIMITER);

        assert_eq!(sections.len(), 4);
        assert_eq!(sections[0].trim(), "PAGE 1");
        assert_eq!(sections[1].trim(), "first page");
        assert_eq!(sections[2].trim(), "PAGE 2");
        assert_eq!(sections[3].trim(), "second page");
    }

    #[test]
    fn test_split_sections_without_delimiter() {
        let sections = split_sections("just some text\nacross lines", "----");
        assert_eq!(sections, vec!["just some text\nacross lines".to_string()]);
        assert!(split_sections("", "----").is_empty());
    }

    #[test]
    fn test_delimiter_must_fill_the_line() {
        let content = "before\nnot ---- a delimiter\n----\nafter";
        let sections = split_sections(content, "----");
        assert_eq!(sections.len(), 2);
        assert!(sections[0].contains("not ---- a delimiter"));
    }

    #[test]
    fn test_extract_page_number() {
        assert_eq!(extract_page_number("\nPAGE 12\n"), Some(12));
        assert_eq!(extract_page_number("Page 7 of 300"), Some(7));
        assert_eq!(extract_page_number("intro\npage: 42\nbody"), Some(42));
    }

    #[test]
    fn test_extract_page_number_absent() {
        assert_eq!(extract_page_number("no header here"), None);
        assert_eq!(extract_page_number("PAGE without digits"), None);
        assert_eq!(extract_page_number("PAGE 99999999999999999999"), None);
    }

    #[test]
    fn test_extract_page_number_skips_unparseable_header() {
        assert_eq!(extract_page_number("PAGE\nPAGE 3"), Some(3));
    }

    #[test]
    fn test_extract_page_number_only_scans_leading_lines() {
        let section = "a\nb\nc\nd\ne\nPAGE 6";
        assert_eq!(extract_page_number(section), None);
        let section = "a\nb\nc\nd\nPAGE 5";
        assert_eq!(extract_page_number(section), Some(5));
    }
}
