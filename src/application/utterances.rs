//! Line-oriented utterance files (corpus and inputs)
//!
//! One utterance per line. Blank lines and lines starting with `#` are
//! ignored; lines the parser rejects are skipped with a warning.

use std::path::Path;

use tracing::warn;

use crate::domain::Tree;
use crate::infrastructure::traits::SentenceParser;

/// A parsed utterance with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub line: usize,
    pub tree: Tree,
}

/// Result of parsing every line of one file.
#[derive(Debug, Clone, Default)]
pub struct ParsedLines {
    pub utterances: Vec<Utterance>,
    /// Lines that failed to parse
    pub skipped: usize,
}

/// Non-blank, non-comment lines with their 1-based line numbers.
pub fn content_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Parse every content line, skipping the malformed ones.
pub fn parse_lines(parser: &dyn SentenceParser, content: &str, source: &Path) -> ParsedLines {
    let mut parsed = ParsedLines::default();
    for (line, text) in content_lines(content) {
        match parser.parse(text) {
            Ok(tree) => parsed.utterances.push(Utterance { line, tree }),
            Err(e) => {
                warn!("{}:{}: skipping line: {}", source.display(), line, e);
                parsed.skipped += 1;
            }
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tree::MAX_DEPTH;
    use crate::infrastructure::parser::BracketParser;

    #[test]
    fn given_comments_and_blanks_when_listing_lines_then_keeps_numbered_content() {
        let content = "# corpus\n\n(NP (NNS cats))\n   \n  (NP (NNS dogs))  \n";
        let lines: Vec<(usize, &str)> = content_lines(content).collect();
        assert_eq!(lines, vec![(3, "(NP (NNS cats))"), (5, "(NP (NNS dogs))")]);
    }

    #[test]
    fn given_malformed_line_when_parsing_then_skips_and_counts_it() {
        let content = "(NP (NNS cats))\n(NP (NNS dogs)\n(VP (VBZ sings))\n";
        let parsed = parse_lines(&BracketParser, content, Path::new("corpus.txt"));
        assert_eq!(parsed.skipped, 1);
        let lines: Vec<usize> = parsed.utterances.iter().map(|u| u.line).collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn given_deeply_nested_line_when_parsing_then_skips_it_and_reads_the_next() {
        let depth = MAX_DEPTH * 4;
        let deep = format!("{}x{}", "(A ".repeat(depth), ")".repeat(depth));
        let content = format!("{deep}\n(NP (NNS cats))\n");

        let parsed = parse_lines(&BracketParser, &content, Path::new("corpus.txt"));

        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.utterances.len(), 1);
        assert_eq!(parsed.utterances[0].line, 2);
        assert_eq!(parsed.utterances[0].tree.sentence(), "cats");
    }
}
