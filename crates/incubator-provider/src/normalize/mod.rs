//! Response normalization.
//!
//! Generated text is loosely formatted markdown. [`parse_blocks`] walks it
//! line by line and produces [`ContentBlock`]s:
//!
//! - `# Title` / `## Title` and lines that are entirely bold (`**Title**`,
//!   optionally followed by a colon) become headers
//! - `1. item` / `1) item` lines become numbered list items
//! - `- item`, `* item` and `• item` lines become bullet items
//! - everything else is paragraph text; consecutive lines are joined
//!
//! Inline emphasis markers are stripped. Blank lines end paragraphs but not
//! lists, so a list written with spacing between items stays one list.

pub mod scores;

use incubator_core::content::ContentBlock;
use incubator_core::errors::ProviderError;

pub use scores::{parse_scores, SubScores};

enum Line<'a> {
    Blank,
    Header(&'a str),
    Numbered(&'a str),
    Bullet(&'a str),
    Text(&'a str),
}

#[derive(Default)]
struct Builder {
    blocks: Vec<ContentBlock>,
    paragraph: Vec<String>,
    numbered: Vec<String>,
    bullets: Vec<String>,
}

impl Builder {
    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let text = self.paragraph.join(" ");
            self.paragraph.clear();
            self.blocks.push(ContentBlock::paragraph(text));
        }
    }

    fn flush_lists(&mut self) {
        if !self.numbered.is_empty() {
            self.blocks
                .push(ContentBlock::numbered(std::mem::take(&mut self.numbered)));
        }
        if !self.bullets.is_empty() {
            self.blocks
                .push(ContentBlock::bullets(std::mem::take(&mut self.bullets)));
        }
    }

    fn flush_all(&mut self) {
        self.flush_paragraph();
        self.flush_lists();
    }

    fn push(&mut self, line: Line<'_>) {
        match line {
            Line::Blank => self.flush_paragraph(),
            Line::Header(text) => {
                self.flush_all();
                let text = clean_inline(text);
                if !text.is_empty() {
                    self.blocks.push(ContentBlock::header(text));
                }
            }
            Line::Numbered(text) => {
                self.flush_paragraph();
                if !self.bullets.is_empty() {
                    self.flush_lists();
                }
                push_item(&mut self.numbered, text);
            }
            Line::Bullet(text) => {
                self.flush_paragraph();
                if !self.numbered.is_empty() {
                    self.flush_lists();
                }
                push_item(&mut self.bullets, text);
            }
            Line::Text(text) => {
                self.flush_lists();
                let text = clean_inline(text);
                if !text.is_empty() {
                    self.paragraph.push(text);
                }
            }
        }
    }

    fn finish(mut self) -> Vec<ContentBlock> {
        self.flush_all();
        self.blocks.retain(|b| !b.is_empty());
        self.blocks
    }
}

fn push_item(items: &mut Vec<String>, text: &str) {
    let text = clean_inline(text);
    if !text.is_empty() {
        items.push(text);
    }
}

/// Parse free-form generated text into content blocks.
pub fn parse_blocks(text: &str) -> Vec<ContentBlock> {
    let mut builder = Builder::default();
    for raw in text.lines() {
        builder.push(classify(raw.trim()));
    }
    builder.finish()
}

/// Parse text that must produce at least one block.
pub fn parse_required(text: &str) -> Result<Vec<ContentBlock>, ProviderError> {
    let blocks = parse_blocks(text);
    if blocks.is_empty() {
        return Err(ProviderError::MalformedResponse {
            reason: "response contained no content".to_string(),
        });
    }
    Ok(blocks)
}

/// Like [`parse_required`], additionally rejecting sections whose visible
/// text is shorter than `min_chars`.
pub fn parse_section(text: &str, min_chars: usize) -> Result<Vec<ContentBlock>, ProviderError> {
    let blocks = parse_required(text)?;
    let chars = incubator_core::content::visible_chars(&blocks);
    if chars < min_chars {
        return Err(ProviderError::MalformedResponse {
            reason: format!("section too short: {chars} < {min_chars} characters"),
        });
    }
    Ok(blocks)
}

fn classify(line: &str) -> Line<'_> {
    if line.is_empty() || is_rule(line) {
        return Line::Blank;
    }
    if let Some(rest) = line.strip_prefix('#') {
        return Line::Header(rest.trim_start_matches('#').trim());
    }
    if let Some(inner) = bold_line(line) {
        return Line::Header(inner);
    }
    if let Some(item) = numbered_item(line) {
        return Line::Numbered(item);
    }
    for marker in ["- ", "* ", "• "] {
        if let Some(item) = line.strip_prefix(marker) {
            return Line::Bullet(item.trim());
        }
    }
    Line::Text(line)
}

/// `---`, `***`, `___` horizontal rules.
fn is_rule(line: &str) -> bool {
    line.len() >= 3
        && (line.chars().all(|c| c == '-')
            || line.chars().all(|c| c == '*')
            || line.chars().all(|c| c == '_'))
}

/// The inner text of a line that is bold from start to end, e.g.
/// `**Market Opportunity**` or `**Next Steps:**`.
fn bold_line(line: &str) -> Option<&str> {
    let line = line.strip_suffix(':').unwrap_or(line);
    let inner = line.strip_prefix("**")?.strip_suffix("**")?;
    let inner = inner.trim().trim_end_matches(':').trim();
    if inner.is_empty() || inner.contains("**") {
        return None;
    }
    Some(inner)
}

/// `12. text` or `12) text`.
fn numbered_item(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 || digits > 3 {
        return None;
    }
    let rest = &line[digits..];
    let rest = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')'))?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

/// Drop emphasis markers and surrounding italics.
fn clean_inline(text: &str) -> String {
    let text = text.replace("**", "").replace("__", "");
    let trimmed = text.trim();
    let trimmed = match trimmed.strip_prefix('*').and_then(|t| t.strip_suffix('*')) {
        Some(inner) => inner.trim(),
        None => trimmed,
    };
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_lists_and_paragraphs() {
        let text = "**Market Opportunity**\n\
                    Strong demand from\n\
                    urban gardeners.\n\
                    \n\
                    ## Risks\n\
                    - Regulation\n\
                    * Competition\n\
                    \n\
                    1. Validate\n\
                    2) Build";
        assert_eq!(
            parse_blocks(text),
            vec![
                ContentBlock::header("Market Opportunity"),
                ContentBlock::paragraph("Strong demand from urban gardeners."),
                ContentBlock::header("Risks"),
                ContentBlock::bullets(["Regulation", "Competition"]),
                ContentBlock::numbered(["Validate", "Build"]),
            ]
        );
    }

    #[test]
    fn spaced_list_items_stay_one_list() {
        let text = "1. First\n\n2. Second\n\n3. Third";
        assert_eq!(
            parse_blocks(text),
            vec![ContentBlock::numbered(["First", "Second", "Third"])]
        );
    }

    #[test]
    fn inline_bold_is_stripped_not_promoted() {
        let text = "**Option 1:** Lead with the benefit\n1. **MARKET POTENTIAL** (high)";
        assert_eq!(
            parse_blocks(text),
            vec![
                ContentBlock::paragraph("Option 1: Lead with the benefit"),
                ContentBlock::numbered(["MARKET POTENTIAL (high)"]),
            ]
        );
    }

    #[test]
    fn bold_with_trailing_colon_is_header() {
        assert_eq!(
            parse_blocks("**Next Steps:**"),
            vec![ContentBlock::header("Next Steps")]
        );
    }

    #[test]
    fn italic_note_is_unwrapped() {
        assert_eq!(
            parse_blocks("*Note: general guidance only.*"),
            vec![ContentBlock::paragraph("Note: general guidance only.")]
        );
    }

    #[test]
    fn years_are_not_list_items() {
        assert_eq!(
            parse_blocks("2024.5 was a strong year"),
            vec![ContentBlock::paragraph("2024.5 was a strong year")]
        );
    }

    #[test]
    fn empty_and_whitespace_are_malformed() {
        assert!(parse_blocks("  \n\n ---\n").is_empty());
        assert!(matches!(
            parse_required("\n\n"),
            Err(ProviderError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn short_section_is_malformed() {
        assert!(parse_section("Too short.", 50).is_err());
        let long = "A detailed paragraph about the market that easily clears the minimum.";
        assert!(parse_section(long, 50).is_ok());
    }
}
