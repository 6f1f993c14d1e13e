use regex::Regex;

/// One line-level element of the markdown subset the renderer understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    Bullet(String),
    Paragraph(String),
}

/// Line-by-line translation; blank lines separate blocks and are dropped.
/// Inline `**bold**` markers are stripped (the PDF renders headings in a
/// bold face instead of inline emphasis).
pub fn parse_markdown(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let line = strip_emphasis(line);
        if let Some(rest) = line.strip_prefix("### ") {
            blocks.push(Block::Heading(rest.trim().to_string()));
        } else if let Some(rest) = line.strip_prefix("## ") {
            blocks.push(Block::Heading(rest.trim().to_string()));
        } else if let Some(rest) = line.strip_prefix("# ") {
            blocks.push(Block::Heading(rest.trim().to_string()));
        } else if let Some(rest) = line.strip_prefix("* ") {
            blocks.push(Block::Bullet(rest.trim().to_string()));
        } else if let Some(rest) = line.strip_prefix("- ") {
            blocks.push(Block::Bullet(rest.trim().to_string()));
        } else {
            blocks.push(Block::Paragraph(line));
        }
    }
    blocks
}

pub fn strip_emphasis(line: &str) -> String {
    // Compiled per call; report rendering is far from any hot path.
    match Regex::new(r"\*\*(.*?)\*\*") {
        Ok(re) => re.replace_all(line, "$1").into_owned(),
        Err(_) => line.to_string(),
    }
}

/// Greedy word wrap. Words longer than the width get a line of their own
/// rather than being split.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_bullets_and_paragraphs() {
        let blocks = parse_markdown(
            "### Patient Information\n\n* allergy to pollen\n- on no medication\n\nStable overall.",
        );
        assert_eq!(
            blocks,
            vec![
                Block::Heading("Patient Information".into()),
                Block::Bullet("allergy to pollen".into()),
                Block::Bullet("on no medication".into()),
                Block::Paragraph("Stable overall.".into()),
            ]
        );
    }

    #[test]
    fn bold_markers_are_stripped() {
        assert_eq!(strip_emphasis("**Age:** 22 **years**"), "Age: 22 years");
        assert_eq!(strip_emphasis("no markers"), "no markers");
    }

    #[test]
    fn blank_input_has_no_blocks() {
        assert!(parse_markdown("\n\n   \n").is_empty());
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 15);
        assert!(lines.iter().all(|l| l.chars().count() <= 15));
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn wrap_keeps_overlong_word_whole() {
        let lines = wrap("tiny pneumonoultramicroscopic word", 10);
        assert!(lines.contains(&"pneumonoultramicroscopic".to_string()));
    }

    #[test]
    fn wrap_empty_is_empty() {
        assert!(wrap("   ", 20).is_empty());
    }
}
