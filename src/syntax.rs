use colored::Colorize;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::as_24_bit_terminal_escaped;

const THEME: &str = "base16-ocean.dark";

/// Highlights fenced code blocks inside agent replies. Everything outside a
/// fence is passed through untouched.
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl SyntaxHighlighter {
    pub fn new() -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = themes.remove(THEME).unwrap_or_default();
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    pub fn highlight_text(&self, text: &str) -> String {
        let mut result = String::new();
        let mut fence: Option<(&str, String)> = None;
        let mut code_block = String::new();

        for line in text.lines() {
            let trimmed = line.trim_start();
            match fence.take() {
                Some((marker, language)) if trimmed.starts_with(marker) => {
                    result.push_str(&self.highlight_code(&code_block, &language));
                    result.push('\n');
                    code_block.clear();
                }
                open @ Some(_) => {
                    code_block.push_str(line);
                    code_block.push('\n');
                    fence = open;
                }
                None => {
                    if let Some(marker) = fence_marker(trimmed) {
                        let language = trimmed.trim_start_matches(['`', '~']);
                        fence = Some((marker, language.trim().to_lowercase()));
                    } else {
                        result.push_str(line);
                        result.push('\n');
                    }
                }
            }
        }

        // Unterminated fence: still show what we have
        if let Some((_, language)) = fence {
            result.push_str(&self.highlight_code(&code_block, &language));
        }

        result.trim_end().to_string()
    }

    fn find_syntax(&self, language: &str) -> &SyntaxReference {
        // Query languages the agent tends to emit that syntect has no grammar for
        let language = match language {
            "logql" | "promql" | "kql" | "log" | "logs" | "text" => "",
            "jsonl" | "ndjson" => "json",
            other => other,
        };

        if language.is_empty() {
            return self.syntax_set.find_syntax_plain_text();
        }
        self.syntax_set
            .find_syntax_by_token(language)
            .or_else(|| self.syntax_set.find_syntax_by_extension(language))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    fn highlight_code(&self, code: &str, language: &str) -> String {
        let syntax = self.find_syntax(language);
        let mut highlighter = HighlightLines::new(syntax, &self.theme);

        let mut result = String::new();
        result.push_str(&format!("{} {}\n", "┌──".dimmed(), language.dimmed()));

        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            result.push_str(&format!("{} {}\x1b[0m\n", "│".dimmed(), escaped));
        }

        result.push_str(&format!("{}", "└──".dimmed()));
        result
    }
}

fn fence_marker(line: &str) -> Option<&'static str> {
    if line.starts_with("```") {
        Some("```")
    } else if line.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let highlighter = SyntaxHighlighter::new();
        let text = "Found 42 ERROR entries in payment-service.";
        assert_eq!(highlighter.highlight_text(text), text);
    }

    #[test]
    fn test_code_block_detection() {
        let highlighter = SyntaxHighlighter::new();
        let text = "Query used:\n```sql\nSELECT count(*) FROM logs WHERE level = 'ERROR'\n```\nDone.";
        let result = highlighter.highlight_text(text);
        assert!(result.contains("Query used:"));
        assert!(result.contains("count"));
        assert!(result.contains("sql"));
        assert!(result.ends_with("Done."));
        assert!(!result.contains("```"));
    }

    #[test]
    fn test_tilde_fence_and_unknown_language() {
        let highlighter = SyntaxHighlighter::new();
        let text = "~~~logql\n{app=\"api\"} |= \"timeout\"\n~~~";
        let result = highlighter.highlight_text(text);
        assert!(result.contains("timeout"));
        assert!(!result.contains("~~~"));
    }

    #[test]
    fn test_unterminated_fence_is_rendered() {
        let highlighter = SyntaxHighlighter::new();
        let result = highlighter.highlight_text("```json\n{\"level\": \"ERROR\"}");
        assert!(result.contains("ERROR"));
    }
}
