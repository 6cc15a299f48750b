// README text normalization: markdown stripping and tokenization.
//
// Every README in a run goes through exactly the same pipeline so that all
// term vectors live in one vocabulary space:
//   1. strip markdown syntax (code blocks, links, images, HTML, tables)
//   2. lowercase
//   3. split on anything that isn't a letter or digit
//   4. drop single-character tokens and English stop words

use std::collections::HashSet;
use std::sync::LazyLock;

use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("markdown cleanup pattern is valid")
}

static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| regex(r"(?s)```.*?```"));
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| regex(r"`[^`]*`"));
static IMAGE: LazyLock<Regex> = LazyLock::new(|| regex(r"!\[[^\]]*\]\([^)]*\)"));
static LINK: LazyLock<Regex> = LazyLock::new(|| regex(r"\[([^\]]+)\]\([^)]*\)"));
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| regex(r"<[^>]+>"));
static HEADING: LazyLock<Regex> = LazyLock::new(|| regex(r"#+\s+"));
static LIST_BULLET: LazyLock<Regex> = LazyLock::new(|| regex(r"(?m)^\s*[-*+]\s+"));
static TABLE_PIPE: LazyLock<Regex> = LazyLock::new(|| regex(r"\|"));
static RULE: LazyLock<Regex> = LazyLock::new(|| regex(r"-{3,}"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| regex(r"\s+"));

static STOP_WORDS: LazyLock<HashSet<String>> = LazyLock::new(|| {
    let words: Vec<String> = get(LANGUAGE::English);
    words.into_iter().map(|w| w.to_lowercase()).collect()
});

/// Shortest token kept in a term vector, in characters.
const MIN_TOKEN_CHARS: usize = 2;

/// Strip markdown and HTML syntax from a README, leaving prose.
///
/// Images go before links: `![alt](src)` would otherwise match the link
/// pattern and leave a stray `!alt` behind. Link labels are kept, their
/// targets dropped. Table pipes are removed but cell text is kept, and the
/// `---` separator row falls to the rule pattern.
pub fn clean_markdown(text: &str) -> String {
    let text = FENCED_CODE.replace_all(text, "");
    let text = INLINE_CODE.replace_all(&text, "");
    let text = IMAGE.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");
    let text = HTML_TAG.replace_all(&text, "");
    let text = HEADING.replace_all(&text, "");
    let text = LIST_BULLET.replace_all(&text, "");
    let text = TABLE_PIPE.replace_all(&text, " ");
    let text = RULE.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Normalize a README into the tokens that feed its term vector.
pub fn tokenize(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    clean_markdown(text)
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_fenced_code() {
        let md = "Install it:\n```bash\npip install bloomjoin\n```\nThen run it.";
        let cleaned = clean_markdown(md);
        assert!(!cleaned.contains("pip"), "Code block leaked: {cleaned}");
        assert!(cleaned.contains("Install it:"));
        assert!(cleaned.contains("Then run it."));
    }

    #[test]
    fn test_keeps_link_labels_drops_targets() {
        let cleaned = clean_markdown("See [the docs](https://example.com/docs) for more.");
        assert_eq!(cleaned, "See the docs for more.");
    }

    #[test]
    fn test_drops_images_entirely() {
        let cleaned = clean_markdown("![build badge](https://ci.example.com/badge.svg) Fast joins");
        assert_eq!(cleaned, "Fast joins");
    }

    #[test]
    fn test_strips_headings_html_and_bullets() {
        let md = "# Bloomjoin\n<p align=\"center\">Probabilistic joins</p>\n- fast\n* small";
        let cleaned = clean_markdown(md);
        assert_eq!(cleaned, "Bloomjoin Probabilistic joins fast small");
    }

    #[test]
    fn test_tables_keep_every_cell() {
        let md = "| Feature | Description |\n|---------|-------------|\n| joins | bloom filters |";
        let cleaned = clean_markdown(md);
        assert_eq!(cleaned, "Feature Description joins bloom filters");
    }

    #[test]
    fn test_tokenize_lowercases_and_splits_punctuation() {
        let tokens = tokenize("Bloom-filter JOINS, for data.frames!");
        assert!(tokens.contains(&"bloom".to_string()));
        assert!(tokens.contains(&"joins".to_string()));
        assert!(tokens.contains(&"frames".to_string()));
        assert!(tokens.iter().all(|t| t.chars().all(|c| !c.is_uppercase())));
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let tokens = tokenize("This is the bloomjoin package for R dataframes");
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"this".to_string()));
        assert!(!tokens.contains(&"is".to_string()));
        assert!(!tokens.contains(&"r".to_string()));
        assert!(tokens.contains(&"bloomjoin".to_string()));
        assert!(tokens.contains(&"dataframes".to_string()));
    }

    #[test]
    fn test_tokenize_empty_and_blank() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n ").is_empty());
    }

    #[test]
    fn test_tokenize_only_stop_words_is_empty() {
        assert!(tokenize("the and of to").is_empty());
    }
}
