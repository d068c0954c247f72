use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Tokens shorter than this (in chars) carry no signal for matching.
const MIN_TOKEN_CHARS: usize = 3;

// Follow-up scaffolding the reading flow prepends to questions, in English and
// Portuguese. Matched case-insensitively at the start of the text, repeatedly.
static FOLLOW_UP_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:\(?\s*(?:this\s+is\s+(?:a\s+)?)?follow[\s-]?up(?:\s+question)?\s*\)?\s*[:\-–]\s*|\(?\s*(?:esta\s+[ée]\s+uma\s+)?pergunta\s+de\s+(?:acompanhamento|continua[çc][ãa]o|seguimento)\s*\)?\s*[:\-–]\s*)",
    )
    .expect("follow-up prefix regex is valid")
});

// Context block the follow-up flow appends, e.g.
// "... (Original question: ...)" or "Context: previous reading ...".
static CONTEXT_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)\s*\(?\s*(?:original\s+question|previous\s+reading|context|pergunta\s+original|leitura\s+anterior|contexto)\s*:.*$",
    )
    .expect("context suffix regex is valid")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Strip presentation scaffolding from a stored question, keeping its meaning.
///
/// Same input always yields the same output; `None` and blank input yield "".
pub fn clean_question_text(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    let mut text = raw.trim().to_string();
    loop {
        let stripped = FOLLOW_UP_PREFIX_RE.replace(&text, "").into_owned();
        if stripped == text {
            break;
        }
        text = stripped;
    }

    let text = CONTEXT_SUFFIX_RE.replace(&text, "");
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Canonical form of a question used for exact and fuzzy comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedQuestion {
    /// Cleaned, lowercased, punctuation-free, single-spaced text
    pub text: String,
    pub tokens: BTreeSet<String>,
}

impl NormalizedQuestion {
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

pub fn normalize_question(raw: Option<&str>) -> NormalizedQuestion {
    normalize_cleaned(&clean_question_text(raw))
}

/// Normalize text that has already been through `clean_question_text`.
pub fn normalize_cleaned(cleaned: &str) -> NormalizedQuestion {
    let folded: String = cleaned
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect();

    let words: Vec<&str> = folded.split_whitespace().collect();
    let tokens = words
        .iter()
        .filter(|word| word.chars().count() >= MIN_TOKEN_CHARS)
        .map(|word| word.to_string())
        .collect();

    NormalizedQuestion {
        text: words.join(" "),
        tokens,
    }
}
