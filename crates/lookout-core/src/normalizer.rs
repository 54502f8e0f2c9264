//! Query normalization.
//!
//! Search payloads are lowercased, split into word and punctuation tokens and
//! each token reduced to its dictionary (noun) form before being sent to the
//! search provider.

/// Turns free text into a canonical query string.
pub trait TextNormalizer: Send + Sync {
    fn normalize(&self, text: &str) -> String;
}

/// Irregular plurals that suffix rules would mangle.
const IRREGULAR: &[(&str, &str)] = &[
    ("children", "child"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("men", "man"),
    ("mice", "mouse"),
    ("teeth", "tooth"),
    ("women", "woman"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
];

/// Words ending in `s` that are already in base form.
const INVARIANT: &[&str] = &[
    "news", "series", "species", "is", "was", "has", "does", "this", "its", "us",
    "yes", "gas", "bus", "lens", "plus", "always", "less", "class", "process",
    "physics", "mathematics", "economics", "politics", "status", "virus", "bias",
];

/// Rule-based noun lemmatizer.
#[derive(Debug, Default, Clone, Copy)]
pub struct Lemmatizer;

impl Lemmatizer {
    pub fn new() -> Self {
        Self
    }

    fn lemmatize(word: &str) -> String {
        if let Some((_, lemma)) = IRREGULAR.iter().find(|(plural, _)| *plural == word) {
            return (*lemma).to_string();
        }
        if word.len() <= 3 || !word.ends_with('s') || INVARIANT.contains(&word) {
            return word.to_string();
        }
        if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
            return word.to_string();
        }
        if let Some(stem) = word.strip_suffix("ies") {
            if stem.len() > 1 {
                return format!("{stem}y");
            }
        }
        for suffix in ["sses", "shes", "ches", "xes", "zes"] {
            if word.ends_with(suffix) {
                return word[..word.len() - 2].to_string();
            }
        }
        word[..word.len() - 1].to_string()
    }
}

impl TextNormalizer for Lemmatizer {
    fn normalize(&self, text: &str) -> String {
        tokenize(&text.to_lowercase())
            .iter()
            .map(|token| {
                if token.chars().all(char::is_alphabetic) {
                    Self::lemmatize(token)
                } else {
                    token.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Splits on whitespace and separates punctuation into standalone tokens.
///
/// Apostrophe contractions keep the apostrophe with the suffix
/// (`what's` -> `what`, `'s`).
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in text.split_whitespace() {
        let mut current = String::new();
        for ch in chunk.chars() {
            let decimal_point = ch == '.' && !current.is_empty() && is_numeric(&current);
            if ch.is_alphanumeric() || ch == '-' || decimal_point {
                current.push(ch);
            } else if ch == '\'' && !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
                current.push(ch);
            } else {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(ch.to_string());
            }
        }
        if !current.is_empty() {
            tokens.push(current);
        }
    }
    tokens
}

fn is_numeric(token: &str) -> bool {
    token.chars().all(|c| c.is_ascii_digit() || c == '.')
}
