//! Topic analysis — word and technology frequencies over talk text.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{SessionRecord, TopicAnalysis, WordCount};
use crate::text::clean_markup;

const TOP_WORDS: usize = 100;
const TOP_TECHNOLOGIES: usize = 50;

/// Filler words excluded from frequency counts.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "from", "are", "was", "were", "will", "can",
    "has", "have", "had", "but", "not", "you", "your", "our", "their", "its", "they", "them",
    "then", "than", "what", "when", "where", "which", "while", "who", "whose", "why", "how",
    "all", "any", "each", "both", "into", "onto", "out", "about", "over", "under", "between",
    "through", "during", "before", "after", "above", "below", "more", "most", "some", "such",
    "only", "also", "just", "been", "being", "does", "did", "doing", "would", "could", "should",
    "there", "here", "these", "those", "via", "per", "using", "use", "used", "new", "get",
    "learn", "join", "session", "talk", "see", "one", "two", "way", "well", "like", "make",
    "take", "come", "including", "across", "within", "without",
];

/// Technology terms matched against tokens by bidirectional substring
/// containment: a token counts when it contains a term or a term contains it.
/// Short terms therefore match aggressively ("ai" matches "maintain"); the
/// dashboard has always behaved this way and downstream consumers expect it.
const TECH_KEYWORDS: &[&str] = &[
    "ai", "ml", "api", "cloud", "kubernetes", "docker", "container", "serverless", "quantum",
    "blockchain", "security", "devops", "automation", "analytics", "database", "linux", "java",
    "python", "javascript", "typescript", "golang", "rust", "node", "react", "microservices",
    "openshift", "watson", "terraform", "ansible", "observability", "mainframe", "cobol",
    "storage", "network", "edge", "iot", "5g", "data", "graphql", "rest", "saas", "hybrid",
    "opensource", "architecture",
];

static TOKEN_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\s.,!?;:()\[\]{}"'`|/\\—–-]+"#).expect("hardcoded regex"));

fn is_numeric(token: &str) -> bool {
    token.chars().all(|c| c.is_ascii_digit())
}

fn keep_token(token: &str) -> bool {
    token.chars().count() > 2 && !STOP_WORDS.contains(&token) && !is_numeric(token)
}

fn is_technology(token: &str) -> bool {
    TECH_KEYWORDS
        .iter()
        .any(|keyword| token.contains(keyword) || keyword.contains(token))
}

fn top_n(counts: IndexMap<String, usize>, n: usize) -> Vec<WordCount> {
    let mut ranked: Vec<WordCount> = counts
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(n);
    ranked
}

/// Tokenize lowercase title + cleaned abstract of every raw record and count
/// frequencies. Tokens must be longer than two characters, non-numeric and
/// outside the stop-word set.
pub fn topic_analysis(talks: &[SessionRecord]) -> TopicAnalysis {
    let mut words: IndexMap<String, usize> = IndexMap::new();
    let mut technologies: IndexMap<String, usize> = IndexMap::new();

    for talk in talks {
        let text = format!(
            "{} {}",
            talk.title.as_deref().unwrap_or_default(),
            clean_markup(talk.abstract_html.as_deref())
        )
        .to_lowercase();

        for token in TOKEN_SPLIT_RE.split(&text) {
            if !keep_token(token) {
                continue;
            }
            *words.entry(token.to_string()).or_insert(0) += 1;
            if is_technology(token) {
                *technologies.entry(token.to_string()).or_insert(0) += 1;
            }
        }
    }

    let total_unique_words = words.len();
    TopicAnalysis {
        top_words: top_n(words, TOP_WORDS),
        top_technologies: top_n(technologies, TOP_TECHNOLOGIES),
        total_unique_words,
    }
}
