//! # Bilingual Analysis
//!
//! Frequency analysis for mixed Thai/English text. The engine splits each
//! document into sentences, classifies every sentence by script
//! ([`Lang::En`], [`Lang::Th`] or [`Lang::Mixed`]), tokenizes it with the
//! language-appropriate tokenizer(s) and folds the results into batch-wide
//! term, phrase and code-switch statistics.
//!
//! The whole pipeline is pure and total: it never fails, never touches
//! global state, and a given batch always produces the same
//! [`AnalysisReport`]. Callers that want to run many batches in parallel can
//! simply do so, each call owns all of its counters.
//!
//! ## Example
//! ```
//! use bilingual_analysis::{ContentItem, analyze_items};
//!
//! let items = vec![ContentItem {
//!     kind: "msg".into(),
//!     text: "Hello! ราคาเท่าไหร่ครับ".into(),
//! }];
//! let report = analyze_items(&items, 50);
//! assert_eq!(report.top_en[0].term, "hello");
//! assert_eq!(report.mixing.en_only, 1);
//! assert_eq!(report.mixing.th_only, 1);
//! ```

pub mod export;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

/// Default number of entries kept per ranked table.
pub const DEFAULT_TOP_K: i64 = 50;

/// The bilingual pattern table is always capped at this many entries,
/// independent of `top_k`.
const MAX_PATTERNS: usize = 50;

const PATTERN_TH_TO_EN: &str = "TH→EN";
const PATTERN_EN_TO_TH: &str = "EN→TH";

/// English function words dropped by [`tokenize_en`]. Closed list, matched
/// after lowercasing.
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "if", "then", "else", "on", "in", "at", "to", "for",
        "from", "of", "with", "without", "by", "as", "is", "are", "was", "were", "be", "been",
        "this", "that", "these", "those", "it", "its", "we", "our", "you", "your", "i", "me", "my",
        "they", "them", "their", "he", "she", "his", "her", "not",
    ]
    .into_iter()
    .collect()
});

/// Sentence-level language classification. `Mixed` means the sentence
/// contains both Thai and Latin letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    En,
    Th,
    Mixed,
}

/// Returns true if `ch` lies in the Thai Unicode block (U+0E00..=U+0E7F).
/// # Example
/// ```
/// use bilingual_analysis::is_thai_char;
/// assert!(is_thai_char('ก'));
/// assert!(is_thai_char('๙'));
/// assert!(!is_thai_char('k'));
/// ```
pub fn is_thai_char(ch: char) -> bool {
    ('\u{0E00}'..='\u{0E7F}').contains(&ch)
}

/// Classifies a text span from its script-character counts.
///
/// Thai letters with no Latin letters yield [`Lang::Th`], Latin letters with
/// no Thai yield [`Lang::En`], and both together yield [`Lang::Mixed`].
/// Spans with no alphabetic signal at all (digits, punctuation, empty)
/// default to [`Lang::En`]. This is a deliberate script heuristic, no
/// confidence score is produced.
/// # Example
/// ```
/// use bilingual_analysis::{Lang, lang_of_text};
/// assert_eq!(lang_of_text("สวัสดีครับ"), Lang::Th);
/// assert_eq!(lang_of_text("hello"), Lang::En);
/// assert_eq!(lang_of_text("สวัสดี hello"), Lang::Mixed);
/// assert_eq!(lang_of_text("1234!"), Lang::En);
/// ```
pub fn lang_of_text(text: &str) -> Lang {
    let mut thai = 0usize;
    let mut latin = 0usize;
    for ch in text.chars() {
        if is_thai_char(ch) {
            thai += 1;
        } else if ch.is_ascii_alphabetic() {
            latin += 1;
        }
    }
    match (thai, latin) {
        (0, 0) => Lang::En,
        (_, 0) => Lang::Th,
        (0, _) => Lang::En,
        _ => Lang::Mixed,
    }
}

/// Splits raw text into trimmed, non-empty sentence spans.
///
/// Splitting happens on every run of `.`, `!`, `?`, `…` or newline; the
/// delimiters themselves are discarded. Text without any delimiter comes
/// back as a single trimmed sentence, blank input as an empty vector.
/// # Example
/// ```
/// use bilingual_analysis::split_sentences;
/// let s = split_sentences("Hello. How are you?");
/// assert_eq!(s, vec!["Hello", "How are you"]);
/// assert!(split_sentences("  \n ").is_empty());
/// ```
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(|c: char| matches!(c, '.' | '!' | '?' | '…' | '\n'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Tokenizes a sentence as English: lowercase, keep maximal runs of ASCII
/// letters and apostrophes, drop stop words and single-character tokens.
/// Order and duplicates are preserved so bigrams can be built on top.
/// # Example
/// ```
/// use bilingual_analysis::tokenize_en;
/// let toks = tokenize_en("The quick brown fox");
/// assert_eq!(toks, vec!["quick", "brown", "fox"]);
/// ```
pub fn tokenize_en(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();
    for ch in lowered.chars() {
        if ch.is_ascii_alphabetic() || ch == '\'' {
            current.push(ch);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens.retain(|t| !STOP_WORDS.contains(t.as_str()) && t.chars().count() > 1);
    tokens
}

/// Strategy seam for Thai word segmentation.
///
/// Thai script does not mark word boundaries with spaces, so any segmenter
/// here is an approximation. The trait exists so the shipped heuristic
/// ([`NgramFallback`]) can later be swapped for a dictionary-based segmenter
/// without touching the aggregation code.
pub trait ThaiSegmenter {
    /// Splits a sentence into Thai token candidates. Non-Thai characters
    /// never appear in the output.
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Whitespace-based Thai candidate extraction with a character-n-gram
/// fallback for short unsegmented runs.
///
/// Every non-Thai, non-whitespace character is projected to a space and the
/// remainder split on whitespace. When that finds Thai text but the
/// candidates total at most [`NgramFallback::FALLBACK_MAX_LEN`] characters
/// (a sign that whitespace carries no word boundaries), the candidates are
/// discarded and all overlapping 2- and 3-character windows over the Thai
/// letters are emitted instead. A cheap approximation, not linguistic
/// segmentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NgramFallback;

impl NgramFallback {
    /// Joined candidate length at or below which the n-gram fallback kicks in.
    pub const FALLBACK_MAX_LEN: usize = 4;
    /// Window sizes emitted by the fallback.
    pub const GRAM_SIZES: [usize; 2] = [2, 3];
}

impl ThaiSegmenter for NgramFallback {
    fn segment(&self, text: &str) -> Vec<String> {
        let projected: String = text
            .chars()
            .map(|ch| if is_thai_char(ch) || ch.is_whitespace() { ch } else { ' ' })
            .collect();
        let raw: Vec<String> = projected.split_whitespace().map(str::to_string).collect();
        let joined_len: usize = raw.iter().map(|t| t.chars().count()).sum();
        let has_thai = raw.iter().flat_map(|t| t.chars()).any(is_thai_char);
        if has_thai && joined_len <= Self::FALLBACK_MAX_LEN {
            let letters: Vec<char> = projected.chars().filter(|&c| is_thai_char(c)).collect();
            let mut grams = Vec::new();
            for n in Self::GRAM_SIZES {
                for window in letters.windows(n) {
                    grams.push(window.iter().collect());
                }
            }
            grams
        } else {
            raw
        }
    }
}

/// Tokenizes a sentence as Thai using the default [`NgramFallback`]
/// strategy.
pub fn tokenize_th(text: &str) -> Vec<String> {
    NgramFallback.segment(text)
}

/// Builds adjacent-token bigrams, each pair joined by a single space.
/// Fewer than two tokens yield an empty vector.
/// # Example
/// ```
/// use bilingual_analysis::bigrams;
/// let toks = vec!["quick".to_string(), "brown".to_string(), "fox".to_string()];
/// assert_eq!(bigrams(&toks), vec!["quick brown", "brown fox"]);
/// ```
pub fn bigrams(tokens: &[String]) -> Vec<String> {
    tokens
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect()
}

/// One input document. `kind` is opaque caller metadata and never inspected
/// by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub kind: String,
    pub text: String,
}

/// One analysis request: a bounded in-memory batch plus the table size.
/// `top_k` values below 1 are clamped, never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub items: Vec<ContentItem>,
    #[serde(default = "default_top_k")]
    pub top_k: i64,
}

fn default_top_k() -> i64 {
    DEFAULT_TOP_K
}

/// One ranked entry in a term or phrase frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermStat {
    pub term: String,
    pub count: u64,
}

/// A directional code-switch label (`"TH→EN"` / `"EN→TH"`) with its count.
///
/// Both labels are bumped once per mixed sentence that yields tokens in
/// both languages, a coarse presence signal. The per-character transition
/// count lives separately in [`MixingStats::switches`]; the two measure
/// different things and are deliberately kept distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualPattern {
    pub pattern: String,
    pub count: u64,
}

/// Sentence-class counts plus the number of adjacent script transitions
/// observed inside mixed sentences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixingStats {
    pub en_only: u64,
    pub th_only: u64,
    pub mixed: u64,
    pub switches: u64,
}

/// The final batch-wide aggregate.
///
/// Term and phrase tables are ranked by descending count (ties keep
/// first-encountered order) and truncated to `top_k`; the pattern table is
/// capped at 50 entries. `totals` carries raw pre-truncation token sums,
/// the sums actually displayed in the top-K lists, and per-class sentence
/// counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub top_en: Vec<TermStat>,
    pub top_th: Vec<TermStat>,
    pub en_phrases: Vec<TermStat>,
    pub th_phrases: Vec<TermStat>,
    pub bilingual_patterns: Vec<BilingualPattern>,
    pub mixing: MixingStats,
    pub totals: BTreeMap<String, u64>,
}

/// Frequency counter that remembers first-insertion order so that ranking
/// ties resolve to the earliest-seen entry.
#[derive(Debug, Clone, Default)]
struct Counter {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl Counter {
    fn bump(&mut self, term: &str) {
        match self.index.get(term) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(term.to_owned(), self.entries.len());
                self.entries.push((term.to_owned(), 1));
            }
        }
    }

    fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| *c).sum()
    }

    /// Top `k` entries by descending count. The sort is stable, so equal
    /// counts keep insertion order.
    fn most_common(&self, k: usize) -> Vec<(String, u64)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(k);
        ranked
    }
}

/// Owned accumulator for one aggregation pass.
///
/// All counters live inside the value; feeding sentences mutates only this
/// accumulator, and [`Accumulator::finish`] consumes it to produce the
/// report. No process-wide state is involved, so independent accumulators
/// can run on separate threads.
pub struct Accumulator {
    thai: Box<dyn ThaiSegmenter>,
    en_terms: Counter,
    th_terms: Counter,
    en_phrases: Counter,
    th_phrases: Counter,
    patterns: Counter,
    mixing: MixingStats,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new(Box::new(NgramFallback))
    }
}

impl Accumulator {
    /// Creates an accumulator using the given Thai segmentation strategy.
    pub fn new(thai: Box<dyn ThaiSegmenter>) -> Self {
        Accumulator {
            thai,
            en_terms: Counter::default(),
            th_terms: Counter::default(),
            en_phrases: Counter::default(),
            th_phrases: Counter::default(),
            patterns: Counter::default(),
            mixing: MixingStats::default(),
        }
    }

    /// Segments one document into sentences and folds each of them in.
    pub fn add_item(&mut self, item: &ContentItem) {
        for sentence in split_sentences(&item.text) {
            self.add_sentence(sentence);
        }
    }

    /// Folds one sentence into the counters, dispatching on its detected
    /// language. Mixed sentences run both tokenizers over the same text,
    /// count per-character script transitions, and bump both directional
    /// pattern labels once if both token lists are non-empty.
    pub fn add_sentence(&mut self, sentence: &str) {
        match lang_of_text(sentence) {
            Lang::En => {
                self.mixing.en_only += 1;
                let tokens = tokenize_en(sentence);
                for t in &tokens {
                    self.en_terms.bump(t);
                }
                for bg in bigrams(&tokens) {
                    self.en_phrases.bump(&bg);
                }
            }
            Lang::Th => {
                self.mixing.th_only += 1;
                let tokens = self.thai.segment(sentence);
                for t in &tokens {
                    self.th_terms.bump(t);
                }
                for bg in bigrams(&tokens) {
                    self.th_phrases.bump(&bg);
                }
            }
            Lang::Mixed => {
                self.mixing.mixed += 1;
                let en_tokens = tokenize_en(sentence);
                let th_tokens = self.thai.segment(sentence);
                for t in &en_tokens {
                    self.en_terms.bump(t);
                }
                for t in &th_tokens {
                    self.th_terms.bump(t);
                }
                self.mixing.switches += count_script_switches(sentence);
                if !en_tokens.is_empty() && !th_tokens.is_empty() {
                    self.patterns.bump(PATTERN_TH_TO_EN);
                    self.patterns.bump(PATTERN_EN_TO_TH);
                }
                for bg in bigrams(&en_tokens) {
                    self.en_phrases.bump(&bg);
                }
                for bg in bigrams(&th_tokens) {
                    self.th_phrases.bump(&bg);
                }
            }
        }
    }

    /// Ranks and truncates all tables and produces the final report.
    /// `top_k` below 1 is clamped to 1.
    pub fn finish(self, top_k: i64) -> AnalysisReport {
        let k = top_k.max(1) as usize;
        let to_stats = |ranked: Vec<(String, u64)>| -> Vec<TermStat> {
            ranked
                .into_iter()
                .map(|(term, count)| TermStat { term, count })
                .collect()
        };
        let top_en = to_stats(self.en_terms.most_common(k));
        let top_th = to_stats(self.th_terms.most_common(k));
        let en_phrases = to_stats(self.en_phrases.most_common(k));
        let th_phrases = to_stats(self.th_phrases.most_common(k));
        let bilingual_patterns: Vec<BilingualPattern> = self
            .patterns
            .most_common(MAX_PATTERNS)
            .into_iter()
            .map(|(pattern, count)| BilingualPattern { pattern, count })
            .collect();

        let mut totals = BTreeMap::new();
        totals.insert("total_tokens_en".to_owned(), self.en_terms.total());
        totals.insert("total_tokens_th".to_owned(), self.th_terms.total());
        totals.insert("sum_top_en".to_owned(), top_en.iter().map(|s| s.count).sum());
        totals.insert("sum_top_th".to_owned(), top_th.iter().map(|s| s.count).sum());
        totals.insert("sentences_en".to_owned(), self.mixing.en_only);
        totals.insert("sentences_th".to_owned(), self.mixing.th_only);
        totals.insert("sentences_mixed".to_owned(), self.mixing.mixed);

        AnalysisReport {
            top_en,
            top_th,
            en_phrases,
            th_phrases,
            bilingual_patterns,
            mixing: self.mixing,
            totals,
        }
    }
}

/// Counts adjacent script transitions over the classified characters of a
/// sentence. Characters that are neither Thai nor ASCII letters are
/// skipped, so `"ก x ข"` has two transitions.
fn count_script_switches(sentence: &str) -> u64 {
    let mut switches = 0;
    let mut prev: Option<bool> = None;
    for ch in sentence.chars() {
        let is_thai = if is_thai_char(ch) {
            true
        } else if ch.is_ascii_alphabetic() {
            false
        } else {
            continue;
        };
        if let Some(p) = prev {
            if p != is_thai {
                switches += 1;
            }
        }
        prev = Some(is_thai);
    }
    switches
}

/// Analyzes one request. Pure function of its input; malformed or empty
/// text fields produce empty tables rather than errors.
pub fn analyze(req: &AnalysisRequest) -> AnalysisReport {
    analyze_items(&req.items, req.top_k)
}

/// Analyzes a batch of items with the default Thai segmentation strategy.
pub fn analyze_items(items: &[ContentItem], top_k: i64) -> AnalysisReport {
    let mut acc = Accumulator::default();
    for item in items {
        acc.add_item(item);
    }
    acc.finish(top_k)
}

/// Collects the `.txt` files under `path` (or `path` itself when it is a
/// file), sorted by file name for deterministic batch order.
pub fn collect_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| p.extension().map(|x| x == "txt").unwrap_or(false))
        .collect()
}
