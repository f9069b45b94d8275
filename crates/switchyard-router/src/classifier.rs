// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic query classification: intent, complexity, and domain.
//!
//! Everything here is keyword and punctuation arithmetic over the request
//! text. No model pre-call, no I/O, no state.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// What the request is trying to get done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    Creation,
    Analysis,
    Reasoning,
    Coding,
    WebsiteCopy,
    BriefGeneration,
    /// Judging copy against the quality gate.
    GateEvaluation,
}

/// Ordered difficulty bucket.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QueryComplexity {
    Simple,
    Moderate,
    Complex,
    VeryComplex,
}

impl QueryComplexity {
    /// Bucket a combined complexity score.
    pub fn from_score(score: f64) -> Self {
        if score < 0.25 {
            QueryComplexity::Simple
        } else if score < 0.5 {
            QueryComplexity::Moderate
        } else if score < 0.75 {
            QueryComplexity::Complex
        } else {
            QueryComplexity::VeryComplex
        }
    }
}

/// Subject area of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QueryDomain {
    General,
    Technical,
    Seo,
    Copywriting,
    Competitive,
    Financial,
    Legal,
}

impl QueryDomain {
    /// Fixed complexity prior used as the domain-specificity factor.
    pub fn complexity_prior(self) -> f64 {
        match self {
            QueryDomain::General => 0.1,
            QueryDomain::Technical => 0.7,
            QueryDomain::Seo => 0.6,
            QueryDomain::Copywriting => 0.5,
            QueryDomain::Competitive => 0.6,
            QueryDomain::Financial => 0.8,
            QueryDomain::Legal => 0.9,
        }
    }
}

/// Per-dimension confidence, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub intent: f64,
    pub complexity: f64,
    pub domain: f64,
}

/// Classification of one request. Built fresh per call, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryClassification {
    pub intent: QueryIntent,
    pub complexity: QueryComplexity,
    pub domain: QueryDomain,
    pub confidence: Confidence,
}

/// The four factor scores behind a complexity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComplexityFactors {
    pub syntactic: f64,
    pub semantic: f64,
    pub reasoning_depth: f64,
    pub domain_specificity: f64,
}

impl ComplexityFactors {
    fn as_array(&self) -> [f64; 4] {
        [
            self.syntactic,
            self.semantic,
            self.reasoning_depth,
            self.domain_specificity,
        ]
    }
}

/// Full complexity breakdown, including the raw score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComplexityAnalysis {
    pub score: f64,
    pub complexity: QueryComplexity,
    pub factors: ComplexityFactors,
    /// `exp(-5 · variance)` of the factors: agreement means confidence.
    pub confidence: f64,
}

const SUBORDINATORS: &[&str] = &["that", "which", "who", "where", "when", "if", "whether", "why"];

const ABSTRACTION_MARKERS: &[&str] = &[
    "concept",
    "theory",
    "principle",
    "framework",
    "paradigm",
    "methodology",
];

const CAUSAL_CONNECTIVES: &[&str] = &[
    "therefore", "because", "thus", "hence", "implies", "leads to", "causes", "why", "justif",
];

/// Matched as whole space-delimited words.
const LOGICAL_CONNECTIVES: &[&str] = &["and", "or", "not", "however", "although", "unless"];

const COMPARISON_MARKERS: &[&str] = &[
    "better", "worse", "compar", "contrast", "versus", "vs", "than", "differ",
];

const QUANTIFIERS: &[&str] = &["all", "some", "none", "many", "few", "most", "every"];

const CONDITIONALS: &[&str] = &["if", "when", "unless", "provided", "given"];

const TECHNICAL_SUFFIXES: &[&str] = &["tion", "ism", "ology", "ence", "ance", "ment"];

/// Checked in order; a later label must score strictly higher to win.
const INTENT_MARKERS: &[(QueryIntent, &[&str])] = &[
    (
        QueryIntent::WebsiteCopy,
        &["hero", "headline", "section", "copy", "cta", "page copy", "above the fold"],
    ),
    (
        QueryIntent::BriefGeneration,
        &["brief", "content brief", "outline", "strategy", "keywords brief"],
    ),
    (
        QueryIntent::GateEvaluation,
        &["voice alignment", "ai detection", "gate", "pass", "fail"],
    ),
    (
        QueryIntent::Creation,
        &["create", "generate", "write", "build", "make", "design"],
    ),
    (
        QueryIntent::Analysis,
        &["analyze", "examine", "review", "evaluate", "assess", "compar"],
    ),
    (
        QueryIntent::Reasoning,
        &["explain", "why", "how", "prove", "deduce", "reason"],
    ),
    (
        QueryIntent::Coding,
        &["code", "function", "debug", "fix", "implement", "algorithm"],
    ),
];

const DOMAIN_MARKERS: &[(QueryDomain, &[&str])] = &[
    (
        QueryDomain::Seo,
        &["seo", "keyword", "ranking", "serp", "backlink", "meta", "organic"],
    ),
    (
        QueryDomain::Copywriting,
        &["copy", "headline", "cta", "tone", "voice", "brand", "page copy", "message"],
    ),
    (
        QueryDomain::Competitive,
        &["competitor", "competition", "rival", "market share", "benchmark", "comparison"],
    ),
    (
        QueryDomain::Technical,
        &["api", "database", "server", "algorithm", "framework", "library"],
    ),
    (
        QueryDomain::Financial,
        &["financial", "revenue", "cost", "invoice", "pricing", "commission"],
    ),
    (
        QueryDomain::Legal,
        &["legal", "contract", "regulation", "compliance", "law"],
    ),
];

/// Stateless heuristic classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryClassifier;

impl QueryClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify request text. Total over all input, including the empty string.
    pub fn classify(&self, text: &str) -> QueryClassification {
        let (intent, intent_confidence) = self.detect_intent(text);
        let (domain, domain_confidence) = self.detect_domain(text);
        let analysis = self.analyze_complexity(text, Some(domain));

        QueryClassification {
            intent,
            complexity: analysis.complexity,
            domain,
            confidence: Confidence {
                intent: intent_confidence,
                complexity: analysis.confidence,
                domain: domain_confidence,
            },
        }
    }

    /// Score complexity. With a known non-general `domain`, its prior is the
    /// domain-specificity factor; otherwise technical density stands in.
    pub fn analyze_complexity(&self, text: &str, domain: Option<QueryDomain>) -> ComplexityAnalysis {
        let lower = text.to_lowercase();

        let factors = ComplexityFactors {
            syntactic: syntactic_score(text, &lower),
            semantic: semantic_score(text, &lower),
            reasoning_depth: reasoning_depth_score(&lower),
            domain_specificity: match domain {
                Some(d) if d != QueryDomain::General => d.complexity_prior(),
                _ => technical_density(text),
            },
        };

        let score = factors.syntactic * 0.2
            + factors.semantic * 0.3
            + factors.reasoning_depth * 0.3
            + factors.domain_specificity * 0.2;

        ComplexityAnalysis {
            score,
            complexity: QueryComplexity::from_score(score),
            factors,
            confidence: agreement(&factors.as_array()),
        }
    }

    pub fn detect_intent(&self, text: &str) -> (QueryIntent, f64) {
        best_label(&text.to_lowercase(), INTENT_MARKERS, QueryIntent::Reasoning)
    }

    pub fn detect_domain(&self, text: &str) -> (QueryDomain, f64) {
        best_label(&text.to_lowercase(), DOMAIN_MARKERS, QueryDomain::General)
    }
}

/// Highest-scoring label and its confidence, `default` on no hits.
fn best_label<L: Copy>(lower: &str, table: &[(L, &[&str])], default: L) -> (L, f64) {
    let mut best = (default, 0usize);
    for (label, markers) in table {
        let score = count_markers(lower, markers);
        if score > best.1 {
            best = (*label, score);
        }
    }
    (best.0, saturate(best.1, 3.0) * 0.7 + 0.3)
}

fn syntactic_score(text: &str, lower: &str) -> f64 {
    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| !s.is_empty())
        .count()
        .max(1);
    let avg_sentence_len = text.chars().count() as f64 / sentences as f64;
    let nesting = text
        .chars()
        .filter(|c| matches!(c, ',' | ';' | '—' | '–' | '-'))
        .count();
    let questions = text.matches('?').count();
    let subordinate = count_markers(lower, SUBORDINATORS);

    (avg_sentence_len / 100.0).min(1.0) * 0.3
        + saturate(nesting, 5.0) * 0.3
        + saturate(questions, 3.0) * 0.2
        + saturate(subordinate, 3.0) * 0.2
}

fn semantic_score(text: &str, lower: &str) -> f64 {
    let words: Vec<&str> = lower.split_whitespace().collect();
    let unique = words.iter().collect::<std::collections::HashSet<_>>().len();
    let lexical_diversity = unique as f64 / words.len().max(1) as f64;

    lexical_diversity * 0.3
        + saturate(count_markers(lower, ABSTRACTION_MARKERS), 3.0) * 0.3
        + technical_density(text) * 0.2
        + saturate(count_markers(lower, CAUSAL_CONNECTIVES), 2.0) * 0.2
}

fn reasoning_depth_score(lower: &str) -> f64 {
    let logical = LOGICAL_CONNECTIVES
        .iter()
        .filter(|m| lower.contains(&format!(" {m} ")))
        .count();

    saturate(logical, 3.0) * 0.3
        + saturate(count_markers(lower, COMPARISON_MARKERS), 2.0) * 0.3
        + saturate(count_markers(lower, QUANTIFIERS), 2.0) * 0.2
        + saturate(count_markers(lower, CONDITIONALS), 2.0) * 0.2
}

/// Share of all-caps tokens, jargon suffixes, and numbers.
fn technical_density(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();

    let acronyms = words
        .iter()
        .filter(|w| {
            w.chars().count() > 1
                && w.chars().any(char::is_alphabetic)
                && w.to_uppercase() == **w
        })
        .count();
    let suffixed = words
        .iter()
        .filter(|w| {
            let lower = w.to_lowercase();
            TECHNICAL_SUFFIXES.iter().any(|s| lower.ends_with(s))
        })
        .count();

    saturate(acronyms, 3.0) * 0.4 + saturate(suffixed, 3.0) * 0.3 + saturate(digit_runs(text), 5.0) * 0.3
}

fn digit_runs(text: &str) -> usize {
    let mut runs = 0;
    let mut in_run = false;
    for c in text.chars() {
        let digit = c.is_ascii_digit();
        if digit && !in_run {
            runs += 1;
        }
        in_run = digit;
    }
    runs
}

/// How many of `markers` occur in `lower` at the start of a word.
fn count_markers(lower: &str, markers: &[&str]) -> usize {
    markers.iter().filter(|m| has_marker(lower, m)).count()
}

/// True when `marker` occurs with no alphanumeric character directly before
/// it. Markers are stems, so the end is not anchored.
fn has_marker(haystack: &str, marker: &str) -> bool {
    haystack.match_indices(marker).any(|(i, _)| {
        haystack[..i]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric())
    })
}

fn saturate(count: usize, at: f64) -> f64 {
    (count as f64 / at).min(1.0)
}

/// `exp(-5 · population variance)`.
fn agreement(factors: &[f64]) -> f64 {
    let n = factors.len() as f64;
    let mean = factors.iter().sum::<f64>() / n;
    let variance = factors.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / n;
    (-5.0 * variance).exp()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const PLUMBING: &str = "Create a comparison of two plumbing companies' service offerings, \
        explaining why the pricing differs and if the value justifies the premium";

    #[test]
    fn bucket_thresholds_are_exact() {
        assert_eq!(QueryComplexity::from_score(0.0), QueryComplexity::Simple);
        assert_eq!(QueryComplexity::from_score(0.2499), QueryComplexity::Simple);
        assert_eq!(QueryComplexity::from_score(0.25), QueryComplexity::Moderate);
        assert_eq!(QueryComplexity::from_score(0.4999), QueryComplexity::Moderate);
        assert_eq!(QueryComplexity::from_score(0.5), QueryComplexity::Complex);
        assert_eq!(QueryComplexity::from_score(0.75), QueryComplexity::VeryComplex);
        assert_eq!(QueryComplexity::from_score(1.0), QueryComplexity::VeryComplex);
    }

    #[test]
    fn empty_query_is_simple() {
        let c = QueryClassifier::new();
        let result = c.classify("");
        assert_eq!(result.complexity, QueryComplexity::Simple);
        assert_eq!(result.intent, QueryIntent::Reasoning);
        assert_eq!(result.domain, QueryDomain::General);
        assert!((result.confidence.intent - 0.3).abs() < 1e-9);
        assert!((result.confidence.domain - 0.3).abs() < 1e-9);
        assert!((result.confidence.complexity - 1.0).abs() < 1e-9);

        let analysis = c.analyze_complexity("", None);
        assert_eq!(analysis.score, 0.0);
    }

    #[test]
    fn whitespace_only_query_is_simple() {
        let result = QueryClassifier::new().classify("   \n\t ");
        assert_eq!(result.complexity, QueryComplexity::Simple);
    }

    #[test]
    fn comparison_with_reasoning_is_complex() {
        let c = QueryClassifier::new();
        let result = c.classify(PLUMBING);
        assert_eq!(result.domain, QueryDomain::Competitive);
        assert_eq!(result.intent, QueryIntent::Reasoning);
        assert_eq!(result.complexity, QueryComplexity::Complex);

        let analysis = c.analyze_complexity(PLUMBING, Some(result.domain));
        assert!(analysis.score > 0.5 && analysis.score < 0.52, "score {}", analysis.score);
        assert_eq!(analysis.factors.domain_specificity, 0.6);
        assert!((analysis.factors.reasoning_depth - 0.5).abs() < 1e-9);
    }

    #[test]
    fn dense_legal_query_is_at_least_complex() {
        let text = "Explain the legal implications of this contract clause, and whether the \
            regulation applies to all vendors or only some of them if they operate in multiple \
            states, because compliance differs by jurisdiction; compare the theory and the \
            principle behind each framework.";
        let result = QueryClassifier::new().classify(text);
        assert_eq!(result.domain, QueryDomain::Legal);
        assert!(result.complexity >= QueryComplexity::Complex);
    }

    #[test]
    fn greeting_is_simple() {
        let c = QueryClassifier::new();
        assert_eq!(c.classify("hello").complexity, QueryComplexity::Simple);
        assert_eq!(c.classify("Hi there").complexity, QueryComplexity::Simple);
    }

    #[test]
    fn website_copy_intent() {
        let (intent, confidence) =
            QueryClassifier::new().detect_intent("Write a headline for the hero section");
        assert_eq!(intent, QueryIntent::WebsiteCopy);
        assert!((confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn coding_and_gate_intents() {
        let c = QueryClassifier::new();
        assert_eq!(c.detect_intent("Fix the bug in this function").0, QueryIntent::Coding);
        assert_eq!(
            c.detect_intent("Does this copy pass the voice alignment gate?").0,
            QueryIntent::GateEvaluation
        );
    }

    #[test]
    fn seo_domain_saturates_confidence() {
        let (domain, confidence) = QueryClassifier::new()
            .detect_domain("Review our SEO keyword ranking and backlink profile");
        assert_eq!(domain, QueryDomain::Seo);
        assert!((confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn markers_only_match_at_word_start() {
        // "capital" must not read as "api"
        let (domain, _) = QueryClassifier::new().detect_domain("What is the capital of France?");
        assert_eq!(domain, QueryDomain::General);

        assert!(has_marker("a comparison", "compar"));
        assert!(!has_marker("incomparable", "compar"));
        assert!(has_marker("(api) docs", "api"));
    }

    #[test]
    fn ties_keep_the_earlier_label() {
        // one competitive marker and one financial marker
        let (domain, _) =
            QueryClassifier::new().detect_domain("a comparison of pricing");
        assert_eq!(domain, QueryDomain::Competitive);
    }

    #[test]
    fn general_domain_falls_back_to_technical_density() {
        let c = QueryClassifier::new();
        let text = "API v2 returns HTTP 500 on 3 of 4 calls";
        let general = c.analyze_complexity(text, Some(QueryDomain::General));
        let none = c.analyze_complexity(text, None);
        assert_eq!(general.factors.domain_specificity, none.factors.domain_specificity);
        assert!(none.factors.domain_specificity > 0.0);

        let legal = c.analyze_complexity(text, Some(QueryDomain::Legal));
        assert_eq!(legal.factors.domain_specificity, 0.9);
    }

    #[test]
    fn digit_runs_count_groups() {
        assert_eq!(digit_runs("abc"), 0);
        assert_eq!(digit_runs("12 and 345, then 6"), 3);
    }

    proptest! {
        #[test]
        fn confidences_stay_in_unit_interval(text in ".{0,400}") {
            let result = QueryClassifier::new().classify(&text);
            for value in [result.confidence.intent, result.confidence.complexity, result.confidence.domain] {
                prop_assert!((0.0..=1.0).contains(&value));
            }
        }

        #[test]
        fn factors_stay_in_unit_interval(text in "[a-zA-Z0-9 ,.;?!-]{0,300}") {
            let analysis = QueryClassifier::new().analyze_complexity(&text, None);
            for f in analysis.factors.as_array() {
                prop_assert!((0.0..=1.0).contains(&f));
            }
            prop_assert!((0.0..=1.0).contains(&analysis.score));
        }

        #[test]
        fn classification_is_deterministic(text in ".{0,200}") {
            let c = QueryClassifier::new();
            prop_assert_eq!(c.classify(&text), c.classify(&text));
        }
    }
}
