// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output contracts: the response shape the caller parses.

use switchyard_core::Feature;

/// The output contract for `feature`. Empty when the format instructions
/// travel in the user prompt instead.
pub fn output_contract(feature: Feature) -> &'static str {
    match feature {
        Feature::ContentBrief => CONTENT_BRIEF,
        Feature::WebsiteCopy => WEBSITE_COPY,
        Feature::CopyGate => COPY_GATE,
        Feature::CompetitiveScan => COMPETITIVE_SCAN,
        Feature::UpsellDetection => UPSELL_DETECTION,
        Feature::VoiceCapture => VOICE_CAPTURE,
        Feature::SeoStrategy
        | Feature::BlogPost
        | Feature::SocialPosts
        | Feature::PpcAds
        | Feature::MetaDescription
        | Feature::GbpPost
        | Feature::ReportNarrative => "",
    }
}

/// Whether `feature`'s contract is a JSON schema.
pub fn has_json_contract(feature: Feature) -> bool {
    output_contract(feature).contains("\nSchema:")
}

const CONTENT_BRIEF: &str = concat!(
    "OUTPUT FORMAT:\nReply with a single JSON object and nothing else: no preamble, no code fences.",
    r#"
Schema:
{
  "headline": string,
  "objective": string,
  "target_audience": string,
  "word_count_range": { "min": number, "max": number },
  "outline": [{ "heading": string, "description": string }],
  "keywords": [{ "term": string, "type": "primary" | "secondary" | "lsi", "guidance": string }],
  "competitive_angle": string,
  "seo_requirements": string,
  "tone_notes": string
}"#
);

const WEBSITE_COPY: &str = "OUTPUT FORMAT:
Reply with the copy itself: no JSON wrapper and no commentary.
When several sections were requested, separate them with a line containing only ---SECTION_BREAK---.";

const COPY_GATE: &str = concat!(
    "OUTPUT FORMAT:\nReply with a single JSON object and nothing else: no preamble, no code fences.",
    r#"
Schema:
{
  "gate_open": boolean,
  "ai_detection_score": number,
  "voice_alignment_score": number,
  "sections_evaluated": string[],
  "failed_sections": string[],
  "action_required": string | null,
  "feedback": [{ "section": string, "pass": boolean, "failures": string[] }]
}"#
);

const COMPETITIVE_SCAN: &str = concat!(
    "OUTPUT FORMAT:\nReply with a single JSON object and nothing else: no preamble, no code fences.",
    r#"
Schema:
{
  "gaps": [{ "description": string, "impact": string, "evidence": string }],
  "content_opportunities": [{ "topic": string, "reasoning": string }],
  "differentiation_angles": [{ "advantage": string, "basis": string }]
}"#
);

const UPSELL_DETECTION: &str = r#"OUTPUT FORMAT:
Reply with a single JSON array and nothing else: no preamble, no code fences.
Schema: [{ "service": string, "gap": string, "impact": string, "urgency": "high" | "medium" | "low" }]"#;

const VOICE_CAPTURE: &str = concat!(
    "OUTPUT FORMAT:\nReply with a single JSON object and nothing else: no preamble, no code fences.",
    r#"
Schema:
{
  "tonality": string,
  "vocabulary": string[],
  "sentence_structure": string,
  "characteristics": {
    "formality": number,
    "enthusiasm": number,
    "technicality": number,
    "brevity": number
  }
}"#
);
