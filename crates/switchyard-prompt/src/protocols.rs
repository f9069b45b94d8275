// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-feature task protocols.
//!
//! Long protocols are built from blocks; a block whose data is absent from
//! the context is left out entirely. Features whose instructions travel in
//! the user prompt get a one-paragraph protocol or none at all.

use switchyard_core::{Feature, FeatureContext, PropertyTier};

use crate::join_sections;

/// The protocol section for `ctx.feature`. Empty when the feature has none.
pub fn feature_protocol(ctx: &FeatureContext) -> String {
    match ctx.feature {
        Feature::ContentBrief => content_brief(ctx),
        Feature::WebsiteCopy => website_copy(ctx),
        Feature::CopyGate => COPY_GATE.to_string(),
        Feature::CompetitiveScan => competitive_scan(ctx),
        Feature::UpsellDetection => UPSELL_DETECTION.to_string(),
        Feature::VoiceCapture => voice_capture(ctx),
        Feature::SeoStrategy => "FEATURE: SEO Strategy\n\
            Act as a senior SEO strategist. Do exactly what the user message asks and \
            return only the requested format, with no preamble or commentary."
            .to_string(),
        Feature::BlogPost => "FEATURE: Blog Post\n\
            Act as an SEO content writer with a natural, human voice. Honor every \
            specification in the user message. Output clean HTML and nothing else."
            .to_string(),
        Feature::SocialPosts => "FEATURE: Social Posts\n\
            Act as a social media specialist. Follow the user message exactly and return \
            only the requested JSON array, without preamble or code fences."
            .to_string(),
        Feature::PpcAds => "FEATURE: Search Ads\n\
            Act as a paid search specialist. Respect the character limits and format in the \
            user message and return only the requested JSON array, without preamble or code fences."
            .to_string(),
        Feature::MetaDescription => "FEATURE: Meta Description\n\
            Act as an SEO specialist and write one meta description to the user message's \
            specification. Return the description text only, unquoted and unexplained."
            .to_string(),
        Feature::GbpPost | Feature::ReportNarrative => String::new(),
    }
}

/// `- Label: value` lines, with the keyword line only when keywords exist.
fn detail_block(heading: &str, lines: &[(&str, &str)], keywords: &[String]) -> String {
    let mut out = format!("{heading}:");
    for (label, value) in lines {
        out.push_str(&format!("\n- {label}: {value}"));
    }
    if !keywords.is_empty() {
        out.push_str(&format!("\n- Target keywords: {}", keywords.join(", ")));
    }
    out
}

fn content_brief(ctx: &FeatureContext) -> String {
    let task = ctx
        .task_context
        .as_ref()
        .map(|t| {
            detail_block(
                "TASK",
                &[("Title", t.title.as_str()), ("Category", t.category.as_str())],
                &t.target_keywords,
            )
        })
        .unwrap_or_default();

    join_sections([
        "FEATURE: Content Brief\n\n\
         Produce a structured brief a writer can execute without doing any further research.",
        &task,
        "THE BRIEF MUST COVER:\n\
         - The objective: one or two sentences on what the piece does for the client\n\
         - A specific target audience\n\
         - A word count range\n\
         - A proposed H1 that is sharp and close to the primary keyword\n\
         - An outline of H2 sections, each with a line on what it covers\n\
         - Three to five keywords labeled primary, secondary, or LSI, with usage notes\n\
         - The competitive angle: which gap in current rankings this piece fills\n\
         - SEO requirements such as internal links, meta description notes, and schema\n\
         - Tone notes, drawing on the client's voice profile when one is given",
        "Keep it lean. Every item must be something the writer can act on.",
    ])
}

fn tier_guidance(tier: PropertyTier) -> &'static str {
    match tier {
        PropertyTier::Extension => {
            "Site extension. The property shares the visual and voice identity of the client's \
             primary site, so the copy has to read as part of that brand."
        }
        PropertyTier::BrandedSatellite => {
            "Branded satellite. Same brand on a separate domain: keep the brand signals strong \
             but let the voice stand a little more on its own."
        }
        PropertyTier::IndependentSatellite => {
            "Independent satellite. A separate brand with no borrowed reputation; the copy has \
             to earn credibility and trust on its own."
        }
    }
}

fn website_copy(ctx: &FeatureContext) -> String {
    let tier = ctx
        .property_tier
        .map(|t| format!("PROPERTY TIER: {}", tier_guidance(t)))
        .unwrap_or_default();
    let page = ctx
        .page_context
        .as_ref()
        .map(|p| {
            detail_block(
                "PAGE CONTEXT",
                &[("Page", p.page_title.as_str()), ("Section", p.section_key.as_str())],
                &p.target_keywords,
            )
        })
        .unwrap_or_default();

    join_sections([
        "FEATURE: Website Copy",
        &tier,
        &page,
        "COPY STANDARDS:\n\
         - Write for the human reader first; search engines come second.\n\
         - Place keywords only where they read naturally. No stuffing.\n\
         - Prefer active voice and concrete claims to vague superlatives.\n\
         - Calls to action say what happens next. \"Learn More\" is not acceptable.\n\
         - Skip stock openers such as \"In today's world\" or \"Look no further\".\n\
         - Match the client's voice profile when one is given.",
        "QUALITY GATE:\n\
         This copy will go through the copy gate before publication.\n\
         - AI detection: it must not read as machine-written. Vary sentence length, use \
         specific details, and avoid patterned structure.\n\
         - Voice alignment: it must match the client's voice profile, or be confident, \
         direct, and conversational when there is none.\n\
         Generic output gets rejected.",
    ])
}

const COPY_GATE: &str = "FEATURE: Copy Gate

Judge the copy on two passes and answer with the structured verdict only.

PASS 1 (AI DETECTION):
Decide whether the copy reads as machine-written. Signals include:
- Sentences of uniform length and rhythm
- Stock openers such as \"In today's competitive landscape\"
- Unsupported generic claims like \"high quality\" or \"expert team\"
- Lists used where prose would read better
- No concrete details: numbers, named services, specifics
Score from 0.0 to 1.0, where 1.0 is clearly human-written. Pass threshold: 0.65.

PASS 2 (VOICE ALIGNMENT):
Compare the copy against the client's voice profile. With no profile, judge it against a confident, direct, conversational, specific voice.
Score from 0.0 to 1.0, where 1.0 is a perfect match. Pass threshold: 0.70.

The gate opens only when both passes meet their threshold.
For every section that fails, list concrete, fixable reasons.";

fn competitive_scan(ctx: &FeatureContext) -> String {
    let competitors = if ctx.competitors.is_empty() {
        String::new()
    } else {
        let lines: Vec<String> = ctx.competitors.iter().map(|c| format!("- {c}")).collect();
        format!("KNOWN COMPETITORS:\n{}", lines.join("\n"))
    };

    join_sections([
        "FEATURE: Competitive Scan",
        &competitors,
        "ANALYSIS:\n\
         - Find positioning gaps between what competitors claim and what they can show.\n\
         - Surface topics competitors rank for that the client does not cover.\n\
         - Name real advantages the client holds over the field.\n\
         - Invent nothing. When information is missing, say so.\n\
         - Tie every claim to observable evidence.",
    ])
}

const UPSELL_DETECTION: &str = "FEATURE: Upsell Detection

Review the client data and list only genuine opportunities. An opportunity is genuine when all of these hold:
1. The client's current service coverage has an observable gap.
2. The gap does measurable harm, such as lost traffic, lost rankings, or ground ceded to competitors.
3. A specific service addresses that gap directly.

Do not invent urgency or recommend unwarranted services.
For each opportunity, describe the gap, estimate the impact where possible, and name the service.";

fn voice_capture(ctx: &FeatureContext) -> String {
    format!(
        "FEATURE: Voice Capture

Analyze the scraped site content and extract a precise, usable brand voice profile for {client}. \
Future content for this client will be tuned against it, so it must let generated copy pass as their own writing.

METHOD:
- Read everything before scoring. Look for patterns, not one-offs.
- Vocabulary: quote terms and phrases the text actually repeats. Do not invent them.
- Sentence structure: describe what you observe, such as length, clauses, fragments, questions.

SCORING (1 to 10):
- Formality: 1 is chatty and casual, 10 reads like a legal brief.
- Enthusiasm: 1 is flat and factual, 10 is exclamation marks throughout.
- Technicality: 1 is everyday language, 10 assumes deep domain expertise.
- Brevity: 1 is long, discursive paragraphs, 10 is terse bullet points.

STANDARDS:
- Tonality must say how the voice works, not just label it. \"Professional yet approachable\" is too vague.
- Every score must be defensible from the content provided.
- When the content is insufficient to judge a dimension, score it 5 and flag the uncertainty in the tonality field. Do not guess.",
        client = ctx.client_name,
    )
}
