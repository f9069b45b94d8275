// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The feature catalog and the caller-supplied context for a call.
//!
//! Every feature maps to a default output budget and an output shape. The
//! shape drives the escalation heuristic; the prompt assembler keys its
//! protocol lookup on the feature itself. Adding a feature means adding a
//! variant here and a protocol arm in the assembler.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A registered application feature that may call a model.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    ContentBrief,
    WebsiteCopy,
    /// Copy quality gate: AI-detection pass plus voice-alignment pass.
    CopyGate,
    SeoStrategy,
    BlogPost,
    SocialPosts,
    PpcAds,
    MetaDescription,
    CompetitiveScan,
    UpsellDetection,
    VoiceCapture,
    /// Business-profile post.
    GbpPost,
    ReportNarrative,
}

/// The response shape a feature's output contract demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OutputShape {
    /// Structured data the caller parses.
    Json,
    /// Long-form prose delivered as HTML.
    Html,
    PlainText,
}

impl Feature {
    /// Default maximum output tokens when neither the request nor config
    /// overrides it.
    pub fn default_max_tokens(self) -> u32 {
        match self {
            Feature::ContentBrief => 2000,
            Feature::WebsiteCopy => 1500,
            Feature::CopyGate => 800,
            Feature::SeoStrategy => 1200,
            Feature::BlogPost => 4000,
            Feature::SocialPosts => 2000,
            Feature::PpcAds => 1200,
            Feature::MetaDescription => 200,
            Feature::CompetitiveScan => 1500,
            Feature::UpsellDetection => 600,
            Feature::VoiceCapture => 1200,
            Feature::GbpPost => 400,
            Feature::ReportNarrative => 1000,
        }
    }

    pub fn output_shape(self) -> OutputShape {
        match self {
            Feature::ContentBrief
            | Feature::CopyGate
            | Feature::SeoStrategy
            | Feature::SocialPosts
            | Feature::PpcAds
            | Feature::CompetitiveScan
            | Feature::UpsellDetection
            | Feature::VoiceCapture => OutputShape::Json,
            Feature::BlogPost => OutputShape::Html,
            Feature::WebsiteCopy
            | Feature::MetaDescription
            | Feature::GbpPost
            | Feature::ReportNarrative => OutputShape::PlainText,
        }
    }

    /// The snake_case identifier used in config, storage, and the CLI.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// How a generated site relates to the client's primary brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PropertyTier {
    /// Extends the client's primary site with the same visual and voice identity.
    Extension,
    /// Same brand identity on a separate domain.
    BrandedSatellite,
    /// Independent brand that must build credibility from scratch.
    IndependentSatellite,
}

/// The page and section a piece of website copy is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    pub page_title: String,
    pub section_key: String,
    #[serde(default)]
    pub target_keywords: Vec<String>,
}

/// The task a content brief is being produced for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskContext {
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub target_keywords: Vec<String>,
}

/// Why a call is being made and on whose behalf.
///
/// Pure input to prompt assembly. The core never persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureContext {
    pub feature: Feature,
    pub tenant_id: String,
    pub client_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub competitors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_tier: Option<PropertyTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_context: Option<PageContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_context: Option<TaskContext>,
}

impl FeatureContext {
    /// A context with only the required fields set.
    pub fn new(feature: Feature, tenant_id: impl Into<String>, client_name: impl Into<String>) -> Self {
        Self {
            feature,
            tenant_id: tenant_id.into(),
            client_name: client_name.into(),
            industry: None,
            voice_profile: None,
            competitors: Vec::new(),
            property_tier: None,
            page_context: None,
            task_context: None,
        }
    }
}
