use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::model::ContentData;
use super::validate::ValidationError;

/// An independently edited region of the marketing site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Hero,
    About,
    WhyWeave,
    Process,
    Portfolio,
    Team,
    Contact,
    Footer,
}

impl Section {
    /// Every section, in the order they appear on the home page.
    pub const ALL: [Section; 8] = [
        Section::Hero,
        Section::About,
        Section::WhyWeave,
        Section::Process,
        Section::Portfolio,
        Section::Team,
        Section::Contact,
        Section::Footer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::About => "about",
            Section::WhyWeave => "why-weave",
            Section::Process => "process",
            Section::Portfolio => "portfolio",
            Section::Team => "team",
            Section::Contact => "contact",
            Section::Footer => "footer",
        }
    }

    /// Built-in content shown until an editor saves something for the section.
    pub fn defaults(&self) -> ContentData {
        let value = match self {
            Section::Hero => json!({
                "headline": "Architecture Outsourcing, Woven Together",
                "subheadline": "Drafting, BIM and visualisation teams that plug into your studio",
                "ctaText": "Start a Project",
                "ctaLink": "/contact",
                "backgroundImage": "/images/hero.jpg",
            }),
            Section::About => json!({
                "title": "About Weave",
                "description": "We are an extension of your design team, delivering production drawings and models on your standards.",
                "stats": [
                    { "value": "250+", "label": "Projects delivered" },
                    { "value": "12", "label": "Years in practice" },
                    { "value": "40", "label": "Architects and technicians" },
                ],
            }),
            Section::WhyWeave => json!({
                "title": "Why Weave",
                "reasons": [
                    { "title": "Overnight turnaround", "description": "Send markups at close of business, wake up to revised sets." },
                    { "title": "Your standards", "description": "We work inside your templates, layers and families." },
                    { "title": "Fixed pricing", "description": "Scoped per package with no hourly surprises." },
                ],
            }),
            Section::Process => json!({
                "title": "How We Work",
                "steps": [
                    { "number": 1, "title": "Brief", "description": "Share drawings, models and standards." },
                    { "number": 2, "title": "Scope", "description": "We return a fixed quote and schedule." },
                    { "number": 3, "title": "Produce", "description": "Daily progress with a dedicated lead." },
                    { "number": 4, "title": "Deliver", "description": "QA-checked files in your formats." },
                ],
            }),
            Section::Portfolio => json!({
                "title": "Selected Work",
                "subtitle": "Residential, commercial and hospitality projects across three continents",
                "projects": [],
            }),
            Section::Team => json!({
                "title": "Our Team",
                "subtitle": "The people behind your drawings",
                "members": [],
            }),
            Section::Contact => json!({
                "title": "Get in Touch",
                "description": "Tell us about your project and we will reply within one business day.",
                "email": "hello@weave.studio",
                "phone": "",
                "address": "",
            }),
            Section::Footer => json!({
                "tagline": "Architecture outsourcing for growing studios",
                "copyright": "Weave Studio. All rights reserved.",
                "links": [
                    { "label": "Privacy", "href": "/privacy" },
                    { "label": "Terms", "href": "/terms" },
                ],
            }),
        };
        match value {
            serde_json::Value::Object(map) => map,
            _ => ContentData::new(),
        }
    }

    /// Overlay `data` on top of the section defaults, field by field.
    pub fn with_defaults(&self, data: &ContentData) -> ContentData {
        let mut merged = self.defaults();
        for (key, value) in data {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownSection(s.to_string()))
    }
}
