//! Local placeholder card renderer
//!
//! Draws a front and a back card as SVG and returns them as inline
//! `data:image/svg+xml;base64,...` references, so they display anywhere a
//! remote image URL would.

use std::fmt::Write as _;

use base64::{Engine, engine::general_purpose::STANDARD};
use domain::{CardImage, GenerationRequest};
use tracing::debug;

use crate::{config::PlaceholderConfig, error::ImageGenerationError, ports::CardRenderer};

const SVG_DATA_PREFIX: &str = "data:image/svg+xml;base64,";
const FALLBACK_LABEL: &str = "word card";

/// Renders placeholder cards without touching the network
#[derive(Debug, Clone, Default)]
pub struct PlaceholderCardRenderer {
    config: PlaceholderConfig,
}

impl PlaceholderCardRenderer {
    /// Create a renderer
    pub const fn new(config: PlaceholderConfig) -> Self {
        Self { config }
    }

    fn front(&self, label: &str, grounded: bool) -> String {
        let PlaceholderConfig {
            width,
            height,
            accent_color,
        } = &self.config;
        let cx = width / 2;
        let cy = height / 2;
        let subtitle = if grounded {
            "Your photo card is on its way"
        } else {
            "Vocabulary card"
        };

        let mut svg = String::new();
        let _ = write!(
            svg,
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"##
        );
        let _ = write!(
            svg,
            r##"<rect width="100%" height="100%" rx="48" fill="{}"/>"##,
            escape_xml(accent_color)
        );
        let _ = write!(
            svg,
            r##"<text x="{cx}" y="{cy}" font-family="Arial, Roboto, sans-serif" font-size="{}" font-weight="bold" fill="#ffffff" text-anchor="middle">{}</text>"##,
            width / 8,
            escape_xml(label)
        );
        let _ = write!(
            svg,
            r##"<text x="{cx}" y="{}" font-family="Arial, Roboto, sans-serif" font-size="{}" fill="#ffffff" text-anchor="middle">{subtitle}</text>"##,
            cy + height / 8,
            width / 28
        );
        svg.push_str("</svg>");
        svg
    }

    fn back(&self, label: &str) -> String {
        let PlaceholderConfig {
            width,
            height,
            accent_color,
        } = &self.config;
        let cx = width / 2;
        let line = height / 10;

        let mut svg = String::new();
        let _ = write!(
            svg,
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"##
        );
        let _ = write!(
            svg,
            r##"<rect width="100%" height="100%" rx="48" fill="#ffffff" stroke="{}" stroke-width="8"/>"##,
            escape_xml(accent_color)
        );
        for (row, text) in [
            format!("Examples for \"{label}\""),
            "Say it out loud, then use it in a sentence.".to_string(),
            "Tip: picture yourself doing it.".to_string(),
        ]
        .iter()
        .enumerate()
        {
            let y = line * (3 + 2 * u32::try_from(row).unwrap_or(0));
            let _ = write!(
                svg,
                r##"<text x="{cx}" y="{y}" font-family="Arial, Roboto, sans-serif" font-size="{}" fill="#333333" text-anchor="middle">{}</text>"##,
                width / 24,
                escape_xml(text)
            );
        }
        svg.push_str("</svg>");
        svg
    }
}

impl CardRenderer for PlaceholderCardRenderer {
    fn render(&self, request: &GenerationRequest) -> Result<Vec<CardImage>, ImageGenerationError> {
        if self.config.width == 0 || self.config.height == 0 {
            return Err(ImageGenerationError::Rendering(
                "card dimensions must be positive".to_string(),
            ));
        }

        let label = request
            .word
            .as_ref()
            .map_or(FALLBACK_LABEL, domain::Word::as_str);
        let grounded = request.resolvable_source().is_some();

        let cards = vec![
            CardImage::new(to_data_url(&self.front(label, grounded)))
                .with_revised_prompt(format!("Front card for {label}")),
            CardImage::new(to_data_url(&self.back(label)))
                .with_revised_prompt(format!("Back card for {label}")),
        ];
        debug!(label, "Rendered placeholder cards");
        Ok(cards)
    }
}

fn to_data_url(svg: &str) -> String {
    format!("{SVG_DATA_PREFIX}{}", STANDARD.encode(svg))
}

/// Escape text for use in XML content and attributes
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
