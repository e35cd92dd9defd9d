//! Style normalization for extracted paragraphs
//!
//! Every paragraph is rebuilt with a fixed profile: headings are centred,
//! large and bold; body text is left-aligned at body size. Run emphasis and
//! color survive, fonts and sizes do not.

use serde::{Deserialize, Serialize};

use crate::document::{Alignment, Document, Paragraph, ParagraphFormat, Run};
use crate::section::ParagraphRole;

/// Color applied to runs without an explicit one
pub const DEFAULT_COLOR: &str = "000000";

const TWIPS_PER_CM: f64 = 1440.0 / 2.54;
const TWIPS_PER_PT: f64 = 20.0;

/// Fixed formatting applied to one paragraph role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleStyle {
    /// Paragraph alignment
    pub alignment: Alignment,
    /// Font family for every run
    pub font: String,
    /// Font size in points
    pub size_pt: f64,
    /// Force every run bold
    pub bold: bool,
}

/// The complete style profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleProfile {
    /// Applied to paragraphs whose style name starts with `Heading`
    pub heading: RoleStyle,
    /// Applied to everything else
    pub body: RoleStyle,
    /// Left indent in centimetres
    pub indent_left_cm: f64,
    /// Right indent in centimetres
    pub indent_right_cm: f64,
    /// Space before in points
    pub space_before_pt: f64,
    /// Space after in points
    pub space_after_pt: f64,
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self {
            heading: RoleStyle {
                alignment: Alignment::Center,
                font: "Arial".to_string(),
                size_pt: 24.0,
                bold: true,
            },
            body: RoleStyle {
                alignment: Alignment::Left,
                font: "Arial".to_string(),
                size_pt: 12.0,
                bold: false,
            },
            indent_left_cm: 0.64,
            indent_right_cm: 0.82,
            space_before_pt: 4.9,
            space_after_pt: 0.0,
        }
    }
}

impl StyleProfile {
    /// Style for a paragraph role
    pub fn for_role(&self, role: ParagraphRole) -> &RoleStyle {
        match role {
            ParagraphRole::Heading(_) => &self.heading,
            ParagraphRole::Body => &self.body,
        }
    }

    /// Paragraph format for `role`, keeping the source's line spacing
    fn paragraph_format(&self, role: ParagraphRole, source: &ParagraphFormat) -> ParagraphFormat {
        ParagraphFormat {
            alignment: Some(self.for_role(role).alignment),
            indent_left: Some(cm_to_twips(self.indent_left_cm)),
            indent_right: Some(cm_to_twips(self.indent_right_cm)),
            space_before: Some(pt_to_twips(self.space_before_pt)),
            space_after: Some(pt_to_twips(self.space_after_pt)),
            line_spacing: source.line_spacing.clone(),
        }
    }
}

/// Rebuild `source` with the profile for its role.
///
/// The style reference is kept so headings still feed the table of
/// contents.
pub fn restyle(source: &Paragraph, profile: &StyleProfile) -> Paragraph {
    let role = ParagraphRole::of(source);
    let style = profile.for_role(role);
    let size = half_points(style.size_pt);

    Paragraph {
        style_id: source.style_id.clone(),
        style_name: source.style_name.clone(),
        format: profile.paragraph_format(role, &source.format),
        runs: source
            .runs
            .iter()
            .map(|run| Run {
                text: run.text.clone(),
                bold: if style.bold { Some(true) } else { run.bold },
                italic: run.italic,
                underline: run.underline.clone(),
                font: Some(style.font.clone()),
                size: Some(size),
                color: Some(
                    run.color
                        .clone()
                        .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
                ),
            })
            .collect(),
        ..Paragraph::new()
    }
}

/// Restyle every top-level paragraph of `document`; tables are untouched.
///
/// Returns the number of paragraphs rebuilt.
pub fn restyle_document(document: &mut Document, profile: &StyleProfile) -> usize {
    let mut count = 0;
    for para in document.paragraphs_mut() {
        *para = restyle(para, profile);
        count += 1;
    }
    count
}

fn cm_to_twips(cm: f64) -> i32 {
    (cm * TWIPS_PER_CM).round() as i32
}

fn pt_to_twips(pt: f64) -> u32 {
    (pt * TWIPS_PER_PT).round().max(0.0) as u32
}

fn half_points(pt: f64) -> u32 {
    (pt * 2.0).round().max(0.0) as u32
}
