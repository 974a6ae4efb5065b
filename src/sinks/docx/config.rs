use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fixed-format page layout for the registration document.
///
/// Defaults follow the registration convention: US Letter, Courier New at
/// 10pt, a narrow top margin and 0.75in everywhere else.
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Layout {
    /// Text shown centred in the header of every page
    #[builder(setter(into))]
    pub header_text: String,
    #[builder(setter(into), default = "\"Courier New\".to_string()")]
    pub font: String,
    #[builder(default = "10.0")]
    pub font_size_pt: f32,
    #[builder(default = "8.5")]
    pub page_width_in: f32,
    #[builder(default = "11.0")]
    pub page_height_in: f32,
    #[builder(default = "0.5")]
    pub margin_top_in: f32,
    #[builder(default = "0.75")]
    pub margin_bottom_in: f32,
    #[builder(default = "0.75")]
    pub margin_left_in: f32,
    #[builder(default = "0.75")]
    pub margin_right_in: f32,
    /// Distance from the page edge to the header text
    #[builder(default = "0.5")]
    pub header_distance_in: f32,
    /// Distance from the page edge to the footer text
    #[builder(default = "0.5")]
    pub footer_distance_in: f32,
}

/// Overrides for [`Layout`] as read from the `[layout]` table of a config file.
/// Anything left out keeps the registration default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutOverrides {
    pub font: Option<String>,
    pub font_size_pt: Option<f32>,
    pub page_width_in: Option<f32>,
    pub page_height_in: Option<f32>,
    pub margin_top_in: Option<f32>,
    pub margin_bottom_in: Option<f32>,
    pub margin_left_in: Option<f32>,
    pub margin_right_in: Option<f32>,
}

impl LayoutOverrides {
    pub fn apply(&self, builder: &mut LayoutBuilder) {
        if let Some(font) = &self.font {
            builder.font(font.clone());
        }
        if let Some(size) = self.font_size_pt {
            builder.font_size_pt(size);
        }
        if let Some(width) = self.page_width_in {
            builder.page_width_in(width);
        }
        if let Some(height) = self.page_height_in {
            builder.page_height_in(height);
        }
        if let Some(margin) = self.margin_top_in {
            builder.margin_top_in(margin);
        }
        if let Some(margin) = self.margin_bottom_in {
            builder.margin_bottom_in(margin);
        }
        if let Some(margin) = self.margin_left_in {
            builder.margin_left_in(margin);
        }
        if let Some(margin) = self.margin_right_in {
            builder.margin_right_in(margin);
        }
    }
}

/// Inches to twentieths of a point, the unit of page geometry in WordprocessingML
pub fn twips(inches: f32) -> i64 {
    (inches * 1440.0).round() as i64
}

/// Points to half-points, the unit of font sizes in WordprocessingML
pub fn half_points(points: f32) -> i64 {
    (points * 2.0).round() as i64
}

/// Docx output configuration.
#[derive(Debug, Clone)]
pub struct Docx {
    /// Output .docx file path
    pub outfile: PathBuf,
    pub layout: Layout,
}

/// Statistics from rendering a document, used for user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    /// One paragraph per selected line
    pub paragraph_count: usize,
    /// Number of pages in the document
    pub page_count: usize,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn layout_defaults_match_registration_format() {
        let layout = LayoutBuilder::default()
            .header_text("App V1.0")
            .build()
            .expect("can build layout");
        assert_eq!(layout.font, "Courier New");
        assert_eq!(layout.font_size_pt, 10.0);
        assert_eq!(twips(layout.margin_top_in), 720);
        assert_eq!(twips(layout.margin_bottom_in), 1080);
        assert_eq!(twips(layout.margin_left_in), 1080);
        assert_eq!(twips(layout.margin_right_in), 1080);
        assert_eq!(twips(layout.page_width_in), 12240);
        assert_eq!(twips(layout.page_height_in), 15840);
        assert_eq!(half_points(layout.font_size_pt), 20);
    }

    #[test]
    fn layout_requires_header_text() {
        assert!(LayoutBuilder::default().build().is_err());
    }

    #[test]
    fn overrides_replace_only_what_they_set() {
        let overrides: LayoutOverrides =
            toml::from_str("font_size_pt = 9.0\npage_width_in = 8.27\npage_height_in = 11.69")
                .expect("can parse overrides");

        let mut builder = LayoutBuilder::default();
        builder.header_text("App V1.0");
        overrides.apply(&mut builder);
        let layout = builder.build().expect("can build layout");

        assert_eq!(layout.font_size_pt, 9.0);
        assert_eq!(twips(layout.page_width_in), 11909);
        assert_eq!(layout.font, "Courier New");
        assert_eq!(layout.margin_top_in, 0.5);
    }

    #[test]
    fn unknown_override_keys_are_rejected() {
        assert!(toml::from_str::<LayoutOverrides>("colour = \"red\"").is_err());
    }
}
