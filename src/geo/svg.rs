//! Static SVG export of the projected map.

use super::MapPath;
use eframe::egui::Vec2;
use std::fmt::Write as _;

/// Builds an SVG document from projected paths and marker lines.
pub struct SvgDocument {
    size: Vec2,
    body: String,
}

impl SvgDocument {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            body: String::new(),
        }
    }

    /// Adds a group of paths sharing one style.
    pub fn add_paths(
        &mut self,
        class: &str,
        paths: &[MapPath],
        fill: &str,
        stroke: &str,
        width: f32,
    ) {
        let _ = writeln!(
            self.body,
            r#"<g class="{}" fill="{}" stroke="{}" stroke-width="{}">"#,
            class, fill, stroke, width
        );
        for path in paths {
            let data = path.svg_path_data();
            if data.is_empty() {
                continue;
            }
            match &path.label {
                Some(label) => {
                    let _ = writeln!(
                        self.body,
                        r#"<path d="{}"><title>{}</title></path>"#,
                        data,
                        escape(label)
                    );
                }
                None => {
                    let _ = writeln!(self.body, r#"<path d="{}"/>"#, data);
                }
            }
        }
        self.body.push_str("</g>\n");
    }

    /// Adds a full-height vertical line at `x`, with an optional tooltip.
    pub fn add_vertical_line(&mut self, x: f32, stroke: &str, opacity: f32, title: Option<&str>) {
        let _ = write!(
            self.body,
            r#"<line x1="{x:.2}" y1="0" x2="{x:.2}" y2="{h}" stroke="{stroke}" opacity="{opacity}""#,
            x = x,
            h = self.size.y,
            stroke = stroke,
            opacity = opacity
        );
        match title {
            Some(title) => {
                let _ = writeln!(self.body, "><title>{}</title></line>", escape(title));
            }
            None => self.body.push_str("/>\n"),
        }
    }

    /// Finishes the document.
    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = self.size.x,
            h = self.size.y,
            body = self.body
        )
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::PathPart;
    use eframe::egui::Pos2;

    #[test]
    fn test_document_structure() {
        let mut doc = SvgDocument::new(Vec2::new(1200.0, 880.0));
        doc.add_paths(
            "countries",
            &[MapPath {
                parts: vec![PathPart {
                    points: vec![Pos2::new(0.0, 0.0), Pos2::new(10.0, 0.0), Pos2::new(10.0, 10.0)],
                    closed: true,
                }],
                label: Some("Trinidad & Tobago".to_string()),
            }],
            "none",
            "#ffffff",
            0.5,
        );
        doc.add_vertical_line(600.0, "red", 1.0, None);
        doc.add_vertical_line(300.0, "orange", 0.5, Some("<west>"));
        let svg = doc.finish();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 1200 880""#));
        assert!(svg.contains(r#"d="M0.00,0.00L10.00,0.00L10.00,10.00Z""#));
        assert!(svg.contains("<title>Trinidad &amp; Tobago</title>"));
        assert!(svg.contains(r#"x1="600.00""#));
        assert!(svg.contains(r#"opacity="1"/>"#));
        assert!(svg.contains("<title>&lt;west&gt;</title></line>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_empty_paths_skipped() {
        let mut doc = SvgDocument::new(Vec2::new(100.0, 80.0));
        doc.add_paths("empty", &[MapPath::default()], "none", "black", 1.0);
        assert!(!doc.finish().contains("<path"));
    }
}
