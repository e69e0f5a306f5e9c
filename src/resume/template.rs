//! Rendering résumé data into a capturable surface.
//!
//! Each template draws onto an A4-sized [`Framebuffer`] (one pixel per
//! point) so the export at scale 1 maps pixel-for-point onto the page.
//! Content that runs past the bottom edge is clipped.

use tracing::debug;

use super::format::{date_range, wrap_text};
use super::model::{ResumeData, TemplateKind};
use crate::pdf::{A4_HEIGHT_PTS, A4_WIDTH_PTS};
use crate::surface::{Framebuffer, GLYPH_SIZE};

/// Id given to rendered previews
pub const PREVIEW_SURFACE_ID: &str = "resume-preview";

/// Preview width in pixels
pub const PREVIEW_WIDTH: u32 = A4_WIDTH_PTS as u32;

/// Preview height in pixels
pub const PREVIEW_HEIGHT: u32 = A4_HEIGHT_PTS as u32;

const WHITE: [u8; 3] = [255, 255, 255];
const INK: [u8; 3] = [17, 24, 39];
const MUTED: [u8; 3] = [107, 114, 128];

/// Colors and proportions that distinguish the templates
#[derive(Debug, Clone, Copy)]
struct Style {
    margin: u32,
    background: [u8; 3],
    header_band: Option<[u8; 3]>,
    name_color: [u8; 3],
    name_scale: u32,
    title_color: [u8; 3],
    accent: [u8; 3],
    centered_header: bool,
    heading_rule: bool,
    uppercase_headings: bool,
}

impl Style {
    fn for_template(kind: TemplateKind) -> Self {
        match kind {
            TemplateKind::Modern => Self {
                margin: 36,
                background: WHITE,
                header_band: Some([30, 41, 59]),
                name_color: WHITE,
                name_scale: 3,
                title_color: [147, 197, 253],
                accent: [37, 99, 235],
                centered_header: false,
                heading_rule: true,
                uppercase_headings: false,
            },
            TemplateKind::Classic => Self {
                margin: 44,
                background: [253, 252, 248],
                header_band: None,
                name_color: INK,
                name_scale: 3,
                title_color: [55, 65, 81],
                accent: INK,
                centered_header: true,
                heading_rule: true,
                uppercase_headings: true,
            },
            TemplateKind::Minimal => Self {
                margin: 52,
                background: WHITE,
                header_band: None,
                name_color: INK,
                name_scale: 2,
                title_color: MUTED,
                accent: MUTED,
                centered_header: false,
                heading_rule: false,
                uppercase_headings: true,
            },
        }
    }
}

/// Render `data` with its selected template
pub fn render(data: &ResumeData) -> Framebuffer {
    render_with(data, data.selected_template)
}

/// Render `data` with a specific template
pub fn render_with(data: &ResumeData, kind: TemplateKind) -> Framebuffer {
    let style = Style::for_template(kind);
    let mut page = Page::new(style);

    page.header(data);
    page.sections(data);

    debug!(template = %kind, used_height = page.y, "rendered résumé preview");
    page.fb
}

/// Drawing cursor over the preview framebuffer
struct Page {
    fb: Framebuffer,
    style: Style,
    y: u32,
}

impl Page {
    fn new(style: Style) -> Self {
        let fb = Framebuffer::with_color(PREVIEW_WIDTH, PREVIEW_HEIGHT, style.background)
            .with_id(PREVIEW_SURFACE_ID);
        Self {
            fb,
            style,
            y: style.margin,
        }
    }

    fn content_width(&self) -> u32 {
        PREVIEW_WIDTH - 2 * self.style.margin
    }

    fn chars_per_line(&self, scale: u32) -> usize {
        (self.content_width() / (GLYPH_SIZE * scale)) as usize
    }

    fn text_x(&self, text: &str, scale: u32, centered: bool) -> u32 {
        if centered {
            let width = Framebuffer::text_width(text, scale).min(self.content_width());
            self.style.margin + (self.content_width() - width) / 2
        } else {
            self.style.margin
        }
    }

    fn line(&mut self, text: &str, color: [u8; 3], scale: u32, centered: bool) {
        let x = self.text_x(text, scale, centered);
        self.fb.draw_text_scaled(x, self.y, text, color, scale);
        self.y += GLYPH_SIZE * scale + 4;
    }

    fn paragraph(&mut self, text: &str, color: [u8; 3]) {
        for line in wrap_text(text, self.chars_per_line(1)) {
            self.line(&line, color, 1, false);
        }
    }

    fn gap(&mut self, pixels: u32) {
        self.y += pixels;
    }

    fn header(&mut self, data: &ResumeData) {
        let info = &data.personal_info;
        let style = self.style;
        let band_top = self.y;
        if style.header_band.is_some() {
            self.y += 14;
        }

        let name = if info.name.trim().is_empty() { "Your Name" } else { info.name.trim() };
        let contact = info.contact_items().join("  |  ");
        let title = info.title.trim();

        // Measure first so the band can be painted underneath the text
        if let Some(band) = style.header_band {
            let mut height = 14 + GLYPH_SIZE * style.name_scale + 4;
            if !title.is_empty() {
                height += GLYPH_SIZE * 2 + 4;
            }
            height += wrap_text(&contact, self.chars_per_line(1)).len() as u32 * (GLYPH_SIZE + 4);
            height += 14;
            self.fb.draw_rect(0, 0, PREVIEW_WIDTH, band_top + height, band);
        }

        self.line(name, style.name_color, style.name_scale, style.centered_header);
        if !title.is_empty() {
            self.line(title, style.title_color, 2, style.centered_header);
        }
        let contact_color = if style.header_band.is_some() { [203, 213, 225] } else { MUTED };
        for line in wrap_text(&contact, self.chars_per_line(1)) {
            self.line(&line, contact_color, 1, style.centered_header);
        }

        if style.header_band.is_some() {
            self.y += 14;
        }
        self.gap(16);
    }

    fn heading(&mut self, title: &str) {
        let style = self.style;
        let text = if style.uppercase_headings { title.to_uppercase() } else { title.to_string() };
        self.line(&text, style.accent, 2, false);
        if style.heading_rule {
            let width = self.content_width();
            self.fb.draw_hline(style.margin, self.y - 2, width, 1, style.accent);
            self.gap(4);
        }
    }

    fn sections(&mut self, data: &ResumeData) {
        let summary = data.personal_info.summary.trim();
        if !summary.is_empty() {
            self.heading("Summary");
            self.paragraph(summary, INK);
            self.gap(12);
        }

        if !data.experiences.is_empty() {
            self.heading("Experience");
            for job in &data.experiences {
                let role = join_nonempty(&[job.position.as_str(), job.company.as_str()], " - ");
                self.line(&role, INK, 1, false);
                let dates = date_range(&job.start_date, &job.end_date, job.current);
                let meta = join_nonempty(&[dates.as_str(), job.location.as_str()], "  |  ");
                if !meta.is_empty() {
                    self.line(&meta, MUTED, 1, false);
                }
                self.paragraph(job.description.trim(), INK);
                self.gap(8);
            }
            self.gap(4);
        }

        if !data.education.is_empty() {
            self.heading("Education");
            for school in &data.education {
                let degree = if school.field_of_study.trim().is_empty() {
                    school.degree.trim().to_string()
                } else if school.degree.trim().is_empty() {
                    school.field_of_study.trim().to_string()
                } else {
                    format!("{} in {}", school.degree.trim(), school.field_of_study.trim())
                };
                let line = join_nonempty(&[degree.as_str(), school.institution.as_str()], " - ");
                self.line(&line, INK, 1, false);
                let dates = date_range(&school.start_date, &school.end_date, school.current);
                let meta = join_nonempty(&[dates.as_str(), school.location.as_str()], "  |  ");
                if !meta.is_empty() {
                    self.line(&meta, MUTED, 1, false);
                }
                self.paragraph(school.description.trim(), INK);
                self.gap(8);
            }
            self.gap(4);
        }

        if !data.skills.is_empty() {
            self.heading("Skills");
            let skills: Vec<String> = data
                .skills
                .iter()
                .filter(|s| !s.name.trim().is_empty())
                .map(|s| format!("{} ({})", s.name.trim(), s.level))
                .collect();
            self.paragraph(&skills.join(", "), INK);
            self.gap(12);
        }

        for (title, body) in [("Languages", &data.languages), ("Interests", &data.interests)] {
            if !body.trim().is_empty() {
                self.heading(title);
                self.paragraph(body.trim(), INK);
                self.gap(12);
            }
        }
    }
}

fn join_nonempty(parts: &[&str], separator: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::model::{Experience, Skill, SkillLevel};
    use crate::surface::Surface;

    fn sample() -> ResumeData {
        let mut data = ResumeData::default();
        data.personal_info.name = "Ada Lovelace".to_string();
        data.personal_info.title = "Analyst".to_string();
        data.personal_info.email = "ada@example.com".to_string();
        data.personal_info.summary = "Writes programs for engines that do not exist yet.".to_string();
        data.experiences.push(Experience {
            company: "Analytical Engines".to_string(),
            position: "Engineer".to_string(),
            start_date: "1842-01".to_string(),
            current: true,
            description: "Published the first algorithm intended for a machine.".to_string(),
            ..Experience::default()
        });
        data.skills.push(Skill {
            id: "s1".to_string(),
            name: "Mathematics".to_string(),
            level: SkillLevel::Expert,
        });
        data
    }

    fn count_color(fb: &Framebuffer, color: [u8; 3]) -> usize {
        fb.as_bytes().chunks_exact(3).filter(|p| *p == color).count()
    }

    #[test]
    fn test_preview_is_a4_sized_surface() {
        let fb = render(&sample());
        assert_eq!((fb.width(), fb.height()), (595, 842));
        assert_eq!(fb.id(), PREVIEW_SURFACE_ID);
        assert!(fb.layout().is_some());
    }

    #[test]
    fn test_modern_has_header_band() {
        let fb = render_with(&sample(), TemplateKind::Modern);
        assert_eq!(fb.get_pixel(2, 2), [30, 41, 59]);
        assert_eq!(fb.get_pixel(2, 841), WHITE);
    }

    #[test]
    fn test_templates_render_differently() {
        let data = sample();
        let modern = render_with(&data, TemplateKind::Modern);
        let classic = render_with(&data, TemplateKind::Classic);
        let minimal = render_with(&data, TemplateKind::Minimal);

        assert_ne!(modern.as_bytes(), classic.as_bytes());
        assert_ne!(classic.as_bytes(), minimal.as_bytes());
        assert_ne!(modern.as_bytes(), minimal.as_bytes());
    }

    #[test]
    fn test_content_draws_ink() {
        let fb = render_with(&sample(), TemplateKind::Classic);
        assert!(count_color(&fb, INK) > 100);
    }

    #[test]
    fn test_blank_resume_still_renders() {
        let fb = render(&ResumeData::default());
        assert_eq!(fb.width(), PREVIEW_WIDTH);
    }

    #[test]
    fn test_overflowing_content_is_clipped() {
        let mut data = sample();
        data.personal_info.summary = "word ".repeat(5_000);
        let fb = render_with(&data, TemplateKind::Minimal);
        assert_eq!(fb.height(), PREVIEW_HEIGHT);
    }

    #[test]
    fn test_join_nonempty() {
        assert_eq!(join_nonempty(&["a", " ", "b"], ", "), "a, b");
        assert_eq!(join_nonempty(&["", ""], ", "), "");
    }
}
