//! HTML for the gallery grid. Every render replaces the whole grid.

use std::fmt::Write as _;

use cosmic_storage::Capture;

pub const UNTITLED: &str = "Untitled Capture";
pub const UNKNOWN_LOCATION: &str = "Unknown location";
pub const UNKNOWN_EXPOSURE: &str = "Unknown exposure";
pub const UNKNOWN_FOCAL_LENGTH: &str = "Unknown focal length";
pub const UNKNOWN_PIXEL_SIZE: &str = "Unknown pixel size";
pub const DEFAULT_ALT: &str = "Astrophotography image";

pub const EMPTY_STATE: &str = r#"<div class="empty-state">
  <i class="fas fa-satellite"></i>
  <h2>No images found</h2>
  <p>No images match your search criteria.</p>
</div>
"#;

/// Display strings for one card, with placeholders already applied.
/// The modal viewer is populated from this, not from the raw record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub alt: String,
    pub date: String,
    pub location: String,
    pub exposure_time: String,
    pub focal_length: String,
    pub pixel_size: String,
    pub description: String,
    pub tags: Vec<String>,
    pub raw_url: String,
    pub processed_url: String,
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

fn detail(value: &Option<String>, placeholder: &str) -> String {
    or_placeholder(value.as_deref().unwrap_or_default(), placeholder)
}

impl From<&Capture> for CardView {
    fn from(capture: &Capture) -> Self {
        Self {
            id: capture.id.clone(),
            title: or_placeholder(&capture.title, UNTITLED),
            alt: or_placeholder(&capture.title, DEFAULT_ALT),
            date: capture.date.clone(),
            location: or_placeholder(&capture.location, UNKNOWN_LOCATION),
            exposure_time: detail(&capture.exposure_time, UNKNOWN_EXPOSURE),
            focal_length: detail(&capture.focal_length, UNKNOWN_FOCAL_LENGTH),
            pixel_size: detail(&capture.pixel_size, UNKNOWN_PIXEL_SIZE),
            description: capture.description.clone(),
            tags: capture.tags.clone(),
            raw_url: capture.raw_url.clone(),
            processed_url: capture.processed_url.clone(),
        }
    }
}

impl CardView {
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        let _ = write!(
            html,
            r#"<div class="capture-card" data-id="{id}" data-raw="{raw}" data-processed="{processed}">
  <div class="card-image">
    <img src="{processed}" alt="{alt}">
  </div>
  <div class="card-content">
    <h2 class="card-title">{title}</h2>
    <div class="card-meta">
      <span><i class="far fa-calendar"></i> {date}</span>
      <span><i class="fas fa-clock"></i> {exposure}</span>
      <span><i class="fas fa-map-marker-alt"></i> {location}</span>
    </div>
    <div class="card-meta">
      <span><i class="fas fa-camera"></i> {focal}</span>
      <span><i class="fas fa-microchip"></i> {pixel}</span>
    </div>
"#,
            id = escape_html(&self.id),
            raw = escape_html(&self.raw_url),
            processed = escape_html(&self.processed_url),
            alt = escape_html(&self.alt),
            title = escape_html(&self.title),
            date = escape_html(&self.date),
            exposure = escape_html(&self.exposure_time),
            location = escape_html(&self.location),
            focal = escape_html(&self.focal_length),
            pixel = escape_html(&self.pixel_size),
        );

        if !self.description.is_empty() {
            let _ = writeln!(
                html,
                r#"    <p class="card-description">{}</p>"#,
                escape_html(&self.description)
            );
        }

        if !self.tags.is_empty() {
            html.push_str(r#"    <ul class="card-tags">"#);
            for tag in &self.tags {
                let _ = write!(html, "<li>{}</li>", escape_html(tag));
            }
            html.push_str("</ul>\n");
        }

        html.push_str("  </div>\n</div>\n");
        html
    }
}

/// Full replacement markup for the grid; the empty-state block when there
/// is nothing to show.
pub fn render_gallery(captures: &[Capture]) -> String {
    if captures.is_empty() {
        return EMPTY_STATE.to_string();
    }

    captures
        .iter()
        .map(|capture| CardView::from(capture).to_html())
        .collect()
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::tests::capture;

    #[test]
    fn empty_list_renders_placeholder() {
        let html = render_gallery(&[]);
        assert!(html.contains("empty-state"));
        assert!(html.contains("No images found"));
    }

    #[test]
    fn cards_carry_both_image_urls() {
        let html = render_gallery(&[capture("2024-01-01", "m42", "Orion Nebula", "Chile")]);

        assert!(html.contains(r#"data-raw="/images/2024-01-01/m42/raw.jpg""#));
        assert!(html.contains(r#"data-processed="/images/2024-01-01/m42/processed.jpg""#));
        assert!(html.contains(r#"<h2 class="card-title">Orion Nebula</h2>"#));
        assert!(!html.contains("empty-state"));
        assert!(!html.contains("card-description"));
        assert!(!html.contains("card-tags"));
    }

    #[test]
    fn one_card_per_capture() {
        let html = render_gallery(&[
            capture("2024-01-01", "a", "A", ""),
            capture("2024-01-02", "b", "B", ""),
        ]);
        assert_eq!(html.matches(r#"class="capture-card""#).count(), 2);
    }

    #[test]
    fn placeholders_fill_missing_text() {
        let card = CardView::from(&capture("2024-01-01", "a", "", ""));
        assert_eq!(card.title, UNTITLED);
        assert_eq!(card.alt, DEFAULT_ALT);
        assert_eq!(card.location, UNKNOWN_LOCATION);
        assert_eq!(card.exposure_time, UNKNOWN_EXPOSURE);
        assert_eq!(card.focal_length, UNKNOWN_FOCAL_LENGTH);
        assert_eq!(card.pixel_size, UNKNOWN_PIXEL_SIZE);
    }

    #[test]
    fn text_is_escaped() {
        let mut risky = capture("2024-01-01", "a", "<script>alert(1)</script>", "");
        risky.tags = vec!["a&b".into()];
        let html = render_gallery(&[risky]);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<li>a&amp;b</li>"));
    }
}
