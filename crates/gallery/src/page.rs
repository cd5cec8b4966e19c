//! Server-rendered page shell. It ships with an empty gallery; the client
//! fetches `/api/captures` and renders the grid itself.

use std::fmt::Write as _;

use serde::Deserialize;

use crate::query::{SortField, SortOrder};
use crate::render::escape_html;

/// Stylesheet and client bundle the page links. The host serves them from
/// its public directory; this crate does not ship them.
pub const STYLESHEET_PATH: &str = "/css/style.css";
pub const SCRIPT_PATH: &str = "/js/gallery.js";

/// `GET /` query parameters, passed through to the initial control state.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageParams {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageState {
    pub search: String,
    pub sort: SortField,
    pub order: SortOrder,
}

impl PageParams {
    pub fn resolve(&self) -> PageState {
        PageState {
            search: self.search.clone().unwrap_or_default(),
            sort: self
                .sort
                .as_deref()
                .map(SortField::from_param)
                .unwrap_or_default(),
            order: self
                .order
                .as_deref()
                .map(SortOrder::from_param)
                .unwrap_or_default(),
        }
    }
}

fn option(html: &mut String, value: &str, label: &str, selected: bool) {
    let selected = if selected { " selected" } else { "" };
    let _ = writeln!(html, r#"        <option value="{value}"{selected}>{label}</option>"#);
}

pub fn render_index(state: &PageState, debounce_ms: u64) -> String {
    let mut sort_options = String::new();
    for (field, label) in [
        (SortField::Date, "Date"),
        (SortField::Title, "Title"),
        (SortField::Location, "Location"),
    ] {
        option(&mut sort_options, field.as_str(), label, state.sort == field);
    }

    let mut order_options = String::new();
    for (order, label) in [(SortOrder::Desc, "Newest first"), (SortOrder::Asc, "Oldest first")] {
        option(&mut order_options, order.as_str(), label, state.order == order);
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Cosmic Captures</title>
  <link rel="stylesheet" href="{stylesheet}">
</head>
<body>
  <header>
    <h1><i class="fas fa-star"></i> Cosmic Captures</h1>
    <form class="search-form" action="/" method="get">
      <input type="text" name="search" value="{search}" placeholder="Search captures">
      <select name="sort">
{sort_options}      </select>
      <select name="order">
{order_options}      </select>
      <button type="submit" class="search-button"><i class="fas fa-search"></i></button>
    </form>
  </header>
  <main class="gallery" data-debounce-ms="{debounce_ms}"></main>
  <div id="image-modal" class="modal">
    <div class="modal-content">
      <span class="modal-close">&times;</span>
      <div class="modal-image-wrapper">
        <div id="image-loading" class="image-loading"><i class="fas fa-spinner fa-spin"></i></div>
        <img id="modal-image" alt="">
        <div class="modal-zoom-controls">
          <button id="zoom-in-btn"><i class="fas fa-search-plus"></i></button>
          <button id="zoom-out-btn"><i class="fas fa-search-minus"></i></button>
          <button id="zoom-reset-btn"><i class="fas fa-compress"></i></button>
        </div>
      </div>
      <div class="modal-info">
        <h2 id="modal-title"></h2>
        <div class="view-buttons">
          <button id="modal-raw-btn">Raw</button>
          <button id="modal-processed-btn" class="active">Processed</button>
        </div>
        <p><span id="modal-date"></span> <span id="modal-exposure-time"></span> <span id="modal-location"></span></p>
        <p><span id="modal-focal-length"></span> <span id="modal-pixel-size"></span></p>
        <p id="modal-description"></p>
        <ul id="modal-tags"></ul>
      </div>
    </div>
  </div>
  <script src="{script}"></script>
</body>
</html>
"#,
        search = escape_html(&state.search),
        stylesheet = STYLESHEET_PATH,
        script = SCRIPT_PATH,
    )
}
