//! Browser-side gallery logic, independent of any DOM binding.
//!
//! [`GalleryView`] owns the dataset and the search/sort controls and
//! produces the grid markup; [`ModalViewer`] tracks the full-size viewer.
//! The host wires DOM events to these methods and writes the results back.

pub mod client;
pub mod debounce;
pub mod modal;
pub mod page;
pub mod query;
pub mod render;
mod view;

pub use client::ApiClient;
pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use modal::{ImageStatus, ImageVariant, ModalViewer, Point, PointerKind, Target};
pub use page::{render_index, PageParams, PageState, SCRIPT_PATH, STYLESHEET_PATH};
pub use query::{filter_captures, matches_search, sort_captures, SortField, SortOrder};
pub use render::{render_gallery, CardView};
pub use view::GalleryView;
