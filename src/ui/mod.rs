//! UI / rendering layer: everything that touches Ratatui widgets apart from
//! the page content itself.

pub mod compose;
pub mod layout;
pub mod popup;
pub mod theme;
