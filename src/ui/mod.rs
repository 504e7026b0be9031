//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer reads the mounted page and the surface written by frame
//! callbacks and turns them into cells on the terminal.  It never mutates
//! application state.

pub mod layout;
pub mod page_widget;
pub mod theme;
