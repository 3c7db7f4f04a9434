//! Force-directed viewer core for pre-computed code structure graphs.
//!
//! [`graph`] parses and normalizes the input document, [`layout`] runs the
//! physics and [`view`] holds selection, filters and the view transform. None
//! of these depend on a window; the `codegraph-view` binary puts an egui shell
//! around them.

pub mod graph;
pub mod layout;
pub mod view;
