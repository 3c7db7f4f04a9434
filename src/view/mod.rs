//! Interaction state layered over a laid-out graph: selection and highlight,
//! kind filters and search, and the pan/zoom transform, all owned by a
//! [`Session`].

mod filter;
mod highlight;
mod session;
mod transform;

pub use filter::FilterState;
pub use highlight::{Emphasis, HighlightState, connected_set};
pub use session::{SelectListener, Session};
pub use transform::{MAX_ZOOM, MIN_ZOOM, ViewTransform, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};
