//! Selection, styling and the per-view session that ties layout, state and
//! animation together for a drawing surface.

mod selection;
mod session;
mod state;
pub mod style;

pub use selection::{SelectionChange, highlight, hover, reset, select};
pub use session::{GraphEvent, GraphSession, ViewConfig};
pub use state::{Tissue, ViewMode, ViewState};
pub use style::{EdgeStyle, NodeStyle, resolve_edge, resolve_node};
