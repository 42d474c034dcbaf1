mod error;
mod graph;
mod load;
mod parse;

pub use error::ValidationError;
pub use graph::{
    DEFAULT_EDGE_WEIGHT, GeneEdge, GeneNetwork, GeneNode, MIN_NODE_SIZE, RewiringSummary,
    node_size, normalize_weight,
};
pub use load::{DataSources, NetworkBundle, PathBundle, TracedPath, demo_payload, load_bundle};
pub use parse::{
    NetworkPayload, NodeGroup, NodeKind, PathPayload, PathStats, PathStop, PathTrace, RawLink,
    RawNode, RewiringStatus,
};
