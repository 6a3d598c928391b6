pub mod model;
pub mod network;
pub mod pass;
pub mod prediction;
pub mod topology;

pub use network::Network;
pub use pass::ForwardPass;
pub use prediction::{PredictMode, Prediction};
pub use topology::Topology;
