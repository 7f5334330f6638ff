pub mod network;
pub mod spec;

pub use network::{DerivativeMode, Network, Prediction};
pub use spec::{NetworkSpec, LayerSpec};
