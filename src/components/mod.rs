pub mod trail;

pub use trail::{Trail, TrailCapacity};
