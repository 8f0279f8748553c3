// Domain layer: quiz models, screen descriptions and ports.

pub mod model;
pub mod ports;
pub mod view;
