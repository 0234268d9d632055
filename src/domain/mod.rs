// Domain layer: core models and ports (interfaces). No HTTP here.

pub mod model;
pub mod ports;
