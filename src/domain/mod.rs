// Domain layer: core models and ports (the store / data layer interfaces the host provides).

pub mod model;
pub mod ports;
