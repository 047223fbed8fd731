// Domain layer: billing records and ports (interfaces). No external dependencies beyond std/serde/chrono.

pub mod model;
pub mod ports;
