// Domain layer: profile records and the browser port. No browser-specific dependencies.

pub mod model;
pub mod ports;
