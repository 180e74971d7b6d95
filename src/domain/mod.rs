// Domain layer: the coordinate model and the ports the grading pipeline is built on.

pub mod model;
pub mod ports;
