// Domain layer: records, ports and the invoice services.

pub mod columns;
pub mod model;
pub mod ports;

pub mod services;
