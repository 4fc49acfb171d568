// Domain layer: core models, ports and the team-formation services.
// Services are pure and synchronous; all I/O lives behind the ports.

pub mod model;
pub mod ports;

pub mod services;
