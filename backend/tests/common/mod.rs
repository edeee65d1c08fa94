mod fixtures;
pub use fixtures::*;

pub use tumorscan::routes::configure_routes;
