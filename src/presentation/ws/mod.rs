#[allow(clippy::module_inception)]
mod ws;

pub use ws::*;
