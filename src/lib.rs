// Module layout
// - domain: marketplace entities and their rules
// - application: ports, access policies and use cases
// - infrastructure: Postgres, S3 and realtime adapters
// - presentation: HTTP RPC handlers and the websocket
// - bootstrap: configuration and wiring

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
