//! Deepbrief Gateway - HTTP service boundary over the research engine

pub mod server;

pub use server::{start_gateway, BriefResponse, GatewayConfig};
