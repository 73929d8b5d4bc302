//! Remote Data Gateway - typed access to the backend and static origin
//!
//! This module provides:
//! - Gateway trait for transport abstraction
//! - HttpGateway implementation (reqwest)
//! - MockGateway for tests
//! - Resource addressing and cache-defeating tokens

pub mod client;
pub mod http;
pub mod mock;
pub mod resource;

pub use client::{BACKEND_UNAVAILABLE, Gateway, Payload, TransportError};
pub use http::{HttpGateway, HttpGatewayConfig, StaticOrigin};
pub use mock::{GatewayCall, MockGateway};
pub use resource::{CacheBuster, FetchParams, Resource, StaticResource};
