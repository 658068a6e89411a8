//! Foundation layer - the gateway boundary types.
//!
//! This module contains the shapes exchanged with the transport:
//! - [`GatewayEvent`] and [`InvocationContext`] coming in
//! - [`GatewayResponse`] going out
//! - [`Headers`], the insertion-ordered header map used by both envelopes

pub mod event;
pub mod headers;
pub mod response;

pub use event::{GatewayEvent, InvocationContext};
pub use headers::Headers;
pub use response::GatewayResponse;
