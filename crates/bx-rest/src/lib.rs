//! # bx-rest
//!
//! Signed REST client for the BTCEXA exchange.
//!
//! - **Client** (`client`): `BtcexaClient` with the generic `call` and the
//!   table-driven `dispatch`
//! - **Endpoints** (`endpoints`): one declarative definition per REST operation
//! - **Market / Trade / Assets** (`market`, `trade`, `assets`): typed wrappers

pub mod assets;
pub mod client;
pub mod endpoints;
pub mod market;
pub mod trade;

pub use client::BtcexaClient;
pub use endpoints::{EndpointDef, Placement, Verb};
