//! # bx-ws
//!
//! BTCEXA WebSocket subscriptions.
//!
//! - **Channels** (`channels`): channel names and `<channel>|<json>` frames
//! - **Streams** (`stream`): `StreamClient`, one socket per subscription

pub mod channels;
pub mod stream;

pub use stream::StreamClient;
