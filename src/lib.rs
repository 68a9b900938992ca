//! Virtual try-on bridge.
//!
//! Sends a person photo and a garment photo to a hosted image model with a
//! fixed instruction and returns the composite image. The same [`SwapBridge`]
//! can reach the model directly, through a relay server, or through a callable
//! function; the `server` feature provides that relay server.

pub mod bridge;
pub mod composer;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;

#[cfg(feature = "server")]
pub mod server;

pub use bridge::{
    CallableClient, GeminiClient, GenerationTransport, RelayClient, SwapBridge,
};
pub use composer::{Composer, SelectedFile, Slot, Uploader, ViewState};
pub use config::{CallableConfig, Config, GeminiConfig, RelayConfig, TransportKind};
pub use error::{Result, SwapError};
pub use models::*;
