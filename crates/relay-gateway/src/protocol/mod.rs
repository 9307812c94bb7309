//! Gateway protocol definitions
//!
//! Op codes, close codes, intents, and the frame format of the platform's
//! WebSocket gateway, seen from the client side.

mod close_codes;
mod intents;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use intents::Intents;
pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use payloads::{HelloPayload, IdentifyPayload, IdentifyProperties, ResumePayload};
