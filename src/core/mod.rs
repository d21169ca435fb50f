//! Core functionality for MAC address management
//!
//! Contains the address type, interface queries and the platform-specific
//! change sequences.

pub mod dispatcher;
pub mod interface;
pub mod mac;

pub use dispatcher::{ApplyStrategy, Architecture, Dispatcher};
pub use interface::{InterfaceQuery, InterfaceType};
pub use mac::{MacAddress, MacParseError, generate_random_mac, is_valid_mac_syntax};
