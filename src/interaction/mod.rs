//! Event handling for inbound chat messages.
//!
//! Every inbound channel message is acknowledged with a fixed-shape reply;
//! nothing is retained between invocations.

pub mod message;
