//! Multichat is a client-side library for multi-participant AI chat sessions.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the participant configuration store (provider/model
//!   selection, presets, JSON import/export), the embedded model catalog,
//!   and the streaming request client that posts a conversation and decodes
//!   the server's event stream.
//! - [`api`] defines the wire payloads: the request body posted to the
//!   multi-chat endpoint and the tagged events decoded from its response
//!   stream.
//!
//! A UI embedding this crate mutates a [`core::config::MultiChatConfig`]
//! through its update operations, then hands the configuration and message
//! history to [`core::chat_stream::MultiChatClient::send_message`], which
//! dispatches decoded stream events to a caller-supplied
//! [`core::chat_stream::StreamHandler`].

pub mod api;
pub mod core;
pub mod utils;
