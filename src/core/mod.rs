pub mod catalog;
pub mod chat_stream;
pub mod config;
pub mod participant;
pub mod preset;
