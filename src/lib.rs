//! Core library for twitch-community-playlist
pub mod config;
pub mod error;
pub mod models;
pub mod api;
pub mod parser;
pub mod classify;
pub mod resolve;
pub mod assemble;
pub mod playlist;
pub mod worker;
