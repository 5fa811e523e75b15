//! Chatroom server library.
//!
//! Clients join rooms over WebSocket; every message posted to a room is
//! persisted and fanned out by that room's hub. Messages of the form
//! `/stock=SYMBOL` are additionally handed to background workers through a
//! command queue, and the quote they look up comes back into the room as a
//! chat message from the bot user.

pub mod app;
pub mod config;
pub mod connection;
pub mod domain;
pub mod hub;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
pub mod worker;
