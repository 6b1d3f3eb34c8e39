//! Coach Bot — WhatsApp career-coach webhook glue.

pub mod bot;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod llm;
pub mod voice;
pub mod webhook;
pub mod whatsapp;
