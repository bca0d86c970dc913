// Typing-practice core: InScript transliteration, live metrics, lesson
// sessions and progress, and the prohibited-content filter. The terminal
// front-end in main.rs is a thin layer over these modules.

pub mod config;
pub mod engine;
pub mod keyboard;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod text;
