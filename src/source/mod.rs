// src/source/mod.rs
pub mod client;

pub use client::load_workbook_bytes;
