//! Chart Agent - Conversational Chart Generation
//!
//! This crate turns natural-language or flag-based chart requests into
//! rendered chart files, clarifying questions, or rejections, across a
//! single-shot direct mode and a multi-turn conversational mode.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
