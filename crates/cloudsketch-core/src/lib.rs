//! # Cloudsketch Core
//!
//! Shared types for cloudsketch architecture diagrams: geometry, colors,
//! the card catalog and the diagram data model. Parsing lives in
//! `cloudsketch-parser`; layout, routing and rendering in `cloudsketch`.

pub mod catalog;
pub mod color;
pub mod geometry;
pub mod semantic;
