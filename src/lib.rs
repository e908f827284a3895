//! Case Export - template-driven report export for assurance cases.
//!
//! Case data flows through a template, which decides what the document
//! contains, and then through an exporter, which writes it as PDF, DOCX or
//! Markdown.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
