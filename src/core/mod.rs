//! Core module - The line-copying engine
//!
//! This module provides:
//! - Run configuration and state (model)
//! - Error model
//! - Input capabilities (files, stdin) behind a substitutable trait
//! - Line reader and output writer
//! - Per-input processing and the multi-input runner

pub mod error;
pub mod model;
pub mod processor;
pub mod reader;
pub mod runner;
pub mod source;
pub mod writer;
