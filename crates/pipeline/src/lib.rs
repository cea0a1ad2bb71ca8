//! Client for the remote production pipeline.
//!
//! The pipeline lives on a separate server that exposes a command-execution
//! HTTP endpoint. [`client::PipelineClient`] submits commands and checks the
//! server's health; [`watcher`] polls the storage-side status document to
//! detect stage completion after a command has been submitted.

pub mod client;
pub mod watcher;

pub use client::{CommandOutput, PipelineClient, PipelineError};
pub use watcher::{watch_stage, StageOutcome, WatcherConfig};
