//! 批量收集模块：按容量阈值或静默时长触发的去抖动批量缓冲。
//!
//! # Batch Collection Module
//!
//! This module provides the batching buffer itself: items submitted one at a
//! time are grouped into ordered batches for a single downstream worker,
//! amortizing the cost of a bulk operation while bounding both batch size and
//! maximum latency.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Collector`] | Owns the buffer, the quiescence timer, and the flush protocol |
//! | [`CollectorConfig`] | Size threshold, quiescence duration, threshold policy |
//! | [`ThresholdPolicy`] | `AtLeast` (`>=`, default) or `Exceeds` (`>`) comparison |
//!
//! ## Flush Triggers
//!
//! - **Size**: the buffer length meets the configured threshold policy.
//! - **Quiescence**: no new submission for the configured duration; each
//!   arrival resets the timer.
//! - **Drain**: items that arrive while a worker call is in flight are
//!   flushed back-to-back once it returns, with no fresh quiescence wait.
//!
//! Exactly one worker invocation runs at a time per collector instance.

mod config;
mod core;
mod timer;

pub use self::config::{CollectorConfig, ThresholdPolicy};
pub use self::core::Collector;
