//! Background tasks and scheduled jobs.
//!
//! Each submodule exposes a long-running async `run` function meant for
//! `tokio::spawn`. Tasks stop when their [`CancellationToken`] fires.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod session_cleanup;
