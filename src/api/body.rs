// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bounded, incremental request body reads.
//!
//! The body is pulled one frame at a time so the size cap is enforced while
//! data is still arriving, not after the whole thing has been buffered. The
//! task yields between frames, so a slow client only holds its own request.

use std::time::Duration;

use axum::body::Body;
use http_body_util::BodyExt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("body exceeded {limit} bytes")]
    TooLarge { limit: usize },
    #[error("body was not received within {0:?}")]
    TimedOut(Duration),
    #[error("failed to read body: {0}")]
    Read(#[from] axum::Error),
}

/// Read `body` to completion, failing as soon as it grows past `limit` bytes
/// or takes longer than `timeout` in total.
///
/// On failure the rest of the body is left unread and dropped with the
/// returned error.
pub async fn read_bounded(body: Body, limit: usize, timeout: Duration) -> Result<Vec<u8>, BodyError> {
    match tokio::time::timeout(timeout, accumulate(body, limit)).await {
        Ok(result) => result,
        Err(_) => Err(BodyError::TimedOut(timeout)),
    }
}

async fn accumulate(mut body: Body, limit: usize) -> Result<Vec<u8>, BodyError> {
    let mut buf = Vec::new();

    while let Some(frame) = body.frame().await {
        let frame = frame?;
        // Trailers carry no payload.
        let Ok(data) = frame.into_data() else {
            continue;
        };

        if buf.len() + data.len() > limit {
            return Err(BodyError::TooLarge { limit });
        }
        buf.extend_from_slice(&data);
    }

    Ok(buf)
}
