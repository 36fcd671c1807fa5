// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Channel-to-pipe routing by z-order.
//!
//! The blender stacks its inputs ("pipes") bottom to top: pipe 0 is the
//! furthest back and every higher pipe is composited source-over onto the
//! result below it. Each enabled channel is routed to one pipe so that pipes
//! follow ascending channel z-order; lower z-order is further back. Equal
//! z-orders keep channel index order.

use crate::caps::MAX_CHANNELS;
use crate::error::ComposeError;

/// How two adjacent pipes are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Upper pipe over lower pipe, weighted by the upper pipe's alpha.
    #[default]
    SourceOver,
}

/// Channel ↔ pipe assignment of one screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipeRoute {
    pipes: usize,
    pipe_of: [Option<usize>; MAX_CHANNELS],
    channel_of: [Option<usize>; MAX_CHANNELS],
    enabled: [bool; MAX_CHANNELS],
}

impl PipeRoute {
    /// Number of pipes (equal to the screen's channel count).
    #[must_use]
    pub const fn pipes(&self) -> usize {
        self.pipes
    }

    /// Pipe driven by `channel`, if the channel is used.
    #[must_use]
    pub fn pipe_of(&self, channel: usize) -> Option<usize> {
        self.pipe_of.get(channel).copied().flatten()
    }

    /// Channel feeding `pipe`, if any.
    #[must_use]
    pub fn channel_of(&self, pipe: usize) -> Option<usize> {
        self.channel_of.get(pipe).copied().flatten()
    }

    /// Whether `pipe` takes part in blending.
    #[must_use]
    pub fn is_enabled(&self, pipe: usize) -> bool {
        self.enabled.get(pipe).copied().unwrap_or(false)
    }

    /// Pipe enable flags, one per pipe.
    #[must_use]
    pub fn enabled(&self) -> &[bool] {
        &self.enabled[..self.pipes]
    }
}

/// Assigns pipes to channels.
///
/// `zorders[c]` is the z-order of channel `c`, or `None` for a channel without
/// enabled layers. On a blank screen the routing is kept but every pipe is
/// disabled.
///
/// # Errors
///
/// [`ComposeError::PipeExhausted`] if there are more channels than pipes.
pub fn resolve(zorders: &[Option<u8>], blank: bool) -> Result<PipeRoute, ComposeError> {
    if zorders.len() > MAX_CHANNELS {
        return Err(ComposeError::PipeExhausted {
            channel: MAX_CHANNELS,
        });
    }
    let mut route = PipeRoute {
        pipes: zorders.len(),
        ..PipeRoute::default()
    };
    let mut next_pipe = 0;
    loop {
        // Strict `<` keeps the lower channel index on ties.
        let mut pick: Option<(usize, u8)> = None;
        for (channel, z) in zorders.iter().enumerate() {
            let Some(z) = *z else { continue };
            if route.pipe_of[channel].is_some() {
                continue;
            }
            if pick.is_none_or(|(_, best)| z < best) {
                pick = Some((channel, z));
            }
        }
        let Some((channel, _)) = pick else { break };
        route.pipe_of[channel] = Some(next_pipe);
        route.channel_of[next_pipe] = Some(channel);
        route.enabled[next_pipe] = !blank;
        next_pipe += 1;
    }
    Ok(route)
}
