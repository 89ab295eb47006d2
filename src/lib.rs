// SPDX-License-Identifier: Apache-2.0

//! ## How it works
//!
//! Everything revolves around the [`Provider`] trait: a one-shot source of
//! bytes that knows its [`size`](Provider::size) and can be read exactly once,
//! in one of two dual directions. A consumer either has the data *pushed*
//! into span lists it supplies ([`fill_into`](Provider::fill_into)) or
//! *pulls* a span list the provider owns or borrows
//! ([`as_spans`](Provider::as_spans)). Neither representation nor direction
//! is canonical; sockets like to push, in-memory blobs like to pull, and
//! protocol encoders want whichever makes the transfer at hand cheap.
//!
//! ### Bridging
//!
//! A producer implements whichever direction it supports natively, as a
//! [`FillSource`] or [`SpanSource`], and wraps itself in [`BufferingAdapter`]
//! or [`CopyingAdapter`] to get the other direction bridged with exactly one
//! copy pass. [`BufferedProvider`] owns a contiguous buffer outright, and
//! [`MaybeBuffered`] eagerly buffers small wrapped sources while behaving,
//! observably, exactly like the unwrapped source, failures included.
//!
//! ### Crossing threads and fanning out
//!
//! [`HandoffProvider`] lends a span list from a producing thread to a reading
//! thread through a single-use, two-phase rendezvous, so data affine to one
//! thread can be consumed under another without a copy. [`Splitter`] turns
//! one single-read provider into any number of branches that all observe the
//! same memoized bytes, or the same memoized failure.
//!
//! ### Failure
//!
//! There is one error, [`ProviderFailed`], and it carries nothing: it tells
//! the consumer to abandon the read. Causes are the producer's business to
//! record (this crate logs its own swallowed failures through `log`).
//! Contract violations, such as reading a provider twice, are programmer
//! errors and panic instead.

mod adapters;
mod buffered;
mod handoff;
mod provider;
mod span;
mod splitter;

pub use adapters::{BufferingAdapter, CopyingAdapter, FillSource, SpanSource};
pub use buffered::{BufferedProvider, MaybeBuffered};
pub use handoff::{HandoffProvider, SideProvider};
pub use provider::{Provider, ProviderFailed, Result};
pub use span::{SpanList, SpanListMut};
pub use splitter::{Branch, Splitter};
