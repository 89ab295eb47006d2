// SPDX-License-Identifier: Apache-2.0

//! Copy bridges between the two read directions. A producer that naturally
//! supports only one direction implements [`FillSource`] or [`SpanSource`] and
//! wraps itself in the matching adapter to obtain the full [`Provider`]
//! surface, at the cost of exactly one copy pass on the bridged path.

use crate::provider::{drain_to_buffer, OneShot, Provider, Result};
use crate::span::{SpanList, SpanListMut};

/// A byte source that can natively push its data into caller-supplied spans.
pub trait FillSource {
	/// Returns the byte length of the data.
	fn size(&self) -> usize;

	/// Writes the data in order across the spans of `dest`, whose total size
	/// must equal [`size`](Self::size).
	fn fill_into(&mut self, dest: &mut SpanListMut<'_>) -> Result;
}

/// A byte source that natively holds its data in spans it owns or borrows.
pub trait SpanSource {
	/// Returns the byte length of the data.
	fn size(&self) -> usize;

	/// Returns the data as a span list borrowing from the source.
	fn as_spans(&mut self) -> Result<SpanList<'_>>;
}

/// Pull-from-push bridge: implements [`Provider::as_spans`] for a
/// [`FillSource`] by draining it once into an owned contiguous buffer and
/// exposing a single-span view over that buffer. The buffer lives as long as
/// the adapter, upholding the spans-valid-until-destruction guarantee.
#[derive(Debug, Default)]
pub struct BufferingAdapter<S> {
	source: S,
	buffer: Option<Box<[u8]>>,
	used: OneShot,
}

impl<S: FillSource> BufferingAdapter<S> {
	pub fn new(source: S) -> Self {
		Self { source, buffer: None, used: OneShot::default() }
	}

	/// Unwraps the adapter, returning the inner source.
	pub fn into_inner(self) -> S { self.source }
}

impl<S: FillSource> Provider for BufferingAdapter<S> {
	fn size(&self) -> usize { self.source.size() }

	fn fill_into(&mut self, dest: &mut SpanListMut<'_>) -> Result {
		self.used.claim();
		self.source.fill_into(dest)
	}

	fn as_spans(&mut self) -> Result<SpanList<'_>> {
		self.used.claim();
		let buffer = drain_to_buffer(self.source.size(), |dest| {
			self.source.fill_into(dest)
		})?;
		Ok(SpanList::single(self.buffer.insert(buffer)))
	}
}

/// Push-from-pull bridge: implements [`Provider::fill_into`] for a
/// [`SpanSource`] by copying byte-for-byte from the source's spans into the
/// destination's, with no alignment requirement between the two lists'
/// segment boundaries.
#[derive(Debug, Default)]
pub struct CopyingAdapter<S> {
	source: S,
	used: OneShot,
}

impl<S: SpanSource> CopyingAdapter<S> {
	pub fn new(source: S) -> Self {
		Self { source, used: OneShot::default() }
	}

	/// Unwraps the adapter, returning the inner source.
	pub fn into_inner(self) -> S { self.source }
}

impl<S: SpanSource> Provider for CopyingAdapter<S> {
	fn size(&self) -> usize { self.source.size() }

	fn fill_into(&mut self, dest: &mut SpanListMut<'_>) -> Result {
		self.used.claim();
		self.source.as_spans()?.copy_into(dest);
		Ok(())
	}

	fn as_spans(&mut self) -> Result<SpanList<'_>> {
		self.used.claim();
		self.source.as_spans()
	}
}
