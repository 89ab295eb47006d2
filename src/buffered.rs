// SPDX-License-Identifier: Apache-2.0

use log::debug;
use crate::provider::{drain_to_buffer, OneShot, Provider, ProviderFailed, Result};
use crate::span::{SpanList, SpanListMut};

/// A provider serving data from a single contiguous buffer it exclusively
/// owns. The buffer lives exactly as long as the provider.
#[derive(Debug, Default)]
pub struct BufferedProvider {
	buffer: Box<[u8]>,
	used: OneShot,
}

impl BufferedProvider {
	/// Drains another provider, taking ownership of its data. The drain
	/// happens here and now; a failing source fails construction.
	pub fn from_provider(source: &mut impl Provider) -> Result<Self> {
		let buffer = drain_to_buffer(source.size(), |dest| source.fill_into(dest))?;
		Ok(Self { buffer, used: OneShot::default() })
	}

	/// Copies `data` into a new owned buffer.
	pub fn from_slice(data: &[u8]) -> Self {
		Self { buffer: data.into(), used: OneShot::default() }
	}

	/// Allocates a zeroed buffer of `size` bytes for the creator to fill
	/// through [`buffer_mut`](Self::buffer_mut) before the first read.
	pub fn with_size(size: usize) -> Self {
		Self { buffer: vec![0; size].into_boxed_slice(), used: OneShot::default() }
	}

	/// Returns write access to the owned buffer, for the producer-fills-later
	/// pattern of [`with_size`](Self::with_size). Only meaningful before the
	/// data has been read.
	pub fn buffer_mut(&mut self) -> &mut [u8] { &mut self.buffer }
}

impl Provider for BufferedProvider {
	fn size(&self) -> usize { self.buffer.len() }

	fn fill_into(&mut self, dest: &mut SpanListMut<'_>) -> Result {
		self.used.claim();
		SpanList::single(&self.buffer).copy_into(dest);
		Ok(())
	}

	fn as_spans(&mut self) -> Result<SpanList<'_>> {
		self.used.claim();
		Ok(SpanList::single(&self.buffer))
	}
}

/// Wraps another provider and behaves exactly like it, down to failing in the
/// same places; internally, sources at or below a size threshold are eagerly
/// copied into an owned [`BufferedProvider`] at construction, releasing the
/// wrapped source's origin (a socket, say) before the data is consumed.
///
/// A failed eager copy is *not* surfaced at construction. The failure is
/// recorded and returned from the first read instead, so the wrapper's
/// externally observable behavior, including when a failure becomes visible,
/// is identical whether or not it chose to buffer.
#[derive(Debug)]
pub struct MaybeBuffered<P> {
	size: usize,
	inner: P,
	buffered: Option<BufferedProvider>,
	failed: bool,
	used: OneShot,
}

impl<P: Provider> MaybeBuffered<P> {
	pub fn new(mut inner: P, threshold: usize) -> Self {
		let size = inner.size();
		let mut buffered = None;
		let mut failed = false;
		if size <= threshold {
			match BufferedProvider::from_provider(&mut inner) {
				Ok(provider) => buffered = Some(provider),
				Err(ProviderFailed) => {
					debug!("eager copy of {size} byte source failed; deferring failure to first read");
					failed = true;
				}
			}
		}
		Self { size, inner, buffered, failed, used: OneShot::default() }
	}

	/// Returns `true` if the wrapped source was copied at construction.
	pub fn is_buffered(&self) -> bool { self.buffered.is_some() }
}

impl<P: Provider> Provider for MaybeBuffered<P> {
	fn size(&self) -> usize { self.size }

	fn fill_into(&mut self, dest: &mut SpanListMut<'_>) -> Result {
		self.used.claim();
		if self.failed { return Err(ProviderFailed) }
		match &mut self.buffered {
			Some(buffered) => buffered.fill_into(dest),
			None => self.inner.fill_into(dest),
		}
	}

	fn as_spans(&mut self) -> Result<SpanList<'_>> {
		self.used.claim();
		if self.failed { return Err(ProviderFailed) }
		match &mut self.buffered {
			Some(buffered) => buffered.as_spans(),
			None => self.inner.as_spans(),
		}
	}
}
