// SPDX-License-Identifier: Apache-2.0

use std::result;
use crate::span::{SpanList, SpanListMut};

/// The contentless failure signal shared by all providers: the byte source
/// could not produce its data, abandon this read. It deliberately carries no
/// diagnostic payload; the signal is addressed to the *consumer* of the
/// provider, not its creator. Producers should record the cause through their
/// own channel (typically [`log`]) at the point of failure before returning it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, thiserror::Error)]
#[error("data provider failed")]
pub struct ProviderFailed;

pub type Result<T = ()> = result::Result<T, ProviderFailed>;

/// A one-shot readable byte source.
///
/// Conceptually a provider is a read-only array of bytes; concrete
/// implementations represent different origins of those bytes (owned buffers,
/// sockets, other providers). Its data can be requested **at most once**, by
/// exactly one of the two read operations, so that sources reading off a
/// socket or other single-use origin can implement it directly. A second read
/// of either kind panics; it is a programmer error, not a recoverable result.
///
/// Reading the data is not mandatory. A provider whose data must be drained
/// regardless is responsible for doing so in its own teardown.
pub trait Provider {
	/// Returns the byte length of the data. Pure; callable any number of
	/// times, before or after the read.
	fn size(&self) -> usize;

	/// Writes the data in order across the spans of `dest`, whose total size
	/// must equal [`size`](Self::size).
	fn fill_into(&mut self, dest: &mut SpanListMut<'_>) -> Result;

	/// Returns the data as a span list. The returned spans borrow from the
	/// provider, so they remain valid until it is destroyed and no longer.
	fn as_spans(&mut self) -> Result<SpanList<'_>>;
}

impl<P: Provider + ?Sized> Provider for &mut P {
	fn size(&self) -> usize { (**self).size() }

	fn fill_into(&mut self, dest: &mut SpanListMut<'_>) -> Result {
		(**self).fill_into(dest)
	}

	fn as_spans(&mut self) -> Result<SpanList<'_>> {
		(**self).as_spans()
	}
}

impl<P: Provider + ?Sized> Provider for Box<P> {
	fn size(&self) -> usize { (**self).size() }

	fn fill_into(&mut self, dest: &mut SpanListMut<'_>) -> Result {
		(**self).fill_into(dest)
	}

	fn as_spans(&mut self) -> Result<SpanList<'_>> {
		(**self).as_spans()
	}
}

/// Runtime enforcement of the one-shot read contract. Claimed by both read
/// operations of every provider in this crate; the second claim panics.
#[derive(Debug, Default)]
pub(crate) struct OneShot(bool);

impl OneShot {
	pub fn claim(&mut self) {
		assert!(!self.0, "provider data should be requested at most once");
		self.0 = true;
	}
}

/// Drains a push-style source into a fresh owned buffer through a single-span
/// mutable list. The common pull-from-push machinery behind
/// [`BufferingAdapter`](crate::BufferingAdapter),
/// [`BufferedProvider`](crate::BufferedProvider) and
/// [`Splitter`](crate::Splitter).
pub(crate) fn drain_to_buffer(
	size: usize,
	fill: impl FnOnce(&mut SpanListMut<'_>) -> Result
) -> Result<Box<[u8]>> {
	let mut buffer = vec![0; size].into_boxed_slice();
	let mut dest = SpanListMut::single(&mut buffer);
	fill(&mut dest)?;
	drop(dest);
	Ok(buffer)
}
