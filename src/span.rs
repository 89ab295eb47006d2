// SPDX-License-Identifier: Apache-2.0

//! Non-owning span lists. A span is a plain slice; a span list strings several
//! non-contiguous slices together into one logical byte sequence, for producers
//! and consumers that deal in scatter/gather memory.

use std::cmp::min;
use std::slice::{Iter, IterMut};

/// An ordered, append-only list of read-only spans forming one logical byte
/// sequence. The list owns no memory, only the list structure; every span
/// borrows from its backing buffer for `'d`.
#[derive(Clone, Debug, Default)]
pub struct SpanList<'d> {
	spans: Vec<&'d [u8]>,
}

impl<'d> SpanList<'d> {
	/// Returns a new, empty span list.
	pub fn new() -> Self { Self::default() }

	/// Returns a list holding the single span `span`.
	pub fn single(span: &'d [u8]) -> Self {
		Self { spans: vec![span] }
	}

	/// Appends a span to the end of the list.
	pub fn append(&mut self, span: &'d [u8]) {
		self.spans.push(span);
	}

	/// Returns the number of spans.
	pub fn count(&self) -> usize { self.spans.len() }

	/// Returns the span at `index`.
	///
	/// # Panics
	///
	/// Panics if `index >= count()`.
	pub fn get(&self, index: usize) -> &'d [u8] {
		self.spans[index]
	}

	/// Returns the total byte length across all spans.
	pub fn total_size(&self) -> usize {
		self.spans.iter().map(|s| s.len()).sum()
	}

	/// Iterates over the spans in order.
	pub fn iter(&self) -> Iter<'_, &'d [u8]> { self.spans.iter() }

	/// Copies every byte of this list into `dest`, in order, advancing through
	/// both lists with independent cursors so span boundaries need not line up
	/// on either side. Exactly one pass over `total_size()` bytes.
	///
	/// # Panics
	///
	/// Panics if the total sizes of the two lists differ; mismatched sizes are
	/// a contract violation between producer and consumer, not an IO failure.
	pub fn copy_into(&self, dest: &mut SpanListMut<'_>) {
		assert_eq!(
			self.total_size(), dest.total_size(),
			"source and destination span lists should hold the same byte count"
		);

		let mut index = 0;
		let mut offset = 0;
		for span in dest.iter_mut() {
			let mut filled = 0;
			while filled < span.len() {
				let src = self.spans[index];
				if offset == src.len() {
					index += 1;
					offset = 0;
					continue
				}

				let len = min(span.len() - filled, src.len() - offset);
				span[filled..filled + len].copy_from_slice(&src[offset..offset + len]);
				filled += len;
				offset += len;
			}
		}
	}
}

impl<'d> Extend<&'d [u8]> for SpanList<'d> {
	fn extend<T: IntoIterator<Item = &'d [u8]>>(&mut self, iter: T) {
		self.spans.extend(iter)
	}
}

impl<'a, 'd> IntoIterator for &'a SpanList<'d> {
	type Item = &'a &'d [u8];
	type IntoIter = Iter<'a, &'d [u8]>;
	fn into_iter(self) -> Self::IntoIter { self.iter() }
}

/// An ordered, append-only list of writable spans, for producers filling
/// caller-supplied memory. Structurally identical to [`SpanList`]; a read-only
/// view can be taken with [`as_read_only`](Self::as_read_only), but mutable
/// access can never be derived from a read-only list.
#[derive(Debug, Default)]
pub struct SpanListMut<'d> {
	spans: Vec<&'d mut [u8]>,
}

impl<'d> SpanListMut<'d> {
	/// Returns a new, empty span list.
	pub fn new() -> Self { Self::default() }

	/// Returns a list holding the single span `span`.
	pub fn single(span: &'d mut [u8]) -> Self {
		Self { spans: vec![span] }
	}

	/// Appends a span to the end of the list.
	pub fn append(&mut self, span: &'d mut [u8]) {
		self.spans.push(span);
	}

	/// Returns the number of spans.
	pub fn count(&self) -> usize { self.spans.len() }

	/// Returns a read-only borrow of the span at `index`.
	///
	/// # Panics
	///
	/// Panics if `index >= count()`.
	pub fn get(&self, index: usize) -> &[u8] {
		&self.spans[index]
	}

	/// Returns the span at `index`.
	///
	/// # Panics
	///
	/// Panics if `index >= count()`.
	pub fn get_mut(&mut self, index: usize) -> &mut [u8] {
		self.spans[index]
	}

	/// Returns the total byte length across all spans.
	pub fn total_size(&self) -> usize {
		self.spans.iter().map(|s| s.len()).sum()
	}

	/// Iterates over the spans in order.
	pub fn iter_mut(&mut self) -> IterMut<'_, &'d mut [u8]> {
		self.spans.iter_mut()
	}

	/// Returns a read-only view over the same spans. No bytes are copied; the
	/// view reborrows each span for the duration of the borrow of `self`.
	pub fn as_read_only(&self) -> SpanList<'_> {
		SpanList { spans: self.spans.iter().map(|s| &s[..]).collect() }
	}
}

impl<'d> Extend<&'d mut [u8]> for SpanListMut<'d> {
	fn extend<T: IntoIterator<Item = &'d mut [u8]>>(&mut self, iter: T) {
		self.spans.extend(iter)
	}
}
