// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;
use provio::{FillSource, Provider, ProviderFailed, Result, SpanList, SpanListMut, SpanSource};

/// Concatenates a span list into one contiguous vector.
pub fn concat(spans: &SpanList<'_>) -> Vec<u8> {
	spans.iter().flat_map(|s| s.iter().copied()).collect()
}

/// Maps arbitrary cut seeds onto sorted, deduplicated boundaries of `len`,
/// always including `0` and `len`.
pub fn boundaries(len: usize, cuts: &[usize]) -> Vec<usize> {
	let mut bounds: Vec<usize> = cuts.iter().map(|c| c % (len + 1)).collect();
	bounds.push(0);
	bounds.push(len);
	bounds.sort_unstable();
	bounds.dedup();
	bounds
}

/// Splits `data` into contiguous chunks at the given cut seeds.
pub fn chunks(data: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
	boundaries(data.len(), cuts)
		.windows(2)
		.map(|w| data[w[0]..w[1]].to_vec())
		.collect()
}

/// Allocates zeroed destination chunks totalling `len` bytes, split at the
/// given cut seeds.
pub fn zeroed_chunks(len: usize, cuts: &[usize]) -> Vec<Vec<u8>> {
	boundaries(len, cuts)
		.windows(2)
		.map(|w| vec![0; w[1] - w[0]])
		.collect()
}

/// A push-native source serving a fixed byte sequence, counting fill passes.
pub struct PushBytes {
	data: Vec<u8>,
	pub fills: usize,
}

impl PushBytes {
	pub fn new(data: impl Into<Vec<u8>>) -> Self {
		Self { data: data.into(), fills: 0 }
	}
}

impl FillSource for PushBytes {
	fn size(&self) -> usize { self.data.len() }

	fn fill_into(&mut self, dest: &mut SpanListMut<'_>) -> Result {
		self.fills += 1;
		SpanList::single(&self.data).copy_into(dest);
		Ok(())
	}
}

/// A pull-native source holding its data pre-split into spans.
pub struct SpanBytes {
	chunks: Vec<Vec<u8>>,
}

impl SpanBytes {
	pub fn new(chunks: impl IntoIterator<Item = impl Into<Vec<u8>>>) -> Self {
		Self { chunks: chunks.into_iter().map(Into::into).collect() }
	}
}

impl SpanSource for SpanBytes {
	fn size(&self) -> usize {
		self.chunks.iter().map(Vec::len).sum()
	}

	fn as_spans(&mut self) -> Result<SpanList<'_>> {
		let mut list = SpanList::new();
		for chunk in &self.chunks {
			list.append(chunk);
		}
		Ok(list)
	}
}

/// A provider over owned bytes that counts its reads through a shared cell
/// and can be made to fail every read.
pub struct CountingProvider {
	data: Vec<u8>,
	fail: bool,
	reads: Rc<Cell<usize>>,
}

impl CountingProvider {
	pub fn new(data: impl Into<Vec<u8>>) -> Self {
		Self { data: data.into(), fail: false, reads: Rc::default() }
	}

	pub fn failing(data: impl Into<Vec<u8>>) -> Self {
		Self { fail: true, ..Self::new(data) }
	}

	/// Returns a handle onto the read counter, usable after the provider has
	/// been moved into a wrapper.
	pub fn read_count(&self) -> Rc<Cell<usize>> { self.reads.clone() }
}

impl Provider for CountingProvider {
	fn size(&self) -> usize { self.data.len() }

	fn fill_into(&mut self, dest: &mut SpanListMut<'_>) -> Result {
		self.reads.set(self.reads.get() + 1);
		if self.fail { return Err(ProviderFailed) }
		SpanList::single(&self.data).copy_into(dest);
		Ok(())
	}

	fn as_spans(&mut self) -> Result<SpanList<'_>> {
		self.reads.set(self.reads.get() + 1);
		if self.fail { return Err(ProviderFailed) }
		Ok(SpanList::single(&self.data))
	}
}
