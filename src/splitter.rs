// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use log::debug;
use once_cell::unsync::OnceCell;
use crate::provider::{drain_to_buffer, OneShot, Provider, ProviderFailed, Result};
use crate::span::{SpanList, SpanListMut};

/// Fans a single one-shot provider out to multiple independent consumers.
/// Every provider returned by [`branch`](Self::branch) observes the same
/// memoized outcome: the wrapped source is drained at most once, on the first
/// actual read, and the captured bytes (or the captured failure) are shared
/// read-only by all branches regardless of the order they are read in.
///
/// Branches borrow the splitter, so none of them can outlive it or the cached
/// buffer it owns.
pub struct Splitter<P> {
	size: usize,
	source: RefCell<Option<P>>,
	cached: OnceCell<Result<Box<[u8]>>>,
}

impl<P: Provider> Splitter<P> {
	pub fn new(source: P) -> Self {
		Self {
			size: source.size(),
			source: RefCell::new(Some(source)),
			cached: OnceCell::new(),
		}
	}

	/// Returns a new single-read provider over the shared outcome.
	pub fn branch(&self) -> Branch<'_, P> {
		Branch { splitter: self, used: OneShot::default() }
	}

	/// Drains the source on the first call; afterwards, returns the cached
	/// bytes or the cached failure, never recomputing either.
	fn drained(&self) -> Result<&[u8]> {
		let outcome = self.cached.get_or_init(|| {
			let mut source = self.source
				.borrow_mut()
				.take()
				.expect("the source should still be held on first drain");
			let drained = drain_to_buffer(source.size(), |dest| source.fill_into(dest));
			if drained.is_err() {
				debug!("draining a split source failed; every branch will fail");
			}
			drained
		});
		match outcome {
			Ok(buffer) => Ok(buffer),
			Err(failed) => Err(*failed),
		}
	}
}

/// One consumer's handle onto a [`Splitter`]'s shared outcome. Each branch is
/// independently single-read.
pub struct Branch<'s, P> {
	splitter: &'s Splitter<P>,
	used: OneShot,
}

impl<P: Provider> Provider for Branch<'_, P> {
	fn size(&self) -> usize { self.splitter.size }

	fn fill_into(&mut self, dest: &mut SpanListMut<'_>) -> Result {
		self.used.claim();
		SpanList::single(self.splitter.drained()?).copy_into(dest);
		Ok(())
	}

	fn as_spans(&mut self) -> Result<SpanList<'_>> {
		self.used.claim();
		Ok(SpanList::single(self.splitter.drained()?))
	}
}
