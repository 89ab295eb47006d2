// SPDX-License-Identifier: Apache-2.0

//! Cross-thread buffer handoff. One provider's data is naturally produced
//! under one thread's affinity, but a pull-style consumer runs under another;
//! [`HandoffProvider`] splits the transfer into a local surface for the
//! producer and a [`SideProvider`] for the reader, rendezvousing exactly once
//! to lend a span list across the thread boundary without copying it.

use std::slice;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, ThreadId};
use crate::provider::{OneShot, Provider, Result};
use crate::span::{SpanList, SpanListMut};

/// A span captured as a raw pointer so it can cross the thread boundary
/// without a lifetime. Only ever lives inside the rendezvous slot or the side
/// provider, both of which bound its use to the window in which the supplier
/// is blocked.
#[derive(Copy, Clone)]
struct RawSpan {
	ptr: *const u8,
	len: usize,
}

struct RawSpans(Vec<RawSpan>);

// The pointers are lent by a supplier that stays blocked, keeping its borrow
// live, for as long as the receiving side can dereference them.
unsafe impl Send for RawSpans {}

impl RawSpans {
	fn capture(spans: &SpanList<'_>) -> Self {
		Self(
			spans.iter()
				 .map(|s| RawSpan { ptr: s.as_ptr(), len: s.len() })
				 .collect()
		)
	}

	/// # Safety
	///
	/// The buffers behind the captured pointers must still be live, i.e. the
	/// supplier must still be blocked in [`Rendezvous::supply_and_wait`].
	unsafe fn view(&self) -> SpanList<'_> {
		let mut list = SpanList::new();
		for &RawSpan { ptr, len } in &self.0 {
			list.append(slice::from_raw_parts(ptr, len));
		}
		list
	}
}

/// The single-slot, single-use, two-phase handshake channel behind the
/// handoff, with the state machine Idle -> WaitingForSupply/Supplied (either
/// caller may arrive first) -> Done. Re-entering either phase panics.
#[derive(Default)]
struct Rendezvous {
	state: Mutex<RendezvousState>,
	supplied: Condvar,
	done: Condvar,
}

#[derive(Default)]
struct RendezvousState {
	slot: Option<RawSpans>,
	supply_called: bool,
	done: bool,
}

impl Rendezvous {
	/// Supply phase: publishes the spans to the reader, then blocks until the
	/// reader signals completion. Returning hands the borrow back to the
	/// supplier, which may then release the buffers.
	fn supply_and_wait(&self, spans: RawSpans) {
		let mut state = self.state.lock().expect("rendezvous state should not be poisoned");
		assert!(!state.supply_called, "buffers should be supplied at most once");
		state.supply_called = true;
		state.slot = Some(spans);
		self.supplied.notify_one();
		while !state.done {
			state = self.done.wait(state).expect("rendezvous state should not be poisoned");
		}
	}

	/// Reader phase: blocks until the supply phase has published the spans,
	/// then takes them out of the slot.
	fn wait_for_supply(&self) -> RawSpans {
		let mut state = self.state.lock().expect("rendezvous state should not be poisoned");
		while state.slot.is_none() {
			state = self.supplied.wait(state).expect("rendezvous state should not be poisoned");
		}
		state.slot.take().expect("slot should be occupied")
	}

	/// Completion phase: unblocks the supplier. Signaled by the side
	/// provider's teardown whether or not the spans were ever read.
	fn complete(&self) {
		let mut state = self.state.lock().expect("rendezvous state should not be poisoned");
		state.done = true;
		self.done.notify_one();
	}
}

/// Wraps a provider whose data is produced under the current thread's
/// affinity so that a consumer under `reader`'s affinity can pull it.
///
/// The wrapper has two independent surfaces over one rendezvous:
///
/// - the local surface is the [`Provider`] impl, delegating straight to the
///   inner provider for the producer's own use;
/// - the side surface is the [`SideProvider`] returned (once) by
///   [`side_provider`](Self::side_provider), which the producer sends to the
///   reader thread. The producer then lends it data with
///   [`supply_and_wait`](Self::supply_and_wait).
///
/// No timeout is modeled: a rendezvous participant whose counterpart never
/// arrives blocks forever. Take the side provider and move it to the reader
/// *before* supplying, and ensure every supply is eventually answered by the
/// side provider's teardown.
pub struct HandoffProvider<P> {
	inner: P,
	channel: Arc<Rendezvous>,
	side: Option<SideProvider>,
}

impl<P: Provider> HandoffProvider<P> {
	/// Creates the wrapper, declaring `reader` as the thread affinity under
	/// which the side surface will be consumed.
	pub fn new(reader: ThreadId, inner: P) -> Self {
		let channel = Arc::new(Rendezvous::default());
		let side = SideProvider {
			size: inner.size(),
			reader,
			channel: channel.clone(),
			received: None,
			used: OneShot::default(),
		};
		Self { inner, channel, side: Some(side) }
	}

	/// Takes the side surface, to be moved to the reader thread.
	///
	/// # Panics
	///
	/// Panics on the second call; there is exactly one side per handoff.
	pub fn side_provider(&mut self) -> SideProvider {
		self.side
			.take()
			.expect("the side provider should be taken at most once")
	}

	/// Lends `spans` to the side reader and blocks until the reader is done
	/// with them, i.e. until the side provider is dropped. Once this returns,
	/// the reader holds no reference into `spans` and the producer may
	/// release the underlying buffers.
	///
	/// # Panics
	///
	/// Panics on the second call; the handoff is single-use.
	pub fn supply_and_wait(&self, spans: &SpanList<'_>) {
		// The captured pointers borrow from `spans` for the whole blocking
		// call, so they cannot outlive the buffers while the reader can still
		// reach them.
		self.channel.supply_and_wait(RawSpans::capture(spans));
	}
}

impl<P: Provider> Provider for HandoffProvider<P> {
	fn size(&self) -> usize { self.inner.size() }

	fn fill_into(&mut self, dest: &mut SpanListMut<'_>) -> Result {
		self.inner.fill_into(dest)
	}

	fn as_spans(&mut self) -> Result<SpanList<'_>> {
		self.inner.as_spans()
	}
}

/// The reader-side surface of a [`HandoffProvider`]: a provider whose spans
/// arrive from another thread. It does not own the buffer it exposes; the
/// buffer is lent by the supplier for the duration of the handoff and handed
/// back on drop.
pub struct SideProvider {
	size: usize,
	reader: ThreadId,
	channel: Arc<Rendezvous>,
	received: Option<RawSpans>,
	used: OneShot,
}

impl SideProvider {
	fn wait_received(&mut self) -> &RawSpans {
		assert_eq!(
			thread::current().id(), self.reader,
			"the side provider should be read under its declared reader thread"
		);
		if self.received.is_none() {
			self.received = Some(self.channel.wait_for_supply());
		}
		self.received
			.as_ref()
			.expect("spans should have been received")
	}
}

impl Provider for SideProvider {
	/// The size fixed at the handoff's construction. Never blocks.
	fn size(&self) -> usize { self.size }

	/// Blocks until the supplier has lent its spans, then copies them into
	/// `dest`.
	fn fill_into(&mut self, dest: &mut SpanListMut<'_>) -> Result {
		self.used.claim();
		// Safety: the supplier stays blocked until our drop signals
		// completion, so the lent buffers are live for this whole call.
		let view = unsafe { self.wait_received().view() };
		view.copy_into(dest);
		Ok(())
	}

	/// Blocks until the supplier has lent its spans, then returns them. The
	/// returned list borrows from `self`, so it cannot outlive the provider
	/// whose teardown hands the buffers back.
	fn as_spans(&mut self) -> Result<SpanList<'_>> {
		self.used.claim();
		let received = self.wait_received();
		// Safety: the supplier stays blocked until our drop signals
		// completion, and the borrow ends at the latest when we are dropped.
		Ok(unsafe { received.view() })
	}
}

impl Drop for SideProvider {
	fn drop(&mut self) {
		self.channel.complete();
	}
}
