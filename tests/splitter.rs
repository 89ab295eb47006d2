// SPDX-License-Identifier: Apache-2.0

use pretty_assertions::assert_eq;
use provio::{Provider, ProviderFailed, Splitter, SpanListMut};

mod common;
use common::{concat, CountingProvider};

#[test]
fn branches_share_one_drain() {
	let source = CountingProvider::new(*b"fan out");
	let reads = source.read_count();
	let splitter = Splitter::new(source);
	assert_eq!(reads.get(), 0, "the source should not be drained before a branch is read");

	let mut first = splitter.branch();
	let mut second = splitter.branch();
	assert_eq!(first.size(), 7);

	assert_eq!(concat(&first.as_spans().unwrap()), b"fan out");
	assert_eq!(reads.get(), 1);

	let mut out = [0; 7];
	second.fill_into(&mut SpanListMut::single(&mut out)).unwrap();
	assert_eq!(&out, b"fan out");
	assert_eq!(reads.get(), 1, "the source should be drained at most once");

	// A branch created after the drain sees the same memoized bytes.
	let mut third = splitter.branch();
	assert_eq!(concat(&third.as_spans().unwrap()), b"fan out");
	assert_eq!(reads.get(), 1);
}

#[test]
fn branch_read_order_is_irrelevant() {
	let splitter = Splitter::new(CountingProvider::new(*b"any order"));
	let mut branches = [splitter.branch(), splitter.branch(), splitter.branch()];
	for branch in branches.iter_mut().rev() {
		assert_eq!(concat(&branch.as_spans().unwrap()), b"any order");
	}
}

#[test]
fn all_branches_observe_one_failure() {
	let source = CountingProvider::failing(*b"doomed");
	let reads = source.read_count();
	let splitter = Splitter::new(source);

	let mut first = splitter.branch();
	assert_eq!(first.as_spans().unwrap_err(), ProviderFailed);
	assert_eq!(reads.get(), 1);

	// Branches created before or after the failed drain fail identically,
	// without the source being drained again.
	let mut second = splitter.branch();
	let mut out = [0; 6];
	assert_eq!(
		second.fill_into(&mut SpanListMut::single(&mut out)).unwrap_err(),
		ProviderFailed
	);
	assert_eq!(reads.get(), 1);
	assert_eq!(second.size(), 6, "size should stay observable after the failure");
}

#[test]
#[should_panic(expected = "at most once")]
fn branch_rejects_second_read() {
	let splitter = Splitter::new(CountingProvider::new(*b"once"));
	let mut branch = splitter.branch();
	let _ = branch.as_spans();
	let _ = branch.as_spans();
}
