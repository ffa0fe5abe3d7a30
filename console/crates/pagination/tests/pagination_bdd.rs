//! Behavioural tests for client-side pagination.
//!
//! These scenarios pin down the page-count, slicing and navigation contract
//! consumed by the console's listing views.

// `expect` is idiomatic in test code for failing fast on precondition violations.
#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use pagination::{PageSize, Pager};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

/// Test world holding the sequence and its navigation state.
#[derive(Default, ScenarioState)]
struct World {
    items: Slot<Vec<usize>>,
    page_size: Slot<PageSize>,
    pager: Slot<Pager>,
}

impl World {
    fn items(&self) -> Vec<usize> {
        self.items.get().expect("items should be set")
    }

    fn pager(&self) -> Pager {
        self.pager.get().expect("items should be paged")
    }

    fn navigate(&self, step: impl FnOnce(&mut Pager)) {
        let mut pager = self.pager();
        step(&mut pager);
        self.pager.set(pager);
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

#[given("a sequence of {count:usize} numbered items")]
fn a_sequence_of_numbered_items(world: &World, count: usize) {
    world.items.set((1..=count).collect());
}

#[given("a page size of {size:usize}")]
fn a_page_size_of(world: &World, size: usize) {
    world
        .page_size
        .set(PageSize::new(size).expect("page size should be positive"));
}

#[when("the items are paged")]
fn the_items_are_paged(world: &World) {
    let page_size = world.page_size.get().unwrap_or_default();
    world
        .pager
        .set(Pager::with_page_size(world.items().len(), page_size));
}

#[when("the view jumps to page {page:usize}")]
fn the_view_jumps_to_page(world: &World, page: usize) {
    world.navigate(|pager| pager.go_to_page(page));
}

#[when("the view is reset")]
fn the_view_is_reset(world: &World) {
    world.navigate(Pager::reset);
}

#[then("there are {pages:usize} pages")]
fn there_are_pages(world: &World, pages: usize) {
    assert_eq!(world.pager().total_pages(), pages);
}

#[then("the current page starts at item {first:usize} and holds {len:usize} items")]
fn the_current_page_starts_at(world: &World, first: usize, len: usize) {
    let items = world.items();
    let slice = world.pager().slice(&items);
    assert_eq!(slice.first(), Some(&first));
    assert_eq!(slice.len(), len);
}

#[then("there is no next page")]
fn there_is_no_next_page(world: &World) {
    assert!(!world.pager().has_next_page());
}

#[then("the current page is {page:usize}")]
fn the_current_page_is(world: &World, page: usize) {
    assert_eq!(world.pager().current_page(), page);
}

#[scenario(
    path = "tests/features/pagination.feature",
    name = "Twenty-five items split into three pages"
)]
fn twenty_five_items_split_into_three_pages(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/pagination.feature",
    name = "The last page holds the remainder"
)]
fn the_last_page_holds_the_remainder(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/pagination.feature",
    name = "Jumping past the last page is ignored"
)]
fn jumping_past_the_last_page_is_ignored(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/pagination.feature",
    name = "Resetting returns to the first page"
)]
fn resetting_returns_to_the_first_page(world: World) {
    let _ = world;
}
