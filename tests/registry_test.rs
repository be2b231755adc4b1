//! Tests for view registry fan-out on the outline engines

use std::cell::RefCell;
use std::rc::Rc;

use rsoutline::{Outline, OutlineMulti, OutlineStore, OutlineView, StoreHandle};

/// Records every storage-handle notification it receives.
#[derive(Default)]
struct Recorder {
    seen: RefCell<Vec<StoreHandle>>,
}

impl Recorder {
    fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    fn count(&self) -> usize {
        self.seen.borrow().len()
    }
}

impl OutlineView for Recorder {
    fn store_changed(&self, store: StoreHandle) {
        self.seen.borrow_mut().push(store);
    }
}

// ============================================================
// Fan-out Tests
// ============================================================

#[test]
fn given_attached_views_when_clearing_then_all_views_see_new_handle() {
    let mut outline: Outline<String> = Outline::new();
    let first = Recorder::new();
    let second = Recorder::new();
    outline.attach(first.clone());
    outline.attach(second.clone());

    let before = outline.store();
    outline.clear();
    let after = outline.store();

    assert_ne!(before, after);
    assert_eq!(first.seen.borrow().as_slice(), &[after]);
    assert_eq!(second.seen.borrow().as_slice(), &[after]);
}

#[test]
fn given_multi_outline_when_clearing_then_fan_out_consistent() {
    let mut outline: OutlineMulti<String> = OutlineMulti::new();
    let views: Vec<Rc<Recorder>> = (0..3)
        .map(|_| {
            let view = Recorder::new();
            outline.attach(view.clone());
            view
        })
        .collect();

    outline.clear();
    outline.clear();

    // no partial notification: every view saw both changes
    for view in &views {
        assert_eq!(view.count(), 2);
        assert_eq!(view.seen.borrow().last().copied(), Some(outline.store()));
    }
}

#[test]
fn given_plain_insertions_when_mutating_then_storage_handle_stable() {
    let mut outline: Outline<String> = Outline::new();
    let view = Recorder::new();
    outline.attach(view.clone());

    let before = outline.store();
    outline.insert_before("a".to_string(), None).unwrap();
    outline.insert_after("b".to_string(), None).unwrap();

    assert_eq!(outline.store(), before);
    assert_eq!(view.count(), 0);
}

// ============================================================
// Registration State Machine Tests
// ============================================================

#[test]
fn given_duplicate_attach_when_notifying_then_single_delivery() {
    let mut outline: Outline<String> = Outline::new();
    let view = Recorder::new();
    outline.attach(view.clone());
    outline.attach(view.clone());

    assert_eq!(outline.view_count(), 1);
    outline.clear();
    assert_eq!(view.count(), 1);
}

#[test]
fn given_detached_view_when_clearing_then_no_delivery() {
    let mut outline: Outline<String> = Outline::new();
    let view = Recorder::new();
    outline.attach(view.clone());

    let handle: Rc<dyn OutlineView> = view.clone();
    outline.detach(&handle);
    outline.clear();

    assert_eq!(view.count(), 0);
}

#[test]
fn given_never_attached_view_when_detaching_then_registry_unchanged() {
    let mut outline: Outline<String> = Outline::new();
    let attached = Recorder::new();
    let stranger = Recorder::new();
    outline.attach(attached.clone());

    let handle: Rc<dyn OutlineView> = stranger;
    outline.detach(&handle);

    assert_eq!(outline.view_count(), 1);
}

#[test]
fn given_repeated_detach_when_applied_then_idempotent_after_first() {
    let mut outline: Outline<String> = Outline::new();
    let view = Recorder::new();
    outline.attach(view.clone());
    let handle: Rc<dyn OutlineView> = view;

    outline.detach(&handle);
    assert_eq!(outline.view_count(), 0);
    outline.detach(&handle);
    assert_eq!(outline.view_count(), 0);
}

#[test]
fn given_release_when_detaching_all_then_no_registrations_remain() {
    let mut outline: OutlineMulti<String> = OutlineMulti::new();
    outline.attach(Recorder::new());
    outline.attach(Recorder::new());

    outline.detach_all();

    assert_eq!(outline.view_count(), 0);
}

// ============================================================
// Generic Contract Tests
// ============================================================

fn rebind<T, O: OutlineStore<T>>(outline: &mut O, view: Rc<dyn OutlineView>) -> StoreHandle {
    // model plumbing written once against the shared contract
    outline.attach(view);
    outline.store()
}

#[test]
fn given_shared_contract_when_binding_generically_then_both_topologies_work() {
    let mut flat: Outline<String> = Outline::new();
    let mut tree: OutlineMulti<String> = OutlineMulti::new();
    let flat_view = Recorder::new();
    let tree_view = Recorder::new();

    let flat_store = rebind(&mut flat, flat_view.clone());
    let tree_store = rebind(&mut tree, tree_view.clone());

    assert_ne!(flat_store, tree_store);
    flat.clear();
    tree.clear();
    assert_eq!(flat_view.count(), 1);
    assert_eq!(tree_view.count(), 1);
}
