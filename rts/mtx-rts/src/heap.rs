//! The foreign heap and its mark/sweep collector.
//!
//! Foreign objects are only reachable through [`Value::Foreign`] handles.
//! A collection marks everything reachable from the root set, following
//! each object's [`ForeignObject::trace`](mtx_host::ForeignObject::trace)
//! report, and drops every unmarked object.
//!
//! Collections only run at safe points chosen by the runtime, never while
//! an extension call is in progress.

use std::fmt;

use mtx_host::{ForeignId, ForeignRef, Value};
use rustc_hash::{FxHashMap, FxHashSet};

/// Statistics from one collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GcStats {
    /// Objects in the heap when the collection started.
    pub live_before: usize,
    /// Objects in the heap after the sweep.
    pub live_after: usize,
    /// Objects reclaimed.
    pub freed: usize,
}

impl fmt::Display for GcStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} live, {} freed ({} before)",
            self.live_after, self.freed, self.live_before
        )
    }
}

/// Storage for foreign objects, keyed by handle.
#[derive(Default)]
pub struct ForeignHeap {
    objects: FxHashMap<ForeignId, ForeignRef>,
    next_id: u64,
    total_allocations: u64,
}

impl ForeignHeap {
    /// Creates an empty heap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an object and returns its handle.
    ///
    /// A handle still held by a live object is never handed out again.
    pub fn insert(&mut self, object: ForeignRef) -> ForeignId {
        let id = loop {
            let id = ForeignId::new(self.next_id);
            self.next_id = self.next_id.wrapping_add(1);
            if !self.objects.contains_key(&id) {
                break id;
            }
        };
        self.total_allocations += 1;
        self.objects.insert(id, object);
        id
    }

    /// Returns a shared handle to the object, if it is still alive.
    #[must_use]
    pub fn get(&self, id: ForeignId) -> Option<ForeignRef> {
        self.objects.get(&id).cloned()
    }

    /// Returns true if the object is still alive.
    #[must_use]
    pub fn contains(&self, id: ForeignId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Number of live objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the heap holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of objects ever allocated.
    #[must_use]
    pub fn total_allocations(&self) -> u64 {
        self.total_allocations
    }

    /// Marks everything reachable from `roots` and frees the rest.
    ///
    /// If an object cannot be traced because it is exclusively borrowed,
    /// the sweep is skipped and nothing is freed.
    pub fn collect<'a>(&mut self, roots: impl IntoIterator<Item = &'a Value>) -> GcStats {
        let live_before = self.objects.len();
        let mut marked = FxHashSet::default();
        let mut gray: Vec<ForeignId> = roots.into_iter().filter_map(Value::as_foreign).collect();
        let mut children = Vec::new();

        while let Some(id) = gray.pop() {
            if !marked.insert(id) {
                continue;
            }
            let Some(object) = self.objects.get(&id) else {
                continue;
            };
            let Ok(object) = object.try_borrow() else {
                tracing::warn!(object = %id, "object busy during collection, skipping sweep");
                return GcStats {
                    live_before,
                    live_after: live_before,
                    freed: 0,
                };
            };
            children.clear();
            object.trace(&mut children);
            gray.extend(children.iter().filter_map(Value::as_foreign));
        }

        self.objects.retain(|id, _| marked.contains(id));
        let live_after = self.objects.len();
        GcStats {
            live_before,
            live_after,
            freed: live_before - live_after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtx_host::ForeignObject;
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// A cell holding a single value.
    struct Cell(Value);

    impl ForeignObject for Cell {
        fn type_name(&self) -> &'static str {
            "cell"
        }

        fn describe(&self) -> String {
            "cell".to_string()
        }

        fn trace(&self, to_trace: &mut Vec<Value>) {
            to_trace.push(self.0.clone());
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn cell(value: Value) -> ForeignRef {
        Rc::new(RefCell::new(Cell(value)))
    }

    #[test]
    fn test_wrapped_ids_skip_live_objects() {
        let mut heap = ForeignHeap::new();
        let first = heap.insert(cell(Value::integer(1)));
        heap.next_id = u64::MAX;
        let last = heap.insert(cell(Value::integer(2)));
        let wrapped = heap.insert(cell(Value::integer(3)));

        assert_eq!(first, ForeignId::new(0));
        assert_eq!(last, ForeignId::new(u64::MAX));
        assert_eq!(wrapped, ForeignId::new(1));
        assert_eq!(heap.len(), 3);
        assert!(heap.contains(first));
    }

    #[test]
    fn test_unreachable_objects_are_freed() {
        let mut heap = ForeignHeap::new();
        let a = heap.insert(cell(Value::Nil));
        let b = heap.insert(cell(Value::Nil));

        let stats = heap.collect(&[Value::Foreign(a)]);
        assert_eq!(
            stats,
            GcStats {
                live_before: 2,
                live_after: 1,
                freed: 1,
            }
        );
        assert!(heap.contains(a));
        assert!(!heap.contains(b));
    }

    #[test]
    fn test_traced_children_survive() {
        let mut heap = ForeignHeap::new();
        let leaf = heap.insert(cell(Value::integer(1)));
        let mid = heap.insert(cell(Value::Foreign(leaf)));
        let root = heap.insert(cell(Value::Foreign(mid)));

        let stats = heap.collect(&[Value::Foreign(root)]);
        assert_eq!(stats.freed, 0);
        assert_eq!(heap.len(), 3);
    }

    #[test]
    fn test_cycles_are_collected() {
        let mut heap = ForeignHeap::new();
        let a_cell = Rc::new(RefCell::new(Cell(Value::Nil)));
        let a = heap.insert(a_cell.clone());
        let b = heap.insert(cell(Value::Foreign(a)));
        a_cell.borrow_mut().0 = Value::Foreign(b);
        drop(a_cell);

        let stats = heap.collect(std::iter::empty());
        assert_eq!(stats.freed, 2);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_busy_object_blocks_sweep() {
        let mut heap = ForeignHeap::new();
        let busy = cell(Value::Nil);
        let id = heap.insert(busy.clone());
        heap.insert(cell(Value::Nil));

        let _guard = busy.borrow_mut();
        let stats = heap.collect(&[Value::Foreign(id)]);
        assert_eq!(stats.freed, 0);
        assert_eq!(heap.len(), 2);
    }
}
