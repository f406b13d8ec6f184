//! Structural list operations applied across all four trees.
//!
//! An array-shaped field has an array in `values` and, lazily, arrays at
//! the same path in the auxiliary trees. Every operation here keeps index
//! `i` of each auxiliary array describing element `i` of the value array.

use serde_json::Value;
use tracing::debug;

use crate::path::{FieldPath, Segment};
use crate::state::{FormState, Tree};

impl FormState {
    /// Push `value` onto the list at `path`. Auxiliary trees are not
    /// extended: a missing entry already reads as a fresh field.
    pub fn append(mut self, path: &str, value: Value) -> Self {
        let field = FieldPath::parse(path);
        let values = self.tree_mut(Tree::Values);
        match field.resolve_mut(values) {
            Some(Value::Array(items)) => items.push(value),
            _ => field.assign(values, Value::Array(vec![value])),
        }
        debug!(path = %field, "append");
        self
    }

    /// Insert `value` at the head of the list at `path` and a `null`
    /// placeholder at the head of each auxiliary list, shifting every
    /// existing entry by one in all four trees.
    pub fn prepend(mut self, path: &str, value: Value) -> Self {
        let field = FieldPath::parse(path);
        let mut value = Some(value);
        for tree in Tree::ALL {
            let head = match tree {
                Tree::Values => value.take().unwrap_or(Value::Null),
                _ => Value::Null,
            };
            let target = self.tree_mut(tree);
            match field.resolve_mut(target) {
                Some(Value::Array(items)) => items.insert(0, head),
                _ => field.assign(target, Value::Array(vec![head])),
            }
        }
        debug!(path = %field, "prepend");
        self
    }

    /// Remove `count` entries starting at `index` from every tree that
    /// holds an array at `path`. Other trees are left alone.
    pub fn splice(mut self, path: &str, index: usize, count: usize) -> Self {
        let field = FieldPath::parse(path);
        for tree in Tree::ALL {
            if let Some(Value::Array(items)) = field.resolve_mut(self.tree_mut(tree)) {
                if index < items.len() {
                    let end = index.saturating_add(count).min(items.len());
                    items.drain(index..end);
                }
            }
        }
        debug!(path = %field, index, count, "splice");
        self
    }

    /// Remove one list element from all four trees.
    pub fn remove_at(self, path: &str, index: usize) -> Self {
        self.splice(path, index, 1)
    }

    /// Remove the whole sub-tree at `path` from all four trees.
    pub fn remove_field(mut self, path: &str) -> Self {
        let field = FieldPath::parse(path);
        for tree in Tree::ALL {
            field.remove(self.tree_mut(tree));
        }
        debug!(path = %field, "remove field");
        self
    }

    /// Exchange the entries at `first` and `second` in each tree on its
    /// own. A tree holding neither entry is left alone; a tree holding
    /// only one gets a `null` placeholder on the other side.
    pub fn swap(self, first: &str, second: &str) -> Self {
        self.swap_paths(&FieldPath::parse(first), &FieldPath::parse(second))
    }

    /// Swap element `index` of the list at `container` with its predecessor.
    /// Moving the first element, or an index past the end, is a no-op.
    pub fn move_up(self, container: &str, index: usize) -> Self {
        let list = FieldPath::parse(container);
        let len = list_len(&self, &list);
        if index == 0 || index >= len {
            debug!(path = %list, index, len, "move up ignored outside list");
            return self;
        }
        self.swap_paths(
            &list.child(Segment::Index(index)),
            &list.child(Segment::Index(index - 1)),
        )
    }

    /// Swap element `index` of the list at `container` with its successor.
    /// Moving the last element is a no-op.
    pub fn move_down(self, container: &str, index: usize) -> Self {
        let list = FieldPath::parse(container);
        let len = list_len(&self, &list);
        if index.checked_add(1).map_or(true, |next| next >= len) {
            debug!(path = %list, index, len, "move down ignored at tail of list");
            return self;
        }
        self.swap_paths(
            &list.child(Segment::Index(index)),
            &list.child(Segment::Index(index + 1)),
        )
    }

    fn swap_paths(mut self, first: &FieldPath, second: &FieldPath) -> Self {
        for tree in Tree::ALL {
            let target = self.tree_mut(tree);
            let left = first.resolve(target).cloned();
            let right = second.resolve(target).cloned();
            if left.is_none() && right.is_none() {
                continue;
            }
            first.assign(target, right.unwrap_or(Value::Null));
            second.assign(target, left.unwrap_or(Value::Null));
        }
        debug!(%first, %second, "swap");
        self
    }
}


fn list_len(state: &FormState, list: &FieldPath) -> usize {
    list.resolve(state.values())
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}
