//! Red-black tree threaded with a doubly linked list.
//!
//! The tree does not compare payloads. Callers decide where a node goes by
//! naming the node it follows (`insert_successor`), so the same structure
//! serves both the beach line, which is ordered by breakpoints that move with
//! the sweep, and the circle event queue, which is ordered by fixed keys.
//!
//! Nodes live in a `SlotMap` arena. Keys are generation checked, so a key to
//! a removed node never aliases a later one.

use std::collections::HashSet;

use slotmap::{Key, SlotMap};
use thiserror::Error;

#[derive(Debug, Clone)]
struct RbNode<K, T> {
    value: T,
    parent: Option<K>,
    left: Option<K>,
    right: Option<K>,
    previous: Option<K>,
    next: Option<K>,
    red: bool,
}

impl<K, T> RbNode<K, T> {
    fn new(value: T) -> RbNode<K, T> {
        RbNode {
            value,
            parent: None,
            left: None,
            right: None,
            previous: None,
            next: None,
            red: true,
        }
    }
}

/// A broken structural invariant, as reported by [`RbTree::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeDefect {
    #[error("the root is red")]
    RedRoot,

    #[error("a red node has a red child")]
    RedChildOfRed,

    #[error("black height differs between paths ({left} on the left, {right} on the right)")]
    BlackHeightMismatch { left: usize, right: usize },

    #[error("a child does not point back at its parent")]
    BrokenParentLink,

    #[error("the linked list disagrees with the in-order traversal at position {position}")]
    ListOrderMismatch { position: usize },

    #[error("a previous link does not mirror the next link at position {position}")]
    BrokenPreviousLink { position: usize },

    #[error("{reachable} nodes are reachable but {stored} are stored")]
    UnreachableNodes { reachable: usize, stored: usize },
}

/// Ordered sequence with O(log n) positional insert and remove and O(1)
/// neighbour access.
#[derive(Debug, Clone)]
pub struct RbTree<K: Key, T> {
    nodes: SlotMap<K, RbNode<K, T>>,
    root: Option<K>,
}

impl<K: Key, T> RbTree<K, T> {
    pub fn new() -> RbTree<K, T> {
        RbTree { nodes: SlotMap::with_key(), root: None }
    }

    pub fn with_capacity(capacity: usize) -> RbTree<K, T> {
        RbTree { nodes: SlotMap::with_capacity_and_key(capacity), root: None }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn contains(&self, key: K) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn get(&self, key: K) -> Option<&T> {
        self.nodes.get(key).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.nodes.get_mut(key).map(|node| &mut node.value)
    }

    pub fn root(&self) -> Option<K> {
        self.root
    }

    pub fn left(&self, key: K) -> Option<K> {
        self.nodes[key].left
    }

    pub fn right(&self, key: K) -> Option<K> {
        self.nodes[key].right
    }

    pub fn next(&self, key: K) -> Option<K> {
        self.nodes[key].next
    }

    pub fn previous(&self, key: K) -> Option<K> {
        self.nodes[key].previous
    }

    pub fn first(&self) -> Option<K> {
        self.root.map(|root| self.leftmost(root))
    }

    pub fn last(&self) -> Option<K> {
        self.root.map(|root| self.rightmost(root))
    }

    /// Keys in list order, following `next` links from the first node.
    pub fn keys(&self) -> Keys<K, T> {
        Keys { tree: self, cursor: self.first() }
    }

    /// Values in list order.
    pub fn values<'t>(&'t self) -> impl Iterator<Item = &'t T> + 't {
        self.keys().map(move |key| &self.nodes[key].value)
    }

    fn leftmost(&self, mut key: K) -> K {
        while let Some(left) = self.nodes[key].left {
            key = left;
        }
        key
    }

    fn rightmost(&self, mut key: K) -> K {
        while let Some(right) = self.nodes[key].right {
            key = right;
        }
        key
    }

    fn is_red(&self, key: Option<K>) -> bool {
        key.map_or(false, |key| self.nodes[key].red)
    }

    /// Insert `value` immediately after `predecessor` in list order.
    ///
    /// Without a predecessor the value becomes the first node.
    pub fn insert_successor(&mut self, predecessor: Option<K>, value: T) -> K {
        let key = self.nodes.insert(RbNode::new(value));

        let parent = match predecessor {
            Some(node) => {
                let next = self.nodes[node].next;
                self.nodes[key].previous = Some(node);
                self.nodes[key].next = next;
                if let Some(next) = next {
                    self.nodes[next].previous = Some(key);
                }
                self.nodes[node].next = Some(key);

                // The successor slot is the leftmost spot of the right subtree.
                match self.nodes[node].right {
                    Some(right) => {
                        let parent = self.leftmost(right);
                        self.nodes[parent].left = Some(key);
                        Some(parent)
                    }
                    None => {
                        self.nodes[node].right = Some(key);
                        Some(node)
                    }
                }
            }
            None => match self.root {
                Some(root) => {
                    let first = self.leftmost(root);
                    self.nodes[key].next = Some(first);
                    self.nodes[first].previous = Some(key);
                    self.nodes[first].left = Some(key);
                    Some(first)
                }
                None => {
                    self.root = Some(key);
                    None
                }
            },
        };

        self.nodes[key].parent = parent;
        self.insert_fixup(key);
        key
    }

    /// Insert `value` at the position a binary descent picks, where
    /// `precedes(new, existing)` says the new value belongs before `existing`.
    ///
    /// Returns the new key and whether it became the first node.
    pub fn insert_ordered<F>(&mut self, value: T, mut precedes: F) -> (K, bool)
    where
        F: FnMut(&T, &T) -> bool,
    {
        let mut predecessor = None;
        let mut cursor = self.root;

        while let Some(node) = cursor {
            if precedes(&value, &self.nodes[node].value) {
                match self.nodes[node].left {
                    Some(left) => cursor = Some(left),
                    None => {
                        predecessor = self.nodes[node].previous;
                        break;
                    }
                }
            } else {
                match self.nodes[node].right {
                    Some(right) => cursor = Some(right),
                    None => {
                        predecessor = Some(node);
                        break;
                    }
                }
            }
        }

        (self.insert_successor(predecessor, value), predecessor.is_none())
    }

    fn insert_fixup(&mut self, mut node: K) {
        while let Some(mut parent) = self.nodes[node].parent {
            if !self.nodes[parent].red {
                break;
            }

            let grandparent = self.nodes[parent].parent.expect("A red node is never the root.");

            if self.nodes[grandparent].left == Some(parent) {
                let uncle = self.nodes[grandparent].right;
                if let Some(uncle) = uncle.filter(|&uncle| self.nodes[uncle].red) {
                    self.nodes[parent].red = false;
                    self.nodes[uncle].red = false;
                    self.nodes[grandparent].red = true;
                    node = grandparent;
                } else {
                    if self.nodes[parent].right == Some(node) {
                        self.rotate_left(parent);
                        node = parent;
                        parent = self.nodes[node].parent.expect("Rotation keeps a parent above.");
                    }
                    self.nodes[parent].red = false;
                    self.nodes[grandparent].red = true;
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.nodes[grandparent].left;
                if let Some(uncle) = uncle.filter(|&uncle| self.nodes[uncle].red) {
                    self.nodes[parent].red = false;
                    self.nodes[uncle].red = false;
                    self.nodes[grandparent].red = true;
                    node = grandparent;
                } else {
                    if self.nodes[parent].left == Some(node) {
                        self.rotate_right(parent);
                        node = parent;
                        parent = self.nodes[node].parent.expect("Rotation keeps a parent above.");
                    }
                    self.nodes[parent].red = false;
                    self.nodes[grandparent].red = true;
                    self.rotate_left(grandparent);
                }
            }
        }

        if let Some(root) = self.root {
            self.nodes[root].red = false;
        }
    }

    /// Unlink `key` from both the list and the tree and hand back its value.
    ///
    /// # Panics
    ///
    /// If `key` is not in the tree.
    pub fn remove(&mut self, key: K) -> T {
        let node = &self.nodes[key];
        let (previous, next, parent, left, right, red) =
            (node.previous, node.next, node.parent, node.left, node.right, node.red);

        if let Some(next) = next {
            self.nodes[next].previous = previous;
        }
        if let Some(previous) = previous {
            self.nodes[previous].next = next;
        }

        let replacement = match (left, right) {
            (None, _) => right,
            (_, None) => left,
            (Some(_), Some(right)) => Some(self.leftmost(right)),
        };
        self.replace_child(parent, key, replacement);

        let removed_red;
        let fix_node;
        let fix_parent;

        match (left, right, replacement) {
            (Some(left), Some(right), Some(successor)) => {
                removed_red = self.nodes[successor].red;
                self.nodes[successor].red = red;
                self.nodes[successor].left = Some(left);
                self.nodes[left].parent = Some(successor);

                if successor != right {
                    let successor_parent = self.nodes[successor].parent
                        .expect("A successor deep in the right subtree has a parent.");
                    self.nodes[successor].parent = parent;
                    fix_node = self.nodes[successor].right;
                    self.nodes[successor_parent].left = fix_node;
                    self.nodes[successor].right = Some(right);
                    self.nodes[right].parent = Some(successor);
                    fix_parent = Some(successor_parent);
                } else {
                    self.nodes[successor].parent = parent;
                    fix_node = self.nodes[successor].right;
                    fix_parent = Some(successor);
                }
            }
            _ => {
                removed_red = red;
                fix_node = replacement;
                fix_parent = parent;
            }
        }

        if let Some(fix_node) = fix_node {
            self.nodes[fix_node].parent = fix_parent;
        }

        let value = self.nodes.remove(key).expect("Node was looked up above.").value;

        if removed_red {
            return value;
        }

        if let Some(fix_node) = fix_node.filter(|&node| self.nodes[node].red) {
            self.nodes[fix_node].red = false;
            return value;
        }

        self.remove_fixup(fix_node, fix_parent);
        value
    }

    /// Repair a black-height deficit at `node`, which may be an empty slot
    /// under `parent`.
    fn remove_fixup(&mut self, mut node: Option<K>, mut parent: Option<K>) {
        loop {
            if node == self.root {
                break;
            }

            let above = parent.expect("Only the root lacks a parent.");

            if self.nodes[above].left == node {
                let mut sibling = self.nodes[above].right.expect("A deficient side has a sibling.");
                if self.nodes[sibling].red {
                    self.nodes[sibling].red = false;
                    self.nodes[above].red = true;
                    self.rotate_left(above);
                    sibling = self.nodes[above].right.expect("A deficient side has a sibling.");
                }
                if self.is_red(self.nodes[sibling].left) || self.is_red(self.nodes[sibling].right) {
                    if !self.is_red(self.nodes[sibling].right) {
                        let inner = self.nodes[sibling].left.expect("Checked red above.");
                        self.nodes[inner].red = false;
                        self.nodes[sibling].red = true;
                        self.rotate_right(sibling);
                        sibling = self.nodes[above].right.expect("Rotation keeps a sibling.");
                    }
                    self.nodes[sibling].red = self.nodes[above].red;
                    self.nodes[above].red = false;
                    let outer = self.nodes[sibling].right.expect("Checked red above.");
                    self.nodes[outer].red = false;
                    self.rotate_left(above);
                    node = self.root;
                    break;
                }
                self.nodes[sibling].red = true;
            } else {
                let mut sibling = self.nodes[above].left.expect("A deficient side has a sibling.");
                if self.nodes[sibling].red {
                    self.nodes[sibling].red = false;
                    self.nodes[above].red = true;
                    self.rotate_right(above);
                    sibling = self.nodes[above].left.expect("A deficient side has a sibling.");
                }
                if self.is_red(self.nodes[sibling].left) || self.is_red(self.nodes[sibling].right) {
                    if !self.is_red(self.nodes[sibling].left) {
                        let inner = self.nodes[sibling].right.expect("Checked red above.");
                        self.nodes[inner].red = false;
                        self.nodes[sibling].red = true;
                        self.rotate_left(sibling);
                        sibling = self.nodes[above].left.expect("Rotation keeps a sibling.");
                    }
                    self.nodes[sibling].red = self.nodes[above].red;
                    self.nodes[above].red = false;
                    let outer = self.nodes[sibling].left.expect("Checked red above.");
                    self.nodes[outer].red = false;
                    self.rotate_right(above);
                    node = self.root;
                    break;
                }
                self.nodes[sibling].red = true;
            }

            node = Some(above);
            parent = self.nodes[above].parent;

            if self.nodes[above].red {
                break;
            }
        }

        if let Some(node) = node {
            self.nodes[node].red = false;
        }
    }

    /// Point whatever referenced `old` from above (a parent or the root) at `new`.
    fn replace_child(&mut self, parent: Option<K>, old: K, new: Option<K>) {
        match parent {
            Some(parent) => {
                if self.nodes[parent].left == Some(old) {
                    self.nodes[parent].left = new;
                } else {
                    self.nodes[parent].right = new;
                }
            }
            None => self.root = new,
        }
    }

    /// Rotate the subtree at `p` to the left, returning the new subtree root.
    fn rotate_left(&mut self, p: K) -> K {
        let q = self.nodes[p].right.expect("Left rotation needs a right child.");
        let parent = self.nodes[p].parent;

        self.replace_child(parent, p, Some(q));
        self.nodes[q].parent = parent;
        self.nodes[p].parent = Some(q);

        let inner = self.nodes[q].left;
        self.nodes[p].right = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(p);
        }
        self.nodes[q].left = Some(p);

        q
    }

    /// Rotate the subtree at `p` to the right, returning the new subtree root.
    fn rotate_right(&mut self, p: K) -> K {
        let q = self.nodes[p].left.expect("Right rotation needs a left child.");
        let parent = self.nodes[p].parent;

        self.replace_child(parent, p, Some(q));
        self.nodes[q].parent = parent;
        self.nodes[p].parent = Some(q);

        let inner = self.nodes[q].right;
        self.nodes[p].left = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(p);
        }
        self.nodes[q].right = Some(p);

        q
    }

    /// Keys in in-order tree traversal, ignoring the list links.
    pub fn in_order_keys(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut stack = Vec::new();
        let mut cursor = self.root;

        while cursor.is_some() || !stack.is_empty() {
            while let Some(node) = cursor {
                stack.push(node);
                cursor = self.nodes[node].left;
            }
            if let Some(node) = stack.pop() {
                keys.push(node);
                cursor = self.nodes[node].right;
            }
        }

        keys
    }

    /// Check the red-black rules, the parent links, and that the list links
    /// visit nodes in the same order as the tree.
    pub fn validate(&self) -> Result<(), TreeDefect> {
        if let Some(root) = self.root {
            if self.nodes[root].red {
                return Err(TreeDefect::RedRoot);
            }
            if self.nodes[root].parent.is_some() {
                return Err(TreeDefect::BrokenParentLink);
            }
            self.black_height(root)?;
        }

        let in_order = self.in_order_keys();
        if in_order.len() != self.nodes.len() {
            return Err(TreeDefect::UnreachableNodes { reachable: in_order.len(), stored: self.nodes.len() });
        }

        let mut seen = HashSet::with_capacity(in_order.len());
        let mut previous = None;
        let mut listed = self.first();
        for (position, &key) in in_order.iter().enumerate() {
            if listed != Some(key) || !seen.insert(key) {
                return Err(TreeDefect::ListOrderMismatch { position });
            }
            if self.nodes[key].previous != previous {
                return Err(TreeDefect::BrokenPreviousLink { position });
            }
            previous = Some(key);
            listed = self.nodes[key].next;
        }

        if listed.is_some() {
            return Err(TreeDefect::ListOrderMismatch { position: in_order.len() });
        }

        Ok(())
    }

    /// Black nodes on every path below `key`, counting `key` itself.
    fn black_height(&self, key: K) -> Result<usize, TreeDefect> {
        let node = &self.nodes[key];
        let mut heights = [0, 0];

        for (height, child) in heights.iter_mut().zip([node.left, node.right]) {
            if let Some(child) = child {
                if self.nodes[child].parent != Some(key) {
                    return Err(TreeDefect::BrokenParentLink);
                }
                if node.red && self.nodes[child].red {
                    return Err(TreeDefect::RedChildOfRed);
                }
                *height = self.black_height(child)?;
            }
        }

        if heights[0] != heights[1] {
            return Err(TreeDefect::BlackHeightMismatch { left: heights[0], right: heights[1] });
        }

        Ok(heights[0] + if node.red { 0 } else { 1 })
    }
}

impl<K: Key, T> Default for RbTree<K, T> {
    fn default() -> RbTree<K, T> {
        RbTree::new()
    }
}

/// Iterator over keys in list order. See [`RbTree::keys`].
#[derive(Debug, Clone)]
pub struct Keys<'t, K: Key, T> {
    tree: &'t RbTree<K, T>,
    cursor: Option<K>,
}

impl<'t, K: Key, T> Iterator for Keys<'t, K, T> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let key = self.cursor?;
        self.cursor = self.tree.nodes[key].next;
        Some(key)
    }
}
