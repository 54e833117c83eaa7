use std::{
    borrow::Borrow,
    cmp::Ordering::{Equal, Greater, Less},
    fmt::{self, Debug},
};

use log::debug;

use crate::{Duplicates, Link, NodeId, OrderedTree, alloc::Arena};

impl<T> Default for OrderedTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Public API.
impl<T> OrderedTree<T> {
    pub fn new() -> Self {
        Self::with_duplicates(Duplicates::Allow)
    }

    pub fn with_duplicates(duplicates: Duplicates) -> Self {
        OrderedTree {
            root: None,
            nodes: Arena::new(),
            duplicates,
        }
    }

    pub const fn duplicates(&self) -> Duplicates {
        self.duplicates
    }

    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of stored values, counted by walking every node.
    pub fn size(&self) -> usize {
        self.size_of(self.root)
    }

    /// Number of nodes on the longest root-to-leaf path; 0 when empty.
    pub fn height(&self) -> usize {
        self.height_of(self.root)
    }

    /// Drops every value and leaves the tree empty.
    pub fn clear(&mut self) {
        debug!("clearing tree of {} nodes", self.nodes.len());
        self.nodes.clear();
        self.root = None;
    }

    pub fn first(&self) -> Option<&T> {
        self.root.map(|root| &self.nodes[self.leftmost(root)].value)
    }

    pub fn last(&self) -> Option<&T> {
        self.root.map(|root| &self.nodes[self.rightmost(root)].value)
    }

    pub fn pop_first(&mut self) -> Option<T> {
        let first = self.leftmost(self.root?);
        Some(self.erase(first))
    }

    pub fn pop_last(&mut self) -> Option<T> {
        let last = self.rightmost(self.root?);
        Some(self.erase(last))
    }

    fn size_of(&self, link: Link) -> usize {
        link.map_or(0, |id| {
            1 + self.size_of(self.left(id)) + self.size_of(self.right(id))
        })
    }

    fn height_of(&self, link: Link) -> usize {
        link.map_or(0, |id| {
            1 + self
                .height_of(self.left(id))
                .max(self.height_of(self.right(id)))
        })
    }
}

impl<T: Ord> OrderedTree<T> {
    /// Stores `value`.
    ///
    /// Values equal to one already present go to its right subtree under
    /// [`Duplicates::Allow`]. Under [`Duplicates::Reject`] they are dropped
    /// and `false` is returned.
    pub fn insert(&mut self, value: T) -> bool {
        let mut parent = None;
        let mut left = false;
        let mut link = self.root;
        while let Some(candidate) = link {
            parent = link;
            match value.cmp(&self.nodes[candidate].value) {
                Less => {
                    left = true;
                    link = self.left(candidate);
                }
                Equal if self.duplicates == Duplicates::Reject => return false,
                Equal | Greater => {
                    left = false;
                    link = self.right(candidate);
                }
            }
        }

        let node = self.link(value, parent, left);
        self.insert_color(node);
        true
    }

    /// Removes one value equal to `value`; `false` if there is none.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(value).is_some()
    }

    /// Removes one value equal to `value` and hands it back.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find_node(value)?;
        Some(self.erase(node))
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(value).is_some()
    }

    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(value).map(|id| &self.nodes[id].value)
    }

    fn find_node<Q>(&self, value: &Q) -> Option<NodeId>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut link = self.root;
        while let Some(candidate) = link {
            match value.cmp(self.nodes[candidate].value.borrow()) {
                Equal => break,
                Greater => link = self.right(candidate),
                Less => link = self.left(candidate),
            }
        }
        link
    }
}

impl<T: Clone> Clone for OrderedTree<T> {
    /// Deep copy: a fresh node graph with the same shape, values and colors.
    fn clone(&self) -> Self {
        let mut tree = OrderedTree {
            root: None,
            nodes: Arena::with_capacity(self.size()),
            duplicates: self.duplicates,
        };
        tree.copy_from(self);
        tree
    }

    /// Reuses this tree's storage for the copy.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.duplicates = source.duplicates;
        self.copy_from(source);
    }
}

impl<T: Clone> OrderedTree<T> {
    /// Pre-order copy of `source` into this (empty) tree.
    fn copy_from(&mut self, source: &Self) {
        debug_assert!(self.root.is_none());
        let Some(source_root) = source.root else {
            return;
        };

        // (source node, parent in the copy, goes to the parent's left)
        let mut pending: Vec<(NodeId, Link, bool)> = vec![(source_root, None, false)];
        let mut copied = 0usize;
        while let Some((from, parent, left)) = pending.pop() {
            let node = &source.nodes[from];
            let id = self.link(node.value.clone(), parent, left);
            self.nodes[id].color = node.color;
            copied += 1;
            if let Some(right) = node.right {
                pending.push((right, Some(id), false));
            }
            if let Some(left) = node.left {
                pending.push((left, Some(id), true));
            }
        }
        debug!("copied {copied} nodes");
    }
}

/// Structural equality: same shape, same values, same colors.
impl<T: PartialEq> PartialEq for OrderedTree<T> {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self.root, other.root)];
        while let Some(pair) = pending.pop() {
            match pair {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    let (a, b) = (&self.nodes[a], &other.nodes[b]);
                    if a.color != b.color || a.value != b.value {
                        return false;
                    }
                    pending.push((a.left, b.left));
                    pending.push((a.right, b.right));
                }
                _ => return false,
            }
        }
        true
    }
}

impl<T: Eq> Eq for OrderedTree<T> {}

impl<T: Debug> Debug for OrderedTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Color;

    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeMap;

    fn init_logging() {
        use simplelog::*;
        // Several tests race to install it; only the first one wins.
        let _ = TermLogger::init(
            LevelFilter::Debug,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        );
    }

    fn values(tree: &OrderedTree<i32>) -> Vec<i32> {
        tree.iter().copied().collect()
    }

    // height <= 2 * log2(n + 1), i.e. 2^height <= (n + 1)^2
    fn within_height_bound<T>(tree: &OrderedTree<T>) -> bool {
        let height = tree.height() as u32;
        let n = tree.size() as u128 + 1;
        height < 128 && (1u128 << height) <= n * n
    }

    #[test]
    fn tree_ctor_works() {
        let tree = OrderedTree::<usize>::new();
        assert_eq!(None, tree.first());
        assert_eq!(false, tree.contains(&42));
        assert_eq!(0, tree.size());
        assert_eq!(0, tree.height());
        assert!(tree.is_empty());
        assert_eq!(Duplicates::Allow, tree.duplicates());
    }

    #[test]
    fn contains_many() {
        let mut tree = OrderedTree::new();
        assert!(tree.insert(42));
        assert_eq!(1, tree.size());
        assert!(tree.insert(0));
        assert!(tree.insert(100));
        assert_eq!(3, tree.size());

        assert_eq!(true, tree.contains(&42));
        assert_eq!(true, tree.contains(&0));
        assert_eq!(true, tree.contains(&100));
        assert_eq!(false, tree.contains(&1));
        assert_eq!(false, tree.contains(&1000));
    }

    #[test]
    fn borrowed_lookups() {
        let mut tree = OrderedTree::new();
        tree.insert("forty two".to_string());
        tree.insert("zero".to_string());
        assert!(tree.contains("zero"));
        assert_eq!(Some(&"forty two".to_string()), tree.get("forty two"));
        assert!(tree.remove("zero"));
        assert!(!tree.contains("zero"));
    }

    #[test]
    fn first_and_last() {
        let mut tree = OrderedTree::new();
        assert_eq!(None, tree.first());
        assert_eq!(None, tree.last());

        tree.insert(42);
        assert_eq!(Some(&42), tree.first());
        assert_eq!(Some(&42), tree.last());

        tree.insert(0);
        tree.insert(100);
        assert_eq!(Some(&0), tree.first());
        assert_eq!(Some(&100), tree.last());
    }

    #[test]
    fn pop_first_and_last() {
        let mut tree: OrderedTree<i32> = [42, 0, 100, 7].into_iter().collect();
        assert_eq!(Some(0), tree.pop_first());
        assert_eq!(Some(100), tree.pop_last());
        assert_eq!(vec![7, 42], values(&tree));
        assert_eq!(Some(7), tree.pop_first());
        assert_eq!(Some(42), tree.pop_first());
        assert_eq!(None, tree.pop_first());
        assert_eq!(None, tree.pop_last());
        assert!(tree.is_empty());
    }

    #[test]
    fn ascending_insert_scenario() {
        let mut tree = OrderedTree::new();
        tree.insert(10);
        tree.insert(20);
        tree.insert(30);

        let root = tree.root.unwrap();
        assert_eq!(20, tree.nodes[root].value);
        assert_eq!(Color::Black, tree.color(root));
        let left = tree.left(root).unwrap();
        let right = tree.right(root).unwrap();
        assert_eq!((10, Color::Red), (tree.nodes[left].value, tree.color(left)));
        assert_eq!((30, Color::Red), (tree.nodes[right].value, tree.color(right)));

        assert!(tree.remove(&20));
        assert_eq!(vec![10, 30], values(&tree));
        assert!(tree.height() <= 2);
        tree.validate().unwrap();
    }

    #[test]
    fn remove_ascending_one_to_seven() {
        let mut tree: OrderedTree<i32> = (1..=7).collect();
        for removed in 1..=7 {
            assert!(tree.remove(&removed));
            tree.validate().unwrap();
            for v in 1..=7 {
                assert_eq!(v > removed, tree.contains(&v), "after removing {removed}");
            }
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn remove_descending_and_middle_out() {
        let mut tree: OrderedTree<i32> = (0..64).collect();
        for v in (0..64).rev().step_by(2) {
            assert!(tree.remove(&v));
            tree.validate().unwrap();
        }
        for v in [32, 16, 48, 0, 62, 30] {
            assert!(tree.remove(&v));
            tree.validate().unwrap();
        }
        assert_eq!(26, tree.size());
    }

    #[test]
    fn remove_missing_is_a_noop() {
        let mut tree: OrderedTree<i32> = [5, 3, 8, 1, 4].into_iter().collect();
        let before = tree.clone();
        assert!(!tree.remove(&6));
        assert_eq!(before, tree);
        assert_eq!(before.height(), tree.height());

        let mut empty = OrderedTree::<i32>::new();
        assert!(!empty.remove(&1));
        assert!(empty.is_empty());
    }

    #[test]
    fn duplicates_are_kept_and_routed_right() {
        let mut tree = OrderedTree::new();
        tree.insert(5);
        tree.insert(5);
        let root = tree.root.unwrap();
        assert_eq!(None, tree.left(root));
        assert_eq!(5, tree.nodes[tree.right(root).unwrap()].value);

        for _ in 0..8 {
            tree.insert(5);
            tree.validate().unwrap();
        }
        tree.insert(3);
        assert_eq!(11, tree.size());
        assert_eq!(vec![3, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5], values(&tree));

        assert!(tree.remove(&5));
        assert_eq!(10, tree.size());
        assert!(tree.contains(&5));
        while tree.remove(&5) {
            tree.validate().unwrap();
        }
        assert_eq!(vec![3], values(&tree));
    }

    #[test]
    fn reject_policy_keeps_a_set() {
        let mut tree = OrderedTree::with_duplicates(Duplicates::Reject);
        assert!(tree.insert(5));
        assert!(!tree.insert(5));
        assert!(tree.insert(6));
        assert_eq!(2, tree.size());
        assert_eq!(Duplicates::Reject, tree.clone().duplicates());
    }

    #[test]
    fn take_hands_back_the_value() {
        let mut tree: OrderedTree<i32> = (0..10).collect();
        assert_eq!(Some(4), tree.take(&4));
        assert_eq!(None, tree.take(&4));
        assert_eq!(9, tree.size());
    }

    #[test]
    fn clear_releases_everything() {
        init_logging();
        let mut tree: OrderedTree<i32> = (0..100).collect();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(0, tree.size());
        assert_eq!(0, tree.height());
        assert_eq!(0, tree.nodes.len());

        tree.insert(1);
        assert_eq!(vec![1], values(&tree));
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut tree: OrderedTree<i32> = (0..10).collect();
        let slots = tree.nodes.capacity();
        for v in 0..5 {
            tree.remove(&v);
        }
        for v in 10..15 {
            tree.insert(v);
        }
        assert_eq!(slots, tree.nodes.capacity());
        tree.validate().unwrap();
    }

    #[test]
    fn clone_is_deep_and_independent() {
        init_logging();
        let mut source: OrderedTree<i32> = (0..20).collect();
        let mut copy = source.clone();
        assert_eq!(source, copy);
        copy.validate().unwrap();

        copy.remove(&3);
        copy.insert(100);
        assert_eq!(20, source.size());
        assert!(source.contains(&3));
        assert!(!source.contains(&100));

        source.remove(&10);
        assert!(copy.contains(&10));
        assert_ne!(source, copy);
    }

    #[test]
    fn clone_from_replaces_contents() {
        let source: OrderedTree<i32> = (0..10).collect();
        let mut target: OrderedTree<i32> = (50..80).collect();
        target.clone_from(&source);
        assert_eq!(source, target);
        target.validate().unwrap();
        assert_eq!(10, target.nodes.len());
    }

    #[test]
    fn structural_equality_sees_shape() {
        let a: OrderedTree<i32> = [1, 2, 3].into_iter().collect();
        let mut b: OrderedTree<i32> = [2, 1, 3].into_iter().collect();
        assert_eq!(a, b);

        // Same contents, different shape.
        let c: OrderedTree<i32> = [1, 2, 3, 4].into_iter().collect();
        b.insert(4);
        b.insert(0);
        b.remove(&0);
        assert_eq!(values(&c), values(&b));
        assert_eq!(c, b);

        let d: OrderedTree<i32> = [4, 3, 2, 1].into_iter().collect();
        assert_eq!(values(&c), values(&d));
        assert_ne!(c, d);
    }

    #[test]
    fn debug_lists_values_in_order() {
        let tree: OrderedTree<i32> = [3, 1, 2].into_iter().collect();
        assert_eq!("{1, 2, 3}", format!("{tree:?}"));
    }

    #[test]
    fn randomized_against_model() {
        init_logging();
        let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
        let mut tree = OrderedTree::new();
        let mut model: BTreeMap<u16, usize> = BTreeMap::new();

        for _ in 0..4_000 {
            let value = rng.random_range(0..256u16);
            if rng.random_bool(0.6) {
                tree.insert(value);
                *model.entry(value).or_default() += 1;
            } else {
                let present = model.get(&value).is_some_and(|&n| n > 0);
                assert_eq!(present, tree.remove(&value));
                if present {
                    let count = model.get_mut(&value).unwrap();
                    *count -= 1;
                    if *count == 0 {
                        model.remove(&value);
                    }
                }
            }
            tree.validate().unwrap();
        }

        let expected: Vec<u16> = model
            .iter()
            .flat_map(|(&v, &n)| std::iter::repeat_n(v, n))
            .collect();
        assert_eq!(expected, tree.iter().copied().collect::<Vec<_>>());
        assert!(within_height_bound(&tree));
    }

    #[quickcheck]
    fn invariants_hold_after_every_mutation(ops: Vec<(bool, i8)>) -> bool {
        let mut tree = OrderedTree::new();
        ops.into_iter().all(|(insert, v)| {
            if insert {
                tree.insert(v);
            } else {
                tree.remove(&v);
            }
            tree.validate().is_ok()
        })
    }

    #[quickcheck]
    fn in_order_is_sorted_multiset(xs: Vec<i16>) -> bool {
        let tree: OrderedTree<i16> = xs.iter().copied().collect();
        let mut sorted = xs;
        sorted.sort();
        tree.iter().copied().collect::<Vec<_>>() == sorted
    }

    #[quickcheck]
    fn insert_then_find_remove_then_miss(xs: Vec<u8>, v: u8) -> bool {
        let mut tree: OrderedTree<u8> = xs.into_iter().filter(|&x| x != v).collect();
        tree.insert(v);
        let found = tree.contains(&v);
        let removed = tree.remove(&v);
        found && removed && !tree.contains(&v)
    }

    #[quickcheck]
    fn size_and_height_bounds(xs: Vec<i32>, removals: Vec<i32>) -> bool {
        let mut tree: OrderedTree<i32> = xs.iter().copied().collect();
        let mut expected = xs.len();
        for r in removals {
            if tree.remove(&r) {
                expected -= 1;
            }
        }
        tree.size() == expected && within_height_bound(&tree)
    }

    #[quickcheck]
    fn copies_do_not_share_nodes(xs: Vec<i32>, extra: i32) -> bool {
        let source: OrderedTree<i32> = xs.iter().copied().collect();
        let snapshot = source.clone();
        let mut copy = source.clone();
        copy.insert(extra);
        for x in &xs {
            copy.remove(x);
        }
        source == snapshot && copy.size() == 1 && copy.contains(&extra)
    }

    #[quickcheck]
    fn removing_absent_value_changes_nothing(xs: Vec<i32>, probe: i32) -> bool {
        let mut tree: OrderedTree<i32> = xs.into_iter().filter(|&x| x != probe).collect();
        let before = tree.clone();
        !tree.remove(&probe) && tree == before && tree.height() == before.height()
    }
}
