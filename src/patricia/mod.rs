//! Binary Patricia trie: a set of bit strings with path compression
//!
//! Every node stores the full key from the root down to itself; the bits a
//! node adds on top of its parent (its "fragment") are the ones beyond the
//! parent key length. Inner nodes not representing a stored key always have
//! two children, so chains of single-child nodes never exist.

use core::{
	cmp::Ordering,
	fmt,
	mem::replace,
};

use bitstring::BitString;
use tracing::{
	debug,
	trace,
};

use crate::key::BitKey;

pub use self::iter::Iter;

mod iter;

#[derive(Clone)]
struct Node<K> {
	key: K,
	// whether `key` is stored in the trie
	terminal: bool,
	left: Option<Box<Node<K>>>,
	right: Option<Box<Node<K>>>,
}

impl<K: BitString + Clone> Node<K> {
	fn new_root() -> Self {
		Self {
			key: K::null(),
			terminal: false,
			left: None,
			right: None,
		}
	}

	fn new_leaf(key: K) -> Self {
		Self {
			key,
			terminal: true,
			left: None,
			right: None,
		}
	}

	// new splitter node above `a` and `b`; their keys must differ at
	// `shared_prefix_len` (and not before)
	fn new_inner_unknown_order(shared_prefix_len: usize, a: Box<Self>, b: Box<Self>) -> Self {
		let mut key = a.key.clone();
		key.clip(shared_prefix_len);
		let a_right = a.key.get(shared_prefix_len);
		assert_eq!(!a_right, b.key.get(shared_prefix_len));
		let (left, right) = if a_right { (b, a) } else { (a, b) };
		Self {
			key,
			terminal: false,
			left: Some(left),
			right: Some(right),
		}
	}

	/// `false` returns left and `true` returns right node.
	#[inline]
	fn child(&self, side: bool) -> Option<&Self> {
		if side {
			self.right.as_deref()
		} else {
			self.left.as_deref()
		}
	}

	#[inline]
	fn child_slot(&mut self, side: bool) -> &mut Option<Box<Self>> {
		if side {
			&mut self.right
		} else {
			&mut self.left
		}
	}

	fn child_count(&self) -> usize {
		usize::from(self.left.is_some()) + usize::from(self.right.is_some())
	}

	#[inline]
	fn is_prefix_of(&self, key: &K) -> bool {
		let self_key_len = self.key.len();
		self_key_len <= key.len() && self.key.shared_prefix_len(key) == self_key_len
	}

	// insert `key` into the subtree at `node`, returns the new subtree root
	// and whether the key was new.
	//
	// `node.key` and `key` share at least the bit that selected this subtree.
	fn insert(mut node: Box<Self>, key: K) -> (Box<Self>, bool) {
		let self_key_len = node.key.len();
		let key_len = key.len();
		let shared_prefix_len = node.key.shared_prefix_len(&key);

		if shared_prefix_len == self_key_len {
			if shared_prefix_len == key_len {
				// key only existed as path so far (or is a duplicate)
				let inserted = !replace(&mut node.terminal, true);
				return (node, inserted);
			}
			// new key below in tree
			let inserted = node.insert_below(key);
			return (node, inserted);
		}

		if shared_prefix_len == key_len {
			// key is a proper prefix of the node key: new key node above,
			// old node keeps the remaining bits as its fragment
			trace!(at = key_len, "splitting fragment for prefix key");
			let side = node.key.get(key_len);
			let mut parent = Box::new(Self::new_leaf(key));
			*parent.child_slot(side) = Some(node);
			return (parent, true);
		}

		// neither is a prefix of the other; requires splitter node
		trace!(at = shared_prefix_len, "inserting splitter node");
		let leaf = Box::new(Self::new_leaf(key));
		(
			Box::new(Self::new_inner_unknown_order(shared_prefix_len, node, leaf)),
			true,
		)
	}

	// pre condition: `self.key` is a proper prefix of `key`
	fn insert_below(&mut self, key: K) -> bool {
		let side = key.get(self.key.len());
		let slot = self.child_slot(side);
		let (child, inserted) = match slot.take() {
			None => (Box::new(Self::new_leaf(key)), true),
			Some(child) => Self::insert(child, key),
		};
		*slot = Some(child);
		inserted
	}

	// pre condition: `self.key` is a proper prefix of `key`
	//
	// repairs every node on the path back up (except `self`)
	fn remove_below(&mut self, key: &K) -> bool {
		let side = key.get(self.key.len());
		let slot = self.child_slot(side);
		let child = match slot.as_mut() {
			Some(child) if child.is_prefix_of(key) => child,
			_ => return false,
		};
		let removed = if child.key.len() == key.len() {
			replace(&mut child.terminal, false)
		} else {
			child.remove_below(key)
		};
		if removed {
			Self::prune(slot);
		}
		removed
	}

	// drop or merge away a node that isn't a key and doesn't split into two
	// subtrees
	fn prune(slot: &mut Option<Box<Self>>) {
		let node = match slot.take() {
			Some(node) => node,
			None => return,
		};
		*slot = match (node.terminal, node.child_count()) {
			(true, _) | (false, 2) => Some(node),
			(false, 0) => {
				trace!(len = node.key.len(), "dropping orphaned node");
				None
			},
			(false, _) => {
				trace!(len = node.key.len(), "merging node into its only child");
				Some(node.merge_single_child())
			},
		};
	}

	// the child's key already includes our fragment; merging is taking its
	// place
	fn merge_single_child(mut self: Box<Self>) -> Box<Self> {
		match (self.left.take(), self.right.take()) {
			(Some(child), None) | (None, Some(child)) => child,
			_ => unreachable!("merge requires exactly one child"),
		}
	}

	// non-root nodes only
	fn is_junk_free(&self) -> bool {
		(self.terminal || self.child_count() == 2)
			&& self.left.as_deref().map_or(true, Self::is_junk_free)
			&& self.right.as_deref().map_or(true, Self::is_junk_free)
	}
}

// longer keys win; same length: larger unsigned binary value wins
fn cmp_len_value<K: BitString>(a: &K, b: &K) -> Ordering {
	a.len().cmp(&b.len()).then_with(|| {
		let shared_prefix_len = a.shared_prefix_len(b);
		if shared_prefix_len == a.len() {
			Ordering::Equal
		} else if a.get(shared_prefix_len) {
			Ordering::Greater
		} else {
			Ordering::Less
		}
	})
}

/// Set of bit strings stored in a binary Patricia trie.
///
/// Chains of nodes with a single child are compressed into one node; an
/// inner node only exists if it is a stored key or splits into two
/// subtrees.
///
/// The empty bit string is the (permanent) root and can't be stored.
///
/// ```
/// use binary_patricia::{
/// 	BitKey,
/// 	PatriciaTrie,
/// };
///
/// let mut trie = PatriciaTrie::new();
/// assert!(trie.insert("0110".parse::<BitKey>().unwrap()));
/// assert!(trie.insert("01".parse().unwrap()));
/// assert!(trie.contains(&"01".parse().unwrap()));
/// assert!(!trie.contains(&"011".parse().unwrap()));
/// assert_eq!(trie.longest().to_string(), "0110");
/// ```
#[derive(Clone)]
pub struct PatriciaTrie<K = BitKey> {
	root: Node<K>,
	size: usize,
}

impl<K: BitString + Clone> Default for PatriciaTrie<K> {
	fn default() -> Self {
		Self::new()
	}
}

impl<K: BitString + Clone + fmt::Debug> fmt::Debug for PatriciaTrie<K> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}

impl<K: BitString + Clone> PatriciaTrie<K> {
	/// New (empty) trie.
	pub fn new() -> Self {
		Self {
			root: Node::new_root(),
			size: 0,
		}
	}

	/// Whether `key` is stored in the trie
	pub fn contains(&self, key: &K) -> bool {
		let key_len = key.len();
		// invariant: `node.key` is a prefix of `key`
		let mut node = &self.root;
		loop {
			let self_key_len = node.key.len();
			if self_key_len == key_len {
				return node.terminal;
			}
			node = match node.child(key.get(self_key_len)) {
				Some(child) if child.is_prefix_of(key) => child,
				_ => return false,
			};
		}
	}

	/// Insert `key`
	///
	/// Returns `false` if the key was already stored or is the empty bit
	/// string (which can't be stored).
	pub fn insert(&mut self, key: K) -> bool {
		if key.len() == 0 {
			debug!("ignoring insert of empty key");
			return false;
		}
		let inserted = self.root.insert_below(key);
		if inserted {
			self.size += 1;
		}
		inserted
	}

	/// Remove `key`
	///
	/// Returns `false` if the key wasn't stored.
	pub fn remove(&mut self, key: &K) -> bool {
		if key.len() == 0 {
			return false;
		}
		let removed = self.root.remove_below(key);
		if removed {
			self.size -= 1;
		}
		removed
	}

	/// Number of stored keys
	#[inline]
	pub fn len(&self) -> usize {
		self.size
	}

	/// Whether no keys are stored
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.size == 0
	}

	/// Remove all keys
	pub fn clear(&mut self) {
		self.root = Node::new_root();
		self.size = 0;
	}

	/// Iterate over stored keys in symmetric order
	///
	/// For each node: keys in the left subtree, then the node key (if
	/// stored), then keys in the right subtree. This is only sorted if all
	/// stored keys have the same length.
	pub fn iter(&self) -> Iter<'_, K> {
		Iter::new(&self.root, self.size)
	}

	/// Longest stored key; among keys of the same length the one with the
	/// largest value as unsigned binary number.
	///
	/// Returns the empty bit string if the trie is empty.
	pub fn longest(&self) -> K {
		self.iter()
			.max_by(|a, b| cmp_len_value(*a, *b))
			.cloned()
			.unwrap_or_else(K::null)
	}

	/// Whether every node apart from the root is either a stored key or
	/// has two children.
	pub fn is_junk_free(&self) -> bool {
		self.root.left.as_deref().map_or(true, Node::is_junk_free)
			&& self.root.right.as_deref().map_or(true, Node::is_junk_free)
	}
}

impl<'t, K: BitString + Clone> IntoIterator for &'t PatriciaTrie<K> {
	type IntoIter = Iter<'t, K>;
	type Item = &'t K;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<K: BitString + Clone> Extend<K> for PatriciaTrie<K> {
	fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
		for key in iter {
			self.insert(key);
		}
	}
}

impl<K: BitString + Clone> FromIterator<K> for PatriciaTrie<K> {
	fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
		let mut trie = Self::new();
		trie.extend(iter);
		trie
	}
}
