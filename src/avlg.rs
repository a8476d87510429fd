//! AVL tree with a configurable maximum imbalance
//!
//! An AVL-G tree allows the heights of the two subtrees of every node to
//! differ by up to `G`; AVL-1 is the classic AVL tree. Larger `G` trades
//! search performance for fewer rotations.

use core::{
	cmp::Ordering,
	fmt,
};

use tracing::{
	debug,
	trace,
};

use crate::error::AvlgError;

type Link<T> = Option<Box<Node<T>>>;

struct Node<T> {
	key: T,
	// empty subtree has height -1, a single node 0
	height: isize,
	left: Link<T>,
	right: Link<T>,
}

fn height<T>(link: &Link<T>) -> isize {
	link.as_ref().map_or(-1, |node| node.height)
}

impl<T> Node<T> {
	fn new(key: T) -> Box<Self> {
		Box::new(Self {
			key,
			height: 0,
			left: None,
			right: None,
		})
	}

	fn update_height(&mut self) {
		self.height = 1 + core::cmp::max(height(&self.left), height(&self.right));
	}

	// positive: left subtree is higher
	fn balance(&self) -> isize {
		height(&self.left) - height(&self.right)
	}
}

fn rotate_right<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
	let mut pivot = match node.left.take() {
		Some(pivot) => pivot,
		None => unreachable!("right rotation requires a left child"),
	};
	trace!(height = node.height, "rotating right");
	node.left = pivot.right.take();
	node.update_height();
	pivot.right = Some(node);
	pivot.update_height();
	pivot
}

fn rotate_left<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
	let mut pivot = match node.right.take() {
		Some(pivot) => pivot,
		None => unreachable!("left rotation requires a right child"),
	};
	trace!(height = node.height, "rotating left");
	node.right = pivot.left.take();
	node.update_height();
	pivot.left = Some(node);
	pivot.update_height();
	pivot
}

// restore the balance condition at `node` after one of its subtrees changed
// height by at most one
fn rebalance<T>(mut node: Box<Node<T>>, max_imbalance: isize) -> Box<Node<T>> {
	node.update_height();
	let balance = node.balance();
	if balance > max_imbalance {
		// left-right case needs a double rotation
		if node.left.as_ref().map_or(0, |left| left.balance()) < 0 {
			node.left = node.left.take().map(rotate_left);
		}
		rotate_right(node)
	} else if balance < -max_imbalance {
		if node.right.as_ref().map_or(0, |right| right.balance()) > 0 {
			node.right = node.right.take().map(rotate_right);
		}
		rotate_left(node)
	} else {
		node
	}
}

fn insert_at<T: Ord>(link: Link<T>, key: T, max_imbalance: isize) -> (Box<Node<T>>, bool) {
	let mut node = match link {
		None => return (Node::new(key), true),
		Some(node) => node,
	};
	let inserted = match key.cmp(&node.key) {
		Ordering::Equal => false,
		Ordering::Less => {
			let (left, inserted) = insert_at(node.left.take(), key, max_imbalance);
			node.left = Some(left);
			inserted
		},
		Ordering::Greater => {
			let (right, inserted) = insert_at(node.right.take(), key, max_imbalance);
			node.right = Some(right);
			inserted
		},
	};
	if inserted {
		(rebalance(node, max_imbalance), true)
	} else {
		(node, false)
	}
}

// detach the smallest key of the subtree
fn remove_min<T>(mut node: Box<Node<T>>, max_imbalance: isize) -> (Link<T>, T) {
	match node.left.take() {
		None => {
			let Node { key, right, .. } = *node;
			(right, key)
		},
		Some(left) => {
			let (left, min) = remove_min(left, max_imbalance);
			node.left = left;
			(Some(rebalance(node, max_imbalance)), min)
		},
	}
}

fn remove_at<T: Ord>(link: Link<T>, key: &T, max_imbalance: isize) -> (Link<T>, Option<T>) {
	let mut node = match link {
		None => return (None, None),
		Some(node) => node,
	};
	let removed = match key.cmp(&node.key) {
		Ordering::Less => {
			let (left, removed) = remove_at(node.left.take(), key, max_imbalance);
			node.left = left;
			removed
		},
		Ordering::Greater => {
			let (right, removed) = remove_at(node.right.take(), key, max_imbalance);
			node.right = right;
			removed
		},
		Ordering::Equal => {
			let Node {
				key: found,
				left,
				right,
				..
			} = *node;
			let right = match right {
				None => return (left, Some(found)),
				Some(right) => right,
			};
			// replace with in-order successor
			let (right, successor) = remove_min(right, max_imbalance);
			let mut replacement = Node::new(successor);
			replacement.left = left;
			replacement.right = right;
			return (Some(rebalance(replacement, max_imbalance)), Some(found));
		},
	};
	match removed {
		None => (Some(node), None),
		Some(removed) => (Some(rebalance(node, max_imbalance)), Some(removed)),
	}
}

/// Binary search tree keeping `|height(left) - height(right)| <= G` at
/// every node.
///
/// Keys are unique; inserting a key already present is ignored.
///
/// ```
/// use binary_patricia::avlg::AvlgTree;
///
/// let mut tree = AvlgTree::new(2).unwrap();
/// for key in 1..=7 {
/// 	tree.insert(key);
/// }
/// assert!(tree.is_avlg_balanced());
/// assert_eq!(tree.search(&3), Ok(Some(&3)));
/// assert_eq!(tree.remove(&3), Ok(Some(3)));
/// assert_eq!(tree.len(), 6);
/// ```
pub struct AvlgTree<T> {
	root: Link<T>,
	max_imbalance: usize,
	count: usize,
}

impl<T: Ord + fmt::Debug> fmt::Debug for AvlgTree<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}

impl<T: Ord> AvlgTree<T> {
	/// New (empty) tree allowing subtree heights to differ by up to
	/// `max_imbalance`
	///
	/// Fails with [`AvlgError::InvalidBalance`] if `max_imbalance` is 0.
	pub fn new(max_imbalance: usize) -> Result<Self, AvlgError> {
		if max_imbalance < 1 {
			return Err(AvlgError::InvalidBalance(max_imbalance));
		}
		Ok(Self {
			root: None,
			max_imbalance,
			count: 0,
		})
	}

	fn imbalance_bound(&self) -> isize {
		isize::try_from(self.max_imbalance).unwrap_or(isize::MAX)
	}

	/// Maximum imbalance the tree was created with
	pub fn max_imbalance(&self) -> usize {
		self.max_imbalance
	}

	/// Insert `key`; returns `false` if it was already present
	pub fn insert(&mut self, key: T) -> bool {
		let (root, inserted) = insert_at(self.root.take(), key, self.imbalance_bound());
		self.root = Some(root);
		if inserted {
			self.count += 1;
		} else {
			debug!("ignoring insert of duplicate key");
		}
		inserted
	}

	/// Remove `key` and return it; `Ok(None)` if it wasn't present
	pub fn remove(&mut self, key: &T) -> Result<Option<T>, AvlgError> {
		if self.root.is_none() {
			return Err(AvlgError::EmptyTree);
		}
		let (root, removed) = remove_at(self.root.take(), key, self.imbalance_bound());
		self.root = root;
		if removed.is_some() {
			self.count -= 1;
		}
		Ok(removed)
	}

	/// Find stored key equal to `key`
	pub fn search(&self, key: &T) -> Result<Option<&T>, AvlgError> {
		let mut current = self.root.as_deref().ok_or(AvlgError::EmptyTree)?;
		loop {
			let next = match key.cmp(&current.key) {
				Ordering::Equal => return Ok(Some(&current.key)),
				Ordering::Less => current.left.as_deref(),
				Ordering::Greater => current.right.as_deref(),
			};
			current = match next {
				Some(node) => node,
				None => return Ok(None),
			};
		}
	}

	/// Key at the root node
	pub fn root(&self) -> Result<&T, AvlgError> {
		self.root
			.as_deref()
			.map(|node| &node.key)
			.ok_or(AvlgError::EmptyTree)
	}

	/// Length of the longest path from the root to a leaf; `-1` if empty
	pub fn height(&self) -> isize {
		height(&self.root)
	}

	/// Number of stored keys
	pub fn len(&self) -> usize {
		self.count
	}

	/// Whether no keys are stored
	pub fn is_empty(&self) -> bool {
		self.root.is_none()
	}

	/// Remove all keys
	pub fn clear(&mut self) {
		self.root = None;
		self.count = 0;
	}

	/// Iterate over keys in ascending order
	pub fn iter(&self) -> Iter<'_, T> {
		Iter {
			stack: Vec::new(),
			next: self.root.as_deref(),
		}
	}

	/// Whether an in-order walk yields strictly ascending keys
	pub fn is_bst(&self) -> bool {
		let mut keys = self.iter();
		let mut previous = match keys.next() {
			Some(key) => key,
			None => return true,
		};
		for key in keys {
			if previous >= key {
				return false;
			}
			previous = key;
		}
		true
	}

	/// Whether every node satisfies the imbalance bound (and has the
	/// correct height recorded)
	pub fn is_avlg_balanced(&self) -> bool {
		// actual height if the subtree is balanced
		fn checked_height<T>(link: &Link<T>, max_imbalance: isize) -> Option<isize> {
			let node = match link {
				None => return Some(-1),
				Some(node) => node,
			};
			let left = checked_height(&node.left, max_imbalance)?;
			let right = checked_height(&node.right, max_imbalance)?;
			let actual = 1 + core::cmp::max(left, right);
			if (left - right).abs() > max_imbalance || actual != node.height {
				return None;
			}
			Some(actual)
		}
		checked_height(&self.root, self.imbalance_bound()).is_some()
	}
}

/// Iterate over keys of an [`AvlgTree`] in ascending order
pub struct Iter<'t, T> {
	stack: Vec<&'t Node<T>>,
	next: Option<&'t Node<T>>,
}

impl<'t, T> Iterator for Iter<'t, T> {
	type Item = &'t T;

	fn next(&mut self) -> Option<Self::Item> {
		while let Some(node) = self.next {
			self.stack.push(node);
			self.next = node.left.as_deref();
		}
		let node = self.stack.pop()?;
		self.next = node.right.as_deref();
		Some(&node.key)
	}
}
