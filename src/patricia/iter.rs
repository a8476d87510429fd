use bitstring::BitString;

use super::Node;

/// Iterate over keys of a [`PatriciaTrie`](super::PatriciaTrie) in
/// symmetric (in-) order
pub struct Iter<'t, K> {
	// nodes whose left subtree is being visited
	stack: Vec<&'t Node<K>>,
	// root of the next subtree to descend into
	next: Option<&'t Node<K>>,
	remaining: usize,
}

impl<'t, K: BitString + Clone> Iter<'t, K> {
	pub(super) fn new(root: &'t Node<K>, len: usize) -> Self {
		Self {
			stack: Vec::new(),
			next: Some(root),
			remaining: len,
		}
	}
}

impl<'t, K: BitString + Clone> Iterator for Iter<'t, K> {
	type Item = &'t K;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			while let Some(node) = self.next {
				self.stack.push(node);
				self.next = node.left.as_deref();
			}
			let node = self.stack.pop()?;
			self.next = node.right.as_deref();
			if node.terminal {
				self.remaining -= 1;
				return Some(&node.key);
			}
		}
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining, Some(self.remaining))
	}
}

impl<'t, K: BitString + Clone> ExactSizeIterator for Iter<'t, K> {}

impl<'t, K> Clone for Iter<'t, K> {
	fn clone(&self) -> Self {
		Self {
			stack: self.stack.clone(),
			next: self.next,
			remaining: self.remaining,
		}
	}
}
