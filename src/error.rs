//! Error types

use thiserror::Error;

/// Failed to parse a [`BitKey`](crate::BitKey) from a string of binary digits
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("invalid binary digit {found:?} at position {position}")]
pub struct ParseBitKeyError {
	/// Character index of the offending character
	pub position: usize,
	/// The offending character
	pub found: char,
}

/// Errors returned by [`AvlgTree`](crate::avlg::AvlgTree)
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AvlgError {
	/// Maximum imbalance has to be at least 1
	#[error("imbalance value has to be at least 1 (provided: {0})")]
	InvalidBalance(usize),

	/// Operation needs at least one key in the tree
	#[error("tree is empty")]
	EmptyTree,
}
