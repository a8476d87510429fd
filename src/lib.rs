//! Ordered-key trees for bit strings and ordered keys
//!
//! * [`PatriciaTrie`]: set of bit strings in a binary Patricia trie
//!   (path compressed binary trie), generic over [`bitstring::BitString`]
//!   keys with [`BitKey`] as default.
//! * [`avlg::AvlgTree`]: binary search tree with a relaxed AVL balance
//!   condition.
#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/binary-patricia/0.1.0")]

extern crate bitstring;

pub mod avlg;
pub mod error;
pub mod key;
pub mod patricia;

pub use self::{
	error::{
		AvlgError,
		ParseBitKeyError,
	},
	key::{
		longest_common_prefix,
		BitKey,
	},
	patricia::PatriciaTrie,
};
