//! Variable length bit strings used as trie keys

use core::{
	fmt,
	str::FromStr,
};

use bitstring::BitString;

use crate::error::ParseBitKeyError;

/// Growable bit string; bits are packed most significant bit first.
///
/// Unused bits in the last byte are always zero, so derived equality and
/// hashing only see the stored bits.
///
/// Parses from and displays as a string of `'0'` and `'1'` characters:
///
/// ```
/// use binary_patricia::BitKey;
///
/// let key: BitKey = "1001".parse().unwrap();
/// assert_eq!(key.to_string(), "1001");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitKey {
	bytes: Vec<u8>,
	len: usize,
}

#[inline]
fn mask(ndx: usize) -> u8 {
	0x80 >> (ndx % 8)
}

impl BitKey {
	/// New empty bit string
	pub const fn new() -> Self {
		Self {
			bytes: Vec::new(),
			len: 0,
		}
	}

	/// Whether the bit string has no bits at all
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Iterate over the bits; `true` is a `1`
	pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
		(0..self.len).map(move |ndx| self.get(ndx))
	}

	fn zero_tail(&mut self) {
		let used = self.len % 8;
		if used != 0 {
			if let Some(last) = self.bytes.last_mut() {
				*last &= 0xff << (8 - used);
			}
		}
	}
}

impl BitString for BitKey {
	fn get(&self, ndx: usize) -> bool {
		assert!(ndx < self.len, "bit index {} out of range for length {}", ndx, self.len);
		0 != self.bytes[ndx / 8] & mask(ndx)
	}

	fn set(&mut self, ndx: usize, bit: bool) {
		assert!(ndx < self.len, "bit index {} out of range for length {}", ndx, self.len);
		if bit {
			self.bytes[ndx / 8] |= mask(ndx);
		} else {
			self.bytes[ndx / 8] &= !mask(ndx);
		}
	}

	fn flip(&mut self, ndx: usize) {
		assert!(ndx < self.len, "bit index {} out of range for length {}", ndx, self.len);
		self.bytes[ndx / 8] ^= mask(ndx);
	}

	#[inline]
	fn len(&self) -> usize {
		self.len
	}

	fn clip(&mut self, len: usize) {
		if len >= self.len {
			return;
		}
		self.len = len;
		self.bytes.truncate((len + 7) / 8);
		self.zero_tail();
	}

	fn append(&mut self, bit: bool) {
		if self.len % 8 == 0 {
			self.bytes.push(0);
		}
		self.len += 1;
		self.set(self.len - 1, bit);
	}

	fn null() -> Self {
		Self::new()
	}

	fn shared_prefix_len(&self, other: &Self) -> usize {
		let max_len = core::cmp::min(self.len, other.len);
		// whole bytes first; the tail bytes are zero padded so a mismatch
		// beyond `max_len` is cut off below
		let mismatch = self
			.bytes
			.iter()
			.zip(other.bytes.iter())
			.enumerate()
			.find(|(_, (a, b))| a != b);
		match mismatch {
			None => max_len,
			Some((ndx, (a, b))) => {
				let bit = ndx * 8 + (a ^ b).leading_zeros() as usize;
				core::cmp::min(bit, max_len)
			},
		}
	}
}

/// Longest shared leading bit string of `a` and `b`
///
/// Stops at the first mismatch or at the end of the shorter string; the
/// result might be empty.
pub fn longest_common_prefix<K>(a: &K, b: &K) -> K
where
	K: BitString + Clone,
{
	let mut prefix = a.clone();
	prefix.clip(a.shared_prefix_len(b));
	prefix
}

impl FromStr for BitKey {
	type Err = ParseBitKeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut key = Self::new();
		for (position, found) in s.chars().enumerate() {
			match found {
				'0' => key.append(false),
				'1' => key.append(true),
				_ => return Err(ParseBitKeyError { position, found }),
			}
		}
		Ok(key)
	}
}

impl fmt::Display for BitKey {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for bit in self.bits() {
			f.write_str(if bit { "1" } else { "0" })?;
		}
		Ok(())
	}
}

impl fmt::Debug for BitKey {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "BitKey({:?})", self.to_string())
	}
}

impl FromIterator<bool> for BitKey {
	fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
		let mut key = Self::new();
		for bit in iter {
			key.append(bit);
		}
		key
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn key(s: &str) -> BitKey {
		s.parse().expect("valid bit string")
	}

	// plain bit by bit definition to compare the byte-wise fast path against
	fn naive_shared_prefix_len(a: &BitKey, b: &BitKey) -> usize {
		a.bits().zip(b.bits()).take_while(|(x, y)| x == y).count()
	}

	#[test]
	fn parse_and_display() {
		assert_eq!(key("").to_string(), "");
		assert_eq!(key("0").to_string(), "0");
		assert_eq!(key("0110100111").to_string(), "0110100111");
		assert_eq!(key("0110100111").len(), 10);
		assert_eq!(format!("{:?}", key("10")), "BitKey(\"10\")");
	}

	#[test]
	fn parse_rejects_other_characters() {
		assert_eq!(
			"01a1".parse::<BitKey>(),
			Err(ParseBitKeyError {
				position: 2,
				found: 'a',
			})
		);
		assert!(" 01".parse::<BitKey>().is_err());
		assert!("012".parse::<BitKey>().is_err());
	}

	#[test]
	fn clip_zeroes_tail() {
		let mut a = key("1111111111");
		a.clip(3);
		assert_eq!(a, key("111"));
		a.clip(7);
		assert_eq!(a, key("111"));
		let mut b = key("11111111");
		b.clip(0);
		assert_eq!(b, BitKey::null());
		assert!(b.is_empty());
	}

	#[test]
	fn set_and_flip() {
		let mut a = key("0000");
		a.set(1, true);
		a.flip(3);
		assert_eq!(a, key("0101"));
		a.flip(1);
		assert_eq!(a, key("0001"));
	}

	#[test]
	fn shared_prefix_matches_bitwise_definition() {
		let samples = [
			"", "0", "1", "01", "0100", "01001", "0100110", "01001101", "010011010",
			"0100110100110", "1111111100000000", "11111111000000001",
		];
		for a in samples.iter().map(|s| key(s)) {
			for b in samples.iter().map(|s| key(s)) {
				assert_eq!(
					a.shared_prefix_len(&b),
					naive_shared_prefix_len(&a, &b),
					"{} vs {}",
					a,
					b
				);
			}
		}
	}

	#[test]
	fn common_prefix() {
		assert_eq!(longest_common_prefix(&key("0101"), &key("0110")), key("01"));
		assert_eq!(longest_common_prefix(&key("0101"), &key("01")), key("01"));
		assert_eq!(longest_common_prefix(&key("1"), &key("0")), key(""));
		assert_eq!(longest_common_prefix(&key(""), &key("0")), key(""));
		assert_eq!(
			longest_common_prefix(&key("101010101"), &key("101010101")),
			key("101010101")
		);
	}
}
