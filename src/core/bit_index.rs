/// Fixed-width bit container with reversed (qubit-order) display.
///
/// Basis-state indices store qubit k in bit k (LSB = qubit 0). Physics
/// notation, and every label this crate prints, writes qubit 0 first:
///
/// ```text
/// value 178 = 0b1011_0010   (conventional, MSB first)
/// display   = "01001101"    (qubit 0 … qubit 7)
/// ```
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitIndex<const N: usize> {
    bits: u64,
}

impl<const N: usize> BitIndex<N> {
    const MASK: u64 = {
        assert!(N >= 1 && N <= 64, "BitIndex width must be in 1..=64");
        u64::MAX >> (64 - N)
    };

    /// Build from `value`, reduced modulo 2^N.
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self { bits: value & Self::MASK }
    }

    /// Stored value after reduction.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.bits
    }

    /// Number of bits.
    #[inline]
    pub const fn width(&self) -> usize {
        N
    }

    /// Storage-order access: bit `k` counted from the least-significant end.
    #[inline]
    pub const fn test(&self, k: usize) -> bool {
        k < N && (self.bits >> k) & 1 == 1
    }

    /// Reversed-order access: position `i` maps to storage bit `N - 1 - i`.
    ///
    /// Returns `None` when `i >= N`.
    #[inline]
    pub const fn bit_at(&self, i: usize) -> Option<bool> {
        if i >= N {
            return None;
        }
        Some(self.test(N - 1 - i))
    }

    /// Characters of the display string, qubit 0 first.
    pub fn display_chars(&self) -> impl Iterator<Item = char> + '_ {
        (0..N).map(move |k| if self.test(k) { '1' } else { '0' })
    }

    /// `N`-character '0'/'1' string with qubit 0 leftmost.
    pub fn to_display_string(&self) -> String {
        self.display_chars().collect()
    }
}

impl<const N: usize> From<u64> for BitIndex<N> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<const N: usize> From<usize> for BitIndex<N> {
    fn from(value: usize) -> Self {
        Self::new(value as u64)
    }
}

impl<const N: usize> fmt::Display for BitIndex<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.display_chars() {
            fmt::Write::write_char(f, c)?;
        }
        Ok(())
    }
}

/// Label a basis state of an `num_qubits`-wide register, qubit 0 leftmost.
pub fn basis_label(index: usize, num_qubits: usize) -> String {
    BitIndex::<64>::from(index)
        .display_chars()
        .take(num_qubits)
        .collect()
}
