const WORD_BITS: usize = u64::BITS as usize;

/// A growable bit set with one bit per geodesic sample direction.
///
/// Bits past `len` are always zero, so word-level operations such as
/// [`count_ones`](Self::count_ones) never see stale tail bits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VisibilityBitmap {
    words: Vec<u64>,
    len: usize,
}

impl VisibilityBitmap {
    /// Creates a bitmap of `len` cleared bits.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Creates a bitmap of `len` set bits.
    pub fn all_set(len: usize) -> Self {
        let mut bitmap = Self::default();
        bitmap.reset_all_set(len);
        bitmap
    }

    /// Resizes the bitmap to `len` bits and sets every one of them, reusing the
    /// existing allocation.
    pub fn reset_all_set(&mut self, len: usize) {
        self.words.clear();
        self.words.resize(len.div_ceil(WORD_BITS), u64::MAX);
        self.len = len;
        self.mask_tail();
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the bit at `index`; bits outside the bitmap read as cleared.
    pub fn get(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.words[index / WORD_BITS] & (1 << (index % WORD_BITS)) != 0
    }

    /// Sets the bit at `index`, growing the bitmap if needed.
    pub fn set(&mut self, index: usize) {
        if index >= self.len {
            self.len = index + 1;
            self.words.resize(self.len.div_ceil(WORD_BITS), 0);
        }
        self.words[index / WORD_BITS] |= 1 << (index % WORD_BITS);
    }

    pub fn clear(&mut self, index: usize) {
        if index < self.len {
            self.words[index / WORD_BITS] &= !(1 << (index % WORD_BITS));
        }
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns `true` if at least one bit is set.
    pub fn any(&self) -> bool {
        self.words.iter().any(|&w| w != 0)
    }

    /// Iterates over the indices of set bits in ascending order.
    pub fn iter_ones(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            word_index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    fn mask_tail(&mut self) {
        let used = self.len % WORD_BITS;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << used) - 1;
            }
        }
    }
}

pub struct Ones<'a> {
    words: &'a [u64],
    word_index: usize,
    current: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_index * WORD_BITS + bit);
            }
            self.word_index += 1;
            self.current = *self.words.get(self.word_index)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bitmap_has_no_set_bits() {
        let bitmap = VisibilityBitmap::new(100);
        assert_eq!(bitmap.len(), 100);
        assert_eq!(bitmap.count_ones(), 0);
        assert!(!bitmap.any());
    }

    #[test]
    fn all_set_does_not_leak_past_length() {
        let bitmap = VisibilityBitmap::all_set(70);
        assert_eq!(bitmap.count_ones(), 70);
        assert!(bitmap.get(69));
        assert!(!bitmap.get(70));
    }

    #[test]
    fn set_and_clear_toggle_individual_bits() {
        let mut bitmap = VisibilityBitmap::new(12);
        bitmap.set(3);
        bitmap.set(11);
        assert!(bitmap.get(3));
        bitmap.clear(3);
        assert!(!bitmap.get(3));
        assert!(bitmap.get(11));
    }

    #[test]
    fn set_beyond_length_grows_the_bitmap() {
        let mut bitmap = VisibilityBitmap::new(4);
        bitmap.set(130);
        assert_eq!(bitmap.len(), 131);
        assert!(bitmap.get(130));
        assert_eq!(bitmap.count_ones(), 1);
    }

    #[test]
    fn clear_beyond_length_is_ignored() {
        let mut bitmap = VisibilityBitmap::all_set(8);
        bitmap.clear(200);
        assert_eq!(bitmap.len(), 8);
        assert_eq!(bitmap.count_ones(), 8);
    }

    #[test]
    fn iter_ones_yields_indices_across_word_boundaries() {
        let mut bitmap = VisibilityBitmap::new(200);
        for index in [0, 5, 63, 64, 127, 199] {
            bitmap.set(index);
        }
        let ones: Vec<usize> = bitmap.iter_ones().collect();
        assert_eq!(ones, vec![0, 5, 63, 64, 127, 199]);
    }

    #[test]
    fn reset_all_set_reuses_storage_for_a_new_length() {
        let mut bitmap = VisibilityBitmap::all_set(642);
        bitmap.clear(0);
        bitmap.reset_all_set(42);
        assert_eq!(bitmap.len(), 42);
        assert_eq!(bitmap.count_ones(), 42);
    }

    #[test]
    fn empty_bitmap_iterates_nothing() {
        let bitmap = VisibilityBitmap::default();
        assert!(bitmap.is_empty());
        assert_eq!(bitmap.iter_ones().count(), 0);
    }
}
