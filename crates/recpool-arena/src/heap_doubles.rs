//! Heap double-array medium.
//!
//! Stores slots in a `Vec<f64>` so numeric consumers (spatial trees,
//! coordinate scans) can read packed doubles straight out of
//! [`HeapDoubleArray::as_f64_slice`] without per-field decoding. Every
//! other primitive is still reachable at any byte offset; it is simply
//! spliced in and out of the 8-byte words that hold it.
//!
//! The stride is rounded up to a multiple of 8 so every slot starts on a
//! word boundary: `f64` fields at offsets that are multiples of 8 then map
//! to exactly one word.

use crate::medium::{BackingArray, Medium};

/// Word ceiling of one array: the largest signed-32-bit element count.
const MAX_WORDS: usize = i32::MAX as usize;

/// Medium producing [`HeapDoubleArray`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeapDoubles {
    word_limit: usize,
}

impl HeapDoubles {
    /// Medium with the default element ceiling.
    pub fn new() -> Self {
        Self {
            word_limit: MAX_WORDS,
        }
    }

    /// Medium whose arrays never exceed `word_limit` doubles.
    pub fn with_word_limit(word_limit: usize) -> Self {
        Self {
            word_limit: word_limit.min(MAX_WORDS),
        }
    }
}

impl Default for HeapDoubles {
    fn default() -> Self {
        Self::new()
    }
}

impl Medium for HeapDoubles {
    type Array = HeapDoubleArray;

    fn name(&self) -> &'static str {
        "heap-doubles"
    }

    fn stride(&self, record_bytes: usize) -> usize {
        record_bytes.max(1).div_ceil(8) * 8
    }

    fn max_elements(&self, stride: usize) -> usize {
        self.word_limit / (stride / 8).max(1)
    }

    fn allocate(&self, stride: usize, elements: usize) -> HeapDoubleArray {
        HeapDoubleArray::new(stride, elements, self.max_elements(stride))
    }
}

/// A backing array stored in a `Vec<f64>`.
#[derive(Clone, Debug)]
pub struct HeapDoubleArray {
    words: Vec<f64>,
    /// Words per slot.
    stride_words: usize,
    max_size: usize,
}

impl HeapDoubleArray {
    /// Create an array of `elements` zeroed slots of `stride` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `stride` is not a multiple of 8 or `elements > max_size`.
    pub fn new(stride: usize, elements: usize, max_size: usize) -> Self {
        assert!(stride % 8 == 0, "double array stride {stride} is not a multiple of 8");
        assert!(
            elements <= max_size,
            "double array of {elements} slots exceeds limit {max_size}"
        );
        let stride_words = stride / 8;
        Self {
            words: vec![0.0; elements * stride_words],
            stride_words,
            max_size,
        }
    }

    /// Every slot's words, packed back to back.
    pub fn as_f64_slice(&self) -> &[f64] {
        &self.words
    }

    /// Every slot's words, mutably.
    pub fn as_f64_slice_mut(&mut self) -> &mut [f64] {
        &mut self.words
    }

    /// Words per slot in [`as_f64_slice`](Self::as_f64_slice).
    pub fn f64_stride(&self) -> usize {
        self.stride_words
    }

    fn word_bytes(&self, w: usize) -> [u8; 8] {
        self.words[w].to_bits().to_le_bytes()
    }

    fn set_word_bytes(&mut self, w: usize, bytes: [u8; 8]) {
        self.words[w] = f64::from_bits(u64::from_le_bytes(bytes));
    }

    fn read<const N: usize>(&self, offset: usize) -> [u8; N] {
        let (w, s) = (offset / 8, offset % 8);
        let mut out = [0u8; N];
        if s + N <= 8 {
            out.copy_from_slice(&self.word_bytes(w)[s..s + N]);
        } else {
            let mut pair = [0u8; 16];
            pair[..8].copy_from_slice(&self.word_bytes(w));
            pair[8..].copy_from_slice(&self.word_bytes(w + 1));
            out.copy_from_slice(&pair[s..s + N]);
        }
        out
    }

    fn write(&mut self, offset: usize, value: &[u8]) {
        let (w, s, n) = (offset / 8, offset % 8, value.len());
        if s + n <= 8 {
            let mut word = self.word_bytes(w);
            word[s..s + n].copy_from_slice(value);
            self.set_word_bytes(w, word);
        } else {
            let mut pair = [0u8; 16];
            pair[..8].copy_from_slice(&self.word_bytes(w));
            pair[8..].copy_from_slice(&self.word_bytes(w + 1));
            pair[s..s + n].copy_from_slice(value);
            let mut lo = [0u8; 8];
            let mut hi = [0u8; 8];
            lo.copy_from_slice(&pair[..8]);
            hi.copy_from_slice(&pair[8..]);
            self.set_word_bytes(w, lo);
            self.set_word_bytes(w + 1, hi);
        }
    }

    fn slot_range(&self, index: usize) -> std::ops::Range<usize> {
        index * self.stride_words..(index + 1) * self.stride_words
    }
}

impl BackingArray for HeapDoubleArray {
    fn bytes_per_element(&self) -> usize {
        self.stride_words * 8
    }

    fn size(&self) -> usize {
        self.words.len() / self.stride_words.max(1)
    }

    fn max_size(&self) -> usize {
        self.max_size
    }

    fn resize(&mut self, new_size: usize) {
        assert!(
            new_size <= self.max_size,
            "double array of {new_size} slots exceeds limit {}",
            self.max_size
        );
        self.words.resize(new_size * self.stride_words, 0.0);
    }

    fn swap_element(&mut self, index: usize, other: &mut Self, other_index: usize) {
        debug_assert_eq!(self.stride_words, other.stride_words);
        let mine = self.slot_range(index);
        let theirs = other.slot_range(other_index);
        self.words[mine].swap_with_slice(&mut other.words[theirs]);
    }

    fn swap_within(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let stride = self.stride_words;
        let (left, right) = self.words.split_at_mut(hi * stride);
        left[lo * stride..(lo + 1) * stride].swap_with_slice(&mut right[..stride]);
    }

    fn memory_bytes(&self) -> usize {
        self.words.len() * std::mem::size_of::<f64>()
    }

    #[inline]
    fn get_i8(&self, offset: usize) -> i8 {
        self.read::<1>(offset)[0] as i8
    }

    #[inline]
    fn get_i16(&self, offset: usize) -> i16 {
        i16::from_le_bytes(self.read(offset))
    }

    #[inline]
    fn get_i32(&self, offset: usize) -> i32 {
        i32::from_le_bytes(self.read(offset))
    }

    #[inline]
    fn get_i64(&self, offset: usize) -> i64 {
        if offset % 8 == 0 {
            self.words[offset / 8].to_bits() as i64
        } else {
            i64::from_le_bytes(self.read(offset))
        }
    }

    #[inline]
    fn get_f32(&self, offset: usize) -> f32 {
        f32::from_le_bytes(self.read(offset))
    }

    #[inline]
    fn get_f64(&self, offset: usize) -> f64 {
        if offset % 8 == 0 {
            self.words[offset / 8]
        } else {
            f64::from_le_bytes(self.read(offset))
        }
    }

    #[inline]
    fn put_i8(&mut self, offset: usize, value: i8) {
        self.write(offset, &value.to_le_bytes());
    }

    #[inline]
    fn put_i16(&mut self, offset: usize, value: i16) {
        self.write(offset, &value.to_le_bytes());
    }

    #[inline]
    fn put_i32(&mut self, offset: usize, value: i32) {
        self.write(offset, &value.to_le_bytes());
    }

    #[inline]
    fn put_i64(&mut self, offset: usize, value: i64) {
        if offset % 8 == 0 {
            self.words[offset / 8] = f64::from_bits(value as u64);
        } else {
            self.write(offset, &value.to_le_bytes());
        }
    }

    #[inline]
    fn put_f32(&mut self, offset: usize, value: f32) {
        self.write(offset, &value.to_le_bytes());
    }

    #[inline]
    fn put_f64(&mut self, offset: usize, value: f64) {
        if offset % 8 == 0 {
            self.words[offset / 8] = value;
        } else {
            self.write(offset, &value.to_le_bytes());
        }
    }
}
