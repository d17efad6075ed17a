/// Destination for chars that knows how much room it has left.
pub trait CharTarget {
    fn remaining(&self) -> usize;

    /// Appends `chars`. Callers never pass more than `remaining()` chars.
    fn put(&mut self, chars: &[char]);
}

/// Fixed capacity char buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharBuffer {
    data: Vec<char>,
    capacity: usize,
}

impl CharBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_chars(&self) -> &[char] {
        &self.data
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl CharTarget for CharBuffer {
    fn remaining(&self) -> usize {
        self.capacity - self.data.len()
    }

    fn put(&mut self, chars: &[char]) {
        let n = chars.len().min(self.remaining());
        self.data.extend_from_slice(&chars[..n]);
    }
}

impl std::fmt::Display for CharBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for c in &self.data {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
