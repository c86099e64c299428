//! Zero-copy byte cursor for payload decoding

/// Cursor over a payload buffer that remembers where the buffer sits in the stream
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
    base: u64,
}

impl<'a> ByteCursor<'a> {
    /// `base` is the stream offset of `data[0]`, used for error positions
    pub fn new(data: &'a [u8], base: u64) -> Self {
        Self {
            data,
            position: 0,
            base,
        }
    }

    /// Take exactly `count` bytes as a zero-copy slice
    pub fn take(&mut self, count: usize) -> Option<&'a [u8]> {
        let end = self.position.checked_add(count)?;
        let slice = self.data.get(self.position..end)?;
        self.position = end;
        Some(slice)
    }

    /// Absolute stream offset of the next unread byte
    pub fn offset(&self) -> u64 {
        self.base + self.position as u64
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_zero() {
        let mut cursor = ByteCursor::new(b"hello", 0);
        assert_eq!(cursor.take(0), Some(&b""[..]));
        assert_eq!(cursor.remaining(), 5);
    }

    #[test]
    fn take_chained() {
        let mut cursor = ByteCursor::new(b"helloworld", 100);
        assert_eq!(cursor.take(5), Some(&b"hello"[..]));
        assert_eq!(cursor.offset(), 105);
        assert_eq!(cursor.take(5), Some(&b"world"[..]));
        assert!(cursor.is_empty());
    }

    #[test]
    fn take_too_many() {
        let mut cursor = ByteCursor::new(b"hi", 0);
        assert!(cursor.take(10).is_none());
        // Failed take does not advance
        assert_eq!(cursor.remaining(), 2);
    }

    #[test]
    fn take_is_zero_copy() {
        let data = b"hello";
        let mut cursor = ByteCursor::new(data, 0);
        let slice = cursor.take(5).unwrap();
        assert!(std::ptr::eq(slice.as_ptr(), data.as_ptr()));
    }
}
