use bytes::Buf;

/// Bounds-checked big-endian reads. `bytes::Buf` panics on underflow, these
/// return `None` instead so every parser can map a short read to its own error.
pub(crate) trait BufExt: Buf {
    fn take_u8(&mut self) -> Option<u8> {
        (self.remaining() >= 1).then(|| self.get_u8())
    }

    fn take_u32(&mut self) -> Option<u32> {
        (self.remaining() >= 4).then(|| self.get_u32())
    }

    fn take_i32(&mut self) -> Option<i32> {
        (self.remaining() >= 4).then(|| self.get_i32())
    }

    fn take_u64(&mut self) -> Option<u64> {
        (self.remaining() >= 8).then(|| self.get_u64())
    }

    fn take_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        if self.remaining() < N {
            return None;
        }
        let mut out = [0; N];
        self.copy_to_slice(&mut out);
        Some(out)
    }

    fn take_vec(&mut self, len: usize) -> Option<Vec<u8>> {
        if self.remaining() < len {
            return None;
        }
        let mut out = vec![0; len];
        self.copy_to_slice(&mut out);
        Some(out)
    }

    fn take_utf16(&mut self, chars: usize) -> Option<Vec<u16>> {
        let len = chars.checked_mul(2)?;
        if self.remaining() < len {
            return None;
        }
        Some((0..chars).map(|_| self.get_u16()).collect())
    }
}

impl<T: Buf + ?Sized> BufExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_reads_return_none() {
        let mut buf: &[u8] = &[1, 2, 3];
        assert_eq!(buf.take_u32(), None);
        assert_eq!(buf.remaining(), 3);
        assert_eq!(buf.take_u8(), Some(1));
        assert_eq!(buf.take_array::<2>(), Some([2, 3]));
        assert_eq!(buf.take_u8(), None);
    }

    #[test]
    fn utf16_is_big_endian() {
        let mut buf: &[u8] = &[0, 0x41, 0x04, 0x10, 0];
        assert_eq!(buf.take_utf16(2), Some(vec![0x41, 0x0410]));
        assert_eq!(buf.take_utf16(1), None);
    }
}
