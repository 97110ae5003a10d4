use bytes::{Bytes, BytesMut};

/// Run `write` against a buffer sized for exactly `len` bytes and freeze it.
///
/// Every encoder knows its output length up front; a writer that appends a
/// different number of bytes is a bug in the encoder, not bad input.
pub fn build_exact<F>(len: usize, write: F) -> Bytes
where
    F: FnOnce(&mut BytesMut),
{
    let mut buf = BytesMut::with_capacity(len);
    write(&mut buf);
    assert_eq!(buf.len(), len, "encoder wrote {} bytes, expected {}", buf.len(), len);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BufMut;

    #[test]
    fn test_build_exact() {
        let bytes = build_exact(6, |buf| {
            buf.put_u16(0x04D2);
            buf.put_u32(60);
        });
        assert_eq!(&bytes[..], &[0x04, 0xD2, 0, 0, 0, 60]);
    }

    #[test]
    #[should_panic(expected = "expected 4")]
    fn test_build_exact_rejects_short_write() {
        build_exact(4, |buf| buf.put_u16(1));
    }
}
