//! Netlink attribute (rtattr/nlattr) handling.

use super::buffer::MessageBuffer;
use super::error::{Error, Result};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Netlink attribute alignment.
pub const NLA_ALIGNTO: usize = 4;

/// Align a length to NLA_ALIGNTO boundary.
#[inline]
pub const fn nla_align(len: usize) -> usize {
    (len + NLA_ALIGNTO - 1) & !(NLA_ALIGNTO - 1)
}

/// Size of the attribute header.
pub const NLA_HDRLEN: usize = nla_align(std::mem::size_of::<NlAttr>());

/// Largest value that still fits the 16-bit length field.
pub const NLA_MAX_PAYLOAD: usize = u16::MAX as usize - NLA_HDRLEN;

/// On-wire size of an attribute carrying `payload_len` bytes, padding included.
#[inline]
pub const fn nla_size(payload_len: usize) -> usize {
    nla_align(NLA_HDRLEN + payload_len)
}

/// Netlink attribute header (mirrors struct nlattr / struct rtattr).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlAttr {
    /// Length including header, excluding padding.
    pub nla_len: u16,
    /// Attribute type.
    pub nla_type: u16,
}

/// Attribute type flags.
pub const NLA_F_NESTED: u16 = 1 << 15;
pub const NLA_F_NET_BYTEORDER: u16 = 1 << 14;
pub const NLA_TYPE_MASK: u16 = !(NLA_F_NESTED | NLA_F_NET_BYTEORDER);

impl NlAttr {
    /// Create a new attribute header.
    pub fn new(attr_type: u16, data_len: usize) -> Self {
        Self {
            nla_len: (NLA_HDRLEN + data_len) as u16,
            nla_type: attr_type,
        }
    }

    /// Get the attribute type without flags.
    pub fn kind(&self) -> u16 {
        self.nla_type & NLA_TYPE_MASK
    }

    /// Get the payload length (total length minus header).
    pub fn payload_len(&self) -> usize {
        (self.nla_len as usize).saturating_sub(NLA_HDRLEN)
    }

    /// Convert to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }
}

/// Append one attribute to `buf` at the next aligned offset.
///
/// Returns the number of bytes written, which is always
/// [`nla_size`]`(value.len())` plus any padding needed to reach the
/// aligned start. On overflow nothing is written.
pub fn encode(buf: &mut MessageBuffer, attr_type: u16, value: &[u8]) -> Result<usize> {
    if value.len() > NLA_MAX_PAYLOAD {
        return Err(Error::BufferOverflow {
            needed: NLA_HDRLEN + value.len(),
            available: u16::MAX as usize,
        });
    }

    let lead = nla_align(buf.len()) - buf.len();
    let total = lead + nla_size(value.len());
    buf.ensure(total)?;

    let attr = NlAttr::new(attr_type, value.len());
    buf.put_zeroes(lead)?;
    buf.put_slice(attr.as_bytes())?;
    buf.put_slice(value)?;
    buf.put_zeroes(nla_size(value.len()) - NLA_HDRLEN - value.len())?;

    Ok(total)
}

/// Iterator over netlink attributes in a buffer.
///
/// Yields `(type, payload)` pairs. A length field that is shorter than the
/// header or runs past the end of the buffer yields one
/// [`Error::Truncated`] and ends the iteration.
#[derive(Debug, Clone)]
pub struct AttrIter<'a> {
    data: &'a [u8],
}

impl<'a> AttrIter<'a> {
    /// Create a new attribute iterator.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Check if there are no more attributes.
    pub fn is_empty(&self) -> bool {
        self.data.len() < NLA_HDRLEN
    }
}

impl<'a> Iterator for AttrIter<'a> {
    /// Returns (attribute type, payload data).
    type Item = Result<(u16, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.len() < NLA_HDRLEN {
            return None;
        }

        let attr = match NlAttr::from_bytes(self.data) {
            Ok(a) => a,
            Err(e) => {
                self.data = &[];
                return Some(Err(e));
            }
        };

        let len = attr.nla_len as usize;
        if len < NLA_HDRLEN || len > self.data.len() {
            let actual = self.data.len();
            self.data = &[];
            return Some(Err(Error::Truncated {
                expected: len.max(NLA_HDRLEN),
                actual,
            }));
        }

        let item = (attr.kind(), &self.data[NLA_HDRLEN..len]);
        let aligned_len = nla_align(len);

        // The last attribute may omit its trailing padding.
        if aligned_len >= self.data.len() {
            self.data = &[];
        } else {
            self.data = &self.data[aligned_len..];
        }

        Some(Ok(item))
    }
}

/// Helper functions for extracting typed values from attribute payloads.
pub mod get {
    use super::*;

    /// Extract a u8 value.
    pub fn u8(data: &[u8]) -> Result<u8> {
        data.first()
            .copied()
            .ok_or_else(|| Error::InvalidAttribute("empty u8 attribute".into()))
    }

    /// Extract a u16 value (native endian).
    pub fn u16_ne(data: &[u8]) -> Result<u16> {
        match data {
            [a, b, ..] => Ok(u16::from_ne_bytes([*a, *b])),
            _ => Err(Error::InvalidAttribute("truncated u16 attribute".into())),
        }
    }

    /// Extract a u32 value (native endian).
    pub fn u32_ne(data: &[u8]) -> Result<u32> {
        match data {
            [a, b, c, d, ..] => Ok(u32::from_ne_bytes([*a, *b, *c, *d])),
            _ => Err(Error::InvalidAttribute("truncated u32 attribute".into())),
        }
    }

    /// Extract an i32 value (native endian).
    pub fn i32_ne(data: &[u8]) -> Result<i32> {
        u32_ne(data).map(|v| v as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(data: &[u8]) -> Result<Vec<(u16, Vec<u8>)>> {
        AttrIter::new(data)
            .map(|attr| attr.map(|(kind, value)| (kind, value.to_vec())))
            .collect()
    }

    #[test]
    fn encoded_size_is_aligned() {
        for len in 0..12 {
            let mut buf = MessageBuffer::new();
            let written = encode(&mut buf, 1, &vec![0xaa; len]).unwrap();
            assert_eq!(written, nla_align(NLA_HDRLEN + len));
            assert_eq!(buf.len(), written);
        }
    }

    #[test]
    fn one_byte_value_is_padded() {
        let mut buf = MessageBuffer::new();
        assert_eq!(encode(&mut buf, 2, &[0x04]).unwrap(), 8);
        // nla_len excludes the three padding bytes
        assert_eq!(&buf.as_bytes()[..2], &5u16.to_ne_bytes());
        assert_eq!(&buf.as_bytes()[2..4], &2u16.to_ne_bytes());
        assert_eq!(&buf.as_bytes()[4..], &[0x04, 0, 0, 0]);
    }

    #[test]
    fn encode_starts_at_aligned_offset() {
        let mut buf = MessageBuffer::new();
        buf.put_slice(&[1, 2, 3, 4, 5]).unwrap();
        let written = encode(&mut buf, 1, &[7, 7, 7, 7]).unwrap();
        assert_eq!(written, 3 + 8);
        assert_eq!(buf.len(), 16);
        assert_eq!(&buf.as_bytes()[5..8], &[0, 0, 0]);
    }

    #[test]
    fn round_trip_preserves_order() {
        let attrs: Vec<(u16, Vec<u8>)> = vec![
            (1, vec![0x40]),
            (4, 7u32.to_ne_bytes().to_vec()),
            (3, b"phonet0\0".to_vec()),
            (9, vec![]),
            (2, vec![1, 2, 3, 4, 5, 6]),
        ];

        let mut buf = MessageBuffer::new();
        for (kind, value) in &attrs {
            encode(&mut buf, *kind, value).unwrap();
        }

        assert_eq!(collect(buf.as_bytes()).unwrap(), attrs);
    }

    #[test]
    fn iterator_is_restartable() {
        let mut buf = MessageBuffer::new();
        encode(&mut buf, 1, &[0x10]).unwrap();
        encode(&mut buf, 4, &3u32.to_ne_bytes()).unwrap();

        let iter = AttrIter::new(buf.as_bytes());
        let first: Vec<_> = iter.clone().map(|a| a.unwrap().0).collect();
        let second: Vec<_> = iter.map(|a| a.unwrap().0).collect();
        assert_eq!(first, vec![1, 4]);
        assert_eq!(first, second);
    }

    #[test]
    fn overlong_length_is_truncated() {
        let mut buf = MessageBuffer::new();
        encode(&mut buf, 1, &[0x10]).unwrap();
        let mut data = buf.into_vec();
        // second attribute claims 64 bytes but only carries 4
        data.extend_from_slice(&64u16.to_ne_bytes());
        data.extend_from_slice(&2u16.to_ne_bytes());
        data.extend_from_slice(&[0; 4]);

        let mut iter = AttrIter::new(&data);
        assert_eq!(iter.next().unwrap().unwrap(), (1, &[0x10][..]));
        assert!(matches!(
            iter.next(),
            Some(Err(Error::Truncated {
                expected: 64,
                actual: 8
            }))
        ));
        assert!(iter.next().is_none());
    }

    #[test]
    fn undersized_length_is_truncated() {
        let mut data = Vec::new();
        data.extend_from_slice(&2u16.to_ne_bytes());
        data.extend_from_slice(&1u16.to_ne_bytes());
        data.extend_from_slice(&[0; 4]);

        let mut iter = AttrIter::new(&data);
        assert!(matches!(iter.next(), Some(Err(Error::Truncated { .. }))));
        assert!(iter.next().is_none());
    }

    #[test]
    fn trailing_bytes_shorter_than_header_are_ignored() {
        let mut buf = MessageBuffer::new();
        encode(&mut buf, 1, &[1, 2, 3, 4]).unwrap();
        let mut data = buf.into_vec();
        data.extend_from_slice(&[0, 0]);
        assert_eq!(collect(&data).unwrap().len(), 1);
    }

    #[test]
    fn overflow_writes_nothing() {
        let mut buf = MessageBuffer::with_limit(8);
        let err = encode(&mut buf, 1, &[0; 8]).unwrap_err();
        assert!(matches!(err, Error::BufferOverflow { needed: 12, .. }));
        assert!(buf.is_empty());
    }

    #[test]
    fn oversized_value_is_rejected() {
        let mut buf = MessageBuffer::new();
        let value = vec![0; NLA_MAX_PAYLOAD + 1];
        assert!(matches!(
            encode(&mut buf, 1, &value),
            Err(Error::BufferOverflow { .. })
        ));
    }

    #[test]
    fn flags_are_masked_from_kind() {
        let attr = NlAttr::new(NLA_F_NESTED | 3, 0);
        assert_eq!(attr.kind(), 3);
    }

    #[test]
    fn typed_getters() {
        assert_eq!(get::u8(&[0x44]).unwrap(), 0x44);
        assert!(get::u8(&[]).is_err());
        assert_eq!(get::u32_ne(&9u32.to_ne_bytes()).unwrap(), 9);
        assert!(get::u32_ne(&[1, 2]).is_err());
        assert_eq!(get::u16_ne(&7u16.to_ne_bytes()).unwrap(), 7);
        assert_eq!(get::i32_ne(&(-5i32).to_ne_bytes()).unwrap(), -5);
    }
}
