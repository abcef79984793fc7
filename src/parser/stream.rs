use crate::error::{DecodeError, Result};

/// Big-endian cursor over the custom-field segment.
///
/// Every read is bounds-checked up front, so a failed read leaves the
/// position untouched.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pub pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn is_readable(&self) -> bool {
        self.pos < self.data.len()
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            Err(DecodeError::UnexpectedEof {
                needed,
                remaining: self.remaining(),
            })
        } else {
            Ok(())
        }
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let data: &'a [u8] = self.data;
        let slice = &data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_slice(len).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_slice(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_slice(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let bytes = self.read_slice(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(buf))
    }

    /// Read a NUL-terminated ASCII string and consume the terminator.
    ///
    /// Returns `None` for an empty string. A missing terminator is an
    /// underrun: the string would run past the end of the segment.
    pub fn read_cstring(&mut self) -> Result<Option<String>> {
        let rest = self.data.get(self.pos..).unwrap_or_default();
        let end = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(DecodeError::UnexpectedEof {
                needed: rest.len() + 1,
                remaining: rest.len(),
            })?;
        let text = if end > 0 {
            Some(rest[..end].iter().map(|&b| b as char).collect())
        } else {
            None
        };
        self.pos += end + 1;
        Ok(text)
    }
}
