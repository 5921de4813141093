use byteorder::ByteOrder;
use util::Endian;

/// Raw little-endian byte stream produced by the encoder.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CodeBuffer {
    bytes: Vec<u8>,
}

impl CodeBuffer {
    pub fn new() -> CodeBuffer {
        CodeBuffer { bytes: Vec::new() }
    }

    pub fn push(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn append_u16(&mut self, value: u16) {
        let mut buf = [0u8; 2];
        Endian::write_u16(&mut buf, value);
        self.extend(&buf);
    }

    pub fn append_u32(&mut self, value: u32) {
        let mut buf = [0u8; 4];
        Endian::write_u32(&mut buf, value);
        self.extend(&buf);
    }

    pub fn append_u64(&mut self, value: u64) {
        let mut buf = [0u8; 8];
        Endian::write_u64(&mut buf, value);
        self.extend(&buf);
    }

    /// Overwrites four bytes at `position` with a little-endian value.
    /// Fails when the range does not lie inside the buffer.
    pub fn patch_u32(&mut self, position: usize, value: u32) -> Result<(), ()> {
        let end = position.checked_add(4).ok_or(())?;
        if end > self.bytes.len() {
            return Err(());
        }
        Endian::write_u32(&mut self.bytes[position..end], value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl std::ops::Deref for CodeBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes[..]
    }
}
