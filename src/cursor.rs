use super::errors::{ErrorKind, Result};
use byteorder::{ByteOrder, LittleEndian};

/// Positional reader over a raw lump. All multi-byte reads are little-endian,
/// matching the on-disk format; every read advances the position by the width
/// it consumed.
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> ByteCursor<'a> {
        ByteCursor { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.bytes.len() {
            return Err(ErrorKind::seek_out_of_range(pos, self.bytes.len()).into());
        }
        self.pos = pos;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    /// Reads a fixed-width name field: `len` bytes, truncated at the first
    /// NUL and upper-cased. Names are case-insensitive on disk but compared
    /// case-sensitively once loaded.
    pub fn read_fixed_str(&mut self, len: usize) -> Result<String> {
        let bytes = self.take(len)?;
        let end = bytes.iter().position(|&byte| byte == 0).unwrap_or(len);
        Ok(String::from_utf8_lossy(&bytes[..end]).to_ascii_uppercase())
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(ErrorKind::truncated_read(count, self.remaining()).into());
        }
        let bytes = &self.bytes[self.pos..self.pos + count];
        self.pos += count;
        Ok(bytes)
    }
}

#[cfg(test)]
mod test {
    use super::super::errors::ErrorKind;
    use super::ByteCursor;

    #[test]
    fn test_reads_advance_and_are_little_endian() {
        let bytes = [0x01, 0xff, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_u8().unwrap(), 0x01);
        assert_eq!(cursor.read_i8().unwrap(), -1);
        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        assert_eq!(cursor.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(cursor.position(), 8);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_signed_reads() {
        let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_i16().unwrap(), -1);
        assert_eq!(cursor.read_i32().unwrap(), -1);
    }

    #[test]
    fn test_truncated_read_fails_with_kind() {
        let bytes = [0x01, 0x02, 0x03];
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_u16().unwrap(), 0x0201);
        let error = cursor.read_u16().unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::TruncatedData(_)));
        // A failed read leaves the position where it was.
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.read_u8().unwrap(), 0x03);
    }

    #[test]
    fn test_seek() {
        let bytes = [0x0a, 0x0b, 0x0c];
        let mut cursor = ByteCursor::new(&bytes);
        cursor.seek(2).unwrap();
        assert_eq!(cursor.read_u8().unwrap(), 0x0c);
        cursor.seek(3).unwrap();
        assert_eq!(cursor.remaining(), 0);
        let error = cursor.seek(4).unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::OutOfRange(_)));
    }

    #[test]
    fn test_read_fixed_str_truncates_and_uppercases() {
        let bytes = b"flat5\0\0\0MORE";
        let mut cursor = ByteCursor::new(bytes);
        assert_eq!(cursor.read_fixed_str(8).unwrap(), "FLAT5");
        assert_eq!(cursor.position(), 8);
        assert_eq!(cursor.read_fixed_str(4).unwrap(), "MORE");
    }

    #[test]
    fn test_read_fixed_str_without_nul_takes_full_width() {
        let mut cursor = ByteCursor::new(b"aastinky");
        assert_eq!(cursor.read_fixed_str(8).unwrap(), "AASTINKY");
    }
}
