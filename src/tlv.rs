//! Bounded DER tag-length-value reading over borrowed input.
//!
//! Everything here hands out slices of the original buffer. Header decoding (tag octet,
//! minimal length encoding, bounds) is delegated to [`der`]; this module adds the
//! grammar-driven conveniences the OCSP and certificate parsers are written in terms of.

use crate::errors::{Error, Result};
use der::{Decode, Header, Reader as _, SliceReader, Tag, TagNumber};

/// `[number]` with the constructed bit set, i.e. an `EXPLICIT` tag.
pub(crate) const fn explicit(number: TagNumber) -> Tag {
    Tag::ContextSpecific {
        constructed: true,
        number,
    }
}

/// `[number]` with the constructed bit clear, i.e. an `IMPLICIT` tag over a primitive type.
pub(crate) const fn implicit_primitive(number: TagNumber) -> Tag {
    Tag::ContextSpecific {
        constructed: false,
        number,
    }
}

/// Cursor over one level of DER.
#[derive(Clone)]
pub(crate) struct Reader<'a> {
    inner: SliceReader<'a>,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a [u8]) -> Result<Self> {
        Ok(Self {
            inner: SliceReader::new(input)?,
        })
    }

    pub fn at_end(&self) -> bool {
        self.inner.is_finished()
    }

    /// Does the next element carry `tag`? Never consumes input.
    pub fn peek(&self, tag: Tag) -> bool {
        matches!(self.inner.peek_tag(), Ok(actual) if actual == tag)
    }

    /// Read one element of any tag, returning the tag and the value.
    pub fn read_tlv(&mut self) -> Result<(Tag, &'a [u8])> {
        let header = Header::decode(&mut self.inner)?;
        let value = self.inner.read_slice(header.length)?;
        Ok((header.tag, value))
    }

    /// Read one element which must carry `tag`, returning its value.
    pub fn expect(&mut self, tag: Tag) -> Result<&'a [u8]> {
        let (actual, value) = self.read_tlv()?;
        if actual != tag {
            return Err(Error::BadDer);
        }
        Ok(value)
    }

    /// Read one element which must carry `tag`, returning its complete encoding.
    pub fn expect_tlv(&mut self, tag: Tag) -> Result<&'a [u8]> {
        if !self.peek(tag) {
            return Err(Error::BadDer);
        }
        Ok(self.inner.tlv_bytes()?)
    }

    /// Read the next element only if it carries `tag`.
    pub fn optional(&mut self, tag: Tag) -> Result<Option<&'a [u8]>> {
        if self.peek(tag) {
            self.expect(tag).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Read an element carrying `tag` and parse its value with `f`, which must consume all of it.
    pub fn nested<T>(
        &mut self,
        tag: Tag,
        f: impl FnOnce(&mut Reader<'a>) -> Result<T>,
    ) -> Result<T> {
        let value = self.expect(tag)?;
        parse_all(value, f)
    }

    /// Like [`Reader::nested`] for an `OPTIONAL` element.
    pub fn optional_nested<T>(
        &mut self,
        tag: Tag,
        f: impl FnOnce(&mut Reader<'a>) -> Result<T>,
    ) -> Result<Option<T>> {
        if self.peek(tag) {
            self.nested(tag, f).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Consume everything left at this level without interpreting it.
    pub fn skip_rest(&mut self) -> Result<()> {
        let remaining = self.inner.remaining_len();
        self.inner.read_slice(remaining)?;
        Ok(())
    }

    pub fn finish(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(Error::BadDer)
        }
    }
}

/// Parse all of `input` with `f`; leftover bytes are an error.
pub(crate) fn parse_all<'a, T>(
    input: &'a [u8],
    f: impl FnOnce(&mut Reader<'a>) -> Result<T>,
) -> Result<T> {
    let mut reader = Reader::new(input)?;
    let value = f(&mut reader)?;
    reader.finish()?;
    Ok(value)
}

/// Iterate over the complete encodings of the elements of a `SEQUENCE OF` body,
/// each of which must carry `tag`.
pub(crate) struct Elements<'a> {
    reader: Reader<'a>,
    tag: Tag,
}

impl<'a> Elements<'a> {
    pub fn new(body: &'a [u8], tag: Tag) -> Result<Self> {
        Ok(Self {
            reader: Reader::new(body)?,
            tag,
        })
    }
}

impl<'a> Iterator for Elements<'a> {
    type Item = Result<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.reader.at_end() {
            return None;
        }
        let item = self.reader.expect_tlv(self.tag);
        if item.is_err() {
            // Stop after the first structural error instead of spinning on it.
            self.reader = Reader::new(&[]).ok()?;
        }
        Some(item)
    }
}
