//! Loader input: an ordered list of memory segments produced by an
//! external assembler.

use crate::{INTERRUPT_VECTOR, RESET_VECTOR};

/// Bytes to place at a fixed origin.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Segment {
    pub origin: u16,
    pub bytes: Vec<u8>,
}

impl Segment {
    pub fn new(origin: u16, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            origin,
            bytes: bytes.into(),
        }
    }

    /// One past the last byte, as a 32-bit address so that a segment ending
    /// exactly at 0xFFFF is representable.
    pub fn end(&self) -> u32 {
        self.origin as u32 + self.bytes.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A program image. Segments are written in order, so later segments win
/// where they overlap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Image {
    pub segments: Vec<Segment>,
}

impl Image {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segment(mut self, origin: u16, bytes: impl Into<Vec<u8>>) -> Self {
        self.segments.push(Segment::new(origin, bytes));
        self
    }

    /// Fill both vector slots: execution starts at `reset` and interrupts
    /// enter at `interrupt`.
    pub fn vectors(self, reset: u16, interrupt: u16) -> Self {
        self.segment(RESET_VECTOR, reset.to_le_bytes())
            .segment(INTERRUPT_VECTOR, interrupt.to_le_bytes())
    }

    /// Total number of bytes carried by the image.
    pub fn len(&self) -> usize {
        self.segments.iter().map(|s| s.bytes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(Segment::is_empty)
    }
}

impl FromIterator<Segment> for Image {
    fn from_iter<T: IntoIterator<Item = Segment>>(iter: T) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}
