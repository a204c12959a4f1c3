//! Program header table.

use crate::defs::*;
use crate::header::Ehdr;
use crate::region::{FieldRead, Region};
use crate::Error;

/// Program header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phdr {
    /// Type of segment.
    segment_type: SegmentType,

    /// Bit mask of flags relevant to the segment.
    flags: u32,

    /// Offset from the beginning of the file at which the first byte of the
    /// segment resides.
    offset: u64,

    /// Virtual address at which the first byte of the segment resides in
    /// memory.
    vaddr: u64,

    /// On systems for which physical addressing is relevant, this member
    /// is reserved for the segment's physical address.
    paddr: u64,

    /// Number of bytes in the file image of the segment.
    filesz: u64,

    /// Number of bytes in the memory image of the segment.
    memsz: u64,

    /// Value to which the segments are aligned in memory and in the file.
    align: u64,
}

impl Phdr {
    /// Reads the program header placed at `offset`.
    fn parse(region: Region, offset: u64) -> Result<Phdr, Error> {
        let mut rec = region.record(offset, PHDR_SIZE)?;

        Ok(Phdr {
            segment_type: rec.read_field::<u32>()?.into(),
            flags: rec.read_field::<u32>()?,
            offset: rec.read_field::<u64>()?,
            vaddr: rec.read_field::<u64>()?,
            paddr: rec.read_field::<u64>()?,
            filesz: rec.read_field::<u64>()?,
            memsz: rec.read_field::<u64>()?,
            align: rec.read_field::<u64>()?,
        })
    }

    /// Returns the type of segment.
    pub fn segment_type(&self) -> SegmentType {
        self.segment_type
    }

    /// Returns a bit mask of flags relevant to the segment. See `PF_` consts.
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Returns the offset from the beginning of the file at which the first
    /// byte of the segment resides.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the virtual address at which the first byte of the segment
    /// resides in memory.
    pub fn vaddr(&self) -> u64 {
        self.vaddr
    }

    /// Returns the segment's physical address. This only applies to systems
    /// for which physical addressing is relevant.
    pub fn paddr(&self) -> u64 {
        self.paddr
    }

    /// Returns the number of bytes in the file image of the segment.
    pub fn filesz(&self) -> u64 {
        self.filesz
    }

    /// Returns the number of bytes in the memory image of the segment.
    pub fn memsz(&self) -> u64 {
        self.memsz
    }

    /// Returns the value to which the segments are aligned in memory and in
    /// the file.
    pub fn align(&self) -> u64 {
        self.align
    }
}

/// Copies the `phnum` entries of the program header table, `phentsize` bytes
/// apart, starting at `phoff`.
pub(crate) fn parse_phdrs(
    region: Region,
    ehdr: &Ehdr,
) -> Result<Vec<Phdr>, Error> {
    let mut phdrs = Vec::with_capacity(ehdr.phnum() as usize);

    for i in 0..ehdr.phnum() as u64 {
        let offset =
            Region::entry_offset(ehdr.phoff(), i, ehdr.phentsize() as u64)?;
        let phdr = Phdr::parse(region, offset)?;

        log::trace!("phdr[{}]: {} at {:#x}", i, phdr.segment_type, offset);
        phdrs.push(phdr);
    }

    log::debug!("parsed {} program headers", phdrs.len());

    Ok(phdrs)
}
