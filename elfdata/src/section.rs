//! Section header table and section names.

use crate::defs::*;
use crate::header::Ehdr;
use crate::region::{FieldRead, Region};
use crate::Error;

/// Section header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shdr {
    /// Name of the section. Its value is an index into the section header
    /// string table section, giving the location of a null-terminated string.
    name: u32,

    /// Categorizes the section's contents and semantics.
    section_type: SectionType,

    /// Sections support one-bit flags that describe miscellaneous attributes.
    /// See `SHF_` consts.
    flags: u64,

    /// If this section appears in the memory image of a process, this member
    /// holds the address at which the section's first byte should reside.
    /// Otherwise, the member contains zero.
    addr: u64,

    /// Byte offset from the beginning of the file to the first byte in the
    /// section.
    offset: u64,

    /// Section's size in bytes.
    size: u64,

    /// Section header table index link.
    link: u32,

    /// Extra information.
    info: u32,

    /// Some sections have address alignment constraints. The value 0 or 1
    /// means that the section has no alignment constraints.
    addralign: u64,

    /// Some sections hold a table of fixed-sized entries, such as a symbol
    /// table. For such a section, this member gives the size in bytes for
    /// each entry. This member contains zero if the section does not hold a
    /// table of fixed-size entries.
    entsize: u64,
}

impl Shdr {
    /// Reads the section header placed at `offset`.
    fn parse(region: Region, offset: u64) -> Result<Shdr, Error> {
        let mut rec = region.record(offset, SHDR_SIZE)?;

        Ok(Shdr {
            name: rec.read_field::<u32>()?,
            section_type: rec.read_field::<u32>()?.into(),
            flags: rec.read_field::<u64>()?,
            addr: rec.read_field::<u64>()?,
            offset: rec.read_field::<u64>()?,
            size: rec.read_field::<u64>()?,
            link: rec.read_field::<u32>()?,
            info: rec.read_field::<u32>()?,
            addralign: rec.read_field::<u64>()?,
            entsize: rec.read_field::<u64>()?,
        })
    }

    /// Returns the name of the section. Its value is an index into the section
    /// header string table section, giving the location of a null-terminated
    /// string.
    pub fn name(&self) -> u32 {
        self.name
    }

    /// Returns the section type, which categorizes the section's contents and
    /// semantics.
    pub fn section_type(&self) -> SectionType {
        self.section_type
    }

    /// Returns the flags of the section. See `SHF_` consts.
    pub fn flags(&self) -> u64 {
        self.flags
    }

    /// If this section appears in the memory image of a process, this function
    /// returns the address at which the section's first byte should reside.
    /// Otherwise, zero is returned.
    pub fn addr(&self) -> u64 {
        self.addr
    }

    /// Returns the byte offset from the beginning of the file to the first
    /// byte in the section.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the section's size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the section header table index link.
    pub fn link(&self) -> u32 {
        self.link
    }

    /// Returns extra information about the section.
    pub fn info(&self) -> u32 {
        self.info
    }

    /// Returns the alignment of the section. The value 0 or 1 means that the
    /// section has no alignment constraints.
    pub fn addralign(&self) -> u64 {
        self.addralign
    }

    /// Returns the size in bytes of each entry for sections holding a table
    /// of fixed-size entries, or zero otherwise.
    pub fn entsize(&self) -> u64 {
        self.entsize
    }
}

/// Section header along with its resolved name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    header: Shdr,
    name: String,
}

impl Section {
    /// Returns the section header.
    pub fn header(&self) -> &Shdr {
        &self.header
    }

    /// Returns the name of the section, as found in the section header string
    /// table.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Returns the index of the section holding the section names.
fn shstrndx(ehdr: &Ehdr, shdrs: &[Shdr]) -> Result<usize, Error> {
    let index = if ehdr.shstrndx() < SHN_LORESERVE {
        ehdr.shstrndx() as u32
    } else {
        // The real index does not fit in `e_shstrndx`.
        shdrs.first().map(|shdr| shdr.link).unwrap_or(0)
    };

    log::debug!(
        "section names in section {} (e_shstrndx={}, SHN_LORESERVE={})",
        index,
        ehdr.shstrndx(),
        SHN_LORESERVE
    );

    let index = index as usize;
    if index >= shdrs.len() {
        return Err(Error::BadSectionIndex {
            index,
            count: shdrs.len(),
        });
    }

    Ok(index)
}

/// Copies the `shnum` entries of the section header table, `shentsize` bytes
/// apart, starting at `shoff`, and resolves the name of every section.
pub(crate) fn parse_sections(
    region: Region,
    ehdr: &Ehdr,
) -> Result<Vec<Section>, Error> {
    let mut shdrs = Vec::with_capacity(ehdr.shnum() as usize);

    for i in 0..ehdr.shnum() as u64 {
        let offset =
            Region::entry_offset(ehdr.shoff(), i, ehdr.shentsize() as u64)?;
        shdrs.push(Shdr::parse(region, offset)?);
    }

    if shdrs.is_empty() {
        log::debug!("no section headers");
        return Ok(Vec::new());
    }

    let names = shdrs[shstrndx(ehdr, &shdrs)?].offset;

    let mut sections = Vec::with_capacity(shdrs.len());
    for header in shdrs {
        let name = region.table_string(names, header.name)?;

        log::trace!("section[{}]: {}", sections.len(), name);
        sections.push(Section { header, name });
    }

    log::debug!("parsed {} sections", sections.len());

    Ok(sections)
}
