//! ELF64 file header.

use std::io::Read;

use crate::defs::*;
use crate::region::{FieldRead, Region};
use crate::Error;

/// ELF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ehdr {
    /// Specifies how to interpret the file, independent of the processor or
    /// the file's remaining contents.
    ident: [u8; EI_NIDENT],

    /// Object file type.
    file_type: FileType,

    /// Required architecture for the file. See `EM_` values in the ELF
    /// specification.
    machine: u16,

    /// File version.
    version: u32,

    /// Virtual address to which the system first transfers control, thus
    /// starting the process.
    entry: u64,

    /// Program header table's file offset in bytes.
    phoff: u64,

    /// Section header table's file offset in bytes.
    shoff: u64,

    /// Processor-specific flags associated with the file.
    flags: u32,

    /// ELF header's size in bytes.
    ehsize: u16,

    /// Size in bytes of one entry in the file's program header table.
    phentsize: u16,

    /// Number of entries in the program header table.
    phnum: u16,

    /// Sections header's size in bytes.
    shentsize: u16,

    /// Number of entries in the section header table.
    shnum: u16,

    /// Section header table index of the entry associated with the section
    /// name string table.
    shstrndx: u16,
}

impl Default for Ehdr {
    fn default() -> Ehdr {
        Ehdr {
            ident: [0; EI_NIDENT],
            file_type: FileType::None,
            machine: 0,
            version: 0,
            entry: 0,
            phoff: 0,
            shoff: 0,
            flags: 0,
            ehsize: 0,
            phentsize: 0,
            phnum: 0,
            shentsize: 0,
            shnum: 0,
            shstrndx: 0,
        }
    }
}

impl Ehdr {
    /// Reads the ELF header placed at the start of `region`.
    ///
    /// The magic number is checked before anything else is read, so a file
    /// that is not ELF at all is reported as [`Error::NotElf`] even if it is
    /// shorter than a header.
    pub(crate) fn parse(region: Region) -> Result<Ehdr, Error> {
        let mut magic = [0u8; 4];
        let head = region.bytes(0, 4).unwrap_or(&[]);
        magic[..head.len()].copy_from_slice(head);
        if head.len() != 4 || magic != ELFMAG {
            return Err(Error::NotElf(magic));
        }

        let mut rec = region.record(0, EHDR_SIZE)?;

        let mut ident = [0u8; EI_NIDENT];
        rec.read_exact(&mut ident)?;

        match Class::from(ident[EI_CLASS]) {
            Class::Elf64 => {}
            _ => return Err(Error::UnsupportedClass(ident[EI_CLASS])),
        }

        let ehdr = Ehdr {
            ident,
            file_type: rec.read_field::<u16>()?.into(),
            machine: rec.read_field::<u16>()?,
            version: rec.read_field::<u32>()?,
            entry: rec.read_field::<u64>()?,
            phoff: rec.read_field::<u64>()?,
            shoff: rec.read_field::<u64>()?,
            flags: rec.read_field::<u32>()?,
            ehsize: rec.read_field::<u16>()?,
            phentsize: rec.read_field::<u16>()?,
            phnum: rec.read_field::<u16>()?,
            shentsize: rec.read_field::<u16>()?,
            shnum: rec.read_field::<u16>()?,
            shstrndx: rec.read_field::<u16>()?,
        };

        log::debug!(
            "ehdr: phoff={:#x} phnum={} phentsize={} shoff={:#x} shnum={} \
             shentsize={} shstrndx={}",
            ehdr.phoff,
            ehdr.phnum,
            ehdr.phentsize,
            ehdr.shoff,
            ehdr.shnum,
            ehdr.shentsize,
            ehdr.shstrndx
        );

        Ok(ehdr)
    }

    /// Returns the `ident` field of the ELF header, which specifies how to
    /// interpret the file, independent of the processor or the file's
    /// remaining contents.
    pub fn ident(&self) -> [u8; EI_NIDENT] {
        self.ident
    }

    /// Returns the class stored in `ident`.
    pub fn class(&self) -> Class {
        self.ident[EI_CLASS].into()
    }

    /// Returns the object file type.
    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Returns the required architecture for the file.
    pub fn machine(&self) -> u16 {
        self.machine
    }

    /// Returns the file version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns the virtual address to which the system first transfers
    /// control, thus starting the process.
    pub fn entry(&self) -> u64 {
        self.entry
    }

    /// Returns the program header table's file offset in bytes.
    pub fn phoff(&self) -> u64 {
        self.phoff
    }

    /// Returns the section header table's file offset in bytes.
    pub fn shoff(&self) -> u64 {
        self.shoff
    }

    /// Returns the processor-specific flags associated with the file.
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Returns the ELF header's size in bytes.
    pub fn ehsize(&self) -> u16 {
        self.ehsize
    }

    /// Returns the size in bytes of one entry in the file's program header
    /// table.
    pub fn phentsize(&self) -> u16 {
        self.phentsize
    }

    /// Returns the number of entries in the program header table.
    pub fn phnum(&self) -> u16 {
        self.phnum
    }

    /// Returns the sections header's size in bytes.
    pub fn shentsize(&self) -> u16 {
        self.shentsize
    }

    /// Returns the number of entries in the section header table.
    pub fn shnum(&self) -> u16 {
        self.shnum
    }

    /// Returns the section header table index of the entry associated with the
    /// section name string table. Values at or above `SHN_LORESERVE` mean
    /// the real index is stored in the `link` field of section 0.
    pub fn shstrndx(&self) -> u16 {
        self.shstrndx
    }
}
