//! Read-only introspection of ELF64 executables.
//!
//! [`parse_file`] maps a file into memory and copies out its file header,
//! program headers, section headers and symbol tables, resolving section and
//! symbol names along the way. The returned [`ElfData`] owns everything it
//! holds and does not borrow from the file, which is unmapped before
//! returning.
//!
//! Diagnostics are emitted through the `log` facade and are discarded unless
//! the host installs a logger.

pub mod defs;
mod header;
mod mapping;
mod program;
mod region;
mod section;
mod symbol;

#[cfg(test)]
mod testutil;

use std::io;
use std::path::Path;

use thiserror::Error;

pub use crate::header::Ehdr;
pub use crate::program::Phdr;
pub use crate::section::{Section, Shdr};
pub use crate::symbol::{Sym, Symbol};

use crate::mapping::Mapping;
use crate::region::Region;

/// Error related to ELF parsing.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error when accessing the file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The file does not start with the ELF magic number.
    #[error("not an ELF file: magic {0:02x?}")]
    NotElf([u8; 4]),

    /// The file is not a 64-bit ELF file.
    #[error("unsupported ELF class: {0}")]
    UnsupportedClass(u8),

    /// A read does not fit in the file.
    #[error(
        "corrupt file: {len} bytes at offset {offset:#x} exceed file size \
         {size}"
    )]
    OutOfBounds { offset: u64, len: usize, size: usize },

    /// Integer overflow when computing an offset.
    #[error("corrupt file: offset overflow")]
    Overflow,

    /// A string runs until the end of the file.
    #[error("corrupt file: unterminated string at offset {offset:#x}")]
    UnterminatedString { offset: u64 },

    /// A section index does not name any section.
    #[error(
        "corrupt file: section index {index} out of range ({count} sections)"
    )]
    BadSectionIndex { index: usize, count: usize },
}

impl Error {
    /// Returns `true` if the file looks like ELF but its structure is
    /// inconsistent.
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            Error::OutOfBounds { .. }
                | Error::Overflow
                | Error::UnterminatedString { .. }
                | Error::BadSectionIndex { .. }
        )
    }
}

/// Metadata of an ELF64 file.
///
/// The default value has a zeroed header and no program headers, sections
/// or symbols. It is what [`get_elf_data`] returns when the file cannot be
/// parsed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ElfData {
    /// ELF header.
    ehdr: Ehdr,

    /// Program headers.
    phdrs: Vec<Phdr>,

    /// Sections.
    sections: Vec<Section>,

    /// Symbols of `.dynsym`.
    dyn_symbols: Vec<Symbol>,

    /// Symbols of `.symtab`.
    other_symbols: Vec<Symbol>,
}

impl ElfData {
    /// Parses the contents of an ELF file.
    fn parse(region: Region) -> Result<ElfData, Error> {
        log::debug!("parsing {} bytes", region.len());

        let ehdr = Ehdr::parse(region)?;
        let phdrs = program::parse_phdrs(region, &ehdr)?;
        let sections = section::parse_sections(region, &ehdr)?;
        let symbols = symbol::parse_symbols(region, &sections)?;

        Ok(ElfData {
            ehdr,
            phdrs,
            sections,
            dyn_symbols: symbols.dynamic,
            other_symbols: symbols.other,
        })
    }

    /// Returns the ELF header.
    pub fn ehdr(&self) -> Ehdr {
        self.ehdr
    }

    /// Returns the program headers, in file order.
    pub fn phdrs(&self) -> &[Phdr] {
        &self.phdrs
    }

    /// Returns the sections, in file order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Returns the first section called `name`.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name() == name)
    }

    /// Returns the symbols of the dynamic symbol table (`.dynsym`).
    pub fn dyn_symbols(&self) -> &[Symbol] {
        &self.dyn_symbols
    }

    /// Returns the symbols of the static symbol table (`.symtab`).
    pub fn other_symbols(&self) -> &[Symbol] {
        &self.other_symbols
    }

    /// Returns `true` if nothing was parsed into this value.
    pub fn is_empty(&self) -> bool {
        self == &ElfData::default()
    }

    /// Releases the parsed data. Dropping the value has the same effect.
    pub fn destroy(self) {
        log::debug!(
            "releasing {} program headers, {} sections, {} symbols and {} \
             dynamic symbols",
            self.phdrs.len(),
            self.sections.len(),
            self.other_symbols.len(),
            self.dyn_symbols.len()
        );
    }
}

/// Parses `data` as an ELF64 file and returns an `ElfData` structure.
pub fn parse<D: AsRef<[u8]>>(data: D) -> Result<ElfData, Error> {
    ElfData::parse(Region::new(data.as_ref()))
}

/// Parses the ELF64 file at `path` and returns an `ElfData` structure. The
/// file is mapped into memory while parsing and unmapped before returning.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ElfData, Error> {
    let path = path.as_ref();

    let mapping = Mapping::open(path)?;
    log::debug!("mapped {}", path.display());

    ElfData::parse(Region::new(&mapping))
}

/// Parses the ELF64 file at `path`. On failure, the error is logged and an
/// empty `ElfData` is returned.
pub fn get_elf_data<P: AsRef<Path>>(path: P) -> ElfData {
    let path = path.as_ref();

    match parse_file(path) {
        Ok(elf) => elf,
        Err(err) => {
            log::error!("{}: {}", path.display(), err);
            ElfData::default()
        }
    }
}
