//! Synthetic ELF64 images for tests.

use crate::defs::*;

/// Symbol to be written into a synthetic symbol table.
#[derive(Debug, Clone, Copy)]
pub struct TestSym {
    pub name: &'static str,
    pub info: u8,
    pub other: u8,
    pub shndx: u16,
    pub value: u64,
    pub size: u64,
}

impl TestSym {
    /// Returns a global function symbol defined in section 1.
    pub fn func(name: &'static str, value: u64, size: u64) -> TestSym {
        TestSym {
            name,
            info: (1 << 4) | 2,
            other: 0,
            shndx: 1,
            value,
            size,
        }
    }

    /// Returns a local, hidden data object symbol defined in section 1.
    pub fn object(name: &'static str, value: u64, size: u64) -> TestSym {
        TestSym {
            name,
            info: 1,
            other: 2,
            shndx: 1,
            value,
            size,
        }
    }
}

/// Which pair of sections a symbol table is written to.
#[derive(Debug, Clone, Copy)]
pub enum SymTabKind {
    /// `.symtab` and `.strtab`.
    Static,

    /// `.dynsym` and `.dynstr`.
    Dynamic,
}

#[derive(Debug, Clone)]
struct SectionDesc {
    name: String,
    section_type: SectionType,
    data: Vec<u8>,
    addralign: u64,
    entsize: u64,

    /// If `true`, `link` points to the section that follows this one.
    link_next: bool,
}

#[derive(Debug, Clone)]
enum Entry {
    Section(SectionDesc),
    ShStrTab,
}

/// Builder of ELF64 executables laid out as: file header, program headers,
/// section contents and, finally, the section header table.
#[derive(Debug, Clone)]
pub struct ElfBuilder {
    entry: u64,
    segments: Vec<(u32, u64)>,
    null_section: bool,
    reserved_shstrndx: bool,
    phentsize: usize,
    shentsize: usize,
    entries: Vec<Entry>,
}

/// Contents of a synthetic ELF file.
#[derive(Debug, Clone)]
pub struct Image {
    pub bytes: Vec<u8>,
    pub shoff: u64,
    pub shentsize: usize,
}

impl Image {
    /// Returns the file offset of the `index`-th section header.
    pub fn shdr_offset(&self, index: usize) -> usize {
        self.shoff as usize + index * self.shentsize
    }

    /// Overwrites the bytes at `offset` with `value` in host byte order.
    pub fn patch_u64(&mut self, offset: usize, value: u64) {
        self.bytes[offset..offset + 8].copy_from_slice(&value.to_ne_bytes());
    }

    /// Overwrites the bytes at `offset` with `value` in host byte order.
    pub fn patch_u32(&mut self, offset: usize, value: u32) {
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_ne_bytes());
    }

    /// Overwrites the bytes at `offset` with `value` in host byte order.
    pub fn patch_u16(&mut self, offset: usize, value: u16) {
        self.bytes[offset..offset + 2].copy_from_slice(&value.to_ne_bytes());
    }
}

impl ElfBuilder {
    /// Returns a builder for an executable with a null section and no
    /// segments.
    pub fn new() -> ElfBuilder {
        ElfBuilder {
            entry: 0,
            segments: Vec::new(),
            null_section: true,
            reserved_shstrndx: false,
            phentsize: PHDR_SIZE,
            shentsize: SHDR_SIZE,
            entries: Vec::new(),
        }
    }

    /// Sets the entry point.
    pub fn entry(mut self, entry: u64) -> ElfBuilder {
        self.entry = entry;
        self
    }

    /// Adds a PT_LOAD segment.
    pub fn segment(mut self, flags: u32, vaddr: u64) -> ElfBuilder {
        self.segments.push((flags, vaddr));
        self
    }

    /// Omits the null section at index 0.
    pub fn without_null_section(mut self) -> ElfBuilder {
        self.null_section = false;
        self
    }

    /// Stores the index of `.shstrtab` in the `link` field of section 0 and
    /// sets `shstrndx` to `SHN_XINDEX`.
    pub fn reserved_shstrndx(mut self) -> ElfBuilder {
        self.reserved_shstrndx = true;
        self
    }

    /// Sets `phentsize` and `shentsize`. Entries larger than a record are
    /// padded with `0xa5`.
    pub fn entry_sizes(
        mut self,
        phentsize: usize,
        shentsize: usize,
    ) -> ElfBuilder {
        assert!(phentsize >= PHDR_SIZE && shentsize >= SHDR_SIZE);
        self.phentsize = phentsize;
        self.shentsize = shentsize;
        self
    }

    /// Adds a section.
    pub fn section(
        mut self,
        name: &str,
        section_type: SectionType,
        data: &[u8],
    ) -> ElfBuilder {
        self.entries.push(Entry::Section(SectionDesc {
            name: name.to_string(),
            section_type,
            data: data.to_vec(),
            addralign: 1,
            entsize: 0,
            link_next: false,
        }));
        self
    }

    /// Places the section name string table at the current position. If not
    /// called, it is placed after every other section.
    pub fn shstrtab(mut self) -> ElfBuilder {
        self.entries.push(Entry::ShStrTab);
        self
    }

    /// Adds a symbol table and its string table, in that order. A null
    /// symbol is written before `syms`.
    pub fn symbol_table(
        mut self,
        kind: SymTabKind,
        syms: &[TestSym],
    ) -> ElfBuilder {
        let (symtab, strtab, section_type) = match kind {
            SymTabKind::Static => (SYMTAB, STRTAB, SectionType::SymTab),
            SymTabKind::Dynamic => (DYNSYM, DYNSTR, SectionType::DynSym),
        };

        let mut strings = vec![0u8];
        let mut table = vec![0u8; SYM_SIZE];

        for sym in syms {
            let name = strings.len() as u32;
            strings.extend_from_slice(sym.name.as_bytes());
            strings.push(0);

            table.extend_from_slice(&name.to_ne_bytes());
            table.push(sym.info);
            table.push(sym.other);
            table.extend_from_slice(&sym.shndx.to_ne_bytes());
            table.extend_from_slice(&sym.value.to_ne_bytes());
            table.extend_from_slice(&sym.size.to_ne_bytes());
        }

        self.entries.push(Entry::Section(SectionDesc {
            name: symtab.to_string(),
            section_type,
            data: table,
            addralign: 8,
            entsize: SYM_SIZE as u64,
            link_next: true,
        }));
        self.section(strtab, SectionType::StrTab, &strings)
    }

    /// Lays out the file and returns its contents.
    pub fn build(mut self) -> Image {
        if !self.entries.iter().any(|e| matches!(e, Entry::ShStrTab)) {
            self.entries.push(Entry::ShStrTab);
        }

        let first = if self.null_section { 1 } else { 0 };
        let shnum = first + self.entries.len();

        // Section name string table.
        let mut shstrtab = vec![0u8];
        let mut sections = Vec::new();
        let mut shstrndx = 0;
        for (i, entry) in self.entries.iter().enumerate() {
            let desc = match entry {
                Entry::Section(desc) => desc.clone(),
                Entry::ShStrTab => {
                    shstrndx = first + i;
                    SectionDesc {
                        name: ".shstrtab".to_string(),
                        section_type: SectionType::StrTab,
                        data: Vec::new(),
                        addralign: 1,
                        entsize: 0,
                        link_next: false,
                    }
                }
            };
            let name = shstrtab.len() as u32;
            shstrtab.extend_from_slice(desc.name.as_bytes());
            shstrtab.push(0);
            sections.push((name, desc));
        }
        sections[shstrndx - first].1.data = shstrtab;

        // Program headers.
        let phoff = if self.segments.is_empty() { 0 } else { EHDR_SIZE };
        let mut bytes = vec![0u8; EHDR_SIZE];
        for &(flags, vaddr) in &self.segments {
            let start = bytes.len();
            bytes.extend_from_slice(&1u32.to_ne_bytes());
            bytes.extend_from_slice(&flags.to_ne_bytes());
            bytes.extend_from_slice(&0u64.to_ne_bytes());
            bytes.extend_from_slice(&vaddr.to_ne_bytes());
            bytes.extend_from_slice(&vaddr.to_ne_bytes());
            bytes.extend_from_slice(&0x100u64.to_ne_bytes());
            bytes.extend_from_slice(&0x100u64.to_ne_bytes());
            bytes.extend_from_slice(&0x1000u64.to_ne_bytes());
            bytes.resize(start + self.phentsize, PAD);
        }

        // Section contents.
        let mut offsets = Vec::new();
        for (_, desc) in &sections {
            align(&mut bytes, 8);
            offsets.push(bytes.len() as u64);
            bytes.extend_from_slice(&desc.data);
        }

        // Section header table.
        align(&mut bytes, 8);
        let shoff = bytes.len() as u64;
        if self.null_section {
            let link = if self.reserved_shstrndx {
                shstrndx as u32
            } else {
                0
            };
            write_shdr(&mut bytes, 0, 0, 0, 0, link, 0, 0);
            bytes.resize(shoff as usize + self.shentsize, PAD);
        }
        for (i, (name, desc)) in sections.iter().enumerate() {
            let link = if desc.link_next {
                (first + i + 1) as u32
            } else {
                0
            };
            let start = bytes.len();
            write_shdr(
                &mut bytes,
                *name,
                section_type_value(desc.section_type),
                offsets[i],
                desc.data.len() as u64,
                link,
                desc.addralign,
                desc.entsize,
            );
            bytes.resize(start + self.shentsize, PAD);
        }

        let e_shstrndx = if self.reserved_shstrndx {
            SHN_XINDEX
        } else {
            shstrndx as u16
        };

        // File header.
        let mut ehdr = Vec::with_capacity(EHDR_SIZE);
        ehdr.extend_from_slice(&ELFMAG);
        ehdr.push(2);
        ehdr.push(if cfg!(target_endian = "little") { 1 } else { 2 });
        ehdr.push(1);
        ehdr.resize(EI_NIDENT, 0);
        ehdr.extend_from_slice(&2u16.to_ne_bytes());
        ehdr.extend_from_slice(&62u16.to_ne_bytes());
        ehdr.extend_from_slice(&1u32.to_ne_bytes());
        ehdr.extend_from_slice(&self.entry.to_ne_bytes());
        ehdr.extend_from_slice(&(phoff as u64).to_ne_bytes());
        ehdr.extend_from_slice(&shoff.to_ne_bytes());
        ehdr.extend_from_slice(&0u32.to_ne_bytes());
        ehdr.extend_from_slice(&(EHDR_SIZE as u16).to_ne_bytes());
        ehdr.extend_from_slice(&(self.phentsize as u16).to_ne_bytes());
        ehdr.extend_from_slice(&(self.segments.len() as u16).to_ne_bytes());
        ehdr.extend_from_slice(&(self.shentsize as u16).to_ne_bytes());
        ehdr.extend_from_slice(&(shnum as u16).to_ne_bytes());
        ehdr.extend_from_slice(&e_shstrndx.to_ne_bytes());
        bytes[..EHDR_SIZE].copy_from_slice(&ehdr);

        Image {
            bytes,
            shoff,
            shentsize: self.shentsize,
        }
    }
}

/// Filler of the bytes past the end of a padded header.
const PAD: u8 = 0xa5;

fn align(bytes: &mut Vec<u8>, to: usize) {
    while bytes.len() % to != 0 {
        bytes.push(0);
    }
}

fn section_type_value(section_type: SectionType) -> u32 {
    match section_type {
        SectionType::Null => 0,
        SectionType::ProgBits => 1,
        SectionType::SymTab => 2,
        SectionType::StrTab => 3,
        SectionType::NoBits => 8,
        SectionType::DynSym => 11,
        other => panic!("unsupported section type in tests: {:?}", other),
    }
}

#[allow(clippy::too_many_arguments)]
fn write_shdr(
    bytes: &mut Vec<u8>,
    name: u32,
    section_type: u32,
    offset: u64,
    size: u64,
    link: u32,
    addralign: u64,
    entsize: u64,
) {
    bytes.extend_from_slice(&name.to_ne_bytes());
    bytes.extend_from_slice(&section_type.to_ne_bytes());
    bytes.extend_from_slice(&0u64.to_ne_bytes());
    bytes.extend_from_slice(&0u64.to_ne_bytes());
    bytes.extend_from_slice(&offset.to_ne_bytes());
    bytes.extend_from_slice(&size.to_ne_bytes());
    bytes.extend_from_slice(&link.to_ne_bytes());
    bytes.extend_from_slice(&0u32.to_ne_bytes());
    bytes.extend_from_slice(&addralign.to_ne_bytes());
    bytes.extend_from_slice(&entsize.to_ne_bytes());
}
