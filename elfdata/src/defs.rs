//! Standard ELF64 types and constants.

use std::fmt;

/// ELF magic number, found in the first four bytes of the file.
pub const ELFMAG: [u8; 4] = *b"\x7fELF";

/// Index of the class byte in `ident`.
pub const EI_CLASS: usize = 4;

/// Index of the data encoding byte in `ident`.
pub const EI_DATA: usize = 5;

/// Index of the ELF version byte in `ident`.
pub const EI_VERSION: usize = 6;

/// Index of the OS ABI byte in `ident`.
pub const EI_OSABI: usize = 7;

/// Size of `ident`.
pub const EI_NIDENT: usize = 16;

/// Size in bytes of the ELF64 file header.
pub const EHDR_SIZE: usize = 64;

/// Size in bytes of an ELF64 program header.
pub const PHDR_SIZE: usize = 56;

/// Size in bytes of an ELF64 section header.
pub const SHDR_SIZE: usize = 64;

/// Size in bytes of an ELF64 symbol table entry.
pub const SYM_SIZE: usize = 24;

/// Name of the static symbol table section.
pub const SYMTAB: &str = ".symtab";

/// Name of the string table paired with `.symtab`.
pub const STRTAB: &str = ".strtab";

/// Name of the dynamic symbol table section.
pub const DYNSYM: &str = ".dynsym";

/// Name of the string table paired with `.dynsym`.
pub const DYNSTR: &str = ".dynstr";

/// ELF class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// Invalid class.
    None,

    /// 32-bit architecture.
    Elf32,

    /// 64-bit architecture.
    Elf64,

    /// Unknown.
    Unknown(u8),
}

impl From<u8> for Class {
    fn from(value: u8) -> Class {
        match value {
            0 => Class::None,
            1 => Class::Elf32,
            2 => Class::Elf64,
            val => Class::Unknown(val),
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Class::None => write!(f, "None"),
            Class::Elf32 => write!(f, "ELF32"),
            Class::Elf64 => write!(f, "ELF64"),
            Class::Unknown(val) => write!(f, "Unknown ({})", val),
        }
    }
}

/// Object file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// No file type.
    None,

    /// Relocatable file.
    Rel,

    /// Executable file.
    Exec,

    /// Shared object file.
    Dyn,

    /// Core file.
    Core,

    /// Unknown.
    Unknown(u16),
}

impl From<u16> for FileType {
    fn from(value: u16) -> FileType {
        match value {
            0 => FileType::None,
            1 => FileType::Rel,
            2 => FileType::Exec,
            3 => FileType::Dyn,
            4 => FileType::Core,
            val => FileType::Unknown(val),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FileType::None => write!(f, "NONE (No file type)"),
            FileType::Rel => write!(f, "REL (Relocatable file)"),
            FileType::Exec => write!(f, "EXEC (Executable file)"),
            FileType::Dyn => write!(f, "DYN (Shared object file)"),
            FileType::Core => write!(f, "CORE (Core file)"),
            FileType::Unknown(val) => write!(f, "Unknown ({:#x})", val),
        }
    }
}

/// Start of reserved indices. A `shstrndx` at or above this value means the
/// real index is held in the `link` member of section 0.
pub const SHN_LORESERVE: u16 = 0xff00;

/// Index is in extra table.
pub const SHN_XINDEX: u16 = 0xffff;

/// Undefined section.
pub const SHN_UNDEF: u16 = 0;

/// Associated symbol is absolute.
pub const SHN_ABS: u16 = 0xfff1;

/// Associated symbol is common.
pub const SHN_COMMON: u16 = 0xfff2;

/// Segment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentType {
    /// Program header table entry unused.
    Null,

    /// Loadable program segment.
    Load,

    /// Dynamic linking information.
    Dynamic,

    /// Program interpreter.
    Interp,

    /// Auxiliary information.
    Note,

    /// Reserved.
    Shlib,

    /// Entry for header table itself.
    Phdr,

    /// Thread-local storage segment.
    Tls,

    /// GCC .eh_frame_hdr segment.
    GnuEhFrame,

    /// Indicates stack executability.
    GnuStack,

    /// Read-only after relocation.
    GnuRelro,

    /// GNU property notes.
    GnuProperty,

    /// Unknown.
    Unknown(u32),
}

impl From<u32> for SegmentType {
    fn from(value: u32) -> Self {
        match value {
            0 => SegmentType::Null,
            1 => SegmentType::Load,
            2 => SegmentType::Dynamic,
            3 => SegmentType::Interp,
            4 => SegmentType::Note,
            5 => SegmentType::Shlib,
            6 => SegmentType::Phdr,
            7 => SegmentType::Tls,
            0x6474e550 => SegmentType::GnuEhFrame,
            0x6474e551 => SegmentType::GnuStack,
            0x6474e552 => SegmentType::GnuRelro,
            0x6474e553 => SegmentType::GnuProperty,
            val => SegmentType::Unknown(val),
        }
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SegmentType::Null => write!(f, "NULL"),
            SegmentType::Load => write!(f, "LOAD"),
            SegmentType::Dynamic => write!(f, "DYNAMIC"),
            SegmentType::Interp => write!(f, "INTERP"),
            SegmentType::Note => write!(f, "NOTE"),
            SegmentType::Shlib => write!(f, "SHLIB"),
            SegmentType::Phdr => write!(f, "PHDR"),
            SegmentType::Tls => write!(f, "TLS"),
            SegmentType::GnuEhFrame => write!(f, "GNU_EH_FRAME"),
            SegmentType::GnuStack => write!(f, "GNU_STACK"),
            SegmentType::GnuRelro => write!(f, "GNU_RELRO"),
            SegmentType::GnuProperty => write!(f, "GNU_PROPERTY"),
            SegmentType::Unknown(val) => write!(f, "{:#010x}", val),
        }
    }
}

/// Segment is executable.
pub const PF_X: u32 = 1 << 0;

/// Segment is writable.
pub const PF_W: u32 = 1 << 1;

/// Segment is readable.
pub const PF_R: u32 = 1 << 2;

/// Section type, which defines the section's contents and semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionType {
    /// Section header table entry unused.
    Null,

    /// Program data.
    ProgBits,

    /// Symbol table.
    SymTab,

    /// String table.
    StrTab,

    /// Relocation entries with addends.
    RelA,

    /// Symbol hash table.
    Hash,

    /// Dynamic linking information.
    Dynamic,

    /// Notes.
    Note,

    /// Program space with no data (bss).
    NoBits,

    /// Relocation entries, no addends.
    Rel,

    /// Reserved.
    ShLib,

    /// Dynamic linker symbol table.
    DynSym,

    /// Array of constructors.
    InitArray,

    /// Array of destructors.
    FiniArray,

    /// Array of pre-constructors.
    PreinitArray,

    /// Section group.
    Group,

    /// Extended section indices.
    SymTabShNdx,

    /// GNU-style hash table.
    GnuHash,

    /// Version definition section.
    GnuVerDef,

    /// Version needs section.
    GnuVerNeed,

    /// Version symbol table.
    GnuVerSym,

    /// Unknown.
    Unknown(u32),
}

impl From<u32> for SectionType {
    fn from(value: u32) -> Self {
        match value {
            0 => SectionType::Null,
            1 => SectionType::ProgBits,
            2 => SectionType::SymTab,
            3 => SectionType::StrTab,
            4 => SectionType::RelA,
            5 => SectionType::Hash,
            6 => SectionType::Dynamic,
            7 => SectionType::Note,
            8 => SectionType::NoBits,
            9 => SectionType::Rel,
            10 => SectionType::ShLib,
            11 => SectionType::DynSym,
            14 => SectionType::InitArray,
            15 => SectionType::FiniArray,
            16 => SectionType::PreinitArray,
            17 => SectionType::Group,
            18 => SectionType::SymTabShNdx,
            0x6ffffff6 => SectionType::GnuHash,
            0x6ffffffd => SectionType::GnuVerDef,
            0x6ffffffe => SectionType::GnuVerNeed,
            0x6fffffff => SectionType::GnuVerSym,
            val => SectionType::Unknown(val),
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SectionType::Null => write!(f, "NULL"),
            SectionType::ProgBits => write!(f, "PROGBITS"),
            SectionType::SymTab => write!(f, "SYMTAB"),
            SectionType::StrTab => write!(f, "STRTAB"),
            SectionType::RelA => write!(f, "RELA"),
            SectionType::Hash => write!(f, "HASH"),
            SectionType::Dynamic => write!(f, "DYNAMIC"),
            SectionType::Note => write!(f, "NOTE"),
            SectionType::NoBits => write!(f, "NOBITS"),
            SectionType::Rel => write!(f, "REL"),
            SectionType::ShLib => write!(f, "SHLIB"),
            SectionType::DynSym => write!(f, "DYNSYM"),
            SectionType::InitArray => write!(f, "INIT_ARRAY"),
            SectionType::FiniArray => write!(f, "FINI_ARRAY"),
            SectionType::PreinitArray => write!(f, "PREINIT_ARRAY"),
            SectionType::Group => write!(f, "GROUP"),
            SectionType::SymTabShNdx => write!(f, "SYMTAB_SHNDX"),
            SectionType::GnuHash => write!(f, "GNU_HASH"),
            SectionType::GnuVerDef => write!(f, "VERDEF"),
            SectionType::GnuVerNeed => write!(f, "VERNEED"),
            SectionType::GnuVerSym => write!(f, "VERSYM"),
            SectionType::Unknown(val) => write!(f, "{:#010x}", val),
        }
    }
}

/// Section is writable.
pub const SHF_WRITE: u64 = 1 << 0;

/// Section occupies memory during execution.
pub const SHF_ALLOC: u64 = 1 << 1;

/// Section is executable.
pub const SHF_EXECINSTR: u64 = 1 << 2;

/// Section might be merged.
pub const SHF_MERGE: u64 = 1 << 4;

/// Section contains null-terminated strings.
pub const SHF_STRINGS: u64 = 1 << 5;

/// The field `info` contains SHT index.
pub const SHF_INFO_LINK: u64 = 1 << 6;

/// Section hold thread-local data.
pub const SHF_TLS: u64 = 1 << 10;

/// Symbol binding, taken from the high nibble of `st_info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolBinding {
    /// Local symbol.
    Local,

    /// Global symbol.
    Global,

    /// Weak symbol.
    Weak,

    /// Unique symbol (GNU extension).
    GnuUnique,

    /// Unknown.
    Unknown(u8),
}

impl From<u8> for SymbolBinding {
    fn from(value: u8) -> SymbolBinding {
        match value {
            0 => SymbolBinding::Local,
            1 => SymbolBinding::Global,
            2 => SymbolBinding::Weak,
            10 => SymbolBinding::GnuUnique,
            val => SymbolBinding::Unknown(val),
        }
    }
}

impl fmt::Display for SymbolBinding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SymbolBinding::Local => write!(f, "LOCAL"),
            SymbolBinding::Global => write!(f, "GLOBAL"),
            SymbolBinding::Weak => write!(f, "WEAK"),
            SymbolBinding::GnuUnique => write!(f, "UNIQUE"),
            SymbolBinding::Unknown(val) => write!(f, "<{}>", val),
        }
    }
}

/// Symbol type, taken from the low nibble of `st_info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolType {
    /// Symbol type is unspecified.
    NoType,

    /// Symbol is a data object.
    Object,

    /// Symbol is a code object.
    Func,

    /// Symbol associated with a section.
    Section,

    /// Symbol's name is file name.
    File,

    /// Symbol is a common data object.
    Common,

    /// Symbol is thread-local data object.
    Tls,

    /// Symbol is indirect code object (GNU extension).
    GnuIfunc,

    /// Unknown.
    Unknown(u8),
}

impl From<u8> for SymbolType {
    fn from(value: u8) -> SymbolType {
        match value {
            0 => SymbolType::NoType,
            1 => SymbolType::Object,
            2 => SymbolType::Func,
            3 => SymbolType::Section,
            4 => SymbolType::File,
            5 => SymbolType::Common,
            6 => SymbolType::Tls,
            10 => SymbolType::GnuIfunc,
            val => SymbolType::Unknown(val),
        }
    }
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SymbolType::NoType => write!(f, "NOTYPE"),
            SymbolType::Object => write!(f, "OBJECT"),
            SymbolType::Func => write!(f, "FUNC"),
            SymbolType::Section => write!(f, "SECTION"),
            SymbolType::File => write!(f, "FILE"),
            SymbolType::Common => write!(f, "COMMON"),
            SymbolType::Tls => write!(f, "TLS"),
            SymbolType::GnuIfunc => write!(f, "IFUNC"),
            SymbolType::Unknown(val) => write!(f, "<{}>", val),
        }
    }
}

/// Symbol visibility, taken from the low two bits of `st_other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Default symbol visibility rules.
    Default,

    /// Processor specific hidden class.
    Internal,

    /// Symbol unavailable in other modules.
    Hidden,

    /// Not preemptible, not exported.
    Protected,
}

impl From<u8> for Visibility {
    fn from(value: u8) -> Visibility {
        match value & 0x3 {
            0 => Visibility::Default,
            1 => Visibility::Internal,
            2 => Visibility::Hidden,
            _ => Visibility::Protected,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Visibility::Default => write!(f, "DEFAULT"),
            Visibility::Internal => write!(f, "INTERNAL"),
            Visibility::Hidden => write!(f, "HIDDEN"),
            Visibility::Protected => write!(f, "PROTECTED"),
        }
    }
}
