//! Static and dynamic symbol tables.

use crate::defs::*;
use crate::region::{FieldRead, Region};
use crate::section::Section;
use crate::Error;

/// Symbol table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sym {
    /// Index into the associated string table, giving the location of the
    /// symbol name.
    name: u32,

    /// Symbol type and binding attributes.
    info: u8,

    /// Symbol visibility.
    other: u8,

    /// Index of the section this symbol is defined in relation to.
    shndx: u16,

    /// Value of the symbol, usually an address.
    value: u64,

    /// Size of the object the symbol refers to.
    size: u64,
}

impl Sym {
    /// Reads the symbol table entry placed at `offset`.
    fn parse(region: Region, offset: u64) -> Result<Sym, Error> {
        let mut rec = region.record(offset, SYM_SIZE)?;

        Ok(Sym {
            name: rec.read_field::<u32>()?,
            info: rec.read_field::<u8>()?,
            other: rec.read_field::<u8>()?,
            shndx: rec.read_field::<u16>()?,
            value: rec.read_field::<u64>()?,
            size: rec.read_field::<u64>()?,
        })
    }

    /// Returns the offset of the symbol name in the associated string table.
    pub fn name(&self) -> u32 {
        self.name
    }

    /// Returns the raw `st_info` field.
    pub fn info(&self) -> u8 {
        self.info
    }

    /// Returns the raw `st_other` field.
    pub fn other(&self) -> u8 {
        self.other
    }

    /// Returns the index of the section the symbol is defined in relation to.
    /// See `SHN_` consts for special values.
    pub fn shndx(&self) -> u16 {
        self.shndx
    }

    /// Returns the value of the symbol.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Returns the size of the object the symbol refers to.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the symbol binding, taken from the high nibble of `st_info`.
    pub fn binding(&self) -> SymbolBinding {
        (self.info >> 4).into()
    }

    /// Returns the symbol type, taken from the low nibble of `st_info`.
    pub fn symbol_type(&self) -> SymbolType {
        (self.info & 0xf).into()
    }

    /// Returns the symbol visibility, stored in `st_other`.
    pub fn visibility(&self) -> Visibility {
        self.other.into()
    }
}

/// Symbol table entry along with its resolved name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    sym: Sym,
    name: String,
}

impl Symbol {
    /// Returns the symbol table entry.
    pub fn sym(&self) -> &Sym {
        &self.sym
    }

    /// Returns the name of the symbol, as found in the associated string
    /// table.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Indices of the symbol and string table sections. Zero means the section
/// was not found.
#[derive(Debug, Default, PartialEq, Eq)]
struct TableIndices {
    dynsym: usize,
    dynstr: usize,
    symtab: usize,
    strtab: usize,
}

impl TableIndices {
    /// Scans `sections` once. When several sections share a name, the first
    /// one is used.
    fn find(sections: &[Section]) -> TableIndices {
        let mut indices = TableIndices::default();

        for (i, section) in sections.iter().enumerate() {
            let slot = match section.name() {
                DYNSYM => &mut indices.dynsym,
                DYNSTR => &mut indices.dynstr,
                SYMTAB => &mut indices.symtab,
                STRTAB => &mut indices.strtab,
                _ => continue,
            };

            if *slot == 0 {
                *slot = i;
            }
        }

        indices
    }
}

/// Copies every entry of the symbol table in section `table` and resolves
/// their names in the string table in section `strings`.
fn parse_table(
    region: Region,
    sections: &[Section],
    table: usize,
    strings: usize,
) -> Result<Vec<Symbol>, Error> {
    // Index 0 is the null section, never a real table.
    if table == 0 {
        return Ok(Vec::new());
    }

    let table = &sections[table];
    let names = sections[strings].header().offset();
    let size = table.header().size();

    let count = size / SYM_SIZE as u64;
    if size % SYM_SIZE as u64 != 0 {
        log::warn!(
            "{}: size {} is not a multiple of {}, ignoring trailing bytes",
            table.name(),
            size,
            SYM_SIZE
        );
    }

    log::debug!(
        "{}: {} symbols at {:#x}, names in {}",
        table.name(),
        count,
        table.header().offset(),
        sections[strings].name()
    );

    // `count` is untrusted, grow as entries are read.
    let mut symbols = Vec::new();
    for i in 0..count {
        let offset =
            Region::entry_offset(table.header().offset(), i, SYM_SIZE as u64)?;
        let sym = Sym::parse(region, offset)?;
        let name = region.table_string(names, sym.name)?;

        log::trace!("{}[{}]: {}", table.name(), i, name);
        symbols.push(Symbol { sym, name });
    }

    Ok(symbols)
}

/// Symbols of the static and dynamic symbol tables.
#[derive(Debug, Default)]
pub(crate) struct SymbolTables {
    pub dynamic: Vec<Symbol>,
    pub other: Vec<Symbol>,
}

/// Locates `.dynsym`/`.dynstr` and `.symtab`/`.strtab` among `sections` and
/// builds both symbol lists. Each pair is resolved on its own; a missing
/// table leaves its list empty.
pub(crate) fn parse_symbols(
    region: Region,
    sections: &[Section],
) -> Result<SymbolTables, Error> {
    let indices = TableIndices::find(sections);

    log::debug!("symbol tables: {:?}", indices);

    if indices.symtab == 0 {
        log::debug!("no {} section", SYMTAB);
    }
    if indices.dynsym == 0 {
        log::debug!("no {} section", DYNSYM);
    }

    Ok(SymbolTables {
        other: parse_table(region, sections, indices.symtab, indices.strtab)?,
        dynamic: parse_table(region, sections, indices.dynsym, indices.dynstr)?,
    })
}
