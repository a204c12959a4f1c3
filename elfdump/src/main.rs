//! Display the metadata of ELF64 files, in the spirit of `readelf -hlSs`.

mod logger;

use std::error::Error;
use std::fmt::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use elfdata::defs::*;
use elfdata::{ElfData, Symbol};

/// Display the headers, sections and symbols of an ELF64 file.
#[derive(Parser)]
#[command(name = "elfdump", version, about)]
struct Cli {
    /// ELF64 file to inspect.
    file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Do not display symbol tables.
    #[arg(long, conflicts_with = "dynamic_only")]
    no_symbols: bool,

    /// Display only the dynamic symbol table.
    #[arg(long)]
    dynamic_only: bool,
}

/// Returns the `readelf`-like flags of a segment.
fn segment_flags(flags: u32) -> String {
    let mut disp = String::new();

    disp.push(if flags & PF_R != 0 { 'R' } else { ' ' });
    disp.push(if flags & PF_W != 0 { 'W' } else { ' ' });
    disp.push(if flags & PF_X != 0 { 'E' } else { ' ' });

    disp
}

/// Returns the `readelf`-like flags of a section.
fn section_flags(flags: u64) -> String {
    let mut disp = String::new();

    for &(flag, c) in &[
        (SHF_WRITE, 'W'),
        (SHF_ALLOC, 'A'),
        (SHF_EXECINSTR, 'X'),
        (SHF_MERGE, 'M'),
        (SHF_STRINGS, 'S'),
        (SHF_INFO_LINK, 'I'),
        (SHF_TLS, 'T'),
    ] {
        if flags & flag != 0 {
            disp.push(c);
        }
    }

    disp
}

/// Returns the section index of a symbol as displayed by `readelf`.
fn symbol_index(shndx: u16) -> String {
    match shndx {
        SHN_UNDEF => "UND".to_string(),
        SHN_ABS => "ABS".to_string(),
        SHN_COMMON => "COM".to_string(),
        idx => idx.to_string(),
    }
}

fn render_header(out: &mut String, elf: &ElfData) -> fmt::Result {
    let ehdr = elf.ehdr();
    let ident = ehdr.ident();

    writeln!(out, "ELF Header:")?;
    write!(out, "  Magic:  ")?;
    for b in &ident {
        write!(out, " {:02x}", b)?;
    }
    writeln!(out)?;
    writeln!(out, "  Class:                       {}", ehdr.class())?;
    writeln!(out, "  Data:                        {}", ident[EI_DATA])?;
    writeln!(out, "  Version:                     {}", ident[EI_VERSION])?;
    writeln!(out, "  OS/ABI:                      {}", ident[EI_OSABI])?;
    writeln!(out, "  Type:                        {}", ehdr.file_type())?;
    writeln!(out, "  Machine:                     {}", ehdr.machine())?;
    writeln!(out, "  Entry point address:         {:#x}", ehdr.entry())?;
    writeln!(out, "  Start of program headers:    {}", ehdr.phoff())?;
    writeln!(out, "  Start of section headers:    {}", ehdr.shoff())?;
    writeln!(out, "  Flags:                       {:#x}", ehdr.flags())?;
    writeln!(out, "  Size of this header:         {}", ehdr.ehsize())?;
    writeln!(out, "  Size of program headers:     {}", ehdr.phentsize())?;
    writeln!(out, "  Number of program headers:   {}", ehdr.phnum())?;
    writeln!(out, "  Size of section headers:     {}", ehdr.shentsize())?;
    writeln!(out, "  Number of section headers:   {}", ehdr.shnum())?;
    writeln!(out, "  Section header string table index: {}", ehdr.shstrndx())
}

fn render_program_headers(out: &mut String, elf: &ElfData) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "Program Headers:")?;
    writeln!(
        out,
        "  {:<14} {:<18} {:<18} {:<18} {:<18} {:<18} {:<5} {}",
        "Type", "Offset", "VirtAddr", "PhysAddr", "FileSiz", "MemSiz",
        "Flags", "Align"
    )?;

    for phdr in elf.phdrs() {
        writeln!(
            out,
            "  {:<14} {:#018x} {:#018x} {:#018x} {:#018x} {:#018x} {:<5} {:#x}",
            phdr.segment_type().to_string(),
            phdr.offset(),
            phdr.vaddr(),
            phdr.paddr(),
            phdr.filesz(),
            phdr.memsz(),
            segment_flags(phdr.flags()),
            phdr.align()
        )?;
    }

    Ok(())
}

fn render_sections(out: &mut String, elf: &ElfData) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "Section Headers:")?;
    writeln!(
        out,
        "  [Nr] {:<18} {:<14} {:<18} {:<10} {:<18} {:<5} {}",
        "Name", "Type", "Address", "Offset", "Size", "Flags", "Link"
    )?;

    for (i, section) in elf.sections().iter().enumerate() {
        let shdr = section.header();
        writeln!(
            out,
            "  [{:>2}] {:<18} {:<14} {:#018x} {:#010x} {:#018x} {:<5} {}",
            i,
            section.name(),
            shdr.section_type().to_string(),
            shdr.addr(),
            shdr.offset(),
            shdr.size(),
            section_flags(shdr.flags()),
            shdr.link()
        )?;
    }

    Ok(())
}

fn render_symbols(
    out: &mut String,
    table: &str,
    symbols: &[Symbol],
) -> fmt::Result {
    writeln!(out)?;
    if symbols.is_empty() {
        return writeln!(out, "No symbols in '{}'.", table);
    }

    writeln!(
        out,
        "Symbol table '{}' contains {} entries:",
        table,
        symbols.len()
    )?;
    writeln!(
        out,
        "  {:>6}: {:<16} {:>6} {:<8} {:<8} {:<9} {:>4} {}",
        "Num", "Value", "Size", "Type", "Bind", "Vis", "Ndx", "Name"
    )?;

    for (i, symbol) in symbols.iter().enumerate() {
        let sym = symbol.sym();
        writeln!(
            out,
            "  {:>6}: {:016x} {:>6} {:<8} {:<8} {:<9} {:>4} {}",
            i,
            sym.value(),
            sym.size(),
            sym.symbol_type().to_string(),
            sym.binding().to_string(),
            sym.visibility().to_string(),
            symbol_index(sym.shndx()),
            symbol.name()
        )?;
    }

    Ok(())
}

/// Returns the text displayed for `elf`.
fn render(elf: &ElfData, cli: &Cli) -> Result<String, fmt::Error> {
    let mut out = String::new();

    render_header(&mut out, elf)?;
    render_program_headers(&mut out, elf)?;
    render_sections(&mut out, elf)?;

    if !cli.no_symbols {
        render_symbols(&mut out, DYNSYM, elf.dyn_symbols())?;
        if !cli.dynamic_only {
            render_symbols(&mut out, SYMTAB, elf.other_symbols())?;
        }
    }

    Ok(out)
}

/// Parses the file named on the command line and prints its metadata.
fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let elf = elfdata::parse_file(&cli.file)?;

    print!("{}", render(&elf, cli)?);

    elf.destroy();
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = logger::init(cli.verbose) {
        eprintln!("error: could not install logger: {}", err);
        process::exit(1);
    }

    if let Err(err) = run(&cli) {
        log::error!("{}: {}", cli.file.display(), err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use super::*;

    #[test]
    fn flags() {
        assert_eq!(segment_flags(PF_R | PF_X), "R E");
        assert_eq!(segment_flags(PF_R | PF_W), "RW ");
        assert_eq!(section_flags(SHF_ALLOC | SHF_EXECINSTR), "AX");
        assert_eq!(section_flags(SHF_MERGE | SHF_STRINGS), "MS");
        assert_eq!(section_flags(0), "");
    }

    #[test]
    fn symbol_indices() {
        assert_eq!(symbol_index(SHN_UNDEF), "UND");
        assert_eq!(symbol_index(SHN_ABS), "ABS");
        assert_eq!(symbol_index(SHN_COMMON), "COM");
        assert_eq!(symbol_index(14), "14");
    }

    #[test]
    fn parse_args() {
        let cli =
            Cli::try_parse_from(&["elfdump", "-vv", "/bin/true"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.file, PathBuf::from("/bin/true"));
        assert!(!cli.no_symbols);

        assert!(Cli::try_parse_from(&[
            "elfdump",
            "--no-symbols",
            "--dynamic-only",
            "/bin/true"
        ])
        .is_err());
    }

    #[cfg(all(target_os = "linux", target_pointer_width = "64"))]
    #[test]
    fn render_current_exe() {
        let path = std::env::current_exe().unwrap();
        let elf = elfdata::parse_file(&path).unwrap();
        let cli = Cli::try_parse_from(vec![
            OsString::from("elfdump"),
            path.clone().into_os_string(),
        ])
        .unwrap();

        let out = render(&elf, &cli).unwrap();

        assert!(out.starts_with("ELF Header:\n  Magic:   7f 45 4c 46 02"));
        assert!(out.contains("Class:                       ELF64"));
        assert!(out.contains("Program Headers:"));
        assert!(out.contains(" .text "));
        assert!(
            out.contains("Symbol table '.symtab'")
                || out.contains("No symbols in '.symtab'.")
        );
    }
}
