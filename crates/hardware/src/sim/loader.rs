//! Program Image Loader.
//!
//! This module places program images into a [`Memory`]. It performs:
//! 1. **Hex images:** `$readmemh`-style text, one little-endian 32-bit word per line,
//!    with `//` comments and `@index` word-address directives relative to the memory base.
//! 2. **ELF images:** 32-bit little-endian RISC-V executables; every loadable segment is
//!    copied (with its zero-filled tail) and the `tohost` symbol is resolved.
//! 3. **Format detection:** `Auto` picks ELF when the file starts with the ELF magic.

use std::fs;
use std::path::Path;

use object::{Architecture, BinaryFormat, Object, ObjectSegment, ObjectSymbol};
use tracing::debug;

use crate::common::error::LoadError;
use crate::soc::Memory;

/// First bytes of every ELF file.
const ELF_MAGIC: &[u8; 4] = b"\x7fELF";

/// Container format of a program image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageFormat {
    /// `$readmemh` text.
    Hex,
    /// ELF32 executable.
    Elf,
    /// Decide from the file content.
    #[default]
    Auto,
}

/// What the loader learned about an image besides its bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageInfo {
    /// Entry point from the ELF header.
    pub entry: Option<u32>,
    /// Address of the `tohost` symbol.
    pub tohost: Option<u32>,
    /// Number of bytes placed in memory.
    pub bytes_loaded: usize,
}

/// Loads a hex image from text.
///
/// # Arguments
///
/// * `mem` - Target memory; word index 0 is `mem.base()`.
/// * `text` - Image content.
///
/// # Errors
///
/// [`LoadError::BadHexToken`] for a token that is neither a hex word nor an `@` directive,
/// [`LoadError::OutOfRange`] for a word outside memory.
pub fn load_hex_str(mem: &mut Memory, text: &str) -> Result<ImageInfo, LoadError> {
    let mut addr = mem.base();
    let mut info = ImageInfo::default();
    for (n, line) in text.lines().enumerate() {
        let code = line.split("//").next().unwrap_or_default();
        for token in code.split_whitespace() {
            let bad = || LoadError::BadHexToken {
                line: n + 1,
                token: token.to_owned(),
            };
            if let Some(index) = token.strip_prefix('@') {
                let index = u32::from_str_radix(index, 16).map_err(|_| bad())?;
                addr = mem.base().wrapping_add(index.wrapping_mul(4));
            } else {
                let word = u32::from_str_radix(token, 16).map_err(|_| bad())?;
                mem.write_u32(addr, word)?;
                addr = addr.wrapping_add(4);
                info.bytes_loaded += 4;
            }
        }
    }
    Ok(info)
}

/// Loads an ELF32 RISC-V executable from its bytes.
///
/// # Errors
///
/// [`LoadError::Elf`] if the container is malformed, [`LoadError::UnsupportedElf`] if it
/// is not a little-endian RV32 ELF, [`LoadError::OutOfRange`] if a segment does not fit.
pub fn load_elf_bytes(mem: &mut Memory, data: &[u8]) -> Result<ImageInfo, LoadError> {
    let file = object::File::parse(data)?;
    if file.format() != BinaryFormat::Elf {
        return Err(LoadError::UnsupportedElf("not an ELF file"));
    }
    if file.architecture() != Architecture::Riscv32 {
        return Err(LoadError::UnsupportedElf("not a 32-bit RISC-V image"));
    }
    if !file.is_little_endian() {
        return Err(LoadError::UnsupportedElf("big-endian image"));
    }

    let mut info = ImageInfo {
        entry: Some(file.entry() as u32),
        ..ImageInfo::default()
    };
    for segment in file.segments() {
        let addr = segment.address() as u32;
        let bytes = segment.data()?;
        let len = usize::try_from(segment.size())
            .unwrap_or(usize::MAX)
            .max(bytes.len());
        if len == 0 {
            continue;
        }
        // Reject before sizing the buffer; `p_memsz` is untrusted.
        if !mem.contains(addr, len) {
            return Err(LoadError::OutOfRange { addr, len });
        }
        let mut image = bytes.to_vec();
        image.resize(len, 0);
        mem.load_bytes(addr, &image)?;
        debug!(addr = format_args!("{addr:#010x}"), len = image.len(), "ELF segment");
        info.bytes_loaded += image.len();
    }
    info.tohost = file
        .symbols()
        .find(|s| s.name().is_ok_and(|n| n == "tohost"))
        .map(|s| s.address() as u32);
    Ok(info)
}

/// Reads an image file and loads it.
///
/// # Errors
///
/// [`LoadError::Io`] if the file cannot be read, otherwise as the format-specific loaders.
pub fn load_image(
    mem: &mut Memory,
    path: &Path,
    format: ImageFormat,
) -> Result<ImageInfo, LoadError> {
    let data = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let format = match format {
        ImageFormat::Auto if data.starts_with(ELF_MAGIC) => ImageFormat::Elf,
        ImageFormat::Auto => ImageFormat::Hex,
        f => f,
    };
    debug!(path = %path.display(), ?format, "loading image");
    match format {
        ImageFormat::Elf => load_elf_bytes(mem, &data),
        _ => load_hex_str(mem, &String::from_utf8_lossy(&data)),
    }
}
