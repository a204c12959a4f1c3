//! Read-only memory maps of files on disk.

use std::convert::TryInto;
use std::fs::{self, File};
use std::io;
use std::ops::Deref;
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::ptr;
use std::slice;

/// Private, read-only mapping of a whole file. The file is unmapped and
/// closed when the `Mapping` is dropped.
///
/// The contents are undefined if the file is truncated by another process
/// while it is mapped.
pub struct Mapping {
    /// Start of the mapping. Null for empty files, which are not mapped.
    ptr: *mut libc::c_void,

    /// Length of the mapping in bytes.
    len: usize,

    /// Open handle of the mapped file.
    _file: File,
}

impl Mapping {
    /// Maps the file at `path` into memory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Mapping, io::Error> {
        let path = path.as_ref();

        let size = fs::metadata(path)?.len();
        let file = File::open(path)?;

        let len: usize = size.try_into().map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "file too large to map")
        })?;

        // mmap(2) rejects zero-length mappings.
        if len == 0 {
            return Ok(Mapping {
                ptr: ptr::null_mut(),
                len,
                _file: file,
            });
        }

        let ptr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                len,
                libc::PROT_READ,
                libc::MAP_PRIVATE,
                file.as_raw_fd(),
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }

        Ok(Mapping {
            ptr,
            len,
            _file: file,
        })
    }
}

impl Deref for Mapping {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        if self.ptr.is_null() {
            return &[];
        }

        unsafe { slice::from_raw_parts(self.ptr as *const u8, self.len) }
    }
}

impl Drop for Mapping {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            unsafe {
                libc::munmap(self.ptr, self.len);
            }
        }
    }
}
