// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Support for in-kernel debugging output.
//!
//! Drivers print with the `debug!` macro:
//!
//! ```ignore
//! use kernel::debug;
//!
//! debug!("reset cause: {:?}", cause);
//! ```
//!
//! Output goes to the writer registered with [`set_debug_writer`], usually a
//! polled SCI port set up by the board once clocks are running. Until a writer
//! is registered, messages are dropped. Each message is terminated with
//! `"\r\n"`.

use core::cell::UnsafeCell;
use core::fmt::{self, Write};

/// A sink for raw debug bytes.
pub trait IoWrite {
    /// Write `buf` to the output and return the number of bytes written.
    fn write(&mut self, buf: &[u8]) -> usize;
}

struct DebugWriterSlot {
    writer: UnsafeCell<Option<&'static mut dyn IoWrite>>,
}

// The slot is written once during board setup and only ever accessed from the
// single core.
unsafe impl Sync for DebugWriterSlot {}

static DEBUG_WRITER: DebugWriterSlot = DebugWriterSlot {
    writer: UnsafeCell::new(None),
};

/// Register the sink that `debug!` output is written to.
///
/// # Safety
///
/// Must be called before interrupts that may print are enabled, and never
/// concurrently with `debug!`.
pub unsafe fn set_debug_writer(writer: &'static mut dyn IoWrite) {
    *DEBUG_WRITER.writer.get() = Some(writer);
}

struct WriterAdapter<'a> {
    writer: &'a mut (dyn IoWrite + 'static),
}

impl Write for WriterAdapter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut bytes = s.as_bytes();
        while !bytes.is_empty() {
            let written = self.writer.write(bytes);
            if written == 0 {
                return Err(fmt::Error);
            }
            bytes = &bytes[written.min(bytes.len())..];
        }
        Ok(())
    }
}

/// Write one formatted line to the registered debug writer.
///
/// This is the implementation behind `debug!`; call the macro instead.
pub fn debug_println(args: fmt::Arguments) {
    // Safety: see `DebugWriterSlot`.
    let slot = unsafe { &mut *DEBUG_WRITER.writer.get() };
    if let Some(writer) = slot.as_deref_mut() {
        let mut adapter = WriterAdapter { writer };
        let _ = adapter.write_fmt(args);
        let _ = adapter.write_str("\r\n");
    }
}

/// In-kernel `println()` debugging.
#[macro_export]
macro_rules! debug {
    () => ({
        $crate::debug!("")
    });
    ($msg:expr $(,)?) => ({
        $crate::debug::debug_println(format_args!($msg));
    });
    ($fmt:expr, $($arg:tt)+) => ({
        $crate::debug::debug_println(format_args!($fmt, $($arg)+));
    });
}
