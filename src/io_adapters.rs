use std::cell::RefCell;
use std::io::{Result as IoResult, Write};
use std::rc::Rc;

/// Memory-backed writer whose clones share one buffer.
///
/// Hand one clone to an evaluation as its output sink and keep another to
/// read what was written afterwards.
#[derive(Debug, Clone, Default)]
pub struct SharedWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl SharedWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every byte written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.buf.borrow().clone()
    }

    /// Contents decoded as UTF-8, with invalid sequences replaced.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.buf.borrow()).into_owned()
    }

    /// Drop everything written so far.
    pub fn clear(&self) {
        self.buf.borrow_mut().clear();
    }
}

impl Write for SharedWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}
