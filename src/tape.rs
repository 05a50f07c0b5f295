use std::fmt::Write as _;

/// Zero-initialized byte cells addressed by the data pointer.
///
/// Cell arithmetic wraps modulo 256. Indices are checked by the engine
/// before they reach the tape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tape {
    cells: Box<[u8]>,
}

#[allow(clippy::len_without_is_empty)]
impl Tape {
    pub fn new(len: usize) -> Self {
        Self {
            cells: vec![0u8; len].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, idx: usize) -> u8 {
        self.cells[idx]
    }

    pub fn set(&mut self, idx: usize, value: u8) {
        self.cells[idx] = value;
    }

    pub fn increment(&mut self, idx: usize) {
        self.cells[idx] = self.cells[idx].wrapping_add(1);
    }

    pub fn decrement(&mut self, idx: usize) {
        self.cells[idx] = self.cells[idx].wrapping_sub(1);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    /// Hex dump of the first `count` cells, 16 per row, each row prefixed
    /// with the index of its first cell.
    pub fn dump(&self, count: usize) -> String {
        let mut out = String::new();
        let shown = &self.cells[..count.min(self.cells.len())];
        for (row, chunk) in shown.chunks(16).enumerate() {
            let _ = write!(out, "{:05}:", row * 16);
            for byte in chunk {
                let _ = write!(out, " {byte:02x}");
            }
            out.push('\n');
        }
        out
    }
}
