use crate::error::{QrError, Result};

/// Square grid of QR modules, packed one bit per module.
///
/// `true` marks a dark (foreground) module. The matrix already includes
/// the quiet zone produced by the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    size: usize,
    data: Vec<u8>,
}

impl ModuleMatrix {
    /// Create an all-light matrix with `size` modules per side
    pub fn new(size: usize) -> Self {
        let bytes_needed = (size * size).div_ceil(8);
        Self {
            size,
            data: vec![0; bytes_needed],
        }
    }

    /// Build a matrix from row-major rows; every row must be `rows.len()` long
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self> {
        let size = rows.len();
        let mut matrix = Self::new(size);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(QrError::InvalidInput(format!(
                    "module matrix row {} has {} cells, expected {}",
                    y,
                    row.len(),
                    size
                )));
            }
            for (x, &dark) in row.iter().enumerate() {
                matrix.set(x, y, dark);
            }
        }
        Ok(matrix)
    }

    /// Modules per side
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get module at (x, y); out-of-range reads are light
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.size || y >= self.size {
            return false;
        }
        let index = y * self.size + x;
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Set module at (x, y); out-of-range writes are ignored
    pub fn set(&mut self, x: usize, y: usize, dark: bool) {
        if x >= self.size || y >= self.size {
            return;
        }
        let index = y * self.size + x;
        if dark {
            self.data[index / 8] |= 1 << (index % 8);
        } else {
            self.data[index / 8] &= !(1 << (index % 8));
        }
    }

    /// Number of dark modules
    pub fn dark_count(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }
}
