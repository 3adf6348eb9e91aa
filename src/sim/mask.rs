//! Bit masks for pixel-precise overlap tests
//!
//! A mask is a row-major bitset of occupied pixels. Overlap semantics match a
//! sprite mask test: `a.overlap(&b, (dx, dy))` places `b`'s origin at `(dx, dy)`
//! in `a`'s coordinates and reports whether any pixel is set in both.

/// Occupancy bitmap of a sprite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    /// u64 words per row
    stride: usize,
    bits: Vec<u64>,
}

impl Mask {
    /// Empty mask
    pub fn new(width: u32, height: u32) -> Self {
        let stride = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            stride,
            bits: vec![0; stride * height as usize],
        }
    }

    /// Fully set mask
    #[cfg(test)]
    pub fn filled(width: u32, height: u32) -> Self {
        let mut mask = Self::new(width, height);
        mask.fill_rect(0, 0, width, height);
        mask
    }

    /// Bird silhouette: an ellipse inscribed in the sprite box
    pub fn bird(width: u32, height: u32) -> Self {
        let mut mask = Self::new(width, height);
        let rx = width as f32 / 2.0;
        let ry = height as f32 / 2.0;
        for y in 0..height {
            let ny = (y as f32 + 0.5 - ry) / ry;
            let half = rx * (1.0 - ny * ny).max(0.0).sqrt();
            let x0 = (rx - half).round() as u32;
            let x1 = ((rx + half).round() as u32).min(width);
            if x1 > x0 {
                mask.fill_rect(x0, y, x1 - x0, 1);
            }
        }
        mask
    }

    /// Pipe silhouette: a body column inset from a full-width lip at the mouth.
    /// `lip_at_top` is the upright (bottom) pipe; the hanging pipe has its lip
    /// at the bottom.
    pub fn pipe(width: u32, height: u32, lip_height: u32, inset: u32, lip_at_top: bool) -> Self {
        let mut mask = Self::new(width, height);
        let lip = lip_height.min(height);
        let body_w = width.saturating_sub(inset.saturating_mul(2));
        if lip_at_top {
            mask.fill_rect(0, 0, width, lip);
            mask.fill_rect(inset, lip, body_w, height - lip);
        } else {
            mask.fill_rect(inset, 0, body_w, height - lip);
            mask.fill_rect(0, height - lip, width, lip);
        }
        mask
    }

    /// Set every pixel in the rectangle (clipped to the mask)
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for row in y..y_end {
            for col in x..x_end {
                self.set(col, row);
            }
        }
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32) {
        if x < self.width && y < self.height {
            let idx = y as usize * self.stride + (x / 64) as usize;
            self.bits[idx] |= 1 << (x % 64);
        }
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = y as usize * self.stride + (x / 64) as usize;
        self.bits[idx] & (1 << (x % 64)) != 0
    }

    /// Number of set pixels
    #[cfg(test)]
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// Up to 64 bits of `row` starting at column `start`, low bit first
    fn row_bits(&self, row: u32, start: u32, len: u32) -> u64 {
        debug_assert!(len > 0 && len <= 64);
        let base = row as usize * self.stride;
        let word = (start / 64) as usize;
        let shift = start % 64;
        let mut bits = self.bits[base + word] >> shift;
        if shift != 0 && word + 1 < self.stride {
            bits |= self.bits[base + word + 1] << (64 - shift);
        }
        if len < 64 { bits & ((1u64 << len) - 1) } else { bits }
    }

    /// True if `other`, placed at `offset` relative to `self`, shares a set pixel
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> bool {
        let (dx, dy) = offset;
        // Intersection in self's coordinates
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (self.width as i32).min(dx + other.width as i32);
        let y1 = (self.height as i32).min(dy + other.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }

        for y in y0..y1 {
            let mut x = x0;
            while x < x1 {
                let len = ((x1 - x) as u32).min(64);
                let a = self.row_bits(y as u32, x as u32, len);
                let b = other.row_bits((y - dy) as u32, (x - dx) as u32, len);
                if a & b != 0 {
                    return true;
                }
                x += len as i32;
            }
        }
        false
    }
}
