pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// The original implementation of the Chip-8 language used a 64x32-pixel monochrome display with this format:
/// ( 0, 0)   (63, 0)
/// ( 0,31)   (63,31)
#[derive(Clone, PartialEq, Eq)]
pub struct Display([bool; DISPLAY_WIDTH * DISPLAY_HEIGHT]);

impl Display {
    pub fn new() -> Self {
        Display([false; DISPLAY_WIDTH * DISPLAY_HEIGHT])
    }

    pub fn clear(&mut self) {
        for i in &mut self.0 {
            *i = false
        }
    }

    /// Panics in debug builds if (`x`, `y`) is off screen.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.0[self.compute_idx(x, y)]
    }

    /// Xors the pixel at position (`x`, `y`) and returns `true`
    /// if the pixel was cleared.
    pub fn xor_pixel(&mut self, x: usize, y: usize, value: bool) -> bool {
        let idx = self.compute_idx(x, y);
        let last_value = self.0[idx];
        let new_value = last_value ^ value;
        self.0[idx] = new_value;

        last_value && !new_value
    }

    /// Xors an 8-pixel wide sprite, one byte per row with the most significant bit leftmost,
    /// onto the screen with its top left corner at (`x`, `y`). Coordinates wrap around both
    /// edges. Returns `true` if any pixel was cleared.
    pub fn draw_sprite(&mut self, x: usize, y: usize, rows: &[u8]) -> bool {
        let mut collision = false;

        for (dy, sprite) in rows.iter().enumerate() {
            let row = (y + dy) % DISPLAY_HEIGHT;

            for dx in 0..8usize {
                if *sprite & (0b1000_0000u8 >> dx) == 0 {
                    continue;
                }

                let col = (x + dx) % DISPLAY_WIDTH;
                collision |= self.xor_pixel(col, row, true);
            }
        }

        collision
    }

    fn compute_idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < DISPLAY_WIDTH && y < DISPLAY_HEIGHT, "pixel ({}, {}) is off screen", x, y);

        y * DISPLAY_WIDTH + x
    }

    pub fn pixels(&self) -> &[bool] {
        &self.0
    }

    pub fn width(&self) -> usize {
        DISPLAY_WIDTH
    }

    pub fn height(&self) -> usize {
        DISPLAY_HEIGHT
    }

    /// Renders the screen as text, one line per row, `#` for lit pixels.
    pub fn to_text(&self) -> String {
        self.0
            .chunks(DISPLAY_WIDTH)
            .map(|row| row.iter().map(|p| if *p { '#' } else { '.' }).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Display {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_text())
    }
}
