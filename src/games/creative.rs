use super::GameEffect;

pub const CANVAS_WIDTH: usize = 24;
pub const CANVAS_HEIGHT: usize = 10;

pub const PALETTE: &[(&str, char)] = &[
    ("Crimson", '#'),
    ("Gold", '*'),
    ("Jade", '+'),
    ("Azure", '~'),
    ("Violet", '@'),
];

/// No wallet interaction here; the studio only raises notable events.
#[derive(Debug)]
pub struct CreativeStudio {
    cells: Vec<Option<u8>>,
    pub cursor: (usize, usize),
    pub color: u8,
    announced_full: bool,
}

impl Default for CreativeStudio {
    fn default() -> Self {
        Self {
            cells: vec![None; CANVAS_WIDTH * CANVAS_HEIGHT],
            cursor: (0, 0),
            color: 0,
            announced_full: false,
        }
    }
}

impl CreativeStudio {
    pub fn cell(&self, x: usize, y: usize) -> Option<u8> {
        self.cells.get(y * CANVAS_WIDTH + x).copied().flatten()
    }

    pub fn move_cursor(&mut self, dx: isize, dy: isize) {
        let (x, y) = self.cursor;
        let x = x.saturating_add_signed(dx).min(CANVAS_WIDTH - 1);
        let y = y.saturating_add_signed(dy).min(CANVAS_HEIGHT - 1);
        self.cursor = (x, y);
    }

    pub fn cycle_color(&mut self) {
        self.color = (self.color + 1) % PALETTE.len() as u8;
    }

    pub fn paint(&mut self) -> Vec<GameEffect> {
        let (x, y) = self.cursor;
        self.cells[y * CANVAS_WIDTH + x] = Some(self.color);
        if !self.announced_full && self.cells.iter().all(|c| c.is_some()) {
            self.announced_full = true;
            return vec![GameEffect::Notable(
                "filled the entire Nano Studio canvas".to_string(),
            )];
        }
        Vec::new()
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
        self.announced_full = false;
    }

    pub fn painted(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
