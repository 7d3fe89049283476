use std::cell::Cell;

/// Selection cursor plus the first visible row. Interior mutability lets rendering
/// (which only has `&self`) keep the cursor on screen.
pub struct VerticalScroll {
    pub y_offset: Cell<usize>,
    pub pos: Cell<usize>,
    pub going_down: Cell<bool>,
}

impl VerticalScroll {
    pub fn new() -> Self {
        VerticalScroll {
            y_offset: Cell::new(0),
            pos: Cell::new(0),
            going_down: Cell::new(true),
        }
    }

    pub fn pos(&self) -> usize {
        self.pos.get()
    }

    pub fn move_up(&self) {
        let pos = self.pos.get();
        self.pos.set(pos.saturating_sub(1));
        self.going_down.set(false);
    }

    pub fn move_down(&self, max_len: usize) {
        let pos = self.pos.get();
        if pos + 1 < max_len {
            self.pos.set(pos + 1);
        }
        self.going_down.set(true);
    }

    /// Keeps the cursor inside a list that may have shrunk.
    pub fn clamp(&self, len: usize) {
        let last = len.saturating_sub(1);
        if self.pos.get() > last {
            self.pos.set(last);
        }
        if self.y_offset.get() > last {
            self.y_offset.set(last);
        }
    }

    pub fn update(&self, visible_height: usize, max_selection: usize) {
        let new_y_offset = self.calc_scroll_offset(visible_height, self.pos.get(), max_selection);

        self.y_offset.set(new_y_offset);
    }

    fn calc_scroll_offset(
        &self,
        visible_height: usize,
        selection: usize,
        max_selection: usize,
    ) -> usize {
        let y_offset = self.y_offset.get();

        if visible_height == 0 || max_selection == 0 {
            return 0;
        }

        if selection >= max_selection {
            return max_selection - 1;
        }

        if self.going_down.get() {
            if selection >= visible_height + y_offset {
                selection + 1 - visible_height
            } else {
                y_offset
            }
        } else if selection < y_offset {
            selection
        } else {
            y_offset
        }
    }
}
