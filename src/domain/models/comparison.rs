#[cfg(test)]
#[path = "comparison_test.rs"]
mod tests;

use ratatui::prelude::Rect;

/// Before/after divider. `position` is a percentage of the pane width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComparisonSlider {
    pub position: f32,
    dragging: bool,
}

impl Default for ComparisonSlider {
    fn default() -> ComparisonSlider {
        return ComparisonSlider {
            position: 50.0,
            dragging: false,
        };
    }
}

impl ComparisonSlider {
    pub fn is_dragging(&self) -> bool {
        return self.dragging;
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    /// Moves the divider to `column` while a drag is active. Columns outside
    /// the pane clamp to its edges.
    pub fn drag_to(&mut self, column: u16, area: Rect) {
        if !self.dragging || area.width == 0 {
            return;
        }

        let offset = column.saturating_sub(area.x).min(area.width);
        self.position = (offset as f32 / area.width as f32) * 100.0;
    }

    /// Ends the drag no matter where the pointer was released.
    pub fn release(&mut self) {
        self.dragging = false;
    }

    pub fn nudge(&mut self, delta: f32) {
        self.position = (self.position + delta).clamp(0.0, 100.0);
    }

    /// Number of columns, out of `width`, showing the original.
    pub fn split_column(&self, width: u16) -> u16 {
        let col = (width as f32 * self.position / 100.0).round() as u16;
        return col.min(width);
    }
}
