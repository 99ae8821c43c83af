//! Rendering collaborator
//!
//! The simulation never draws. The rendering-event stage fills a
//! [`RenderQueue`] once per frame and the frontend replays it into whatever
//! [`RenderSink`] it owns, strictly between frames.

use crate::core::config::RenderTuning;
use crate::core::types::{Color, Vec2};

/// Drawing surface implemented by frontends
pub trait RenderSink {
    fn put_glyph(&mut self, pos: Vec2, glyph: char, color: Color);
    fn draw_text(&mut self, pos: Vec2, text: &str, color: Color);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Glyph { pos: Vec2, glyph: char, color: Color },
    Text { pos: Vec2, text: String, color: Color },
}

/// Draw list produced by one frame, back to front
#[derive(Debug, Default)]
pub struct RenderQueue {
    commands: Vec<DrawCommand>,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn glyph(&mut self, pos: Vec2, glyph: char, color: Color) {
        self.commands.push(DrawCommand::Glyph { pos, glyph, color });
    }

    pub fn text(&mut self, pos: Vec2, text: impl Into<String>, color: Color) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.into(),
            color,
        });
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn replay(&self, sink: &mut dyn RenderSink) {
        for command in &self.commands {
            match command {
                DrawCommand::Glyph { pos, glyph, color } => sink.put_glyph(*pos, *glyph, *color),
                DrawCommand::Text { pos, text, color } => sink.draw_text(*pos, text, *color),
            }
        }
    }
}

/// Plain character grid; used by the headless runner and in tests
#[derive(Debug, Clone)]
pub struct TextCanvas {
    cols: usize,
    rows: usize,
    cell: RenderTuning,
    cells: Vec<char>,
}

impl TextCanvas {
    pub fn new(cols: usize, rows: usize, cell: RenderTuning) -> Self {
        Self {
            cols,
            rows,
            cell,
            cells: vec![' '; cols * rows],
        }
    }

    fn cell_of(&self, pos: Vec2) -> Option<(usize, usize)> {
        if pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let col = (pos.x / self.cell.cell_width) as usize;
        let row = (pos.y / self.cell.cell_height) as usize;
        (col < self.cols && row < self.rows).then_some((col, row))
    }

    pub fn get(&self, col: usize, row: usize) -> Option<char> {
        (col < self.cols && row < self.rows).then(|| self.cells[row * self.cols + col])
    }

    pub fn lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols.max(1))
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect()
    }
}

impl RenderSink for TextCanvas {
    fn put_glyph(&mut self, pos: Vec2, glyph: char, _color: Color) {
        if let Some((col, row)) = self.cell_of(pos) {
            self.cells[row * self.cols + col] = glyph;
        }
    }

    fn draw_text(&mut self, pos: Vec2, text: &str, _color: Color) {
        let Some((col, row)) = self.cell_of(pos) else {
            return;
        };
        for (i, c) in text.chars().enumerate() {
            if col + i >= self.cols {
                break;
            }
            self.cells[row * self.cols + col + i] = c;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_into_canvas() {
        let mut queue = RenderQueue::new();
        queue.glyph(Vec2::new(15.0, 25.0), '@', Color::Blue);
        queue.text(Vec2::new(0.0, 0.0), "hi", Color::White);

        let mut canvas = TextCanvas::new(4, 2, RenderTuning::default());
        queue.replay(&mut canvas);

        assert_eq!(canvas.get(1, 1), Some('@'));
        assert_eq!(canvas.lines()[0], "hi");
    }

    #[test]
    fn test_offscreen_is_clipped() {
        let mut canvas = TextCanvas::new(2, 2, RenderTuning::default());
        canvas.put_glyph(Vec2::new(-5.0, 0.0), 'x', Color::Red);
        canvas.draw_text(Vec2::new(10.0, 0.0), "long", Color::Red);
        assert_eq!(canvas.lines(), vec![" l".to_string(), String::new()]);
    }
}
