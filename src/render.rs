//! Renderer-facing interface.
//!
//! The simulation does not draw. It hands a renderer one [`FlakeInstance`]
//! per flake, either through [`Canvas::draw_flake`] (one call per flake, see
//! [`draw`]) or as a packed slice for instanced GPU drawing:
//!
//! ```ignore
//! let instances = simulation.instances();
//! queue.write_buffer(&instance_buffer, 0, bytemuck::cast_slice(&instances));
//! ```
//!
//! [`TextCanvas`] is a small character-cell renderer used by the demo.

use crate::simulation::Simulation;
use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Night-sky clear color.
pub const BACKGROUND: [u8; 3] = [10, 10, 18];

/// Flake color; opacity comes from [`FlakeInstance::alpha`].
pub const FLAKE_COLOR: [u8; 3] = [255, 255, 255];

/// Per-flake render data.
///
/// `#[repr(C)]` and [`Pod`] so a slice of instances can be uploaded directly
/// as a vertex/instance buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FlakeInstance {
    /// Center in screen pixels.
    pub position: Vec2,
    /// Radius in pixels.
    pub radius: f32,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
}

impl FlakeInstance {
    pub fn new(position: Vec2, radius: f32, alpha: u8) -> Self {
        Self {
            position,
            radius,
            alpha: alpha as f32 / 255.0,
        }
    }

    /// Opacity as an 8-bit value.
    #[inline]
    pub fn alpha_u8(&self) -> u8 {
        (self.alpha * 255.0).round().clamp(0.0, 255.0) as u8
    }
}

/// A draw target that can paint soft white discs.
///
/// How the disc is rasterized (anti-aliasing, blending) is up to the
/// implementor.
pub trait Canvas {
    /// Fill the whole target with an opaque color.
    fn clear(&mut self, rgb: [u8; 3]);

    /// Paint one flake.
    fn draw_flake(&mut self, flake: &FlakeInstance);
}

/// Clear `canvas` and draw every flake of `simulation`, one call each.
pub fn draw<C: Canvas + ?Sized>(canvas: &mut C, simulation: &Simulation) {
    canvas.clear(BACKGROUND);
    for particle in simulation.particles() {
        canvas.draw_flake(&particle.instance());
    }
}

/// Glyphs from faint to bright.
const GLYPHS: [char; 4] = ['.', ':', '*', '@'];

/// Character-cell canvas.
///
/// Maps the screen onto a `columns x rows` grid. Each flake marks the cell
/// under its center; brighter flakes win over fainter ones in the same
/// cell. Discs are not rasterized.
#[derive(Clone, Debug)]
pub struct TextCanvas {
    columns: usize,
    rows: usize,
    cell: Vec2,
    cells: Vec<u8>,
}

impl TextCanvas {
    /// Create a grid covering a `screen_width x screen_height` pixel area.
    pub fn new(columns: usize, rows: usize, screen_width: f32, screen_height: f32) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Self {
            columns,
            rows,
            cell: Vec2::new(screen_width / columns as f32, screen_height / rows as f32),
            cells: vec![0; columns * rows],
        }
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Brightest alpha drawn into cell `(column, row)`, 0 if empty.
    pub fn alpha_at(&self, column: usize, row: usize) -> u8 {
        if column >= self.columns || row >= self.rows {
            return 0;
        }
        self.cells[row * self.columns + column]
    }

    fn glyph(alpha: u8) -> char {
        match alpha {
            0 => ' ',
            a => GLYPHS[(a as usize * GLYPHS.len() / 256).min(GLYPHS.len() - 1)],
        }
    }

    /// The grid as newline-separated rows.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.columns + 1) * self.rows);
        for row in self.cells.chunks(self.columns) {
            out.extend(row.iter().map(|&a| Self::glyph(a)));
            out.push('\n');
        }
        out
    }
}

impl Canvas for TextCanvas {
    fn clear(&mut self, _rgb: [u8; 3]) {
        self.cells.fill(0);
    }

    fn draw_flake(&mut self, flake: &FlakeInstance) {
        let cell = flake.position / self.cell;
        if cell.x < 0.0 || cell.y < 0.0 {
            return;
        }
        let (column, row) = (cell.x as usize, cell.y as usize);
        if column >= self.columns || row >= self.rows {
            return;
        }
        let slot = &mut self.cells[row * self.columns + column];
        *slot = (*slot).max(flake.alpha_u8());
    }
}
