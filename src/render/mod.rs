//! Composition of the daily four-panel figure and the trait that writes it out.

pub mod boundaries;
pub mod colormap;
pub mod plot;
pub mod projection;

use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use crate::field::GridSlice;
use colormap::{format_tick, ColorScale, Colormap};
use projection::MeshGrid;

pub use boundaries::Boundaries;
pub use plot::PlottersWriter;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to draw {path}: {message}")]
    Draw { path: String, message: String },

    #[error("failed to load boundaries from {path}: {message}")]
    Boundaries { path: String, message: String },

    #[error("figure has {found} panels, expected 4")]
    PanelCount { found: usize },
}

/// Writes a composed figure to an image file.
pub trait FigureWriter {
    fn write(&self, figure: &Figure<'_>, path: &Path) -> Result<(), RenderError>;
}

/// One day's figure. Built fresh for every day and dropped once written.
#[derive(Debug, Clone)]
pub struct Figure<'a> {
    pub title: String,
    pub mesh: &'a MeshGrid,
    /// Row-major 2×2 layout: top-left, top-right, bottom-left, bottom-right.
    pub panels: Vec<Panel<'a>>,
}

impl<'a> Figure<'a> {
    pub fn new(
        date: NaiveDate,
        mesh: &'a MeshGrid,
        panels: Vec<Panel<'a>>,
    ) -> Result<Self, RenderError> {
        if panels.len() != 4 {
            return Err(RenderError::PanelCount { found: panels.len() });
        }

        Ok(Figure {
            title: figure_title(date),
            mesh,
            panels,
        })
    }
}

/// e.g. `4km Observed and Cloud Free: 13 Apr 2017 00UTC`.
pub fn figure_title(date: NaiveDate) -> String {
    format!("4km Observed and Cloud Free: {} 00UTC", date.format("%d %b %Y"))
}

/// File name of a day's figure, `secoora_YYYYMMDD.png`.
pub fn figure_file_name(date: NaiveDate) -> String {
    format!("secoora_{}.png", date.format("%Y%m%d"))
}

/// One map panel: a masked field, how to colour it, and its colorbar ticks.
#[derive(Debug, Clone)]
pub struct Panel<'a> {
    pub title: String,
    pub slice: &'a GridSlice,
    pub scale: ColorScale,
    pub colormap: Colormap,
    pub ticks: Vec<f64>,
}

/// A filled mesh cell in projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub corners: ((f64, f64), (f64, f64)),
    pub rgb: (u8, u8, u8),
}

impl<'a> Panel<'a> {
    /// Colored cells for every unmasked sample the scale can represent.
    pub fn cells(&self, mesh: &MeshGrid) -> Vec<Cell> {
        let rows = self.slice.rows().min(mesh.rows());
        let cols = self.slice.cols().min(mesh.cols());
        let mut cells = Vec::with_capacity(self.slice.valid_count());

        for row in 0..rows {
            for col in 0..cols {
                if self.slice.is_masked(row, col) {
                    continue;
                }
                if let Some(t) = self.scale.normalize(self.slice.get(row, col)) {
                    cells.push(Cell {
                        corners: mesh.cell(row, col),
                        rgb: self.colormap.color(t),
                    });
                }
            }
        }

        cells
    }

    /// Colorbar ticks as (position in `[0, 1]`, label).
    pub fn colorbar_ticks(&self) -> Vec<(f64, String)> {
        self.ticks
            .iter()
            .map(|&t| (self.scale.position(t), format_tick(t)))
            .collect()
    }
}

// -- Tests -------------------------------------------------------------------
