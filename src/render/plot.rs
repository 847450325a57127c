//! Draws figures to PNG with `plotters`.

use std::{error::Error, path::Path};

use plotters::{
    coord::Shift,
    prelude::*,
    style::{FontDesc, FontFamily, FontStyle},
};

use super::{
    projection::{self, format_latitude, format_longitude, mercator_y, MeshGrid},
    Boundaries, Figure, FigureWriter, Panel, RenderError,
};

const GRATICULE_SPACING: f64 = 5.0;
const COLORBAR_WIDTH: u32 = 150;
const COLORBAR_STEPS: usize = 256;
/// Share of the colorbar chart taken by the bar; tick labels use the rest.
const BAR_FRACTION: f64 = 0.35;

const FIGURE_TITLE_SIZE: f64 = 36.0;
const PANEL_TITLE_SIZE: f64 = 24.0;
const GRATICULE_LABEL_SIZE: f64 = 18.0;
const TICK_LABEL_SIZE: f64 = 20.0;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

fn font(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
}

/// Renders each panel as a Mercator map with a colorbar on its right.
pub struct PlottersWriter {
    size: (u32, u32),
    boundaries: Option<Boundaries>,
}

impl PlottersWriter {
    pub fn new(size: (u32, u32), boundaries: Option<Boundaries>) -> Self {
        PlottersWriter { size, boundaries }
    }

    fn draw(&self, figure: &Figure<'_>, path: &Path) -> Result<(), Box<dyn Error>> {
        let root = BitMapBackend::new(path, self.size).into_drawing_area();
        root.fill(&WHITE)?;

        let body = root.titled(&figure.title, font(FIGURE_TITLE_SIZE))?;
        for (area, panel) in body.split_evenly((2, 2)).iter().zip(&figure.panels) {
            draw_panel(area, figure.mesh, panel, self.boundaries.as_ref())?;
        }

        root.present()?;

        Ok(())
    }
}

impl FigureWriter for PlottersWriter {
    fn write(&self, figure: &Figure<'_>, path: &Path) -> Result<(), RenderError> {
        self.draw(figure, path).map_err(|e| RenderError::Draw {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

fn draw_panel(
    area: &Area<'_>,
    mesh: &MeshGrid,
    panel: &Panel<'_>,
    boundaries: Option<&Boundaries>,
) -> Result<(), Box<dyn Error>> {
    let (width, _) = area.dim_in_pixel();
    let (map_area, bar_area) = area.split_horizontally(width.saturating_sub(COLORBAR_WIDTH) as i32);

    let extent = &mesh.extent;
    let (y_min, y_max) = extent.y_range();

    let mut chart = ChartBuilder::on(&map_area)
        .caption(&panel.title, font(PANEL_TITLE_SIZE))
        .margin(10)
        .build_cartesian_2d(extent.lon_min..extent.lon_max, y_min..y_max)?;

    chart.draw_series(panel.cells(mesh).into_iter().map(|cell| {
        let (r, g, b) = cell.rgb;
        Rectangle::new([cell.corners.0, cell.corners.1], RGBColor(r, g, b).filled())
    }))?;

    if let Some(boundaries) = boundaries {
        for line in boundaries.clipped(extent) {
            chart.draw_series(LineSeries::new(
                line.into_iter().map(|(lon, lat)| (lon, mercator_y(lat))),
                &BLACK,
            ))?;
        }
    }

    // Graticule over the data.
    let grid_style = BLACK.mix(0.4).stroke_width(1);
    let meridians = projection::meridians(extent, GRATICULE_SPACING);
    let parallels = projection::parallels(extent, GRATICULE_SPACING);

    for &lon in &meridians {
        chart.draw_series(LineSeries::new(vec![(lon, y_min), (lon, y_max)], grid_style))?;
    }
    for &lat in &parallels {
        let y = mercator_y(lat);
        chart.draw_series(LineSeries::new(
            vec![(extent.lon_min, y), (extent.lon_max, y)],
            grid_style,
        ))?;
    }
    chart.draw_series(meridians.iter().map(|&lon| {
        EmptyElement::at((lon, y_min))
            + Text::new(format_longitude(lon), (4, -24), font(GRATICULE_LABEL_SIZE))
    }))?;
    chart.draw_series(parallels.iter().map(|&lat| {
        EmptyElement::at((extent.lon_min, mercator_y(lat)))
            + Text::new(format_latitude(lat), (4, -22), font(GRATICULE_LABEL_SIZE))
    }))?;

    chart.draw_series(std::iter::once(Rectangle::new(
        [(extent.lon_min, y_min), (extent.lon_max, y_max)],
        BLACK.stroke_width(1),
    )))?;

    draw_colorbar(&bar_area, panel)
}

fn draw_colorbar(area: &Area<'_>, panel: &Panel<'_>) -> Result<(), Box<dyn Error>> {
    let mut chart = ChartBuilder::on(area)
        .margin_top(60)
        .margin_bottom(50)
        .margin_right(10)
        .build_cartesian_2d(0.0..1.0, 0.0..1.0)?;

    chart.draw_series((0..COLORBAR_STEPS).map(|step| {
        let lower = step as f64 / COLORBAR_STEPS as f64;
        let upper = (step + 1) as f64 / COLORBAR_STEPS as f64;
        let (r, g, b) = panel.colormap.color((lower + upper) / 2.0);
        Rectangle::new([(0.0, lower), (BAR_FRACTION, upper)], RGBColor(r, g, b).filled())
    }))?;
    chart.draw_series(std::iter::once(Rectangle::new(
        [(0.0, 0.0), (BAR_FRACTION, 1.0)],
        BLACK.stroke_width(1),
    )))?;

    chart.draw_series(panel.colorbar_ticks().into_iter().map(|(position, label)| {
        EmptyElement::at((BAR_FRACTION, position))
            + PathElement::new(vec![(0, 0), (6, 0)], BLACK.stroke_width(1))
            + Text::new(label, (10, -10), font(TICK_LABEL_SIZE))
    }))?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------
