//! Map rendering onto an explicit in-memory figure.
//!
//! A [`Figure`] owns its RGB pixels and layout. Each drawing phase opens a
//! plotters bitmap backend over the buffer for its own scope, so nothing
//! outlives the call that draws it.

pub mod clip;
pub mod colormap;
pub mod display;
pub mod layout;
pub mod mesh;
pub mod overlay;
pub mod png;

use std::{fmt::Display, io::Write, path::Path};

use anyhow::{anyhow, Context, Result};
use plotters::{
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use tempfile::NamedTempFile;

use self::{
    colormap::ColorScale,
    layout::{Layout, Rect},
    overlay::{Layer, Overlays},
};
use crate::{climatology::MaskedGrid, dataset::Extent, settings};

const FONT: &str = "sans-serif";
const TITLE_FONT_PX: u32 = 50;
const ANNOTATION_FONT_PX: u32 = 33;
const TICK_FONT_PX: u32 = 42;
const TICK_LENGTH_PX: i32 = 15;
const FRAME_WIDTH_PX: u32 = 3;

fn draw_err<E: Display>(e: E) -> anyhow::Error {
    anyhow!("drawing failed: {}", e)
}

/// A fixed-size raster figure with Plate Carrée map axes.
pub struct Figure {
    buffer: Vec<u8>,
    size: (u32, u32),
    dpi: u32,
    layout: Layout,
    extent: Extent,
}

impl Figure {
    /// A figure at the configured size and resolution.
    pub fn new(extent: Extent) -> Self {
        Figure::with_size(settings::canvas_size(), settings::DPI, extent)
    }

    pub fn with_size(size: (u32, u32), dpi: u32, extent: Extent) -> Self {
        Figure {
            buffer: vec![255; size.0 as usize * size.1 as usize * 3],
            size,
            dpi,
            layout: Layout::new(size, &extent),
            extent,
        }
    }

    /// Lon/lat to canvas pixel.
    fn project(&self, (lon, lat): (f64, f64)) -> (i32, i32) {
        let map = &self.layout.map;
        let fx = (lon - self.extent.lon_min) / self.extent.width();
        let fy = (self.extent.lat_max - lat) / self.extent.height();

        (
            map.x + (fx * map.width as f64).round() as i32,
            map.y + (fy * map.height as f64).round() as i32,
        )
    }

    /// White canvas, ocean-colored map area and white land on top. Holes in
    /// the land, such as large lakes, show the ocean color.
    ///
    /// Without a land layer the map area stays white.
    pub fn draw_basemap(&mut self, land: Option<&Layer>) -> Result<()> {
        let map = self.layout.map;
        let areas: Vec<(Vec<(i32, i32)>, Vec<Vec<(i32, i32)>>)> = land
            .map(|layer| {
                layer
                    .areas
                    .iter()
                    .map(|area| {
                        let exterior = area.exterior.iter().map(|&p| self.project(p)).collect();
                        let holes = area
                            .holes
                            .iter()
                            .map(|ring| ring.iter().map(|&p| self.project(p)).collect())
                            .collect();
                        (exterior, holes)
                    })
                    .collect()
            })
            .unwrap_or_default();

        let root = BitMapBackend::with_buffer(&mut self.buffer, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        if land.is_some() {
            let (r, g, b) = settings::OCEAN_COLOR;
            let ocean = RGBColor(r, g, b);
            root.draw(&Rectangle::new(
                [(map.x, map.y), (map.right() - 1, map.bottom() - 1)],
                ocean.filled(),
            ))
            .map_err(draw_err)?;

            for (exterior, holes) in areas {
                root.draw(&Polygon::new(exterior, WHITE.filled()))
                    .map_err(draw_err)?;
                for hole in holes {
                    root.draw(&Polygon::new(hole, ocean.filled()))
                        .map_err(draw_err)?;
                }
            }
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Pseudocolor mesh of `grid`, whose rows follow `lat` and columns `lon`.
    pub fn draw_mesh(&mut self, lat: &[f64], lon: &[f64], grid: &MaskedGrid, scale: &ColorScale) {
        mesh::rasterize(
            &mut self.buffer,
            self.size.0,
            self.layout.map,
            &self.extent,
            lat,
            lon,
            grid,
            scale,
        );
    }

    /// Strokes the polylines of `layer`, already clipped to the map extent.
    pub fn draw_lines(&mut self, layer: &Layer, width_px: u32) -> Result<()> {
        let lines: Vec<Vec<(i32, i32)>> = layer
            .lines
            .iter()
            .map(|line| line.iter().map(|&p| self.project(p)).collect())
            .collect();

        let root = BitMapBackend::with_buffer(&mut self.buffer, self.size).into_drawing_area();
        let style = BLACK.stroke_width(width_px.max(1));

        for line in lines {
            root.draw(&PathElement::new(line, style)).map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Black border around the map axes.
    pub fn draw_frame(&mut self) -> Result<()> {
        let map = self.layout.map;
        let root = BitMapBackend::with_buffer(&mut self.buffer, self.size).into_drawing_area();

        for inset in 0..FRAME_WIDTH_PX {
            let inset = inset as i32;
            root.draw(&Rectangle::new(
                [
                    (map.x + inset, map.y + inset),
                    (map.right() - 1 - inset, map.bottom() - 1 - inset),
                ],
                BLACK.stroke_width(1),
            ))
            .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }

    pub fn draw_title(&mut self, title: &str) -> Result<()> {
        let anchor = self.layout.title_anchor;
        let root = BitMapBackend::with_buffer(&mut self.buffer, self.size).into_drawing_area();
        let style = (FONT, TITLE_FONT_PX)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));

        root.draw(&Text::new(title, anchor, style)).map_err(draw_err)?;
        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Text in a translucent white box, anchored bottom-left at an axes
    /// fraction of the map.
    pub fn draw_annotation(&mut self, text: &str, at: (f64, f64)) -> Result<()> {
        let (x, y) = self.layout.map.at_fraction(at.0, at.1);
        let pad = (ANNOTATION_FONT_PX / 2) as i32;

        let root = BitMapBackend::with_buffer(&mut self.buffer, self.size).into_drawing_area();
        let style = (FONT, ANNOTATION_FONT_PX)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Bottom));
        let (w, h) = root.estimate_text_size(text, &style).map_err(draw_err)?;

        let corners = [(x - pad, y - h as i32 - pad), (x + w as i32 + pad, y + pad)];
        root.draw(&Rectangle::new(corners, WHITE.mix(0.7).filled()))
            .map_err(draw_err)?;
        root.draw(&Rectangle::new(corners, BLACK.stroke_width(2)))
            .map_err(draw_err)?;
        root.draw(&Text::new(text, (x, y), style)).map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Horizontal colorbar under the map with ticks every `step` and a label.
    pub fn draw_colorbar(&mut self, scale: &ColorScale, step: f64, label: &str) -> Result<()> {
        let bar = self.layout.colorbar;
        fill_gradient(&mut self.buffer, self.size.0, bar, scale);

        let ticks: Vec<(i32, String)> = scale
            .ticks(step)
            .into_iter()
            .map(|value| {
                let x = bar.x + (scale.normalize(value) * bar.width as f64).round() as i32;
                (x.min(bar.right() - 1), format!("{:.0}", value))
            })
            .collect();

        let root = BitMapBackend::with_buffer(&mut self.buffer, self.size).into_drawing_area();
        root.draw(&Rectangle::new(
            [(bar.x, bar.y), (bar.right() - 1, bar.bottom() - 1)],
            BLACK.stroke_width(2),
        ))
        .map_err(draw_err)?;

        let tick_style = (FONT, TICK_FONT_PX)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        let label_top = bar.bottom() + TICK_LENGTH_PX + 5;
        for (x, text) in &ticks {
            root.draw(&PathElement::new(
                vec![(*x, bar.bottom()), (*x, bar.bottom() + TICK_LENGTH_PX)],
                BLACK.stroke_width(2),
            ))
            .map_err(draw_err)?;
            root.draw(&Text::new(text.as_str(), (*x, label_top), tick_style.clone()))
                .map_err(draw_err)?;
        }

        let label_y = label_top + TICK_FONT_PX as i32 + 15;
        root.draw(&Text::new(label, (bar.x + bar.width as i32 / 2, label_y), tick_style))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    /// Encodes the figure as PNG and writes it atomically, replacing `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = png::encode_rgb(&self.buffer, self.size.0, self.size.1, self.dpi)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temporary file in `{}`", dir.display()))?;
        file.write_all(&bytes)?;
        file.persist(path)
            .with_context(|| format!("failed to write `{}`", path.display()))?;

        Ok(())
    }
}

/// Left-to-right sweep of `scale` across `rect`.
fn fill_gradient(buffer: &mut [u8], canvas_width: u32, rect: Rect, scale: &ColorScale) {
    let stride = canvas_width as usize * 3;
    for px in 0..rect.width {
        let t = (px as f64 + 0.5) / rect.width as f64;
        let color = scale.cmap.sample(t);
        let x = rect.x + px as i32;
        if x < 0 || x as u32 >= canvas_width {
            continue;
        }
        for y in rect.y.max(0)..rect.bottom() {
            let offset = y as usize * stride + x as usize * 3;
            if let Some(pixel) = buffer.get_mut(offset..offset + 3) {
                pixel.copy_from_slice(&[color.0, color.1, color.2]);
            }
        }
    }
}

/// Draws the complete climatology map: basemap, mesh, overlay lines, frame,
/// title, annotation and colorbar.
pub fn draw_climatology(
    extent: Extent,
    lat: &[f64],
    lon: &[f64],
    grid: &MaskedGrid,
    overlays: &Overlays,
    title: &str,
) -> Result<Figure> {
    let scale = ColorScale::new(colormap::BRBG, settings::COLOR_MIN, settings::COLOR_MAX);
    let line_width = settings::points_to_pixels(settings::LINE_WIDTH_PT).round() as u32;

    let mut figure = Figure::new(extent);
    figure.draw_basemap(overlays.land.as_ref())?;
    figure.draw_mesh(lat, lon, grid, &scale);
    for layer in &overlays.lines {
        figure.draw_lines(layer, line_width)?;
    }
    figure.draw_frame()?;
    figure.draw_title(title)?;
    figure.draw_annotation(&format!("Data Source: {}", settings::DATA_SOURCE), (0.05, 0.08))?;
    figure.draw_colorbar(&scale, settings::COLOR_TICK_STEP, settings::COLORBAR_LABEL)?;

    Ok(figure)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use ndarray::array;
    use tempfile::TempDir;

    use super::*;
    use crate::climatology::mask_non_positive;
    use crate::render::overlay::Area;

    fn extent() -> Extent {
        Extent {
            lon_min: -120.0,
            lon_max: -100.0,
            lat_min: 30.0,
            lat_max: 40.0,
        }
    }

    fn small_figure() -> Figure {
        Figure::with_size((300, 180), 30, extent())
    }

    fn land() -> Layer {
        Layer {
            lines: Vec::new(),
            areas: vec![Area {
                exterior: vec![(-120.0, 30.0), (-110.0, 30.0), (-110.0, 40.0), (-120.0, 40.0)],
                holes: Vec::new(),
            }],
        }
    }

    fn pixel(figure: &Figure, x: u32, y: u32) -> (u8, u8, u8) {
        let offset = (y as usize * figure.size.0 as usize + x as usize) * 3;
        (
            figure.buffer[offset],
            figure.buffer[offset + 1],
            figure.buffer[offset + 2],
        )
    }

    fn centre(rect: &Rect) -> (u32, u32) {
        ((rect.x + rect.width as i32 / 2) as u32, (rect.y + rect.height as i32 / 2) as u32)
    }

    #[test]
    fn should_fill_ocean_and_land() {
        let mut figure = small_figure();
        figure.draw_basemap(Some(&land())).unwrap();
        let map = figure.layout.map;

        // West half is land, east half ocean.
        let west = map.at_fraction(0.25, 0.5);
        let east = map.at_fraction(0.75, 0.5);
        assert_eq!(pixel(&figure, west.0 as u32, west.1 as u32), (255, 255, 255));
        assert_eq!(pixel(&figure, east.0 as u32, east.1 as u32), settings::OCEAN_COLOR);
        assert_eq!(pixel(&figure, 0, 0), (255, 255, 255));
    }

    #[test]
    fn should_leave_map_white_without_land_layer() {
        let mut figure = small_figure();
        figure.draw_basemap(None).unwrap();
        let (x, y) = centre(&figure.layout.map);

        assert_eq!(pixel(&figure, x, y), (255, 255, 255));
    }

    #[test]
    fn should_show_ocean_through_land_holes() {
        let mut figure = small_figure();
        let mut layer = land();
        layer.areas[0].holes = vec![vec![(-118.0, 32.0), (-112.0, 32.0), (-112.0, 38.0), (-118.0, 38.0)]];

        figure.draw_basemap(Some(&layer)).unwrap();

        let (x, y) = figure.project((-115.0, 35.0));
        assert_eq!(pixel(&figure, x as u32, y as u32), settings::OCEAN_COLOR);
        let (x, y) = figure.project((-119.0, 39.0));
        assert_eq!(pixel(&figure, x as u32, y as u32), (255, 255, 255));
    }

    #[test]
    fn should_show_basemap_through_excluded_cells() {
        let mut figure = small_figure();
        figure.draw_basemap(Some(&land())).unwrap();
        let scale = ColorScale::new(colormap::BRBG, 0.0, 2000.0);
        let grid = mask_non_positive(&array![[2000.0, 0.0]]);

        figure.draw_mesh(&[35.0], &[-115.0, -105.0], &grid, &scale);
        let map = figure.layout.map;

        let west = map.at_fraction(0.25, 0.5);
        let east = map.at_fraction(0.75, 0.5);
        assert_eq!(pixel(&figure, west.0 as u32, west.1 as u32), (0x00, 0x3c, 0x30));
        assert_eq!(pixel(&figure, east.0 as u32, east.1 as u32), settings::OCEAN_COLOR);
    }

    #[test]
    fn should_draw_frame_and_lines() {
        let mut figure = small_figure();
        figure.draw_basemap(None).unwrap();
        let layer = Layer {
            lines: vec![vec![(-120.0, 35.0), (-100.0, 35.0)]],
            areas: Vec::new(),
        };

        figure.draw_lines(&layer, 1).unwrap();
        figure.draw_frame().unwrap();
        let map = figure.layout.map;

        assert_eq!(pixel(&figure, map.x as u32, map.y as u32), (0, 0, 0));
        let (x, y) = figure.project((-110.0, 35.0));
        assert_eq!(pixel(&figure, x as u32, y as u32), (0, 0, 0));
    }

    #[test]
    fn should_sweep_colorbar_gradient() {
        let mut figure = small_figure();
        let bar = figure.layout.colorbar;
        let scale = ColorScale::new(colormap::BRBG, 0.0, 2000.0);

        fill_gradient(&mut figure.buffer, figure.size.0, bar, &scale);

        let mid_y = (bar.y + bar.height as i32 / 2) as u32;
        let first = pixel(&figure, bar.x as u32, mid_y);
        let last = pixel(&figure, bar.right() as u32 - 1, mid_y);
        assert!(first.0 > 0x50 && first.2 < 0x10);
        assert!(last.0 < 0x05 && last.1 > 0x38);
    }

    #[test]
    fn should_save_png_atomically() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("map.png");
        std::fs::write(&path, b"stale").unwrap();

        small_figure().save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    fn is_dark((r, g, b): (u8, u8, u8)) -> bool {
        r < 64 && g < 64 && b < 64
    }

    fn any_dark(figure: &Figure, xs: std::ops::Range<i32>, ys: std::ops::Range<i32>) -> bool {
        ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
            .any(|(x, y)| is_dark(pixel(figure, x as u32, y as u32)))
    }

    #[test]
    fn should_draw_title_annotation_and_colorbar() {
        let grid = mask_non_positive(&array![[500.0, 1500.0], [0.0, 250.0]]);
        let figure = draw_climatology(
            extent(),
            &[37.5, 32.5],
            &[-115.0, -105.0],
            &grid,
            &Overlays::default(),
            "Annual Precipitation Climatology",
        )
        .unwrap();
        let map = figure.layout.map;
        let bar = figure.layout.colorbar;

        // Title band above the axes.
        assert!(any_dark(&figure, 0..figure.size.0 as i32, 0..map.y - FRAME_WIDTH_PX as i32));

        // Annotation text just above and right of its anchor.
        let (x, y) = map.at_fraction(0.05, 0.08);
        assert!(any_dark(&figure, x..x + 200, y - ANNOTATION_FONT_PX as i32..y));

        // A tick mark under every multiple of the tick step.
        let scale = ColorScale::new(colormap::BRBG, settings::COLOR_MIN, settings::COLOR_MAX);
        let ticks = scale.ticks(settings::COLOR_TICK_STEP);
        assert_eq!(ticks.len(), 9);
        let tick_y = bar.bottom() + TICK_LENGTH_PX / 2;
        for value in ticks {
            let tick_x = bar.x + (scale.normalize(value) * bar.width as f64).round() as i32;
            let tick_x = tick_x.min(bar.right() - 1);
            assert!(any_dark(&figure, tick_x - 1..tick_x + 2, tick_y..tick_y + 1), "tick {}", value);
        }

        // Axis label under the tick labels.
        let label_top = bar.bottom() + TICK_LENGTH_PX + 5 + TICK_FONT_PX as i32 + 15;
        let centre = bar.x + bar.width as i32 / 2;
        assert!(any_dark(
            &figure,
            centre - 200..centre + 200,
            label_top..label_top + TICK_FONT_PX as i32
        ));
    }

    #[test]
    fn should_tag_saved_png_with_resolution() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("map.png");

        Figure::with_size((300, 180), settings::DPI, extent())
            .save(&path)
            .unwrap();

        let chunks = png::test::chunks(&std::fs::read(&path).unwrap());
        let (_, phys) = chunks.iter().find(|(kind, _)| kind == b"pHYs").unwrap();
        assert_eq!(&phys[0..4], &11811u32.to_be_bytes());
        assert_eq!(&phys[4..8], &11811u32.to_be_bytes());
        assert_eq!(phys[8], 1);
    }

    #[test]
    fn should_fail_to_save_into_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("map.png");

        assert!(small_figure().save(&path).is_err());
        assert!(!path.exists());
    }
}
