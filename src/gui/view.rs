use super::icon::IconCache;
use super::theme::ThemeColors;
use super::{
    ENTERING_LEVEL_ALPHA, ENTERING_LEVEL_SCALE, EXITING_LEVEL_ALPHA, EXITING_LEVEL_SCALE,
    GLYPH_LINE_WIDTH, ICON_SIZE, INERT_LEVEL_ALPHA, INERT_LEVEL_SCALE,
};
use crate::menu::{Level, LevelPhase, Menu, Point, SectorLayout, polar_to_cartesian};
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use std::f64::consts::PI;

/// Maps the logical ring space (origin at the menu center) onto the drawing
/// area: logical radius * scale = on-screen radius.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub center: Point,
    pub scale: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, size: f64, radius: f64) -> Self {
        Self {
            center: Point::new(width / 2.0, height / 2.0),
            scale: size / (2.0 * radius),
        }
    }

    pub fn to_logical(&self, x: f64, y: f64) -> Point {
        Point::new(
            (x - self.center.x) / self.scale,
            (y - self.center.y) / self.scale,
        )
    }
}

/// cairo measures arcs from +X counter-clockwise-in-math-coords; the menu
/// measures from +Y clockwise. Same points, shifted and mirrored.
fn cairo_angle(deg: f64) -> f64 {
    PI / 2.0 - deg.to_radians()
}

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

pub fn draw(
    cr: &Context,
    menu: &Menu,
    icons: &mut IconCache,
    colors: &ThemeColors,
    viewport: &Viewport,
) -> Result<(), cairo::Error> {
    cr.save()?;
    cr.translate(viewport.center.x, viewport.center.y);
    cr.scale(viewport.scale, viewport.scale);

    for level in menu.levels() {
        LevelRenderer::new(level, colors, icons).draw(cr)?;
    }

    if let Some(top) = menu.interactive() {
        let at_root = menu.interactive_index() == Some(0);
        draw_center_disk(cr, top.layout(), colors, at_root)?;
    }

    cr.restore()
}

struct LevelRenderer<'a> {
    level: &'a Level,
    colors: &'a ThemeColors,
    icons: &'a mut IconCache,
}

impl<'a> LevelRenderer<'a> {
    fn new(level: &'a Level, colors: &'a ThemeColors, icons: &'a mut IconCache) -> Self {
        Self {
            level,
            colors,
            icons,
        }
    }

    /// Receded/faded treatment standing in for the in-flight visual states:
    /// inert parents sit enlarged behind the active ring, entering and
    /// exiting levels are shrunk.
    fn phase_treatment(&self) -> (f64, f64) {
        match self.level.phase() {
            LevelPhase::Active => (1.0, 1.0),
            LevelPhase::Entering => (ENTERING_LEVEL_SCALE, ENTERING_LEVEL_ALPHA),
            LevelPhase::Inert => (INERT_LEVEL_SCALE, INERT_LEVEL_ALPHA),
            LevelPhase::Deactivating => (EXITING_LEVEL_SCALE, EXITING_LEVEL_ALPHA),
        }
    }

    fn draw(&mut self, cr: &Context) -> Result<(), cairo::Error> {
        let (scale, alpha) = self.phase_treatment();

        cr.save()?;
        cr.scale(scale, scale);

        if alpha < 1.0 {
            cr.push_group();
            self.draw_ring(cr)?;
            cr.pop_group_to_source()?;
            cr.paint_with_alpha(alpha)?;
        } else {
            self.draw_ring(cr)?;
        }

        cr.restore()
    }

    fn draw_ring(&mut self, cr: &Context) -> Result<(), cairo::Error> {
        let layout = self.level.layout();
        for wedge in 0..layout.sector_count() {
            self.draw_wedge(cr, wedge)?;
        }
        Ok(())
    }

    fn draw_wedge(&mut self, cr: &Context, wedge: usize) -> Result<(), cairo::Error> {
        let layout = self.level.layout();
        let item_index = layout.item_index(wedge);
        let selected = item_index.is_some() && item_index == self.level.selected();

        let color = match item_index {
            None => self.colors.dummy,
            Some(_) if selected => self.colors.selected,
            Some(_) => self.colors.wedge,
        };

        // full-width wedge path, shrunk around its centroid to fake the gap
        let centroid = layout.sector_center(wedge);
        cr.save()?;
        cr.translate(centroid.x, centroid.y);
        cr.scale(layout.content_scale(), layout.content_scale());
        cr.translate(-centroid.x, -centroid.y);

        set_source(cr, color);
        wedge_path(cr, layout, wedge);
        cr.fill()?;

        if let Some(index) = item_index
            && let Some(item) = self.level.items().get(index)
        {
            let pixbuf = item.icon.as_ref().and_then(|name| self.icons.get(name));
            match pixbuf {
                Some(pixbuf) => self.draw_icon(cr, &pixbuf, centroid)?,
                None => self.draw_label(cr, item.label(), centroid)?,
            }
        }

        cr.restore()
    }

    fn draw_icon(&self, cr: &Context, pixbuf: &Pixbuf, at: Point) -> Result<(), cairo::Error> {
        let layout = self.level.layout();
        // fit the icon to the radial thickness of the ring
        let side = (layout.radius() - layout.inner_radius()) * 0.55;
        let icon_scale = side / ICON_SIZE as f64;
        let (iw, ih) = (
            pixbuf.width() as f64 * icon_scale,
            pixbuf.height() as f64 * icon_scale,
        );

        cr.save()?;
        cr.translate(at.x - iw / 2.0, at.y - ih / 2.0);
        cr.scale(icon_scale, icon_scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint()?;
        cr.restore()
    }

    fn draw_label(&self, cr: &Context, text: &str, at: Point) -> Result<(), cairo::Error> {
        set_source(cr, self.colors.label);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(self.level.layout().radius() * 0.12);
        if let Ok(ext) = cr.text_extents(text) {
            cr.move_to(at.x - ext.width() / 2.0, at.y + ext.height() / 2.0);
            cr.show_text(text)?;
        }
        Ok(())
    }
}

/// Annular sector between the wedge's boundary angles, inner to outer radius.
fn wedge_path(cr: &Context, layout: &SectorLayout, wedge: usize) {
    let (start, end) = layout.span(wedge);
    let inner = layout.inner_radius();
    let outer = layout.radius();

    let inner_start = polar_to_cartesian(start, inner);
    let outer_start = polar_to_cartesian(start, outer);
    let inner_end = polar_to_cartesian(end, inner);

    cr.new_path();
    cr.move_to(inner_start.x, inner_start.y);
    cr.line_to(outer_start.x, outer_start.y);
    // clockwise in menu angles is a negative sweep in cairo angles
    cr.arc_negative(0.0, 0.0, outer, cairo_angle(start), cairo_angle(end));
    cr.line_to(inner_end.x, inner_end.y);
    cr.arc(0.0, 0.0, inner, cairo_angle(end), cairo_angle(start));
    cr.close_path();
}

/// Fixed center disk: close glyph at the root level, return glyph on any
/// nested level.
fn draw_center_disk(
    cr: &Context,
    layout: &SectorLayout,
    colors: &ThemeColors,
    at_root: bool,
) -> Result<(), cairo::Error> {
    let radius = layout.center_radius();

    set_source(cr, colors.center);
    cr.arc(0.0, 0.0, radius, 0.0, 2.0 * PI);
    cr.fill()?;

    set_source(cr, colors.glyph);
    cr.set_line_width(GLYPH_LINE_WIDTH);
    let g = radius * 0.4;
    if at_root {
        // close: diagonal cross
        cr.move_to(-g, -g);
        cr.line_to(g, g);
        cr.move_to(g, -g);
        cr.line_to(-g, g);
    } else {
        // return: left-pointing chevron
        cr.move_to(g * 0.5, -g);
        cr.line_to(-g * 0.5, 0.0);
        cr.line_to(g * 0.5, g);
    }
    cr.stroke()
}
