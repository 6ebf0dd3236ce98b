//! The editor core: one object owning the surface, history, style, and the
//! active tool session, driven entirely by [`InputEvent`]s.
//!
//! Collaborators (notifier, text provider) are injected so the whole editor
//! runs headlessly in tests against an in-memory surface. The GUI shell is a
//! thin translator from egui input to these events.

use ab_glyph::FontArc;
use egui::Pos2;

use crate::canvas::{SelectionRect, Snapshot, Surface};
use crate::color::StyleState;
use crate::error::ImportError;
use crate::history::History;
use crate::input::{Command, InputEvent};
use crate::notify::{NoTextProvider, NoticeLevel, Notifier, NullNotifier, TextProvider};
use crate::ops::{fill, shapes, text};
use crate::tools::{airbrush_offsets, Session, Tool};
use crate::{log_info, log_warn};

const ZOOM_STEP: f32 = 1.2;
const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 10.0;

/// A completed selection: the rectangle plus the pixels as they were before
/// the marquee was painted over them. The marquee itself is never committed.
struct Selection {
    rect: SelectionRect,
    backdrop: Snapshot,
}

pub struct Editor {
    surface: Surface,
    history: History,
    tool: Tool,
    session: Session,
    pub style: StyleState,
    selection: Option<Selection>,
    zoom: f32,
    notifier: Box<dyn Notifier>,
    text_input: Box<dyn TextProvider>,
    font: Option<FontArc>,
    dirty: bool,
}

impl Editor {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_collaborators(width, height, Box::new(NullNotifier), Box::new(NoTextProvider))
    }

    pub fn with_collaborators(
        width: u32,
        height: u32,
        notifier: Box<dyn Notifier>,
        text_input: Box<dyn TextProvider>,
    ) -> Self {
        let style = StyleState::default();
        let surface = Surface::new(width, height, style.background());
        let mut history = History::new();
        history.reset(surface.snapshot());
        Self {
            surface,
            history,
            tool: Tool::default(),
            session: Session::Idle,
            style,
            selection: None,
            zoom: 1.0,
            notifier,
            text_input,
            font: None,
            dirty: true,
        }
    }

    // ---- Accessors ---------------------------------------------------------

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn selection_rect(&self) -> Option<SelectionRect> {
        self.selection.as_ref().map(|s| s.rect)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn airbrush_active(&self) -> bool {
        matches!(self.session, Session::AirbrushSpraying { .. })
    }

    /// True once since the last call if the surface changed and the shell
    /// should re-upload its texture.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // ---- Event dispatch ----------------------------------------------------

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { pos } => self.pointer_down(pos),
            InputEvent::PointerMove { pos } => self.pointer_move(pos),
            InputEvent::PointerUp { pos } => self.pointer_up(pos),
            InputEvent::AirbrushTick => self.airbrush_tick(),
            InputEvent::Command(cmd) => self.command(cmd),
        }
    }

    fn pointer_down(&mut self, pos: Pos2) {
        match self.tool {
            Tool::Pencil | Tool::Brush | Tool::Eraser => {
                self.freehand_stroke(pos, pos);
                self.session = Session::Freehand { last: pos };
            }
            Tool::Line | Tool::Rectangle | Tool::Circle | Tool::RoundedRect => {
                self.session = Session::ShapeDrag {
                    anchor: pos,
                    last: pos,
                    snapshot: self.surface.snapshot(),
                };
            }
            Tool::Select => {
                self.cancel_selection();
                self.session = Session::SelectionDrag {
                    anchor: pos,
                    last: pos,
                    snapshot: self.surface.snapshot(),
                };
            }
            Tool::Curve => {
                self.session = Session::CurveBuilding {
                    points: vec![pos],
                    snapshot: self.surface.snapshot(),
                };
            }
            Tool::Polygon => self.polygon_click(pos),
            Tool::Airbrush => {
                self.session = Session::AirbrushSpraying { last: pos, ticks: 0 };
            }
            Tool::Fill => self.fill_at(pos),
            Tool::Pick => self.pick_at(pos),
            Tool::Text => self.stamp_text_at(pos),
        }
    }

    fn pointer_move(&mut self, pos: Pos2) {
        match &mut self.session {
            Session::Idle => {}
            Session::Freehand { last } => {
                let from = *last;
                *last = pos;
                self.freehand_stroke(from, pos);
            }
            Session::ShapeDrag { anchor, last, snapshot } => {
                let anchor = *anchor;
                *last = pos;
                let snapshot = snapshot.clone();
                self.surface.restore(&snapshot);
                self.render_shape(anchor, pos);
                self.dirty = true;
            }
            Session::SelectionDrag { anchor, last, snapshot } => {
                let anchor = *anchor;
                *last = pos;
                let snapshot = snapshot.clone();
                self.surface.restore(&snapshot);
                shapes::stroke_marquee(&mut self.surface, anchor, pos);
                self.dirty = true;
            }
            Session::CurveBuilding { points, snapshot } => {
                points.push(pos);
                let pts = points.clone();
                let snapshot = snapshot.clone();
                self.surface.restore(&snapshot);
                shapes::stroke_curve(&mut self.surface, &pts, self.style.brush_size as f32, self.style.color());
                self.dirty = true;
            }
            Session::PolygonBuilding { points, snapshot } => {
                let mut pts = points.clone();
                pts.push(pos);
                let snapshot = snapshot.clone();
                self.surface.restore(&snapshot);
                shapes::polygon_preview(&mut self.surface, &pts, self.style.brush_size as f32, self.style.color());
                self.dirty = true;
            }
            Session::AirbrushSpraying { last, .. } => {
                *last = pos;
            }
        }
    }

    fn pointer_up(&mut self, pos: Pos2) {
        match std::mem::take(&mut self.session) {
            Session::Idle => {}
            Session::Freehand { last } => {
                self.freehand_stroke(last, pos);
                self.commit();
            }
            Session::ShapeDrag { anchor, snapshot, .. } => {
                self.surface.restore(&snapshot);
                self.render_shape(anchor, pos);
                self.commit();
            }
            Session::SelectionDrag { anchor, snapshot, .. } => {
                self.surface.restore(&snapshot);
                let rect = SelectionRect::from_drag(anchor, pos, self.surface.width(), self.surface.height());
                if rect.is_empty() {
                    self.dirty = true;
                    return;
                }
                // Paint the marquee over the clean pixels; the clean state is
                // kept as the backdrop so clear/cancel can restore it.
                shapes::stroke_marquee(&mut self.surface, anchor, pos);
                self.selection = Some(Selection { rect, backdrop: snapshot });
                self.dirty = true;
            }
            Session::CurveBuilding { mut points, snapshot } => {
                points.push(pos);
                self.surface.restore(&snapshot);
                shapes::stroke_curve(&mut self.surface, &points, self.style.brush_size as f32, self.style.color());
                self.commit();
            }
            // Polygon vertices are placed on pointer-down; release is inert.
            polygon @ Session::PolygonBuilding { .. } => self.session = polygon,
            Session::AirbrushSpraying { .. } => {
                self.commit();
            }
        }
    }

    fn airbrush_tick(&mut self) {
        if let Session::AirbrushSpraying { last, ticks } = &mut self.session {
            let center = *last;
            let tick = *ticks;
            *ticks += 1;
            let color = self.style.color();
            for (dx, dy) in airbrush_offsets(self.style.brush_size, tick) {
                let x = (center.x + dx).round();
                let y = (center.y + dy).round();
                if x >= 0.0 && y >= 0.0 {
                    self.surface
                        .put_pixel(x as u32, y as u32, image::Rgba([color[0], color[1], color[2], 255]));
                }
            }
            self.dirty = true;
        }
    }

    // ---- Single-click tools ------------------------------------------------

    fn fill_at(&mut self, pos: Pos2) {
        if pos.x < 0.0 || pos.y < 0.0 {
            return;
        }
        let (w, h) = (self.surface.width(), self.surface.height());
        let mut raw = self.surface.to_raw_vec();
        if fill::flood_fill(&mut raw, w, h, pos.x as u32, pos.y as u32, self.style.color()) {
            self.surface.write_raw(&raw);
            self.commit();
        }
    }

    fn pick_at(&mut self, pos: Pos2) {
        if pos.x < 0.0 || pos.y < 0.0 {
            return;
        }
        if let Some(pixel) = self.surface.get_pixel(pos.x as u32, pos.y as u32) {
            // Erased pixels keep stale RGB behind alpha 0; never pick those.
            if pixel[3] == 0 {
                return;
            }
            self.style.set_color_rgb([pixel[0], pixel[1], pixel[2]]);
            self.notifier
                .notify(NoticeLevel::Info, &format!("Picked {}", self.style.color_hex()));
        }
    }

    fn stamp_text_at(&mut self, pos: Pos2) {
        let Some(entered) = self.text_input.request_text() else {
            return;
        };
        if entered.is_empty() {
            return;
        }
        if self.font.is_none() {
            self.font = text::default_font();
        }
        let Some(font) = self.font.clone() else {
            self.notifier.notify(NoticeLevel::Error, "No font available for text");
            return;
        };
        let size = text::text_px(self.style.brush_size);
        text::stamp_text(&mut self.surface, &font, &entered, size, pos, self.style.color());
        self.commit();
    }

    // ---- Commands ----------------------------------------------------------

    fn command(&mut self, cmd: Command) {
        match cmd {
            // File dialogs live in the shell; it intercepts Open/Save before
            // events reach the editor.
            Command::Open | Command::Save => {}
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::SelectAll => self.select_all(),
            Command::ClearSelection => self.clear_selection(),
            Command::CancelSelection => self.cancel(),
            Command::ZoomIn => self.set_zoom(self.zoom * ZOOM_STEP),
            Command::ZoomOut => self.set_zoom(self.zoom / ZOOM_STEP),
            Command::ZoomReset => self.set_zoom(1.0),
            Command::SetBrushSize(size) => self.style.brush_size = size.max(1),
            Command::SetTool(tool) => self.set_tool(tool),
        }
    }

    pub fn undo(&mut self) {
        self.abort_session();
        // The marquee is never committed: wipe it off the surface before the
        // history restore, so an undo that cannot move leaves no ghost.
        self.cancel_selection();
        if let Some(snapshot) = self.history.undo().cloned() {
            self.surface.restore(&snapshot);
            self.dirty = true;
        }
    }

    pub fn redo(&mut self) {
        self.abort_session();
        self.cancel_selection();
        if let Some(snapshot) = self.history.redo().cloned() {
            self.surface.restore(&snapshot);
            self.dirty = true;
        }
    }

    fn select_all(&mut self) {
        self.cancel_selection();
        let backdrop = self.surface.snapshot();
        let (w, h) = (self.surface.width(), self.surface.height());
        let rect = SelectionRect::full(w, h);
        shapes::stroke_marquee(
            &mut self.surface,
            Pos2::new(0.0, 0.0),
            Pos2::new(w as f32, h as f32),
        );
        self.selection = Some(Selection { rect, backdrop });
        self.dirty = true;
    }

    /// Delete/Backspace: clear the selected pixels to transparent and commit.
    fn clear_selection(&mut self) {
        if let Some(selection) = self.selection.take() {
            self.surface.restore(&selection.backdrop);
            self.surface.clear_rect(selection.rect);
            self.commit();
        }
    }

    /// Escape: abort whatever is in flight without committing.
    fn cancel(&mut self) {
        self.abort_session();
        self.cancel_selection();
    }

    fn cancel_selection(&mut self) {
        if let Some(selection) = self.selection.take() {
            self.surface.restore(&selection.backdrop);
            self.dirty = true;
        }
    }

    fn drop_selection(&mut self) {
        self.selection = None;
    }

    fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let percent = (self.zoom * 100.0).round() as i32;
        self.notifier
            .notify(NoticeLevel::Info, &format!("Zoom: {percent}%"));
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if tool != self.tool {
            self.finish_session_for_tool_switch();
            self.tool = tool;
            if let Some(size) = tool.default_brush_size() {
                self.style.brush_size = size;
            }
            log_info!("Tool: {}", tool.label());
        }
    }

    /// Tool switches must not leave orphaned session state. Freehand and
    /// airbrush ink is already on the surface, so it is committed; preview
    /// sessions (shape, selection, curve, unfinished polygon) are discarded.
    fn finish_session_for_tool_switch(&mut self) {
        match std::mem::take(&mut self.session) {
            Session::Idle => {}
            Session::Freehand { .. } | Session::AirbrushSpraying { .. } => self.commit(),
            Session::ShapeDrag { snapshot, .. }
            | Session::SelectionDrag { snapshot, .. }
            | Session::CurveBuilding { snapshot, .. }
            | Session::PolygonBuilding { snapshot, .. } => {
                self.surface.restore(&snapshot);
                self.dirty = true;
            }
        }
    }

    /// Roll back any in-flight preview session; commit nothing.
    fn abort_session(&mut self) {
        match std::mem::take(&mut self.session) {
            Session::Idle | Session::Freehand { .. } | Session::AirbrushSpraying { .. } => {}
            Session::ShapeDrag { snapshot, .. }
            | Session::SelectionDrag { snapshot, .. }
            | Session::CurveBuilding { snapshot, .. }
            | Session::PolygonBuilding { snapshot, .. } => {
                self.surface.restore(&snapshot);
                self.dirty = true;
            }
        }
    }

    // ---- Drawing helpers ---------------------------------------------------

    fn freehand_stroke(&mut self, from: Pos2, to: Pos2) {
        let width = self.style.brush_size as f32;
        match self.tool {
            Tool::Eraser => shapes::erase_segment(&mut self.surface, from, to, width * 1.5),
            _ => shapes::stroke_segment(&mut self.surface, from, to, width, self.style.color()),
        }
        self.dirty = true;
    }

    fn render_shape(&mut self, anchor: Pos2, current: Pos2) {
        let width = self.style.brush_size as f32;
        let color = self.style.color();
        match self.tool {
            Tool::Line => shapes::stroke_segment(&mut self.surface, anchor, current, width, color),
            Tool::Rectangle => shapes::stroke_rect(&mut self.surface, anchor, current, width, color),
            Tool::Circle => shapes::stroke_ellipse(&mut self.surface, anchor, current, width, color),
            Tool::RoundedRect => {
                shapes::stroke_rounded_rect(&mut self.surface, anchor, current, width, color)
            }
            _ => {}
        }
    }

    fn polygon_click(&mut self, pos: Pos2) {
        match &mut self.session {
            Session::PolygonBuilding { points, snapshot } => {
                points.push(pos);
                let pts = points.clone();
                let snapshot = snapshot.clone();
                self.surface.restore(&snapshot);
                if pts.len() >= 3 {
                    // Third vertex closes the triangle.
                    shapes::fill_stroke_triangle(
                        &mut self.surface,
                        [pts[0], pts[1], pts[2]],
                        self.style.brush_size as f32,
                        self.style.color(),
                    );
                    self.session = Session::Idle;
                    self.commit();
                } else {
                    shapes::polygon_preview(&mut self.surface, &pts, self.style.brush_size as f32, self.style.color());
                    self.dirty = true;
                }
            }
            _ => {
                self.session = Session::PolygonBuilding {
                    points: vec![pos],
                    snapshot: self.surface.snapshot(),
                };
            }
        }
    }

    fn commit(&mut self) {
        self.history.commit(self.surface.snapshot());
        self.dirty = true;
    }

    // ---- Import / export ---------------------------------------------------

    /// Load an image file, fit it onto the canvas, and restart history.
    pub fn import(&mut self, path: &std::path::Path) -> Result<(), ImportError> {
        let loaded = crate::io::load_image(path)?;
        let fitted = crate::io::fit_to_canvas(
            &loaded,
            self.surface.width(),
            self.surface.height(),
            self.style.background(),
        );
        self.session = Session::Idle;
        self.drop_selection();
        self.surface.replace(fitted);
        self.history.reset(self.surface.snapshot());
        self.dirty = true;
        log_info!("Imported {}", path.display());
        self.notifier.notify(NoticeLevel::Success, "Image imported");
        Ok(())
    }

    /// Write the surface to `path` as PNG. The marquee is transient, so a
    /// pending selection is exported as its clean backdrop pixels.
    pub fn export(&mut self, path: &std::path::Path) -> Result<(), crate::error::ExportError> {
        let result = match &self.selection {
            Some(selection) => crate::io::export_png(path, selection.backdrop.image()),
            None => crate::io::export_png(path, self.surface.image()),
        };
        match &result {
            Ok(()) => self.notifier.notify(NoticeLevel::Success, "Drawing saved"),
            Err(err) => {
                log_warn!("Export failed: {err}");
                self.notifier.notify(NoticeLevel::Error, &format!("Save failed: {err}"));
            }
        }
        result
    }

    /// Forward an import failure to the user without touching any state.
    pub fn report_import_error(&mut self, err: &ImportError) {
        log_warn!("Import failed: {err}");
        self.notifier.notify(NoticeLevel::Error, &format!("Import failed: {err}"));
    }
}
