// ============================================================================
// Paintr GUI shell — translates egui input into editor events
// ============================================================================
//
// The shell owns no drawing logic: it uploads the surface as a texture, maps
// pointer positions into canvas pixels (dividing by the zoom factor), routes
// keyboard shortcuts, runs the file dialogs, and pumps the airbrush timer.
// Everything that mutates pixels lives in `editor`.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use eframe::egui;
use egui::{ColorImage, Pos2, TextureHandle, TextureOptions};

use crate::editor::Editor;
use crate::input::{shortcut_command, Command, InputEvent};
use crate::io::EXPORT_FILE_NAME;
use crate::notify::{NoticeLevel, Notifier, SharedTextInput};
use crate::tools::{Tool, AIRBRUSH_TICK_MS};
use crate::{log_err, log_info};

const CANVAS_WIDTH: u32 = 800;
const CANVAS_HEIGHT: u32 = 600;
const TOAST_LIFETIME: Duration = Duration::from_millis(2500);

/// Color swatch palette shown in the toolbar.
const PALETTE: [[u8; 3]; 10] = [
    [0x00, 0x00, 0x00],
    [0xFF, 0xFF, 0xFF],
    [0xCC, 0xCC, 0xCC],
    [0xFF, 0x00, 0x00],
    [0xFF, 0xA5, 0x00],
    [0xFF, 0xFF, 0x00],
    [0x00, 0x80, 0x00],
    [0x00, 0xBF, 0xFF],
    [0x00, 0x00, 0xFF],
    [0x80, 0x00, 0x80],
];

struct Toast {
    level: NoticeLevel,
    message: String,
    created: Instant,
}

/// Notifier backed by a shared toast queue the shell drains each frame.
#[derive(Clone, Default)]
struct ToastQueue(Rc<RefCell<Vec<Toast>>>);

impl Notifier for ToastQueue {
    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.0.borrow_mut().push(Toast {
            level,
            message: message.to_owned(),
            created: Instant::now(),
        });
    }
}

/// Pending text-tool prompt: where the click landed and what has been typed.
struct TextPrompt {
    pos: Pos2,
    buffer: String,
}

pub struct PaintrApp {
    editor: Editor,
    toasts: ToastQueue,
    text_input: SharedTextInput,
    texture: Option<TextureHandle>,
    hex_field: String,
    text_prompt: Option<TextPrompt>,
    pointer_was_down: bool,
    last_airbrush_tick: Instant,
}

impl PaintrApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let toasts = ToastQueue::default();
        let text_input = SharedTextInput::new();
        let editor = Editor::with_collaborators(
            CANVAS_WIDTH,
            CANVAS_HEIGHT,
            Box::new(toasts.clone()),
            Box::new(text_input.clone()),
        );
        let hex_field = editor.style.color_hex();
        Self {
            editor,
            toasts,
            text_input,
            texture: None,
            hex_field,
            text_prompt: None,
            pointer_was_down: false,
            last_airbrush_tick: Instant::now(),
        }
    }

    // ---- Commands that need the shell (file dialogs) -----------------------

    fn dispatch(&mut self, cmd: Command) {
        match cmd {
            Command::Open => self.open_dialog(),
            Command::Save => self.save_dialog(),
            other => self.editor.handle_event(InputEvent::Command(other)),
        }
    }

    fn open_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp"])
            .pick_file();
        if let Some(path) = picked {
            if let Err(err) = self.editor.import(&path) {
                self.editor.report_import_error(&err);
            }
        }
    }

    fn save_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name(EXPORT_FILE_NAME)
            .save_file();
        if let Some(path) = picked {
            if let Err(err) = self.editor.export(&path) {
                log_err!("Save to {} failed: {err}", path.display());
            } else {
                log_info!("Saved {}", path.display());
            }
        }
    }

    // ---- Input routing -----------------------------------------------------

    fn route_shortcuts(&mut self, ctx: &egui::Context) {
        // A focused text field (hex entry, text prompt) swallows all shortcuts.
        if ctx.wants_keyboard_input() {
            return;
        }
        let mut commands = Vec::new();
        ctx.input(|input| {
            for event in &input.events {
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } = event
                {
                    if let Some(cmd) = shortcut_command(*key, *modifiers) {
                        commands.push(cmd);
                    }
                }
            }
        });
        for cmd in commands {
            self.dispatch(cmd);
        }
    }

    fn route_pointer(&mut self, ctx: &egui::Context, response: &egui::Response, canvas_origin: Pos2) {
        let zoom = self.editor.zoom();
        let to_canvas = |screen: Pos2| {
            Pos2::new(
                (screen.x - canvas_origin.x) / zoom,
                (screen.y - canvas_origin.y) / zoom,
            )
        };
        let pointer_down = response.hovered()
            && ctx.input(|input| input.pointer.primary_down());
        let pos = response
            .hover_pos()
            .or_else(|| ctx.input(|input| input.pointer.latest_pos()));

        if pointer_down && !self.pointer_was_down {
            if let Some(screen) = pos {
                let canvas_pos = to_canvas(screen);
                if self.editor.tool() == Tool::Text {
                    // The prompt collects the string first; the click is
                    // replayed once the user confirms.
                    self.text_prompt = Some(TextPrompt {
                        pos: canvas_pos,
                        buffer: String::new(),
                    });
                } else {
                    self.editor.handle_event(InputEvent::PointerDown { pos: canvas_pos });
                    self.last_airbrush_tick = Instant::now();
                }
            }
        } else if pointer_down {
            if let Some(screen) = pos {
                self.editor.handle_event(InputEvent::PointerMove { pos: to_canvas(screen) });
            }
        } else if self.pointer_was_down {
            if let Some(screen) = pos {
                self.editor.handle_event(InputEvent::PointerUp { pos: to_canvas(screen) });
            }
        }
        self.pointer_was_down = pointer_down;
    }

    fn pump_airbrush(&mut self, ctx: &egui::Context) {
        if !self.editor.airbrush_active() {
            return;
        }
        let period = Duration::from_millis(AIRBRUSH_TICK_MS);
        while self.last_airbrush_tick.elapsed() >= period {
            self.editor.handle_event(InputEvent::AirbrushTick);
            self.last_airbrush_tick += period;
        }
        ctx.request_repaint_after(period);
    }

    // ---- Widgets -----------------------------------------------------------

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            for tool in Tool::ALL {
                let selected = self.editor.tool() == tool;
                if ui.selectable_label(selected, tool.label()).clicked() {
                    self.dispatch(Command::SetTool(tool));
                }
            }
        });
        ui.horizontal(|ui| {
            for rgb in PALETTE {
                let color = egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2]);
                let (rect, response) =
                    ui.allocate_exact_size(egui::vec2(18.0, 18.0), egui::Sense::click());
                ui.painter().rect_filled(rect, 2.0, color);
                if response.clicked() {
                    self.editor.style.set_color_rgb(rgb);
                    self.hex_field = self.editor.style.color_hex();
                }
            }
            ui.separator();
            let hex_edit = ui.add(
                egui::TextEdit::singleline(&mut self.hex_field).desired_width(72.0),
            );
            if hex_edit.lost_focus() {
                if self.editor.style.set_color(&self.hex_field) {
                    self.hex_field = self.editor.style.color_hex();
                } else {
                    self.toasts
                        .notify(NoticeLevel::Error, "Invalid color format");
                    self.hex_field = self.editor.style.color_hex();
                }
            }
            ui.separator();
            ui.label("Size");
            ui.add(egui::Slider::new(&mut self.editor.style.brush_size, 1..=100));
            ui.separator();
            if ui.button("−").clicked() {
                self.dispatch(Command::ZoomOut);
            }
            if ui.button("+").clicked() {
                self.dispatch(Command::ZoomIn);
            }
            ui.separator();
            ui.add_enabled_ui(self.editor.can_undo(), |ui| {
                if ui.button("Undo").clicked() {
                    self.dispatch(Command::Undo);
                }
            });
            ui.add_enabled_ui(self.editor.can_redo(), |ui| {
                if ui.button("Redo").clicked() {
                    self.dispatch(Command::Redo);
                }
            });
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if self.editor.take_dirty() || self.texture.is_none() {
            let surface = self.editor.surface();
            let color_image = ColorImage::from_rgba_unmultiplied(
                [surface.width() as usize, surface.height() as usize],
                surface.as_raw(),
            );
            match &mut self.texture {
                Some(texture) => texture.set(color_image, TextureOptions::NEAREST),
                None => {
                    self.texture =
                        Some(ctx.load_texture("canvas", color_image, TextureOptions::NEAREST));
                }
            }
        }
        // SizedTexture is plain data, so the handle borrow ends here and the
        // pointer routing below can borrow `self` mutably.
        let sized = match &self.texture {
            Some(texture) => egui::load::SizedTexture::from_handle(texture),
            None => return,
        };
        let zoom = self.editor.zoom();
        let size = egui::vec2(
            self.editor.surface().width() as f32 * zoom,
            self.editor.surface().height() as f32 * zoom,
        );
        egui::ScrollArea::both().show(ui, |ui| {
            let response = ui.add(
                egui::Image::from_texture(sized)
                    .fit_to_exact_size(size)
                    .sense(egui::Sense::click_and_drag()),
            );
            let origin = response.rect.min;
            self.route_pointer(ctx, &response, origin);
        });
    }

    fn text_prompt_window(&mut self, ctx: &egui::Context) {
        let Some(prompt) = &mut self.text_prompt else {
            return;
        };
        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("Enter text")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                let edit = ui.text_edit_singleline(&mut prompt.buffer);
                edit.request_focus();
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked()
                        || ui.input(|input| input.key_pressed(egui::Key::Enter))
                    {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked()
                        || ui.input(|input| input.key_pressed(egui::Key::Escape))
                    {
                        cancelled = true;
                    }
                });
            });
        if confirmed {
            let prompt = self.text_prompt.take().unwrap();
            if !prompt.buffer.is_empty() {
                self.text_input.put(prompt.buffer);
                self.editor
                    .handle_event(InputEvent::PointerDown { pos: prompt.pos });
                self.editor
                    .handle_event(InputEvent::PointerUp { pos: prompt.pos });
            }
        } else if cancelled {
            self.text_prompt = None;
        }
    }

    fn show_toasts(&mut self, ctx: &egui::Context) {
        let mut queue = self.toasts.0.borrow_mut();
        queue.retain(|toast| toast.created.elapsed() < TOAST_LIFETIME);
        if queue.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -32.0))
            .show(ctx, |ui| {
                for toast in queue.iter() {
                    let color = match toast.level {
                        NoticeLevel::Info => egui::Color32::LIGHT_BLUE,
                        NoticeLevel::Success => egui::Color32::LIGHT_GREEN,
                        NoticeLevel::Error => egui::Color32::LIGHT_RED,
                    };
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.colored_label(color, &toast.message);
                    });
                }
            });
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

impl eframe::App for PaintrApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.route_shortcuts(ctx);
        self.pump_airbrush(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open…").clicked() {
                        ui.close_menu();
                        self.open_dialog();
                    }
                    if ui.button("Save As…").clicked() {
                        ui.close_menu();
                        self.save_dialog();
                    }
                });
            });
            self.toolbar(ui);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.editor.tool().label());
                ui.separator();
                ui.label(format!("Size: {}", self.editor.style.brush_size));
                ui.separator();
                ui.label(format!("Zoom: {:.0}%", self.editor.zoom() * 100.0));
                if let Some(rect) = self.editor.selection_rect() {
                    ui.separator();
                    ui.label(format!("Selection: {}×{}", rect.width, rect.height));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas(ui, ctx);
        });

        self.text_prompt_window(ctx);
        self.show_toasts(ctx);
    }
}
