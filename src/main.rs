use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use macroquad::prelude::*;
use macroquad::ui::{hash, root_ui, widgets};
use macroquad::window::Conf;
use rfd::FileDialog;
use tracing::{error, info, warn};

use whiteboard::document::BoardFile;
use whiteboard::export::{canvas_image, save_canvas, EXPORT_EXTENSIONS};
use whiteboard::mesh::{discs_to_meshes, Meshable};
use whiteboard::read_stylus::{read_input, StylusEvent, StylusState};
use whiteboard::settings::Settings;
use whiteboard::utility::is_stroke_visible;
use whiteboard::viewport::Viewport;
use whiteboard::{logging, Rgb, ToolMode, Whiteboard};

const MARKED_ALPHA: f32 = 0.3;

enum UiAction {
    ToggleMode,
    Undo,
    Redo,
    Clear,
    Save,
    Open,
    Export,
}

struct Stylus {
    receiver: Receiver<StylusEvent>,
    state: StylusState,
    touching: bool,
}

struct App {
    board: Whiteboard,
    settings: Settings,
    brush_color: [f32; 3],
    brush_size: f32,
    mouse_active: bool,
    stylus: Option<Stylus>,
    started: Instant,
    export_requested: bool,
}

impl App {
    fn new(settings: Settings) -> Self {
        let stylus = settings.stylus_device.as_deref().and_then(|path| {
            let (sender, receiver) = mpsc::channel();
            match read_input(path, sender) {
                Ok(()) => Some(Stylus {
                    receiver,
                    state: StylusState::new(settings.pressure_max, settings.pressure_threshold),
                    touching: false,
                }),
                Err(e) => {
                    warn!("stylus disabled: {e:#}");
                    None
                }
            }
        });

        Self {
            board: Whiteboard::from_settings(&settings),
            brush_color: settings.brush_color,
            brush_size: settings.brush_size,
            settings,
            mouse_active: false,
            stylus,
            started: Instant::now(),
            export_requested: false,
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(screen_width(), screen_height(), self.settings.sidebar_width)
    }

    fn handle_pointer(&mut self) {
        let vp = self.viewport();
        let (mx, my) = mouse_position();
        let world = vp.screen_to_world(mx, my);
        let inside = vp.contains_screen(mx, my);

        if is_mouse_button_pressed(MouseButton::Left) && inside {
            self.board.pointer_down(world);
            self.mouse_active = true;
        }
        if self.mouse_active && is_mouse_button_down(MouseButton::Left) && inside {
            self.board.pointer_move(world);
        }
        if self.mouse_active && is_mouse_button_released(MouseButton::Left) {
            self.board.pointer_up();
            self.mouse_active = false;
        }

        let Some(stylus) = self.stylus.as_mut() else {
            return;
        };
        let now = self.started.elapsed();
        let mut toggle = false;
        while let Ok(event) = stylus.receiver.try_recv() {
            toggle |= stylus.state.apply(event, now);
        }
        if toggle {
            self.board.toggle_mode();
        }
        match (stylus.touching, stylus.state.is_touching()) {
            (false, true) if inside => {
                self.board.pointer_down(world);
                stylus.touching = true;
            }
            (true, true) if inside => self.board.pointer_move(world),
            (true, false) => {
                self.board.pointer_up();
                stylus.touching = false;
            }
            _ => {}
        }
    }

    fn handle_keys(&mut self) {
        let ctrl = is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl);
        let shift = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);

        if ctrl && is_key_pressed(KeyCode::Z) {
            if shift {
                self.apply(UiAction::Redo);
            } else {
                self.apply(UiAction::Undo);
            }
        }
        if ctrl && is_key_pressed(KeyCode::Y) {
            self.apply(UiAction::Redo);
        }
        if ctrl && is_key_pressed(KeyCode::S) {
            self.apply(UiAction::Save);
        }
        if ctrl && is_key_pressed(KeyCode::O) {
            self.apply(UiAction::Open);
        }
        if ctrl && is_key_pressed(KeyCode::E) {
            self.apply(UiAction::Export);
        } else if !ctrl && is_key_pressed(KeyCode::E) {
            self.apply(UiAction::ToggleMode);
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::ToggleMode => self.board.toggle_mode(),
            UiAction::Undo => {
                self.board.undo();
            }
            UiAction::Redo => {
                self.board.redo();
            }
            UiAction::Clear => self.board.clear(),
            UiAction::Save => self.save_board(),
            UiAction::Open => self.open_board(),
            UiAction::Export => self.export_requested = true,
        }
    }

    fn save_board(&self) {
        let Some(path) = FileDialog::new().add_filter("json", &["json"]).save_file() else {
            return;
        };
        if let Err(e) = self.board.board_file().save(&path) {
            error!("failed to save board: {e:#}");
        }
    }

    fn open_board(&mut self) {
        let Some(path) = FileDialog::new().add_filter("json", &["json"]).pick_file() else {
            return;
        };
        match BoardFile::load(&path) {
            Ok(file) => {
                self.board.load_board(file);
                let canvas = self.board.canvas();
                self.brush_color = canvas.color().into();
                self.brush_size = canvas.brush_size();
            }
            Err(e) => error!("failed to open board: {e:#}"),
        }
    }

    /// Reads back the frame drawn so far, so call it before the sidebar is drawn.
    fn export(&mut self) {
        self.export_requested = false;
        let Some(path) = FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .add_filter("JPEG Image", &["jpg", "jpeg"])
            .add_filter("BMP Image", &["bmp"])
            .add_filter("All supported", EXPORT_EXTENSIONS)
            .set_file_name("whiteboard.png")
            .save_file()
        else {
            return;
        };

        let shot = get_screen_data();
        let (w, h) = (shot.width as u32, shot.height as u32);
        // the framebuffer may be larger than the logical window on hidpi screens
        let scale = w as f32 / screen_width().max(1.0);
        let sidebar = (self.settings.sidebar_width * scale).round() as u32;
        let Some(image) = canvas_image(&shot.bytes, w, h, sidebar, true) else {
            error!(width = w, height = h, sidebar, "screen capture has no canvas area");
            return;
        };
        if let Err(e) = save_canvas(&image, &path) {
            error!("failed to save the image: {e:#}");
        }
    }

    fn draw_board(&self) {
        let vp = self.viewport();
        let view = vp.world_rect();
        let canvas = self.board.canvas();

        set_camera(&vp.camera());

        for (i, stroke) in canvas.strokes().iter().enumerate() {
            if !is_stroke_visible(stroke, view) {
                continue;
            }
            let alpha = if self.board.is_marked(i) { MARKED_ALPHA } else { 1.0 };
            for mesh in stroke.to_meshes(alpha) {
                draw_mesh(&mesh);
            }
        }

        if canvas.is_drawing() {
            for mesh in discs_to_meshes(canvas.in_progress_discs(), canvas.color().to_color(1.0)) {
                draw_mesh(&mesh);
            }
        }

        let (mx, my) = mouse_position();
        if canvas.mode() == ToolMode::Erase && vp.contains_screen(mx, my) {
            let cursor = vp.screen_to_world(mx, my);
            draw_circle_lines(
                cursor.x,
                cursor.y,
                self.board.sampling().eraser_radius,
                vp.world_per_pixel() * 1.5,
                GRAY,
            );
        }

        set_default_camera();
    }

    fn draw_sidebar(&mut self) -> Vec<UiAction> {
        let mut actions = Vec::new();
        let (lo, hi) = self.settings.brush_range();
        let width = self.settings.sidebar_width;
        let mode = self.board.canvas().mode();
        let strokes = self.board.canvas().strokes().len();
        let (can_undo, can_redo) = (self.board.history().can_undo(), self.board.history().can_redo());
        let color = &mut self.brush_color;
        let size = &mut self.brush_size;

        draw_rectangle(0.0, 0.0, width, screen_height(), Color::new(0.15, 0.15, 0.15, 1.0));

        widgets::Window::new(hash!(), vec2(0.0, 0.0), vec2(width, screen_height()))
            .label("Controls")
            .movable(false)
            .ui(&mut root_ui(), |ui| {
                ui.label(None, "Brush colour");
                ui.slider(hash!(), "R", 0.0..1.0, &mut color[0]);
                ui.slider(hash!(), "G", 0.0..1.0, &mut color[1]);
                ui.slider(hash!(), "B", 0.0..1.0, &mut color[2]);
                ui.slider(hash!(), "Size", lo..hi, size);
                ui.separator();

                let mode_label = match mode {
                    ToolMode::Draw => "Mode: draw (E)",
                    ToolMode::Erase => "Mode: erase (E)",
                };
                if ui.button(None, mode_label) {
                    actions.push(UiAction::ToggleMode);
                }
                if ui.button(None, if can_undo { "Undo" } else { "Undo (empty)" }) {
                    actions.push(UiAction::Undo);
                }
                if ui.button(None, if can_redo { "Redo" } else { "Redo (empty)" }) {
                    actions.push(UiAction::Redo);
                }
                if ui.button(None, "Clear") {
                    actions.push(UiAction::Clear);
                }
                ui.separator();
                if ui.button(None, "Save board") {
                    actions.push(UiAction::Save);
                }
                if ui.button(None, "Open board") {
                    actions.push(UiAction::Open);
                }
                if ui.button(None, "Save as image") {
                    actions.push(UiAction::Export);
                }
                ui.separator();
                ui.label(None, &format!("Strokes: {strokes}"));
                ui.label(None, &format!("FPS: {}", get_fps()));
            });

        actions
    }
}

fn load_settings() -> Settings {
    let path = Settings::default_path();
    Settings::load(&path).unwrap_or_else(|e| {
        eprintln!("{e:#}, using defaults");
        Settings::default()
    })
}

fn window_conf() -> Conf {
    let settings = load_settings();
    Conf {
        window_title: "Whiteboard".to_owned(),
        window_width: settings.window_width,
        window_height: settings.window_height,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let settings = load_settings();
    logging::init(settings.debug_logging);
    info!(sidebar = settings.sidebar_width, stylus = ?settings.stylus_device, "starting whiteboard");

    let mut app = App::new(settings);

    loop {
        app.board.set_color(Rgb::from(app.brush_color));
        app.board.set_brush_size(app.brush_size);

        app.handle_pointer();
        app.handle_keys();

        clear_background(WHITE);
        app.draw_board();

        if app.export_requested {
            app.export();
        }

        for action in app.draw_sidebar() {
            app.apply(action);
        }

        next_frame().await;
    }
}
