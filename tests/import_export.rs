//! Import and export through the editor, on real temporary files.

use egui::Pos2;
use image::{Rgba, RgbaImage};
use paintr::{Command, Editor, InputEvent, Tool};

#[test]
fn export_then_reimport_round_trips_the_canvas() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(paintr::io::EXPORT_FILE_NAME);

    let mut editor = Editor::new(64, 64);
    editor.set_tool(Tool::Fill);
    assert!(editor.style.set_color("#FF00FF"));
    editor.handle_event(InputEvent::PointerDown { pos: Pos2::new(32.0, 32.0) });
    editor.handle_event(InputEvent::PointerUp { pos: Pos2::new(32.0, 32.0) });
    editor.export(&path).unwrap();

    let mut fresh = Editor::new(64, 64);
    fresh.import(&path).unwrap();
    assert_eq!(fresh.surface().snapshot(), editor.surface().snapshot());
}

#[test]
fn import_resets_history_to_a_single_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("in.png");
    let img = RgbaImage::from_pixel(10, 10, Rgba([0, 128, 255, 255]));
    paintr::io::export_png(&path, &img).unwrap();

    let mut editor = Editor::new(40, 40);
    editor.set_tool(Tool::Fill);
    assert!(editor.style.set_color("#FF0000"));
    editor.handle_event(InputEvent::PointerDown { pos: Pos2::new(20.0, 20.0) });
    editor.handle_event(InputEvent::PointerUp { pos: Pos2::new(20.0, 20.0) });
    assert_eq!(editor.history_len(), 2);

    editor.import(&path).unwrap();
    assert_eq!(editor.history_len(), 1);
    assert!(!editor.can_undo());
    // The square image fills the square canvas edge to edge.
    assert_eq!(editor.surface().get_pixel(20, 20), Some(Rgba([0, 128, 255, 255])));
}

#[test]
fn import_centers_a_narrow_image_over_the_background() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tall.png");
    let img = RgbaImage::from_pixel(10, 40, Rgba([255, 255, 0, 255]));
    paintr::io::export_png(&path, &img).unwrap();

    let mut editor = Editor::new(40, 40);
    editor.import(&path).unwrap();

    // Scaled to 10x40, centred horizontally: the side bands are background.
    assert_eq!(editor.surface().get_pixel(20, 20), Some(Rgba([255, 255, 0, 255])));
    assert_eq!(editor.surface().get_pixel(2, 20), Some(Rgba([0, 0, 0, 255])));
    assert_eq!(editor.surface().get_pixel(38, 20), Some(Rgba([0, 0, 0, 255])));
}

#[test]
fn failed_import_leaves_the_editor_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("junk.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    let mut editor = Editor::new(30, 30);
    editor.handle_event(InputEvent::Command(Command::SelectAll));
    editor.handle_event(InputEvent::Command(Command::CancelSelection));
    let before = editor.surface().snapshot();

    assert!(editor.import(&path).is_err());
    assert_eq!(editor.surface().snapshot(), before);
    assert_eq!(editor.history_len(), 1);
}

#[test]
fn exporting_with_an_active_selection_omits_the_marquee() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.png");

    let mut editor = Editor::new(32, 32);
    let clean = editor.surface().snapshot();
    editor.handle_event(InputEvent::Command(Command::SelectAll));
    editor.export(&path).unwrap();

    let loaded = paintr::io::load_image(&path).unwrap();
    assert_eq!(loaded.as_raw().as_slice(), clean.as_raw());
}
