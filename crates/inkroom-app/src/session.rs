//! Headless session: wires input, canvas, text entry, rooms and a renderer.

use crate::config::{AppConfig, ConfigError};
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use inkroom_core::canvas::Canvas;
use inkroom_core::input::{CaptureOutcome, Modifiers, PointerEvent};
use inkroom_core::room::{Room, RoomError, RoomManager, User};
use inkroom_core::state::DrawingState;
use inkroom_core::text_entry::{TextEntryEvent, TextField, TextKey};
use inkroom_core::tools::ToolManager;
use inkroom_render::{RenderContext, Renderer, RendererError, render_frame};
use kurbo::Size;
use url::Url;

// Use web_time for WASM compatibility
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// One user's drawing session.
pub struct Session<R: Renderer> {
    canvas: Canvas,
    renderer: R,
    text_field: TextField,
    rooms: RoomManager,
    config: AppConfig,
}

impl<R: Renderer> Session<R> {
    pub fn new(config: AppConfig, renderer: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let tool_manager = ToolManager::with_settings(config.tools.clone())?;
        let canvas = Canvas::with_config(tool_manager, config.history);
        let rooms = RoomManager::new().with_join_delay(config.join_delay());
        log::info!("Session '{}' ready ({}x{})", config.title, config.width, config.height);

        Ok(Self {
            canvas,
            renderer,
            text_field: TextField::new(),
            rooms,
            config,
        })
    }

    /// Feed one pointer event and repaint as needed.
    ///
    /// When the drawing surface is gone the in-progress gesture is dropped
    /// and `Cancelled` is reported instead of an error.
    pub fn pointer(&mut self, event: PointerEvent) -> CaptureOutcome {
        if !self.renderer.is_available() {
            return self.surface_lost();
        }

        match &event {
            PointerEvent::Down { position, .. } => {
                self.rooms.set_local_cursor(*position);
                // Pressing elsewhere takes focus from an open text entry
                if self.text_field.is_open() {
                    self.blur();
                }
            }
            PointerEvent::Move { position, .. } => self.rooms.set_local_cursor(*position),
            _ => {}
        }

        let outcome = self.canvas.handle_pointer(event, &mut self.text_field);
        match &outcome {
            CaptureOutcome::Started
            | CaptureOutcome::Extended
            | CaptureOutcome::Preview(_)
            | CaptureOutcome::Completed(_)
            | CaptureOutcome::Cancelled => {
                if let Err(err) = self.repaint() {
                    if matches!(err, RendererError::SurfaceLost) {
                        return self.surface_lost();
                    }
                    log::error!("Repaint failed: {}", err);
                }
            }
            _ => {}
        }
        outcome
    }

    /// Feed one key press.
    ///
    /// While a text entry is open every key goes to the text field; otherwise
    /// keys are resolved as shortcuts.
    pub fn key(&mut self, key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        if self.text_field.is_open() {
            let text_key = match key {
                "Enter" => TextKey::Enter,
                "Escape" => TextKey::Escape,
                "Backspace" => TextKey::Backspace,
                other => TextKey::Character(other.to_string()),
            };
            if let Some(event) = self.text_field.key(text_key) {
                self.finish_text(&event);
            }
            return None;
        }

        let action = ShortcutRegistry::resolve(key, modifiers)?;
        self.apply(action);
        Some(action)
    }

    /// Type a string into the open text entry.
    pub fn type_text(&mut self, text: &str) {
        if !self.text_field.is_open() {
            log::debug!("No text entry open, dropping typed text");
            return;
        }
        self.text_field.key(TextKey::Character(text.to_string()));
    }

    /// Focus left the text entry.
    pub fn blur(&mut self) {
        if let Some(event) = self.text_field.blur() {
            self.finish_text(&event);
        }
    }

    pub fn apply(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::Undo => {
                self.undo();
            }
            ShortcutAction::Redo => {
                self.redo();
            }
            ShortcutAction::Clear => self.clear(),
            ShortcutAction::Cancel => {
                if self.canvas.abort_gesture(&mut self.text_field) {
                    self.repaint_quietly();
                }
            }
            ShortcutAction::SelectTool(tool) => self.canvas.tool_manager.set_tool(tool),
        }
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.canvas.undo().is_some();
        if changed {
            self.repaint_quietly();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.canvas.redo().is_some();
        if changed {
            self.repaint_quietly();
        }
        changed
    }

    pub fn clear(&mut self) {
        self.canvas.clear();
        self.repaint_quietly();
    }

    /// Create a room from the current drawing.
    pub fn create_room(&mut self, name: &str, is_private: bool) -> Result<&Room, RoomError> {
        self.rooms
            .create_room(name, is_private, self.canvas.state())
    }

    pub fn join_room(&mut self, reference: &str, now: Instant) -> Result<&Room, RoomError> {
        self.rooms.join_room(reference, now)
    }

    pub fn leave_room(&mut self) -> Result<Room, RoomError> {
        self.rooms.leave_room()
    }

    /// Advance the session clock.
    pub fn tick(&mut self, now: Instant) -> Option<&User> {
        self.rooms.tick(now)
    }

    /// Share link for the current room under the configured origin.
    pub fn share_link(&self) -> Result<Url, RoomError> {
        self.rooms.share_link(&self.config.share_origin)
    }

    /// Repaint the committed state plus any live preview.
    pub fn repaint(&mut self) -> Result<(), RendererError> {
        let size = Size::new(f64::from(self.config.width), f64::from(self.config.height));
        let ctx = RenderContext::new(self.canvas.state(), size)
            .with_background(self.config.background_color.into())
            .with_preview(self.canvas.preview())
            .with_live_stroke(self.canvas.live_stroke());
        render_frame(&mut self.renderer, &ctx)
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn state(&self) -> &DrawingState {
        self.canvas.state()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn rooms(&self) -> &RoomManager {
        &self.rooms
    }

    pub fn text_field(&self) -> &TextField {
        &self.text_field
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn finish_text(&mut self, event: &TextEntryEvent) {
        if self.canvas.complete_text(event, &mut self.text_field).is_some() {
            self.repaint_quietly();
        }
    }

    fn surface_lost(&mut self) -> CaptureOutcome {
        if self.canvas.abort_gesture(&mut self.text_field) {
            log::warn!("Drawing surface lost, gesture aborted");
            CaptureOutcome::Cancelled
        } else {
            CaptureOutcome::Ignored
        }
    }

    fn repaint_quietly(&mut self) {
        if let Err(err) = self.repaint() {
            log::warn!("Repaint skipped: {}", err);
        }
    }
}
