//! Embedded feed viewport collaborator.
//!
//! The browsing surface itself lives outside the core. It loads a URL, can be
//! made non-interactive, draws an overlay, and reports drag gestures back as
//! [`ViewportEvent`]s.

use serde::{Deserialize, Serialize};

use crate::gate::Overlay;

/// Drag callbacks from the viewport's scroll view. Offsets are vertical
/// content offsets in viewport points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewportEvent {
    DragBegan { offset: f64 },
    Scrolled { offset: f64 },
    DragEnded,
}

pub trait Viewport {
    fn load(&mut self, url: &str);
    fn set_interactive(&mut self, interactive: bool);
    fn show_overlay(&mut self, overlay: Option<&Overlay>);
}

/// Viewport that only remembers what it was told.
#[derive(Debug, Clone, Default)]
pub struct RecordingViewport {
    pub loaded: Vec<String>,
    pub interactive: bool,
    pub overlay: Option<Overlay>,
}

impl RecordingViewport {
    pub fn new() -> Self {
        Self {
            interactive: true,
            ..Self::default()
        }
    }

    pub fn current_url(&self) -> Option<&str> {
        self.loaded.last().map(String::as_str)
    }
}

impl Viewport for RecordingViewport {
    fn load(&mut self, url: &str) {
        self.loaded.push(url.to_string());
    }

    fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    fn show_overlay(&mut self, overlay: Option<&Overlay>) {
        self.overlay = overlay.cloned();
    }
}
