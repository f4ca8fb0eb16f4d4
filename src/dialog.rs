//! File choosers for load and save
//!
//! Native dialogs need a desktop session, so they are behind the
//! `dialogs` feature. Without it every request reports cancellation.

use std::path::PathBuf;

pub trait PathPicker {
    /// Ask for a PNG to open. `None` means the user cancelled.
    fn pick_source(&mut self) -> Option<PathBuf>;

    /// Ask where to save the exported PNG. `None` means the user cancelled.
    fn pick_destination(&mut self) -> Option<PathBuf>;
}

/// Picker for sessions without a display
#[derive(Debug, Default)]
pub struct Headless;

impl PathPicker for Headless {
    fn pick_source(&mut self) -> Option<PathBuf> {
        log::info!("No file dialog available, pass a path instead");
        None
    }

    fn pick_destination(&mut self) -> Option<PathBuf> {
        log::info!("No file dialog available, pass a path instead");
        None
    }
}

#[cfg(feature = "dialogs")]
#[derive(Debug, Default)]
pub struct NativeDialog;

#[cfg(feature = "dialogs")]
impl PathPicker for NativeDialog {
    fn pick_source(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select image")
            .add_filter("PNG image", &["png"])
            .pick_file()
    }

    fn pick_destination(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Save image")
            .add_filter("PNG image", &["png"])
            .save_file()
    }
}

/// Native dialogs when built with them, headless otherwise
pub fn default_picker() -> Box<dyn PathPicker> {
    #[cfg(feature = "dialogs")]
    {
        Box::new(NativeDialog)
    }
    #[cfg(not(feature = "dialogs"))]
    {
        Box::new(Headless)
    }
}

/// Hands out queued answers, for driving the session in tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct Scripted {
    pub sources: Vec<Option<PathBuf>>,
    pub destinations: Vec<Option<PathBuf>>,
}

#[cfg(test)]
impl PathPicker for Scripted {
    fn pick_source(&mut self) -> Option<PathBuf> {
        if self.sources.is_empty() {
            None
        } else {
            self.sources.remove(0)
        }
    }

    fn pick_destination(&mut self) -> Option<PathBuf> {
        if self.destinations.is_empty() {
            None
        } else {
            self.destinations.remove(0)
        }
    }
}
