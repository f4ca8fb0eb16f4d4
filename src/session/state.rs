use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::HansConfig;
use crate::domain::labels::{self, TextField};
use crate::domain::{AnnotationModel, Labels, Letter};
use crate::error::{Error, Result};
use crate::render::picture::{Picture, PictureSettings};
use crate::render::pipeline::{self, ComposeInput};
use crate::render::text::Typeface;
use crate::source::image::SourceImage;

/// What a click places
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tool {
    #[default]
    Line,
    Letter,
}

/// Loaded spectrogram with its live preview
struct Loaded {
    source: SourceImage,
    preview: Picture,
}

/// One load-edit-export cycle.
///
/// Every operation either completes or returns an error with the session
/// exactly as it was before the call.
pub struct AnnotationSession {
    settings: PictureSettings,
    font_path: Option<PathBuf>,
    max_label_chars: usize,
    typeface: Option<Typeface>,
    loaded: Option<Loaded>,
    model: AnnotationModel,
    labels: Labels,
    letter: String,
    tool: Tool,
}

impl AnnotationSession {
    pub fn new(config: &HansConfig) -> Self {
        Self {
            settings: config.picture_settings(),
            font_path: config.font_path.clone(),
            max_label_chars: config.max_label_chars,
            typeface: None,
            loaded: None,
            model: AnnotationModel::new(),
            labels: Labels::default(),
            letter: config.default_letter.clone(),
            tool: Tool::default(),
        }
    }

    /// Use an already parsed font instead of the configured one
    pub fn with_typeface(mut self, typeface: Typeface) -> Self {
        self.typeface = Some(typeface);
        self
    }

    pub fn model(&self) -> &AnnotationModel {
        &self.model
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn letter(&self) -> &str {
        &self.letter
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.loaded.as_ref().map(|l| l.source.path.as_path())
    }

    pub fn preview(&self) -> Option<&Picture> {
        self.loaded.as_ref().map(|l| &l.preview)
    }

    fn typeface(&mut self) -> Result<Typeface> {
        if let Some(typeface) = &self.typeface {
            return Ok(typeface.clone());
        }
        let typeface = match &self.font_path {
            Some(path) => Typeface::load(path)?,
            None => Typeface::bundled()?,
        };
        self.typeface = Some(typeface.clone());
        Ok(typeface)
    }

    /// Bitmap plus frame, no annotations and no labels
    fn base_picture(&mut self, source: &SourceImage) -> Result<Picture> {
        let typeface = self.typeface()?;
        let mut preview = Picture::new(source.width(), source.height(), &typeface, &self.settings)?;
        preview.draw_bitmap(&source.rgba)?.draw_rectangle();
        Ok(preview)
    }

    /// Open a spectrogram and start over with an empty model
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let source = SourceImage::open(path)?;
        let preview = self.base_picture(&source)?;

        self.loaded = Some(Loaded { source, preview });
        self.model.clear();
        log::info!("Loaded {}", path.display());
        Ok(())
    }

    /// Drop all lines and letters and redraw the preview base
    pub fn clear(&mut self) -> Result<()> {
        let source = &self.loaded.as_ref().ok_or(Error::NoImage)?.source;
        let source = source.clone();
        let preview = self.base_picture(&source)?;

        if let Some(loaded) = self.loaded.as_mut() {
            loaded.preview = preview;
        }
        self.model.clear();
        Ok(())
    }

    pub fn set_frequency(&mut self, text: &str) -> Result<()> {
        self.labels.frequency = labels::validate(TextField::Frequency, text, self.max_label_chars)?;
        Ok(())
    }

    pub fn set_duration(&mut self, text: &str) -> Result<()> {
        self.labels.duration = labels::validate(TextField::Duration, text, self.max_label_chars)?;
        Ok(())
    }

    /// Letter used by subsequent letter clicks
    pub fn set_letter(&mut self, text: &str) -> Result<()> {
        self.letter = labels::validate(TextField::Letter, text, self.max_label_chars)?;
        Ok(())
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Place whatever the current tool places at source-image x
    pub fn click(&mut self, x: f32) -> Result<()> {
        match self.tool {
            Tool::Line => self.add_line(x),
            Tool::Letter => {
                let label = self.letter.clone();
                self.add_letter(x, &label)
            }
        }
    }

    pub fn add_line(&mut self, x: f32) -> Result<()> {
        let loaded = self.loaded_for(x)?;
        loaded.preview.draw_line(x);
        self.model.add_line(x);
        log::debug!("Line at {x}, {} lines", self.model.lines.len());
        Ok(())
    }

    pub fn add_letter(&mut self, x: f32, label: &str) -> Result<()> {
        let label = labels::validate(TextField::Letter, label, self.max_label_chars)?;
        let loaded = self.loaded_for(x)?;
        loaded.preview.draw_letter(x, &label);
        self.model.add_letter(label, x);
        log::debug!("Letter at {x}, {} letters", self.model.letters.len());
        Ok(())
    }

    fn loaded_for(&mut self, x: f32) -> Result<&mut Loaded> {
        if !x.is_finite() {
            return Err(Error::InvalidPosition(x));
        }
        self.loaded.as_mut().ok_or(Error::NoImage)
    }

    /// Letters as they will appear in the export
    pub fn displayed_letters(&self) -> Vec<Letter> {
        let end = self
            .loaded
            .as_ref()
            .map(|l| l.preview.inner_range().1)
            .unwrap_or(0.0);
        self.model().rebucketed(0.0, end)
    }

    /// Render the annotated picture from scratch and write it to `path`
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let typeface = self.typeface()?;
        let loaded = self.loaded.as_ref().ok_or(Error::NoImage)?;
        if self.model.is_empty() {
            log::info!("Exporting {} without annotations", path.display());
        }
        let input = ComposeInput {
            model: &self.model,
            labels: &self.labels,
            typeface: &typeface,
            settings: &self.settings,
        };
        pipeline::export(&loaded.source.rgba, &input, path)
    }

    /// Write the live preview as it currently looks
    pub fn write_preview(&self, path: &Path) -> Result<()> {
        let preview = self.preview().ok_or(Error::NoImage)?;
        pipeline::save_rgba(&preview.to_rgba(), path)
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            source: self.source_path().zip(self.loaded.as_ref()).map(|(path, l)| {
                (path.to_path_buf(), l.source.width(), l.source.height())
            }),
            labels: self.labels().clone(),
            letter: self.letter().to_string(),
            tool: self.tool(),
            lines: self.model().lines.iter().map(|l| l.position).collect(),
            letters: self.model().letters.clone(),
            displayed: self.displayed_letters(),
        }
    }
}

/// Snapshot of the session for printing
#[derive(Clone, Debug, PartialEq)]
pub struct SessionStatus {
    pub source: Option<(PathBuf, u32, u32)>,
    pub labels: Labels,
    pub letter: String,
    pub tool: Tool,
    pub lines: Vec<f32>,
    pub letters: Vec<Letter>,
    pub displayed: Vec<Letter>,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some((path, w, h)) => writeln!(f, "image:     {} ({w}x{h})", path.display())?,
            None => writeln!(f, "image:     none")?,
        }
        writeln!(f, "frequency: {}", self.labels.frequency)?;
        writeln!(f, "duration:  {}", self.labels.duration)?;
        writeln!(f, "letter:    {}", self.letter)?;
        writeln!(f, "tool:      {:?}", self.tool)?;
        writeln!(f, "lines:     {:?}", self.lines)?;
        write!(f, "letters:  ")?;
        for (raw, shown) in self.letters.iter().zip(&self.displayed) {
            write!(f, " {}@{} -> {}", raw.label, raw.position, shown.position)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::text::test_typeface;
    use image::{Rgba, RgbaImage};

    fn write_source(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        let img = RgbaImage::from_pixel(width, height, Rgba([20, 40, 60, 255]));
        pipeline::save_rgba(&img, &path).unwrap();
        path
    }

    fn session() -> AnnotationSession {
        AnnotationSession::new(&HansConfig::default()).with_typeface(test_typeface())
    }

    #[test]
    fn test_click_before_load_fails() {
        let mut session = AnnotationSession::new(&HansConfig::default());
        assert!(matches!(session.click(10.0), Err(Error::NoImage)));
        assert!(session.model().is_empty());
    }

    #[test]
    fn test_default_config_loads_with_bundled_font() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(dir.path(), "a.png", 40, 20);
        let mut session = AnnotationSession::new(&HansConfig::default());
        session.load(&path).unwrap();
        assert_eq!(session.source_path(), Some(path.as_path()));

        let out = dir.path().join("out.png");
        session.add_line(10.0).unwrap();
        session.save(&out).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn test_missing_font_fails_load_and_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_source(dir.path(), "a.png", 10, 10);
        let config = HansConfig {
            font_path: Some(dir.path().join("missing.ttf")),
            ..HansConfig::default()
        };
        let mut session = AnnotationSession::new(&config);
        assert!(matches!(session.load(&path), Err(Error::FontLoad { .. })));
        assert!(session.source_path().is_none());
    }

    #[test]
    fn test_load_resets_model() {
        let mut session = session();
        let dir = tempfile::tempdir().unwrap();
        let first = write_source(dir.path(), "first.png", 200, 50);
        let second = write_source(dir.path(), "second.png", 100, 50);

        session.load(&first).unwrap();
        session.add_line(50.0).unwrap();
        session.add_letter(20.0, "a").unwrap();
        assert_eq!(session.model().lines.len(), 1);

        session.load(&second).unwrap();
        assert!(session.model().is_empty());
        assert_eq!(session.source_path(), Some(second.as_path()));
    }

    #[test]
    fn test_failed_load_keeps_previous_session() {
        let mut session = session();
        let dir = tempfile::tempdir().unwrap();
        let good = write_source(dir.path(), "good.png", 120, 40);
        session.load(&good).unwrap();
        session.add_line(60.0).unwrap();

        let bad = dir.path().join("bad.png");
        std::fs::write(&bad, b"nope").unwrap();
        assert!(session.load(&bad).is_err());

        assert_eq!(session.source_path(), Some(good.as_path()));
        assert_eq!(session.model().lines.len(), 1);
    }

    #[test]
    fn test_click_uses_tool_and_letter() {
        let mut session = session();
        let dir = tempfile::tempdir().unwrap();
        session.load(&write_source(dir.path(), "s.png", 400, 80)).unwrap();

        session.click(100.0).unwrap();
        session.set_tool(Tool::Letter);
        session.set_letter("ʃ").unwrap();
        session.click(150.0).unwrap();

        assert_eq!(session.model().lines.len(), 1);
        assert_eq!(session.model().letters, vec![Letter::new("ʃ", 150.0)]);
        assert_eq!(session.displayed_letters(), vec![Letter::new("ʃ", 250.0)]);
    }

    #[test]
    fn test_rejected_input_changes_nothing() {
        let mut session = session();
        let dir = tempfile::tempdir().unwrap();
        session.load(&write_source(dir.path(), "s.png", 100, 40)).unwrap();

        assert!(matches!(
            session.add_line(f32::NAN),
            Err(Error::InvalidPosition(_))
        ));
        assert!(session.add_letter(10.0, "").is_err());
        assert!(session.set_frequency("1\n2").is_err());
        assert!(session.set_letter(&"x".repeat(100)).is_err());

        assert!(session.model().is_empty());
        assert_eq!(session.labels(), &Labels::default());
        assert_eq!(session.letter(), "a");
    }

    #[test]
    fn test_save_does_not_rewrite_raw_positions() {
        let mut session = session();
        let dir = tempfile::tempdir().unwrap();
        session.load(&write_source(dir.path(), "s.png", 300, 60)).unwrap();
        session.add_letter(40.0, "a").unwrap();
        session.add_line(100.0).unwrap();
        session.set_frequency("4000").unwrap();
        session.set_duration("0.3").unwrap();

        let out = dir.path().join("out.png");
        session.save(&out).unwrap();
        assert!(out.exists());
        assert_eq!(session.model().letters[0].position, 40.0);
        assert_eq!(session.displayed_letters()[0].position, 50.0);
    }

    #[test]
    fn test_save_is_repeatable() {
        let mut session = session();
        let dir = tempfile::tempdir().unwrap();
        session.load(&write_source(dir.path(), "s.png", 160, 60)).unwrap();
        session.add_line(80.0).unwrap();
        session.add_letter(10.0, "o").unwrap();

        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        session.save(&a).unwrap();
        session.save(&b).unwrap();
        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    }

    #[test]
    fn test_save_without_image() {
        let mut session = session();
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            session.save(&dir.path().join("x.png")),
            Err(Error::NoImage)
        ));
    }

    #[test]
    fn test_clear_rebuilds_preview() {
        let mut session = session();
        let dir = tempfile::tempdir().unwrap();
        session.load(&write_source(dir.path(), "s.png", 100, 40)).unwrap();
        let base = session.preview().unwrap().to_rgba();

        session.add_line(50.0).unwrap();
        assert_ne!(session.preview().unwrap().to_rgba(), base);

        session.clear().unwrap();
        assert!(session.model().is_empty());
        assert_eq!(session.preview().unwrap().to_rgba(), base);
    }

    #[test]
    fn test_status_lists_displayed_positions() {
        let mut session = session();
        let dir = tempfile::tempdir().unwrap();
        session.load(&write_source(dir.path(), "s.png", 100, 40)).unwrap();
        session.add_line(50.0).unwrap();
        session.add_letter(20.0, "a").unwrap();

        let status = session.status();
        assert_eq!(status.lines, vec![50.0]);
        assert_eq!(status.displayed, vec![Letter::new("a", 25.0)]);
        assert!(status.to_string().contains("a@20 -> 25"));
    }
}
