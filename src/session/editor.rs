//! The editor session: one photo, its scene, its surface, its caption
//!
//! A session owns everything it draws with. It ends either through
//! [`EditorSession::save`] or [`EditorSession::cancel`], both of which
//! consume it so the surface and scene are released on every exit path.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::messages::{EditorMsg, ToolMsg};
use super::state::{GestureState, ToolSettings};
use crate::annotations::handlers;
use crate::capture::image::SourceImage;
use crate::config::{EditorConfig, ShapeColor, Tool};
use crate::domain::{Point, SceneModel, Shape, Stroke, TextAnnotation};
use crate::export;
use crate::render::surface::Surface;
use crate::render::text::TextRasterizer;

/// Receives the flattened image bytes and the caption on save
pub type CommitCallback = Box<dyn FnOnce(Vec<u8>, String)>;
/// Notified when the session is discarded
pub type DiscardCallback = Box<dyn FnOnce()>;

pub struct EditorSession {
    pub(crate) config: EditorConfig,
    pub(crate) scene: SceneModel,
    /// `None` when the source image has no pixels to draw on
    pub(crate) surface: Option<Surface>,
    pub(crate) text: TextRasterizer,
    pub(crate) caption: String,
    pub(crate) settings: ToolSettings,
    pub(crate) gesture: GestureState,
    on_commit: CommitCallback,
    on_discard: DiscardCallback,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("surface", &self.surface)
            .field("scene", &self.scene)
            .field("caption", &self.caption)
            .field("settings", &self.settings)
            .field("gesture", &self.gesture)
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Open a session on a decoded source image
    ///
    /// The surface size is fixed here, once, from the source dimensions and
    /// the configured bound.
    pub fn open(
        source: &SourceImage,
        caption: Option<String>,
        config: EditorConfig,
        on_commit: CommitCallback,
        on_discard: DiscardCallback,
    ) -> Self {
        let text = TextRasterizer::load(config.font_path.as_deref());
        Self::open_with_text(source, caption, config, text, on_commit, on_discard)
    }

    /// Open a session with an explicit text rasterizer
    pub fn open_with_text(
        source: &SourceImage,
        caption: Option<String>,
        config: EditorConfig,
        text: TextRasterizer,
        on_commit: CommitCallback,
        on_discard: DiscardCallback,
    ) -> Self {
        let size = source.surface_size(config.max_surface_width, config.max_surface_height);
        let surface = if size.is_empty() {
            None
        } else {
            Surface::new(&source.scaled_to(size))
        };

        match &surface {
            Some(_) => log::debug!(
                "Editor session opened: {}x{} source on {}x{} surface",
                source.width(),
                source.height(),
                size.width,
                size.height
            ),
            None => log::warn!(
                "Editor session opened without a surface ({}x{} source)",
                source.width(),
                source.height()
            ),
        }

        Self {
            settings: ToolSettings::from(&config),
            config,
            scene: SceneModel::new(),
            surface,
            text,
            caption: caption.unwrap_or_default(),
            gesture: GestureState::Idle,
            on_commit,
            on_discard,
        }
    }

    /// Decode an image file and open a session on it
    ///
    /// On decode failure nothing is allocated and the callbacks are dropped
    /// without being invoked.
    pub fn open_path(
        path: &Path,
        caption: Option<String>,
        config: EditorConfig,
        on_commit: CommitCallback,
        on_discard: DiscardCallback,
    ) -> anyhow::Result<Self> {
        let source = SourceImage::open(path)?;
        Ok(Self::open(&source, caption, config, on_commit, on_discard))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn scene(&self) -> &SceneModel {
        &self.scene
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn settings(&self) -> ToolSettings {
        self.settings
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Where the open text prompt is anchored, if one is open
    pub fn pending_text_anchor(&self) -> Option<Point> {
        match self.gesture {
            GestureState::AwaitingText(position) => Some(position),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Message dispatch
    // ------------------------------------------------------------------

    /// Apply one message; any resulting repaint happens before this returns
    pub fn update(&mut self, msg: EditorMsg) {
        match msg {
            EditorMsg::Pointer(action) => handlers::handle_pointer(self, action),
            EditorMsg::Text(msg) => handlers::handle_text(self, msg),
            EditorMsg::Tool(msg) => self.handle_tool(msg),
            EditorMsg::Caption(caption) => self.set_caption(caption),
            EditorMsg::ClearAll { confirmed } => {
                self.clear_all(|| confirmed);
            }
        }
    }

    fn handle_tool(&mut self, msg: ToolMsg) {
        match msg {
            ToolMsg::Select(tool) => self.set_tool(tool),
            ToolMsg::Next => self.set_tool(self.settings.tool.next()),
            ToolMsg::Color(color) => self.set_color(color),
            ToolMsg::Width(width) => self.set_width(width),
            ToolMsg::FontSize(size) => self.set_font_size(size),
        }
    }

    // ------------------------------------------------------------------
    // Configuration (no repaint)
    // ------------------------------------------------------------------

    pub fn set_tool(&mut self, tool: Tool) {
        self.settings.tool = tool;
    }

    pub fn set_color(&mut self, color: ShapeColor) {
        self.settings.color = color;
    }

    pub fn set_width(&mut self, width: f32) {
        self.settings.width = width;
    }

    pub fn set_font_size(&mut self, font_size: f32) {
        self.settings.font_size = font_size;
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    // ------------------------------------------------------------------
    // Scene mutations (always followed by a full repaint)
    // ------------------------------------------------------------------

    pub fn add_stroke(&mut self, stroke: Stroke) {
        log::debug!("Commit stroke: {} points, {:?}", stroke.points.len(), stroke.tool);
        self.scene.add_stroke(stroke);
        self.repaint();
    }

    pub fn add_shape(&mut self, shape: Shape) {
        log::debug!("Commit shape: {:?} {:?} -> {:?}", shape.kind, shape.start, shape.end);
        self.scene.add_shape(shape);
        self.repaint();
    }

    pub fn add_text(&mut self, text: TextAnnotation) {
        log::debug!("Commit text at {:?}: {:?}", text.position, text.text);
        self.scene.add_text(text);
        self.repaint();
    }

    /// Remove every committed element if `confirm` agrees
    ///
    /// Returns whether the scene was cleared. The base image is untouched.
    pub fn clear_all(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            log::debug!("Clear all declined");
            return false;
        }
        log::debug!("Clearing {} elements", self.scene.len());
        self.scene.clear_all();
        self.repaint();
        true
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    pub(crate) fn repaint(&mut self) {
        match self.surface.as_mut() {
            Some(surface) => surface.repaint(&self.scene, &self.text),
            None => log::debug!("No surface, skipping repaint"),
        }
    }

    pub(crate) fn repaint_with_preview(&mut self, preview: &Shape) {
        match self.surface.as_mut() {
            Some(surface) => surface.repaint_with_preview(&self.scene, &self.text, preview),
            None => log::debug!("No surface, skipping preview"),
        }
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Encode the current surface in the configured format
    pub fn flatten(&self) -> anyhow::Result<Vec<u8>> {
        let surface = self
            .surface
            .as_ref()
            .context("no surface to flatten")?;
        export::flatten(
            surface.pixmap(),
            self.config.export_format,
            self.config.jpeg_quality,
        )
    }

    /// The flattened surface as a `data:` URL
    pub fn flatten_data_url(&self) -> anyhow::Result<String> {
        let bytes = self.flatten()?;
        Ok(export::to_data_url(self.config.export_format, &bytes))
    }

    /// Write the flattened surface to the download folder under the fixed filename
    ///
    /// The session stays open.
    pub fn download(&self) -> anyhow::Result<PathBuf> {
        let bytes = self.flatten()?;
        let dir = self
            .config
            .resolved_download_dir()
            .context("no download directory available")?;
        let path = export::write_download(&bytes, &dir, &self.config.download_file_name)?;
        log::info!("Downloaded annotated image to {:?}", path);
        Ok(path)
    }

    /// Flatten and hand the bytes and caption to the commit callback
    ///
    /// If encoding fails the callback is not invoked; the session is
    /// released either way.
    pub fn save(self) -> anyhow::Result<()> {
        let bytes = self.flatten()?;
        log::info!(
            "Saving annotated image ({} bytes, {} elements)",
            bytes.len(),
            self.scene.len()
        );
        let Self {
            caption, on_commit, ..
        } = self;
        on_commit(bytes, caption);
        Ok(())
    }

    /// Discard the session without producing anything
    pub fn cancel(self) {
        log::info!("Annotation discarded ({} elements)", self.scene.len());
        let Self { on_discard, .. } = self;
        on_discard();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportFormat;
    use crate::domain::{ShapeKind, StrokeTool};
    use image::RgbaImage;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Calls {
        commits: Vec<(Vec<u8>, String)>,
        discards: usize,
    }

    fn callbacks(calls: &Rc<RefCell<Calls>>) -> (CommitCallback, DiscardCallback) {
        let commit = Rc::clone(calls);
        let discard = Rc::clone(calls);
        (
            Box::new(move |bytes: Vec<u8>, caption: String| commit.borrow_mut().commits.push((bytes, caption))),
            Box::new(move || discard.borrow_mut().discards += 1),
        )
    }

    fn source(w: u32, h: u32) -> SourceImage {
        SourceImage::from_rgba(RgbaImage::from_fn(w, h, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, 90, 255])
        }))
    }

    fn session(calls: &Rc<RefCell<Calls>>, w: u32, h: u32) -> EditorSession {
        let (commit, discard) = callbacks(calls);
        EditorSession::open_with_text(
            &source(w, h),
            Some("before".to_string()),
            EditorConfig::default(),
            TextRasterizer::without_font(),
            commit,
            discard,
        )
    }

    fn pixels(session: &EditorSession) -> Vec<u8> {
        session.surface().unwrap().pixmap().data().to_vec()
    }

    #[test]
    fn test_surface_is_fitted_once_on_open() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let s = session(&calls, 1600, 1200);
        let size = s.surface().unwrap().size();
        assert_eq!((size.width, size.height), (800, 600));

        let s = session(&calls, 600, 1200);
        let size = s.surface().unwrap().size();
        assert_eq!((size.width, size.height), (300, 600));
    }

    #[test]
    fn test_save_commits_once_with_caption() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut s = session(&calls, 64, 48);
        s.update(EditorMsg::Caption("after".to_string()));
        s.save().unwrap();

        let calls = calls.borrow();
        assert_eq!(calls.commits.len(), 1);
        assert_eq!(calls.discards, 0);
        let (bytes, caption) = &calls.commits[0];
        assert!(!bytes.is_empty());
        assert_eq!(caption, "after");
        let decoded = image::load_from_memory(bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn test_cancel_discards_without_commit() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut s = session(&calls, 32, 32);
        s.add_stroke(Stroke {
            points: vec![Point::new(1.0, 1.0), Point::new(20.0, 20.0)],
            color: ShapeColor::BLACK,
            width: 3.0,
            tool: StrokeTool::Pen,
        });
        s.cancel();

        let calls = calls.borrow();
        assert_eq!(calls.discards, 1);
        assert!(calls.commits.is_empty());
    }

    #[test]
    fn test_initial_caption_defaults_to_empty() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let (commit, discard) = callbacks(&calls);
        let s = EditorSession::open_with_text(
            &source(8, 8),
            None,
            EditorConfig::default(),
            TextRasterizer::without_font(),
            commit,
            discard,
        );
        assert_eq!(s.caption(), "");
        s.save().unwrap();
        assert_eq!(calls.borrow().commits[0].1, "");
    }

    #[test]
    fn test_clear_all_requires_confirmation() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut s = session(&calls, 40, 40);
        let fresh = pixels(&s);

        s.add_shape(Shape::new(
            ShapeKind::Rectangle,
            Point::new(4.0, 4.0),
            Point::new(30.0, 30.0),
            ShapeColor::BLACK,
            3.0,
        ));
        let drawn = pixels(&s);
        assert_ne!(drawn, fresh);

        assert!(!s.clear_all(|| false));
        assert_eq!(s.scene().len(), 1);
        assert_eq!(pixels(&s), drawn);

        s.update(EditorMsg::ClearAll { confirmed: true });
        assert!(s.scene().is_empty());
        assert_eq!(pixels(&s), fresh);
    }

    #[test]
    fn test_settings_changes_do_not_repaint() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut s = session(&calls, 40, 40);
        s.update(EditorMsg::select_tool(Tool::Rectangle));
        s.update(EditorMsg::press(5.0, 5.0));
        s.update(EditorMsg::drag(30.0, 30.0));
        let previewing = pixels(&s);

        // Changing settings mid-drag leaves the preview on screen as is
        s.update(EditorMsg::Tool(ToolMsg::Color(ShapeColor::WHITE)));
        s.update(EditorMsg::Tool(ToolMsg::Width(9.0)));
        s.update(EditorMsg::Tool(ToolMsg::Next));
        assert_eq!(pixels(&s), previewing);
        assert_eq!(s.settings().tool, Tool::Circle);
        assert_eq!(s.settings().width, 9.0);
    }

    #[test]
    fn test_zero_sized_source_has_no_surface() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let (commit, discard) = callbacks(&calls);
        let mut s = EditorSession::open_with_text(
            &SourceImage::from_rgba(RgbaImage::new(0, 0)),
            None,
            EditorConfig::default(),
            TextRasterizer::without_font(),
            commit,
            discard,
        );
        assert!(s.surface().is_none());

        // Gestures still work against the model
        s.update(EditorMsg::select_tool(Tool::Arrow));
        s.update(EditorMsg::press(0.0, 0.0));
        s.update(EditorMsg::drag(5.0, 5.0));
        s.update(EditorMsg::release(10.0, 0.0));
        assert_eq!(s.scene().shapes().len(), 1);

        assert!(s.flatten().is_err());
        assert!(s.save().is_err());
        assert!(calls.borrow().commits.is_empty());
    }

    #[test]
    fn test_one_zero_dimension_has_no_surface() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        for (w, h) in [(0, 2000), (2000, 0)] {
            let s = session(&calls, w, h);
            assert!(s.surface().is_none());
            assert!(s.flatten().is_err());
        }
    }

    #[test]
    fn test_png_export_and_data_url() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let (commit, discard) = callbacks(&calls);
        let config = EditorConfig {
            export_format: ExportFormat::Png,
            ..EditorConfig::default()
        };
        let s = EditorSession::open_with_text(
            &source(10, 10),
            None,
            config,
            TextRasterizer::without_font(),
            commit,
            discard,
        );
        let url = s.flatten_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let decoded = image::load_from_memory(&s.flatten().unwrap()).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(3, 7).0, [3, 7, 90, 255]);
    }

    #[test]
    fn test_download_writes_fixed_filename() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Rc::new(RefCell::new(Calls::default()));
        let (commit, discard) = callbacks(&calls);
        let config = EditorConfig {
            download_dir: Some(dir.path().to_path_buf()),
            ..EditorConfig::default()
        };
        let s = EditorSession::open_with_text(
            &source(12, 12),
            None,
            config,
            TextRasterizer::without_font(),
            commit,
            discard,
        );

        let path = s.download().unwrap();
        assert_eq!(path, dir.path().join("annotated-photo.jpg"));
        let written = std::fs::read(&path).unwrap();
        assert_eq!(&written[..2], &[0xFF, 0xD8]);

        // Downloading does not end the session or fire callbacks
        assert!(calls.borrow().commits.is_empty());
        assert_eq!(calls.borrow().discards, 0);
    }

    #[test]
    fn test_open_path_failure_releases_callbacks() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let (commit, discard) = callbacks(&calls);
        let result = EditorSession::open_path(
            Path::new("/nonexistent/photo.png"),
            None,
            EditorConfig::default(),
            commit,
            discard,
        );
        assert!(result.is_err());
        // Both callbacks were dropped with the failed open
        assert_eq!(Rc::strong_count(&calls), 1);
    }
}
