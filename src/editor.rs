//! The editor: one open image and everything annotated on it.
//!
//! [`Editor`] is the surface a UI shell talks to. It owns the loaded image,
//! the viewport and zoom state, the coordinate transform, the annotation
//! graph, the gesture selection, the active mode and the active color. Every
//! command runs to completion before returning; nothing here is shared
//! across threads.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::color_utils::Color;
use crate::config::AppConfig;
use crate::data::{ImageSource, LoadError, LoadedImage, PointDetector};
use crate::format::{Document, FormatError, FullDocument, PivotDocument};
use crate::geometry::{self, Point};
use crate::model::{
    self, AnnotationGraph, EventKind, LabelMode, ModeContext, PointIndex, PointerEvent,
    RelabelError, SelectionTracker,
};
use crate::render::{self, RenderSpace, Scene, SceneInput};
use crate::transform::{self, CoordinateTransform, Size, ZoomLevel};

/// Errors surfaced to the user by editor commands.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The command needs an open image
    #[error("No image is open; create a project first")]
    NoProject,

    /// The command names a point that does not exist
    #[error("Point {0} does not exist")]
    UnknownPoint(PointIndex),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Relabel(#[from] RelabelError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// The point a secondary click landed on, for the shell's context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextTarget {
    pub index: PointIndex,
    pub is_pivot: bool,
}

/// What the shell should show after a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerOutcome {
    /// Cursor position in source coordinates, rounded for the status line
    pub status: Option<Point>,
    /// Set when a secondary press hit a point
    pub context: Option<ContextTarget>,
}

/// Annotation session over one image.
#[derive(Debug, Clone)]
pub struct Editor {
    config: AppConfig,
    image: Option<LoadedImage>,
    viewport: Size,
    working: Size,
    zoom: ZoomLevel,
    transform: CoordinateTransform,
    graph: AnnotationGraph,
    selection: SelectionTracker,
    mode: LabelMode,
    color: Color,
    last_dir: Option<PathBuf>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl Editor {
    pub fn new(config: AppConfig) -> Self {
        let mode = config.preferences.default_mode;
        let color = config.preferences.default_color;
        Self {
            config,
            image: None,
            viewport: Size::default(),
            working: Size::default(),
            zoom: ZoomLevel::default(),
            transform: CoordinateTransform::identity(),
            graph: AnnotationGraph::new(),
            selection: SelectionTracker::new(),
            mode,
            color,
            last_dir: None,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    pub fn has_project(&self) -> bool {
        self.image.is_some()
    }

    pub fn graph(&self) -> &AnnotationGraph {
        &self.graph
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn mode(&self) -> LabelMode {
        self.mode
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    /// Size of the working image the user annotates on.
    pub fn working_size(&self) -> Size {
        self.working
    }

    /// Directory to start the next file dialog in.
    pub fn last_dir(&self) -> Option<&Path> {
        self.last_dir.as_deref()
    }

    fn require_image(&self) -> Result<&LoadedImage, EditorError> {
        self.image.as_ref().ok_or(EditorError::NoProject)
    }

    // ========================================================================
    // Project Lifecycle
    // ========================================================================

    /// Load an image and start a fresh project on it.
    ///
    /// On failure the current project is left untouched.
    pub fn open_image(&mut self, source: &dyn ImageSource, path: &Path) -> Result<(), EditorError> {
        let image = source.load(path).inspect_err(|e| {
            log::warn!("{}", e);
        })?;
        self.reset();
        self.last_dir = image.directory().map(Path::to_path_buf);
        self.image = Some(image);
        self.refresh_working_size();
        log::info!(
            "Opened {:?}, working size {}x{}",
            path,
            self.working.width,
            self.working.height
        );
        Ok(())
    }

    /// Close the image and drop every annotation.
    pub fn close_project(&mut self) -> Result<(), EditorError> {
        self.require_image()?;
        self.reset();
        log::info!("Closed project");
        Ok(())
    }

    /// Drop every annotation but keep the image.
    pub fn clear_labels(&mut self) -> Result<(), EditorError> {
        self.require_image()?;
        self.graph.clear();
        self.selection.clear();
        log::info!("Cleared all labels");
        Ok(())
    }

    fn reset(&mut self) {
        self.image = None;
        self.working = Size::default();
        self.transform = CoordinateTransform::identity();
        self.graph.clear();
        self.selection.clear();
    }

    // ========================================================================
    // Viewport and Zoom
    // ========================================================================

    /// The view widget changed size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Size::new(width, height);
        self.refresh_working_size();
    }

    pub fn zoom_in(&mut self) -> u32 {
        self.set_zoom(self.zoom.zoomed_in())
    }

    pub fn zoom_out(&mut self) -> u32 {
        self.set_zoom(self.zoom.zoomed_out())
    }

    pub fn reset_zoom(&mut self) -> u32 {
        self.set_zoom(ZoomLevel::default())
    }

    /// Set the zoom from a slider value, clamped to the supported range.
    pub fn set_zoom_percent(&mut self, percent: u32) -> u32 {
        self.set_zoom(ZoomLevel::new(percent))
    }

    fn set_zoom(&mut self, zoom: ZoomLevel) -> u32 {
        self.zoom = zoom;
        self.refresh_working_size();
        log::debug!("Zoom {}%", zoom.percent());
        zoom.percent()
    }

    /// Recompute the working size and carry stored points over to it.
    fn refresh_working_size(&mut self) {
        let Some(image) = &self.image else {
            return;
        };
        let source = Size::new(image.width(), image.height());
        let new = if self.viewport.is_empty() {
            source
        } else {
            transform::working_size(source, self.viewport, self.zoom)
        };
        let old = if self.working.is_empty() {
            source
        } else {
            self.working
        };
        self.transform.update(source.width, old, new);
        self.transform.apply(&mut self.graph);
        self.working = new;
    }

    // ========================================================================
    // Modes and Pointer Input
    // ========================================================================

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Switch the editing mode, abandoning any gesture in progress.
    pub fn switch_mode(&mut self, mode: LabelMode) {
        self.cancel_gesture();
        self.mode = mode;
        log::debug!("Mode: {}", mode.name());
    }

    /// Abandon the gesture in progress, erasing the points it created.
    pub fn cancel_gesture(&mut self) {
        model::cancel_gesture(&mut self.graph, &mut self.selection);
    }

    fn mode_context(&self) -> ModeContext {
        ModeContext {
            color: self.color,
            point_width: self.config.style.point_width,
            eps: self.config.style.eps,
            width: f64::from(self.working.width),
            height: f64::from(self.working.height),
        }
    }

    fn nearest(&self, position: Point) -> Option<PointIndex> {
        self.graph
            .nearest_point(position, self.mode_context().hit_radius())
    }

    /// Feed one pointer event, in working coordinates, to the active mode.
    ///
    /// Ignored while no image is open.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerOutcome {
        let mut outcome = PointerOutcome::default();
        if self.image.is_none() {
            return outcome;
        }

        let ctx = self.mode_context();
        model::handle_event(
            self.mode,
            &event,
            &mut self.graph,
            &mut self.selection,
            &ctx,
        );

        if event.kind == EventKind::Move {
            self.selection.set_hover(self.nearest(event.position));
            let src = self.transform.display_to_source(event.position);
            outcome.status = Some(Point::new(geometry::round2(src.x), geometry::round2(src.y)));
        } else if event.is_secondary_press() {
            if let Some(index) = self.nearest(event.position) {
                self.cancel_gesture();
                self.selection.set_hover(Some(index));
                outcome.context = Some(ContextTarget {
                    index,
                    is_pivot: self.graph.is_pivot(index),
                });
            }
        }
        outcome
    }

    // ========================================================================
    // Point Commands
    // ========================================================================

    /// Give a point a new index. Asking for its current index does nothing.
    pub fn relabel(&mut self, index: PointIndex, new_index: i64) -> Result<PointIndex, EditorError> {
        self.require_image()?;
        if i64::from(index) == new_index {
            return Ok(index);
        }
        let new = self.graph.relabel(index, new_index).inspect_err(|e| {
            log::warn!("Relabel of point {} rejected: {}", index, e);
        })?;
        self.selection.relabel(index, new);
        Ok(new)
    }

    /// Flip pivot membership. Returns whether the point is a pivot afterwards.
    pub fn toggle_pivot(&mut self, index: PointIndex) -> Result<bool, EditorError> {
        self.require_image()?;
        if !self.graph.contains_point(index) {
            return Err(EditorError::UnknownPoint(index));
        }
        Ok(self.graph.toggle_pivot(index))
    }

    /// Erase a point and everything built on it.
    pub fn erase_point(&mut self, index: PointIndex) -> bool {
        let erased = self.graph.erase_point(index);
        if erased {
            self.selection.forget(index);
        }
        erased
    }

    /// Add detected landmarks as new pivot points in the active color.
    pub fn auto_add_points(
        &mut self,
        detector: &dyn PointDetector,
    ) -> Result<Vec<PointIndex>, EditorError> {
        let detected = detector.detect(self.require_image()?);
        let added: Vec<PointIndex> = detected
            .into_iter()
            .filter_map(|src| {
                let index = self
                    .graph
                    .add_point(self.transform.source_to_display(src), self.color)?;
                self.graph.add_pivot(index);
                Some(index)
            })
            .collect();
        log::info!("Auto-detection added {} points", added.len());
        Ok(added)
    }

    /// One `index: (x, y)` line per pivot, in source coordinates.
    pub fn pivot_summary(&self) -> Vec<String> {
        if self.image.is_none() {
            return Vec::new();
        }
        self.graph
            .pivots()
            .filter_map(|index| {
                let src = self.transform.display_to_source(self.graph.position(index)?);
                Some(format!("{}: ({:.2}, {:.2})", index, src.x, src.y))
            })
            .collect()
    }

    // ========================================================================
    // Import and Export
    // ========================================================================

    pub fn export_document(&self) -> Result<FullDocument, EditorError> {
        self.require_image()?;
        Ok(FullDocument::from_graph(&self.graph, &self.transform))
    }

    pub fn export_pivot_document(&self) -> Result<PivotDocument, EditorError> {
        self.require_image()?;
        Ok(PivotDocument::from_graph(&self.graph, &self.transform))
    }

    pub fn export_to_file(&self, path: &Path) -> Result<(), EditorError> {
        crate::format::write(&self.export_document()?, path)?;
        Ok(())
    }

    pub fn export_pivots_to_file(&self, path: &Path) -> Result<(), EditorError> {
        crate::format::write(&self.export_pivot_document()?, path)?;
        Ok(())
    }

    /// Replace every annotation with the contents of `document`.
    ///
    /// Nothing changes unless the whole document is valid.
    pub fn import_document(&mut self, document: &Document) -> Result<(), EditorError> {
        self.require_image()?;
        let graph = document
            .to_graph(&self.transform, self.config.preferences.default_color)
            .inspect_err(|e| log::warn!("Import rejected: {}", e))?;
        self.selection.clear();
        self.graph = graph;
        log::info!("Imported {} points", self.graph.point_count());
        Ok(())
    }

    pub fn import_from_str(&mut self, json: &str) -> Result<(), EditorError> {
        self.require_image()?;
        self.import_document(&Document::from_json(json)?)
    }

    pub fn import_from_file(&mut self, path: &Path) -> Result<(), EditorError> {
        self.require_image()?;
        self.import_document(&Document::read(path)?)
    }

    pub fn suggested_annotation_path(&self) -> Option<PathBuf> {
        self.image.as_ref().map(LoadedImage::suggested_annotation_path)
    }

    pub fn suggested_pivot_path(&self) -> Option<PathBuf> {
        self.image.as_ref().map(LoadedImage::suggested_pivot_path)
    }

    pub fn suggested_render_path(&self) -> Option<PathBuf> {
        self.image.as_ref().map(LoadedImage::suggested_render_path)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Scene for the painter. Empty while no image is open.
    pub fn scene(&self, space: RenderSpace) -> Scene {
        let empty = AnnotationGraph::new();
        let graph = if self.image.is_some() {
            &self.graph
        } else {
            &empty
        };
        render::build_scene(
            &SceneInput {
                graph,
                selection: &self.selection,
                mode: self.mode,
                transform: &self.transform,
                pixel_spacing: self.image.as_ref().and_then(|i| i.pixel_spacing),
                style: &self.config.style,
            },
            space,
        )
    }
}
