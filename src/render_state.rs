// render_state.rs - Render flags and scoped overrides
use std::ops::Deref;

/// How filled primitives are rasterised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolygonMode {
    #[default]
    Fill,
    Line,
}

/// Depth offset applied to outlined polygons (`factor` scales with slope)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthOffset {
    pub factor: f32,
    pub units: f32,
}

/// Rasterisation flags a draw call runs under
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderFlags {
    pub polygon_mode: PolygonMode,
    pub point_size: f32,
    pub line_width: f32,
    pub blend: bool,
    /// Depth offset for polygons drawn in `PolygonMode::Line`; `None` = disabled
    pub line_offset: Option<DepthOffset>,
    pub line_smooth: bool,
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self {
            polygon_mode: PolygonMode::Fill,
            point_size: 1.0,
            line_width: 1.0,
            blend: false,
            line_offset: None,
            line_smooth: false,
        }
    }
}

/// Current render flags. Changes go through `scoped`, which restores the
/// previous flags when the returned guard is dropped.
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    flags: RenderFlags,
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(flags: RenderFlags) -> Self {
        Self { flags }
    }

    pub fn flags(&self) -> &RenderFlags {
        &self.flags
    }

    /// Apply overrides until the guard goes out of scope
    pub fn scoped(&mut self, apply: impl FnOnce(&mut RenderFlags)) -> ScopedFlags<'_> {
        let saved = self.flags;
        apply(&mut self.flags);
        ScopedFlags { state: self, saved }
    }
}

/// Guard holding render-flag overrides; restores the saved flags on drop
#[derive(Debug)]
pub struct ScopedFlags<'a> {
    state: &'a mut RenderState,
    saved: RenderFlags,
}

impl ScopedFlags<'_> {
    /// Nest further overrides on top of this scope
    pub fn scoped(&mut self, apply: impl FnOnce(&mut RenderFlags)) -> ScopedFlags<'_> {
        self.state.scoped(apply)
    }
}

impl Deref for ScopedFlags<'_> {
    type Target = RenderFlags;

    fn deref(&self) -> &RenderFlags {
        &self.state.flags
    }
}

impl Drop for ScopedFlags<'_> {
    fn drop(&mut self) {
        self.state.flags = self.saved;
    }
}
