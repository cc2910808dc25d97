use glam::Vec2;
use rustc_hash::FxHashMap;

use puppet_animation::{BounceParams, PinId, WiggleParam};
use puppet_core::errors::{PuppetError, Result};
use puppet_core::time::frame_at;
use puppet_core::{EngineSettings, LayerId};

use crate::clipping::{ColorClipping, pick_clip_color};
use crate::layer::{Layer, LayerImage};
use crate::ports::{AudioSync, NoPuppetFollow, PuppetFollow, SilentAudio};
use crate::transform::WorldTransform;
use crate::transform_system::{parent_transform, resolve_world, would_create_cycle};

/// The editing and evaluation context of one puppet project.
///
/// Owns every layer through an id index plus a bottom-to-top draw order, the
/// playhead, the selection and the injected capability ports.
///
/// Editing methods that target a missing or wrong-typed layer leave the scene
/// untouched, log a warning and return the error for the caller to report.
pub struct Scene {
    layers: FxHashMap<LayerId, Layer>,
    draw_order: Vec<LayerId>,
    next_id: u32,
    selection: Vec<LayerId>,

    current_time: f32,
    fps: f32,

    audio: Box<dyn AudioSync>,
    follow: Box<dyn PuppetFollow>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(EngineSettings::default().fps)
    }
}

impl Scene {
    #[must_use]
    pub fn new(fps: f32) -> Self {
        Self {
            layers: FxHashMap::default(),
            draw_order: Vec::new(),
            next_id: 1,
            selection: Vec::new(),
            current_time: 0.0,
            fps,
            audio: Box::new(SilentAudio),
            follow: Box::new(NoPuppetFollow),
        }
    }

    #[must_use]
    pub fn with_settings(settings: &EngineSettings) -> Self {
        Self::new(settings.fps)
    }

    // ========================================================================
    // Layers
    // ========================================================================

    pub fn build_layer(&mut self, name: &str) -> LayerBuilder<'_> {
        LayerBuilder::new(self, name)
    }

    /// Adds `layer` on top of the draw order under a freshly assigned id.
    ///
    /// The requested parent goes through the same checks as
    /// [`Scene::set_parent`]; a missing parent leaves the layer a root.
    pub fn add_layer(&mut self, mut layer: Layer) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        layer.id = id;
        let parent = layer.parent.take();
        let name = layer.name.clone();

        self.layers.insert(id, layer);
        self.draw_order.push(id);

        if let Err(err) = self.try_set_parent(id, parent) {
            log::warn!("Layer '{name}' added as a root: {err}");
        }
        id
    }

    /// Removes a layer. Its children become roots and it leaves the selection.
    pub fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        let layer = self.layers.remove(&id)?;
        self.draw_order.retain(|l| *l != id);
        self.selection.retain(|l| *l != id);
        for child in self.layers.values_mut().filter(|l| l.parent == Some(id)) {
            child.parent = None;
        }
        Some(layer)
    }

    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.get_mut(&id)
    }

    /// Layers bottom to top.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.draw_order.iter().filter_map(|id| self.layers.get(id))
    }

    #[must_use]
    pub fn draw_order(&self) -> &[LayerId] {
        &self.draw_order
    }

    #[must_use]
    pub fn layer_index(&self) -> &FxHashMap<LayerId, Layer> {
        &self.layers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    fn require(&self, id: LayerId) -> Result<&Layer> {
        self.layers.get(&id).ok_or(PuppetError::LayerNotFound(id))
    }

    fn require_mut(&mut self, id: LayerId) -> Result<&mut Layer> {
        self.layers.get_mut(&id).ok_or(PuppetError::LayerNotFound(id))
    }

    fn require_bounce(&mut self, id: LayerId) -> Result<&mut BounceParams> {
        self.require_mut(id)?
            .bounce_mut()
            .ok_or(PuppetError::NotABounceLayer(id))
    }

    // ========================================================================
    // Time & Selection
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Moves the playhead. Negative times clamp to zero; non-finite times
    /// are ignored.
    pub fn set_current_time(&mut self, time: f32) {
        if !time.is_finite() {
            log::warn!("Ignoring non-finite playhead time {time}");
            return;
        }
        self.current_time = time.max(0.0);
    }

    #[inline]
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// `floor(current_time * fps)`.
    #[inline]
    #[must_use]
    pub fn current_frame(&self) -> i64 {
        frame_at(self.current_time, self.fps)
    }

    /// Replaces the selection. Unknown ids are dropped.
    pub fn select(&mut self, ids: &[LayerId]) {
        self.selection = ids
            .iter()
            .copied()
            .filter(|id| self.layers.contains_key(id))
            .collect();
    }

    #[must_use]
    pub fn selection(&self) -> &[LayerId] {
        &self.selection
    }

    /// The primary selected layer.
    pub fn selected(&self) -> Result<LayerId> {
        self.selection.first().copied().ok_or(PuppetError::NoSelection)
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Re-parents `child`, or detaches it with `None`.
    ///
    /// Rejects parents that would make `child` its own ancestor.
    pub fn set_parent(&mut self, child: LayerId, parent: Option<LayerId>) -> Result<()> {
        let result = self.try_set_parent(child, parent);
        if let Err(err) = &result {
            log::warn!("set_parent rejected: {err}");
        }
        result
    }

    fn try_set_parent(&mut self, child: LayerId, parent: Option<LayerId>) -> Result<()> {
        self.require(child)?;
        if let Some(parent) = parent {
            self.require(parent)?;
            if would_create_cycle(&self.layers, child, parent) {
                return Err(PuppetError::ParentCycle { child, parent });
            }
        }
        self.require_mut(child)?.parent = parent;
        Ok(())
    }

    pub fn world_transform(&self, id: LayerId) -> Result<WorldTransform> {
        let layer = self.require(id)?;
        Ok(resolve_world(&self.layers, layer, self.follow.as_ref()))
    }

    pub fn parent_transform(&self, id: LayerId) -> Result<WorldTransform> {
        let layer = self.require(id)?;
        Ok(parent_transform(&self.layers, layer, self.follow.as_ref()))
    }

    /// Sets the normalized anchor, clamped to `[0, 1]`.
    pub fn set_anchor(&mut self, id: LayerId, anchor: Vec2) -> Result<()> {
        self.require_mut(id)
            .map(|layer| layer.set_anchor(anchor))
            .inspect_err(|err| log::warn!("set_anchor: {err}"))
    }

    // ========================================================================
    // Keyframes & Pins
    // ========================================================================

    /// Snapshots the layer's motion settings at the current frame.
    ///
    /// Returns the frame the keyframe was placed on.
    pub fn insert_keyframe(&mut self, id: LayerId) -> Result<i64> {
        let frame = self.current_frame();
        let result = self.try_insert_keyframe(id, frame);
        match &result {
            Ok(()) => log::info!("Keyframe inserted on layer {id} at frame {frame}"),
            Err(err) => log::warn!("insert_keyframe: {err}"),
        }
        result.map(|()| frame)
    }

    fn try_insert_keyframe(&mut self, id: LayerId, frame: i64) -> Result<()> {
        let layer = self.require(id)?;
        let (position, anchor) = (layer.position, layer.anchor);
        self.require_bounce(id)?.insert_keyframe(frame, position, anchor);
        Ok(())
    }

    /// [`Scene::insert_keyframe`] on the primary selected layer.
    pub fn insert_keyframe_for_selection(&mut self) -> Result<i64> {
        let id = self
            .selected()
            .inspect_err(|err| log::warn!("insert_keyframe_for_selection: {err}"))?;
        self.insert_keyframe(id)
    }

    /// Removes the keyframe on `frame`. Returns whether one existed.
    pub fn remove_keyframe(&mut self, id: LayerId, frame: i64) -> Result<bool> {
        self.require_bounce(id)
            .map(|bounce| bounce.remove_keyframe(frame).is_some())
            .inspect_err(|err| log::warn!("remove_keyframe: {err}"))
    }

    /// [`Scene::remove_keyframe`] on the primary selected layer at the
    /// current frame.
    pub fn remove_keyframe_for_selection(&mut self) -> Result<bool> {
        let id = self
            .selected()
            .inspect_err(|err| log::warn!("remove_keyframe_for_selection: {err}"))?;
        let frame = self.current_frame();
        self.remove_keyframe(id, frame)
    }

    /// Adds a sway pin to the layer's live settings.
    pub fn add_pin(&mut self, id: LayerId, position: f32, range: f32) -> Result<PinId> {
        self.require_bounce(id)
            .map(|bounce| bounce.add_pin(position, range))
            .inspect_err(|err| log::warn!("add_pin: {err}"))
    }

    pub fn remove_pin(&mut self, id: LayerId, pin: PinId) -> Result<()> {
        let result = self.require_bounce(id).and_then(|bounce| {
            bounce
                .remove_pin(pin)
                .map(|_| ())
                .ok_or(PuppetError::PinNotFound { layer: id, pin: pin.0 })
        });
        if let Err(err) = &result {
            log::warn!("remove_pin: {err}");
        }
        result
    }

    // ========================================================================
    // Wiggle
    // ========================================================================

    /// Turns the layer's wiggle on, starting at absolute time `start_time`.
    pub fn enable_wiggle(&mut self, id: LayerId, start_time: f32) -> Result<()> {
        self.require_mut(id)
            .map(|layer| layer.wiggle.enable(start_time))
            .inspect_err(|err| log::warn!("enable_wiggle: {err}"))
    }

    pub fn disable_wiggle(&mut self, id: LayerId) -> Result<()> {
        self.require_mut(id)
            .map(|layer| layer.wiggle.disable())
            .inspect_err(|err| log::warn!("disable_wiggle: {err}"))
    }

    pub fn set_wiggle_param(&mut self, id: LayerId, param: WiggleParam) -> Result<()> {
        self.require_mut(id)
            .map(|layer| layer.wiggle.set(param))
            .inspect_err(|err| log::warn!("set_wiggle_param: {err}"))
    }

    // ========================================================================
    // Color Clipping
    // ========================================================================

    pub fn set_color_clipping(&mut self, id: LayerId, clipping: ColorClipping) -> Result<()> {
        self.require_mut(id)
            .map(|layer| layer.color_clipping = Some(clipping))
            .inspect_err(|err| log::warn!("set_color_clipping: {err}"))
    }

    /// Picks the clip color of `id` from its reference layer at source pixel
    /// `(x, y)` and stores it.
    pub fn pick_clip_color(&mut self, id: LayerId, x: i64, y: i64) -> Result<[u8; 3]> {
        let result = self.try_pick_clip_color(id, x, y);
        if let Err(err) = &result {
            log::warn!("pick_clip_color: {err}");
        }
        result
    }

    fn try_pick_clip_color(&mut self, id: LayerId, x: i64, y: i64) -> Result<[u8; 3]> {
        let reference = self
            .require(id)?
            .color_clipping
            .and_then(|c| c.reference)
            .ok_or_else(|| {
                PuppetError::InvalidSettings(format!("layer {id} has no clipping reference"))
            })?;
        let color = match &self.require(reference)?.image {
            Some(image) => pick_clip_color(image.pixels(), x, y)?,
            None => return Err(PuppetError::TransparentPick),
        };
        self.require_mut(id)?.color_clipping_mut().color = color;
        Ok(color)
    }

    // ========================================================================
    // Ports
    // ========================================================================

    pub fn set_audio_sync(&mut self, audio: Box<dyn AudioSync>) {
        self.audio = audio;
    }

    pub fn audio_sync_mut(&mut self) -> &mut dyn AudioSync {
        self.audio.as_mut()
    }

    pub fn set_puppet_follow(&mut self, follow: Box<dyn PuppetFollow>) {
        self.follow = follow;
    }

    #[must_use]
    pub fn puppet_follow(&self) -> &dyn PuppetFollow {
        self.follow.as_ref()
    }
}

/// Chained construction of a layer that is inserted on [`LayerBuilder::build`].
pub struct LayerBuilder<'a> {
    scene: &'a mut Scene,
    layer: Layer,
}

impl<'a> LayerBuilder<'a> {
    pub fn new(scene: &'a mut Scene, name: &str) -> Self {
        Self {
            scene,
            layer: Layer::new(name),
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<LayerImage>) -> Self {
        self.layer.set_image(image.into());
        self
    }

    /// Turns the layer into a bounce/sway layer with default settings.
    #[must_use]
    pub fn with_bounce(mut self) -> Self {
        self.layer.kind = crate::layer::LayerKind::Bounce;
        self.layer.bounce = Some(BounceParams::default());
        self
    }

    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.layer.position = Vec2::new(x, y);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.layer.rotation = degrees;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.layer.set_scale(scale);
        self
    }

    #[must_use]
    pub fn with_anchor(mut self, x: f32, y: f32) -> Self {
        self.layer.set_anchor(Vec2::new(x, y));
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: LayerId) -> Self {
        self.layer.parent = Some(parent);
        self
    }

    pub fn build(self) -> LayerId {
        self.scene.add_layer(self.layer)
    }
}
