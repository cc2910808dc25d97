//! Transform hierarchy.
//!
//! World transforms are resolved on demand by walking a layer's parent chain
//! through the scene index. Nothing is cached: the walk is cheap for rig
//! depths and always reflects the latest edits.
//!
//! Cycles are rejected when parents are assigned (see
//! [`Scene::set_parent`](crate::Scene::set_parent)). The walk is still bounded
//! by the number of layers so a corrupted index cannot hang a frame.

use glam::Vec2;
use rustc_hash::FxHashMap;

use puppet_core::LayerId;

use crate::layer::Layer;
use crate::ports::PuppetFollow;
use crate::transform::WorldTransform;

/// World transform of `layer`: its own transform composed with every ancestor.
///
/// A layer following a puppet anchor uses the followed position as its
/// parent origin instead of its ancestor chain, when `follow` provides one.
#[must_use]
pub fn resolve_world(
    layers: &FxHashMap<LayerId, Layer>,
    layer: &Layer,
    follow: &dyn PuppetFollow,
) -> WorldTransform {
    let local = layer.local_transform();
    if let Some(origin) = follow_origin(layer, follow) {
        return WorldTransform {
            position: origin + local.position,
            ..local
        };
    }
    compose_ancestors(layers, layer, local)
}

/// Accumulated transform of the ancestors of `layer`, excluding the layer
/// itself. Identity for root layers.
#[must_use]
pub fn parent_transform(
    layers: &FxHashMap<LayerId, Layer>,
    layer: &Layer,
    follow: &dyn PuppetFollow,
) -> WorldTransform {
    if let Some(origin) = follow_origin(layer, follow) {
        return WorldTransform {
            position: origin,
            ..WorldTransform::IDENTITY
        };
    }
    compose_ancestors(layers, layer, WorldTransform::IDENTITY)
}

fn follow_origin(layer: &Layer, follow: &dyn PuppetFollow) -> Option<Vec2> {
    if !layer.follow_puppet {
        return None;
    }
    follow.follow_position(layer.id)
}

fn compose_ancestors(
    layers: &FxHashMap<LayerId, Layer>,
    layer: &Layer,
    mut accumulated: WorldTransform,
) -> WorldTransform {
    let mut next = layer.parent;
    let mut steps = 0;

    while let Some(parent_id) = next {
        let Some(parent) = layers.get(&parent_id) else {
            break;
        };
        steps += 1;
        if steps > layers.len() {
            log::error!("Parent chain of layer {} does not terminate", layer.id);
            break;
        }
        accumulated = accumulated.in_parent(&parent.local_transform());
        next = parent.parent;
    }

    accumulated
}

/// Whether making `parent` the parent of `child` would close a loop, i.e.
/// `child` is `parent` or one of its ancestors.
#[must_use]
pub fn would_create_cycle(
    layers: &FxHashMap<LayerId, Layer>,
    child: LayerId,
    parent: LayerId,
) -> bool {
    let mut current = Some(parent);
    let mut steps = 0;
    while let Some(id) = current {
        if id == child {
            return true;
        }
        steps += 1;
        if steps > layers.len() {
            return true;
        }
        current = layers.get(&id).and_then(|l| l.parent);
    }
    false
}
