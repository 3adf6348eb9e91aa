//! Bird/pipe collision detection
//!
//! Bounding boxes are not enough: the bird is round and the pipes have a lip,
//! so near the gap edges a box test reports hits that never touch. Shapes are
//! compared pixel by pixel with `Mask::overlap`.

use super::bird::Bird;
use super::mask::Mask;
use super::pipe::Pipe;
use crate::settings::SimConfig;

/// Collision shapes shared by every bird and pipe of an episode
#[derive(Debug, Clone)]
pub struct CollisionShapes {
    pub bird: Mask,
    /// Hanging pipe, lip at the bottom
    pub pipe_top: Mask,
    /// Upright pipe, lip at the top
    pub pipe_bottom: Mask,
}

impl CollisionShapes {
    pub fn new(cfg: &SimConfig) -> Self {
        let p = &cfg.pipes;
        Self {
            bird: Mask::bird(cfg.bird.width, cfg.bird.height),
            pipe_top: Mask::pipe(p.width, p.height, p.lip_height, p.body_inset, false),
            pipe_bottom: Mask::pipe(p.width, p.height, p.lip_height, p.body_inset, true),
        }
    }
}

/// Integer offsets of a pipe's two sprites relative to the bird sprite
pub fn pipe_offsets(bird: &Bird, pipe: &Pipe) -> ((i32, i32), (i32, i32)) {
    let dx = pipe.x.round() as i32 - bird.x().round() as i32;
    let by = bird.y().round() as i32;
    let top = (dx, pipe.top.round() as i32 - by);
    let bottom = (dx, pipe.bottom.round() as i32 - by);
    (top, bottom)
}

/// True if the bird touches either half of the pipe pair
pub fn bird_hits_pipe(shapes: &CollisionShapes, bird: &Bird, pipe: &Pipe) -> bool {
    let (top_offset, bottom_offset) = pipe_offsets(bird, pipe);
    shapes.bird.overlap(&shapes.pipe_bottom, bottom_offset)
        || shapes.bird.overlap(&shapes.pipe_top, top_offset)
}
