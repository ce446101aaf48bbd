//! Per-frame model of the landing page's pointer-driven blob.

mod blob;
mod frame_loop;

pub use blob::{
    BlobAnimation, BubbleConfig, BubbleFrame, Frame, Point, Viewport, WaterFilter, BUBBLES,
};
pub use frame_loop::{AnimationLoop, FrameHost, FrameId};
