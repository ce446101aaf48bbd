//! src/animation/frame_loop.rs

use crate::animation::blob::{BlobAnimation, Frame, Point};
use crate::animation::Viewport;

pub type FrameId = u64;

/// The display side of the animation: pointer/resize subscriptions and a
/// refresh-rate frame scheduler (`requestAnimationFrame` in a browser).
pub trait FrameHost {
    fn viewport(&self) -> Viewport;

    fn subscribe(&mut self);

    fn unsubscribe(&mut self);

    fn request_frame(&mut self) -> FrameId;

    fn cancel_frame(&mut self, id: FrameId);
}

/// Drives a [`BlobAnimation`] from host callbacks.
///
/// Dropping the loop cancels the pending frame and removes the host
/// subscriptions, so a torn-down page never gets another tick.
pub struct AnimationLoop<H: FrameHost> {
    host: H,
    state: BlobAnimation,
    pending_frame: Option<FrameId>,
}

impl<H: FrameHost> AnimationLoop<H> {
    pub fn start(mut host: H, now: f64) -> Self {
        let state = BlobAnimation::centered(host.viewport(), now);
        host.subscribe();
        let pending_frame = Some(host.request_frame());

        Self {
            host,
            state,
            pending_frame,
        }
    }

    pub fn pointer_moved(&mut self, pointer: Point, now: f64) {
        self.state.pointer_moved(pointer, now);
    }

    pub fn resized(&mut self, now: f64) {
        let viewport = self.host.viewport();
        self.state.recenter(viewport, now);
    }

    /// Frame callback: renders one frame and schedules the next.
    pub fn on_frame(&mut self, now: f64) -> Frame {
        let frame = self.state.tick(now);
        self.pending_frame = Some(self.host.request_frame());
        frame
    }

    pub fn pending_frame(&self) -> Option<FrameId> {
        self.pending_frame
    }

    pub fn state(&self) -> &BlobAnimation {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: FrameHost> Drop for AnimationLoop<H> {
    fn drop(&mut self) {
        if let Some(id) = self.pending_frame.take() {
            self.host.cancel_frame(id);
        }
        self.host.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, PartialEq)]
    enum HostEvent {
        Subscribed,
        Unsubscribed,
        Requested(FrameId),
        Cancelled(FrameId),
    }

    struct RecordingHost {
        viewport: Viewport,
        next_frame: FrameId,
        events: Rc<RefCell<Vec<HostEvent>>>,
    }

    impl RecordingHost {
        fn new(events: Rc<RefCell<Vec<HostEvent>>>) -> Self {
            Self {
                viewport: Viewport {
                    width: 800.0,
                    height: 600.0,
                },
                next_frame: 1,
                events,
            }
        }
    }

    impl FrameHost for RecordingHost {
        fn viewport(&self) -> Viewport {
            self.viewport
        }

        fn subscribe(&mut self) {
            self.events.borrow_mut().push(HostEvent::Subscribed);
        }

        fn unsubscribe(&mut self) {
            self.events.borrow_mut().push(HostEvent::Unsubscribed);
        }

        fn request_frame(&mut self) -> FrameId {
            let id = self.next_frame;
            self.next_frame += 1;
            self.events.borrow_mut().push(HostEvent::Requested(id));
            id
        }

        fn cancel_frame(&mut self, id: FrameId) {
            self.events.borrow_mut().push(HostEvent::Cancelled(id));
        }
    }

    #[test]
    fn starting_subscribes_and_requests_the_first_frame() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let animation = AnimationLoop::start(RecordingHost::new(events.clone()), 0.0);

        assert_eq!(animation.pending_frame(), Some(1));
        assert_eq!(animation.state().target(), Point::new(400.0, 300.0));
        assert_eq!(
            *events.borrow(),
            vec![HostEvent::Subscribed, HostEvent::Requested(1)]
        );
    }

    #[test]
    fn every_frame_schedules_the_next_one() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut animation = AnimationLoop::start(RecordingHost::new(events.clone()), 0.0);

        animation.on_frame(16.0);
        animation.on_frame(32.0);

        assert_eq!(animation.pending_frame(), Some(3));
    }

    #[test]
    fn dropping_the_loop_releases_the_pending_frame_and_listeners() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut animation = AnimationLoop::start(RecordingHost::new(events.clone()), 0.0);
        animation.on_frame(16.0);

        drop(animation);

        assert_eq!(
            *events.borrow(),
            vec![
                HostEvent::Subscribed,
                HostEvent::Requested(1),
                HostEvent::Requested(2),
                HostEvent::Cancelled(2),
                HostEvent::Unsubscribed,
            ]
        );
    }

    #[test]
    fn resizing_recenters_on_the_new_viewport() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut animation = AnimationLoop::start(RecordingHost::new(events), 0.0);
        animation.pointer_moved(Point::new(10.0, 20.0), 8.0);

        animation.host_mut().viewport = Viewport {
            width: 1000.0,
            height: 500.0,
        };
        animation.resized(16.0);

        assert_eq!(animation.state().target(), Point::new(500.0, 250.0));
        assert_eq!(animation.host().viewport().width, 1000.0);
    }
}
