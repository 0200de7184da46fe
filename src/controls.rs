// controls.rs — gesture state machine: drag, pinch, wheel and inertia
//
// Input handlers never touch the view directly; they return `ControlEvent`s
// that the caller folds into the store. Coasting is advanced by `tick`, once
// per rendered frame.

use crate::catalog;
use glam::Vec2;
use std::collections::BTreeMap;

pub const INERTIA_FACTOR: f32 = 0.95;
pub const ROTATION_SENSITIVITY: f32 = 0.005;
pub const ZOOM_SENSITIVITY: f32 = 0.1;
/// Extra scale applied to finger-distance changes during a pinch.
pub const PINCH_SCALE: f32 = 0.01;

const MOTION_EPSILON: f32 = 0.0001;
/// The decay factor is defined per frame at this rate.
const REFERENCE_FRAME_SECS: f32 = 1.0 / 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// Rotation deltas in radians: `dx` from horizontal motion, `dy` from vertical.
    Rotate { dx: f32, dy: f32 },
    /// Additive zoom change, not yet clamped.
    Zoom(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlOptions {
    pub sensitivity: f32,
    pub inertia_factor: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            sensitivity: ROTATION_SENSITIVITY,
            inertia_factor: INERTIA_FACTOR,
            min_zoom: catalog::MIN_ZOOM,
            max_zoom: catalog::MAX_ZOOM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Motion {
    #[default]
    Idle,
    Dragging,
    Pinching { distance: f32 },
    Coasting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Keeps the live finger set so per-finger window events can be replayed as
/// whole touch lists. Fingers are ordered by id.
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    fingers: BTreeMap<u64, Vec2>,
}

impl TouchTracker {
    pub fn update(&mut self, phase: TouchPhase, id: u64, position: Vec2) {
        match phase {
            TouchPhase::Started | TouchPhase::Moved => {
                self.fingers.insert(id, position);
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.fingers.remove(&id);
            }
        }
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.fingers.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.fingers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingers.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PanoramaControls {
    options: ControlOptions,
    motion: Motion,
    last_pos: Vec2,
    velocity: Vec2,
    touches: TouchTracker,
}

impl PanoramaControls {
    pub fn new(options: ControlOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.motion == Motion::Dragging
    }

    pub fn is_coasting(&self) -> bool {
        self.motion == Motion::Coasting
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        catalog::clamp_zoom(zoom, self.options.min_zoom, self.options.max_zoom)
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.start_drag(pos);
    }

    pub fn pointer_move(&mut self, pos: Vec2) -> Option<ControlEvent> {
        if self.motion != Motion::Dragging {
            return None;
        }
        Some(self.drag_to(pos))
    }

    pub fn pointer_up(&mut self) {
        self.release();
    }

    /// `scroll` follows the window system: positive when the wheel turns away
    /// from the user, which zooms in.
    pub fn wheel(&mut self, scroll: f32) -> Option<ControlEvent> {
        if scroll > 0.0 {
            Some(ControlEvent::Zoom(ZOOM_SENSITIVITY))
        } else if scroll < 0.0 {
            Some(ControlEvent::Zoom(-ZOOM_SENSITIVITY))
        } else {
            None
        }
    }

    pub fn touch_start(&mut self, touches: &[Vec2]) {
        match touches {
            [single] => self.start_drag(*single),
            [a, b] => {
                self.velocity = Vec2::ZERO;
                self.motion = Motion::Pinching {
                    distance: a.distance(*b),
                };
            }
            _ => {}
        }
    }

    pub fn touch_move(&mut self, touches: &[Vec2]) -> Option<ControlEvent> {
        match (touches, self.motion) {
            ([single], Motion::Dragging) => Some(self.drag_to(*single)),
            ([a, b], Motion::Pinching { distance }) => {
                let current = a.distance(*b);
                self.motion = Motion::Pinching { distance: current };
                Some(ControlEvent::Zoom(
                    (current - distance) * ZOOM_SENSITIVITY * PINCH_SCALE,
                ))
            }
            ([a, b], _) => {
                self.motion = Motion::Pinching {
                    distance: a.distance(*b),
                };
                None
            }
            _ => None,
        }
    }

    pub fn touch_end(&mut self) {
        self.release();
    }

    /// Feeds one per-finger window event through the tracker.
    pub fn touch(&mut self, phase: TouchPhase, id: u64, position: Vec2) -> Option<ControlEvent> {
        self.touches.update(phase, id, position);
        let fingers = self.touches.positions();
        match phase {
            TouchPhase::Started => {
                self.touch_start(&fingers);
                None
            }
            TouchPhase::Moved => self.touch_move(&fingers),
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touch_end();
                None
            }
        }
    }

    /// Advances coasting by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> Option<ControlEvent> {
        if self.motion != Motion::Coasting || dt <= 0.0 {
            return None;
        }
        if self.velocity == Vec2::ZERO {
            self.motion = Motion::Idle;
            return None;
        }

        let decay = self.options.inertia_factor.powf(dt / REFERENCE_FRAME_SECS);
        self.velocity *= decay;

        if self.is_moving() {
            Some(ControlEvent::Rotate {
                dx: self.velocity.x,
                dy: self.velocity.y,
            })
        } else {
            self.velocity = Vec2::ZERO;
            self.motion = Motion::Idle;
            None
        }
    }

    /// Stops any coasting; used when the view goes away.
    pub fn cancel(&mut self) {
        self.motion = Motion::Idle;
        self.velocity = Vec2::ZERO;
        self.touches = TouchTracker::default();
    }

    fn start_drag(&mut self, pos: Vec2) {
        self.motion = Motion::Dragging;
        self.last_pos = pos;
        self.velocity = Vec2::ZERO;
    }

    fn drag_to(&mut self, pos: Vec2) -> ControlEvent {
        self.velocity = (pos - self.last_pos) * self.options.sensitivity;
        self.last_pos = pos;
        ControlEvent::Rotate {
            dx: self.velocity.x,
            dy: self.velocity.y,
        }
    }

    fn release(&mut self) {
        match self.motion {
            Motion::Dragging | Motion::Pinching { .. } => {
                self.motion = if self.is_moving() {
                    Motion::Coasting
                } else {
                    Motion::Idle
                };
            }
            Motion::Idle | Motion::Coasting => {}
        }
    }

    fn is_moving(&self) -> bool {
        self.velocity.x.abs() > MOTION_EPSILON || self.velocity.y.abs() > MOTION_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn rotate(event: Option<ControlEvent>) -> (f32, f32) {
        match event {
            Some(ControlEvent::Rotate { dx, dy }) => (dx, dy),
            other => panic!("expected rotation, got {other:?}"),
        }
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut controls = PanoramaControls::default();
        assert_eq!(controls.pointer_move(Vec2::new(10.0, 10.0)), None);
    }

    #[test]
    fn drag_emits_scaled_deltas() {
        let mut controls = PanoramaControls::default();
        controls.pointer_down(Vec2::new(100.0, 100.0));
        assert!(controls.is_dragging());

        let (dx, dy) = rotate(controls.pointer_move(Vec2::new(110.0, 96.0)));
        assert!((dx - 10.0 * ROTATION_SENSITIVITY).abs() < 1e-6);
        assert!((dy + 4.0 * ROTATION_SENSITIVITY).abs() < 1e-6);

        // deltas are relative to the previous move, not the press
        let (dx, _) = rotate(controls.pointer_move(Vec2::new(112.0, 96.0)));
        assert!((dx - 2.0 * ROTATION_SENSITIVITY).abs() < 1e-6);
    }

    #[test]
    fn custom_sensitivity_is_used() {
        let mut controls = PanoramaControls::new(ControlOptions {
            sensitivity: 0.01,
            ..ControlOptions::default()
        });
        controls.pointer_down(Vec2::ZERO);
        let (dx, _) = rotate(controls.pointer_move(Vec2::new(5.0, 0.0)));
        assert!((dx - 0.05).abs() < 1e-6);
    }

    #[test]
    fn release_after_motion_coasts_and_decays() {
        let mut controls = PanoramaControls::default();
        controls.pointer_down(Vec2::ZERO);
        controls.pointer_move(Vec2::new(20.0, 0.0));
        controls.pointer_up();
        assert!(!controls.is_dragging());
        assert!(controls.is_coasting());

        let before = controls.velocity().x;
        let (dx, dy) = rotate(controls.tick(FRAME));
        assert!((dx - before * INERTIA_FACTOR).abs() < 1e-6);
        assert_eq!(dy, 0.0);

        let (dx2, _) = rotate(controls.tick(FRAME));
        assert!(dx2 < dx);
    }

    #[test]
    fn coasting_stops_below_threshold() {
        let mut controls = PanoramaControls::default();
        controls.pointer_down(Vec2::ZERO);
        controls.pointer_move(Vec2::new(1.0, 0.0));
        controls.pointer_up();

        let mut frames = 0;
        while controls.tick(FRAME).is_some() {
            frames += 1;
            assert!(frames < 1000, "inertia never settled");
        }
        assert!(!controls.is_coasting());
        assert_eq!(controls.velocity(), Vec2::ZERO);
        assert_eq!(controls.tick(FRAME), None);
    }

    #[test]
    fn decay_scales_with_elapsed_time() {
        let mut a = PanoramaControls::default();
        let mut b = PanoramaControls::default();
        for c in [&mut a, &mut b] {
            c.pointer_down(Vec2::ZERO);
            c.pointer_move(Vec2::new(40.0, 0.0));
            c.pointer_up();
        }
        a.tick(FRAME);
        a.tick(FRAME);
        b.tick(2.0 * FRAME);
        assert!((a.velocity().x - b.velocity().x).abs() < 1e-6);
    }

    #[test]
    fn release_without_motion_does_not_coast() {
        let mut controls = PanoramaControls::default();
        controls.pointer_down(Vec2::new(5.0, 5.0));
        controls.pointer_move(Vec2::new(5.0, 5.0));
        controls.pointer_up();
        assert!(!controls.is_coasting());
        assert_eq!(controls.tick(FRAME), None);
    }

    #[test]
    fn press_cancels_inertia() {
        let mut controls = PanoramaControls::default();
        controls.pointer_down(Vec2::ZERO);
        controls.pointer_move(Vec2::new(30.0, 30.0));
        controls.pointer_up();
        assert!(controls.is_coasting());

        controls.pointer_down(Vec2::new(1.0, 1.0));
        assert!(!controls.is_coasting());
        assert_eq!(controls.velocity(), Vec2::ZERO);
        assert_eq!(controls.tick(FRAME), None);
    }

    #[test]
    fn wheel_direction_maps_to_fixed_steps() {
        let mut controls = PanoramaControls::default();
        assert_eq!(controls.wheel(1.0), Some(ControlEvent::Zoom(ZOOM_SENSITIVITY)));
        assert_eq!(controls.wheel(-3.0), Some(ControlEvent::Zoom(-ZOOM_SENSITIVITY)));
        assert_eq!(controls.wheel(0.0), None);
    }

    #[test]
    fn single_touch_drags_like_a_pointer() {
        let mut controls = PanoramaControls::default();
        controls.touch_start(&[Vec2::new(0.0, 0.0)]);
        assert!(controls.is_dragging());
        let (dx, dy) = rotate(controls.touch_move(&[Vec2::new(0.0, 10.0)]));
        assert_eq!(dx, 0.0);
        assert!((dy - 10.0 * ROTATION_SENSITIVITY).abs() < 1e-6);
        controls.touch_end();
        assert!(controls.is_coasting());
    }

    #[test]
    fn pinch_zooms_by_distance_change() {
        let mut controls = PanoramaControls::default();
        controls.touch_start(&[Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)]);
        assert!(!controls.is_dragging());

        match controls.touch_move(&[Vec2::new(0.0, 0.0), Vec2::new(150.0, 0.0)]) {
            Some(ControlEvent::Zoom(d)) => assert!((d - 50.0 * 0.001).abs() < 1e-6),
            other => panic!("expected zoom, got {other:?}"),
        }
        // the baseline follows the fingers
        match controls.touch_move(&[Vec2::new(0.0, 0.0), Vec2::new(140.0, 0.0)]) {
            Some(ControlEvent::Zoom(d)) => assert!((d + 10.0 * 0.001).abs() < 1e-6),
            other => panic!("expected zoom, got {other:?}"),
        }
    }

    #[test]
    fn lifting_one_pinch_finger_does_not_resume_drag() {
        let mut controls = PanoramaControls::default();
        controls.touch(TouchPhase::Started, 1, Vec2::new(0.0, 0.0));
        controls.touch(TouchPhase::Started, 2, Vec2::new(50.0, 0.0));
        controls.touch(TouchPhase::Ended, 2, Vec2::new(50.0, 0.0));
        assert_eq!(controls.touch(TouchPhase::Moved, 1, Vec2::new(20.0, 0.0)), None);
        assert!(!controls.is_coasting());
    }

    #[test]
    fn tracker_replays_finger_sets() {
        let mut controls = PanoramaControls::default();
        assert_eq!(controls.touch(TouchPhase::Started, 7, Vec2::new(0.0, 0.0)), None);
        assert!(controls.is_dragging());
        let event = controls.touch(TouchPhase::Moved, 7, Vec2::new(4.0, 0.0));
        assert!(matches!(event, Some(ControlEvent::Rotate { .. })));

        controls.touch(TouchPhase::Started, 9, Vec2::new(104.0, 0.0));
        let event = controls.touch(TouchPhase::Moved, 9, Vec2::new(124.0, 0.0));
        assert!(matches!(event, Some(ControlEvent::Zoom(d)) if d > 0.0));
    }

    #[test]
    fn tracker_orders_fingers_and_forgets_ended_ones() {
        let mut tracker = TouchTracker::default();
        tracker.update(TouchPhase::Started, 5, Vec2::new(5.0, 0.0));
        tracker.update(TouchPhase::Started, 2, Vec2::new(2.0, 0.0));
        assert_eq!(tracker.positions(), vec![Vec2::new(2.0, 0.0), Vec2::new(5.0, 0.0)]);
        tracker.update(TouchPhase::Cancelled, 2, Vec2::ZERO);
        assert_eq!(tracker.len(), 1);
        tracker.update(TouchPhase::Ended, 5, Vec2::ZERO);
        assert!(tracker.is_empty());
    }

    #[test]
    fn cancel_stops_everything() {
        let mut controls = PanoramaControls::default();
        controls.pointer_down(Vec2::ZERO);
        controls.pointer_move(Vec2::new(50.0, 0.0));
        controls.pointer_up();
        controls.cancel();
        assert_eq!(controls.tick(FRAME), None);
        assert_eq!(controls.velocity(), Vec2::ZERO);
    }

    #[test]
    fn clamp_zoom_uses_configured_range() {
        let controls = PanoramaControls::new(ControlOptions {
            min_zoom: 2.0,
            max_zoom: 3.0,
            ..ControlOptions::default()
        });
        assert_eq!(controls.clamp_zoom(1.0), 2.0);
        assert_eq!(controls.clamp_zoom(9.0), 3.0);
        assert_eq!(PanoramaControls::default().clamp_zoom(0.0), 1.0);
    }
}
