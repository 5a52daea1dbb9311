//! Smooth interpolation of the displayed view window.
//!
//! Two states: idle (no target) and animating (easing `current` toward
//! `target`). There is no physics — each step moves every field by a fixed
//! fraction of its remaining delta, with the fraction adapted to how big the
//! jump is so large camera moves don't crawl and small ones don't snap.
//!
//! Animation runs in stable scene coordinates; the translation into display
//! coordinates (scene minimum-bound offset plus padding) happens only at
//! paint time in [`ViewportAnimator::frame`]. Recomputing bounds every frame
//! inside the interpolation would make the camera jitter as elements stream
//! in.

use crate::elements::ViewportCommand;

/// Below this combined L1 distance the animation is considered arrived.
const SETTLE_DISTANCE: f64 = 0.5;

#[derive(Debug, Default)]
pub struct ViewportAnimator {
    current: Option<ViewportCommand>,
    target: Option<ViewportCommand>,
}

impl ViewportAnimator {
    pub fn new() -> Self {
        ViewportAnimator::default()
    }

    /// The window being displayed right now, or the default frame before any
    /// content has been shown.
    pub fn current(&self) -> ViewportCommand {
        self.current.unwrap_or_default()
    }

    pub fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    /// Aim at a freshly classified viewport command. The first target ever
    /// seen becomes `current` directly — no animation on first paint. A new
    /// target while one is in flight simply replaces it; the in-progress
    /// position is the new starting point.
    pub fn set_target(&mut self, cmd: ViewportCommand) {
        match self.current {
            None => {
                self.current = Some(cmd);
                self.target = None;
            }
            Some(cur) => {
                if cur.distance_to(&cmd) <= SETTLE_DISTANCE {
                    // Too close to animate, but the request is still the
                    // truth: land on it exactly, as step() does on arrival.
                    self.current = Some(cmd);
                    self.target = None;
                } else {
                    self.target = Some(cmd);
                }
            }
        }
    }

    /// Advance one display refresh. Returns true while another step should
    /// be scheduled; once within settle distance the animator snaps to the
    /// target and goes idle.
    pub fn step(&mut self) -> bool {
        let (mut cur, target) = match (self.current, self.target) {
            (Some(c), Some(t)) => (c, t),
            _ => return false,
        };

        let distance = cur.distance_to(&target);
        let fraction = if distance > 500.0 {
            0.08
        } else if distance > 100.0 {
            0.05
        } else {
            0.025
        };

        cur.x += (target.x - cur.x) * fraction;
        cur.y += (target.y - cur.y) * fraction;
        cur.width += (target.width - cur.width) * fraction;
        cur.height += (target.height - cur.height) * fraction;

        if cur.distance_to(&target) > SETTLE_DISTANCE {
            self.current = Some(cur);
            true
        } else {
            self.current = Some(target);
            self.target = None;
            false
        }
    }

    /// Cancel any in-flight animation (teardown, or a pass that replaced the
    /// camera wholesale). `current` keeps its last value.
    pub fn cancel(&mut self) {
        self.target = None;
    }

    /// Translate the animated window into display coordinates: subtract the
    /// scene minimum-bound offset and pad the frame on every side.
    pub fn frame(&self, scene_min: (f64, f64), padding: f64) -> ViewportCommand {
        let cur = self.current();
        ViewportCommand {
            x: cur.x - scene_min.0 - padding,
            y: cur.y - scene_min.1 - padding,
            width: cur.width + padding * 2.0,
            height: cur.height + padding * 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_target_applies_without_animation() {
        let mut anim = ViewportAnimator::new();
        assert_eq!(anim.current(), ViewportCommand::default());

        anim.set_target(ViewportCommand::new(10.0, 20.0, 800.0, 600.0));
        assert!(!anim.is_animating());
        assert_eq!(anim.current().x, 10.0);
        assert!(!anim.step());
    }

    #[test]
    fn near_target_snaps_exactly_instead_of_animating() {
        let mut anim = ViewportAnimator::new();
        anim.set_target(ViewportCommand::new(0.0, 0.0, 800.0, 600.0));

        let nudge = ViewportCommand::new(0.2, 0.1, 800.0, 600.1);
        anim.set_target(nudge);
        assert!(!anim.is_animating());
        assert_eq!(anim.current(), nudge);
        assert!(!anim.step());
    }

    #[test]
    fn converges_and_stops_scheduling() {
        let mut anim = ViewportAnimator::new();
        anim.set_target(ViewportCommand::new(0.0, 0.0, 100.0, 100.0));
        let target = ViewportCommand::new(2000.0, -500.0, 1600.0, 900.0);
        anim.set_target(target);
        assert!(anim.is_animating());

        let mut steps = 0;
        while anim.step() {
            steps += 1;
            assert!(steps < 10_000, "animator failed to converge");
        }
        assert!(anim.current().distance_to(&target) <= 0.5);
        assert!(!anim.is_animating());
        assert!(!anim.step());
    }

    #[test]
    fn big_jumps_move_faster() {
        let mut anim = ViewportAnimator::new();
        anim.set_target(ViewportCommand::new(0.0, 0.0, 0.0, 0.0));
        anim.set_target(ViewportCommand::new(1000.0, 0.0, 0.0, 0.0));
        anim.step();
        // distance 1000 > 500, so the first step covers 8%.
        assert!((anim.current().x - 80.0).abs() < 1e-9);

        let mut anim = ViewportAnimator::new();
        anim.set_target(ViewportCommand::new(0.0, 0.0, 0.0, 0.0));
        anim.set_target(ViewportCommand::new(50.0, 0.0, 0.0, 0.0));
        anim.step();
        // distance 50 <= 100: slowest fraction.
        assert!((anim.current().x - 1.25).abs() < 1e-9);
    }

    #[test]
    fn retarget_mid_flight_restarts_from_current() {
        let mut anim = ViewportAnimator::new();
        anim.set_target(ViewportCommand::new(0.0, 0.0, 100.0, 100.0));
        anim.set_target(ViewportCommand::new(1000.0, 0.0, 100.0, 100.0));
        anim.step();
        let mid = anim.current();

        anim.set_target(ViewportCommand::new(-1000.0, 0.0, 100.0, 100.0));
        assert!(anim.is_animating());
        anim.step();
        assert!(anim.current().x < mid.x);
    }

    #[test]
    fn cancel_goes_idle_in_place() {
        let mut anim = ViewportAnimator::new();
        anim.set_target(ViewportCommand::new(0.0, 0.0, 100.0, 100.0));
        anim.set_target(ViewportCommand::new(500.0, 500.0, 100.0, 100.0));
        anim.step();
        let mid = anim.current();
        anim.cancel();
        assert!(!anim.is_animating());
        assert!(!anim.step());
        assert_eq!(anim.current(), mid);
    }

    #[test]
    fn frame_subtracts_bounds_and_pads() {
        let mut anim = ViewportAnimator::new();
        anim.set_target(ViewportCommand::new(100.0, 200.0, 800.0, 600.0));
        let frame = anim.frame((40.0, 60.0), 24.0);
        assert_eq!(frame.x, 100.0 - 40.0 - 24.0);
        assert_eq!(frame.y, 200.0 - 60.0 - 24.0);
        assert_eq!(frame.width, 800.0 + 48.0);
        assert_eq!(frame.height, 600.0 + 48.0);
    }
}
