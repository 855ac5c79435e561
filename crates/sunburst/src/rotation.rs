use crate::config::InertiaConfig;
use crate::geometry::Point;
use derive_more::{Display as DisplayNewtype, From, Into};
use strum::Display;

const HALF_TURN: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Mode {
    #[default]
    Idle,
    Dragging,
    Coasting,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationState {
    pub mode: Mode,
    /// Absolute rotation applied to the wheel, degrees.
    pub rotation: f64,
    /// Last pointer angle seen while dragging.
    pub previous_pointer_angle: f64,
    /// Degrees per tick; zero whenever idle.
    pub velocity: f64,
}

/// Pointer position as read from the input source.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    Mouse(Point),
    /// Active touches; only the first one is followed.
    Touch(Vec<Point>),
}

impl PointerInput {
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::Mouse(p) => Some(*p),
            Self::Touch(points) => points.first().copied(),
        }
    }
}

/// Identifies one scheduled frame; handed back to [`RotationController::frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, DisplayNewtype, From, Into)]
pub struct FrameToken(u64);

/// What the controller needs from whatever is displaying the wheel.
pub trait RotationHost {
    /// Handle of a scheduled frame callback.
    type Frame;

    /// Centre of the rotated drawable, in pointer coordinates.
    fn center(&self) -> Point;

    fn apply_rotation(&mut self, degrees: f64);

    /// Schedules one call to [`RotationController::frame`] with `token` on the next frame.
    fn request_frame(&mut self, token: FrameToken) -> Self::Frame;

    fn cancel_frame(&mut self, frame: Self::Frame);
}

/// Drag-to-rotate with inertial coasting after release.
pub struct RotationController<H: RotationHost> {
    state: RotationState,
    inertia: InertiaConfig,
    pending: Option<(FrameToken, H::Frame)>,
    next_token: u64,
}

impl<H: RotationHost> RotationController<H> {
    pub fn new(inertia: InertiaConfig) -> Self {
        Self {
            state: RotationState::default(),
            inertia,
            pending: None,
            next_token: 0,
        }
    }

    pub fn state(&self) -> RotationState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn rotation(&self) -> f64 {
        self.state.rotation
    }

    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending.as_ref().map(|(token, _)| *token)
    }

    pub fn set_inertia(&mut self, inertia: InertiaConfig) {
        self.inertia = inertia;
    }

    /// Angle from the host centre to `pointer`, standard atan2 orientation.
    fn pointer_angle(host: &H, pointer: Point) -> f64 {
        let center = host.center();
        let (dx, dy) = (pointer.x - center.x, pointer.y - center.y);
        dy.atan2(dx).to_degrees()
    }

    fn cancel_pending(&mut self, host: &mut H) {
        if let Some((_, frame)) = self.pending.take() {
            host.cancel_frame(frame);
        }
    }

    fn schedule(&mut self, host: &mut H) {
        self.cancel_pending(host);
        let token = FrameToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        let frame = host.request_frame(token);
        self.pending = Some((token, frame));
    }

    fn settle(&mut self, host: &mut H) {
        self.cancel_pending(host);
        self.state.mode = Mode::Idle;
        self.state.velocity = 0.0;
    }

    /// Starts a drag; interrupts any coasting in progress.
    pub fn pointer_down(&mut self, host: &mut H, input: &PointerInput) {
        let Some(pointer) = input.position() else {
            return;
        };
        self.cancel_pending(host);
        self.state.mode = Mode::Dragging;
        self.state.previous_pointer_angle = Self::pointer_angle(host, pointer);
        self.state.velocity = 0.0;
    }

    pub fn pointer_move(&mut self, host: &mut H, input: &PointerInput) {
        if self.state.mode != Mode::Dragging {
            return;
        }
        let Some(pointer) = input.position() else {
            return;
        };

        let angle = Self::pointer_angle(host, pointer);
        let delta = unwrap_delta(angle - self.state.previous_pointer_angle);

        self.state.previous_pointer_angle = angle;
        self.state.rotation += delta;
        self.state.velocity = delta;
        host.apply_rotation(self.state.rotation);
    }

    /// Releases the drag and lets the wheel coast on its last velocity.
    pub fn pointer_up(&mut self, host: &mut H) {
        if self.state.mode != Mode::Dragging {
            return;
        }
        if self.state.velocity.abs() < self.inertia.stop_threshold {
            self.settle(host);
            return;
        }
        self.state.mode = Mode::Coasting;
        self.schedule(host);
    }

    pub fn pointer_leave(&mut self, host: &mut H) {
        self.pointer_up(host);
    }

    /// One coasting step for the frame scheduled as `token`.
    ///
    /// Frames that are no longer pending (cancelled but already queued) are ignored.
    pub fn frame(&mut self, host: &mut H, token: FrameToken) {
        match self.pending.take() {
            Some((pending, _)) if pending == token => {}
            other => {
                self.pending = other;
                log::trace!("Ignoring stale frame {}", token);
                return;
            }
        }
        if self.state.mode != Mode::Coasting {
            return;
        }

        self.state.rotation += self.state.velocity;
        host.apply_rotation(self.state.rotation);
        self.state.velocity *= self.inertia.decay;

        if self.state.velocity.abs() < self.inertia.stop_threshold {
            self.settle(host);
        } else {
            self.schedule(host);
        }
    }

    /// Stops any motion and cancels the pending frame.
    pub fn halt(&mut self, host: &mut H) {
        self.settle(host);
    }
}

/// Maps a raw angle difference into (-180, 180] so crossing the atan2 seam is continuous.
fn unwrap_delta(delta: f64) -> f64 {
    let wrapped = (delta + HALF_TURN).rem_euclid(2.0 * HALF_TURN) - HALF_TURN;
    if wrapped == -HALF_TURN { HALF_TURN } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeHost {
        applied: Vec<f64>,
        live: Vec<FrameToken>,
        cancelled: Vec<FrameToken>,
    }

    impl RotationHost for FakeHost {
        type Frame = FrameToken;

        fn center(&self) -> Point {
            Point::new(100.0, 100.0)
        }

        fn apply_rotation(&mut self, degrees: f64) {
            self.applied.push(degrees);
        }

        fn request_frame(&mut self, token: FrameToken) -> FrameToken {
            self.live.push(token);
            token
        }

        fn cancel_frame(&mut self, frame: FrameToken) {
            self.live.retain(|&f| f != frame);
            self.cancelled.push(frame);
        }
    }

    impl FakeHost {
        /// Fires the oldest live frame, as a frame clock would.
        fn fire(&mut self, controller: &mut RotationController<FakeHost>) -> bool {
            if self.live.is_empty() {
                return false;
            }
            let token = self.live.remove(0);
            controller.frame(self, token);
            true
        }
    }

    /// Pointer on a circle of radius 50 around the fake centre, atan2 orientation.
    fn at(degrees: f64) -> PointerInput {
        let r = degrees.to_radians();
        PointerInput::Mouse(Point::new(100.0 + 50.0 * r.cos(), 100.0 + 50.0 * r.sin()))
    }

    fn controller() -> RotationController<FakeHost> {
        RotationController::new(InertiaConfig::default())
    }

    #[test]
    fn test_drag_then_release_coasts_with_last_delta() {
        let mut host = FakeHost::default();
        let mut c = controller();

        c.pointer_down(&mut host, &at(10.0));
        for angle in [20.0, 35.0, 50.0] {
            c.pointer_move(&mut host, &at(angle));
        }
        c.pointer_up(&mut host);

        let state = c.state();
        assert_eq!(state.mode, Mode::Coasting);
        assert!((state.velocity - 15.0).abs() < 1e-9);
        assert!((state.rotation - 40.0).abs() < 1e-9);
        assert_eq!(host.applied.len(), 3);
        assert_eq!(host.live.len(), 1);
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let mut host = FakeHost::default();
        let mut c = controller();
        c.pointer_move(&mut host, &at(45.0));
        assert_eq!(c.state(), RotationState::default());
        assert!(host.applied.is_empty());
    }

    #[test]
    fn test_release_without_drag_is_noop() {
        let mut host = FakeHost::default();
        let mut c = controller();
        c.pointer_up(&mut host);
        c.pointer_leave(&mut host);
        assert_eq!(c.mode(), Mode::Idle);
        assert!(host.live.is_empty());
    }

    #[test]
    fn test_empty_touch_list_is_noop() {
        let mut host = FakeHost::default();
        let mut c = controller();
        c.pointer_down(&mut host, &PointerInput::Touch(Vec::new()));
        assert_eq!(c.mode(), Mode::Idle);

        c.pointer_down(&mut host, &at(0.0));
        c.pointer_move(&mut host, &PointerInput::Touch(Vec::new()));
        assert_eq!(c.rotation(), 0.0);
    }

    #[test]
    fn test_touch_follows_first_point() {
        let mut host = FakeHost::default();
        let mut c = controller();
        c.pointer_down(&mut host, &PointerInput::Touch(vec![Point::new(150.0, 100.0)]));
        c.pointer_move(
            &mut host,
            &PointerInput::Touch(vec![Point::new(100.0, 150.0), Point::new(0.0, 0.0)]),
        );
        assert!((c.rotation() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_coasting_decays_and_stops() {
        let mut host = FakeHost::default();
        let mut c = controller();
        c.pointer_down(&mut host, &at(0.0));
        c.pointer_move(&mut host, &at(2.0));
        c.pointer_up(&mut host);
        assert!((c.state().velocity - 2.0).abs() < 1e-9);

        let mut ticks = 0;
        while host.fire(&mut c) {
            ticks += 1;
            if c.mode() == Mode::Coasting {
                let expected = 2.0 * 0.95_f64.powi(ticks);
                assert!((c.state().velocity - expected).abs() < 1e-9);
            }
        }

        // 2.0 * 0.95^58 is still above 0.1, 2.0 * 0.95^59 is not
        assert_eq!(ticks, 59);
        assert_eq!(c.mode(), Mode::Idle);
        assert_eq!(c.state().velocity, 0.0);
        assert_eq!(c.pending_frame(), None);

        let coasted: f64 = (0..59).map(|n| 2.0 * 0.95_f64.powi(n)).sum();
        assert!((c.rotation() - (2.0 + coasted)).abs() < 1e-9);
    }

    #[test]
    fn test_pointer_down_interrupts_coasting() {
        let mut host = FakeHost::default();
        let mut c = controller();
        c.pointer_down(&mut host, &at(0.0));
        c.pointer_move(&mut host, &at(30.0));
        c.pointer_up(&mut host);
        host.fire(&mut c);
        host.fire(&mut c);
        let baseline = c.rotation();
        let pending = host.live.clone();
        assert_eq!(pending.len(), 1);

        c.pointer_down(&mut host, &at(90.0));

        assert_eq!(c.mode(), Mode::Dragging);
        assert_eq!(c.state().velocity, 0.0);
        assert_eq!(c.rotation(), baseline);
        assert!(host.live.is_empty());
        assert_eq!(host.cancelled, pending);
        assert_eq!(c.pending_frame(), None);

        c.pointer_move(&mut host, &at(100.0));
        assert!((c.rotation() - (baseline + 10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_stale_frame_while_dragging_is_ignored() {
        let mut host = FakeHost::default();
        let mut c = controller();
        c.pointer_down(&mut host, &at(0.0));
        c.pointer_move(&mut host, &at(5.0));
        let before = c.state();
        c.frame(&mut host, FrameToken::from(7));
        assert_eq!(c.state(), before);
        assert!(host.live.is_empty());
    }

    #[test]
    fn test_cancelled_frame_cannot_fork_coasting() {
        let mut host = FakeHost::default();
        let mut c = controller();
        c.pointer_down(&mut host, &at(0.0));
        c.pointer_move(&mut host, &at(20.0));
        c.pointer_up(&mut host);
        let stale = c.pending_frame().unwrap();

        // already queued by the host when the new drag cancels it
        c.pointer_down(&mut host, &at(0.0));
        c.pointer_move(&mut host, &at(20.0));
        c.pointer_up(&mut host);
        let current = c.pending_frame().unwrap();
        let rotation = c.rotation();

        c.frame(&mut host, stale);
        assert_eq!(c.rotation(), rotation);
        assert_eq!(c.pending_frame(), Some(current));
        assert_eq!(host.live, vec![current]);
    }

    #[test]
    fn test_at_most_one_pending_frame() {
        let mut host = FakeHost::default();
        let mut c = controller();
        c.pointer_down(&mut host, &at(0.0));
        c.pointer_move(&mut host, &at(20.0));
        c.pointer_up(&mut host);
        c.pointer_leave(&mut host);
        for _ in 0..10 {
            host.fire(&mut c);
            assert!(host.live.len() <= 1);
        }
    }

    #[test]
    fn test_slow_release_settles_immediately() {
        let mut host = FakeHost::default();
        let mut c = controller();
        c.pointer_down(&mut host, &at(0.0));
        c.pointer_up(&mut host);
        assert_eq!(c.mode(), Mode::Idle);
        assert!(host.live.is_empty());
    }

    #[test]
    fn test_drag_across_seam_is_continuous() {
        let mut host = FakeHost::default();
        let mut c = controller();
        c.pointer_down(&mut host, &at(170.0));
        c.pointer_move(&mut host, &at(-170.0));
        assert!((c.rotation() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_halt_cancels_coasting() {
        let mut host = FakeHost::default();
        let mut c = controller();
        c.pointer_down(&mut host, &at(0.0));
        c.pointer_move(&mut host, &at(25.0));
        c.pointer_up(&mut host);
        c.halt(&mut host);
        assert_eq!(c.mode(), Mode::Idle);
        assert!(host.live.is_empty());
        c.halt(&mut host);
        assert_eq!(host.cancelled.len(), 1);
    }

    #[test]
    fn test_unwrap_delta() {
        assert_eq!(unwrap_delta(10.0), 10.0);
        assert_eq!(unwrap_delta(-340.0), 20.0);
        assert_eq!(unwrap_delta(340.0), -20.0);
        assert_eq!(unwrap_delta(180.0), 180.0);
        assert_eq!(unwrap_delta(-180.0), 180.0);
    }
}
