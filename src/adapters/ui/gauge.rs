//! Score gauge: animated radial ATS score indicator.
//!
//! Three layers:
//! - `ScoreAnimation`: pure count-up state machine (`Idle` / `Running`), advanced one tick at a time.
//! - `GaugeAnimator`: drives the state machine on a tokio interval and publishes frames on a watch channel.
//! - `rasterize` / `render_lines`: draws a frame as a ring of terminal cells.

use crossterm::style::{Color, Stylize};
use std::f64::consts::PI;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Length of one count-up run.
pub const ANIMATION_DURATION: Duration = Duration::from_millis(1000);
/// Frame interval (~60 steps per second).
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Scores at or above this are drawn in the success colour.
pub const SUCCESS_THRESHOLD: i64 = 75;
/// Scores at or above this (and below success) are drawn in the warning colour.
pub const WARNING_THRESHOLD: i64 = 50;

/// SVG-style ring geometry the gauge is modelled on.
pub const RING_RADIUS: f64 = 90.0;
pub const RING_STROKE: f64 = 12.0;

const TRACK_RGB: (u8, u8, u8) = (0x1f, 0x29, 0x37);
const CAPTION: &str = "ATS SCORE";

// ─────────────────────────────────────────────────────────────────────────────
// Colour tiers
// ─────────────────────────────────────────────────────────────────────────────

/// Stroke colour tier, chosen from the target score (not the animated value).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Success,
    Warning,
    Alert,
}

impl ScoreTier {
    pub fn for_score(score: i64) -> Self {
        if score >= SUCCESS_THRESHOLD {
            ScoreTier::Success
        } else if score >= WARNING_THRESHOLD {
            ScoreTier::Warning
        } else {
            ScoreTier::Alert
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            ScoreTier::Success => "#22c55e",
            ScoreTier::Warning => "#facc15",
            ScoreTier::Alert => "#ef4444",
        }
    }

    pub fn color(self) -> Color {
        let (r, g, b) = match self {
            ScoreTier::Success => (0x22, 0xc5, 0x5e),
            ScoreTier::Warning => (0xfa, 0xcc, 0x15),
            ScoreTier::Alert => (0xef, 0x44, 0x44),
        };
        Color::Rgb { r, g, b }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Animation state machine
// ─────────────────────────────────────────────────────────────────────────────

/// One rendered state of the gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeFrame {
    pub target: i64,
    pub display: i64,
    pub tier: ScoreTier,
    /// No further frames will follow for this target.
    pub done: bool,
}

impl GaugeFrame {
    /// Ring fill in [0, 1]. Out-of-range scores are clamped for drawing only.
    pub fn fill(&self) -> f64 {
        (self.display as f64 / 100.0).clamp(0.0, 1.0)
    }
}

impl Default for GaugeFrame {
    fn default() -> Self {
        Self {
            target: 0,
            display: 0,
            tier: ScoreTier::for_score(0),
            done: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running { tick: u32 },
}

/// Count-up from 0 to the target over a fixed number of ticks.
///
/// After tick `k` the display is `target * k / total_ticks`, truncated. Once that
/// reaches the target the value snaps to it and the machine goes idle.
#[derive(Debug, Clone)]
pub struct ScoreAnimation {
    target: i64,
    display: i64,
    tier: ScoreTier,
    total_ticks: u32,
    phase: Phase,
}

impl ScoreAnimation {
    pub fn new(duration: Duration, tick: Duration) -> Self {
        let tick_ms = tick.as_millis().max(1);
        let total_ticks = (duration.as_millis() / tick_ms).clamp(1, u32::MAX as u128) as u32;
        Self {
            target: 0,
            display: 0,
            tier: ScoreTier::for_score(0),
            total_ticks,
            phase: Phase::Idle,
        }
    }

    pub fn total_ticks(&self) -> u32 {
        self.total_ticks
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Restart from 0 toward `target`. Targets at or below 0 snap immediately.
    pub fn start(&mut self, target: i64) {
        self.target = target;
        self.tier = ScoreTier::for_score(target);
        if target <= 0 {
            self.display = target;
            self.phase = Phase::Idle;
        } else {
            self.display = 0;
            self.phase = Phase::Running { tick: 0 };
        }
    }

    /// Advance one tick. Returns true while more ticks are needed.
    pub fn tick(&mut self) -> bool {
        let Phase::Running { tick } = self.phase else {
            return false;
        };
        let tick = tick + 1;
        let value = i128::from(self.target) * i128::from(tick) / i128::from(self.total_ticks);
        if value >= i128::from(self.target) {
            self.display = self.target;
            self.phase = Phase::Idle;
            false
        } else {
            self.display = value as i64;
            self.phase = Phase::Running { tick };
            true
        }
    }

    /// Stop where it is. Safe to call any number of times.
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn frame(&self) -> GaugeFrame {
        GaugeFrame {
            target: self.target,
            display: self.display,
            tier: self.tier,
            done: !self.is_running(),
        }
    }
}

impl Default for ScoreAnimation {
    fn default() -> Self {
        Self::new(ANIMATION_DURATION, TICK_INTERVAL)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Driver
// ─────────────────────────────────────────────────────────────────────────────

/// Runs `ScoreAnimation` on a tokio interval.
///
/// Every `set_target` aborts the previous ticker first. Dropping the animator aborts
/// it too, so no tick ever touches a gauge that is no longer shown.
pub struct GaugeAnimator {
    frames: Arc<watch::Sender<GaugeFrame>>,
    generation: Arc<AtomicU64>,
    ticker: Option<JoinHandle<()>>,
    duration: Duration,
    tick: Duration,
}

impl GaugeAnimator {
    pub fn new() -> Self {
        Self::with_timing(ANIMATION_DURATION, TICK_INTERVAL)
    }

    pub fn with_timing(duration: Duration, tick: Duration) -> Self {
        let (tx, _rx) = watch::channel(GaugeFrame::default());
        Self {
            frames: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            ticker: None,
            duration,
            tick,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<GaugeFrame> {
        self.frames.subscribe()
    }

    pub fn frame(&self) -> GaugeFrame {
        *self.frames.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Restart the count-up toward `target`. Must be called inside a tokio runtime.
    pub fn set_target(&mut self, target: i64) {
        self.cancel();
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        let mut animation = ScoreAnimation::new(self.duration, self.tick);
        animation.start(target);
        self.frames.send_replace(animation.frame());
        if !animation.is_running() {
            return;
        }

        let frames = Arc::clone(&self.frames);
        let current = Arc::clone(&self.generation);
        let period = self.tick;
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let running = animation.tick();
                let frame = animation.frame();
                // A retarget may race the last tick of an aborted run; drop stale frames.
                frames.send_if_modified(|slot| {
                    if current.load(Ordering::Acquire) != generation {
                        return false;
                    }
                    *slot = frame;
                    true
                });
                if !running {
                    break;
                }
            }
        }));
    }

    /// Abort the ticker, if any. Idempotent; the last published frame stays visible.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

impl Default for GaugeAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for GaugeAnimator {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ring geometry & rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Radius of the stroke centre line.
pub fn normalized_radius() -> f64 {
    RING_RADIUS - RING_STROKE / 2.0
}

pub fn circumference() -> f64 {
    normalized_radius() * 2.0 * PI
}

/// Length of the ring left unpainted for a given fill.
pub fn dash_offset(fill: f64) -> f64 {
    let c = circumference();
    c - fill.clamp(0.0, 1.0) * c
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Blank,
    Track,
    Fill,
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingCell {
    pub ch: char,
    pub kind: CellKind,
}

/// Terminal rows used by the ring.
pub const RING_ROWS: usize = 11;

/// Rasterize a frame into a `RING_ROWS` × `2 * RING_ROWS + 1` grid.
///
/// Cells are twice as tall as wide, so x distances are halved. A ring cell is
/// filled when its clockwise angle from 12 o'clock lies within the fill.
pub fn rasterize(frame: &GaugeFrame) -> Vec<Vec<RingCell>> {
    let rows = RING_ROWS;
    let cols = rows * 2 + 1;
    let cy = (rows / 2) as f64;
    let cx = (cols / 2) as f64;
    let outer = cy + 0.3;
    let band = (RING_STROKE / RING_RADIUS * cy).max(1.0) + 0.3;
    let fill = frame.fill();

    let mut grid: Vec<Vec<RingCell>> = (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| {
                    let dy = row as f64 - cy;
                    let dx = (col as f64 - cx) / 2.0;
                    let dist = dx.hypot(dy);
                    if dist > outer || dist < outer - band {
                        return RingCell { ch: ' ', kind: CellKind::Blank };
                    }
                    let mut angle = dx.atan2(-dy);
                    if angle < 0.0 {
                        angle += 2.0 * PI;
                    }
                    if fill > 0.0 && angle / (2.0 * PI) <= fill {
                        RingCell { ch: '█', kind: CellKind::Fill }
                    } else {
                        RingCell { ch: '░', kind: CellKind::Track }
                    }
                })
                .collect()
        })
        .collect();

    let center = rows / 2;
    write_label(&mut grid[center], &frame.display.to_string());
    write_label(&mut grid[center + 1], CAPTION);
    grid
}

fn write_label(row: &mut [RingCell], text: &str) {
    let chars: Vec<char> = text.chars().collect();
    let start = row.len().saturating_sub(chars.len()) / 2;
    for (slot, ch) in row.iter_mut().skip(start).zip(chars) {
        *slot = RingCell { ch, kind: CellKind::Label };
    }
}

/// Styled terminal lines for a frame.
pub fn render_lines(frame: &GaugeFrame) -> Vec<String> {
    let (r, g, b) = TRACK_RGB;
    let track = Color::Rgb { r, g, b };
    let stroke = frame.tier.color();
    rasterize(frame)
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell.kind {
                    CellKind::Blank => cell.ch.to_string(),
                    CellKind::Track => cell.ch.with(track).to_string(),
                    CellKind::Fill => cell.ch.with(stroke).to_string(),
                    CellKind::Label => cell.ch.white().bold().to_string(),
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(target: i64) -> Vec<i64> {
        let mut animation = ScoreAnimation::default();
        animation.start(target);
        let mut seen = vec![animation.frame().display];
        while animation.tick() {
            seen.push(animation.frame().display);
        }
        seen.push(animation.frame().display);
        seen
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(ScoreTier::for_score(80), ScoreTier::Success);
        assert_eq!(ScoreTier::for_score(60), ScoreTier::Warning);
        assert_eq!(ScoreTier::for_score(10), ScoreTier::Alert);
        assert_eq!(ScoreTier::for_score(75), ScoreTier::Success);
        assert_eq!(ScoreTier::for_score(50), ScoreTier::Warning);
        assert_eq!(ScoreTier::for_score(74), ScoreTier::Warning);
        assert_eq!(ScoreTier::for_score(49), ScoreTier::Alert);
        assert_eq!(ScoreTier::Success.hex(), "#22c55e");
    }

    #[test]
    fn test_count_up_monotonic_and_exact() {
        for target in [1, 7, 49, 50, 75, 82, 100, 250] {
            let seen = run_to_end(target);
            assert!(seen.windows(2).all(|w| w[0] <= w[1]), "target {}", target);
            assert!(seen.iter().all(|&v| v <= target), "target {}", target);
            assert_eq!(*seen.last().unwrap(), target);
        }
    }

    #[test]
    fn test_finishes_within_duration() {
        let mut animation = ScoreAnimation::default();
        animation.start(82);
        let mut ticks = 0u32;
        while animation.tick() {
            ticks += 1;
        }
        ticks += 1;
        assert_eq!(animation.total_ticks(), 62);
        assert!(u128::from(ticks) * TICK_INTERVAL.as_millis() <= ANIMATION_DURATION.as_millis());
    }

    #[test]
    fn test_per_tick_step_truncates() {
        let mut animation = ScoreAnimation::default();
        animation.start(100);
        animation.tick();
        assert_eq!(animation.frame().display, 1);
        animation.tick();
        assert_eq!(animation.frame().display, 3);
    }

    #[test]
    fn test_non_positive_target_snaps() {
        let mut animation = ScoreAnimation::default();
        animation.start(-5);
        assert!(!animation.is_running());
        assert_eq!(animation.frame().display, -5);
        assert_eq!(animation.frame().fill(), 0.0);
        assert!(!animation.tick());
    }

    #[test]
    fn test_restart_resets_display() {
        let mut animation = ScoreAnimation::default();
        animation.start(90);
        for _ in 0..30 {
            animation.tick();
        }
        animation.start(20);
        assert_eq!(animation.frame().display, 0);
        assert_eq!(animation.frame().tier, ScoreTier::Alert);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut animation = ScoreAnimation::default();
        animation.start(60);
        animation.tick();
        animation.cancel();
        animation.cancel();
        assert!(!animation.is_running());
        assert!(!animation.tick());
    }

    #[test]
    fn test_dash_offset() {
        assert!((normalized_radius() - 84.0).abs() < f64::EPSILON);
        assert!((dash_offset(0.0) - circumference()).abs() < 1e-9);
        assert!(dash_offset(1.0).abs() < 1e-9);
        assert!(dash_offset(3.0).abs() < 1e-9);
    }

    fn count(grid: &[Vec<RingCell>], kind: CellKind) -> usize {
        grid.iter().flatten().filter(|c| c.kind == kind).count()
    }

    fn frame(display: i64) -> GaugeFrame {
        GaugeFrame {
            target: display,
            display,
            tier: ScoreTier::for_score(display),
            done: true,
        }
    }

    #[test]
    fn test_rasterize_fill_proportion() {
        let empty = rasterize(&frame(0));
        let full = rasterize(&frame(100));
        let over = rasterize(&frame(140));
        assert_eq!(count(&empty, CellKind::Fill), 0);
        assert_eq!(count(&full, CellKind::Track), 0);
        assert_eq!(count(&empty, CellKind::Track), count(&full, CellKind::Fill));
        assert_eq!(count(&over, CellKind::Fill), count(&full, CellKind::Fill));

        let half = rasterize(&frame(50));
        let filled = count(&half, CellKind::Fill);
        let ring = count(&full, CellKind::Fill);
        assert!(filled > ring / 3 && filled < ring * 2 / 3);
    }

    #[test]
    fn test_rasterize_fills_clockwise_from_top() {
        let grid = rasterize(&frame(25));
        let cx = grid[0].len() / 2;
        // Top-right quadrant fills first; the left side stays track.
        let right_top = grid[1..RING_ROWS / 2].iter().any(|row| row[cx + 4].kind == CellKind::Fill);
        let left = grid.iter().flat_map(|row| &row[..cx - 2]).any(|c| c.kind == CellKind::Fill);
        assert!(right_top);
        assert!(!left);
    }

    #[test]
    fn test_rasterize_labels() {
        let grid = rasterize(&frame(82));
        let center: String = grid[RING_ROWS / 2].iter().map(|c| c.ch).collect();
        let caption: String = grid[RING_ROWS / 2 + 1].iter().map(|c| c.ch).collect();
        assert!(center.contains("82"));
        assert!(caption.contains(CAPTION));
        assert_eq!(render_lines(&frame(82)).len(), RING_ROWS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_animator_reaches_target_within_duration() {
        let mut animator = GaugeAnimator::new();
        let mut rx = animator.subscribe();
        let started = tokio::time::Instant::now();
        animator.set_target(82);

        let mut last = 0;
        loop {
            let frame = *rx.borrow_and_update();
            assert!(frame.display >= last);
            assert!(frame.display <= 82);
            last = frame.display;
            if frame.done {
                break;
            }
            rx.changed().await.unwrap();
        }

        assert_eq!(last, 82);
        assert!(started.elapsed() <= ANIMATION_DURATION);
        assert_eq!(animator.frame().tier, ScoreTier::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retarget_cancels_previous_run() {
        let mut animator = GaugeAnimator::new();
        let mut rx = animator.subscribe();
        animator.set_target(90);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(animator.frame().display > 0);

        animator.set_target(30);
        loop {
            let frame = *rx.borrow_and_update();
            if frame.target == 30 {
                assert!(frame.display <= 30);
                if frame.done {
                    break;
                }
            }
            rx.changed().await.unwrap();
        }
        tokio::time::sleep(ANIMATION_DURATION).await;
        assert_eq!(animator.frame().target, 30);
        assert_eq!(animator.frame().display, 30);
        assert_eq!(animator.frame().tier, ScoreTier::Alert);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_ticking() {
        let animator = {
            let mut a = GaugeAnimator::new();
            a.set_target(100);
            a
        };
        let mut rx = animator.subscribe();
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(animator);

        let before = *rx.borrow_and_update();
        tokio::time::sleep(ANIMATION_DURATION).await;
        assert!(!before.done);
        assert!(rx.has_changed().is_err() || !rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_idempotent_on_animator() {
        let mut animator = GaugeAnimator::new();
        animator.cancel();
        animator.set_target(0);
        assert!(animator.frame().done);
        assert!(!animator.is_running());
        animator.cancel();
        animator.cancel();
    }
}
