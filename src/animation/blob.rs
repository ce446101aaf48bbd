//! src/animation/blob.rs
//!
//! Pointer-following "water blob" behind the landing page copy. Three bubbles
//! trail a smoothed copy of the pointer; fast pointer movement raises an
//! intensity in `[0, 1]` that roughens the turbulence filter and speeds up
//! the morphing. All easing is per frame, so the caller owns the clock.

const TARGET_EASE: f64 = 0.034;
const SPEED_DECAY: f64 = 0.92;
const SPEED_EASE: f64 = 0.06;
const WATER_EASE: f64 = 0.08;
/// Smoothed pointer speed, in px/ms, that maps to full intensity.
const FULL_INTENSITY_SPEED: f64 = 0.9;
/// Floor for the time between two pointer events, in ms.
const MIN_POINTER_DT: f64 = 8.0;
const FREQUENCY_WOBBLE: f64 = 0.0025;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn ease_toward(&mut self, target: Point, factor: f64) {
        self.x += (target.x - self.x) * factor;
        self.y += (target.y - self.y) * factor;
    }

    fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BubbleConfig {
    /// Fraction of the remaining distance covered each frame.
    pub lag: f64,
    /// Radius of the idle drift, in px.
    pub drift: f64,
    pub phase: f64,
}

pub const BUBBLES: [BubbleConfig; 3] = [
    BubbleConfig {
        lag: 0.03,
        drift: 24.0,
        phase: 0.0,
    },
    BubbleConfig {
        lag: 0.02,
        drift: 34.0,
        phase: 1.6,
    },
    BubbleConfig {
        lag: 0.0152,
        drift: 44.0,
        phase: 3.1,
    },
];

/// Parameters of the SVG turbulence + displacement filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterFilter {
    pub freq_x: f64,
    pub freq_y: f64,
    pub displacement: f64,
}

impl WaterFilter {
    pub const RESTING: WaterFilter = WaterFilter {
        freq_x: 0.01,
        freq_y: 0.016,
        displacement: 12.0,
    };

    fn desired(intensity: f64) -> Self {
        Self {
            freq_x: Self::RESTING.freq_x + 0.032 * intensity,
            freq_y: Self::RESTING.freq_y + 0.032 * intensity,
            displacement: Self::RESTING.displacement + 70.0 * intensity,
        }
    }

    fn ease_toward(&mut self, target: WaterFilter, factor: f64) {
        self.freq_x += (target.freq_x - self.freq_x) * factor;
        self.freq_y += (target.freq_y - self.freq_y) * factor;
        self.displacement += (target.displacement - self.displacement) * factor;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BubbleFrame {
    pub position: Point,
    pub rotate_deg: f64,
    pub scale: f64,
    pub morph_duration_secs: f64,
}

impl BubbleFrame {
    /// CSS `transform` that centers the bubble on `position`.
    pub fn css_transform(&self) -> String {
        format!(
            "translate3d({}px, {}px, 0) translate3d(-50%, -50%, 0) rotate({:.2}deg) scale({:.3})",
            self.position.x, self.position.y, self.rotate_deg, self.scale
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub intensity: f64,
    pub base_frequency: (f64, f64),
    pub displacement_scale: f64,
    pub bubbles: [BubbleFrame; 3],
}

impl Frame {
    /// Value for `feTurbulence`'s `baseFrequency` attribute.
    pub fn base_frequency_attr(&self) -> String {
        format!("{:.4} {:.4}", self.base_frequency.0, self.base_frequency.1)
    }

    /// Value for `feDisplacementMap`'s `scale` attribute.
    pub fn displacement_attr(&self) -> String {
        format!("{:.1}", self.displacement_scale)
    }
}

#[derive(Debug, Clone)]
pub struct BlobAnimation {
    target: Point,
    target_smoothed: Point,
    bubbles: [Point; 3],
    last_pointer: Point,
    last_pointer_at: f64,
    speed_instant: f64,
    speed_smoothed: f64,
    water: WaterFilter,
}

impl BlobAnimation {
    /// A blob at rest in the middle of `viewport`. `now` is in ms.
    pub fn centered(viewport: Viewport, now: f64) -> Self {
        let center = viewport.center();
        Self {
            target: center,
            target_smoothed: center,
            bubbles: [center; 3],
            last_pointer: center,
            last_pointer_at: now,
            speed_instant: 0.0,
            speed_smoothed: 0.0,
            water: WaterFilter::RESTING,
        }
    }

    /// Snaps everything back to the center. The water filter keeps its state.
    pub fn recenter(&mut self, viewport: Viewport, now: f64) {
        let water = self.water;
        *self = Self::centered(viewport, now);
        self.water = water;
    }

    pub fn pointer_moved(&mut self, pointer: Point, now: f64) {
        let dt = (now - self.last_pointer_at).max(MIN_POINTER_DT);
        self.speed_instant = self.last_pointer.distance_to(pointer) / dt;
        self.target = pointer;
        self.last_pointer = pointer;
        self.last_pointer_at = now;
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn smoothed_target(&self) -> Point {
        self.target_smoothed
    }

    /// Latest raw pointer speed, in px/ms.
    pub fn pointer_speed(&self) -> f64 {
        self.speed_instant
    }

    pub fn water(&self) -> WaterFilter {
        self.water
    }

    pub fn intensity(&self) -> f64 {
        (self.speed_smoothed / FULL_INTENSITY_SPEED).min(1.0)
    }

    /// Advances one frame.
    pub fn tick(&mut self, now: f64) -> Frame {
        self.target_smoothed.ease_toward(self.target, TARGET_EASE);

        // No pointer events means no new speed samples.
        self.speed_instant *= SPEED_DECAY;
        self.speed_smoothed += (self.speed_instant - self.speed_smoothed) * SPEED_EASE;
        let intensity = self.intensity();

        self.water
            .ease_toward(WaterFilter::desired(intensity), WATER_EASE);
        let base_frequency = (
            self.water.freq_x + (now * 0.0011).sin() * FREQUENCY_WOBBLE,
            self.water.freq_y + (now * 0.001).cos() * FREQUENCY_WOBBLE,
        );

        let mut frames = [BubbleFrame::default(); 3];
        for (i, (config, current)) in BUBBLES.iter().zip(self.bubbles.iter_mut()).enumerate() {
            let index = i as f64;
            let desired = Point::new(
                self.target_smoothed.x + (now * 0.0007 + config.phase).sin() * config.drift,
                self.target_smoothed.y + (now * 0.0006 + config.phase).cos() * config.drift,
            );
            current.ease_toward(desired, config.lag);

            let pulse = ((now * 0.001 + config.phase).sin() + 1.0) / 2.0;
            let base_scale = 0.90 + pulse * (0.22 - index * 0.03);
            let motion_scale = 1.0 + intensity * (0.06 - index * 0.01);

            let base_rotate = (now * 0.0008 + config.phase).sin() * (6.0 - index * 1.5);
            let direction = if i == 1 { -1.0 } else { 1.0 };

            frames[i] = BubbleFrame {
                position: *current,
                rotate_deg: base_rotate + direction * intensity * 7.0,
                scale: base_scale * motion_scale,
                morph_duration_secs: 14.0 - intensity * 9.0,
            };
        }

        Frame {
            intensity,
            base_frequency,
            displacement_scale: self.water.displacement,
            bubbles: frames,
        }
    }
}
