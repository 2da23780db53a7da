//! Card entry cues derived from controller events.
//!
//! Nothing here is kept between transitions: every `Transition` or
//! `SessionReady` event produces a fresh [`CardCue`] that starts from zero.

use std::{
    io::{self, Write},
    time::Duration,
};

use deck_core::{BrowsingEvent, Direction, SessionOutcome};
use tokio::sync::broadcast::{self, error::TryRecvError};

const SLIDE_DISTANCE: f32 = 300.0;
const FRAME_INTERVAL: Duration = Duration::from_millis(50);
const STRIP_WIDTH: usize = 48;
const BUTTON_MARKER_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    Bounce,
    Spring { friction: f32 },
}

impl Easing {
    fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::Bounce => bounce_out(t),
            Self::Spring { friction } => {
                let damping = 6.0 * friction / 5.0;
                1.0 - (-damping * t).exp() * (std::f32::consts::PI * 3.0 * t).cos()
            }
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984_375
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub duration: Duration,
    pub easing: Easing,
}

impl Tween {
    pub fn value_at(&self, elapsed: Duration) -> f32 {
        if elapsed >= self.duration || self.duration.is_zero() {
            return self.to;
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * self.easing.apply(t)
    }
}

/// Details-block opacity pulsing 0.8 → 1 → 0.8 forever.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShimmerLoop {
    pub low: f32,
    pub high: f32,
    pub half_period: Duration,
}

impl ShimmerLoop {
    pub fn value_at(&self, elapsed: Duration) -> f32 {
        let half = self.half_period.as_millis().max(1);
        let phase = elapsed.as_millis() % (half * 2);
        let t = if phase < half {
            phase as f32 / half as f32
        } else {
            1.0 - (phase - half) as f32 / half as f32
        };
        self.low + (self.high - self.low) * t
    }
}

/// Pressed navigation key growing to 1.2 and settling back to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavPulse {
    pub key: char,
    pub grow: Tween,
    pub settle: Tween,
}

impl NavPulse {
    fn pressed(key: char) -> Self {
        Self {
            key,
            grow: Tween {
                from: 1.0,
                to: 1.2,
                duration: Duration::from_millis(100),
                easing: Easing::Linear,
            },
            settle: Tween {
                from: 1.2,
                to: 1.0,
                duration: Duration::from_millis(100),
                easing: Easing::Linear,
            },
        }
    }

    pub fn duration(&self) -> Duration {
        self.grow.duration + self.settle.duration
    }

    pub fn value_at(&self, elapsed: Duration) -> f32 {
        match elapsed.checked_sub(self.grow.duration) {
            Some(settling) => self.settle.value_at(settling),
            None => self.grow.value_at(elapsed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardFrame {
    pub opacity: f32,
    pub scale: f32,
    pub offset_x: f32,
    pub rotation_deg: f32,
    pub shimmer: f32,
    pub button_key: Option<char>,
    pub button_scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardCue {
    pub fade: Tween,
    pub scale: Tween,
    pub slide: Tween,
    pub rotation: Tween,
    pub shimmer: ShimmerLoop,
    /// Only navigation presses pulse a button.
    pub button: Option<NavPulse>,
}

impl CardCue {
    fn entering_from(offset: f32) -> Self {
        Self {
            fade: Tween {
                from: 0.0,
                to: 1.0,
                duration: Duration::from_millis(500),
                easing: Easing::Linear,
            },
            scale: Tween {
                from: 0.9,
                to: 1.0,
                duration: Duration::from_millis(500),
                easing: Easing::Spring { friction: 5.0 },
            },
            slide: Tween {
                from: offset,
                to: 0.0,
                duration: Duration::from_millis(400),
                easing: Easing::Linear,
            },
            rotation: Tween {
                from: 0.0,
                to: 360.0,
                duration: Duration::from_millis(600),
                easing: Easing::Bounce,
            },
            shimmer: ShimmerLoop {
                low: 0.8,
                high: 1.0,
                half_period: Duration::from_millis(800),
            },
            button: None,
        }
    }

    /// Only sessions that end with content get an entry cue.
    pub fn from_event(event: &BrowsingEvent) -> Option<Self> {
        match event {
            BrowsingEvent::SessionReady {
                outcome: SessionOutcome::Ready,
                ..
            } => Some(Self::entering_from(0.0)),
            BrowsingEvent::SessionReady { .. } => None,
            BrowsingEvent::Transition {
                direction: Direction::Forward,
                ..
            } => Some(Self {
                button: Some(NavPulse::pressed('n')),
                ..Self::entering_from(SLIDE_DISTANCE)
            }),
            BrowsingEvent::Transition {
                direction: Direction::Backward,
                ..
            } => Some(Self {
                button: Some(NavPulse::pressed('p')),
                ..Self::entering_from(-SLIDE_DISTANCE)
            }),
        }
    }

    /// Time until every one-shot tween has settled; the shimmer keeps looping.
    pub fn duration(&self) -> Duration {
        [self.fade, self.scale, self.slide, self.rotation]
            .iter()
            .map(|tween| tween.duration)
            .chain(self.button.map(|pulse| pulse.duration()))
            .max()
            .unwrap_or_default()
    }

    pub fn sample(&self, elapsed: Duration) -> CardFrame {
        CardFrame {
            opacity: self.fade.value_at(elapsed),
            scale: self.scale.value_at(elapsed),
            offset_x: self.slide.value_at(elapsed),
            rotation_deg: self.rotation.value_at(elapsed),
            shimmer: self.shimmer.value_at(elapsed),
            button_key: self.button.map(|pulse| pulse.key),
            button_scale: self.button.map_or(1.0, |pulse| pulse.value_at(elapsed)),
        }
    }
}

/// Drains pending controller events and keeps the cue of the newest one.
pub fn latest_cue(events: &mut broadcast::Receiver<BrowsingEvent>) -> Option<CardCue> {
    let mut cue = None;
    loop {
        match events.try_recv() {
            Ok(event) => cue = CardCue::from_event(&event),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "animation cue receiver lagged");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => return cue,
        }
    }
}

/// One line of the terminal strip: the card glyph slid by `offset_x`,
/// sized by `scale`, shaded by `opacity` times `shimmer`, with a spinner for
/// the avatar. The pressed key follows the card, upper-cased while its pulse
/// is near the peak.
pub fn render_strip(frame: &CardFrame) -> String {
    const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
    let shade = match frame.opacity * frame.shimmer {
        o if o < 0.25 => '·',
        o if o < 0.5 => '░',
        o if o < 0.75 => '▒',
        o if o < 1.0 => '▓',
        _ => '█',
    };
    let card_width = (10.0 * frame.scale).round().max(1.0) as usize;
    let centre = (STRIP_WIDTH.saturating_sub(card_width) / 2) as f32;
    let travel = centre / SLIDE_DISTANCE;
    let start = (centre + frame.offset_x * travel)
        .round()
        .clamp(0.0, (STRIP_WIDTH - card_width) as f32) as usize;
    let spinner = SPINNER[(frame.rotation_deg / 90.0).floor() as usize % SPINNER.len()];

    let mut line = String::with_capacity(STRIP_WIDTH + 4);
    line.push_str(&" ".repeat(start));
    line.push(spinner);
    line.push_str(&shade.to_string().repeat(card_width.saturating_sub(1)));
    line.push_str(&" ".repeat(STRIP_WIDTH - start - card_width));
    match frame.button_key {
        Some(key) if frame.button_scale > 1.1 => {
            line.push_str(&format!(" [{}]", key.to_ascii_uppercase()));
        }
        Some(key) => line.push_str(&format!(" [{key}]")),
        None => line.push_str(&" ".repeat(BUTTON_MARKER_WIDTH)),
    }
    line
}

/// Plays the cue on a single, repeatedly overwritten terminal line.
pub async fn play(cue: &CardCue, out: &mut impl Write) -> io::Result<()> {
    let total = cue.duration();
    let mut elapsed = Duration::ZERO;
    loop {
        write!(out, "\r{}", render_strip(&cue.sample(elapsed)))?;
        out.flush()?;
        if elapsed >= total {
            break;
        }
        tokio::time::sleep(FRAME_INTERVAL).await;
        elapsed = (elapsed + FRAME_INTERVAL).min(total);
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn forward_transition_slides_in_from_the_right() {
        let cue = CardCue::from_event(&BrowsingEvent::Transition {
            direction: Direction::Forward,
            position: 1,
            total: 3,
        })
        .expect("cue");

        let start = cue.sample(Duration::ZERO);
        assert!(close(start.offset_x, 300.0));
        assert!(close(start.opacity, 0.0));
        assert!(close(start.scale, 0.9));
        assert!(close(start.rotation_deg, 0.0));
    }

    #[test]
    fn backward_transition_slides_in_from_the_left() {
        let cue = CardCue::from_event(&BrowsingEvent::Transition {
            direction: Direction::Backward,
            position: 0,
            total: 3,
        })
        .expect("cue");

        assert!(close(cue.sample(Duration::ZERO).offset_x, -300.0));
    }

    #[test]
    fn session_ready_with_content_does_not_slide() {
        let cue = CardCue::from_event(&BrowsingEvent::SessionReady {
            outcome: SessionOutcome::Ready,
            total: 80,
        })
        .expect("cue");

        assert!(close(cue.sample(Duration::ZERO).offset_x, 0.0));
    }

    #[test]
    fn error_sessions_have_no_cue() {
        for outcome in [SessionOutcome::Empty, SessionOutcome::Failed] {
            let event = BrowsingEvent::SessionReady { outcome, total: 0 };
            assert_eq!(CardCue::from_event(&event), None);
        }
    }

    #[test]
    fn cue_settles_on_the_resting_card() {
        let cue = CardCue::entering_from(SLIDE_DISTANCE);
        assert_eq!(cue.duration(), Duration::from_millis(600));

        let end = cue.sample(cue.duration());
        assert!(close(end.opacity, 1.0));
        assert!(close(end.scale, 1.0));
        assert!(close(end.offset_x, 0.0));
        assert!(close(end.rotation_deg, 360.0));
    }

    #[test]
    fn slide_finishes_before_the_avatar_stops_spinning() {
        let cue = CardCue::entering_from(-SLIDE_DISTANCE);
        let frame = cue.sample(Duration::from_millis(450));

        assert!(close(frame.offset_x, 0.0));
        assert!(frame.rotation_deg < 360.0);
    }

    #[test]
    fn shimmer_loops_between_bounds() {
        let shimmer = CardCue::entering_from(0.0).shimmer;

        assert!(close(shimmer.value_at(Duration::ZERO), 0.8));
        assert!(close(shimmer.value_at(Duration::from_millis(800)), 1.0));
        assert!(close(shimmer.value_at(Duration::from_millis(1600)), 0.8));
        assert!(close(shimmer.value_at(Duration::from_millis(1200)), 0.9));
    }

    #[test]
    fn navigation_pulses_the_pressed_button() {
        let cue = CardCue::from_event(&BrowsingEvent::Transition {
            direction: Direction::Forward,
            position: 1,
            total: 3,
        })
        .expect("cue");
        let pulse = cue.button.expect("pulse");

        assert_eq!(pulse.key, 'n');
        assert!(close(pulse.value_at(Duration::ZERO), 1.0));
        assert!(close(pulse.value_at(Duration::from_millis(50)), 1.1));
        assert!(close(pulse.value_at(Duration::from_millis(100)), 1.2));
        assert!(close(pulse.value_at(Duration::from_millis(150)), 1.1));
        assert!(close(pulse.value_at(Duration::from_millis(200)), 1.0));
        assert!(close(pulse.value_at(Duration::from_millis(600)), 1.0));
    }

    #[test]
    fn pulse_shows_on_the_strip_marker() {
        let cue = CardCue::from_event(&BrowsingEvent::Transition {
            direction: Direction::Backward,
            position: 0,
            total: 3,
        })
        .expect("cue");

        let peak = render_strip(&cue.sample(Duration::from_millis(100)));
        let rest = render_strip(&cue.sample(Duration::from_millis(200)));
        assert!(peak.ends_with(" [P]"), "{peak:?}");
        assert!(rest.ends_with(" [p]"), "{rest:?}");
    }

    #[test]
    fn session_ready_has_no_button_pulse() {
        let cue = CardCue::from_event(&BrowsingEvent::SessionReady {
            outcome: SessionOutcome::Ready,
            total: 80,
        })
        .expect("cue");
        let frame = cue.sample(Duration::from_millis(100));

        assert_eq!(frame.button_key, None);
        assert!(close(frame.button_scale, 1.0));
    }

    #[test]
    fn bounce_easing_hits_both_ends() {
        assert!(close(bounce_out(0.0), 0.0));
        assert!(close(bounce_out(1.0), 1.0));
    }

    #[test]
    fn strip_keeps_a_fixed_width_while_sliding() {
        let cue = CardCue::entering_from(SLIDE_DISTANCE);
        for ms in [0, 100, 200, 400, 600] {
            let strip = render_strip(&cue.sample(Duration::from_millis(ms)));
            assert_eq!(
                strip.chars().count(),
                STRIP_WIDTH + BUTTON_MARKER_WIDTH,
                "at {ms}ms"
            );
        }
    }

    #[test]
    fn latest_cue_follows_the_newest_event() {
        let (tx, mut rx) = broadcast::channel(8);
        tx.send(BrowsingEvent::Transition {
            direction: Direction::Forward,
            position: 1,
            total: 3,
        })
        .expect("send");
        tx.send(BrowsingEvent::Transition {
            direction: Direction::Backward,
            position: 0,
            total: 3,
        })
        .expect("send");

        let cue = latest_cue(&mut rx).expect("cue");
        assert!(close(cue.sample(Duration::ZERO).offset_x, -300.0));
        assert_eq!(latest_cue(&mut rx), None);
    }

    #[tokio::test]
    async fn play_ends_with_a_newline() {
        let cue = CardCue::entering_from(0.0);
        let mut out = Vec::new();

        play(&cue, &mut out).await.expect("play");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with('\r'));
        assert!(text.ends_with('\n'));
    }
}
