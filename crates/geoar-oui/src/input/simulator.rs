//! Input simulator for terminal development
//!
//! Maps keyboard inputs to simulated orientation and walking so the overlay can
//! be exercised without a phone or wearable.
//!
//! - Left/Right: turn (heading)
//! - Up/Down: tilt (pitch)
//! - W/S: walk forward/backward along the heading
//! - A/D: sidestep
//! - Q or Esc: quit

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::geo::{destination, GeoPoint};
use super::{OrientationSample, SessionEvent};

/// Simulates a handheld device from keyboard input
#[derive(Debug, Clone)]
pub struct InputSimulator {
    position: GeoPoint,
    heading: f64,
    pitch: f64,
    /// Degrees turned per key press
    turn_step: f64,
    /// Degrees tilted per key press
    tilt_step: f64,
    /// Meters walked per key press
    walk_step: f64,
}

impl InputSimulator {
    /// Start at `position`, facing north, held upright
    pub fn new(position: GeoPoint) -> Self {
        Self {
            position,
            heading: 0.0,
            pitch: 90.0,
            turn_step: 5.0,
            tilt_step: 2.0,
            walk_step: 25.0,
        }
    }

    /// Set meters walked per key press
    pub fn with_walk_step(mut self, meters: f64) -> Self {
        self.walk_step = meters;
        self
    }

    pub fn position(&self) -> GeoPoint {
        self.position
    }

    pub fn orientation(&self) -> OrientationSample {
        OrientationSample::new(self.heading, self.pitch, 0.0)
    }

    /// Process a keyboard event and generate session events
    pub fn process_key(&mut self, key: KeyEvent) -> Vec<SessionEvent> {
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                vec![SessionEvent::Quit]
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => vec![SessionEvent::Quit],

            KeyCode::Left => self.turn(-self.turn_step),
            KeyCode::Right => self.turn(self.turn_step),
            KeyCode::Up => self.tilt(self.tilt_step),
            KeyCode::Down => self.tilt(-self.tilt_step),

            KeyCode::Char('w') | KeyCode::Char('W') => self.walk(0.0),
            KeyCode::Char('s') | KeyCode::Char('S') => self.walk(180.0),
            KeyCode::Char('a') | KeyCode::Char('A') => self.walk(270.0),
            KeyCode::Char('d') | KeyCode::Char('D') => self.walk(90.0),

            _ => Vec::new(),
        }
    }

    fn turn(&mut self, delta: f64) -> Vec<SessionEvent> {
        self.heading = (self.heading + delta).rem_euclid(360.0);
        vec![SessionEvent::Orientation(self.orientation())]
    }

    fn tilt(&mut self, delta: f64) -> Vec<SessionEvent> {
        self.pitch = (self.pitch + delta).clamp(0.0, 180.0);
        vec![SessionEvent::Orientation(self.orientation())]
    }

    /// Walk relative to the current heading
    fn walk(&mut self, relative_bearing: f64) -> Vec<SessionEvent> {
        self.position = destination(
            self.position,
            self.heading + relative_bearing,
            self.walk_step,
        );
        vec![SessionEvent::Location(self.position)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::distance;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_turning_wraps() {
        let mut sim = InputSimulator::new(GeoPoint::ORIGIN);
        let events = sim.process_key(press(KeyCode::Left));
        assert_eq!(events.len(), 1);
        assert_eq!(sim.orientation().heading, 355.0);
    }

    #[test]
    fn test_walking_moves_along_heading() {
        let mut sim = InputSimulator::new(GeoPoint::new(10.0, 10.0)).with_walk_step(100.0);
        for _ in 0..18 {
            sim.process_key(press(KeyCode::Right));
        }
        let events = sim.process_key(press(KeyCode::Char('w')));

        let SessionEvent::Location(p) = events[0] else {
            panic!("expected location event");
        };
        assert!((distance(GeoPoint::new(10.0, 10.0), p) - 100.0).abs() < 0.01);
        assert!(p.lng > 10.0);
    }

    #[test]
    fn test_quit_keys() {
        let mut sim = InputSimulator::new(GeoPoint::ORIGIN);
        assert!(sim.process_key(press(KeyCode::Esc))[0].is_quit());
        assert!(sim.process_key(press(KeyCode::Char('q')))[0].is_quit());
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(sim.process_key(ctrl_c)[0].is_quit());
    }

    #[test]
    fn test_pitch_clamped() {
        let mut sim = InputSimulator::new(GeoPoint::ORIGIN);
        for _ in 0..100 {
            sim.process_key(press(KeyCode::Up));
        }
        assert_eq!(sim.orientation().pitch, 180.0);
    }
}
