//! Screen 5: slider-driven cylinder simulation.

use std::ops::RangeInclusive;
use std::time::Instant;

use crate::geometry::Cylinder;
use crate::lesson::LessonContext;
use crate::navigator::ScreenDefinition;
use crate::reveal::Delay;
use crate::traits::{ScreenBehavior, ScreenEvent, ScreenInput};

use super::boxed;

const MARKUP: &str = "\
🔬 Build your own cylinder
Drag the sliders and watch the surface areas and volume change.

  set r <1-10>   set h <1-20>   (cm)
  toggle label | fill | ends";

const RADIUS_RANGE: RangeInclusive<f64> = 1.0..=10.0;
const HEIGHT_RANGE: RangeInclusive<f64> = 1.0..=20.0;
/// Water level shown when "fill" is on.
const FILL_LEVEL: f64 = 0.7;

const NUDGE: &str = "Try doubling r while keeping h same. What happens to CSA vs Volume?";

pub fn definition() -> ScreenDefinition<LessonContext> {
    ScreenDefinition::static_markup(MARKUP).with_behavior(|ctx: &mut LessonContext, now| {
        let mut nudge = Delay::default();
        nudge.schedule(now, ctx.config.sim_hint_delay());
        boxed(SimulationScreen {
            cylinder: Cylinder::new(4.0, 10.0),
            show_label: false,
            show_fill: false,
            show_ends: true,
            nudge,
        })
    })
}

struct SimulationScreen {
    cylinder: Cylinder,
    show_label: bool,
    show_fill: bool,
    show_ends: bool,
    nudge: Delay,
}

impl SimulationScreen {
    fn readout(&self) -> String {
        let c = &self.cylinder;
        format!(
            "r = {:.1} cm, h = {:.1} cm | CSA {:.1} cm² | TSA {:.1} cm² | Volume {:.1} cm³ | Capacity {:.2} L",
            c.radius,
            c.height,
            c.curved_surface_area(),
            c.total_surface_area(),
            c.volume(),
            c.capacity_litres()
        )
    }

    fn label_readout(&self) -> String {
        let (width, height) = self.cylinder.label_dimensions();
        format!("Unrolled label: {width:.1} cm × {height:.1} cm")
    }

    fn adjust(&mut self, control: &str, value: f64) -> Vec<ScreenEvent> {
        let (range, slot) = match control {
            "r" => (RADIUS_RANGE, &mut self.cylinder.radius),
            "h" => (HEIGHT_RANGE, &mut self.cylinder.height),
            other => return vec![ScreenEvent::bad(format!("There is no '{other}' slider."))],
        };
        if !value.is_finite() {
            return vec![ScreenEvent::bad("Please enter a valid positive number.")];
        }
        *slot = value.clamp(*range.start(), *range.end());

        let mut events = vec![ScreenEvent::info(self.readout())];
        if self.show_label {
            events.push(ScreenEvent::info(self.label_readout()));
        }
        events
    }

    fn toggle(&mut self, control: &str) -> Vec<ScreenEvent> {
        let on_off = |on: bool| if on { "on" } else { "off" };
        match control {
            "label" => {
                self.show_label = !self.show_label;
                let mut events = vec![ScreenEvent::info(format!(
                    "Label view {}",
                    on_off(self.show_label)
                ))];
                if self.show_label {
                    events.push(ScreenEvent::info(self.label_readout()));
                }
                events
            }
            "fill" => {
                self.show_fill = !self.show_fill;
                let message = if self.show_fill {
                    format!(
                        "Water filled to {:.0}%: {:.1} cm³",
                        FILL_LEVEL * 100.0,
                        self.cylinder.volume() * FILL_LEVEL
                    )
                } else {
                    "Water drained".to_string()
                };
                vec![ScreenEvent::info(message)]
            }
            "ends" => {
                self.show_ends = !self.show_ends;
                vec![ScreenEvent::info(format!(
                    "Top and bottom {}",
                    on_off(self.show_ends)
                ))]
            }
            other => vec![ScreenEvent::bad(format!("There is no '{other}' toggle."))],
        }
    }
}

impl ScreenBehavior<LessonContext> for SimulationScreen {
    fn on_input(
        &mut self,
        _ctx: &mut LessonContext,
        input: &ScreenInput,
        _now: Instant,
    ) -> Vec<ScreenEvent> {
        match input {
            ScreenInput::Adjust { control, value } => self.adjust(control, *value),
            ScreenInput::Toggle { control } => self.toggle(control),
            _ => Vec::new(),
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.nudge.deadline()
    }

    fn on_timer(&mut self, _ctx: &mut LessonContext, now: Instant) -> Vec<ScreenEvent> {
        if self.nudge.fire(now) {
            vec![ScreenEvent::info(NUDGE)]
        } else {
            Vec::new()
        }
    }

    fn dispose(&mut self) {
        self.nudge.cancel();
    }
}
