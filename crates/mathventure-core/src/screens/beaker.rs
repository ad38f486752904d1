//! Screen 8: which beaker holds more water?

use std::time::Instant;

use crate::geometry::Cylinder;
use crate::lesson::LessonContext;
use crate::navigator::ScreenDefinition;
use crate::reveal::Delay;
use crate::traits::{ScreenBehavior, ScreenEvent, ScreenInput};

use super::boxed;

const MARKUP: &str = "\
🧪 Two beakers: A is tall and thin (r = 3 cm, h = 100 cm),
B is short and wide (r = 15 cm, h = 4 cm).
Which one holds more water?

  pick A | B | equal   then: fill";

fn beaker_a() -> Cylinder {
    Cylinder::new(3.0, 100.0)
}

fn beaker_b() -> Cylinder {
    Cylinder::new(15.0, 4.0)
}

pub fn definition() -> ScreenDefinition<LessonContext> {
    ScreenDefinition::static_markup(MARKUP).with_behavior(|_: &mut LessonContext, _| {
        boxed(BeakerScreen {
            choice: None,
            filled: false,
            explanation: Delay::default(),
        })
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prediction {
    A,
    B,
    Equal,
}

impl Prediction {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "A" | "a" => Some(Prediction::A),
            "B" | "b" => Some(Prediction::B),
            "equal" => Some(Prediction::Equal),
            _ => None,
        }
    }
}

struct BeakerScreen {
    choice: Option<Prediction>,
    filled: bool,
    explanation: Delay,
}

impl BeakerScreen {
    fn explain(&self) -> Vec<ScreenEvent> {
        let (a, b) = (beaker_a(), beaker_b());
        let headline = match (self.choice, a.same_volume_as(&b)) {
            (Some(Prediction::Equal), true) => ScreenEvent::good(
                "🎯 Amazing Discovery! You're absolutely right! \
                 Both beakers hold exactly the same amount of water!",
            ),
            (_, true) => ScreenEvent::info(
                "🎯 Surprise! Both beakers hold exactly the same amount of water!",
            ),
            (_, false) => ScreenEvent::info("The beakers hold different amounts of water."),
        };
        vec![
            headline,
            ScreenEvent::info(format!(
                "Beaker A: V = π × (3)² × 100 = {:.1} cm³",
                a.volume()
            )),
            ScreenEvent::info(format!(
                "Beaker B: V = π × (15)² × 4 = {:.1} cm³",
                b.volume()
            )),
            ScreenEvent::info("Height alone doesn't decide volume. The radius is squared!"),
        ]
    }
}

impl ScreenBehavior<LessonContext> for BeakerScreen {
    fn on_input(
        &mut self,
        ctx: &mut LessonContext,
        input: &ScreenInput,
        now: Instant,
    ) -> Vec<ScreenEvent> {
        match input {
            ScreenInput::Select { choice } => match Prediction::parse(choice) {
                Some(prediction) => {
                    self.choice = Some(prediction);
                    vec![ScreenEvent::info("Prediction locked in! Now press fill. 💧")]
                }
                None => vec![ScreenEvent::bad("Pick A, B or equal.")],
            },
            ScreenInput::Action { name } if name == "fill" => {
                if self.choice.is_none() {
                    return vec![ScreenEvent::bad("Make a prediction first! 🤔")];
                }
                if self.filled {
                    return Vec::new();
                }
                self.filled = true;
                self.explanation.schedule(now, ctx.config.explanation_delay());
                vec![ScreenEvent::info("Filling both beakers... 💧")]
            }
            _ => Vec::new(),
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.explanation.deadline()
    }

    fn on_timer(&mut self, _ctx: &mut LessonContext, now: Instant) -> Vec<ScreenEvent> {
        if self.explanation.fire(now) {
            self.explain()
        } else {
            Vec::new()
        }
    }

    fn dispose(&mut self) {
        self.explanation.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::testing::{build, context, messages, send};
    use crate::traits::Tone;
    use std::time::Duration;

    #[test]
    fn fill_requires_a_prediction() {
        let mut ctx = context();
        let now = Instant::now();
        let mut screen = build(definition(), &mut ctx, now);
        let events = send(&mut screen, &mut ctx, ScreenInput::action("fill"), now);
        assert_eq!(messages(&events), vec!["Make a prediction first! 🤔"]);
        assert_eq!(screen.next_deadline(), None);
    }

    #[test]
    fn correct_prediction_is_praised_after_delay() {
        let mut ctx = context();
        let t0 = Instant::now();
        let mut screen = build(definition(), &mut ctx, t0);
        send(&mut screen, &mut ctx, ScreenInput::select("equal"), t0);
        send(&mut screen, &mut ctx, ScreenInput::action("fill"), t0);

        assert!(screen.on_timer(&mut ctx, t0 + Duration::from_millis(2000)).is_empty());
        let events = screen.on_timer(&mut ctx, t0 + Duration::from_millis(2500));
        assert!(matches!(events[0], ScreenEvent::Feedback { tone: Tone::Good, .. }));
        let lines = messages(&events);
        assert_eq!(lines[1], "Beaker A: V = π × (3)² × 100 = 2827.4 cm³");
        assert_eq!(lines[2], "Beaker B: V = π × (15)² × 4 = 2827.4 cm³");
    }

    #[test]
    fn wrong_prediction_gets_surprise() {
        let mut ctx = context();
        let t0 = Instant::now();
        let mut screen = build(definition(), &mut ctx, t0);
        send(&mut screen, &mut ctx, ScreenInput::select("A"), t0);
        send(&mut screen, &mut ctx, ScreenInput::action("fill"), t0);
        let events = screen.on_timer(&mut ctx, t0 + Duration::from_secs(3));
        assert!(messages(&events)[0].starts_with("🎯 Surprise!"));
    }

    #[test]
    fn dispose_cancels_explanation() {
        let mut ctx = context();
        let now = Instant::now();
        let mut screen = build(definition(), &mut ctx, now);
        send(&mut screen, &mut ctx, ScreenInput::select("B"), now);
        send(&mut screen, &mut ctx, ScreenInput::action("fill"), now);
        screen.dispose();
        assert_eq!(screen.next_deadline(), None);
    }
}
