//! Screens 3 and 4: explainer videos.

use std::time::Instant;

use crate::lesson::LessonContext;
use crate::navigator::ScreenDefinition;
use crate::traits::{ScreenBehavior, ScreenEvent, ScreenInput};

use super::{boxed, VideoPlayer};

const DABBA_MARKUP: &str = "\
📦 How big is the dabba's label?
Watch how the sticker unrolls into a rectangle of 2πr × h.

  play | replay";

const CONCEPT_MARKUP: &str = "\
🧪 From label to formula
Watch how curved surface area, total surface area and volume fit together.

  play | replay";

pub fn dabba_explainer() -> ScreenDefinition<LessonContext> {
    video_screen(DABBA_MARKUP, "dabba explainer")
}

pub fn cylinder_concept() -> ScreenDefinition<LessonContext> {
    video_screen(CONCEPT_MARKUP, "cylinder concept")
}

fn video_screen(markup: &str, name: &'static str) -> ScreenDefinition<LessonContext> {
    ScreenDefinition::static_markup(markup).with_behavior(move |_: &mut LessonContext, _| {
        boxed(VideoScreen {
            name,
            player: VideoPlayer::default(),
        })
    })
}

struct VideoScreen {
    name: &'static str,
    player: VideoPlayer,
}

impl ScreenBehavior<LessonContext> for VideoScreen {
    fn on_input(
        &mut self,
        _ctx: &mut LessonContext,
        input: &ScreenInput,
        _now: Instant,
    ) -> Vec<ScreenEvent> {
        match input {
            ScreenInput::Media { event } => self
                .player
                .handle(event, "Great watching! Tap next when you're ready. ➡"),
            _ => Vec::new(),
        }
    }

    fn dispose(&mut self) {
        tracing::debug!(video = self.name, state = ?self.player.state(), "video screen closed");
        self.player.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::testing::{build, context, messages, navigation, send};
    use crate::traits::MediaEvent;

    #[test]
    fn ended_offers_next_without_navigating() {
        let mut ctx = context();
        let now = Instant::now();
        let mut screen = build(dabba_explainer(), &mut ctx, now);
        send(&mut screen, &mut ctx, ScreenInput::media(MediaEvent::Play), now);
        let events = send(&mut screen, &mut ctx, ScreenInput::media(MediaEvent::Ended), now);
        assert!(messages(&events)[0].contains("Tap next"));
        assert_eq!(navigation(&events), None);
    }

    #[test]
    fn media_error_shows_notice() {
        let mut ctx = context();
        let now = Instant::now();
        let mut screen = build(cylinder_concept(), &mut ctx, now);
        let events = send(
            &mut screen,
            &mut ctx,
            ScreenInput::media(MediaEvent::Error("network".into())),
            now,
        );
        assert!(matches!(&events[0], ScreenEvent::Notice(_)));
    }
}
