//! Terminal display host for the lesson.

use std::io::{self, Write};

use mathventure_core::traits::{PagerState, ScreenEvent, ScreenHost, ScreenResources, Tone};

/// Prints screens and feedback to a writer (stdout by default).
pub struct TerminalHost<W: Write = io::Stdout> {
    out: W,
    pager: Option<PagerState>,
}

impl TerminalHost {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalHost<W> {
    pub fn new(out: W) -> Self {
        Self { out, pager: None }
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!("failed to write to terminal: {e}");
        }
    }
}

impl<W: Write> ScreenHost for TerminalHost<W> {
    fn render(&mut self, screen: usize, markup: &str, resources: &ScreenResources) {
        let total = self.pager.map_or(screen, |p| p.total.max(screen));
        self.emit(&format!("\n── Screen {screen} of {total} ──"));
        self.emit(markup);
        if let Some(style) = &resources.stylesheet {
            self.emit(&format!("  [style: {}]", style.display()));
        }
        if let Some(script) = &resources.script {
            self.emit(&format!("  [script: {}]", script.display()));
        }
    }

    fn update_pager(&mut self, pager: &PagerState) {
        self.pager = Some(*pager);
    }

    fn show(&mut self, events: &[ScreenEvent]) {
        for event in events {
            let line = match event {
                ScreenEvent::Feedback { tone, message } => {
                    let mark = match tone {
                        Tone::Good => "✔",
                        Tone::Bad => "✘",
                        Tone::Info => "•",
                    };
                    format!("{mark} {message}")
                }
                ScreenEvent::Notice(message) => format!("⚠ {message}"),
                ScreenEvent::Navigate(_) => continue,
            };
            self.emit(&line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_uses_total_from_pager() {
        let mut host = TerminalHost::new(Vec::new());
        host.update_pager(&PagerState::new(1, 15));
        host.render(2, "Peel the sticker", &ScreenResources::default());
        host.show(&[
            ScreenEvent::good("Perfect!"),
            ScreenEvent::notice("video failed"),
            ScreenEvent::next(),
        ]);

        let text = String::from_utf8(host.out.clone()).unwrap();
        assert!(text.contains("── Screen 2 of 15 ──"));
        assert!(text.contains("✔ Perfect!"));
        assert!(text.contains("⚠ video failed"));
    }
}
