//! Screen navigator.
//!
//! Sequences the learner through screens `1..=total` and keeps at most one
//! [`ScreenBehavior`] alive. Every transition disposes the old behavior
//! before the new screen is rendered and its behavior built. A failing
//! behavior (error or panic) leaves its screen non-interactive; navigation
//! itself never fails hard.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::Instant;

use crate::error::{BehaviorError, NavigationError};
use crate::traits::{
    NavRequest, PagerState, ScreenBehavior, ScreenEvent, ScreenHost, ScreenInput,
    ScreenResources,
};

/// Produces the structural content of a screen.
pub type MarkupProvider = Box<dyn Fn(usize) -> String>;

/// Builds the behavior for a screen once its markup is displayed.
pub type BehaviorFactory<C> =
    Box<dyn Fn(&mut C, Instant) -> Result<Box<dyn ScreenBehavior<C>>, BehaviorError>>;

/// Markup shown for an index that has no registered definition.
pub const PLACEHOLDER_MARKUP: &str = "Screen not implemented yet";

/// One entry of the screen table.
pub struct ScreenDefinition<C> {
    markup: MarkupProvider,
    behavior: Option<BehaviorFactory<C>>,
}

impl<C> ScreenDefinition<C> {
    /// A screen with static markup and no behavior.
    pub fn static_markup(markup: impl Into<String>) -> Self {
        let markup = markup.into();
        Self {
            markup: Box::new(move |_| markup.clone()),
            behavior: None,
        }
    }

    /// Attach a behavior factory.
    pub fn with_behavior<F>(mut self, factory: F) -> Self
    where
        F: Fn(&mut C, Instant) -> Result<Box<dyn ScreenBehavior<C>>, BehaviorError> + 'static,
    {
        self.behavior = Some(Box::new(factory));
        self
    }

    pub fn markup(&self, index: usize) -> String {
        (self.markup)(index)
    }

    /// Run the behavior factory, if the screen has one.
    pub fn build(
        &self,
        ctx: &mut C,
        now: Instant,
    ) -> Option<Result<Box<dyn ScreenBehavior<C>>, BehaviorError>> {
        self.behavior.as_ref().map(|factory| factory(ctx, now))
    }
}

/// Lookup table from screen index to definition.
pub struct ScreenTable<C> {
    screens: BTreeMap<usize, ScreenDefinition<C>>,
    total: usize,
}

impl<C> Default for ScreenTable<C> {
    fn default() -> Self {
        Self {
            screens: BTreeMap::new(),
            total: 0,
        }
    }
}

impl<C> ScreenTable<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the definition for `index`, growing the total.
    ///
    /// Index zero is not a valid screen and is ignored.
    pub fn insert(&mut self, index: usize, definition: ScreenDefinition<C>) {
        if index == 0 {
            tracing::warn!("ignoring registration of screen 0");
            return;
        }
        self.screens.insert(index, definition);
        self.total = self.total.max(index);
    }

    /// Builder form of [`ScreenTable::insert`].
    pub fn with(mut self, index: usize, definition: ScreenDefinition<C>) -> Self {
        self.insert(index, definition);
        self
    }

    pub fn total(&self) -> usize {
        self.total
    }

    fn markup(&self, index: usize) -> String {
        match self.screens.get(&index) {
            Some(def) => def.markup(index),
            None => PLACEHOLDER_MARKUP.to_string(),
        }
    }

    fn definition(&self, index: usize) -> Option<&ScreenDefinition<C>> {
        self.screens.get(&index)
    }
}

/// Resolves per-screen stylesheet and script resources by convention.
#[derive(Debug, Clone, Default)]
pub struct ResourceLocator {
    root: Option<PathBuf>,
}

impl ResourceLocator {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// `styles/screen{n}.css` and `scripts/screen{n}.js` under the root.
    /// Missing files resolve to `None`.
    pub fn resolve(&self, index: usize) -> ScreenResources {
        let Some(root) = &self.root else {
            return ScreenResources::default();
        };
        let existing = |path: PathBuf| {
            if path.is_file() {
                Some(path)
            } else {
                tracing::debug!("no resource at {}", path.display());
                None
            }
        };
        ScreenResources {
            stylesheet: existing(root.join("styles").join(format!("screen{index}.css"))),
            script: existing(root.join("scripts").join(format!("screen{index}.js"))),
        }
    }
}

/// Owns the current position and the single live screen behavior.
pub struct Navigator<C> {
    table: ScreenTable<C>,
    current: usize,
    active: Option<Box<dyn ScreenBehavior<C>>>,
    host: Box<dyn ScreenHost>,
    resources: ResourceLocator,
}

impl<C> Navigator<C> {
    pub fn new(table: ScreenTable<C>, host: Box<dyn ScreenHost>) -> Self {
        Self {
            table,
            current: 1,
            active: None,
            host,
            resources: ResourceLocator::default(),
        }
    }

    pub fn with_resources(mut self, resources: ResourceLocator) -> Self {
        self.resources = resources;
        self
    }

    pub fn current_screen(&self) -> usize {
        self.current
    }

    pub fn total_screens(&self) -> usize {
        self.table.total()
    }

    pub fn has_active_behavior(&self) -> bool {
        self.active.is_some()
    }

    pub fn pager(&self) -> PagerState {
        PagerState::new(self.current, self.table.total())
    }

    /// Activate the first screen.
    pub fn start(&mut self, ctx: &mut C) -> Result<(), NavigationError> {
        if self.table.total() == 0 {
            tracing::warn!("cannot start: no screens registered");
            return Err(NavigationError::EmptyLesson);
        }
        self.go_to_screen(1, ctx)
    }

    /// Register a screen late. The total grows if `index` is beyond it.
    pub fn register_screen(&mut self, index: usize, definition: ScreenDefinition<C>) {
        self.table.insert(index, definition);
        tracing::debug!(index, total = self.table.total(), "screen registered");
        if index != 0 {
            self.host.update_pager(&self.pager());
        }
    }

    /// Move to screen `n`. Out-of-range requests are logged and ignored.
    pub fn go_to_screen(&mut self, n: usize, ctx: &mut C) -> Result<(), NavigationError> {
        self.go_to_screen_at(n, ctx, Instant::now())
    }

    /// [`Navigator::go_to_screen`] with an explicit clock reading.
    pub fn go_to_screen_at(
        &mut self,
        n: usize,
        ctx: &mut C,
        now: Instant,
    ) -> Result<(), NavigationError> {
        let total = self.table.total();
        if n == 0 || n > total {
            let err = NavigationError::OutOfRange {
                requested: n,
                total,
            };
            tracing::warn!("navigation ignored: {err}");
            return Err(err);
        }

        self.dispose_active();

        let markup = self.table.markup(n);
        let resources = self.resources.resolve(n);
        self.host.render(n, &markup, &resources);

        self.current = n;
        self.active = self.build_behavior(n, ctx, now);
        self.host.update_pager(&self.pager());

        tracing::debug!(
            screen = n,
            total,
            interactive = self.active.is_some(),
            "screen activated"
        );
        Ok(())
    }

    /// Advance one screen. Returns `false` at the last screen.
    pub fn next(&mut self, ctx: &mut C) -> bool {
        if self.current >= self.table.total() {
            return false;
        }
        self.go_to_screen(self.current + 1, ctx).is_ok()
    }

    /// Go back one screen. Returns `false` at the first screen.
    pub fn previous(&mut self, ctx: &mut C) -> bool {
        if self.current <= 1 {
            return false;
        }
        self.go_to_screen(self.current - 1, ctx).is_ok()
    }

    /// Route learner input to the active behavior and apply what it asks for.
    pub fn dispatch(&mut self, ctx: &mut C, input: &ScreenInput) -> Vec<ScreenEvent> {
        self.dispatch_at(ctx, input, Instant::now())
    }

    /// [`Navigator::dispatch`] with an explicit clock reading.
    pub fn dispatch_at(
        &mut self,
        ctx: &mut C,
        input: &ScreenInput,
        now: Instant,
    ) -> Vec<ScreenEvent> {
        let screen = self.current;
        let Some(behavior) = self.active.as_mut() else {
            tracing::debug!(screen, ?input, "input ignored: screen is not interactive");
            return Vec::new();
        };
        let outcome = catch_unwind(AssertUnwindSafe(|| behavior.on_input(ctx, input, now)));
        self.settle(screen, outcome, ctx, now)
    }

    /// Earliest pending timer of the active behavior.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.active.as_ref().and_then(|b| b.next_deadline())
    }

    /// Fire due timers of the active behavior.
    pub fn poll_timers(&mut self, ctx: &mut C, now: Instant) -> Vec<ScreenEvent> {
        let screen = self.current;
        let due = self
            .active
            .as_ref()
            .and_then(|b| b.next_deadline())
            .is_some_and(|deadline| deadline <= now);
        if !due {
            return Vec::new();
        }
        let Some(behavior) = self.active.as_mut() else {
            return Vec::new();
        };
        let outcome = catch_unwind(AssertUnwindSafe(|| behavior.on_timer(ctx, now)));
        self.settle(screen, outcome, ctx, now)
    }

    /// Dispose the active behavior, e.g. when the session ends.
    pub fn shutdown(&mut self) {
        self.dispose_active();
    }

    fn settle(
        &mut self,
        screen: usize,
        outcome: std::thread::Result<Vec<ScreenEvent>>,
        ctx: &mut C,
        now: Instant,
    ) -> Vec<ScreenEvent> {
        let events = match outcome {
            Ok(events) => events,
            Err(panic) => {
                tracing::error!(
                    screen,
                    "screen behavior panicked: {}",
                    panic_message(panic.as_ref())
                );
                self.dispose_active();
                return Vec::new();
            }
        };

        let shown: Vec<ScreenEvent> = events
            .iter()
            .filter(|e| !matches!(e, ScreenEvent::Navigate(_)))
            .cloned()
            .collect();
        if !shown.is_empty() {
            self.host.show(&shown);
        }

        for event in &events {
            if let ScreenEvent::Navigate(request) = event {
                let target = match request {
                    NavRequest::Next if self.current >= self.table.total() => continue,
                    NavRequest::Previous if self.current <= 1 => continue,
                    NavRequest::Next => self.current + 1,
                    NavRequest::Previous => self.current - 1,
                    NavRequest::GoTo(n) => *n,
                };
                // Errors are already logged; a bad target leaves us in place.
                let _ = self.go_to_screen_at(target, ctx, now);
            }
        }
        events
    }

    fn dispose_active(&mut self) {
        let Some(mut behavior) = self.active.take() else {
            return;
        };
        let screen = self.current;
        if let Err(panic) = catch_unwind(AssertUnwindSafe(|| behavior.dispose())) {
            tracing::error!(
                screen,
                "dispose panicked: {}",
                panic_message(panic.as_ref())
            );
        }
    }

    fn build_behavior(
        &self,
        n: usize,
        ctx: &mut C,
        now: Instant,
    ) -> Option<Box<dyn ScreenBehavior<C>>> {
        let definition = self.table.definition(n)?;
        match catch_unwind(AssertUnwindSafe(|| definition.build(ctx, now))) {
            Ok(None) => None,
            Ok(Some(Ok(behavior))) => Some(behavior),
            Ok(Some(Err(e))) => {
                tracing::error!("screen {n} has no behavior: {e}");
                None
            }
            Err(panic) => {
                tracing::error!(
                    "screen {n} behavior panicked during setup: {}",
                    panic_message(panic.as_ref())
                );
                None
            }
        }
    }
}

impl<C> Drop for Navigator<C> {
    fn drop(&mut self) {
        self.dispose_active();
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Shared log of lifecycle calls, recorded by behaviors and the host.
    #[derive(Default)]
    struct Journal {
        entries: Vec<String>,
    }

    type Log = Rc<RefCell<Journal>>;

    fn push(log: &Log, entry: impl Into<String>) {
        log.borrow_mut().entries.push(entry.into());
    }

    fn entries(log: &Log) -> Vec<String> {
        log.borrow().entries.clone()
    }

    struct RecordingHost {
        log: Log,
    }

    impl ScreenHost for RecordingHost {
        fn render(&mut self, screen: usize, markup: &str, _: &ScreenResources) {
            push(&self.log, format!("render {screen}: {markup}"));
        }

        fn update_pager(&mut self, pager: &PagerState) {
            push(&self.log, format!("pager {}", pager.label()));
        }
    }

    struct Tracked {
        screen: usize,
        log: Log,
        panic_on_dispose: bool,
    }

    impl ScreenBehavior<()> for Tracked {
        fn on_input(&mut self, _: &mut (), input: &ScreenInput, _: Instant) -> Vec<ScreenEvent> {
            match input {
                ScreenInput::Action { name } if name == "advance" => vec![
                    ScreenEvent::info("moving on"),
                    ScreenEvent::next(),
                ],
                ScreenInput::Action { name } if name == "back" => {
                    vec![ScreenEvent::Navigate(NavRequest::Previous)]
                }
                ScreenInput::Action { name } if name == "explode" => panic!("boom"),
                _ => Vec::new(),
            }
        }

        fn dispose(&mut self) {
            push(&self.log, format!("dispose {}", self.screen));
            if self.panic_on_dispose {
                panic!("dispose failed");
            }
        }
    }

    fn tracked_screen(screen: usize, log: &Log) -> ScreenDefinition<()> {
        let log = Rc::clone(log);
        ScreenDefinition::static_markup(format!("screen {screen}")).with_behavior(
            move |_: &mut (), _| {
                push(&log, format!("build {screen}"));
                Ok(Box::new(Tracked {
                    screen,
                    log: Rc::clone(&log),
                    panic_on_dispose: false,
                }) as Box<dyn ScreenBehavior<()>>)
            },
        )
    }

    fn navigator(screens: usize) -> (Navigator<()>, Log) {
        let log: Log = Rc::default();
        let mut table = ScreenTable::new();
        for n in 1..=screens {
            table.insert(n, tracked_screen(n, &log));
        }
        let host = RecordingHost {
            log: Rc::clone(&log),
        };
        (Navigator::new(table, Box::new(host)), log)
    }

    #[test]
    fn go_to_every_screen() {
        let (mut nav, _) = navigator(4);
        for n in 1..=4 {
            nav.go_to_screen(n, &mut ()).unwrap();
            assert_eq!(nav.current_screen(), n);
            assert!(nav.has_active_behavior());
        }
    }

    #[test]
    fn out_of_range_is_a_no_op() {
        let (mut nav, log) = navigator(3);
        nav.start(&mut ()).unwrap();
        let before = entries(&log).len();

        assert_eq!(
            nav.go_to_screen(0, &mut ()),
            Err(NavigationError::OutOfRange {
                requested: 0,
                total: 3
            })
        );
        assert!(nav.go_to_screen(4, &mut ()).is_err());

        assert_eq!(nav.current_screen(), 1);
        assert!(nav.has_active_behavior());
        assert_eq!(entries(&log).len(), before, "no dispose, no render");
    }

    #[test]
    fn boundaries_do_not_wrap() {
        let (mut nav, _) = navigator(2);
        nav.start(&mut ()).unwrap();
        assert!(!nav.previous(&mut ()));
        assert_eq!(nav.current_screen(), 1);
        assert!(nav.next(&mut ()));
        assert!(!nav.next(&mut ()));
        assert_eq!(nav.current_screen(), 2);
    }

    #[test]
    fn old_behavior_disposed_once_before_new_one_is_built() {
        let (mut nav, log) = navigator(3);
        nav.go_to_screen(1, &mut ()).unwrap();
        nav.go_to_screen(2, &mut ()).unwrap();
        nav.go_to_screen(3, &mut ()).unwrap();

        let lifecycle: Vec<String> = entries(&log)
            .into_iter()
            .filter(|e| e.starts_with("build") || e.starts_with("dispose"))
            .collect();
        assert_eq!(
            lifecycle,
            vec!["build 1", "dispose 1", "build 2", "dispose 2", "build 3"]
        );
    }

    #[test]
    fn panicking_dispose_does_not_block_next_screen() {
        let log: Log = Rc::default();
        let log_for_factory = Rc::clone(&log);
        let table = ScreenTable::new()
            .with(
                1,
                ScreenDefinition::static_markup("fragile").with_behavior(move |_: &mut (), _| {
                    Ok(Box::new(Tracked {
                        screen: 1,
                        log: Rc::clone(&log_for_factory),
                        panic_on_dispose: true,
                    }) as Box<dyn ScreenBehavior<()>>)
                }),
            )
            .with(2, tracked_screen(2, &log));
        let host = RecordingHost {
            log: Rc::clone(&log),
        };
        let mut nav = Navigator::new(table, Box::new(host));

        nav.start(&mut ()).unwrap();
        nav.next(&mut ());

        assert_eq!(nav.current_screen(), 2);
        assert!(nav.has_active_behavior());
        assert!(entries(&log).contains(&"render 2: screen 2".to_string()));
    }

    #[test]
    fn failing_factory_leaves_screen_navigable() {
        let log: Log = Rc::default();
        let table = ScreenTable::new()
            .with(
                1,
                ScreenDefinition::static_markup("broken").with_behavior(|_: &mut (), _| {
                    Err(BehaviorError::Missing {
                        screen: 1,
                        what: "video element".into(),
                    })
                }),
            )
            .with(2, tracked_screen(2, &log));
        let host = RecordingHost {
            log: Rc::clone(&log),
        };
        let mut nav = Navigator::new(table, Box::new(host));

        nav.start(&mut ()).unwrap();
        assert_eq!(nav.current_screen(), 1);
        assert!(!nav.has_active_behavior());
        assert!(nav.next(&mut ()));
        assert!(nav.has_active_behavior());
    }

    #[test]
    fn unregistered_index_renders_placeholder() {
        let (mut nav, log) = navigator(2);
        nav.register_screen(5, ScreenDefinition::static_markup("results"));
        assert_eq!(nav.total_screens(), 5);

        nav.go_to_screen(4, &mut ()).unwrap();
        assert!(!nav.has_active_behavior());
        assert!(entries(&log).contains(&format!("render 4: {PLACEHOLDER_MARKUP}")));
    }

    #[test]
    fn pager_reflects_position() {
        let (mut nav, log) = navigator(3);
        nav.start(&mut ()).unwrap();
        let pager = nav.pager();
        assert!(!pager.previous_enabled);
        assert!(pager.next_enabled);
        assert!(entries(&log).contains(&"pager Screen 1 of 3".to_string()));
    }

    #[test]
    fn behavior_navigation_requests_are_applied() {
        let (mut nav, _) = navigator(3);
        nav.start(&mut ()).unwrap();
        let events = nav.dispatch(&mut (), &ScreenInput::action("advance"));
        assert_eq!(events.len(), 2);
        assert_eq!(nav.current_screen(), 2);
    }

    #[test]
    fn behavior_requests_at_boundaries_are_silent() {
        let (mut nav, log) = navigator(2);
        nav.start(&mut ()).unwrap();
        let before = entries(&log).len();
        nav.dispatch(&mut (), &ScreenInput::action("back"));
        assert_eq!(nav.current_screen(), 1);
        assert!(nav.has_active_behavior());
        assert_eq!(entries(&log).len(), before);

        nav.go_to_screen(2, &mut ()).unwrap();
        let before = entries(&log).len();
        let events = nav.dispatch(&mut (), &ScreenInput::action("advance"));
        assert_eq!(events.len(), 2);
        assert_eq!(nav.current_screen(), 2);
        assert!(nav.has_active_behavior());
        assert_eq!(entries(&log).len(), before);
    }

    #[test]
    fn panicking_handler_disables_only_that_screen() {
        let (mut nav, _) = navigator(3);
        nav.start(&mut ()).unwrap();
        let events = nav.dispatch(&mut (), &ScreenInput::action("explode"));
        assert!(events.is_empty());
        assert_eq!(nav.current_screen(), 1);
        assert!(!nav.has_active_behavior());

        assert!(nav.next(&mut ()));
        assert!(nav.has_active_behavior());
    }

    #[test]
    fn start_on_empty_lesson() {
        let log: Log = Rc::default();
        let host = RecordingHost { log };
        let mut nav: Navigator<()> = Navigator::new(ScreenTable::new(), Box::new(host));
        assert_eq!(nav.start(&mut ()), Err(NavigationError::EmptyLesson));
    }

    #[test]
    fn resources_resolve_by_convention() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("styles")).unwrap();
        std::fs::write(dir.path().join("styles/screen2.css"), "body {}").unwrap();

        let locator = ResourceLocator::new(Some(dir.path().to_path_buf()));
        let found = locator.resolve(2);
        assert!(found.stylesheet.is_some());
        assert!(found.script.is_none());
        assert_eq!(locator.resolve(3), ScreenResources::default());
    }
}
