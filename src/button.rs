use core::cell::Cell;
use core::fmt;

use crate::machine::{Machine, PressEvent, State};
use crate::registry::Registrar;
use crate::timing::Timing;
use crate::Level;

/// Reads the instantaneous level of a button's pin.
///
/// One reader can serve many buttons, the id given to `Button::new` is passed back on every read.
/// It is called once per button per tick and must not block.
pub trait PinLevel {
    fn level(&self, button_id: u8) -> Level;
}

impl<F> PinLevel for F
where
    F: Fn(u8) -> Level,
{
    fn level(&self, button_id: u8) -> Level {
        self(button_id)
    }
}

/// What a handler gets when its event fires.
pub struct Notice<'r, 'a> {
    button: &'a Button<'a>,
    event: PressEvent,
    registry: &'r dyn Registrar<'a>,
}

impl<'r, 'a> Notice<'r, 'a> {
    pub fn button(&self) -> &'a Button<'a> {
        self.button
    }

    /// The event being dispatched. This can differ from `Button::last_event` for `PressRepeat`.
    pub fn event(&self) -> PressEvent {
        self.event
    }

    /// The registry running the current tick. Records can be registered or unregistered through
    /// it, including the one being handled.
    pub fn registry(&self) -> &'r dyn Registrar<'a> {
        self.registry
    }
}

/// Event callback, called synchronously from `Registry::tick`.
///
/// Handlers run to completion before the tick moves on to the next button, so they should be
/// short. Nothing enforces this.
pub type Handler<'a> = &'a dyn Fn(&Notice<'_, 'a>);

/// A push-button tracked by a `Registry`.
///
/// The button is owned by the caller, registries only keep references to it. Its state lives in
/// `Cell`s so it can be read while it is registered, which also makes it `!Sync`.
pub struct Button<'a> {
    machine: Cell<Machine>,
    button_id: u8,
    pin: &'a dyn PinLevel,
    handlers: [Cell<Option<Handler<'a>>>; PressEvent::COUNT],
}

impl<'a> Button<'a> {
    /// Returns an idle button
    ///
    /// # Arguments
    ///
    /// * `pin` - Reader for the pin level, called with `button_id`
    /// * `active_level` - Level read while the button is physically pressed
    /// * `button_id` - Opaque id handed back to `pin`
    pub fn new(pin: &'a dyn PinLevel, active_level: Level, button_id: u8) -> Button<'a> {
        Button {
            machine: Cell::new(Machine::new(active_level)),
            button_id,
            pin,
            handlers: Default::default(),
        }
    }

    /// Sets the handler for `event`, replacing the previous one. Attaching to `PressEvent::None`
    /// does nothing.
    pub fn attach(&self, event: PressEvent, handler: Handler<'a>) {
        if let Some(index) = event.index() {
            self.handlers[index].set(Some(handler));
        }
    }

    pub fn detach(&self, event: PressEvent) {
        if let Some(index) = event.index() {
            self.handlers[index].set(None);
        }
    }

    /// Last event produced by the state machine, `PressEvent::None` while idle.
    pub fn last_event(&self) -> PressEvent {
        self.machine.get().event()
    }

    /// Number of presses in the current click sequence, saturates at 15.
    pub fn repeat_count(&self) -> u8 {
        self.machine.get().repeat()
    }

    pub fn state(&self) -> State {
        self.machine.get().state()
    }

    /// Ticks spent in the current timed state, wraps after 65535.
    pub fn ticks(&self) -> u16 {
        self.machine.get().ticks()
    }

    /// Debounced level.
    pub fn level(&self) -> Level {
        self.machine.get().level()
    }

    pub fn active_level(&self) -> Level {
        self.machine.get().active_level()
    }

    pub fn id(&self) -> u8 {
        self.button_id
    }

    /// Samples the pin, advances the state machine and dispatches the fired events.
    ///
    /// The new state is stored before any handler runs, handlers always observe the state the
    /// tick ended in.
    pub(crate) fn process(&'a self, timing: &Timing, registry: &dyn Registrar<'a>) {
        let raw = self.pin.level(self.button_id);

        let mut machine = self.machine.get();
        let fired = machine.step(raw, timing);
        self.machine.set(machine);

        for event in fired.iter() {
            let handler = match event.index() {
                Some(index) => self.handlers[index].get(),
                None => None,
            };
            if let Some(handler) = handler {
                handler(&Notice {
                    button: self,
                    event,
                    registry,
                });
            }
        }
    }
}

impl<'a> fmt::Debug for Button<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("button_id", &self.button_id)
            .field("machine", &self.machine.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use core::cell::RefCell;
    use typenum::consts::*;

    #[test]
    fn new_button_is_idle() {
        let pin = |_: u8| Level::High;
        let button = Button::new(&pin, Level::Low, 7);

        assert_eq!(PressEvent::None, button.last_event());
        assert_eq!(State::Idle, button.state());
        assert_eq!(Level::High, button.level());
        assert_eq!(Level::Low, button.active_level());
        assert_eq!(0, button.repeat_count());
        assert_eq!(7, button.id());
    }

    #[test]
    fn pin_reader_gets_button_id() {
        let seen = Cell::new(None);
        let pin = |id: u8| {
            seen.set(Some(id));
            Level::High
        };
        let button = Button::new(&pin, Level::Low, 42);
        let registry: Registry<U1> = Registry::new();
        registry.register(&button).unwrap();

        registry.tick();
        assert_eq!(Some(42), seen.get());
    }

    #[test]
    fn attach_overwrites() {
        let first = Cell::new(0);
        let second = Cell::new(0);
        let on_first = |_: &Notice| first.set(first.get() + 1);
        let on_second = |_: &Notice| second.set(second.get() + 1);

        let pin = |_: u8| Level::Low;
        let button = Button::new(&pin, Level::Low, 0);
        button.attach(PressEvent::PressDown, &on_first);
        button.attach(PressEvent::PressDown, &on_second);

        let registry: Registry<U1> = Registry::new();
        registry.register(&button).unwrap();
        for _ in 0..3 {
            registry.tick();
        }

        assert_eq!(0, first.get());
        assert_eq!(1, second.get());
    }

    #[test]
    fn detach_silences_event() {
        let calls = Cell::new(0);
        let on_down = |_: &Notice| calls.set(calls.get() + 1);

        let pin = |_: u8| Level::Low;
        let button = Button::new(&pin, Level::Low, 0);
        button.attach(PressEvent::PressDown, &on_down);
        button.detach(PressEvent::PressDown);

        let registry: Registry<U1> = Registry::new();
        registry.register(&button).unwrap();
        for _ in 0..3 {
            registry.tick();
        }

        assert_eq!(0, calls.get());
        assert_eq!(PressEvent::PressDown, button.last_event());
    }

    #[test]
    fn repeat_handler_follows_press_down() {
        let log = RefCell::new(Vec::new());
        let record = |notice: &Notice| log.borrow_mut().push(notice.event());

        let level = Cell::new(Level::High);
        let pin = |_: u8| level.get();
        let button = Button::new(&pin, Level::Low, 0);
        for &event in PressEvent::ALL.iter() {
            button.attach(event, &record);
        }

        let registry: Registry<U1> = Registry::new();
        registry.register(&button).unwrap();

        for &(raw, count) in [(Level::Low, 5), (Level::High, 5), (Level::Low, 5)].iter() {
            level.set(raw);
            for _ in 0..count {
                registry.tick();
            }
        }

        assert_eq!(
            vec![
                PressEvent::PressDown,
                PressEvent::PressUp,
                PressEvent::PressDown,
                PressEvent::PressRepeat,
            ],
            *log.borrow()
        );
        assert_eq!(PressEvent::PressDown, button.last_event());
        assert_eq!(2, button.repeat_count());
    }

    #[test]
    fn handler_sees_committed_state() {
        let observed = Cell::new(None);
        let on_down = |notice: &Notice| observed.set(Some(notice.button().state()));

        let pin = |_: u8| Level::Low;
        let button = Button::new(&pin, Level::Low, 0);
        button.attach(PressEvent::PressDown, &on_down);

        let registry: Registry<U1> = Registry::new();
        registry.register(&button).unwrap();
        for _ in 0..3 {
            registry.tick();
        }

        assert_eq!(Some(State::Pressed), observed.get());
    }
}
