use crate::debounce::Filter;
use crate::timing::Timing;
use crate::Level;

/// Upper bound of the consecutive press counter.
pub const MAX_REPEAT: u8 = 15;

/// Events produced by the gesture state machine.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressEvent {
    PressDown = 0,
    PressUp = 1,
    /// A press following a release inside the release timeout, fired right after `PressDown`
    PressRepeat = 2,
    SingleClick = 3,
    DoubleClick = 4,
    LongPressStart = 5,
    /// Fired on every tick while a long press is held
    LongPressHold = 6,
    /// Nothing happened on the last tick
    None = 7,
}

impl PressEvent {
    /// Every event a handler can be attached to.
    pub const ALL: [PressEvent; 7] = [
        PressEvent::PressDown,
        PressEvent::PressUp,
        PressEvent::PressRepeat,
        PressEvent::SingleClick,
        PressEvent::DoubleClick,
        PressEvent::LongPressStart,
        PressEvent::LongPressHold,
    ];

    /// Number of events that can carry a handler.
    pub const COUNT: usize = 7;

    pub(crate) fn index(self) -> Option<usize> {
        match self {
            PressEvent::None => None,
            other => Some(other as usize),
        }
    }
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Idle = 0,
    Pressed = 1,
    ReleasedWaitRepeat = 2,
    PressedAgain = 3,
    LongHeld = 5,
}

impl State {
    /// Decodes a raw state number, anything unknown falls back to `Idle`.
    pub fn from_raw(raw: u8) -> State {
        match raw {
            1 => State::Pressed,
            2 => State::ReleasedWaitRepeat,
            3 => State::PressedAgain,
            5 => State::LongHeld,
            _ => State::Idle,
        }
    }
}

/// Handlers to invoke after a step, in order. At most two: `PressDown` then `PressRepeat`.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub struct Fired {
    events: [Option<PressEvent>; 2],
}

impl Fired {
    fn one(event: PressEvent) -> Fired {
        Fired {
            events: [Some(event), None],
        }
    }

    fn two(first: PressEvent, second: PressEvent) -> Fired {
        Fired {
            events: [Some(first), Some(second)],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = PressEvent> + '_ {
        self.events.iter().filter_map(|event| *event)
    }

    pub fn is_empty(&self) -> bool {
        self.events[0].is_none()
    }
}

/// The debounce filter plus the gesture state machine of a single button.
///
/// It holds no handlers and does not read pins, `step` takes a raw sample and reports what
/// should be dispatched.
///
/// `ticks` is a 16 bit counter, it counts up to 65535 ticks and then wraps. It only runs while
/// the machine is outside `Idle`, and every threshold that reads it is far below the wrap point.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Machine {
    ticks: u16,
    repeat: u8,
    event: PressEvent,
    state: State,
    filter: Filter,
    active_level: Level,
}

impl Machine {
    pub const fn new(active_level: Level) -> Machine {
        Machine {
            ticks: 0,
            repeat: 0,
            event: PressEvent::None,
            state: State::Idle,
            filter: Filter::new(active_level.inverted()),
            active_level,
        }
    }

    /// Advances the machine by one tick using the raw level read for this tick.
    pub fn step(&mut self, raw: Level, timing: &Timing) -> Fired {
        if self.state != State::Idle {
            self.ticks = self.ticks.wrapping_add(1);
        }

        let pressed = self.filter.sample(raw, timing.debounce_ticks()) == self.active_level;

        match self.state {
            State::Idle => {
                if pressed {
                    self.ticks = 0;
                    self.repeat = 1;
                    self.enter(State::Pressed);
                    self.emit(PressEvent::PressDown)
                } else {
                    self.event = PressEvent::None;
                    Fired::default()
                }
            }
            State::Pressed => {
                if !pressed {
                    self.ticks = 0;
                    self.enter(State::ReleasedWaitRepeat);
                    self.emit(PressEvent::PressUp)
                } else if self.ticks > timing.long_ticks() {
                    self.enter(State::LongHeld);
                    self.emit(PressEvent::LongPressStart)
                } else {
                    Fired::default()
                }
            }
            State::ReleasedWaitRepeat => {
                if pressed {
                    if self.repeat < MAX_REPEAT {
                        self.repeat += 1;
                    }
                    self.ticks = 0;
                    self.enter(State::PressedAgain);
                    self.event = PressEvent::PressDown;
                    Fired::two(PressEvent::PressDown, PressEvent::PressRepeat)
                } else if self.ticks > timing.short_ticks() {
                    self.enter(State::Idle);
                    match self.repeat {
                        1 => self.emit(PressEvent::SingleClick),
                        2 => self.emit(PressEvent::DoubleClick),
                        _ => Fired::default(),
                    }
                } else {
                    Fired::default()
                }
            }
            State::PressedAgain => {
                if !pressed {
                    if self.ticks < timing.short_ticks() {
                        self.ticks = 0;
                        self.enter(State::ReleasedWaitRepeat);
                    } else {
                        self.enter(State::Idle);
                    }
                    self.emit(PressEvent::PressUp)
                } else {
                    // held past the release timeout, this press can still become a long press
                    if self.ticks > timing.short_ticks() {
                        self.enter(State::Pressed);
                    }
                    Fired::default()
                }
            }
            State::LongHeld => {
                if pressed {
                    self.emit(PressEvent::LongPressHold)
                } else {
                    self.enter(State::Idle);
                    self.emit(PressEvent::PressUp)
                }
            }
        }
    }

    fn emit(&mut self, event: PressEvent) -> Fired {
        self.event = event;
        Fired::one(event)
    }

    fn enter(&mut self, next: State) {
        trace!("button state {} -> {}", self.state, next);
        self.state = next;
    }

    pub const fn ticks(&self) -> u16 {
        self.ticks
    }

    pub const fn repeat(&self) -> u8 {
        self.repeat
    }

    pub const fn event(&self) -> PressEvent {
        self.event
    }

    pub const fn state(&self) -> State {
        self.state
    }

    pub const fn level(&self) -> Level {
        self.filter.level()
    }

    pub const fn active_level(&self) -> Level {
        self.active_level
    }
}
