//! Multibutton is a library to debounce push-buttons and recognize gestures on them: press,
//! release, repeated press, single and double click, and long press. It is driven by a periodic
//! tick instead of interrupts and does not allocate.
//!
//! # Ticking
//!
//! Every registered `Button` is sampled once per call to `Registry::tick`. A new pin level is
//! accepted after `DEBOUNCE_TICKS` consecutive samples disagreeing with the current one, and the
//! gesture thresholds are counted in ticks. With the default `Timing`, `tick` must be called
//! every 5ms, giving a 15ms debounce, a 300ms release timeout and a 1s long press.
//!
//! Buttons are owned by the caller and registered by reference, the registry capacity is set
//! with a typenum unsigned:
//! ```rust,ignore
//! let registry: Registry<U4> = Registry::new();
//! ```
//! **NOTE:** Handlers run synchronously inside `tick`, keep them short.
//!
//! ## Example
//! ```rust
//! use core::cell::Cell;
//! use multibutton::typenum::consts::U4;
//! use multibutton::{Button, Level, Notice, PressEvent, Registry, State};
//!
//! let clicks = Cell::new(0);
//! let on_click = |_: &Notice| clicks.set(clicks.get() + 1);
//!
//! // active-low button, pulled up while released
//! let level = Cell::new(Level::High);
//! let read_pin = |_id: u8| level.get();
//!
//! let button = Button::new(&read_pin, Level::Low, 0);
//! button.attach(PressEvent::SingleClick, &on_click);
//!
//! let registry: Registry<U4> = Registry::new();
//! registry.register(&button).unwrap();
//!
//! level.set(Level::Low);
//! for _ in 0..10 {
//!     registry.tick();
//! }
//! assert_eq!(PressEvent::PressDown, button.last_event());
//!
//! level.set(Level::High);
//! for _ in 0..80 {
//!     registry.tick();
//! }
//! assert_eq!(1, clicks.get());
//! assert_eq!(State::Idle, button.state());
//! ```

#![cfg_attr(not(test), no_std)]

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::trace!($($arg)*);
    }};
}

mod button;
mod debounce;
mod machine;
mod registry;
mod timing;

use core::ops::Not;

pub use generic_array::typenum;

pub use button::{Button, Handler, Notice, PinLevel};
pub use debounce::Filter;
pub use machine::{Fired, Machine, PressEvent, State, MAX_REPEAT};
pub use registry::{Registrar, Registry};
pub use timing::{
    Timing, DEBOUNCE_TICKS, LONG_PRESS_MS, MAX_DEBOUNCE_TICKS, SHORT_PRESS_MS, TICKS_INTERVAL_MS,
};

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The button passed to `register` is already in the registry
    AlreadyRegistered,
    /// Every slot of the registry is taken
    RegistryFull,
    /// Zero tick interval, debounce outside `1..=7`, or a long press threshold not above the
    /// short one
    InvalidTiming,
}

/// Logical level of a pin.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub const fn inverted(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        self.inverted()
    }
}

impl From<bool> for Level {
    /// `true` is `High`.
    fn from(high: bool) -> Level {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}
