use core::cell::Cell;
use core::ptr;

use generic_array::{ArrayLength, GenericArray};

use crate::button::Button;
use crate::timing::Timing;
use crate::Error;

type Slot<'a> = Cell<Option<&'a Button<'a>>>;

/// Registration operations, usable from inside a handler while a tick is running.
pub trait Registrar<'a> {
    /// Starts ticking `button`. Fails without changing anything if it is already registered or
    /// there is no free slot.
    fn register(&self, button: &'a Button<'a>) -> Result<(), Error>;

    /// Stops ticking `button`, does nothing if it is not registered.
    fn unregister(&self, button: &Button<'a>);

    fn contains(&self, button: &Button<'a>) -> bool;
}

/// The set of buttons advanced by `tick`.
///
/// Capacity is fixed by `N`, an unsigned type from the typenum crate, e.g. `Registry<U8>` tracks
/// up to 8 buttons. Buttons are held by reference, the caller keeps ownership of them.
///
/// The registry does no locking. `tick`, `register` and `unregister` must all be called from the
/// same execution context, or the caller must serialize them, e.g. by masking the timer
/// interrupt that drives `tick` while registering from the main loop.
pub struct Registry<'a, N: ArrayLength<Slot<'a>>> {
    slots: GenericArray<Slot<'a>, N>,
    timing: Timing,
}

impl<'a, N> Registry<'a, N>
where
    N: ArrayLength<Slot<'a>>,
{
    /// Returns an empty registry using the default `Timing`, which expects `tick` every 5ms.
    pub fn new() -> Registry<'a, N> {
        Registry::with_timing(Timing::default())
    }

    pub fn with_timing(timing: Timing) -> Registry<'a, N> {
        Registry {
            slots: GenericArray::default(),
            timing,
        }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Advances every registered button by one tick.
    ///
    /// Must be called at the interval the `Timing` was built for. Buttons are visited in slot
    /// order and their handlers run inline. A button unregistered by a handler is skipped if it
    /// was not visited yet; one registered by a handler into a later free slot is visited in this
    /// same tick.
    pub fn tick(&self) {
        for slot in self.slots.iter() {
            if let Some(button) = slot.get() {
                button.process(&self.timing, self);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        N::USIZE
    }

    /// Starts ticking `button`.
    ///
    /// Fails without changing anything if the button is already registered or every slot is
    /// taken.
    pub fn register(&self, button: &'a Button<'a>) -> Result<(), Error> {
        if self.contains(button) {
            return Err(Error::AlreadyRegistered);
        }
        let free = self
            .slots
            .iter()
            .find(|slot| slot.get().is_none())
            .ok_or(Error::RegistryFull)?;
        free.set(Some(button));
        trace!("button {} registered", button.id());
        Ok(())
    }

    /// Stops ticking `button`, does nothing if it is not registered.
    pub fn unregister(&self, button: &Button<'a>) {
        if let Some(index) = self.position(button) {
            self.slots[index].set(None);
            trace!("button {} unregistered", button.id());
        }
    }

    pub fn contains(&self, button: &Button<'a>) -> bool {
        self.position(button).is_some()
    }

    fn position(&self, button: &Button<'a>) -> Option<usize> {
        self.slots.iter().position(|slot| match slot.get() {
            Some(registered) => ptr::eq(registered, button),
            None => false,
        })
    }
}

impl<'a, N> Registrar<'a> for Registry<'a, N>
where
    N: ArrayLength<Slot<'a>>,
{
    fn register(&self, button: &'a Button<'a>) -> Result<(), Error> {
        Registry::register(self, button)
    }

    fn unregister(&self, button: &Button<'a>) {
        Registry::unregister(self, button)
    }

    fn contains(&self, button: &Button<'a>) -> bool {
        Registry::contains(self, button)
    }
}

impl<'a, N> Default for Registry<'a, N>
where
    N: ArrayLength<Slot<'a>>,
{
    fn default() -> Self {
        Registry::new()
    }
}
