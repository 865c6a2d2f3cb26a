use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;

/// Wraps `action` so that a burst of events only fires it once, `delay_ms`
/// after the last event. Keeps a double click on the capture button from
/// grabbing two frames.
pub fn debounce<E, F>(delay_ms: u32, action: F) -> Callback<E>
where
    E: 'static,
    F: Fn() + Clone + 'static,
{
    let pending: Rc<RefCell<Option<Timeout>>> = Rc::default();

    Callback::from(move |_: E| {
        if let Some(previous) = pending.borrow_mut().take() {
            previous.cancel();
        }
        let action = action.clone();
        *pending.borrow_mut() = Some(Timeout::new(delay_ms, move || action()));
    })
}
