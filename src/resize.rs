use ratatui::layout::Size;
use std::fmt;

type Handler<C> = Box<dyn FnMut(&mut C, Size)>;

/// Identifies a registered resize handler so that it can be removed later
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct HookHandle(u64);

/// Handlers run whenever the viewport is resized.  Each handler receives a
/// mutable reference to a shared context `C` and the new viewport size; any
/// further arguments it needs are captured by the closure when it is
/// registered.
pub(crate) struct ResizeHooks<C> {
    next_id: u64,
    handlers: Vec<(HookHandle, Handler<C>)>,
}

impl<C> ResizeHooks<C> {
    pub(crate) fn new() -> Self {
        ResizeHooks {
            next_id: 0,
            handlers: Vec::new(),
        }
    }

    /// Adds `handler` after all previously registered handlers
    pub(crate) fn register<F>(&mut self, handler: F) -> HookHandle
    where
        F: FnMut(&mut C, Size) + 'static,
    {
        let handle = HookHandle(self.next_id);
        self.next_id += 1;
        self.handlers.push((handle, Box::new(handler)));
        handle
    }

    /// Returns `false` if `handle` was not registered
    pub(crate) fn unregister(&mut self, handle: HookHandle) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != handle);
        self.handlers.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Runs every handler once, in registration order
    pub(crate) fn fire(&mut self, context: &mut C, size: Size) {
        log::trace!(
            "Dispatching resize to {}x{} to {} handler(s)",
            size.width,
            size.height,
            self.handlers.len()
        );
        for (_, handler) in &mut self.handlers {
            handler(context, size);
        }
    }
}

impl<C> Default for ResizeHooks<C> {
    fn default() -> Self {
        ResizeHooks::new()
    }
}

impl<C> fmt::Debug for ResizeHooks<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeHooks")
            .field("next_id", &self.next_id)
            .field(
                "handlers",
                &self.handlers.iter().map(|(h, _)| h).collect::<Vec<_>>(),
            )
            .finish()
    }
}
