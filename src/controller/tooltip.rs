use tracing::trace;

use crate::host::{ListenerId, MapHost, ScreenPos};

/// The single pointer-following tooltip element and its move subscription.
///
/// Created at surface mount and released at unmount; the pointer-move
/// subscription only exists while a boundary is hovered.
#[derive(Debug, Default)]
pub(crate) struct Tooltip {
    created: bool,
    listener: Option<ListenerId>,
    offset: f64,
}

impl Tooltip {
    pub(crate) fn new(offset: f64) -> Self {
        Self { created: false, listener: None, offset }
    }

    pub(crate) fn create<H: MapHost>(&mut self, host: &mut H) {
        if !self.created {
            host.create_tooltip();
            self.created = true;
        }
    }

    pub(crate) fn show<H: MapHost>(&mut self, host: &mut H, text: &str, at: ScreenPos) {
        if self.created {
            host.show_tooltip(text, at.offset(self.offset));
        }
        if self.listener.is_none() {
            let id = host.subscribe_pointer_move();
            trace!("tooltip tracking pointer via {id}");
            self.listener = Some(id);
        }
    }

    pub(crate) fn follow<H: MapHost>(&mut self, host: &mut H, at: ScreenPos) {
        if self.created && self.listener.is_some() {
            host.move_tooltip(at.offset(self.offset));
        }
    }

    pub(crate) fn hide<H: MapHost>(&mut self, host: &mut H) {
        if self.created {
            host.hide_tooltip();
        }
        if let Some(id) = self.listener.take() {
            host.unsubscribe_pointer_move(id);
        }
    }

    pub(crate) fn release<H: MapHost>(&mut self, host: &mut H) {
        self.hide(host);
        if self.created {
            host.remove_tooltip();
            self.created = false;
        }
    }

    #[inline] pub(crate) fn is_tracking(&self) -> bool { self.listener.is_some() }
}
