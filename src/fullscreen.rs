//! Best-effort fullscreen control.
//!
//! Backends differ in how (and whether) they can go fullscreen. The mode to
//! use is detected once, when [`Fullscreen::detect`] runs at startup, and
//! every later request goes through that mode. Failures are logged and
//! swallowed: navigation never depends on fullscreen.

use crate::deck::{FullscreenIcon, Surface};
use crate::error::FullscreenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// A borderless window covering the monitor, no display mode switch
    Borderless,
    /// True exclusive fullscreen on the current monitor
    Exclusive,
    Unsupported,
}

pub trait FullscreenBackend {
    fn supports(&self, capability: Capability) -> bool;
    fn is_active(&self, capability: Capability) -> bool;
    fn set_active(&mut self, capability: Capability, active: bool) -> Result<(), FullscreenError>;
}

#[derive(Debug)]
pub struct Fullscreen {
    capability: Capability,
    last_seen: bool,
}

impl Fullscreen {
    pub fn detect<B: FullscreenBackend + ?Sized>(backend: &B) -> Self {
        let capability = [Capability::Borderless, Capability::Exclusive]
            .into_iter()
            .find(|c| backend.supports(*c))
            .unwrap_or(Capability::Unsupported);
        tracing::debug!(?capability, "fullscreen capability detected");

        Self {
            capability,
            last_seen: capability != Capability::Unsupported && backend.is_active(capability),
        }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn is_active<B: FullscreenBackend + ?Sized>(&self, backend: &B) -> bool {
        self.capability != Capability::Unsupported && backend.is_active(self.capability)
    }

    pub fn toggle<B: FullscreenBackend + ?Sized>(&self, backend: &mut B) {
        if self.is_active(backend) {
            self.exit(backend);
        } else {
            self.enter(backend);
        }
    }

    pub fn enter<B: FullscreenBackend + ?Sized>(&self, backend: &mut B) {
        if let Err(e) = self.request(backend, true) {
            tracing::warn!(error = %e, "error attempting to enable fullscreen");
        }
    }

    pub fn exit<B: FullscreenBackend + ?Sized>(&self, backend: &mut B) {
        if let Err(e) = self.request(backend, false) {
            tracing::warn!(error = %e, "error attempting to exit fullscreen");
        }
    }

    fn request<B: FullscreenBackend + ?Sized>(
        &self,
        backend: &mut B,
        active: bool,
    ) -> Result<(), FullscreenError> {
        if self.capability == Capability::Unsupported {
            return Err(FullscreenError::Unsupported);
        }
        if backend.is_active(self.capability) == active {
            return Ok(());
        }
        backend.set_active(self.capability, active)
    }

    /// Observes the backend and, when the fullscreen state changed since the
    /// last call, updates the fullscreen button. Returns whether it changed.
    pub fn sync<B, S>(&mut self, backend: &B, surface: &mut S) -> bool
    where
        B: FullscreenBackend + ?Sized,
        S: Surface + ?Sized,
    {
        let active = self.is_active(backend);
        if active == self.last_seen {
            return false;
        }
        self.last_seen = active;
        tracing::debug!(active, "fullscreen state changed");
        update_button(surface, active);
        true
    }
}

/// Points the fullscreen button at the action it will perform next.
pub fn update_button<S: Surface + ?Sized>(surface: &mut S, active: bool) {
    let Some(button) = surface.fullscreen_button_mut() else {
        return;
    };
    if active {
        button.icon = FullscreenIcon::Collapse;
        button.title = "Exit Fullscreen".to_string();
    } else {
        button.icon = FullscreenIcon::Expand;
        button.title = "Enter Fullscreen".to_string();
    }
}
