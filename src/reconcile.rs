//! Policy for authoritative pushes racing local interaction.
//!
//! The value is always stored; the only question is whether the control may
//! repaint from it. Repainting mid-drag would fight the finger, and
//! repainting inside the suppression window would snap a just-committed
//! value back to a stale echo.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileAction {
    /// Apply the pushed value to the rendered state.
    Repaint,
    /// Keep the pushed value as the new authoritative state but leave the
    /// rendered value alone.
    StoreOnly,
}

pub fn authoritative_action(interacting: bool, suppressed: bool) -> ReconcileAction {
    if interacting || suppressed {
        ReconcileAction::StoreOnly
    } else {
        ReconcileAction::Repaint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_pushes_repaint() {
        assert_eq!(authoritative_action(false, false), ReconcileAction::Repaint);
    }

    #[test]
    fn dragging_and_suppressed_pushes_store_only() {
        assert_eq!(
            authoritative_action(true, false),
            ReconcileAction::StoreOnly
        );
        assert_eq!(
            authoritative_action(false, true),
            ReconcileAction::StoreOnly
        );
        assert_eq!(authoritative_action(true, true), ReconcileAction::StoreOnly);
    }
}
