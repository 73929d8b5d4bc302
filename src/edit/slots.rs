//! Which record, if any, has its edit form open, tracked per kind.

use crate::domain::EntityKind;

/// One open edit form per entity kind; kinds are independent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSlots {
    employee: Option<String>,
    location: Option<String>,
    shift: Option<String>,
}

impl EditSlots {
    fn slot_mut(&mut self, kind: EntityKind) -> &mut Option<String> {
        match kind {
            EntityKind::Employee => &mut self.employee,
            EntityKind::Location => &mut self.location,
            EntityKind::Shift => &mut self.shift,
        }
    }

    /// Open the form for `id`, closing any other open form of the same
    /// kind. Returns the id whose form was closed.
    pub fn open(&mut self, kind: EntityKind, id: impl Into<String>) -> Option<String> {
        self.slot_mut(kind).replace(id.into())
    }

    pub fn close(&mut self, kind: EntityKind) -> Option<String> {
        self.slot_mut(kind).take()
    }

    pub fn current(&self, kind: EntityKind) -> Option<&str> {
        match kind {
            EntityKind::Employee => self.employee.as_deref(),
            EntityKind::Location => self.location.as_deref(),
            EntityKind::Shift => self.shift.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_replaces_within_kind() {
        let mut slots = EditSlots::default();
        assert_eq!(slots.open(EntityKind::Employee, "E1"), None);
        assert_eq!(slots.open(EntityKind::Employee, "E2"), Some("E1".to_string()));
        assert_eq!(slots.current(EntityKind::Employee), Some("E2"));
    }

    #[test]
    fn test_kinds_do_not_interfere() {
        let mut slots = EditSlots::default();
        slots.open(EntityKind::Employee, "E1");
        slots.open(EntityKind::Location, "L1");
        slots.open(EntityKind::Shift, "S1");
        assert_eq!(slots.close(EntityKind::Location), Some("L1".to_string()));
        assert_eq!(slots.current(EntityKind::Employee), Some("E1"));
        assert_eq!(slots.current(EntityKind::Location), None);
        assert_eq!(slots.current(EntityKind::Shift), Some("S1"));
    }
}
