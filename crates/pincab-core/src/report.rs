// Pincab — HID Keyboard Report Assembly
//
// Boot-protocol keyboard report: one modifier bitmask byte plus up to six
// concurrently held key usages. The firmware pushes the whole report to the
// host on every change.

use crate::events::Key;

// ---------------------------------------------------------------------------
// Key encoding (HID usage page 0x07)
// ---------------------------------------------------------------------------

/// Boot-protocol encoding for a key: either a bit in the modifier byte or a
/// usage id in the 6-slot key array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HidCode {
    Modifier(u8),
    Usage(u8),
}

impl Key {
    pub fn hid_code(self) -> HidCode {
        use HidCode::*;
        match self {
            Key::LeftCtrl => Modifier(0x01),
            Key::LeftShift => Modifier(0x02),
            Key::RightCtrl => Modifier(0x10),
            Key::RightShift => Modifier(0x20),
            Key::Z => Usage(0x1d),
            Key::Slash => Usage(0x38),
            Key::Enter => Usage(0x28),
            Key::Esc => Usage(0x29),
            Key::Num1 => Usage(0x1e),
            Key::Num5 => Usage(0x22),
        }
    }
}

// ---------------------------------------------------------------------------
// Shadow report
// ---------------------------------------------------------------------------

/// The keyboard report as the host currently sees it.
///
/// Press/release mutate this in place; a zero slot in `keys` is empty. With
/// all six slots taken a further press is dropped (boot-protocol rollover
/// limit) — its release is then a no-op, so the report stays consistent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyReport {
    modifier: u8,
    keys: [u8; 6],
}

impl KeyReport {
    pub fn press(&mut self, key: Key) {
        match key.hid_code() {
            HidCode::Modifier(bit) => self.modifier |= bit,
            HidCode::Usage(usage) => {
                if self.keys.contains(&usage) {
                    return;
                }
                if let Some(slot) = self.keys.iter_mut().find(|slot| **slot == 0) {
                    *slot = usage;
                }
            }
        }
    }

    pub fn release(&mut self, key: Key) {
        match key.hid_code() {
            HidCode::Modifier(bit) => self.modifier &= !bit,
            HidCode::Usage(usage) => {
                for slot in self.keys.iter_mut() {
                    if *slot == usage {
                        *slot = 0;
                    }
                }
            }
        }
    }

    pub fn modifier(&self) -> u8 {
        self.modifier
    }

    pub fn keycodes(&self) -> [u8; 6] {
        self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_set_and_clear_bits() {
        let mut r = KeyReport::default();
        r.press(Key::LeftShift);
        r.press(Key::RightCtrl);
        assert_eq!(r.modifier(), 0x02 | 0x10);
        assert_eq!(r.keycodes(), [0; 6]);

        r.release(Key::LeftShift);
        assert_eq!(r.modifier(), 0x10);
        r.release(Key::RightCtrl);
        assert_eq!(r.modifier(), 0);
    }

    #[test]
    fn usages_fill_and_vacate_slots() {
        let mut r = KeyReport::default();
        r.press(Key::Enter);
        r.press(Key::Num1);
        assert_eq!(r.keycodes(), [0x28, 0x1e, 0, 0, 0, 0]);

        r.release(Key::Enter);
        assert_eq!(r.keycodes(), [0, 0x1e, 0, 0, 0, 0]);

        // A freed slot is reused by the next press.
        r.press(Key::Num5);
        assert_eq!(r.keycodes(), [0x22, 0x1e, 0, 0, 0, 0]);
    }

    #[test]
    fn duplicate_press_occupies_one_slot() {
        let mut r = KeyReport::default();
        r.press(Key::Z);
        r.press(Key::Z);
        assert_eq!(r.keycodes(), [0x1d, 0, 0, 0, 0, 0]);

        r.release(Key::Z);
        assert_eq!(r.keycodes(), [0; 6]);
    }

    #[test]
    fn press_on_a_full_report_is_dropped() {
        let mut r = KeyReport::default();
        // Six unrelated usages already held.
        r.keys = [0x04, 0x05, 0x06, 0x07, 0x08, 0x09];

        r.press(Key::Z);
        assert_eq!(r.keycodes(), [0x04, 0x05, 0x06, 0x07, 0x08, 0x09]);

        // The matching release is a no-op.
        r.release(Key::Z);
        assert_eq!(r.keycodes(), [0x04, 0x05, 0x06, 0x07, 0x08, 0x09]);
    }

    #[test]
    fn cabinet_keys_use_expected_usages() {
        assert_eq!(Key::Z.hid_code(), HidCode::Usage(0x1d));
        assert_eq!(Key::Slash.hid_code(), HidCode::Usage(0x38));
        assert_eq!(Key::Enter.hid_code(), HidCode::Usage(0x28));
        assert_eq!(Key::LeftShift.hid_code(), HidCode::Modifier(0x02));
    }
}
