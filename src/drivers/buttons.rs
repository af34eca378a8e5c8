// Pincab — Cabinet Switch Bank
//
// Pulled-up GPIO lines, one per cabinet switch. The active-low inversion
// happens here: the rest of the system only ever sees "is pressed".

use esp_idf_hal::gpio::{AnyIOPin, Input, PinDriver};

use pincab_core::controller::Buttons;

pub struct ButtonBank<'d> {
    pins: Vec<PinDriver<'d, AnyIOPin, Input>>,
}

impl<'d> ButtonBank<'d> {
    /// `pins` must be in the same order as the key-binding table.
    pub fn new(pins: Vec<PinDriver<'d, AnyIOPin, Input>>) -> Self {
        Self { pins }
    }
}

impl Buttons for ButtonBank<'_> {
    fn is_pressed(&mut self, line: usize) -> bool {
        // Pull-up wiring: low level = switch closed.
        self.pins[line].is_low()
    }
}
