// Pincab — USB HID Keyboard
//
// Boot-protocol keyboard on the ESP32-S3's native USB-OTG port, driven
// through the esp_tinyusb component (raw bindings — see
// `[[package.metadata.esp-idf-sys.extra_components]]` in Cargo.toml).
// Each Down/Up mutates the shadow report and pushes the whole report to the
// interrupt endpoint.

use pincab_core::controller::KeyPort;
use pincab_core::events::Key;
use pincab_core::report::KeyReport;

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

const REPORT_DESC_LEN: usize = 63;

// Standard boot keyboard report: 8 modifier bits, 1 reserved byte,
// 5 LED output bits + padding, 6 key-usage slots. No report id.
static HID_REPORT_DESCRIPTOR: [u8; REPORT_DESC_LEN] = [
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xa1, 0x01, // Collection (Application)
    0x05, 0x07, //   Usage Page (Keyboard)
    0x19, 0xe0, //   Usage Minimum (LeftControl)
    0x29, 0xe7, //   Usage Maximum (Right GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x01, //   Input (Constant)
    0x95, 0x05, //   Report Count (5)
    0x75, 0x01, //   Report Size (1)
    0x05, 0x08, //   Usage Page (LEDs)
    0x19, 0x01, //   Usage Minimum (Num Lock)
    0x29, 0x05, //   Usage Maximum (Kana)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x03, //   Report Size (3)
    0x91, 0x01, //   Output (Constant)
    0x95, 0x06, //   Report Count (6)
    0x75, 0x08, //   Report Size (8)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x65, //   Logical Maximum (101)
    0x05, 0x07, //   Usage Page (Keyboard)
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0x65, //   Usage Maximum (101)
    0x81, 0x00, //   Input (Data, Array)
    0xc0, // End Collection
];

const EPNUM_HID: u8 = 0x81; // EP1 IN
const CONFIG_TOTAL_LEN: usize = 9 + 9 + 9 + 7;

// One configuration, one HID interface (boot subclass, keyboard protocol),
// one interrupt IN endpoint. Device and string descriptors come from the
// esp_tinyusb defaults.
static CONFIG_DESCRIPTOR: [u8; CONFIG_TOTAL_LEN] = [
    // Configuration: total length, 1 interface, bus powered + remote wakeup, 100 mA
    0x09, 0x02, CONFIG_TOTAL_LEN as u8, 0x00, 0x01, 0x01, 0x00, 0xa0, 0x32,
    // Interface 0: HID, boot subclass, keyboard protocol, 1 endpoint
    0x09, 0x04, 0x00, 0x00, 0x01, 0x03, 0x01, 0x01, 0x00,
    // HID 1.11, one report descriptor
    0x09, 0x21, 0x11, 0x01, 0x00, 0x01, 0x22, REPORT_DESC_LEN as u8, 0x00,
    // Endpoint: interrupt IN, 8-byte packets, 10 ms interval
    0x07, 0x05, EPNUM_HID, 0x03, 0x08, 0x00, 0x0a,
];

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

pub struct UsbKeyboard {
    report: KeyReport,
}

impl UsbKeyboard {
    /// Install the TinyUSB driver and expose the keyboard to the host.
    /// The component spawns its own service task; from here on the device
    /// only needs reports pushed at it.
    pub fn install() -> anyhow::Result<Self> {
        let mut config: esp_idf_sys::tinyusb_config_t = unsafe { core::mem::zeroed() };
        config.configuration_descriptor = CONFIG_DESCRIPTOR.as_ptr();

        esp_idf_sys::esp!(unsafe { esp_idf_sys::tinyusb_driver_install(&config) })?;
        log::info!("USB HID keyboard installed");

        Ok(Self {
            report: KeyReport::default(),
        })
    }

    /// Push the current shadow report to the host.
    fn send(&mut self) -> anyhow::Result<()> {
        let mut keycodes = self.report.keycodes();
        unsafe {
            if !esp_idf_sys::tud_mounted() {
                anyhow::bail!("USB device not mounted");
            }
            if !esp_idf_sys::tud_hid_n_ready(0) {
                anyhow::bail!("HID endpoint busy");
            }
            if !esp_idf_sys::tud_hid_n_keyboard_report(
                0,
                0,
                self.report.modifier(),
                keycodes.as_mut_ptr(),
            ) {
                anyhow::bail!("HID report rejected");
            }
        }
        Ok(())
    }
}

impl KeyPort for UsbKeyboard {
    // The shadow report is updated before the transfer is attempted, so a
    // failed send leaves it mirroring the controller's press state.
    fn down(&mut self, key: Key) -> anyhow::Result<()> {
        self.report.press(key);
        self.send()
    }

    fn up(&mut self, key: Key) -> anyhow::Result<()> {
        self.report.release(key);
        self.send()
    }
}

// ---------------------------------------------------------------------------
// TinyUSB HID callbacks — the component links against these.
// ---------------------------------------------------------------------------

#[no_mangle]
extern "C" fn tud_hid_descriptor_report_cb(_instance: u8) -> *const u8 {
    HID_REPORT_DESCRIPTOR.as_ptr()
}

#[no_mangle]
extern "C" fn tud_hid_get_report_cb(
    _instance: u8,
    _report_id: u8,
    _report_type: esp_idf_sys::hid_report_type_t,
    _buffer: *mut u8,
    _reqlen: u16,
) -> u16 {
    0
}

#[no_mangle]
extern "C" fn tud_hid_set_report_cb(
    _instance: u8,
    _report_id: u8,
    _report_type: esp_idf_sys::hid_report_type_t,
    _buffer: *const u8,
    _bufsize: u16,
) {
    // Host-to-device reports (keyboard LEDs) are ignored.
}
