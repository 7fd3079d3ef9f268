//! Device identity derived from the station MAC address.
//!
//! The node id is the full MAC in colon-separated uppercase hex
//! (`AA:BB:CC:DD:EE:FF`).  It is stable across reboots (factory eFuse)
//! and is what remote actions are addressed to.

use core::fmt::Write;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// `AA:BB:CC:DD:EE:FF` is exactly 17 characters.
pub type NodeIdString = heapless::String<17>;

/// Read the Wi-Fi station MAC from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    let err = unsafe {
        esp_idf_svc::sys::esp_read_mac(
            mac.as_mut_ptr(),
            esp_idf_svc::sys::esp_mac_type_t_ESP_MAC_WIFI_STA,
        )
    };
    if err != esp_idf_svc::sys::ESP_OK as i32 {
        log::warn!("esp_read_mac failed ({}), using zero MAC", err);
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// Render `mac` as the node id.
pub fn mac_string(mac: &MacAddress) -> NodeIdString {
    let mut id = NodeIdString::new();
    let _ = write!(
        id,
        "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    );
    id
}
