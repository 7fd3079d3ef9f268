fn main() {
    // ESP-IDF build environment is only needed for the firmware binary.
    // Host builds (`--no-default-features`) skip it entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
