fn main() {
    // Host builds only compile the library; the ESP-IDF environment is only
    // exported when cross-compiling the firmware.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
