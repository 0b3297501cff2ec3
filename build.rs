fn main() {
    // Forward ESP-IDF link arguments when building for the device.
    // Feature flags reach build scripts as environment variables, not cfgs;
    // host builds (--no-default-features) have no espidf env to export.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
