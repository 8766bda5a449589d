//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `storefront_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Tiny probe validating core crate wiring independently of any host
    // runtime setup.
    println!("storefront_core ping={}", storefront_core::ping());
    println!("storefront_core version={}", storefront_core::core_version());
}
