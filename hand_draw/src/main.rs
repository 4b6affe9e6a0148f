//! hand_draw — interactive entry point.

use std::path::PathBuf;

use hand_draw::app::{run, AppConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Hand Draw — Gesture Ink on a Live Video Feed          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "camera")]
    println!("  Mode: Webcam + MediaPipe detector");
    #[cfg(not(feature = "camera"))]
    println!("  Mode: Mouse + keyboard simulation  (use --features camera for a webcam)");
    println!();
    println!("  Hold a pose key and move the mouse to 'gesture':");
    println!("    D draw   G pinch-draw   V stop      E erase   C change color");
    println!("    X clear  F fist         O space     T newline P backspace");
    println!("  One-shot: S save   U toggle UI   Q / Esc quit");
    println!();

    let config_path: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);
    let cfg = match AppConfig::load(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    println!("  Opening window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
