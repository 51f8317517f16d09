use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Wait for a signal given by name, print a message and exit.
fn main() {
    let args: Vec<String> = std::env::args().collect();

    let sig = match args.get(1).map(String::as_str) {
        Some("usr1") | None => signal_hook::consts::SIGUSR1,
        Some("usr2") => signal_hook::consts::SIGUSR2,
        Some("term") => signal_hook::consts::SIGTERM,
        Some("hup") => signal_hook::consts::SIGHUP,
        Some("int") => signal_hook::consts::SIGINT,
        Some(_) => panic!("unknown opt"),
    };

    let term = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(sig, Arc::clone(&term)).unwrap();
    println!("wait for signal");
    while !term.load(Ordering::Relaxed) {
        thread::sleep(Duration::from_millis(50));
    }
    println!("got signal {sig}");
}
