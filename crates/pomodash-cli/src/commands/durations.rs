use pomodash_core::timer::{ALLOWED_DURATIONS, DEFAULT_DURATION_MINUTES};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    for minutes in ALLOWED_DURATIONS {
        if minutes == DEFAULT_DURATION_MINUTES {
            println!("{minutes} (default)");
        } else {
            println!("{minutes}");
        }
    }
    Ok(())
}
