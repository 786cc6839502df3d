//! Log level selection and subscriber setup

use tracing::level_filters::LevelFilter;

/// Levels from quietest to most verbose
const LEVELS: [LevelFilter; 6] = [
    LevelFilter::OFF,
    LevelFilter::ERROR,
    LevelFilter::WARN,
    LevelFilter::INFO,
    LevelFilter::DEBUG,
    LevelFilter::TRACE,
];

/// Index of the default level (WARN)
const DEFAULT_LEVEL: i32 = 2;

/// Map `-v`/`-q` counts to a level filter
///
/// Each `-v` raises the default WARN level by one step, each `-q` lowers
/// it. The result is clamped to OFF..=TRACE.
pub fn level_filter(verbose: u8, quiet: u8) -> LevelFilter {
    let index = DEFAULT_LEVEL + i32::from(verbose) - i32::from(quiet);
    LEVELS[index.clamp(0, LEVELS.len() as i32 - 1) as usize]
}

/// Install the global subscriber, writing to stderr
pub fn init(level: LevelFilter) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();
}
