use chrono::Local;
use env_logger::fmt::Target;
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Map the `-v`/`-q` counters of the command line onto a level filter.
pub fn level_from_flags(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Log lines look like `2024/05/13 12:18 [INFO]prune.rs:42   message`.
pub fn init_logging(level: LevelFilter) {
    Builder::new()
        .format(|buf, record| {
            let level = buf.default_styled_level(record.level());
            let mut style = buf.style();
            style.set_bold(false);
            writeln!(
                buf,
                "{} [{}]{}:{:<4} {}",
                style.value(Local::now().format("%Y/%m/%d %H:%M")),
                level,
                record
                    .file()
                    .and_then(|f| f.rsplit('/').next())
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                style.value(record.args())
            )
        })
        .target(Target::Stderr)
        .filter(None, level)
        .init();
}
