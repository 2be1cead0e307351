use lazy_static::lazy_static;
use libc::{getrusage, rusage, RUSAGE_SELF};
use std::{env, fmt, io, mem::MaybeUninit, time::Instant};

lazy_static! {
    static ref START: Instant = Instant::now();
}

/// Pin the wall clock start; call once at the top of `main`.
pub fn start_clock() {
    lazy_static::initialize(&START);
}

fn rusage_self() -> io::Result<rusage> {
    let r = unsafe {
        let mut r = MaybeUninit::<rusage>::uninit();
        if getrusage(RUSAGE_SELF, r.as_mut_ptr()) == -1 {
            return Err(io::Error::last_os_error());
        }
        r.assume_init()
    };
    Ok(r)
}

/// Wall time, CPU time and peak memory of the current run.
#[derive(Debug, Clone)]
pub struct RunUsage {
    pub command_line: String,
    pub wall_secs: f64,
    pub cpu_secs: f64,
    /// Kilobytes on Linux.
    pub peak_rss: i64,
}

impl RunUsage {
    pub fn capture() -> io::Result<Self> {
        let r = rusage_self()?;
        let cpu = |t: libc::timeval| t.tv_sec as f64 + t.tv_usec as f64 / 1e6;
        Ok(RunUsage {
            command_line: env::args().collect::<Vec<String>>().join(" "),
            wall_secs: START.elapsed().as_secs_f64(),
            cpu_secs: cpu(r.ru_utime) + cpu(r.ru_stime),
            peak_rss: r.ru_maxrss as i64,
        })
    }
}

impl fmt::Display for RunUsage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "CMD: {}\nReal time: {:.2} sec; CPU: {:.2} sec; Peak RSS: {:.3} GB",
            self.command_line,
            self.wall_secs,
            self.cpu_secs,
            self.peak_rss as f64 / 1024.0 / 1024.0,
        )
    }
}

pub fn report_usage() {
    match RunUsage::capture() {
        Ok(usage) => log::info!("{}", usage),
        Err(e) => log::warn!("could not read resource usage: {}", e),
    }
}
