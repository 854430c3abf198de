use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

const MAX_LOG_LINES: usize = 500;
const TARGET_PREFIXES: [&str; 2] = ["solido", "render"];

#[derive(Clone)]
pub(crate) struct ConsoleBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
}

impl ConsoleBuffer {
    pub(crate) fn new() -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub(crate) fn push_line(&self, line: String) {
        let Ok(mut lines) = self.lines.lock() else {
            return;
        };
        lines.push_back(line);
        while lines.len() > MAX_LOG_LINES {
            lines.pop_front();
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

struct ConsoleMakeWriter {
    buffer: ConsoleBuffer,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            buffer: self.buffer.clone(),
        }
    }
}

struct ConsoleWriter {
    buffer: ConsoleBuffer,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        for line in text.lines() {
            self.buffer.push_line(line.to_string());
        }

        #[cfg(not(target_arch = "wasm32"))]
        let _ = io::stdout().write_all(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        #[cfg(not(target_arch = "wasm32"))]
        let _ = io::stdout().flush();
        Ok(())
    }
}

pub(crate) fn setup_tracing() -> (ConsoleBuffer, Arc<AtomicU8>) {
    let console = ConsoleBuffer::new();
    let log_level_state = Arc::new(AtomicU8::new(level_filter_to_u8(LevelFilter::INFO)));
    let filter_state = log_level_state.clone();
    let filter_layer = tracing_subscriber::filter::filter_fn(move |metadata| {
        let level = u8_to_level(filter_state.load(Ordering::Relaxed));
        let effective_level = if is_viewer_target(metadata.target()) {
            level
        } else {
            Some(Level::WARN)
        };
        effective_level.is_some_and(|level| metadata.level() <= &level)
    });
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(ConsoleMakeWriter {
            buffer: console.clone(),
        });
    #[cfg(target_arch = "wasm32")]
    let fmt_layer = fmt_layer.without_time();

    // A second viewer in the same process keeps the first subscriber.
    if tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter_layer))
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }

    (console, log_level_state)
}

fn is_viewer_target(target: &str) -> bool {
    TARGET_PREFIXES
        .iter()
        .any(|prefix| target.starts_with(prefix))
}

fn u8_to_level(value: u8) -> Option<Level> {
    match value {
        0 => None,
        1 => Some(Level::ERROR),
        2 => Some(Level::WARN),
        3 => Some(Level::INFO),
        4 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

pub(crate) fn level_filter_to_u8(level: LevelFilter) -> u8 {
    match level {
        LevelFilter::OFF => 0,
        LevelFilter::ERROR => 1,
        LevelFilter::WARN => 2,
        LevelFilter::INFO => 3,
        LevelFilter::DEBUG => 4,
        LevelFilter::TRACE => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_keeps_the_newest_lines() {
        let console = ConsoleBuffer::new();
        for i in 0..(MAX_LOG_LINES + 20) {
            console.push_line(format!("line {i}"));
        }
        let lines = console.snapshot();
        assert_eq!(lines.len(), MAX_LOG_LINES);
        assert_eq!(lines[0], "line 20");
        console.clear();
        assert!(console.snapshot().is_empty());
    }

    #[test]
    fn level_encoding_round_trips_through_the_filter() {
        for level in [
            LevelFilter::ERROR,
            LevelFilter::WARN,
            LevelFilter::INFO,
            LevelFilter::DEBUG,
            LevelFilter::TRACE,
        ] {
            assert_eq!(u8_to_level(level_filter_to_u8(level)), level.into_level());
        }
        assert_eq!(u8_to_level(level_filter_to_u8(LevelFilter::OFF)), None);
    }

    #[test]
    fn viewer_targets_cover_all_crates() {
        assert!(is_viewer_target("solido_core::assembler"));
        assert!(is_viewer_target("solido_web"));
        assert!(is_viewer_target("render::viewport::callback"));
        assert!(!is_viewer_target("wgpu_core::device"));
    }
}
