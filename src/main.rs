use cosmic::app::Settings;
use cosmic::iced::Limits;

mod application;
mod localize;
mod message;
mod pages;

use quill::config::{self, QuillConfig};

use application::{Flags, Quill};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log to the systemd user journal (`journalctl --user -t quill -f`).
    // Quill's own targets log at info, or debug when enabled; everything else at warn.
    {
        struct FilteredJournal {
            inner: systemd_journal_logger::JournalLog,
        }

        impl log::Log for FilteredJournal {
            fn enabled(&self, metadata: &log::Metadata) -> bool {
                let target = metadata.target();
                if target.starts_with("quill") {
                    let max = if quill::debug_logging() { log::LevelFilter::Debug } else { log::LevelFilter::Info };
                    metadata.level() <= max
                } else {
                    metadata.level() <= log::LevelFilter::Warn
                }
            }
            fn log(&self, record: &log::Record) {
                if self.enabled(record.metadata()) {
                    self.inner.log(record);
                }
            }
            fn flush(&self) {
                self.inner.flush();
            }
        }

        let journal = systemd_journal_logger::JournalLog::new()?.with_syslog_identifier("quill".to_string());

        log::set_boxed_logger(Box::new(FilteredJournal { inner: journal }))?;
        // Global max stays at Debug so the runtime toggle can let debug records through
        log::set_max_level(log::LevelFilter::Debug);
    }

    // Config problems are logged and never block startup.
    let config_path = config::config_path();
    let config = QuillConfig::load_or_default(config_path.as_deref());
    quill::set_debug_logging(config.debug_logging);

    localize::localize();

    let settings = Settings::default()
        .size_limits(Limits::NONE.min_width(640.0).min_height(400.0))
        .exit_on_close(false);

    let flags = Flags { config, config_path };
    cosmic::app::run::<Quill>(settings, flags)?;

    Ok(())
}
