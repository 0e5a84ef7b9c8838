mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reloj_core::config;
use reloj_i18n::CatalogSource;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    reload,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

#[derive(Parser)]
#[command(
    name = "reloj",
    version,
    about = "Reloj Digital translation catalog tooling"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "reloj.toml")]
    config: String,

    /// Locale to load (e.g. es_ES). Overrides the configured language.
    #[arg(short, long, env = "RELOJ_LOCALE")]
    locale: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a source string.
    Lookup {
        /// Context (widget class) the string belongs to.
        #[arg(long, default_value = "RelojDigital")]
        context: String,
        /// Disambiguation comment of the entry.
        #[arg(long)]
        comment: Option<String>,
        /// The source text.
        #[arg(trailing_var_arg = true, required = true)]
        text: Vec<String>,
    },
    /// List every entry of the catalog.
    Entries {
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Report translation coverage and check locations against the GUI source.
    Audit {
        /// Directory the `<location>` file names are relative to.
        #[arg(long)]
        source_root: Option<PathBuf>,
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// List the locales the configured sources provide.
    Locales,
}

/// Filter in force until the config file has been read.
fn startup_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Build the subscriber with a reloadable filter, so messages logged while
/// loading the config are kept and the configured level applies afterwards.
fn logging<W>(
    initial: EnvFilter,
    make_writer: W,
) -> (
    impl tracing::Subscriber + Send + Sync + 'static,
    reload::Handle<EnvFilter, Registry>,
)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(initial);
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(make_writer));
    (subscriber, handle)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output can be piped.
    let (subscriber, filter) = logging(startup_filter(), std::io::stderr);
    subscriber.init();

    let cfg = config::load(&cli.config)?;
    if EnvFilter::try_from_default_env().is_err() {
        filter.reload(EnvFilter::new(&cfg.logging.level))?;
    }
    tracing::debug!("config: {}", cli.config);

    let source = commands::build_source(&cfg.i18n);

    match cli.command {
        Commands::Locales => {
            let current = reloj_i18n::resolve_locale(
                cli.locale.as_deref(),
                cfg.i18n.language.as_deref(),
                &source.available(),
            );
            print!("{}", commands::locales(&source, current.as_ref()));
        }
        Commands::Lookup {
            context,
            comment,
            text,
        } => {
            let catalog = commands::open_catalog(&source, cli.locale.as_deref(), &cfg.i18n)?;
            let text = text.join(" ");
            println!(
                "{}",
                commands::lookup(&catalog, &context, comment.as_deref(), &text)
            );
        }
        Commands::Entries { json } => {
            let catalog = commands::open_catalog(&source, cli.locale.as_deref(), &cfg.i18n)?;
            print!("{}", commands::entries(&catalog, json)?);
        }
        Commands::Audit { source_root, json } => {
            let catalog = commands::open_catalog(&source, cli.locale.as_deref(), &cfg.i18n)?;
            let outcome = commands::audit(&catalog, source_root.as_deref(), json)?;
            print!("{}", outcome.text);
            if outcome.issues > 0 {
                anyhow::bail!("{} location issue(s) found", outcome.issues);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_missing_config_notice_reaches_subscriber() {
        let captured = Captured::default();
        let writer = captured.clone();
        let (subscriber, _filter) = logging(EnvFilter::new("info"), move || writer.clone());

        let cfg = tracing::subscriber::with_default(subscriber, || {
            config::load("/tmp/__reloj_no_such_dir__/reloj.toml")
        })
        .unwrap();

        assert_eq!(cfg.logging.level, "info");
        assert!(captured.text().contains("Config file not found"));
    }

    #[test]
    fn test_configured_level_applies_after_reload() {
        let captured = Captured::default();
        let writer = captured.clone();
        let (subscriber, filter) = logging(EnvFilter::new("info"), move || writer.clone());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("before reload");
            filter.reload(EnvFilter::new("warn")).unwrap();
            tracing::info!("after reload");
            tracing::warn!("still shown");
        });

        let text = captured.text();
        assert!(text.contains("before reload"));
        assert!(!text.contains("after reload"));
        assert!(text.contains("still shown"));
    }
}
