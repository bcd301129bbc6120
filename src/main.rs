use clap::{Parser, ValueEnum};
use color_eyre::Result;
use std::time::{Duration, Instant};

use toastline::config::{self, OverlapPolicy, ToastConfig};
use toastline::notification::{self, Toast, ToastChannel, ToastKind};

/// Publish transient toast notifications and watch them clear
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Publish toast notifications and print every transition until they clear"
)]
struct Args {
    /// Messages to publish, in order
    #[arg(required = true)]
    messages: Vec<String>,

    /// Kind applied to every message
    #[arg(short, long, value_enum, default_value_t = KindArg::Success)]
    kind: KindArg,

    /// Pause between consecutive publishes, in milliseconds
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// Override how overlapping clear timers interact
    #[arg(long, value_enum)]
    overlap: Option<OverlapArg>,

    /// Print transitions as JSON lines
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Success,
    Error,
}

impl From<KindArg> for ToastKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Success => ToastKind::Success,
            KindArg::Error => ToastKind::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OverlapArg {
    Restart,
    Independent,
}

impl From<OverlapArg> for OverlapPolicy {
    fn from(overlap: OverlapArg) -> Self {
        match overlap {
            OverlapArg::Restart => OverlapPolicy::Restart,
            OverlapArg::Independent => OverlapPolicy::Independent,
        }
    }
}

fn main() -> Result<()> {
    // Writes to /tmp/toastline-debug.log at DEBUG level
    #[cfg(debug_assertions)]
    init_debug_log();

    color_eyre::install()?;

    let args = Args::parse();

    let config_result = config::load_config();
    if let Some(warning) = &config_result.warning {
        eprintln!("warning: {}", warning);
    }
    let toast_config = apply_overrides(config_result.config.toast, &args);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(args, toast_config))?;

    #[cfg(debug_assertions)]
    log::debug!("=== TOASTLINE DEBUG SESSION ENDED ===");

    Ok(())
}

#[cfg(debug_assertions)]
fn init_debug_log() {
    use std::io::Write;

    let Ok(log_file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("/tmp/toastline-debug.log")
    else {
        return;
    };

    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format(|buf, record| {
            use std::time::SystemTime;
            let datetime: chrono::DateTime<chrono::Local> = SystemTime::now().into();
            writeln!(
                buf,
                "[{}] [{}] {}",
                datetime.format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .try_init();

    log::debug!("=== TOASTLINE DEBUG SESSION STARTED ===");
}

/// CLI flags win over the config file
fn apply_overrides(mut config: ToastConfig, args: &Args) -> ToastConfig {
    if let Some(overlap) = args.overlap {
        config.overlap = overlap.into();
    }
    config
}

/// Publish every message, then wait for the channel to empty
async fn run(args: Args, config: ToastConfig) -> Result<()> {
    let channel = ToastChannel::new(&config)?;
    let started = Instant::now();
    let json = args.json;

    let _console = channel.subscribe(move |value| print_transition(started.elapsed(), value, json));
    let mut rx = channel.watch();

    let kind = ToastKind::from(args.kind);
    for (index, message) in args.messages.into_iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(Duration::from_millis(args.interval_ms)).await;
        }
        channel.publish(message, kind);
    }

    rx.wait_for(Option::is_none).await?;
    Ok(())
}

fn print_transition(elapsed: Duration, value: Option<&Toast>, json: bool) {
    if !json {
        println!("{}", notification::render_line(elapsed, value));
        return;
    }
    match notification::render_json(elapsed, value) {
        Ok(line) => println!("{}", line),
        Err(e) => log::error!("Failed to render toast as JSON: {}", e),
    }
}
