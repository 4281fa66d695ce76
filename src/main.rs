// SPDX-License-Identifier: MPL-2.0
use pico_args::Arguments;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use vibedrips_media::app::{Flags, MediaContext};
use vibedrips_media::device::{Device, Strategy};
use vibedrips_media::host::{ElementId, RecordingHost};
use vibedrips_media::lightbox::LightboxInput;
use vibedrips_media::media::{classify, embed_url, thumbnail_url, EmbedTarget, Presentation};
use vibedrips_media::overlay::Product;

const HELP: &str = "\
vibedrips-media

USAGE:
  vibedrips-media [GLOBAL FLAGS] inspect [--strategy S] [--unmuted] <URL>...
  vibedrips-media [GLOBAL FLAGS] simulate [--strategy S] [--unmuted] [--overlay] <URL>...

COMMANDS:
  inspect     Print kind, presentation, embed URL and thumbnail of each URL
  simulate    Run a scripted session against an in-memory page and print host calls

FLAGS:
  --strategy S      Force the mute strategy: ios, muted or unmuted
  --unmuted         Record the unmute gesture before starting
  --overlay         Simulate the reels overlay and its fullscreen hand-off
  --persist         Read and write the media state in the data directory

GLOBAL FLAGS:
  --lang L          Locale override (e.g. en-US, fr)
  --config-dir DIR  Directory holding settings.toml
  --data-dir DIR    Directory holding the persisted media state
  -h, --help        Print this help
";

enum Command {
    Inspect,
    Simulate { overlay: bool },
}

struct Cli {
    flags: Flags,
    command: Command,
    strategy: Option<Strategy>,
    unmuted: bool,
    urls: Vec<String>,
}

fn parse(mut args: Arguments) -> Result<Option<Cli>, pico_args::Error> {
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }
    let flags = Flags {
        lang: args.opt_value_from_str("--lang")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
        data_dir: args.opt_value_from_str("--data-dir")?,
        ephemeral: !args.contains("--persist"),
    };
    let command = match args.subcommand()?.as_deref() {
        Some("inspect") => Command::Inspect,
        Some("simulate") => Command::Simulate {
            overlay: args.contains("--overlay"),
        },
        _ => return Ok(None),
    };
    let strategy = args.opt_value_from_str("--strategy")?;
    let unmuted = args.contains("--unmuted");
    let urls = args
        .finish()
        .into_iter()
        .filter_map(|arg| arg.into_string().ok())
        .collect();
    Ok(Some(Cli {
        flags,
        command,
        strategy,
        unmuted,
        urls,
    }))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn inspect(ctx: &MediaContext, urls: &[String]) {
    let muted = ctx.state().should_start_muted();
    println!("strategy: {}  start muted: {muted}", ctx.state().strategy());
    for url in urls {
        let kind = classify(url);
        let presentation = Presentation::of(url);
        println!("{url}");
        println!("  kind:         {}", kind.as_str());
        println!("  presentation: {presentation:?}");
        if let Some(target) = EmbedTarget::from_url(url) {
            println!("  embed:        {}", embed_url(&target, muted));
        }
        println!("  thumbnail:    {}", thumbnail_url(url));
    }
}

fn simulate(ctx: &mut MediaContext, urls: Vec<String>, overlay: bool) {
    let mut host = RecordingHost::new();
    let t0 = Instant::now();
    let step = Duration::from_millis(500);

    if overlay {
        host.add_container(ElementId::new(ctx.config().overlay.container.as_str()));
        ctx.open_overlay(&mut host, Product::new("simulated", urls), t0);
        ctx.tick(&mut host, t0 + step);
        ctx.open_overlay_fullscreen(&mut host, t0 + step);
        ctx.lightbox_input(&mut host, LightboxInput::ShieldTap, t0 + step);
        ctx.tick(&mut host, t0 + step * 2);
        ctx.lightbox_input(&mut host, LightboxInput::Close, t0 + step * 2);
        ctx.tick(&mut host, t0 + step * 4);
        ctx.close_all(&mut host);
    } else {
        if !ctx.open_lightbox(&mut host, urls, 0, t0) {
            println!("nothing to show");
            return;
        }
        ctx.tick(&mut host, t0 + step);
        ctx.lightbox_input(&mut host, LightboxInput::ShieldTap, t0 + step);
        ctx.tick(&mut host, t0 + step * 2);
        ctx.lightbox_input(&mut host, LightboxInput::Next, t0 + step * 3);
        ctx.tick(&mut host, t0 + step * 4);
        ctx.lightbox_input(&mut host, LightboxInput::Close, t0 + step * 5);
    }
    for (n, call) in host.calls().iter().enumerate() {
        println!("{n:>4}  {call:?}");
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = match parse(Arguments::from_env()) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            return ExitCode::FAILURE;
        }
    };
    if cli.urls.is_empty() {
        eprintln!("error: at least one URL is required\n\n{HELP}");
        return ExitCode::FAILURE;
    }

    let device = cli.strategy.map(Device::with_strategy).unwrap_or_default();
    let mut ctx = MediaContext::bootstrap(cli.flags, device);
    for warning in ctx.warnings() {
        eprintln!("warning: {}", ctx.i18n().tr(warning));
    }
    if cli.unmuted {
        ctx.state().set_unmuted();
    }

    match cli.command {
        Command::Inspect => inspect(&ctx, &cli.urls),
        Command::Simulate { overlay } => simulate(&mut ctx, cli.urls, overlay),
    }
    ExitCode::SUCCESS
}
