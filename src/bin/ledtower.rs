use std::{
    net::TcpListener,
    path::{Path, PathBuf},
    sync::PoisonError,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "ledtower", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a script through the built-in renderer and save the frame as PNG.
    Preview(PreviewArgs),
    /// Replay a script against a remote renderer.
    Send(SendArgs),
    /// Host a renderer that accepts drawing sessions over TCP.
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Input script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Render cycle to capture; 0 is the commit itself, later cycles let autoroll layers move.
    #[arg(long, default_value_t = 0)]
    cycle: u32,

    /// Print the frame to stdout as text.
    #[arg(long)]
    ascii: bool,
}

#[derive(Args, Debug)]
struct SendArgs {
    /// Input script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Renderer address, `host:port`.
    #[arg(long)]
    addr: String,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:7373")]
    listen: String,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 128)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 8)]
    height: u32,

    /// Save every composited frame to this PNG path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Exit after serving one connection.
    #[arg(long)]
    once: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Preview(args) => cmd_preview(args),
        Command::Send(args) => cmd_send(args),
        Command::Serve(args) => cmd_serve(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_script(path: &Path) -> anyhow::Result<ledtower::Script> {
    ledtower::Script::from_path(path).with_context(|| format!("load script '{}'", path.display()))
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let script = read_script(&args.in_path)?;
    let transport = ledtower::LocalTransport::new(ledtower::LocalRenderer::new(
        script.renderer.clone(),
    ));
    let renderer = transport.renderer();
    let mut client = ledtower::Client::new(transport);
    script
        .replay(&mut client)
        .with_context(|| format!("replay '{}'", args.in_path.display()))?;

    let frame = {
        let mut r = renderer.lock().unwrap_or_else(PoisonError::into_inner);
        if args.cycle == 0 {
            r.last_frame()
                .cloned()
                .context("renderer produced no frame")?
        } else {
            r.advance(args.cycle - 1);
            r.render()
        }
    };

    if args.ascii {
        print!("{}", ascii_frame(&frame));
    }
    if let Some(out) = &args.out {
        write_png(&frame, out)?;
    }
    Ok(())
}

fn cmd_send(args: SendArgs) -> anyhow::Result<()> {
    let script = read_script(&args.in_path)?;
    let mut client = ledtower::Client::new(ledtower::TcpTransport::new(args.addr.clone()));
    script
        .replay(&mut client)
        .with_context(|| format!("send '{}' to {}", args.in_path.display(), args.addr))?;
    eprintln!("rendered {} commands on {}", client.sent(), args.addr);
    Ok(())
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let listener =
        TcpListener::bind(&args.listen).with_context(|| format!("listen on '{}'", args.listen))?;
    let mut renderer = ledtower::LocalRenderer::new(ledtower::RendererOpts {
        canvas: ledtower::Canvas::new(args.width, args.height),
        ..Default::default()
    });
    eprintln!("serving on {}", listener.local_addr()?);

    for conn in listener.incoming() {
        let stream = match conn {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                continue;
            }
        };
        match ledtower::serve_tcp(&mut renderer, stream) {
            Ok(ledtower::SessionOutcome::Rendered(frame)) => {
                if let Some(out) = &args.out {
                    write_png(&frame, out)?;
                }
            }
            Ok(ledtower::SessionOutcome::Failed(msg)) => {
                tracing::warn!(message = %msg, "session failed");
            }
            Ok(ledtower::SessionOutcome::Aborted { applied }) => {
                tracing::warn!(applied, "session aborted");
            }
            Err(e) => tracing::warn!(error = %e, "connection error"),
        }
        if args.once {
            break;
        }
    }
    Ok(())
}

fn write_png(frame: &ledtower::Frame, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame.save_png(out)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn ascii_frame(frame: &ledtower::Frame) -> String {
    let mut s = String::with_capacity(((frame.width + 1) * frame.height) as usize);
    for y in 0..frame.height as i32 {
        for x in 0..frame.width as i32 {
            let lit = frame.pixel(x, y).is_some_and(|c| c.a > 0);
            s.push(if lit { '#' } else { '.' });
        }
        s.push('\n');
    }
    s
}
