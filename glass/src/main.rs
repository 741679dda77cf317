mod app;
mod core;
mod effect;
mod error;
mod ipc;
mod platform;

use std::path::PathBuf;

use anyhow::Result;
use argh::FromArgs;
use glass_ipc::{Bounds, Command, HostFilter, Response, Size};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_WORK_AREA: Size = Size::new(1920, 1080);

/// Glass - borderless streaming shell with an auto-hiding control bar
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Option<SubCommand>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum SubCommand {
    Start(StartCmd),
    Version(VersionCmd),
    SettingsPath(SettingsPathCmd),
    PopOut(PopOutCmd),
    PopIn(PopInCmd),
    HoverIn(HoverInCmd),
    HoverOut(HoverOutCmd),
    Close(CloseCmd),
    Minimize(MinimizeCmd),
    ToggleMaximize(ToggleMaximizeCmd),
    ToggleAlwaysOnTop(ToggleAlwaysOnTopCmd),
    Navigate(NavigateCmd),
    ClickedIn(ClickedInCmd),
    LoadedContent(LoadedContentCmd),
    Leaving(LeavingCmd),
    Resized(ResizedCmd),
    Moved(MovedCmd),
    GetConfiguration(GetConfigurationCmd),
    GetContentCss(GetContentCssCmd),
    GetState(GetStateCmd),
    Listen(ListenCmd),
}

/// Start the glass daemon
#[derive(FromArgs)]
#[argh(subcommand, name = "start")]
struct StartCmd {
    /// settings file (defaults to the per-user data directory)
    #[argh(option)]
    settings: Option<PathBuf>,
    /// directory holding bundled icons and the content stylesheet
    #[argh(option)]
    resources: Option<PathBuf>,
    /// usable display area used for first-run window placement (e.g., 1920x1080)
    #[argh(option, default = "DEFAULT_WORK_AREA")]
    work_area: Size,
}

/// Show version information
#[derive(FromArgs)]
#[argh(subcommand, name = "version")]
struct VersionCmd {}

/// Print the default settings file location
#[derive(FromArgs)]
#[argh(subcommand, name = "settings-path")]
struct SettingsPathCmd {}

/// Expand the glass bar
#[derive(FromArgs)]
#[argh(subcommand, name = "pop-out")]
struct PopOutCmd {}

/// Collapse the glass bar immediately
#[derive(FromArgs)]
#[argh(subcommand, name = "pop-in")]
struct PopInCmd {}

/// Report the pointer entering the glass bar
#[derive(FromArgs)]
#[argh(subcommand, name = "hover-in")]
struct HoverInCmd {}

/// Report the pointer leaving the glass bar
#[derive(FromArgs)]
#[argh(subcommand, name = "hover-out")]
struct HoverOutCmd {}

/// Quit the application
#[derive(FromArgs)]
#[argh(subcommand, name = "close")]
struct CloseCmd {}

/// Minimize the main window
#[derive(FromArgs)]
#[argh(subcommand, name = "minimize")]
struct MinimizeCmd {}

/// Toggle fullscreen
#[derive(FromArgs)]
#[argh(subcommand, name = "toggle-maximize")]
struct ToggleMaximizeCmd {}

/// Toggle always-on-top
#[derive(FromArgs)]
#[argh(subcommand, name = "toggle-alwaysontop")]
struct ToggleAlwaysOnTopCmd {}

/// Load a page in the content surface
#[derive(FromArgs)]
#[argh(subcommand, name = "navigate")]
struct NavigateCmd {
    /// page url
    #[argh(positional)]
    url: String,
}

/// Report a click on the content surface
#[derive(FromArgs)]
#[argh(subcommand, name = "clicked-in")]
struct ClickedInCmd {}

/// Report that the content page finished loading
#[derive(FromArgs)]
#[argh(subcommand, name = "loaded-content")]
struct LoadedContentCmd {}

/// Report that the content page is navigating away
#[derive(FromArgs)]
#[argh(subcommand, name = "leaving")]
struct LeavingCmd {}

/// Report new main window bounds after a resize
#[derive(FromArgs)]
#[argh(subcommand, name = "resized")]
struct ResizedCmd {
    /// left edge
    #[argh(positional)]
    x: i32,
    /// top edge
    #[argh(positional)]
    y: i32,
    /// width
    #[argh(positional)]
    width: u32,
    /// height
    #[argh(positional)]
    height: u32,
}

/// Report a new main window position after a move
#[derive(FromArgs)]
#[argh(subcommand, name = "moved")]
struct MovedCmd {
    /// left edge
    #[argh(positional)]
    x: i32,
    /// top edge
    #[argh(positional)]
    y: i32,
}

/// Print the resolved configuration as JSON
#[derive(FromArgs)]
#[argh(subcommand, name = "get-configuration")]
struct GetConfigurationCmd {}

/// Print the stylesheet injected into the content surface
#[derive(FromArgs)]
#[argh(subcommand, name = "get-content-css")]
struct GetContentCssCmd {}

/// Print the current shell state
#[derive(FromArgs)]
#[argh(subcommand, name = "get-state")]
struct GetStateCmd {}

/// Attach as a host and print every host request
#[derive(FromArgs)]
#[argh(subcommand, name = "listen")]
struct ListenCmd {
    /// print the initial window setup first
    #[argh(switch)]
    snapshot: bool,
    /// only main window requests
    #[argh(switch)]
    window: bool,
    /// only glass overlay requests
    #[argh(switch)]
    overlay: bool,
    /// only content surface requests
    #[argh(switch)]
    content: bool,
    /// only notifications
    #[argh(switch)]
    notification: bool,
}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    match cli.command {
        None => {
            let args: Vec<&str> = vec!["glass", "--help"];
            if let Err(e) = Cli::from_args(&args[..1], &args[1..]) {
                println!("{}", e.output);
            }
            Ok(())
        }
        Some(subcmd) => run(subcmd),
    }
}

/// Local subcommands run here; everything else becomes a daemon command.
fn run(subcmd: SubCommand) -> Result<()> {
    let cmd = match subcmd {
        SubCommand::Start(cmd) => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .init();

            tracing::info!("glass {} starting", VERSION);
            return app::App::run(app::StartOptions {
                settings_path: cmd.settings.unwrap_or_else(crate::core::default_settings_path),
                resources: cmd.resources.unwrap_or_else(default_resources),
                work_area: cmd.work_area,
            });
        }
        SubCommand::Version(_) => {
            println!("glass {}", VERSION);
            return Ok(());
        }
        SubCommand::SettingsPath(_) => {
            println!("{}", crate::core::default_settings_path().display());
            return Ok(());
        }
        SubCommand::Listen(cmd) => {
            let filter = HostFilter {
                window: cmd.window,
                overlay: cmd.overlay,
                content: cmd.content,
                notification: cmd.notification,
            };
            return ipc::subscribe_and_print(cmd.snapshot, filter.any().then_some(filter));
        }
        SubCommand::PopOut(_) => Command::PopOut,
        SubCommand::PopIn(_) => Command::PopIn,
        SubCommand::HoverIn(_) => Command::HoverIn,
        SubCommand::HoverOut(_) => Command::HoverOut,
        SubCommand::Close(_) => Command::Close,
        SubCommand::Minimize(_) => Command::Minimize,
        SubCommand::ToggleMaximize(_) => Command::ToggleMaximize,
        SubCommand::ToggleAlwaysOnTop(_) => Command::ToggleAlwaysOnTop,
        SubCommand::Navigate(cmd) => Command::Navigate { url: cmd.url },
        SubCommand::ClickedIn(_) => Command::ClickedIn,
        SubCommand::LoadedContent(_) => Command::OnLoadedContent,
        SubCommand::Leaving(_) => Command::OnLeaving,
        SubCommand::Resized(cmd) => Command::WindowResized {
            bounds: Bounds::new(cmd.x, cmd.y, cmd.width, cmd.height),
        },
        SubCommand::Moved(cmd) => Command::WindowMoved {
            bounds: Bounds::new(cmd.x, cmd.y, 0, 0),
        },
        SubCommand::GetConfiguration(_) => Command::GetConfiguration,
        SubCommand::GetContentCss(_) => Command::GetContentCss,
        SubCommand::GetState(_) => Command::GetState,
    };
    run_cli(&cmd)
}

/// Resources shipped next to the executable, falling back to the source tree.
fn default_resources() -> PathBuf {
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("resources")));
    match beside_exe {
        Some(dir) if dir.is_dir() => dir,
        _ => PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources"),
    }
}

fn run_cli(cmd: &Command) -> Result<()> {
    let response = ipc::send_command(cmd)?;

    match response {
        Response::Ok => {}
        Response::Error { message } => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
        Response::Configuration { configuration } => {
            println!("{}", serde_json::to_string_pretty(&configuration)?);
        }
        Response::Css { text } => {
            print!("{}", text);
        }
        Response::State { state } => {
            println!("Glass: {}", if state.is_out { "out" } else { "in" });
            println!("Main window: {}", state.main_bounds);
            println!("Overlay: {}", state.overlay_bounds);
            println!("Content visible: {}", state.content_visible);
            println!("Fullscreen: {}", state.is_maximized);
            println!("Always on top: {}", state.is_always_on_top);
            println!("Settings: {}", state.settings_path);
        }
    }
    Ok(())
}
