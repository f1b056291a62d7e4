mod config;
mod display;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use staffdir_app::{
    App, CameraError, CameraFlow, CapturedPhoto, Credentials, FrameFileDevice, Outcome, Route,
    Screen, Session, ViewError,
};
use staffdir_core::RankPolicy;
use staffdir_fetch::{EmployeeSource, TableClient};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "staffdir", version, about = "Employee directory client")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in. Any non-blank username and password are accepted.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "STAFFDIR_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out.
    Logout,
    /// List all employees.
    List,
    /// Show one employee by list position.
    Details { id: String },
    /// Rank the top 10 salaries.
    Charts {
        /// Rank the first ten rows in fetch order instead of the ten highest.
        #[arg(long)]
        arrival_order: bool,
    },
    /// Group employees by office location.
    Map {
        /// Show the team of one city.
        #[arg(long)]
        city: Option<String>,
    },
    /// Capture a photo for an employee from an image file and save it.
    Photo {
        id: String,
        /// Image file standing in for the camera frame.
        #[arg(long)]
        frame: PathBuf,
        /// Directory to save the photo into.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Open any route path (e.g. /photo-result) and follow redirects.
    Open { path: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    tracing::info!("staffdir v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let session = Session::load(cli.config.session_store())
        .with_context(|| format!("loading session from {}", cli.config.state_dir.display()))?;
    let client = TableClient::new(cli.config.api_base.clone(), cli.config.service_credentials());

    let policy = match &cli.command {
        Command::Charts { arrival_order: true } => RankPolicy::Arrival,
        _ => RankPolicy::ByValue,
    };
    let mut app = App::new(session, client).with_rank_policy(policy);
    let mut out = io::stdout().lock();
    let retries = cli.config.retries;

    match cli.command {
        Command::Login { username, password } => {
            let outcome = app
                .login(&Credentials::new(username, password))
                .context("saving session")?;
            match outcome {
                Outcome::Failed(e) => {
                    display::print_failure(&mut out, &e)?;
                    Ok(ExitCode::FAILURE)
                }
                _ => {
                    writeln!(out, "Signed in.")?;
                    Ok(ExitCode::SUCCESS)
                }
            }
        }
        Command::Logout => {
            app.logout().context("clearing session")?;
            writeln!(out, "Signed out.")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::List => show(&mut app, &mut out, Route::List, retries, None).await,
        Command::Details { id } => show(&mut app, &mut out, Route::Details(id), retries, None).await,
        Command::Charts { .. } => show(&mut app, &mut out, Route::Charts, retries, None).await,
        Command::Map { city } => show(&mut app, &mut out, Route::Map, retries, city.as_deref()).await,
        Command::Open { path } => {
            let route = Route::parse(&path).with_context(|| format!("unknown route {path}"))?;
            show(&mut app, &mut out, route, retries, None).await
        }
        Command::Photo { id, frame, out: dir } => {
            photo(&mut app, &mut out, id, &frame, &dir, retries).await
        }
    }
}

/// Open a route, follow redirects, retry network failures, and render.
async fn show<S: EmployeeSource>(
    app: &mut App<S>,
    out: &mut impl Write,
    route: Route,
    retries: u32,
    city: Option<&str>,
) -> anyhow::Result<ExitCode> {
    let Some(screen) = open(app, out, route, retries).await? else {
        return Ok(ExitCode::FAILURE);
    };
    display::print_screen(out, &screen, city)?;
    Ok(ExitCode::SUCCESS)
}

/// Returns the rendered screen, or `None` after printing a failure.
async fn open<S: EmployeeSource>(
    app: &mut App<S>,
    out: &mut impl Write,
    route: Route,
    retries: u32,
) -> anyhow::Result<Option<Screen>> {
    let (hops, mut outcome) = app.follow(route).await;
    for hop in &hops {
        display::print_redirect(out, &hop.from, &hop.to, hop.reason)?;
    }

    let mut attempt = 0;
    while attempt < retries && matches!(outcome, Outcome::Failed(ViewError::Network(_))) {
        attempt += 1;
        tracing::info!(attempt, retries, "retrying");
        outcome = app.retry().await;
    }

    match outcome {
        Outcome::Render(screen) => Ok(Some(screen)),
        Outcome::Failed(e) => {
            display::print_failure(out, &e)?;
            Ok(None)
        }
        Outcome::Redirect { to, .. } => {
            writeln!(out, "Too many redirects (stopped at {to}).")?;
            Ok(None)
        }
    }
}

async fn photo<S: EmployeeSource>(
    app: &mut App<S>,
    out: &mut impl Write,
    id: String,
    frame: &Path,
    dir: &Path,
    retries: u32,
) -> anyhow::Result<ExitCode> {
    let Some(screen) = open(app, out, Route::Details(id), retries).await? else {
        return Ok(ExitCode::FAILURE);
    };
    display::print_screen(out, &screen, None)?;
    let Screen::Details(details) = screen else {
        return Ok(ExitCode::FAILURE);
    };
    writeln!(out)?;

    let mut camera = CameraFlow::new(FrameFileDevice::new(frame));
    if let Err(e) = camera.start() {
        writeln!(out, "{e}. Please check the frame file.")?;
        return Ok(ExitCode::FAILURE);
    }

    let outcome = match app.capture_photo(&mut camera, &details.employee).await {
        Ok(outcome) => outcome,
        Err(e @ CameraError::Frame(_)) => {
            writeln!(out, "{e}")?;
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };
    let Outcome::Render(Screen::PhotoResult(result)) = outcome else {
        writeln!(out, "Photo result unavailable.")?;
        return Ok(ExitCode::FAILURE);
    };

    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(CapturedPhoto::download_file_name(&result.employee.name));
    std::fs::write(&path, &result.image.bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    display::print_photo_result(out, &result, Some(&path))?;
    Ok(ExitCode::SUCCESS)
}
