use blopa_focus::egg::EggVariant;
use blopa_focus::models::{EnergyLevel, Mood};
use blopa_focus::navigation::{NavigationPayload, Navigator, Route};
use blopa_focus::pages::{
    AUTO_CLOSE_DELAY, DashboardPage, GoalPage, LoginPage, NamePetPage, RegisterPage, SubmitOutcome,
    VerifyPage,
};
use blopa_focus::services::ImagePayload;
use blopa_focus::{AppContext, ClientConfig};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Parser)]
#[command(name = "blopa", about = "Blopa Focus client: micro-goals and photo proofs")]
struct Cli {
    /// Backend address (overrides BLOPA_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session storage file (overrides BLOPA_SESSION_PATH)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    /// Request timeout in seconds (overrides BLOPA_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the backend is reachable
    Health,
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account with a random egg and store the session
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Name the companion and open the dashboard
    NamePet {
        #[arg(long)]
        name: String,
        #[arg(long)]
        egg: Option<u8>,
    },
    /// Ask for micro-tasks
    Goal {
        #[arg(long)]
        goal: String,
        #[arg(long, default_value = "10")]
        minutes: String,
        #[arg(long, default_value = "OK :/")]
        mood: String,
        #[arg(long, default_value = "Medium")]
        energy: String,
    },
    /// Show a dashboard location, optionally submitting proof for one task
    Dashboard {
        #[arg(long, default_value = "/dashboard")]
        route: String,
        #[arg(long, requires = "photo")]
        task_index: Option<usize>,
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Submit proof for a task on the verify page
    Verify {
        #[arg(long)]
        task: String,
        #[arg(long)]
        photo: PathBuf,
    },
    /// Print the user id of the stored session
    Whoami,
    /// Store a raw user id used when the session record carries none
    RememberUser {
        #[arg(long)]
        user_id: String,
    },
    /// Forget the stored session and fallback user id
    Logout,
}

#[tokio::main]
async fn main() -> CliResult {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    debug!(base_url = %config.base_url, timeout = ?config.timeout, "client configured");
    let ctx = AppContext::from_config(&config)?;
    let mut history: Vec<Route> = Vec::new();

    match cli.command {
        Command::Health => {
            let health = ctx.client.health().check().await?;
            println!("Backend: {} ({})", health.message, health.status);
        }
        Command::Login { email, password } => {
            let mut page = LoginPage::new();
            page.email = email;
            page.password = password;
            let outcome = page.submit(&ctx, &mut history).await;
            finish(outcome, page.status().error(), &history)?;
        }
        Command::Register {
            email,
            name,
            password,
            confirm_password,
        } => {
            let mut page = RegisterPage::new();
            page.email = email;
            page.name = name;
            page.password = password;
            page.confirm_password = confirm_password;
            let outcome = page.submit(&ctx, &mut history).await;
            finish(outcome, page.status().error(), &history)?;
        }
        Command::NamePet { name, egg } => {
            let mut page = NamePetPage::new(egg.and_then(EggVariant::from_number));
            page.name = name;
            let outcome = page.submit(&mut history);
            finish(outcome, Some("Please give your companion a name."), &history)?;
        }
        Command::Goal {
            goal,
            minutes,
            mood,
            energy,
        } => {
            let mut page = GoalPage::new();
            page.goal = goal;
            page.set_minutes(&minutes);
            page.mood = Mood::from_label(&mood);
            page.energy = EnergyLevel::from_label(&energy)
                .ok_or_else(|| format!("unknown energy level {energy:?}, expected Low, Medium or High"))?;
            let outcome = page.submit(&ctx, &mut history).await;
            finish(outcome, page.status().error(), &history)?;
            if let Some(Route::Dashboard(payload)) = history.last() {
                print_tasks(payload.tasks());
            }
        }
        Command::Dashboard {
            route,
            task_index,
            photo,
        } => {
            let payload = match Route::parse(&route) {
                Route::Dashboard(payload) => payload,
                other => return Err(format!("{} is not a dashboard location", other.path()).into()),
            };
            run_dashboard(&ctx, &payload, task_index, photo.as_deref()).await?;
        }
        Command::Verify { task, photo } => {
            let mut page = VerifyPage::new(&task);
            page.pick_file(ImagePayload::from_path(&photo).await?);
            let outcome = page.submit(&ctx).await;
            if outcome == SubmitOutcome::Completed {
                println!("Great job! {} is proud of you.", page.pet_name);
                page.continue_to_dashboard(&mut history);
            }
            finish(outcome, page.status().error(), &history)?;
        }
        Command::Whoami => {
            let Some(user_id) = ctx.session.resolve_identifier().await else {
                return Err("not logged in".into());
            };
            let record = ctx.session.load_record().await;
            match record.as_ref().and_then(|record| record.user()?.name()) {
                Some(name) => println!("{user_id} ({name})"),
                None => println!("{user_id}"),
            }
        }
        Command::RememberUser { user_id } => {
            ctx.session.remember_user_id(&user_id).await?;
            info!("fallback user id stored");
        }
        Command::Logout => {
            ctx.session.clear().await?;
            history.navigate(Route::Login);
            println!("{}", Route::Login.path());
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = &cli.api_url {
        config = config.with_base_url(api_url)?;
    }
    if let Some(path) = &cli.session_file {
        config.session_path = path.clone();
    }
    if let Some(secs) = cli.timeout_secs.filter(|secs| *secs > 0) {
        config.timeout = Duration::from_secs(secs);
    }
    Ok(config)
}

fn finish(outcome: SubmitOutcome, error: Option<&str>, history: &[Route]) -> CliResult {
    match outcome {
        SubmitOutcome::Completed => {
            if let Some(route) = history.last() {
                println!("{}", route.path());
            }
            Ok(())
        }
        SubmitOutcome::Blocked | SubmitOutcome::Failed => {
            Err(error.unwrap_or("request was not sent").to_owned().into())
        }
    }
}

fn print_tasks(tasks: &[String]) {
    if tasks.is_empty() {
        println!("There is no task at the moment...");
        return;
    }
    for (index, task) in tasks.iter().enumerate() {
        println!("  [{index}] {task}");
    }
}

async fn run_dashboard(
    ctx: &AppContext,
    payload: &NavigationPayload,
    task_index: Option<usize>,
    photo: Option<&Path>,
) -> CliResult {
    let mut page = DashboardPage::open(payload, ctx).await;
    println!("Hi, it's {} ! ({})", page.pet_name(), page.egg().asset_path());

    let (Some(index), Some(photo)) = (task_index, photo) else {
        print_tasks(page.tasks());
        return Ok(());
    };

    if !page.open_task(index) {
        return Err(format!("no task at index {index}").into());
    }
    page.pick_file(ImagePayload::from_path(photo).await?);
    let outcome = page.submit_proof(ctx).await;
    if let Some(message) = page.modal().and_then(|modal| modal.message()) {
        println!("{message}");
    }
    if outcome != SubmitOutcome::Completed {
        return Err("proof was not accepted".into());
    }

    sleep(AUTO_CLOSE_DELAY).await;
    page.tick(Instant::now());
    print_tasks(page.tasks());

    let remaining = NavigationPayload {
        egg: Some(page.egg()),
        name: Some(page.pet_name().to_owned()),
        tasks: Some(page.tasks().to_vec()),
        user_id: page.user_id().map(str::to_owned),
    };
    println!("{}", Route::Dashboard(remaining).path());
    Ok(())
}
