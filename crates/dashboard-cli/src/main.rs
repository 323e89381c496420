use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dashboard_cli::seeder::{self, SeedConfig};
use dashboard_config::DatabaseConfig;
use dashboard_core::hash_password;
use dashboard_db::{PgStore, UserRepository};
use dashboard_models::{CreateUserDto, NewUser};
use dialoguer::{Input, Password, Select};
use dotenvy::dotenv;
use validator::Validate;

const ROLES: [&str; 2] = ["admin", "user"];

#[derive(Parser)]
#[command(name = "dashboard-cli")]
#[command(about = "Service dashboard CLI - administrative tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user account
    CreateUser {
        /// Login name
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Role, e.g. admin or user
        #[arg(short = 'r', long)]
        role: Option<String>,
    },
    /// Load the baseline services and accounts (user1/user2)
    SeedBaseline {
        /// Password for the baseline accounts
        #[arg(long, default_value = "password")]
        password: String,
    },
    /// Seed the database with baseline records plus fake services and users
    Seed {
        /// Number of services to create
        #[arg(short = 's', long, default_value = "10")]
        services: usize,

        /// Number of versions per service
        #[arg(long, default_value = "3")]
        versions: usize,

        /// Number of extra users
        #[arg(long, default_value = "5")]
        users: usize,

        /// Password for every seeded account
        #[arg(long, default_value = "password")]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command).await {
        eprintln!("\n❌ {e:#}");
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let store = connect().await?;

    match command {
        Commands::CreateUser {
            username,
            password,
            role,
        } => handle_create_user(&store, username, password, role).await,
        Commands::SeedBaseline { password } => {
            let hash = hash_password(&password).map_err(|e| anyhow::anyhow!(e.message()))?;
            dashboard_db::seed_baseline(&store, &hash).await?;
            println!("\n✅ Baseline records present");
            Ok(())
        }
        Commands::Seed {
            services,
            versions,
            users,
            password,
        } => {
            let hash = hash_password(&password).map_err(|e| anyhow::anyhow!(e.message()))?;
            let config = SeedConfig::new(services)
                .with_versions(versions)
                .with_users(users);
            seeder::seed_all(&store, &config, &hash).await?;
            println!("\n✅ Seeding complete");
            Ok(())
        }
    }
}

async fn connect() -> anyhow::Result<PgStore> {
    let config = DatabaseConfig::from_env();
    let Some(url) = config.url.clone() else {
        bail!("DATABASE_URL or SERVICE_DASHBOARD_DB_HOST must be set");
    };
    PgStore::connect(&url, &config)
        .await
        .context("Failed to connect to database")
}

async fn handle_create_user(
    store: &PgStore,
    username: Option<String>,
    password: Option<String>,
    role: Option<String>,
) -> anyhow::Result<()> {
    let username = match username {
        Some(username) => username,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    let role = match role {
        Some(role) => role,
        None => {
            let choice = Select::new()
                .with_prompt("Role")
                .items(&ROLES)
                .default(1)
                .interact()?;
            ROLES[choice].to_string()
        }
    };

    let dto = CreateUserDto {
        username,
        password,
        role,
        user_profile: None,
    };
    dto.validate().context("Invalid user")?;

    let user = store
        .create_user(NewUser {
            password_hash: hash_password(&dto.password).map_err(|e| anyhow::anyhow!(e.message()))?,
            username: dto.username,
            role: dto.role,
            profile: None,
        })
        .await?;

    println!("\n✅ User created successfully!");
    println!("   Username: {}", user.username);
    println!("   Role: {}", user.role);
    Ok(())
}
