use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

use sitekit::cli::{check_permissions, create_super_admin, seed_translations};
use sitekit::logging::init_cli_tracing;
use sitekit::store::postgres;
use sitekit_config::{RbacConfig, SecurityConfig};

#[derive(Parser)]
#[command(name = "sitekit-cli")]
#[command(about = "sitekit CLI - Administrative tools for the sitekit API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user with the super_admin role
    CreateSuperAdmin {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// First name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Last name
        #[arg(short = 's', long)]
        surename: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Insert the default UI translation keys
    SeedTranslations,
    /// List permission entries that match no route
    CheckPermissions,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_cli_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::CreateSuperAdmin {
            email,
            name,
            surename,
            password,
        } => handle_create_super_admin(email, name, surename, password).await,
        Commands::SeedTranslations => handle_seed_translations().await,
        Commands::CheckPermissions => handle_check_permissions(),
    };

    if let Err(e) = result {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

fn prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Input::new().with_prompt(label).interact_text()?),
    }
}

async fn handle_create_super_admin(
    email: Option<String>,
    name: Option<String>,
    surename: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let email = prompt(email, "Email address")?;
    let name = prompt(name, "First name")?;
    let surename = prompt(surename, "Last name")?;
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    let store = postgres::connect().await?;
    let cost = SecurityConfig::from_env().bcrypt_cost;
    let user = create_super_admin(&store, &email, &name, &surename, &password, cost).await?;

    println!("\n✅ Super admin created successfully!");
    println!("   Email: {}", user.email);
    println!("   Name: {} {}", user.name, user.surename);
    Ok(())
}

async fn handle_seed_translations() -> anyhow::Result<()> {
    let store = postgres::connect().await?;
    let inserted = seed_translations(&store).await?;

    println!("✅ Inserted {} translation(s)", inserted);
    Ok(())
}

fn handle_check_permissions() -> anyhow::Result<()> {
    let table = RbacConfig::from_env().load()?;
    let unknown = check_permissions(&table);

    if unknown.is_empty() {
        println!("✅ Every permission entry names a route");
        return Ok(());
    }

    for entry in &unknown {
        println!("   {}", entry);
    }
    anyhow::bail!("{} permission entr(ies) name no route", unknown.len())
}
