use clap::{Parser, Subcommand};
use doorman::{
    db,
    repositories::SqliteUserRepository,
    services::identity::{self, UserOverrides},
};

#[derive(Parser)]
#[command(name = "doorman-cli")]
#[command(about = "CLI tool for managing doorman accounts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,

        /// First name
        #[arg(long)]
        first_name: Option<String>,

        /// Last name
        #[arg(long)]
        last_name: Option<String>,
    },

    /// Create a superuser with staff and superuser flags set
    CreateSuperuser {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List all users
    List {
        /// Maximum number of users to display
        #[arg(short, long, default_value_t = 100)]
        limit: i64,

        /// Offset for pagination
        #[arg(short = 'o', long, default_value_t = 0)]
        offset: i64,
    },

    /// Delete a user
    Delete {
        /// Email address of the user to delete
        #[arg(short, long)]
        email: String,
    },

    /// Set a new password for a user
    SetPassword {
        /// Email address of the user
        #[arg(short, long)]
        email: String,

        /// New password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

fn get_password(prompt: &str) -> Result<String, Box<dyn std::error::Error>> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

fn prompt_password() -> Result<String, Box<dyn std::error::Error>> {
    let password = get_password("Password")?;
    let confirm = get_password("Confirm password")?;
    if password != confirm {
        eprintln!("Passwords do not match");
        std::process::exit(1);
    }
    Ok(password)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Connect to database
    let pool = db::create_pool().await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;

    let repo = SqliteUserRepository::new(pool);

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::Create {
                email,
                password,
                first_name,
                last_name,
            } => {
                let password = match password {
                    Some(pw) => pw,
                    None => prompt_password()?,
                };

                let overrides = UserOverrides {
                    first_name,
                    last_name,
                    ..Default::default()
                };

                match identity::create_user(&repo, &email, &password, overrides).await {
                    Ok(user) => {
                        println!("User created successfully!");
                        println!("  ID: {}", user.id);
                        println!("  Email: {}", user.email);
                        println!("  Name: {}", user.full_name());
                    }
                    Err(err) => {
                        eprintln!("Failed to create user: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::CreateSuperuser { email, password } => {
                let password = match password {
                    Some(pw) => pw,
                    None => prompt_password()?,
                };

                match identity::create_superuser(&repo, &email, &password, UserOverrides::default())
                    .await
                {
                    Ok(user) => {
                        println!("Superuser created successfully!");
                        println!("  ID: {}", user.id);
                        println!("  Email: {}", user.email);
                        println!("  Staff: {}", user.is_staff);
                        println!("  Superuser: {}", user.is_superuser);
                    }
                    Err(err) => {
                        eprintln!("Failed to create superuser: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::List { limit, offset } => {
                use doorman::repositories::UserRepository;

                match repo.list_users(Some(limit), Some(offset)).await {
                    Ok(users) => {
                        if users.is_empty() {
                            println!("No users found.");
                        } else {
                            println!(
                                "{:<5} {:<40} {:<8} {:<8} {:<20}",
                                "ID", "Email", "Active", "Staff", "Joined"
                            );
                            println!("{}", "-".repeat(81));
                            for user in users {
                                println!(
                                    "{:<5} {:<40} {:<8} {:<8} {:<20}",
                                    user.id,
                                    user.email,
                                    if user.is_active { "Yes" } else { "No" },
                                    if user.is_staff { "Yes" } else { "No" },
                                    user.date_joined
                                );
                            }
                        }
                    }
                    Err(err) => {
                        eprintln!("Failed to list users: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::Delete { email } => {
                use doorman::repositories::UserRepository;
                use doorman::services::identity::normalize_email;

                match repo.find_by_email(&normalize_email(&email)).await {
                    Ok(Some(user)) => match repo.delete_user(user.id).await {
                        Ok(()) => {
                            println!("User '{}' deleted successfully!", email);
                        }
                        Err(err) => {
                            eprintln!("Failed to delete user: {}", err);
                            std::process::exit(1);
                        }
                    },
                    Ok(None) => {
                        eprintln!("User '{}' not found", email);
                        std::process::exit(1);
                    }
                    Err(err) => {
                        eprintln!("Failed to find user: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::SetPassword { email, password } => {
                use doorman::repositories::UserRepository;
                use doorman::services::identity::normalize_email;

                match repo.find_by_email(&normalize_email(&email)).await {
                    Ok(Some(user)) => {
                        let password = match password {
                            Some(pw) => pw,
                            None => prompt_password()?,
                        };

                        let password_hash = match identity::hash_password(&password) {
                            Ok(hash) => hash,
                            Err(err) => {
                                eprintln!("Failed to hash password: {}", err);
                                std::process::exit(1);
                            }
                        };

                        match repo.update_password(user.id, &password_hash).await {
                            Ok(()) => {
                                println!("Password updated successfully for '{}'!", email);
                            }
                            Err(err) => {
                                eprintln!("Failed to update password: {}", err);
                                std::process::exit(1);
                            }
                        }
                    }
                    Ok(None) => {
                        eprintln!("User '{}' not found", email);
                        std::process::exit(1);
                    }
                    Err(err) => {
                        eprintln!("Failed to find user: {}", err);
                        std::process::exit(1);
                    }
                }
            }
        },
    }

    Ok(())
}
