use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::time::Duration;

use staybook::catalog::{self, Catalog, FilterCriteria, LoadState, PriceRange};
use staybook::config::{Config, DEFAULT_CONFIG_PATH};
use staybook::favorites::Favorites;
use staybook::http_client;
use staybook::models::format_inr;
use staybook::quote::BookingForm;
use staybook::{ApiError, HttpApi, Session, StorefrontApi, TokenStore};

#[derive(Parser, Debug)]
#[command(name = "staybook")]
#[command(about = "Browse, quote and book holiday properties", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter data/config.yaml
    InitConfig,

    /// List properties, optionally filtered
    Listings {
        /// Free-text search over title, location and description
        #[arg(short, long, default_value = "")]
        query: String,

        /// Exact location, or "All Locations"
        #[arg(short, long, default_value = catalog::ALL_LOCATIONS)]
        location: String,

        /// Price range label, see `price-ranges`
        #[arg(short, long, default_value = "All Prices")]
        price: String,

        /// Only show favorites
        #[arg(long)]
        favorites: bool,
    },

    /// Show the location filter options
    Locations,

    /// Show the price filter options
    PriceRanges,

    /// Show one property
    Show { id: String },

    /// Price a stay without booking it
    Quote {
        id: String,
        #[arg(long)]
        check_in: Option<NaiveDate>,
        #[arg(long)]
        check_out: Option<NaiveDate>,
        #[arg(long, default_value_t = 1)]
        guests: u32,
    },

    /// Book a stay (requires login)
    Book {
        id: String,
        #[arg(long)]
        check_in: Option<NaiveDate>,
        #[arg(long)]
        check_out: Option<NaiveDate>,
        #[arg(long, default_value_t = 1)]
        guests: u32,
    },

    /// Show your bookings (requires login)
    Bookings,

    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    Logout,

    /// Mark or unmark a property as favorite
    Favorite { id: String },

    /// List favorite property ids
    Favorites,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Command::InitConfig = args.command {
        Config::create_default()?;
        println!("Wrote {}", DEFAULT_CONFIG_PATH);
        return Ok(());
    }

    let config = Config::load()?;
    init_logging(&config);

    let client = http_client::create_http_client_with_timeout(
        &config.user_agent,
        Duration::from_secs(config.request_timeout_seconds),
    )?;
    let api = HttpApi::new(client, &config.api_base_url);
    tracing::info!("Using API at {}", api.base_url());

    let mut session = Session::new(api, TokenStore::new(&config.token_path));
    let mut favorites = Favorites::new(&config.favorites_path);

    if let Err(e) = run(args.command, &mut session, &mut favorites).await {
        report(&e);
        std::process::exit(1);
    }

    Ok(())
}

/// Uses RUST_LOG when set, otherwise the configured level. Logs go to
/// stderr so page output stays clean.
fn init_logging(config: &Config) {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
        tracing::info!("Logging level set from RUST_LOG environment variable");
        return;
    }

    let level = config.log_level().unwrap_or_else(|| {
        eprintln!("Invalid tracing level '{}', using 'info'", config.tracing_level);
        tracing::Level::INFO
    });

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn report(error: &ApiError) {
    tracing::debug!("Command failed: {:?}", error);
    if error.requires_login() {
        eprintln!("{}", error);
        eprintln!("Run `staybook login --email <email> --password <password>` to continue.");
    } else {
        eprintln!("Error: {}", error);
    }
}

async fn run<A: StorefrontApi>(
    command: Command,
    session: &mut Session<A>,
    favorites: &mut Favorites,
) -> Result<(), ApiError> {
    match command {
        Command::InitConfig => {}

        Command::Listings { query, location, price, favorites: only_favorites } => {
            let criteria = FilterCriteria::new(&query, &location, &price)?;
            let catalog = load_catalog(session.api()).await;

            match catalog.view(&criteria) {
                LoadState::Loading => println!("Loading..."),
                LoadState::Failed(message) => return Err(ApiError::Unavailable(message)),
                LoadState::Loaded(listings) => {
                    let listings: Vec<_> = if only_favorites {
                        listings.into_iter().filter(|l| favorites.contains(&l.id)).collect()
                    } else {
                        listings
                    };

                    if listings.is_empty() {
                        println!("No properties match your search.");
                    } else {
                        for listing in &listings {
                            let star = if favorites.contains(&listing.id) { "★ " } else { "" };
                            println!("{}{}", star, listing.format_card());
                        }
                        println!("\n{} of {} properties", listings.len(), catalog.len());
                    }
                }
            }
        }

        Command::Locations => {
            let catalog = load_catalog(session.api()).await;
            if let LoadState::Failed(message) = catalog.state() {
                return Err(ApiError::Unavailable(message.clone()));
            }
            for location in catalog.location_options() {
                println!("{}", location);
            }
        }

        Command::PriceRanges => {
            for range in PriceRange::ALL {
                println!("{}", range);
            }
        }

        Command::Show { id } => {
            let listing = session.api().listing(&id).await?;
            println!("{}", listing.format_details());
            if favorites.contains(&listing.id) {
                println!("★ In your favorites");
            }
        }

        Command::Quote { id, check_in, check_out, guests } => {
            let listing = session.api().listing(&id).await?;
            let form = BookingForm { check_in, check_out, guests };
            let quote = form.quote_for(&listing)?;
            println!(
                "{}: ₹{} × {} nights = ₹{}",
                listing.title,
                format_inr(listing.price),
                quote.nights,
                format_inr(quote.total)
            );
        }

        Command::Book { id, check_in, check_out, guests } => {
            let listing = session.api().listing(&id).await?;
            let form = BookingForm { check_in, check_out, guests };
            let confirmation = session.book(&listing, &form).await?;
            println!(
                "Booking {} for {} ({} nights, ₹{}) is {}",
                confirmation.booking.id,
                listing.title,
                confirmation.quote.nights,
                format_inr(confirmation.quote.total),
                confirmation.booking.status.as_str()
            );
        }

        Command::Bookings => {
            let bookings = session.bookings().await?;
            if bookings.is_empty() {
                println!("You have no bookings yet. Run `staybook listings` to explore properties.");
            } else {
                for booking in &bookings {
                    println!("{}", booking.format_dashboard_entry());
                }
            }
        }

        Command::Login { email, password } => {
            let user = session.login(&email, &password).await?;
            println!("Welcome back, {}!", user.name);
        }

        Command::Register { name, email, password } => {
            let user = session.register(&name, &email, &password).await?;
            println!("Welcome, {}!", user.name);
        }

        Command::Logout => {
            session.logout()?;
            println!("Logged out.");
        }

        Command::Favorite { id } => {
            if favorites.toggle(&id) {
                println!("Added {} to favorites", id);
            } else {
                println!("Removed {} from favorites", id);
            }
        }

        Command::Favorites => {
            if favorites.is_empty() {
                println!("No favorites yet.");
            }
            for id in favorites.ids() {
                println!("{}", id);
            }
        }
    }

    Ok(())
}

/// Fetches the snapshot once; a failure becomes a failed catalog rather
/// than an early return so pages can tell it apart from "no matches"
async fn load_catalog<A: StorefrontApi>(api: &A) -> Catalog {
    match api.listings().await {
        Ok(listings) => {
            tracing::info!("Loaded {} listings", listings.len());
            Catalog::from_listings(listings)
        }
        Err(e) => {
            tracing::warn!("Failed to load listings: {}", e);
            Catalog::failed(e.to_string())
        }
    }
}
