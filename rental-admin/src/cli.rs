//! Command line surface

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rental-admin")]
#[command(about = "Admin console for the rental business", long_about = None)]
#[command(version)]
pub struct Cli {
    /// API base URL (overrides RENTAL_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session token file (overrides RENTAL_TOKEN_PATH)
    #[arg(long, global = true)]
    pub token_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and persist the session token
    Login {
        #[arg(short, long, env = "RENTAL_ADMIN_USER")]
        username: String,

        #[arg(short, long, env = "RENTAL_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Drop the session token
    Logout,

    /// Show the session state and where a path would land
    Status {
        /// Console path to check (e.g. /bookings)
        #[arg(default_value = "/")]
        path: String,
    },

    /// Dashboard cards and analytics overview
    Dashboard(FilterArgs),

    /// Export the booking report as CSV
    Report {
        #[command(flatten)]
        filter: FilterArgs,

        /// Directory the CSV is written to
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Product management
    #[command(subcommand)]
    Products(ProductCommands),

    /// Member management
    #[command(subcommand)]
    Members(MemberCommands),

    /// Booking management
    #[command(subcommand)]
    Bookings(BookingCommands),

    /// Support tickets
    #[command(subcommand)]
    Support(SupportCommands),

    /// Product categories
    #[command(subcommand)]
    Categories(CategoryCommands),

    /// Admin notifications
    #[command(subcommand)]
    Notifications(NotificationCommands),

    /// Stay connected and print push alerts as they arrive
    Watch,
}

#[derive(Args, Default)]
pub struct FilterArgs {
    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Last day (YYYY-MM-DD), today by default
    #[arg(long)]
    pub to: Option<String>,

    /// Restrict to one booking status
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Subcommand)]
pub enum ProductCommands {
    /// List products
    List {
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Add a product
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "1")]
        total_units: String,

        #[arg(long, default_value = "0")]
        maintenance_units: String,

        #[arg(long)]
        base_price: String,

        #[arg(long, default_value = "")]
        member_price: String,

        #[arg(long, default_value = "0")]
        deposit: String,

        /// Comma separated feature list
        #[arg(long, default_value = "")]
        features: String,

        /// Image files to upload
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },

    /// Change price, stock or visibility of a product
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        base_price: Option<String>,

        #[arg(long)]
        total_units: Option<u32>,

        #[arg(long)]
        maintenance_units: Option<u32>,

        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a product
    Delete { id: String },
}

#[derive(Args)]
pub struct MemberArgs {
    #[arg(long)]
    pub member_id: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// active, suspended or expired
    #[arg(long)]
    pub status: Option<String>,

    /// Membership end (YYYY-MM-DD)
    #[arg(long)]
    pub valid_until: Option<String>,

    #[arg(long)]
    pub discount: Option<String>,
}

#[derive(Subcommand)]
pub enum MemberCommands {
    /// List members
    List {
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Create a member
    Add(MemberArgs),

    /// Edit a member; omitted fields keep their value
    Update {
        id: String,

        #[command(flatten)]
        fields: MemberArgs,
    },

    /// Delete a member
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum BookingCommands {
    /// List bookings
    List {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        member: Option<String>,
    },

    /// Cancel a booking
    Cancel {
        id: String,

        #[arg(short, long)]
        reason: String,
    },

    /// Record a counter payment and confirm the booking
    Verify {
        id: String,

        /// cash, esewa or khalti
        #[arg(short, long, default_value = "cash")]
        method: String,

        #[arg(short, long)]
        amount: String,
    },
}

#[derive(Subcommand)]
pub enum SupportCommands {
    /// List tickets
    List {
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Reply to a ticket or move it along
    Reply {
        id: String,

        /// pending, in-progress or resolved
        #[arg(long)]
        status: Option<String>,

        #[arg(short, long)]
        message: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories
    List,

    /// Create a category
    Add { name: String },

    /// Rename a category
    Rename { id: String, name: String },

    /// Delete a category
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum NotificationCommands {
    /// List notifications, newest first
    List,

    /// Mark one notification read
    Read { id: String },

    /// Mark every notification read
    ReadAll,
}
