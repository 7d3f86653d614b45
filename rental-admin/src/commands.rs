//! Subcommand handlers

use anyhow::{Context, bail};
use chrono::NaiveDate;
use rental_client::pages::{BookingsPage, DashboardPage, MembersPage};
use rental_client::{AdminApp, ClientError, ImageUpload, Route, RouteDecision};
use rust_decimal::Decimal;
use shared::models::{BookingStatus, MemberInput, ProductUpdate, TicketStatus};
use shared::util::today_utc;
use std::str::FromStr;
use tokio::sync::broadcast::error::RecvError;

use crate::cli::{
    BookingCommands, CategoryCommands, Commands, FilterArgs, MemberArgs, MemberCommands,
    NotificationCommands, ProductCommands, SupportCommands,
};
use crate::render;

pub async fn run(app: &AdminApp, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { username, password } => login(app, &username, &password).await,
        Commands::Logout => {
            let route = app.logout().await?;
            println!("Signed out ({route})");
            Ok(())
        }
        Commands::Status { path } => {
            status(app, &path);
            Ok(())
        }
        Commands::Dashboard(filter) => dashboard(app, &filter).await,
        Commands::Report { filter, dir } => {
            require(app, Route::Dashboard)?;
            let mut page = dashboard_page(app, &filter)?;
            let status = parse_status(filter.status.as_deref())?;
            let path = page.export(status, &dir, today_utc()).await?;
            println!("Report saved to {}", path.display());
            Ok(())
        }
        Commands::Products(cmd) => products(app, cmd).await,
        Commands::Members(cmd) => members(app, cmd).await,
        Commands::Bookings(cmd) => bookings(app, cmd).await,
        Commands::Support(cmd) => support(app, cmd).await,
        Commands::Categories(cmd) => categories(app, cmd).await,
        Commands::Notifications(cmd) => notifications(app, cmd).await,
        Commands::Watch => watch(app).await,
    }
}

/// Refuse to run a page command without a session
fn require(app: &AdminApp, route: Route) -> anyhow::Result<()> {
    match app.route(route.path()) {
        RouteDecision::Render(_) => Ok(()),
        RouteDecision::Redirect(to) => Err(ClientError::NotAuthenticated)
            .with_context(|| format!("{route} redirects to {to}; run `rental-admin login` first")),
    }
}

async fn login(app: &AdminApp, username: &str, password: &str) -> anyhow::Result<()> {
    let outcome = app.login(username, password).await;
    if !outcome.success {
        bail!(outcome.message.unwrap_or_default());
    }
    let name = app
        .session()
        .admin()
        .map(|a| a.display_name().to_string())
        .unwrap_or_else(|| username.to_string());
    println!("Signed in as {name}, landing on {}", Route::landing());
    Ok(())
}

fn status(app: &AdminApp, path: &str) {
    let session = app.session();
    if session.is_authenticated() {
        let who = session
            .admin()
            .map(|a| a.display_name().to_string())
            .unwrap_or_else(|| "admin".into());
        println!("Signed in ({who})");
    } else {
        println!("Signed out");
    }
    println!("API:  {}", app.config().api_base_url);
    println!("Push: {}", app.config().push_url);

    match app.route(path) {
        RouteDecision::Render(route) => println!("{path} renders {route}"),
        RouteDecision::Redirect(route) => println!("{path} redirects to {route}"),
    }
}

fn parse_date(label: &str, raw: Option<&str>) -> anyhow::Result<Option<NaiveDate>> {
    raw.map(|d| {
        NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")
            .with_context(|| format!("{label} must be YYYY-MM-DD, got {d:?}"))
    })
    .transpose()
}

fn parse_status(raw: Option<&str>) -> anyhow::Result<Option<BookingStatus>> {
    raw.map(|s| BookingStatus::from_str(s).map_err(anyhow::Error::msg))
        .transpose()
}

fn parse_decimal(label: &str, raw: &str) -> anyhow::Result<Decimal> {
    Decimal::from_str(raw.trim()).with_context(|| format!("{label} must be a number, got {raw:?}"))
}

fn dashboard_page(app: &AdminApp, args: &FilterArgs) -> anyhow::Result<DashboardPage> {
    let mut page = app.dashboard_page(today_utc());
    if let Some(from) = parse_date("--from", args.from.as_deref())? {
        page.filter.from = Some(from);
    }
    if let Some(to) = parse_date("--to", args.to.as_deref())? {
        page.filter.to = Some(to);
    }
    Ok(page)
}

async fn dashboard(app: &AdminApp, args: &FilterArgs) -> anyhow::Result<()> {
    require(app, Route::Dashboard)?;
    let mut page = dashboard_page(app, args)?;
    if let Some(status) = parse_status(args.status.as_deref())? {
        page.filter = page.filter.with_status(status);
    }

    // Cards and overview fail independently
    if let Err(e) = page.load_stats().await {
        tracing::warn!("Dashboard counts unavailable: {e}");
    }
    page.load().await?;
    render::dashboard(page.stats.as_ref(), page.overview.as_ref());
    Ok(())
}

async fn products(app: &AdminApp, cmd: ProductCommands) -> anyhow::Result<()> {
    match cmd {
        ProductCommands::List { search } => {
            require(app, Route::Products)?;
            let mut page = app.products_page();
            page.state.set_search(search.unwrap_or_default());
            page.load().await?;
            render::products(&page.state.filtered());
        }
        ProductCommands::Add {
            name,
            description,
            total_units,
            maintenance_units,
            base_price,
            member_price,
            deposit,
            features,
            images,
        } => {
            require(app, Route::AddProduct)?;
            let mut page = app.add_product_page();
            page.form.name = name;
            page.form.description = description;
            page.form.total_units = total_units;
            page.form.maintenance_units = maintenance_units;
            page.form.base_price = base_price;
            page.form.member_price = member_price;
            page.form.refundable_deposit = deposit;
            page.form.features = features;
            for path in &images {
                page.images.push(ImageUpload::from_path(path).await?);
            }

            let next = page.submit().await?;
            println!("Product added, see {next}");
        }
        ProductCommands::Update {
            id,
            name,
            base_price,
            total_units,
            maintenance_units,
            active,
        } => {
            require(app, Route::Products)?;
            let update = ProductUpdate {
                name,
                base_price: base_price
                    .as_deref()
                    .map(|p| parse_decimal("--base-price", p))
                    .transpose()?,
                total_units,
                maintenance_units,
                is_active: active,
                ..ProductUpdate::default()
            };
            let mut page = app.products_page();
            page.update(&id, &update).await?;
            println!("Product {id} updated");
        }
        ProductCommands::Delete { id } => {
            require(app, Route::Products)?;
            app.products_page().delete(&id).await?;
            println!("Product {id} deleted");
        }
    }
    Ok(())
}

fn apply_member_args(form: &mut MemberInput, args: MemberArgs) -> anyhow::Result<()> {
    if let Some(v) = args.member_id {
        form.member_id = v;
    }
    if let Some(v) = args.name {
        form.name = v;
    }
    if let Some(v) = args.phone {
        form.phone = v;
    }
    if let Some(v) = args.email {
        form.email = v;
    }
    if let Some(v) = args.status {
        form.status = v.parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(v) = parse_date("--valid-until", args.valid_until.as_deref())? {
        form.valid_until = Some(v);
    }
    if let Some(v) = args.discount {
        form.discount_percent = parse_decimal("--discount", &v)?;
    }
    Ok(())
}

async fn members(app: &AdminApp, cmd: MemberCommands) -> anyhow::Result<()> {
    require(app, Route::Members)?;
    let mut page = app.members_page();
    match cmd {
        MemberCommands::List { search } => {
            page.state.set_search(search.unwrap_or_default());
            page.load().await?;
            render::members(&page.state.filtered());
        }
        MemberCommands::Add(args) => {
            let mut form = MembersPage::new_form();
            apply_member_args(&mut form, args)?;
            page.save(None, &form).await?;
            println!("Member {} created", form.member_id);
        }
        MemberCommands::Update { id, fields } => {
            page.load().await?;
            let Some(mut form) = page.edit_form(&id) else {
                bail!("Member {id} not found");
            };
            apply_member_args(&mut form, fields)?;
            page.save(Some(&id), &form).await?;
            println!("Member {id} updated");
        }
        MemberCommands::Delete { id } => {
            page.delete(&id).await?;
            println!("Member {id} deleted");
        }
    }
    Ok(())
}

async fn bookings(app: &AdminApp, cmd: BookingCommands) -> anyhow::Result<()> {
    require(app, Route::Bookings)?;
    let mut page = app.bookings_page();
    match cmd {
        BookingCommands::List {
            search,
            status,
            member,
        } => {
            page.query.status = parse_status(status.as_deref())?;
            page.query.member_id = member;
            page.state.set_search(search.unwrap_or_default());
            page.load().await?;
            render::bookings(&page.state.filtered());
        }
        BookingCommands::Cancel { id, reason } => {
            page.load().await?;
            page.cancel(&id, &reason).await?;
            report_booking(&page, &id);
        }
        BookingCommands::Verify { id, method, amount } => {
            page.load().await?;
            page.verify_payment(&id, &method, &amount).await?;
            report_booking(&page, &id);
        }
    }
    render::warnings(page.warnings());
    Ok(())
}

fn report_booking(page: &BookingsPage, id: &str) {
    match page.find(id) {
        Some(b) => println!("Booking {id} is now {}", b.status),
        None => println!("Booking {id} updated"),
    }
}

async fn support(app: &AdminApp, cmd: SupportCommands) -> anyhow::Result<()> {
    require(app, Route::Support)?;
    let mut page = app.support_page();
    page.load().await?;
    match cmd {
        SupportCommands::List { search } => {
            page.state.set_search(search.unwrap_or_default());
            render::tickets(&page.state.filtered());
        }
        SupportCommands::Reply {
            id,
            status,
            message,
        } => {
            let Some(mut form) = page.reply_form(&id) else {
                bail!("Ticket {id} not found");
            };
            if let Some(status) = status {
                form.status = TicketStatus::from_str(&status).map_err(anyhow::Error::msg)?;
            }
            if let Some(message) = message {
                form.admin_message = message;
            }
            page.update(&id, &form).await?;
            println!("Ticket {id} is {}", form.status);
        }
    }
    Ok(())
}

async fn categories(app: &AdminApp, cmd: CategoryCommands) -> anyhow::Result<()> {
    require(app, Route::Categories)?;
    let mut page = app.categories_page();
    match cmd {
        CategoryCommands::List => {
            page.load().await?;
            render::categories(&page.state.filtered());
        }
        CategoryCommands::Add { name } => {
            page.create(&name).await?;
            println!("Category {name:?} created");
        }
        CategoryCommands::Rename { id, name } => {
            page.rename(&id, &name).await?;
            println!("Category {id} renamed to {name:?}");
        }
        CategoryCommands::Delete { id } => {
            page.delete(&id).await?;
            println!("Category {id} deleted");
        }
    }
    Ok(())
}

async fn notifications(app: &AdminApp, cmd: NotificationCommands) -> anyhow::Result<()> {
    require(app, Route::Dashboard)?;
    app.refresh_notifications().await?;
    match cmd {
        NotificationCommands::List => {
            let store = app.notifications();
            render::notifications(&store.snapshot(), store.unread_count());
        }
        NotificationCommands::Read { id } => {
            if app.mark_notification_read(&id).await? {
                println!("Notification {id} marked read");
            } else {
                println!("Notification {id} was already read");
            }
        }
        NotificationCommands::ReadAll => {
            app.mark_all_notifications_read().await?;
            println!("All notifications marked read");
        }
    }
    Ok(())
}

/// Keep the push channel open, reloading lists as signals arrive
async fn watch(app: &AdminApp) -> anyhow::Result<()> {
    require(app, Route::Dashboard)?;

    let mut signals = app.bus().subscribe();
    app.start();

    if let Err(e) = app.refresh_notifications().await {
        tracing::warn!("Could not load notifications: {e}");
    }
    let mut bookings = app.bookings_page();
    let mut support = app.support_page();
    if let Err(e) = bookings.load().await {
        tracing::warn!("Could not load bookings: {e}");
    }
    if let Err(e) = support.load().await {
        tracing::warn!("Could not load support tickets: {e}");
    }

    println!(
        "Watching {} ({} unread notification(s)), Ctrl+C to stop",
        app.config().push_url,
        app.notifications().unread_count()
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, stopping");
                break;
            }
            received = signals.recv() => match received {
                Ok(event) => {
                    match bookings.handle_signal(&event).await {
                        Ok(true) => println!("  bookings: {} loaded", bookings.state.items().len()),
                        Ok(false) => {}
                        Err(e) => tracing::warn!("Booking reload failed: {e}"),
                    }
                    match support.handle_signal(&event).await {
                        Ok(true) => println!("  support: {} ticket(s)", support.state.items().len()),
                        Ok(false) => {}
                        Err(e) => tracing::warn!("Ticket reload failed: {e}"),
                    }
                }
                Err(RecvError::Lagged(n)) => tracing::warn!("Skipped {n} push signal(s)"),
                Err(RecvError::Closed) => break,
            },
        }
    }
    Ok(())
}
