//! Plain text rendering of page state

use rental_client::pages::{BookingActions, IntegrityWarning};
use shared::models::{
    AnalyticsOverview, Booking, Category, DashboardStats, Member, Notification, Product,
    SupportTicket,
};
use shared::util::format_local;

pub fn products(items: &[&Product]) {
    println!("{:<26} {:<24} {:>6} {:>10} {:>6}", "ID", "NAME", "AVAIL", "PRICE", "ACTIVE");
    for p in items {
        println!(
            "{:<26} {:<24} {:>6} {:>10} {:>6}",
            p.id,
            p.name,
            format!("{}/{}", p.available_units(), p.total_units),
            p.base_price,
            if p.is_active { "yes" } else { "no" }
        );
    }
    println!("{} product(s)", items.len());
}

pub fn members(items: &[&Member]) {
    println!("{:<26} {:<12} {:<20} {:<14} {:<10} VALID UNTIL", "ID", "MEMBER", "NAME", "PHONE", "STATUS");
    for m in items {
        println!(
            "{:<26} {:<12} {:<20} {:<14} {:<10} {}",
            m.id,
            m.member_id.as_deref().unwrap_or("-"),
            m.name.as_deref().unwrap_or("-"),
            m.phone.as_deref().unwrap_or("-"),
            m.status,
            m.valid_until
                .map(|t| t.date_naive().to_string())
                .unwrap_or_else(|| "-".into())
        );
    }
    println!("{} member(s)", items.len());
}

pub fn bookings(items: &[&Booking]) {
    for b in items {
        let actions = BookingActions::for_booking(b);
        let mut offered = Vec::new();
        if actions.cancel {
            offered.push("cancel");
        }
        if actions.verify_payment {
            offered.push("verify");
        }

        println!(
            "{}  {:<10} {} x{}  {}",
            b.id,
            b.status,
            b.product_label(),
            b.quantity,
            b.party_label()
        );
        println!(
            "    {} {}  {} -> {}",
            b.user_name.as_deref().unwrap_or("-"),
            b.user_phone.as_deref().unwrap_or(""),
            format_local(b.start_date_time),
            format_local(b.end_date_time)
        );
        if let Some(total) = b.total_amount.or(b.total_rent) {
            println!("    total {total}");
        }
        if let Some(notes) = b.admin_notes.as_deref().filter(|n| !n.is_empty()) {
            println!("    note: {notes}");
        }
        if !offered.is_empty() {
            println!("    actions: {}", offered.join(", "));
        }
    }
    println!("{} booking(s)", items.len());
}

pub fn warnings(items: &[IntegrityWarning]) {
    for w in items {
        eprintln!(
            "warning: booking {} expected cancelled ({:?}), server has {} ({:?})",
            w.booking_id, w.expected_reason, w.actual_status, w.actual_notes
        );
    }
}

pub fn tickets(items: &[&SupportTicket]) {
    for t in items {
        println!(
            "{}  {:<12} {} <{}>  {}",
            t.id,
            t.status,
            t.name,
            t.phone,
            format_local(t.created_at)
        );
        println!("    {}", t.message);
        if let Some(reply) = t.admin_message.as_deref().filter(|m| !m.is_empty()) {
            println!("    reply: {reply}");
        }
    }
    println!("{} ticket(s)", items.len());
}

pub fn categories(items: &[&Category]) {
    for c in items {
        println!("{:<26} {}", c.id, c.name);
    }
    println!("{} categor{}", items.len(), if items.len() == 1 { "y" } else { "ies" });
}

pub fn notifications(items: &[Notification], unread: usize) {
    for n in items {
        let marker = if n.read { " " } else { "*" };
        println!("{marker} {}  {}  {}", n.id, format_local(n.created_at), n.title);
        if !n.message.is_empty() {
            println!("    {}", n.message);
        }
    }
    println!("{} notification(s), {unread} unread", items.len());
}

pub fn dashboard(stats: Option<&DashboardStats>, overview: Option<&AnalyticsOverview>) {
    if let Some(stats) = stats {
        println!(
            "Products: {}  Bookings: {}  Members: {}",
            stats.products, stats.bookings, stats.members
        );
    }
    let Some(overview) = overview else {
        return;
    };

    let s = &overview.summary;
    println!(
        "Sales: {}  Bookings: {} (confirmed {}, cancelled {})",
        s.total_sales, s.total_bookings, s.confirmed_bookings, s.cancelled_bookings
    );

    if !overview.breakdowns.by_status.is_empty() {
        println!("\nBy status");
        for slice in overview.status_slices() {
            println!("  {:<12} {}", slice.name, slice.value);
        }
    }
    if !overview.series.is_empty() {
        println!("\nDaily");
        for point in &overview.series {
            println!("  {}  {:>10}  {:>4}", point.date, point.sales, point.bookings);
        }
    }
    if !overview.breakdowns.top_products.is_empty() {
        println!("\nTop products");
        for p in &overview.breakdowns.top_products {
            println!("  {:<24} {:>10}  {:>4}", p.name, p.sales, p.bookings);
        }
    }
}
