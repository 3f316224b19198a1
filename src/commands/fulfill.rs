use anyhow::{Context, Result};
use console::{style, Term};

use crate::models::LineItem;
use crate::services::api::ApiClient;
use crate::services::fulfillment::FulfillmentSession;
use crate::services::notify::{self, Notice};
use crate::utils::{format_currency, format_quantity};

pub async fn run(client: ApiClient, order_id: i64) -> Result<()> {
    let mut session = FulfillmentSession::start(client, order_id)
        .await
        .context("start fulfillment session")?;
    let term = Term::stdout();

    print_header(&session);
    print_lines(session.lines());
    print_help();

    loop {
        print_progress(&session);
        let input = term.read_line().context("read scan input")?;
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(rest) = input.strip_prefix('/') {
            let mut words = rest.splitn(2, ' ');
            match (words.next().unwrap_or(""), words.next()) {
                ("quit", _) | ("q", _) => break,
                ("lines", _) => print_lines(session.lines()),
                ("find", Some(query)) if !query.trim().is_empty() => {
                    session.handle_search(query.trim()).await
                }
                ("find", _) => println!("usage: /find <sku or name>"),
                ("unavailable", Some(index)) => mark_unavailable(session.lines(), index),
                ("unavailable", None) => println!("usage: /unavailable <line number>"),
                _ => print_help(),
            }
        } else {
            // Barcode scanners type the code and send Enter, so bare input
            // is a scan.
            session.handle_scan(input).await;
        }

        if session.pending_substitution().is_some() {
            resolve_substitution(&mut session, &term).await?;
        }

        if session.progress().is_complete() {
            println!(
                "{}",
                style("Order ready for shipment: all items have been fulfilled")
                    .green()
                    .bold()
            );
        }
    }

    Ok(())
}

async fn resolve_substitution(session: &mut FulfillmentSession, term: &Term) -> Result<()> {
    let decision = session
        .pending_substitution()
        .expect("substitution pending")
        .clone();

    println!(
        "{}",
        style("The scanned item does not match the expected product.").yellow()
    );
    println!("  expected: {}", decision.expected.part_name());
    println!("  scanned:  {}", decision.scanned.name);
    print!("Confirm substitution? [y/N] ");
    std::io::Write::flush(&mut std::io::stdout()).context("flush prompt")?;

    let answer = term.read_line().context("read substitution answer")?;
    if answer.trim().eq_ignore_ascii_case("y") {
        session.confirm_substitution().await;
    } else {
        session.cancel_substitution();
        println!("Substitution cancelled");
    }
    Ok(())
}

// Display-only: the backend has no contract for unavailability, so this
// never mutates anything.
fn mark_unavailable(lines: &[LineItem], index: &str) {
    let parsed = index.trim().parse::<usize>();
    let line = parsed
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|n| lines.get(n));
    match line {
        Some(line) if !line.is_complete() => {
            notify::emit(&Notice::item_marked_unavailable());
        }
        Some(_) => println!("Line is already complete"),
        None => println!("No such line number"),
    }
}

fn print_header(session: &FulfillmentSession) {
    let order = session.order();
    println!(
        "{} {}",
        style("Fulfill Order:").bold(),
        style(&order.reference).bold()
    );
    println!("Customer: {}", order.customer_name());
}

fn print_progress(session: &FulfillmentSession) {
    let progress = session.progress();
    println!(
        "Progress: {} / {} items",
        format_quantity(progress.completed),
        format_quantity(progress.total)
    );
}

fn print_lines(lines: &[LineItem]) {
    let mut table = comfy_table::Table::new();
    table
        .load_preset(comfy_table::presets::ASCII_FULL_CONDENSED)
        .set_header(["#", "Part", "Shipped", "Status", "Price", "Reference"]);

    for (index, line) in lines.iter().enumerate() {
        let status = if line.is_complete() {
            style("complete").green().to_string()
        } else {
            format!("{} remaining", format_quantity(line.remaining()))
        };
        table.add_row([
            (index + 1).to_string(),
            line.part_name().to_string(),
            format!(
                "{} / {}",
                format_quantity(line.shipped),
                format_quantity(line.quantity)
            ),
            status,
            format_currency(line.sale_price, line.sale_price_currency.as_deref()),
            line.reference.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }

    println!("{table}");
}

fn print_help() {
    println!("Scan a barcode and press Enter to fulfill an item.");
    println!("Commands: /find <sku or name>, /unavailable <line number>, /lines, /quit");
}
