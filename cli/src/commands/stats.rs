use crate::app::App;
use crate::args::StatsCommand;
use crate::output;
use anyhow::Result;
use ventasimple_types::{category_shares, format_money, DateRange};

pub async fn run(app: &App, command: StatsCommand) -> Result<()> {
    let token = app.token()?;
    match command {
        StatsCommand::Summary(range) => {
            let range = range.resolve_today()?;
            let summary = app.client.stats_summary(&token, &range).await?;
            output::emit(app.json, &summary, |s| {
                print_range(&range);
                println!("Sales:      {}", format_money(s.sales_amount.unwrap_or(0.0)));
                println!("Tickets:    {}", s.sales_count.unwrap_or(0));
                println!("Avg ticket: {}", format_money(s.avg_ticket.unwrap_or(0.0)));
                println!("Items:      {}", s.items_count.unwrap_or(0));
            })
        }
        StatsCommand::Top { range, limit } => {
            let range = range.resolve_today()?;
            let products = app.client.top_products(&token, &range, limit).await?;
            output::emit(app.json, &products, |products| {
                print_range(&range);
                for (rank, p) in products.iter().enumerate() {
                    println!("{:>2}. {:<32} {}", rank + 1, p.name, p.qty.unwrap_or(0.0));
                }
            })
        }
        StatsCommand::Categories(range) => {
            let range = range.resolve_today()?;
            let leaders = app.client.category_leaders(&token, &range).await?;
            let slices = category_shares(&leaders);
            output::emit(app.json, &slices, |slices| {
                print_range(&range);
                for slice in slices {
                    println!(
                        "{:<24} {:>8} {:>5.1}%",
                        slice.name,
                        slice.value,
                        slice.share * 100.0
                    );
                }
            })
        }
        StatsCommand::Series { range, bucket } => {
            let range = range.resolve_today()?;
            let series = app.client.sales_series(&token, &range, bucket).await?;
            output::emit(app.json, &series, |series| {
                print_range(&range);
                for point in &series.data {
                    let ts = point
                        .ts
                        .map(|t| t.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{ts}  {:>14}  {:>5} tickets",
                        format_money(point.amount.unwrap_or(0.0)),
                        point.tickets.unwrap_or(0)
                    );
                }
                let (amount, tickets) = series.totals();
                println!("Total       {:>14}  {tickets:>5} tickets", format_money(amount));
            })
        }
        StatsCommand::Compare(range) => {
            let range = range.resolve_today()?;
            let value = app.client.stats_compare(&token, &range).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        StatsCommand::Heatmap(range) => {
            let range = range.resolve_today()?;
            let value = app.client.hours_heatmap(&token, &range).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
    }
}

fn print_range(range: &DateRange) {
    println!("{} to {}", range.from, range.to);
}
