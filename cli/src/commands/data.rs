use crate::app::App;
use crate::args::{BusinessCommand, ExportCommand, RetentionCommand, TablesCommand};
use crate::output::{self, confirm, or_dash};
use anyhow::{bail, Result};
use ventasimple_types::{ExportJob, RemoteId, RetentionSettings, MAX_RETENTION_DAYS};

// ── Business profile ─────────────────────────────────────────────

pub async fn business(app: &App, command: BusinessCommand) -> Result<()> {
    let token = app.token()?;
    let mut profile = app.client.business_profile(&token).await?;

    if let BusinessCommand::Set {
        name,
        cuit,
        address,
        phone,
    } = command
    {
        profile.name = name.or(profile.name);
        profile.cuit = cuit.or(profile.cuit);
        profile.address = address.or(profile.address);
        profile.phone = phone.or(profile.phone);
        profile = app.client.update_business_profile(&token, &profile).await?;
        eprintln!("Business profile saved.");
    }

    output::emit(app.json, &profile, |p| {
        println!("Name:    {}", or_dash(p.name.as_deref()));
        println!("CUIT:    {}", or_dash(p.cuit.as_deref()));
        println!("Address: {}", or_dash(p.address.as_deref()));
        println!("Phone:   {}", or_dash(p.phone.as_deref()));
    })
}

// ── Retention ────────────────────────────────────────────────────

pub async fn retention(app: &App, command: RetentionCommand) -> Result<()> {
    let token = app.token()?;
    match command {
        RetentionCommand::Show => {
            let settings = app.client.retention_settings(&token).await?;
            print_retention(app, &settings)
        }
        RetentionCommand::Set {
            days,
            auto_export_pdf,
            frequency,
        } => {
            if days.is_some_and(|d| d > MAX_RETENTION_DAYS) {
                eprintln!("Retention is capped at {MAX_RETENTION_DAYS} days.");
            }
            let current = app.client.retention_settings(&token).await?;
            let wanted = RetentionSettings {
                days: days.or(current.days),
                auto_export_pdf: auto_export_pdf.or(current.auto_export_pdf),
                frequency: frequency.or(current.frequency),
            };
            let saved = app.client.update_retention_settings(&token, &wanted).await?;
            eprintln!("Retention settings saved.");
            print_retention(app, &saved)
        }
        RetentionCommand::Preview => {
            let report = app.client.run_cleanup(&token, true).await?;
            output::emit(app.json, &report, |r| println!("{}", r.preview_summary()))
        }
        RetentionCommand::Run { yes } => {
            confirm(yes, "delete data outside the retention window")?;
            let report = app.client.run_cleanup(&token, false).await?;
            output::emit(app.json, &report, |r| match r.deleted {
                Some(rows) => println!("Cleanup done, {rows} rows deleted."),
                None => println!("Cleanup done."),
            })
        }
    }
}

fn print_retention(app: &App, settings: &RetentionSettings) -> Result<()> {
    output::emit(app.json, settings, |s| {
        println!("Keep:       {} days", s.effective_days());
        let pdf = if s.auto_export_pdf.unwrap_or(false) {
            "yes"
        } else {
            "no"
        };
        println!("PDF first:  {pdf}");
        println!("Frequency:  {}", or_dash(s.frequency.as_deref()));
    })
}

// ── Tables ───────────────────────────────────────────────────────

pub async fn tables(app: &App, command: TablesCommand) -> Result<()> {
    let token = app.token()?;
    match command {
        TablesCommand::List => {
            let tables = app.client.list_tables(&token).await?;
            output::emit(app.json, &tables, |tables| {
                for table in tables {
                    println!("{}", table.name);
                }
            })
        }
        TablesCommand::Info { table } => {
            let info = app.client.table_info(&token, &table).await?;
            output::emit(app.json, &info, |i| {
                println!("Table:        {table}");
                println!("Rows:         {}", i.rows.unwrap_or(0));
                println!("Size:         {}", i.size_label());
                println!("Last vacuum:  {}", or_dash(i.last_vacuum.as_deref()));
                println!("Last analyze: {}", or_dash(i.last_analyze.as_deref()));
            })
        }
        TablesCommand::Vacuum { table } => {
            let result = app.client.vacuum_table(&token, &table).await?;
            output::emit(app.json, &result, |_| println!("Vacuumed {table}."))
        }
        TablesCommand::Truncate { table, yes } => {
            confirm(yes, &format!("empty table {table}"))?;
            let result = app.client.truncate_table(&token, &table).await?;
            output::emit(app.json, &result, |_| println!("Emptied {table}."))
        }
    }
}

// ── Exports ──────────────────────────────────────────────────────

pub async fn export(app: &App, command: ExportCommand) -> Result<()> {
    let token = app.token()?;
    match command {
        ExportCommand::Create { format, wait } => {
            let poller = app.poller();
            let Some(job) = poller.request_export(format).await else {
                bail!("export request failed");
            };
            let Some(id) = job.id.clone() else {
                return output::emit(app.json, &job, print_job);
            };
            if !wait {
                return output::emit(app.json, &job, print_job);
            }

            let mut state = poller.subscribe();
            state.wait_for(|s| !s.is_polling()).await?;
            let finished = poller
                .exports()
                .into_iter()
                .find(|j| j.id.as_ref() == Some(&id))
                .unwrap_or(job);
            output::emit(app.json, &finished, print_job)
        }
        ExportCommand::List => {
            let jobs = app.client.list_exports(&token).await?;
            output::emit(app.json, &jobs, |jobs| {
                if jobs.is_empty() {
                    println!("No exports yet.");
                }
                for job in jobs {
                    print_job(job);
                }
            })
        }
        ExportCommand::Status { id } => {
            let job = app.client.export_status(&token, &RemoteId::new(id)).await?;
            output::emit(app.json, &job, print_job)
        }
    }
}

fn print_job(job: &ExportJob) {
    let id = job.id.as_ref().map(RemoteId::as_str);
    let format = job.format.map(|f| f.label()).unwrap_or("-");
    let created = job
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "#{:<6} {format:<4} {:<11} {created}  {}",
        or_dash(id),
        job.status.as_str(),
        job.download_link().unwrap_or("")
    );
}

