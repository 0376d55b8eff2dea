use crate::infra::{build_desk, InMemoryRentalRepository};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use rental_desk::config::{AppConfig, RentalConfig};
use rental_desk::error::AppError;
use rental_desk::telemetry;
use rental_desk::workflows::rental::{
    Customer, DueDatePolicy, Item, NotificationReport, PricingPolicy, Rental, RentalId,
    RentalRepository, RentalStatus, BASE_RENTAL_DAYS,
};
use rust_decimal_macros::dec;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Business date for the walkthrough (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct OverdueBatchArgs {
    /// Business date the batch treats as today (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_overdue_batch(args: OverdueBatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let today = args
        .today
        .or(config.rental.business_date)
        .unwrap_or_else(|| Local::now().date_naive());
    let rental_config = RentalConfig {
        business_date: Some(today),
        ..config.rental
    };

    let (desk, repository) = build_desk(&rental_config);
    seed_sample_rentals(&repository, today)?;

    let report = desk.notifier.notify_overdue()?;
    render_report(&report);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let config = RentalConfig {
        business_date: Some(today),
        blacklist: vec!["Devedor".to_string()],
    };
    let (desk, repository) = build_desk(&config);

    println!("Rental desk walkthrough for {today}");

    println!("\nRank discount schedule (titles at 4.00 each)");
    for count in 1..=6 {
        let items: Vec<Item> = (1..=count)
            .map(|n| Item::new(format!("Filme {n}"), 1, dec!(4.00)))
            .collect();
        println!("  {count} title(s): {}", PricingPolicy.compute_total(&items));
    }

    println!("\nDue dates for a {BASE_RENTAL_DAYS}-day rental");
    for offset in 0..7 {
        let start = today + Duration::days(offset);
        let due = DueDatePolicy.compute_due_date(start, BASE_RENTAL_DAYS);
        println!(
            "  rented {} {start} -> due {} {due}",
            start.format("%a"),
            due.format("%a")
        );
    }

    println!("\nEligibility checks");
    let requests = [
        (
            Some("Ana"),
            vec![
                ("Central do Brasil", dec!(4.00)),
                ("Cidade de Deus", dec!(3.50)),
            ],
        ),
        (None, vec![("Central do Brasil", dec!(4.00))]),
        (Some("Bruno"), Vec::new()),
        (Some("Carla"), vec![("Tropa de Elite", dec!(4.00))]),
        (Some("Devedor"), vec![("O Auto da Compadecida", dec!(4.00))]),
    ];
    for (customer, titles) in requests {
        let label = customer.unwrap_or("<no customer>").to_string();
        let items: Vec<Item> = titles
            .into_iter()
            .map(|(name, price)| Item::new(name, 1, price))
            .collect();
        match desk.workflow.rent(customer.map(Customer::new), Some(items)) {
            Ok(rental) => println!(
                "  {label}: rented {} for {} due {}",
                rental.rental_id, rental.total_charge, rental.due_date
            ),
            Err(err) => println!("  {label}: rejected ({}) {err}", err.reason_code()),
        }
    }

    seed_sample_rentals(&repository, today)?;
    println!("\nOverdue notice batch");
    let report = desk.notifier.notify_overdue()?;
    render_report(&report);

    Ok(())
}

/// Populate the store with a mix of on-time, late and returned rentals.
fn seed_sample_rentals(
    repository: &InMemoryRentalRepository,
    today: NaiveDate,
) -> Result<(), AppError> {
    let samples = [
        ("sample-001", "Helena", -5, -3, RentalStatus::Active),
        ("sample-002", "Igor", -1, 0, RentalStatus::Active),
        ("sample-003", "Joana", -6, -2, RentalStatus::Active),
        ("sample-004", "Joana", -4, -1, RentalStatus::Active),
        ("sample-005", "Kleber", -9, -7, RentalStatus::Returned),
    ];

    for (id, customer, rented, due, status) in samples {
        repository.persist(Rental {
            rental_id: RentalId(id.to_string()),
            customer: Customer::new(customer),
            items: vec![Item::new("Central do Brasil", 3, dec!(4.00))],
            total_charge: dec!(4.00),
            rental_date: today + Duration::days(rented),
            due_date: today + Duration::days(due),
            status,
        })?;
    }
    Ok(())
}

fn render_report(report: &NotificationReport) {
    println!(
        "  business date {}: scanned {} pending, {} overdue, {} delivered, {} failed",
        report.business_date,
        report.scanned,
        report.overdue,
        report.delivered,
        report.failed.len()
    );
    for failure in &report.failed {
        println!(
            "  - {} ({}) {}",
            failure.customer, failure.rental_id, failure.error
        );
    }
}
