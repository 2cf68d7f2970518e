//! Status command - query the terminal once and print the classification.

use dishwatch::status::{LinkHealth, StatusSnapshot};

use crate::error::CliError;
use crate::runner::{CliRunner, RunnerOptions};

pub fn run(options: RunnerOptions) -> Result<(), CliError> {
    let runner = CliRunner::new(&options)?;
    runner.log_startup("status");

    let link = runner.device_link();
    let status = runner.runtime()?.block_on(link.status())?;
    let snapshot = StatusSnapshot::from_device(&status);

    print_snapshot(&snapshot);
    Ok(())
}

fn print_snapshot(snapshot: &StatusSnapshot) {
    let health = snapshot.health();

    println!("Status:    {}", health.status_label());
    if let LinkHealth::Outage { cause } = &health {
        println!("Cause:     {}", cause);
        if let Some(duration) = snapshot.outage_duration_text() {
            println!("Duration:  {}", duration);
        }
    } else {
        println!("Downlink:  {:.0} bps", snapshot.downlink_bps);
        println!("Uplink:    {:.0} bps", snapshot.uplink_bps);
        match snapshot.latency_ms {
            Some(latency) => println!("Latency:   {:.1} ms", latency),
            None => println!("Latency:   -"),
        }
    }
    println!("Message:   {}", snapshot.status_message());
    println!("Uptime:    {} s", snapshot.uptime_secs);
    println!("Hardware:  {}", snapshot.hardware_version);
    println!("Software:  {}", snapshot.software_version);
    if snapshot.alerts.is_empty() {
        println!("Alerts:    none");
    } else {
        let alerts: Vec<&str> = snapshot.alerts.iter().map(String::as_str).collect();
        println!("Alerts:    {}", alerts.join(", "));
    }
}
