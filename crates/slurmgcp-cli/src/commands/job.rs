use std::io::Read;

use anyhow::Context;
use slurmgcp_lookup::{Job, parse_job_info};

fn parse(record: &str) -> anyhow::Result<Job> {
    parse_job_info(record).context("failed to parse job record")
}

pub fn parse_stdin() -> anyhow::Result<()> {
    let mut record = String::new();
    std::io::stdin()
        .read_to_string(&mut record)
        .context("failed to read job record from stdin")?;
    let job = parse(&record)?;
    println!("{}", serde_json::to_string_pretty(&job)?);
    Ok(())
}
