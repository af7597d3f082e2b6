use slurmgcp_hostlist::to_hostlist;

/// Split comma-separated arguments into individual names.
fn split_names(args: &[String]) -> Vec<&str> {
    args.iter()
        .flat_map(|a| a.split(','))
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect()
}

pub fn compress(args: &[String]) -> anyhow::Result<()> {
    println!("{}", to_hostlist(split_names(args)));
    Ok(())
}

pub fn expand(hostlist: &str) -> anyhow::Result<()> {
    for name in slurmgcp_hostlist::expand(hostlist)? {
        println!("{name}");
    }
    Ok(())
}
