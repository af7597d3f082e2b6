use serde_json::json;

pub fn desc(name: &str) -> anyhow::Result<()> {
    let desc = slurmgcp_hostlist::node_desc(name)?;
    let out = json!({
        "cluster": desc.cluster,
        "nodeset": desc.nodeset,
        "node": desc.node,
        "prefix": desc.prefix,
        "suffix": desc.suffix(),
        "range": desc.range(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

pub fn index(name: &str) -> anyhow::Result<()> {
    println!("{}", slurmgcp_hostlist::node_index(name)?);
    Ok(())
}
