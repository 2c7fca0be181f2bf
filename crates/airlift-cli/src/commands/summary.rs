use airlift_topology::{TopologyBuilder, TopologyConfig};
use colored::Colorize;

pub fn handle(config: TopologyConfig) -> anyhow::Result<()> {
    let topology = TopologyBuilder::build(&config)?;

    println!("{}", "Topology plan".green().bold());
    println!("  {} resources", topology.plan.len());
    let summary = topology.plan.summary();
    for (resource_type, count) in summary.iter() {
        println!("    {} {}", count, resource_type.cyan());
        for resource in topology.plan.by_type(resource_type) {
            println!("      - {}", resource.id);
        }
    }

    if !topology.plan.outputs.is_empty() {
        println!("  Outputs:");
        for output in &topology.plan.outputs {
            println!(
                "    {} = {} ({})",
                output.export_name.cyan(),
                output.value,
                output.description
            );
        }
    }

    Ok(())
}
