use airlift_topology::{TopologyBuilder, TopologyConfig};
use colored::Colorize;
use std::path::PathBuf;

pub fn handle(config: TopologyConfig, output: Option<PathBuf>) -> anyhow::Result<()> {
    let topology = TopologyBuilder::build(&config)?;
    let json = topology.plan.to_json_pretty()?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json)?;
            eprintln!(
                "{} {} ({})",
                "Plan written to".green(),
                path.display().to_string().cyan(),
                topology.plan.summary()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
