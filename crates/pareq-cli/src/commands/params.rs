//! Parameter listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use pareq_core::{EqParam, ParamDescriptor, ParamFlags, Slope};

#[derive(Args)]
pub struct ParamsArgs {
    /// Show only the parameter with this id or name
    #[arg(value_name = "PARAM")]
    param: Option<String>,
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let selected: Vec<&ParamDescriptor> = match &args.param {
        Some(name) => {
            let param = pareq_host::ParameterStore::new()
                .find_index(name)
                .and_then(EqParam::from_index)
                .ok_or_else(|| anyhow::anyhow!("Unknown parameter: {}", name))?;
            vec![param.descriptor()]
        }
        None => EqParam::descriptors().iter().collect(),
    };

    println!(
        "  {:4}  {:15}  {:14}  {:>12}  {}",
        "ID", "Key", "Name", "Default", "Range"
    );
    println!(
        "  {:4}  {:15}  {:14}  {:>12}  {}",
        "--", "---", "----", "-------", "-----"
    );
    for desc in &selected {
        println!(
            "  {:4}  {:15}  {:14}  {:>12}  {}",
            desc.id.0,
            desc.string_id,
            desc.name,
            format_value(desc, desc.default),
            format_range(desc)
        );
    }

    if selected.iter().any(|d| d.flags.contains(ParamFlags::STEPPED)) {
        println!();
        println!("Slope choices:");
        for slope in Slope::ALL {
            println!("  {} = {}", slope.index(), slope.label());
        }
    }

    println!();
    println!("Example usage:");
    println!("  pareq process input.wav output.wav --param low_cut_freq=80 --param low_cut_slope=3");
    Ok(())
}

fn format_value(desc: &ParamDescriptor, value: f32) -> String {
    if desc.flags.contains(ParamFlags::STEPPED) {
        format!("{value:.0}")
    } else {
        format!("{value}{}", desc.unit.suffix())
    }
}

fn format_range(desc: &ParamDescriptor) -> String {
    format!(
        "{} .. {}",
        format_value(desc, desc.min),
        format_value(desc, desc.max)
    )
}
