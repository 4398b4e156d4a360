//! Sample host for spindle.
//!
//! Resolves the demo contracts through the process-wide locator, or through a
//! locator built from an explicit configuration file.

mod services;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use spindle::{Config, Contract, LoadingContext, ServiceLocator};
use tracing::{info, warn};

use crate::services::{DemoService, InheritService, InheritServiceA, InheritServiceB};

/// Sample command line arguments.
#[derive(Parser, Debug)]
#[command(name = "spindle-sample")]
#[command(about = "Look up demo services through spindle")]
struct Args {
	/// TOML configuration file (defaults to SPINDLE_CONFIG / SPINDLE_PATH)
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Ask the first DemoService who it is
	Hello,
	/// Show the identity of one InheritService variant
	Inherit {
		#[arg(value_enum)]
		variant: Variant,
	},
	/// List every implementation discovered for a contract
	List {
		#[arg(value_enum)]
		contract: ContractArg,
	},
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Variant {
	A,
	B,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ContractArg {
	Demo,
	Inherit,
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	setup_tracing(args.verbose);

	let owned;
	let locator = match &args.config {
		Some(path) => {
			let config = Config::load(path).with_context(|| format!("loading {}", path.display()))?;
			info!(path = %path.display(), roots = config.search_path.len(), "using explicit configuration");
			owned = ServiceLocator::new(LoadingContext::from_config(&config));
			&owned
		}
		None => ServiceLocator::global(),
	};

	match args.command {
		Command::Hello => {
			let service = locator
				.get_one::<dyn DemoService>()?
				.context("no DemoService registered")?;
			println!("{}", service.tell_me_who_you_are());
		}
		Command::Inherit { variant } => {
			let service = match variant {
				Variant::A => locator.get_specific::<dyn InheritService, InheritServiceA>()?,
				Variant::B => locator.get_specific::<dyn InheritService, InheritServiceB>()?,
			}
			.with_context(|| format!("no InheritService variant {variant:?} registered"))?;
			println!("{}", service.show_identity());
		}
		Command::List { contract } => match contract {
			ContractArg::Demo => list::<dyn DemoService>(locator)?,
			ContractArg::Inherit => list::<dyn InheritService>(locator)?,
		},
	}

	Ok(())
}

/// Prints each discovered implementation of `C`, logging the ones that fail.
fn list<C: Contract + ?Sized>(locator: &ServiceLocator) -> anyhow::Result<()> {
	let services = locator.iter::<C>()?;
	println!("{} ({} descriptors)", C::NAME, services.len());
	for service in services {
		match service {
			Ok(service) => println!("  {}", service.implementation()),
			Err(error) => warn!(%error, contract = C::NAME, "skipping broken descriptor"),
		}
	}
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("spindle=trace,spindle_sample=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(true))
		.init();
}
