use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lexitrend_analysis::config::AnalysisConfig;

use self::{compare::CompareArg, regress::RegressArg, trends::TrendsArg};
use crate::util;

mod compare;
mod regress;
mod table;
mod trends;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// JSON analysis configuration overriding the defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Which analysis to run
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Compare category scores of two corpora with Mann-Whitney U tests
    Compare(#[clap(flatten)] CompareArg),
    /// Regress decade means on decade and chart each category
    Regress(#[clap(flatten)] RegressArg),
    /// Chart min-max normalized, LOWESS-smoothed decade trends
    Trends(#[clap(flatten)] TrendsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let config = match &args.config {
        Some(path) => util::read_config_file(path)?,
        None => AnalysisConfig::default(),
    };
    match &args.mode {
        Mode::Compare(arg) => compare::run(arg, &config)?,
        Mode::Regress(arg) => regress::run(arg, &config)?,
        Mode::Trends(arg) => trends::run(arg, &config)?,
    }
    Ok(())
}
