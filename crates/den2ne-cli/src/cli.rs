//! Command-line argument definitions, following `gat-cli::cli`'s derive
//! style.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "den2ne", about = "Hierarchical-path routing and power-balance engine")]
pub struct Cli {
    /// Directory containing loads.csv, links.csv, a link-config CSV, and
    /// optionally switches.csv / node_positions.csv.
    #[arg(long)]
    pub input_dir: PathBuf,

    /// Directory outdata_d<delta>.csv and swConfig_d<delta>_c<k>.csv are written to.
    #[arg(long)]
    pub output_dir: PathBuf,

    /// Identity of the root node.
    #[arg(long)]
    pub root: String,

    /// Filename of the link-config CSV within `input_dir` (spec.md §6 notes
    /// the name varies per dataset, hence no fixed default assumption).
    #[arg(long, default_value = "links_config.csv")]
    pub links_config: String,

    /// Timestep column to select from loads.csv (e.g. 15, 30, ..., 1440).
    #[arg(long)]
    pub delta: u32,

    /// Selection objective.
    #[arg(long, value_enum, default_value_t = CriterionArg::Hops)]
    pub criterion: CriterionArg,

    /// Weight on the loss/distance term for LowLinksLosses and PowerToZero.
    #[arg(long, default_value_t = 0.5)]
    pub alpha: f64,

    /// Weight on the hop-count term for LowLinksLosses and PowerToZero.
    #[arg(long, default_value_t = 0.5)]
    pub beta: f64,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CriterionArg {
    Hops,
    LowLinksLosses,
    PowerToZero,
    PowerToZeroWithLosses,
    Distance,
    LinksLosses,
}

impl CriterionArg {
    pub fn resolve(self, alpha: f64, beta: f64) -> den2ne_core::selector::Criterion {
        use den2ne_core::selector::Criterion;
        match self {
            CriterionArg::Hops => Criterion::Hops,
            CriterionArg::LowLinksLosses => Criterion::LowLinksLosses { alpha, beta },
            CriterionArg::PowerToZero => Criterion::PowerToZero { alpha, beta },
            CriterionArg::PowerToZeroWithLosses => Criterion::PowerToZeroWithLosses,
            CriterionArg::Distance => Criterion::Distance,
            CriterionArg::LinksLosses => Criterion::LinksLosses,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CriterionArg::Hops => "hops",
            CriterionArg::LowLinksLosses => "low_links_losses",
            CriterionArg::PowerToZero => "power_to_zero",
            CriterionArg::PowerToZeroWithLosses => "power_to_zero_with_losses",
            CriterionArg::Distance => "distance",
            CriterionArg::LinksLosses => "links_losses",
        }
    }
}
