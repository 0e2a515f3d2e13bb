//! `den2ne`: build a graph from CSV input, prune and propagate once, then
//! run the iterated balance loop for a chosen criterion under the three
//! standard variants (ideal, with losses, with losses and capacity),
//! emitting `outdata_d<delta>.csv` and `swConfig_d<delta>_c<k>.csv`.
//!
//! Grounded on `gat-cli::main`'s clap + tracing wiring, scoped down to this
//! system's single build -> prune -> propagate -> iterate control flow
//! (spec.md §2).

mod cli;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use cli::Cli;
use den2ne_core::driver::run_balance_loop;
use den2ne_core::graph::Graph;
use den2ne_core::propagator::propagate;
use den2ne_io::load_graph_input;
use den2ne_io::report::{write_outdata_csv, write_sw_config_csv, OutdataRow};

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(tracing::Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let (input, diag) = load_graph_input(&cli.input_dir, &cli.root, cli.delta, &cli.links_config)?;
    if diag.has_issues() {
        warn!("{}", diag.summary());
        for issue in &diag.issues {
            warn!("{}", issue);
        }
    }

    let mut graph = Graph::build(input)?;
    let removed = graph.prune();
    info!(removed = removed.len(), "pruned virtual leaves");
    propagate(&mut graph);

    let criterion = cli.criterion.resolve(cli.alpha, cli.beta);

    let mut ideal_graph = graph.snapshot();
    let ideal = run_balance_loop(&mut ideal_graph, criterion, false, false)?;
    info!(iterations = ideal.iterations, "ideal balance converged");

    let mut wloss_graph = graph.snapshot();
    let wloss = run_balance_loop(&mut wloss_graph, criterion, true, false)?;
    info!(iterations = wloss.iterations, "with-losses balance converged");

    let mut wloss_cap_graph = graph.snapshot();
    let wloss_cap = run_balance_loop(&mut wloss_cap_graph, criterion, true, true)?;
    info!(iterations = wloss_cap.iterations, "with-losses-and-cap balance converged");

    std::fs::create_dir_all(&cli.output_dir)?;

    let row = OutdataRow {
        criterion: cli.criterion.label().to_string(),
        power_ideal: ideal.balance.total_at_root,
        abs_ideal: ideal.balance.abs_flux,
        power_wloss: wloss.balance.total_at_root,
        abs_wloss: wloss.balance.abs_flux,
        power_wloss_cap: wloss_cap.balance.total_at_root,
        abs_wloss_cap: wloss_cap.balance.abs_flux,
    };
    let outdata_path = cli.output_dir.join(format!("outdata_d{}.csv", cli.delta));
    write_outdata_csv(&outdata_path, &[row])?;

    let sw_config_path = cli.output_dir.join(format!("swConfig_d{}_c0.csv", cli.delta));
    write_sw_config_csv(&sw_config_path, &wloss_cap_graph)?;

    Ok(())
}
