//! One-shot cluster membership commands: bootstrap and shrink.
//!
//! Both are thin pass-through RPCs with the fixed admin timeout and no
//! automatic retry. Scope names are validated locally before any connection
//! is opened.

use anyhow::{Context, Result};
use tracing::info;

use crate::admin::client::AdminClient;
use crate::admin::types::ReplicationProperty;
use crate::cli::{AppContext, BootstrapArgs, ShrinkArgs};
use crate::infra::config::load_config;
use crate::infra::term::print_success;

/// `ncfg bootstrap` entry point.
///
/// Finalizes initial cluster setup: enables sequencing, transitions
/// provisioned storage nodes to read-write, and creates the initial metadata
/// nodeset per the replication property. Fails on an already-bootstrapped
/// cluster or when too few storage nodes are provisioned.
pub fn run_bootstrap(args: BootstrapArgs, ctx: &AppContext) -> Result<()> {
    // Reject unknown scopes before anything touches the network.
    let replication = ReplicationProperty::from_pairs(&args.replicate_across)?;

    let config = load_config()?;
    let mut client = AdminClient::connect(config.admin_options(ctx.addr.as_deref()))
        .context("connect to admin server")?;

    let message = client.bootstrap(&replication)?;
    info!(?message, "cluster bootstrapped");
    print_success(ctx, "Successfully bootstrapped the cluster");
    Ok(())
}

/// `ncfg shrink` entry point.
///
/// Removes nodes from the configuration. The server enforces that removed
/// nodes are dead and store nothing; a rejection comes back as an error and
/// a non-zero exit.
pub fn run_shrink(args: ShrinkArgs, ctx: &AppContext) -> Result<()> {
    let config = load_config()?;
    let mut client = AdminClient::connect(config.admin_options(ctx.addr.as_deref()))
        .context("connect to admin server")?;

    let message = client.remove_nodes(&args.node_indexes)?;
    info!(?message, nodes = ?args.node_indexes, "nodes removed");
    print_success(ctx, "Successfully removed the nodes");
    Ok(())
}
