//! Pretty-print the current nodes configuration.

use anyhow::{Context, Result};

use crate::admin::client::AdminClient;
use crate::admin::codec::WireCodec;
use crate::cli::AppContext;
use crate::infra::config::load_config;

/// `ncfg show` entry point: fetch, decode, render with sorted keys.
pub fn run(ctx: &AppContext) -> Result<()> {
    let config = load_config()?;
    let mut client = AdminClient::connect(config.admin_options(ctx.addr.as_deref()))
        .context("connect to admin server")?;

    let raw = client.fetch_config().context("fetch nodes config")?;
    let document = WireCodec
        .decode_document(&raw)
        .context("decode nodes config")?;

    println!("{}", document.snapshot());
    Ok(())
}
